//! HTML for the review form. Every interpolated value goes through html-escape.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::enums::action::Action;
use crate::states::review_session::ReviewView;

const STYLE: &str = "body{font-family:sans-serif;max-width:52rem;margin:2rem auto}\
label{display:block;margin-top:.8rem;font-weight:bold}\
input[type=text],textarea{width:100%}\
.meta{color:#555}.flash{color:#2a7a2a}.error{color:#a12}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        text(title)
    )
}

fn input(name: &str, value: &str) -> String {
    format!(
        "<input type=\"text\" name=\"{}\" value=\"{}\">",
        attr(name),
        attr(value)
    )
}

fn textarea(name: &str, value: &str, rows: usize) -> String {
    format!(
        "<textarea name=\"{}\" rows=\"{rows}\">{}</textarea>",
        attr(name),
        text(value)
    )
}

/// One input per existing value plus a blank one for adding.
fn repeated(name: &str, values: &[String]) -> String {
    values
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(""))
        .map(|v| input(name, v))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn question_page(view: &ReviewView) -> String {
    let r = &view.record;
    let mut body = String::new();

    body.push_str(&format!(
        "<h1>Question {} / {}</h1>\n<p class=\"meta\">{} &middot; id {} &middot; course {} &middot; part {} &middot; chapter {}</p>\n",
        view.position + 1,
        view.count,
        text(&view.label),
        text(&r.id),
        text(view.course.as_deref().unwrap_or(&r.course)),
        text(&r.part),
        text(&r.chapter),
    ));
    if view.saved_files > 0 {
        body.push_str(&format!(
            "<p class=\"flash\">Saved {} file(s).</p>\n",
            view.saved_files
        ));
    }

    body.push_str("<form method=\"post\" action=\"/\">\n");
    body.push_str(&format!(
        "<label>Difficulty</label>{}\n",
        input("difficulty", &r.difficulty)
    ));
    body.push_str(&format!(
        "<label>Duration (minutes)</label><input type=\"number\" min=\"1\" name=\"duration\" value=\"{}\">\n",
        r.duration
    ));
    body.push_str(&format!("<label>Author</label>{}\n", input("author", &r.author)));
    body.push_str(&format!("<label>Tags</label>{}\n", repeated("tag", &r.tags)));
    body.push_str(&format!(
        "<label>Question</label>{}\n",
        textarea("question", &r.question, 4)
    ));
    body.push_str(&format!(
        "<label>Answer</label>{}\n",
        textarea("answer", &r.answer, 3)
    ));
    body.push_str(&format!(
        "<label>Wrong answers</label>{}\n",
        repeated("wrong_answer", &r.wrong_answers)
    ));
    body.push_str(&format!(
        "<label>Explanation</label>{}\n",
        textarea("explanation", &r.explanation, 8)
    ));
    body.push_str(&format!(
        "<label><input type=\"checkbox\" name=\"reviewed\" value=\"True\"{}> Reviewed</label>\n",
        if r.reviewed { " checked" } else { "" }
    ));

    body.push_str("<p>\n");
    for (caption, action) in [
        ("Previous", Action::Previous),
        ("Save", Action::Save),
        ("Next", Action::Next),
    ] {
        body.push_str(&format!(
            "<button type=\"submit\" name=\"{}\" value=\"1\">{caption}</button>\n",
            action.marker()
        ));
    }
    body.push_str("</p>\n</form>\n");

    page(&format!("Review {}", view.label), &body)
}

pub fn course_picker(courses: &[String]) -> String {
    let body = if courses.is_empty() {
        "<h1>Choose a course</h1>\n<p class=\"error\">No course with a quiz directory was found.</p>"
            .to_string()
    } else {
        let options: Vec<String> = courses
            .iter()
            .map(|c| format!("<option value=\"{}\">{}</option>", attr(c), text(c)))
            .collect();
        format!(
            "<h1>Choose a course</h1>\n<form method=\"post\" action=\"/course\">\n\
             <select name=\"course\">\n{}\n</select>\n\
             <button type=\"submit\">Review</button>\n</form>",
            options.join("\n")
        )
    };
    page("Choose a course", &body)
}

/// Error page with buttons that move off the current question without saving.
pub fn error_page(message: &str) -> String {
    let buttons: String = [("Previous", Action::Previous), ("Next", Action::Next)]
        .iter()
        .map(|(caption, action)| {
            format!(
                "<button type=\"submit\" name=\"{}\" value=\"1\">{caption} question</button>\n",
                action.marker()
            )
        })
        .collect();
    page(
        "Review error",
        &format!(
            "<h1>Something went wrong</h1>\n<p class=\"error\">{}</p>\n\
             <p><a href=\"/\">Back to the question</a></p>\n\
             <form method=\"post\" action=\"/skip\">\n{buttons}</form>",
            text(message)
        ),
    )
}
