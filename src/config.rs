use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::states::review_session::Layout;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayoutKind {
    /// One YAML file per question in a single directory
    Flat,
    /// `<root>/<course>/quizz/<NNN>/{question.yml,en.yml}`
    Course,
}

#[derive(Parser, Debug)]
#[command(
    name = "quiz-reviewer",
    about = "Local web form for reviewing quiz questions stored as YAML",
    version
)]
pub struct Config {
    /// How questions are laid out on disk
    #[arg(long, value_enum, default_value = "flat")]
    pub layout: LayoutKind,

    /// Questions directory (flat) or courses directory (course)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Course to open right away instead of asking in the browser
    #[arg(long)]
    pub course: Option<String>,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,
}

impl Config {
    pub fn layout(&self) -> Layout {
        match self.layout {
            LayoutKind::Flat => Layout::Flat {
                root: self
                    .root
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("./questions")),
            },
            LayoutKind::Course => Layout::Courses {
                courses_root: self
                    .root
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("./courses")),
                course: self.course.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["quiz-reviewer"]).unwrap();
        assert_eq!(config.bind.to_string(), "127.0.0.1:3000");
        assert_eq!(
            config.layout(),
            Layout::Flat {
                root: PathBuf::from("./questions")
            }
        );
    }

    #[test]
    fn test_course_layout() {
        let config = Config::try_parse_from([
            "quiz-reviewer",
            "--layout",
            "course",
            "--root",
            "/srv/courses",
            "--course",
            "rust",
        ])
        .unwrap();
        assert_eq!(
            config.layout(),
            Layout::Courses {
                courses_root: PathBuf::from("/srv/courses"),
                course: Some("rust".to_string()),
            }
        );
    }

    #[test]
    fn test_rejects_unknown_layout() {
        assert!(Config::try_parse_from(["quiz-reviewer", "--layout", "tree"]).is_err());
    }
}
