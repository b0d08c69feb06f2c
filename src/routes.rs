use axum::{
    Form, Json,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::enums::review_request::ReviewRequest;
use crate::error::{Result, ReviewError};
use crate::form::{FormPairs, parse_skip, parse_submission};
use crate::render;
use crate::states::app_state::AppState;
use crate::states::review_session::{ReviewSession, ReviewView};

#[derive(Debug, Deserialize)]
pub struct CourseChoice {
    pub course: String,
}

pub async fn show_question(State(state): State<AppState>) -> Response {
    let mut session = state.session();
    respond(&mut session, ReviewRequest::View)
}

pub async fn submit_question(
    State(state): State<AppState>,
    Form(pairs): Form<FormPairs>,
) -> Response {
    let request = match parse_submission(&pairs) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };
    let mut session = state.session();
    respond(&mut session, request)
}

pub async fn skip_question(
    State(state): State<AppState>,
    Form(pairs): Form<FormPairs>,
) -> Response {
    let request = match parse_skip(&pairs) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };
    let mut session = state.session();
    respond(&mut session, request)
}

pub async fn choose_course(
    State(state): State<AppState>,
    Form(choice): Form<CourseChoice>,
) -> Result<Redirect> {
    state.session().select_course(&choice.course)?;
    Ok(Redirect::to("/"))
}

pub async fn current_question(State(state): State<AppState>) -> Result<Json<ReviewView>> {
    let view = state.session().handle(ReviewRequest::View)?;
    Ok(Json(view))
}

fn respond(session: &mut ReviewSession, request: ReviewRequest) -> Response {
    match session.handle(request) {
        Ok(view) => Html(render::question_page(&view)).into_response(),
        Err(ReviewError::CourseNotSelected) => match session.available_courses() {
            Ok(courses) => Html(render::course_picker(&courses)).into_response(),
            Err(e) => e.into_response(),
        },
        Err(e) => e.into_response(),
    }
}
