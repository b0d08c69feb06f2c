use axum::{
    Router,
    routing::{get, post},
};

use crate::routes::{
    choose_course, current_question, show_question, skip_question, submit_question,
};
use crate::states::app_state::AppState;

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(show_question).post(submit_question))
        .route("/skip", post(skip_question))
        .route("/course", post(choose_course))
        .nest(
            "/api",
            Router::new().route("/question", get(current_question)),
        )
        .with_state(state)
}
