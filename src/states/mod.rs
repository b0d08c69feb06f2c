pub mod app_state;
pub mod review_session;
