pub mod action;
pub mod review_request;
