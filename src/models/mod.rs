pub mod exercise;
pub mod log_filter;
pub mod user;
