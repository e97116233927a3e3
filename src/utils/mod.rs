pub mod payload;
pub mod validation;
