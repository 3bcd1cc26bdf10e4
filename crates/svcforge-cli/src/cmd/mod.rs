pub mod assess;
pub mod diagnose;
pub mod discover;
pub mod generate;
pub mod validate;
