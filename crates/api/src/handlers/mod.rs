pub mod advisory;
pub mod refactoring;
