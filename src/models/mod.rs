pub mod answer;
pub mod execution;
pub mod question;
pub mod rubric;
pub mod user;
