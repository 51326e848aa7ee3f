pub mod answer;
pub mod envelope;
pub mod question;
pub mod segment;
pub mod tag;
