pub mod answers;
pub mod lenient;
pub mod strategy;
