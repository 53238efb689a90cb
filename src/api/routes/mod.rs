pub mod coach;
pub mod reports;
pub mod strategy;
pub mod teams;
pub mod threats;
