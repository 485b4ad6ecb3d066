pub mod photos;
pub mod priority;
pub mod reports;
