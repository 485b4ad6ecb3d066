mod priority_service;

pub use priority_service::{PriorityScore, PriorityService};
