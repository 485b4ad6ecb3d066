pub mod priority_handler;

pub use priority_handler::*;
