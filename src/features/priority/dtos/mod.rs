mod priority_dto;

pub use priority_dto::*;
