pub mod clients;
pub mod dtos;
pub mod geo;
pub mod handlers;
pub mod routes;
pub mod scoring;
pub mod services;

pub use clients::OverpassClient;
pub use services::PriorityService;
