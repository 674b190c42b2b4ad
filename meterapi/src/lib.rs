mod client;
pub mod command;
mod error;
pub mod query;
mod service;
pub mod util;

pub use client::Client;
pub use error::ApiError;
pub use service::DataService;
