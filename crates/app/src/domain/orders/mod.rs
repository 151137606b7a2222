//! Orders

pub mod data;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod service;
pub mod status;

pub use errors::OrdersServiceError;
pub use service::*;
