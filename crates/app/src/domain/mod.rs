//! Order Service Domain Concerns

pub mod inventory;
pub mod orders;
