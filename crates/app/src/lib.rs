//! Order processing domain, persistence and outbound integrations.

pub mod context;
pub mod database;
pub mod domain;
pub mod telemetry;

#[cfg(test)]
mod test;
