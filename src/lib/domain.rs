//! Domain modules

pub mod communication;
pub mod notifications;
