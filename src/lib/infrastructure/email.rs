//! Email delivery

pub mod login;
pub mod smtp;

#[cfg(test)]
pub mod fake_relay;
