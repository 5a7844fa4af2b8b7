//! Communication module

pub mod mailer;
