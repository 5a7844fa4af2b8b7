#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Standalone HTTP server relaying notifications by email

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use notification_relay::{
    domain::notifications::NotificationServiceImpl,
    infrastructure::{
        email::smtp::{SMTPConfig, SMTPMailer},
        http::{AppState, HttpServer, HttpServerConfig},
    },
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The SMTP relay configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let subject = args.smtp.subject.clone();
    let mailer = Arc::new(SMTPMailer::new(args.smtp));
    let state = AppState::new(NotificationServiceImpl::new(mailer, &subject));

    HttpServer::new(state, args.server).await?.run().await
}
