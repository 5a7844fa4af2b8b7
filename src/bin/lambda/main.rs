#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! AWS Lambda function relaying notifications by email

use std::sync::Arc;

use clap::Parser;
use lambda_http::{run, Error};
use notification_relay::{
    domain::notifications::NotificationServiceImpl,
    infrastructure::{
        email::smtp::{SMTPConfig, SMTPMailer},
        http::{router, AppState},
    },
};

/// Environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The SMTP relay configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    // CloudWatch adds its own timestamps
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();

    let subject = args.smtp.subject.clone();
    let mailer = Arc::new(SMTPMailer::new(args.smtp));
    let state = AppState::new(NotificationServiceImpl::new(mailer, &subject));

    run(router(state)).await
}
