//! Notification relay handler

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
};
use tracing::error;

use crate::{
    domain::notifications::{NotificationRequest, NotificationService},
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Relay a notification request as an email.
///
/// Accepts any method and path, mirroring an API Gateway proxy integration.
/// The body is `{"sender", "receiver", "message", "url"}`, all non-empty.
pub async fn handler<N: NotificationService>(
    State(state): State<AppState<N>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let body = body.map_err(|rejection| {
        error!(error = %rejection, "failed to read request body");
        ApiError::new_500("Failed at reading body")
    })?;

    let request = NotificationRequest::parse(&body)?;

    state.notifications.notify(&request).await?;

    Ok((StatusCode::OK, "Email sent"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::anyhow;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        domain::{
            communication::mailer::MailerError,
            notifications::{
                tests::MockNotificationService, NotificationServiceImpl, NotifyError,
            },
        },
        infrastructure::{
            email::{
                fake_relay::FakeRelay,
                smtp::{SMTPConfig, SMTPMailer},
            },
            http::{router, state::tests::test_state, AppState},
        },
    };

    fn body() -> serde_json::Value {
        json!({
            "sender": "A",
            "receiver": "b@x.com",
            "message": "hi",
            "url": "http://u",
        })
    }

    #[tokio::test]
    async fn test_notify_success() -> TestResult {
        let mut notifications = MockNotificationService::new();

        notifications
            .expect_notify()
            .times(1)
            .withf(|request| {
                request.sender == "A"
                    && request.receiver == "b@x.com"
                    && request.message == "hi"
                    && request.url == "http://u"
            })
            .returning(|_| Ok(()));

        let state = test_state(Some(notifications));

        let response = TestServer::new(router(state))?
            .post("/")
            .json(&body())
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "Email sent");

        Ok(())
    }

    #[tokio::test]
    async fn test_notify_accepts_any_method_and_path() -> TestResult {
        let mut notifications = MockNotificationService::new();

        notifications
            .expect_notify()
            .times(1)
            .returning(|_| Ok(()));

        let state = test_state(Some(notifications));

        let response = TestServer::new(router(state))?
            .put("/prod/notify")
            .json(&body())
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);

        Ok(())
    }

    #[tokio::test]
    async fn test_notify_missing_fields() -> TestResult {
        let mut notifications = MockNotificationService::new();

        notifications.expect_notify().times(0);

        let state = test_state(Some(notifications));
        let server = TestServer::new(router(state))?;

        for field in ["sender", "receiver", "message", "url"] {
            let mut body = body();
            body[field] = json!("");

            let response = server.post("/").json(&body).await;

            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(response.text(), "Missing fields");
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_notify_malformed_json() -> TestResult {
        let mut notifications = MockNotificationService::new();

        notifications.expect_notify().times(0);

        let state = test_state(Some(notifications));

        let response = TestServer::new(router(state))?
            .post("/")
            .text("{")
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.text(),
            "EOF while parsing an object at line 1 column 1"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_notify_mailer_failure() -> TestResult {
        let mut notifications = MockNotificationService::new();

        notifications.expect_notify().times(1).returning(|_| {
            Err(NotifyError::Mailer(MailerError::Connection(anyhow!(
                "connection refused"
            ))))
        });

        let state = test_state(Some(notifications));

        let response = TestServer::new(router(state))?
            .post("/")
            .json(&body())
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "Failed at sending email");

        Ok(())
    }

    fn relay_state(port: u16) -> AppState<NotificationServiceImpl<SMTPMailer>> {
        let config = SMTPConfig {
            host: "127.0.0.1".to_string(),
            port,
            username: "user@example.com".to_string(),
            password: "hunter2".to_string(),
            starttls: false,
            timeout_secs: Some(5),
            ..SMTPConfig::default()
        };

        AppState::new(NotificationServiceImpl::new(
            Arc::new(SMTPMailer::new(config)),
            "Tecsim Notification",
        ))
    }

    #[tokio::test]
    async fn test_notify_through_relay() -> TestResult {
        let relay = FakeRelay::start(&["Password:"], "hunter2")?;
        let state = relay_state(relay.port());

        let response = TestServer::new(router(state))?
            .post("/")
            .json(&body())
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "Email sent");

        let transcript = relay.transcript();

        assert!(transcript.data.contains("Subject: Tecsim Notification"));
        assert!(transcript.data.to_lowercase().contains("text/html"));
        assert!(transcript.data.contains("http://u"));

        Ok(())
    }

    #[tokio::test]
    async fn test_notify_relay_rejects_credentials() -> TestResult {
        let relay = FakeRelay::start(&["Password:"], "a different password")?;
        let state = relay_state(relay.port());

        let response = TestServer::new(router(state))?
            .post("/")
            .json(&body())
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "Failed at sending email");

        Ok(())
    }
}
