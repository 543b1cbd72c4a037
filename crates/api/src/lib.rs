//! Automation service client.
//!
//! This crate owns every network interaction with the external test
//! automation service:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Discovering the service address from `TRIPTEST_API_BASE` and validating it
//! - The readiness probe issued before any execution request
//! - The execution request itself, bounded by a fixed timeout
//! - Classifying whatever happens into a single [`ExecutionOutcome`]
//!
//! The primary entry point is [`AutomationClient`]. Create one via
//! [`AutomationClient::from_env`], then drive one attempt with
//! [`AutomationClient::execute_test`]. Nothing in this crate retries; a retry
//! is a new user-initiated call.

use std::{env, time::Duration};

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, StatusCode, Url, header};
use thiserror::Error;
use tracing::debug;
use triptest_types::{
    BookingMode, ExecuteRequest, ExecuteResponse, ExecutionOutcome, TestCaseSummary,
    TestCasesResponse, TestDataRecord,
};

/// Default service address when `TRIPTEST_API_BASE` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
/// Environment variable overriding the service address.
pub const BASE_URL_ENV: &str = "TRIPTEST_API_BASE";

/// Ceiling for one execution request. The service drives a real browser, so
/// this is generous; past it the in-flight request is aborted.
pub const EXECUTE_TIMEOUT: Duration = Duration::from_secs(120);
/// Ceiling for the readiness probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Hostnames allowed to use plain HTTP; anything else must be HTTPS.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Everything that can go wrong between issuing a request and holding a
/// usable report. All variants are converted to an [`ExecutionOutcome`] at
/// the orchestrator boundary; none escape into the UI as panics.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("service unreachable: {0}")]
    ServiceUnreachable(String),
    #[error("execution timed out after {}s", .0.as_secs())]
    RequestTimeout(Duration),
    #[error("service returned {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("{0}")]
    Application(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<ExecError> for ExecutionOutcome {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Application(message) => ExecutionOutcome::ApplicationFailure { message },
            ExecError::RequestTimeout(_) => ExecutionOutcome::TransportError {
                message: err.to_string(),
                timeout: true,
            },
            other => ExecutionOutcome::TransportError {
                message: other.to_string(),
                timeout: false,
            },
        }
    }
}

/// Thin wrapper around a configured `reqwest::Client` for the automation
/// service. Holds the validated base URL and a consistent User-Agent.
#[derive(Debug, Clone)]
pub struct AutomationClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl AutomationClient {
    /// Construct a client from `TRIPTEST_API_BASE`, falling back to
    /// [`DEFAULT_BASE_URL`]. Non-localhost hosts must use HTTPS.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::with_base_url(base_url)
    }

    /// Construct a client against an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .build()
            .context("build http client")?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("triptest/0.1; {}", env::consts::OS),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Readiness probe: `GET {base}/`. Any error or non-success status means
    /// the service is unreachable and the execution request must not be sent.
    pub async fn probe(&self) -> Result<(), ExecError> {
        let url = format!("{}/", self.base_url.trim_end_matches('/'));
        debug!(%url, "readiness probe");

        let response = self
            .http
            .get(&url)
            .header(header::USER_AGENT, &self.user_agent)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| ExecError::ServiceUnreachable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ExecError::ServiceUnreachable(format!(
                "health endpoint returned {}",
                response.status()
            )))
        }
    }

    /// Drive exactly one execution attempt: probe, POST, classify.
    ///
    /// Ordering guarantee: the probe strictly precedes the execution request,
    /// and a failed probe short-circuits without issuing the POST.
    pub async fn execute_test(&self, mode: BookingMode, record: TestDataRecord) -> ExecutionOutcome {
        if let Err(err) = self.probe().await {
            return err.into();
        }
        match self.post_execute(mode, record).await {
            Ok(outcome) => outcome,
            Err(err) => err.into(),
        }
    }

    async fn post_execute(
        &self,
        mode: BookingMode,
        record: TestDataRecord,
    ) -> Result<ExecutionOutcome, ExecError> {
        let url = format!("{}/api/execute-test", self.base_url.trim_end_matches('/'));
        let request = ExecuteRequest::new(mode, record);
        debug!(%url, mode = %mode, "execution request");

        let response = self
            .http
            .post(&url)
            .header(header::USER_AGENT, &self.user_agent)
            .timeout(EXECUTE_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExecError::RequestTimeout(EXECUTE_TIMEOUT)
                } else {
                    ExecError::ServiceUnreachable(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ExecError::RequestTimeout(EXECUTE_TIMEOUT)
            } else {
                ExecError::MalformedResponse(e.to_string())
            }
        })?;

        Ok(classify_response(status, &body))
    }

    /// Fetch the server-side test-case inventory, optionally scoped to one
    /// mode. Used by the headless CLI, not by the wizard.
    pub async fn fetch_test_cases(
        &self,
        mode: Option<BookingMode>,
    ) -> Result<Vec<TestCaseSummary>, ExecError> {
        let mut url = format!("{}/api/test-cases", self.base_url.trim_end_matches('/'));
        if let Some(mode) = mode {
            url.push_str(&format!("?mode={mode}"));
        }

        let response = self
            .http
            .get(&url)
            .header(header::USER_AGENT, &self.user_agent)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| ExecError::ServiceUnreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExecError::MalformedResponse(e.to_string()))?;
        if !status.is_success() {
            return Err(ExecError::Http { status, body });
        }

        let parsed: TestCasesResponse =
            serde_json::from_str(&body).map_err(|e| ExecError::MalformedResponse(e.to_string()))?;
        if parsed.success {
            Ok(parsed.test_cases)
        } else {
            Err(ExecError::Application(
                parsed.error.unwrap_or_else(|| "test case listing failed".into()),
            ))
        }
    }
}

/// Classify a transport-complete execution response into an outcome.
///
/// Kept free of I/O so the decision table is unit-testable:
/// - non-2xx status: transport error carrying the body text
/// - 2xx with unparsable JSON: transport error (malformed response)
/// - `success: true` with a report: success
/// - `success: true` without a report: malformed response
/// - `success: false`: application failure with the service's message
pub fn classify_response(status: StatusCode, body: &str) -> ExecutionOutcome {
    if !status.is_success() {
        let message = if body.trim().is_empty() {
            format!("service returned {status}")
        } else {
            body.trim().to_string()
        };
        return ExecutionOutcome::TransportError { message, timeout: false };
    }

    let parsed: ExecuteResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            return ExecError::MalformedResponse(err.to_string()).into();
        }
    };

    if parsed.success {
        match parsed.result {
            Some(report) => ExecutionOutcome::Success(report),
            None => ExecError::MalformedResponse("success without a result payload".into()).into(),
        }
    } else {
        ExecutionOutcome::ApplicationFailure {
            message: parsed.error.unwrap_or_else(|| "test execution failed".into()),
        }
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS and the URL must include a host
fn validate_base_url(base: &str) -> Result<()> {
    let parsed = Url::parse(base).map_err(|e| anyhow!("invalid {BASE_URL_ENV} URL '{base}': {e}"))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("{BASE_URL_ENV} must include a host"))?;

    if LOCALHOST_DOMAINS.iter().any(|&allowed| host.eq_ignore_ascii_case(allowed)) {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        return Err(anyhow!(
            "{BASE_URL_ENV} must use https for non-localhost hosts; got '{}://'",
            parsed.scheme()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_payload_classifies_as_success() {
        let body = r#"{
            "success": true,
            "result": {
                "test_id": "FLIGHT_FL-001_1719988201",
                "status": "passed",
                "total_steps": 6,
                "passed_steps": 6,
                "failed_steps": 0,
                "step_results": []
            }
        }"#;
        match classify_response(StatusCode::OK, body) {
            ExecutionOutcome::Success(report) => {
                assert!(report.passed());
                assert_eq!(report.total_steps, 6);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn application_failure_keeps_the_message_verbatim() {
        let body = r#"{"success": false, "error": "element not found"}"#;
        assert_eq!(
            classify_response(StatusCode::OK, body),
            ExecutionOutcome::ApplicationFailure {
                message: "element not found".into()
            }
        );
    }

    #[test]
    fn application_failure_without_error_gets_a_generic_message() {
        let body = r#"{"success": false}"#;
        match classify_response(StatusCode::NOT_FOUND, body) {
            // non-2xx wins over the envelope
            ExecutionOutcome::TransportError { timeout, .. } => assert!(!timeout),
            other => panic!("expected transport error, got {other:?}"),
        }
        match classify_response(StatusCode::OK, body) {
            ExecutionOutcome::ApplicationFailure { message } => {
                assert_eq!(message, "test execution failed");
            }
            other => panic!("expected application failure, got {other:?}"),
        }
    }

    #[test]
    fn non_success_status_surfaces_the_body() {
        match classify_response(StatusCode::INTERNAL_SERVER_ERROR, "driver crashed") {
            ExecutionOutcome::TransportError { message, timeout } => {
                assert_eq!(message, "driver crashed");
                assert!(!timeout);
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn garbage_body_is_a_malformed_response() {
        match classify_response(StatusCode::OK, "<html>proxy error</html>") {
            ExecutionOutcome::TransportError { message, timeout } => {
                assert!(message.starts_with("malformed response"), "got: {message}");
                assert!(!timeout);
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn success_without_result_is_malformed() {
        match classify_response(StatusCode::OK, r#"{"success": true}"#) {
            ExecutionOutcome::TransportError { message, .. } => {
                assert!(message.contains("without a result payload"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn timeout_error_maps_to_a_timeout_outcome() {
        let outcome: ExecutionOutcome = ExecError::RequestTimeout(EXECUTE_TIMEOUT).into();
        match outcome {
            ExecutionOutcome::TransportError { message, timeout } => {
                assert!(timeout);
                assert!(message.contains("120"));
            }
            other => panic!("expected timeout transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn probe_reports_an_unreachable_service() {
        // Port 1 is never listening, so the connection is refused outright.
        let client = AutomationClient::with_base_url("http://127.0.0.1:1").expect("valid base url");
        match client.probe().await {
            Err(ExecError::ServiceUnreachable(_)) => {}
            other => panic!("expected service unreachable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_probe_short_circuits_the_execution_attempt() {
        let client = AutomationClient::with_base_url("http://127.0.0.1:1").expect("valid base url");
        let record = TestDataRecord::seeded(BookingMode::Flight);
        match client.execute_test(BookingMode::Flight, record).await {
            ExecutionOutcome::TransportError { message, timeout } => {
                assert!(message.starts_with("service unreachable"), "got: {message}");
                assert!(!timeout);
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn base_url_rules() {
        assert!(validate_base_url("http://localhost:5000").is_ok());
        assert!(validate_base_url("http://127.0.0.1:5000").is_ok());
        assert!(validate_base_url("https://automation.example.com").is_ok());
        assert!(validate_base_url("http://automation.example.com").is_err());
        assert!(validate_base_url("not a url").is_err());
    }
}
