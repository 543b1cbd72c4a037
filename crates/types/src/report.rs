//! Wire types for the automation service and its result payload.
//!
//! The service is trusted only as far as the envelope shape: every report
//! field is defaulted so a sparse or partial payload renders as a defined
//! empty state instead of failing deserialization.

use serde::{Deserialize, Serialize};

use crate::{BookingMode, record::TestDataRecord};

/// Body of `POST /api/execute-test`.
///
/// The mode travels both at the top level and duplicated inside `test_data`,
/// which is how the collaborator service expects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub mode: BookingMode,
    #[serde(rename = "testData")]
    pub test_data: TestDataRecord,
}

impl ExecuteRequest {
    pub fn new(mode: BookingMode, record: TestDataRecord) -> Self {
        Self {
            mode,
            test_data: record.with_mode(mode),
        }
    }
}

/// Envelope returned by `POST /api/execute-test`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecuteResponse {
    pub success: bool,
    pub result: Option<TestReport>,
    pub error: Option<String>,
}

/// Step-level and aggregate results of one executed test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestReport {
    /// Service-generated run identifier (e.g. `FLIGHT_FL-001_1719988201`)
    pub test_id: String,
    /// Overall status string: "passed", "failed", or "error"
    pub status: String,
    pub total_steps: u32,
    pub passed_steps: u32,
    pub failed_steps: u32,
    /// Human-readable wall-clock duration as reported by the service
    pub execution_time: Option<String>,
    pub step_results: Vec<StepResult>,
}

impl TestReport {
    pub fn passed(&self) -> bool {
        self.status.eq_ignore_ascii_case("passed")
    }
}

/// One executed step within a test run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepResult {
    pub step_number: u32,
    pub element_name: String,
    pub action_type: String,
    /// Locator the service resolved for this step, when applicable
    pub xpath: Option<String>,
    /// Value the driver typed or selected, when applicable
    pub test_value: Option<String>,
    /// "passed" or "failed"
    pub status: String,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl StepResult {
    pub fn passed(&self) -> bool {
        self.status.eq_ignore_ascii_case("passed")
    }
}

/// Summary row from `GET /api/test-cases`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCaseSummary {
    pub test_case_id: String,
    pub booking_mode: String,
    pub step_count: u32,
}

/// Envelope returned by `GET /api/test-cases`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestCasesResponse {
    pub success: bool,
    pub test_cases: Vec<TestCaseSummary>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_report_deserializes() {
        let json = r#"{
            "test_id": "FLIGHT_FL-001_1719988201",
            "status": "passed",
            "total_steps": 6,
            "passed_steps": 6,
            "failed_steps": 0,
            "execution_time": "0:00:45",
            "step_results": [
                {
                    "step_number": 1,
                    "element_name": "Browser",
                    "action_type": "OPEN_BROWSER",
                    "test_value": "https://example.com/flights",
                    "status": "passed",
                    "message": "Successfully executed OPEN_BROWSER on Browser"
                }
            ]
        }"#;

        let report: TestReport = serde_json::from_str(json).expect("deserialize report");
        assert!(report.passed());
        assert_eq!(report.total_steps, 6);
        assert_eq!(report.step_results.len(), 1);
        assert!(report.step_results[0].passed());
        assert_eq!(report.step_results[0].xpath, None);
    }

    #[test]
    fn sparse_report_falls_back_to_defaults() {
        let report: TestReport = serde_json::from_str(r#"{"status": "failed"}"#).expect("deserialize");
        assert!(!report.passed());
        assert_eq!(report.test_id, "");
        assert_eq!(report.total_steps, 0);
        assert!(report.step_results.is_empty());
        assert!(report.execution_time.is_none());
    }

    #[test]
    fn execute_request_duplicates_the_mode() {
        let record = TestDataRecord::seeded(BookingMode::Flight);
        let request = ExecuteRequest::new(BookingMode::Flight, record);
        let json = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(json["mode"], "flight");
        assert_eq!(json["testData"]["mode"], "flight");
        assert_eq!(json["testData"]["testCaseId"], "FL-001");
    }

    #[test]
    fn empty_envelope_is_a_defined_state() {
        let resp: ExecuteResponse = serde_json::from_str("{}").expect("deserialize");
        assert!(!resp.success);
        assert!(resp.result.is_none());
        assert!(resp.error.is_none());
    }
}
