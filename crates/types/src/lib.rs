//! Shared type definitions for the Triptest dashboard.
//!
//! Everything here is pure data: the booking-mode and wizard-step enums, the
//! field catalog that drives form rendering, the mutable test-data record,
//! the result payload schema returned by the automation service, and the
//! message/effect types exchanged between the TUI state machine and its
//! runtime. No I/O happens in this crate.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod record;
pub mod report;

pub use catalog::{FieldKind, FieldSpec, execution_settings, fields_for, form_fields};
pub use record::{FieldValue, MergeError, TestDataRecord};
pub use report::{
    ExecuteRequest, ExecuteResponse, StepResult, TestCaseSummary, TestCasesResponse, TestReport,
};

/// The travel-product category under test.
///
/// Chosen once at the start of a wizard run and immutable until the next
/// reset; it selects the field catalog and is echoed into the request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingMode {
    Flight,
    Bus,
    Train,
    Hotel,
}

impl BookingMode {
    /// All modes in selector display order.
    pub const ALL: [BookingMode; 4] = [
        BookingMode::Flight,
        BookingMode::Bus,
        BookingMode::Train,
        BookingMode::Hotel,
    ];

    /// Lowercase wire name, matching the service's `mode` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            BookingMode::Flight => "flight",
            BookingMode::Bus => "bus",
            BookingMode::Train => "train",
            BookingMode::Hotel => "hotel",
        }
    }

    /// Capitalized name for titles and summaries.
    pub fn title(self) -> &'static str {
        match self {
            BookingMode::Flight => "Flight",
            BookingMode::Bus => "Bus",
            BookingMode::Train => "Train",
            BookingMode::Hotel => "Hotel",
        }
    }

    /// Two-letter prefix used when seeding a test-case identifier
    /// (e.g. `FL-001` for flights).
    pub fn case_id_prefix(self) -> &'static str {
        match self {
            BookingMode::Flight => "FL",
            BookingMode::Bus => "BU",
            BookingMode::Train => "TR",
            BookingMode::Hotel => "HO",
        }
    }

    /// One-line description shown next to the mode in the selector.
    pub fn blurb(self) -> &'static str {
        match self {
            BookingMode::Flight => "Search and book a flight itinerary",
            BookingMode::Bus => "Search and book an intercity bus seat",
            BookingMode::Train => "Search and book a rail journey",
            BookingMode::Hotel => "Search and book a hotel stay",
        }
    }
}

impl fmt::Display for BookingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingMode {
    type Err = ParseBookingModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flight" => Ok(BookingMode::Flight),
            "bus" => Ok(BookingMode::Bus),
            "train" => Ok(BookingMode::Train),
            "hotel" => Ok(BookingMode::Hotel),
            _ => Err(ParseBookingModeError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseBookingModeError;

impl fmt::Display for ParseBookingModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid booking mode; expected 'flight', 'bus', 'train', or 'hotel'")
    }
}

impl Error for ParseBookingModeError {}

/// The four wizard stages, strictly ordered.
///
/// The wizard only moves forward through these, except for the explicit
/// back action (Execute -> Configure) and a full reset to Select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Select,
    Configure,
    Execute,
    Results,
}

impl WizardStep {
    /// All steps in order, for the progress indicator.
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Select,
        WizardStep::Configure,
        WizardStep::Execute,
        WizardStep::Results,
    ];

    /// Zero-based position within the ordered sequence.
    pub fn index(self) -> usize {
        match self {
            WizardStep::Select => 0,
            WizardStep::Configure => 1,
            WizardStep::Execute => 2,
            WizardStep::Results => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Select => "Select",
            WizardStep::Configure => "Configure",
            WizardStep::Execute => "Execute",
            WizardStep::Results => "Results",
        }
    }
}

/// Classified result of exactly one execution attempt.
///
/// Produced once per attempt by the orchestrator and replaced wholesale on
/// the next attempt or on reset. Transport problems keep enough detail for
/// the UI to suggest the right remedy: a timeout points at the browser
/// driver, anything else at service availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    /// The service ran the test and returned a report.
    Success(TestReport),
    /// The service responded but the test could not run (e.g. unknown test
    /// case, element not found during setup).
    ApplicationFailure { message: String },
    /// The service never produced a usable response.
    TransportError { message: String, timeout: bool },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success(_))
    }
}

/// Messages that drive the wizard state machine.
///
/// Every user interaction and system event is expressed as one of these and
/// routed through `App::update`.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Move the mode selector cursor up
    ModeUp,
    /// Move the mode selector cursor down
    ModeDown,
    /// Choose the highlighted mode and advance to Configure
    ModeChosen,
    /// Move to the previous form field
    FieldUp,
    /// Move to the next form field
    FieldDown,
    /// Append a character to the focused field
    FieldChar(char),
    /// Remove the last character of the focused field
    FieldBackspace,
    /// Cycle a select field to the previous option
    FieldCycleLeft,
    /// Cycle a select field to the next option
    FieldCycleRight,
    /// Freeze the record and advance to Execute
    SubmitForm,
    /// Return from Execute to Configure
    BackToConfigure,
    /// Start an execution attempt
    Run,
    /// Discard mode, record, and outcome; return to Select
    NewTest,
    /// Scroll the step-results table by the given offset
    ResultsScroll(isize),
    /// Periodic UI tick (spinner animation)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background execution finished with a classified outcome
    ExecCompleted(Box<ExecutionOutcome>),
}

/// Side effects requested by state updates.
///
/// State management stays pure; the runtime translates these into spawned
/// tasks. Executing a test is the only effect the wizard needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run one execution attempt against the automation service.
    ExecuteRequested {
        mode: BookingMode,
        record: TestDataRecord,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_mode_wire_names_round_trip() {
        for mode in BookingMode::ALL {
            let parsed: BookingMode = mode.as_str().parse().expect("parse mode");
            assert_eq!(parsed, mode);
            let json = serde_json::to_string(&mode).expect("serialize mode");
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
        assert!("cruise".parse::<BookingMode>().is_err());
    }

    #[test]
    fn wizard_steps_are_strictly_ordered() {
        let mut last = None;
        for step in WizardStep::ALL {
            if let Some(prev) = last {
                assert!(step.index() > prev, "steps must ascend");
            }
            last = Some(step.index());
        }
        assert_eq!(WizardStep::default(), WizardStep::Select);
    }

    #[test]
    fn outcome_success_flag() {
        let ok = ExecutionOutcome::Success(TestReport::default());
        let err = ExecutionOutcome::TransportError {
            message: "boom".into(),
            timeout: false,
        };
        assert!(ok.is_success());
        assert!(!err.is_success());
    }
}
