//! Application state and wizard logic for the Triptest dashboard.
//!
//! [`App`] is the single owner of all wizard state: the current step, the
//! chosen mode, the form being edited, the frozen record, and the one
//! execution-outcome slot. [`App::update`] is the only place transitions
//! happen, which keeps the step ordering rules in one readable block.

use triptest_types::{
    BookingMode, Effect, ExecutionOutcome, FieldKind, FieldSpec, Msg, TestDataRecord, WizardStep,
    catalog::{DEFAULT_BROWSER, DEFAULT_TEST_TYPE, KEY_BROWSER, KEY_TEST_CASE_ID, KEY_TEST_TYPE},
    form_fields,
};

/// Number of status-log lines retained.
const LOG_CAP: usize = 100;

/// Editing state for the configure form.
///
/// One raw string per catalog field, in catalog order. Values are only
/// committed into a [`TestDataRecord`] (with kind-aware coercion) when the
/// form is submitted.
#[derive(Debug, Clone)]
pub struct FormState {
    pub specs: Vec<FieldSpec>,
    pub values: Vec<String>,
    pub selected: usize,
}

impl FormState {
    /// Form for a freshly selected mode, pre-filled with the generated
    /// test-case id and the execution-settings defaults.
    pub fn new(mode: BookingMode) -> Self {
        let specs = form_fields(mode);
        let values = specs
            .iter()
            .map(|spec| match spec.key.as_str() {
                KEY_TEST_CASE_ID => format!("{}-001", mode.case_id_prefix()),
                KEY_BROWSER => DEFAULT_BROWSER.to_string(),
                KEY_TEST_TYPE => DEFAULT_TEST_TYPE.to_string(),
                _ => String::new(),
            })
            .collect();
        Self {
            specs,
            values,
            selected: 0,
        }
    }

    pub fn selected_spec(&self) -> &FieldSpec {
        &self.specs[self.selected]
    }

    fn move_selection(&mut self, delta: isize) {
        let last = self.specs.len().saturating_sub(1);
        self.selected = if delta > 0 {
            self.selected.saturating_add(delta as usize).min(last)
        } else {
            self.selected.saturating_sub(delta.unsigned_abs())
        };
    }

    fn push_char(&mut self, c: char) {
        if self.selected_spec().kind != FieldKind::Select {
            self.values[self.selected].push(c);
        }
    }

    fn backspace(&mut self) {
        if self.selected_spec().kind != FieldKind::Select {
            self.values[self.selected].pop();
        }
    }

    /// Cycle a select field through its option list. Non-select fields
    /// ignore cycling.
    fn cycle(&mut self, delta: isize) {
        let spec = &self.specs[self.selected];
        if spec.kind != FieldKind::Select || spec.options.is_empty() {
            return;
        }
        let len = spec.options.len();
        let current = spec.options.iter().position(|o| *o == self.values[self.selected]);
        let next = match (current, delta > 0) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.values[self.selected] = spec.options[next].clone();
    }

    /// Commit the form into a record: seeded defaults, then every non-empty
    /// field written through the kind-aware setter.
    pub fn submit(&self, mode: BookingMode) -> TestDataRecord {
        let mut record = TestDataRecord::seeded(mode);
        for (spec, value) in self.specs.iter().zip(&self.values) {
            if !value.is_empty() {
                record.set(spec, value);
            }
        }
        record
    }
}

/// Central state container for the wizard.
pub struct App {
    /// Current wizard stage
    pub step: WizardStep,
    /// Mode chosen for this run; `None` only on the Select step
    pub mode: Option<BookingMode>,
    /// Selector cursor on the Select step
    pub mode_cursor: usize,
    /// Configure-form state; populated while a mode is active
    pub form: Option<FormState>,
    /// Record frozen at submit time, displayed through Execute and Results
    pub record: TestDataRecord,
    /// Outcome of the most recent execution attempt
    pub outcome: Option<ExecutionOutcome>,
    /// Whether an attempt is currently in flight (Run is ignored meanwhile)
    pub executing: bool,
    /// Animation frame for the execution spinner
    pub throbber_idx: usize,
    /// Scroll offset into the step-results table
    pub results_offset: usize,
    /// Status messages shown at the bottom of the screen
    pub logs: Vec<String>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let mut app = Self {
            step: WizardStep::Select,
            mode: None,
            mode_cursor: 0,
            form: None,
            record: TestDataRecord::default(),
            outcome: None,
            executing: false,
            throbber_idx: 0,
            results_offset: 0,
            logs: Vec::new(),
        };
        app.log("Welcome to Triptest".into());
        app
    }

    fn log(&mut self, line: String) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.logs.push(format!("[{stamp}] {line}"));
        if self.logs.len() > LOG_CAP {
            self.logs.drain(0..self.logs.len() - LOG_CAP);
        }
    }

    /// The report held by the outcome slot, when the last attempt succeeded.
    pub fn report(&self) -> Option<&triptest_types::TestReport> {
        match self.outcome.as_ref() {
            Some(ExecutionOutcome::Success(report)) => Some(report),
            _ => None,
        }
    }

    /// Process one message and return any side effects to perform.
    ///
    /// Messages that do not apply to the current step are ignored, which is
    /// what enforces the forward-only ordering: there is no code path that
    /// skips a stage.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Msg::Tick => {
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % 10;
                }
            }
            Msg::Resize(_, _) => {}

            Msg::ModeUp if self.step == WizardStep::Select => {
                self.mode_cursor = self.mode_cursor.saturating_sub(1);
            }
            Msg::ModeDown if self.step == WizardStep::Select => {
                self.mode_cursor = (self.mode_cursor + 1).min(BookingMode::ALL.len() - 1);
            }
            Msg::ModeChosen if self.step == WizardStep::Select => {
                let mode = BookingMode::ALL[self.mode_cursor];
                self.mode = Some(mode);
                self.form = Some(FormState::new(mode));
                self.step = WizardStep::Configure;
                self.log(format!("Configuring {} test", mode.title()));
            }

            Msg::FieldUp if self.step == WizardStep::Configure => {
                if let Some(form) = self.form.as_mut() {
                    form.move_selection(-1);
                }
            }
            Msg::FieldDown if self.step == WizardStep::Configure => {
                if let Some(form) = self.form.as_mut() {
                    form.move_selection(1);
                }
            }
            Msg::FieldChar(c) if self.step == WizardStep::Configure => {
                if let Some(form) = self.form.as_mut() {
                    form.push_char(c);
                }
            }
            Msg::FieldBackspace if self.step == WizardStep::Configure => {
                if let Some(form) = self.form.as_mut() {
                    form.backspace();
                }
            }
            Msg::FieldCycleLeft if self.step == WizardStep::Configure => {
                if let Some(form) = self.form.as_mut() {
                    form.cycle(-1);
                }
            }
            Msg::FieldCycleRight if self.step == WizardStep::Configure => {
                if let Some(form) = self.form.as_mut() {
                    form.cycle(1);
                }
            }
            Msg::SubmitForm if self.step == WizardStep::Configure => {
                if let (Some(mode), Some(form)) = (self.mode, self.form.as_ref()) {
                    self.record = form.submit(mode);
                    self.step = WizardStep::Execute;
                    self.outcome = None;
                    self.log(format!("Ready to execute {} test", mode.title()));
                }
            }

            Msg::BackToConfigure if self.step == WizardStep::Execute && !self.executing => {
                self.step = WizardStep::Configure;
                self.outcome = None;
            }
            Msg::Run if self.step == WizardStep::Execute && !self.executing => {
                if let Some(mode) = self.mode {
                    self.executing = true;
                    self.throbber_idx = 0;
                    self.outcome = None;
                    self.log(format!("Executing {} test...", mode.title()));
                    effects.push(Effect::ExecuteRequested {
                        mode,
                        record: self.record.clone(),
                    });
                }
            }
            Msg::ExecCompleted(outcome) if self.step == WizardStep::Execute => {
                self.executing = false;
                self.throbber_idx = 0;
                match outcome.as_ref() {
                    ExecutionOutcome::Success(report) => {
                        self.log(format!(
                            "Test {}: {} ({}/{} steps passed)",
                            report.test_id, report.status, report.passed_steps, report.total_steps
                        ));
                        self.step = WizardStep::Results;
                        self.results_offset = 0;
                    }
                    ExecutionOutcome::ApplicationFailure { message } => {
                        self.log(format!("Test execution failed: {message}"));
                    }
                    ExecutionOutcome::TransportError { message, .. } => {
                        self.log(format!("Could not reach automation service: {message}"));
                    }
                }
                self.outcome = Some(*outcome);
            }

            Msg::ResultsScroll(delta) if self.step == WizardStep::Results => {
                self.results_offset = if delta > 0 {
                    self.results_offset.saturating_add(delta as usize)
                } else {
                    self.results_offset.saturating_sub(delta.unsigned_abs())
                };
                let max = self.report().map(|r| r.step_results.len().saturating_sub(1)).unwrap_or(0);
                self.results_offset = self.results_offset.min(max);
            }

            Msg::NewTest => {
                if !self.executing {
                    self.mode = None;
                    self.mode_cursor = 0;
                    self.form = None;
                    self.record = TestDataRecord::default();
                    self.outcome = None;
                    self.results_offset = 0;
                    self.step = WizardStep::Select;
                }
            }

            // Message does not apply to the current step.
            _ => {}
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triptest_types::{StepResult, TestReport};

    fn type_into_selected(app: &mut App, text: &str) {
        for c in text.chars() {
            app.update(Msg::FieldChar(c));
        }
    }

    fn select_field(app: &mut App, key: &str) {
        let idx = app
            .form
            .as_ref()
            .expect("form active")
            .specs
            .iter()
            .position(|s| s.key == key)
            .expect("field exists");
        app.form.as_mut().unwrap().selected = idx;
    }

    fn app_at_execute(mode_cursor: usize) -> App {
        let mut app = App::new();
        for _ in 0..mode_cursor {
            app.update(Msg::ModeDown);
        }
        app.update(Msg::ModeChosen);
        app.update(Msg::SubmitForm);
        app
    }

    fn passed_report() -> TestReport {
        TestReport {
            test_id: "FLIGHT_FL-001_1719988201".into(),
            status: "passed".into(),
            total_steps: 6,
            passed_steps: 6,
            failed_steps: 0,
            execution_time: Some("0:00:45".into()),
            step_results: vec![StepResult {
                step_number: 1,
                element_name: "Browser".into(),
                action_type: "OPEN_BROWSER".into(),
                status: "passed".into(),
                ..StepResult::default()
            }],
        }
    }

    #[test]
    fn choosing_a_mode_advances_to_configure() {
        let mut app = App::new();
        assert_eq!(app.step, WizardStep::Select);

        app.update(Msg::ModeDown);
        app.update(Msg::ModeChosen);
        assert_eq!(app.step, WizardStep::Configure);
        assert_eq!(app.mode, Some(BookingMode::Bus));
        assert!(app.form.is_some());
    }

    #[test]
    fn steps_never_skip_forward() {
        let mut app = App::new();
        // Submit and Run do nothing from Select.
        app.update(Msg::SubmitForm);
        assert_eq!(app.step, WizardStep::Select);
        let effects = app.update(Msg::Run);
        assert!(effects.is_empty());
        assert_eq!(app.step, WizardStep::Select);
    }

    #[test]
    fn flight_scenario_reaches_results_with_the_report() {
        let mut app = App::new();
        app.update(Msg::ModeChosen); // cursor 0 = flight
        select_field(&mut app, "source");
        type_into_selected(&mut app, "New Delhi");
        select_field(&mut app, "destination");
        type_into_selected(&mut app, "Hyderabad");
        select_field(&mut app, "date");
        type_into_selected(&mut app, "2025-07-03");
        select_field(&mut app, "passengers");
        type_into_selected(&mut app, "1");
        app.update(Msg::SubmitForm);

        assert_eq!(app.step, WizardStep::Execute);
        assert_eq!(app.record.display("source"), "New Delhi");
        assert_eq!(app.record.display("destination"), "Hyderabad");
        assert_eq!(app.record.display("testCaseId"), "FL-001");
        assert_eq!(app.record.display("browserType"), "chrome");

        let effects = app.update(Msg::Run);
        assert_eq!(effects.len(), 1);
        assert!(app.executing);

        app.update(Msg::ExecCompleted(Box::new(ExecutionOutcome::Success(passed_report()))));
        assert_eq!(app.step, WizardStep::Results);
        assert!(!app.executing);
        assert_eq!(app.report().expect("report").passed_steps, 6);
    }

    #[test]
    fn application_failure_stays_on_execute_with_the_message() {
        let mut app = app_at_execute(0);
        app.update(Msg::Run);
        app.update(Msg::ExecCompleted(Box::new(ExecutionOutcome::ApplicationFailure {
            message: "element not found".into(),
        })));

        assert_eq!(app.step, WizardStep::Execute);
        assert_eq!(
            app.outcome,
            Some(ExecutionOutcome::ApplicationFailure {
                message: "element not found".into()
            })
        );
    }

    #[test]
    fn timeout_outcome_is_kept_with_its_flag() {
        let mut app = app_at_execute(0);
        app.update(Msg::Run);
        app.update(Msg::ExecCompleted(Box::new(ExecutionOutcome::TransportError {
            message: "execution timed out after 120s".into(),
            timeout: true,
        })));

        assert_eq!(app.step, WizardStep::Execute);
        match app.outcome.as_ref().expect("outcome stored") {
            ExecutionOutcome::TransportError { timeout, .. } => assert!(timeout),
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn run_is_ignored_while_an_attempt_is_outstanding() {
        let mut app = app_at_execute(0);
        let first = app.update(Msg::Run);
        assert_eq!(first.len(), 1);
        let second = app.update(Msg::Run);
        assert!(second.is_empty(), "second run must not start while executing");
        // Back is also blocked mid-flight.
        app.update(Msg::BackToConfigure);
        assert_eq!(app.step, WizardStep::Execute);
    }

    #[test]
    fn back_returns_to_configure_and_keeps_the_form() {
        let mut app = app_at_execute(1);
        app.update(Msg::BackToConfigure);
        assert_eq!(app.step, WizardStep::Configure);
        assert!(app.form.is_some());
        assert_eq!(app.mode, Some(BookingMode::Bus));
    }

    #[test]
    fn new_test_resets_everything() {
        let mut app = app_at_execute(2);
        app.update(Msg::Run);
        app.update(Msg::ExecCompleted(Box::new(ExecutionOutcome::Success(passed_report()))));
        assert_eq!(app.step, WizardStep::Results);

        app.update(Msg::NewTest);
        assert_eq!(app.step, WizardStep::Select);
        assert!(app.mode.is_none());
        assert!(app.form.is_none());
        assert!(app.outcome.is_none());
        assert!(app.record.is_empty());
    }

    #[test]
    fn select_fields_cycle_and_refuse_typed_input() {
        let mut app = App::new();
        app.update(Msg::ModeChosen); // flight
        select_field(&mut app, "travelClass");

        type_into_selected(&mut app, "abc");
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.values[form.selected], "", "typing must not touch a select field");

        app.update(Msg::FieldCycleRight);
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.values[form.selected], "Economy");

        app.update(Msg::FieldCycleLeft);
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.values[form.selected], "First Class");
    }

    #[test]
    fn untouched_optional_fields_stay_absent_from_the_record() {
        let app = app_at_execute(0);
        assert!(app.record.get("travelClass").is_none());
        assert!(app.record.get("returnDate").is_none());
        assert_eq!(app.record.display("testType"), "functional");
    }
}
