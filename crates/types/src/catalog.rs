//! Static field catalog driving form rendering.
//!
//! Each booking mode maps to an ordered list of [`FieldSpec`]s; the configure
//! form renders exactly these, in this order, followed by the fixed
//! execution-settings fields. Nothing here is mutated at runtime.

use serde::{Deserialize, Serialize};

use crate::BookingMode;

/// Record key for the generated test-case identifier.
pub const KEY_TEST_CASE_ID: &str = "testCaseId";
/// Record key for the browser choice (execution setting).
pub const KEY_BROWSER: &str = "browserType";
/// Record key for the test-type choice (execution setting).
pub const KEY_TEST_TYPE: &str = "testType";
/// Record key under which the mode is duplicated into the request payload.
pub const KEY_MODE: &str = "mode";

/// Default browser used when no choice has been made.
pub const DEFAULT_BROWSER: &str = "chrome";
/// Default test type used when no choice has been made.
pub const DEFAULT_TEST_TYPE: &str = "functional";

/// Input widget kind for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Date,
    Number,
    Select,
}

/// Declarative definition of a single form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Record key, unique within a mode (e.g. "source", "travelClass")
    pub key: String,
    /// Display label
    pub label: String,
    /// Input widget kind
    pub kind: FieldKind,
    /// Ordered option list; only populated for `FieldKind::Select`
    #[serde(default)]
    pub options: Vec<String>,
    /// Example value shown while the field is empty
    #[serde(default)]
    pub placeholder: Option<String>,
    /// One-line help text
    #[serde(default)]
    pub description: Option<String>,
}

impl FieldSpec {
    fn text(key: &str, label: &str, placeholder: &str, description: &str) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Text,
            options: Vec::new(),
            placeholder: Some(placeholder.into()),
            description: Some(description.into()),
        }
    }

    fn date(key: &str, label: &str, description: &str) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Date,
            options: Vec::new(),
            placeholder: Some("YYYY-MM-DD".into()),
            description: Some(description.into()),
        }
    }

    fn number(key: &str, label: &str, placeholder: &str, description: &str) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Number,
            options: Vec::new(),
            placeholder: Some(placeholder.into()),
            description: Some(description.into()),
        }
    }

    fn select(key: &str, label: &str, options: &[&str], description: &str) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Select,
            options: options.iter().map(|s| (*s).into()).collect(),
            placeholder: None,
            description: Some(description.into()),
        }
    }
}

/// Mode-specific field list, always starting with the test-case identifier.
pub fn fields_for(mode: BookingMode) -> Vec<FieldSpec> {
    let mut fields = vec![FieldSpec::text(
        KEY_TEST_CASE_ID,
        "Test Case ID",
        &format!("{}-001", mode.case_id_prefix()),
        "Unique identifier for this test case",
    )];

    match mode {
        BookingMode::Flight => fields.extend([
            FieldSpec::text("source", "From (Departure City)", "New Delhi", "Enter departure city"),
            FieldSpec::text("destination", "To (Arrival City)", "Hyderabad", "Enter destination city"),
            FieldSpec::date("date", "Departure Date", "Select departure date"),
            FieldSpec::date("returnDate", "Return Date (Optional)", "Select return date for round trip"),
            FieldSpec::number("passengers", "Adults", "1", "Number of adult passengers"),
            FieldSpec::number("children", "Children", "0", "Number of children (2-11 years)"),
            FieldSpec::number("infants", "Infants", "0", "Number of infants (under 2 years)"),
            FieldSpec::select(
                "travelClass",
                "Travel Class",
                &["Economy", "Premium Economy", "Business", "First Class"],
                "Select travel class",
            ),
        ]),
        BookingMode::Hotel => fields.extend([
            FieldSpec::text("destination", "Hotel Location", "Hyderabad", "Enter city or hotel name"),
            FieldSpec::date("checkIn", "Check-in Date", "Select check-in date"),
            FieldSpec::date("checkOut", "Check-out Date", "Select check-out date"),
            FieldSpec::number("rooms", "Number of Rooms", "1", "Number of rooms required"),
            FieldSpec::number("passengers", "Adults", "2", "Number of adult guests"),
            FieldSpec::number("children", "Children", "0", "Number of children"),
        ]),
        BookingMode::Train => fields.extend([
            FieldSpec::text("source", "From Station", "New Delhi", "Enter departure station"),
            FieldSpec::text("destination", "To Station", "Hyderabad", "Enter destination station"),
            FieldSpec::date("date", "Journey Date", "Select journey date"),
            FieldSpec::select(
                "travelClass",
                "Class",
                &["Sleeper", "3A", "2A", "1A", "CC", "EC"],
                "Select travel class",
            ),
        ]),
        BookingMode::Bus => fields.extend([
            FieldSpec::text("source", "From City", "New Delhi", "Enter departure city"),
            FieldSpec::text("destination", "To City", "Hyderabad", "Enter destination city"),
            FieldSpec::date("date", "Journey Date", "Select journey date"),
            FieldSpec::number("passengers", "Passengers", "1", "Number of passengers"),
        ]),
    }

    fields
}

/// The fixed execution-settings fields appended after the mode-specific list.
pub fn execution_settings() -> Vec<FieldSpec> {
    vec![
        FieldSpec::select(
            KEY_TEST_TYPE,
            "Test Type",
            &["functional", "ui", "regression", "smoke"],
            "Category of test run recorded with the result",
        ),
        FieldSpec::select(
            KEY_BROWSER,
            "Browser",
            &["chrome", "firefox", "edge", "safari"],
            "Browser the automation driver will launch",
        ),
    ]
}

/// Full configure-form field list: catalog fields plus execution settings.
pub fn form_fields(mode: BookingMode) -> Vec<FieldSpec> {
    let mut fields = fields_for(mode);
    fields.extend(execution_settings());
    fields
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_mode_has_a_non_empty_catalog_with_unique_keys() {
        for mode in BookingMode::ALL {
            let fields = form_fields(mode);
            assert!(!fields.is_empty(), "{mode} catalog must not be empty");

            let mut seen = HashSet::new();
            for field in &fields {
                assert!(seen.insert(field.key.clone()), "duplicate key '{}' for {mode}", field.key);
            }
        }
    }

    #[test]
    fn catalog_starts_with_test_case_id() {
        for mode in BookingMode::ALL {
            assert_eq!(fields_for(mode)[0].key, KEY_TEST_CASE_ID);
        }
    }

    #[test]
    fn select_fields_carry_options_and_others_do_not() {
        for mode in BookingMode::ALL {
            for field in form_fields(mode) {
                if field.kind == FieldKind::Select {
                    assert!(!field.options.is_empty(), "select '{}' needs options", field.key);
                } else {
                    assert!(field.options.is_empty(), "'{}' must not carry options", field.key);
                }
            }
        }
    }

    #[test]
    fn execution_settings_cover_browser_and_test_type() {
        let keys: Vec<_> = execution_settings().into_iter().map(|f| f.key).collect();
        assert_eq!(keys, vec![KEY_TEST_TYPE.to_string(), KEY_BROWSER.to_string()]);
    }
}
