//! The mutable test-data record accumulated by the configure form.

use std::{error::Error, fmt};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    BookingMode,
    catalog::{self, FieldKind, FieldSpec, KEY_BROWSER, KEY_MODE, KEY_TEST_CASE_ID, KEY_TEST_TYPE},
};

/// A single typed field value.
///
/// Untagged on the wire, so the record serializes exactly like the original
/// request body: strings stay strings, counts stay integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl FieldValue {
    /// Rendered form of the value, as shown in the form and summary views.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

/// Ordered mapping from field key to value for the active mode.
///
/// Created with seeded defaults when a mode is selected, mutated one field at
/// a time while the configure step is active, then read-only for the rest of
/// the run. Keys only enter through the catalog-driven form or a validated
/// CLI merge, so every key corresponds to a [`FieldSpec`] or one of the fixed
/// execution-settings keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestDataRecord {
    values: IndexMap<String, FieldValue>,
}

impl TestDataRecord {
    /// Record seeded for a freshly selected mode: generated test-case id plus
    /// defaults for the execution-settings keys.
    pub fn seeded(mode: BookingMode) -> Self {
        let mut values = IndexMap::new();
        values.insert(
            KEY_TEST_CASE_ID.to_string(),
            FieldValue::Text(format!("{}-001", mode.case_id_prefix())),
        );
        values.insert(
            KEY_BROWSER.to_string(),
            FieldValue::Text(catalog::DEFAULT_BROWSER.to_string()),
        );
        values.insert(
            KEY_TEST_TYPE.to_string(),
            FieldValue::Text(catalog::DEFAULT_TEST_TYPE.to_string()),
        );
        Self { values }
    }

    /// Store raw form input for a field, coercing by the field's kind.
    ///
    /// Numeric fields never store the raw string: unparsable input becomes 0.
    /// Empty input removes the entry so optional fields stay absent.
    pub fn set(&mut self, spec: &FieldSpec, raw: &str) {
        if raw.is_empty() {
            self.values.shift_remove(&spec.key);
            return;
        }
        let value = match spec.kind {
            FieldKind::Number => FieldValue::Number(raw.trim().parse().unwrap_or(0)),
            _ => FieldValue::Text(raw.to_string()),
        };
        self.values.insert(spec.key.clone(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    /// Rendered value for a key, or the empty string when absent.
    pub fn display(&self, key: &str) -> String {
        self.get(key).map(FieldValue::display).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Duplicate the mode into the record, as the collaborator service
    /// expects it inside `testData` as well as at the top level.
    pub fn with_mode(mut self, mode: BookingMode) -> Self {
        self.values
            .insert(KEY_MODE.to_string(), FieldValue::Text(mode.as_str().to_string()));
        self
    }

    /// Merge a flat JSON object into the record, validating keys against the
    /// given specs. Used by the headless CLI path; unknown keys are rejected
    /// so a record can never hold a key the active mode does not define.
    pub fn merge_json(
        &mut self,
        object: &serde_json::Value,
        specs: &[FieldSpec],
    ) -> Result<(), MergeError> {
        let map = object.as_object().ok_or(MergeError::NotAnObject)?;

        for (key, value) in map {
            let spec = specs
                .iter()
                .find(|s| &s.key == key)
                .ok_or_else(|| MergeError::UnknownField(key.clone()))?;
            let raw = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                other => {
                    return Err(MergeError::UnsupportedValue {
                        key: key.clone(),
                        value: other.to_string(),
                    });
                }
            };
            self.set(spec, &raw);
        }
        Ok(())
    }
}

/// Why a JSON merge into a [`TestDataRecord`] was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    NotAnObject,
    UnknownField(String),
    UnsupportedValue { key: String, value: String },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::NotAnObject => f.write_str("test data must be a JSON object"),
            MergeError::UnknownField(key) => {
                write!(f, "unknown field '{key}' for this mode")
            }
            MergeError::UnsupportedValue { key, value } => {
                write!(f, "field '{key}' must be a string or number, got {value}")
            }
        }
    }
}

impl Error for MergeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::form_fields;

    fn spec(mode: BookingMode, key: &str) -> FieldSpec {
        form_fields(mode)
            .into_iter()
            .find(|f| f.key == key)
            .expect("field exists")
    }

    #[test]
    fn seeded_record_carries_defaults() {
        let record = TestDataRecord::seeded(BookingMode::Flight);
        assert_eq!(record.display(KEY_TEST_CASE_ID), "FL-001");
        assert_eq!(record.display(KEY_BROWSER), "chrome");
        assert_eq!(record.display(KEY_TEST_TYPE), "functional");
    }

    #[test]
    fn numeric_fields_coerce_garbage_to_zero() {
        let mut record = TestDataRecord::seeded(BookingMode::Flight);
        let passengers = spec(BookingMode::Flight, "passengers");

        record.set(&passengers, "two");
        assert_eq!(record.get("passengers"), Some(&FieldValue::Number(0)));

        record.set(&passengers, "3");
        assert_eq!(record.get("passengers"), Some(&FieldValue::Number(3)));
    }

    #[test]
    fn set_values_read_back_and_defaults_stay_untouched() {
        let mut record = TestDataRecord::seeded(BookingMode::Bus);
        record.set(&spec(BookingMode::Bus, "source"), "New Delhi");
        record.set(&spec(BookingMode::Bus, "destination"), "Hyderabad");

        assert_eq!(record.display("source"), "New Delhi");
        assert_eq!(record.display("destination"), "Hyderabad");
        assert_eq!(record.display(KEY_TEST_CASE_ID), "BU-001");
        assert_eq!(record.display(KEY_BROWSER), "chrome");
    }

    #[test]
    fn clearing_a_field_removes_the_entry() {
        let mut record = TestDataRecord::seeded(BookingMode::Train);
        let source = spec(BookingMode::Train, "source");
        record.set(&source, "Chennai");
        assert!(record.get("source").is_some());
        record.set(&source, "");
        assert!(record.get("source").is_none());
    }

    #[test]
    fn with_mode_duplicates_the_mode_key() {
        let record = TestDataRecord::seeded(BookingMode::Hotel).with_mode(BookingMode::Hotel);
        assert_eq!(record.display("mode"), "hotel");
    }

    #[test]
    fn record_serializes_as_a_flat_object() {
        let mut record = TestDataRecord::seeded(BookingMode::Flight);
        record.set(&spec(BookingMode::Flight, "passengers"), "1");
        let json = serde_json::to_value(&record).expect("serialize record");
        assert_eq!(json["testCaseId"], "FL-001");
        assert_eq!(json["passengers"], 1);
    }

    #[test]
    fn merge_json_rejects_unknown_keys() {
        let mut record = TestDataRecord::seeded(BookingMode::Bus);
        let specs = form_fields(BookingMode::Bus);

        let ok = serde_json::json!({"source": "Pune", "passengers": 2});
        record.merge_json(&ok, &specs).expect("valid merge");
        assert_eq!(record.get("passengers"), Some(&FieldValue::Number(2)));

        let bad = serde_json::json!({"rooms": 1});
        assert_eq!(
            record.merge_json(&bad, &specs),
            Err(MergeError::UnknownField("rooms".into()))
        );
    }

    #[test]
    fn merge_json_refuses_non_object_and_nested_values() {
        let mut record = TestDataRecord::seeded(BookingMode::Flight);
        let specs = form_fields(BookingMode::Flight);

        assert_eq!(
            record.merge_json(&serde_json::json!(["source"]), &specs),
            Err(MergeError::NotAnObject)
        );

        let nested = serde_json::json!({"source": {"city": "Pune"}});
        match record.merge_json(&nested, &specs) {
            Err(MergeError::UnsupportedValue { key, .. }) => assert_eq!(key, "source"),
            other => panic!("expected unsupported value, got {other:?}"),
        }
    }
}
