// File: ./src/model/recurrence.rs
use crate::model::item::DateValue;

/// Recurrence data carried by a series root. Rule expansion belongs to the
/// calendar engine; the views only record per-occurrence exceptions against a
/// working copy during batched deletions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecurrenceInfo {
    pub rule: Option<String>,
    pub exceptions: Vec<DateValue>,
}

impl RecurrenceInfo {
    pub fn with_rule(rule: &str) -> Self {
        Self {
            rule: Some(rule.to_string()),
            exceptions: Vec::new(),
        }
    }

    /// Records an exception removing the occurrence at the given recurrence
    /// id. Exceptions are kept sorted and deduplicated.
    pub fn remove_occurrence_at(&mut self, recurrence_id: DateValue) {
        self.exceptions.push(recurrence_id);
        self.exceptions.sort();
        self.exceptions.dedup();
    }

    pub fn has_exception_at(&self, recurrence_id: &DateValue) -> bool {
        self.exceptions.contains(recurrence_id)
    }
}
