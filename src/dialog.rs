// File: src/dialog.rs
//! Collaborator surface for the host dialog subsystem.
//!
//! The controller never renders UI. Opening editors, focusing windows and
//! asking the occurrence-vs-series question all go through `DialogHost`;
//! hosts implement these traits on top of whatever widget toolkit they use.

use crate::controller::PendingHandle;
use crate::model::{Calendar, DateValue, Occurrence};
use chrono::NaiveDate;
use std::sync::Arc;

/// Outcome of an edit dialog session. Cancellation is a distinct outcome so
/// listeners can tell an abandoned edit from a dialog that never reported.
#[derive(Debug, Clone)]
pub enum DialogOutcome {
    Saved(Occurrence),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    Delete,
    Modify,
}

/// Reply from the occurrence-vs-series prompt: the resolved target (the
/// occurrence itself or its parent, per the user's choice), whether future
/// instances exist, and whether the user confirmed at all.
#[derive(Debug, Clone)]
pub struct PromptResult {
    pub item: Occurrence,
    pub has_future_item: bool,
    pub confirmed: bool,
}

/// An already-open editor window for some item.
pub trait ItemWindow: Send + Sync {
    fn focus(&self);
}

pub trait DialogHost: Send + Sync {
    /// Opens the event creation dialog.
    fn create_event_with_dialog(
        &self,
        calendar: Arc<Calendar>,
        start: Option<DateValue>,
        force_all_day: bool,
    );

    /// Opens an edit dialog for the occurrence. The handle lets the dialog
    /// register a finalizer for unsaved edits, dispose its tracking record,
    /// and report its outcome when it closes.
    fn modify_event_with_dialog(&self, occurrence: Occurrence, pending: PendingHandle);

    /// Returns a window that is already editing this occurrence, if any.
    fn find_item_window(&self, occurrence: &Occurrence) -> Option<Arc<dyn ItemWindow>>;

    /// Asks whether an operation targets the single occurrence or the whole
    /// series.
    fn prompt_occurrence_modification(
        &self,
        item: &Occurrence,
        allow_future: bool,
        mode: PromptMode,
    ) -> PromptResult;
}

/// Range filter for select-all queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemFilter {
    pub include_todos: bool,
    pub include_completed: bool,
}

/// Read access to the composite calendar, enough for selection queries.
pub trait ItemSource {
    fn items_in_range(&self, filter: ItemFilter, start: NaiveDate, end: NaiveDate)
    -> Vec<Occurrence>;
}
