// File: tests/common/mod.rs
// Shared fixtures for the controller tests: a scripted dialog host and item
// builders.
#![allow(dead_code)]

use calview::controller::PendingHandle;
use calview::dialog::{DialogHost, DialogOutcome, ItemWindow, PromptMode, PromptResult};
use calview::model::{Calendar, DateValue, Item, Occurrence, RecurrenceInfo};
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};

/// Scripted reply for the occurrence-vs-series prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptReply {
    ConfirmOccurrence,
    ConfirmParent,
    Cancel,
}

pub struct FocusWindow {
    pub focus_count: Mutex<u32>,
}

impl FocusWindow {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            focus_count: Mutex::new(0),
        })
    }

    pub fn focus_count(&self) -> u32 {
        *self.focus_count.lock().unwrap()
    }
}

impl ItemWindow for FocusWindow {
    fn focus(&self) {
        *self.focus_count.lock().unwrap() += 1;
    }
}

/// Dialog host that records every call and answers prompts from a script.
#[derive(Default)]
pub struct RecordingDialogHost {
    pub create_calls: Mutex<u32>,
    pub opened: Mutex<Vec<Occurrence>>,
    pub handles: Mutex<Vec<PendingHandle>>,
    pub window: Mutex<Option<Arc<FocusWindow>>>,
    pub prompt_calls: Mutex<u32>,
    pub prompt_reply: Mutex<Option<PromptReply>>,
}

impl RecordingDialogHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn create_calls(&self) -> u32 {
        *self.create_calls.lock().unwrap()
    }

    pub fn opened_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn last_opened(&self) -> Option<Occurrence> {
        self.opened.lock().unwrap().last().cloned()
    }

    pub fn last_handle(&self) -> Option<PendingHandle> {
        self.handles.lock().unwrap().last().cloned()
    }

    pub fn prompt_calls(&self) -> u32 {
        *self.prompt_calls.lock().unwrap()
    }

    pub fn script_prompt(&self, reply: PromptReply) {
        *self.prompt_reply.lock().unwrap() = Some(reply);
    }

    pub fn set_window(&self, window: Arc<FocusWindow>) {
        *self.window.lock().unwrap() = Some(window);
    }
}

impl DialogHost for RecordingDialogHost {
    fn create_event_with_dialog(
        &self,
        _calendar: Arc<Calendar>,
        _start: Option<DateValue>,
        _force_all_day: bool,
    ) {
        *self.create_calls.lock().unwrap() += 1;
    }

    fn modify_event_with_dialog(&self, occurrence: Occurrence, pending: PendingHandle) {
        self.opened.lock().unwrap().push(occurrence);
        self.handles.lock().unwrap().push(pending);
    }

    fn find_item_window(&self, _occurrence: &Occurrence) -> Option<Arc<dyn ItemWindow>> {
        self.window
            .lock()
            .unwrap()
            .clone()
            .map(|w| w as Arc<dyn ItemWindow>)
    }

    fn prompt_occurrence_modification(
        &self,
        item: &Occurrence,
        _allow_future: bool,
        _mode: PromptMode,
    ) -> PromptResult {
        *self.prompt_calls.lock().unwrap() += 1;
        let reply = self
            .prompt_reply
            .lock()
            .unwrap()
            .unwrap_or(PromptReply::ConfirmOccurrence);
        match reply {
            PromptReply::ConfirmOccurrence => PromptResult {
                item: item.clone(),
                has_future_item: true,
                confirmed: true,
            },
            PromptReply::ConfirmParent => PromptResult {
                item: item.to_parent_occurrence(),
                has_future_item: true,
                confirmed: true,
            },
            PromptReply::Cancel => PromptResult {
                item: item.clone(),
                has_future_item: false,
                confirmed: false,
            },
        }
    }
}

/// Keeps the host's outcome channel unused in tests that don't care.
pub fn saved(occurrence: &Occurrence) -> DialogOutcome {
    DialogOutcome::Saved(occurrence.clone())
}

// --- ITEM BUILDERS ---

pub fn read_only_calendar(name: &str) -> Arc<Calendar> {
    Arc::new(Calendar {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        color: None,
        read_only: true,
    })
}

pub fn event_at(calendar: &Arc<Calendar>, title: &str, day: u32, hour: u32) -> Item {
    let start = DateValue::Specific(Utc.with_ymd_and_hms(2026, 4, day, hour, 0, 0).unwrap());
    let end = DateValue::Specific(Utc.with_ymd_and_hms(2026, 4, day, hour + 1, 0, 0).unwrap());
    Item::new_event(Arc::clone(calendar), title, start, end)
}

/// A daily series root plus `count` of its occurrences.
pub fn daily_series(
    calendar: &Arc<Calendar>,
    title: &str,
    count: u32,
) -> (Item, Vec<Occurrence>) {
    let mut parent = event_at(calendar, title, 6, 9);
    parent.recurrence = Some(RecurrenceInfo::with_rule("FREQ=DAILY"));

    let occurrences = (0..count)
        .map(|i| occurrence_on_day(&parent, 6 + i))
        .collect();
    (parent, occurrences)
}

pub fn occurrence_on_day(parent: &Item, day: u32) -> Occurrence {
    let mut instance = parent.clone();
    instance.recurrence = None;
    instance.recurrence_id =
        Some(DateValue::Specific(Utc.with_ymd_and_hms(2026, 4, day, 9, 0, 0).unwrap()));
    Occurrence::of_series(instance, parent.clone())
}
