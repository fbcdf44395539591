// File: src/controller.rs
//! Central view controller for occurrence operations.
//! This is the single source of truth for what happens when the user creates,
//! edits or deletes items from any calendar view. All views (grid, list,
//! drag-and-drop handlers, keyboard shortcuts) must delegate here so that
//! open edit dialogs, recurring series and the undo log stay consistent.
use crate::dialog::{DialogHost, DialogOutcome, PromptMode};
use crate::model::{Calendar, DateValue, Item, ItemId, Occurrence, identity_overlaps};
use crate::transactions::{BatchScope, SharedTransactionLog, TransactionKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Title given to events created without going through the dialog.
pub const NEW_EVENT_TITLE: &str = "New event";

/// Notifications published for the host event loop.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// An edit dialog closed. `occurrence` is the item the dialog was opened
    /// on; the outcome says whether the user saved or cancelled.
    DialogClosed {
        occurrence: Occurrence,
        outcome: DialogOutcome,
    },
}

type FinalizeFn = Box<dyn FnMut() -> Occurrence + Send>;

/// One in-flight edit session. Created when a modification dialog opens and
/// removed when the tracker finalizes it or the dialog disposes it.
struct PendingModification {
    id: u64,
    item: Occurrence,
    finalize: Arc<Mutex<Option<FinalizeFn>>>,
}

type PendingList = Arc<Mutex<Vec<PendingModification>>>;

/// Handle passed to the dialog subsystem for one pending modification.
/// Cloneable so the dialog can hand it to its own close handlers.
#[derive(Clone)]
pub struct PendingHandle {
    id: u64,
    item: Occurrence,
    finalize: Arc<Mutex<Option<FinalizeFn>>>,
    jobs: PendingList,
    events: Option<mpsc::UnboundedSender<ControllerEvent>>,
}

impl PendingHandle {
    /// Registers the callback the tracker will use to pull unsaved edits out
    /// of the open dialog. The callback returns the (possibly modified)
    /// occurrence the dialog currently holds.
    pub fn set_finalizer(&self, finalize: impl FnMut() -> Occurrence + Send + 'static) {
        if let Ok(mut slot) = self.finalize.lock() {
            *slot = Some(Box::new(finalize));
        }
    }

    /// Removes the tracking record. Idempotent: disposing a record that was
    /// already finalized or disposed does nothing.
    pub fn dispose(&self) {
        if let Ok(mut jobs) = self.jobs.lock()
            && let Some(pos) = jobs.iter().position(|job| job.id == self.id)
        {
            jobs.remove(pos);
        }
    }

    /// Reports the dialog's outcome: disposes the record and publishes a
    /// `DialogClosed` event. A cancelled dialog reports `Cancelled` rather
    /// than staying silent.
    pub fn complete(self, outcome: DialogOutcome) {
        self.dispose();
        if let Some(events) = &self.events {
            let _ = events.send(ControllerEvent::DialogClosed {
                occurrence: self.item.clone(),
                outcome,
            });
        }
    }
}

/// Controller for the views.
pub struct ViewController {
    pub transactions: SharedTransactionLog,
    pub dialogs: Arc<dyn DialogHost>,
    pending: PendingList,
    next_pending_id: AtomicU64,
    selected_calendar: Mutex<Option<Arc<Calendar>>>,
    events: Option<mpsc::UnboundedSender<ControllerEvent>>,
}

impl ViewController {
    pub fn new(transactions: SharedTransactionLog, dialogs: Arc<dyn DialogHost>) -> Self {
        Self {
            transactions,
            dialogs,
            pending: Arc::new(Mutex::new(Vec::new())),
            next_pending_id: AtomicU64::new(1),
            selected_calendar: Mutex::new(None),
            events: None,
        }
    }

    /// Routes `ControllerEvent`s to the host event loop.
    pub fn with_event_sink(mut self, events: mpsc::UnboundedSender<ControllerEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn set_selected_calendar(&self, calendar: Option<Arc<Calendar>>) {
        if let Ok(mut selected) = self.selected_calendar.lock() {
            *selected = calendar;
        }
    }

    pub fn selected_calendar(&self) -> Option<Arc<Calendar>> {
        self.selected_calendar.lock().ok().and_then(|s| s.clone())
    }

    /// Number of edit sessions currently tracked.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|jobs| jobs.len()).unwrap_or(0)
    }

    fn record(&self, kind: TransactionKind, item: Item, old_item: Option<Item>) {
        if let Ok(mut log) = self.transactions.lock() {
            log.record(kind, item, old_item);
        }
    }

    /// Creates a new event. When both times are given as specific instants
    /// the dialog is skipped and a default-titled event is committed
    /// directly; otherwise the creation dialog opens.
    pub fn create_new_event(
        &self,
        calendar: Option<Arc<Calendar>>,
        start: Option<DateValue>,
        end: Option<DateValue>,
        force_all_day: bool,
    ) {
        let Some(calendar) = calendar.or_else(|| self.selected_calendar()) else {
            log::warn!("event creation requested with no calendar selected");
            return;
        };

        if let (Some(start), Some(end)) = (start, end)
            && !start.is_date()
            && !end.is_date()
        {
            let item = Item::new_event(calendar, NEW_EVENT_TITLE, start, end);
            self.record(TransactionKind::Add, item, None);
        } else {
            self.dialogs
                .create_event_with_dialog(calendar, start, force_all_day);
        }
    }

    /// Starts a modification dialog for the occurrence, recording the edit
    /// session so it can be terminated later if need should be. Any session
    /// already covering this target is finalized first so an open dialog's
    /// outstanding changes are saved, not lost.
    pub fn create_pending_modification(&self, occurrence: Occurrence) {
        let occurrence = self.finalize_pending_modification(occurrence);

        let id = self.next_pending_id.fetch_add(1, Ordering::Relaxed);
        let finalize: Arc<Mutex<Option<FinalizeFn>>> = Arc::new(Mutex::new(None));
        if let Ok(mut jobs) = self.pending.lock() {
            jobs.push(PendingModification {
                id,
                item: occurrence.clone(),
                finalize: Arc::clone(&finalize),
            });
        }

        let handle = PendingHandle {
            id,
            item: occurrence.clone(),
            finalize,
            jobs: Arc::clone(&self.pending),
            events: self.events.clone(),
        };
        self.dialogs.modify_event_with_dialog(occurrence, handle);
    }

    /// Scans the edit sessions for one whose item overlaps the given
    /// occurrence. On a match the record is taken out of the list and its
    /// finalizer invoked; the returned occurrence carries the dialog's
    /// unsaved edits. Without a match the input comes back unchanged.
    pub fn finalize_pending_modification(&self, occurrence: Occurrence) -> Occurrence {
        let matched = {
            let Ok(mut jobs) = self.pending.lock() else {
                return occurrence;
            };
            let position = jobs
                .iter()
                .position(|job| identity_overlaps(&job.item, &occurrence));
            position.map(|pos| jobs.remove(pos))
        };

        // The finalizer runs outside the list lock: a dialog shutting down
        // may call dispose() re-entrantly.
        if let Some(job) = matched
            && let Ok(mut slot) = job.finalize.lock()
            && let Some(mut finalize) = slot.take()
        {
            return finalize();
        }
        occurrence
    }

    /// Modifies the given occurrence. An already-open editor is focused
    /// instead of being doubled; a direct modification (e.g. the item was
    /// dragged to a new time) commits in place; with nothing to apply the
    /// edit dialog takes over.
    pub fn modify_occurrence(
        &self,
        occurrence: Occurrence,
        new_start: Option<DateValue>,
        new_end: Option<DateValue>,
        new_title: Option<&str>,
    ) {
        if let Some(window) = self.dialogs.find_item_window(&occurrence) {
            window.focus();
            return;
        }

        let occurrence = self.finalize_pending_modification(occurrence);

        if new_start.is_some() || new_end.is_some() || new_title.is_some() {
            let mut instance = occurrence.item.clone();
            if let Some(title) = new_title {
                instance.title = title.to_string();
            }
            if new_start.is_some() || new_end.is_some() {
                instance.apply_reschedule(new_start, new_end);
            }
            self.record(TransactionKind::Modify, instance, Some(occurrence.item));
        } else {
            self.create_pending_modification(occurrence);
        }
    }

    /// Deletes the given occurrences as one undoable unit. Multiple
    /// occurrences of the same series collapse into a single modify of the
    /// series root; removing them one by one would invalidate the identity
    /// hashes the later iterations still rely on.
    pub fn delete_occurrences(
        &self,
        occurrences: &[Occurrence],
        use_parent_items: bool,
        do_not_confirm: bool,
    ) {
        let _batch = BatchScope::open(&self.transactions);

        struct SavedItem {
            old_item: Item,
            new_item: Item,
        }
        let mut recurring_items: HashMap<ItemId, SavedItem> = HashMap::new();

        // Work on an owned copy: a view reacting to the per-item transactions
        // must not pull elements out from under the iteration. Read-only
        // calendars are dropped here so the single-item confirmation check
        // below also holds when all but one of the selection is read-only.
        let writable: Vec<Occurrence> = occurrences
            .iter()
            .filter(|o| o.item.calendar.writable())
            .cloned()
            .collect();
        if writable.len() < occurrences.len() {
            log::debug!(
                "skipping {} occurrence(s) on read-only calendars",
                occurrences.len() - writable.len()
            );
        }

        for occurrence in &writable {
            let mut item_to_delete = occurrence.clone();
            if use_parent_items {
                // Whole-series deletion; no per-occurrence question to ask.
                item_to_delete = occurrence.to_parent_occurrence();
            } else if !do_not_confirm && writable.len() == 1 {
                // Only consult the user for a single selected occurrence;
                // otherwise they would face one prompt per occurrence.
                let reply = self.dialogs.prompt_occurrence_modification(
                    &item_to_delete,
                    false,
                    PromptMode::Delete,
                );
                if !reply.confirmed {
                    break;
                }
                item_to_delete = reply.item;
            }

            let resolved = self.finalize_pending_modification(item_to_delete);
            if resolved.is_occurrence() {
                if let Some(rid) = resolved.item.recurrence_id {
                    let saved = recurring_items
                        .entry(resolved.parent_hash_id())
                        .or_insert_with(|| SavedItem {
                            old_item: resolved.parent_item().clone(),
                            new_item: resolved.parent_item().clone(),
                        });
                    if let Some(recurrence) = saved.new_item.recurrence.as_mut() {
                        recurrence.remove_occurrence_at(rid);
                    }
                    // The modify is held back until the loop is done; this
                    // series may lose more occurrences in the same batch.
                } else {
                    log::warn!(
                        "occurrence {} has no recurrence id; not deleted",
                        resolved.hash_id()
                    );
                }
            } else {
                self.record(TransactionKind::Delete, resolved.item, None);
            }
        }

        for saved in recurring_items.into_values() {
            self.record(TransactionKind::Modify, saved.new_item, Some(saved.old_item));
        }
    }
}
