// File: src/transactions.rs
//! Undo-grouped transaction recording for item mutations.
//!
//! The views never mutate engine data directly; every add/modify/delete goes
//! through a `TransactionLog` so the host can replay or undo it. A batch
//! scope groups everything recorded inside it into one undoable unit.

use crate::model::Item;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Add,
    Modify,
    Delete,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub item: Item,
    /// The pre-modification snapshot, present for `Modify`.
    pub old_item: Option<Item>,
}

#[derive(Debug, Default)]
pub struct TransactionLog {
    groups: Vec<Vec<Transaction>>,
    open: Vec<Transaction>,
    batch_depth: usize,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one transaction. Inside a batch scope the transaction joins
    /// the open group; outside it forms an undo group of its own.
    pub fn record(&mut self, kind: TransactionKind, item: Item, old_item: Option<Item>) {
        log::debug!("transaction {:?} for item {}", kind, item.hash_id());
        let transaction = Transaction {
            kind,
            item,
            old_item,
        };
        if self.batch_depth > 0 {
            self.open.push(transaction);
        } else {
            self.groups.push(vec![transaction]);
        }
    }

    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// Closes one nesting level; the open group is flushed when the
    /// outermost level closes. Empty batches leave no trace.
    pub fn end_batch(&mut self) {
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 && !self.open.is_empty() {
            let group = std::mem::take(&mut self.open);
            self.groups.push(group);
        }
    }

    pub fn batch_depth(&self) -> usize {
        self.batch_depth
    }

    /// Total number of recorded transactions, including any open batch.
    pub fn transaction_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum::<usize>() + self.open.len()
    }

    pub fn undo_groups(&self) -> &[Vec<Transaction>] {
        &self.groups
    }

    /// Removes and returns the most recent undo group.
    pub fn pop_undo_group(&mut self) -> Option<Vec<Transaction>> {
        self.groups.pop()
    }
}

/// Shared handle the controller and views record through.
pub type SharedTransactionLog = Arc<Mutex<TransactionLog>>;

pub fn shared_log() -> SharedTransactionLog {
    Arc::new(Mutex::new(TransactionLog::new()))
}

/// Scoped batch acquisition. Dropping the scope closes the batch on every
/// exit path, including early returns and loop aborts.
pub struct BatchScope {
    log: SharedTransactionLog,
}

impl BatchScope {
    pub fn open(log: &SharedTransactionLog) -> Self {
        if let Ok(mut log) = log.lock() {
            log.begin_batch();
        }
        Self {
            log: Arc::clone(log),
        }
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        if let Ok(mut log) = self.log.lock() {
            log.end_batch();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Calendar, DateValue, Item};
    use chrono::{TimeZone, Utc};

    fn event(title: &str) -> Item {
        let start = DateValue::Specific(Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap());
        let end = DateValue::Specific(Utc.with_ymd_and_hms(2026, 1, 5, 13, 0, 0).unwrap());
        Item::new_event(Calendar::new("Test"), title, start, end)
    }

    #[test]
    fn nested_batches_flush_one_group() {
        let log = shared_log();
        {
            let _outer = BatchScope::open(&log);
            log.lock()
                .unwrap()
                .record(TransactionKind::Add, event("a"), None);
            {
                let _inner = BatchScope::open(&log);
                log.lock()
                    .unwrap()
                    .record(TransactionKind::Add, event("b"), None);
            }
            assert_eq!(log.lock().unwrap().undo_groups().len(), 0);
        }
        let log = log.lock().unwrap();
        assert_eq!(log.batch_depth(), 0);
        assert_eq!(log.undo_groups().len(), 1);
        assert_eq!(log.undo_groups()[0].len(), 2);
    }

    #[test]
    fn unbatched_records_are_singleton_groups() {
        let log = shared_log();
        log.lock()
            .unwrap()
            .record(TransactionKind::Add, event("a"), None);
        log.lock()
            .unwrap()
            .record(TransactionKind::Delete, event("b"), None);

        let mut log = log.lock().unwrap();
        assert_eq!(log.undo_groups().len(), 2);
        let last = log.pop_undo_group().unwrap();
        assert_eq!(last[0].kind, TransactionKind::Delete);
        assert_eq!(log.undo_groups().len(), 1);
    }

    #[test]
    fn empty_batch_leaves_no_group() {
        let log = shared_log();
        {
            let _scope = BatchScope::open(&log);
        }
        assert_eq!(log.lock().unwrap().undo_groups().len(), 0);
    }
}
