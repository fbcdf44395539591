// File: ./src/model/item.rs
use crate::model::recurrence::RecurrenceInfo;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use uuid::Uuid;

/// A calendar known to the views. Owned by the calendar engine; the views
/// hold shared references and only ever read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub read_only: bool,
}

impl Calendar {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            color: None,
            read_only: false,
        })
    }

    pub fn writable(&self) -> bool {
        !self.read_only
    }
}

// --- DATE TYPES ---

#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum DateValue {
    AllDay(NaiveDate),
    Specific(DateTime<Utc>),
}

impl DateValue {
    /// All-day values carry no time component.
    pub fn is_date(&self) -> bool {
        matches!(self, DateValue::AllDay(_))
    }

    /// Stable canonical form, used for identity hashing.
    fn canonical(&self) -> String {
        match self {
            DateValue::AllDay(d) => d.format("%Y%m%d").to_string(),
            DateValue::Specific(dt) => dt.format("%Y%m%dT%H%M%SZ").to_string(),
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// Identity hash of one calendar item instance. Derived from uid, owning
/// calendar and recurrence id only, so editing a title or moving a start time
/// never changes an item's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    fn of(uid: &str, calendar_id: &str, recurrence_id: Option<&DateValue>) -> Self {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        uid.hash(&mut hasher);
        calendar_id.hash(&mut hasher);
        if let Some(rid) = recurrence_id {
            rid.canonical().hash(&mut hasher);
        }
        ItemId(hasher.finish())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

// --- ITEMS ---

#[derive(Debug, Clone, PartialEq)]
pub struct EventDates {
    pub start: DateValue,
    pub end: DateValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodoDates {
    pub entry: Option<DateValue>,
    pub due: Option<DateValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Event(EventDates),
    Todo(TodoDates),
}

/// Snapshot of a single calendar item as handed over by the engine. For an
/// instance of a recurring series the `recurrence_id` is set; the series root
/// carries the `recurrence` info instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub uid: String,
    pub calendar: Arc<Calendar>,
    pub title: String,
    pub kind: ItemKind,
    pub recurrence_id: Option<DateValue>,
    pub recurrence: Option<RecurrenceInfo>,
}

impl Item {
    pub fn new_event(
        calendar: Arc<Calendar>,
        title: &str,
        start: DateValue,
        end: DateValue,
    ) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            calendar,
            title: title.to_string(),
            kind: ItemKind::Event(EventDates { start, end }),
            recurrence_id: None,
            recurrence: None,
        }
    }

    pub fn new_todo(
        calendar: Arc<Calendar>,
        title: &str,
        entry: Option<DateValue>,
        due: Option<DateValue>,
    ) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            calendar,
            title: title.to_string(),
            kind: ItemKind::Todo(TodoDates { entry, due }),
            recurrence_id: None,
            recurrence: None,
        }
    }

    pub fn hash_id(&self) -> ItemId {
        ItemId::of(&self.uid, &self.calendar.id, self.recurrence_id.as_ref())
    }

    pub fn is_event(&self) -> bool {
        matches!(self.kind, ItemKind::Event(_))
    }

    /// Applies a drag-style reschedule. Events take both times directly; a
    /// to-do only takes a time for a field it already has, so rescheduling
    /// never invents an entry or due date the item did not carry.
    pub fn apply_reschedule(&mut self, new_start: Option<DateValue>, new_end: Option<DateValue>) {
        match &mut self.kind {
            ItemKind::Event(dates) => {
                if let Some(start) = new_start {
                    dates.start = start;
                }
                if let Some(end) = new_end {
                    dates.end = end;
                }
            }
            ItemKind::Todo(dates) => {
                if let Some(start) = new_start
                    && dates.entry.is_some()
                {
                    dates.entry = Some(start);
                }
                if let Some(end) = new_end
                    && dates.due.is_some()
                {
                    dates.due = Some(end);
                }
            }
        }
    }
}

// --- OCCURRENCES ---

/// One instance of a (possibly recurring) calendar item. Every occurrence has
/// exactly one parent item; a non-recurring item is its own parent, which is
/// represented by an absent parent link.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub item: Item,
    parent: Option<Box<Item>>,
}

impl Occurrence {
    /// An item standing for itself (non-recurring, or the full series).
    pub fn from_item(item: Item) -> Self {
        Self { item, parent: None }
    }

    /// An instance of a recurring series with its series root.
    pub fn of_series(item: Item, parent: Item) -> Self {
        Self {
            item,
            parent: Some(Box::new(parent)),
        }
    }

    pub fn parent_item(&self) -> &Item {
        self.parent.as_deref().unwrap_or(&self.item)
    }

    pub fn hash_id(&self) -> ItemId {
        self.item.hash_id()
    }

    pub fn parent_hash_id(&self) -> ItemId {
        self.parent_item().hash_id()
    }

    /// True when this is an instance of a series rather than a root item.
    pub fn is_occurrence(&self) -> bool {
        self.hash_id() != self.parent_hash_id()
    }

    /// The parent item promoted to an occurrence of its own, as used when a
    /// whole series is targeted instead of one instance.
    pub fn to_parent_occurrence(&self) -> Occurrence {
        Occurrence::from_item(self.parent_item().clone())
    }
}
