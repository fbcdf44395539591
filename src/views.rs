// File: src/views.rs
//! View deck state: switching between the calendar views, per-view flags,
//! day selection propagation and navigation labels. The host renders the
//! actual widgets; this module owns the state transitions they reflect.

use crate::controller::ViewController;
use crate::dialog::{ItemFilter, ItemSource};
use crate::model::Occurrence;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::EnumIter;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, strum::Display,
)]
pub enum ViewType {
    Day,
    #[default]
    Week,
    Multiweek,
    Month,
}

impl ViewType {
    /// Day and week views can show a disjoint set of selected dates; the
    /// month-shaped views cannot.
    pub fn supports_disjoint_dates(&self) -> bool {
        matches!(self, ViewType::Day | ViewType::Week)
    }
}

/// State of one view panel.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub view_type: ViewType,
    pub rotated: bool,
    pub workdays_only: bool,
    pub tasks_in_view: bool,
    pub show_completed: bool,
    pub selected_day: Option<NaiveDate>,
    pub selection: Vec<Occurrence>,
    /// First and last day currently visible, set by the host on layout.
    pub range: Option<(NaiveDate, NaiveDate)>,
    refresh_serial: u64,
}

impl ViewState {
    fn new(view_type: ViewType) -> Self {
        Self {
            view_type,
            ..Self::default()
        }
    }

    pub fn go_to_day(&mut self, day: NaiveDate) {
        self.selected_day = Some(day);
        self.refresh();
    }

    pub fn set_selected_items(&mut self, items: Vec<Occurrence>) {
        self.selection = items;
    }

    /// Marks the view as needing a redraw; the host watches the serial.
    pub fn refresh(&mut self) {
        self.refresh_serial += 1;
    }

    pub fn refresh_serial(&self) -> u64 {
        self.refresh_serial
    }
}

/// Mini-month navigator state, kept in step with the active view.
#[derive(Debug, Clone, Default)]
pub struct Minimonth {
    pub selected_day: Option<NaiveDate>,
    /// First day of the month the mini-month should page to, for views that
    /// span more than one month.
    pub main_month: Option<NaiveDate>,
}

/// The deck of view panels. Exactly one view is active at a time once any
/// switch happened; a fresh deck has no active view yet.
#[derive(Debug, Clone)]
pub struct ViewDeck {
    views: Vec<ViewState>,
    selected: Option<usize>,
    pub minimonth: Minimonth,
}

impl Default for ViewDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewDeck {
    pub fn new() -> Self {
        use strum::IntoEnumIterator;
        Self {
            views: ViewType::iter().map(ViewState::new).collect(),
            selected: None,
            minimonth: Minimonth::default(),
        }
    }

    fn index_of(&self, view_type: ViewType) -> usize {
        self.views
            .iter()
            .position(|v| v.view_type == view_type)
            .unwrap_or(0)
    }

    pub fn current_view(&self) -> Option<&ViewState> {
        self.selected.map(|i| &self.views[i])
    }

    pub fn current_view_mut(&mut self) -> Option<&mut ViewState> {
        self.selected.map(|i| &mut self.views[i])
    }

    pub fn view(&self, view_type: ViewType) -> &ViewState {
        &self.views[self.index_of(view_type)]
    }

    pub fn view_mut(&mut self, view_type: ViewType) -> &mut ViewState {
        let index = self.index_of(view_type);
        &mut self.views[index]
    }

    /// Index of the active panel, used to keep the view tabs in step.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Checked state for the per-view menu command.
    pub fn is_active(&self, view_type: ViewType) -> bool {
        self.current_view().is_some_and(|v| v.view_type == view_type)
    }

    /// The view selected before (or during) this session, falling back to
    /// the week view when none was ever chosen.
    pub fn last_view(&self) -> ViewType {
        self.current_view()
            .map(|v| v.view_type)
            .unwrap_or(ViewType::Week)
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.current_view().and_then(|v| v.selected_day)
    }

    /// Switches to the given view, carrying the selected day and the item
    /// selection over from the previously active view. With no previous
    /// selection the target lands on today.
    pub fn switch_to(&mut self, view_type: ViewType) {
        let (day, selection) = match self.current_view() {
            Some(view) => (view.selected_day, view.selection.clone()),
            None => (None, Vec::new()),
        };
        let day = day.unwrap_or_else(|| Local::now().date_naive());

        let index = self.index_of(view_type);
        self.selected = Some(index);
        let view = &mut self.views[index];
        view.go_to_day(day);
        view.set_selected_items(selection);
    }

    /// Selects a day in both the active view and the mini-month.
    pub fn go_to_date(&mut self, day: NaiveDate) {
        self.minimonth.selected_day = Some(day);
        if let Some(view) = self.current_view_mut() {
            view.go_to_day(day);
        }
    }

    /// Propagates a day selected inside the active view to the mini-month.
    /// For views spanning several months the mini-month is paged to the main
    /// month, the one with the most visible days.
    pub fn on_day_select(&mut self, day: NaiveDate) {
        let mut main_month = None;
        if let Some(view) = self.current_view_mut() {
            view.selected_day = Some(day);
            if !view.view_type.supports_disjoint_dates()
                && let Some((start, end)) = view.range
            {
                main_month = Some(main_month_of_range(start, end));
            }
        }
        self.minimonth.selected_day = Some(day);
        self.minimonth.main_month = main_month;
    }

    fn set_all<F: FnMut(&mut ViewState)>(&mut self, mut apply: F) {
        for view in &mut self.views {
            apply(view);
        }
    }

    fn refresh_current(&mut self) {
        if let Some(view) = self.current_view_mut()
            && let Some(day) = view.selected_day
        {
            view.go_to_day(day);
        }
    }

    /// Flips the rotated (vertical/horizontal) orientation on every view.
    /// Orientation redraws on its own, so no refresh is requested.
    pub fn toggle_orientation(&mut self) -> bool {
        let value = !self.views[0].rotated;
        self.set_all(|v| v.rotated = value);
        value
    }

    pub fn toggle_workdays_only(&mut self) -> bool {
        let value = !self.views[0].workdays_only;
        self.set_all(|v| v.workdays_only = value);
        self.refresh_current();
        value
    }

    pub fn toggle_tasks_in_view(&mut self) -> bool {
        let value = !self.views[0].tasks_in_view;
        self.set_all(|v| v.tasks_in_view = value);
        self.refresh_current();
        value
    }

    pub fn toggle_show_completed(&mut self) -> bool {
        let value = !self.views[0].show_completed;
        self.set_all(|v| v.show_completed = value);
        self.refresh_current();
        value
    }
}

// --- LABELS ---

/// A label with per-view overrides: a label specific to the active view wins
/// over the general one.
#[derive(Debug, Clone, Default)]
pub struct LabelSet {
    pub all: String,
    pub per_view: HashMap<ViewType, String>,
}

impl LabelSet {
    pub fn new(all: &str) -> Self {
        Self {
            all: all.to_string(),
            per_view: HashMap::new(),
        }
    }

    pub fn with_view(mut self, view_type: ViewType, label: &str) -> Self {
        self.per_view.insert(view_type, label.to_string());
        self
    }

    pub fn resolve(&self, view_type: ViewType) -> &str {
        self.per_view.get(&view_type).unwrap_or(&self.all)
    }
}

/// Navigation bar text for the currently visible range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeLabel {
    /// Human-readable interval, also used as the window title fragment.
    pub interval: String,
    pub week: String,
    pub week_tooltip: String,
}

pub fn week_number(day: NaiveDate) -> u32 {
    day.iso_week().week()
}

/// Builds the navigation labels for a visible range. A single-day range
/// shows the date; anything longer shows the span. The week label collapses
/// when the range stays within one calendar week.
pub fn range_label(start: NaiveDate, end: NaiveDate) -> RangeLabel {
    let first_week = week_number(start);
    let second_week = week_number(end);

    let interval = if start == end {
        start.format("%B %-d, %Y").to_string()
    } else if start.year() == end.year() && start.month() == end.month() {
        format!(
            "{} {} - {}, {}",
            start.format("%B"),
            start.day(),
            end.day(),
            start.year()
        )
    } else {
        format!("{} - {}", start.format("%B %-d, %Y"), end.format("%B %-d, %Y"))
    };

    let (week, week_tooltip) = if first_week == second_week {
        (
            format!("CW: {}", first_week),
            format!("Calendar Week: {}", first_week),
        )
    } else {
        (
            format!("CWs: {}-{}", first_week, second_week),
            format!("Calendar Weeks: {} - {}", first_week, second_week),
        )
    };

    RangeLabel {
        interval,
        week,
        week_tooltip,
    }
}

// --- DATE RANGE HELPERS ---

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1).unwrap()
    }
}

fn last_day_of_month(day: NaiveDate) -> u32 {
    let first = day.with_day(1).unwrap();
    (first_of_next_month(first) - Duration::days(1)).day()
}

/// The first day of the month with the most visible days within the range.
/// Used to decide which month a multi-month view "mainly" shows.
pub fn main_month_of_range(start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let first_month = start.with_day(1).unwrap();
    let last_month = end.with_day(1).unwrap();

    let mut main = first_month;
    let mut max_visible = 0;
    let mut month = first_month;
    while month <= last_month {
        let visible = if month == first_month {
            last_day_of_month(start) - start.day() + 1
        } else if month == last_month {
            end.day()
        } else {
            last_day_of_month(month)
        };
        if visible > max_visible {
            main = month;
            max_visible = visible;
        }
        month = first_of_next_month(month);
    }
    main
}

// --- SELECTION GLUE ---

/// Deletes the items currently selected in the active view and clears the
/// selection.
pub fn delete_selected_events(deck: &mut ViewDeck, controller: &ViewController) {
    if let Some(view) = deck.current_view_mut() {
        let selected = std::mem::take(&mut view.selection);
        controller.delete_occurrences(&selected, false, false);
    }
}

/// Opens the edit dialog for the first item selected in the active view.
pub fn edit_selected_events(deck: &ViewDeck, controller: &ViewController) {
    if let Some(view) = deck.current_view()
        && let Some(first) = view.selection.first()
    {
        controller.modify_occurrence(first.clone(), None, None, None);
    }
}

/// Selects every item visible in the active view's range. The query end is
/// moved one day out so items spanning the boundary are included.
pub fn select_all_events(deck: &mut ViewDeck, source: &dyn ItemSource) {
    let Some(view) = deck.current_view_mut() else {
        return;
    };
    let Some((start, end)) = view.range else {
        return;
    };
    let filter = ItemFilter {
        include_todos: view.tasks_in_view,
        include_completed: view.show_completed,
    };
    view.selection = source.items_in_range(filter, start, end + Duration::days(1));
}
