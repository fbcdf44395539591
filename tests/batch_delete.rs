// File: tests/batch_delete.rs
mod common;

use calview::controller::ViewController;
use calview::model::{Calendar, ItemKind, Occurrence};
use calview::transactions::{SharedTransactionLog, TransactionKind, shared_log};
use common::{PromptReply, RecordingDialogHost, daily_series, event_at, read_only_calendar};
use std::sync::Arc;

fn make_controller(host: &Arc<RecordingDialogHost>) -> (ViewController, SharedTransactionLog) {
    let log = shared_log();
    (ViewController::new(Arc::clone(&log), host.clone()), log)
}

#[test]
fn three_occurrences_of_one_series_collapse_into_one_modify() {
    let host = RecordingDialogHost::new();
    let (controller, log) = make_controller(&host);

    let cal = Calendar::new("Home");
    let (parent, occurrences) = daily_series(&cal, "Standup", 3);

    controller.delete_occurrences(&occurrences, false, true);

    let log = log.lock().unwrap();
    assert_eq!(log.batch_depth(), 0);
    assert_eq!(log.undo_groups().len(), 1);
    let group = &log.undo_groups()[0];
    assert_eq!(group.len(), 1);

    let transaction = &group[0];
    assert_eq!(transaction.kind, TransactionKind::Modify);
    assert_eq!(transaction.old_item.as_ref().unwrap().uid, parent.uid);
    // The working copy carries one exception per deleted occurrence.
    let exceptions = &transaction.item.recurrence.as_ref().unwrap().exceptions;
    assert_eq!(exceptions.len(), 3);
    assert!(
        transaction
            .old_item
            .as_ref()
            .unwrap()
            .recurrence
            .as_ref()
            .unwrap()
            .exceptions
            .is_empty()
    );
}

#[test]
fn read_only_occurrences_are_silently_dropped() {
    let host = RecordingDialogHost::new();
    let (controller, log) = make_controller(&host);

    let cal = Calendar::new("Home");
    let frozen = read_only_calendar("Holidays");

    let occurrences = vec![
        Occurrence::from_item(event_at(&cal, "One", 7, 9)),
        Occurrence::from_item(event_at(&frozen, "Skip me", 7, 10)),
        Occurrence::from_item(event_at(&cal, "Two", 7, 11)),
    ];

    controller.delete_occurrences(&occurrences, false, true);

    let log = log.lock().unwrap();
    let deleted: Vec<&str> = log.undo_groups()[0]
        .iter()
        .map(|t| t.item.title.as_str())
        .collect();
    assert_eq!(deleted, vec!["One", "Two"]);
    assert!(log.undo_groups()[0]
        .iter()
        .all(|t| t.kind == TransactionKind::Delete));
}

#[test]
fn cancelled_single_occurrence_prompt_leaves_nothing_behind() {
    let host = RecordingDialogHost::new();
    host.script_prompt(PromptReply::Cancel);
    let (controller, log) = make_controller(&host);

    let cal = Calendar::new("Home");
    let (_, occurrences) = daily_series(&cal, "Standup", 1);

    controller.delete_occurrences(&occurrences, false, false);

    assert_eq!(host.prompt_calls(), 1);
    let log = log.lock().unwrap();
    assert_eq!(log.transaction_count(), 0);
    assert_eq!(log.undo_groups().len(), 0);
    // The batch scope still closed.
    assert_eq!(log.batch_depth(), 0);
}

#[test]
fn prompt_resolving_to_the_parent_deletes_the_series() {
    let host = RecordingDialogHost::new();
    host.script_prompt(PromptReply::ConfirmParent);
    let (controller, log) = make_controller(&host);

    let cal = Calendar::new("Home");
    let (parent, occurrences) = daily_series(&cal, "Standup", 1);

    controller.delete_occurrences(&occurrences, false, false);

    let log = log.lock().unwrap();
    assert_eq!(log.undo_groups().len(), 1);
    let transaction = &log.undo_groups()[0][0];
    assert_eq!(transaction.kind, TransactionKind::Delete);
    assert_eq!(transaction.item.uid, parent.uid);
    assert!(transaction.item.recurrence.is_some());
}

#[test]
fn use_parent_items_substitutes_the_series_without_prompting() {
    let host = RecordingDialogHost::new();
    let (controller, log) = make_controller(&host);

    let cal = Calendar::new("Home");
    let (parent, occurrences) = daily_series(&cal, "Standup", 1);

    controller.delete_occurrences(&occurrences, true, false);

    assert_eq!(host.prompt_calls(), 0);
    let log = log.lock().unwrap();
    let transaction = &log.undo_groups()[0][0];
    assert_eq!(transaction.kind, TransactionKind::Delete);
    assert_eq!(transaction.item.uid, parent.uid);
}

#[test]
fn multiple_selections_never_prompt() {
    let host = RecordingDialogHost::new();
    let (controller, _log) = make_controller(&host);

    let cal = Calendar::new("Home");
    let (_, occurrences) = daily_series(&cal, "Standup", 2);

    controller.delete_occurrences(&occurrences, false, false);
    assert_eq!(host.prompt_calls(), 0);
}

#[test]
fn mixed_deletion_stays_one_undo_group_with_deletes_before_series_modifies() {
    let host = RecordingDialogHost::new();
    let (controller, log) = make_controller(&host);

    let cal = Calendar::new("Home");
    let (_, mut occurrences) = daily_series(&cal, "Standup", 2);
    let plain = event_at(&cal, "One-off", 9, 15);
    occurrences.push(Occurrence::from_item(plain));

    controller.delete_occurrences(&occurrences, false, true);

    let log = log.lock().unwrap();
    assert_eq!(log.undo_groups().len(), 1);
    let group = &log.undo_groups()[0];
    assert_eq!(group.len(), 2);
    assert_eq!(group[0].kind, TransactionKind::Delete);
    assert_eq!(group[0].item.title, "One-off");
    assert_eq!(group[1].kind, TransactionKind::Modify);
    assert_eq!(
        group[1].item.recurrence.as_ref().unwrap().exceptions.len(),
        2
    );
}

#[test]
fn deletion_resolves_open_edit_dialogs_first() {
    let host = RecordingDialogHost::new();
    let (controller, log) = make_controller(&host);

    let cal = Calendar::new("Home");
    let (_, occurrences) = daily_series(&cal, "Standup", 1);

    // A dialog is editing the occurrence; its unsaved state must flow into
    // the deletion instead of being discarded.
    controller.create_pending_modification(occurrences[0].clone());
    let mut edited = occurrences[0].clone();
    if let ItemKind::Event(dates) = &mut edited.item.kind {
        dates.start = dates.end;
    }
    let from_dialog = edited.clone();
    host.last_handle()
        .unwrap()
        .set_finalizer(move || from_dialog.clone());

    controller.delete_occurrences(&occurrences, false, true);

    assert_eq!(controller.pending_count(), 0);
    let log = log.lock().unwrap();
    assert_eq!(log.undo_groups().len(), 1);
    assert_eq!(log.undo_groups()[0][0].kind, TransactionKind::Modify);
}
