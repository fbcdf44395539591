// File: tests/config_behavior.rs
use calview::config::Config;
use calview::context::{AppContext, TestContext};
use calview::views::{ViewDeck, ViewType};
use std::fs;

#[test]
fn missing_config_is_detected_explicitly() {
    let ctx = TestContext::new();
    let err = Config::load(&ctx).unwrap_err();
    assert!(Config::is_missing_config_error(&err));
}

#[test]
fn config_round_trips_through_disk() {
    let ctx = TestContext::new();

    let mut config = Config::default();
    config.default_view = ViewType::Month;
    config.workdays_only = true;
    config.confirm_occurrence_delete = false;
    config
        .category_colors
        .insert("errands".to_string(), "#00AA00".to_string());

    config.save(&ctx).unwrap();
    let loaded = Config::load(&ctx).unwrap();

    assert_eq!(loaded.default_view, ViewType::Month);
    assert!(loaded.workdays_only);
    assert!(!loaded.confirm_occurrence_delete);
    assert_eq!(
        loaded.category_colors.get("errands"),
        Some(&"#00AA00".to_string())
    );
}

#[test]
fn absent_fields_fall_back_to_defaults() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    fs::write(&path, "default_view = \"Day\"\n").unwrap();

    let config = Config::load(&ctx).unwrap();
    assert_eq!(config.default_view, ViewType::Day);
    assert!(config.confirm_occurrence_delete);
    assert!(config.midnight_refresh);
    assert_eq!(config.time_indicator_interval_secs, 60);
    assert!(!config.workdays_only);
}

#[test]
fn unparseable_config_reports_the_path() {
    let ctx = TestContext::new();
    let path = ctx.get_config_file_path().unwrap();
    fs::write(&path, "default_view = [not toml").unwrap();

    let err = Config::load(&ctx).unwrap_err();
    assert!(!Config::is_missing_config_error(&err));
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn config_seeds_the_deck_and_opens_the_default_view() {
    let mut config = Config::default();
    config.default_view = ViewType::Multiweek;
    config.tasks_in_view = true;
    config.rotated = true;

    let mut deck = ViewDeck::new();
    config.apply_to_deck(&mut deck);

    assert!(deck.is_active(ViewType::Multiweek));
    assert!(deck.current_view().unwrap().tasks_in_view);
    assert!(deck.view(ViewType::Day).rotated);
    assert!(deck.selected_day().is_some());
}
