// File: src/storage.rs
//! Locked, atomic persistence for the small state files this crate keeps.
//!
//! Calendar item data never lands here; only the view selection that should
//! survive a restart, plus the locking/atomic-write primitives the config
//! module shares.

use crate::context::AppContext;
use crate::views::{ViewDeck, ViewType};
use anyhow::Result;
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub struct LocalStorage;

impl LocalStorage {
    /// Helper to get a sidecar lock file path
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        FileExt::unlock(&file)?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }
}

/// View selection persisted across sessions, so the deck can reopen on the
/// view and day the user last looked at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedViewState {
    #[serde(default)]
    pub last_view: ViewType,
    #[serde(default)]
    pub selected_day: Option<NaiveDate>,
}

impl SavedViewState {
    pub fn capture(deck: &ViewDeck) -> Self {
        Self {
            last_view: deck.last_view(),
            selected_day: deck.selected_day(),
        }
    }

    /// Reopens the deck on the captured view and day.
    pub fn restore(&self, deck: &mut ViewDeck) {
        deck.switch_to(self.last_view);
        if let Some(day) = self.selected_day {
            deck.go_to_date(day);
        }
    }

    /// Loads the saved state, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(ctx: &dyn AppContext) -> Self {
        let Some(path) = ctx.get_view_state_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        LocalStorage::with_lock(&path, || {
            let json = fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&json).unwrap_or_default())
        })
        .unwrap_or_default()
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        if let Some(path) = ctx.get_view_state_path() {
            LocalStorage::with_lock(&path, || {
                let json = serde_json::to_string_pretty(self)?;
                LocalStorage::atomic_write(&path, json)?;
                Ok(())
            })?;
        }
        Ok(())
    }
}
