//! Dashboard view state and its key-value persistence.
//!
//! View state travels as an explicit value. Persistence goes through an
//! injected [`KeyValueStore`] instead of ambient global storage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::risk::PositionFilter;
use crate::{prelude::*, Error};

const SIDEBAR_COLLAPSED_KEY: &str = "sidebar-collapsed";
const ECOSYSTEM_EXPANDED_KEY: &str = "ecosystem-sidebar-expanded";
const SUPPORT_STEP_KEY: &str = "support-step";
const POSITIONS_FILTER_KEY: &str = "positions-filter";

/// String key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store for tests and single-session use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| Error::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk; every `set` rewrites the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Storage(format!("{}: {e}", self.path.display())))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|e| Error::Storage(e.to_string()))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|e| Error::Storage(e.to_string()))?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, content)
            .map_err(|e| Error::Storage(format!("{}: {e}", self.path.display())))
    }
}

/// Step of the support/donation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupportStep {
    #[default]
    Addresses,
    ThankYou,
}

impl SupportStep {
    pub fn advance(self) -> Self {
        SupportStep::ThankYou
    }

    pub fn reset(self) -> Self {
        SupportStep::Addresses
    }

    fn as_str(self) -> &'static str {
        match self {
            SupportStep::Addresses => "addresses",
            SupportStep::ThankYou => "thank-you",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "addresses" => Some(SupportStep::Addresses),
            "thank-you" | "thankyou" => Some(SupportStep::ThankYou),
            _ => None,
        }
    }
}

/// Client-side view state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub sidebar_collapsed: bool,
    pub ecosystem_expanded: bool,
    pub support_step: SupportStep,
    pub active_filter: PositionFilter,
}

fn parse_bool(value: Option<String>) -> bool {
    value.as_deref() == Some("true")
}

impl ViewState {
    /// Read state from `store`; missing or unparsable keys take defaults.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let support_step = store
            .get(SUPPORT_STEP_KEY)?
            .and_then(|s| SupportStep::parse(&s))
            .unwrap_or_default();
        let active_filter = store
            .get(POSITIONS_FILTER_KEY)?
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Ok(Self {
            sidebar_collapsed: parse_bool(store.get(SIDEBAR_COLLAPSED_KEY)?),
            ecosystem_expanded: parse_bool(store.get(ECOSYSTEM_EXPANDED_KEY)?),
            support_step,
            active_filter,
        })
    }

    /// Write every key to `store`.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(SIDEBAR_COLLAPSED_KEY, &self.sidebar_collapsed.to_string())?;
        store.set(ECOSYSTEM_EXPANDED_KEY, &self.ecosystem_expanded.to_string())?;
        store.set(SUPPORT_STEP_KEY, self.support_step.as_str())?;
        store.set(POSITIONS_FILTER_KEY, &self.active_filter.to_string())?;
        debug!(
            sidebar_collapsed = self.sidebar_collapsed,
            ecosystem_expanded = self.ecosystem_expanded,
            support_step = self.support_step.as_str(),
            filter = %self.active_filter,
            "View state persisted"
        );
        Ok(())
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    pub fn toggle_ecosystem(&mut self) {
        self.ecosystem_expanded = !self.ecosystem_expanded;
    }
}
