//! Injected position ledgers.
//!
//! The classifier never generates data itself; callers hand it a
//! [`PositionSource`] so tests run against deterministic fixtures.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::Position;
use crate::{prelude::*, Error};

const DEMO_LEDGER: &str = include_str!("../data/demo_positions.json");

/// Anything that can produce a position ledger.
pub trait PositionSource: Send + Sync {
    fn load(&self) -> Result<Vec<Position>>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}

/// Fixed in-memory ledger.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    positions: Vec<Position>,
}

impl StaticSource {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }
}

impl PositionSource for StaticSource {
    fn load(&self) -> Result<Vec<Position>> {
        Ok(self.positions.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// JSON array of positions on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PositionSource for JsonFileSource {
    fn load(&self) -> Result<Vec<Position>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Storage(format!("{}: {e}", self.path.display())))?;
        let positions = parse_ledger(&content)?;
        debug!(path = %self.path.display(), count = positions.len(), "Loaded position ledger");
        Ok(positions)
    }

    fn name(&self) -> &'static str {
        "json-file"
    }
}

/// Embedded demo ledger: 55 positions across every risk bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoSource;

impl PositionSource for DemoSource {
    fn load(&self) -> Result<Vec<Position>> {
        parse_ledger(DEMO_LEDGER)
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}

/// Parse a JSON ledger and check each position's invariants.
pub fn parse_ledger(json: &str) -> Result<Vec<Position>> {
    let positions: Vec<Position> = serde_json::from_str(json)?;
    for position in &positions {
        position.validate()?;
    }
    Ok(positions)
}
