//! The persisted form of breakpoints, as owned by the configuration provider.

use std::{collections::BTreeMap, path::PathBuf};

use config::ConfigProvider;
use serde::{Deserialize, Serialize};

/// Configuration namespace that holds the breakpoint store.
pub const NAMESPACE: &str = "run";
/// Configuration key of the breakpoint store within [`NAMESPACE`].
pub const KEY: &str = "breakpoints";

/// All persisted breakpoints, keyed by the file they are set in.
pub type BreakpointStore = BTreeMap<PathBuf, Vec<BreakpointEntry>>;

/// A single breakpoint within a file.
///
/// Persisted as `[line, "condition"]`. A bare line number, a one element
/// `[line]` list or a `{ line, condition }` table are also accepted; a missing
/// condition is empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(from = "EntryRepr", into = "(usize, String)")]
pub struct BreakpointEntry {
    pub line: usize,
    pub condition: String,
}

impl BreakpointEntry {
    pub fn new(line: usize, condition: impl Into<String>) -> Self {
        Self {
            line,
            condition: condition.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryRepr {
    Line(usize),
    Single((usize,)),
    Pair(usize, String),
    Table {
        line: usize,
        #[serde(default)]
        condition: String,
    },
}

impl From<EntryRepr> for BreakpointEntry {
    fn from(repr: EntryRepr) -> Self {
        match repr {
            EntryRepr::Line(line) | EntryRepr::Single((line,)) => Self::new(line, ""),
            EntryRepr::Pair(line, condition) | EntryRepr::Table { line, condition } => {
                Self { line, condition }
            }
        }
    }
}

impl From<BreakpointEntry> for (usize, String) {
    fn from(entry: BreakpointEntry) -> Self {
        (entry.line, entry.condition)
    }
}

/// Read the breakpoint store from `config`, dropping every file that no longer
/// exists on disk.
///
/// A missing or malformed store is treated as empty.
#[tracing::instrument(skip_all)]
pub fn load_breakpoints(config: &impl ConfigProvider) -> BreakpointStore {
    let store = config.get(NAMESPACE, KEY, BreakpointStore::new());
    tracing::debug!(files = store.len(), "loaded breakpoint store");
    retain_existing_files(store)
}

/// Remove every file entry whose path is not an existing regular file.
pub fn retain_existing_files(mut store: BreakpointStore) -> BreakpointStore {
    store.retain(|path, _| {
        let exists = path.is_file();
        if !exists {
            tracing::debug!(path = %path.display(), "dropping breakpoints for missing file");
        }
        exists
    });
    store
}
