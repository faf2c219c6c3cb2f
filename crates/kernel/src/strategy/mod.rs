use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::error::{Error, Result};
use crate::maze::{Maze, Position};

pub mod ascii_grid;
pub mod coordinates;
pub mod list;
pub mod local_view;

pub use ascii_grid::AsciiGridStrategy;
pub use coordinates::CoordinatesOnlyStrategy;
pub use list::ListStrategy;
pub use local_view::LocalViewStrategy;

// ---------------------------------------------------------------------------
// Strategy trait
// ---------------------------------------------------------------------------

/// A named, stateless encoder from maze state to prompt text.
///
/// Strategies differ only in how they render the layout. Legal moves always
/// come from [`crate::moves::legal_moves`] via [`crate::prompt::compose`].
pub trait Strategy: Send + Sync {
    /// Registry key (e.g. "list", "ascii-grid").
    fn name(&self) -> &str;

    /// One-line summary shown by `mazeprobe strategies`.
    fn description(&self) -> &str;

    /// Render the prompt. Must be deterministic for identical inputs.
    fn build_prompt(
        &self,
        maze: &Maze,
        position: Position,
        history: Option<&[Position]>,
    ) -> String;
}

// ---------------------------------------------------------------------------
// StrategyRegistry
// ---------------------------------------------------------------------------

/// Strategies keyed by name. Registering an existing name replaces it.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    entries: BTreeMap<String, Arc<dyn Strategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in strategy.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builtins: [Arc<dyn Strategy>; 4] = [
            Arc::new(ListStrategy),
            Arc::new(AsciiGridStrategy),
            Arc::new(CoordinatesOnlyStrategy),
            Arc::new(LocalViewStrategy),
        ];
        for strategy in builtins {
            registry.register(strategy.name().to_string(), strategy);
        }
        registry
    }

    /// Insert `strategy` under `name`, returning the one it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        strategy: Arc<dyn Strategy>,
    ) -> Option<Arc<dyn Strategy>> {
        self.entries.insert(name.into(), strategy)
    }

    /// Look up a strategy. The error lists every known name.
    pub fn find(&self, name: &str) -> Result<Arc<dyn Strategy>> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownStrategy {
                name: name.to_string(),
                known: self.names(),
            })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Strategy>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.names())
            .finish()
    }
}

static REGISTRY: LazyLock<StrategyRegistry> = LazyLock::new(StrategyRegistry::builtin);

/// The process-wide registry of built-in strategies.
///
/// Built on first access and read-only afterwards.
pub fn registry() -> &'static StrategyRegistry {
    &REGISTRY
}
