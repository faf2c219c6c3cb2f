//! One probe: everything needed to ask a model for a single move.
//!
//! Setup runs in a fixed order and stops at the first error:
//! load maze, validate position, look up strategy, compute history,
//! build prompt, build response schema. Nothing here talks to a model.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::maze::{Maze, Position};
use crate::moves::{Move, legal_moves};
use crate::path::path_to;
use crate::reply::response_schema;
use crate::strategy::{Strategy, StrategyRegistry};

/// Inputs for [`prepare`].
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub maze_path: PathBuf,
    pub strategy: String,
    pub position: Position,
    pub include_history: bool,
}

/// A fully prepared probe, ready to be sent.
pub struct Probe {
    pub maze_path: PathBuf,
    pub maze: Maze,
    pub position: Position,
    pub strategy: Arc<dyn Strategy>,
    /// Shortest path from the start to `position`, when requested.
    pub history: Option<Vec<Position>>,
    pub legal_moves: Vec<Move>,
    pub prompt: String,
    pub schema: serde_json::Value,
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe")
            .field("maze_path", &self.maze_path)
            .field("position", &self.position)
            .field("strategy", &self.strategy.name())
            .field("history_len", &self.history.as_ref().map(Vec::len))
            .field("prompt_len", &self.prompt.len())
            .finish()
    }
}

impl Probe {
    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }
}

/// Load the maze from disk, then [`prepare_with_maze`].
pub fn prepare(request: &ProbeRequest, registry: &StrategyRegistry) -> Result<Probe> {
    let maze = Maze::from_file(&request.maze_path)?;
    prepare_with_maze(maze, request, registry)
}

/// Run the setup pipeline against an already-parsed maze.
pub fn prepare_with_maze(
    maze: Maze,
    request: &ProbeRequest,
    registry: &StrategyRegistry,
) -> Result<Probe> {
    let position = request.position;
    maze.validate_position(position)?;

    let strategy = registry.find(&request.strategy)?;

    let history = if request.include_history {
        let path = path_to(&maze, position)?;
        debug!(steps = path.len() - 1, "computed history");
        Some(path)
    } else {
        None
    };

    let prompt = strategy.build_prompt(&maze, position, history.as_deref());
    let schema = response_schema()?;
    let legal = legal_moves(&maze, position);

    info!(
        maze = %display_name(&request.maze_path),
        width = maze.width(),
        height = maze.height(),
        position = %position,
        strategy = strategy.name(),
        history = history.is_some(),
        legal = legal.len(),
        prompt_chars = prompt.chars().count(),
        "probe prepared"
    );

    Ok(Probe {
        maze_path: request.maze_path.clone(),
        maze,
        position,
        strategy,
        history,
        legal_moves: legal,
        prompt,
        schema,
    })
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::strategy::registry;

    const SAMPLE: &str = "S.#\n..#\n..G\n";

    fn request(strategy: &str, x: i32, y: i32, include_history: bool) -> ProbeRequest {
        ProbeRequest {
            maze_path: PathBuf::from("sample.txt"),
            strategy: strategy.into(),
            position: Position::new(x, y),
            include_history,
        }
    }

    fn sample() -> Maze {
        Maze::parse(SAMPLE).unwrap()
    }

    #[test]
    fn prepare_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, SAMPLE).unwrap();

        let req = ProbeRequest {
            maze_path: path.clone(),
            ..request("list", 0, 0, false)
        };
        let probe = prepare(&req, registry()).unwrap();
        assert_eq!(probe.maze_path, path);
        assert_eq!(probe.strategy_name(), "list");
        assert_eq!(probe.legal_moves, vec![Move::Right, Move::Down]);
        assert!(probe.history.is_none());
        assert_eq!(probe.schema["required"], serde_json::json!(["move"]));
    }

    #[test]
    fn prepared_schema_is_the_reply_schema() {
        let probe = prepare_with_maze(sample(), &request("list", 0, 0, false), registry()).unwrap();
        assert_eq!(probe.schema, response_schema().unwrap());
        assert!(!probe.schema.is_null());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let req = ProbeRequest {
            maze_path: dir.path().join("nope.txt"),
            ..request("list", 0, 0, false)
        };
        assert!(matches!(prepare(&req, registry()), Err(Error::Io(_))));
    }

    #[test]
    fn history_is_shortest_path_when_requested() {
        let probe = prepare_with_maze(sample(), &request("ascii-grid", 1, 1, true), registry())
            .unwrap();
        assert_eq!(
            probe.history,
            Some(vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(1, 1)
            ])
        );
        assert!(probe.prompt.contains("## History"));
    }

    #[test]
    fn position_is_checked_before_strategy() {
        let err = prepare_with_maze(sample(), &request("no-such", 2, 0, false), registry())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPosition { x: 2, y: 0, .. }));

        let err = prepare_with_maze(sample(), &request("no-such", 0, 0, false), registry())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownStrategy { .. }));
    }

    #[test]
    fn enclosed_position_with_history_is_unreachable() {
        let maze = Maze::parse("S.#.\n..##\n...G").unwrap();
        let err = prepare_with_maze(maze.clone(), &request("list", 3, 0, true), registry())
            .unwrap_err();
        assert!(matches!(err, Error::Unreachable { x: 3, y: 0 }));

        // Without history the same position is a valid probe.
        assert!(prepare_with_maze(maze, &request("list", 3, 0, false), registry()).is_ok());
    }

    #[test]
    fn prompt_matches_direct_strategy_call() {
        let maze = sample();
        let probe =
            prepare_with_maze(maze.clone(), &request("local-view", 1, 2, false), registry())
                .unwrap();
        let direct = registry()
            .find("local-view")
            .unwrap()
            .build_prompt(&maze, Position::new(1, 2), None);
        assert_eq!(probe.prompt, direct);
    }
}
