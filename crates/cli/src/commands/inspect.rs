use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use mazeprobe_kernel::path::{distances_from, moves_along, path_to};
use mazeprobe_kernel::{Maze, Position, legal_moves};

use super::load_config;

pub fn execute(root: &Path, maze: &str, position: Option<Position>) -> Result<()> {
    let config = load_config(root)?;
    let path = config.resolve_maze_path(maze);
    let parsed =
        Maze::from_file(&path).with_context(|| format!("failed to load maze {}", path.display()))?;
    let target = position.unwrap_or_else(|| parsed.goal());
    parsed.validate_position(target)?;

    print!("{}", report(&parsed, target));
    Ok(())
}

/// Human-readable summary of a maze and one position in it.
fn report(maze: &Maze, target: Position) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Maze ===");
    let _ = writeln!(out, "{}", maze.render());
    let _ = writeln!(out, "size: {}x{}", maze.width(), maze.height());
    let _ = writeln!(out, "start: {}", maze.start());
    let _ = writeln!(out, "goal: {}", maze.goal());
    let _ = writeln!(out);

    let _ = writeln!(out, "=== Position {target} ===");
    let legal: Vec<&str> = legal_moves(maze, target)
        .into_iter()
        .map(|m| m.as_str())
        .collect();
    let legal = if legal.is_empty() {
        "none".to_string()
    } else {
        legal.join(", ")
    };
    let _ = writeln!(out, "legal moves: {legal}");

    match path_to(maze, target) {
        Ok(path) => {
            let cells: Vec<String> = path.iter().map(ToString::to_string).collect();
            let _ = writeln!(
                out,
                "path from start ({} steps): {}",
                path.len() - 1,
                cells.join(" -> ")
            );
            if let Some(moves) = moves_along(&path) {
                let moves: Vec<&str> = moves.iter().map(|m| m.as_str()).collect();
                let _ = writeln!(out, "moves: {}", moves.join(", "));
            }
        }
        Err(_) => {
            let _ = writeln!(out, "path from start: unreachable");
        }
    }

    let to_goal = distances_from(maze, maze.goal())
        .get(&target)
        .map(|d| d.to_string())
        .unwrap_or_else(|| "unreachable".into());
    let _ = writeln!(out, "distance to goal: {to_goal}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Maze {
        Maze::parse("S.#\n..#\n..G").unwrap()
    }

    #[test]
    fn report_for_goal() {
        let maze = sample();
        let out = report(&maze, maze.goal());
        assert!(out.starts_with("=== Maze ===\nS.#\n..#\n..G\n"));
        assert!(out.contains("size: 3x3\n"));
        assert!(out.contains("=== Position (2,2) ===\n"));
        assert!(out.contains("legal moves: left\n"));
        assert!(out.contains("path from start (4 steps): (0,0) -> (1,0) -> (1,1) -> (1,2) -> (2,2)\n"));
        assert!(out.contains("moves: right, down, down, right\n"));
        assert!(out.contains("distance to goal: 0\n"));
    }

    #[test]
    fn report_for_enclosed_cell() {
        let maze = Maze::parse("S.#.\n..##\n...G").unwrap();
        let out = report(&maze, Position::new(3, 0));
        assert!(out.contains("legal moves: none\n"));
        assert!(out.contains("path from start: unreachable\n"));
        assert!(out.contains("distance to goal: unreachable\n"));
    }

    #[test]
    fn execute_resolves_maze_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("mazes")).unwrap();
        std::fs::write(dir.path().join("mazes/tiny.txt"), "SG\n").unwrap();
        assert!(execute(dir.path(), "tiny", None).is_ok());
        assert!(execute(dir.path(), "missing", None).is_err());
        assert!(execute(dir.path(), "tiny", Some(Position::new(5, 5))).is_err());
    }
}
