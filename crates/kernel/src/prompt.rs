//! Prompt sections shared by every strategy.
//!
//! A strategy only decides how the maze layout is rendered; the framing,
//! the history, the legal moves, and the answer contract come from here so
//! what a model is offered never drifts from what is walkable.

use crate::maze::{Maze, Position};
use crate::path::moves_along;

const INTRO: &str = "You are an agent inside a grid maze. \
Pick the next move that brings you closer to the goal.";

const COORDINATES: &str = "Coordinates are written (x,y): x is the column, \
y is the row, both counted from 0. (0,0) is the first cell of the first row; \
x grows to the right and y grows downward.";

const ANSWER: &str = "Reply with a JSON object of the form {\"move\": \"<token>\"}, \
where <token> is exactly one of the legal moves listed above. \
Do not add any other text.";

/// Assemble a full prompt around a strategy-specific layout rendering.
///
/// Sections, in order: intro, maze facts, `layout`, current position,
/// history (only when given), legal moves, answer contract.
pub fn compose(
    maze: &Maze,
    position: Position,
    history: Option<&[Position]>,
    layout: &str,
) -> String {
    let mut msg = String::from(INTRO);

    msg.push_str("\n\n## Maze\n\n");
    msg.push_str(COORDINATES);
    msg.push_str(&format!(
        "\nSize: {} columns x {} rows.\nStart: {}\nGoal: {}\n",
        maze.width(),
        maze.height(),
        maze.start(),
        maze.goal()
    ));

    msg.push_str("\n## Layout\n\n");
    msg.push_str(layout.trim_end());
    msg.push('\n');

    msg.push_str(&format!("\n## Current position\n\n{position}\n"));

    if let Some(history) = history {
        msg.push_str("\n## History\n\n");
        msg.push_str(&history_section(history));
    }

    msg.push_str("\n## Legal moves\n\n");
    msg.push_str(&legal_moves_section(maze, position));

    msg.push_str("\n## Answer\n\n");
    msg.push_str(ANSWER);
    msg.push('\n');

    msg
}

/// One bullet per legal move with the cell it leads to, in vocabulary order.
pub fn legal_moves_section(maze: &Maze, position: Position) -> String {
    let moves = maze.neighbors(position);
    if moves.is_empty() {
        return "None. Every neighbouring cell is blocked.\n".into();
    }
    moves
        .iter()
        .map(|(mv, next)| format!("- {mv}: to {next}\n"))
        .collect()
}

fn history_section(history: &[Position]) -> String {
    if history.len() <= 1 {
        return "You have not moved yet.\n".into();
    }

    let cells = history
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");
    let mut out = format!("Cells visited so far, from the start: {cells}\n");

    if let Some(moves) = moves_along(history) {
        let moves = moves
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("Moves taken: {moves}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Maze {
        Maze::parse("S.#\n..#\n..G").unwrap()
    }

    #[test]
    fn compose_orders_sections() {
        let maze = sample();
        let prompt = compose(&maze, Position::new(0, 0), None, "LAYOUT");
        let order = [
            "## Maze",
            "LAYOUT",
            "## Current position",
            "## Legal moves",
            "## Answer",
        ];
        let idx: Vec<usize> = order.iter().map(|s| prompt.find(s).unwrap()).collect();
        assert!(idx.windows(2).all(|w| w[0] < w[1]), "got {idx:?}");
        assert!(!prompt.contains("## History"));
    }

    #[test]
    fn legal_moves_list_targets() {
        let maze = sample();
        assert_eq!(
            legal_moves_section(&maze, Position::new(0, 0)),
            "- right: to (1,0)\n- down: to (0,1)\n"
        );
    }

    #[test]
    fn enclosed_position_says_none() {
        let maze = Maze::parse("S#.\n###\n.#G").unwrap();
        let section = legal_moves_section(&maze, Position::new(2, 0));
        assert!(section.starts_with("None."));
    }

    #[test]
    fn history_lists_cells_and_moves() {
        let maze = sample();
        let history = [Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)];
        let prompt = compose(&maze, Position::new(1, 1), Some(&history), "");
        assert!(prompt.contains("(0,0) -> (1,0) -> (1,1)"));
        assert!(prompt.contains("Moves taken: right, down"));
    }

    #[test]
    fn history_at_start_reports_no_moves() {
        let maze = sample();
        let history = [maze.start()];
        let prompt = compose(&maze, maze.start(), Some(&history), "");
        assert!(prompt.contains("You have not moved yet."));
    }
}
