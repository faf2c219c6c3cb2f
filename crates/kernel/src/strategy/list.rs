use crate::maze::{Maze, Position};
use crate::prompt::compose;

use super::Strategy;

/// Describes the layout row by row as lists of open and wall coordinates.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListStrategy;

impl Strategy for ListStrategy {
    fn name(&self) -> &str {
        "list"
    }

    fn description(&self) -> &str {
        "row-by-row lists of open cells and walls"
    }

    fn build_prompt(
        &self,
        maze: &Maze,
        position: Position,
        history: Option<&[Position]>,
    ) -> String {
        compose(maze, position, history, &render_rows(maze))
    }
}

fn render_rows(maze: &Maze) -> String {
    let mut out = String::new();
    for y in 0..maze.height() as i32 {
        let row: Vec<Position> = (0..maze.width() as i32)
            .map(|x| Position::new(x, y))
            .collect();
        let open = join(row.iter().filter(|p| maze.is_walkable(**p)));
        let walls = join(row.iter().filter(|p| !maze.is_walkable(**p)));
        out.push_str(&format!("Row {y}: open {open}; walls {walls}\n"));
    }
    out
}

fn join<'a>(cells: impl Iterator<Item = &'a Position>) -> String {
    let parts: Vec<String> = cells.map(ToString::to_string).collect();
    if parts.is_empty() {
        "none".into()
    } else {
        parts.join(", ")
    }
}
