use crate::maze::{Maze, Position};
use crate::prompt::compose;

use super::Strategy;

/// Gives only the set of open coordinates; everything else is implied wall.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoordinatesOnlyStrategy;

impl Strategy for CoordinatesOnlyStrategy {
    fn name(&self) -> &str {
        "coordinates-only"
    }

    fn description(&self) -> &str {
        "flat list of open coordinates, no drawing"
    }

    fn build_prompt(
        &self,
        maze: &Maze,
        position: Position,
        history: Option<&[Position]>,
    ) -> String {
        let open = maze
            .walkable_cells()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let layout = format!(
            "Open cells: {open}\nEvery other cell inside the grid is a wall."
        );
        compose(maze, position, history, &layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_lists_open_cells_in_row_major_order() {
        let maze = Maze::parse("S#\n.G").unwrap();
        let prompt = CoordinatesOnlyStrategy.build_prompt(&maze, maze.start(), None);
        assert!(prompt.contains("Open cells: (0,0), (0,1), (1,1)\n"));
        assert!(!prompt.contains("(1,0)"));
    }
}
