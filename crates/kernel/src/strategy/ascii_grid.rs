use std::collections::HashSet;

use crate::maze::{FLOOR, GOAL, Maze, Position, START, WALL};
use crate::prompt::compose;

use super::Strategy;

const YOU: char = '@';
const VISITED: char = '*';

/// Draws the maze as a character grid with axis labels, marking the agent
/// and the cells it has visited.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiGridStrategy;

impl Strategy for AsciiGridStrategy {
    fn name(&self) -> &str {
        "ascii-grid"
    }

    fn description(&self) -> &str {
        "character grid with the agent and visited cells marked"
    }

    fn build_prompt(
        &self,
        maze: &Maze,
        position: Position,
        history: Option<&[Position]>,
    ) -> String {
        let visited: HashSet<Position> = history.unwrap_or_default().iter().copied().collect();
        let mut layout = legend(history.is_some());
        layout.push_str("\n\n");
        layout.push_str(&render_grid(maze, position, &visited));
        compose(maze, position, history, &layout)
    }
}

fn legend(with_history: bool) -> String {
    let mut legend = format!(
        "Legend: {WALL} wall, {FLOOR} open, {START} start, {GOAL} goal, {YOU} you"
    );
    if with_history {
        legend.push_str(&format!(", {VISITED} visited"));
    }
    legend
}

fn render_grid(maze: &Maze, position: Position, visited: &HashSet<Position>) -> String {
    let label_width = (maze.height().saturating_sub(1)).to_string().len();
    let mut out = " ".repeat(label_width + 1);
    out.extend((0..maze.width()).map(|x| char::from(b'0' + (x % 10) as u8)));
    out.push('\n');

    for y in 0..maze.height() as i32 {
        out.push_str(&format!("{y:>label_width$} "));
        for x in 0..maze.width() as i32 {
            let pos = Position::new(x, y);
            let glyph = maze.glyph(pos).unwrap_or(WALL);
            let c = if pos == position {
                YOU
            } else if glyph == FLOOR && visited.contains(&pos) {
                VISITED
            } else {
                glyph
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}
