use std::cmp::Ordering;

use crate::maze::{Maze, Position, WALL};
use crate::prompt::compose;

use super::Strategy;

const RADIUS: i32 = 1;

/// Shows only the cells around the agent plus the direction of the goal,
/// the way a walker inside the maze would see it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalViewStrategy;

impl Strategy for LocalViewStrategy {
    fn name(&self) -> &str {
        "local-view"
    }

    fn description(&self) -> &str {
        "3x3 window around the agent plus the goal direction"
    }

    fn build_prompt(
        &self,
        maze: &Maze,
        position: Position,
        history: Option<&[Position]>,
    ) -> String {
        let mut layout = String::from(
            "Surroundings (you are at the centre @, cells outside the maze shown as #):\n",
        );
        layout.push_str(&window(maze, position));
        layout.push('\n');
        layout.push_str(&goal_direction(position, maze.goal()));
        compose(maze, position, history, &layout)
    }
}

fn window(maze: &Maze, center: Position) -> String {
    let mut out = String::new();
    for dy in -RADIUS..=RADIUS {
        for dx in -RADIUS..=RADIUS {
            let c = if dx == 0 && dy == 0 {
                '@'
            } else {
                center
                    .x
                    .checked_add(dx)
                    .zip(center.y.checked_add(dy))
                    .and_then(|(x, y)| maze.glyph(Position::new(x, y)))
                    .unwrap_or(WALL)
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

fn goal_direction(from: Position, goal: Position) -> String {
    if from == goal {
        return "You are standing on the goal.".into();
    }
    let mut parts = Vec::new();
    match goal.x.cmp(&from.x) {
        Ordering::Greater => parts.push(count(goal.x.abs_diff(from.x), "column", "to the right")),
        Ordering::Less => parts.push(count(goal.x.abs_diff(from.x), "column", "to the left")),
        Ordering::Equal => {}
    }
    match goal.y.cmp(&from.y) {
        Ordering::Greater => parts.push(count(goal.y.abs_diff(from.y), "row", "down")),
        Ordering::Less => parts.push(count(goal.y.abs_diff(from.y), "row", "up")),
        Ordering::Equal => {}
    }
    format!("The goal is {} from you.", parts.join(" and "))
}

fn count(n: u32, unit: &str, dir: &str) -> String {
    let plural = if n == 1 { "" } else { "s" };
    format!("{n} {unit}{plural} {dir}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_pads_outside_cells_with_walls() {
        let maze = Maze::parse("S.#\n..#\n..G").unwrap();
        assert_eq!(window(&maze, maze.start()), "###\n#@.\n#..\n");
        assert_eq!(window(&maze, Position::new(1, 1)), "S.#\n.@#\n..G\n");
    }

    #[test]
    fn goal_direction_phrases() {
        let at = Position::new(1, 1);
        assert_eq!(
            goal_direction(at, Position::new(3, 1)),
            "The goal is 2 columns to the right from you."
        );
        assert_eq!(
            goal_direction(at, Position::new(0, 0)),
            "The goal is 1 column to the left and 1 row up from you."
        );
        assert_eq!(goal_direction(at, at), "You are standing on the goal.");
    }

    #[test]
    fn extreme_coordinates_render_as_walls() {
        let maze = Maze::parse("S.#\n..#\n..G").unwrap();
        assert_eq!(window(&maze, Position::new(i32::MAX, i32::MIN)), "###\n#@#\n###\n");
        assert_eq!(
            goal_direction(Position::new(i32::MIN, 0), Position::new(i32::MAX, 0)),
            "The goal is 4294967295 columns to the right from you."
        );
    }
}
