use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::maze::{Maze, Position};

// ---------------------------------------------------------------------------
// Move vocabulary
// ---------------------------------------------------------------------------

/// A move token. The variant order is the vocabulary order used for
/// enumeration in prompts, in the response schema, and for BFS tie-breaks.
//
// Keep variants undocumented: variant docs make schemars emit `oneOf`
// instead of a flat string enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Right,
    Down,
    Left,
}

impl Move {
    /// The full vocabulary, in order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Right, Move::Down, Move::Left];

    /// Coordinate delta `(dx, dy)`; y grows downward.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Move::Up => (0, -1),
            Move::Right => (1, 0),
            Move::Down => (0, 1),
            Move::Left => (-1, 0),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Right => "right",
            Move::Down => "down",
            Move::Left => "left",
        }
    }

    /// The move that takes `from` to `to`, if they are exactly one step apart.
    pub fn between(from: Position, to: Position) -> Option<Move> {
        Self::ALL
            .into_iter()
            .find(|m| from.step(*m) == Some(to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is not in the move vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown move `{0}` (expected one of: up, right, down, left)")]
pub struct UnknownMove(pub String);

impl FromStr for Move {
    type Err = UnknownMove;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownMove(token.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Legality
// ---------------------------------------------------------------------------

/// Legal moves from `position`, in vocabulary order.
///
/// A move is legal iff it stays inside the grid and lands on a walkable
/// cell. An enclosed cell yields an empty list.
pub fn legal_moves(maze: &Maze, position: Position) -> Vec<Move> {
    maze.neighbors(position)
        .into_iter()
        .map(|(mv, _)| mv)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Maze {
        Maze::parse("S.#\n..#\n..G").unwrap()
    }

    #[test]
    fn vocabulary_order_is_up_right_down_left() {
        let tokens: Vec<&str> = Move::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(tokens, vec!["up", "right", "down", "left"]);
    }

    #[test]
    fn parse_is_case_insensitive_and_trimmed() {
        assert_eq!(" Down ".parse::<Move>().unwrap(), Move::Down);
        assert_eq!("LEFT".parse::<Move>().unwrap(), Move::Left);
        assert!("north".parse::<Move>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_tokens() {
        assert_eq!(serde_json::to_string(&Move::Right).unwrap(), "\"right\"");
        let mv: Move = serde_json::from_str("\"up\"").unwrap();
        assert_eq!(mv, Move::Up);
    }

    #[test]
    fn between_recognizes_single_steps_only() {
        let a = Position::new(1, 1);
        assert_eq!(Move::between(a, Position::new(1, 0)), Some(Move::Up));
        assert_eq!(Move::between(a, Position::new(0, 1)), Some(Move::Left));
        assert_eq!(Move::between(a, Position::new(2, 2)), None);
        assert_eq!(Move::between(a, a), None);
    }

    #[test]
    fn legal_moves_from_start_corner() {
        let maze = sample();
        assert_eq!(
            legal_moves(&maze, Position::new(0, 0)),
            vec![Move::Right, Move::Down]
        );
    }

    #[test]
    fn legal_moves_match_walkable_targets_everywhere() {
        let maze = sample();
        for y in -1..=maze.height() as i32 {
            for x in -1..=maze.width() as i32 {
                let pos = Position::new(x, y);
                let legal = legal_moves(&maze, pos);
                for mv in Move::ALL {
                    let target = pos.step(mv).unwrap();
                    assert_eq!(
                        legal.contains(&mv),
                        maze.is_walkable(target),
                        "at {pos} moving {mv}"
                    );
                }
            }
        }
    }

    #[test]
    fn enclosed_cell_has_no_legal_moves() {
        let maze = Maze::parse("S#.\n###\n.#G").unwrap();
        assert!(legal_moves(&maze, Position::new(2, 0)).is_empty());
    }

    #[test]
    fn legal_moves_at_extreme_coordinates_is_empty() {
        let maze = sample();
        for pos in [
            Position::new(i32::MAX, 0),
            Position::new(i32::MIN, 0),
            Position::new(0, i32::MIN),
            Position::new(0, i32::MAX),
        ] {
            assert!(legal_moves(&maze, pos).is_empty(), "at {pos}");
        }
    }

    #[test]
    fn between_far_apart_extremes_is_none() {
        assert_eq!(
            Move::between(Position::new(i32::MIN, 0), Position::new(i32::MAX, 0)),
            None
        );
    }
}
