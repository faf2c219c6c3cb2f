use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::moves::Move;

// ---------------------------------------------------------------------------
// Glyphs
// ---------------------------------------------------------------------------

/// Blocked cell.
pub const WALL: char = '#';
/// Walkable cell.
pub const FLOOR: char = '.';
/// Walkable start cell (exactly one per maze).
pub const START: char = 'S';
/// Walkable goal cell (exactly one per maze).
pub const GOAL: char = 'G';

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A grid coordinate. `x` is the column, `y` the row, both 0-indexed from
/// the top-left corner.
///
/// Signed so that out-of-range input (e.g. `-1,0`) is representable and
/// rejected by validation instead of by the parser.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position one move away (may be off the grid). `None` when the
    /// coordinate would leave the `i32` range.
    pub fn step(self, mv: Move) -> Option<Self> {
        let (dx, dy) = mv.delta();
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A position string that is not of the form `x,y`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid position `{0}`: expected `x,y` with integer coordinates")]
pub struct PositionSyntaxError(pub String);

impl FromStr for Position {
    type Err = PositionSyntaxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || PositionSyntaxError(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse::<i32>().map_err(|_| err())?;
        let y = y.trim().parse::<i32>().map_err(|_| err())?;
        Ok(Self::new(x, y))
    }
}

// ---------------------------------------------------------------------------
// Maze
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Wall,
    Floor,
}

/// An immutable rectangular maze with one start and one goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Position,
    goal: Position,
}

impl Maze {
    /// Parse a maze from its text form.
    ///
    /// One row per line, `\n` or `\r\n` separated, trailing newline
    /// optional. Glyphs: `#` wall, `.` floor, `S` start, `G` goal.
    pub fn parse(source: &str) -> Result<Self> {
        let rows: Vec<&str> = source.lines().collect();
        let Some(first) = rows.first().filter(|r| !r.is_empty()) else {
            return Err(Error::Parse {
                line: 1,
                reason: "maze source is empty".into(),
            });
        };

        let width = first.chars().count();
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        let mut start = None;
        let mut goal = None;

        for (y, row) in rows.iter().enumerate() {
            let line = y + 1;
            let len = row.chars().count();
            if len != width {
                return Err(Error::Parse {
                    line,
                    reason: format!("row `{row}` has {len} cells, expected {width}"),
                });
            }

            for (x, glyph) in row.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                let cell = match glyph {
                    WALL => Cell::Wall,
                    FLOOR => Cell::Floor,
                    START => {
                        if start.replace(pos).is_some() {
                            return Err(Error::Parse {
                                line,
                                reason: format!("second start marker `{START}` in row `{row}`"),
                            });
                        }
                        Cell::Floor
                    }
                    GOAL => {
                        if goal.replace(pos).is_some() {
                            return Err(Error::Parse {
                                line,
                                reason: format!("second goal marker `{GOAL}` in row `{row}`"),
                            });
                        }
                        Cell::Floor
                    }
                    other => {
                        return Err(Error::Parse {
                            line,
                            reason: format!(
                                "unknown glyph `{other}` at column {} in row `{row}`",
                                x + 1
                            ),
                        });
                    }
                };
                cells.push(cell);
            }
        }

        let start = start.ok_or_else(|| Error::Parse {
            line: height,
            reason: format!("no start marker `{START}` found"),
        })?;
        let goal = goal.ok_or_else(|| Error::Parse {
            line: height,
            reason: format!("no goal marker `{GOAL}` found"),
        })?;

        Ok(Self {
            width,
            height,
            cells,
            start,
            goal,
        })
    }

    /// Read and parse a maze file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let maze = Self::parse(&source)?;
        debug!(
            path = %path.display(),
            width = maze.width,
            height = maze.height,
            "maze loaded"
        );
        Ok(maze)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// True iff `pos` is on the grid and not a wall. Out-of-bounds is simply
    /// "not walkable", never an error.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Floor)
    }

    /// Walkable neighbours of `pos`, in vocabulary order.
    pub fn neighbors(&self, pos: Position) -> Vec<(Move, Position)> {
        Move::ALL
            .into_iter()
            .filter_map(|mv| pos.step(mv).map(|next| (mv, next)))
            .filter(|(_, next)| self.is_walkable(*next))
            .collect()
    }

    /// Reject positions that are off the grid or on a wall.
    pub fn validate_position(&self, pos: Position) -> Result<()> {
        if !self.in_bounds(pos) {
            return Err(Error::InvalidPosition {
                x: pos.x,
                y: pos.y,
                reason: format!("outside the {}x{} grid", self.width, self.height),
            });
        }
        if !self.is_walkable(pos) {
            return Err(Error::InvalidPosition {
                x: pos.x,
                y: pos.y,
                reason: "cell is a wall".into(),
            });
        }
        Ok(())
    }

    /// Walkable cells in row-major order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |p| self.is_walkable(*p))
    }

    /// Glyph for `pos` in the canonical text form (`None` off the grid).
    pub fn glyph(&self, pos: Position) -> Option<char> {
        let cell = self.cell(pos)?;
        Some(if pos == self.start {
            START
        } else if pos == self.goal {
            GOAL
        } else if cell == Cell::Wall {
            WALL
        } else {
            FLOOR
        })
    }

    /// Canonical text form, one row per line, no trailing newline.
    pub fn render(&self) -> String {
        (0..self.height as i32)
            .map(|y| {
                (0..self.width as i32)
                    .filter_map(|x| self.glyph(Position::new(x, y)))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    fn cell(&self, pos: Position) -> Option<Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.cells
            .get(pos.y as usize * self.width + pos.x as usize)
            .copied()
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Maze {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
