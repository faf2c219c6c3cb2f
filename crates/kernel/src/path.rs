use std::collections::{HashMap, VecDeque};

use crate::error::{Error, Result};
use crate::maze::{Maze, Position};
use crate::moves::Move;

/// Shortest path from the maze start to `target`, inclusive at both ends.
///
/// Breadth-first search over walkable cells with 4-connectivity. Neighbours
/// are expanded in vocabulary order (up, right, down, left) and the first
/// discovery of a cell wins, so equal-length paths resolve the same way on
/// every run.
pub fn path_to(maze: &Maze, target: Position) -> Result<Vec<Position>> {
    maze.validate_position(target)?;

    let start = maze.start();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut queue = VecDeque::from([start]);

    'search: while let Some(pos) = queue.pop_front() {
        if pos == target {
            break;
        }
        for (_, next) in maze.neighbors(pos) {
            if next == start || came_from.contains_key(&next) {
                continue;
            }
            came_from.insert(next, pos);
            if next == target {
                break 'search;
            }
            queue.push_back(next);
        }
    }

    if target != start && !came_from.contains_key(&target) {
        return Err(Error::Unreachable {
            x: target.x,
            y: target.y,
        });
    }

    let mut path = vec![target];
    let mut cur = target;
    while let Some(&prev) = came_from.get(&cur) {
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    Ok(path)
}

/// The moves that replay `path`, or `None` if two consecutive positions are
/// not exactly one step apart.
pub fn moves_along(path: &[Position]) -> Option<Vec<Move>> {
    path.windows(2)
        .map(|w| Move::between(w[0], w[1]))
        .collect()
}

/// BFS step distance from `origin` to every walkable cell connected to it.
pub fn distances_from(maze: &Maze, origin: Position) -> HashMap<Position, usize> {
    let mut dist = HashMap::new();
    if !maze.is_walkable(origin) {
        return dist;
    }
    dist.insert(origin, 0);
    let mut queue = VecDeque::from([origin]);
    while let Some(pos) = queue.pop_front() {
        let d = dist[&pos];
        for (_, next) in maze.neighbors(pos) {
            if !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    dist
}
