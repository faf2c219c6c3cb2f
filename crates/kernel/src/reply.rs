use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::maze::{Maze, Position};
use crate::moves::{Move, legal_moves};
use crate::path::distances_from;

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

/// The only shape a model may answer with: `{"move": "<token>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MoveReply {
    #[serde(rename = "move")]
    pub mv: Move,
}

/// JSON schema constraining a model reply to [`MoveReply`].
///
/// Subschemas are inlined so the `move` property is a plain string enum of
/// the vocabulary, in vocabulary order.
pub fn response_schema() -> Result<serde_json::Value> {
    let generator = SchemaSettings::draft07()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .into_generator();
    let schema = generator.into_root_schema_for::<MoveReply>();
    Ok(serde_json::to_value(schema)?)
}

// ---------------------------------------------------------------------------
// Reply parsing
// ---------------------------------------------------------------------------

/// Extract the chosen move from raw model output.
///
/// Attempts, in order:
/// 1. The whole reply as a `MoveReply` JSON object.
/// 2. The same after stripping markdown code fences.
/// 3. Each `{...}` block found in the text, first usable one wins.
/// 4. A bare vocabulary token (optionally quoted).
pub fn parse_move_reply(raw: &str) -> Result<Move> {
    let stripped = strip_code_fences(raw);

    for candidate in [raw.trim(), stripped.as_str()] {
        if let Some(result) = from_json(candidate, raw) {
            return result;
        }
    }

    let mut first_err = None;
    for obj in json_objects(&stripped) {
        match from_json(obj, raw) {
            Some(Ok(mv)) => return Ok(mv),
            Some(Err(e)) => {
                first_err.get_or_insert(e);
            }
            None => {}
        }
    }
    if let Some(err) = first_err {
        return Err(err);
    }

    if let Ok(mv) = stripped.trim_matches('"').parse::<Move>() {
        return Ok(mv);
    }

    let preview: String = raw.chars().take(200).collect();
    warn!(
        raw_len = raw.len(),
        raw_preview = %preview,
        "model reply is not a move"
    );
    Err(Error::InvalidReply {
        reason: "expected a JSON object {\"move\": \"<token>\"}".into(),
        raw: raw.to_string(),
    })
}

/// `None` when `s` is not a JSON object at all; otherwise the verdict on
/// its `move` field.
fn from_json(s: &str, raw: &str) -> Option<Result<Move>> {
    let value: serde_json::Value = serde_json::from_str(s).ok()?;
    let obj = value.as_object()?;
    let invalid = |reason: String| {
        Err(Error::InvalidReply {
            reason,
            raw: raw.to_string(),
        })
    };
    Some(match obj.get("move") {
        Some(serde_json::Value::String(token)) => match token.parse::<Move>() {
            Ok(mv) => Ok(mv),
            Err(e) => invalid(e.to_string()),
        },
        Some(other) => invalid(format!("`move` must be a string, got {other}")),
        None => invalid("reply object has no `move` field".into()),
    })
}

fn strip_code_fences(s: &str) -> String {
    let trimmed = s.trim();
    if let Some(rest) = trimmed.strip_prefix("```json")
        && let Some(inner) = rest.strip_suffix("```")
    {
        return inner.trim().to_string();
    }
    if let Some(rest) = trimmed.strip_prefix("```")
        && let Some(inner) = rest.strip_suffix("```")
    {
        return inner.trim().to_string();
    }
    trimmed.to_string()
}

/// Every balanced top-level `{...}` block in `s`, in order.
fn json_objects(s: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(offset) = s[from..].find('{') {
        let start = from + offset;
        match object_end(s, start) {
            Some(end) => {
                found.push(&s[start..end]);
                from = end;
            }
            None => from = start + 1,
        }
    }
    found
}

/// End (exclusive) of the `{...}` block opening at `start`, handling nested
/// braces and strings.
fn object_end(s: &str, start: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0;
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in bytes[start..].iter().enumerate() {
        if escape {
            escape = false;
            continue;
        }
        if b == b'\\' && in_string {
            escape = true;
            continue;
        }
        if b == b'"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        if b == b'{' {
            depth += 1;
        } else if b == b'}' {
            depth -= 1;
            if depth == 0 {
                return Some(start + i + 1);
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Move evaluation
// ---------------------------------------------------------------------------

/// How good a chosen move was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Leaves the grid or walks into a wall.
    Illegal,
    /// Walkable, but does not shorten the remaining distance to the goal.
    Legal,
    /// Lies on a shortest route to the goal.
    Optimal,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Illegal => "illegal",
            Verdict::Legal => "legal",
            Verdict::Optimal => "optimal",
        }
    }
}

/// Grading of one move from one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvaluation {
    pub chosen: Move,
    pub verdict: Verdict,
    pub legal_moves: Vec<Move>,
    /// Legal moves that lie on a shortest route to the goal.
    pub optimal_moves: Vec<Move>,
    /// BFS distance to the goal before the move (`None` if unreachable).
    pub distance_before: Option<usize>,
}

/// Grade `chosen` at `position` against the goal distance field.
pub fn evaluate_move(maze: &Maze, position: Position, chosen: Move) -> MoveEvaluation {
    let legal = legal_moves(maze, position);
    let dist = distances_from(maze, maze.goal());
    let before = dist.get(&position).copied();

    let optimal: Vec<Move> = match before {
        Some(d) if d > 0 => legal
            .iter()
            .copied()
            .filter(|mv| {
                position
                    .step(*mv)
                    .is_some_and(|next| dist.get(&next) == Some(&(d - 1)))
            })
            .collect(),
        _ => Vec::new(),
    };

    let verdict = if !legal.contains(&chosen) {
        Verdict::Illegal
    } else if optimal.contains(&chosen) {
        Verdict::Optimal
    } else {
        Verdict::Legal
    };

    MoveEvaluation {
        chosen,
        verdict,
        legal_moves: legal,
        optimal_moves: optimal,
        distance_before: before,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Maze {
        Maze::parse("S.#\n..#\n..G").unwrap()
    }

    #[test]
    fn schema_is_single_required_move_enum() {
        let schema = response_schema().unwrap();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], serde_json::json!(["move"]));
        assert_eq!(
            schema["properties"]["move"]["enum"],
            serde_json::json!(["up", "right", "down", "left"])
        );
        assert_eq!(schema["properties"]["move"]["type"], "string");
        assert!(schema.get("definitions").is_none());
    }

    #[test]
    fn parse_clean_json() {
        assert_eq!(parse_move_reply(r#"{"move": "down"}"#).unwrap(), Move::Down);
    }

    #[test]
    fn parse_fenced_json() {
        let raw = "```json\n{\"move\": \"left\"}\n```";
        assert_eq!(parse_move_reply(raw).unwrap(), Move::Left);
    }

    #[test]
    fn parse_json_embedded_in_prose() {
        let raw = "I will go right.\n{\"move\": \"right\"}\nDone.";
        assert_eq!(parse_move_reply(raw).unwrap(), Move::Right);
    }

    #[test]
    fn parse_skips_objects_without_a_move() {
        let raw = r#"{"thought": "the goal is below"} {"move": "up"}"#;
        assert_eq!(parse_move_reply(raw).unwrap(), Move::Up);

        let raw = "Plan: {\"note\": \"{ unbalanced\"}\nAnswer: {\"move\": \"left\"}";
        assert_eq!(parse_move_reply(raw).unwrap(), Move::Left);
    }

    #[test]
    fn embedded_objects_without_a_move_are_invalid() {
        let raw = r#"Thinking {"a": 1} then {"b": 2}"#;
        match parse_move_reply(raw) {
            Err(Error::InvalidReply { reason, .. }) => {
                assert!(reason.contains("no `move` field"), "reason: {reason}")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn parse_bare_token() {
        assert_eq!(parse_move_reply(" \"Up\"\n").unwrap(), Move::Up);
    }

    #[test]
    fn unknown_token_in_json_is_invalid() {
        let err = parse_move_reply(r#"{"move": "north"}"#).unwrap_err();
        match err {
            Error::InvalidReply { reason, raw } => {
                assert!(reason.contains("north"));
                assert!(raw.contains("north"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn object_without_move_is_invalid() {
        assert!(matches!(
            parse_move_reply(r#"{"direction": "up"}"#),
            Err(Error::InvalidReply { .. })
        ));
        assert!(matches!(
            parse_move_reply(r#"{"move": 3}"#),
            Err(Error::InvalidReply { .. })
        ));
    }

    #[test]
    fn prose_is_invalid() {
        assert!(parse_move_reply("I think going diagonally is best").is_err());
        assert!(parse_move_reply("").is_err());
    }

    #[test]
    fn evaluate_optimal_legal_and_illegal() {
        let maze = sample();
        let start = maze.start();

        let right = evaluate_move(&maze, start, Move::Right);
        assert_eq!(right.verdict, Verdict::Optimal);
        assert_eq!(right.distance_before, Some(4));
        assert_eq!(right.optimal_moves, vec![Move::Right, Move::Down]);

        let up = evaluate_move(&maze, start, Move::Up);
        assert_eq!(up.verdict, Verdict::Illegal);
        assert_eq!(up.legal_moves, vec![Move::Right, Move::Down]);

        let back = evaluate_move(&maze, Position::new(1, 1), Move::Up);
        assert_eq!(back.verdict, Verdict::Legal);
    }

    #[test]
    fn evaluate_on_goal_has_no_optimal_move() {
        let maze = sample();
        let eval = evaluate_move(&maze, maze.goal(), Move::Left);
        assert_eq!(eval.verdict, Verdict::Legal);
        assert_eq!(eval.distance_before, Some(0));
        assert!(eval.optimal_moves.is_empty());
    }

    #[test]
    fn evaluate_when_goal_unreachable() {
        let maze = Maze::parse("S.#G").unwrap();
        let eval = evaluate_move(&maze, maze.start(), Move::Right);
        assert_eq!(eval.distance_before, None);
        assert_eq!(eval.verdict, Verdict::Legal);
    }
}
