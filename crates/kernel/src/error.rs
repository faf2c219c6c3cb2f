/// Top-level kernel error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("maze parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("position ({x},{y}) is not reachable from the start")]
    Unreachable { x: i32, y: i32 },

    #[error("unknown strategy `{name}` (known: {})", .known.join(", "))]
    UnknownStrategy { name: String, known: Vec<String> },

    #[error("invalid position ({x},{y}): {reason}")]
    InvalidPosition { x: i32, y: i32, reason: String },

    #[error("invalid model reply: {reason}")]
    InvalidReply { reason: String, raw: String },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_strategy_lists_known_names() {
        let err = Error::UnknownStrategy {
            name: "spiral".into(),
            known: vec!["ascii-grid".into(), "list".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("`spiral`"));
        assert!(msg.contains("ascii-grid, list"));
    }

    #[test]
    fn json_errors_convert_with_question_mark() {
        fn decode(s: &str) -> Result<serde_json::Value> {
            Ok(serde_json::from_str(s)?)
        }
        assert!(matches!(decode("{"), Err(Error::Json(_))));
        assert!(decode("{}").is_ok());
    }

    #[test]
    fn parse_error_names_line() {
        let err = Error::Parse {
            line: 3,
            reason: "unknown glyph `x`".into(),
        };
        assert_eq!(
            err.to_string(),
            "maze parse error at line 3: unknown glyph `x`"
        );
    }
}
