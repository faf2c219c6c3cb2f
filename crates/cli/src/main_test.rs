#![allow(clippy::unwrap_used)]

use clap::{CommandFactory, Parser};

use crate::{Cli, Commands};

#[test]
fn verify_app() {
    Cli::command().debug_assert();
}

#[test]
fn test_long_version_format() {
    let long_version = Cli::command().render_long_version().to_string();
    // build.rs falls back to "unknown" outside a git checkout.
    let expected_format = regex::Regex::new(
        r"mazeprobe \d+\.\d+\.\d+ \(([0-9a-f]{7,40}|unknown) (\d{4}-\d{2}-\d{2}|unknown)\)",
    )
    .unwrap();
    assert!(
        expected_format.is_match(&long_version),
        "Long version string format mismatch: {}",
        long_version
    );
}

#[test]
fn run_parses_short_flags() {
    let cli = Cli::try_parse_from([
        "mazeprobe",
        "run",
        "-z",
        "5x5_corridor_straight",
        "-s",
        "list",
        "-p",
        "1,1",
        "-t",
        "high",
        "-H",
    ])
    .unwrap();
    match cli.command {
        Commands::Run {
            maze,
            strategy,
            position,
            model,
            think,
            history,
            dry_run,
            ..
        } => {
            assert_eq!(maze, "5x5_corridor_straight");
            assert_eq!(strategy, "list");
            assert_eq!(position, mazeprobe_kernel::Position::new(1, 1));
            assert!(model.is_none());
            assert_eq!(think.unwrap().to_string(), "high");
            assert!(history);
            assert!(!dry_run);
        }
        _ => panic!("expected run"),
    }
}

#[test]
fn run_rejects_bad_position_and_think() {
    assert!(
        Cli::try_parse_from(["mazeprobe", "run", "-z", "m", "-s", "list", "-p", "1;1"]).is_err()
    );
    assert!(
        Cli::try_parse_from([
            "mazeprobe", "run", "-z", "m", "-s", "list", "-p", "1,1", "-t", "max"
        ])
        .is_err()
    );
}

#[test]
fn run_requires_maze_strategy_position() {
    assert!(Cli::try_parse_from(["mazeprobe", "run", "-s", "list", "-p", "0,0"]).is_err());
    assert!(Cli::try_parse_from(["mazeprobe", "run", "-z", "m", "-p", "0,0"]).is_err());
    assert!(Cli::try_parse_from(["mazeprobe", "run", "-z", "m", "-s", "list"]).is_err());
}
