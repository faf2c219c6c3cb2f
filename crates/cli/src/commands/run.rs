use std::path::PathBuf;

use anyhow::{Context, Result};
use mazeprobe_kernel::Position;
use mazeprobe_kernel::message::{Message, Think};
use mazeprobe_kernel::probe::{self, Probe, ProbeRequest};
use mazeprobe_kernel::registry;
use mazeprobe_kernel::reply::{MoveEvaluation, evaluate_move, parse_move_reply};
use mazeprobe_router::{Router, RouterResponse};
use tracing::warn;

use super::load_config;

pub struct RunArgs {
    pub maze: String,
    pub strategy: String,
    pub position: Position,
    pub model: Option<String>,
    pub think: Option<Think>,
    pub history: bool,
    pub dry_run: bool,
    pub root: PathBuf,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let config = load_config(&args.root)?;
    let model = args.model.unwrap_or_else(|| config.model.clone());
    let think = args.think.unwrap_or(config.think);

    let router = Router::from_config(&config);
    if !args.dry_run {
        router.preflight_check(&model)?;
    }

    let request = ProbeRequest {
        maze_path: config.resolve_maze_path(&args.maze),
        strategy: args.strategy,
        position: args.position,
        include_history: args.history,
    };
    let probe = probe::prepare(&request, registry())
        .with_context(|| format!("failed to prepare probe for maze `{}`", args.maze))?;

    println!("=== Conditions ===");
    println!("model: {model}");
    println!("maze: {}", args.maze);
    println!("strategy: {}", probe.strategy_name());
    println!("position: {}", probe.position);
    println!("history: {}", if probe.history.is_some() { "yes" } else { "no" });
    println!("think: {think}");
    println!();

    println!("=== Prompt ===");
    println!("{}", probe.prompt);
    println!();

    if args.dry_run {
        println!("=== Schema ===");
        println!("{}", serde_json::to_string_pretty(&probe.schema)?);
        return Ok(());
    }

    let messages = [Message::user(probe.prompt.as_str())];
    let response = router
        .chat(&model, &messages, think, Some(&probe.schema))
        .await
        .with_context(|| format!("chat call to `{model}` failed"))?;

    print_response(&response);
    print_verdict(&probe, &response);
    Ok(())
}

fn print_response(response: &RouterResponse) {
    println!("=== thinking ===");
    println!("{}", response.thinking.as_deref().unwrap_or(""));
    println!();
    println!("=== content ===");
    println!("{}", response.content);
    println!();
}

/// An unusable reply is a finding about the model, so it is reported
/// rather than turned into a process failure.
fn print_verdict(probe: &Probe, response: &RouterResponse) {
    println!("=== Verdict ===");
    match parse_move_reply(&response.content) {
        Ok(mv) => {
            let eval = evaluate_move(&probe.maze, probe.position, mv);
            print_evaluation(&eval);
        }
        Err(e) => {
            warn!(error = %e, "reply could not be parsed");
            println!("move: invalid");
            println!("reason: {e}");
        }
    }
    println!(
        "tokens: {} prompt + {} completion, {} ms",
        response.prompt_tokens, response.completion_tokens, response.latency_ms
    );
}

fn print_evaluation(eval: &MoveEvaluation) {
    let join = |moves: &[mazeprobe_kernel::Move]| {
        if moves.is_empty() {
            "none".to_string()
        } else {
            moves.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
        }
    };
    println!("move: {}", eval.chosen);
    println!("verdict: {}", eval.verdict.as_str());
    println!("legal moves: {}", join(&eval.legal_moves));
    println!("optimal moves: {}", join(&eval.optimal_moves));
    match eval.distance_before {
        Some(d) => println!("distance to goal: {d}"),
        None => println!("distance to goal: unreachable"),
    }
}
