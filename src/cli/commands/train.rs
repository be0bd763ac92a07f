//! Train command - Train the agent in the simulator and evaluate it greedily

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::AppConfig,
    cli::{
        config::CommonArgs,
        output::{format_number, format_rate, print_kv, print_section},
    },
    pipeline::{
        EvaluationResult, Evaluator, JsonlObserver, MetricsObserver, MetricsSummary,
        ProgressObserver, SharedObserver, Trainer, TrainingResult,
    },
    q_learning::{GreedyPolicy, QLearningAgent},
    types::{Action, StateKey},
};

/// Greedy choice for one horizontal bucket
#[derive(Debug, Serialize)]
struct PolicyRow {
    bucket: usize,
    x_start: f64,
    ground: Action,
    air: Action,
    visited: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    config: &'a AppConfig,
    training: &'a TrainingResult,
    metrics: &'a MetricsSummary,
    evaluation: &'a EvaluationResult,
    policy: Vec<PolicyRow>,
}

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning agent")]
pub struct TrainArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for per-episode JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Include every transition in the observations file
    #[arg(long, default_value_t = false)]
    pub record_steps: bool,

    /// Print the learned action for every x bucket
    #[arg(long, default_value_t = false)]
    pub show_policy: bool,
}

/// Output of [`train_agent`]
pub(crate) struct TrainedAgent {
    pub agent: QLearningAgent,
    pub result: TrainingResult,
    pub metrics: MetricsSummary,
}

/// Build an agent and trainer from `config` and run training to completion.
pub(crate) fn train_agent(
    config: &AppConfig,
    progress: bool,
    observations: Option<JsonlObserver>,
) -> Result<TrainedAgent> {
    let mut agent = QLearningAgent::new(config.agent.clone())?;

    let metrics = SharedObserver::new(MetricsObserver::new());
    let metrics_handle = metrics.handle();

    let mut trainer = Trainer::from_config(config.world.clone(), config.training.clone())?
        .with_observer(Box::new(metrics));
    if progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(observer) = observations {
        trainer = trainer.with_observer(Box::new(observer));
    }

    let result = trainer.train(&mut agent)?;
    let metrics = metrics_handle
        .lock()
        .map_err(|_| anyhow::anyhow!("metrics observer lock poisoned"))?
        .summary();

    Ok(TrainedAgent {
        agent,
        result,
        metrics,
    })
}

fn policy_rows(agent: &QLearningAgent) -> Vec<PolicyRow> {
    let discretizer = agent.discretizer();
    (0..discretizer.x_bins())
        .map(|bucket| {
            let ground = StateKey::new(bucket * 2);
            let air = StateKey::new(bucket * 2 + 1);
            PolicyRow {
                bucket,
                x_start: bucket as f64 * discretizer.x_bin_size(),
                ground: agent.greedy_action(ground),
                air: agent.greedy_action(air),
                visited: agent.table().contains(ground) || agent.table().contains(air),
            }
        })
        .collect()
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

fn print_training(result: &TrainingResult, metrics: &MetricsSummary) {
    print_section("Training Complete");
    print_kv("Episodes", &format_number(result.episodes));
    print_kv(
        "Coin",
        &format!("{} ({})", result.coins, format_rate(result.coin_rate)),
    );
    print_kv("Obstacle", &result.obstacles.to_string());
    print_kv("Out of steps", &result.truncated.to_string());
    print_kv("Mean steps", &format!("{:.1}", result.mean_steps));
    print_kv("Mean return", &format!("{:.2}", result.mean_reward));
    print_kv("Final epsilon", &format!("{:.3}", result.final_epsilon));
    print_kv("States visited", &result.states_visited.to_string());
    print_kv(
        "Recent coin rate",
        &format_rate(metrics.recent_coin_rate),
    );
    match metrics.first_coin {
        Some(ep) => print_kv("First coin", &format!("episode {}", ep + 1)),
        None => print_kv("First coin", "never"),
    }
}

fn print_evaluation(evaluation: &EvaluationResult) {
    print_section("Greedy Evaluation");
    print_kv("Rollouts", &evaluation.rollouts.to_string());
    print_kv("Coin rate", &format_rate(evaluation.coin_rate));
    print_kv("Obstacle", &evaluation.obstacles.to_string());
    print_kv("Timeouts", &evaluation.timeouts.to_string());
    print_kv("Mean steps", &format!("{:.1}", evaluation.mean_steps));
    print_kv("Furthest x", &format!("{:.1}", evaluation.max_x));
}

fn print_policy(rows: &[PolicyRow]) {
    print_section("Learned Policy");
    println!("  {:>6} {:>8} {:>8} {:>8}", "bucket", "x", "ground", "air");
    for row in rows.iter().filter(|r| r.visited) {
        println!(
            "  {:>6} {:>8.1} {:>8} {:>8}",
            row.bucket, row.x_start, row.ground, row.air
        );
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.common.resolve()?;

    let observations = match &args.observations {
        Some(path) => {
            let observer = JsonlObserver::new(path)?;
            Some(if args.record_steps {
                observer.with_steps()
            } else {
                observer
            })
        }
        None => None,
    };

    let trained = train_agent(&config, args.common.progress(), observations)?;
    print_training(&trained.result, &trained.metrics);

    let evaluation = Evaluator::new(config.world.clone()).evaluate(
        &GreedyPolicy::new(&trained.agent),
        config.evaluation.rollouts,
        config.evaluation.max_steps,
    )?;
    print_evaluation(&evaluation);

    let rows = policy_rows(&trained.agent);
    if args.show_policy {
        print_policy(&rows);
    }

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        let summary = TrainingSummaryFile {
            config: &config,
            training: &trained.result,
            metrics: &trained.metrics,
            evaluation: &evaluation,
            policy: rows,
        };
        to_writer_pretty(file, &summary).context("Failed to write training summary")?;
        println!("\nSummary written to: {}", path.display());
    }

    Ok(())
}
