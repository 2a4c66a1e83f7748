//! Trains every algorithm and compares the greedy policies against basic
//! strategy.

#![allow(clippy::missing_docs_in_private_items)]

use bjrl::{
    Agent, AgentOptions, Algorithm, BasicStrategy, Error, SweepOptions, decay_grid,
    evaluate_policy, mean_return, run_trials,
};
use tracing_subscriber::EnvFilter;

const SEED: u64 = 42;
const TRAIN_EPISODES: usize = 200_000;
const EVAL_EPISODES: usize = 200_000;
const DECAY_FACTOR: f64 = 100.0;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let baseline = mean_return(&evaluate_policy(&mut BasicStrategy, SEED, EVAL_EPISODES)?);
    println!("{:<16} {baseline:+.4}", "basic strategy");

    for algorithm in Algorithm::ALL {
        let mut options = AgentOptions::default()
            .with_algorithm(algorithm)
            .with_seed(SEED)
            .with_log_interval(50_000);
        if algorithm.requires_exploration() {
            options = options.with_decay_factor(DECAY_FACTOR);
        }

        let mut agent = Agent::new(options)?;
        let train_returns = agent.train(TRAIN_EPISODES)?;
        let eval_returns = agent.evaluate(EVAL_EPISODES)?;
        println!(
            "{:<16} train {:+.4}  eval {:+.4}",
            algorithm.name(),
            mean_return(&train_returns),
            mean_return(&eval_returns),
        );
    }

    println!();
    println!("decay factor sweep");
    let sweep = SweepOptions {
        train_episodes: TRAIN_EPISODES / 10,
        eval_episodes: EVAL_EPISODES / 10,
        seed: SEED,
    };
    for report in run_trials(&decay_grid(250, 1_000)?, &sweep)? {
        let decay = report
            .trial
            .decay_factor
            .map_or_else(|| "-".to_owned(), |factor| format!("{factor}"));
        println!(
            "{:<16} decay {decay:>6}  eval {:+.4}",
            report.trial.algorithm.name(),
            report.mean_return
        );
    }

    Ok(())
}
