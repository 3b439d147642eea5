use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `loom` - long-horizon persona rollouts for evaluating conversational models.
#[derive(Parser, Debug)]
#[command(name = "loom")]
#[command(version)]
#[command(about = "Run scripted persona trajectories against a target model.", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a scenario file and print a summary
    Validate {
        /// Scenario TOML file
        config: PathBuf,
    },

    /// Show the per-turn schedule without calling any model
    DryRun {
        /// Scenario TOML file
        config: PathBuf,

        /// Number of turns to simulate (capped at the scenario's expected turns)
        #[arg(short, long, default_value_t = 10)]
        turns: u32,

        /// Emit a JSON array instead of text
        #[arg(long)]
        json: bool,
    },

    /// Execute rollouts and write one transcript per rollout
    Run {
        /// Scenario TOML file
        config: PathBuf,

        /// Persona model as provider/model (env: LOOM_PERSONA_MODEL)
        #[arg(long)]
        persona_model: Option<String>,

        /// Target model as provider/model (env: LOOM_TARGET_MODEL)
        #[arg(long)]
        target: Option<String>,

        /// Turns per rollout (default: the scenario's expected turns)
        #[arg(short, long)]
        turns: Option<u32>,

        /// Number of rollouts
        #[arg(short, long, default_value_t = 1)]
        rollouts: u32,

        /// Base seed; rollout i uses seed + i (env: LOOM_SEED)
        #[arg(long)]
        seed: Option<u64>,

        /// Sampling temperature, 0.0 - 2.0 (env: LOOM_TEMPERATURE, default 1.0)
        #[arg(long)]
        temperature: Option<f64>,

        /// Rollouts to run at once
        #[arg(short, long, default_value_t = 1)]
        concurrency: usize,

        /// Directory for transcript files
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dry_run_defaults() {
        let cli = Cli::parse_from(["loom", "dry-run", "scenario.toml"]);
        let Commands::DryRun { config, turns, json } = cli.command else {
            panic!("expected dry-run");
        };
        assert_eq!(config, PathBuf::from("scenario.toml"));
        assert_eq!(turns, 10);
        assert!(!json);
        assert!(!cli.verbose);
    }

    #[test]
    fn run_parses_all_flags() {
        let cli = Cli::parse_from([
            "loom",
            "run",
            "s.toml",
            "--persona-model",
            "mock/p",
            "--target",
            "openai/gpt-4.1",
            "--turns",
            "30",
            "--rollouts",
            "3",
            "--seed",
            "42",
            "--temperature",
            "0.7",
            "--concurrency",
            "2",
            "--output",
            "out",
            "--verbose",
        ]);
        assert!(cli.verbose);
        let Commands::Run {
            persona_model,
            target,
            turns,
            rollouts,
            seed,
            temperature,
            concurrency,
            output,
            ..
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(persona_model.as_deref(), Some("mock/p"));
        assert_eq!(target.as_deref(), Some("openai/gpt-4.1"));
        assert_eq!(turns, Some(30));
        assert_eq!(rollouts, 3);
        assert_eq!(seed, Some(42));
        assert!(temperature.is_some_and(|t| (t - 0.7).abs() < f64::EPSILON));
        assert_eq!(concurrency, 2);
        assert_eq!(output, PathBuf::from("out"));
    }

    #[test]
    fn run_requires_output() {
        assert!(Cli::try_parse_from(["loom", "run", "s.toml"]).is_err());
    }
}
