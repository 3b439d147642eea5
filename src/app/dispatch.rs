use crate::app::batch::{RolloutOutcome, run_batch};
use crate::app::dry_run;
use crate::cli::{Cli, Commands};
use crate::config::{RunSettings, ScenarioConfig};
use crate::providers::create_client;
use crate::rollout::RolloutRunner;
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// One-line summary printed by `loom validate`.
pub fn validation_summary(config: &ScenarioConfig) -> String {
    format!(
        "Config valid: {} ({} dimensions, {} phases, mode={})",
        config.persona_name(),
        config.trajectory.dimensions.len(),
        config.trajectory.phases.len(),
        config.trajectory.mode
    )
}

fn load(path: &Path) -> Result<Arc<ScenarioConfig>> {
    Ok(Arc::new(ScenarioConfig::load(path)?))
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate { config } => {
            let config = load(&config)?;
            println!("{}", validation_summary(&config));
            Ok(())
        }

        Commands::DryRun {
            config,
            turns,
            json,
        } => {
            let config = load(&config)?;
            let simulated = dry_run::simulate(config, turns)?;
            if json {
                println!("{}", dry_run::render_json(&simulated)?);
            } else {
                print!("{}", dry_run::render_text(&simulated));
            }
            Ok(())
        }

        Commands::Run {
            config,
            persona_model,
            target,
            turns,
            rollouts,
            seed,
            temperature,
            concurrency,
            output,
        } => {
            let mut settings = RunSettings {
                persona_model,
                target_model: target,
                turns,
                rollouts,
                seed,
                temperature,
                output_dir: output,
                concurrency,
            };
            settings.apply_env_overrides();
            let config = load(&config)?;
            run_rollouts(config, &settings).await
        }
    }
}

async fn run_rollouts(config: Arc<ScenarioConfig>, settings: &RunSettings) -> Result<()> {
    if let Some(t) = settings.temperature
        && !(0.0..=2.0).contains(&t)
    {
        bail!("temperature must be between 0.0 and 2.0, got {t}");
    }

    // Credentials are checked here, before any turn runs.
    let persona = create_client(settings.persona_model()?).context("persona model")?;
    let target = create_client(settings.target_model()?).context("target model")?;

    let runner = RolloutRunner::new(config, persona, target)
        .with_seed(settings.seed)
        .with_temperature(settings.temperature());

    info!(
        rollouts = settings.rollouts,
        concurrency = settings.concurrency(),
        output = %settings.output_dir.display(),
        "starting batch"
    );
    let outcomes = run_batch(&runner, settings).await?;

    let mut aborted = Vec::new();
    for outcome in outcomes {
        match outcome {
            RolloutOutcome::Completed { index, seed, path } => {
                println!(
                    "Rollout {index}/{} (seed={seed}) saved: {}",
                    settings.rollouts,
                    path.display()
                );
            }
            RolloutOutcome::Aborted {
                index,
                turn,
                path,
                error,
            } => {
                eprintln!(
                    "Rollout {index}/{} aborted at turn {turn}: {error} (partial: {})",
                    settings.rollouts,
                    path.display()
                );
                aborted.push(index);
            }
        }
    }

    if !aborted.is_empty() {
        bail!(
            "{} of {} rollout(s) aborted; partial transcripts written to {}",
            aborted.len(),
            settings.rollouts,
            settings.output_dir.display()
        );
    }
    println!(
        "\nDone. {} rollout(s) saved to {}",
        settings.rollouts,
        settings.output_dir.display()
    );
    Ok(())
}
