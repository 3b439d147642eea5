use crate::config::RunSettings;
use crate::error::{LlmError, LoomError, RolloutError, TranscriptError};
use crate::rollout::RolloutRunner;
use futures_util::stream::{self, StreamExt};
use std::path::{Path, PathBuf};

/// How one rollout of a batch ended.
#[derive(Debug)]
pub enum RolloutOutcome {
    Completed {
        index: u32,
        seed: u64,
        path: PathBuf,
    },
    /// A model call failed; the partial transcript was still written.
    Aborted {
        index: u32,
        turn: u32,
        path: PathBuf,
        error: LlmError,
    },
}

impl RolloutOutcome {
    pub fn index(&self) -> u32 {
        match self {
            Self::Completed { index, .. } | Self::Aborted { index, .. } => *index,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Completed { path, .. } | Self::Aborted { path, .. } => path,
        }
    }
}

/// `rollout_007.json`, or `rollout_007.partial.json` for an aborted run.
pub fn transcript_path(dir: &Path, index: u32, partial: bool) -> PathBuf {
    let suffix = if partial { ".partial" } else { "" };
    dir.join(format!("rollout_{index:03}{suffix}.json"))
}

/// Run `settings.rollouts` rollouts, at most `settings.concurrency()` at a
/// time, writing each transcript as it finishes. Outcomes come back in
/// rollout order.
pub async fn run_batch(
    runner: &RolloutRunner,
    settings: &RunSettings,
) -> Result<Vec<RolloutOutcome>, LoomError> {
    tokio::fs::create_dir_all(&settings.output_dir)
        .await
        .map_err(TranscriptError::from)?;

    let results: Vec<Result<RolloutOutcome, LoomError>> = stream::iter(0..settings.rollouts)
        .map(|index| run_one(runner, settings, index))
        .buffer_unordered(settings.concurrency())
        .collect()
        .await;

    let mut outcomes = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    outcomes.sort_by_key(RolloutOutcome::index);
    Ok(outcomes)
}

async fn run_one(
    runner: &RolloutRunner,
    settings: &RunSettings,
    index: u32,
) -> Result<RolloutOutcome, LoomError> {
    let seed = settings.rollout_seed(index);
    tracing::info!(index, seed, "rollout queued");

    match runner.execute(settings.turns, Some(seed)).await {
        Ok(transcript) => {
            let path = transcript_path(&settings.output_dir, index, false);
            transcript.write_to(&path).await?;
            Ok(RolloutOutcome::Completed { index, seed, path })
        }
        Err(RolloutError::Aborted {
            turn,
            source,
            partial,
        }) => {
            let path = transcript_path(&settings.output_dir, index, true);
            partial.write_to(&path).await?;
            tracing::warn!(index, turn, path = %path.display(), "partial transcript written");
            Ok(RolloutOutcome::Aborted {
                index,
                turn,
                path,
                error: source,
            })
        }
        Err(err) => Err(err.into()),
    }
}
