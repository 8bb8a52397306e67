//! Experiment session state machine.
//!
//! Ties the color pool, background schedule, and trial logger together and
//! drives the phase progression Active → Resting → Active → … → Completed.
//! The view layer forwards discrete participant actions into these methods
//! and reads whatever state it needs back out; there are no callbacks and
//! no implicit re-render triggers.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::RngCore;
use serde::Serialize;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::background::{BackgroundPair, BackgroundSchedule};
use crate::color::ColorSwatch;
use crate::error::SessionError;
use crate::logger::{OperationKind, OperationLogEntry, TrialLogger, TrialRecord};
use crate::pool::ColorPool;

/// Trials per group; one full pool drain.
pub const MAX_ITERATIONS_PER_GROUP: u32 = 54;
/// Total number of rest-separated groups.
pub const GROUP_COUNT: usize = 6;

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Trials are running; slider and submit actions are accepted.
    Active,
    /// Between groups; only `acknowledge_rest` advances the session.
    Resting,
    /// All groups done and the log exported.
    Completed,
}

/// Configuration for an experiment session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Random seed for reproducible sampling and shuffling (None for random)
    pub seed: Option<u64>,
    /// Directory the CSV export is written into
    pub output_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            output_dir: PathBuf::from("."),
        }
    }
}

/// What a successful `submit_trial` led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Next trial is ready with a freshly sampled anchor.
    Continued,
    /// Group finished; the session is resting until `acknowledge_rest`.
    RestBreak,
    /// Final group finished; the log was exported and the session is done.
    Completed { export_path: PathBuf },
}

/// What `request_exit` led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exit was not confirmed; nothing changed.
    Cancelled,
    /// Log exported; the caller should tear the session down.
    Terminated { export_path: PathBuf },
}

/// End-of-session summary, printed by the CLI as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub phase: Phase,
    /// 1-indexed group the session is in (or finished in).
    pub current_group: u32,
    pub trials_logged: usize,
    pub seed: Option<u64>,
}

/// The experiment session engine.
///
/// Owns all mutable experiment state: the color pool, the shuffled
/// background schedule, the trial log, and the current anchor/adjustable
/// swatch pair. Single-threaded by design; each operation runs to
/// completion before the next is dispatched.
pub struct ExperimentSession {
    config: SessionConfig,
    session_id: String,
    started_at: DateTime<Utc>,
    rng: Box<dyn RngCore>,
    pool: ColorPool,
    backgrounds: BackgroundSchedule,
    logger: TrialLogger,
    phase: Phase,
    group: usize,
    iteration: u32,
    anchor: ColorSwatch,
    adjustable: ColorSwatch,
    lightness: f64,
    pending_ops: Vec<OperationLogEntry>,
}

impl ExperimentSession {
    /// Start a new session: build and shuffle the background schedule, fill
    /// the pool, and sample the first swatch into both the anchor and the
    /// adjustable side.
    pub fn start(config: SessionConfig) -> Result<Self, SessionError> {
        let mut rng: Box<dyn RngCore> = match config.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(rand::rng()),
        };

        let backgrounds = BackgroundSchedule::shuffled(&mut rng);
        backgrounds.pair_for_group(0)?;

        let mut pool = ColorPool::new();
        let first = pool.sample(&mut rng)?;

        let session_id = Uuid::new_v4().to_string();
        info!(
            session_id = %session_id,
            seed = ?config.seed,
            groups = GROUP_COUNT,
            iterations_per_group = MAX_ITERATIONS_PER_GROUP,
            "session started"
        );

        Ok(Self {
            config,
            session_id,
            started_at: Utc::now(),
            rng,
            pool,
            backgrounds,
            logger: TrialLogger::new(),
            phase: Phase::Active,
            group: 0,
            iteration: 0,
            anchor: first,
            adjustable: first,
            lightness: first.to_hsl().l,
            pending_ops: Vec::new(),
        })
    }

    /// Adjust the saturation of the adjustable swatch and log the operation.
    pub fn adjust_saturation(&mut self, value: f64) -> Result<(), SessionError> {
        self.ensure_phase("adjust_saturation", Phase::Active)?;
        self.adjustable.saturation = value;
        self.lightness = self.adjustable.to_hsl().l;
        self.pending_ops.push(OperationLogEntry {
            kind: OperationKind::Saturation,
            value,
        });
        Ok(())
    }

    /// Adjust the brightness of the adjustable swatch and log the operation.
    pub fn adjust_brightness(&mut self, value: f64) -> Result<(), SessionError> {
        self.ensure_phase("adjust_brightness", Phase::Active)?;
        self.adjustable.brightness = value;
        self.lightness = self.adjustable.to_hsl().l;
        self.pending_ops.push(OperationLogEntry {
            kind: OperationKind::Brightness,
            value,
        });
        Ok(())
    }

    /// Snap the adjustable swatch back to the anchor. Operations logged
    /// before the reset stay attached to the eventual trial record.
    pub fn reset_adjustable(&mut self) -> Result<(), SessionError> {
        self.ensure_phase("reset_adjustable", Phase::Active)?;
        self.adjustable = self.anchor;
        self.lightness = self.adjustable.to_hsl().l;
        debug!("adjustable swatch reset to anchor");
        Ok(())
    }

    /// Record the current trial and advance the session.
    ///
    /// Appends a trial record, clears the pending operations, and either
    /// samples the next swatch, enters the rest break at a group boundary,
    /// or exports the log and completes after the final group.
    pub fn submit_trial(&mut self) -> Result<SubmitOutcome, SessionError> {
        self.ensure_phase("submit_trial", Phase::Active)?;

        let next_iteration = self.iteration + 1;

        // Draw the next swatch before touching any state: a failed draw
        // must leave the iteration and log exactly as they were.
        let next_swatch = if next_iteration < MAX_ITERATIONS_PER_GROUP {
            match self.pool.sample(&mut self.rng) {
                Ok(swatch) => Some(swatch),
                Err(e) => {
                    error!(
                        group = self.group + 1,
                        iteration = self.iteration + 1,
                        "color pool exhausted mid-group"
                    );
                    return Err(e.into());
                }
            }
        } else {
            None
        };

        let pair = self.backgrounds.pair_for_group(self.group)?;
        let record = TrialRecord {
            group: (self.group + 1) as u32,
            iteration: next_iteration,
            left_color: self.anchor.to_string(),
            right_color: self.adjustable.to_string(),
            left_background: pair.left.clone(),
            right_background: pair.right.clone(),
            operations: std::mem::take(&mut self.pending_ops),
        };
        self.logger.append(record);
        self.iteration = next_iteration;

        match next_swatch {
            Some(swatch) => {
                self.apply_swatch(swatch);
                Ok(SubmitOutcome::Continued)
            }
            None if self.group + 1 < GROUP_COUNT => {
                self.phase = Phase::Resting;
                info!(
                    group = self.group + 1,
                    trials = self.logger.len(),
                    "group finished, resting"
                );
                Ok(SubmitOutcome::RestBreak)
            }
            None => {
                // Terminal either way; a failed export can be re-run
                // through `request_exit`.
                self.phase = Phase::Completed;
                info!(trials = self.logger.len(), "all groups completed");
                let export_path = self.logger.export(&self.config.output_dir)?;
                Ok(SubmitOutcome::Completed { export_path })
            }
        }
    }

    /// Leave the rest break: advance to the next group with a fresh pool,
    /// that group's background pair, and a newly sampled swatch.
    pub fn acknowledge_rest(&mut self) -> Result<(), SessionError> {
        self.ensure_phase("acknowledge_rest", Phase::Resting)?;

        let next_group = self.group + 1;
        self.backgrounds.pair_for_group(next_group)?;

        self.pool.reset();
        let swatch = self.pool.sample(&mut self.rng)?;

        self.group = next_group;
        self.iteration = 0;
        self.apply_swatch(swatch);
        self.phase = Phase::Active;

        info!(group = next_group + 1, "rest over, next group started");
        Ok(())
    }

    /// Exit the session early. Without confirmation nothing changes; with
    /// confirmation the current log is exported regardless of completion
    /// state and the caller should tear the session down.
    pub fn request_exit(&mut self, confirmed: bool) -> Result<ExitOutcome, SessionError> {
        if !confirmed {
            debug!("exit request cancelled");
            return Ok(ExitOutcome::Cancelled);
        }
        let export_path = self.logger.export(&self.config.output_dir)?;
        info!(
            trials = self.logger.len(),
            phase = ?self.phase,
            "session exited, log exported"
        );
        Ok(ExitOutcome::Terminated { export_path })
    }

    fn apply_swatch(&mut self, swatch: ColorSwatch) {
        self.anchor = swatch;
        self.adjustable = swatch;
        self.lightness = swatch.to_hsl().l;
    }

    fn ensure_phase(
        &self,
        operation: &'static str,
        expected: Phase,
    ) -> Result<(), SessionError> {
        if self.phase != expected {
            return Err(SessionError::PhaseViolation {
                operation,
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    // Read accessors for the view layer.

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 0-indexed group.
    pub fn group(&self) -> usize {
        self.group
    }

    /// 1-indexed group, as shown to the participant.
    pub fn displayed_group(&self) -> u32 {
        (self.group + 1) as u32
    }

    /// 0-indexed iteration within the current group.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// 1-indexed iteration, as shown to the participant.
    pub fn displayed_iteration(&self) -> u32 {
        self.iteration + 1
    }

    /// Fraction of the current group already submitted, for a progress bar.
    pub fn progress(&self) -> f64 {
        f64::from(self.iteration) / f64::from(MAX_ITERATIONS_PER_GROUP)
    }

    pub fn anchor(&self) -> ColorSwatch {
        self.anchor
    }

    pub fn adjustable(&self) -> ColorSwatch {
        self.adjustable
    }

    /// HSL lightness of the adjustable swatch, recomputed on every
    /// adjustment.
    pub fn display_lightness(&self) -> f64 {
        self.lightness
    }

    pub fn current_background(&self) -> Result<&BackgroundPair, SessionError> {
        Ok(self.backgrounds.pair_for_group(self.group)?)
    }

    pub fn pool_remaining(&self) -> usize {
        self.pool.remaining()
    }

    pub fn trials_logged(&self) -> usize {
        self.logger.len()
    }

    pub fn records(&self) -> &[TrialRecord] {
        self.logger.records()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            started_at: self.started_at,
            ended_at: Utc::now(),
            phase: self.phase,
            current_group: self.displayed_group(),
            trials_logged: self.logger.len(),
            seed: self.config.seed,
        }
    }
}
