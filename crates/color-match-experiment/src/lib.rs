//! Color-Match Experiment: session engine for a visual perception study.
//!
//! A participant compares a fixed anchor swatch against an adjustable
//! swatch and submits when the two look identical, across 6 groups of 54
//! randomized trials separated by rest breaks. This crate implements the
//! engine behind that procedure:
//! - Deterministic 54-color pool, sampled without replacement per group
//! - Six fixed background pairs, shuffled once per session
//! - Trial logging with per-trial slider operation history
//! - CSV export of the full log on completion or early exit
//!
//! The view layer is external: it forwards discrete participant actions
//! into [`ExperimentSession`] and reads state back after each call.

pub mod background;
pub mod color;
pub mod error;
pub mod logger;
pub mod pool;
pub mod session;

pub use background::{BackgroundPair, BackgroundSchedule};
pub use color::{ColorSwatch, Hsl, hsb_to_hsl};
pub use error::{EmptyPoolError, OutOfRangeError, SessionError};
pub use logger::{EXPORT_FILE_NAME, TrialLogger, TrialRecord};
pub use pool::ColorPool;
pub use session::{
    ExitOutcome, ExperimentSession, GROUP_COUNT, MAX_ITERATIONS_PER_GROUP, Phase, SessionConfig,
    SubmitOutcome,
};
