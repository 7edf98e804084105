//! PanelLab Core — panel data types, preprocessing, and estimation.
//!
//! This crate contains the statistical heart of the pipeline:
//! - Tabular and panel-indexed domain types (`RawTable`, `PanelFrame`)
//! - Panel preprocessing (entity keys, cleaning, index validation)
//! - Fixed-effects (within) and random-effects (Swamy–Arora) estimators
//! - Hausman comparison with a renderable summary table
//!
//! No I/O happens here; loading and persistence live in `panellab-runner`.

pub mod error;
pub mod estimators;
pub mod frame;
pub mod hausman;
pub mod preprocess;

pub use error::PanelError;
pub use estimators::{
    fixed_effects_fit, random_effects_fit, FixedEffectsResult, RandomEffectsResult,
};
pub use frame::{PanelFrame, RawTable};
pub use hausman::{compare, ModelComparison, SummaryTable};
pub use preprocess::preprocess_panel;
