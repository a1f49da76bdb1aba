// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod cache;
mod command;
mod config;
mod debounce;
mod diagnostics;
mod error;
mod latest;
mod pipeline;
mod stages;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{ControlsTransition, apply};
pub use cache::{CacheKey, CacheStats, FilterCache};
pub use command::ControlCommand;
pub use config::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, DEFAULT_DEBOUNCE_MAX_WAIT,
    DEFAULT_DEBOUNCE_WINDOW, EngineConfig,
};
pub use debounce::Debouncer;
pub use diagnostics::{StructureFinding, StructureReport, build_fallback, validate_structure};
pub use error::CoreError;
pub use latest::{LatestOnly, RunTicket};
pub use pipeline::{
    FilterPipeline, FilterStage, PipelineOutcome, PipelineReport, SanitationReport, StageReport,
    run_pipeline,
};
pub use state::{AvailableOptions, ControlsPhase, ControlsState, is_all_selected};
