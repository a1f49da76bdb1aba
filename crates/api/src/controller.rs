// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The demand matrix controller.
//!
//! The controller wires the controls state, the filter pipeline, the
//! debouncer and the latest-only guard together behind the operations a
//! dashboard view calls.
//!
//! Two selections are tracked:
//!
//! - the **live** selection, changed immediately by every command
//! - the **committed** selection, which the pipeline runs against
//!
//! Toggles only change the live selection and start (or extend) a debounce
//! window. Every other command commits at once, taking any pending toggles
//! with it.

use crate::csv_export::{CapacityLookup, export_csv};
use crate::error::ApiError;
use crate::request_response::{
    CommandResponse, ControlsSnapshot, DatasetEnvelope, MatrixResponse,
};
use demand_matrix::{
    AvailableOptions, ControlCommand, ControlsState, ControlsTransition, Debouncer, EngineConfig,
    FilterPipeline, LatestOnly, PipelineOutcome, RunTicket, StructureReport, apply, run_pipeline,
    validate_structure,
};
use demand_matrix_domain::{
    Clock, DemandDataset, FilterSelection, MonthKey, MonthRange, ReferenceEntry,
    SelectionDimension, SystemClock,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use time::Date;
use tracing::{debug, info};

/// A pipeline run handed out for execution off the controller.
///
/// Holds everything needed to compute the result without borrowing the
/// controller. Hand the outcome back through
/// [`DemandMatrixController::complete_run`].
#[derive(Debug, Clone)]
pub struct PendingRun {
    /// Identifies this run for the latest-only check.
    pub ticket: RunTicket,
    /// The dataset to filter.
    pub dataset: Arc<DemandDataset>,
    /// The committed selection at the time the run was prepared.
    pub selection: FilterSelection,
    /// The date used for horizon fallbacks.
    pub today: Date,
}

impl PendingRun {
    /// Computes the outcome for this run.
    #[must_use]
    pub fn execute(&self) -> PipelineOutcome {
        run_pipeline(&self.dataset, &self.selection, self.today)
    }
}

/// The accepted outcome for the committed selection.
#[derive(Debug, Clone)]
struct CurrentOutcome {
    outcome: PipelineOutcome,
    accepted_at: Instant,
    month: MonthKey,
}

/// The façade a dashboard view talks to.
#[derive(Debug)]
pub struct DemandMatrixController {
    controls: ControlsState,
    committed: FilterSelection,
    dataset: Arc<DemandDataset>,
    available_clients: Vec<ReferenceEntry>,
    available_preferred_staff: Vec<ReferenceEntry>,
    capacity: CapacityLookup,
    pipeline: FilterPipeline,
    debouncer: Debouncer,
    latest: LatestOnly,
    current: Option<CurrentOutcome>,
    result_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl DemandMatrixController {
    /// Creates a controller with no dataset loaded.
    ///
    /// # Arguments
    ///
    /// * `config` - Engine tunables
    /// * `clock` - Time source for debouncing, cache expiry and fallbacks
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &EngineConfig, clock: Arc<dyn Clock>) -> Result<Self, ApiError> {
        let pipeline: FilterPipeline = FilterPipeline::from_config(config, Arc::clone(&clock))?;
        let debouncer: Debouncer = Debouncer::new(config.debounce_window, Arc::clone(&clock))
            .with_max_wait(config.debounce_max_wait);

        Ok(Self {
            controls: ControlsState::new(),
            committed: FilterSelection::default(),
            dataset: Arc::new(DemandDataset::default()),
            available_clients: Vec::new(),
            available_preferred_staff: Vec::new(),
            capacity: CapacityLookup::new(),
            pipeline,
            debouncer,
            latest: LatestOnly::new(),
            current: None,
            result_ttl: config.cache_ttl,
            clock,
        })
    }

    /// Creates a controller driven by the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_system_clock(config: &EngineConfig) -> Result<Self, ApiError> {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Replaces the dataset and its reference lists.
    ///
    /// The first dataset with data initializes the controls to "everything
    /// available". Later loads keep the user's selections. Loading commits
    /// immediately.
    pub fn load_dataset(&mut self, envelope: DatasetEnvelope) -> CommandResponse {
        let DatasetEnvelope {
            dataset,
            available_clients,
            available_preferred_staff,
            capacity,
        } = envelope;

        let available: AvailableOptions = AvailableOptions::from_dataset(
            &dataset,
            &available_clients,
            &available_preferred_staff,
        );
        let has_data: bool = !dataset.is_empty();

        info!(
            data_points = dataset.data_points.len(),
            months = dataset.months.len(),
            skills = dataset.skills.len(),
            clients = available_clients.len(),
            preferred_staff = available_preferred_staff.len(),
            "Loading demand dataset"
        );

        self.dataset = Arc::new(dataset);
        self.available_clients = available_clients;
        self.available_preferred_staff = available_preferred_staff;
        self.capacity = CapacityLookup::from_entries(&capacity);

        let response: CommandResponse =
            self.dispatch(ControlCommand::ObserveDataset { available, has_data });
        // The dataset changed even if the selection did not.
        self.commit();
        response
    }

    /// Toggles a skill in the live selection.
    pub fn on_skill_toggle(&mut self, skill: &str) -> CommandResponse {
        self.toggle(SelectionDimension::Skill, skill)
    }

    /// Toggles a client in the live selection.
    pub fn on_client_toggle(&mut self, client_id: &str) -> CommandResponse {
        self.toggle(SelectionDimension::Client, client_id)
    }

    /// Toggles a preferred staff member in the live selection.
    ///
    /// Never changes the preferred staff filter mode.
    pub fn on_preferred_staff_toggle(&mut self, staff_id: &str) -> CommandResponse {
        self.toggle(SelectionDimension::PreferredStaff, staff_id)
    }

    /// Changes the preferred staff filter mode.
    ///
    /// # Errors
    ///
    /// Returns an error if `mode` is not all, specific, or none.
    pub fn on_preferred_staff_filter_mode_change(
        &mut self,
        mode: &str,
    ) -> Result<CommandResponse, ApiError> {
        let command: ControlCommand = ControlCommand::filter_mode(mode)?;
        Ok(self.dispatch(command))
    }

    /// Stores a month range. Out-of-range values are corrected when the
    /// pipeline runs, not here.
    pub fn on_month_range_change(&mut self, range: MonthRange) -> CommandResponse {
        self.dispatch(ControlCommand::SetMonthRange { range })
    }

    /// Restores every selection to "everything available".
    pub fn on_reset(&mut self) -> CommandResponse {
        self.dispatch(ControlCommand::Reset)
    }

    /// Commits pending toggles regardless of the debounce window.
    ///
    /// Returns whether anything was committed.
    pub fn flush(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(events) => {
                debug!(events, "Flushing pending toggles");
                self.commit();
                true
            }
            None => false,
        }
    }

    /// Commits pending toggles if the debounce window has elapsed.
    ///
    /// Returns whether anything was committed.
    pub fn poll(&mut self) -> bool {
        match self.debouncer.poll() {
            Some(events) => {
                debug!(events, "Debounce window elapsed, committing toggles");
                self.commit();
                true
            }
            None => false,
        }
    }

    /// Returns whether toggles are waiting for the debounce window.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Returns the filtered dataset for the committed selection.
    pub fn get_filtered_data(&mut self) -> DemandDataset {
        self.get_filtered_outcome().dataset
    }

    /// Returns the filtered dataset and its pipeline report.
    ///
    /// The accepted outcome is reused until the next commit, the cache TTL
    /// or the end of the calendar month, whichever comes first.
    pub fn get_filtered_outcome(&mut self) -> PipelineOutcome {
        if let Some(outcome) = self.fresh_outcome() {
            return outcome.clone();
        }

        let ticket: RunTicket = self.latest.issue();
        let outcome: PipelineOutcome = self
            .pipeline
            .apply_with_report(&self.dataset, &self.committed);
        self.complete_run(ticket, outcome.clone());
        outcome
    }

    /// Returns the filtered matrix together with the controls it came from.
    pub fn matrix(&mut self) -> MatrixResponse {
        let outcome: PipelineOutcome = self.get_filtered_outcome();
        MatrixResponse {
            dataset: outcome.dataset,
            report: outcome.report,
            controls: self.controls(),
            cache: self.pipeline.cache_stats(),
        }
    }

    /// Returns the controls as a UI would render them.
    #[must_use]
    pub fn controls(&self) -> ControlsSnapshot {
        ControlsSnapshot::new(&self.controls, &self.committed, self.is_pending())
    }

    /// Validates the structure of the loaded dataset.
    #[must_use]
    pub fn diagnostics(&self) -> StructureReport {
        validate_structure(&self.dataset)
    }

    /// Exports the filtered dataset as CSV using the loaded capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV writer fails.
    pub fn export_csv(&mut self) -> Result<String, ApiError> {
        let dataset: DemandDataset = self.get_filtered_data();
        export_csv(&dataset, &self.capacity)
    }

    /// Returns the reference lists of the loaded dataset.
    #[must_use]
    pub fn reference_lists(&self) -> (&[ReferenceEntry], &[ReferenceEntry]) {
        (&self.available_clients, &self.available_preferred_staff)
    }

    /// Prepares a run of the committed selection for execution elsewhere.
    ///
    /// Any run prepared earlier is superseded.
    #[must_use]
    pub fn prepare_run(&self) -> PendingRun {
        PendingRun {
            ticket: self.latest.issue(),
            dataset: Arc::clone(&self.dataset),
            selection: self.committed.clone(),
            today: self.clock.today(),
        }
    }

    /// Accepts the outcome of a prepared run if no newer run or commit has
    /// superseded it.
    ///
    /// Returns whether the outcome was accepted.
    pub fn complete_run(&mut self, ticket: RunTicket, outcome: PipelineOutcome) -> bool {
        match self.latest.accept(ticket, outcome) {
            Some(outcome) => {
                self.current = Some(CurrentOutcome {
                    outcome,
                    accepted_at: self.clock.now(),
                    month: MonthKey::from_date(self.clock.today()),
                });
                true
            }
            None => false,
        }
    }

    fn fresh_outcome(&self) -> Option<&PipelineOutcome> {
        let current: &CurrentOutcome = self.current.as_ref()?;
        let age: Duration = self.clock.now().saturating_duration_since(current.accepted_at);
        if age >= self.result_ttl || MonthKey::from_date(self.clock.today()) != current.month {
            debug!(age_secs = age.as_secs(), "Accepted outcome is stale");
            return None;
        }
        Some(&current.outcome)
    }

    fn toggle(&mut self, dimension: SelectionDimension, id: &str) -> CommandResponse {
        self.dispatch(ControlCommand::Toggle {
            dimension,
            id: id.to_string(),
        })
    }

    fn dispatch(&mut self, command: ControlCommand) -> CommandResponse {
        let ControlsTransition {
            new_state,
            changed,
            coalesce,
        } = apply(&self.controls, command);
        self.controls = new_state;

        if coalesce {
            if changed {
                self.debouncer.record();
            }
        } else {
            self.debouncer.cancel();
            if self.committed != self.controls.snapshot() {
                self.commit();
            }
        }

        CommandResponse {
            changed,
            pending: self.is_pending(),
        }
    }

    /// Makes the live selection the committed one and supersedes any
    /// in-flight run.
    fn commit(&mut self) {
        self.committed = self.controls.snapshot();
        self.current = None;
        let _superseded: RunTicket = self.latest.issue();
    }
}
