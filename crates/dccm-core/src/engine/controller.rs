use super::config::{RenderConfig, SelectionState};
use super::error::EngineError;
use super::extraction::extract;
use super::progress::{Progress, ProgressReporter};
use super::view::{PointEmphasis, RenderBuffers, SliceView};
use crate::core::io::dccm::DccmFile;
use crate::core::models::dataset::{CorrelationDataset, IndexError};
use crate::core::models::ids::SliceViewId;
use slotmap::SlotMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Valid values for the slice selector of the current dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub min: i32,
    pub max: i32,
}

impl SelectionRange {
    pub fn for_slices(num_slices: usize) -> Self {
        let count = i32::try_from(num_slices).unwrap_or(i32::MAX);
        Self {
            min: SelectionState::ALL_SLICES,
            max: count - 1,
        }
    }
}

pub type RangeCallback<'a> = Box<dyn Fn(SelectionRange) + Send + Sync + 'a>;

/// Identifies one load attempt. Only the most recently issued ticket can apply its
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { range: SelectionRange },
    /// A newer load was started after this one; its result was dropped.
    Discarded,
}

/// Owns the materialized slice views of the current dataset.
///
/// Views live in an arena keyed by [`SliceViewId`] and are tagged with the rebuild
/// generation that created them. A rebuild retires the whole previous generation
/// before any new view is built, so at most one generation is ever live.
///
/// Dataset loads go through [`begin_load`](Self::begin_load) /
/// [`apply_load`](Self::apply_load): when loads overlap, only the last one started
/// is applied, and a failed load leaves the current views untouched.
pub struct SliceSetController<'a> {
    config: RenderConfig,
    dataset: Option<Arc<CorrelationDataset>>,
    views: SlotMap<SliceViewId, SliceView>,
    slots: Vec<Option<SliceViewId>>,
    rebuild_generation: u64,
    load_generation: u64,
    on_range: Option<RangeCallback<'a>>,
    progress: ProgressReporter<'a>,
}

impl<'a> SliceSetController<'a> {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            dataset: None,
            views: SlotMap::with_key(),
            slots: Vec::new(),
            rebuild_generation: 0,
            load_generation: 0,
            on_range: None,
            progress: ProgressReporter::new(),
        }
    }

    /// Registers the collaborator that is told the selectable slice range after
    /// every applied load.
    pub fn with_range_callback(mut self, callback: RangeCallback<'a>) -> Self {
        self.on_range = Some(callback);
        self
    }

    pub fn with_progress(mut self, reporter: ProgressReporter<'a>) -> Self {
        self.progress = reporter;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn dataset(&self) -> Option<&Arc<CorrelationDataset>> {
        self.dataset.as_ref()
    }

    pub fn rebuild_generation(&self) -> u64 {
        self.rebuild_generation
    }

    /// Replaces the configuration and rebuilds. The selection is reset to all slices
    /// if it is out of range for the loaded dataset.
    pub fn reconfigure(&mut self, mut config: RenderConfig) -> Result<usize, EngineError> {
        if let Some(dataset) = &self.dataset {
            config.selection = config.selection.clamped_to(dataset.num_slices());
        }
        self.config = config;
        self.rebuild_all()
    }

    /// Issues a ticket for a new load, superseding every earlier ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        debug!(ticket = self.load_generation, "Started dataset load.");
        LoadTicket {
            generation: self.load_generation,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.load_generation
    }

    /// Applies the result of the load identified by `ticket`.
    ///
    /// Results of superseded tickets are dropped silently, successful or not. A failed
    /// current load is returned as an error and the existing views are kept.
    #[instrument(skip_all, name = "apply_load", fields(ticket = ticket.generation))]
    pub fn apply_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<CorrelationDataset, EngineError>,
    ) -> Result<LoadOutcome, EngineError> {
        if !self.is_current(ticket) {
            debug!(
                current = self.load_generation,
                "Discarding result of a superseded load."
            );
            return Ok(LoadOutcome::Discarded);
        }

        let dataset = match result {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!(error = %e, "Dataset load failed; keeping the previous slice views.");
                return Err(e);
            }
        };

        let range = self.on_new_dataset_loaded(Arc::new(dataset))?;
        Ok(LoadOutcome::Applied { range })
    }

    /// Decodes `bytes` and applies them as a fresh load.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<LoadOutcome, EngineError> {
        let ticket = self.begin_load();
        let result = DccmFile::decode(bytes).map_err(EngineError::from);
        self.apply_load(ticket, result)
    }

    /// Installs a new dataset, resets an out-of-range selection, reports the valid
    /// selection range and rebuilds all views.
    pub fn on_new_dataset_loaded(
        &mut self,
        dataset: Arc<CorrelationDataset>,
    ) -> Result<SelectionRange, EngineError> {
        let num_slices = dataset.num_slices();
        let selection = self.config.selection.clamped_to(num_slices);
        if selection != self.config.selection {
            info!(
                requested = self.config.selection.selected_slice(),
                num_slices, "Selected slice is out of range; showing all slices."
            );
            self.config.selection = selection;
        }
        info!(
            num_slices,
            num_atoms = dataset.num_atoms(),
            "Loaded correlation dataset."
        );
        self.dataset = Some(dataset);

        let range = SelectionRange::for_slices(num_slices);
        if let Some(cb) = &self.on_range {
            cb(range);
        }

        self.rebuild_all()?;
        Ok(range)
    }

    /// Retires the live generation and materializes a new one from the current
    /// dataset and configuration. Returns the number of views built.
    #[instrument(skip_all, name = "rebuild_all")]
    pub fn rebuild_all(&mut self) -> Result<usize, EngineError> {
        let retired = self.dispose();
        self.rebuild_generation += 1;
        let generation = self.rebuild_generation;

        let Some(dataset) = self.dataset.clone() else {
            debug!(generation, "No dataset loaded; nothing to build.");
            return Ok(0);
        };

        let plan: Vec<(usize, PointEmphasis)> = (0..dataset.num_slices())
            .filter_map(|s| self.config.selection.emphasis_for(s).map(|e| (s, e)))
            .collect();

        self.progress.report(Progress::SlicesStart {
            total: plan.len() as u64,
        });
        let built = build_views(&dataset, &self.config, &plan, generation, &self.progress)?;
        self.progress.report(Progress::SlicesFinish);

        self.slots = vec![None; dataset.num_slices()];
        let mut total_points = 0;
        for view in built {
            let slice_index = view.slice_index;
            total_points += view.len();
            self.slots[slice_index] = Some(self.views.insert(view));
        }

        info!(
            generation,
            retired,
            views = plan.len(),
            points = total_points,
            "Rebuilt slice views."
        );
        Ok(plan.len())
    }

    /// Releases every view of the live generation. Returns how many were released.
    pub fn dispose(&mut self) -> usize {
        let generation = self.rebuild_generation;
        let before = self.views.len();
        self.views.retain(|_, view| view.generation != generation);
        self.slots.clear();
        before - self.views.len()
    }

    /// Generations that currently own at least one view.
    pub fn live_generations(&self) -> BTreeSet<u64> {
        self.views.values().map(|v| v.generation).collect()
    }

    pub fn num_views(&self) -> usize {
        self.views.len()
    }

    /// Live views in slice order. Skipped slices have no entry.
    pub fn views(&self) -> impl Iterator<Item = &SliceView> + '_ {
        self.slots
            .iter()
            .flatten()
            .filter_map(|id| self.views.get(*id))
    }

    pub fn view(&self, slice_index: usize) -> Option<&SliceView> {
        let id = self.slots.get(slice_index).copied().flatten()?;
        self.views.get(id)
    }

    pub fn render_buffers(&self) -> Vec<RenderBuffers> {
        self.views()
            .map(|view| view.render_buffers(&self.config.layout))
            .collect()
    }
}

fn build_views(
    dataset: &CorrelationDataset,
    config: &RenderConfig,
    plan: &[(usize, PointEmphasis)],
    generation: u64,
    progress: &ProgressReporter<'_>,
) -> Result<Vec<SliceView>, IndexError> {
    let build = |&(slice_index, emphasis): &(usize, PointEmphasis)| -> Result<SliceView, IndexError> {
        let matrix = dataset.expand_slice(slice_index)?;
        let points = extract(
            &matrix,
            slice_index,
            &config.thresholds,
            &config.layout.origin_for(slice_index),
            config.layout.step_length,
        );
        progress.report(Progress::SliceDone { slice_index });
        Ok(SliceView {
            slice_index,
            emphasis,
            generation,
            points,
        })
    };

    #[cfg(not(feature = "parallel"))]
    let iterator = plan.iter();

    #[cfg(feature = "parallel")]
    let iterator = plan.par_iter();

    iterator.map(build).collect()
}
