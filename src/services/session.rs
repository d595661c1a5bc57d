//! Worker session state.
//!
//! Holds what the last emitted job used, so later requests may omit the
//! source, palette, colorize flag or mapper and inherit them. Owned by the
//! worker actor; nothing else reads or writes it.

use std::sync::Arc;
use tile_quant::{BlockSize, IndexedPalette, MapperKind, Palette, PixelBuffer};

use super::pipeline::{CachedPalette, JobPlan, PendingPlan, PlanSource};
use super::worker::JobRequest;
use crate::error::JobError;
use crate::models::JobId;

#[derive(Debug, Clone)]
pub struct Session {
    source: Option<Arc<PixelBuffer>>,
    block: Option<BlockSize>,
    palette: Option<CachedPalette>,
    colorize: bool,
    mapper: MapperKind,
    last_emitted: Option<JobId>,
}

impl Session {
    /// An empty session with the given defaults for colorize and mapper.
    pub fn new(colorize: bool, mapper: MapperKind) -> Self {
        Self {
            source: None,
            block: None,
            palette: None,
            colorize,
            mapper,
            last_emitted: None,
        }
    }

    pub fn last_emitted(&self) -> Option<JobId> {
        self.last_emitted
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Resolve a job request against the session.
    ///
    /// A submitted source is passed through undecoded.
    pub fn plan(&self, job: JobRequest) -> Result<PendingPlan, JobError> {
        let block = BlockSize::new(job.block_size).map_err(JobError::InvalidBlockSize)?;
        let source = match job.source {
            Some(source) => PlanSource::Submitted(source),
            None => PlanSource::Session(self.source.clone().ok_or(JobError::NoSource)?),
        };
        let palette = match job.palette {
            Some(flat) => self.resolve_palette(flat),
            None => self.palette.clone(),
        };

        Ok(PendingPlan {
            job_id: job.job_id,
            source,
            block,
            mapper: job.mapper.unwrap_or(self.mapper),
            colorize: job.colorize.unwrap_or(self.colorize),
            palette,
        })
    }

    /// Reuse the indexed palette when the flat palette is unchanged.
    fn resolve_palette(&self, flat: Vec<u8>) -> Option<CachedPalette> {
        if let Some(cached) = self.palette.as_ref().filter(|c| c.flat == flat) {
            return Some(cached.clone());
        }
        match Palette::from_flat(&flat) {
            Ok(palette) => Some(CachedPalette {
                flat,
                indexed: Arc::new(IndexedPalette::new(palette)),
            }),
            Err(e) => {
                tracing::debug!(%e, len = flat.len(), "No usable palette entries, colorization off");
                None
            }
        }
    }

    /// Record an emitted job's inputs.
    pub fn commit(&mut self, plan: &JobPlan) {
        self.source = Some(plan.source.clone());
        self.block = Some(plan.block);
        self.palette = plan.palette.clone();
        self.colorize = plan.colorize;
        self.mapper = plan.mapper;
        self.last_emitted = Some(plan.job_id);
    }

    /// Plan an export of `job_id` from session state.
    ///
    /// `None` unless `job_id` is the last emitted job.
    pub fn export_plan(&self, job_id: JobId) -> Option<JobPlan> {
        if self.last_emitted != Some(job_id) {
            return None;
        }
        Some(JobPlan {
            job_id,
            source: self.source.clone()?,
            block: self.block?,
            mapper: self.mapper,
            colorize: self.colorize,
            palette: self.palette.clone(),
        })
    }
}
