//! Job compute: the blocking half of the worker.
//!
//! Everything here runs inside `spawn_blocking` and is a pure function of
//! its [`PendingPlan`] or [`JobPlan`].

use std::sync::Arc;
use tile_quant::{BlockSize, IndexedPalette, MapperKind, Pixelated, Pixelator, PixelBuffer};

use crate::error::ImageError;
use crate::models::JobId;
use crate::rendering::{encode_png, optimize_png, JobSource};

/// A palette as the caller sent it, with its indexed form.
#[derive(Debug, Clone)]
pub struct CachedPalette {
    pub flat: Vec<u8>,
    pub indexed: Arc<IndexedPalette>,
}

/// A job's inputs after resolving omitted fields against the session.
#[derive(Debug, Clone)]
pub struct JobPlan {
    pub job_id: JobId,
    pub source: Arc<PixelBuffer>,
    pub block: BlockSize,
    pub mapper: MapperKind,
    pub colorize: bool,
    /// Kept even when `colorize` is off, so the session remembers it
    pub palette: Option<CachedPalette>,
}

/// Where a planned job's source comes from.
#[derive(Debug, Clone)]
pub enum PlanSource {
    /// Inherited from the last emitted job
    Session(Arc<PixelBuffer>),
    /// Sent with the request, not yet decoded
    Submitted(JobSource),
}

/// A [`JobPlan`] whose source may still need decoding.
#[derive(Debug, Clone)]
pub struct PendingPlan {
    pub job_id: JobId,
    pub source: PlanSource,
    pub block: BlockSize,
    pub mapper: MapperKind,
    pub colorize: bool,
    pub palette: Option<CachedPalette>,
}

impl PendingPlan {
    /// Decode and bound a submitted source.
    pub fn resolve(self, max_dimension: u32) -> Result<JobPlan, ImageError> {
        let source = match self.source {
            PlanSource::Session(source) => source,
            PlanSource::Submitted(source) => Arc::new(source.prepare(max_dimension)?),
        };
        Ok(JobPlan {
            job_id: self.job_id,
            source,
            block: self.block,
            mapper: self.mapper,
            colorize: self.colorize,
            palette: self.palette,
        })
    }
}

impl JobPlan {
    fn pixelator(&self) -> Pixelator {
        let palette = self
            .palette
            .as_ref()
            .filter(|_| self.colorize)
            .map(|p| p.indexed.clone());
        Pixelator::new(self.block)
            .mapper(self.mapper)
            .indexed_palette(palette)
    }
}

/// Downsample and (optionally) color-map the plan's source.
pub fn execute(plan: &JobPlan) -> Pixelated {
    plan.pixelator().run(&plan.source)
}

/// Re-run the plan and encode the tile grid as a PNG file.
pub fn render_export(plan: &JobPlan, optimize: bool) -> Result<Vec<u8>, ImageError> {
    let result = execute(plan);
    let png_bytes = encode_png(&result.pixels)?;
    Ok(if optimize {
        optimize_png(png_bytes)
    } else {
        png_bytes
    })
}
