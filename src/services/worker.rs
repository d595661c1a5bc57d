//! The job worker: a single actor task that owns the session.
//!
//! Requests arrive over an unbounded channel and are handled one at a time.
//! Compute runs on the blocking pool while the actor keeps draining its
//! inbox, so a newer `process` or a `cancel` is always seen before the
//! running job's result is examined. A job emits only if it is still the
//! most recently submitted one when it starts and when it finishes;
//! anything else is dropped without a notification.
//!
//! Submitted PNG sources are decoded inside the job's blocking task, so a
//! request takes its place in line the moment it is received.

use std::collections::VecDeque;

use thiserror::Error;
use tile_quant::{MapperKind, Pixelated};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};

use super::pipeline::{self, JobPlan};
use super::session::Session;
use crate::error::{ImageError, JobError};
use crate::models::{
    AppConfig, ExportFile, JobFailure, JobId, JobResult, WorkerEvent, WorkerMessage,
};
use crate::rendering::JobSource;

/// A `process` request as the worker receives it.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub job_id: JobId,
    pub block_size: u32,
    pub source: Option<JobSource>,
    pub colorize: Option<bool>,
    pub palette: Option<Vec<u8>>,
    pub mapper: Option<MapperKind>,
}

#[derive(Debug, Clone)]
pub enum Request {
    Process(JobRequest),
    Cancel(JobId),
    Export(JobId),
}

impl Request {
    /// Convert a wire message. Raw sources are checked against their
    /// dimensions; PNG sources are left for the worker to decode.
    pub fn from_message(message: WorkerMessage) -> Result<Self, ImageError> {
        Ok(match message {
            WorkerMessage::Process(req) => Request::Process(JobRequest {
                job_id: req.job_id,
                block_size: req.block_size,
                source: req.source_image.map(JobSource::from_wire).transpose()?,
                colorize: req.colorize_enabled,
                palette: req.palette,
                mapper: req.mapper.map(MapperKind::from),
            }),
            WorkerMessage::Cancel(job) => Request::Cancel(job.job_id),
            WorkerMessage::GenerateExport(job) => Request::Export(job.job_id),
        })
    }

    pub fn job_id(&self) -> JobId {
        match self {
            Request::Process(job) => job.job_id,
            Request::Cancel(id) | Request::Export(id) => *id,
        }
    }
}

/// Worker defaults, applied until a request overrides them.
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub colorize: bool,
    pub mapper: MapperKind,
    pub optimize_export: bool,
    /// Submitted sources are shrunk to fit within this on either side
    pub max_source_dimension: u32,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            colorize: true,
            mapper: MapperKind::Perceptual,
            optimize_export: true,
            max_source_dimension: 4096,
        }
    }
}

impl From<&AppConfig> for WorkerOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            colorize: config.defaults.colorize,
            mapper: config.defaults.mapper.into(),
            optimize_export: config.export.optimize,
            max_source_dimension: config.limits.max_source_dimension,
        }
    }
}

#[derive(Debug, Error)]
#[error("worker has shut down")]
pub struct WorkerClosed;

#[derive(Debug)]
struct Envelope {
    request: Request,
    reply: Option<oneshot::Sender<WorkerEvent>>,
}

/// Cloneable handle to a running worker.
///
/// The worker exits once every handle is dropped and its queue is drained.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl WorkerHandle {
    /// Start a worker on the current tokio runtime.
    pub fn spawn(options: WorkerOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx, options));
        Self { tx }
    }

    /// Submit a request and get a handle to its notification, if any.
    pub fn post(&self, request: Request) -> Result<Notification, WorkerClosed> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                request,
                reply: Some(reply),
            })
            .map_err(|_| WorkerClosed)?;
        Ok(Notification(rx))
    }

    /// Submit a request without waiting for its outcome.
    pub fn send(&self, request: Request) -> Result<(), WorkerClosed> {
        self.tx
            .send(Envelope {
                request,
                reply: None,
            })
            .map_err(|_| WorkerClosed)
    }
}

/// The pending notification for one posted request.
#[derive(Debug)]
pub struct Notification(oneshot::Receiver<WorkerEvent>);

impl Notification {
    /// Wait for the outcome. `None` means the request was superseded,
    /// cancelled, or produced nothing to report.
    pub async fn recv(self) -> Option<WorkerEvent> {
        self.0.await.ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskKind {
    Job,
    Export,
}

enum Outcome {
    Job(JobPlan, Pixelated),
    /// The submitted source could not be decoded
    Rejected(JobId, ImageError),
    Export(JobId, Result<Vec<u8>, ImageError>),
}

struct Running {
    job_id: JobId,
    kind: TaskKind,
    task: JoinHandle<Outcome>,
    reply: Option<oneshot::Sender<WorkerEvent>>,
}

struct Actor {
    session: Session,
    /// Most recently submitted, not cancelled, job id
    active: Option<JobId>,
    queue: VecDeque<Envelope>,
    optimize_export: bool,
    max_source_dimension: u32,
}

async fn run(mut rx: mpsc::UnboundedReceiver<Envelope>, options: WorkerOptions) {
    let mut actor = Actor {
        session: Session::new(options.colorize, options.mapper),
        active: None,
        queue: VecDeque::new(),
        optimize_export: options.optimize_export,
        max_source_dimension: options.max_source_dimension,
    };
    let mut running: Option<Running> = None;
    let mut open = true;

    tracing::debug!("Worker started");
    loop {
        tokio::select! {
            biased;
            envelope = rx.recv(), if open => match envelope {
                Some(envelope) => actor.accept(envelope),
                None => open = false,
            },
            done = completion(&mut running) => {
                if let Some((finished, result)) = done {
                    actor.finish(finished, result);
                }
            }
        }

        while open {
            match rx.try_recv() {
                Ok(envelope) => actor.accept(envelope),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => open = false,
            }
        }

        if running.is_none() {
            running = actor.start_next();
        }
        if !open && running.is_none() && actor.queue.is_empty() {
            break;
        }
    }
    tracing::debug!("Worker stopped");
}

/// Resolves when the running task finishes; pending forever when idle.
async fn completion(
    running: &mut Option<Running>,
) -> Option<(Running, Result<Outcome, JoinError>)> {
    let result = match running.as_mut() {
        Some(current) => (&mut current.task).await,
        None => std::future::pending().await,
    };
    running.take().map(|finished| (finished, result))
}

fn deliver(reply: Option<oneshot::Sender<WorkerEvent>>, event: WorkerEvent) {
    if let Some(reply) = reply {
        // The caller may have stopped waiting
        let _ = reply.send(event);
    }
}

fn failure(job_id: JobId, error: JobError) -> WorkerEvent {
    WorkerEvent::Error(JobFailure {
        job_id,
        message: error.to_string(),
    })
}

impl Actor {
    fn accept(&mut self, envelope: Envelope) {
        match &envelope.request {
            Request::Process(job) => {
                tracing::debug!(job_id = %job.job_id, "Job submitted");
                self.active = Some(job.job_id);
                self.queue.push_back(envelope);
            }
            Request::Cancel(job_id) => {
                if self.active == Some(*job_id) {
                    tracing::debug!(job_id = %job_id, "Job cancelled");
                    self.active = None;
                }
                // Dropping the envelope closes its reply channel
            }
            Request::Export(job_id) => {
                tracing::debug!(job_id = %job_id, "Export requested");
                self.queue.push_back(envelope);
            }
        }
    }

    /// Start the first queued request that still has work to do.
    fn start_next(&mut self) -> Option<Running> {
        while let Some(Envelope { request, reply }) = self.queue.pop_front() {
            match request {
                Request::Process(job) => {
                    let job_id = job.job_id;
                    if self.active != Some(job_id) {
                        tracing::debug!(job_id = %job_id, "Skipping superseded job");
                        continue;
                    }
                    match self.session.plan(job) {
                        Ok(pending) => {
                            tracing::debug!(
                                job_id = %job_id,
                                block = pending.block.get(),
                                mapper = %pending.mapper,
                                colorize = pending.colorize,
                                "Starting job"
                            );
                            let max_dimension = self.max_source_dimension;
                            let task = tokio::task::spawn_blocking(move || {
                                match pending.resolve(max_dimension) {
                                    Ok(plan) => {
                                        let result = pipeline::execute(&plan);
                                        Outcome::Job(plan, result)
                                    }
                                    Err(e) => Outcome::Rejected(job_id, e),
                                }
                            });
                            return Some(Running {
                                job_id,
                                kind: TaskKind::Job,
                                task,
                                reply,
                            });
                        }
                        Err(e) => {
                            tracing::warn!(job_id = %job_id, error = %e, "Job rejected");
                            deliver(reply, failure(job_id, e));
                        }
                    }
                }
                Request::Export(job_id) => {
                    let Some(plan) = self.session.export_plan(job_id) else {
                        tracing::debug!(job_id = %job_id, "Nothing to export for job");
                        continue;
                    };
                    let optimize = self.optimize_export;
                    let task = tokio::task::spawn_blocking(move || {
                        Outcome::Export(job_id, pipeline::render_export(&plan, optimize))
                    });
                    return Some(Running {
                        job_id,
                        kind: TaskKind::Export,
                        task,
                        reply,
                    });
                }
                Request::Cancel(_) => {}
            }
        }
        None
    }

    fn finish(&mut self, finished: Running, result: Result<Outcome, JoinError>) {
        let Running {
            job_id,
            kind,
            reply,
            ..
        } = finished;

        match result {
            Ok(Outcome::Job(plan, pixelated)) => {
                if self.active != Some(plan.job_id) {
                    tracing::debug!(job_id = %plan.job_id, "Discarding stale result");
                    return;
                }
                self.session.commit(&plan);
                tracing::debug!(
                    job_id = %plan.job_id,
                    width = plan.source.width(),
                    height = plan.source.height(),
                    tiles_x = pixelated.meta.tiles_x,
                    tiles_y = pixelated.meta.tiles_y,
                    "Job finished"
                );
                deliver(
                    reply,
                    WorkerEvent::Result(JobResult {
                        job_id: plan.job_id,
                        meta: pixelated.meta.into(),
                        pixels: pixelated.pixels.into_data(),
                    }),
                );
            }
            Ok(Outcome::Rejected(job_id, e)) => {
                if self.active != Some(job_id) {
                    tracing::debug!(job_id = %job_id, "Discarding stale decode failure");
                    return;
                }
                tracing::warn!(job_id = %job_id, error = %e, "Job rejected");
                deliver(reply, failure(job_id, JobError::Source(e.to_string())));
            }
            Ok(Outcome::Export(job_id, Ok(file_bytes))) => {
                tracing::debug!(job_id = %job_id, bytes = file_bytes.len(), "Export ready");
                deliver(
                    reply,
                    WorkerEvent::ExportFile(ExportFile {
                        job_id,
                        file_bytes,
                    }),
                );
            }
            Ok(Outcome::Export(job_id, Err(e))) => {
                tracing::warn!(job_id = %job_id, error = %e, "Export failed");
                deliver(reply, failure(job_id, JobError::Export(e.to_string())));
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Compute task failed");
                if kind == TaskKind::Job && self.active != Some(job_id) {
                    return;
                }
                deliver(reply, failure(job_id, JobError::TaskFailed(e.to_string())));
            }
        }
    }
}
