pub mod pipeline;
pub mod session;
pub mod worker;

pub use pipeline::{CachedPalette, JobPlan};
pub use session::Session;
pub use worker::{JobRequest, Notification, Request, WorkerClosed, WorkerHandle, WorkerOptions};
