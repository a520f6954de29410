//! Asynchronous feed refresh: durable queue plus worker loop.

pub mod queue;
pub mod worker;

pub use queue::{QueueState, RefreshMessage, RefreshQueue};
pub use worker::{RefreshOutcome, RefreshWorker, MAX_FAILED_ATTEMPTS, RETRY_DELAY_SECS};
