//! Nullable upload transport — scripted progress and outcomes.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Notify};
use veriflow_documents::{TransportError, UploadTransport};
use veriflow_types::FileDescriptor;

/// What one scripted upload should do.
pub struct UploadPlan {
    /// Progress percentages to emit, in order.
    pub progress: Vec<u8>,
    pub result: Result<(), TransportError>,
    /// When set, the transport stalls before resolving until notified —
    /// lets tests observe the `uploading` state deterministically.
    pub gate: Option<Arc<Notify>>,
}

impl UploadPlan {
    /// Emit the given progress steps, then succeed.
    pub fn success(progress: Vec<u8>) -> Self {
        Self {
            progress,
            result: Ok(()),
            gate: None,
        }
    }

    /// Emit the given progress steps, then fail with `reason`.
    pub fn failure(progress: Vec<u8>, reason: &str) -> Self {
        Self {
            progress,
            result: Err(TransportError(reason.to_string())),
            gate: None,
        }
    }

    /// Stall before resolving until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// An upload transport that replays scripted plans.
///
/// Each call to `upload` consumes the next queued plan; when the queue is
/// empty, the upload completes immediately with progress 100 and success.
pub struct NullTransport {
    plans: Mutex<VecDeque<UploadPlan>>,
    uploads_started: AtomicU32,
}

impl NullTransport {
    pub fn new() -> Self {
        Self {
            plans: Mutex::new(VecDeque::new()),
            uploads_started: AtomicU32::new(0),
        }
    }

    pub fn with_plans(plans: Vec<UploadPlan>) -> Self {
        Self {
            plans: Mutex::new(plans.into()),
            uploads_started: AtomicU32::new(0),
        }
    }

    pub fn enqueue(&self, plan: UploadPlan) {
        self.plans.lock().unwrap().push_back(plan);
    }

    /// How many uploads have been started so far.
    pub fn uploads_started(&self) -> u32 {
        self.uploads_started.load(Ordering::SeqCst)
    }
}

impl Default for NullTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadTransport for NullTransport {
    fn upload(
        &self,
        _descriptor: &FileDescriptor,
        progress: mpsc::UnboundedSender<u8>,
    ) -> BoxFuture<'static, Result<(), TransportError>> {
        self.uploads_started.fetch_add(1, Ordering::SeqCst);
        let plan = self
            .plans
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| UploadPlan::success(vec![100]));

        async move {
            for percent in plan.progress {
                let _ = progress.send(percent);
            }
            if let Some(gate) = plan.gate {
                gate.notified().await;
            }
            plan.result
        }
        .boxed()
    }
}
