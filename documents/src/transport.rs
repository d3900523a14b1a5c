//! The injected upload transport contract.

use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::mpsc;
use veriflow_types::FileDescriptor;

/// A transport-level upload failure, e.g. a dropped connection.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Moves a file's bytes to wherever documents live.
///
/// The engine is transport-agnostic: a local simulation, HTTP multipart,
/// or a cloud SDK are equally valid implementations. The transport reports
/// progress as `0..=100` percentages on the channel and resolves the
/// returned future with the final outcome. Progress past 100 is clamped by
/// the caller; out-of-order percentages are tolerated.
pub trait UploadTransport: Send + Sync {
    fn upload(
        &self,
        descriptor: &FileDescriptor,
        progress: mpsc::UnboundedSender<u8>,
    ) -> BoxFuture<'static, Result<(), TransportError>>;
}
