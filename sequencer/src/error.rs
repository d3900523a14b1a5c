use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("step index {index} is out of bounds ({step_count} steps)")]
    OutOfBounds { index: usize, step_count: usize },

    #[error("cannot jump forward to step {to}: required step '{blocked_by}' is not complete")]
    ForwardJumpBlocked { to: usize, blocked_by: String },

    #[error("cannot go back to step {0}: it was never reached")]
    BackwardToPending(usize),

    #[error("the session is verified; no further step transitions occur")]
    SessionVerified,
}
