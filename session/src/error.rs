use thiserror::Error;
use veriflow_documents::UploadError;
use veriflow_drafts::DraftSaveError;
use veriflow_sequencer::StepError;
use veriflow_validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The current step did not validate. Recoverable: the map holds
    /// everything the user still has to fix; nothing was mutated.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(ValidationErrors),

    /// A second submission was attempted while one is pending.
    #[error("a step submission is already in flight")]
    SubmissionInFlight,

    /// The submission could not be persisted. Step status and data were
    /// rolled back, so resubmitting is safe.
    #[error("submission could not be persisted: {0}")]
    Submission(DraftSaveError),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The terminal step is verified; the session accepts no further
    /// operations.
    #[error("the session is already verified")]
    AlreadyVerified,
}
