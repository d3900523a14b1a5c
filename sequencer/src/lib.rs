//! Step sequencing — ordering, progression gating, derived level.
//!
//! The sequencer owns the flow's step definitions and the rules for moving
//! between them. It mutates the session's statuses but never the form data
//! or documents; the controller composes it with validation.

pub mod error;

pub use error::StepError;

use std::sync::Arc;
use veriflow_types::{StepDefinition, StepStatus, VerificationSession};

/// The result of completing the current step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Id of the step that was just completed.
    pub step_id: String,
    /// True when the completed step was the last one: the session is done.
    pub session_verified: bool,
    /// Index of the step that became current, if any.
    pub next_index: Option<usize>,
    /// Verification level after this completion.
    pub level: u8,
}

/// Step ordering, progression gating and the derived verification level.
pub struct StepSequencer {
    definitions: Arc<Vec<StepDefinition>>,
    level_thresholds: Vec<u32>,
}

impl StepSequencer {
    /// Definitions must already be sorted by `order`; the session config
    /// layer guarantees that.
    pub fn new(definitions: Arc<Vec<StepDefinition>>, level_thresholds: Vec<u32>) -> Self {
        Self {
            definitions,
            level_thresholds,
        }
    }

    pub fn step_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn definition(&self, index: usize) -> Option<&StepDefinition> {
        self.definitions.get(index)
    }

    pub fn definitions(&self) -> &[StepDefinition] {
        &self.definitions
    }

    /// Whether a move from the session's current step to `to` is legal.
    ///
    /// Backward moves to any previously reached (non-pending) step are
    /// always allowed. Forward moves must not skip an incomplete required
    /// step; optional steps may be jumped over.
    pub fn can_advance(&self, session: &VerificationSession, to: usize) -> Result<(), StepError> {
        if session.is_verified(&self.definitions) {
            return Err(StepError::SessionVerified);
        }
        if to >= self.definitions.len() {
            return Err(StepError::OutOfBounds {
                index: to,
                step_count: self.definitions.len(),
            });
        }

        let from = session.current_step_index;
        if to == from {
            return Ok(());
        }

        if to < from {
            let target = &self.definitions[to];
            if session.status_of(&target.id) == Some(StepStatus::Pending) {
                return Err(StepError::BackwardToPending(to));
            }
            return Ok(());
        }

        for (index, def) in self.definitions.iter().enumerate().take(to) {
            let complete = session
                .status_of(&def.id)
                .map(|status| status.is_complete())
                .unwrap_or(false);
            if def.required && !complete {
                return Err(StepError::ForwardJumpBlocked {
                    to,
                    blocked_by: self.definitions[index].id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Move the session to step `to`, re-opening it.
    ///
    /// The abandoned current step returns to `pending`; a revisited
    /// completed step becomes `current` again and must be resubmitted to
    /// move past it (its form data is retained, so resubmission is cheap).
    pub fn go_to(&self, session: &mut VerificationSession, to: usize) -> Result<(), StepError> {
        self.can_advance(session, to)?;

        let from = session.current_step_index;
        if to == from {
            return Ok(());
        }

        let from_id = self.definitions[from].id.clone();
        if session.status_of(&from_id) == Some(StepStatus::Current) {
            session.step_statuses.insert(from_id, StepStatus::Pending);
        }
        let to_id = self.definitions[to].id.clone();
        session.step_statuses.insert(to_id, StepStatus::Current);
        session.current_step_index = to;
        Ok(())
    }

    /// Complete the session's current step and promote the next pending
    /// step to current. The last step completes as `verified`, which is
    /// terminal.
    pub fn mark_completed(
        &self,
        session: &mut VerificationSession,
    ) -> Result<CompletionOutcome, StepError> {
        if session.is_verified(&self.definitions) {
            return Err(StepError::SessionVerified);
        }

        let index = session.current_step_index;
        let step_count = self.definitions.len();
        let def = self
            .definitions
            .get(index)
            .ok_or(StepError::OutOfBounds { index, step_count })?;

        let is_last = index == step_count - 1;
        let status = if is_last {
            StepStatus::Verified
        } else {
            StepStatus::Completed
        };
        session.step_statuses.insert(def.id.clone(), status);

        // Promote the first still-pending step. After backward navigation
        // the steps in between may already be complete, so this can jump
        // more than one ahead.
        let next_index = (index + 1..step_count).find(|&i| {
            session.status_of(&self.definitions[i].id) == Some(StepStatus::Pending)
        });
        if let Some(next) = next_index {
            session
                .step_statuses
                .insert(self.definitions[next].id.clone(), StepStatus::Current);
            session.current_step_index = next;
        }

        Ok(CompletionOutcome {
            step_id: def.id.clone(),
            session_verified: is_last,
            next_index,
            level: self.derived_level(session.completed_count()),
        })
    }

    /// The verification level unlocked by `completed` finished steps.
    ///
    /// Table-driven: crossing `level_thresholds[i]` grants level `i + 1`.
    /// Monotonic non-decreasing in the completed count.
    pub fn derived_level(&self, completed: usize) -> u8 {
        self.level_thresholds
            .iter()
            .filter(|&&threshold| completed as u32 >= threshold)
            .count() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_steps() -> Arc<Vec<StepDefinition>> {
        Arc::new(vec![
            StepDefinition::new("personal", "Personal", 0, 1),
            StepDefinition::new("identity", "Identity", 1, 1),
            StepDefinition::new("address", "Address", 2, 2),
            StepDefinition::new("financial", "Financial", 3, 2).optional(),
            StepDefinition::new("business", "Business", 4, 3),
        ])
    }

    fn sequencer() -> StepSequencer {
        StepSequencer::new(five_steps(), vec![2, 4, 5])
    }

    fn session() -> VerificationSession {
        VerificationSession::fresh(&five_steps())
    }

    /// Drive the session forward `n` completions.
    fn complete_steps(seq: &StepSequencer, session: &mut VerificationSession, n: usize) {
        for _ in 0..n {
            seq.mark_completed(session).unwrap();
        }
    }

    #[test]
    fn forward_jump_over_incomplete_required_step_is_rejected() {
        let seq = sequencer();
        let session = session();

        let result = seq.can_advance(&session, 2);
        assert_eq!(
            result,
            Err(StepError::ForwardJumpBlocked {
                to: 2,
                blocked_by: "personal".into()
            })
        );
    }

    #[test]
    fn forward_to_immediately_following_step_requires_completion() {
        let seq = sequencer();
        let mut session = session();

        assert!(seq.can_advance(&session, 1).is_err());
        complete_steps(&seq, &mut session, 1);
        // Step 1 is now current; moving to it is trivially fine, and the
        // next forward jump is gated on completing it.
        assert_eq!(session.current_step_index, 1);
        assert!(seq.can_advance(&session, 2).is_err());
    }

    #[test]
    fn optional_steps_can_be_skipped_over() {
        let seq = sequencer();
        let mut session = session();

        // Complete personal, identity, address; financial (optional) is current.
        complete_steps(&seq, &mut session, 3);
        assert_eq!(session.current_step_index, 3);

        // Jumping over the optional financial step to business is legal.
        assert!(seq.can_advance(&session, 4).is_ok());
        seq.go_to(&mut session, 4).unwrap();
        assert_eq!(session.current_step_index, 4);
        assert_eq!(
            session.status_of("financial"),
            Some(StepStatus::Pending),
            "skipped optional step goes back to pending"
        );
    }

    #[test]
    fn backward_to_reached_step_reopens_it() {
        let seq = sequencer();
        let mut session = session();
        complete_steps(&seq, &mut session, 2);
        assert_eq!(session.current_step_index, 2);

        assert!(seq.can_advance(&session, 0).is_ok());
        seq.go_to(&mut session, 0).unwrap();
        assert_eq!(session.status_of("personal"), Some(StepStatus::Current));
        assert_eq!(session.status_of("address"), Some(StepStatus::Pending));

        // Re-opening demoted personal from completed, so forward jumps
        // past it are gated again until it is resubmitted.
        assert_eq!(
            seq.can_advance(&session, 4),
            Err(StepError::ForwardJumpBlocked {
                to: 4,
                blocked_by: "personal".into()
            })
        );
    }

    #[test]
    fn backward_to_never_reached_step_is_rejected() {
        let seq = sequencer();
        let mut session = session();

        // Complete through address, then skip the optional financial step.
        complete_steps(&seq, &mut session, 3);
        seq.go_to(&mut session, 4).unwrap();
        assert_eq!(session.status_of("financial"), Some(StepStatus::Pending));

        // Financial sits below the current index but was never reached...
        assert_eq!(
            seq.can_advance(&session, 3),
            Err(StepError::BackwardToPending(3))
        );
        // ...while the genuinely completed address step is fair game.
        assert!(seq.can_advance(&session, 2).is_ok());
    }

    #[test]
    fn resubmitting_a_reopened_step_returns_to_the_frontier() {
        let seq = sequencer();
        let mut session = session();
        complete_steps(&seq, &mut session, 2);

        seq.go_to(&mut session, 0).unwrap();
        let outcome = seq.mark_completed(&mut session).unwrap();

        // Identity is still completed, so the frontier is address (2).
        assert_eq!(outcome.next_index, Some(2));
        assert_eq!(session.current_step_index, 2);
        assert_eq!(session.status_of("identity"), Some(StepStatus::Completed));
    }

    #[test]
    fn completing_the_last_step_verifies_and_terminates() {
        let seq = sequencer();
        let mut session = session();
        complete_steps(&seq, &mut session, 4);
        assert_eq!(session.current_step_index, 4);

        let outcome = seq.mark_completed(&mut session).unwrap();
        assert!(outcome.session_verified);
        assert_eq!(outcome.next_index, None);
        assert_eq!(outcome.level, 3);
        assert_eq!(session.status_of("business"), Some(StepStatus::Verified));
        assert!(session.is_verified(seq.definitions()));

        // Terminal: no transitions of any kind afterwards.
        assert_eq!(
            seq.mark_completed(&mut session),
            Err(StepError::SessionVerified)
        );
        assert_eq!(seq.can_advance(&session, 0), Err(StepError::SessionVerified));
    }

    #[test]
    fn out_of_bounds_target_is_rejected() {
        let seq = sequencer();
        assert_eq!(
            seq.can_advance(&session(), 7),
            Err(StepError::OutOfBounds {
                index: 7,
                step_count: 5
            })
        );
    }

    #[test]
    fn go_to_current_index_is_a_noop() {
        let seq = sequencer();
        let mut session = session();
        seq.go_to(&mut session, 0).unwrap();
        assert_eq!(session.current_step_index, 0);
        assert_eq!(session.status_of("personal"), Some(StepStatus::Current));
    }

    #[test]
    fn derived_level_matches_thresholds_at_boundaries() {
        let seq = sequencer();
        assert_eq!(seq.derived_level(0), 0);
        assert_eq!(seq.derived_level(1), 0);
        assert_eq!(seq.derived_level(2), 1);
        assert_eq!(seq.derived_level(3), 1);
        assert_eq!(seq.derived_level(4), 2);
        assert_eq!(seq.derived_level(5), 3);
        assert_eq!(seq.derived_level(6), 3);
    }

    #[test]
    fn derived_level_honors_alternate_threshold_table() {
        let seq = StepSequencer::new(five_steps(), vec![3, 5]);
        assert_eq!(seq.derived_level(2), 0);
        assert_eq!(seq.derived_level(3), 1);
        assert_eq!(seq.derived_level(4), 1);
        assert_eq!(seq.derived_level(5), 2);
    }

    #[test]
    fn completion_outcome_reports_levels_as_they_unlock() {
        let seq = sequencer();
        let mut session = session();

        let first = seq.mark_completed(&mut session).unwrap();
        assert_eq!(first.level, 0);
        let second = seq.mark_completed(&mut session).unwrap();
        assert_eq!(second.level, 1, "two completions cross the first threshold");
    }
}
