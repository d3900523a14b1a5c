use proptest::prelude::*;
use std::sync::Arc;

use veriflow_sequencer::{StepError, StepSequencer};
use veriflow_types::{StepDefinition, VerificationSession};

fn flow(step_count: usize) -> Arc<Vec<StepDefinition>> {
    Arc::new(
        (0..step_count)
            .map(|i| StepDefinition::new(format!("step_{i}"), format!("Step {i}"), i as u32, 1))
            .collect(),
    )
}

proptest! {
    /// The derived level never decreases as more steps complete, and never
    /// exceeds the number of configured thresholds.
    #[test]
    fn derived_level_is_monotonic(
        mut thresholds in proptest::collection::vec(1u32..10, 1..4),
        max_completed in 0usize..12,
    ) {
        thresholds.sort_unstable();
        thresholds.dedup();
        let max_level = thresholds.len() as u8;
        let seq = StepSequencer::new(flow(5), thresholds);

        let mut previous = 0u8;
        for completed in 0..=max_completed {
            let level = seq.derived_level(completed);
            prop_assert!(level >= previous, "level decreased: {previous} -> {level}");
            prop_assert!(level <= max_level);
            previous = level;
        }
    }

    /// From a session with `completed` finished steps, any forward jump
    /// past the frontier is rejected and every jump up to it is allowed.
    #[test]
    fn forward_jumps_never_skip_incomplete_required_steps(
        step_count in 2usize..8,
        completed in 0usize..7,
        target in 0usize..8,
    ) {
        let completed = completed.min(step_count - 1);
        let target = target.min(step_count - 1);

        let definitions = flow(step_count);
        let seq = StepSequencer::new(Arc::clone(&definitions), vec![2, 4, 5]);
        let mut session = VerificationSession::fresh(&definitions);
        for _ in 0..completed {
            seq.mark_completed(&mut session).unwrap();
        }
        // The frontier (first incomplete step) is now `completed`.
        prop_assert_eq!(session.current_step_index, completed);

        let result = seq.can_advance(&session, target);
        if target <= completed {
            prop_assert!(result.is_ok(), "jump to {target} should be legal: {result:?}");
        } else {
            prop_assert!(
                matches!(result, Err(StepError::ForwardJumpBlocked { .. })),
                "jump to {} past frontier {} should be blocked: {:?}",
                target,
                completed,
                result
            );
        }
    }
}
