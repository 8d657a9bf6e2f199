//! Ordered chain of decision policies.
//!
//! The turn is offered to each policy in configured order and the first one
//! to return a batch wins. Preempting policies are evaluated separately,
//! every tick, ahead of the queue.

use crate::command::ActionBatch;
use crate::config::EngineConfig;
use crate::policy::{build_policy, DecisionContext, Policy};

/// A batch plus the policy that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// Claiming policy.
    pub policy: &'static str,
    /// Actions to enqueue.
    pub batch: ActionBatch,
}

/// Policies in priority order.
#[derive(Debug, Default)]
pub struct DecisionPipeline {
    policies: Vec<Box<dyn Policy>>,
}

impl DecisionPipeline {
    /// Create a pipeline from already built policies.
    #[must_use]
    pub fn new(policies: Vec<Box<dyn Policy>>) -> Self {
        Self { policies }
    }

    /// Build the configured policy list.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.policies.iter().copied().map(build_policy).collect())
    }

    /// Offer the tick to preempting policies only.
    pub fn evaluate_preempting(&mut self, ctx: &mut DecisionContext<'_>) -> Option<Claim> {
        self.first_claim(ctx, true)
    }

    /// Offer the turn to the regular policies.
    pub fn evaluate(&mut self, ctx: &mut DecisionContext<'_>) -> Option<Claim> {
        self.first_claim(ctx, false)
    }

    fn first_claim(&mut self, ctx: &mut DecisionContext<'_>, preempting: bool) -> Option<Claim> {
        self.policies
            .iter_mut()
            .filter(|p| p.preempts() == preempting)
            .find_map(|policy| {
                let batch = policy.evaluate(ctx)?;
                if batch.is_empty() {
                    return None;
                }
                Some(Claim {
                    policy: policy.name(),
                    batch,
                })
            })
    }

    /// Policy names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.policies.iter().map(|p| p.name()).collect()
    }

    /// Number of policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Check if the pipeline has no policies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
