//! Tick-0 control group assignment.

use std::collections::BTreeSet;

use super::{DecisionContext, Policy};
use crate::command::{ActionBatch, Group};
use crate::unit::UnitKind;

/// Puts each own unit kind into its own control group on tick 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitialSetup;

impl Policy for InitialSetup {
    fn name(&self) -> &'static str {
        "initial_setup"
    }

    fn evaluate(&mut self, ctx: &mut DecisionContext<'_>) -> Option<ActionBatch> {
        if ctx.tick != 0 {
            return None;
        }
        let present: BTreeSet<UnitKind> = ctx.tracker.own_units().map(|u| u.kind).collect();
        if present.is_empty() {
            return None;
        }

        let mut batch = ActionBatch::new();
        for kind in UnitKind::ALL.into_iter().filter(|k| present.contains(k)) {
            batch.select_kind(ctx.bounds, kind).assign(Group::for_kind(kind));
        }
        Some(batch)
    }
}
