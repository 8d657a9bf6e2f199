//! Commands and the deferred actions that produce them.
//!
//! A policy never writes a [`Command`] directly. It builds an
//! [`ActionBatch`] of [`PendingAction`]s which the scheduler releases one per
//! tick; each is turned into a command by [`PendingAction::materialize`] at
//! release time, so geometry that depends on the force (its centroid) is
//! read from the tracker as it is on that tick.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::tracker::UnitTracker;
use crate::unit::{UnitId, UnitKind};

/// Axis-aligned selection rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Rect {
    /// Rectangle covering the whole world.
    #[must_use]
    pub const fn world(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            right: width,
            bottom: height,
        }
    }
}

/// Control group number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Group(pub u32);

impl Group {
    /// Group reserved for a unit kind. Numbering follows the kind enumeration
    /// order starting at 2.
    #[must_use]
    pub const fn for_kind(kind: UnitKind) -> Self {
        Self(kind.index() as u32 + 2)
    }
}

/// One command sent to the game for a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replace the selection with own units inside `rect`, optionally of one kind.
    ClearAndSelect {
        /// Selection area.
        rect: Rect,
        /// Restrict to a kind.
        kind: Option<UnitKind>,
    },
    /// Replace the selection with a control group.
    SelectGroup {
        /// Group to select.
        group: Group,
    },
    /// Put the current selection into a control group.
    Assign {
        /// Group to assign.
        group: Group,
    },
    /// Move the selection by an offset.
    Move {
        /// Displacement.
        offset: Vec2,
        /// Optional speed cap.
        max_speed: Option<f64>,
    },
    /// Rotate the selection around a point.
    Rotate {
        /// Pivot.
        center: Vec2,
        /// Angle in radians.
        angle: f64,
    },
    /// Scale the selection around a point.
    Scale {
        /// Pivot.
        center: Vec2,
        /// Factor (< 1 contracts, > 1 expands).
        factor: f64,
    },
    /// Call a special area strike.
    TacticalStrike {
        /// Own unit designating the target.
        spotter: UnitId,
        /// Impact point.
        target: Vec2,
    },
}

impl Command {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ClearAndSelect { .. } => "clear_and_select",
            Self::SelectGroup { .. } => "select_group",
            Self::Assign { .. } => "assign",
            Self::Move { .. } => "move",
            Self::Rotate { .. } => "rotate",
            Self::Scale { .. } => "scale",
            Self::TacticalStrike { .. } => "tactical_strike",
        }
    }
}

/// State an action may read when it is released.
#[derive(Debug, Clone, Copy)]
pub struct ReleaseContext<'a> {
    /// Current unit table.
    pub tracker: &'a UnitTracker,
}

impl ReleaseContext<'_> {
    fn own_centroid(&self) -> Option<Vec2> {
        let me = self.tracker.me();
        self.tracker.mean_position(|u| u.player_id == me).ok()
    }
}

/// A command waiting in the queue.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    /// Fully determined at enqueue time.
    Issue(Command),
    /// Rotate around the own-force centroid as of release.
    RotateAroundOwnCentroid {
        /// Angle in radians.
        angle: f64,
    },
    /// Scale around the own-force centroid as of release.
    ScaleAroundOwnCentroid {
        /// Scale factor.
        factor: f64,
    },
}

impl PendingAction {
    /// Build the command for this tick.
    ///
    /// Returns `None` when the geometry cannot be resolved (no own units
    /// left); the action is then dropped and the tick passes.
    #[must_use]
    pub fn materialize(&self, ctx: &ReleaseContext<'_>) -> Option<Command> {
        match self {
            Self::Issue(command) => Some(command.clone()),
            Self::RotateAroundOwnCentroid { angle } => Some(Command::Rotate {
                center: ctx.own_centroid()?,
                angle: *angle,
            }),
            Self::ScaleAroundOwnCentroid { factor } => Some(Command::Scale {
                center: ctx.own_centroid()?,
                factor: *factor,
            }),
        }
    }
}

/// A pending action plus the freeze armed after it is released.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledAction {
    /// The action.
    pub action: PendingAction,
    /// Ticks to hold the queue after release.
    pub freeze_after: u32,
}

/// Ordered actions enqueued atomically by one policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionBatch {
    actions: Vec<ScheduledAction>,
}

impl ActionBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action.
    pub fn push(&mut self, action: PendingAction) -> &mut Self {
        self.actions.push(ScheduledAction {
            action,
            freeze_after: 0,
        });
        self
    }

    /// Append a fully determined command.
    pub fn issue(&mut self, command: Command) -> &mut Self {
        self.push(PendingAction::Issue(command))
    }

    /// Select every own unit inside `rect`.
    pub fn select_all(&mut self, rect: Rect) -> &mut Self {
        self.issue(Command::ClearAndSelect { rect, kind: None })
    }

    /// Select every own unit of one kind inside `rect`.
    pub fn select_kind(&mut self, rect: Rect, kind: UnitKind) -> &mut Self {
        self.issue(Command::ClearAndSelect {
            rect,
            kind: Some(kind),
        })
    }

    /// Select a control group.
    pub fn select_group(&mut self, group: Group) -> &mut Self {
        self.issue(Command::SelectGroup { group })
    }

    /// Assign the selection to a control group.
    pub fn assign(&mut self, group: Group) -> &mut Self {
        self.issue(Command::Assign { group })
    }

    /// Move the selection.
    pub fn move_by(&mut self, offset: Vec2, max_speed: Option<f64>) -> &mut Self {
        self.issue(Command::Move { offset, max_speed })
    }

    /// Scale the selection around a fixed point.
    pub fn scale(&mut self, center: Vec2, factor: f64) -> &mut Self {
        self.issue(Command::Scale { center, factor })
    }

    /// Rotate the selection around the own centroid at release time.
    pub fn rotate_around_own_centroid(&mut self, angle: f64) -> &mut Self {
        self.push(PendingAction::RotateAroundOwnCentroid { angle })
    }

    /// Scale the selection around the own centroid at release time.
    pub fn scale_around_own_centroid(&mut self, factor: f64) -> &mut Self {
        self.push(PendingAction::ScaleAroundOwnCentroid { factor })
    }

    /// Call a strike.
    pub fn strike(&mut self, spotter: UnitId, target: Vec2) -> &mut Self {
        self.issue(Command::TacticalStrike { spotter, target })
    }

    /// Hold the queue for `ticks` after the last action is released.
    pub fn then_freeze(&mut self, ticks: u32) -> &mut Self {
        if let Some(last) = self.actions.last_mut() {
            last.freeze_after = ticks;
        }
        self
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if the batch has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions in order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledAction> {
        self.actions.iter()
    }

    /// Finish building; convenient at the end of a builder chain.
    #[must_use]
    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl IntoIterator for ActionBatch {
    type Item = ScheduledAction;
    type IntoIter = std::vec::IntoIter<ScheduledAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}
