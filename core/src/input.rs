use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Reveal, with first-click safety on the first one of a game.
    Primary,
    Flag,
}

/// One player action on one cell, as forwarded by the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub index: CellIndex,
    pub kind: ActionKind,
}

impl Action {
    pub const fn primary(index: CellIndex) -> Self {
        Self {
            index,
            kind: ActionKind::Primary,
        }
    }

    pub const fn flag(index: CellIndex) -> Self {
        Self {
            index,
            kind: ActionKind::Flag,
        }
    }
}

/// Swallows the spurious cell actions a pan or zoom gesture emits when it ends.
///
/// Owned by whoever handles gestures, next to the [`BoardState`] and never inside it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputGate {
    pending: u8,
}

impl InputGate {
    pub const fn new() -> Self {
        Self { pending: 0 }
    }

    /// Drop the next `count` actions. Arming twice keeps the larger count.
    pub fn suppress(&mut self, count: u8) {
        self.pending = self.pending.max(count);
    }

    /// A pan gesture ends with one stray touch.
    pub fn after_pan(&mut self) {
        self.suppress(1);
    }

    /// A pinch gesture ends with two stray touches, one per finger.
    pub fn after_zoom(&mut self) {
        self.suppress(2);
    }

    pub const fn is_armed(&self) -> bool {
        self.pending > 0
    }

    pub fn clear(&mut self) {
        self.pending = 0;
    }

    /// Passes `action` through unless the gate is armed, in which case it is consumed.
    pub fn admit(&mut self, action: Action) -> Option<Action> {
        if self.pending == 0 {
            return Some(action);
        }
        self.pending -= 1;
        log::trace!("Suppressed {:?}, {} left", action, self.pending);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_gate_passes_actions() {
        let mut gate = InputGate::new();
        assert_eq!(gate.admit(Action::primary(3)), Some(Action::primary(3)));
        assert!(!gate.is_armed());
    }

    #[test]
    fn zoom_swallows_two_actions() {
        let mut gate = InputGate::new();
        gate.after_zoom();

        assert_eq!(gate.admit(Action::primary(0)), None);
        assert_eq!(gate.admit(Action::flag(1)), None);
        assert_eq!(gate.admit(Action::primary(2)), Some(Action::primary(2)));
    }

    #[test]
    fn pan_after_zoom_does_not_shorten_suppression() {
        let mut gate = InputGate::new();
        gate.after_zoom();
        gate.after_pan();

        assert_eq!(gate.admit(Action::primary(0)), None);
        assert!(gate.is_armed());
        gate.clear();
        assert_eq!(gate.admit(Action::primary(0)), Some(Action::primary(0)));
    }
}
