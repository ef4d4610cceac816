//! Discrete action space

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The five discrete actions, in action-space index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    NoOp,
    StepForward,
    StepBackward,
    RotateClockwise,
    RotateCounterClockwise,
}

/// Action space in index order
pub const ACTION_SPACE: [Action; 5] = [
    Action::NoOp,
    Action::StepForward,
    Action::StepBackward,
    Action::RotateClockwise,
    Action::RotateCounterClockwise,
];

impl Action {
    pub fn index(self) -> usize {
        match self {
            Action::NoOp => 0,
            Action::StepForward => 1,
            Action::StepBackward => 2,
            Action::RotateClockwise => 3,
            Action::RotateCounterClockwise => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::NoOp => "noop",
            Action::StepForward => "forward",
            Action::StepBackward => "backward",
            Action::RotateClockwise => "clockwise",
            Action::RotateCounterClockwise => "counter_clockwise",
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = EngineError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        ACTION_SPACE
            .get(index)
            .copied()
            .ok_or(EngineError::InvalidAction(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, action) in ACTION_SPACE.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::try_from(i).unwrap(), *action);
        }
    }

    #[test]
    fn test_out_of_range_index() {
        assert!(matches!(
            Action::try_from(5),
            Err(EngineError::InvalidAction(5))
        ));
    }
}
