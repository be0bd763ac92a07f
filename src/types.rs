//! Newtype wrappers for the agent's discrete action and state spaces.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Number of actions available to the player.
pub const ACTION_COUNT: usize = 4;

/// A discrete per-tick player command.
///
/// Encoded as integers 0-3 in the order they appear here; that order is also
/// the tie-break order for greedy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Idle,
}

impl Action {
    /// All actions in index order.
    pub const ALL: [Action; ACTION_COUNT] =
        [Action::MoveLeft, Action::MoveRight, Action::Jump, Action::Idle];

    /// Integer encoding of the action.
    pub const fn index(self) -> usize {
        match self {
            Action::MoveLeft => 0,
            Action::MoveRight => 1,
            Action::Jump => 2,
            Action::Idle => 3,
        }
    }

    /// Decode an action from its integer encoding.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] if `index >= 4`.
    pub fn from_index(index: usize) -> Result<Self, crate::Error> {
        Action::ALL
            .get(index)
            .copied()
            .ok_or(crate::Error::InvalidAction { index })
    }

    /// Short lowercase name, used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Action::MoveLeft => "left",
            Action::MoveRight => "right",
            Action::Jump => "jump",
            Action::Idle => "idle",
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = crate::Error;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Action::from_index(index)
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> Self {
        action.index()
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|a| a.name() == lowered)
            .ok_or_else(|| crate::Error::ParseAction {
                input: s.to_string(),
                expected: "left, right, jump, idle".to_string(),
            })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A discretized simulator state: `x_bucket * 2 + jumping`.
///
/// Only produced by [`crate::q_learning::StateDiscretizer`], so it is always
/// inside `[0, 2 * x_bins)` for the discretizer that made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateKey(usize);

impl StateKey {
    pub(crate) const fn new(value: usize) -> Self {
        StateKey(value)
    }

    /// Get the inner value.
    pub const fn value(self) -> usize {
        self.0
    }

    /// Horizontal bucket this state belongs to.
    pub const fn x_bucket(self) -> usize {
        self.0 / 2
    }

    /// Whether the state was recorded mid-jump.
    pub const fn is_jumping(self) -> bool {
        self.0 % 2 == 1
    }
}

impl From<StateKey> for usize {
    fn from(key: StateKey) -> Self {
        key.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
