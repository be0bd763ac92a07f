//! Value table for tabular Q-learning

use std::collections::HashMap;

use crate::types::{ACTION_COUNT, Action, StateKey};

/// Action values for one state, indexed by [`Action::index`].
pub type ActionValues = [f64; ACTION_COUNT];

const ZERO_VALUES: ActionValues = [0.0; ACTION_COUNT];

/// First maximum, scanning upward from action 0.
fn argmax(values: &ActionValues) -> (Action, f64) {
    let mut best = 0;
    for i in 1..ACTION_COUNT {
        if values[i] > values[best] {
            best = i;
        }
    }
    (Action::ALL[best], values[best])
}

/// Q-table mapping states to per-action values
///
/// A state that was never touched reads as the zero vector. Mutating access
/// materializes that default in the map; entries are never removed.
#[derive(Debug, Clone)]
pub struct ValueTable {
    values: HashMap<StateKey, ActionValues>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl ValueTable {
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            values: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    /// Insert the zero vector for `state` if it is absent. Idempotent.
    pub fn ensure_state(&mut self, state: StateKey) -> &mut ActionValues {
        self.values.entry(state).or_insert(ZERO_VALUES)
    }

    pub fn contains(&self, state: StateKey) -> bool {
        self.values.contains_key(&state)
    }

    /// Action values for `state`, zero if it was never touched.
    pub fn values(&self, state: StateKey) -> ActionValues {
        self.values.get(&state).copied().unwrap_or(ZERO_VALUES)
    }

    pub fn get(&self, state: StateKey, action: Action) -> f64 {
        self.values(state)[action.index()]
    }

    pub fn set(&mut self, state: StateKey, action: Action, value: f64) {
        self.ensure_state(state)[action.index()] = value;
    }

    /// Materialize `state`, then return its best action and value.
    ///
    /// Ties go to the lowest-indexed action.
    pub fn best_action(&mut self, state: StateKey) -> (Action, f64) {
        argmax(self.ensure_state(state))
    }

    /// Read-only variant of [`ValueTable::best_action`].
    pub fn greedy_action(&self, state: StateKey) -> (Action, f64) {
        argmax(&self.values(state))
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// Terminal transitions still bootstrap from `next_state`. Returns the
    /// updated Q(s,a).
    pub fn q_learning_update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: StateKey,
    ) -> f64 {
        let (alpha, gamma) = (self.learning_rate, self.discount_factor);
        self.ensure_state(state);
        let (_, max_next_q) = self.best_action(next_state);
        let q = &mut self.ensure_state(state)[action.index()];
        let td_target = reward + gamma * max_next_q;
        *q += alpha * (td_target - *q);
        *q
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    /// Number of materialized states.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Materialized entries in ascending state order.
    pub fn entries(&self) -> Vec<(StateKey, ActionValues)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }
}
