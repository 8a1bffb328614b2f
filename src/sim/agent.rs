//! Linear Q-learning agent
//!
//! Q(s, a) = w_a · s over a fixed five-feature state and the seven
//! difficulty actions. Exploration is epsilon-greedy with a constant rate.

use rand::Rng;
use rand_pcg::Pcg32;

use super::difficulty::DifficultyAction;
use crate::config::AgentConfig;

/// Number of state features fed to the agent
pub const FEATURE_COUNT: usize = 5;

/// `[difficulty, score / 10000, scroll_speed, obstacle_freq, coin_freq]`
pub type Features = [f32; FEATURE_COUNT];

/// One weight row per action
pub type Weights = [[f32; FEATURE_COUNT]; DifficultyAction::COUNT];

#[inline]
fn dot(a: &[f32; FEATURE_COUNT], b: &Features) -> f32 {
    a.iter().zip(b).map(|(w, s)| w * s).sum()
}

pub struct RlAgent {
    weights: Weights,
    /// State the next update corrects, with the action taken there
    last_state: Option<Features>,
    last_action: DifficultyAction,
    exploration_rate: f32,
    discount: f32,
    learning_rate: f32,
    rng: Pcg32,
}

impl RlAgent {
    /// Fresh agent with all-zero weights
    pub fn new(config: &AgentConfig, rng: Pcg32) -> Self {
        Self {
            weights: [[0.0; FEATURE_COUNT]; DifficultyAction::COUNT],
            last_state: None,
            last_action: DifficultyAction::Easier,
            exploration_rate: config.exploration_rate,
            discount: config.discount,
            learning_rate: config.learning_rate,
            rng,
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Replace the weight matrix (mainly for tests and tooling)
    pub fn set_weights(&mut self, weights: Weights) {
        self.weights = weights;
    }

    pub fn last_state(&self) -> Option<&Features> {
        self.last_state.as_ref()
    }

    pub fn last_action(&self) -> DifficultyAction {
        self.last_action
    }

    pub fn q_value(&self, state: &Features, action: DifficultyAction) -> f32 {
        dot(&self.weights[action.index()], state)
    }

    /// Highest-valued action; ties go to the lowest index
    pub fn best_action(&self, state: &Features) -> DifficultyAction {
        let mut best = DifficultyAction::ALL[0];
        let mut best_q = self.q_value(state, best);
        for action in DifficultyAction::ALL.into_iter().skip(1) {
            let q = self.q_value(state, action);
            if q > best_q {
                best = action;
                best_q = q;
            }
        }
        best
    }

    fn max_q(&self, state: &Features) -> f32 {
        self.q_value(state, self.best_action(state))
    }

    /// Epsilon-greedy action selection
    pub fn choose_action(&mut self, state: &Features) -> DifficultyAction {
        if self.rng.random::<f32>() < self.exploration_rate {
            let index = self.rng.random_range(0..DifficultyAction::COUNT);
            return DifficultyAction::ALL[index];
        }
        self.best_action(state)
    }

    /// Record the state an action was just chosen in, so the next update
    /// credits that action.
    pub fn record(&mut self, state: &Features, action: DifficultyAction) {
        self.last_state = Some(*state);
        self.last_action = action;
    }

    /// One-step TD update.
    ///
    /// Corrects the value of the recorded state under the recorded action
    /// toward `reward + gamma * max_a Q(new_state, a)`, then records
    /// `new_state` as the state to correct next. With nothing recorded yet the
    /// call only records.
    pub fn update(&mut self, new_state: &Features, reward: f32) {
        if let Some(old_state) = self.last_state {
            let target = reward + self.discount * self.max_q(new_state);
            let error = target - self.q_value(&old_state, self.last_action);
            let row = &mut self.weights[self.last_action.index()];
            for (w, s) in row.iter_mut().zip(old_state) {
                *w += self.learning_rate * error * s;
            }
        }

        self.last_state = Some(*new_state);
    }
}
