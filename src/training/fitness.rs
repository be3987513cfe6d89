// Fitness rules tied to game events

use crate::config::FitnessConfig;
use crate::game::{PhysicsEvents, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct FitnessPolicy {
    pub survival_reward: f64,
    pub collision_reward: f64,
    pub terminal_penalty: f64,
    pub max_ticks: Option<u64>,
}

impl FitnessPolicy {
    pub fn from_config(config: &FitnessConfig) -> Self {
        Self {
            survival_reward: config.survival_reward,
            collision_reward: config.collision_reward,
            terminal_penalty: config.terminal_penalty,
            max_ticks: config.max_ticks,
        }
    }

    /// Fitness change for one tick.
    ///
    /// A paddle hit is rewarded even on the tick the ball leaves the field; the
    /// survival reward and the terminal penalty are mutually exclusive.
    pub fn reward(&self, events: &PhysicsEvents, winner: Option<Side>) -> f64 {
        let mut delta = 0.0;
        if events.paddle_collision() {
            delta += self.collision_reward;
        }
        match winner {
            None => delta += self.survival_reward,
            Some(_) => delta -= self.terminal_penalty,
        }
        delta
    }

    pub fn timed_out(&self, ticks: u64) -> bool {
        self.max_ticks.is_some_and(|max| ticks >= max)
    }
}

impl Default for FitnessPolicy {
    fn default() -> Self {
        Self::from_config(&FitnessConfig::default())
    }
}
