// Controller trait for evolved paddle agents

use crate::game::{going_left, Ball, Paddle};

/// Number of values an agent observes each tick
pub const OBSERVATION_SIZE: usize = 5;

/// What an agent sees each tick:
/// `[left centre - ball y, ball angle, ball y, going left (0/1), right centre - ball y]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation(pub [f64; OBSERVATION_SIZE]);

impl Observation {
    pub fn capture(ball: &Ball, left: &Paddle, right: &Paddle) -> Self {
        Self([
            left.center() - ball.y,
            ball.angle,
            ball.y,
            if going_left(ball) { 1.0 } else { 0.0 },
            right.center() - ball.y,
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Trait for anything that can steer paddles
///
/// A controller maps an observation of fixed arity to an action vector of fixed
/// arity. The same observation must always produce the same action.
pub trait Controller {
    /// Compute the action for this tick
    ///
    /// # Returns
    /// A vector of exactly `output_size()` control signals
    fn activate(&self, observation: &Observation) -> Vec<f64>;

    /// Length of every vector returned by `activate`
    fn output_size(&self) -> usize;
}
