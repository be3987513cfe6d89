// One agent's play-through: a ball, two paddles and a state machine

use rand::Rng;
use tracing::debug;

use super::fitness::FitnessPolicy;
use crate::ai::{Controller, Observation};
use crate::config::{PaddleControl, PhysicsConfig};
use crate::error::{Result, SimError};
use crate::game::{self, Ball, Field, Paddle, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The ball left the field and this side scored
    Scored(Side),
    /// The tick cap was reached with the ball still in play
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeState {
    Running,
    Done(Outcome),
}

#[derive(Debug, Clone)]
pub struct Episode {
    pub ball: Ball,
    pub left: Paddle,
    pub right: Paddle,
    pub state: EpisodeState,
    pub ticks: u64,
    pub hits: u32,
}

impl Episode {
    pub fn new<R: Rng + ?Sized>(physics: &PhysicsConfig, rng: &mut R) -> Self {
        Self::with_ball(physics, Ball::serve(physics, rng))
    }

    pub fn with_ball(physics: &PhysicsConfig, ball: Ball) -> Self {
        Self {
            ball,
            left: Paddle::new(Side::Left, physics),
            right: Paddle::new(Side::Right, physics),
            state: EpisodeState::Running,
            ticks: 0,
            hits: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == EpisodeState::Running
    }

    pub fn observe(&self) -> Observation {
        Observation::capture(&self.ball, &self.left, &self.right)
    }

    /// Move the ball, resolve collisions and settle the tick's fitness change.
    ///
    /// Returns 0 once the episode is done; a finished episode never restarts.
    pub fn advance(&mut self, field: Field, policy: &FitnessPolicy) -> f64 {
        if !self.is_running() {
            return 0.0;
        }

        game::move_ball(&mut self.ball);
        let events = game::collide(&mut self.ball, &self.left, &self.right, field);
        if events.paddle_collision() {
            self.hits += 1;
        }

        let winner = game::check_win(&self.ball, field);
        let delta = policy.reward(&events, winner);
        self.ticks += 1;

        if let Some(side) = winner {
            self.state = EpisodeState::Done(Outcome::Scored(side));
        } else if policy.timed_out(self.ticks) {
            self.state = EpisodeState::Done(Outcome::TimedOut);
        }

        if let EpisodeState::Done(outcome) = self.state {
            debug!(?outcome, ticks = self.ticks, hits = self.hits, "episode finished");
        }
        delta
    }

    /// Ask the controller for this tick's action and move the paddles
    pub fn steer<C: Controller + ?Sized>(
        &mut self,
        controller: &C,
        control: PaddleControl,
        field: Field,
    ) -> Result<()> {
        if !self.is_running() {
            return Ok(());
        }

        let output = controller.activate(&self.observe());
        let expected = control.outputs();
        if output.len() < expected {
            return Err(SimError::ControllerArity {
                expected,
                actual: output.len(),
            });
        }

        match control {
            PaddleControl::Shared => {
                game::move_paddle(&mut self.left, output[0], field);
                game::move_paddle(&mut self.right, output[0], field);
            }
            PaddleControl::Independent => {
                game::move_paddle(&mut self.left, output[0], field);
                game::move_paddle(&mut self.right, output[1], field);
            }
        }
        Ok(())
    }

    /// One full tick: physics then, if still in play, the controller's move
    pub fn tick<C: Controller + ?Sized>(
        &mut self,
        controller: &C,
        control: PaddleControl,
        field: Field,
        policy: &FitnessPolicy,
    ) -> Result<f64> {
        let delta = self.advance(field, policy);
        self.steer(controller, control, field)?;
        Ok(delta)
    }
}

/// Check a controller's declared output size against the paddle control scheme
pub fn check_arity<C: Controller + ?Sized>(controller: &C, control: PaddleControl) -> Result<()> {
    let expected = control.outputs();
    let actual = controller.output_size();
    if actual != expected {
        return Err(SimError::ControllerArity { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Plays back fixed outputs and remembers every observation it was shown
    pub(crate) struct ScriptedController {
        pub output: Vec<f64>,
        pub seen: RefCell<Vec<Observation>>,
    }

    impl ScriptedController {
        pub(crate) fn new(output: Vec<f64>) -> Self {
            Self {
                output,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Controller for ScriptedController {
        fn activate(&self, observation: &Observation) -> Vec<f64> {
            self.seen.borrow_mut().push(*observation);
            self.output.clone()
        }

        fn output_size(&self) -> usize {
            self.output.len()
        }
    }

    fn straight_left(physics: &PhysicsConfig) -> Episode {
        // Serve flat towards the left wall, the paddle never moves into the way
        let mut episode = Episode::with_ball(physics, Ball::new(physics, 180.0));
        episode.left.top = 0.0;
        episode.right.top = 0.0;
        episode
    }

    #[test]
    fn test_terminal_penalty_without_collision() {
        let physics = PhysicsConfig::default();
        let field = Field::from_physics(&physics);
        let policy = FitnessPolicy::default();
        let idle = ScriptedController::new(vec![0.0]);
        let mut episode = straight_left(&physics);

        let mut fitness = 0.0;
        while episode.is_running() {
            fitness += episode
                .tick(&idle, PaddleControl::Shared, field, &policy)
                .unwrap();
        }

        assert_eq!(episode.state, EpisodeState::Done(Outcome::Scored(Side::Right)));
        assert_eq!(episode.hits, 0);
        // Ball starts at x = 585 and moves 10 per tick: out on tick 59
        assert_eq!(episode.ticks, 59);
        let expected = 58.0 * 0.1 - 100.0;
        assert!((fitness - expected).abs() < 1e-9, "fitness {}", fitness);
    }

    #[test]
    fn test_done_episode_is_frozen() {
        let physics = PhysicsConfig::default();
        let field = Field::from_physics(&physics);
        let policy = FitnessPolicy::default();
        let up = ScriptedController::new(vec![1.0]);
        let mut episode = straight_left(&physics);

        while episode.is_running() {
            episode.tick(&up, PaddleControl::Shared, field, &policy).unwrap();
        }
        let snapshot = (episode.ball.clone(), episode.left.clone(), episode.ticks);
        let calls = up.seen.borrow().len();

        assert_eq!(episode.tick(&up, PaddleControl::Shared, field, &policy).unwrap(), 0.0);
        assert_eq!((episode.ball.clone(), episode.left.clone(), episode.ticks), snapshot);
        assert_eq!(up.seen.borrow().len(), calls);
    }

    #[test]
    fn test_collision_rewarded() {
        let physics = PhysicsConfig::default();
        let field = Field::from_physics(&physics);
        let policy = FitnessPolicy::default();
        let idle = ScriptedController::new(vec![0.0]);
        // Default paddles span (300, 500) and the ball rides at y = 385
        let mut episode = Episode::with_ball(&physics, Ball::new(&physics, 180.0));

        let mut fitness = 0.0;
        for _ in 0..60 {
            fitness += episode.tick(&idle, PaddleControl::Shared, field, &policy).unwrap();
        }

        assert!(episode.is_running());
        assert_eq!(episode.hits, 1);
        assert!((fitness - (100.0 + 60.0 * 0.1)).abs() < 1e-9);
        assert!(!game::going_left(&episode.ball));
    }

    #[test]
    fn test_tick_cap_retires_without_penalty() {
        let physics = PhysicsConfig::default();
        let field = Field::from_physics(&physics);
        let policy = FitnessPolicy {
            max_ticks: Some(5),
            ..FitnessPolicy::default()
        };
        let idle = ScriptedController::new(vec![0.0]);
        let mut episode = Episode::with_ball(&physics, Ball::new(&physics, 0.0));

        let mut fitness = 0.0;
        while episode.is_running() {
            fitness += episode.tick(&idle, PaddleControl::Shared, field, &policy).unwrap();
        }

        assert_eq!(episode.state, EpisodeState::Done(Outcome::TimedOut));
        assert_eq!(episode.ticks, 5);
        assert!((fitness - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_shared_and_independent_control() {
        let physics = PhysicsConfig::default();
        let field = Field::from_physics(&physics);

        let mut shared = Episode::with_ball(&physics, Ball::new(&physics, 0.0));
        shared
            .steer(&ScriptedController::new(vec![0.9]), PaddleControl::Shared, field)
            .unwrap();
        assert_eq!((shared.left.top, shared.right.top), (295.0, 295.0));

        let mut split = Episode::with_ball(&physics, Ball::new(&physics, 0.0));
        split
            .steer(
                &ScriptedController::new(vec![0.9, -0.9]),
                PaddleControl::Independent,
                field,
            )
            .unwrap();
        assert_eq!((split.left.top, split.right.top), (295.0, 305.0));
    }

    #[test]
    fn test_short_output_is_an_error() {
        let physics = PhysicsConfig::default();
        let field = Field::from_physics(&physics);
        let mut episode = Episode::with_ball(&physics, Ball::new(&physics, 0.0));

        let err = episode
            .steer(
                &ScriptedController::new(vec![0.9]),
                PaddleControl::Independent,
                field,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::ControllerArity {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_check_arity() {
        let one = ScriptedController::new(vec![0.0]);
        assert!(check_arity(&one, PaddleControl::Shared).is_ok());
        assert!(check_arity(&one, PaddleControl::Independent).is_err());
    }
}
