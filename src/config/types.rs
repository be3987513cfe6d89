// NeuroPong configuration types
// Defaults give a 1200x800 field drawn at 120 FPS

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub fitness: FitnessConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub evolution: EvolutionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Reject settings the simulation cannot run with.
    ///
    /// Called once at startup so a bad file fails before the first generation.
    pub fn validate(&self) -> Result<()> {
        let p = &self.physics;
        let f = &self.fitness;
        let e = &self.evolution;

        // NaN slips past every range check below
        let finite = [
            ("window_width", p.window_width),
            ("window_height", p.window_height),
            ("paddle_height", p.paddle_height),
            ("paddle_width", p.paddle_width),
            ("paddle_velocity", p.paddle_velocity),
            ("paddle_margin", p.paddle_margin),
            ("ball_size", p.ball_size),
            ("ball_speed", p.ball_speed),
            ("survival_reward", f.survival_reward),
            ("collision_reward", f.collision_reward),
            ("terminal_penalty", f.terminal_penalty),
            ("survival_threshold", e.survival_threshold),
            ("fitness_threshold", e.fitness_threshold.unwrap_or(0.0)),
            ("weight_init_stdev", e.weight_init_stdev),
            ("weight_mutate_rate", e.weight_mutate_rate),
            ("weight_mutate_power", e.weight_mutate_power),
            ("weight_replace_rate", e.weight_replace_rate),
            ("weight_max_value", e.weight_max_value),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }

        if p.window_width <= 0.0 || p.window_height <= 0.0 {
            return Err(SimError::InvalidConfig(
                "window dimensions must be positive".to_string(),
            ));
        }
        if p.paddle_height <= 0.0 || p.paddle_height > p.window_height {
            return Err(SimError::InvalidConfig(format!(
                "paddle_height {} must be in (0, {}]",
                p.paddle_height, p.window_height
            )));
        }
        if p.paddle_width <= 0.0 || p.paddle_velocity < 0.0 {
            return Err(SimError::InvalidConfig(
                "paddle_width must be positive and paddle_velocity non-negative".to_string(),
            ));
        }
        if p.ball_size <= 0.0 || p.ball_speed <= 0.0 {
            return Err(SimError::InvalidConfig(
                "ball_size and ball_speed must be positive".to_string(),
            ));
        }
        if p.serve_angle_range[0] >= p.serve_angle_range[1] {
            return Err(SimError::InvalidConfig(format!(
                "serve_angle_range {:?} is empty",
                p.serve_angle_range
            )));
        }

        if e.population_size < 2 {
            return Err(SimError::PopulationTooSmall(e.population_size));
        }
        if e.elitism >= e.population_size {
            return Err(SimError::InvalidConfig(format!(
                "elitism {} must be smaller than population_size {}",
                e.elitism, e.population_size
            )));
        }
        if !(e.survival_threshold > 0.0 && e.survival_threshold <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "survival_threshold {} must be in (0, 1]",
                e.survival_threshold
            )));
        }
        for (name, rate) in [
            ("weight_mutate_rate", e.weight_mutate_rate),
            ("weight_replace_rate", e.weight_replace_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SimError::InvalidConfig(format!(
                    "{} {} must be in [0, 1]",
                    name, rate
                )));
            }
        }
        if e.weight_mutate_power < 0.0 || e.weight_init_stdev < 0.0 || e.weight_max_value <= 0.0 {
            return Err(SimError::InvalidConfig(
                "weight distribution parameters must be non-negative".to_string(),
            ));
        }

        if self.display.target_fps == 0 {
            return Err(SimError::InvalidConfig(
                "target_fps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // Play field in window units, y grows downward
    pub window_width: f64,
    pub window_height: f64,

    pub paddle_height: f64,
    pub paddle_width: f64,

    // Distance a paddle moves per tick when steered
    pub paddle_velocity: f64,

    // Gap between a paddle and its side of the field
    pub paddle_margin: f64,

    pub ball_size: f64,

    // Distance the ball travels per tick
    pub ball_speed: f64,

    // Ticks after a paddle hit during which no paddle can reflect the ball (0 = none)
    pub bounce_cooldown: u32,

    // Serve angle in whole degrees, drawn from [min, max)
    pub serve_angle_range: [i32; 2],
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            window_width: 1200.0,
            window_height: 800.0,
            paddle_height: 200.0,
            paddle_width: 30.0,
            paddle_velocity: 5.0,
            paddle_margin: 20.0,
            ball_size: 30.0,
            ball_speed: 10.0,
            bounce_cooldown: 10,
            serve_angle_range: [-44, 44],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FitnessConfig {
    // Added every tick the episode survives
    pub survival_reward: f64,

    // Added when the ball bounces off a paddle
    pub collision_reward: f64,

    // Subtracted once when the ball leaves the field
    pub terminal_penalty: f64,

    // Episode length cap in ticks, retires the agent without penalty (omit for no cap)
    pub max_ticks: Option<u64>,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            survival_reward: 0.1,
            collision_reward: 100.0,
            terminal_penalty: 100.0,
            max_ticks: Some(10_000),
        }
    }
}

/// How the agents of one generation are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Every agent plays its own ball at the same time, one tick each per frame
    Lockstep,
    /// Agents play one after another
    Sequential,
}

/// How controller outputs map onto the two paddles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddleControl {
    /// One output steers both paddles
    Shared,
    /// Output 0 steers the left paddle, output 1 the right paddle
    Independent,
}

impl PaddleControl {
    pub fn outputs(self) -> usize {
        match self {
            PaddleControl::Shared => 1,
            PaddleControl::Independent => 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub mode: EvaluationMode,
    pub paddle_control: PaddleControl,

    // Number of generations to run
    pub generations: usize,

    // RNG seed, omit for a random run
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            mode: EvaluationMode::Lockstep,
            paddle_control: PaddleControl::Shared,
            generations: 1000,
            seed: None,
        }
    }
}

/// Parameters of the evolution driver, passed through without interpretation by the game
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,

    // Hidden tanh units between observation and action (0 = direct connections)
    pub hidden_nodes: usize,

    // Best genomes copied unchanged into the next generation
    pub elitism: usize,

    // Fraction of the ranked population allowed to reproduce
    pub survival_threshold: f64,

    // Stop once the best genome reaches this fitness
    pub fitness_threshold: Option<f64>,

    pub weight_init_stdev: f64,
    pub weight_mutate_rate: f64,
    pub weight_mutate_power: f64,
    pub weight_replace_rate: f64,
    pub weight_max_value: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            hidden_nodes: 0,
            elitism: 2,
            survival_threshold: 0.2,
            fitness_threshold: None,
            weight_init_stdev: 1.0,
            weight_mutate_rate: 0.8,
            weight_mutate_power: 0.5,
            weight_replace_rate: 0.1,
            weight_max_value: 30.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    // Frame cap of the terminal renderer
    pub target_fps: u64,

    // RGB values 0-255
    pub background_color: [u8; 3],
    pub paddle_color: [u8; 3],
    pub ball_color: [u8; 3],
    pub text_color: [u8; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: 120,
            background_color: [0, 0, 0],
            paddle_color: [200, 200, 200],
            ball_color: [255, 255, 255],
            text_color: [255, 255, 255],
        }
    }
}
