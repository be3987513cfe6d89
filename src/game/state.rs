use rand::Rng;

use crate::config::PhysicsConfig;

/// Play field dimensions, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f64,
    pub height: f64,
}

impl Field {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_physics(physics: &PhysicsConfig) -> Self {
        Self::new(physics.window_width, physics.window_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub side: Side,
    /// Left edge of the paddle rectangle
    pub x: f64,
    /// Top edge, kept within [0, field.height - height]
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub velocity: f64,
}

impl Paddle {
    /// A paddle vertically centred on its side of the field
    pub fn new(side: Side, physics: &PhysicsConfig) -> Self {
        let x = match side {
            Side::Left => physics.paddle_margin,
            Side::Right => physics.window_width - physics.paddle_width - physics.paddle_margin,
        };

        Self {
            side,
            x,
            top: physics.window_height / 2.0 - physics.paddle_height / 2.0,
            width: physics.paddle_width,
            height: physics.paddle_height,
            velocity: physics.paddle_velocity,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// The face the ball bounces off: right edge for the left paddle, left edge for the right one
    pub fn leading_edge(&self) -> f64 {
        match self.side {
            Side::Left => self.x + self.width,
            Side::Right => self.x,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    /// Top-left corner of the ball square
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Direction in degrees. Reflections never wrap it back into a fixed range.
    pub angle: f64,
    pub speed: f64,
    pub bounce_cooldown: u32,
    pub cooldown_reset: u32,
}

impl Ball {
    pub fn new(physics: &PhysicsConfig, angle: f64) -> Self {
        Self {
            x: physics.window_width / 2.0 - physics.ball_size / 2.0,
            y: physics.window_height / 2.0 - physics.ball_size / 2.0,
            size: physics.ball_size,
            angle,
            speed: physics.ball_speed,
            bounce_cooldown: physics.bounce_cooldown,
            cooldown_reset: physics.bounce_cooldown,
        }
    }

    /// A centred ball with a whole-degree angle drawn from the configured serve range
    pub fn serve<R: Rng + ?Sized>(physics: &PhysicsConfig, rng: &mut R) -> Self {
        let [min, max] = physics.serve_angle_range;
        let angle = rng.gen_range(min..max);
        Self::new(physics, f64::from(angle))
    }

    /// Per-tick displacement (dx, dy)
    pub fn velocity(&self) -> (f64, f64) {
        let rad = self.angle.to_radians();
        (self.speed * rad.cos(), self.speed * rad.sin())
    }
}
