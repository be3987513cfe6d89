pub mod physics;
pub mod state;

pub use physics::{check_win, collide, going_left, move_ball, move_paddle, PhysicsEvents};
pub use state::{Ball, Field, Paddle, Side};
