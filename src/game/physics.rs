use super::state::{Ball, Field, Paddle, Side};

/// Control signals within ±DEAD_ZONE leave a paddle where it is
pub const DEAD_ZONE: f64 = 0.25;

/// What happened to the ball during one collision pass
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PhysicsEvents {
    pub wall_collision: bool,
    pub paddle_hit: Option<Side>,
}

impl PhysicsEvents {
    pub fn paddle_collision(&self) -> bool {
        self.paddle_hit.is_some()
    }
}

/// Steer a paddle by a continuous control signal.
///
/// Positive signals move up (towards y = 0), negative ones down. The paddle is
/// clamped to the field rather than refusing the move.
pub fn move_paddle(paddle: &mut Paddle, signal: f64, field: Field) {
    if signal > DEAD_ZONE {
        paddle.top = (paddle.top - paddle.velocity).max(0.0);
    } else if signal < -DEAD_ZONE {
        paddle.top = (paddle.top + paddle.velocity).min(field.height - paddle.height);
    }
}

/// Advance the ball one tick along its angle and count down the bounce cooldown
pub fn move_ball(ball: &mut Ball) {
    let (dx, dy) = ball.velocity();
    ball.x += dx;
    ball.y += dy;
    ball.bounce_cooldown = ball.bounce_cooldown.saturating_sub(1);
}

/// Reflect the ball off the walls, then off at most one paddle.
///
/// Angles are mirrored with raw degree arithmetic (`360 - a` for the walls,
/// `180 - a` for paddles), so the stored angle can drift far outside
/// [0, 360) over a long rally.
pub fn collide(ball: &mut Ball, left: &Paddle, right: &Paddle, field: Field) -> PhysicsEvents {
    let mut events = PhysicsEvents::default();

    if ball.y <= 0.0 || ball.y + ball.size >= field.height {
        ball.angle = 360.0 - ball.angle;
        events.wall_collision = true;
    }

    if ball.bounce_cooldown > 0 {
        return events;
    }

    // Only the right paddle is considered once the ball is past the left face
    if ball.x <= left.leading_edge() {
        if spans(left, ball) {
            bounce_off_paddle(ball);
            events.paddle_hit = Some(Side::Left);
        }
    } else if ball.x + ball.size >= right.leading_edge() && spans(right, ball) {
        bounce_off_paddle(ball);
        events.paddle_hit = Some(Side::Right);
    }

    events
}

fn spans(paddle: &Paddle, ball: &Ball) -> bool {
    ball.y > paddle.top && ball.y < paddle.bottom()
}

fn bounce_off_paddle(ball: &mut Ball) {
    ball.angle = 180.0 - ball.angle;
    ball.bounce_cooldown = ball.cooldown_reset;
}

/// The side that scored once the ball has left the field, if it has
pub fn check_win(ball: &Ball, field: Field) -> Option<Side> {
    if ball.x <= 0.0 {
        Some(Side::Right)
    } else if ball.x >= field.width {
        Some(Side::Left)
    } else {
        None
    }
}

/// Whether the ball is travelling towards the left paddle
pub fn going_left(ball: &Ball) -> bool {
    ball.angle.to_radians().cos() < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;

    fn setup() -> (PhysicsConfig, Field, Paddle, Paddle) {
        let physics = PhysicsConfig::default();
        let field = Field::from_physics(&physics);
        let left = Paddle::new(Side::Left, &physics);
        let right = Paddle::new(Side::Right, &physics);
        (physics, field, left, right)
    }

    fn ball_at(physics: &PhysicsConfig, x: f64, y: f64, angle: f64, cooldown: u32) -> Ball {
        let mut ball = Ball::new(physics, angle);
        ball.x = x;
        ball.y = y;
        ball.bounce_cooldown = cooldown;
        ball
    }

    #[test]
    fn test_dead_zone_is_a_no_op() {
        let (_, field, mut paddle, _) = setup();
        for top in [0.0, 123.5, 300.0, 600.0] {
            paddle.top = top;
            for signal in [-0.25, -0.1, 0.0, 0.2, 0.25] {
                move_paddle(&mut paddle, signal, field);
                assert_eq!(paddle.top, top, "signal {} moved the paddle", signal);
            }
        }
    }

    #[test]
    fn test_up_move_scenario() {
        let physics = PhysicsConfig {
            paddle_height: 300.0,
            window_height: 800.0,
            ..PhysicsConfig::default()
        };
        let field = Field::from_physics(&physics);
        let mut paddle = Paddle::new(Side::Left, &physics);
        assert_eq!((paddle.top, paddle.bottom()), (250.0, 550.0));

        move_paddle(&mut paddle, 0.5, field);
        assert_eq!((paddle.top, paddle.bottom()), (245.0, 545.0));

        move_paddle(&mut paddle, -0.5, field);
        move_paddle(&mut paddle, -0.5, field);
        assert_eq!(paddle.top, 255.0);
    }

    #[test]
    fn test_paddle_stays_in_field() {
        let (_, field, mut paddle, _) = setup();
        let max_top = field.height - paddle.height;

        // Deterministic but irregular signal pattern that saturates both walls
        for i in 0..2000 {
            let signal = ((i * 37 % 101) as f64 / 50.0 - 1.0) * if i % 400 < 200 { 1.0 } else { -1.0 };
            move_paddle(&mut paddle, signal, field);
            assert!(paddle.top >= 0.0 && paddle.top <= max_top);
        }

        for _ in 0..500 {
            move_paddle(&mut paddle, 1.0, field);
        }
        assert_eq!(paddle.top, 0.0);
        for _ in 0..500 {
            move_paddle(&mut paddle, -1.0, field);
        }
        assert_eq!(paddle.top, max_top);
    }

    #[test]
    fn test_ball_speed_is_constant() {
        let (physics, field, left, right) = setup();
        let mut ball = ball_at(&physics, 600.0, 400.0, 37.0, 0);

        for _ in 0..5000 {
            let (x0, y0) = (ball.x, ball.y);
            move_ball(&mut ball);
            let step = ((ball.x - x0).powi(2) + (ball.y - y0).powi(2)).sqrt();
            assert!((step - physics.ball_speed).abs() < 1e-9);

            collide(&mut ball, &left, &right, field);
            // Keep the ball in play so reflections keep happening
            if check_win(&ball, field).is_some() {
                ball.x = 600.0;
            }
        }
    }

    #[test]
    fn test_wall_reflects_once_per_crossing() {
        let (physics, field, left, right) = setup();
        let mut ball = ball_at(&physics, 600.0, 3.0, -30.0, 0);

        move_ball(&mut ball);
        assert!(ball.y < 0.0);
        let events = collide(&mut ball, &left, &right, field);
        assert!(events.wall_collision);
        assert_eq!(ball.angle, 390.0);
        assert!(ball.velocity().1 > 0.0);

        move_ball(&mut ball);
        let events = collide(&mut ball, &left, &right, field);
        assert!(!events.wall_collision);
        assert_eq!(ball.angle, 390.0);
    }

    #[test]
    fn test_bottom_wall_reflects() {
        let (physics, field, left, right) = setup();
        let mut ball = ball_at(&physics, 600.0, field.height - physics.ball_size, 20.0, 0);

        let events = collide(&mut ball, &left, &right, field);
        assert!(events.wall_collision);
        assert_eq!(ball.angle, 340.0);
        assert!(ball.velocity().1 < 0.0);
    }

    #[test]
    fn test_left_paddle_hit_once_per_cooldown() {
        let (physics, field, left, right) = setup();
        let mut ball = ball_at(&physics, 45.0, 400.0, 180.0, 0);

        let events = collide(&mut ball, &left, &right, field);
        assert_eq!(events.paddle_hit, Some(Side::Left));
        assert_eq!(ball.angle, 0.0);
        assert_eq!(ball.bounce_cooldown, physics.bounce_cooldown);

        // Still at the paddle face, but cooling down
        let mut hits = 0;
        for _ in 0..physics.bounce_cooldown - 1 {
            ball.x = 45.0;
            ball.bounce_cooldown -= 1;
            if collide(&mut ball, &left, &right, field).paddle_collision() {
                hits += 1;
            }
        }
        assert_eq!(hits, 0);

        ball.bounce_cooldown = 0;
        assert!(collide(&mut ball, &left, &right, field).paddle_collision());
    }

    #[test]
    fn test_right_paddle_hit() {
        let (physics, field, left, right) = setup();
        let mut ball = ball_at(&physics, 1125.0, 350.0, 10.0, 0);

        let events = collide(&mut ball, &left, &right, field);
        assert_eq!(events.paddle_hit, Some(Side::Right));
        assert_eq!(ball.angle, 170.0);
        assert!(going_left(&ball));
    }

    #[test]
    fn test_miss_outside_paddle_span() {
        let (physics, field, left, right) = setup();
        // Default paddles span (300, 500)
        for y in [100.0, 300.0, 500.0, 700.0] {
            let mut ball = ball_at(&physics, 45.0, y, 180.0, 0);
            assert!(!collide(&mut ball, &left, &right, field).paddle_collision());
            assert_eq!(ball.angle, 180.0);
        }
    }

    #[test]
    fn test_no_cooldown_means_one_hit_per_tick() {
        let physics = PhysicsConfig {
            bounce_cooldown: 0,
            // Both faces reachable by the same ball position
            window_width: 40.0,
            paddle_margin: 0.0,
            paddle_width: 10.0,
            ..PhysicsConfig::default()
        };
        let field = Field::from_physics(&physics);
        let left = Paddle::new(Side::Left, &physics);
        let right = Paddle::new(Side::Right, &physics);
        let mut ball = ball_at(&physics, 5.0, 400.0, 180.0, 0);
        assert!(ball.x <= left.leading_edge());
        assert!(ball.x + ball.size >= right.leading_edge());

        let events = collide(&mut ball, &left, &right, field);
        assert_eq!(events.paddle_hit, Some(Side::Left));
        // One reflection only: 180 - 180, not reflected back again
        assert_eq!(ball.angle, 0.0);
    }

    #[test]
    fn test_check_win() {
        let (physics, field, _, _) = setup();
        assert_eq!(field.width, 1200.0);

        let mut ball = ball_at(&physics, -1.0, 400.0, 0.0, 0);
        assert_eq!(check_win(&ball, field), Some(Side::Right));
        ball.x = 0.0;
        assert_eq!(check_win(&ball, field), Some(Side::Right));
        ball.x = 1201.0;
        assert_eq!(check_win(&ball, field), Some(Side::Left));
        ball.x = 1200.0;
        assert_eq!(check_win(&ball, field), Some(Side::Left));
        ball.x = 600.0;
        assert_eq!(check_win(&ball, field), None);
    }

    #[test]
    fn test_going_left_with_unwrapped_angles() {
        let (physics, _, _, _) = setup();
        let cases = [
            (0.0, false),
            (120.0, true),
            (-100.0, true),
            (300.0, false),
            (-300.0, false),
            (180.0 + 720.0, true),
            (-1080.0 + 10.0, false),
            // A 30 degree serve after bottom wall, right paddle, top wall, left paddle
            (330.0, false),
            (-150.0, true),
            (510.0, true),
            (-330.0, false),
        ];
        for (angle, expected) in cases {
            let ball = ball_at(&physics, 600.0, 400.0, angle, 0);
            assert_eq!(going_left(&ball), expected, "angle {}", angle);
        }
    }
}
