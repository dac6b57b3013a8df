//! Breakout
//!
//! Paddle at the bottom, a wall of bricks at the top, three lives. The ball
//! rides the paddle until launched; clearing the wall starts the next level
//! with a faster ball.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{Frame, colors};
use crate::sim::collision::{clamp_to_bounds, reflect_velocity};
use crate::sim::{
    Aabb, Clock, Edges, Game, GameEvent, Stats, Step, TickInput, bounce_off_walls,
    circle_aabb_collision,
};
use crate::tuning::BreakoutTuning;

#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub rect: Aabb,
    pub row: u32,
    /// Hits left before it breaks
    pub hits: u8,
    pub visible: bool,
}

pub struct Breakout {
    tuning: BreakoutTuning,
    rng: Pcg32,
    /// Paddle centre x
    paddle_x: f32,
    ball_pos: Vec2,
    ball_vel: Vec2,
    /// Ball sits on the paddle waiting for launch
    attached: bool,
    bricks: Vec<Brick>,
    score: u64,
    lives: u32,
    level: u32,
    last_pointer: Option<Vec2>,
}

impl Breakout {
    pub fn new(tuning: BreakoutTuning, seed: u64) -> Self {
        let mut game = Self {
            rng: Pcg32::seed_from_u64(seed),
            paddle_x: tuning.width * 0.5,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            attached: true,
            bricks: Vec::new(),
            score: 0,
            lives: tuning.lives,
            level: 1,
            last_pointer: None,
            tuning,
        };
        game.reset();
        game
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn ball(&self) -> (Vec2, Vec2) {
        (self.ball_pos, self.ball_vel)
    }

    pub fn paddle(&self) -> Aabb {
        let t = &self.tuning;
        Aabb::new(
            self.paddle_x - t.paddle_width * 0.5,
            t.height - t.paddle_offset,
            t.paddle_width,
            t.paddle_height,
        )
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn bounds(&self) -> Vec2 {
        Vec2::new(self.tuning.width, self.tuning.height)
    }

    fn build_wall(&mut self) {
        let t = &self.tuning;
        self.bricks = (0..t.brick_rows)
            .flat_map(|row| (0..t.brick_cols).map(move |col| (row, col)))
            .map(|(row, col)| Brick {
                rect: Aabb::new(
                    t.brick_left + col as f32 * (t.brick_width + t.brick_padding),
                    t.brick_top + row as f32 * (t.brick_height + t.brick_padding),
                    t.brick_width,
                    t.brick_height,
                ),
                row,
                hits: if row < t.tough_rows { t.tough_hits } else { 1 },
                visible: true,
            })
            .collect();
    }

    fn attach_ball(&mut self) {
        self.attached = true;
        self.ball_vel = Vec2::ZERO;
        self.follow_paddle();
    }

    fn follow_paddle(&mut self) {
        let paddle = self.paddle();
        self.ball_pos = Vec2::new(self.paddle_x, paddle.min.y - self.tuning.ball_radius);
    }

    fn launch_speed(&self) -> f32 {
        self.tuning.base_speed + self.level as f32 * self.tuning.speed_per_level
    }

    fn launch(&mut self, events: &mut Vec<GameEvent>) {
        let spread = self.tuning.launch_spread.abs();
        let angle = self.rng.random_range(-spread..=spread);
        self.ball_vel = Vec2::new(angle.sin(), -angle.cos()) * self.launch_speed();
        self.attached = false;
        events.push(GameEvent::Launch);
    }

    fn move_paddle(&mut self, input: &TickInput, dt: f32) {
        // A pointer that hasn't moved doesn't fight the keyboard
        let moved = input.pointer.filter(|p| Some(*p) != self.last_pointer);
        self.last_pointer = input.pointer;

        let dir = input.horizontal();
        if dir != 0.0 {
            self.paddle_x += dir * self.tuning.paddle_speed * dt;
        } else if let Some(pointer) = moved {
            self.paddle_x = pointer.x;
        }

        let half = self.tuning.paddle_width * 0.5;
        self.paddle_x = self.paddle_x.clamp(half, (self.tuning.width - half).max(half));
    }

    fn hit_paddle(&mut self, events: &mut Vec<GameEvent>) {
        let paddle = self.paddle();
        let radius = self.tuning.ball_radius;
        if self.ball_vel.y <= 0.0 || !circle_aabb_collision(self.ball_pos, radius, &paddle).hit {
            return;
        }

        // Re-aim by where the ball landed: centre goes straight up
        let hit_pos = ((self.ball_pos.x - paddle.min.x) / self.tuning.paddle_width).clamp(0.0, 1.0);
        let angle = (hit_pos - 0.5) * 2.0 * self.tuning.max_bounce_angle;
        let speed = self.ball_vel.length();
        self.ball_vel = Vec2::new(angle.sin(), -angle.cos()) * speed;
        self.ball_pos.y = paddle.min.y - radius;
        events.push(GameEvent::PaddleHit);
    }

    /// Resolve the first brick touched this tick
    fn hit_bricks(&mut self, events: &mut Vec<GameEvent>) {
        let radius = self.tuning.ball_radius;
        let Some((brick, result)) = self
            .bricks
            .iter_mut()
            .filter(|b| b.visible)
            .map(|b| {
                let result = circle_aabb_collision(self.ball_pos, radius, &b.rect);
                (b, result)
            })
            .find(|(_, result)| result.hit)
        else {
            return;
        };

        self.ball_pos += result.normal * result.penetration;
        if self.ball_vel.dot(result.normal) < 0.0 {
            self.ball_vel = reflect_velocity(self.ball_vel, result.normal);
        }

        brick.hits = brick.hits.saturating_sub(1);
        if brick.hits == 0 {
            brick.visible = false;
            let points = self.tuning.brick_points * self.level as u64;
            self.score += points;
            events.push(GameEvent::BrickDestroyed);
            events.push(GameEvent::Scored { points });
        } else {
            events.push(GameEvent::BrickHit);
        }
    }

    fn wall_cleared(&self) -> bool {
        self.bricks.iter().all(|b| !b.visible)
    }
}

impl Game for Breakout {
    fn id(&self) -> &'static str {
        "breakout"
    }

    fn title(&self) -> &'static str {
        "Breakout"
    }

    fn playfield(&self) -> Vec2 {
        self.bounds()
    }

    fn reset(&mut self) {
        self.score = 0;
        self.lives = self.tuning.lives;
        self.level = 1;
        self.paddle_x = self.tuning.width * 0.5;
        self.last_pointer = None;
        self.build_wall();
        self.attach_ball();
    }

    fn step(&mut self, input: &TickInput, clock: Clock, events: &mut Vec<GameEvent>) -> Step {
        self.move_paddle(input, clock.dt);

        if self.attached {
            self.follow_paddle();
            if input.primary {
                self.launch(events);
            }
            return Step::Continue;
        }

        let radius = self.tuning.ball_radius;
        let bounds = self.bounds();
        self.ball_pos += self.ball_vel * clock.dt;

        let touched = bounce_off_walls(
            &mut self.ball_pos,
            &mut self.ball_vel,
            Vec2::splat(radius),
            bounds,
            Edges::SIDES_AND_TOP,
        );
        if touched.any() {
            events.push(GameEvent::WallHit);
        }

        // Floor
        if self.ball_pos.y + radius >= bounds.y {
            self.lives = self.lives.saturating_sub(1);
            events.push(GameEvent::LifeLost {
                lives_left: self.lives,
            });
            if self.lives == 0 {
                self.ball_pos = clamp_to_bounds(self.ball_pos, Vec2::splat(radius), bounds);
                self.ball_vel = Vec2::ZERO;
                return Step::GameOver;
            }
            self.attach_ball();
            return Step::Continue;
        }

        self.hit_paddle(events);
        self.hit_bricks(events);
        self.ball_pos = clamp_to_bounds(self.ball_pos, Vec2::splat(radius), bounds);

        if self.wall_cleared() {
            self.level += 1;
            log::debug!("Breakout level {}", self.level);
            events.push(GameEvent::LevelUp { level: self.level });
            self.build_wall();
            self.attach_ball();
        }

        Step::Continue
    }

    fn stats(&self) -> Stats {
        Stats {
            score: self.score,
            lives: Some(self.lives),
            level: Some(self.level),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        frame.clear(colors::BACKGROUND);

        for brick in self.bricks.iter().filter(|b| b.visible) {
            let color = colors::BRICK_ROWS[brick.row as usize % colors::BRICK_ROWS.len()];
            frame.rect(brick.rect.min, brick.rect.size(), color);
            if brick.hits > 1 {
                frame.rect(
                    brick.rect.min,
                    Vec2::new(brick.rect.size().x, 3.0),
                    colors::BRICK_SHINE,
                );
            }
        }

        let paddle = self.paddle();
        frame.rect(paddle.min, paddle.size(), colors::BREAKOUT_PADDLE);
        frame.circle(self.ball_pos, self.tuning.ball_radius, colors::BALL);
    }

    fn autopilot(&self, clock: Clock) -> TickInput {
        // Wander across the paddle face so the ball doesn't loop straight up
        let offset = (clock.tick as f32 * 0.05).sin() * self.tuning.paddle_width * 0.3;
        TickInput {
            pointer: Some(Vec2::new(self.ball_pos.x + offset, self.ball_pos.y)),
            primary: self.attached,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn clock(tick: u64) -> Clock {
        Clock { tick, dt: SIM_DT }
    }

    fn launched(seed: u64) -> Breakout {
        let mut game = Breakout::new(BreakoutTuning::default(), seed);
        let mut events = Vec::new();
        let input = TickInput {
            primary: true,
            ..Default::default()
        };
        game.step(&input, clock(1), &mut events);
        assert_eq!(events, vec![GameEvent::Launch]);
        game
    }

    #[test]
    fn test_initial_layout() {
        let game = Breakout::new(BreakoutTuning::default(), 1);
        assert_eq!(game.bricks().len(), 40);
        assert_eq!(game.bricks().iter().filter(|b| b.hits == 2).count(), 16);
        assert!(game.is_attached());
        assert_eq!(game.stats().lives, Some(3));
    }

    #[test]
    fn test_launch_goes_up_at_level_speed() {
        let game = launched(7);
        let (_, vel) = game.ball();
        assert!(vel.y < 0.0);
        assert!((vel.length() - 330.0).abs() < 0.01);
        // Within 30 degrees of vertical
        assert!(vel.x.abs() <= vel.length() * 0.5 + 0.01);
    }

    #[test]
    fn test_floor_costs_a_life_and_reattaches() {
        let mut game = launched(3);
        game.ball_pos = Vec2::new(240.0, 395.0);
        game.ball_vel = Vec2::new(0.0, 300.0);

        let mut events = Vec::new();
        assert_eq!(game.step(&TickInput::default(), clock(2), &mut events), Step::Continue);
        assert!(events.contains(&GameEvent::LifeLost { lives_left: 2 }));
        assert!(game.is_attached());
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut game = launched(3);
        game.lives = 1;
        game.ball_pos = Vec2::new(240.0, 395.0);
        game.ball_vel = Vec2::new(0.0, 300.0);

        let mut events = Vec::new();
        assert_eq!(game.step(&TickInput::default(), clock(2), &mut events), Step::GameOver);
        assert_eq!(game.stats().lives, Some(0));
    }

    #[test]
    fn test_tough_brick_needs_two_hits() {
        let mut game = launched(5);
        let target = game.bricks[0].rect;
        assert_eq!(game.bricks[0].hits, 2);

        // Ball just under the brick moving up
        let below = Vec2::new(target.center().x, target.max.y + 7.0);
        game.ball_pos = below;
        game.ball_vel = Vec2::new(0.0, -60.0);
        let mut events = Vec::new();
        game.step(&TickInput::default(), clock(2), &mut events);
        assert!(events.contains(&GameEvent::BrickHit));
        assert!(game.ball().1.y > 0.0);
        assert_eq!(game.score, 0);

        game.ball_pos = below;
        game.ball_vel = Vec2::new(0.0, -60.0);
        events.clear();
        game.step(&TickInput::default(), clock(3), &mut events);
        assert!(events.contains(&GameEvent::BrickDestroyed));
        assert!(events.contains(&GameEvent::Scored { points: 10 }));
        assert!(!game.bricks[0].visible);
        assert_eq!(game.score, 10);
    }

    #[test]
    fn test_only_first_brick_resolved() {
        let mut game = launched(5);
        // Straddle the gap between the first two bottom-row bricks
        let row = game.tuning.brick_rows - 1;
        let first = game
            .bricks
            .iter()
            .position(|b| b.row == row)
            .expect("bottom row");
        let left = game.bricks[first].rect;
        let gap_x = left.max.x + game.tuning.brick_padding * 0.5;
        game.ball_pos = Vec2::new(gap_x, left.max.y + 7.0);
        game.ball_vel = Vec2::new(0.0, -60.0);

        let mut events = Vec::new();
        game.step(&TickInput::default(), clock(2), &mut events);
        let destroyed = events
            .iter()
            .filter(|e| **e == GameEvent::BrickDestroyed)
            .count();
        assert_eq!(destroyed, 1);
        assert!(!game.bricks[first].visible);
        assert!(game.bricks[first + 1].visible);
    }

    #[test]
    fn test_paddle_edge_deflects_sideways() {
        let mut game = launched(9);
        let paddle = game.paddle();
        game.ball_pos = Vec2::new(paddle.max.x - 2.0, paddle.min.y - 7.0);
        game.ball_vel = Vec2::new(0.0, 300.0);

        let mut events = Vec::new();
        game.step(&TickInput::default(), clock(2), &mut events);
        assert!(events.contains(&GameEvent::PaddleHit));
        let (_, vel) = game.ball();
        assert!(vel.y < 0.0);
        assert!(vel.x > 0.0);
        assert!((vel.length() - 300.0).abs() < 0.01);
    }

    #[test]
    fn test_clearing_wall_advances_level() {
        let mut game = launched(2);
        for brick in game.bricks.iter_mut().skip(1) {
            brick.visible = false;
        }
        game.bricks[0].hits = 1;
        let target = game.bricks[0].rect;
        game.ball_pos = Vec2::new(target.center().x, target.max.y + 7.0);
        game.ball_vel = Vec2::new(0.0, -60.0);

        let mut events = Vec::new();
        game.step(&TickInput::default(), clock(2), &mut events);
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
        assert_eq!(game.bricks().iter().filter(|b| b.visible).count(), 40);
        assert!(game.is_attached());
    }

    #[test]
    fn test_keyboard_paddle_clamped() {
        let mut game = Breakout::new(BreakoutTuning::default(), 1);
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        let mut events = Vec::new();
        for tick in 1..200 {
            game.step(&input, clock(tick), &mut events);
        }
        assert_eq!(game.paddle().min.x, 0.0);
        assert_eq!(game.ball().0.x, game.paddle_x);
    }

    #[test]
    fn test_draw_is_pure() {
        let game = launched(4);
        let mut a = Frame::new(game.playfield());
        let mut b = Frame::new(game.playfield());
        game.draw(&mut a);
        game.draw(&mut b);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_ball_and_paddle_stay_in_bounds(
            seed in any::<u64>(),
            moves in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..400),
        ) {
            let mut game = Breakout::new(BreakoutTuning::default(), seed);
            let bounds = game.playfield();
            let mut events = Vec::new();
            for (tick, (left, right, primary)) in moves.into_iter().enumerate() {
                let input = TickInput { left, right, primary, ..Default::default() };
                let step = game.step(&input, clock(tick as u64 + 1), &mut events);

                let (pos, _) = game.ball();
                prop_assert!(pos.x >= 0.0 && pos.x <= bounds.x);
                prop_assert!(pos.y >= 0.0 && pos.y <= bounds.y);
                let paddle = game.paddle();
                prop_assert!(paddle.min.x >= 0.0 && paddle.max.x <= bounds.x);
                if step == Step::GameOver {
                    break;
                }
            }
        }
    }
}
