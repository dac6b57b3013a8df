//! Pong against a computer opponent
//!
//! Player on the left, AI on the right. First to the winning score takes
//! the match; the session score is the player's points.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{Frame, colors};
use crate::sim::collision::touched_edges;
use crate::sim::{Aabb, Clock, Edges, Game, GameEvent, Stats, Step, TickInput, bounce_off_walls};
use crate::tuning::PongTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Ai,
}

pub struct Pong {
    tuning: PongTuning,
    rng: Pcg32,
    /// Paddle top edges
    player_y: f32,
    ai_y: f32,
    /// Ball centre
    ball_pos: Vec2,
    ball_vel: Vec2,
    player_score: u32,
    ai_score: u32,
    winner: Option<Side>,
    last_pointer: Option<Vec2>,
}

impl Pong {
    pub fn new(tuning: PongTuning, seed: u64) -> Self {
        let mut game = Self {
            rng: Pcg32::seed_from_u64(seed),
            player_y: 0.0,
            ai_y: 0.0,
            ball_pos: Vec2::ZERO,
            ball_vel: Vec2::ZERO,
            player_score: 0,
            ai_score: 0,
            winner: None,
            last_pointer: None,
            tuning,
        };
        game.reset();
        game
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.player_score, self.ai_score)
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn ball(&self) -> (Vec2, Vec2) {
        (self.ball_pos, self.ball_vel)
    }

    pub fn player_paddle(&self) -> Aabb {
        let t = &self.tuning;
        Aabb::new(t.paddle_inset, self.player_y, t.paddle_width, t.paddle_height)
    }

    pub fn ai_paddle(&self) -> Aabb {
        let t = &self.tuning;
        Aabb::new(
            t.width - t.paddle_inset - t.paddle_width,
            self.ai_y,
            t.paddle_width,
            t.paddle_height,
        )
    }

    fn bounds(&self) -> Vec2 {
        Vec2::new(self.tuning.width, self.tuning.height)
    }

    fn ball_half(&self) -> Vec2 {
        Vec2::splat(self.tuning.ball_size * 0.5)
    }

    fn centered_paddle_y(&self) -> f32 {
        (self.tuning.height - self.tuning.paddle_height) * 0.5
    }

    fn clamp_paddle(&self, y: f32) -> f32 {
        y.clamp(0.0, (self.tuning.height - self.tuning.paddle_height).max(0.0))
    }

    /// Serve from the centre toward the side given by `dir` (-1 left, 1 right)
    fn serve(&mut self, dir: f32) {
        let spread = self.tuning.serve_spread.abs();
        self.ball_pos = self.bounds() * 0.5;
        self.ball_vel = Vec2::new(
            self.tuning.serve_speed * dir,
            self.rng.random_range(-spread..=spread),
        );
    }

    fn move_player(&mut self, input: &TickInput, dt: f32) {
        let moved = input.pointer.filter(|p| Some(*p) != self.last_pointer);
        self.last_pointer = input.pointer;

        let dir = input.vertical();
        if dir != 0.0 {
            self.player_y += dir * self.tuning.player_speed * dt;
        } else if let Some(pointer) = moved {
            self.player_y = pointer.y - self.tuning.paddle_height * 0.5;
        }
        self.player_y = self.clamp_paddle(self.player_y);
    }

    fn move_ai(&mut self, dt: f32) {
        let t = &self.tuning;
        let step = t.ai_speed() * dt;
        let jitter = t.ai_jitter.abs() * 0.5;
        let dead_zone = t.ai_dead_zone;

        if self.ball_vel.x > 0.0 {
            // Chase the ball, slightly off target
            let target = self.ball_pos.y + self.rng.random_range(-jitter..=jitter);
            let center = self.ai_y + t.paddle_height * 0.5;
            if center < target - dead_zone {
                self.ai_y += step;
            } else if center > target + dead_zone {
                self.ai_y -= step;
            }
        } else {
            // Drift home while the ball heads away
            let home = self.centered_paddle_y();
            let slack = dead_zone * 0.5;
            if self.ai_y < home - slack {
                self.ai_y += step * 0.5;
            } else if self.ai_y > home + slack {
                self.ai_y -= step * 0.5;
            }
        }
        self.ai_y = self.clamp_paddle(self.ai_y);
    }

    /// Returns true if the paddle returned the ball
    fn hit_paddle(&mut self, side: Side) -> bool {
        let (paddle, approaching) = match side {
            Side::Player => (self.player_paddle(), self.ball_vel.x < 0.0),
            Side::Ai => (self.ai_paddle(), self.ball_vel.x > 0.0),
        };
        let ball = Aabb::from_center(self.ball_pos, self.ball_half());
        if !approaching || !ball.overlaps(&paddle) {
            return false;
        }

        let t = &self.tuning;
        let speed = (self.ball_vel.x.abs() * t.speedup).min(t.max_speed);
        let hit_pos = ((self.ball_pos.y - paddle.min.y) / t.paddle_height).clamp(0.0, 1.0);
        self.ball_vel.y = (hit_pos - 0.5) * t.english;

        let half = self.ball_half().x;
        match side {
            Side::Player => {
                self.ball_vel.x = speed;
                self.ball_pos.x = paddle.max.x + half;
            }
            Side::Ai => {
                self.ball_vel.x = -speed;
                self.ball_pos.x = paddle.min.x - half;
            }
        }
        true
    }

    fn point(&mut self, scorer: Side, events: &mut Vec<GameEvent>) -> Step {
        let serve_dir = match scorer {
            Side::Player => {
                self.player_score += 1;
                events.push(GameEvent::Scored { points: 1 });
                1.0
            }
            Side::Ai => {
                self.ai_score += 1;
                events.push(GameEvent::PointLost);
                -1.0
            }
        };
        self.serve(serve_dir);

        let target = self.tuning.winning_score;
        if self.player_score >= target || self.ai_score >= target {
            self.winner = Some(scorer);
            self.ball_vel = Vec2::ZERO;
            return Step::GameOver;
        }
        events.push(GameEvent::Launch);
        Step::Continue
    }
}

impl Game for Pong {
    fn id(&self) -> &'static str {
        "pong"
    }

    fn title(&self) -> &'static str {
        "Pong"
    }

    fn playfield(&self) -> Vec2 {
        self.bounds()
    }

    fn reset(&mut self) {
        self.player_score = 0;
        self.ai_score = 0;
        self.winner = None;
        self.last_pointer = None;
        self.player_y = self.centered_paddle_y();
        self.ai_y = self.centered_paddle_y();
        let dir = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.serve(dir);
    }

    fn step(&mut self, input: &TickInput, clock: Clock, events: &mut Vec<GameEvent>) -> Step {
        self.move_player(input, clock.dt);
        self.move_ai(clock.dt);

        let half = self.ball_half();
        let bounds = self.bounds();
        self.ball_pos += self.ball_vel * clock.dt;

        let touched = bounce_off_walls(
            &mut self.ball_pos,
            &mut self.ball_vel,
            half,
            bounds,
            Edges::TOP_AND_BOTTOM,
        );
        if touched.any() {
            events.push(GameEvent::WallHit);
        }

        if self.hit_paddle(Side::Player) || self.hit_paddle(Side::Ai) {
            events.push(GameEvent::PaddleHit);
        }

        let goal = touched_edges(self.ball_pos, half, bounds);
        if goal.left {
            return self.point(Side::Ai, events);
        }
        if goal.right {
            return self.point(Side::Player, events);
        }

        Step::Continue
    }

    fn stats(&self) -> Stats {
        Stats {
            score: self.player_score as u64,
            lives: None,
            level: None,
        }
    }

    fn outcome(&self) -> String {
        match self.winner {
            Some(Side::Player) => "Player Wins!".to_string(),
            Some(Side::Ai) => "AI Wins!".to_string(),
            None => "GAME OVER".to_string(),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let size = self.bounds();
        frame.clear(colors::BACKGROUND);

        // Dashed centre line
        let x = size.x * 0.5;
        let mut y = 0.0;
        while y < size.y {
            let end = (y + 10.0).min(size.y);
            frame.line(Vec2::new(x, y), Vec2::new(x, end), 2.0, colors::CENTER_LINE);
            y += 20.0;
        }

        frame.text(
            Vec2::new(size.x * 0.25, size.y * 0.5),
            120.0,
            self.player_score.to_string(),
            colors::PONG_SCORE,
        );
        frame.text(
            Vec2::new(size.x * 0.75, size.y * 0.5),
            120.0,
            self.ai_score.to_string(),
            colors::PONG_SCORE,
        );

        for paddle in [self.player_paddle(), self.ai_paddle()] {
            frame.rect(paddle.min, paddle.size(), colors::PONG_PADDLE);
        }
        frame.circle(self.ball_pos, self.ball_half().x, colors::BALL);
    }

    fn autopilot(&self, _clock: Clock) -> TickInput {
        let target = if self.ball_vel.x < 0.0 {
            self.ball_pos.y
        } else {
            self.tuning.height * 0.5
        };
        let center = self.player_y + self.tuning.paddle_height * 0.5;
        let dead_zone = self.tuning.ai_dead_zone;
        TickInput {
            up: center > target + dead_zone,
            down: center < target - dead_zone,
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

    fn game() -> Pong {
        Pong::new(PongTuning::default(), 11)
    }

    #[test]
    fn test_reset_centres_everything() {
        let game = game();
        assert_eq!(game.scores(), (0, 0));
        assert_eq!(game.ball().0, Vec2::new(300.0, 200.0));
        assert_eq!(game.ball().1.x.abs(), 300.0);
        assert_eq!(game.player_paddle().min.y, 160.0);
    }

    #[test]
    fn test_player_scores_on_right_edge() {
        let mut game = game();
        game.ball_pos = Vec2::new(590.0, 40.0);
        game.ball_vel = Vec2::new(300.0, 0.0);

        let mut events = Vec::new();
        assert_eq!(game.step(&TickInput::default(), clock(1), &mut events), Step::Continue);
        assert_eq!(game.scores(), (1, 0));
        assert!(events.contains(&GameEvent::Scored { points: 1 }));
        // Re-served from the centre
        assert_eq!(game.ball().0, Vec2::new(300.0, 200.0));
        assert_eq!(game.stats().score, 1);
    }

    #[test]
    fn test_ai_win_ends_match() {
        let mut game = game();
        game.ai_score = 4;
        game.ball_pos = Vec2::new(8.0, 40.0);
        game.ball_vel = Vec2::new(-300.0, 0.0);

        let mut events = Vec::new();
        assert_eq!(game.step(&TickInput::default(), clock(1), &mut events), Step::GameOver);
        assert_eq!(game.winner(), Some(Side::Ai));
        assert_eq!(game.outcome(), "AI Wins!");
        assert!(events.contains(&GameEvent::PointLost));
    }

    #[test]
    fn test_paddle_hit_speeds_up_and_caps() {
        let mut game = game();
        let paddle = game.player_paddle();
        game.ball_pos = Vec2::new(paddle.max.x + 8.0, paddle.center().y);
        game.ball_vel = Vec2::new(-400.0, 0.0);

        let mut events = Vec::new();
        game.step(&TickInput::default(), clock(1), &mut events);
        assert!(events.contains(&GameEvent::PaddleHit));
        let (_, vel) = game.ball();
        assert!((vel.x - 420.0).abs() < 0.01);
        assert!(vel.y.abs() < 1.0);

        let mut game = self::game();
        let paddle = game.player_paddle();
        game.ball_pos = Vec2::new(paddle.max.x + 8.0, paddle.min.y);
        game.ball_vel = Vec2::new(-715.0, 0.0);
        game.step(&TickInput::default(), clock(1), &mut events);
        let (_, vel) = game.ball();
        assert_eq!(vel.x, 720.0);
        // Top of the paddle sends the ball upward
        assert!(vel.y < 0.0);
    }

    #[test]
    fn test_top_wall_reflects() {
        let mut game = game();
        game.ball_pos = Vec2::new(300.0, 7.0);
        game.ball_vel = Vec2::new(100.0, -120.0);

        let mut events = Vec::new();
        game.step(&TickInput::default(), clock(1), &mut events);
        assert!(events.contains(&GameEvent::WallHit));
        let (pos, vel) = game.ball();
        assert_eq!(pos.y, 6.0);
        assert!(vel.y > 0.0);
    }

    #[test]
    fn test_ai_tracks_approaching_ball() {
        let mut game = game();
        game.ball_pos = Vec2::new(400.0, 20.0);
        game.ball_vel = Vec2::new(100.0, 0.0);
        let start = game.ai_y;

        let mut events = Vec::new();
        game.step(&TickInput::default(), clock(1), &mut events);
        assert!(game.ai_y < start);
    }

    #[test]
    fn test_player_paddle_clamped() {
        let mut game = game();
        let input = TickInput {
            up: true,
            ..Default::default()
        };
        let mut events = Vec::new();
        for tick in 1..60 {
            game.step(&input, clock(tick), &mut events);
        }
        assert_eq!(game.player_paddle().min.y, 0.0);
    }

    proptest! {
        #[test]
        fn prop_entities_stay_in_bounds(
            seed in any::<u64>(),
            moves in prop::collection::vec((any::<bool>(), any::<bool>()), 1..600),
        ) {
            let mut game = Pong::new(PongTuning::default(), seed);
            let bounds = game.playfield();
            let mut events = Vec::new();
            for (tick, (up, down)) in moves.into_iter().enumerate() {
                let input = TickInput { up, down, ..Default::default() };
                let step = game.step(&input, clock(tick as u64 + 1), &mut events);

                let (pos, _) = game.ball();
                prop_assert!(pos.x >= 0.0 && pos.x <= bounds.x);
                prop_assert!(pos.y >= 0.0 && pos.y <= bounds.y);
                for paddle in [game.player_paddle(), game.ai_paddle()] {
                    prop_assert!(paddle.min.y >= 0.0 && paddle.max.y <= bounds.y);
                }
                if step == Step::GameOver {
                    break;
                }
            }
        }
    }
}
