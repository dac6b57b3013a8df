//! Snake
//!
//! Grid movement on a timer. The snake waits for a first direction, grows
//! on food and speeds up a little each time; walls and its own body kill it.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::collections::VecDeque;

use crate::renderer::{Frame, colors};
use crate::sim::{Clock, Direction, Game, GameEvent, Stats, Step, TickInput};
use crate::tuning::SnakeTuning;

pub struct Snake {
    tuning: SnakeTuning,
    rng: Pcg32,
    /// Head first
    body: VecDeque<IVec2>,
    food: IVec2,
    /// Direction of the last move
    direction: Option<Direction>,
    /// Direction the next move will take
    next: Option<Direction>,
    /// Seconds between moves
    interval: f32,
    /// Time since the last move
    elapsed: f32,
    score: u64,
}

impl Snake {
    pub fn new(tuning: SnakeTuning, seed: u64) -> Self {
        let mut game = Self {
            rng: Pcg32::seed_from_u64(seed),
            body: VecDeque::new(),
            food: IVec2::ZERO,
            direction: None,
            next: None,
            interval: tuning.start_interval,
            elapsed: 0.0,
            score: 0,
            tuning,
        };
        game.reset();
        game
    }

    pub fn body(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.body.iter().copied()
    }

    pub fn head(&self) -> IVec2 {
        self.body.front().copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn food(&self) -> IVec2 {
        self.food
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.tuning.cols && cell.y < self.tuning.rows
    }

    fn occupied(&self, cell: IVec2) -> bool {
        self.body.contains(&cell)
    }

    /// Place food on a random free cell. Returns false if the board is full.
    fn spawn_food(&mut self) -> bool {
        let free: Vec<IVec2> = (0..self.tuning.rows)
            .flat_map(|y| (0..self.tuning.cols).map(move |x| IVec2::new(x, y)))
            .filter(|cell| !self.occupied(*cell))
            .collect();
        if free.is_empty() {
            return false;
        }
        self.food = free[self.rng.random_range(0..free.len())];
        true
    }

    fn steer(&mut self, wanted: Direction) {
        // No turning back onto the neck
        if self.direction != Some(wanted.opposite()) {
            self.next = Some(wanted);
        }
    }

    fn advance(&mut self, direction: Direction, events: &mut Vec<GameEvent>) -> Step {
        let head = self.head() + direction.delta();
        if !self.in_bounds(head) || self.occupied(head) {
            return Step::GameOver;
        }

        self.body.push_front(head);
        if head != self.food {
            self.body.pop_back();
            return Step::Continue;
        }

        let points = self.tuning.food_points;
        self.score += points;
        self.interval = (self.interval - self.tuning.interval_step).max(self.tuning.min_interval);
        events.push(GameEvent::FoodEaten);
        events.push(GameEvent::Scored { points });

        if !self.spawn_food() {
            log::info!("Snake filled the board");
            return Step::GameOver;
        }
        Step::Continue
    }

    /// Cells reachable in one move without dying
    fn safe_moves(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(move |dir| {
            let cell = self.head() + dir.delta();
            self.direction != Some(dir.opposite()) && self.in_bounds(cell) && !self.occupied(cell)
        })
    }
}

impl Game for Snake {
    fn id(&self) -> &'static str {
        "snake"
    }

    fn title(&self) -> &'static str {
        "Snake"
    }

    fn playfield(&self) -> Vec2 {
        Vec2::new(
            self.tuning.cols as f32 * self.tuning.cell_size,
            self.tuning.rows as f32 * self.tuning.cell_size,
        )
    }

    fn reset(&mut self) {
        self.body.clear();
        self.body
            .push_back(IVec2::new(self.tuning.cols / 2, self.tuning.rows / 2));
        self.direction = None;
        self.next = None;
        self.interval = self.tuning.start_interval;
        self.elapsed = 0.0;
        self.score = 0;
        self.spawn_food();
    }

    fn step(&mut self, input: &TickInput, clock: Clock, events: &mut Vec<GameEvent>) -> Step {
        if let Some(wanted) = input.nudge {
            self.steer(wanted);
        }

        // Still until the first direction
        let Some(direction) = self.next else {
            return Step::Continue;
        };

        self.elapsed += clock.dt;
        if self.elapsed < self.interval {
            return Step::Continue;
        }
        self.elapsed -= self.interval;
        self.direction = Some(direction);
        self.advance(direction, events)
    }

    fn stats(&self) -> Stats {
        Stats {
            score: self.score,
            lives: None,
            level: None,
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let cell = self.tuning.cell_size;
        frame.clear(colors::BACKGROUND);
        frame.grid(self.tuning.cols, self.tuning.rows, cell, colors::GRID);

        let to_px = |c: IVec2| c.as_vec2() * cell;
        frame.circle(
            to_px(self.food) + Vec2::splat(cell * 0.5),
            (cell * 0.5 - 2.0).max(1.0),
            colors::FOOD,
        );

        let len = self.body.len() as f32;
        for (i, segment) in self.body.iter().enumerate() {
            let color = if i == 0 {
                colors::SNAKE_HEAD
            } else {
                // Fade toward the tail
                let mut c = colors::SNAKE_BODY;
                c[3] = 1.0 - (i as f32 / len) * 0.5;
                c
            };
            frame.rect(
                to_px(*segment) + Vec2::ONE,
                Vec2::splat((cell - 2.0).max(1.0)),
                color,
            );
        }
    }

    fn autopilot(&self, _clock: Clock) -> TickInput {
        // Greedy: the safe move that gets closest to the food
        let head = self.head();
        let nudge = self.safe_moves().min_by_key(|dir| {
            let d = self.food - (head + dir.delta());
            d.x.abs() + d.y.abs()
        });
        TickInput {
            nudge,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn clock(tick: u64) -> Clock {
        Clock { tick, dt: SIM_DT }
    }

    fn nudge(direction: Direction) -> TickInput {
        TickInput {
            nudge: Some(direction),
            ..Default::default()
        }
    }

    /// Tick until the snake has made one more move
    fn step_one_move(game: &mut Snake, first: TickInput, events: &mut Vec<GameEvent>) -> Step {
        let start = game.head();
        let len = game.len();
        let mut input = first;
        for tick in 1..=60 {
            let step = game.step(&input, clock(tick), events);
            input = TickInput::default();
            if step == Step::GameOver || game.head() != start || game.len() != len {
                return step;
            }
        }
        panic!("snake never moved");
    }

    #[test]
    fn test_waits_for_first_direction() {
        let mut game = Snake::new(SnakeTuning::default(), 1);
        let start = game.head();
        let mut events = Vec::new();
        for tick in 1..120 {
            game.step(&TickInput::default(), clock(tick), &mut events);
        }
        assert_eq!(game.head(), start);
        assert_eq!(start, IVec2::new(10, 10));
    }

    #[test]
    fn test_moves_one_cell_per_interval() {
        let mut game = Snake::new(SnakeTuning::default(), 1);
        game.food = IVec2::new(0, 0);
        let mut events = Vec::new();

        game.step(&nudge(Direction::Right), clock(1), &mut events);
        for tick in 2..=7 {
            game.step(&TickInput::default(), clock(tick), &mut events);
        }
        assert_eq!(game.head(), IVec2::new(11, 10));

        // Half an interval later it hasn't moved again
        for tick in 8..=10 {
            game.step(&TickInput::default(), clock(tick), &mut events);
        }
        assert_eq!(game.head(), IVec2::new(11, 10));
    }

    #[test]
    fn test_reverse_is_ignored() {
        let mut game = Snake::new(SnakeTuning::default(), 1);
        game.food = IVec2::new(0, 0);
        let mut events = Vec::new();
        step_one_move(&mut game, nudge(Direction::Right), &mut events);
        step_one_move(&mut game, nudge(Direction::Left), &mut events);
        assert_eq!(game.head(), IVec2::new(12, 10));
    }

    #[test]
    fn test_eating_grows_and_speeds_up() {
        let mut game = Snake::new(SnakeTuning::default(), 1);
        game.food = IVec2::new(11, 10);
        let mut events = Vec::new();
        step_one_move(&mut game, nudge(Direction::Right), &mut events);

        assert_eq!(game.len(), 2);
        assert_eq!(game.stats().score, 10);
        assert!(events.contains(&GameEvent::FoodEaten));
        assert!((game.interval() - 0.098).abs() < 1e-6);
        assert!(!game.body().any(|c| c == game.food()));
    }

    #[test]
    fn test_interval_floor() {
        let tuning = SnakeTuning {
            start_interval: 0.051,
            ..Default::default()
        };
        let mut game = Snake::new(tuning, 1);
        game.food = IVec2::new(11, 10);
        let mut events = Vec::new();
        step_one_move(&mut game, nudge(Direction::Right), &mut events);
        assert_eq!(game.interval(), 0.05);
    }

    #[test]
    fn test_wall_ends_game() {
        let mut game = Snake::new(SnakeTuning::default(), 1);
        game.body = VecDeque::from([IVec2::new(19, 10)]);
        game.food = IVec2::new(0, 0);
        let mut events = Vec::new();
        let step = step_one_move(&mut game, nudge(Direction::Right), &mut events);
        assert_eq!(step, Step::GameOver);
        assert_eq!(game.head(), IVec2::new(19, 10));
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut game = Snake::new(SnakeTuning::default(), 1);
        // Head at (5,5) heading up into its own body
        game.body = VecDeque::from([
            IVec2::new(5, 5),
            IVec2::new(6, 5),
            IVec2::new(6, 4),
            IVec2::new(5, 4),
            IVec2::new(4, 4),
        ]);
        game.direction = Some(Direction::Left);
        game.food = IVec2::new(0, 0);
        let mut events = Vec::new();
        let step = step_one_move(&mut game, nudge(Direction::Up), &mut events);
        assert_eq!(step, Step::GameOver);
    }

    #[test]
    fn test_full_board_ends_game() {
        let tuning = SnakeTuning {
            cols: 2,
            rows: 1,
            ..Default::default()
        };
        let mut game = Snake::new(tuning, 1);
        assert_eq!(game.head(), IVec2::new(1, 0));
        assert_eq!(game.food(), IVec2::new(0, 0));

        let mut events = Vec::new();
        let step = step_one_move(&mut game, nudge(Direction::Left), &mut events);
        assert_eq!(step, Step::GameOver);
        assert_eq!(game.stats().score, 10);
    }

    #[test]
    fn test_reset_restores_layout() {
        let mut game = Snake::new(SnakeTuning::default(), 1);
        game.food = IVec2::new(11, 10);
        let mut events = Vec::new();
        step_one_move(&mut game, nudge(Direction::Right), &mut events);

        game.reset();
        assert_eq!(game.len(), 1);
        assert_eq!(game.head(), IVec2::new(10, 10));
        assert_eq!(game.stats().score, 0);
        assert_eq!(game.interval(), 0.1);
    }

    #[test]
    fn test_autopilot_heads_for_food() {
        let mut game = Snake::new(SnakeTuning::default(), 1);
        game.food = IVec2::new(10, 3);
        let input = game.autopilot(clock(1));
        assert_eq!(input.nudge, Some(Direction::Up));
    }
}
