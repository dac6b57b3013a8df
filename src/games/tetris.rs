//! Falling-block puzzle
//!
//! Seven tetrominoes fall into a 10x20 well. Full rows clear and score by
//! how many go at once; every ten lines the level rises and gravity speeds up.

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{Color, Frame, TextAlign, colors};
use crate::sim::{Clock, Direction, Game, GameEvent, Stats, Step, TickInput};
use crate::tuning::TetrisTuning;

/// Horizontal offsets tried when a rotation doesn't fit
const KICKS: [i32; 5] = [0, -1, 1, -2, 2];

/// Smallest well that still fits an I piece either way round
const MIN_WELL: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    fn template(self) -> &'static [&'static [u8]] {
        match self {
            PieceKind::I => &[&[1, 1, 1, 1]],
            PieceKind::O => &[&[1, 1], &[1, 1]],
            PieceKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            PieceKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            PieceKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            PieceKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            PieceKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        }
    }

    pub fn color(self) -> Color {
        let index = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        colors::TETROMINOES[index]
    }
}

/// Row-major occupancy mask
pub type Shape = Vec<Vec<bool>>;

fn rotate_clockwise(shape: &Shape) -> Shape {
    let rows = shape.len();
    let cols = shape.first().map_or(0, |r| r.len());
    (0..cols)
        .map(|x| (0..rows).map(|y| shape[rows - 1 - y][x]).collect())
        .collect()
}

fn shape_cells(shape: &Shape, pos: IVec2) -> impl Iterator<Item = IVec2> + '_ {
    shape.iter().enumerate().flat_map(move |(y, row)| {
        row.iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(x, _)| pos + IVec2::new(x as i32, y as i32))
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    /// Top-left of the shape's bounding box
    pub pos: IVec2,
}

fn shape_of(kind: PieceKind) -> Shape {
    kind.template()
        .iter()
        .map(|row| row.iter().map(|c| *c != 0).collect())
        .collect()
}

impl Piece {
    fn spawn(kind: PieceKind, cols: i32) -> Self {
        let shape = shape_of(kind);
        let width = shape.first().map_or(0, |r| r.len()) as i32;
        Self {
            kind,
            shape,
            pos: IVec2::new(cols / 2 - width / 2, 0),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        shape_cells(&self.shape, self.pos)
    }
}

type Board = Vec<Vec<Option<PieceKind>>>;

pub struct Tetris {
    tuning: TetrisTuning,
    rng: Pcg32,
    /// `rows` rows of `cols` cells, top first
    board: Board,
    current: Piece,
    next: PieceKind,
    score: u64,
    lines: u32,
    level: u32,
    /// Time since the last gravity drop
    elapsed: f32,
}

impl Tetris {
    pub fn new(mut tuning: TetrisTuning, seed: u64) -> Self {
        if tuning.cols < MIN_WELL || tuning.rows < MIN_WELL {
            log::warn!(
                "Tetris well {}x{} too small, using at least {}x{}",
                tuning.cols,
                tuning.rows,
                MIN_WELL,
                MIN_WELL
            );
            tuning.cols = tuning.cols.max(MIN_WELL);
            tuning.rows = tuning.rows.max(MIN_WELL);
        }
        let mut game = Self {
            rng: Pcg32::seed_from_u64(seed),
            board: Vec::new(),
            current: Piece::spawn(PieceKind::I, tuning.cols),
            next: PieceKind::I,
            score: 0,
            lines: 0,
            level: 1,
            elapsed: 0.0,
            tuning,
        };
        game.reset();
        game
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<PieceKind> {
        if x < 0 || y < 0 {
            return None;
        }
        self.board.get(y as usize)?.get(x as usize).copied().flatten()
    }

    /// Side panel right of the well: next piece and line count
    fn draw_panel(&self, frame: &mut Frame) {
        let t = &self.tuning;
        if t.panel_cols <= 0 {
            return;
        }
        let cell = t.cell_size;
        let left = t.cols as f32 * cell;
        let width = t.panel_cols as f32 * cell;
        let margin = cell * 0.5;
        frame.rect(
            Vec2::new(left, 0.0),
            Vec2::new(width, t.rows as f32 * cell),
            colors::PANEL,
        );

        frame.text_aligned(
            Vec2::new(left + margin, cell),
            cell * 0.6,
            TextAlign::Left,
            "NEXT",
            colors::TEXT_DIM,
        );
        let shape = shape_of(self.next);
        let shape_width = shape.first().map_or(0, |r| r.len()) as f32 * cell;
        let origin = Vec2::new(left + (width - shape_width) * 0.5, cell * 2.0);
        for c in shape_cells(&shape, IVec2::ZERO) {
            frame.rect(
                origin + c.as_vec2() * cell + Vec2::ONE,
                Vec2::splat((cell - 2.0).max(1.0)),
                self.next.color(),
            );
        }

        frame.text_aligned(
            Vec2::new(left + margin, cell * 5.5),
            cell * 0.6,
            TextAlign::Left,
            "LINES",
            colors::TEXT_DIM,
        );
        frame.text_aligned(
            Vec2::new(left + width - margin, cell * 6.5),
            cell * 0.8,
            TextAlign::Right,
            self.lines.to_string(),
            colors::TEXT,
        );
    }

    /// Seconds per gravity drop at the current level
    pub fn drop_interval(&self) -> f32 {
        let t = &self.tuning;
        (t.start_interval - (self.level - 1) as f32 * t.interval_step).max(t.min_interval)
    }

    fn random_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.random_range(0..PieceKind::ALL.len())]
    }

    fn collides(&self, shape: &Shape, pos: IVec2) -> bool {
        let (cols, rows) = (self.tuning.cols, self.tuning.rows);
        shape_cells(shape, pos).any(|c| {
            c.x < 0
                || c.x >= cols
                || c.y >= rows
                || (c.y >= 0 && self.board[c.y as usize][c.x as usize].is_some())
        })
    }

    fn try_move(&mut self, delta: IVec2) -> bool {
        let pos = self.current.pos + delta;
        if self.collides(&self.current.shape, pos) {
            return false;
        }
        self.current.pos = pos;
        true
    }

    fn rotate(&mut self) -> bool {
        let rotated = rotate_clockwise(&self.current.shape);
        for kick in KICKS {
            let pos = self.current.pos + IVec2::new(kick, 0);
            if !self.collides(&rotated, pos) {
                self.current.shape = rotated;
                self.current.pos = pos;
                return true;
            }
        }
        false
    }

    /// Row the current piece would land on
    fn landing_pos(&self) -> IVec2 {
        let mut pos = self.current.pos;
        while !self.collides(&self.current.shape, pos + IVec2::Y) {
            pos.y += 1;
        }
        pos
    }

    fn lock(&mut self, events: &mut Vec<GameEvent>) -> Step {
        let kind = self.current.kind;
        let cells: Vec<IVec2> = self.current.cells().collect();
        for cell in cells {
            if cell.y < 0 {
                return Step::GameOver;
            }
            self.board[cell.y as usize][cell.x as usize] = Some(kind);
        }
        events.push(GameEvent::PieceLocked);
        self.elapsed = 0.0;

        self.clear_lines(events);
        self.spawn()
    }

    fn clear_lines(&mut self, events: &mut Vec<GameEvent>) {
        let cols = self.tuning.cols as usize;
        self.board.retain(|row| row.iter().any(|c| c.is_none()));
        let cleared = self.tuning.rows as usize - self.board.len();
        if cleared == 0 {
            return;
        }
        for _ in 0..cleared {
            self.board.insert(0, vec![None; cols]);
        }

        let table = &self.tuning.line_points;
        let points = table[cleared.min(table.len() - 1)] * self.level as u64;
        self.score += points;
        self.lines += cleared as u32;
        events.push(GameEvent::LinesCleared {
            lines: cleared as u32,
        });
        events.push(GameEvent::Scored { points });

        let level = self.lines / self.tuning.lines_per_level.max(1) + 1;
        if level > self.level {
            self.level = level;
            log::debug!("Tetris level {} ({} lines)", level, self.lines);
            events.push(GameEvent::LevelUp { level });
        }
    }

    fn spawn(&mut self) -> Step {
        let kind = self.next;
        self.next = self.random_kind();
        self.current = Piece::spawn(kind, self.tuning.cols);
        if self.collides(&self.current.shape, self.current.pos) {
            return Step::GameOver;
        }
        Step::Continue
    }

    fn hard_drop(&mut self, events: &mut Vec<GameEvent>) -> Step {
        while self.try_move(IVec2::Y) {
            self.score += self.tuning.hard_drop_points;
        }
        self.lock(events)
    }

    /// Best (rotations, column) for the current piece by a simple board heuristic
    fn plan(&self) -> Option<(u32, i32)> {
        let (cols, rows) = (self.tuning.cols, self.tuning.rows);
        let mut shape = self.current.shape.clone();
        let mut best: Option<(f32, u32, i32)> = None;

        for rotations in 0..4 {
            let width = shape.first().map_or(0, |r| r.len()) as i32;
            for x in 0..=(cols - width) {
                let mut pos = IVec2::new(x, self.current.pos.y);
                if self.collides(&shape, pos) {
                    continue;
                }
                while !self.collides(&shape, pos + IVec2::Y) {
                    pos.y += 1;
                }

                let mut board = self.board.clone();
                for c in shape_cells(&shape, pos) {
                    board[c.y as usize][c.x as usize] = Some(self.current.kind);
                }
                let value = evaluate(&board, cols, rows);
                // Prefer fewer moves on ties
                if best.is_none_or(|(v, _, _)| value > v) {
                    best = Some((value, rotations, x));
                }
            }
            shape = rotate_clockwise(&shape);
        }

        best.map(|(_, rotations, x)| (rotations, x))
    }
}

/// Higher is better: reward cleared rows, punish height, holes and bumps
fn evaluate(board: &Board, cols: i32, rows: i32) -> f32 {
    let full = board.iter().filter(|r| r.iter().all(|c| c.is_some())).count();
    let mut heights = Vec::with_capacity(cols as usize);
    let mut holes = 0;
    for x in 0..cols as usize {
        let top = (0..rows as usize).find(|&y| board[y][x].is_some());
        let height = top.map_or(0, |y| rows as usize - y);
        heights.push(height as f32);
        if let Some(top) = top {
            holes += (top..rows as usize).filter(|&y| board[y][x].is_none()).count();
        }
    }
    let aggregate: f32 = heights.iter().sum();
    let bumps: f32 = heights.windows(2).map(|w| (w[0] - w[1]).abs()).sum();

    full as f32 * 0.76 - aggregate * 0.51 - holes as f32 * 0.36 - bumps * 0.18
}

impl Game for Tetris {
    fn id(&self) -> &'static str {
        "tetris"
    }

    fn title(&self) -> &'static str {
        "Tetris"
    }

    fn playfield(&self) -> Vec2 {
        let t = &self.tuning;
        Vec2::new(
            (t.cols + t.panel_cols.max(0)) as f32 * t.cell_size,
            t.rows as f32 * t.cell_size,
        )
    }

    fn reset(&mut self) {
        self.board = vec![vec![None; self.tuning.cols as usize]; self.tuning.rows as usize];
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.elapsed = 0.0;
        self.next = self.random_kind();
        let kind = self.random_kind();
        self.current = Piece::spawn(kind, self.tuning.cols);
    }

    fn step(&mut self, input: &TickInput, clock: Clock, events: &mut Vec<GameEvent>) -> Step {
        match input.nudge {
            Some(Direction::Left) => {
                self.try_move(IVec2::NEG_X);
            }
            Some(Direction::Right) => {
                self.try_move(IVec2::X);
            }
            Some(Direction::Down) => {
                if self.try_move(IVec2::Y) {
                    self.score += self.tuning.soft_drop_points;
                }
            }
            Some(Direction::Up) => {
                self.rotate();
            }
            None => {}
        }
        if input.rotate {
            self.rotate();
        }
        if input.primary {
            return self.hard_drop(events);
        }

        self.elapsed += clock.dt;
        if self.elapsed < self.drop_interval() {
            return Step::Continue;
        }
        self.elapsed -= self.drop_interval();
        if self.try_move(IVec2::Y) {
            return Step::Continue;
        }
        self.lock(events)
    }

    fn stats(&self) -> Stats {
        Stats {
            score: self.score,
            lives: None,
            level: Some(self.level),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let cell = self.tuning.cell_size;
        frame.clear(colors::BACKGROUND);
        frame.grid(self.tuning.cols, self.tuning.rows, cell, colors::GRID);

        let block = |frame: &mut Frame, c: IVec2, color: Color| {
            let pos = c.as_vec2() * cell + Vec2::ONE;
            let size = (cell - 2.0).max(1.0);
            frame.rect(pos, Vec2::splat(size), color);
            frame.rect(pos, Vec2::new(size, 3.0), colors::BRICK_SHINE);
        };

        for (y, row) in self.board.iter().enumerate() {
            for (x, kind) in row.iter().enumerate() {
                if let Some(kind) = kind {
                    block(frame, IVec2::new(x as i32, y as i32), kind.color());
                }
            }
        }

        let landing = self.landing_pos();
        for c in shape_cells(&self.current.shape, landing) {
            frame.rect(
                c.as_vec2() * cell + Vec2::ONE,
                Vec2::splat((cell - 2.0).max(1.0)),
                colors::GHOST,
            );
        }
        for c in self.current.cells() {
            block(frame, c, self.current.kind.color());
        }

        self.draw_panel(frame);
    }

    fn autopilot(&self, _clock: Clock) -> TickInput {
        let Some((rotations, x)) = self.plan() else {
            return TickInput::default();
        };
        if rotations > 0 {
            return TickInput {
                rotate: true,
                ..Default::default()
            };
        }
        let nudge = match x.cmp(&self.current.pos.x) {
            std::cmp::Ordering::Less => Some(Direction::Left),
            std::cmp::Ordering::Greater => Some(Direction::Right),
            std::cmp::Ordering::Equal => None,
        };
        TickInput {
            nudge,
            primary: nudge.is_none(),
            ..Default::default()
        }
    }
}
