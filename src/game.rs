use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bird::Bird;
use crate::config::{GameConfig, RestartMode, SpawnMode};
use crate::pipe::Pipe;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Start,
    Playing,
    GameOver,
}

/// Discrete signals delivered by the input source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// Space, enter, click: start, flap or leave the game-over screen.
    Primary,
    Restart,
}

/// Things the shell reacts to: audio, the best-score store, logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted,
    Flapped,
    ScoreChanged(u32),
    RoundOver { score: u32, best: u32 },
    BackToStart,
}

/// Undrained events kept before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 256;

/// The whole game: bird, pipes, mode and scores, advanced once per frame.
pub struct GameLoop<R = StdRng> {
    config: GameConfig,
    bird: Bird,
    pipes: Vec<Pipe>,
    mode: Mode,
    score: u32,
    best_score: u32,
    rng: R,
    frame: u64,
    ground_x: f64,
    events: Vec<GameEvent>,
}

impl GameLoop<StdRng> {
    /// `seed` pins the pipe layout; `None` draws one from the OS.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> GameLoop<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self {
            bird: Bird::new(&config),
            pipes: Vec::new(),
            mode: Mode::Start,
            score: 0,
            best_score: 0,
            rng,
            frame: 0,
            ground_x: 0.0,
            events: Vec::new(),
            config,
        }
    }

    pub fn with_best_score(mut self, best: u32) -> Self {
        self.best_score = best;
        self
    }

    pub fn handle_input(&mut self, input: Input) {
        match (self.mode, input) {
            (Mode::Start, Input::Primary) => self.start_game(),
            (Mode::Playing, Input::Primary) => {
                self.bird.jump(self.mode, &self.config);
                self.push_event(GameEvent::Flapped);
            }
            (Mode::GameOver, _) => self.restart(),
            (Mode::Start | Mode::Playing, Input::Restart) => {}
        }
    }

    pub fn start_game(&mut self) {
        self.mode = Mode::Playing;
        self.score = 0;
        self.pipes.clear();
        self.bird.reset(&self.config);

        if self.config.spawn == SpawnMode::Preseed {
            for i in 1..=self.config.initial_pipes {
                let x = self.config.canvas_width + i as f64 * self.config.pipe_spacing;
                self.pipes.push(Pipe::spawn(x, &self.config, &mut self.rng));
            }
        }

        tracing::info!(pipes = self.pipes.len(), "round started");
        self.push_event(GameEvent::RoundStarted);
        self.push_event(GameEvent::ScoreChanged(0));
    }

    pub fn restart(&mut self) {
        match self.config.restart {
            RestartMode::ToStart => {
                self.score = 0;
                self.pipes.clear();
                self.bird.reset(&self.config);
                self.mode = Mode::Start;
                self.push_event(GameEvent::BackToStart);
            }
            RestartMode::Immediate => self.start_game(),
        }
    }

    pub fn update(&mut self) {
        self.frame += 1;
        match self.mode {
            Mode::Start => self.ground_x += 0.5,
            Mode::Playing => self.step(),
            Mode::GameOver => {}
        }
    }

    fn step(&mut self) {
        self.ground_x += self.config.pipe_speed;
        self.bird.update(self.mode, &self.config);

        if self.bird.y <= -self.config.top_margin || self.bird.bottom() >= self.config.floor_y() {
            self.game_over();
            return;
        }

        for pipe in &mut self.pipes {
            pipe.update(self.config.pipe_speed);
        }
        self.pipes.retain(|p| !p.is_offscreen());

        let should_spawn = match self.pipes.last() {
            Some(last) => last.x < self.config.canvas_width - self.config.pipe_spacing,
            None => self.config.spawn == SpawnMode::Lazy,
        };
        if should_spawn {
            let x = self.config.canvas_width + self.config.spawn_offset;
            let pipe = Pipe::spawn(x, &self.config, &mut self.rng);
            tracing::debug!(x, gap_y = pipe.gap_y, "pipe spawned");
            self.pipes.push(pipe);
        }

        for i in 0..self.pipes.len() {
            if self.pipes[i].check_collision(&self.bird, self.config.hitbox_inset) {
                self.game_over();
                return;
            }
            if self.pipes[i].check_passed(&self.bird) {
                self.score += 1;
                self.push_event(GameEvent::ScoreChanged(self.score));
            }
        }
    }

    fn game_over(&mut self) {
        self.mode = Mode::GameOver;
        self.best_score = self.best_score.max(self.score);
        tracing::info!(score = self.score, best = self.best_score, "round over");
        self.push_event(GameEvent::RoundOver {
            score: self.score,
            best: self.best_score,
        });
    }

    fn push_event(&mut self, event: GameEvent) {
        if self.events.len() == MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Events since the last drain, oldest first. Meant to be drained every
    /// frame; past [`MAX_PENDING_EVENTS`] the oldest are dropped.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Horizontal scroll of the ground texture, in world units.
    pub fn ground_offset(&self) -> f64 {
        self.ground_x
    }

    /// Display-only bob applied to the bird on the title screen.
    pub fn idle_bob(&self) -> f64 {
        if self.mode == Mode::Start {
            (self.frame as f64 * 0.08).sin() * 6.0
        } else {
            0.0
        }
    }

    #[cfg(test)]
    pub(crate) fn bird_mut(&mut self) -> &mut Bird {
        &mut self.bird
    }

    #[cfg(test)]
    pub(crate) fn pipes_mut(&mut self) -> &mut Vec<Pipe> {
        &mut self.pipes
    }
}
