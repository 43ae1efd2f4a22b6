use ndarray::s;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Frame, RawEnvironment, RawStep};
use crate::error::{DqnError, Result};

const HEIGHT: usize = 210;
const WIDTH: usize = 160;

/// Rows the ball and paddles may occupy.
const PLAY_TOP: f32 = 34.0;
const PLAY_BOTTOM: f32 = 194.0;

const PADDLE_HEIGHT: f32 = 16.0;
const PADDLE_WIDTH: f32 = 4.0;
const OPPONENT_X: f32 = 16.0;
const AGENT_X: f32 = 140.0;
const AGENT_SPEED: f32 = 3.0;
const OPPONENT_SPEED: f32 = 2.0;

const BALL_WIDTH: f32 = 2.0;
const BALL_HEIGHT: f32 = 4.0;
const BALL_SPEED_X: f32 = 2.0;
const MAX_BALL_SPEED_Y: f32 = 3.0;
const SERVE_DELAY: u32 = 16;

const BACKGROUND: [u8; 3] = [144, 72, 17];
const WALL: [u8; 3] = [236, 236, 236];
const BALL: [u8; 3] = [236, 236, 236];
const OPPONENT: [u8; 3] = [213, 130, 74];
const AGENT: [u8; 3] = [92, 186, 92];

/// Action meanings, matching Atari Pong's minimal set extended with the
/// two fire-and-move actions.
pub const NOOP: usize = 0;
pub const FIRE: usize = 1;
pub const UP: usize = 2;
pub const DOWN: usize = 3;
pub const UP_FIRE: usize = 4;
pub const DOWN_FIRE: usize = 5;
const NUM_ACTIONS: usize = 6;

/// A 210x160 RGB paddle game. The agent controls the right paddle against
/// a speed-limited opponent that tracks the ball. Each point pays +1 to the
/// scorer's side (so -1 when the opponent scores); an episode ends when one
/// side reaches `points_to_win` or after `max_frames` frames.
pub struct PaddleGame {
    points_to_win: u32,
    max_frames: u64,
    rng: StdRng,
    ball: (f32, f32),
    velocity: (f32, f32),
    agent_y: f32,
    opponent_y: f32,
    score: (u32, u32),
    serve_timer: u32,
    frames: u64,
}

impl PaddleGame {
    pub fn new(points_to_win: u32) -> Self {
        Self::with_rng(points_to_win, StdRng::from_entropy())
    }

    pub fn with_seed(points_to_win: u32, seed: u64) -> Self {
        Self::with_rng(points_to_win, StdRng::seed_from_u64(seed))
    }

    fn with_rng(points_to_win: u32, rng: StdRng) -> Self {
        let mut game = PaddleGame {
            points_to_win: points_to_win.max(1),
            max_frames: u64::MAX,
            rng,
            ball: (0.0, 0.0),
            velocity: (0.0, 0.0),
            agent_y: 0.0,
            opponent_y: 0.0,
            score: (0, 0),
            serve_timer: 0,
            frames: 0,
        };
        game.restart();
        game
    }

    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = max_frames.max(1);
        self
    }

    /// `(agent, opponent)` points in the current episode.
    pub fn score(&self) -> (u32, u32) {
        self.score
    }

    fn restart(&mut self) {
        let center = (PLAY_TOP + PLAY_BOTTOM - PADDLE_HEIGHT) / 2.0;
        self.agent_y = center;
        self.opponent_y = center;
        self.score = (0, 0);
        self.frames = 0;
        self.serve_timer = SERVE_DELAY;
    }

    fn serve(&mut self) {
        self.ball = (
            (WIDTH as f32 - BALL_WIDTH) / 2.0,
            (PLAY_TOP + PLAY_BOTTOM - BALL_HEIGHT) / 2.0,
        );
        let direction = if self.rng.gen::<bool>() { 1.0 } else { -1.0 };
        let vertical = [-2.0, -1.0, 1.0, 2.0][self.rng.gen_range(0..4)];
        self.velocity = (direction * BALL_SPEED_X, vertical);
    }

    fn move_agent(&mut self, action: usize) {
        let delta = match action {
            UP | UP_FIRE => -AGENT_SPEED,
            DOWN | DOWN_FIRE => AGENT_SPEED,
            _ => 0.0,
        };
        self.agent_y = (self.agent_y + delta).clamp(PLAY_TOP, PLAY_BOTTOM - PADDLE_HEIGHT);
    }

    fn move_opponent(&mut self) {
        let target = self.ball.1 + BALL_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0;
        let delta = (target - self.opponent_y).clamp(-OPPONENT_SPEED, OPPONENT_SPEED);
        self.opponent_y = (self.opponent_y + delta).clamp(PLAY_TOP, PLAY_BOTTOM - PADDLE_HEIGHT);
    }

    /// Advance the ball one frame. Returns the reward for the agent.
    fn move_ball(&mut self) -> f32 {
        let (mut x, mut y) = self.ball;
        let (mut vx, mut vy) = self.velocity;
        x += vx;
        y += vy;

        if y < PLAY_TOP {
            y = 2.0 * PLAY_TOP - y;
            vy = -vy;
        } else if y + BALL_HEIGHT > PLAY_BOTTOM {
            y = 2.0 * (PLAY_BOTTOM - BALL_HEIGHT) - y;
            vy = -vy;
        }

        let hits = |paddle_y: f32| y + BALL_HEIGHT > paddle_y && y < paddle_y + PADDLE_HEIGHT;
        let deflect = |paddle_y: f32, vy: f32| {
            let offset = (y + BALL_HEIGHT / 2.0 - (paddle_y + PADDLE_HEIGHT / 2.0)) / (PADDLE_HEIGHT / 2.0);
            (vy + 1.5 * offset).clamp(-MAX_BALL_SPEED_Y, MAX_BALL_SPEED_Y)
        };

        if vx > 0.0 && x + BALL_WIDTH >= AGENT_X && x < AGENT_X + PADDLE_WIDTH && hits(self.agent_y) {
            x = AGENT_X - BALL_WIDTH;
            vx = -vx;
            vy = deflect(self.agent_y, vy);
        } else if vx < 0.0 && x <= OPPONENT_X + PADDLE_WIDTH && x + BALL_WIDTH > OPPONENT_X && hits(self.opponent_y) {
            x = OPPONENT_X + PADDLE_WIDTH;
            vx = -vx;
            vy = deflect(self.opponent_y, vy);
        }

        self.ball = (x, y);
        self.velocity = (vx, vy);

        if x + BALL_WIDTH < 0.0 {
            self.score.0 += 1;
            self.serve_timer = SERVE_DELAY;
            1.0
        } else if x > WIDTH as f32 {
            self.score.1 += 1;
            self.serve_timer = SERVE_DELAY;
            -1.0
        } else {
            0.0
        }
    }

    fn render(&self) -> Frame {
        let mut frame = Frame::zeros((HEIGHT, WIDTH, 3));
        fill(&mut frame, 0, HEIGHT, 0, WIDTH, BACKGROUND);
        fill(&mut frame, 24, PLAY_TOP as usize, 0, WIDTH, WALL);
        fill(&mut frame, PLAY_BOTTOM as usize, HEIGHT, 0, WIDTH, WALL);

        let paddle = |y: f32| (y as usize, (y + PADDLE_HEIGHT) as usize);
        let (top, bottom) = paddle(self.opponent_y);
        fill(&mut frame, top, bottom, OPPONENT_X as usize, (OPPONENT_X + PADDLE_WIDTH) as usize, OPPONENT);
        let (top, bottom) = paddle(self.agent_y);
        fill(&mut frame, top, bottom, AGENT_X as usize, (AGENT_X + PADDLE_WIDTH) as usize, AGENT);

        if self.serve_timer == 0 {
            let (x, y) = self.ball;
            let left = x.max(0.0) as usize;
            let right = (x + BALL_WIDTH).max(0.0) as usize;
            fill(&mut frame, y as usize, (y + BALL_HEIGHT) as usize, left, right, BALL);
        }
        frame
    }

    fn is_over(&self) -> bool {
        self.score.0 >= self.points_to_win
            || self.score.1 >= self.points_to_win
            || self.frames >= self.max_frames
    }
}

/// Paint `rows x cols`, clipped to the frame.
fn fill(frame: &mut Frame, top: usize, bottom: usize, left: usize, right: usize, color: [u8; 3]) {
    let bottom = bottom.min(HEIGHT);
    let right = right.min(WIDTH);
    if top >= bottom || left >= right {
        return;
    }
    for (channel, &value) in color.iter().enumerate() {
        frame.slice_mut(s![top..bottom, left..right, channel]).fill(value);
    }
}

impl RawEnvironment for PaddleGame {
    fn reset(&mut self) -> Result<Frame> {
        self.restart();
        Ok(self.render())
    }

    fn step(&mut self, action: usize) -> Result<RawStep> {
        if action >= NUM_ACTIONS {
            return Err(DqnError::InvalidAction {
                action,
                num_actions: NUM_ACTIONS,
            });
        }
        self.frames += 1;
        self.move_agent(action);

        let reward = if self.serve_timer > 0 {
            self.serve_timer -= 1;
            if self.serve_timer == 0 {
                self.serve();
            }
            0.0
        } else {
            self.move_opponent();
            self.move_ball()
        };

        Ok(RawStep {
            frame: self.render(),
            reward,
            done: self.is_over(),
        })
    }

    fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    fn frame_size(&self) -> (usize, usize) {
        (HEIGHT, WIDTH)
    }
}
