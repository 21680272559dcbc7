/// The frame-stepped simulation.
///
/// `World` owns Robo, the obstacle pool and the fuel cell.  A driver calls
/// [`World::update`] once per frame with the frame's input snapshot and the
/// elapsed time; presenters read the public queries between updates and
/// receive discrete notifications through a [`WorldCallback`].

use glam::Vec2;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::{FrameInput, Fuel, Obstacle, Rect, Robo, WorldState, MAX_FUEL};
use crate::events::WorldCallback;

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Size of the visible window, in world units.
pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 480.0;
/// The camera centre sits this far ahead of Robo.
pub const CAMERA_LEAD: f32 = 350.0;
/// Height of the ground band (and of the mirrored ceiling band).
pub const GROUND_HEIGHT: f32 = 40.0;

pub const GRAVITY: f32 = -900.0;
pub const ROBO_VELOCITY_X: f32 = 200.0;
pub const ROBO_THRUST_VELOCITY_Y: f32 = 240.0;
pub const ROBO_START_X: f32 = 50.0;
pub const ROBO_START_Y: f32 = 240.0;
pub const ROBO_WIDTH: f32 = 88.0;
pub const ROBO_HEIGHT: f32 = 73.0;

pub const OBSTACLE_WIDTH: f32 = 100.0;
pub const OBSTACLE_HEIGHT: f32 = 100.0;
pub const OBSTACLE_COUNT: usize = 5;
pub const OBSTACLE_DISTANCE: f32 = 200.0;
pub const OBSTACLE_START_X: f32 = 700.0;
/// Degrees per second.
pub const OBSTACLE_ROTATION_SPEED: f32 = 90.0;

pub const FUEL_WIDTH: f32 = 40.0;
pub const FUEL_HEIGHT: f32 = 60.0;
/// Halfway between the first two obstacles.
pub const FUEL_START_X: f32 = OBSTACLE_START_X + OBSTACLE_DISTANCE / 2.0;
/// Fuel units burnt per second of thrust.
pub const FUEL_BURN_RATE: f32 = 15.0;

/// How far a recycled obstacle or fuel cell jumps ahead.
pub const RECYCLE_DISTANCE: f32 = OBSTACLE_COUNT as f32 * OBSTACLE_DISTANCE;

// Collision boxes are tighter than the sprites (fractions per side).
const ROBO_INSET_X: f32 = 0.2;
const ROBO_INSET_Y: f32 = 0.1;
const OBSTACLE_INSET: f32 = 0.2;
const FUEL_INSET: f32 = 0.1;

/// Lowest legal bottom edge for Robo: half of him may sink into the ground.
pub const ROBO_MIN_Y: f32 = GROUND_HEIGHT - ROBO_HEIGHT / 2.0;
/// Highest legal bottom edge for Robo: half of him may poke into the ceiling.
pub const ROBO_MAX_Y: f32 = WORLD_HEIGHT - GROUND_HEIGHT - ROBO_HEIGHT / 2.0;

const OBSTACLE_MIN_Y: f32 = GROUND_HEIGHT;
const OBSTACLE_MAX_Y: f32 = WORLD_HEIGHT - GROUND_HEIGHT - OBSTACLE_HEIGHT;
const FUEL_MIN_Y: f32 = GROUND_HEIGHT;
const FUEL_MAX_Y: f32 = WORLD_HEIGHT - GROUND_HEIGHT - FUEL_HEIGHT;

// ── World ─────────────────────────────────────────────────────────────────────

pub struct World {
    robo: Robo,
    obstacles: Vec<Obstacle>,
    fuel: Fuel,
    state: WorldState,
    gravity: Vec2,
    score: u32,
    rng: StdRng,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// A world with an entropy-seeded layout.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// A world whose obstacle/fuel layouts are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        let mut world = World {
            robo: Robo::new(ROBO_START_X, ROBO_START_Y),
            obstacles: Vec::with_capacity(OBSTACLE_COUNT),
            fuel: Fuel::new(FUEL_START_X, FUEL_MIN_Y),
            state: WorldState::Ready,
            gravity: Vec2::new(0.0, GRAVITY),
            score: 0,
            rng,
        };
        world.reset();
        world
    }

    /// Back to the start of a run: spawn point, full tank, canonical layout.
    fn reset(&mut self) {
        self.score = 0;
        self.robo = Robo::new(ROBO_START_X, ROBO_START_Y);

        self.obstacles.clear();
        for i in 0..OBSTACLE_COUNT {
            let x = OBSTACLE_START_X + i as f32 * OBSTACLE_DISTANCE;
            let y = self.rng.gen_range(OBSTACLE_MIN_Y..=OBSTACLE_MAX_Y);
            let rotation = self.rng.gen_range(0.0..360.0);
            self.obstacles.push(Obstacle::new(x, y, rotation));
        }

        self.fuel.position = Vec2::new(FUEL_START_X, self.rng.gen_range(FUEL_MIN_Y..=FUEL_MAX_Y));
        debug!("world reset: {} obstacles laid out from x={}", OBSTACLE_COUNT, OBSTACLE_START_X);
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn state(&self) -> WorldState {
        self.state
    }

    /// Obstacles Robo has flown past this run.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn robo(&self) -> &Robo {
        &self.robo
    }

    /// The obstacle pool, in slot order.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn fuel(&self) -> &Fuel {
        &self.fuel
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// Horizontal centre of the visible window.
    pub fn camera_x(&self) -> f32 {
        self.robo.position.x + CAMERA_LEAD
    }

    pub fn robo_bounds(&self) -> Rect {
        Rect::inset(self.robo.position, ROBO_WIDTH, ROBO_HEIGHT, ROBO_INSET_X, ROBO_INSET_Y)
    }

    pub fn obstacle_bounds(&self, obstacle: &Obstacle) -> Rect {
        Rect::inset(
            obstacle.position,
            OBSTACLE_WIDTH,
            OBSTACLE_HEIGHT,
            OBSTACLE_INSET,
            OBSTACLE_INSET,
        )
    }

    pub fn fuel_bounds(&self) -> Rect {
        Rect::inset(self.fuel.position, FUEL_WIDTH, FUEL_HEIGHT, FUEL_INSET, FUEL_INSET)
    }

    // ── Per-frame step ────────────────────────────────────────────────────────

    /// Advance the simulation by `delta` seconds.
    ///
    /// `delta` must not be negative; zero is a valid frame in which only
    /// state transitions and collision checks happen.  Notifications are
    /// delivered to `callback` before this returns.
    pub fn update(&mut self, input: FrameInput, delta: f32, callback: &mut impl WorldCallback) {
        // ── 1. Animation clock ───────────────────────────────────────────────
        self.robo.increase_flight_time(delta);

        // ── 2. Tap-driven transitions ────────────────────────────────────────
        if input.just_tapped {
            match self.state {
                WorldState::Ready => self.set_state(WorldState::Playing),
                WorldState::GameOver => {
                    self.set_state(WorldState::Ready);
                    self.reset();
                }
                WorldState::Playing => {}
            }
        }

        // ── 3. Thrust ────────────────────────────────────────────────────────
        if self.state == WorldState::Playing && input.is_held && self.robo.fuel() > 0.0 {
            self.robo.velocity = Vec2::new(ROBO_VELOCITY_X, ROBO_THRUST_VELOCITY_Y);
            self.robo.remove_fuel(FUEL_BURN_RATE * delta);
            callback.boosting();
        } else {
            callback.boosting_off();
        }

        // ── 4. Gravity (keeps pulling after a crash) ─────────────────────────
        if self.state != WorldState::Ready {
            self.robo.velocity += self.gravity * delta;
        }

        // ── 5. Integrate ─────────────────────────────────────────────────────
        self.robo.position += self.robo.velocity * delta;

        // ── 6. Recycle and spin obstacles ────────────────────────────────────
        let robo_x = self.robo.position.x;
        for i in 0..self.obstacles.len() {
            if is_behind(robo_x, self.obstacles[i].position.x, OBSTACLE_WIDTH) {
                let y = self.rng.gen_range(OBSTACLE_MIN_Y..=OBSTACLE_MAX_Y);
                let rotation = self.rng.gen_range(0.0..360.0);
                let obstacle = &mut self.obstacles[i];
                obstacle.position.x += RECYCLE_DISTANCE;
                obstacle.position.y = y;
                obstacle.set_rotation(rotation);
                obstacle.set_counted(false);
                trace!("obstacle {} recycled to x={}", i, obstacle.position.x);
            }
            let obstacle = &mut self.obstacles[i];
            obstacle.set_rotation(obstacle.rotation() + OBSTACLE_ROTATION_SPEED * delta);
        }

        // ── 7. Robo ↔ obstacles ──────────────────────────────────────────────
        let robo_bounds = self.robo_bounds();
        let crashed = self
            .obstacles
            .iter()
            .any(|o| robo_bounds.overlaps(&self.obstacle_bounds(o)));
        if crashed {
            self.crash(callback);
        }

        // ── 8. Score obstacles Robo has passed ───────────────────────────────
        for obstacle in self.obstacles.iter_mut() {
            if obstacle.position.x < robo_x && !obstacle.is_counted() {
                self.score += 1;
                obstacle.set_counted(true);
            }
        }

        // ── 9. Fuel cell ─────────────────────────────────────────────────────
        if robo_bounds.overlaps(&self.fuel_bounds()) {
            callback.hit_fuel();
            self.robo.add_fuel(MAX_FUEL);
            self.recycle_fuel();
            debug!("fuel picked up, next cell at x={}", self.fuel.position.x);
        }
        if is_behind(robo_x, self.fuel.position.x, FUEL_WIDTH) {
            self.recycle_fuel();
            trace!("missed fuel cell recycled to x={}", self.fuel.position.x);
        }

        // ── 10. Empty tank ───────────────────────────────────────────────────
        if self.robo.fuel() <= 0.0 {
            if self.state != WorldState::GameOver {
                callback.out_of_fuel();
            }
            self.set_state(WorldState::GameOver);
        }

        // ── 11. Ground and ceiling ───────────────────────────────────────────
        let y = self.robo.position.y;
        if !(ROBO_MIN_Y..=ROBO_MAX_Y).contains(&y) {
            self.crash(callback);
        }
    }

    /// Collision outcome shared by rocks and the ground/ceiling.
    fn crash(&mut self, callback: &mut impl WorldCallback) {
        if self.state != WorldState::GameOver {
            callback.hit_obstacle();
        }
        self.set_state(WorldState::GameOver);
        self.robo.velocity.x = 0.0;
    }

    fn recycle_fuel(&mut self) {
        self.fuel.position.x += RECYCLE_DISTANCE;
        self.fuel.position.y = self.rng.gen_range(FUEL_MIN_Y..=FUEL_MAX_Y);
    }

    fn set_state(&mut self, state: WorldState) {
        if self.state != state {
            info!("{:?} -> {:?} (score {})", self.state, state, self.score);
            self.state = state;
        }
    }
}

/// True once something of `width` at `x` has scrolled off the left edge.
fn is_behind(robo_x: f32, x: f32, width: f32) -> bool {
    robo_x + CAMERA_LEAD - x > WORLD_WIDTH / 2.0 + width
}
