/// All game entity types — plain state holders, no simulation logic.

use glam::Vec2;

/// Maximum (and starting) fuel level of Robo.
pub const MAX_FUEL: f32 = 100.0;

// ── Game state ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorldState {
    /// Waiting for the first tap; Robo hovers at the spawn point.
    #[default]
    Ready,
    Playing,
    GameOver,
}

// ── Input snapshot ────────────────────────────────────────────────────────────

/// What the player did during one frame.
///
/// The platform layer builds one of these per frame and hands it to
/// [`World::update`](crate::world::World::update); the simulation never
/// queries input devices itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// The screen/key went down this frame.
    pub just_tapped: bool,
    /// The screen/key is currently down.
    pub is_held: bool,
}

impl FrameInput {
    pub const IDLE: FrameInput = FrameInput {
        just_tapped: false,
        is_held: false,
    };

    /// A fresh press, which is also held.
    pub fn tap() -> Self {
        FrameInput {
            just_tapped: true,
            is_held: true,
        }
    }

    pub fn hold() -> Self {
        FrameInput {
            just_tapped: false,
            is_held: true,
        }
    }
}

// ── Collision boxes ───────────────────────────────────────────────────────────

/// Axis-aligned rectangle, origin at the bottom-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of a `width`×`height` sprite at `origin`, shrunk by `inset_x` /
    /// `inset_y` (fractions of the sprite size) on every side.
    pub fn inset(origin: Vec2, width: f32, height: f32, inset_x: f32, inset_y: f32) -> Self {
        let dx = width * inset_x;
        let dy = height * inset_y;
        Rect {
            x: origin.x + dx,
            y: origin.y + dy,
            width: width - 2.0 * dx,
            height: height - 2.0 * dy,
        }
    }

    /// Edges that merely touch do not count as overlapping.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

// ── Robo ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Robo {
    /// Bottom-left corner, world units.
    pub position: Vec2,
    /// World units per second.
    pub velocity: Vec2,
    flight_time: f32,
    fuel: f32,
}

impl Robo {
    pub fn new(x: f32, y: f32) -> Self {
        Robo {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            flight_time: 0.0,
            fuel: MAX_FUEL,
        }
    }

    /// Seconds Robo has been alive; presenters pick animation frames from it.
    pub fn flight_time(&self) -> f32 {
        self.flight_time
    }

    pub fn increase_flight_time(&mut self, delta: f32) {
        self.flight_time += delta;
    }

    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    pub fn add_fuel(&mut self, amount: f32) {
        self.fuel = (self.fuel + amount).clamp(0.0, MAX_FUEL);
    }

    pub fn remove_fuel(&mut self, amount: f32) {
        self.fuel = (self.fuel - amount).clamp(0.0, MAX_FUEL);
    }
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

/// A rotating rock. Lives in a fixed pool and is repositioned, never dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    /// Bottom-left corner, world units.
    pub position: Vec2,
    rotation: f32,
    counted: bool,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, rotation: f32) -> Self {
        let mut obstacle = Obstacle {
            position: Vec2::new(x, y),
            rotation: 0.0,
            counted: false,
        };
        obstacle.set_rotation(rotation);
        obstacle
    }

    /// Rotation in degrees, always within `[0, 360)`.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        // rem_euclid rounds tiny negative angles up to exactly 360.0.
        let rotation = rotation.rem_euclid(360.0);
        self.rotation = if rotation >= 360.0 { 0.0 } else { rotation };
    }

    /// Whether Robo already passed this obstacle and it went into the score.
    pub fn is_counted(&self) -> bool {
        self.counted
    }

    pub fn set_counted(&mut self, counted: bool) {
        self.counted = counted;
    }
}

// ── Fuel cell ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Fuel {
    /// Bottom-left corner, world units.
    pub position: Vec2,
}

impl Fuel {
    pub fn new(x: f32, y: f32) -> Self {
        Fuel {
            position: Vec2::new(x, y),
        }
    }
}
