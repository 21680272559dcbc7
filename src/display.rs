/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// world.  No simulation happens here; this module only translates the
/// world's public state into terminal commands, plus the few frame-counted
/// effects driven by the world's notifications.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use log::debug;
use robo_mission::entities::{Rect, WorldState, MAX_FUEL};
use robo_mission::events::WorldCallback;
use robo_mission::world::{
    World, FUEL_HEIGHT, FUEL_WIDTH, GROUND_HEIGHT, OBSTACLE_HEIGHT, OBSTACLE_WIDTH, ROBO_HEIGHT,
    ROBO_WIDTH, WORLD_HEIGHT, WORLD_WIDTH,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_GROUND: Color = Color::DarkYellow;
const C_ROCK: Color = Color::Grey;
const C_FUEL_CELL: Color = Color::Green;
const C_ROBO: Color = Color::White;
const C_ROBO_DEAD: Color = Color::DarkRed;
const C_FLAME: Color = Color::Red;
const C_BOUNDS: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;
// The robot-green of the fuel gauge.
const C_GAUGE: Color = Color::Rgb {
    r: 0x8B,
    g: 0xBF,
    b: 0x26,
};

// ── Effects driven by world notifications ─────────────────────────────────────

/// Seconds a flash message stays on screen.
const FLASH_TIME: f32 = 0.8;
/// Seconds per frame of Robo's three-frame animations.
const ANIM_FRAME_TIME: f32 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flash {
    Boom,
    FuelPickup,
    OutOfFuel,
}

/// The presenter side of [`WorldCallback`]: audio cues become a thruster
/// flame, short banner messages and the terminal bell.
#[derive(Debug, Default)]
pub struct HudEffects {
    thruster_on: bool,
    flash: Option<(Flash, f32)>,
    bell: bool,
}

impl HudEffects {
    pub fn thruster_on(&self) -> bool {
        self.thruster_on
    }

    pub fn flash(&self) -> Option<Flash> {
        self.flash.map(|(flash, _)| flash)
    }

    /// Returns whether the bell should ring, and clears the request.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    /// Age the flash message by `delta` seconds of game time.
    pub fn tick(&mut self, delta: f32) {
        self.flash = match self.flash {
            Some((flash, left)) if left > delta => Some((flash, left - delta)),
            _ => None,
        };
    }

    fn show(&mut self, flash: Flash) {
        self.flash = Some((flash, FLASH_TIME));
    }
}

impl WorldCallback for HudEffects {
    fn hit_obstacle(&mut self) {
        debug!("event: hit obstacle");
        self.show(Flash::Boom);
        self.bell = true;
    }

    fn hit_fuel(&mut self) {
        debug!("event: fuel picked up");
        self.show(Flash::FuelPickup);
    }

    fn out_of_fuel(&mut self) {
        debug!("event: out of fuel");
        self.show(Flash::OutOfFuel);
        self.bell = true;
    }

    fn boosting(&mut self) {
        if !self.thruster_on {
            debug!("event: thruster on");
        }
        self.thruster_on = true;
    }

    fn boosting_off(&mut self) {
        if self.thruster_on {
            debug!("event: thruster off");
        }
        self.thruster_on = false;
    }
}

// ── World → terminal mapping ──────────────────────────────────────────────────

/// Extra per-frame facts the world does not know about.
pub struct Hud {
    pub high_score: u32,
    /// The run's score beats the record it started against.
    pub new_best: bool,
    pub show_bounds: bool,
}

/// Maps the visible 800×480 world window onto the playfield cells
/// (inside the border, rows 2 ..= height-3, columns 1 ..= width-2).
struct View {
    left: f32,
    col_scale: f32,
    row_scale: f32,
    width: u16,
    height: u16,
}

impl View {
    fn new(world: &World, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(2).max(1) as f32;
        let rows = height.saturating_sub(4).max(1) as f32;
        View {
            left: world.camera_x() - WORLD_WIDTH / 2.0,
            col_scale: WORLD_WIDTH / cols,
            row_scale: WORLD_HEIGHT / rows,
            width,
            height,
        }
    }

    fn first_col(&self) -> i32 {
        1
    }

    fn last_col(&self) -> i32 {
        self.width as i32 - 2
    }

    fn first_row(&self) -> i32 {
        2
    }

    fn last_row(&self) -> i32 {
        self.height as i32 - 3
    }

    /// Cell range covered by a world-space box, clipped to the playfield.
    /// `None` when nothing of it is visible.
    fn cells(&self, x: f32, y: f32, w: f32, h: f32) -> Option<(i32, i32, i32, i32)> {
        let c0 = self.first_col() + ((x - self.left) / self.col_scale).floor() as i32;
        let c1 = self.first_col() + ((x + w - self.left) / self.col_scale).ceil() as i32 - 1;
        let r0 = self.first_row() + ((WORLD_HEIGHT - (y + h)) / self.row_scale).floor() as i32;
        let r1 = self.first_row() + ((WORLD_HEIGHT - y) / self.row_scale).ceil() as i32 - 1;

        let c0 = c0.max(self.first_col());
        let c1 = c1.min(self.last_col());
        let r0 = r0.max(self.first_row());
        let r1 = r1.min(self.last_row());
        if c0 > c1 || r0 > r1 {
            None
        } else {
            Some((c0, c1, r0, r1))
        }
    }

    fn world_x_of_col(&self, col: i32) -> f32 {
        self.left + (col - self.first_col()) as f32 * self.col_scale
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    world: &World,
    effects: &HudEffects,
    hud: &Hud,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let view = View::new(world, width, height);

    draw_border(out, width, height)?;
    draw_ground_and_ceiling(out, &view)?;

    for obstacle in world.obstacles() {
        draw_rock(out, &view, obstacle.position.x, obstacle.position.y, obstacle.rotation())?;
    }
    draw_fuel_cell(out, &view, world)?;
    draw_robo(out, &view, world, effects)?;

    if hud.show_bounds {
        draw_bounds(out, &view, &world.robo_bounds())?;
        for obstacle in world.obstacles() {
            draw_bounds(out, &view, &world.obstacle_bounds(obstacle))?;
        }
        draw_bounds(out, &view, &world.fuel_bounds())?;
    }

    draw_hud(out, world, hud, width)?;
    if let Some(flash) = effects.flash() {
        draw_flash(out, flash, width)?;
    }
    draw_controls_hint(out, height)?;

    match world.state() {
        WorldState::Ready => draw_ready(out, width, height)?,
        WorldState::GameOver => draw_game_over(out, world, hud, width, height)?,
        WorldState::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Scenery ───────────────────────────────────────────────────────────────────

/// Ground and ceiling bands; the texture is anchored to world x so it
/// scrolls with the camera.
fn draw_ground_and_ceiling<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_GROUND))?;
    let bands = [
        view.cells(view.left, 0.0, WORLD_WIDTH, GROUND_HEIGHT),
        view.cells(view.left, WORLD_HEIGHT - GROUND_HEIGHT, WORLD_WIDTH, GROUND_HEIGHT),
    ];
    for (c0, c1, r0, r1) in bands.into_iter().flatten() {
        for row in r0..=r1 {
            let line: String = (c0..=c1)
                .map(|col| {
                    let tile = (view.world_x_of_col(col) / 40.0).floor() as i64;
                    if tile.rem_euclid(2) == 0 {
                        '▓'
                    } else {
                        '▒'
                    }
                })
                .collect();
            out.queue(cursor::MoveTo(c0 as u16, row as u16))?;
            out.queue(Print(line))?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn fill<W: Write>(out: &mut W, cells: (i32, i32, i32, i32), ch: char) -> std::io::Result<()> {
    let (c0, c1, r0, r1) = cells;
    let line: String = std::iter::repeat(ch).take((c1 - c0 + 1) as usize).collect();
    for row in r0..=r1 {
        out.queue(cursor::MoveTo(c0 as u16, row as u16))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

fn center(cells: (i32, i32, i32, i32)) -> (u16, u16) {
    let (c0, c1, r0, r1) = cells;
    (((c0 + c1) / 2) as u16, ((r0 + r1) / 2) as u16)
}

fn draw_rock<W: Write>(
    out: &mut W,
    view: &View,
    x: f32,
    y: f32,
    rotation: f32,
) -> std::io::Result<()> {
    let Some(cells) = view.cells(x, y, OBSTACLE_WIDTH, OBSTACLE_HEIGHT) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_ROCK))?;
    fill(out, cells, '█')?;

    // A quarter-turn glyph in the middle makes the spin visible.
    const SPIN: [&str; 4] = ["◐", "◓", "◑", "◒"];
    let (cx, cy) = center(cells);
    out.queue(cursor::MoveTo(cx, cy))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(SPIN[(rotation / 90.0) as usize % 4]))?;
    Ok(())
}

fn draw_fuel_cell<W: Write>(out: &mut W, view: &View, world: &World) -> std::io::Result<()> {
    let fuel = world.fuel();
    let Some(cells) = view.cells(fuel.position.x, fuel.position.y, FUEL_WIDTH, FUEL_HEIGHT) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_FUEL_CELL))?;
    fill(out, cells, '▮')?;
    let (cx, cy) = center(cells);
    out.queue(cursor::MoveTo(cx, cy))?;
    out.queue(Print("F"))?;
    Ok(())
}

fn draw_robo<W: Write>(
    out: &mut W,
    view: &View,
    world: &World,
    effects: &HudEffects,
) -> std::io::Result<()> {
    let robo = world.robo();
    let Some(cells) = view.cells(robo.position.x, robo.position.y, ROBO_WIDTH, ROBO_HEIGHT) else {
        return Ok(());
    };

    // Pose, the terminal stand-in for the up / down / dead animations.
    let frame = (robo.flight_time() / ANIM_FRAME_TIME) as usize % 3;
    let dead = world.state() == WorldState::GameOver || robo.fuel() <= 0.0;
    let (color, faces): (Color, [&str; 3]) = if dead {
        (C_ROBO_DEAD, ["x", "X", "x"])
    } else if world.state() == WorldState::Playing && robo.velocity.y > 0.0 {
        (C_ROBO, ["▲", "△", "▲"])
    } else {
        (C_ROBO, ["▼", "▽", "▼"])
    };

    out.queue(style::SetForegroundColor(color))?;
    fill(out, cells, '▒')?;
    let (cx, cy) = center(cells);
    out.queue(cursor::MoveTo(cx, cy))?;
    out.queue(Print(faces[frame]))?;

    if effects.thruster_on() {
        let (c0, c1, _, r1) = cells;
        let flame_row = r1 + 1;
        if flame_row <= view.last_row() {
            let flame = if frame % 2 == 0 { "≈" } else { "~" };
            out.queue(style::SetForegroundColor(C_FLAME))?;
            out.queue(cursor::MoveTo(((c0 + c1) / 2) as u16, flame_row as u16))?;
            out.queue(Print(flame))?;
        }
    }
    Ok(())
}

/// Outline of a collision box, for tuning.
fn draw_bounds<W: Write>(out: &mut W, view: &View, rect: &Rect) -> std::io::Result<()> {
    let Some((c0, c1, r0, r1)) = view.cells(rect.x, rect.y, rect.width, rect.height) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_BOUNDS))?;
    for col in c0..=c1 {
        for row in [r0, r1] {
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(Print("·"))?;
        }
    }
    for row in r0..=r1 {
        for col in [c0, c1] {
            out.queue(cursor::MoveTo(col as u16, row as u16))?;
            out.queue(Print("·"))?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, world: &World, hud: &Hud, width: u16) -> std::io::Result<()> {
    // Score and best — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    let best = hud.high_score.max(world.score());
    if best > 0 {
        out.queue(Print(format!("Score:{:>4}  Best:{:>4}", world.score(), best)))?;
    } else {
        out.queue(Print(format!("Score:{:>4}", world.score())))?;
    }

    // Fuel gauge — right
    const GAUGE_CELLS: usize = 10;
    let fuel = world.robo().fuel();
    let filled = ((fuel / MAX_FUEL) * GAUGE_CELLS as f32).ceil() as usize;
    let filled = filled.min(GAUGE_CELLS);
    let gauge = format!(
        "Fuel [{}{}] {:>3}%",
        "█".repeat(filled),
        "·".repeat(GAUGE_CELLS - filled),
        fuel.round() as u32
    );
    let gauge_color = if fuel > 50.0 {
        C_GAUGE
    } else if fuel > 20.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    let rx = width.saturating_sub(gauge.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(gauge_color))?;
    out.queue(Print(gauge))?;

    Ok(())
}

fn draw_flash<W: Write>(out: &mut W, flash: Flash, width: u16) -> std::io::Result<()> {
    let (msg, color) = match flash {
        Flash::Boom => ("*** BOOM ***", Color::Red),
        Flash::FuelPickup => ("+FUEL", C_FUEL_CELL),
        Flash::OutOfFuel => ("OUT OF FUEL", Color::Red),
    };
    let col = (width / 2).saturating_sub(msg.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, 0))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(msg))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("SPACE / ↑ / click : Thrust (hold)   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_ready<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Cyan),
        ("║     GET  READY     ║", Color::Cyan),
        ("╚════════════════════╝", Color::Cyan),
        ("Tap SPACE to start, hold it to fly", Color::White),
    ];
    draw_centered(out, lines, width, height)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    world: &World,
    hud: &Hud,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score = world.score();
    let score_line = format!("Final Score: {:>4}", score);
    let best_line = if hud.new_best {
        format!("★ NEW BEST: {:>4} ★", score)
    } else {
        format!("Best Score:  {:>4}", hud.high_score.max(score))
    };
    let best_color = if hud.new_best { Color::Yellow } else { Color::DarkGrey };

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        (&best_line, best_color),
        ("SPACE - Play Again  Q - Quit", Color::White),
    ];
    draw_centered(out, lines, width, height)
}
