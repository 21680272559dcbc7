use std::time::{Duration, Instant};

use robo_mission::input::*;

const SPACE: char = ' ';

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Frame instants over `span` at `fps`.
fn frames(start: Instant, span: Duration, fps: u32) -> impl Iterator<Item = Instant> {
    let step = Duration::from_secs(1) / fps;
    let count = (span.as_secs_f64() * f64::from(fps)) as u32;
    (0..=count).map(move |i| start + step * i)
}

// ── Holding ───────────────────────────────────────────────────────────────────

#[test]
fn first_press_is_a_tap() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    assert!(!keys.is_held(&SPACE, t0));
    assert!(keys.press(SPACE, t0));
    assert!(keys.is_held(&SPACE, t0));
}

#[test]
fn auto_repeat_stays_held_at_any_frame_rate() {
    // Key repeat at 25 Hz, the way a terminal without release events
    // reports a key held down for a full second.
    let t0 = Instant::now();
    for fps in [10, 30, 60, 120, 240] {
        let mut keys = KeyTracker::new();
        keys.press(SPACE, t0);
        let mut next_repeat = t0 + ms(40);

        for now in frames(t0, ms(1_000), fps) {
            while next_repeat <= now {
                assert!(!keys.press(SPACE, next_repeat), "repeat became a tap at {} fps", fps);
                next_repeat += ms(40);
            }
            assert!(keys.is_held(&SPACE, now), "hold dropped at {} fps", fps);
        }
    }
}

#[test]
fn hold_lapses_once_events_stop() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.press(SPACE, t0);
    keys.repeat(SPACE, t0 + ms(40));
    assert!(keys.is_held(&SPACE, t0 + ms(40) + HOLD_WINDOW));
    assert!(!keys.is_held(&SPACE, t0 + ms(41) + HOLD_WINDOW));

    // Pressing again after the lapse is a new tap.
    assert!(keys.press(SPACE, t0 + ms(500)));
}

#[test]
fn release_ends_the_hold_immediately() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.press(SPACE, t0);
    keys.release(&SPACE);
    assert!(!keys.is_held(&SPACE, t0));
    assert!(keys.press(SPACE, t0 + ms(5)));
}

#[test]
fn release_reporting_holds_until_released() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.press('w', t0);
    keys.release(&'w');

    // Once the terminal is known to send releases there is no time limit.
    keys.press(SPACE, t0 + ms(10));
    assert!(keys.is_held(&SPACE, t0 + ms(2_000)));
    keys.release(&SPACE);
    assert!(!keys.is_held(&SPACE, t0 + ms(2_000)));
}

#[test]
fn any_held_checks_every_key() {
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.press('w', t0);
    assert!(keys.any_held(&[SPACE, 'w'], t0));
    assert!(!keys.any_held(&[SPACE, 'x'], t0));
    assert!(!keys.any_held(std::iter::empty(), t0));
}

// ── Restart lockout ───────────────────────────────────────────────────────────

#[test]
fn open_gate_allows_taps() {
    assert!(TapGate::default().allows(Instant::now()));
}

#[test]
fn closed_gate_reopens_after_the_lockout() {
    let t0 = Instant::now();
    let mut gate = TapGate::default();
    gate.close_for(t0, RESTART_LOCKOUT);
    assert!(!gate.allows(t0));
    assert!(!gate.allows(t0 + RESTART_LOCKOUT - ms(1)));
    assert!(gate.allows(t0 + RESTART_LOCKOUT));
}

#[test]
fn lockout_outlasts_key_repeat_at_high_frame_rates() {
    // A player mashing or holding the key at game over: repeats arrive as
    // presses and must not restart the run, however fast frames are drawn.
    let t0 = Instant::now();
    let mut keys = KeyTracker::new();
    keys.press(SPACE, t0);
    let mut gate = TapGate::default();
    gate.close_for(t0, RESTART_LOCKOUT);

    let mut restarted = false;
    for now in frames(t0, RESTART_LOCKOUT - ms(1), 240) {
        let tapped = keys.press(SPACE, now);
        restarted |= tapped && gate.allows(now);
    }
    assert!(!restarted);
}
