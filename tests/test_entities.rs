use glam::Vec2;
use robo_mission::entities::*;

// ── Robo ──────────────────────────────────────────────────────────────────────

#[test]
fn robo_starts_still_with_a_full_tank() {
    let robo = Robo::new(50.0, 240.0);
    assert_eq!(robo.position, Vec2::new(50.0, 240.0));
    assert_eq!(robo.velocity, Vec2::ZERO);
    assert_eq!(robo.fuel(), MAX_FUEL);
    assert_eq!(robo.flight_time(), 0.0);
}

#[test]
fn flight_time_accumulates() {
    let mut robo = Robo::new(0.0, 0.0);
    robo.increase_flight_time(0.25);
    robo.increase_flight_time(0.5);
    assert_eq!(robo.flight_time(), 0.75);
}

#[test]
fn fuel_never_exceeds_the_tank() {
    let mut robo = Robo::new(0.0, 0.0);
    robo.add_fuel(50.0);
    assert_eq!(robo.fuel(), MAX_FUEL);
}

#[test]
fn fuel_never_goes_negative() {
    let mut robo = Robo::new(0.0, 0.0);
    robo.remove_fuel(30.0);
    assert_eq!(robo.fuel(), 70.0);
    robo.remove_fuel(500.0);
    assert_eq!(robo.fuel(), 0.0);
    robo.add_fuel(10.0);
    assert_eq!(robo.fuel(), 10.0);
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

#[test]
fn obstacle_starts_uncounted() {
    let obstacle = Obstacle::new(700.0, 40.0, 45.0);
    assert!(!obstacle.is_counted());
    assert_eq!(obstacle.rotation(), 45.0);
}

#[test]
fn obstacle_counted_flag_toggles() {
    let mut obstacle = Obstacle::new(700.0, 40.0, 0.0);
    obstacle.set_counted(true);
    assert!(obstacle.is_counted());
    obstacle.set_counted(false);
    assert!(!obstacle.is_counted());
}

#[test]
fn obstacle_rotation_wraps_into_one_turn() {
    let mut obstacle = Obstacle::new(0.0, 0.0, 370.0);
    assert_eq!(obstacle.rotation(), 10.0);
    obstacle.set_rotation(-90.0);
    assert_eq!(obstacle.rotation(), 270.0);
    obstacle.set_rotation(720.0);
    assert_eq!(obstacle.rotation(), 0.0);
}

#[test]
fn obstacle_rotation_tiny_negative_angle_stays_below_a_turn() {
    let mut obstacle = Obstacle::new(0.0, 0.0, 0.0);
    obstacle.set_rotation(-1e-8);
    assert!((0.0..360.0).contains(&obstacle.rotation()), "{}", obstacle.rotation());
    let obstacle = Obstacle::new(0.0, 0.0, -1e-8);
    assert!((0.0..360.0).contains(&obstacle.rotation()));
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    assert!(a.overlaps(&Rect::new(2.0, 2.0, 2.0, 2.0))); // contained
    assert!(!a.overlaps(&Rect::new(20.0, 0.0, 5.0, 5.0)));
    assert!(!a.overlaps(&Rect::new(0.0, -8.0, 10.0, 5.0)));
}

#[test]
fn rect_touching_edges_do_not_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
}

#[test]
fn rect_inset_shrinks_every_side() {
    let r = Rect::inset(Vec2::new(100.0, 50.0), 100.0, 40.0, 0.25, 0.5);
    assert_eq!(r, Rect::new(125.0, 70.0, 50.0, 0.0));
    let r = Rect::inset(Vec2::new(0.0, 0.0), 100.0, 100.0, 0.25, 0.25);
    assert_eq!(r, Rect::new(25.0, 25.0, 50.0, 50.0));
}

// ── Input / state ─────────────────────────────────────────────────────────────

#[test]
fn frame_input_helpers() {
    assert_eq!(FrameInput::default(), FrameInput::IDLE);
    assert!(FrameInput::tap().just_tapped && FrameInput::tap().is_held);
    assert!(!FrameInput::hold().just_tapped && FrameInput::hold().is_held);
}

#[test]
fn world_state_defaults_to_ready() {
    assert_eq!(WorldState::default(), WorldState::Ready);
    assert_ne!(WorldState::Playing, WorldState::GameOver);
}
