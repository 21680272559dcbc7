/// Notifications the simulation pushes to whoever presents it.
///
/// Every call happens synchronously inside `World::update`; none of them
/// feeds back into the simulation.

pub trait WorldCallback {
    /// Robo hit a rock, the ground or the ceiling.
    fn hit_obstacle(&mut self);
    /// Robo picked up the fuel cell.
    fn hit_fuel(&mut self);
    fn out_of_fuel(&mut self);
    /// The thruster is firing this frame.
    fn boosting(&mut self);
    /// The thruster is idle this frame.
    fn boosting_off(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    HitObstacle,
    HitFuel,
    OutOfFuel,
    Boosting,
    BoostingOff,
}

/// Records the event sequence, in emission order.
impl WorldCallback for Vec<WorldEvent> {
    fn hit_obstacle(&mut self) {
        self.push(WorldEvent::HitObstacle);
    }

    fn hit_fuel(&mut self) {
        self.push(WorldEvent::HitFuel);
    }

    fn out_of_fuel(&mut self) {
        self.push(WorldEvent::OutOfFuel);
    }

    fn boosting(&mut self) {
        self.push(WorldEvent::Boosting);
    }

    fn boosting_off(&mut self) {
        self.push(WorldEvent::BoostingOff);
    }
}

/// Headless driving: drop everything.
impl WorldCallback for () {
    fn hit_obstacle(&mut self) {}
    fn hit_fuel(&mut self) {}
    fn out_of_fuel(&mut self) {}
    fn boosting(&mut self) {}
    fn boosting_off(&mut self) {}
}
