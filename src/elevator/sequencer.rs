/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info, warn};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ElevatorConfig;
use crate::dispatch::{self, Sweep};
use crate::elevator::arrival::{ArrivalHandler, Departure};
use crate::requests::Requests;
use crate::shared::{Call, Direction, ElevatorState, Floor, MotionState};

/**
 * Top-level motion state machine of the cabin.
 *
 * The cabin is either `Stopped` at a floor or in `Transit` towards the adjacent floor.
 * A transit always takes `transit_ticks` control cycles. Every arrival goes through the
 * arrival handler, and every cycle spent stopped asks it whether to leave.
 *
 * # Fields
 * - `config`:      Floor count, transit duration and reset policy.
 * - `arrival`:     Floor-side logic (halting, clearing, re-planning).
 * - `floor`:       Last floor the cabin was at. Only changes on arrival.
 * - `sweep`:       Current direction, destination, deferred direction and next stop.
 * - `motion`:      Physical phase.
 * - `halted`:      The cabin stopped at `floor` to serve it, or is parked there. Cleared on
 *                  departure and on a pass-through arrival.
 * - `stalled`:     Set while a stale call on the current floor keeps the cabin in place.
 */
pub struct MotionSequencer {
    config: ElevatorConfig,
    arrival: ArrivalHandler,
    floor: Floor,
    sweep: Sweep,
    motion: MotionState,
    halted: bool,
    stalled: bool,
}

impl MotionSequencer {
    pub fn new(config: &ElevatorConfig) -> MotionSequencer {
        MotionSequencer {
            config: config.clone(),
            arrival: ArrivalHandler::new(config.max_floor()),
            floor: 0,
            sweep: Sweep::parked(0),
            motion: MotionState::Stopped { floor: 0 },
            halted: true,
            stalled: false,
        }
    }

    /// Synchronous reset: park at the ground floor and forget the current
    /// sweep, discarding any transit in progress.
    pub fn reset(&mut self, requests: &mut Requests) {
        info!("Reset, parking at floor 0");
        self.floor = 0;
        self.sweep = Sweep::parked(0);
        self.motion = MotionState::Stopped { floor: 0 };
        self.halted = true;
        self.stalled = false;

        if self.config.clear_requests_on_reset {
            requests.clear_all();
        }
    }

    /// Advances one control cycle and returns the calls cleared during it.
    pub fn tick(&mut self, requests: &mut Requests) -> Vec<(Floor, Call)> {
        match self.motion {
            MotionState::Stopped { floor } => self.tick_stopped(requests, floor),
            MotionState::Transit {
                from,
                direction,
                elapsed,
            } => self.tick_transit(requests, from, direction, elapsed + 1),
        }
    }

    fn tick_stopped(&mut self, requests: &mut Requests, floor: Floor) -> Vec<(Floor, Call)> {
        // A call that showed up while passing through is a late stop, not a stale one
        if !self.halted && requests.wants_stop(floor, self.sweep.direction) {
            debug!("Late call at floor {}, halting", floor);
            return self.handle_arrival(requests, floor);
        }

        match self.arrival.depart(requests, floor, self.sweep) {
            Departure::Stall => {
                if !self.stalled {
                    warn!("Unresolved call at floor {}, holding position", floor);
                }
                self.stalled = true;
            }
            Departure::Idle(sweep) => {
                self.halted = true;
                self.stalled = false;
                self.sweep = sweep;
            }
            Departure::Depart(sweep) => {
                info!(
                    "Leaving floor {} going {} (destination {}, next stop {})",
                    floor, sweep.direction, sweep.destination, sweep.next_floor
                );
                self.halted = false;
                self.stalled = false;
                self.sweep = sweep;
                self.motion = MotionState::Transit {
                    from: floor,
                    direction: sweep.direction,
                    elapsed: 0,
                };
            }
        }
        Vec::new()
    }

    fn tick_transit(
        &mut self,
        requests: &mut Requests,
        from: Floor,
        direction: Direction,
        elapsed: u8,
    ) -> Vec<(Floor, Call)> {
        self.sweep = dispatch::decide(requests, self.floor, self.sweep);

        if elapsed < self.config.transit_ticks {
            debug!(
                "In transit from floor {} going {} ({}/{}), next stop {}",
                from, direction, elapsed, self.config.transit_ticks, self.sweep.next_floor
            );
            self.motion = MotionState::Transit {
                from,
                direction,
                elapsed,
            };
            return Vec::new();
        }

        let floor = match direction {
            Direction::Up => from + 1,
            Direction::Down => from - 1,
            Direction::Stop => from,
        };
        self.floor = floor;
        self.motion = MotionState::Stopped { floor };
        self.handle_arrival(requests, floor)
    }

    fn handle_arrival(&mut self, requests: &mut Requests, floor: Floor) -> Vec<(Floor, Call)> {
        let arrival = self.arrival.arrive(requests, floor, self.sweep);
        self.sweep = arrival.sweep;
        self.halted = arrival.halted || !arrival.sweep.direction.is_moving();
        for (floor, call) in arrival.served.iter() {
            info!("Served {} call at floor {}", call, floor);
        }
        arrival.served
    }

    /// Serves a press at `floor` right away if the cabin is halted there and
    /// the call is one this stop answers. Returns the cleared call.
    pub fn answer_at_landing(
        &mut self,
        requests: &mut Requests,
        floor: Floor,
        call: Call,
    ) -> Option<(Floor, Call)> {
        if !self.halted || self.stopped_at() != Some(floor) {
            return None;
        }
        let answered = self.arrival.answer(requests, floor, self.sweep, call);
        if answered.is_some() {
            info!("Answered {} call at floor {} on the spot", call, floor);
        }
        answered
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn next_floor(&self) -> Floor {
        self.sweep.next_floor
    }

    pub fn direction(&self) -> Direction {
        self.sweep.direction
    }

    pub fn destination(&self) -> Floor {
        self.sweep.destination
    }

    pub fn destination_type(&self) -> Direction {
        self.sweep.destination_type
    }

    pub fn motion(&self) -> MotionState {
        self.motion
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Floor the cabin is standing at, if it is not moving.
    pub fn stopped_at(&self) -> Option<Floor> {
        match self.motion {
            MotionState::Stopped { floor } => Some(floor),
            MotionState::Transit { .. } => None,
        }
    }

    pub fn fsm_state(&self) -> u32 {
        self.motion.diagnostic_id(self.config.transit_ticks)
    }

    pub fn state(&self) -> ElevatorState {
        ElevatorState {
            floor: self.floor,
            next_floor: self.sweep.next_floor,
            direction: self.sweep.direction,
            destination: self.sweep.destination,
            destination_type: self.sweep.destination_type,
            motion: self.motion,
            fsm_state: self.fsm_state(),
            stalled: self.stalled,
        }
    }

    /***************************************/
    /*           Test functions            */
    /***************************************/
    #[cfg(test)]
    pub fn test_park_at(&mut self, floor: Floor) {
        self.floor = floor;
        self.sweep = Sweep::parked(floor);
        self.motion = MotionState::Stopped { floor };
        self.halted = true;
        self.stalled = false;
    }
}
