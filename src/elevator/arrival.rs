/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::dispatch::{self, Sweep};
use crate::requests::Requests;
use crate::shared::{Call, Direction, Floor};

/***************************************/
/*       Public data structures        */
/***************************************/

/// What happened when the cabin reached a floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub sweep: Sweep,
    pub halted: bool,
    pub served: Vec<(Floor, Call)>,
}

/// What the cabin does on a cycle spent stopped at a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// Leave in `sweep.direction`.
    Depart(Sweep),
    /// Nothing to do; stay parked.
    Idle(Sweep),
    /// A call is still pending on this very floor. Nothing moves and nothing
    /// is cleared until it goes away.
    Stall,
}

/**
 * Floor-side logic of the controller.
 *
 * `arrive` runs once, on the cycle the cabin reaches a floor: it decides whether the
 * floor is a real stop, clears the calls the stop answers and asks the dispatch policy
 * for the next move. `depart` runs on every cycle the cabin then spends at the floor,
 * and `answer` serves presses made while the cabin is halted there.
 *
 * This is the only place request bits are ever cleared.
 */
#[derive(Debug, Clone, Copy)]
pub struct ArrivalHandler {
    max_floor: Floor,
}

impl ArrivalHandler {
    pub fn new(max_floor: Floor) -> ArrivalHandler {
        ArrivalHandler { max_floor }
    }

    pub fn arrive(&self, requests: &mut Requests, floor: Floor, sweep: Sweep) -> Arrival {
        let travel = sweep.direction;
        let at_destination = floor == sweep.destination || self.is_end_of_shaft(floor, travel);
        let halted = at_destination || requests.wants_stop(floor, travel);
        let mut served = Vec::new();

        if !halted {
            debug!("Passing floor {} going {}", floor, travel);
            let sweep = self.park_if_done(requests, floor, dispatch::decide(requests, floor, sweep));
            return Arrival {
                sweep,
                halted,
                served,
            };
        }

        Self::serve(requests, floor, Call::Cab, &mut served);
        if let Some(call) = travel.hall_call() {
            Self::serve(requests, floor, call, &mut served);
        }

        let next = if at_destination {
            let heading = match self.deferred_direction(requests, floor, sweep) {
                Direction::Stop => travel,
                deferred => {
                    info!("Adopting deferred direction {} at floor {}", deferred, floor);
                    if let Some(call) = deferred.hall_call() {
                        Self::serve(requests, floor, call, &mut served);
                    }
                    deferred
                }
            };
            dispatch::plan_sweep(requests, floor, heading)
                .or_else(|| dispatch::plan_from_idle(requests, floor))
                .unwrap_or(Sweep::parked(floor))
        } else {
            dispatch::decide(requests, floor, sweep)
        };

        info!("Halted at floor {}", floor);
        Arrival {
            sweep: self.park_if_done(requests, floor, next),
            halted,
            served,
        }
    }

    pub fn depart(&self, requests: &Requests, floor: Floor, sweep: Sweep) -> Departure {
        if requests.wants_stop(floor, sweep.direction) {
            return Departure::Stall;
        }

        let sweep = if self.is_end_of_shaft(floor, sweep.direction) {
            Sweep::parked(floor)
        } else {
            sweep
        };

        match sweep.direction {
            Direction::Stop => match dispatch::plan_from_idle(requests, floor) {
                Some(plan) => Departure::Depart(plan),
                None => Departure::Idle(sweep),
            },
            _ => Departure::Depart(dispatch::decide(requests, floor, sweep)),
        }
    }

    /// Answers a press at the floor the cabin is halted at. A cab call or a
    /// hall call in the current direction is served on the spot, and a parked
    /// cabin answers any call. Anything else stays set for a later arrival.
    pub fn answer(
        &self,
        requests: &mut Requests,
        floor: Floor,
        sweep: Sweep,
        call: Call,
    ) -> Option<(Floor, Call)> {
        let answers = match (call, sweep.direction.hall_call()) {
            (Call::Cab, _) | (_, None) => true,
            (hall, Some(travel)) => hall == travel,
        };
        if answers && requests.clear(floor, call) {
            Some((floor, call))
        } else {
            None
        }
    }

    /// The opposite-direction commitment to take up at the destination. An
    /// opposite hall call that showed up after the sweep was planned counts
    /// too, as long as nothing lies further ahead.
    fn deferred_direction(&self, requests: &Requests, floor: Floor, sweep: Sweep) -> Direction {
        if sweep.destination_type.is_moving() {
            return sweep.destination_type;
        }
        let opposite = sweep.direction.opposite();
        match opposite.hall_call() {
            Some(call)
                if requests.is_set(floor, call)
                    && dispatch::plan_sweep(requests, floor, sweep.direction).is_none() =>
            {
                opposite
            }
            _ => Direction::Stop,
        }
    }

    fn park_if_done(&self, requests: &Requests, floor: Floor, sweep: Sweep) -> Sweep {
        if requests.has_any_request() {
            sweep
        } else {
            Sweep::parked(floor)
        }
    }

    fn is_end_of_shaft(&self, floor: Floor, direction: Direction) -> bool {
        match direction {
            Direction::Up => floor >= self.max_floor,
            Direction::Down => floor == 0,
            Direction::Stop => false,
        }
    }

    fn serve(requests: &mut Requests, floor: Floor, call: Call, served: &mut Vec<(Floor, Call)>) {
        if requests.clear(floor, call) {
            served.push((floor, call));
        }
    }
}
