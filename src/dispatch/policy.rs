/***************************************/
/*           Local modules             */
/***************************************/
use crate::requests::Requests;
use crate::shared::{Direction, Floor};

/***************************************/
/*       Public data structures        */
/***************************************/

/// The commitment the cabin is currently working through.
///
/// `destination` bounds the sweep; `destination_type` is an opposite-direction
/// call waiting at the destination, adopted only once the cabin gets there
/// (`Direction::Stop` when nothing is deferred). `next_floor` is the nearest
/// stop on the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    pub direction: Direction,
    pub destination: Floor,
    pub destination_type: Direction,
    pub next_floor: Floor,
}

impl Sweep {
    /// A cabin with nothing to do at `floor`.
    pub fn parked(floor: Floor) -> Sweep {
        Sweep {
            direction: Direction::Stop,
            destination: floor,
            destination_type: Direction::Stop,
            next_floor: floor,
        }
    }
}

/***************************************/
/*             Public API              */
/***************************************/

/// One dispatch decision for a cabin at `current_floor`.
///
/// A parked cabin picks a fresh sweep toward the nearest call. A committed
/// cabin keeps its direction and destination and only refreshes the next
/// stop. When nothing is found the previous sweep is returned unchanged.
pub fn decide(requests: &Requests, current_floor: Floor, sweep: Sweep) -> Sweep {
    match sweep.direction {
        Direction::Stop => plan_from_idle(requests, current_floor).unwrap_or(sweep),
        direction => Sweep {
            next_floor: preview_next_stop(requests, current_floor, direction, sweep.destination)
                .unwrap_or(sweep.next_floor),
            ..sweep
        },
    }
}

/// Chooses a sweep for a parked cabin: head toward the nearest call, with an
/// exact distance tie going down. Calls on `current_floor` itself are not
/// considered.
pub fn plan_from_idle(requests: &Requests, current_floor: Floor) -> Option<Sweep> {
    let above = floors_ahead(requests, current_floor, Direction::Up)
        .find(|&floor| requests.any_at(floor));
    let below = floors_ahead(requests, current_floor, Direction::Down)
        .find(|&floor| requests.any_at(floor));

    let direction = match (above, below) {
        (Some(up), Some(down)) => {
            if up - current_floor < current_floor - down {
                Direction::Up
            } else {
                Direction::Down
            }
        }
        (Some(_), None) => Direction::Up,
        (None, Some(_)) => Direction::Down,
        (None, None) => return None,
    };

    plan_sweep(requests, current_floor, direction)
}

/// Plans a sweep from `current_floor` restricted to `direction`: the
/// destination is the farthest floor with any call, the next stop the nearest
/// floor that wants the cabin on its way there.
pub fn plan_sweep(requests: &Requests, current_floor: Floor, direction: Direction) -> Option<Sweep> {
    if !direction.is_moving() {
        return None;
    }

    let destination = floors_ahead(requests, current_floor, direction)
        .filter(|&floor| requests.any_at(floor))
        .last()?
        .min(requests.max_floor());

    let destination_type = match direction.opposite().hall_call() {
        Some(call) if requests.is_set(destination, call) => direction.opposite(),
        _ => Direction::Stop,
    };

    let next_floor = preview_next_stop(requests, current_floor, direction, destination)
        .unwrap_or(destination);

    Some(Sweep {
        direction,
        destination,
        destination_type,
        next_floor,
    })
}

/// Nearest floor in `(current_floor, destination]` where a cabin travelling
/// in `direction` will halt. The destination itself always counts.
pub fn preview_next_stop(
    requests: &Requests,
    current_floor: Floor,
    direction: Direction,
    destination: Floor,
) -> Option<Floor> {
    let first = match direction {
        Direction::Up if current_floor < destination => current_floor + 1,
        Direction::Down if current_floor > destination => current_floor - 1,
        _ => return None,
    };
    if !requests.has_request_in_range(first, destination, direction) {
        return Some(destination);
    }

    let in_reach = |floor: Floor| match direction {
        Direction::Up => floor <= destination,
        Direction::Down => floor >= destination,
        Direction::Stop => false,
    };

    floors_ahead(requests, current_floor, direction)
        .take_while(|&floor| in_reach(floor))
        .find(|&floor| floor == destination || requests.wants_stop(floor, direction))
}

/// Floors strictly beyond `from` in `direction`, nearest first, never past a
/// terminal floor.
fn floors_ahead(
    requests: &Requests,
    from: Floor,
    direction: Direction,
) -> Box<dyn Iterator<Item = Floor>> {
    match direction {
        Direction::Up => Box::new(from.saturating_add(1)..requests.n_floors()),
        Direction::Down => Box::new((0..from.min(requests.n_floors())).rev()),
        Direction::Stop => Box::new(std::iter::empty()),
    }
}
