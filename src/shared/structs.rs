/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*             Constants               */
/***************************************/
pub const DIRN_BITS_STOP: u8 = 0b00;
pub const DIRN_BITS_UP: u8 = 0b10;
pub const DIRN_BITS_DOWN: u8 = 0b01;

/***************************************/
/*       Public data structures        */
/***************************************/
pub type Floor = u8;

/// Travel direction of the cabin. `Stop` means parked, and doubles as the
/// "nothing deferred" value of a destination type.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stop,
}

impl Direction {
    /// Legacy two-bit encoding used on the external interface.
    pub fn to_bits(self) -> u8 {
        match self {
            Direction::Up => DIRN_BITS_UP,
            Direction::Down => DIRN_BITS_DOWN,
            Direction::Stop => DIRN_BITS_STOP,
        }
    }

    /// Decodes the two-bit encoding. `0b11` has no meaning and yields `None`.
    pub fn from_bits(bits: u8) -> Option<Direction> {
        match bits {
            DIRN_BITS_UP => Some(Direction::Up),
            DIRN_BITS_DOWN => Some(Direction::Down),
            DIRN_BITS_STOP => Some(Direction::Stop),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Stop => Direction::Stop,
        }
    }

    /// The hall button a passenger travelling this way would have pressed.
    pub fn hall_call(self) -> Option<Call> {
        match self {
            Direction::Up => Some(Call::HallUp),
            Direction::Down => Some(Call::HallDown),
            Direction::Stop => None,
        }
    }

    pub fn is_moving(self) -> bool {
        self != Direction::Stop
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Stop => write!(f, "stop"),
        }
    }
}

/// Kind of call button. Discriminants follow the hall-up / hall-down / cab
/// ordering used by the elevator hardware driver.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Call {
    HallUp = 0,
    HallDown = 1,
    Cab = 2,
}

impl Call {
    pub fn iter() -> impl Iterator<Item = Call> {
        [Call::HallUp, Call::HallDown, Call::Cab].into_iter()
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::HallUp => write!(f, "hall up"),
            Call::HallDown => write!(f, "hall down"),
            Call::Cab => write!(f, "cab"),
        }
    }
}

/// Physical phase of the cabin.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum MotionState {
    Stopped {
        floor: Floor,
    },
    Transit {
        from: Floor,
        direction: Direction,
        elapsed: u8,
    },
}

impl MotionState {
    /// Opaque diagnostic id, unique per floor and phase.
    ///
    /// Each floor owns a block of `2 * transit_ticks + 1` ids: the stopped
    /// state first, then the upward transit phases, then the downward ones.
    pub fn diagnostic_id(&self, transit_ticks: u8) -> u32 {
        let block = 2 * transit_ticks as u32 + 1;
        match *self {
            MotionState::Stopped { floor } => floor as u32 * block,
            MotionState::Transit {
                from,
                direction,
                elapsed,
            } => {
                let base = from as u32 * block + 1 + elapsed as u32;
                match direction {
                    Direction::Down => base + transit_ticks as u32,
                    _ => base,
                }
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElevatorState {
    pub floor: Floor,
    #[serde(rename = "nextFloor")]
    pub next_floor: Floor,
    pub direction: Direction,
    pub destination: Floor,
    #[serde(rename = "destinationType")]
    pub destination_type: Direction,
    pub motion: MotionState,
    #[serde(rename = "fsmState")]
    pub fsm_state: u32,
    pub stalled: bool,
}

impl ElevatorState {
    pub fn new() -> ElevatorState {
        ElevatorState {
            floor: 0,
            next_floor: 0,
            direction: Direction::Stop,
            destination: 0,
            destination_type: Direction::Stop,
            motion: MotionState::Stopped { floor: 0 },
            fsm_state: 0,
            stalled: false,
        }
    }
}

impl Default for ElevatorState {
    fn default() -> Self {
        ElevatorState::new()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod structs_tests {
    use super::*;

    #[test]
    fn test_direction_bits() {
        assert_eq!(Direction::Up.to_bits(), 0b10);
        assert_eq!(Direction::Down.to_bits(), 0b01);
        assert_eq!(Direction::Stop.to_bits(), 0b00);

        for direction in [Direction::Up, Direction::Down, Direction::Stop] {
            assert_eq!(Direction::from_bits(direction.to_bits()), Some(direction));
        }
        assert_eq!(Direction::from_bits(0b11), None);
    }

    #[test]
    fn test_diagnostic_ids_are_unique() {
        // Arrange
        let transit_ticks = 4;
        let mut ids = Vec::new();

        // Act
        for floor in 0..5 {
            ids.push(MotionState::Stopped { floor }.diagnostic_id(transit_ticks));
            for elapsed in 0..transit_ticks {
                for direction in [Direction::Up, Direction::Down] {
                    let state = MotionState::Transit {
                        from: floor,
                        direction,
                        elapsed,
                    };
                    ids.push(state.diagnostic_id(transit_ticks));
                }
            }
        }

        // Assert
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_state_serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&ElevatorState::new()).unwrap();

        assert!(json.contains("\"nextFloor\":0"));
        assert!(json.contains("\"direction\":\"stop\""));
        assert!(json.contains("\"state\":\"stopped\""));
    }
}
