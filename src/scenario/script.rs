/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ElevatorConfig;
use crate::elevator::MotionSequencer;
use crate::requests::Requests;
use crate::shared::{Call, ElevatorState, Floor};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("event at tick {tick}: '{kind}' needs a floor")]
    MissingFloor { tick: u32, kind: String },
    #[error("event at tick {tick}: floor {floor} does not exist")]
    FloorOutOfRange { tick: u32, floor: Floor },
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    HallUp,
    HallDown,
    Cab,
    /// Raw bit-vectors, latched as-is. Can place a call on the cabin's own floor.
    Bits,
    Reset,
}

/// One scripted input, applied just before the control tick `tick`
/// (counted from 1).
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScriptedEvent {
    pub tick: u32,
    pub kind: EventKind,
    pub floor: Option<Floor>,
    #[serde(default)]
    pub hall_up: u32,
    #[serde(default)]
    pub hall_down: u32,
    #[serde(default)]
    pub cab: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Scenario {
    pub ticks: u32,
    #[serde(default, rename = "event")]
    pub events: Vec<ScriptedEvent>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TraceRecord {
    pub tick: u32,
    pub state: ElevatorState,
    pub served: Vec<(Floor, Call)>,
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario, ScenarioError> {
    let path = path.as_ref();
    let scenario_str = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_scenario(&scenario_str)
}

pub fn parse_scenario(scenario_str: &str) -> Result<Scenario, ScenarioError> {
    let mut scenario: Scenario = toml::from_str(scenario_str)?;
    scenario.events.sort_by_key(|event| event.tick);
    Ok(scenario)
}

/// Runs the scenario on a fresh controller parked at floor 0 and records the
/// state after every tick.
pub fn run_scenario(
    scenario: &Scenario,
    config: &ElevatorConfig,
) -> Result<Vec<TraceRecord>, ScenarioError> {
    let mut requests = Requests::new(config.n_floors);
    let mut sequencer = MotionSequencer::new(config);
    let mut trace = Vec::with_capacity(scenario.ticks as usize);

    for tick in 1..=scenario.ticks {
        let mut reset = false;
        for event in scenario.events.iter().filter(|event| event.tick == tick) {
            reset |= apply(event, &mut requests, config.n_floors)?;
        }

        let served = if reset {
            sequencer.reset(&mut requests);
            Vec::new()
        } else {
            sequencer.tick(&mut requests)
        };

        trace.push(TraceRecord {
            tick,
            state: sequencer.state(),
            served,
        });
    }
    Ok(trace)
}

/// Applies one event to the call state. Returns `true` for a reset.
fn apply(event: &ScriptedEvent, requests: &mut Requests, n_floors: u8) -> Result<bool, ScenarioError> {
    let call = match event.kind {
        EventKind::HallUp => Call::HallUp,
        EventKind::HallDown => Call::HallDown,
        EventKind::Cab => Call::Cab,
        EventKind::Bits => {
            let mask = (1u32 << n_floors) - 1;
            for bits in [event.hall_up, event.hall_down, event.cab] {
                if bits & !mask != 0 {
                    return Err(ScenarioError::FloorOutOfRange {
                        tick: event.tick,
                        floor: (32 - bits.leading_zeros() - 1) as Floor,
                    });
                }
            }
            requests.latch_bits(event.hall_up, event.hall_down, event.cab);
            return Ok(false);
        }
        EventKind::Reset => return Ok(true),
    };

    let floor = event.floor.ok_or_else(|| ScenarioError::MissingFloor {
        tick: event.tick,
        kind: format!("{:?}", event.kind),
    })?;
    if floor >= n_floors {
        return Err(ScenarioError::FloorOutOfRange {
            tick: event.tick,
            floor,
        });
    }
    requests.set(floor, call);
    Ok(false)
}

/// One line of human-readable trace output.
pub fn format_record(record: &TraceRecord) -> String {
    let state = &record.state;
    let mut line = format!(
        "tick {:>4}  floor {}  next {}  dir {} ({:02b})  dest {}/{}  fsm {:>3}",
        record.tick,
        state.floor,
        state.next_floor,
        state.direction,
        state.direction.to_bits(),
        state.destination,
        state.destination_type,
        state.fsm_state,
    );
    if state.stalled {
        line.push_str("  STALLED");
    }
    for (floor, call) in record.served.iter() {
        line.push_str(&format!("  served {} @{}", call, floor));
    }
    line
}
