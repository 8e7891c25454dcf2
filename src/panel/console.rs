/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{info, warn};
use std::io::BufRead;
use std::str::FromStr;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{Call, Floor};

/***************************************/
/*       Public data structures        */
/***************************************/

/// Input from the button layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Call { floor: Floor, call: Call },
    Reset,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PanelError {
    #[error("unknown command '{0}' (expected up, down, cab or reset)")]
    UnknownCommand(String),
    #[error("command '{0}' needs a floor")]
    MissingFloor(String),
    #[error("'{0}' is not a floor number")]
    InvalidFloor(String),
    #[error("floor {floor} does not exist (floors 0..{n_floors})")]
    FloorOutOfRange { floor: Floor, n_floors: u8 },
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

impl FromStr for PanelEvent {
    type Err = PanelError;

    /// Parses `up <floor>`, `down <floor>`, `cab <floor>` or `reset`.
    /// Floors are not range-checked here, see [`PanelEvent::validate`].
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();

        let call = match command.as_str() {
            "up" => Call::HallUp,
            "down" => Call::HallDown,
            "cab" => Call::Cab,
            "reset" => {
                return match words.next() {
                    Some(extra) => Err(PanelError::TrailingInput(extra.to_string())),
                    None => Ok(PanelEvent::Reset),
                }
            }
            _ => return Err(PanelError::UnknownCommand(command)),
        };

        let floor = words
            .next()
            .ok_or_else(|| PanelError::MissingFloor(command.clone()))?;
        let floor = floor
            .parse::<Floor>()
            .map_err(|_| PanelError::InvalidFloor(floor.to_string()))?;

        if let Some(extra) = words.next() {
            return Err(PanelError::TrailingInput(extra.to_string()));
        }
        Ok(PanelEvent::Call { floor, call })
    }
}

impl PanelEvent {
    /// Rejects calls for floors the building does not have.
    pub fn validate(self, n_floors: u8) -> Result<Self, PanelError> {
        match self {
            PanelEvent::Call { floor, .. } if floor >= n_floors => {
                Err(PanelError::FloorOutOfRange { floor, n_floors })
            }
            event => Ok(event),
        }
    }
}

/**
 * # Console panel
 * Stands in for the call buttons: reads one command per line and forwards it to the
 * controller thread.
 *
 * Invalid lines are reported and skipped. Blank lines and lines starting with `#` are
 * ignored. The panel stops at end of input or when the controller hangs up, dropping
 * `panel_tx` so the controller can see the panel is gone.
 *
 * # Fields
 * - `reader`:      Line source, stdin in the binary.
 * - `n_floors`:    Number of floors, used to reject out-of-range presses.
 * - `panel_tx`:    Sender for validated panel events.
 */
pub struct ConsolePanel<R: BufRead> {
    reader: R,
    n_floors: u8,
    panel_tx: cbc::Sender<PanelEvent>,
}

impl<R: BufRead> ConsolePanel<R> {
    pub fn new(reader: R, n_floors: u8, panel_tx: cbc::Sender<PanelEvent>) -> ConsolePanel<R> {
        ConsolePanel {
            reader,
            n_floors,
            panel_tx,
        }
    }

    pub fn run(self) {
        for line in self.reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read panel input: {}", e);
                    break;
                }
            };

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.parse::<PanelEvent>().and_then(|event| event.validate(self.n_floors)) {
                Ok(event) => {
                    if self.panel_tx.send(event).is_err() {
                        return;
                    }
                }
                Err(e) => warn!("Ignoring panel input: {}", e),
            }
        }
        info!("Panel input closed");
    }
}
