/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::ClockConfig;

/// Free-running divider: one control tick every `divide_by` reference edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDivider {
    divide_by: u32,
    count: u32,
}

impl TickDivider {
    pub fn new(divide_by: u32) -> TickDivider {
        TickDivider {
            divide_by: divide_by.max(1),
            count: 0,
        }
    }

    /// Feeds one reference edge. Returns `true` when a control tick is due.
    pub fn clock(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.divide_by {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

/**
 * # Clock
 * Control-cycle source for the controller thread.
 *
 * Divides a reference clock (a `crossbeam_channel::tick` at `reference_period`) down to
 * the control cycle and sends one `()` per control tick on `tick_tx`.
 *
 * # Fields
 * - `reference_period`:    Period of the reference clock.
 * - `divider`:             Divider state.
 * - `tick_tx`:             Sender for control ticks.
 * - `terminate_rx`:        Stops the clock when a message arrives or the sender is dropped.
 */
pub struct Clock {
    reference_period: Duration,
    divider: TickDivider,
    tick_tx: cbc::Sender<()>,
    terminate_rx: cbc::Receiver<()>,
}

impl Clock {
    pub fn new(config: &ClockConfig, tick_tx: cbc::Sender<()>, terminate_rx: cbc::Receiver<()>) -> Clock {
        Clock {
            reference_period: Duration::from_micros(config.reference_period_us),
            divider: TickDivider::new(config.divide_by),
            tick_tx,
            terminate_rx,
        }
    }

    pub fn run(mut self) {
        let reference = cbc::tick(self.reference_period);
        info!(
            "Clock running, control cycle {:?}",
            self.reference_period * self.divider.divide_by
        );

        loop {
            cbc::select! {
                recv(reference) -> _ => {
                    if self.divider.clock() && self.tick_tx.send(()).is_err() {
                        debug!("Tick receiver gone, stopping clock");
                        return;
                    }
                }
                recv(self.terminate_rx) -> _ => {
                    debug!("Clock terminated");
                    return;
                }
            }
        }
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
