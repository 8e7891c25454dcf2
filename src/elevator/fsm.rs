use crate::config::ElevatorConfig;
use crate::elevator::MotionSequencer;
use crate::panel::PanelEvent;
use crate::requests::Requests;
use crate::shared::{Call, ElevatorState, Floor};
use crossbeam_channel as cbc;
use log::{debug, info, warn};

/**
 * Runs the elevator controller on its own thread.
 *
 * The `ElevatorFSM` owns the call state and the motion sequencer. Button presses and reset
 * requests from the panel are applied as they arrive; a press at the landing where the cabin
 * stands halted may be answered right away. Each control tick from the clock then
 * advances the sequencer by one cycle. Pending panel events are drained before every tick, so
 * a press that arrived before the tick is seen by that tick's dispatch decision.
 *
 * # Fields
 * - `tick_rx`:                 Receives control ticks from the clock.
 * - `panel_rx`:                Receives button presses and reset requests.
 * - `complete_order_tx`:       Sends `(floor, call)` for every call that has been served.
 * - `state_tx`:                Publishes the controller state after every tick.
 * - `terminate_rx`:            Stops the thread.
 * - `requests`:                Pending calls.
 * - `sequencer`:               Motion state machine.
 * - `n_floors`:                The total number of floors serviced by the elevator.
 * - `reset_pending`:           Reset requested, applied on the next tick.
 * - `panel_closed`:            The panel is gone; exit once everything is served.
 */
pub struct ElevatorFSM {
    // Clock and panel channels
    tick_rx: cbc::Receiver<()>,
    panel_rx: cbc::Receiver<PanelEvent>,

    // Output channels
    complete_order_tx: cbc::Sender<(Floor, Call)>,
    state_tx: cbc::Sender<ElevatorState>,
    terminate_rx: cbc::Receiver<()>,

    // Private fields
    requests: Requests,
    sequencer: MotionSequencer,
    n_floors: u8,
    reset_pending: bool,
    panel_closed: bool,
}

impl ElevatorFSM {
    pub fn new(
        config: &ElevatorConfig,
        tick_rx: cbc::Receiver<()>,
        panel_rx: cbc::Receiver<PanelEvent>,
        complete_order_tx: cbc::Sender<(Floor, Call)>,
        state_tx: cbc::Sender<ElevatorState>,
        terminate_rx: cbc::Receiver<()>,
    ) -> ElevatorFSM {
        ElevatorFSM {
            tick_rx,
            panel_rx,
            complete_order_tx,
            state_tx,
            terminate_rx,
            requests: Requests::new(config.n_floors),
            sequencer: MotionSequencer::new(config),
            n_floors: config.n_floors,
            reset_pending: false,
            panel_closed: false,
        }
    }

    pub fn run(mut self) {
        info!("Elevator controller started at floor {}", self.sequencer.floor());
        if self.state_tx.send(self.sequencer.state()).is_err() {
            return;
        }

        loop {
            cbc::select! {
                recv(self.terminate_rx) -> _ => {
                    info!("Elevator controller terminated");
                    return;
                }
                recv(self.panel_rx) -> event => {
                    match event {
                        Ok(event) => self.handle_panel_event(event),
                        Err(_) => self.close_panel(),
                    }
                }
                recv(self.tick_rx) -> tick => {
                    if tick.is_err() {
                        warn!("Clock stopped, shutting down elevator controller");
                        return;
                    }
                    if !self.step() {
                        return;
                    }
                }
            }
        }
    }

    /// Runs one control cycle. Returns `false` when the thread should stop.
    fn step(&mut self) -> bool {
        while let Ok(event) = self.panel_rx.try_recv() {
            self.handle_panel_event(event);
        }

        if self.reset_pending {
            self.reset_pending = false;
            self.sequencer.reset(&mut self.requests);
        } else {
            for completed in self.sequencer.tick(&mut self.requests) {
                self.report_completed(completed);
            }
        }

        if self.state_tx.send(self.sequencer.state()).is_err() {
            info!("State receiver gone, stopping elevator controller");
            return false;
        }

        if self.panel_closed && self.is_finished() {
            info!("All calls served and panel closed, stopping elevator controller");
            return false;
        }
        true
    }

    fn handle_panel_event(&mut self, event: PanelEvent) {
        match event {
            PanelEvent::Reset => self.reset_pending = true,
            PanelEvent::Call { floor, call } => {
                if floor >= self.n_floors {
                    warn!("Ignoring {} call for non-existent floor {}", call, floor);
                    return;
                }
                debug!("New {} call at floor {}", call, floor);
                self.requests.set(floor, call);

                // The door is open at that landing
                if let Some(completed) =
                    self.sequencer.answer_at_landing(&mut self.requests, floor, call)
                {
                    self.report_completed(completed);
                }
            }
        }
    }

    fn report_completed(&self, completed: (Floor, Call)) {
        if self.complete_order_tx.send(completed).is_err() {
            debug!("No listener for completed orders");
        }
    }

    fn close_panel(&mut self) {
        info!("Panel closed, finishing outstanding calls");
        self.panel_closed = true;
        self.panel_rx = cbc::never();
    }

    fn is_finished(&self) -> bool {
        !self.requests.has_any_request()
            && !self.sequencer.direction().is_moving()
            && self.sequencer.is_halted()
    }

    /***************************************/
    /*           Test functions            */
    /***************************************/
    #[cfg(test)]
    pub fn test_get_requests(&self) -> &Requests {
        &self.requests
    }

    #[cfg(test)]
    pub fn test_handle_panel_event(&mut self, event: PanelEvent) {
        self.handle_panel_event(event)
    }

    #[cfg(test)]
    pub fn test_step(&mut self) -> bool {
        self.step()
    }
}
