pub mod arrival;
pub mod fsm;
pub mod sequencer;

pub use arrival::ArrivalHandler;
pub use fsm::ElevatorFSM;
pub use sequencer::MotionSequencer;
