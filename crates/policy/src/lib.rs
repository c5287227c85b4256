pub mod gate;

pub use gate::{ConfirmationGate, GateOutcome, GateState};
