//! Host implementations

mod simulator;

pub use simulator::{Failures, HostCommand, HttpBackend, SimulatedHost};
