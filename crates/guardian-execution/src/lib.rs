//! Background execution for Guardian: the simulation driver and its random
//! event source, plus process-wide logging setup.

pub mod logging;
pub mod random_source;
pub mod simulation_driver;

pub use logging::{LogOptions, init_logging};
pub use random_source::RandomEventSource;
pub use simulation_driver::{DriverReport, SimulationDriver};
