pub mod inflight;
pub mod reload;
pub mod settings;
pub mod solver;

pub use inflight::{FlightGuard, InflightRegistry, Join};
pub use reload::EngineReloader;
pub use settings::SolverSettings;
pub use solver::Solver;
