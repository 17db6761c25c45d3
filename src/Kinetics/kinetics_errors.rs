use thiserror::Error;

/// error types for building, solving and exporting the binding kinetics problem
#[derive(Debug, Error)]
pub enum KineticsError {
    #[error("Invalid time grid: {0}")]
    InvalidTimeGrid(String),
    #[error("Unknown mechanism code: {0}. Available codes: M1, M2")]
    UnknownMechanism(String),
    #[error("Unknown solver: {0}. Available solvers: RK45, BDF, Radau, BE")]
    UnknownSolver(String),
    #[error("Solver returned no solution")]
    EmptySolution,
    #[error("Solver stopped at t = {reached} before the end of the time grid t = {requested}")]
    IncompleteSolution { reached: f64, requested: f64 },
    #[error("Non-finite concentration of {species} at t = {t}")]
    NonFiniteValue { species: String, t: f64 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize settings: {0}")]
    Serde(#[from] serde_json::Error),
}
