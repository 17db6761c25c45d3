//! # Settings Module
//!
//! ## Purpose
//! Persistent configuration of the teaching tool: default mechanism, solver and
//! tolerances, time horizon and grid densities, default slider values and logging.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "mechanism": "M1",
//!   "solver": "RK45",
//!   "rtol": 1e-6,
//!   "atol": 1e-6,
//!   "t_start": 0.0,
//!   "t_end": 20.0,
//!   "initial_points": 2000,
//!   "update_points": 1000,
//!   "parameters": { "k1": 20.0, "k_minus1": 15.0, "k2": 2.0, "a0": 1.0, "b0": 1.0 },
//!   "log_level": "info",
//!   "log_file": null
//! }
//! ```
//!
//! A missing file means defaults. Unknown mechanism or solver names are reported
//! when the settings are converted into solver objects, not when they are read.
use crate::Kinetics::binding_kinetics_IVP::{BindingKineticsIVP, TimeGrid, solver_type_from_name};
use crate::Kinetics::kinetics_errors::KineticsError;
use crate::Kinetics::mechanisms::Mechanism;
use crate::Kinetics::parameter_loop::{AppState, ParameterSet};
use log::{LevelFilter, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "kinetics_config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KineticsSettings {
    /// mechanism code, "M1" or "M2"
    pub mechanism: String,
    /// solver name: "RK45", "BDF", "Radau" or "BE"
    pub solver: String,
    pub rtol: f64,
    pub atol: f64,
    pub t_start: f64,
    pub t_end: f64,
    /// grid density of the first solve
    pub initial_points: usize,
    /// grid density of the solves after parameter changes
    pub update_points: usize,
    /// starting values of the controls
    pub parameters: ParameterSet,
    /// "off", "error", "warn", "info", "debug" or "trace"
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for KineticsSettings {
    fn default() -> Self {
        Self {
            mechanism: "M1".to_string(),
            solver: "RK45".to_string(),
            rtol: 1e-6,
            atol: 1e-6,
            t_start: 0.0,
            t_end: 20.0,
            initial_points: 2000,
            update_points: 1000,
            parameters: ParameterSet::default(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl KineticsSettings {
    /// Reads settings from a JSON file, defaults if the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, KineticsError> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let settings: KineticsSettings = serde_json::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), KineticsError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)?;
        info!("settings saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn mechanism(&self) -> Result<Mechanism, KineticsError> {
        Mechanism::from_code(&self.mechanism)
    }

    pub fn solver(&self) -> Result<BindingKineticsIVP, KineticsError> {
        let mut ivp = BindingKineticsIVP::new(solver_type_from_name(&self.solver)?);
        ivp.set_tolerances(self.rtol, self.atol);
        Ok(ivp)
    }

    pub fn initial_grid(&self) -> Result<TimeGrid, KineticsError> {
        TimeGrid::new(self.t_start, self.t_end, self.initial_points)
    }

    pub fn update_grid(&self) -> Result<TimeGrid, KineticsError> {
        TimeGrid::new(self.t_start, self.t_end, self.update_points)
    }

    /// slider start values clamped into the control ranges
    pub fn parameters(&self) -> ParameterSet {
        let p = self.parameters;
        ParameterSet::new(p.k1, p.k_minus1, p.k2, p.a0, p.b0)
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// startup state: the first solve on the initial grid
    pub fn initial_state(&self) -> Result<AppState, KineticsError> {
        AppState::new(
            self.mechanism()?,
            self.parameters(),
            self.solver()?,
            &self.initial_grid()?,
            self.update_grid()?,
        )
    }
}
