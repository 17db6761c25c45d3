//! # Parameter Update Loop
//!
//! Interactive controls of the teaching tool and the state published to the display.
//!
//! - [`ControlRange`]: admissible range and step of one control
//! - [`ParameterSet`]: the five user controlled scalars k1, k-1, k2, [A]0, [B]0
//! - [`ParameterChange`]: event carrying the current values of all five controls
//! - [`AppState`]: mechanism, parameters and the published trajectory
//!
//! An update never mutates the published state. [`AppState::apply`] re-integrates
//! with the new parameters and returns a new state which the caller swaps in.
use crate::Kinetics::binding_kinetics_IVP::{BindingKineticsIVP, TimeGrid};
use crate::Kinetics::kinetics_errors::KineticsError;
use crate::Kinetics::mechanisms::{Concentrations, Mechanism, RateConstants};
use crate::Kinetics::trajectory::Trajectory;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// bounded range of one interactive control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRange {
    pub title: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ControlRange {
    /// clamps `value` into `[min, max]`
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const K1_RANGE: ControlRange = ControlRange {
    title: "k1",
    min: 0.2,
    max: 40.0,
    step: 0.1,
};
pub const K_MINUS1_RANGE: ControlRange = ControlRange {
    title: "k-1",
    min: 0.2,
    max: 40.0,
    step: 0.1,
};
pub const K2_RANGE: ControlRange = ControlRange {
    title: "k2",
    min: 0.2,
    max: 20.0,
    step: 0.02,
};
pub const A0_RANGE: ControlRange = ControlRange {
    title: "[A]0",
    min: 0.1,
    max: 4.0,
    step: 0.01,
};
pub const B0_RANGE: ControlRange = ControlRange {
    title: "[B]0",
    min: 0.1,
    max: 4.0,
    step: 0.01,
};

/// the five controls in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    K1,
    KMinus1,
    K2,
    A0,
    B0,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::K1,
        Control::KMinus1,
        Control::K2,
        Control::A0,
        Control::B0,
    ];

    pub fn range(&self) -> ControlRange {
        match self {
            Control::K1 => K1_RANGE,
            Control::KMinus1 => K_MINUS1_RANGE,
            Control::K2 => K2_RANGE,
            Control::A0 => A0_RANGE,
            Control::B0 => B0_RANGE,
        }
    }

    pub fn title(&self) -> &'static str {
        self.range().title
    }
}

/// user controlled parameters; values always lie inside the control ranges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub k1: f64,
    pub k_minus1: f64,
    pub k2: f64,
    pub a0: f64,
    pub b0: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            k1: 20.0,
            k_minus1: 15.0,
            k2: 2.0,
            a0: 1.0,
            b0: 1.0,
        }
    }
}

impl ParameterSet {
    /// builds a parameter set, each value clamped into its control range
    pub fn new(k1: f64, k_minus1: f64, k2: f64, a0: f64, b0: f64) -> Self {
        let mut p = Self::default();
        p.set(Control::K1, k1);
        p.set(Control::KMinus1, k_minus1);
        p.set(Control::K2, k2);
        p.set(Control::A0, a0);
        p.set(Control::B0, b0);
        p
    }

    pub fn get(&self, control: Control) -> f64 {
        match control {
            Control::K1 => self.k1,
            Control::KMinus1 => self.k_minus1,
            Control::K2 => self.k2,
            Control::A0 => self.a0,
            Control::B0 => self.b0,
        }
    }

    /// sets one control; out of range values are clamped
    pub fn set(&mut self, control: Control, value: f64) {
        let range = control.range();
        let clamped = range.clamp(value);
        if clamped != value {
            warn!(
                "{} = {} is outside [{}, {}], using {}",
                range.title, value, range.min, range.max, clamped
            );
        }
        match control {
            Control::K1 => self.k1 = clamped,
            Control::KMinus1 => self.k_minus1 = clamped,
            Control::K2 => self.k2 = clamped,
            Control::A0 => self.a0 = clamped,
            Control::B0 => self.b0 = clamped,
        }
    }

    /// A and B from the controls, C and D start at zero
    pub fn initial_concentrations(&self) -> Concentrations {
        Concentrations::new(self.a0, self.b0, 0.0, 0.0)
    }

    pub fn rate_constants(&self) -> RateConstants {
        RateConstants::new(self.k1, self.k_minus1, self.k2)
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "k1 = {}, k-1 = {}, k2 = {}, [A]0 = {}, [B]0 = {}",
            self.k1, self.k_minus1, self.k2, self.a0, self.b0
        )
    }
}

/// Parameter-change event: the current values of all five controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterChange {
    pub k1: f64,
    pub k_minus1: f64,
    pub k2: f64,
    pub a0: f64,
    pub b0: f64,
}

impl From<ParameterSet> for ParameterChange {
    fn from(p: ParameterSet) -> Self {
        Self {
            k1: p.k1,
            k_minus1: p.k_minus1,
            k2: p.k2,
            a0: p.a0,
            b0: p.b0,
        }
    }
}

impl ParameterChange {
    pub fn to_parameters(&self) -> ParameterSet {
        ParameterSet::new(self.k1, self.k_minus1, self.k2, self.a0, self.b0)
    }
}

/// State published to the display.
///
/// Created once with the initial grid, replaced as a whole after every
/// parameter change or mechanism switch.
#[derive(Clone)]
pub struct AppState {
    mechanism: Mechanism,
    parameters: ParameterSet,
    trajectory: Trajectory,
    solver: BindingKineticsIVP,
    update_grid: TimeGrid,
}

impl AppState {
    /// solves the problem for `parameters` on `initial_grid`
    pub fn new(
        mechanism: Mechanism,
        parameters: ParameterSet,
        solver: BindingKineticsIVP,
        initial_grid: &TimeGrid,
        update_grid: TimeGrid,
    ) -> Result<Self, KineticsError> {
        let trajectory = solver.integrate(
            &mechanism,
            &parameters.initial_concentrations(),
            &parameters.rate_constants(),
            initial_grid,
        )?;
        Ok(Self {
            mechanism,
            parameters,
            trajectory,
            solver,
            update_grid,
        })
    }

    pub fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn update_grid(&self) -> &TimeGrid {
        &self.update_grid
    }

    /// Full recompute for a parameter-change event.
    ///
    /// Reads the event values, builds the new initial state, re-integrates on the
    /// update grid and returns the new state. `self` is left untouched.
    pub fn apply(&self, change: ParameterChange) -> Result<AppState, KineticsError> {
        let parameters = change.to_parameters();
        info!("parameter change: {}", parameters);
        self.rebuild(self.mechanism, parameters, self.solver.clone())
    }

    /// Full recompute with another mechanism and the current parameters.
    pub fn switch_mechanism(&self, mechanism: Mechanism) -> Result<AppState, KineticsError> {
        info!("mechanism change: {}", mechanism.label());
        self.rebuild(mechanism, self.parameters, self.solver.clone())
    }

    /// Full recompute with another solver configuration; later updates keep using it.
    pub fn switch_solver(&self, solver: BindingKineticsIVP) -> Result<AppState, KineticsError> {
        info!("solver change, recomputing {}", self.mechanism.label());
        self.rebuild(self.mechanism, self.parameters, solver)
    }

    pub fn solver(&self) -> &BindingKineticsIVP {
        &self.solver
    }

    fn rebuild(
        &self,
        mechanism: Mechanism,
        parameters: ParameterSet,
        solver: BindingKineticsIVP,
    ) -> Result<AppState, KineticsError> {
        let trajectory = solver.integrate(
            &mechanism,
            &parameters.initial_concentrations(),
            &parameters.rate_constants(),
            &self.update_grid,
        )?;
        Ok(AppState {
            mechanism,
            parameters,
            trajectory,
            solver,
            update_grid: self.update_grid.clone(),
        })
    }
}
