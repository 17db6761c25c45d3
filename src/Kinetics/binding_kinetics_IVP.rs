//! # Binding Kinetics Initial Value Problem
//!
//! Integrates the rate laws from [`crate::Kinetics::mechanisms`] over a time grid.
//! The integration itself is delegated to the adaptive solvers of RustedSciThe
//! (`UniversalODESolver`), the solver output is then sampled on the requested
//! evenly spaced grid.
//!
//! ## Main Components
//! - [`TimeGrid`]: evenly spaced time points over a fixed horizon
//! - [`BindingKineticsIVP`]: solver configuration and the `integrate` operation
//! - [`integrate`]: the same operation with the default solver configuration
//!
//! ## Workflow
//! `new()` → optional `set_tolerances()` → `integrate()` for
//! every parameter set. Nothing is cached between calls, every call is a full solve.
//!
//! ## Solver notes
//! - default solver is explicit adaptive RK45; BDF, Radau and Backward Euler are
//!   available through [`solver_type_from_name`]
//! - solver points are resampled onto the grid by cubic Hermite interpolation,
//!   the slopes at the solver points are the rates of the mechanism
//! - Hermite interpolation keeps the linear invariants of the mechanism
//!   (A+C+D and B+C+D for mechanism 1) since the rates satisfy them too
//! - `max_step` is capped by the grid spacing
//!
//! # Examples
//! ```rust, ignore
//! use BindKinetics::Kinetics::binding_kinetics_IVP::{integrate, TimeGrid};
//! use BindKinetics::Kinetics::mechanisms::*;
//!
//! let grid = TimeGrid::new(0.0, 20.0, 2000)?;
//! let trajectory = integrate(
//!     &Mechanism::default(),
//!     &Concentrations::new(1.0, 1.0, 0.0, 0.0),
//!     &RateConstants::new(20.0, 15.0, 2.0),
//!     &grid,
//! )?;
//! trajectory.print_summary(10);
//! ```
use crate::Kinetics::kinetics_errors::KineticsError;
use crate::Kinetics::mechanisms::{
    Concentrations, Mechanism, RateConstants, RateLaw, SPECIES, pack_state,
};
use crate::Kinetics::trajectory::Trajectory;
use RustedSciThe::numerical::ODE_api2::{SolverParam, SolverType, UniversalODESolver};
use RustedSciThe::numerical::Radau::Radau_main::RadauOrder;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use std::collections::HashMap;

/// Evenly spaced time points `t_start..=t_end`
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    t_start: f64,
    t_end: f64,
    n_points: usize,
}

impl TimeGrid {
    /// # Returns
    /// * `Err(KineticsError::InvalidTimeGrid)` if there are less than 2 points,
    ///   the horizon is empty or reversed, or a bound is not finite
    pub fn new(t_start: f64, t_end: f64, n_points: usize) -> Result<Self, KineticsError> {
        if n_points < 2 {
            return Err(KineticsError::InvalidTimeGrid(format!(
                "at least 2 points required, got {}",
                n_points
            )));
        }
        if !t_start.is_finite() || !t_end.is_finite() {
            return Err(KineticsError::InvalidTimeGrid(
                "time bounds must be finite".to_string(),
            ));
        }
        if t_end <= t_start {
            return Err(KineticsError::InvalidTimeGrid(format!(
                "t_end ({}) must be larger than t_start ({})",
                t_end, t_start
            )));
        }
        Ok(Self {
            t_start,
            t_end,
            n_points,
        })
    }

    pub fn t_start(&self) -> f64 {
        self.t_start
    }

    pub fn t_end(&self) -> f64 {
        self.t_end
    }

    pub fn len(&self) -> usize {
        self.n_points
    }

    pub fn is_empty(&self) -> bool {
        self.n_points == 0
    }

    pub fn spacing(&self) -> f64 {
        (self.t_end - self.t_start) / (self.n_points - 1) as f64
    }

    pub fn points(&self) -> DVector<f64> {
        let dt = self.spacing();
        let mut points: Vec<f64> = (0..self.n_points)
            .map(|i| self.t_start + i as f64 * dt)
            .collect();
        // last point exactly at the horizon, without accumulated rounding
        points[self.n_points - 1] = self.t_end;
        DVector::from_vec(points)
    }
}

/// maps a solver name from settings or menus to the RustedSciThe solver type
pub fn solver_type_from_name(name: &str) -> Result<SolverType, KineticsError> {
    match name.trim().to_uppercase().as_str() {
        "RK45" => Ok(SolverType::NonStiff("RK45".to_owned())),
        "BDF" => Ok(SolverType::BDF),
        "RADAU" => Ok(SolverType::Radau(RadauOrder::Order3)),
        "BE" | "BACKWARDEULER" => Ok(SolverType::BackwardEuler),
        _ => Err(KineticsError::UnknownSolver(name.to_string())),
    }
}

/// Solver configuration for the binding kinetics problem.
///
/// The struct does not keep any result, each call of [`BindingKineticsIVP::integrate`]
/// creates a fresh `UniversalODESolver` and returns a new [`Trajectory`].
#[derive(Clone)]
pub struct BindingKineticsIVP {
    /// Numerical solver parameters (step size, tolerance, etc.)
    solver_params: HashMap<String, SolverParam>,
    /// Type of numerical solver to use
    solvertype: SolverType,
}

impl Default for BindingKineticsIVP {
    fn default() -> Self {
        Self::new(SolverType::NonStiff("RK45".to_owned()))
    }
}

impl BindingKineticsIVP {
    pub fn new(solvertype: SolverType) -> Self {
        let map_of_params = HashMap::from([
            ("step_size".to_owned(), SolverParam::Float(1e-3)),
            ("tolerance".to_owned(), SolverParam::Float(1e-6)),
            ("max_iterations".to_owned(), SolverParam::Int(100000)),
            ("rtol".to_owned(), SolverParam::Float(1e-6)),
            ("atol".to_owned(), SolverParam::Float(1e-6)),
            ("max_step".to_owned(), SolverParam::Float(0.1)),
            ("first_step".to_owned(), SolverParam::OptionalFloat(None)),
            ("vectorized".to_owned(), SolverParam::Bool(false)),
            ("jac_sparsity".to_owned(), SolverParam::OptionalMatrix(None)),
            ("parallel".to_owned(), SolverParam::Bool(false)),
        ]);
        Self {
            solver_params: map_of_params,
            solvertype,
        }
    }

    pub fn set_tolerances(&mut self, rtol: f64, atol: f64) {
        self.solver_params
            .insert("rtol".to_owned(), SolverParam::Float(rtol));
        self.solver_params
            .insert("atol".to_owned(), SolverParam::Float(atol));
        self.solver_params
            .insert("tolerance".to_owned(), SolverParam::Float(rtol));
    }

    pub fn solver_params(&self) -> &HashMap<String, SolverParam> {
        &self.solver_params
    }

    pub fn solvertype(&self) -> &SolverType {
        &self.solvertype
    }

    /// Solves the initial value problem of `mechanism` and samples it on `grid`.
    ///
    /// The rate constants enter the right-hand side as constants, only the four
    /// concentrations are unknowns of the solver.
    ///
    /// # Returns
    /// * `Ok(Trajectory)` - one row of concentrations per grid point, the first row
    ///   is `initial`
    /// * `Err(KineticsError)` - the solver produced no result, stopped before the end
    ///   of the grid or produced non-finite values
    pub fn integrate(
        &self,
        mechanism: &Mechanism,
        initial: &Concentrations,
        rate_constants: &RateConstants,
        grid: &TimeGrid,
    ) -> Result<Trajectory, KineticsError> {
        info!(
            "solving {} with y0 = {:?} on {} points over [{}, {}]",
            mechanism.label(),
            pack_state(initial, rate_constants).as_slice(),
            grid.len(),
            grid.t_start(),
            grid.t_end()
        );
        debug!(
            "initial rates {:?}",
            mechanism.rates(initial, rate_constants, grid.t_start())
        );
        let eq_system = mechanism.rate_expressions(rate_constants);
        let unknowns: Vec<String> = SPECIES.iter().map(|s| s.to_string()).collect();

        let mut params = self.solver_params.clone();
        let spacing = grid.spacing();
        let max_step = match params.get("max_step") {
            Some(SolverParam::Float(step)) => step.min(spacing),
            _ => spacing,
        };
        params.insert("max_step".to_owned(), SolverParam::Float(max_step));

        let mut ode = UniversalODESolver::new(
            eq_system,
            unknowns,
            "t".to_owned(),
            self.solvertype.clone(),
            grid.t_start(),
            initial.to_dvector(),
            grid.t_end(),
        );
        ode.set_parameters(params);
        ode.initialize();
        ode.solve();

        let (t_result, y_result) = ode.get_result();
        let t_result = t_result.ok_or(KineticsError::EmptySolution)?;
        let y_result = y_result.ok_or(KineticsError::EmptySolution)?;
        let y_result = if y_result.nrows() == t_result.len() {
            y_result
        } else {
            y_result.transpose()
        };
        info!("solver returned {} points", t_result.len());

        let time = grid.points();
        let concentrations = sample_on_grid(&t_result, &y_result, &time, |t, c| {
            mechanism.rates(c, rate_constants, t)
        })?;
        Ok(Trajectory::new(
            *mechanism,
            *rate_constants,
            time,
            concentrations,
        ))
    }
}

/// `integrate` with the default solver configuration (adaptive RK45)
pub fn integrate(
    mechanism: &Mechanism,
    initial: &Concentrations,
    rate_constants: &RateConstants,
    grid: &TimeGrid,
) -> Result<Trajectory, KineticsError> {
    BindingKineticsIVP::default().integrate(mechanism, initial, rate_constants, grid)
}

/// cubic Hermite basis on `[t0, t0 + h]` at `s = (t - t0) / h`
fn hermite(s: f64, h: f64, y0: f64, f0: f64, y1: f64, f1: f64) -> f64 {
    let s2 = s * s;
    let s3 = s2 * s;
    (2.0 * s3 - 3.0 * s2 + 1.0) * y0
        + (s3 - 2.0 * s2 + s) * h * f0
        + (-2.0 * s3 + 3.0 * s2) * y1
        + (s3 - s2) * h * f1
}

/// Cubic Hermite interpolation of the solver output (rows = solver time points)
/// onto `time`. `slope(t, c)` gives the derivative at a solver point.
pub(crate) fn sample_on_grid<F>(
    t_result: &DVector<f64>,
    y_result: &DMatrix<f64>,
    time: &DVector<f64>,
    slope: F,
) -> Result<DMatrix<f64>, KineticsError>
where
    F: Fn(f64, &Concentrations) -> Concentrations,
{
    let n_result = t_result.len();
    let n_species = SPECIES.len();
    if n_result == 0
        || y_result.nrows() != n_result
        || y_result.ncols() < n_species
        || time.is_empty()
    {
        return Err(KineticsError::EmptySolution);
    }
    let t_first = time[0];
    let t_last = time[time.len() - 1];
    let tol = 1e-9 * (t_last - t_first).abs().max(1.0);
    let reached = t_result[n_result - 1];
    if reached < t_last - tol {
        return Err(KineticsError::IncompleteSolution {
            reached,
            requested: t_last,
        });
    }

    let node = |j: usize| -> [f64; 4] {
        [
            y_result[(j, 0)],
            y_result[(j, 1)],
            y_result[(j, 2)],
            y_result[(j, 3)],
        ]
    };
    let slopes: Vec<[f64; 4]> = (0..n_result)
        .map(|j| {
            let [a, b, c, d] = node(j);
            slope(t_result[j], &Concentrations::new(a, b, c, d)).as_array()
        })
        .collect();

    let mut sampled = DMatrix::zeros(time.len(), n_species);
    let mut j = 0;
    for (i, &t) in time.iter().enumerate() {
        while j + 1 < n_result && t_result[j + 1] < t {
            j += 1;
        }
        let values = if j + 1 >= n_result || t <= t_result[j] {
            node(j)
        } else {
            let (t0, t1) = (t_result[j], t_result[j + 1]);
            let h = t1 - t0;
            if h > 0.0 {
                let s = ((t - t0) / h).min(1.0);
                let (y0, y1) = (node(j), node(j + 1));
                let (f0, f1) = (slopes[j], slopes[j + 1]);
                std::array::from_fn(|k| hermite(s, h, y0[k], f0[k], y1[k], f1[k]))
            } else {
                node(j + 1)
            }
        };
        for (s, value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(KineticsError::NonFiniteValue {
                    species: SPECIES[s].to_string(),
                    t,
                });
            }
            sampled[(i, s)] = *value;
        }
    }
    Ok(sampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_time_grid_points() {
        let grid = TimeGrid::new(0.0, 20.0, 2000).unwrap();
        let points = grid.points();
        assert_eq!(points.len(), 2000);
        assert_eq!(points[0], 0.0);
        assert_eq!(points[1999], 20.0);
        assert_relative_eq!(grid.spacing(), 20.0 / 1999.0, epsilon = 1e-15);
        assert!(points.as_slice().windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_time_grid_validation() {
        assert!(matches!(
            TimeGrid::new(0.0, 20.0, 1),
            Err(KineticsError::InvalidTimeGrid(_))
        ));
        assert!(TimeGrid::new(5.0, 5.0, 10).is_err());
        assert!(TimeGrid::new(5.0, 1.0, 10).is_err());
        assert!(TimeGrid::new(0.0, f64::INFINITY, 10).is_err());
        assert!(TimeGrid::new(0.0, 1.0, 2).is_ok());
    }

    #[test]
    fn test_solver_type_from_name() {
        assert!(matches!(
            solver_type_from_name("rk45").unwrap(),
            SolverType::NonStiff(_)
        ));
        assert!(matches!(solver_type_from_name("BDF").unwrap(), SolverType::BDF));
        assert!(matches!(
            solver_type_from_name("Radau").unwrap(),
            SolverType::Radau(_)
        ));
        assert!(matches!(
            solver_type_from_name("BE").unwrap(),
            SolverType::BackwardEuler
        ));
        assert!(matches!(
            solver_type_from_name("Euler"),
            Err(KineticsError::UnknownSolver(_))
        ));
    }

    #[test]
    fn test_new_has_default_params() {
        let ivp = BindingKineticsIVP::default();
        assert!(matches!(ivp.solvertype(), SolverType::NonStiff(_)));
        for key in ["rtol", "atol", "max_step", "max_iterations"] {
            assert!(ivp.solver_params().contains_key(key));
        }
    }

    #[test]
    fn test_set_tolerances() {
        let mut ivp = BindingKineticsIVP::new(SolverType::BDF);
        ivp.set_tolerances(1e-8, 1e-10);
        assert!(matches!(
            ivp.solver_params().get("rtol"),
            Some(SolverParam::Float(v)) if *v == 1e-8
        ));
        assert!(matches!(
            ivp.solver_params().get("atol"),
            Some(SolverParam::Float(v)) if *v == 1e-10
        ));
    }

    fn no_slope(_t: f64, _c: &Concentrations) -> Concentrations {
        Concentrations::default()
    }

    #[test]
    fn test_sample_on_grid_reproduces_cubics() {
        // A = t^3, B = 2 - t, C = t^2, D = 0.5
        let nodes = [0.0, 1.0, 3.0];
        let exact = |t: f64| [t * t * t, 2.0 - t, t * t, 0.5];
        let t_result = DVector::from_vec(nodes.to_vec());
        let rows: Vec<f64> = nodes.iter().flat_map(|&t| exact(t)).collect();
        let y_result = DMatrix::from_row_slice(3, 4, &rows);
        let slope = |t: f64, _c: &Concentrations| Concentrations::new(3.0 * t * t, -1.0, 2.0 * t, 0.0);

        let time = DVector::from_vec(vec![0.0, 0.5, 2.0, 2.7, 3.0]);
        let sampled = sample_on_grid(&t_result, &y_result, &time, slope).unwrap();
        assert_eq!(sampled.nrows(), 5);
        assert_eq!(sampled.ncols(), 4);
        for (i, &t) in time.iter().enumerate() {
            for (s, value) in exact(t).iter().enumerate() {
                assert_relative_eq!(sampled[(i, s)], *value, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_sample_on_grid_keeps_linear_invariants() {
        // node values and slopes both satisfy A + C + D = 1
        let t_result = DVector::from_vec(vec![0.0, 0.4, 1.0]);
        let y_result = DMatrix::from_row_slice(
            3,
            4,
            &[
                1.0, 1.0, 0.0, 0.0, //
                0.5, 0.5, 0.4, 0.1, //
                0.3, 0.3, 0.2, 0.5,
            ],
        );
        let m1 = Mechanism::default();
        let k = RateConstants::new(20.0, 15.0, 2.0);
        let time = DVector::from_vec(vec![0.0, 0.1, 0.25, 0.7, 0.9, 1.0]);
        let sampled =
            sample_on_grid(&t_result, &y_result, &time, |t, c| m1.rates(c, &k, t)).unwrap();
        for i in 0..time.len() {
            let total = sampled[(i, 0)] + sampled[(i, 2)] + sampled[(i, 3)];
            assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sample_on_grid_rejects_short_solution() {
        let t_result = DVector::from_vec(vec![0.0, 1.0]);
        let y_result = DMatrix::from_element(2, 4, 1.0);
        let time = DVector::from_vec(vec![0.0, 1.0, 2.0]);
        let err = sample_on_grid(&t_result, &y_result, &time, no_slope).unwrap_err();
        assert!(matches!(
            err,
            KineticsError::IncompleteSolution { reached, requested } if reached == 1.0 && requested == 2.0
        ));
    }

    #[test]
    fn test_sample_on_grid_rejects_nan() {
        let t_result = DVector::from_vec(vec![0.0, 1.0]);
        let mut y_result = DMatrix::from_element(2, 4, 1.0);
        y_result[(1, 2)] = f64::NAN;
        let time = DVector::from_vec(vec![0.0, 1.0]);
        let err = sample_on_grid(&t_result, &y_result, &time, no_slope).unwrap_err();
        assert!(matches!(err, KineticsError::NonFiniteValue { ref species, .. } if species == "C"));
    }

    #[test]
    fn test_sample_on_grid_empty() {
        let t_result = DVector::<f64>::zeros(0);
        let y_result = DMatrix::<f64>::zeros(0, 4);
        let time = DVector::from_vec(vec![0.0, 1.0]);
        assert!(matches!(
            sample_on_grid(&t_result, &y_result, &time, no_slope),
            Err(KineticsError::EmptySolution)
        ));
    }
}
