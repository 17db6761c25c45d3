/// eng
/// Rate laws of the teaching mechanisms.
///
///  A + B <=> C, C -> D (mechanism 1) and A + B <=> C, C -> A + D (mechanism 2).
/// Both are available as numeric functions and as symbolic expressions for the ODE solver.
///
///  # Examples
/// ```
/// use BindKinetics::Kinetics::mechanisms::{Concentrations, Mechanism, RateConstants, RateLaw};
/// let c = Concentrations::new(1.0, 1.0, 0.0, 0.0);
/// let k = RateConstants::new(20.0, 15.0, 2.0);
/// let r = Mechanism::default().rates(&c, &k, 0.0);
/// assert_eq!(r.a, -20.0);
/// assert_eq!(r.d, 0.0);
/// ```
pub mod mechanisms;
/// Initial value problem for the binding mechanisms: time grid, solver configuration and
/// the integrate operation (RustedSciThe adaptive solvers)
#[allow(non_snake_case)]
pub mod binding_kinetics_IVP;
/// immutable result of one integration run
pub mod trajectory;
/// interactive controls, parameter-change events and the published application state
pub mod parameter_loop;
pub mod kinetics_errors;
