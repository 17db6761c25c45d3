//! # Binding Mechanisms
//!
//! Rate laws of the two teaching mechanisms built from the elementary steps
//!
//! ```text
//! A + B <=> C    (k1 forward, k-1 backward)
//! C -> D         (k2)
//! ```
//!
//! ## Main Components
//! - [`Concentrations`]: dynamic part of the state (A, B, C, D)
//! - [`RateConstants`]: static part of the state (k1, k-1, k2)
//! - [`RateLaw`]: trait implemented by every mechanism
//! - [`Mechanism`]: closed set of mechanisms, dispatched with `enum_dispatch`
//!
//! Every mechanism gives its right-hand side twice: as a plain numeric function
//! ([`RateLaw::rates`]) and as symbolic expressions ([`RateLaw::rate_expressions`])
//! that are handed to the RustedSciThe ODE solver.
//!
//! ## Packed state
//! The classic formulation packs everything into one vector of 7 values
//! `[A, B, C, D, k1, k-1, k2]` whose trailing three derivatives are zero.
//! [`pack_state`] and [`RateLaw::packed_rates`] keep that form available.
//!
//! # Examples
//! ```rust, ignore
//! use BindKinetics::Kinetics::mechanisms::*;
//! let c = Concentrations::new(1.0, 1.0, 0.0, 0.0);
//! let k = RateConstants::new(20.0, 15.0, 2.0);
//! let dcdt = Mechanism::BindingConversion(BindingConversion).rates(&c, &k, 0.0);
//! assert_eq!(dcdt.a, -20.0);
//! ```
use crate::Kinetics::kinetics_errors::KineticsError;
use RustedSciThe::symbolic::symbolic_engine::Expr;
use enum_dispatch::enum_dispatch;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use tabled::{Table, Tabled};

/// names of the species, also used as names of unknowns in the solver
pub const SPECIES: [&str; 4] = ["A", "B", "C", "D"];
/// length of the packed state vector: 4 concentrations + 3 rate constants
pub const PACKED_LEN: usize = 7;

/// concentrations of A, B, C, D [M]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Concentrations {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Concentrations {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    pub fn to_dvector(&self) -> DVector<f64> {
        DVector::from_row_slice(&self.as_array())
    }
}

/// rate constants of the elementary steps
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateConstants {
    /// A + B -> C [1/(M*s)]
    pub k1: f64,
    /// C -> A + B [1/s]
    pub k_minus1: f64,
    /// C -> D [1/s]
    pub k2: f64,
}

impl RateConstants {
    pub fn new(k1: f64, k_minus1: f64, k2: f64) -> Self {
        Self { k1, k_minus1, k2 }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.k1, self.k_minus1, self.k2]
    }
}

/// concatenates concentrations and rate constants into `[A, B, C, D, k1, k-1, k2]`
pub fn pack_state(c: &Concentrations, k: &RateConstants) -> DVector<f64> {
    let mut packed = Vec::with_capacity(PACKED_LEN);
    packed.extend_from_slice(&c.as_array());
    packed.extend_from_slice(&k.as_array());
    DVector::from_vec(packed)
}

/// splits the packed vector back; `None` if it is not of length 7
pub fn unpack_state(y: &DVector<f64>) -> Option<(Concentrations, RateConstants)> {
    if y.len() != PACKED_LEN {
        return None;
    }
    let c = Concentrations::new(y[0], y[1], y[2], y[3]);
    let k = RateConstants::new(y[4], y[5], y[6]);
    Some((c, k))
}

#[enum_dispatch]
pub trait RateLaw {
    /// short code used in settings and menus
    fn code(&self) -> &'static str;
    /// reaction scheme in text form
    fn scheme(&self) -> &'static str;
    /// human readable right-hand sides in the order A, B, C, D
    fn formulas(&self) -> [&'static str; 4];
    /// instantaneous derivative. `t` is accepted but the mechanism is autonomous.
    fn rates(&self, c: &Concentrations, k: &RateConstants, t: f64) -> Concentrations;
    /// the same right-hand side as symbolic expressions in the unknowns A, B, C, D
    fn rate_expressions(&self, k: &RateConstants) -> Vec<Expr>;

    /// Derivative of the packed state; the rate constant slots are always zero.
    /// `None` if `y` is not of length [`PACKED_LEN`].
    fn packed_rates(&self, y: &DVector<f64>, t: f64) -> Option<DVector<f64>> {
        let (c, k) = unpack_state(y)?;
        let mut dydt = DVector::zeros(PACKED_LEN);
        for (i, rate) in self.rates(&c, &k, t).as_array().iter().enumerate() {
            dydt[i] = *rate;
        }
        Some(dydt)
    }
}

/// net rate of the reversible binding step: -k1*A*B + k-1*C
fn binding_rate(c: &Concentrations, k: &RateConstants) -> f64 {
    -k.k1 * c.a * c.b + k.k_minus1 * c.c
}

fn species_vars() -> (Expr, Expr, Expr) {
    (
        Expr::Var("A".to_owned()),
        Expr::Var("B".to_owned()),
        Expr::Var("C".to_owned()),
    )
}

fn binding_expr(k: &RateConstants) -> Expr {
    let (a, b, c) = species_vars();
    -Expr::Const(k.k1) * a * b + Expr::Const(k.k_minus1) * c
}

/// Mechanism 1: A + B <=> C, C -> D
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BindingConversion;

impl RateLaw for BindingConversion {
    fn code(&self) -> &'static str {
        "M1"
    }

    fn scheme(&self) -> &'static str {
        "A + B <=> C, C -> D"
    }

    fn formulas(&self) -> [&'static str; 4] {
        [
            "-k1*A*B + k-1*C",
            "-k1*A*B + k-1*C",
            "k1*A*B - k-1*C - k2*C",
            "k2*C",
        ]
    }

    fn rates(&self, c: &Concentrations, k: &RateConstants, _t: f64) -> Concentrations {
        let da = binding_rate(c, k);
        let db = da;
        let dc = -da - k.k2 * c.c;
        let dd = k.k2 * c.c;
        Concentrations::new(da, db, dc, dd)
    }

    fn rate_expressions(&self, k: &RateConstants) -> Vec<Expr> {
        let c = Expr::Var("C".to_owned());
        let k2 = Expr::Const(k.k2);
        let da = binding_expr(k);
        let db = da.clone();
        let dc = -da.clone() - k2.clone() * c.clone();
        let dd = k2 * c;
        vec![da, db, dc, dd]
    }
}

/// Mechanism 2: the C -> D step also gives back A
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BindingRegeneration;

impl RateLaw for BindingRegeneration {
    fn code(&self) -> &'static str {
        "M2"
    }

    fn scheme(&self) -> &'static str {
        "A + B <=> C, C -> A + D"
    }

    fn formulas(&self) -> [&'static str; 4] {
        [
            "-k1*A*B + k-1*C + k2*C",
            "-k1*A*B + k-1*C",
            "k1*A*B - k-1*C - k2*C",
            "k2*C",
        ]
    }

    fn rates(&self, c: &Concentrations, k: &RateConstants, _t: f64) -> Concentrations {
        let db = binding_rate(c, k);
        let da = db + k.k2 * c.c;
        let dc = -db - k.k2 * c.c;
        let dd = k.k2 * c.c;
        Concentrations::new(da, db, dc, dd)
    }

    fn rate_expressions(&self, k: &RateConstants) -> Vec<Expr> {
        let c = Expr::Var("C".to_owned());
        let k2 = Expr::Const(k.k2);
        let db = binding_expr(k);
        let da = db.clone() + k2.clone() * c.clone();
        let dc = -db.clone() - k2.clone() * c.clone();
        let dd = k2 * c;
        vec![da, db, dc, dd]
    }
}

/// closed set of available mechanisms
#[derive(Debug, Clone, Copy, PartialEq, EnumIter)]
#[enum_dispatch(RateLaw)]
pub enum Mechanism {
    BindingConversion(BindingConversion),
    BindingRegeneration(BindingRegeneration),
}

impl Default for Mechanism {
    fn default() -> Self {
        Mechanism::BindingConversion(BindingConversion)
    }
}

impl Mechanism {
    pub fn from_code(code: &str) -> Result<Self, KineticsError> {
        let code = code.trim().to_uppercase();
        Mechanism::iter()
            .find(|m| m.code() == code)
            .ok_or(KineticsError::UnknownMechanism(code))
    }

    pub fn label(&self) -> String {
        format!("{}: {}", self.code(), self.scheme())
    }

    pub fn pretty_print() {
        #[derive(Tabled)]
        struct MechanismRow {
            code: String,
            scheme: String,
            species: String,
            rate: String,
        }

        let mut data: Vec<MechanismRow> = Vec::new();
        for mechanism in Mechanism::iter() {
            for (species, formula) in SPECIES.iter().zip(mechanism.formulas()) {
                data.push(MechanismRow {
                    code: mechanism.code().to_string(),
                    scheme: mechanism.scheme().to_string(),
                    species: format!("d{}/dt", species),
                    rate: formula.to_string(),
                });
            }
        }

        let mut binding = Table::new(data);
        let table = binding.with(tabled::settings::Style::rounded());
        println!("{}", table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn m1() -> Mechanism {
        Mechanism::BindingConversion(BindingConversion)
    }

    fn m2() -> Mechanism {
        Mechanism::BindingRegeneration(BindingRegeneration)
    }

    #[test]
    fn test_mechanism1_rates() {
        let c = Concentrations::new(1.0, 0.5, 0.2, 0.1);
        let k = RateConstants::new(20.0, 15.0, 2.0);
        let r = m1().rates(&c, &k, 0.0);
        // -20*1*0.5 + 15*0.2 = -7
        assert_relative_eq!(r.a, -7.0, epsilon = 1e-12);
        assert_relative_eq!(r.b, -7.0, epsilon = 1e-12);
        assert_relative_eq!(r.c, 7.0 - 0.4, epsilon = 1e-12);
        assert_relative_eq!(r.d, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_mechanism2_rates() {
        let c = Concentrations::new(1.0, 0.5, 0.2, 0.1);
        let k = RateConstants::new(20.0, 15.0, 2.0);
        let r = m2().rates(&c, &k, 0.0);
        assert_relative_eq!(r.a, -7.0 + 0.4, epsilon = 1e-12);
        assert_relative_eq!(r.b, -7.0, epsilon = 1e-12);
        assert_relative_eq!(r.c, 7.0 - 0.4, epsilon = 1e-12);
        assert_relative_eq!(r.d, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_mass_balance_of_rates() {
        let c = Concentrations::new(0.7, 1.3, 0.4, 0.25);
        let k = RateConstants::new(3.0, 1.5, 0.8);
        let r = m1().rates(&c, &k, 0.0);
        assert_relative_eq!(r.a + r.c + r.d, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.b + r.c + r.d, 0.0, epsilon = 1e-12);
        // in mechanism 2 A is regenerated, only B is balanced against C and D
        let r = m2().rates(&c, &k, 0.0);
        assert_relative_eq!(r.b + r.c + r.d, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.a + r.c, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rates_do_not_depend_on_time() {
        let c = Concentrations::new(1.0, 2.0, 0.3, 0.0);
        let k = RateConstants::new(5.0, 1.0, 0.5);
        for mechanism in Mechanism::iter() {
            assert_eq!(
                mechanism.rates(&c, &k, 0.0),
                mechanism.rates(&c, &k, 123.4)
            );
        }
    }

    #[test]
    fn test_negative_inputs_are_not_rejected() {
        let c = Concentrations::new(-1.0, 1.0, 0.0, 0.0);
        let k = RateConstants::new(-2.0, 0.0, 1.0);
        let r = m1().rates(&c, &k, 0.0);
        // -(-2)*(-1)*1 = -2
        assert_relative_eq!(r.a, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_packed_rates_keep_constants_fixed() {
        let c = Concentrations::new(1.0, 1.0, 0.0, 0.0);
        let k = RateConstants::new(20.0, 15.0, 2.0);
        let y = pack_state(&c, &k);
        assert_eq!(y.len(), PACKED_LEN);
        assert_eq!(y.as_slice(), &[1.0, 1.0, 0.0, 0.0, 20.0, 15.0, 2.0]);
        for mechanism in Mechanism::iter() {
            let dydt = mechanism.packed_rates(&y, 0.0).unwrap();
            assert_eq!(dydt.len(), PACKED_LEN);
            assert_eq!(&dydt.as_slice()[4..], &[0.0, 0.0, 0.0]);
            let r = mechanism.rates(&c, &k, 0.0);
            assert_eq!(&dydt.as_slice()[..4], &r.as_array());
        }
    }

    #[test]
    fn test_packed_rates_reject_wrong_length() {
        let short = DVector::from_vec(vec![1.0, 1.0, 0.0, 0.0]);
        let long = DVector::from_vec(vec![1.0; PACKED_LEN + 1]);
        for mechanism in Mechanism::iter() {
            assert!(mechanism.packed_rates(&short, 0.0).is_none());
            assert!(mechanism.packed_rates(&long, 0.0).is_none());
        }
    }

    #[test]
    fn test_unpack_state() {
        let y = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let (c, k) = unpack_state(&y).unwrap();
        assert_eq!(c, Concentrations::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(k, RateConstants::new(5.0, 6.0, 7.0));
        assert!(unpack_state(&DVector::from_vec(vec![1.0, 2.0])).is_none());
    }

    #[test]
    fn test_rate_expressions_use_species_names() {
        let k = RateConstants::new(20.0, 15.0, 2.0);
        for mechanism in Mechanism::iter() {
            let exprs = mechanism.rate_expressions(&k);
            assert_eq!(exprs.len(), 4);
            let da = format!("{:?}", exprs[0]);
            assert!(da.contains("Var(\"A\")"));
            assert!(da.contains("Var(\"B\")"));
            assert!(da.contains("Const(20.0)"));
            let dd = format!("{:?}", exprs[3]);
            assert!(dd.contains("Var(\"C\")"));
            assert!(dd.contains("Const(2.0)"));
        }
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Mechanism::from_code("M1").unwrap(), m1());
        assert_eq!(Mechanism::from_code(" m2 ").unwrap(), m2());
        let err = Mechanism::from_code("M3").unwrap_err();
        assert!(matches!(err, KineticsError::UnknownMechanism(ref code) if code == "M3"));
        assert_eq!(Mechanism::default(), m1());
    }

    #[test]
    fn test_pretty_print_lists_all_mechanisms() {
        assert_eq!(Mechanism::iter().count(), 2);
        Mechanism::pretty_print();
    }
}
