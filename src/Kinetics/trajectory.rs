//! Result of one integration run: the time grid and the concentrations of A, B, C, D
//! at every grid point. A trajectory is never modified after creation, a parameter
//! change produces a new one.
use crate::Kinetics::kinetics_errors::KineticsError;
use crate::Kinetics::mechanisms::{Concentrations, Mechanism, RateConstants, RateLaw, SPECIES};
use RustedSciThe::Utils::plots::plots_terminal;
use log::info;
use nalgebra::{DMatrix, DVector};
use prettytable::{Table, row};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// mechanism the trajectory was computed with
    mechanism: Mechanism,
    /// rate constants the trajectory was computed with
    rate_constants: RateConstants,
    /// time grid
    time: DVector<f64>,
    /// one row per time point, columns A, B, C, D
    concentrations: DMatrix<f64>,
}

impl Trajectory {
    pub fn new(
        mechanism: Mechanism,
        rate_constants: RateConstants,
        time: DVector<f64>,
        concentrations: DMatrix<f64>,
    ) -> Self {
        Self {
            mechanism,
            rate_constants,
            time,
            concentrations,
        }
    }

    pub fn mechanism(&self) -> &Mechanism {
        &self.mechanism
    }

    pub fn rate_constants(&self) -> &RateConstants {
        &self.rate_constants
    }

    pub fn time(&self) -> &DVector<f64> {
        &self.time
    }

    pub fn concentrations(&self) -> &DMatrix<f64> {
        &self.concentrations
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// time course of one species (0 = A, 1 = B, 2 = C, 3 = D)
    pub fn species(&self, index: usize) -> Vec<f64> {
        self.concentrations.column(index).iter().cloned().collect()
    }

    /// time course of a species by name ("A", "B", "C" or "D")
    pub fn species_by_name(&self, name: &str) -> Option<Vec<f64>> {
        SPECIES
            .iter()
            .position(|s| *s == name)
            .map(|i| self.species(i))
    }

    /// `[t, value]` pairs of one species, ready for plotting
    pub fn series(&self, index: usize) -> Vec<[f64; 2]> {
        self.time
            .iter()
            .zip(self.concentrations.column(index).iter())
            .map(|(&t, &y)| [t, y])
            .collect()
    }

    pub fn at(&self, i: usize) -> Concentrations {
        let row = self.concentrations.row(i);
        Concentrations::new(row[0], row[1], row[2], row[3])
    }

    pub fn initial(&self) -> Concentrations {
        self.at(0)
    }

    pub fn last(&self) -> Concentrations {
        self.at(self.len() - 1)
    }

    /// instantaneous rates at grid point `i`, evaluated with the stored mechanism
    pub fn rates_at(&self, i: usize) -> Concentrations {
        self.mechanism
            .rates(&self.at(i), &self.rate_constants, self.time[i])
    }

    /// Largest deviation of A+C+D and B+C+D from their values at the first grid point.
    ///
    /// Both sums are invariants of mechanism 1. In mechanism 2 only B+C+D is conserved.
    pub fn mass_balance_drift(&self) -> (f64, f64) {
        let first = self.initial();
        let a_total = first.a + first.c + first.d;
        let b_total = first.b + first.c + first.d;
        let mut drift = (0.0_f64, 0.0_f64);
        for i in 0..self.len() {
            let c = self.at(i);
            drift.0 = drift.0.max((c.a + c.c + c.d - a_total).abs());
            drift.1 = drift.1.max((c.b + c.c + c.d - b_total).abs());
        }
        drift
    }

    /// index and value of the maximum of C
    pub fn peak_of_intermediate(&self) -> (usize, f64) {
        self.concentrations
            .column(2)
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |acc, (i, &c)| {
                if c > acc.1 { (i, c) } else { acc }
            })
    }

    /// prints about `n_rows` evenly spread rows of the trajectory
    pub fn print_summary(&self, n_rows: usize) {
        let mut table = Table::new();
        table.add_row(row!["t, s", "A, M", "B, M", "C, M", "D, M"]);
        let step = (self.len() / n_rows.max(1)).max(1);
        let mut indices: Vec<usize> = (0..self.len()).step_by(step).collect();
        if indices.last() != Some(&(self.len() - 1)) {
            indices.push(self.len() - 1);
        }
        for i in indices {
            let c = self.at(i);
            table.add_row(row![
                format!("{:.3}", self.time[i]),
                format!("{:.5}", c.a),
                format!("{:.5}", c.b),
                format!("{:.5}", c.c),
                format!("{:.5}", c.d)
            ]);
        }
        println!("{} with k = {:?}", self.mechanism.label(), self.rate_constants);
        table.printstd();
        let (drift_a, drift_b) = self.mass_balance_drift();
        println!(
            "max drift of A+C+D: {:.3e}, of B+C+D: {:.3e}",
            drift_a, drift_b
        );
    }

    pub fn plot_in_terminal(&self) {
        plots_terminal(
            "t".to_string(),
            SPECIES.iter().map(|s| s.to_string()).collect(),
            self.time.clone(),
            self.concentrations.clone(),
        )
    }

    /// writes `t,A,B,C,D` rows to a csv file
    pub fn save_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), KineticsError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "t,{}", SPECIES.join(","))?;
        for i in 0..self.len() {
            let row: Vec<String> = self
                .concentrations
                .row(i)
                .iter()
                .map(|v| v.to_string())
                .collect();
            writeln!(writer, "{},{}", self.time[i], row.join(","))?;
        }
        writer.flush()?;
        info!("trajectory saved to {}", path.as_ref().display());
        Ok(())
    }
}
