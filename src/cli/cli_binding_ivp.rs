//! Terminal session of the binding kinetics tool: holds the settings and the
//! current state, and turns user input into parameter-change events.
use crate::Kinetics::kinetics_errors::KineticsError;
use crate::Kinetics::mechanisms::{Mechanism, RateLaw};
use crate::Kinetics::parameter_loop::{AppState, Control, ParameterChange};
use crate::settings::KineticsSettings;
use log::{error, info};
use std::io::{self, Write};

/// prints `prompt` and reads one trimmed line from stdin
pub fn ask(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Parses an edit of the form `k1=10`, `k-1 = 3.5`, `[A]0=2` or `a0=2`.
pub fn parse_parameter_edit(input: &str) -> Result<(Control, f64), String> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", input))?;
    let name = name.trim().to_lowercase();
    let control = Control::ALL
        .into_iter()
        .find(|c| c.title().to_lowercase() == name)
        .or(match name.as_str() {
            "km1" | "k_minus1" => Some(Control::KMinus1),
            "a0" => Some(Control::A0),
            "b0" => Some(Control::B0),
            _ => None,
        })
        .ok_or_else(|| format!("unknown parameter '{}'", name))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid number '{}'", value.trim()))?;
    Ok((control, value))
}

pub struct CliSession {
    settings: KineticsSettings,
    state: AppState,
}

impl CliSession {
    /// solves the startup problem described by `settings`
    pub fn new(settings: KineticsSettings) -> Result<Self, KineticsError> {
        let state = settings.initial_state()?;
        Ok(Self { settings, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn settings(&self) -> &KineticsSettings {
        &self.settings
    }

    /// applies one `name=value` edit; the state is kept when the solve fails
    pub fn edit_parameter(&mut self, input: &str) -> Result<(), String> {
        let (control, value) = parse_parameter_edit(input)?;
        let mut parameters = *self.state.parameters();
        parameters.set(control, value);
        let state = self
            .state
            .apply(ParameterChange::from(parameters))
            .map_err(|e| e.to_string())?;
        self.settings.parameters = *state.parameters();
        self.state = state;
        Ok(())
    }

    pub fn choose_mechanism(&mut self, code: &str) -> Result<(), String> {
        let mechanism = Mechanism::from_code(code).map_err(|e| e.to_string())?;
        let state = self
            .state
            .switch_mechanism(mechanism)
            .map_err(|e| e.to_string())?;
        self.settings.mechanism = mechanism.code().to_string();
        self.state = state;
        Ok(())
    }

    /// Changes the solver for later solves and recomputes on the update grid.
    pub fn choose_solver(&mut self, name: &str) -> Result<(), String> {
        let mut settings = self.settings.clone();
        settings.solver = name.to_string();
        let solver = settings.solver().map_err(|e| e.to_string())?;
        let state = self.state.switch_solver(solver).map_err(|e| e.to_string())?;
        self.settings = settings;
        self.state = state;
        Ok(())
    }

    pub fn save_csv(&self, path: &str) -> Result<(), String> {
        self.state
            .trajectory()
            .save_to_csv(path)
            .map_err(|e| e.to_string())
    }

    pub fn save_settings(&self, path: &str) -> Result<(), String> {
        self.settings.save(path).map_err(|e| e.to_string())
    }
}

pub fn edit_parameters_menu(session: &mut CliSession) -> io::Result<()> {
    loop {
        println!("\nCurrent parameters: {}", session.state().parameters());
        for control in Control::ALL {
            let r = control.range();
            println!("  {:>5} in [{}, {}], step {}", r.title, r.min, r.max, r.step);
        }
        let input = ask("Enter name=value (empty line to return): ")?;
        if input.is_empty() {
            return Ok(());
        }
        match session.edit_parameter(&input) {
            Ok(()) => {
                info!("recomputed with {}", session.state().parameters());
                session.state().trajectory().print_summary(10);
            }
            Err(e) => {
                error!("{}", e);
                println!("Error: {}", e);
            }
        }
    }
}

pub fn choose_mechanism_menu(session: &mut CliSession) -> io::Result<()> {
    Mechanism::pretty_print();
    let code = ask("Enter mechanism code (M1, M2): ")?;
    if let Err(e) = session.choose_mechanism(&code) {
        println!("Error: {}", e);
    }
    Ok(())
}

pub fn choose_solver_menu(session: &mut CliSession) -> io::Result<()> {
    println!("\nChoose solver type:");
    println!("1. RK45 (non-stiff problems)");
    println!("2. BDF (stiff problems)");
    println!("3. Radau (high accuracy)");
    println!("4. Backward Euler (simple implicit)");
    let name = match ask("Enter choice (1-4): ")?.as_str() {
        "1" => "RK45",
        "2" => "BDF",
        "3" => "Radau",
        "4" => "BE",
        _ => {
            println!("Invalid solver choice");
            return Ok(());
        }
    };
    println!("Solving...");
    if let Err(e) = session.choose_solver(name) {
        println!("Error: {}", e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use RustedSciThe::numerical::ODE_api2::SolverType;
    use tempfile::tempdir;

    fn session() -> CliSession {
        let mut settings = KineticsSettings::default();
        settings.initial_points = 200;
        settings.update_points = 100;
        CliSession::new(settings).unwrap()
    }

    #[test]
    fn test_parse_parameter_edit() {
        assert_eq!(parse_parameter_edit("k1=10"), Ok((Control::K1, 10.0)));
        assert_eq!(parse_parameter_edit("k-1 = 3.5"), Ok((Control::KMinus1, 3.5)));
        assert_eq!(parse_parameter_edit("K2=0.5"), Ok((Control::K2, 0.5)));
        assert_eq!(parse_parameter_edit("[A]0=2"), Ok((Control::A0, 2.0)));
        assert_eq!(parse_parameter_edit("b0= 1.5"), Ok((Control::B0, 1.5)));
        assert!(parse_parameter_edit("k3=1").is_err());
        assert!(parse_parameter_edit("k1").is_err());
        assert!(parse_parameter_edit("k1=fast").is_err());
    }

    #[test]
    fn test_edit_parameter_recomputes() {
        let mut s = session();
        assert_eq!(s.state().trajectory().len(), 200);
        s.edit_parameter("k2=4").unwrap();
        assert_eq!(s.state().parameters().k2, 4.0);
        assert_eq!(s.state().trajectory().len(), 100);
        assert_eq!(s.settings().parameters.k2, 4.0);
        assert!(s.edit_parameter("k9=4").is_err());
        assert_eq!(s.state().parameters().k2, 4.0);
    }

    #[test]
    fn test_choose_mechanism_and_solver() {
        let mut s = session();
        s.choose_mechanism("m2").unwrap();
        assert_eq!(s.state().mechanism().code(), "M2");
        assert_eq!(s.settings().mechanism, "M2");
        assert!(s.choose_mechanism("M7").is_err());
        assert!(s.choose_solver("Euler").is_err());
        assert_eq!(s.settings().solver, "RK45");
    }

    #[test]
    fn test_choose_solver_recomputes_on_update_grid() {
        let mut s = session();
        s.edit_parameter("k1=10").unwrap();
        s.choose_solver("BDF").unwrap();
        assert_eq!(s.settings().solver, "BDF");
        assert!(matches!(
            s.state().solver().solvertype(),
            SolverType::BDF
        ));
        assert_eq!(s.state().trajectory().len(), 100);
        assert_eq!(s.state().parameters().k1, 10.0);
        let first = s.state().trajectory().initial();
        assert!((first.a - 1.0).abs() < 1e-12 && (first.b - 1.0).abs() < 1e-12);
        // later edits keep the chosen solver
        s.edit_parameter("k2=3").unwrap();
        assert!(matches!(
            s.state().solver().solvertype(),
            SolverType::BDF
        ));
    }

    #[test]
    fn test_session_files() {
        let dir = tempdir().unwrap();
        let s = session();
        let csv = dir.path().join("out.csv");
        s.save_csv(csv.to_str().unwrap()).unwrap();
        assert!(csv.exists());
        let cfg = dir.path().join("kinetics_config.json");
        s.save_settings(cfg.to_str().unwrap()).unwrap();
        let loaded = KineticsSettings::load(&cfg).unwrap();
        assert_eq!(&loaded, s.settings());
    }
}
