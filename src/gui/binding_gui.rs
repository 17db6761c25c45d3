//! # Binding Kinetics GUI
//!
//! Slider panel on the left, concentration chart in the center.
//!
//! Every slider move produces a parameter-change event carrying all five values.
//! The event is solved into a new [`AppState`] which replaces the displayed one;
//! a failed solve keeps the previous chart and shows the error under the sliders.
use crate::Kinetics::kinetics_errors::KineticsError;
use crate::Kinetics::mechanisms::{Mechanism, RateLaw};
use crate::Kinetics::parameter_loop::{AppState, Control, ParameterChange, ParameterSet};
use crate::gui::gui_plot::ConcentrationPlot;
use eframe::egui;
use log::error;
use strum::IntoEnumIterator;

pub struct BindingApp {
    /// state currently on display
    state: AppState,
    /// slider values, may be ahead of `state` while a solve fails
    controls: ParameterSet,
    /// mechanism chosen in the combo box
    selected_mechanism: Mechanism,
    last_error: Option<String>,
    plot: ConcentrationPlot,
}

impl BindingApp {
    pub fn new(state: AppState) -> Self {
        Self {
            controls: *state.parameters(),
            selected_mechanism: *state.mechanism(),
            state,
            last_error: None,
            plot: ConcentrationPlot::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// solves the current slider values and swaps the state in
    pub fn on_parameters_changed(&mut self) {
        let change = ParameterChange::from(self.controls);
        let result = self.state.apply(change);
        self.replace_state(result);
    }

    pub fn on_mechanism_changed(&mut self) {
        let result = self.state.switch_mechanism(self.selected_mechanism);
        self.replace_state(result);
    }

    fn replace_state(&mut self, result: Result<AppState, KineticsError>) {
        match result {
            Ok(state) => {
                self.controls = *state.parameters();
                self.state = state;
                self.last_error = None;
            }
            Err(e) => {
                error!("recompute failed, keeping previous result: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn controls_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Parameters");
        ui.separator();
        let mut changed = false;
        for control in Control::ALL {
            let range = control.range();
            let mut value = self.controls.get(control);
            let response = ui.add(
                egui::Slider::new(&mut value, range.min..=range.max)
                    .step_by(range.step)
                    .text(range.title),
            );
            if response.changed() {
                self.controls.set(control, value);
                changed = true;
            }
        }
        if changed {
            self.on_parameters_changed();
        }

        ui.add_space(10.0);
        let before = self.selected_mechanism;
        egui::ComboBox::from_label("Mechanism")
            .selected_text(self.selected_mechanism.label())
            .show_ui(ui, |ui| {
                for m in Mechanism::iter() {
                    ui.selectable_value(&mut self.selected_mechanism, m, m.label());
                }
            });
        if self.selected_mechanism != before {
            self.on_mechanism_changed();
        }
        ui.label(self.state.mechanism().scheme());

        if let Some(message) = &self.last_error {
            ui.add_space(10.0);
            ui.colored_label(egui::Color32::RED, message);
        }
    }
}

impl eframe::App for BindingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls")
            .resizable(false)
            .min_width(260.0)
            .show(ctx, |ui| {
                self.controls_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.plot.show(ui, self.state.trajectory());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::binding_kinetics_IVP::{BindingKineticsIVP, TimeGrid};
    use crate::Kinetics::mechanisms::{BindingConversion, BindingRegeneration};

    fn app() -> BindingApp {
        let grid = TimeGrid::new(0.0, 20.0, 200).unwrap();
        let state = AppState::new(
            Mechanism::BindingConversion(BindingConversion),
            ParameterSet::default(),
            BindingKineticsIVP::default(),
            &grid,
            TimeGrid::new(0.0, 20.0, 100).unwrap(),
        )
        .unwrap();
        BindingApp::new(state)
    }

    #[test]
    fn test_new_app_mirrors_state() {
        let app = app();
        assert_eq!(app.controls, ParameterSet::default());
        assert_eq!(app.selected_mechanism, *app.state().mechanism());
        assert!(app.last_error().is_none());
        assert_eq!(app.state().trajectory().len(), 200);
    }

    #[test]
    fn test_slider_change_replaces_state() {
        let mut app = app();
        app.controls.set(Control::K2, 5.0);
        app.on_parameters_changed();
        assert_eq!(app.state().parameters().k2, 5.0);
        assert_eq!(app.state().trajectory().len(), 100);
        assert_eq!(app.state().trajectory().rate_constants().k2, 5.0);
        assert!(app.last_error().is_none());
    }

    #[test]
    fn test_mechanism_change_replaces_state() {
        let mut app = app();
        let m2 = Mechanism::BindingRegeneration(BindingRegeneration);
        app.selected_mechanism = m2;
        app.on_mechanism_changed();
        assert_eq!(app.state().mechanism(), &m2);
        assert_eq!(app.state().trajectory().mechanism(), &m2);
    }

    #[test]
    fn test_failed_solve_keeps_previous_state() {
        let mut app = app();
        let before = app.state().trajectory().clone();
        app.replace_state(Err(KineticsError::EmptySolution));
        assert_eq!(app.state().trajectory(), &before);
        assert!(app.last_error().is_some());
    }
}
