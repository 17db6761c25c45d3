use crate::Kinetics::parameter_loop::AppState;
use crate::gui::binding_gui::BindingApp;
use eframe::egui;

/// opens the slider window on an already solved startup state
pub fn gui_main(state: AppState) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 600.0])
            .with_title("Binding kinetics"),
        ..Default::default()
    };
    eframe::run_native(
        "Binding kinetics",
        options,
        Box::new(move |_cc: &eframe::CreationContext<'_>| Ok(Box::new(BindingApp::new(state)))),
    )
}
