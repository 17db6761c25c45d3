use BindKinetics::Utils::logger::init_logger;
use BindKinetics::cli::cli_main::run_interactive_menu;
use BindKinetics::gui::gui_main::gui_main;
use BindKinetics::settings::{DEFAULT_CONFIG_FILE, KineticsSettings};
use log::{error, info};
use std::env;

pub fn main() {
    let settings = match KineticsSettings::load(DEFAULT_CONFIG_FILE) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("cannot read {}: {}, using defaults", DEFAULT_CONFIG_FILE, e);
            KineticsSettings::default()
        }
    };
    if let Err(e) = init_logger(settings.level_filter(), settings.log_file.as_deref()) {
        eprintln!("logger not initialized: {}", e);
    }
    info!("starting with {:?}", settings);

    // `--gui` opens the slider window directly
    if env::args().any(|a| a == "--gui") {
        match settings.initial_state() {
            Ok(state) => {
                if let Err(e) = gui_main(state) {
                    error!("GUI error: {}", e);
                }
            }
            Err(e) => error!("startup solve failed: {}", e),
        }
        return;
    }
    if let Err(e) = run_interactive_menu(settings) {
        error!("terminal error: {}", e);
    }
}
