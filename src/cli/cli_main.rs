use super::cli_binding_ivp::{
    CliSession, ask, choose_mechanism_menu, choose_solver_menu, edit_parameters_menu,
};
use crate::Kinetics::mechanisms::Mechanism;
use crate::gui::gui_main::gui_main;
use crate::settings::{DEFAULT_CONFIG_FILE, KineticsSettings};
use log::error;
use std::io;

pub fn run_interactive_menu(settings: KineticsSettings) -> io::Result<()> {
    println!("Solving the startup problem...");
    let mut session = match CliSession::new(settings) {
        Ok(session) => session,
        Err(e) => {
            error!("startup solve failed: {}", e);
            println!("Error: {}", e);
            return Ok(());
        }
    };
    loop {
        show_main_menu();
        let choice = ask("\x1b[36mEnter your choice: \x1b[0m")?;

        match choice.as_str() {
            "1" => session.state().trajectory().print_summary(20),
            "2" => edit_parameters_menu(&mut session)?,
            "3" => choose_mechanism_menu(&mut session)?,
            "4" => choose_solver_menu(&mut session)?,
            "5" => Mechanism::pretty_print(),
            "6" => session.state().trajectory().plot_in_terminal(),
            "7" => {
                let path = ask("CSV file name (default trajectory.csv): ")?;
                let path = if path.is_empty() {
                    "trajectory.csv".to_string()
                } else {
                    path
                };
                if let Err(e) = session.save_csv(&path) {
                    println!("Error: {}", e);
                }
            }
            "8" => {
                if let Err(e) = gui_main(session.state().clone()) {
                    error!("GUI error: {}", e);
                }
            }
            "9" => {
                if let Err(e) = session.save_settings(DEFAULT_CONFIG_FILE) {
                    println!("Error: {}", e);
                }
            }
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
    Ok(())
}
/* colors
Blue (\x1b[34m) - header
Yellow (\x1b[33m) - menu options
Cyan (\x1b[36m) - prompt
Reset (\x1b[0m)
*/
fn show_main_menu() {
    println!("\x1b[34m\n Binding kinetics: A + B <=> C followed by conversion of C \n \x1b[0m");
    println!("\x1b[33m1. Show current solution\x1b[0m");
    println!("\x1b[33m2. Edit parameters\x1b[0m");
    println!("\x1b[33m3. Choose mechanism\x1b[0m");
    println!("\x1b[33m4. Choose solver\x1b[0m");
    println!("\x1b[33m5. Mechanism table\x1b[0m");
    println!("\x1b[33m6. Plot in terminal\x1b[0m");
    println!("\x1b[33m7. Save solution to CSV\x1b[0m");
    println!("\x1b[33m8. GUI\x1b[0m");
    println!("\x1b[33m9. Save settings\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
}
