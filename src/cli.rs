pub mod cli_binding_ivp;
pub mod cli_main;
