//! Logging setup: `simplelog` terminal logger, optionally combined with a file logger.
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;

/// Initializes the global logger.
///
/// # Arguments
/// * `level` - level of the terminal logger
/// * `log_file` - when given, everything down to `Debug` is also written to this file
///
/// # Returns
/// * `Err` if the log file cannot be created or a logger was already set
pub fn init_logger(
    level: LevelFilter,
    log_file: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(
            LevelFilter::Debug,
            Config::default(),
            File::create(path)?,
        ));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logger_can_be_set_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kinetics.log");
        let first = init_logger(LevelFilter::Warn, path.to_str());
        assert!(first.is_ok());
        assert!(path.exists());
        log::debug!("written to the file only");
        // a second global logger is refused
        assert!(init_logger(LevelFilter::Warn, None).is_err());
    }
}
