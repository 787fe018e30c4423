use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;

/// Sets up the global logger: terminal output always, plus a log file when `log_file` is given.
/// Returns false if a logger was already installed (tests, repeated calls) or the file
/// could not be created; logging then stays as it was.
pub fn init_logger(level: LevelFilter, log_file: Option<&str>) -> bool {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(e) => {
                eprintln!("Cannot create log file '{}': {}", path, e);
            }
        }
    }
    CombinedLogger::init(loggers).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_is_refused_quietly() {
        let _first = init_logger(LevelFilter::Warn, None);
        assert!(!init_logger(LevelFilter::Warn, None));
    }
}
