use std::env;

use dotenvy::dotenv;
use fern::Dispatch;
use log::LevelFilter;

/// # setup logging
/// logs to stdout and to `LOG_FILE` (default `program.log`) at `LOGGING_LEVEL` (default `INFO`)
pub fn setup_logging() -> Result<(), fern::InitError> {
    dotenv().ok();

    let level = level_filter(&env::var("LOGGING_LEVEL").unwrap_or_default());
    let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "program.log".to_string());

    let formatted = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(std::io::stdout())
        .chain(fern::log_file(log_file)?);

    Dispatch::new()
        .level(level)
        // rocket's own request logging is noisy below warn
        .level_for("rocket", LevelFilter::Warn.min(level))
        .chain(formatted)
        .apply()?;

    Ok(())
}

fn level_filter(name: &str) -> LevelFilter {
    match name.trim().to_uppercase().as_str() {
        "OFF" => LevelFilter::Off,
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_case_insensitive() {
        assert_eq!(level_filter("debug"), LevelFilter::Debug);
        assert_eq!(level_filter(" WARN "), LevelFilter::Warn);
        assert_eq!(level_filter("off"), LevelFilter::Off);
    }

    #[test]
    fn unknown_levels_default_to_info() {
        assert_eq!(level_filter(""), LevelFilter::Info);
        assert_eq!(level_filter("loud"), LevelFilter::Info);
    }
}
