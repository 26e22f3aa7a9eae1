use fern::Dispatch;

use crate::modules::helpers::config::Config;

fn format_line(out: fern::FormatCallback, message: &std::fmt::Arguments, record: &log::Record) {
    out.finish(format_args!(
        "{} [{}][{}] {}",
        chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
        record.target(),
        record.level(),
        message
    ))
}

/// # setup logging
/// log to the configured file and to stdout at the configured level
pub fn setup_logging(config: &Config) -> Result<(), fern::InitError> {
    let file_logger_config = Dispatch::new()
        .format(format_line)
        .chain(fern::log_file(&config.log_file)?);

    let stdout_logger_config = Dispatch::new()
        .format(format_line)
        .chain(std::io::stdout());

    Dispatch::new()
        .level(config.logging_level)
        .chain(file_logger_config)
        .chain(stdout_logger_config)
        .apply()?;

    Ok(())
}
