use crate::error::Result;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Maps `-v` repetitions to a level. `--quiet` keeps errors only.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber: compact output on stderr, plus a plain-text copy
/// with thread ids and targets when `log_file` is given.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let file_layer = log_file
        .map(|path| -> Result<_> {
            let file = File::create(path)?;
            Ok(fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_thread_ids(true)
                .with_target(true))
        })
        .transpose()?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use serial_test::serial;
    use std::path::PathBuf;
    use tracing::{debug, info};

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(3, false), LevelFilter::TRACE);
        assert_eq!(level_filter(9, false), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_keeps_errors_only() {
        assert_eq!(level_filter(0, true), LevelFilter::ERROR);
    }

    #[test]
    #[serial]
    fn file_layer_records_thread_ids_and_levels() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("dccm.log");

        let file = File::create(&log_path).unwrap();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_thread_ids(true),
        );

        tracing::subscriber::with_default(subscriber, || {
            info!("Selectable slice range updated.");
            debug!(window = 25, "Computed correlation dataset.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Selectable slice range updated."));
        assert!(content.contains("window=25"));
        assert!(content.contains("DEBUG"));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_is_reported_before_install() {
        let dir = PathBuf::from("/");
        if cfg!(unix) && dir.is_dir() {
            let result = setup_logging(0, false, Some(&dir));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
