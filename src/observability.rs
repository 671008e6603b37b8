//! Logger installation for applications and tests that use the crate.
//!
//! The crate itself only emits through the `log` facade. Severity follows a
//! fixed mapping: closed-storage reads, offset fixes and skipped index entries
//! are `error`; recoverable misses are `warn`; resource lifecycle is `debug`;
//! per-array detail such as zero-length arrays is `trace`.

use std::fs::OpenOptions;
use std::path::Path;

use log::LevelFilter;
use parking_lot::Mutex;

use crate::error::MzbinError;

/// Set once a logger has been installed successfully.
static LOGGER_INSTALLED: Mutex<bool> = parking_lot::const_mutex(false);

/// Installs a compact `[LEVEL] message` logger at `level`, appending to
/// `log_file` when given and writing to stderr otherwise.
///
/// Only the first successful call in a process installs anything; later calls
/// are no-ops. A failed call leaves the next one free to try again.
pub fn enable_verbose_logging(
    log_file: Option<&Path>,
    level: LevelFilter,
) -> Result<(), MzbinError> {
    install_once(&LOGGER_INSTALLED, || install(log_file, level))
}

fn install_once<F>(installed: &Mutex<bool>, install: F) -> Result<(), MzbinError>
where
    F: FnOnce() -> Result<(), MzbinError>,
{
    let mut installed = installed.lock();
    if *installed {
        return Ok(());
    }
    install()?;
    *installed = true;
    Ok(())
}

fn install(log_file: Option<&Path>, level: LevelFilter) -> Result<(), MzbinError> {
    let mut builder = env_logger::Builder::new();
    builder.is_test(false);
    builder.filter_level(level);

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(buf, "[{}] {}", record.level(), record.args())?;
        buf.flush()?;
        Ok(())
    });

    if let Some(path) = log_file {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // Another logger may already be installed by the host application.
    let _ = builder.try_init();
    Ok(())
}

/// Installs the default `RUST_LOG`-driven logger, unless one is already set.
pub fn init_from_env() {
    let _ = install_once(&LOGGER_INSTALLED, || {
        let _ = env_logger::Builder::from_default_env().try_init();
        Ok(())
    });
}
