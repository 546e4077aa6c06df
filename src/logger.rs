//! Logging setup utilities.

use anyhow::Result;
use once_cell::sync::OnceCell;

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install a fern dispatcher logging to stderr at `level`.
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init(level: log::LevelFilter) -> Result<()> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    let _ = INITIALIZED.set(());
    Ok(())
}
