use pingbus::{init_logging, run, Config, BUILD_DATE, VERSION};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Optional first argument: path to a TOML or JSON config file
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load_or_default(path.as_deref())?;

    init_logging(&config.logging)?;
    tracing::info!("pingbus {} (built {})", VERSION, BUILD_DATE);

    let summary = run(&config)?;
    tracing::info!(
        worker = ?summary.worker,
        "Worker answered '{}'",
        summary.reply
    );

    Ok(())
}
