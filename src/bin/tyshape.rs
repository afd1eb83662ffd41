use anyhow::Result;
use clap::Parser;
use std::io::Write;

use tyshape::cli::args::CliArgs;
use tyshape::cli::driver;

fn main() -> Result<()> {
    // TYSHAPE_LOG / TYSHAPE_LOG_FORMAT, see src/tracing_config.rs.
    tyshape::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let mut stdout = std::io::stdout().lock();
    let ok = driver::run(&args, &mut stdout)?;
    stdout.flush()?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
