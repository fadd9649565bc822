use bikeshare_processor::cli::{run, Cli};
use bikeshare_processor::error::Result;
use bikeshare_processor::utils::init_logging;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "command failed");
        return Err(e);
    }

    Ok(())
}
