use anyhow::Result;
use randr_cycle::args::Args;
use randr_cycle::{CommandTool, Config, Cycler};
use tracing::{error, info};

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "randr_cycler={log_level},randr_cycle={log_level},randr_catalog={log_level}"
                )
                .into()
            }),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .with_level(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging first
    init_logging(args.verbose);

    info!("Starting randr-cycler {}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_args(&args)?;
    let tool = CommandTool::new(&config);
    let cycler = Cycler::new(config, tool)?;

    let output_dir = args.output_dir();
    let report = cycler.run(&args.keyword, &output_dir).await?;
    if let Some(archive) = &report.archive {
        info!("Screenshots archived to {}", archive.display());
    }

    if let Err(e) = report.verdict() {
        error!("{}", e);
        return Err(e.into());
    }

    info!("All {} modes applied", report.results.len());
    Ok(())
}
