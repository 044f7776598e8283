use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use stardust_core::EngineConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod headless;

#[derive(Parser, Debug)]
#[command(name = "stardust", about = "Animated star field and cursor trail background")]
struct Args {
    /// TOML file overriding the default presets.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed every random source for a reproducible field and trail.
    #[arg(long)]
    seed: Option<u64>,
    /// Run without a window and print a JSON summary.
    #[arg(long)]
    headless: bool,
    /// Frames to simulate in headless mode.
    #[arg(long, default_value_t = 120)]
    frames: usize,
    /// Include every shape of the last headless frame in the summary.
    #[arg(long, requires = "headless")]
    dump_frame: bool,
}

fn main() -> ExitCode {
    // Init logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Stardust starting");
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Stardust error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> stardust_platform::Result<()> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    if args.headless {
        let summary = headless::run(&config, args.frames, args.dump_frame)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        stardust_ui::run_window(config).map_err(|err| format!("window failed: {err}"))?;
    }
    Ok(())
}
