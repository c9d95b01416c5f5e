use clap::Parser;
use dzi_core::{Config, Coordinator};
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Ingests one print-artwork asset: downloads it, rasterizes/decomposes it
/// into ink channels, builds DZI pyramids and previews, writes a manifest
/// and publishes the result to object storage.
#[derive(Parser)]
#[command(name = "dzi-ingest", version, about)]
struct Opts {
    /// Source URL to download the artwork from.
    url: String,

    /// Numeric asset ID; used as the scratch directory name and the
    /// remote publish prefix.
    asset_id: u64,
}

fn main() -> std::process::ExitCode {
    env_logger::init();
    let opts = Opts::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("invalid configuration: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let mut coordinator = match Coordinator::new(config) {
        Ok(c) => c,
        Err(e) => {
            log::error!("failed to start coordinator: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    match coordinator.run(&opts.url, opts.asset_id) {
        Ok(manifest) => {
            log::info!("asset {}: published {} page(s)", opts.asset_id, manifest.pages.len());
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("asset {}: ingest failed: {e}", opts.asset_id);
            std::process::ExitCode::FAILURE
        }
    }
}
