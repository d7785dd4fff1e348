// Replays a directory of captured frames through the spot tracker at the configured
// frame rate, logging the status line for every tick and writing annotated frames.

use anyhow::Context;
use spot_tester::driver::{Driver, shutdown_on};
use spot_tester::settings::Settings;
use spot_tester::source::DirectorySource;
use spot_tracker::FrameAnalyzer;
use std::env;
use std::path::{Path, PathBuf};

fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(settings.log_level()?).init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Argument Parsing & Setup ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("Usage: spot_tester <input_frame_dir> <output_dir> [config.toml]");
        return Ok(());
    }
    let input_dir = Path::new(&args[1]);
    let output_dir = PathBuf::from(&args[2]);
    let settings = Settings::load(args.get(3).map(Path::new))?;
    init_logging(&settings)?;

    // --- 2. Analyzer & Source Initialization ---
    let analyzer = FrameAnalyzer::new(settings.analyzer.clone())?;
    let source = DirectorySource::open(input_dir, analyzer.config().dimensions())?;
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("cannot create output directory {}", output_dir.display()))?;

    // --- 3. Main Processing Loop ---
    let driver = Driver::new(analyzer, source, settings.render.clone()).with_output_dir(output_dir.clone());
    let summary = driver.run(shutdown_on(tokio::signal::ctrl_c())).await?;

    println!(
        "Processing complete: {} frames, {} with movement. Output saved to {}",
        summary.frames,
        summary.movement_frames,
        output_dir.display()
    );
    Ok(())
}
