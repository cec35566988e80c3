//! Build command - generates the blog

use std::{path::Path, time::Instant};

use blogsmith_core::BuildConfig;
use blogsmith_generator::Builder;
use color_eyre::eyre::{Result, WrapErr};

use super::load_config;

/// Run the build command.
///
/// Builds the blog under `root` into the configured output directory.
pub fn run(root: &Path, output: Option<&Path>, site_url: Option<&str>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?root, ?output, ?site_url, "Starting build");

    let mut config = load_config(root)?;
    apply_overrides(&mut config, output, site_url);

    tracing::debug!(?config, "Loaded configuration");

    let output_dir = config.output_dir.clone();
    let stats = Builder::new(config).build().wrap_err("Build failed")?;

    let duration = start.elapsed();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Posts:    {}", stats.posts);
    println!("  Drafts:   {}", stats.drafts);
    println!("  Skipped:  {}", stats.skipped);
    println!("  Assets:   {}", stats.assets);
    println!();
    println!("  Duration: {:.2}s", duration.as_secs_f64());
    println!("  Output:   {}", output_dir.display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(config: &mut BuildConfig, output: Option<&Path>, site_url: Option<&str>) {
    if let Some(dir) = output {
        tracing::info!(output = %dir.display(), "Overriding output directory from CLI");
        config.output_dir = dir.to_path_buf();
    }

    if let Some(url) = site_url {
        tracing::info!(site_url = url, "Overriding site URL from CLI");
        config.set_site_url(url);
    }
}
