use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tabletop_core::ViewerConfig;
use tabletop_viewer::Viewer;

/// Fly through a textured desk scene
#[derive(Parser, Debug)]
#[command(name = "tabletop", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing the textures/ folder
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Window width in logical pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in logical pixels
    #[arg(long)]
    height: Option<u32>,

    /// Do not hide and lock the mouse cursor
    #[arg(long)]
    no_grab: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn load_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ViewerConfig::default(),
        };

        if let Some(assets) = &self.assets {
            config.asset_dir = assets.clone();
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
        if self.no_grab {
            config.window.grab_cursor = false;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.load_config()?;

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    log::info!("Starting tabletop viewer with assets from {}", config.asset_dir.display());
    Viewer::new(config)?.run().context("Viewer exited with an error")
}
