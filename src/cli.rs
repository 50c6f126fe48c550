// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "scroll-scene")]
#[command(about = "Scroll-driven 3D scene", long_about = None)]
pub struct Cli {
    /// Disable the HUD overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// JSON file overriding scene constants
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory the texture files are read from
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Seed for the star field (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after rendering this many frames
    #[arg(long)]
    pub frames: Option<u64>,
}
