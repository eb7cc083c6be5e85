//! Photobooth CLI: inspect layouts, run a capture session, compose strips.
//!
//! Usage:
//!   photobooth layout [OPTIONS]          Print the composite layout as JSON
//!   photobooth compose <IMAGES>...       Composite existing photos into a strip
//!   photobooth shoot [OPTIONS]           Run countdown capture with the synthetic camera
//!   photobooth filters                   List capture filters

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use photobooth_common::config::AppConfig;
use photobooth_model::background::FrameColor;
use photobooth_model::filter::FilterKind;
use photobooth_model::template::{DeviceClass, Template};

mod commands;

#[derive(Parser)]
#[command(
    name = "photobooth",
    about = "Capture photo strips and composite them into a framed print",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/photobooth/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the layout of a template as JSON
    Layout {
        /// Template: diagonal (3 photos) or grid (4 photos)
        #[arg(short, long, default_value = "diagonal")]
        template: Template,

        /// Device class: standard or compact
        #[arg(short, long)]
        device: Option<DeviceClass>,

        /// Reported display pixel density
        #[arg(long)]
        density: Option<f64>,
    },

    /// Composite existing photos into a framed strip
    Compose {
        /// Photos in slot order (3 or 4)
        #[arg(required = true, num_args = 3..=4)]
        images: Vec<PathBuf>,

        /// Template (inferred from the number of photos when omitted)
        #[arg(short, long)]
        template: Option<Template>,

        /// Device class: standard or compact
        #[arg(short, long)]
        device: Option<DeviceClass>,

        /// Frame color as #rrggbb
        #[arg(long, conflicts_with = "texture")]
        color: Option<FrameColor>,

        /// Background texture image
        #[arg(long)]
        texture: Option<PathBuf>,

        /// Reported display pixel density
        #[arg(long)]
        density: Option<f64>,

        /// Output PNG path or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Shoot a full set with the synthetic camera and export the strip
    Shoot {
        /// Template: diagonal (3 photos) or grid (4 photos)
        #[arg(short, long, default_value = "diagonal")]
        template: Template,

        /// Device class: standard or compact
        #[arg(short, long)]
        device: Option<DeviceClass>,

        /// Countdown before each shot, in seconds (0-10)
        #[arg(long)]
        countdown: Option<u32>,

        /// Capture filter (see `photobooth filters`)
        #[arg(long)]
        filter: Option<FilterKind>,

        /// Store photos unmirrored
        #[arg(long)]
        no_mirror: bool,

        /// Images the synthetic camera streams instead of its test pattern
        #[arg(long, num_args = 1..)]
        feed: Vec<PathBuf>,

        /// Frame color as #rrggbb
        #[arg(long, conflicts_with = "texture")]
        color: Option<FrameColor>,

        /// Background texture image
        #[arg(long)]
        texture: Option<PathBuf>,

        /// Output PNG path or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List capture filters
    Filters,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    photobooth_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Layout {
            template,
            device,
            density,
        } => commands::layout::run(&config, template, device, density),
        Commands::Compose {
            images,
            template,
            device,
            color,
            texture,
            density,
            output,
        } => {
            commands::compose::run(
                &config,
                commands::compose::ComposeArgs {
                    images,
                    template,
                    device,
                    color,
                    texture,
                    density,
                    output,
                },
            )
            .await
        }
        Commands::Shoot {
            template,
            device,
            countdown,
            filter,
            no_mirror,
            feed,
            color,
            texture,
            output,
        } => {
            commands::shoot::run(
                &config,
                commands::shoot::ShootArgs {
                    template,
                    device,
                    countdown,
                    filter,
                    mirrored: !no_mirror,
                    feed,
                    color,
                    texture,
                    output,
                },
            )
            .await
        }
        Commands::Filters => commands::filters::run(),
    }
}
