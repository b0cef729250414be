//! goal3d terminal viewer
//!
//! Renders the soccer goal scene as shaded ASCII art.
//! Controls:
//!   - 1 / 2: Toggle ball spin about Y / Z
//!   - 3: Shrink the goal
//!   - + / - (or Up / Down): Change animation speed
//!   - o: Toggle orbit controls (Left / Right / PageUp / PageDown)
//!   - w: Toggle wireframe
//!   - q / Esc: Quit

use anyhow::{Context, Result};
use clap::Parser;
use goal3d_core::{GoalConfig, GoalScene};
use goal3d_terminal::TerminalApp;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "goal3d-terminal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Soccer goal scene in the terminal", long_about = None)]
struct Cli {
    /// Angle of the rear supports from vertical, in degrees
    #[arg(long, default_value_t = 35.0)]
    support_angle: f32,

    /// Crossbar length; every other size derives from it
    #[arg(long, default_value_t = 3.0)]
    crossbar_length: f32,

    /// Radius of the goal frame tubes
    #[arg(long, default_value_t = 0.05)]
    skeleton_radius: f32,

    /// Ball height as a fraction of the post length
    #[arg(long, default_value_t = 0.5)]
    ball_height: f32,

    /// Leave out the corner flags
    #[arg(long)]
    no_flags: bool,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn goal_config(&self) -> GoalConfig {
        let mut config = GoalConfig::default();
        config.dimensions.support_angle_degrees = self.support_angle;
        config.dimensions.crossbar_length = self.crossbar_length;
        config.dimensions.skeleton_radius = self.skeleton_radius;
        config.ball_height_factor = self.ball_height;
        config.flags = !self.no_flags;
        config
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let config = cli.goal_config();
    let scene = GoalScene::build(config).context("failed to build the goal scene")?;
    info!(
        nodes = scene.graph.len(),
        triangles = scene.graph.triangle_count(),
        "scene ready"
    );

    let mut app = TerminalApp::new(scene, cli.fps).context("failed to query the terminal")?;
    app.run().context("terminal render loop failed")?;

    Ok(())
}
