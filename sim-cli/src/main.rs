//! Command-line host for the space-colonization tree generator.
//!
//! Parses the growth and skinning tunables, runs one generation, and logs
//! a summary of the resulting tree and mesh. Nothing is written to disk.

mod summary;

use anyhow::{Context, Result};
use clap::Parser;
use sim_core::config::{Config, SkinConfig};

#[derive(Parser, Debug)]
#[command(name = "sca-tree")]
#[command(about = "Grow a space-colonization tree and skin it into a mesh", long_about = None)]
struct Cli {
    /// Number of attraction points
    #[arg(long, default_value_t = Config::default().attraction_points)]
    points: usize,

    /// Radius of the attraction sphere
    #[arg(long, default_value_t = Config::default().crown_radius)]
    crown_radius: f32,

    /// Random seed (0 = unseeded)
    #[arg(long, default_value_t = Config::default().seed)]
    seed: u64,

    /// Range at which a branch can be assigned a point
    #[arg(long, default_value_t = Config::default().influence_distance)]
    influence_distance: f32,

    /// Range at which a point is consumed
    #[arg(long, default_value_t = Config::default().kill_distance)]
    kill_distance: f32,

    /// Length of every branch
    #[arg(long, default_value_t = Config::default().branch_length)]
    branch_length: f32,

    /// Radius of new branches before tapering
    #[arg(long, default_value_t = Config::default().branch_radius)]
    branch_radius: f32,

    /// Maximum number of children per branch
    #[arg(long, default_value_t = Config::default().max_children)]
    max_children: usize,

    /// Iterations allowed to grow straight up before any point is in range
    #[arg(long, default_value_t = Config::default().bootstrap_iterations)]
    bootstrap_iterations: u32,

    /// Hard iteration cap
    #[arg(long, default_value_t = Config::default().max_iterations)]
    max_iterations: u32,

    /// Smallest gap between the root and the bottom of the sphere
    #[arg(long, default_value_t = Config::default().trunk_offset.0)]
    trunk_offset_min: f32,

    /// Largest gap between the root and the bottom of the sphere
    #[arg(long, default_value_t = Config::default().trunk_offset.1)]
    trunk_offset_max: f32,

    /// Quads around each branch ring
    #[arg(long, default_value_t = SkinConfig::default().slice_count)]
    slices: usize,

    /// Radius added per level from the leaves to the root
    #[arg(long, default_value_t = SkinConfig::default().radius_increment)]
    radius_increment: f32,

    /// Close the base and leaf ends
    #[arg(long)]
    caps: bool,
}

impl Cli {
    fn configs(&self) -> (Config, SkinConfig) {
        let cfg = Config {
            attraction_points: self.points,
            crown_radius: self.crown_radius,
            seed: self.seed,
            influence_distance: self.influence_distance,
            kill_distance: self.kill_distance,
            branch_length: self.branch_length,
            branch_radius: self.branch_radius,
            max_children: self.max_children,
            bootstrap_iterations: self.bootstrap_iterations,
            max_iterations: self.max_iterations,
            trunk_offset: (self.trunk_offset_min, self.trunk_offset_max),
        };
        let skin_cfg = SkinConfig {
            slice_count: self.slices,
            radius_increment: self.radius_increment,
            cap_ends: self.caps,
        };
        (cfg, skin_cfg)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (cfg, skin_cfg) = cli.configs();

    let generated = sim_core::generate(cfg, &skin_cfg).context("tree generation failed")?;
    summary::Summary::of(&generated).log();

    Ok(())
}
