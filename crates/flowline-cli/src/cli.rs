//! Root CLI structure for flowline

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "flowline")]
#[command(about = "Particle line art from noise and heightmaps", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one SVG per heightmap (and per repeat)
    Render(RenderArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Run configuration JSON; omitted fields are randomized
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Heightmap images or directories of them
    #[arg(long, num_args = 1..)]
    pub heightmaps: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Seed of the first run; later runs count up from it
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ticks per run
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Particles per run
    #[arg(long)]
    pub particles: Option<u32>,

    /// Canvas width
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height
    #[arg(long)]
    pub height: Option<u32>,

    /// Rescale each resolved run to WIDTHxHEIGHT before simulating
    #[arg(long, value_name = "WxH", value_parser = parse_size)]
    pub scale_to: Option<(u32, u32)>,
}

/// Parses `WIDTHxHEIGHT`.
pub fn parse_size(s: &str) -> Result<(u32, u32)> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: u32 = w.trim().parse().with_context(|| format!("bad width in {s:?}"))?;
    let h: u32 = h.trim().parse().with_context(|| format!("bad height in {s:?}"))?;
    if w == 0 || h == 0 {
        bail!("size must be non-zero, got {s:?}");
    }
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1920x1080").unwrap(), (1920, 1080));
        assert_eq!(parse_size("64X48").unwrap(), (64, 48));
        assert!(parse_size("1920").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }

    #[test]
    fn test_render_flags() {
        let cli = Cli::try_parse_from([
            "flowline",
            "render",
            "--heightmaps",
            "a.png",
            "maps",
            "--seed",
            "9",
            "--scale-to",
            "800x600",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Render(args) = cli.command;
        assert_eq!(args.heightmaps, vec![PathBuf::from("a.png"), PathBuf::from("maps")]);
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.scale_to, Some((800, 600)));
        assert_eq!(args.output, PathBuf::from("output"));
    }
}
