//! The `render` command.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use flowline_core::{FlatHeightmap, Heightmap};
use flowline_image::ImageHeightmap;
use flowline_particle::{ResolvedConfig, RunConfig, Simulation};
use flowline_vector::PathCollector;
use flowline_vector::svg::SvgDocument;

use crate::cli::RenderArgs;

/// Name used for runs without a heightmap.
const FLAT_NAME: &str = "flat";

/// Where a run's heightmap comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A heightmap image.
    Image(PathBuf),
    /// A uniform mid-grey heightmap.
    Flat,
}

impl Source {
    /// File stem used in output names.
    pub fn name(&self) -> String {
        match self {
            Source::Image(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| FLAT_NAME.to_string()),
            Source::Flat => FLAT_NAME.to_string(),
        }
    }
}

/// Files written by one run.
#[derive(Debug)]
pub struct RenderOutput {
    /// The SVG drawing.
    pub svg: PathBuf,
    /// The resolved configuration.
    pub metadata: PathBuf,
    /// The configuration that was run.
    pub config: ResolvedConfig,
}

/// Executes `render`.
pub fn execute(args: RenderArgs) -> Result<()> {
    let base = load_config(args.config.as_deref())?;
    let sources = collect_sources(&args.heightmaps)?;
    let repeats = base.repeat_times.unwrap_or(0) as usize + 1;
    log::info!("processing {} heightmaps, {} times each", sources.len(), repeats);

    let started = Instant::now();
    let mut runs = 0u64;
    for repeat in 0..repeats {
        for source in &sources {
            let config = run_config(&base, &args, runs);
            let output = render(&config, source, args.scale_to, &args.output)?;
            log::info!(
                "{} (repeat {}) written to {}",
                source.name(),
                repeat,
                output.svg.display()
            );
            runs += 1;
        }
    }
    let total = started.elapsed().as_secs_f64();
    log::info!(
        "all runs completed in {:.2}s ({:.2}s average)",
        total,
        total / runs.max(1) as f64
    );
    Ok(())
}

/// Reads the run configuration, or an empty one when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    let json = fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
    RunConfig::from_json(&json).with_context(|| format!("failed to parse config {}", path.display()))
}

/// Expands heightmap arguments into sources. Directories contribute their
/// supported images in name order. No arguments yields one flat source.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<Source>> {
    if paths.is_empty() {
        return Ok(vec![Source::Flat]);
    }
    let mut sources = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = fs::read_dir(path)
                .with_context(|| format!("failed to list {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && ImageHeightmap::is_supported(p))
                .collect();
            found.sort();
            if found.is_empty() {
                log::warn!("no heightmaps found in {}", path.display());
            }
            sources.extend(found.into_iter().map(Source::Image));
        } else {
            sources.push(Source::Image(path.clone()));
        }
    }
    if sources.is_empty() {
        bail!("no heightmaps to render");
    }
    Ok(sources)
}

/// Applies command-line overrides to the base configuration for the
/// `index`-th run.
pub fn run_config(base: &RunConfig, args: &RenderArgs, index: u64) -> RunConfig {
    let mut config = base.clone();
    if let Some(seed) = args.seed {
        config.seed = Some(seed.wrapping_add(index));
    }
    if args.ticks.is_some() {
        config.total_ticks = args.ticks;
    }
    if args.particles.is_some() {
        config.num_particles = args.particles;
    }
    if args.width.is_some() {
        config.width = args.width;
    }
    if args.height.is_some() {
        config.height = args.height;
    }
    config
}

/// Resolves, simulates and writes one run.
pub fn render(config: &RunConfig, source: &Source, scale_to: Option<(u32, u32)>, output: &Path) -> Result<RenderOutput> {
    let started = Instant::now();
    let image = match source {
        Source::Image(path) => Some(ImageHeightmap::open(path)?),
        Source::Flat => None,
    };

    let hint = image.as_ref().map(ImageHeightmap::native_canvas);
    let mut resolved = config.clone().resolve(hint).context("invalid run configuration")?;
    if let Some((width, height)) = scale_to {
        resolved = resolved.scaled_to(width, height).context("failed to rescale run")?;
    }

    let heightmap: Box<dyn Heightmap> = match image {
        Some(image) => Box::new(image.fit_to(resolved.canvas())),
        None => Box::new(FlatHeightmap(0.5)),
    };
    let mut simulation = Simulation::new(&resolved, heightmap).context("failed to start simulation")?;
    let mut paths = PathCollector::new();
    simulation.run(&mut paths);

    let mut document = SvgDocument::new(resolved.width, resolved.height).with_background(resolved.background_color);
    document.add_paths(paths.paths());

    let stem = format!("{}_{}", timestamp_millis(), source.name());
    let metadata_dir = output.join("metadata");
    fs::create_dir_all(&metadata_dir).with_context(|| format!("failed to create {}", metadata_dir.display()))?;

    let svg = output.join(format!("{stem}.svg"));
    fs::write(&svg, document.to_svg_string()).with_context(|| format!("failed to write {}", svg.display()))?;
    let metadata = metadata_dir.join(format!("{stem}.json"));
    let json = resolved.to_json().context("failed to serialize metadata")?;
    fs::write(&metadata, json).with_context(|| format!("failed to write {}", metadata.display()))?;

    log::info!(
        "{}: seed {}, {} paths in {:.2}s",
        source.name(),
        resolved.seed(),
        document.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(RenderOutput {
        svg,
        metadata,
        config: resolved,
    })
}

fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> RunConfig {
        RunConfig {
            seed: Some(3),
            width: Some(120),
            height: Some(80),
            total_ticks: Some(40),
            num_particles: Some(3),
            ..Default::default()
        }
    }

    #[test]
    fn test_flat_render_writes_svg_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let out = render(&small(), &Source::Flat, None, dir.path()).unwrap();
        let svg = fs::read_to_string(&out.svg).unwrap();
        assert!(svg.contains("<svg"));
        assert!(out.svg.file_name().unwrap().to_string_lossy().ends_with("_flat.svg"));
        assert_eq!(out.metadata.parent().unwrap(), dir.path().join("metadata"));

        let replay = load_config(Some(&out.metadata)).unwrap().resolve(None).unwrap();
        assert_eq!(replay, out.config);
    }

    #[test]
    fn test_image_sets_default_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ridge.png");
        image::RgbImage::from_pixel(64, 48, image::Rgb([10, 200, 30])).save(&path).unwrap();
        let config = RunConfig {
            width: None,
            height: None,
            ..small()
        };
        let out = render(&config, &Source::Image(path), None, dir.path()).unwrap();
        assert_eq!((out.config.width, out.config.height), (64, 48));
        assert!(out.svg.to_string_lossy().ends_with("_ridge.svg"));
    }

    #[test]
    fn test_scale_to_resizes_run() {
        let dir = tempfile::tempdir().unwrap();
        let out = render(&small(), &Source::Flat, Some((240, 160)), dir.path()).unwrap();
        assert_eq!((out.config.width, out.config.height), (240, 160));
        let svg = fs::read_to_string(&out.svg).unwrap();
        assert!(svg.contains("width=\"240\""));
    }

    #[test]
    fn test_collect_sources() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.jpg", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let sources = collect_sources(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(
            sources,
            vec![Source::Image(dir.path().join("a.jpg")), Source::Image(dir.path().join("b.png"))]
        );
        assert_eq!(collect_sources(&[]).unwrap(), vec![Source::Flat]);

        let empty = tempfile::tempdir().unwrap();
        assert!(collect_sources(&[empty.path().to_path_buf()]).is_err());
    }

    #[test]
    fn test_overrides_and_seed_sequence() {
        let args = RenderArgs {
            seed: Some(10),
            ticks: Some(77),
            width: Some(300),
            ..Default::default()
        };
        let base = RunConfig {
            num_particles: Some(4),
            ..Default::default()
        };
        let second = run_config(&base, &args, 1);
        assert_eq!(second.seed, Some(11));
        assert_eq!(second.total_ticks, Some(77));
        assert_eq!(second.width, Some(300));
        assert_eq!(second.num_particles, Some(4));
        assert_eq!(run_config(&base, &RenderArgs::default(), 5), base);
    }

    #[test]
    fn test_bad_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, r#"{"palette": []}"#).unwrap();
        assert!(load_config(Some(&path)).is_err());
        assert!(load_config(Some(&dir.path().join("missing.json"))).is_err());
    }
}
