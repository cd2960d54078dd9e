//! A single particle and its per-tick state machine.

use flowline_control::{Controllers, ParticleView};
use flowline_core::math::{clamp, random_range};
use flowline_core::{Canvas, Engine, Heightmap, HeightmapSample, HexColor, Lerp, Palette, ParticleKey};
use flowline_vector::{PathSink, Segment, StrokeStyle};
use glam::Vec2;

use crate::{EdgeOutcome, ParticleDefaults, SkipPattern};

/// The fixed surroundings of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Drawing surface.
    pub canvas: Canvas,
    /// Colors particles draw their base color from.
    pub palette: Palette,
    /// Canvas background.
    pub background: HexColor,
}

/// Everything a particle reads or advances while stepping.
pub struct StepContext<'a> {
    /// Noise, easing and the simulation RNG.
    pub engine: &'a mut Engine,
    /// The five controllers, already set to the current tick.
    pub controllers: &'a mut Controllers,
    /// Canvas, palette and background.
    pub scene: &'a Scene,
    /// Heightmap sampled once per particle per tick.
    pub heightmap: &'a dyn Heightmap,
    /// Population ranges and styles.
    pub defaults: &'a ParticleDefaults,
}

/// One particle.
///
/// A particle lives for `lifespan` ticks, drawing a trail, then resets in
/// place: same slot, new identity, fresh random draws.
#[derive(Debug, Clone)]
pub struct Particle {
    key: ParticleKey,
    position: Vec2,
    previous_position: Vec2,
    overshoot_position: Vec2,
    velocity: Vec2,
    size: f32,
    previous_size: f32,
    base_color: HexColor,
    color: HexColor,
    age: f32,
    lifespan: f32,
    skip: Option<SkipPattern>,
    heightmap: HeightmapSample,
    open_stroke: Option<StrokeStyle>,
}

impl Particle {
    /// Spawns a particle in `slot`.
    pub fn spawn(slot: usize, skip: Option<SkipPattern>, ctx: &mut StepContext<'_>) -> Self {
        let mut particle = Self {
            key: ParticleKey::fresh(slot),
            position: Vec2::ZERO,
            previous_position: Vec2::ZERO,
            overshoot_position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            size: 0.0,
            previous_size: 0.0,
            base_color: HexColor::BLACK,
            color: HexColor::BLACK,
            age: 0.0,
            lifespan: 1.0,
            skip,
            heightmap: HeightmapSample::default(),
            open_stroke: None,
        };
        particle.reset(ctx);
        particle
    }

    /// Starts a new life: new identity, base color, spawn point, size and
    /// lifespan. Ends any open stroke.
    pub fn reset(&mut self, ctx: &mut StepContext<'_>) {
        self.open_stroke = None;
        self.key = ParticleKey::fresh(self.key.slot);
        self.base_color = ctx.scene.palette.pick(ctx.engine.rng());
        self.color = self.base_color;
        self.position = ctx.controllers.position.evaluate(ctx.engine);
        self.previous_position = self.position;
        self.overshoot_position = self.position;
        self.velocity = Vec2::ZERO;
        let d = ctx.defaults;
        self.size = random_range(ctx.engine.rng(), d.min_size, d.max_size);
        self.previous_size = self.size;
        self.lifespan = random_range(ctx.engine.rng(), d.min_lifespan, d.max_lifespan);
        self.age = 0.0;
        if let Some(skip) = &mut self.skip {
            skip.reset();
        }
    }

    /// Advances one tick, emitting at most one segment into `sink`.
    pub fn step(&mut self, ctx: &mut StepContext<'_>, sink: &mut dyn PathSink) {
        let d = ctx.defaults;
        self.heightmap = ctx.heightmap.sample(self.position);

        let view = self.view(ctx.scene.background);
        let direction = ctx.controllers.angle.evaluate(&view, ctx.engine);
        let magnitude = ctx.controllers.magnitude.evaluate(&view, ctx.engine);
        let acceleration = direction * d.min_speed.lerp_to(&d.max_speed, magnitude);

        self.velocity += acceleration;
        let speed = self.velocity.length();
        if speed > d.max_speed {
            self.velocity = self.velocity.normalize_or(Vec2::X) * d.max_speed;
        } else if speed < d.min_speed {
            self.velocity = self.velocity.normalize_or(Vec2::X) * d.min_speed;
        }

        self.previous_position = self.position;
        self.position += self.velocity;
        self.overshoot_position = self.position + self.velocity * d.overshoot;

        let view = self.view(ctx.scene.background);
        self.previous_size = self.size;
        let size = ctx.controllers.size.evaluate(&view, ctx.engine);
        self.size = clamp(d.min_size.lerp_to(&d.max_size, size), d.min_size, d.max_size);
        self.color = ctx.controllers.color.evaluate(&view, ctx.engine);

        let visible = self.skip.as_mut().is_none_or(SkipPattern::advance);
        if visible {
            self.draw(d, sink);
        } else {
            self.open_stroke = None;
        }

        self.age += 1.0;
        if self.age > self.lifespan {
            self.reset(ctx);
        } else if !ctx.scene.canvas.contains(self.position) {
            match d.edge_policy.apply(ctx.scene.canvas, &mut self.position, &mut self.velocity) {
                EdgeOutcome::Wrapped { break_stroke: true } => self.open_stroke = None,
                EdgeOutcome::Kill => self.reset(ctx),
                EdgeOutcome::Wrapped { .. } | EdgeOutcome::Unchanged | EdgeOutcome::Bounced => {}
            }
        }
    }

    fn draw(&mut self, d: &ParticleDefaults, sink: &mut dyn PathSink) {
        let style = StrokeStyle::new(self.size.round().max(0.0) as u32, self.color)
            .with_cap(d.line_cap)
            .with_join(d.line_join);
        let continues = self.open_stroke == Some(style);
        sink.segment(Segment {
            owner: self.key.slot,
            start: self.previous_position,
            end: self.overshoot_position,
            style,
            continues,
        });
        self.open_stroke = Some(style);
    }

    /// What controllers see of this particle.
    pub fn view(&self, background: HexColor) -> ParticleView {
        ParticleView {
            key: self.key,
            position: self.position,
            heightmap: self.heightmap,
            age: self.age,
            lifespan: self.lifespan,
            base_color: self.base_color,
            background,
        }
    }

    /// Slot and identity.
    pub fn key(&self) -> ParticleKey {
        self.key
    }

    /// Current position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position before the last step.
    pub fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Current stroke width.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Stroke width before the last step.
    pub fn previous_size(&self) -> f32 {
        self.previous_size
    }

    /// Color drawn at the last reset.
    pub fn base_color(&self) -> HexColor {
        self.base_color
    }

    /// Current stroke color.
    pub fn color(&self) -> HexColor {
        self.color
    }

    /// Ticks lived this life.
    pub fn age(&self) -> f32 {
        self.age
    }

    /// Ticks this life lasts.
    pub fn lifespan(&self) -> f32 {
        self.lifespan
    }

    /// Heightmap sample from the last step.
    pub fn heightmap(&self) -> HeightmapSample {
        self.heightmap
    }

    /// True if a stroke is open and the next visible step extends it when
    /// width and color are unchanged.
    pub fn has_open_stroke(&self) -> bool {
        self.open_stroke.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EdgePolicy;
    use flowline_core::FlatHeightmap;
    use flowline_vector::{LineCap, LineJoin};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Fixture {
        engine: Engine,
        controllers: Controllers,
        scene: Scene,
        heightmap: FlatHeightmap,
        defaults: ParticleDefaults,
    }

    impl Fixture {
        fn new(lifespan: f32) -> Self {
            let canvas = Canvas::new(100, 100);
            let palette = Palette::new(vec![HexColor::WHITE, HexColor::new(200, 10, 10)]).unwrap();
            let mut rng = StdRng::seed_from_u64(40);
            Self {
                engine: Engine::default(),
                controllers: Controllers::random(canvas, 50, palette.clone(), &mut rng).unwrap(),
                scene: Scene {
                    canvas,
                    palette,
                    background: HexColor::BLACK,
                },
                heightmap: FlatHeightmap(0.25),
                defaults: ParticleDefaults {
                    min_size: 1.0,
                    max_size: 4.0,
                    min_lifespan: lifespan,
                    max_lifespan: lifespan,
                    min_speed: 1.0,
                    max_speed: 3.0,
                    skip_pattern: Vec::new(),
                    line_cap: LineCap::Round,
                    line_join: LineJoin::Round,
                    edge_policy: EdgePolicy::Wrap,
                    overshoot: 0.0,
                },
            }
        }

        /// Fixed controls: every particle starts at the center and heads
        /// along +x at a constant `speed`.
        fn straight(&mut self, speed: f32, size: &str, color: &str) {
            let mut snapshots = self.controllers.snapshots();
            let angle = &mut snapshots.angle_controller;
            angle.function = "GlobalConstant".into();
            (angle.mux_a, angle.mux_b) = (None, None);
            angle.params.global_constant = [1.0, 0.0];
            angle.params.round_results = false;
            let magnitude = &mut snapshots.magnitude_controller;
            magnitude.function = "GlobalConstant".into();
            (magnitude.mux_a, magnitude.mux_b) = (None, None);
            magnitude.params.global_constant = 1.0;
            let size_snapshot = &mut snapshots.size_controller;
            size_snapshot.function = size.into();
            (size_snapshot.mux_a, size_snapshot.mux_b) = (None, None);
            let color_snapshot = &mut snapshots.color_controller;
            color_snapshot.function = color.into();
            (color_snapshot.mux_a, color_snapshot.mux_b) = (None, None);
            let position = &mut snapshots.position_controller;
            position.function = "Center".into();
            (position.mux_a, position.mux_b) = (None, None);
            self.controllers =
                Controllers::from_snapshots(self.scene.canvas, 50, self.scene.palette.clone(), &snapshots).unwrap();
            self.defaults.min_speed = speed;
            self.defaults.max_speed = speed;
        }

        fn run(&mut self, ticks: usize) -> Vec<Segment> {
            let mut ctx = self.ctx();
            let mut p = Particle::spawn(0, None, &mut ctx);
            let mut sink: Vec<Segment> = Vec::new();
            for _ in 0..ticks {
                p.step(&mut ctx, &mut sink);
            }
            sink
        }

        fn ctx(&mut self) -> StepContext<'_> {
            StepContext {
                engine: &mut self.engine,
                controllers: &mut self.controllers,
                scene: &self.scene,
                heightmap: &self.heightmap,
                defaults: &self.defaults,
            }
        }
    }

    #[test]
    fn test_spawn_draws_from_scene() {
        let mut fx = Fixture::new(5.0);
        let p = Particle::spawn(3, None, &mut fx.ctx());
        assert_eq!(p.key().slot, 3);
        assert!(fx.scene.palette.contains(p.base_color()));
        assert_eq!(p.color(), p.base_color());
        assert!(p.size() >= 1.0 && p.size() <= 4.0);
        assert_eq!(p.lifespan(), 5.0);
        assert_eq!(p.age(), 0.0);
        assert!(!p.has_open_stroke());
    }

    #[test]
    fn test_reset_gives_fresh_identity() {
        let mut fx = Fixture::new(5.0);
        let mut ctx = fx.ctx();
        let mut p = Particle::spawn(0, None, &mut ctx);
        let mut sink: Vec<Segment> = Vec::new();
        p.step(&mut ctx, &mut sink);
        assert!(p.has_open_stroke());
        let before = p.key();
        p.reset(&mut ctx);
        assert_eq!(p.key().slot, before.slot);
        assert_ne!(p.key().id, before.id);
        assert_eq!(p.age(), 0.0);
        assert!(!p.has_open_stroke());
    }

    #[test]
    fn test_lifespan_expiry_resets() {
        let mut fx = Fixture::new(3.0);
        let mut ctx = fx.ctx();
        let mut p = Particle::spawn(0, None, &mut ctx);
        let first = p.key();
        let mut sink: Vec<Segment> = Vec::new();
        for expected_age in 1..=3 {
            p.step(&mut ctx, &mut sink);
            assert_eq!(p.age(), expected_age as f32);
            assert_eq!(p.key(), first);
        }
        p.step(&mut ctx, &mut sink);
        assert_eq!(p.age(), 0.0);
        assert_ne!(p.key().id, first.id);
        assert_eq!(sink.len(), 4);
        assert!(!sink[0].continues);
        assert!(sink.iter().all(|s| s.owner == 0));
    }

    #[test]
    fn test_step_samples_heightmap_and_keeps_speed() {
        let mut fx = Fixture::new(50.0);
        let mut ctx = fx.ctx();
        let mut p = Particle::spawn(1, None, &mut ctx);
        let mut sink: Vec<Segment> = Vec::new();
        for _ in 0..20 {
            p.step(&mut ctx, &mut sink);
            assert_eq!(p.heightmap(), HeightmapSample::uniform(0.25));
            let speed = p.velocity().length();
            assert!((1.0 - 1e-4..=3.0 + 1e-4).contains(&speed), "speed {}", speed);
            assert!(ctx.scene.canvas.contains(p.position()));
        }
    }

    fn continues(segments: &[Segment]) -> Vec<bool> {
        segments.iter().map(|s| s.continues).collect()
    }

    #[test]
    fn test_wrap_breaks_stroke_at_seam() {
        let mut fx = Fixture::new(1000.0);
        fx.straight(20.0, "Medium", "Constant");
        let segments = fx.run(6);
        assert_eq!(segments[0].start, Vec2::new(50.0, 50.0));
        assert_eq!(segments[2].end, Vec2::new(110.0, 50.0));
        assert_eq!(segments[3].start, Vec2::new(10.0, 50.0));
        assert_eq!(continues(&segments), [false, true, true, false, true, true]);
    }

    #[test]
    fn test_wrap_continue_keeps_stroke_open() {
        let mut fx = Fixture::new(1000.0);
        fx.defaults.edge_policy = EdgePolicy::WrapContinue;
        fx.straight(20.0, "Medium", "Constant");
        let segments = fx.run(6);
        assert_eq!(segments[3].start, Vec2::new(10.0, 50.0));
        assert_eq!(continues(&segments), [false, true, true, true, true, true]);
        assert!(segments.windows(2).all(|w| w[0].style == w[1].style));
    }

    #[test]
    fn test_rounded_width_change_starts_new_stroke() {
        let mut fx = Fixture::new(8.0);
        fx.defaults.min_size = 1.0;
        fx.defaults.max_size = 5.0;
        fx.straight(1.0, "Grow", "Constant");
        let segments = fx.run(8);
        let widths: Vec<u32> = segments.iter().map(|s| s.style.width).collect();
        assert_eq!(widths, [1, 2, 2, 3, 3, 4, 4, 5]);
        assert_eq!(continues(&segments), [false, false, true, false, true, false, true, false]);
    }

    #[test]
    fn test_color_change_starts_new_stroke() {
        let mut fx = Fixture::new(4.0);
        fx.scene.palette = Palette::new(vec![HexColor::WHITE]).unwrap();
        fx.defaults.min_size = 2.0;
        fx.defaults.max_size = 2.0;
        fx.straight(1.0, "Medium", "FadeOut");
        let segments = fx.run(4);
        assert!(segments.iter().all(|s| s.style.width == 2));
        assert_eq!(segments[0].style.color, HexColor::WHITE);
        assert!(segments.windows(2).all(|w| w[0].style.color != w[1].style.color));
        assert_eq!(continues(&segments), [false; 4]);
    }

    #[test]
    fn test_skip_pattern_hides_segments() {
        let mut fx = Fixture::new(50.0);
        let mut ctx = fx.ctx();
        let skip = SkipPattern::new(&[1, 1]).unwrap();
        let mut p = Particle::spawn(0, Some(skip), &mut ctx);
        let mut sink: Vec<Segment> = Vec::new();
        for _ in 0..6 {
            p.step(&mut ctx, &mut sink);
        }
        assert_eq!(sink.len(), 3);
        assert!(sink.iter().all(|s| !s.continues));
    }
}
