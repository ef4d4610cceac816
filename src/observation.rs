//! Multi-scale observations for perception training
//!
//! A zoomed observation re-rasterizes the same world at `factor` times the
//! base resolution and cuts a base-sized window around a point of interest.
//! Training batches mix the full scene with crops around gold, the agent,
//! wall corners and edges, and random points.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::consts::MAX_RASTER_SIZE;
use crate::error::{ConfigError, ObservationError};
use crate::renderer::{Raster, RenderSink, render_at};
use crate::settings::BatchConfig;
use crate::sim::{Wall, World};

/// Why a crop was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropKind {
    FullScene,
    Gold,
    Agent,
    AgentJitter,
    WallPoint,
    Random,
}

/// Where a batch image came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropInfo {
    pub kind: CropKind,
    /// Crop center in normalized coordinates
    pub center: Vec2,
    /// Magnification; 1 for the full scene
    pub zoom: f32,
}

/// Fixed-size images plus per-image provenance
#[derive(Debug, Clone)]
pub struct TrainingBatch {
    pub images: Vec<Raster>,
    pub crops: Vec<CropInfo>,
}

impl TrainingBatch {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// `(N, 3, H, W)` floats, images in batch order
    pub fn to_planar_f32(&self) -> Vec<f32> {
        self.images
            .iter()
            .flat_map(|image| image.to_planar_f32())
            .collect()
    }

    fn push(&mut self, image: Raster, kind: CropKind, center: Vec2, zoom: f32) {
        self.images.push(image);
        self.crops.push(CropInfo { kind, center, zoom });
    }
}

/// Pixel size of a raster rendered at `factor` times `base`
#[inline]
pub fn zoomed_resolution(base: u32, factor: f32) -> u32 {
    ((base as f32 * factor).round() as u32).max(base)
}

/// Cut a `base x base` window from a raster rendered at magnification `factor`
///
/// The window is centered on `center * factor * base` in raster pixels and
/// clamped so it lies entirely inside the raster.
pub fn crop(
    raster: &Raster,
    center: Vec2,
    factor: f32,
    base: u32,
) -> Result<Raster, ObservationError> {
    if !(factor >= 1.0 && factor.is_finite()) {
        return Err(ObservationError::InvalidZoom(factor));
    }
    if raster.size() < base {
        return Err(ObservationError::RasterTooSmall {
            raster: raster.size(),
            window: base,
        });
    }

    let max_corner = (raster.size() - base) as f32;
    let half = base as f32 / 2.0;
    let pixel_center = center * factor * base as f32;
    let corner = (pixel_center - Vec2::splat(half))
        .floor()
        .clamp(Vec2::ZERO, Vec2::splat(max_corner));

    Ok(raster.window(corner.x as u32, corner.y as u32, base))
}

/// Sample a point on a wall, biased toward its boundary
///
/// 80% a corner, 15% a point on an edge, 5% a point inside.
pub fn sample_wall_point<R: Rng + ?Sized>(wall: &Wall, rng: &mut R) -> Vec2 {
    let corners = wall.corners();
    let roll: f32 = rng.random();

    if roll < 0.8 {
        corners[rng.random_range(0..4)]
    } else if roll < 0.95 {
        let edge = rng.random_range(0..4);
        let t: f32 = rng.random();
        corners[edge].lerp(corners[(edge + 1) % 4], t)
    } else {
        let weights: [f32; 4] = std::array::from_fn(|_| rng.random::<f32>());
        let total: f32 = weights.iter().sum();
        if total <= f32::EPSILON {
            return corners[0];
        }
        corners
            .iter()
            .zip(weights)
            .map(|(&c, w)| c * (w / total))
            .sum()
    }
}

/// Renders observations through its own sink, leaving the engine's untouched
pub struct ObservationSampler<S: RenderSink> {
    sink: S,
    base_resolution: u32,
    config: BatchConfig,
}

impl<S: RenderSink> ObservationSampler<S> {
    pub fn new(sink: S, base_resolution: u32, config: BatchConfig) -> Result<Self, ConfigError> {
        if base_resolution == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "base_resolution",
                reason: "must be positive".into(),
            });
        }
        config.validate()?;
        let largest = zoomed_resolution(base_resolution, config.max_zoom);
        if largest > MAX_RASTER_SIZE {
            return Err(ConfigError::InvalidSetting {
                name: "max_zoom",
                reason: format!("{largest}px zoomed raster exceeds {MAX_RASTER_SIZE}px"),
            });
        }
        Ok(Self {
            sink,
            base_resolution,
            config,
        })
    }

    pub fn base_resolution(&self) -> u32 {
        self.base_resolution
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Rasterize the world at an arbitrary resolution
    pub fn render_at(&mut self, world: &World, resolution: u32) -> Raster {
        render_at(world, &mut self.sink, resolution)
    }

    /// The whole scene at the base resolution
    pub fn full_scene(&mut self, world: &World) -> Raster {
        self.render_at(world, self.base_resolution)
    }

    /// One base-sized crop around `center` at magnification `factor`
    pub fn zoom(
        &mut self,
        world: &World,
        center: Vec2,
        factor: f32,
    ) -> Result<Raster, ObservationError> {
        if !(factor >= 1.0 && factor.is_finite()) {
            return Err(ObservationError::InvalidZoom(factor));
        }
        let resolution = zoomed_resolution(self.base_resolution, factor);
        if resolution > MAX_RASTER_SIZE {
            return Err(ObservationError::InvalidZoom(factor));
        }
        let raster = self.render_at(world, resolution);
        crop(&raster, center, factor, self.base_resolution)
    }

    /// Full scene plus, per sampled zoom factor, crops around points of interest
    ///
    /// Each zoom factor is rendered once and every crop at that factor is cut
    /// from the same raster.
    pub fn build_training_batch<R: Rng + ?Sized>(
        &mut self,
        world: &World,
        rng: &mut R,
    ) -> Result<TrainingBatch, ObservationError> {
        let mut batch = TrainingBatch {
            images: Vec::with_capacity(self.config.batch_len()),
            crops: Vec::with_capacity(self.config.batch_len()),
        };
        let full = self.full_scene(world);
        batch.push(full, CropKind::FullScene, Vec2::splat(0.5), 1.0);

        for _ in 0..self.config.zoom_count {
            let factor = rng.random_range(self.config.min_zoom..=self.config.max_zoom);
            let centers = self.points_of_interest(world, rng);
            let raster = self.render_at(world, zoomed_resolution(self.base_resolution, factor));
            for (kind, center) in centers {
                let image = crop(&raster, center, factor, self.base_resolution)?;
                batch.push(image, kind, center, factor);
            }
        }

        log::debug!(
            "Built training batch: {} images at {}px",
            batch.len(),
            self.base_resolution
        );
        Ok(batch)
    }

    /// Crop centers for one zoom factor, in batch order
    fn points_of_interest<R: Rng + ?Sized>(
        &self,
        world: &World,
        rng: &mut R,
    ) -> Vec<(CropKind, Vec2)> {
        let config = &self.config;
        let mut points = Vec::with_capacity(config.crops_per_zoom());

        for _ in 0..config.gold_crops {
            points.push(if world.gold.is_empty() {
                (CropKind::Random, random_point(rng))
            } else {
                (CropKind::Gold, world.gold[rng.random_range(0..world.gold.len())])
            });
        }

        let agent = world.agent.pos;
        points.push((CropKind::Agent, agent));
        let angle = rng.random_range(0.0..TAU);
        let dist = config.agent_jitter * rng.random::<f32>().sqrt();
        points.push((
            CropKind::AgentJitter,
            agent + Vec2::new(angle.cos(), angle.sin()) * dist,
        ));

        let walls = world.walls();
        for _ in 0..config.wall_crops {
            points.push(if walls.is_empty() {
                (CropKind::Random, random_point(rng))
            } else {
                let wall = &walls[rng.random_range(0..walls.len())];
                (CropKind::WallPoint, sample_wall_point(wall, rng))
            });
        }

        for _ in 0..config.random_crops {
            points.push((CropKind::Random, random_point(rng)));
        }
        points
    }
}

fn random_point<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(rng.random(), rng.random())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{SoftwareCanvas, colors};
    use crate::sim::Level;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sampler(base: u32) -> ObservationSampler<SoftwareCanvas> {
        ObservationSampler::new(SoftwareCanvas::new(base), base, BatchConfig::default()).unwrap()
    }

    fn gold_world() -> World {
        let mut level = Level::boundary_only(0.05);
        level.gold = vec![Vec2::new(0.2, 0.2), Vec2::new(0.8, 0.3)];
        level.walls.push(Wall::new(0.3, 0.6, 0.3, 0.03, 0.4));
        World::new(level)
    }

    #[test]
    fn test_crop_clamps_at_edges() {
        let mut raster = Raster::new(64, colors::BACKGROUND);
        raster.set(0, 0, colors::GOLD);
        raster.set(63, 63, colors::WALL);
        let top_left = crop(&raster, Vec2::ZERO, 2.0, 32).unwrap();
        assert_eq!(top_left.get(0, 0), Some(colors::GOLD));
        let bottom_right = crop(&raster, Vec2::ONE, 2.0, 32).unwrap();
        assert_eq!(bottom_right.get(31, 31), Some(colors::WALL));
    }

    #[test]
    fn test_crop_centers_on_point() {
        let mut raster = Raster::new(64, colors::BACKGROUND);
        raster.set(32, 32, colors::GOLD);
        let window = crop(&raster, Vec2::splat(0.5), 2.0, 32).unwrap();
        assert_eq!(window.get(16, 16), Some(colors::GOLD));
    }

    #[test]
    fn test_crop_rejects_shrinking_zoom() {
        let raster = Raster::new(32, colors::BACKGROUND);
        assert!(matches!(
            crop(&raster, Vec2::splat(0.5), 0.5, 32),
            Err(ObservationError::InvalidZoom(_))
        ));
    }

    #[test]
    fn test_sampler_rejects_oversized_zoom_raster() {
        let config = BatchConfig::default();
        let result = ObservationSampler::new(SoftwareCanvas::new(1024), 1024, config);
        assert!(result.is_ok());
        let config = BatchConfig {
            max_zoom: 16.0,
            ..Default::default()
        };
        let result = ObservationSampler::new(SoftwareCanvas::new(1024), 1024, config);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidSetting { name: "max_zoom", .. })
        ));
    }

    #[test]
    fn test_zoom_rejects_unbounded_factor() {
        let world = gold_world();
        let mut sampler = sampler(32);
        for factor in [f32::INFINITY, f32::NAN, 1.0e6] {
            assert!(matches!(
                sampler.zoom(&world, Vec2::splat(0.5), factor),
                Err(ObservationError::InvalidZoom(_))
            ));
        }
    }

    #[test]
    fn test_zoom_on_gold_is_mostly_gold() {
        let world = gold_world();
        let mut sampler = sampler(32);
        let image = sampler.zoom(&world, Vec2::new(0.2, 0.2), 4.0).unwrap();
        // Gold radius 0.0125 at 128px is a 1.6px-radius disk around the center
        assert_eq!(image.size(), 32);
        assert!(image.count(colors::GOLD) > 0);
        assert_eq!(image.get(16, 16), Some(colors::GOLD));
    }

    #[test]
    fn test_render_at_leaves_world_alone() {
        let world = gold_world();
        let before = world.snapshot();
        let mut sampler = sampler(16);
        let big = sampler.render_at(&world, 100);
        assert_eq!(big.size(), 100);
        assert_eq!(world.snapshot(), before);
    }

    #[test]
    fn test_wall_points_stay_on_wall() {
        let wall = Wall::new(0.3, 0.6, 0.3, 0.03, 0.4);
        let corners = wall.corners();
        let (lo, hi) = wall.bounds();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut on_corner = 0;
        for _ in 0..2000 {
            let p = sample_wall_point(&wall, &mut rng);
            assert!(p.cmpge(lo - 1e-5).all() && p.cmple(hi + 1e-5).all(), "{p:?}");
            assert!(crate::sim::geometry::sd_wall(p, &wall) <= 1e-5);
            if corners.iter().any(|&c| c == p) {
                on_corner += 1;
            }
        }
        // 80% expected
        assert!((1450..1750).contains(&on_corner), "{on_corner} corner samples");
    }

    #[test]
    fn test_batch_composition() {
        let world = gold_world();
        let mut sampler = sampler(24);
        let batch = sampler
            .build_training_batch(&world, &mut Pcg32::seed_from_u64(9))
            .unwrap();
        let config = BatchConfig::default();
        assert_eq!(batch.len(), config.batch_len());
        assert_eq!(batch.crops[0].kind, CropKind::FullScene);
        for image in &batch.images {
            assert_eq!(image.shape(), (24, 24, 3));
        }
        let count = |kind| batch.crops.iter().filter(|c| c.kind == kind).count();
        assert_eq!(count(CropKind::Gold), 4);
        assert_eq!(count(CropKind::Agent), 2);
        assert_eq!(count(CropKind::AgentJitter), 2);
        assert_eq!(count(CropKind::WallPoint), 8);
        assert_eq!(count(CropKind::Random), 4);
        assert_eq!(batch.to_planar_f32().len(), batch.len() * 3 * 24 * 24);
    }

    #[test]
    fn test_batch_without_gold_falls_back_to_random() {
        let world = World::new(Level::boundary_only(0.05));
        let mut sampler = sampler(16);
        let batch = sampler
            .build_training_batch(&world, &mut Pcg32::seed_from_u64(1))
            .unwrap();
        assert!(batch.crops.iter().all(|c| c.kind != CropKind::Gold));
        assert_eq!(batch.len(), BatchConfig::default().batch_len());
    }

    #[test]
    fn test_batch_is_deterministic() {
        let world = gold_world();
        let a = sampler(16)
            .build_training_batch(&world, &mut Pcg32::seed_from_u64(5))
            .unwrap();
        let b = sampler(16)
            .build_training_batch(&world, &mut Pcg32::seed_from_u64(5))
            .unwrap();
        assert_eq!(a.crops, b.crops);
        assert_eq!(a.images, b.images);
    }
}
