//! Airflow particle field
//!
//! A fixed pool of particles streams from the intake to the exhaust. Each
//! frame every particle moves aft at a constant speed, is sent back to the
//! intake once it leaves the engine, is eased toward the local duct radius
//! when it strays out of its band, and is recolored by thermal zone.
//!
//! The pool is allocated once. Updates mutate it in place and never allocate.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::profile::{AxialZone, target_radius, thermal_color};
use super::tick::FrameInput;
use crate::consts::*;
use crate::error::ConfigError;
use crate::{cartesian_to_polar, polar_to_cartesian};

/// Snapshot of one particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: [f32; 3],
    pub color: [f32; 3],
    /// Fixed at creation, survives recycling
    pub seed: f32,
}

/// Parallel per-particle buffers.
///
/// Only [`FlowField`] writes to them; everything else gets a shared borrow.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffers {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    seeds: Vec<f32>,
}

impl ParticleBuffers {
    fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
            seeds: Vec::with_capacity(count),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    #[inline]
    pub fn seeds(&self) -> &[f32] {
        &self.seeds
    }

    /// Positions as raw bytes, ready for a GPU upload
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as raw bytes, ready for a GPU upload
    pub fn colors_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn get(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.positions.get(index)?,
            color: self.colors[index],
            seed: self.seeds[index],
        })
    }
}

/// Per-zone occupancy of the field, for diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowStats {
    /// Particle count per [`AxialZone`], in `AxialZone::ALL` order
    pub zone_counts: [usize; 5],
    /// Mean distance from the centerline per zone (0 for empty zones)
    pub zone_mean_radius: [f32; 5],
    /// Particles behind the recycle station (exhaust plume)
    pub plume: usize,
}

/// Ease a particle's cross-section position toward the duct band.
///
/// Particles already inside the band are returned unchanged. A particle
/// outside the duct radius, or hugging the centerline upstream of
/// `CORE_LIMIT_X`, moves `RELAX_FACTOR` of the way toward a seed-dithered
/// shell radius along its current bearing.
#[inline]
pub fn relax_cross_section(x: f32, cross: Vec2, seed: f32, elapsed: f32) -> Vec2 {
    let target = target_radius(x);
    let (radius, angle) = cartesian_to_polar(cross);

    let outside = radius > target;
    let on_core = radius < target * CORE_FRACTION && x > CORE_LIMIT_X;
    if !(outside || on_core) {
        return cross;
    }

    let noise = (x * TURBULENCE_SPATIAL + elapsed * TURBULENCE_TEMPORAL).sin() * TURBULENCE_AMPLITUDE;
    let desired = target * (SHELL_BASE + seed * SHELL_SPREAD) + noise;
    cross + (polar_to_cartesian(desired, angle) - cross) * RELAX_FACTOR
}

/// The airflow particle system
#[derive(Debug, Clone)]
pub struct FlowField {
    buffers: ParticleBuffers,
    rng: Pcg32,
}

impl FlowField {
    /// Create `count` particles scattered along the whole duct, so the first
    /// frame already shows a full stream.
    pub fn new(count: usize, seed: u64) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::ZeroParticles);
        }

        let mut rng = Pcg32::seed_from_u64(seed);
        let mut buffers = ParticleBuffers::with_capacity(count);

        for _ in 0..count {
            let x = DOMAIN_MIN_X + rng.random::<f32>() * (DOMAIN_MAX_X - DOMAIN_MIN_X);
            let r = rng.random::<f32>() * target_radius(x);
            let theta = rng.random::<f32>() * TAU;
            let cross = polar_to_cartesian(r, theta);

            buffers.positions.push([x, cross.x, cross.y]);
            buffers.seeds.push(rng.random::<f32>());
            buffers.colors.push(thermal_color(x));
        }

        log::info!("Flow field: {} particles (seed {:#x})", count, seed);
        Ok(Self { buffers, rng })
    }

    #[inline]
    pub fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Advance every particle by one frame. Paused frames touch nothing.
    pub fn update(&mut self, frame: &FrameInput) {
        if !frame.playing {
            return;
        }

        let axial_step = frame.delta * AXIAL_SPEED;
        let elapsed = frame.elapsed;
        let Self { buffers, rng } = self;

        let particles = buffers
            .positions
            .iter_mut()
            .zip(buffers.colors.iter_mut())
            .zip(buffers.seeds.iter());

        for ((position, color), &seed) in particles {
            let [mut x, y, z] = *position;
            let mut cross = Vec2::new(y, z);

            x -= axial_step;

            // Left the engine: respawn somewhere across the intake mouth.
            // Only the seed carries over.
            if x < RECYCLE_X {
                x = RESPAWN_X + rng.random::<f32>() * RESPAWN_SPREAD;
                let r = rng.random::<f32>() * RESPAWN_RADIUS;
                let theta = rng.random::<f32>() * TAU;
                cross = polar_to_cartesian(r, theta);
            }

            cross = relax_cross_section(x, cross, seed, elapsed);

            *position = [x, cross.x, cross.y];
            *color = thermal_color(x);
        }
    }

    /// Zone occupancy and mean radius, for logging
    pub fn stats(&self) -> FlowStats {
        let mut stats = FlowStats::default();
        let mut radius_sum = [0.0f32; 5];

        for &[x, y, z] in &self.buffers.positions {
            let zone = AxialZone::at(x) as usize;
            stats.zone_counts[zone] += 1;
            radius_sum[zone] += Vec2::new(y, z).length();
            if x < RECYCLE_X {
                stats.plume += 1;
            }
        }
        for zone in 0..5 {
            if stats.zone_counts[zone] > 0 {
                stats.zone_mean_radius[zone] = radius_sum[zone] / stats.zone_counts[zone] as f32;
            }
        }
        stats
    }

    /// Overwrite one particle's state
    #[cfg(test)]
    pub(crate) fn place(&mut self, index: usize, position: [f32; 3], seed: f32) {
        self.buffers.positions[index] = position;
        self.buffers.seeds[index] = seed;
        self.buffers.colors[index] = thermal_color(position[0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn playing(delta: f32, elapsed: f32) -> FrameInput {
        FrameInput {
            delta,
            elapsed,
            playing: true,
        }
    }

    #[test]
    fn test_initial_scatter() {
        let field = FlowField::new(PARTICLE_COUNT, 1).unwrap();
        assert_eq!(field.len(), PARTICLE_COUNT);

        for i in 0..field.len() {
            let p = field.buffers().get(i).unwrap();
            let [x, y, z] = p.position;
            assert!((DOMAIN_MIN_X..DOMAIN_MAX_X).contains(&x));
            assert!(Vec2::new(y, z).length() <= target_radius(x) + 1e-5);
            assert!((0.0..1.0).contains(&p.seed));
            assert_eq!(p.color, thermal_color(x));
        }

        // Scatter spans the whole duct
        let stats = field.stats();
        assert!(stats.zone_counts.iter().all(|&n| n > 0));
        assert!(stats.plume > 0);
    }

    #[test]
    fn test_zero_particles_rejected() {
        assert!(matches!(FlowField::new(0, 1), Err(ConfigError::ZeroParticles)));
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = FlowField::new(500, 42).unwrap();
        let mut b = FlowField::new(500, 42).unwrap();
        for frame in 0..120 {
            let input = playing(DT, frame as f32 * DT);
            a.update(&input);
            b.update(&input);
        }
        assert_eq!(a.buffers(), b.buffers());

        let c = FlowField::new(500, 43).unwrap();
        assert_ne!(FlowField::new(500, 42).unwrap().buffers(), c.buffers());
    }

    #[test]
    fn test_count_is_constant() {
        let mut field = FlowField::new(256, 3).unwrap();
        for frame in 0..600 {
            field.update(&playing(DT, frame as f32 * DT));
            assert_eq!(field.len(), 256);
            assert_eq!(field.buffers().colors().len(), 256);
            assert_eq!(field.buffers().seeds().len(), 256);
        }
    }

    #[test]
    fn test_seeds_survive_recycling() {
        let mut field = FlowField::new(256, 9).unwrap();
        let seeds = field.buffers().seeds().to_vec();
        // Long enough for every particle to wrap at least once
        for frame in 0..200 {
            field.update(&playing(0.05, frame as f32 * 0.05));
        }
        assert_eq!(field.buffers().seeds(), &seeds[..]);
    }

    #[test]
    fn test_centerline_particle_scenario() {
        let mut field = FlowField::new(1, 5).unwrap();
        field.place(0, [3.0, 0.0, 0.0], 0.5);

        field.update(&playing(0.1, 0.0));
        let [x, y, z] = field.buffers().positions()[0];
        assert!((x - 1.8).abs() < 1e-5);

        let target = target_radius(x);
        assert!((target - 0.92).abs() < 1e-4);
        let desired = target * (0.8 + 0.5 * 0.4) + (x * 10.0).sin() * 0.05;
        // Angle 0 on the centerline: the particle moves along +y
        assert!((y - desired * 0.1).abs() < 1e-6);
        assert_eq!(z, 0.0);

        // Next frame keeps the same bearing
        field.update(&playing(0.01, 0.1));
        let [_, y2, z2] = field.buffers().positions()[0];
        assert!(y2 > y);
        assert_eq!(z2, 0.0);
    }

    #[test]
    fn test_in_band_particle_is_untouched() {
        let cross = Vec2::new(0.3, 0.2);
        // Combustor: target 0.5, radius ~0.36 is inside [0.1, 0.5]
        assert_eq!(relax_cross_section(0.0, cross, 0.7, 1.23), cross);
    }

    #[test]
    fn test_exhaust_core_is_left_alone() {
        // Downstream of CORE_LIMIT_X the centerline band is not enforced
        let cross = Vec2::new(0.01, 0.0);
        assert_eq!(relax_cross_section(-5.0, cross, 0.5, 0.0), cross);
        assert_ne!(relax_cross_section(-3.5, cross, 0.5, 0.0), cross);
    }

    #[test]
    fn test_outer_particle_eases_inward() {
        let cross = Vec2::new(0.0, 1.5);
        let relaxed = relax_cross_section(0.0, cross, 0.5, 0.0);
        // Moves along its bearing, only 10% of the way
        assert!(relaxed.x.abs() < 1e-6);
        assert!(relaxed.y < 1.5 && relaxed.y > 1.3);
    }

    #[test]
    fn test_turbulence_follows_the_clock() {
        let x = 1.0;
        let seed = 0.25;
        let cross = Vec2::new(0.0, 2.0);
        let target = target_radius(x);
        assert!(cross.length() > target);

        let expected = |elapsed: f32| {
            let noise = (x * 10.0 + elapsed * 5.0).sin() * 0.05;
            let desired = target * (0.8 + 0.4 * seed) + noise;
            2.0 + (desired - 2.0) * 0.1
        };

        let early = relax_cross_section(x, cross, seed, 0.0);
        let late = relax_cross_section(x, cross, seed, 0.3);
        assert!((early.y - expected(0.0)).abs() < 1e-5);
        assert!((late.y - expected(0.3)).abs() < 1e-5);
        assert!(early.x.abs() < 1e-6 && late.x.abs() < 1e-6);
        assert!((early.y - late.y).abs() > 1e-3);
    }

    #[test]
    fn test_byte_views() {
        let field = FlowField::new(10, 2).unwrap();
        assert_eq!(field.buffers().positions_bytes().len(), 10 * 12);
        assert_eq!(field.buffers().colors_bytes().len(), 10 * 12);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_paused_frames_change_nothing(seed in any::<u64>(), frames in 0usize..20, delta in 0.0f32..0.2) {
            let mut field = FlowField::new(200, seed).unwrap();
            field.update(&playing(DT, 0.0));
            let before = field.buffers().clone();
            for i in 0..frames {
                field.update(&FrameInput { delta, elapsed: i as f32, playing: false });
            }
            prop_assert_eq!(field.buffers().positions_bytes(), before.positions_bytes());
            prop_assert_eq!(field.buffers().colors_bytes(), before.colors_bytes());
        }

        #[test]
        fn prop_recycled_particles_land_at_intake(
            x in -12.0f32..-8.0001,
            y in -2.0f32..2.0,
            z in -2.0f32..2.0,
            seed in 0.0f32..1.0,
            delta in 0.0f32..0.1,
        ) {
            let mut field = FlowField::new(1, 11).unwrap();
            field.place(0, [x, y, z], seed);
            field.update(&playing(delta, 0.0));
            let [nx, ..] = field.buffers().positions()[0];
            prop_assert!((RESPAWN_X..=RESPAWN_X + RESPAWN_SPREAD).contains(&nx));
        }

        #[test]
        fn prop_color_follows_position(seed in any::<u64>(), frames in 1usize..30) {
            let mut field = FlowField::new(100, seed).unwrap();
            for i in 0..frames {
                field.update(&playing(DT, i as f32 * DT));
            }
            let buffers = field.buffers();
            for (pos, color) in buffers.positions().iter().zip(buffers.colors()) {
                if pos[0] > 0.0 {
                    prop_assert_eq!(*color, [0.6, 0.8, 1.0]);
                } else {
                    prop_assert_eq!(color[0], 1.0);
                }
            }
        }
    }
}
