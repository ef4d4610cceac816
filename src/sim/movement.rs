//! Discretized movement resolution
//!
//! Moves are kinematic: the agent takes the largest step, no longer than the
//! requested limit, that leaves it clear of every wall. The search is a
//! linear scan downward from the limit in `min_step` increments, so the
//! result is only as tight as the granularity.

use glam::Vec2;

use super::geometry::{Wall, clear_of_walls};

/// Upper bound on `lim / min_step` for one movement scan
pub const MAX_SCAN_STEPS: u32 = 1 << 16;

/// Number of `min_step` decrements needed to scan `lim` down to zero
#[inline]
pub fn scan_steps(lim: f32, min_step: f32) -> u32 {
    // Saturating float-to-int cast keeps huge ratios at u32::MAX
    (lim / min_step).ceil() as u32
}

/// Finds the largest collision-free step for a circle among walls
#[derive(Debug, Clone, Copy)]
pub struct MovementResolver<'a> {
    walls: &'a [Wall],
    radius: f32,
    min_step: f32,
}

impl<'a> MovementResolver<'a> {
    pub fn new(walls: &'a [Wall], radius: f32, min_step: f32) -> Self {
        Self {
            walls,
            radius,
            min_step,
        }
    }

    /// Scan granularity
    #[inline]
    pub fn min_step(&self) -> f32 {
        self.min_step
    }

    /// Whether the mover's circle at `p` touches no wall
    #[inline]
    pub fn is_clear(&self, p: Vec2) -> bool {
        clear_of_walls(p, self.radius, self.walls)
    }

    /// Largest step `s` in `[0, lim]` with `position_at(s)` clear of all walls
    ///
    /// Tests `lim - k * min_step` for `k = 0, 1, ...` while the step stays
    /// positive and returns the first clear one, or 0 when none is. At most
    /// `MAX_SCAN_STEPS + 1` candidates are tested.
    pub fn biggest_step<F>(&self, lim: f32, position_at: F) -> f32
    where
        F: Fn(f32) -> Vec2,
    {
        if !(lim > 0.0) || !lim.is_finite() {
            return 0.0;
        }
        if self.min_step <= 0.0 || !self.min_step.is_finite() {
            // No usable granularity: all-or-nothing
            return if self.is_clear(position_at(lim)) { lim } else { 0.0 };
        }

        let candidates = scan_steps(lim, self.min_step).min(MAX_SCAN_STEPS);
        for k in 0..=candidates {
            let step = lim - k as f32 * self.min_step;
            if step <= 0.0 {
                break;
            }
            if self.is_clear(position_at(step)) {
                return step;
            }
        }
        0.0
    }

    /// Largest step from `origin` along the unit vector `dir`
    pub fn step_along(&self, origin: Vec2, dir: Vec2, lim: f32) -> f32 {
        self.biggest_step(lim, |s| origin + dir * s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_at_wall_face() {
        // Pixel-unit layout: wall spans x in [0, 100], agent radius 40 at x=200
        let walls = [Wall::new(0.0, 0.0, 100.0, 50.0, 0.0)];
        let resolver = MovementResolver::new(&walls, 40.0, 1.0);
        let origin = Vec2::new(200.0, 25.0);
        let step = resolver.step_along(origin, Vec2::NEG_X, 100.0);
        assert_eq!(step, 60.0);
    }

    #[test]
    fn test_free_space_takes_full_step() {
        let walls = [Wall::new(0.0, 0.0, 0.1, 0.1, 0.0)];
        let resolver = MovementResolver::new(&walls, 0.05, 1.0 / 800.0);
        let step = resolver.step_along(Vec2::new(0.5, 0.5), Vec2::X, 1.0 / 64.0);
        assert_eq!(step, 1.0 / 64.0);
    }

    #[test]
    fn test_blocked_returns_zero() {
        // Agent already pressed against a wall on its right
        let walls = [Wall::new(0.55, 0.0, 0.1, 1.0, 0.0)];
        let resolver = MovementResolver::new(&walls, 0.05, 1.0 / 800.0);
        let step = resolver.step_along(Vec2::new(0.5, 0.5), Vec2::X, 1.0 / 64.0);
        assert_eq!(step, 0.0);
    }

    #[test]
    fn test_no_walls_is_always_clear() {
        let resolver = MovementResolver::new(&[], 0.05, 0.01);
        assert_eq!(resolver.biggest_step(0.3, |s| Vec2::splat(s)), 0.3);
    }

    #[test]
    fn test_tiny_granularity_terminates() {
        let walls = [Wall::new(0.55, 0.0, 0.1, 1.0, 0.0)];
        let resolver = MovementResolver::new(&walls, 0.05, 1e-12);
        let step = resolver.step_along(Vec2::new(0.5, 0.5), Vec2::X, 1.0 / 64.0);
        assert_eq!(step, 0.0);
    }

    #[test]
    fn test_non_finite_limit_does_not_move() {
        let resolver = MovementResolver::new(&[], 0.05, 0.01);
        assert_eq!(resolver.biggest_step(f32::INFINITY, |s| Vec2::splat(s)), 0.0);
        assert_eq!(resolver.biggest_step(f32::NAN, |s| Vec2::splat(s)), 0.0);
    }

    #[test]
    fn test_scan_steps() {
        assert_eq!(scan_steps(100.0, 1.0), 100);
        assert_eq!(scan_steps(1.0 / 64.0, 1.0 / 800.0), 13);
        assert_eq!(scan_steps(1.0, 1e-12), u32::MAX);
    }

    #[test]
    fn test_zero_granularity_is_all_or_nothing() {
        let walls = [Wall::new(0.0, 0.0, 100.0, 50.0, 0.0)];
        let resolver = MovementResolver::new(&walls, 40.0, 0.0);
        let origin = Vec2::new(200.0, 25.0);
        assert_eq!(resolver.step_along(origin, Vec2::NEG_X, 100.0), 0.0);
        assert_eq!(resolver.step_along(origin, Vec2::NEG_X, 50.0), 50.0);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn step_is_bounded_and_tight(
            start_x in 150.0..300.0_f32,
            lim in 1.0..200.0_f32,
        ) {
            let walls = [Wall::new(0.0, 0.0, 100.0, 50.0, 0.0)];
            let resolver = MovementResolver::new(&walls, 40.0, 1.0);
            let origin = Vec2::new(start_x, 25.0);
            let at = |s: f32| origin + Vec2::NEG_X * s;

            let step = resolver.biggest_step(lim, at);
            prop_assert!((0.0..=lim).contains(&step));
            if step > 0.0 {
                prop_assert!(resolver.is_clear(at(step)));
            }
            if step > 0.0 && step + 1.0 <= lim {
                prop_assert!(!resolver.is_clear(at(step + 1.0)));
            }
        }
    }
}
