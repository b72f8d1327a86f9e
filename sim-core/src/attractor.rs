use crate::types::BranchId;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A target the tree grows toward until a branch reaches it.
///
/// `closest` is scratch state for a single iteration: it is claimed during
/// the assignment pass and released before the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct AttractionPoint {
    pub pos: Vec3,
    closest: Option<BranchId>,
}

impl AttractionPoint {
    pub fn new(pos: Vec3) -> Self {
        Self { pos, closest: None }
    }

    #[inline]
    pub fn closest(&self) -> Option<BranchId> {
        self.closest
    }

    #[inline]
    pub fn claim(&mut self, branch: BranchId) {
        self.closest = Some(branch);
    }

    #[inline]
    pub fn release(&mut self) {
        self.closest = None;
    }
}

/// The live attraction points of one growth run.
#[derive(Debug, Clone, Default)]
pub struct AttractionField {
    pub points: Vec<AttractionPoint>,
}

/// Builds the random source for a run. Seed `0` asks the OS for entropy.
pub fn seeded_rng(seed: u64) -> StdRng {
    if seed == 0 {
        StdRng::from_os_rng()
    } else {
        StdRng::seed_from_u64(seed)
    }
}

impl AttractionField {
    /// Wraps explicit positions, e.g. the vertices of a bounding surface.
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        let points = positions.into_iter().map(AttractionPoint::new).collect();
        Self { points }
    }

    /// Samples `count` points uniformly inside a sphere around the origin.
    ///
    /// Uses rejection sampling in the bounding cube, which keeps the density
    /// uniform without any trigonometry.
    ///
    /// ### Panics
    /// Panics if `radius` is negative or not finite. [`crate::config::Config::validate`]
    /// rejects such radii before a run.
    pub fn random_in_sphere(count: usize, radius: f32, rng: &mut impl Rng) -> Self {
        assert!(
            radius.is_finite() && radius >= 0.0,
            "sphere radius must be finite and non-negative, got {radius}"
        );
        let r2 = radius * radius;
        let positions = (0..count)
            .map(|_| loop {
                let p = Vec3::new(
                    rng.random_range(-radius..=radius),
                    rng.random_range(-radius..=radius),
                    rng.random_range(-radius..=radius),
                );
                if p.length_squared() <= r2 {
                    break p;
                }
            })
            .collect();

        Self::from_positions(positions)
    }

    /// Seeded form of [`AttractionField::random_in_sphere`].
    ///
    /// ### Panics
    /// Same as [`AttractionField::random_in_sphere`].
    pub fn generate(count: usize, radius: f32, seed: u64) -> Self {
        Self::random_in_sphere(count, radius, &mut seeded_rng(seed))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttractionPoint> {
        self.points.iter()
    }

    /// Number of points currently claimed by a branch.
    pub fn claimed(&self) -> usize {
        self.points.iter().filter(|p| p.closest.is_some()).count()
    }

    pub fn release_all(&mut self) {
        for p in &mut self.points {
            p.release();
        }
    }

    /// Removes every point closer than `kill_distance` to any of `ends`.
    ///
    /// Returns how many points were removed.
    pub fn remove_reached(&mut self, ends: &[Vec3], kill_distance: f32) -> usize {
        let before = self.points.len();
        self.points
            .retain(|p| !ends.iter().any(|e| e.distance(p.pos) < kill_distance));
        before - self.points.len()
    }
}
