use crate::error::{ConfigError, non_negative, positive};

/// Tunables for one growth run.
///
/// The defaults reproduce the legacy generator: 600 points in a sphere of
/// radius 7.5, half-unit branches, and a 15 iteration bootstrap window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Number of attraction points generated by [`crate::engine::GrowthEngine::new`].
    pub attraction_points: usize,
    /// Radius of the attraction sphere, centered at the origin.
    pub crown_radius: f32,
    /// Seed for the random source. `0` means unseeded.
    pub seed: u64,

    /// A point can only be assigned to a branch ending closer than this.
    pub influence_distance: f32,
    /// A point is consumed once a new branch ends closer than this.
    pub kill_distance: f32,

    /// Length of every branch.
    pub branch_length: f32,
    /// Radius given to newly created branches, before skinning tapers them.
    pub branch_radius: f32,
    /// A branch with this many children no longer spawns.
    pub max_children: usize,

    /// Iterations during which an empty assignment pass grows the tree
    /// straight up instead of stopping.
    pub bootstrap_iterations: u32,
    /// Hard cap on the number of iterations.
    pub max_iterations: u32,

    /// `(min, max)` gap between the bottom of the sphere and the root's start.
    pub trunk_offset: (f32, f32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attraction_points: 600,
            crown_radius: 7.5,
            seed: 0,
            influence_distance: 2.0,
            kill_distance: 1.0,
            branch_length: 0.5,
            branch_radius: 0.03,
            max_children: 3,
            bootstrap_iterations: 15,
            max_iterations: 1000,
            trunk_offset: (5.0, 7.5),
        }
    }
}

impl Config {
    /// Rejects negative or non-finite distances and a zero children cap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("crown_radius", self.crown_radius)?;
        non_negative("influence_distance", self.influence_distance)?;
        non_negative("kill_distance", self.kill_distance)?;
        positive("branch_length", self.branch_length)?;
        non_negative("branch_radius", self.branch_radius)?;

        let (min, max) = self.trunk_offset;
        non_negative("trunk_offset.min", min)?;
        non_negative("trunk_offset.max", max)?;
        if min > max {
            return Err(ConfigError::InvertedTrunkOffset { min, max });
        }

        if self.max_children == 0 {
            return Err(ConfigError::ZeroChildrenCap);
        }
        Ok(())
    }
}

/// Tunables for [`crate::skin::skin`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkinConfig {
    /// Number of quads around each ring.
    pub slice_count: usize,
    /// How much thicker a parent is than its thickest child.
    pub radius_increment: f32,
    /// Close the base ring and every leaf ring with a triangle fan.
    pub cap_ends: bool,
}

impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            slice_count: 8,
            radius_increment: 0.02,
            cap_ends: false,
        }
    }
}

impl SkinConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slice_count < 3 {
            return Err(ConfigError::TooFewSlices(self.slice_count));
        }
        non_negative("radius_increment", self.radius_increment)
    }
}
