use glam::Vec3;
use sim_core::{Generated, engine::StopReason};

/// Headline numbers of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub reason: StopReason,
    pub iterations: u32,
    pub branches: usize,
    pub leaves: usize,
    pub max_depth: usize,
    pub trunk_radius: f32,
    pub vertices: usize,
    pub triangles: usize,
    pub bounds: Option<(Vec3, Vec3)>,
}

impl Summary {
    pub fn of(generated: &Generated) -> Self {
        let tree = &generated.tree;
        let max_depth = (0..tree.len()).map(|id| tree.depth(id)).max().unwrap_or(0);

        Self {
            reason: generated.reason,
            iterations: generated.iterations,
            branches: tree.len(),
            leaves: tree.leaves().count(),
            max_depth,
            trunk_radius: tree.root().radius,
            vertices: generated.mesh.vertex_count(),
            triangles: generated.mesh.triangle_count(),
            bounds: generated.mesh.bounds(),
        }
    }

    pub fn log(&self) {
        tracing::info!(
            reason = ?self.reason,
            iterations = self.iterations,
            branches = self.branches,
            leaves = self.leaves,
            max_depth = self.max_depth,
            trunk_radius = self.trunk_radius,
            "tree grown"
        );
        tracing::info!(
            vertices = self.vertices,
            triangles = self.triangles,
            bounds = ?self.bounds,
            "mesh built"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::config::{Config, SkinConfig};

    #[test]
    fn summary_of_root_only_tree() {
        let cfg = Config {
            attraction_points: 0,
            seed: 3,
            ..Config::default()
        };
        let generated = sim_core::generate(cfg, &SkinConfig::default()).unwrap();
        let summary = Summary::of(&generated);

        assert_eq!(summary.reason, StopReason::FieldExhausted);
        assert_eq!(summary.iterations, 0);
        assert_eq!(summary.branches, 1);
        assert_eq!(summary.leaves, 1);
        assert_eq!(summary.max_depth, 0);
        assert_eq!(summary.vertices, 2 * 9);
        assert_eq!(summary.triangles, 2 * 8);
        assert!(summary.bounds.is_some());
    }

    #[test]
    fn summary_of_grown_tree() {
        let cfg = Config {
            attraction_points: 80,
            crown_radius: 3.0,
            seed: 21,
            ..Config::default()
        };
        let generated = sim_core::generate(cfg, &SkinConfig::default()).unwrap();
        let summary = Summary::of(&generated);

        assert!(summary.branches > 1);
        assert!(summary.max_depth >= 1);
        assert!(summary.leaves >= 1);
        assert!(summary.trunk_radius >= cfg.branch_radius);
        assert_eq!(summary.triangles, 2 * 8 * summary.branches);
    }
}
