//! The growth loop: drives the phases in [`crate::phases`] until the tree
//! stops changing.

use crate::{
    attractor::{AttractionField, seeded_rng},
    config::Config,
    error::ConfigError,
    influence_buffer::InfluenceBuffer,
    phases,
    tree::BranchTree,
    types::BranchId,
};
use glam::Vec3;
use rand::Rng;

/// Why growth ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Every attraction point has been consumed.
    FieldExhausted,
    /// An iteration added no branch.
    NoGrowth,
    /// No point came into range during the bootstrap window.
    Unreachable,
    /// `max_iterations` was reached.
    IterationCap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthState {
    /// The last iteration grew toward attraction points.
    Growing,
    /// The last iteration found no point in range and grew straight up.
    ///
    /// Unlike the classic reading of "stalled" (fallback growth could not
    /// change the tree either), this state is transient: the engine moves
    /// back to [`GrowthState::Growing`] once a point is claimed, and a run
    /// that stays out of reach ends as [`StopReason::Unreachable`].
    Stalled,
    /// Terminal.
    Done(StopReason),
}

impl GrowthState {
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, GrowthState::Done(_))
    }
}

/// Space-colonization simulation over one tree and one attraction field.
///
/// The engine owns both exclusively; iterations are strictly sequential
/// because every assignment pass depends on the branch set left by the
/// previous one.
#[derive(Debug)]
pub struct GrowthEngine {
    cfg: Config,
    tree: BranchTree,
    field: AttractionField,
    acc: InfluenceBuffer,
    state: GrowthState,
    iteration: u32,
    last_spawned: Vec<BranchId>,
}

impl GrowthEngine {
    /// Sets up a run from `cfg` alone.
    ///
    /// Generates `cfg.attraction_points` points in a sphere of
    /// `cfg.crown_radius`, then seeds the root below the sphere at a random
    /// gap drawn from `cfg.trunk_offset`, growing straight up. Both draws
    /// come from the same seeded source, so equal seeds give equal runs.
    pub fn new(cfg: Config) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let mut rng = seeded_rng(cfg.seed);
        let field =
            AttractionField::random_in_sphere(cfg.attraction_points, cfg.crown_radius, &mut rng);

        let (min, max) = cfg.trunk_offset;
        let gap = if min < max {
            rng.random_range(min..max)
        } else {
            min
        };
        let root_start = Vec3::new(0.0, -cfg.crown_radius - gap, 0.0);
        let tree = BranchTree::new(root_start, Vec3::Y, cfg.branch_length, cfg.branch_radius);

        Self::from_parts(cfg, field, tree)
    }

    /// Sets up a run over an existing field and tree.
    ///
    /// Any claims already held by points in `field` are released.
    pub fn from_parts(
        cfg: Config,
        mut field: AttractionField,
        tree: BranchTree,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        field.release_all();

        tracing::debug!(
            points = field.len(),
            root = ?tree.root().start,
            "growth engine ready"
        );

        Ok(Self {
            acc: InfluenceBuffer::with_len(tree.len()),
            cfg,
            tree,
            field,
            state: GrowthState::Growing,
            iteration: 0,
            last_spawned: Vec::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn state(&self) -> GrowthState {
        self.state
    }

    /// Number of iterations run so far.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn tree(&self) -> &BranchTree {
        &self.tree
    }

    pub fn field(&self) -> &AttractionField {
        &self.field
    }

    /// Branches created by the last iteration.
    pub fn last_spawned(&self) -> &[BranchId] {
        &self.last_spawned
    }

    pub fn into_tree(self) -> BranchTree {
        self.tree
    }

    /// Runs a single iteration and returns the resulting state.
    ///
    /// Does nothing once the engine is done.
    pub fn step(&mut self) -> GrowthState {
        if self.state.is_done() {
            return self.state;
        }
        if self.field.is_empty() {
            return self.finish(StopReason::FieldExhausted);
        }
        if self.iteration >= self.cfg.max_iterations {
            return self.finish(StopReason::IterationCap);
        }
        self.iteration += 1;

        let claimed = phases::assignment_phase(&self.tree, &mut self.field, &self.cfg);
        phases::influence_phase(&self.tree, &self.field, &mut self.acc);

        let new_ids = if claimed == 0 {
            if self.iteration >= self.cfg.bootstrap_iterations {
                self.last_spawned.clear();
                return self.finish(StopReason::Unreachable);
            }
            self.state = GrowthState::Stalled;
            vec![phases::fallback_phase(&mut self.tree, &self.cfg)]
        } else {
            self.state = GrowthState::Growing;
            phases::spawn_phase(&mut self.tree, &self.acc, &self.cfg)
        };

        let removed = phases::kill_phase(&self.tree, &mut self.field, &new_ids, &self.cfg);
        self.acc.clear();

        tracing::debug!(
            iteration = self.iteration,
            state = ?self.state,
            claimed,
            spawned = new_ids.len(),
            removed,
            branches = self.tree.len(),
            remaining = self.field.len(),
            "growth iteration"
        );

        self.last_spawned = new_ids;
        if self.last_spawned.is_empty() {
            return self.finish(StopReason::NoGrowth);
        }
        if self.field.is_empty() {
            return self.finish(StopReason::FieldExhausted);
        }
        self.state
    }

    /// Steps until done and returns why growth ended.
    pub fn run(&mut self) -> StopReason {
        loop {
            if let GrowthState::Done(reason) = self.step() {
                return reason;
            }
        }
    }

    fn finish(&mut self, reason: StopReason) -> GrowthState {
        match reason {
            StopReason::Unreachable => tracing::warn!(
                iteration = self.iteration,
                remaining = self.field.len(),
                "no attraction point came into range, stopping"
            ),
            StopReason::IterationCap => tracing::warn!(
                max_iterations = self.cfg.max_iterations,
                remaining = self.field.len(),
                "iteration cap reached, stopping"
            ),
            StopReason::FieldExhausted | StopReason::NoGrowth => {}
        }
        tracing::info!(
            ?reason,
            iterations = self.iteration,
            branches = self.tree.len(),
            remaining = self.field.len(),
            "growth finished"
        );

        self.state = GrowthState::Done(reason);
        self.state
    }
}
