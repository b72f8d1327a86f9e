//! The individual passes of one growth iteration.
//!
//! [`crate::engine::GrowthEngine::step`] runs them in this order:
//! 1. [`assignment_phase`] — every point claims its closest branch in range.
//! 2. [`influence_phase`] — claimed points register with their branch in an
//!    [`InfluenceBuffer`].
//! 3. [`fallback_phase`] — only when nothing was claimed: grow straight up.
//! 4. [`spawn_phase`] — influenced branches grow one child each.
//! 5. [`kill_phase`] — points reached by the new branches are removed, and
//!    every claim is released.

use crate::{
    attractor::AttractionField, config::Config, influence_buffer::InfluenceBuffer,
    tree::BranchTree, types::BranchId,
};
use glam::Vec3;

/// Lets every attraction point claim its closest branch within range.
///
/// For each point, all branches are scanned in creation order. A branch
/// becomes the point's closest if its end lies strictly closer than
/// `cfg.influence_distance`, and strictly closer than the end of the branch
/// currently claimed.
///
/// Ties keep the branch seen first, i.e. the older one. This bias is kept
/// for compatibility with the legacy generator; it is order-dependent
/// rather than geometrically motivated.
///
/// ### Parameters
/// - `tree` - The current tree; only read access is required.
/// - `field` - Attraction points. Every claim is rebuilt from scratch, so a
///   claim left over from an earlier pass never survives.
/// - `cfg` - Provides the influence distance.
///
/// ### Returns
/// The number of points that claimed a branch.
pub fn assignment_phase(tree: &BranchTree, field: &mut AttractionField, cfg: &Config) -> usize {
    let mut claimed = 0;

    for point in &mut field.points {
        point.release();
        for (id, branch) in tree.iter().enumerate() {
            let d = branch.end().distance(point.pos);
            if d >= cfg.influence_distance {
                continue;
            }

            let closer = match point.closest().and_then(|c| tree.get(c)) {
                None => true,
                Some(current) => d < point.pos.distance(current.end()),
            };
            if closer {
                point.claim(id);
            }
        }

        if point.closest().is_some() {
            claimed += 1;
        }
    }

    claimed
}

/// Registers every claimed point with its branch.
///
/// The buffer is resized (and cleared) to `tree.len()` first.
pub fn influence_phase(tree: &BranchTree, field: &AttractionField, acc: &mut InfluenceBuffer) {
    acc.ensure_len(tree.len());

    for point in field.iter() {
        if let Some(id) = point.closest() {
            acc.add(id, point.pos);
        }
    }
}

/// Grows one branch straight up from the most recently created branch.
///
/// Used while no point is in range of the tree yet, so a root seeded far
/// below the attraction cloud can reach it.
pub fn fallback_phase(tree: &mut BranchTree, cfg: &Config) -> BranchId {
    tree.add_child(tree.last_id(), Vec3::Y, cfg.branch_length, cfg.branch_radius)
}

/// Spawns one child for every influenced branch below the children cap.
///
/// For each branch with registered points:
///
/// 1. Skip it if it already has `cfg.max_children` children.
/// 2. Sum the unit vectors from its end to each of its points and normalize
///    ([`InfluenceBuffer::growth_direction`]).
/// 3. Skip it if the sum is zero, e.g. when two points pull in exactly
///    opposite directions.
/// 4. Otherwise queue a child of `cfg.branch_length` and `cfg.branch_radius`
///    in that direction.
///
/// Children are appended only after every branch has been considered, so
/// the new branches do not influence each other within an iteration.
///
/// ### Returns
/// Ids of the new branches in creation order.
pub fn spawn_phase(tree: &mut BranchTree, acc: &InfluenceBuffer, cfg: &Config) -> Vec<BranchId> {
    let mut to_add = Vec::with_capacity(16);

    for id in acc.influenced_indices() {
        let Some(branch) = tree.get(id) else {
            continue;
        };
        if branch.children.len() >= cfg.max_children {
            continue;
        }

        match acc.growth_direction(id, branch.end()) {
            Some(dir) => to_add.push((id, dir)),
            None => tracing::trace!(branch = id, "influence cancels out, not spawning"),
        }
    }

    to_add
        .into_iter()
        .map(|(parent, dir)| tree.add_child(parent, dir, cfg.branch_length, cfg.branch_radius))
        .collect()
}

/// Removes points reached by the new branches and releases every claim.
///
/// Only the ends of `new_ids` are tested: older branches already had their
/// chance when they were created.
///
/// ### Returns
/// How many points were removed.
pub fn kill_phase(
    tree: &BranchTree,
    field: &mut AttractionField,
    new_ids: &[BranchId],
    cfg: &Config,
) -> usize {
    let ends: Vec<Vec3> = new_ids
        .iter()
        .filter_map(|&id| tree.get(id))
        .map(|b| b.end())
        .collect();

    let removed = field.remove_reached(&ends, cfg.kill_distance);
    field.release_all();
    removed
}
