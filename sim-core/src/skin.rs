//! Turns a finished [`BranchTree`] into a tapered tube mesh.
//!
//! Every branch gets one ring of `slice_count + 1` vertices around its end
//! (the first and last vertex coincide so the seam can be stitched like
//! any other slice). Each ring is stitched to its parent's ring, and the
//! root ring to a synthetic base ring at the root's start, which yields one
//! continuous surface instead of a cylinder per branch.

use crate::{
    config::SkinConfig,
    error::SkinError,
    mesh::TreeMesh,
    tree::BranchTree,
};
use glam::{Quat, Vec3};
use std::f32::consts::TAU;

/// Skins `tree` and returns the mesh.
///
/// Mutates the tree: radii are propagated from the leaves toward the root
/// (see [`BranchTree::propagate_radii`]) and every branch's
/// `starting_index` is set to the first vertex of its ring.
///
/// Vertex layout: the base ring occupies `0..=slice_count`, then one ring
/// per branch in creation order. With `cfg.cap_ends`, one center vertex for
/// the base cap and one per leaf follow the rings.
pub fn skin(tree: &mut BranchTree, cfg: &SkinConfig) -> Result<TreeMesh, SkinError> {
    cfg.validate()?;

    let slices = cfg.slice_count;
    let leaves = tree.leaves().count();

    let cap_vertices = if cfg.cap_ends { 1 + leaves } else { 0 };
    let vertex_count = slices
        .checked_add(1)
        .and_then(|ring_len| ring_len.checked_mul(tree.len() + 1))
        .and_then(|rings| rings.checked_add(cap_vertices))
        .ok_or(SkinError::TooManyVertices(usize::MAX))?;
    if u32::try_from(vertex_count).is_err() {
        return Err(SkinError::TooManyVertices(vertex_count));
    }
    let cap_triangles = if cfg.cap_ends { slices * (1 + leaves) } else { 0 };
    let mut mesh = TreeMesh::with_capacity(vertex_count, 2 * slices * tree.len() + cap_triangles);

    tree.propagate_radii(cfg.radius_increment);

    let root = tree.root();
    let base = push_ring(&mut mesh, root.start, root.direction, root.radius, slices);

    let mut ring_starts = Vec::with_capacity(tree.len());
    for id in 0..tree.len() {
        let Some(branch) = tree.get_mut(id) else {
            continue;
        };
        let start = push_ring(
            &mut mesh,
            branch.end(),
            branch.direction,
            branch.radius,
            slices,
        );
        branch.starting_index = Some(start);
        ring_starts.push(start);
    }

    for (id, branch) in tree.iter().enumerate() {
        let bottom = match branch.parent {
            Some(parent) => ring_starts[parent],
            None => base,
        };
        stitch(&mut mesh, bottom, ring_starts[id], slices);
    }

    if cfg.cap_ends {
        let root = tree.root();
        let center = mesh.add_vertex(root.start);
        fan(&mut mesh, center, base, slices, false);

        for id in tree.leaves() {
            let Some(leaf) = tree.get(id) else {
                continue;
            };
            let center = mesh.add_vertex(leaf.end());
            fan(&mut mesh, center, ring_starts[id], slices, true);
        }
    }

    mesh.recompute_normals();

    tracing::debug!(
        branches = tree.len(),
        slices,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "skinned tree"
    );
    Ok(mesh)
}

/// Emits a closed ring of `slices + 1` vertices and returns its first index.
///
/// The circle is built in the XZ plane and turned onto `direction` with the
/// shortest-arc rotation from +Y, so twist around the branch axis is not
/// controlled.
fn push_ring(mesh: &mut TreeMesh, center: Vec3, direction: Vec3, radius: f32, slices: usize) -> u32 {
    let rotation = Quat::from_rotation_arc(Vec3::Y, direction);
    let theta = TAU / slices as f32;

    let first = mesh.vertex_count() as u32;
    for j in 0..=slices {
        let angle = j as f32 * theta;
        let local = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
        mesh.add_vertex(center + rotation * local);
    }
    first
}

/// Connects two rings with one quad per slice.
fn stitch(mesh: &mut TreeMesh, bottom: u32, top: u32, slices: usize) {
    for j in 0..slices as u32 {
        mesh.add_triangle(bottom + j, top + j, bottom + j + 1);
        mesh.add_triangle(bottom + j + 1, top + j, top + j + 1);
    }
}

/// Closes a ring with a triangle fan; `facing_along` picks the side that
/// faces outward relative to the branch direction.
fn fan(mesh: &mut TreeMesh, center: u32, ring: u32, slices: usize, facing_along: bool) {
    for j in 0..slices as u32 {
        if facing_along {
            mesh.add_triangle(center, ring + j + 1, ring + j);
        } else {
            mesh.add_triangle(center, ring + j, ring + j + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, engine::GrowthEngine};
    use std::collections::HashSet;

    fn forked_tree() -> BranchTree {
        let mut tree = BranchTree::new(Vec3::ZERO, Vec3::Y, 1.0, 0.05);
        let a = tree.add_child(0, Vec3::new(1.0, 1.0, 0.0).normalize(), 1.0, 0.05);
        tree.add_child(0, Vec3::new(-1.0, 1.0, 0.0).normalize(), 1.0, 0.05);
        tree.add_child(a, Vec3::Y, 1.0, 0.05);
        tree
    }

    fn grown_tree(seed: u64) -> BranchTree {
        let cfg = Config {
            attraction_points: 150,
            crown_radius: 3.0,
            seed,
            ..Config::default()
        };
        let mut engine = GrowthEngine::new(cfg).unwrap();
        engine.run();
        engine.into_tree()
    }

    fn assert_no_duplicate_triangles(mesh: &TreeMesh) {
        let mut seen = HashSet::new();
        for tri in &mesh.triangles {
            let mut key = *tri;
            key.sort_unstable();
            assert!(seen.insert(key), "duplicate triangle {tri:?}");
        }
    }

    #[test]
    fn single_root_yields_one_tube() {
        let mut tree = BranchTree::new(Vec3::ZERO, Vec3::Y, 2.0, 0.5);
        let cfg = SkinConfig {
            slice_count: 6,
            ..SkinConfig::default()
        };

        let mesh = skin(&mut tree, &cfg).unwrap();

        assert_eq!(mesh.vertex_count(), 2 * 7);
        assert_eq!(mesh.triangle_count(), 2 * 6);
        assert_eq!(tree.root().starting_index, Some(7));
        // Root radius untouched: no children to propagate from.
        assert_eq!(tree.root().radius, 0.5);

        for (i, p) in mesh.positions.iter().enumerate() {
            let expected_y = if i < 7 { 0.0 } else { 2.0 };
            assert!((p.y - expected_y).abs() < 1e-5);
            assert!((Vec3::new(p.x, 0.0, p.z).length() - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn tube_normals_point_away_from_axis() {
        let mut tree = BranchTree::new(Vec3::ZERO, Vec3::Y, 2.0, 0.5);
        let mesh = skin(&mut tree, &SkinConfig::default()).unwrap();

        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let radial = Vec3::new(p.x, 0.0, p.z).normalize();
            assert!(n.dot(radial) > 0.9, "normal {n:?} at {p:?}");
        }
    }

    #[test]
    fn rings_are_perpendicular_to_branch_and_centered_on_end() {
        let mut tree = forked_tree();
        let mesh = skin(&mut tree, &SkinConfig::default()).unwrap();

        for b in tree.iter() {
            let start = b.starting_index.unwrap() as usize;
            let ring = &mesh.positions[start..start + 9];
            assert!(ring[0].distance(ring[8]) < 1e-5, "ring not closed");
            for &p in ring {
                let offset = p - b.end();
                assert!(offset.dot(b.direction).abs() < 1e-5);
                assert!((offset.length() - b.radius).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn children_stitch_to_parent_ring() {
        let mut tree = forked_tree();
        let slices = 8u32;
        let mesh = skin(&mut tree, &SkinConfig::default()).unwrap();

        // Root stitch uses the base ring at offset 0.
        let root_top = tree.root().starting_index.unwrap();
        assert_eq!(mesh.triangles[0], [0, root_top, 1]);

        // Branch 3 is stitched between branch 1's ring and its own.
        let bottom = tree.get(1).unwrap().starting_index.unwrap();
        let top = tree.get(3).unwrap().starting_index.unwrap();
        let first = 3 * 2 * slices as usize;
        assert_eq!(mesh.triangles[first], [bottom, top, bottom + 1]);
        assert_eq!(mesh.triangles[first + 1], [bottom + 1, top, top + 1]);
    }

    #[test]
    fn mesh_has_two_triangles_per_slice_per_branch_and_no_duplicates() {
        let mut tree = forked_tree();
        let cfg = SkinConfig {
            slice_count: 5,
            ..SkinConfig::default()
        };
        let mesh = skin(&mut tree, &cfg).unwrap();

        assert_eq!(mesh.triangle_count(), 2 * 5 * tree.len());
        assert_eq!(mesh.vertex_count(), 6 * (tree.len() + 1));
        assert!(mesh.indices().all(|i| (i as usize) < mesh.vertex_count()));
        assert_no_duplicate_triangles(&mesh);
    }

    #[test]
    fn radius_propagation_tapers_forked_tree() {
        let mut tree = forked_tree();
        let cfg = SkinConfig {
            radius_increment: 0.1,
            ..SkinConfig::default()
        };
        skin(&mut tree, &cfg).unwrap();

        assert!((tree.get(1).unwrap().radius - 0.15).abs() < 1e-6);
        assert!((tree.get(2).unwrap().radius - 0.05).abs() < 1e-6);
        assert!((tree.root().radius - 0.25).abs() < 1e-6);
    }

    #[test]
    fn grown_trees_keep_taper_and_closure() {
        for seed in [3, 8, 21] {
            let mut tree = grown_tree(seed);
            let cfg = SkinConfig::default();
            let mesh = skin(&mut tree, &cfg).unwrap();

            for b in tree.iter() {
                for &c in &b.children {
                    assert!(b.radius >= tree.get(c).unwrap().radius, "seed {seed}");
                }
            }
            assert_eq!(mesh.triangle_count(), 2 * cfg.slice_count * tree.len());
            assert_no_duplicate_triangles(&mesh);
            assert!(mesh.positions.iter().all(|p| p.is_finite()));
            assert!(mesh.normals.iter().all(|n| n.is_finite()));
        }
    }

    #[test]
    fn skinning_is_deterministic_for_a_seed() {
        let mut a = grown_tree(13);
        let mut b = grown_tree(13);
        let cfg = SkinConfig::default();
        assert_eq!(skin(&mut a, &cfg).unwrap(), skin(&mut b, &cfg).unwrap());
    }

    #[test]
    fn downward_branch_ring_is_not_degenerate() {
        let mut tree = BranchTree::new(Vec3::ZERO, Vec3::NEG_Y, 1.0, 0.2);
        let mesh = skin(&mut tree, &SkinConfig::default()).unwrap();

        let start = tree.root().starting_index.unwrap() as usize;
        for &p in &mesh.positions[start..start + 9] {
            assert!(p.is_finite());
            assert!(((p - Vec3::NEG_Y).length() - 0.2).abs() < 1e-5);
        }
    }

    #[test]
    fn caps_close_base_and_leaves() {
        let mut tree = forked_tree();
        let cfg = SkinConfig {
            cap_ends: true,
            ..SkinConfig::default()
        };
        let mesh = skin(&mut tree, &cfg).unwrap();

        let leaves = tree.leaves().count();
        assert_eq!(leaves, 2);
        assert_eq!(
            mesh.triangle_count(),
            2 * 8 * tree.len() + 8 * (1 + leaves)
        );
        assert_eq!(mesh.vertex_count(), 9 * (tree.len() + 1) + 1 + leaves);
        assert_no_duplicate_triangles(&mesh);

        // Base cap faces down, leaf caps face along their branch.
        let base_center = 9 * (tree.len() + 1);
        assert!(mesh.normals[base_center].dot(Vec3::NEG_Y) > 0.99);
        let leaf = tree.get(3).unwrap();
        assert!(mesh.normals[base_center + 2].dot(leaf.direction) > 0.99);
    }

    #[test]
    fn huge_slice_count_is_rejected_without_overflow() {
        let mut tree = forked_tree();
        let cfg = SkinConfig {
            slice_count: usize::MAX / 2,
            ..SkinConfig::default()
        };
        assert!(matches!(
            skin(&mut tree, &cfg),
            Err(SkinError::TooManyVertices(_))
        ));

        let cfg = SkinConfig {
            slice_count: usize::MAX,
            cap_ends: true,
            ..SkinConfig::default()
        };
        assert!(matches!(
            skin(&mut tree, &cfg),
            Err(SkinError::TooManyVertices(_))
        ));
        assert!(tree.iter().all(|b| b.starting_index.is_none()));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut tree = forked_tree();
        let cfg = SkinConfig {
            slice_count: 2,
            ..SkinConfig::default()
        };
        assert!(matches!(skin(&mut tree, &cfg), Err(SkinError::Config(_))));
        // Nothing was touched.
        assert!(tree.iter().all(|b| b.starting_index.is_none()));
    }
}
