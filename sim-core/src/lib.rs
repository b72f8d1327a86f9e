//! Core 3-D space-colonization tree growth and skinning library.
//!
//! Main components:
//! - [`attractor`] — attraction points and the field that owns them.
//! - [`tree`] — branches and the creation-ordered branch arena.
//! - [`engine`] — the growth state machine.
//! - [`phases`] — the individual passes of one growth iteration.
//! - [`influence_buffer`] — per-branch scratch lists of assigned points.
//! - [`skin`] — radius propagation and ring stitching into a [`mesh::TreeMesh`].
//! - [`mesh`] — indexed triangle mesh with smooth normals.
//! - [`config`] — tunables for growth and skinning.
//! - [`error`] — validation and skinning errors.
//! - [`types`] — shared type aliases and IDs.

pub mod attractor;
pub mod config;
pub mod engine;
pub mod error;
pub mod influence_buffer;
pub mod mesh;
pub mod phases;
pub mod skin;
pub mod tree;
pub mod types;

use crate::{
    config::{Config, SkinConfig},
    engine::{GrowthEngine, StopReason},
    error::Error,
    mesh::TreeMesh,
    tree::BranchTree,
};

/// Result of a full generation run.
#[derive(Debug, Clone)]
pub struct Generated {
    pub tree: BranchTree,
    pub mesh: TreeMesh,
    pub reason: StopReason,
    pub iterations: u32,
}

/// Grows a tree from `cfg` and skins it with `skin_cfg`.
pub fn generate(cfg: Config, skin_cfg: &SkinConfig) -> Result<Generated, Error> {
    let mut engine = GrowthEngine::new(cfg)?;
    let reason = engine.run();
    let iterations = engine.iteration();

    let mut tree = engine.into_tree();
    let mesh = skin::skin(&mut tree, skin_cfg)?;

    Ok(Generated {
        tree,
        mesh,
        reason,
        iterations,
    })
}
