use crate::types::BranchId;
use glam::Vec3;

/// A rigid directed segment of the tree.
///
/// The end position is always derived from `start + direction * length`,
/// so it cannot drift from the segment it describes.
#[derive(Debug, Clone)]
pub struct Branch {
    pub start: Vec3,
    /// Unit vector.
    pub direction: Vec3,
    pub length: f32,
    pub radius: f32,
    pub parent: Option<BranchId>,
    pub children: Vec<BranchId>,
    /// First vertex of this branch's ring in the skinned mesh.
    pub starting_index: Option<u32>,
}

impl Branch {
    pub fn new_root(start: Vec3, direction: Vec3, length: f32, radius: f32) -> Self {
        Self {
            start,
            direction,
            length,
            radius,
            parent: None,
            children: Vec::with_capacity(4),
            starting_index: None,
        }
    }

    pub fn new_child(
        parent: BranchId,
        start: Vec3,
        direction: Vec3,
        length: f32,
        radius: f32,
    ) -> Self {
        Self {
            start,
            direction,
            length,
            radius,
            parent: Some(parent),
            children: Vec::with_capacity(4),
            starting_index: None,
        }
    }

    #[inline]
    pub fn end(&self) -> Vec3 {
        self.start + self.direction * self.length
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena of branches in creation order.
///
/// The root is always at index `0`, and every child is created after its
/// parent. Passes that need children before parents can therefore walk the
/// arena backwards instead of doing a post-order traversal.
#[derive(Debug, Clone)]
pub struct BranchTree {
    branches: Vec<Branch>,
}

impl BranchTree {
    pub fn new(root_start: Vec3, direction: Vec3, length: f32, radius: f32) -> Self {
        Self {
            branches: vec![Branch::new_root(root_start, direction, length, radius)],
        }
    }

    /// Appends a child starting at `parent`'s end and returns its id.
    ///
    /// ### Panics
    /// Panics if `parent` is not a valid id.
    pub fn add_child(
        &mut self,
        parent: BranchId,
        direction: Vec3,
        length: f32,
        radius: f32,
    ) -> BranchId {
        let id = self.branches.len();
        let start = self.branches[parent].end();
        self.branches
            .push(Branch::new_child(parent, start, direction, length, radius));
        self.branches[parent].children.push(id);
        id
    }

    #[inline]
    pub fn root(&self) -> &Branch {
        &self.branches[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    /// Always `false`: a tree owns at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    #[inline]
    pub fn get(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: BranchId) -> Option<&mut Branch> {
        self.branches.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Id of the most recently created branch.
    #[inline]
    pub fn last_id(&self) -> BranchId {
        self.branches.len() - 1
    }

    pub fn leaves(&self) -> impl Iterator<Item = BranchId> + '_ {
        self.branches
            .iter()
            .enumerate()
            .filter_map(|(id, b)| b.is_leaf().then_some(id))
    }

    /// Number of parent links between `id` and the root.
    pub fn depth(&self, id: BranchId) -> usize {
        let mut depth = 0;
        let mut cur = self.branches[id].parent;
        while let Some(p) = cur {
            depth += 1;
            cur = self.branches[p].parent;
        }
        depth
    }

    /// Thickens parents so each is at least `increment` wider than every child.
    ///
    /// A single backward pass suffices because a child is always created
    /// after its parent.
    pub fn propagate_radii(&mut self, increment: f32) {
        for id in (1..self.branches.len()).rev() {
            let Some(parent) = self.branches[id].parent else {
                continue;
            };
            let proposed = self.branches[id].radius + increment;
            if self.branches[parent].radius < proposed {
                self.branches[parent].radius = proposed;
            }
        }
    }
}
