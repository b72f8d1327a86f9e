use crate::types::BranchId;
use glam::Vec3;

/// Per-branch list of the attraction points assigned to it this iteration.
///
/// For each `BranchId`, this buffer stores the positions of the points
/// whose closest branch it is. It is resized and cleared at the start of
/// every assignment pass, so it never carries state across iterations.
#[derive(Debug, Default)]
pub struct InfluenceBuffer {
    points: Vec<Vec<Vec3>>,
}

impl InfluenceBuffer {
    /// Creates a buffer with `len` empty lists.
    pub fn with_len(len: usize) -> Self {
        Self {
            points: vec![Vec::new(); len],
        }
    }

    /// Resizes to exactly `len` lists and clears them all.
    ///
    /// The inner allocations are kept, so steady-state iterations do not
    /// allocate.
    pub fn ensure_len(&mut self, len: usize) {
        self.points.resize_with(len, Vec::new);
        self.clear();
    }

    pub fn clear(&mut self) {
        for list in &mut self.points {
            list.clear();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Registers a point position for branch `id`.
    ///
    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add(&mut self, id: BranchId, pos: Vec3) {
        self.points[id].push(pos);
    }

    #[inline]
    pub fn points(&self, id: BranchId) -> &[Vec3] {
        &self.points[id]
    }

    #[inline]
    pub fn is_influenced(&self, id: BranchId) -> bool {
        !self.points[id].is_empty()
    }

    /// Total number of registered points.
    pub fn total(&self) -> usize {
        self.points.iter().map(Vec::len).sum()
    }

    pub fn influenced_indices(&self) -> impl Iterator<Item = BranchId> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(i, list)| (!list.is_empty()).then_some(i))
    }

    /// Growth direction for a branch ending at `origin`.
    ///
    /// Sums the unit vectors from `origin` to each assigned point and
    /// normalizes the result. Points sitting exactly on `origin` contribute
    /// nothing. Returns `None` when nothing is assigned or the sum cancels
    /// out, so callers never see a NaN direction.
    pub fn growth_direction(&self, id: BranchId, origin: Vec3) -> Option<Vec3> {
        let sum: Vec3 = self.points[id]
            .iter()
            .map(|&p| (p - origin).normalize_or_zero())
            .sum();
        sum.try_normalize()
    }
}
