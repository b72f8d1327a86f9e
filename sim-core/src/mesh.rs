use glam::Vec3;

/// Indexed triangle mesh produced by [`crate::skin::skin`].
///
/// Counter-clockwise winding faces outward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl TreeMesh {
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    /// Adds a vertex with a zero normal and returns its index.
    ///
    /// The caller is responsible for keeping the vertex count within `u32`.
    #[inline]
    pub fn add_vertex(&mut self, position: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(Vec3::ZERO);
        index
    }

    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.triangles.push([i0, i1, i2]);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Flattened index buffer, three entries per triangle.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.triangles.iter().flatten().copied()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }

    /// Recomputes per-vertex normals from the triangles.
    ///
    /// Face normals are accumulated unnormalized, so larger triangles weigh
    /// more. Vertices referenced by no triangle, or only by degenerate ones,
    /// get a zero normal.
    pub fn recompute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vec3::ZERO);

        for &[a, b, c] in &self.triangles {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let p0 = self.positions[a];
            let face = (self.positions[b] - p0).cross(self.positions[c] - p0);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }

        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }
}
