//! Logical indexing on the node lattice of a structured mesh.
//!
//! Every geometric computation on a [`LogicallyOrthogonalMesh`
//! ][crate::LogicallyOrthogonalMesh] works by gathering
//! the nodes at fixed logical offsets from a base point
//! (the corners of a cell, the ends of an edge etc.)
//! and combining their positions.
//! The offsets are named with the letters `A` to `H`:
//!
//! ```text
//!          node(i,j,k+1)       node(i,j+1,k+1)
//!              E --------------- F
//!             /|               / |
//!            / |              /  |
//!           /  |             /   |
//!    node(i,j,k)         node(i,j+1,k)
//!         A -------------- B     |
//!         |    H ----------|---- G
//!         |   /            |   /
//!         |  /             |  /
//!         | /              | /
//!         D -------------- C
//!    node(i+1,j,k)      node(i+1,j+1,k)
//! ```
//!
//! In 2D only the bottom four corners `A`, `B`, `C`, `D` exist.
//! The volume, area and normal computations rely on this exact winding,
//! so the tables in this module must not be reordered.

use itertools::izip;

use self::Corner::*;

/// One of the logical axes of a lattice.
///
/// The discriminant is the index of the axis,
/// and faces and edges of the mesh are always ordered by family
/// in the order X, Y, Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The first logical axis, `i`.
    X = 0,
    /// The second logical axis, `j`.
    Y = 1,
    /// The third logical axis, `k`. Only present in 3D.
    Z = 2,
}

impl Axis {
    /// All axes in family order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Index of the axis in coordinate vectors and lattice shapes.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Iterate over the axes of a `dim`-dimensional lattice in family order.
    #[inline]
    pub fn up_to(dim: usize) -> impl Iterator<Item = Axis> {
        Self::ALL.into_iter().take(dim)
    }
}

/// A named corner of a lattice cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Node at offset (0, 0, 0).
    A,
    /// Node at offset (0, 1, 0).
    B,
    /// Node at offset (1, 1, 0).
    C,
    /// Node at offset (1, 0, 0).
    D,
    /// Node at offset (0, 0, 1).
    E,
    /// Node at offset (0, 1, 1).
    F,
    /// Node at offset (1, 1, 1).
    G,
    /// Node at offset (1, 0, 1).
    H,
}

impl Corner {
    /// Logical displacement of the corner from the cell's base node `A`
    /// along the axes `i`, `j`, `k`.
    #[inline]
    pub const fn offset(self) -> [usize; 3] {
        match self {
            A => [0, 0, 0],
            B => [0, 1, 0],
            C => [1, 1, 0],
            D => [1, 0, 0],
            E => [0, 0, 1],
            F => [0, 1, 1],
            G => [1, 1, 1],
            H => [1, 0, 1],
        }
    }

    /// All corners of a cell in a `dim`-dimensional lattice.
    #[inline]
    pub fn all(dim: usize) -> &'static [Corner] {
        match dim {
            2 => &CORNERS_2D,
            3 => &CORNERS_3D,
            _ => panic!("Only 2D and 3D lattices have named corners"),
        }
    }
}

/// Corners of a 2D cell, winding around the quadrilateral.
pub const CORNERS_2D: [Corner; 4] = [A, B, C, D];
/// Corners of a 3D cell: the `k` face winding like [`CORNERS_2D`],
/// followed by the same winding on the `k + 1` face.
pub const CORNERS_3D: [Corner; 8] = [A, B, C, D, E, F, G, H];

/// The two nodes of a face of each family in a 2D mesh.
///
/// They are ordered from tail to head of the face edge
/// so that rotating the edge vector `(dx, dy)` into `(dy, -dx)`
/// points toward the positive direction of the family's axis.
pub const FACE_CORNERS_2D: [[Corner; 2]; 2] = [[A, B], [D, A]];

/// The four nodes of a face of each family in a 3D mesh,
/// wound so that the per-corner cross products
/// point toward the positive direction of the family's axis.
pub const FACE_CORNERS_3D: [[Corner; 4]; 3] = [[A, E, F, B], [A, D, H, E], [A, B, C, D]];

/// The near and far node of an edge of each family.
pub const EDGE_CORNERS: [[Corner; 2]; 3] = [[A, D], [A, B], [A, E]];

/// Two different ways of splitting a hexahedral cell into five tetrahedra.
///
/// Each decomposition cuts off four corner tetrahedra
/// and leaves one in the middle.
/// Cell volumes are the average of the two.
pub const TETRA_DECOMPOSITIONS: [[[Corner; 4]; 5]; 2] = [
    [[A, B, D, E], [B, E, F, G], [B, D, E, G], [B, C, D, G], [D, E, G, H]],
    [[A, F, B, C], [A, E, F, H], [A, H, F, C], [C, H, D, A], [C, G, H, F]],
];

/// The corners of a face of the given family in a `dim`-dimensional mesh.
pub fn face_corners(dim: usize, axis: Axis) -> &'static [Corner] {
    assert!(axis.index() < dim, "No {axis:?} faces in a {dim}D mesh");
    match dim {
        2 => &FACE_CORNERS_2D[axis.index()],
        3 => &FACE_CORNERS_3D[axis.index()],
        _ => panic!("Only 2D and 3D meshes have faces"),
    }
}

/// The near and far corner of an edge of the given family.
#[inline]
pub fn edge_corners(axis: Axis) -> [Corner; 2] {
    EDGE_CORNERS[axis.index()]
}

/// Cell and node counts of a `DIM`-dimensional structured lattice.
///
/// All lattices are addressed in column-major order,
/// i.e. the first axis varies fastest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lattice<const DIM: usize> {
    cells: [usize; DIM],
}

impl<const DIM: usize> Lattice<DIM> {
    /// Create a lattice with the given number of cells along each axis.
    #[inline]
    pub fn new(cells: [usize; DIM]) -> Self {
        Self { cells }
    }

    /// Number of cells along each axis.
    #[inline]
    pub fn cells(&self) -> [usize; DIM] {
        self.cells
    }

    /// Number of nodes along each axis.
    #[inline]
    pub fn nodes(&self) -> [usize; DIM] {
        self.cells.map(|n| n + 1)
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.iter().product()
    }

    /// Total number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes().iter().product()
    }

    /// Shape of the lattice of faces normal to `axis`:
    /// nodes along `axis`, cells along the others.
    pub fn face_shape(&self, axis: Axis) -> [usize; DIM] {
        assert!(axis.index() < DIM, "No {axis:?} faces in a {DIM}D lattice");
        let mut shape = self.cells;
        shape[axis.index()] += 1;
        shape
    }

    /// Shape of the lattice of edges parallel to `axis`:
    /// cells along `axis`, nodes along the others.
    pub fn edge_shape(&self, axis: Axis) -> [usize; DIM] {
        assert!(axis.index() < DIM, "No {axis:?} edges in a {DIM}D lattice");
        let mut shape = self.nodes();
        shape[axis.index()] -= 1;
        shape
    }

    /// Number of faces normal to `axis`.
    #[inline]
    pub fn face_count(&self, axis: Axis) -> usize {
        self.face_shape(axis).iter().product()
    }

    /// Number of faces in all families.
    pub fn total_face_count(&self) -> usize {
        Axis::up_to(DIM).map(|axis| self.face_count(axis)).sum()
    }

    /// Number of edges parallel to `axis`.
    #[inline]
    pub fn edge_count(&self, axis: Axis) -> usize {
        self.edge_shape(axis).iter().product()
    }

    /// Number of edges in all families.
    pub fn total_edge_count(&self) -> usize {
        Axis::up_to(DIM).map(|axis| self.edge_count(axis)).sum()
    }

    /// Range of the faces normal to `axis`
    /// in arrays holding values for all faces, ordered by family.
    pub fn face_range(&self, axis: Axis) -> std::ops::Range<usize> {
        let start: usize = Axis::up_to(axis.index())
            .map(|a| self.face_count(a))
            .sum();
        start..start + self.face_count(axis)
    }

    /// Range of the edges parallel to `axis`
    /// in arrays holding values for all edges, ordered by family.
    pub fn edge_range(&self, axis: Axis) -> std::ops::Range<usize> {
        let start: usize = Axis::up_to(axis.index())
            .map(|a| self.edge_count(a))
            .sum();
        start..start + self.edge_count(axis)
    }

    /// Compute flat node indices of the given corners
    /// for every element of a sub-lattice with the given shape.
    ///
    /// The shape is usually the cell lattice,
    /// or a face or edge lattice where one axis is one longer or shorter.
    /// Elements are visited in column-major order
    /// and the result is stored flat with `corners.len()` indices per element,
    /// so it can be iterated with `chunks_exact(corners.len())`.
    ///
    /// Panics if a corner doesn't exist in this dimension
    /// or the shape doesn't fit inside the node lattice with the given corners.
    pub fn index_corners(&self, corners: &[Corner], shape: [usize; DIM]) -> Vec<usize> {
        assert!(DIM <= 3, "Named corners only exist up to 3 dimensions");
        let nodes = self.nodes();
        for corner in corners {
            let offset = corner.offset();
            assert!(
                offset.iter().skip(DIM).all(|&o| o == 0),
                "Corner {corner:?} does not exist in a {DIM}D lattice"
            );
            for axis in 0..DIM {
                assert!(
                    shape[axis] == 0 || shape[axis] + offset[axis] <= nodes[axis],
                    "Corner {corner:?} of a lattice with shape {shape:?} \
                     is outside the node lattice {nodes:?}"
                );
            }
        }

        let mut strides = [1usize; DIM];
        for axis in 1..DIM {
            strides[axis] = strides[axis - 1] * nodes[axis - 1];
        }
        // flat distance of each corner from the base node
        let corner_steps: Vec<usize> = corners
            .iter()
            .map(|corner| izip!(corner.offset(), strides).map(|(o, s)| o * s).sum::<usize>())
            .collect();

        let element_count: usize = shape.iter().product();
        let mut indices = Vec::with_capacity(element_count * corners.len());
        let mut sub = [0usize; DIM];
        for _ in 0..element_count {
            let base: usize = izip!(sub, strides).map(|(i, s)| i * s).sum();
            indices.extend(corner_steps.iter().map(|step| base + step));

            // advance the subscript, first axis fastest
            for axis in 0..DIM {
                sub[axis] += 1;
                if sub[axis] < shape[axis] {
                    break;
                }
                sub[axis] = 0;
            }
        }

        indices
    }
}
