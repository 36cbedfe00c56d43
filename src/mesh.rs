//! The logically orthogonal mesh and its lazily computed geometry.

/// Staggered grids: cell, face and edge centers.
mod staggered;
/// Volumes, areas, normals, lengths and tangents.
mod measures;

use nalgebra as na;
use nalgebra_sparse as nas;

use std::{cell::OnceCell, rc::Rc};

use crate::{
    grid::NodeArray,
    lattice::{Axis, Lattice},
};

/// Error in constructing a [`LogicallyOrthogonalMesh`].
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum MeshError {
    /// The mesh dimension is not 2 or 3.
    /// (A 1D mesh is just a set of intervals and doesn't need this structure.)
    #[error("Only 2D and 3D logically orthogonal meshes are supported, not {0}D")]
    UnsupportedDimension(usize),
    /// The number of coordinate arrays doesn't match the mesh dimension.
    #[error("Expected {expected} coordinate arrays, got {found}")]
    ComponentCount {
        /// The mesh dimension.
        expected: usize,
        /// Number of arrays given.
        found: usize,
    },
    /// A coordinate array's data doesn't fill its shape.
    #[error("Coordinate array {component} has shape {shape:?} but {len} values")]
    InconsistentArray {
        /// Index of the offending array.
        component: usize,
        /// Shape of the array.
        shape: Vec<usize>,
        /// Number of values in the array.
        len: usize,
    },
    /// A coordinate array has a different shape than the first one.
    #[error("Coordinate array {component} has shape {found:?}, but array 0 has shape {expected:?}")]
    ShapeMismatch {
        /// Index of the offending array.
        component: usize,
        /// Shape of the first array.
        expected: Vec<usize>,
        /// Shape of the offending array.
        found: Vec<usize>,
    },
    /// The coordinate arrays don't have one axis per spatial dimension.
    #[error("Coordinate arrays have {rank} axes, expected one per component ({components})")]
    RankMismatch {
        /// Number of axes in the arrays.
        rank: usize,
        /// Number of coordinate arrays.
        components: usize,
    },
    /// An axis has too few nodes to form any cells.
    #[error("Axis {axis} has {nodes} nodes, at least 2 are needed")]
    TooFewNodes {
        /// Index of the axis.
        axis: usize,
        /// Number of nodes along the axis.
        nodes: usize,
    },
    /// A flat vertex list doesn't match the size of the lattice.
    #[error("Expected {expected} vertices for the lattice, got {found}")]
    VertexCount {
        /// Number of nodes in the lattice.
        expected: usize,
        /// Number of vertices given.
        found: usize,
    },
}

/// A structured mesh with rectangular lattice connectivity
/// and arbitrary (curvilinear) node positions.
///
/// Nodes, cells, faces and edges are all ordered column-major
/// over their respective lattices (see [`Lattice`]),
/// and values for faces and edges are concatenated by family
/// in the order X, Y, Z (see [`Lattice::face_range`]).
///
/// All derived quantities are computed on first access and cached.
/// The nodes can't be changed after construction,
/// so the caches never need to be invalidated.
#[derive(Clone, Debug)]
pub struct LogicallyOrthogonalMesh<const DIM: usize> {
    /// Node positions stored in a Rc so that clones of the mesh share them.
    /// Mutation after creation is not supported.
    nodes: Rc<[na::SVector<f64, DIM>]>,
    lattice: Lattice<DIM>,
    //
    // caches
    //
    /// sparse map from nodes to cells,
    /// also used to compute the cell centers
    node_to_cell: OnceCell<nas::CsrMatrix<f64>>,
    cell_centers: OnceCell<Vec<na::SVector<f64, DIM>>>,
    face_centers: [OnceCell<Vec<na::SVector<f64, DIM>>>; DIM],
    edge_centers: [OnceCell<Vec<na::SVector<f64, DIM>>>; DIM],
    cell_volumes: OnceCell<Vec<f64>>,
    /// areas and raw normals are computed from the same cross products
    /// so they're stored together
    faces: OnceCell<FaceGeometry<DIM>>,
    /// averaged unit normals, derived from the raw normals in `faces`
    face_normals: OnceCell<Vec<na::SVector<f64, DIM>>>,
    edges: OnceCell<EdgeGeometry<DIM>>,
}

/// Face areas and unaveraged normals of all face families.
#[derive(Clone, Debug)]
struct FaceGeometry<const DIM: usize> {
    areas: Vec<f64>,
    /// unnormalized normals, `normals_per_face` for each face
    raw_normals: Vec<na::SVector<f64, DIM>>,
    /// 1 in 2D where a face is a line segment,
    /// 4 in 3D where each corner of a quad has its own normal
    normals_per_face: usize,
}

/// Edge lengths and unit tangents of all edge families.
#[derive(Clone, Debug)]
struct EdgeGeometry<const DIM: usize> {
    lengths: Vec<f64>,
    tangents: Vec<na::SVector<f64, DIM>>,
}

/// Check that a mesh of this dimension is supported.
fn check_dimension<const DIM: usize>() -> Result<(), MeshError> {
    if (2..=3).contains(&DIM) {
        Ok(())
    } else {
        Err(MeshError::UnsupportedDimension(DIM))
    }
}

impl<const DIM: usize> LogicallyOrthogonalMesh<DIM> {
    /// Construct a mesh from node coordinate arrays.
    ///
    /// `nodes` holds one array per coordinate (x, y, then z in 3D),
    /// each giving that coordinate for every node of the lattice.
    /// All arrays must have the same shape with one axis per dimension,
    /// and at least two nodes along each axis.
    /// [`grid::ndgrid`][crate::grid::ndgrid] produces arrays like this
    /// for tensor-product grids.
    ///
    /// ```
    /// # use lomesh::{grid::ndgrid, LogicallyOrthogonalMesh, MeshError};
    /// let xyz = ndgrid(&[&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0]]);
    /// let mesh = LogicallyOrthogonalMesh::<3>::new(xyz.clone())?;
    /// assert!((mesh.cell_volumes()[0] - 1.0).abs() < 1e-12);
    ///
    /// // the number of arrays must match the dimension
    /// let err = LogicallyOrthogonalMesh::<2>::new(xyz).unwrap_err();
    /// assert_eq!(err, MeshError::ComponentCount { expected: 2, found: 3 });
    /// # Ok::<(), MeshError>(())
    /// ```
    pub fn new(nodes: Vec<NodeArray>) -> Result<Self, MeshError> {
        check_dimension::<DIM>()?;
        if nodes.len() != DIM {
            return Err(MeshError::ComponentCount {
                expected: DIM,
                found: nodes.len(),
            });
        }

        let shape = nodes[0].shape();
        for (component, arr) in nodes.iter().enumerate() {
            let len = arr.values().len();
            if len != arr.shape().iter().product::<usize>() {
                return Err(MeshError::InconsistentArray {
                    component,
                    shape: arr.shape().to_vec(),
                    len,
                });
            }
            if arr.shape() != shape {
                return Err(MeshError::ShapeMismatch {
                    component,
                    expected: shape.to_vec(),
                    found: arr.shape().to_vec(),
                });
            }
        }
        if shape.len() != DIM {
            return Err(MeshError::RankMismatch {
                rank: shape.len(),
                components: DIM,
            });
        }

        let mut cells = [0; DIM];
        for (axis, (&node_count, cell_count)) in shape.iter().zip(&mut cells).enumerate() {
            if node_count < 2 {
                return Err(MeshError::TooFewNodes {
                    axis,
                    nodes: node_count,
                });
            }
            *cell_count = node_count - 1;
        }
        let lattice = Lattice::new(cells);

        let vertices: Vec<na::SVector<f64, DIM>> = (0..lattice.node_count())
            .map(|node| na::SVector::from_fn(|coord, _| nodes[coord].values()[node]))
            .collect();

        Ok(Self::from_parts(lattice, vertices))
    }

    /// Construct a mesh from a flat list of node positions.
    ///
    /// The vertices must be ordered column-major over the node lattice
    /// of a grid with `cells` cells along each axis.
    pub fn from_vertices(
        cells: [usize; DIM],
        vertices: Vec<na::SVector<f64, DIM>>,
    ) -> Result<Self, MeshError> {
        check_dimension::<DIM>()?;
        if let Some(axis) = cells.iter().position(|&n| n == 0) {
            return Err(MeshError::TooFewNodes { axis, nodes: 1 });
        }
        let lattice = Lattice::new(cells);
        if vertices.len() != lattice.node_count() {
            return Err(MeshError::VertexCount {
                expected: lattice.node_count(),
                found: vertices.len(),
            });
        }

        Ok(Self::from_parts(lattice, vertices))
    }

    fn from_parts(lattice: Lattice<DIM>, vertices: Vec<na::SVector<f64, DIM>>) -> Self {
        log::debug!(
            "Built {DIM}D logically orthogonal mesh with {:?} cells",
            lattice.cells()
        );
        Self {
            nodes: Rc::from(vertices),
            lattice,
            node_to_cell: OnceCell::new(),
            cell_centers: OnceCell::new(),
            face_centers: std::array::from_fn(|_| OnceCell::new()),
            edge_centers: std::array::from_fn(|_| OnceCell::new()),
            cell_volumes: OnceCell::new(),
            faces: OnceCell::new(),
            face_normals: OnceCell::new(),
            edges: OnceCell::new(),
        }
    }

    /// The spatial dimension of the mesh.
    #[inline]
    pub fn dim(&self) -> usize {
        DIM
    }

    /// Cell, node, face and edge counts of the mesh.
    #[inline]
    pub fn lattice(&self) -> Lattice<DIM> {
        self.lattice
    }

    /// Positions of all nodes.
    #[inline]
    pub fn nodes(&self) -> &[na::SVector<f64, DIM>] {
        &self.nodes
    }

    /// Sparse averaging operator from nodes to cells.
    ///
    /// Each row corresponds to a cell
    /// and averages the values at its `2^DIM` corner nodes.
    pub fn node_to_cell_average(&self) -> &nas::CsrMatrix<f64> {
        self.node_to_cell
            .get_or_init(|| staggered::node_to_cell_average(&self.lattice))
    }

    /// Cell-centered grid: the mean of each cell's corner nodes.
    pub fn cell_centers(&self) -> &[na::SVector<f64, DIM>] {
        self.cell_centers
            .get_or_init(|| staggered::cell_centers(self))
    }

    /// Face-centered grid of the faces normal to `axis`.
    ///
    /// Returns None if the mesh has no such axis (Z in 2D).
    pub fn face_centers(&self, axis: Axis) -> Option<&[na::SVector<f64, DIM>]> {
        let cell = self.face_centers.get(axis.index())?;
        Some(cell.get_or_init(|| staggered::face_centers(self, axis)))
    }

    /// Edge-centered grid of the edges parallel to `axis`.
    ///
    /// Returns None if the mesh has no such axis (Z in 2D).
    /// Note that in 2D the X edges coincide with the Y faces and vice versa.
    pub fn edge_centers(&self, axis: Axis) -> Option<&[na::SVector<f64, DIM>]> {
        let cell = self.edge_centers.get(axis.index())?;
        Some(cell.get_or_init(|| staggered::edge_centers(self, axis)))
    }

    /// Volumes of cells (areas in 2D).
    pub fn cell_volumes(&self) -> &[f64] {
        self.cell_volumes
            .get_or_init(|| measures::cell_volumes(self))
    }

    #[inline]
    fn face_geometry(&self) -> &FaceGeometry<DIM> {
        self.faces.get_or_init(|| measures::face_geometry(self))
    }

    /// Areas of faces (lengths in 2D), ordered by family.
    pub fn face_areas(&self) -> &[f64] {
        &self.face_geometry().areas
    }

    /// Unnormalized normals of each face before averaging.
    ///
    /// Yields a slice per face, ordered by family.
    /// In 2D each slice holds the face edge rotated by 90 degrees,
    /// whose length equals the face area.
    /// In 3D each slice holds the cross products at the four corners of the face,
    /// which differ when the face isn't planar.
    pub fn face_corner_normals(&self) -> std::slice::ChunksExact<'_, na::SVector<f64, DIM>> {
        let faces = self.face_geometry();
        faces.raw_normals.chunks_exact(faces.normals_per_face)
    }

    /// Unit normals of faces, ordered by family.
    ///
    /// In 3D this averages the four corner normals
    /// (see [`face_corner_normals`][Self::face_corner_normals])
    /// into one per face before normalizing.
    /// Normals point toward the positive direction of the face family's logical axis.
    pub fn face_normals(&self) -> &[na::SVector<f64, DIM>] {
        self.face_normals
            .get_or_init(|| measures::averaged_normals(self.face_geometry()))
    }

    #[inline]
    fn edge_geometry(&self) -> &EdgeGeometry<DIM> {
        self.edges.get_or_init(|| measures::edge_geometry(self))
    }

    /// Lengths of edges, ordered by family.
    pub fn edge_lengths(&self) -> &[f64] {
        &self.edge_geometry().lengths
    }

    /// Unit tangents of edges, ordered by family,
    /// pointing toward the positive direction of the edge's logical axis.
    pub fn edge_tangents(&self) -> &[na::SVector<f64, DIM>] {
        &self.edge_geometry().tangents
    }
}
