//! Geometry of logically orthogonal meshes.
//!
//! A logically orthogonal mesh is a structured grid
//! whose nodes are connected like a rectangular 2D or 3D lattice,
//! but whose physical node positions can be arbitrarily curved.
//! [`LogicallyOrthogonalMesh`] takes the node coordinates
//! and lazily computes the geometric quantities
//! needed to build discrete operators on it:
//! staggered grids, cell volumes, face areas and normals,
//! and edge lengths and tangents.
//!
//! ```
//! use lomesh::{grid::ndgrid, Axis, LogicallyOrthogonalMesh};
//!
//! let x = [0.0, 1.0, 2.0];
//! let y = [0.0, 0.5, 1.0, 1.5];
//! let mesh = LogicallyOrthogonalMesh::<2>::new(ndgrid(&[&x, &y])).unwrap();
//!
//! assert_eq!(mesh.cell_volumes().len(), 6);
//! assert_eq!(mesh.face_centers(Axis::X).unwrap().len(), 9);
//! assert!(mesh.face_centers(Axis::Z).is_none());
//! ```

#![warn(missing_docs)]

pub mod geometry;

pub mod grid;
#[doc(inline)]
pub use grid::NodeArray;

pub mod lattice;
#[doc(inline)]
pub use lattice::{Axis, Corner, Lattice};

pub mod mesh;
#[doc(inline)]
pub use mesh::{LogicallyOrthogonalMesh, MeshError};

// nalgebra re-exports of common types for convenience

pub use nalgebra as na;
/// Type alias for a 2D `nalgebra` vector.
pub type Vec2 = na::Vector2<f64>;
/// Type alias for a 3D `nalgebra` vector.
pub type Vec3 = na::Vector3<f64>;
