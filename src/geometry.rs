//! Geometric primitives the mesh quantities are built from.
//!
//! Everything here works on 3D points.
//! 2D meshes are lifted into the `z = 0` plane before calling these,
//! which makes the cross products well defined.

use nalgebra as na;

use crate::Vec3;

/// Normals and area of a single quadrilateral.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadInfo {
    /// Unnormalized normal at each corner,
    /// i.e. the cross product of the two edges meeting there.
    /// For a non-planar quad these all differ.
    pub corner_normals: [Vec3; 4],
    /// Approximate area: the mean of the parallelogram areas
    /// spanned at each corner.
    pub area: f64,
}

impl QuadInfo {
    /// Mean of the corner normals.
    ///
    /// This is weighted by area and equals half the cross product of the diagonals,
    /// `(p4 - p2) × (p3 - p1) / 2`, even for non-planar quads.
    #[inline]
    pub fn mean_normal(&self) -> Vec3 {
        self.corner_normals.iter().sum::<Vec3>() / 4.0
    }
}

/// Compute the corner normals and area of a (possibly non-planar) quadrilateral.
///
/// The corners must be given in winding order.
/// The normals point to the side from which the winding appears clockwise
/// in a right-handed coordinate system,
/// which together with the face stencils in [`lattice`][crate::lattice]
/// makes face normals point along the positive logical axes.
///
/// ```text
///    1 -------12------- 2
///    |                  |
///   41       (x)       23
///    |                  |
///    4 -------34------- 3
/// ```
///
/// The area is exact for planar convex quads.
/// Concave quads are not handled correctly.
pub fn quad_info(corners: [Vec3; 4]) -> QuadInfo {
    let [p1, p2, p3, p4] = corners;
    let e12 = p2 - p1;
    let e23 = p3 - p2;
    let e34 = p4 - p3;
    let e41 = p1 - p4;

    let corner_normals = [
        e12.cross(&e41),
        e23.cross(&e12),
        e34.cross(&e23),
        e41.cross(&e34),
    ];
    // each cross product is the area of a parallelogram
    // covering two of the four corner triangles,
    // so the mean over corners is the area of the quad
    let area = corner_normals.iter().map(|n| n.magnitude()).sum::<f64>() / 4.0;

    QuadInfo {
        corner_normals,
        area,
    }
}

/// Unsigned volume of a tetrahedron,
/// `|det([p2 - p1, p3 - p1, p4 - p1])| / 6`.
#[inline]
pub fn tetra_volume(vertices: [Vec3; 4]) -> f64 {
    let [p1, p2, p3, p4] = vertices;
    let edges = na::Matrix3::from_columns(&[p2 - p1, p3 - p1, p4 - p1]);
    edges.determinant().abs() / 6.0
}

/// How [`face_info`] reports the normals of each face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalMode {
    /// One unit normal per face, the normalized mean of the corner normals.
    Average,
    /// Four normals per face, one for each corner,
    /// optionally normalized to unit length.
    PerCorner {
        /// Whether to normalize the corner normals.
        normalize: bool,
    },
}

impl NormalMode {
    /// Number of normals produced for each face.
    #[inline]
    pub fn normals_per_face(self) -> usize {
        match self {
            NormalMode::Average => 1,
            NormalMode::PerCorner { .. } => 4,
        }
    }
}

/// Compute normals and areas for a set of quadrilateral faces.
///
/// `quads` holds four point indices per face, in winding order.
/// Returns the normals (stored flat, see [`NormalMode::normals_per_face`])
/// and one area per face.
/// Degenerate faces produce NaN unit normals.
pub fn face_info(points: &[Vec3], quads: &[usize], mode: NormalMode) -> (Vec<Vec3>, Vec<f64>) {
    let face_count = quads.len() / 4;
    let mut normals = Vec::with_capacity(face_count * mode.normals_per_face());
    let mut areas = Vec::with_capacity(face_count);

    for quad in quads.chunks_exact(4) {
        let info = quad_info(std::array::from_fn(|i| points[quad[i]]));
        match mode {
            NormalMode::Average => normals.push(info.mean_normal().normalize()),
            NormalMode::PerCorner { normalize: true } => {
                normals.extend(info.corner_normals.iter().map(|n| n.normalize()))
            }
            NormalMode::PerCorner { normalize: false } => {
                normals.extend_from_slice(&info.corner_normals)
            }
        }
        areas.push(info.area);
    }

    (normals, areas)
}

/// Compute volumes for a set of tetrahedra
/// given as four point indices each.
pub fn vol_tetra(points: &[Vec3], tets: &[usize]) -> Vec<f64> {
    tets.chunks_exact(4)
        .map(|tet| tetra_volume(std::array::from_fn(|i| points[tet[i]])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn unit_square() -> [Vec3; 4] {
        [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn unit_square_info() {
        let info = quad_info(unit_square());
        assert_relative_eq!(info.area, 1.0);
        for n in info.corner_normals {
            assert_relative_eq!(n, Vec3::new(0.0, 0.0, 1.0));
        }
        assert_relative_eq!(info.mean_normal(), Vec3::new(0.0, 0.0, 1.0));
    }

    /// Area of planar convex quads matches the diagonal formula.
    #[test]
    fn planar_quad_area_matches_diagonals() {
        // a trapezoid with parallel sides 3 and 1 and height 2, tilted out of plane
        let rot = na::Rotation3::from_euler_angles(0.3, -0.7, 1.1);
        let corners = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        ]
        .map(|p| rot * p);

        let info = quad_info(corners);
        assert_relative_eq!(info.area, 4.0, epsilon = 1e-12);
        let diag = (corners[2] - corners[0]).cross(&(corners[3] - corners[1]));
        assert_relative_eq!(info.area, diag.magnitude() / 2.0, epsilon = 1e-12);
        // all corners agree on the normal for a planar face
        let unit = info.corner_normals[0].normalize();
        for n in info.corner_normals {
            assert_relative_eq!(n.normalize(), unit, epsilon = 1e-12);
        }
    }

    #[test]
    fn mean_normal_is_half_diagonal_cross() {
        // twisted, non-planar quad
        let corners = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.1, 1.0, 0.4),
            Vec3::new(1.2, 0.9, -0.3),
            Vec3::new(1.0, -0.1, 0.2),
        ];
        let info = quad_info(corners);
        let diag = (corners[3] - corners[1]).cross(&(corners[2] - corners[0]));
        assert_relative_eq!(info.mean_normal(), diag / 2.0, epsilon = 1e-12);
        // the unit square winds so that this points up
        let [p1, p2, p3, p4] = unit_square();
        assert_relative_eq!((p4 - p2).cross(&(p3 - p1)) / 2.0, Vec3::new(0.0, 0.0, 1.0));

        let n0 = info.corner_normals[0].normalize();
        assert!(
            info.corner_normals[1..]
                .iter()
                .any(|n| (n.normalize() - n0).magnitude() > 1e-3),
            "corner normals of a twisted quad should differ"
        );
    }

    #[test]
    fn tetra_volumes() {
        let verts = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        assert_relative_eq!(tetra_volume(verts), 1.0 / 6.0);
        // orientation doesn't matter
        let [a, b, c, d] = verts;
        assert_relative_eq!(tetra_volume([b, a, c, d]), 1.0 / 6.0);
        // scaling one axis scales the volume
        let stretched = verts.map(|p| Vec3::new(p.x, 3.0 * p.y, p.z));
        assert_relative_eq!(tetra_volume(stretched), 0.5);
        // flat tetrahedra have no volume
        assert_abs_diff_eq!(tetra_volume(unit_square()), 0.0);

        let points = [a, b, c, d, Vec3::new(0.0, 0.0, 2.0)];
        let vols = vol_tetra(&points, &[0, 1, 2, 3, 0, 1, 2, 4]);
        assert_eq!(vols.len(), 2);
        assert_relative_eq!(vols[0], 1.0 / 6.0);
        assert_relative_eq!(vols[1], 1.0 / 3.0);
    }

    #[test]
    fn face_info_modes() {
        // two unit squares side by side
        let mut points: Vec<Vec3> = unit_square().to_vec();
        points.push(Vec3::new(0.0, 2.0, 0.0));
        points.push(Vec3::new(1.0, 2.0, 0.0));
        let quads = [0, 1, 2, 3, 1, 4, 5, 2];

        let (normals, areas) = face_info(&points, &quads, NormalMode::Average);
        assert_eq!(normals.len(), 2);
        assert_eq!(areas, vec![1.0, 1.0]);

        let (normals, _) = face_info(&points, &quads, NormalMode::PerCorner { normalize: false });
        assert_eq!(normals.len(), 8);

        // a larger quad keeps its raw normal magnitude unless normalized
        let big: Vec<Vec3> = unit_square().iter().map(|p| 2.0 * p).collect();
        let (raw, areas) = face_info(&big, &[0, 1, 2, 3], NormalMode::PerCorner { normalize: false });
        assert_relative_eq!(areas[0], 4.0);
        assert_relative_eq!(raw[0].magnitude(), 4.0);
        let (unit, _) = face_info(&big, &[0, 1, 2, 3], NormalMode::PerCorner { normalize: true });
        for n in unit {
            assert_relative_eq!(n.magnitude(), 1.0);
        }
    }
}
