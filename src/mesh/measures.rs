use itertools::izip;
use nalgebra as na;

use super::{EdgeGeometry, FaceGeometry, LogicallyOrthogonalMesh};
use crate::{
    geometry::{self, NormalMode},
    lattice::{self, Axis, Corner},
    Vec3,
};

/// Embed a mesh point in 3D space, with `z = 0` for 2D meshes.
#[inline]
fn lift<const DIM: usize>(p: &na::SVector<f64, DIM>) -> Vec3 {
    Vec3::from_fn(|i, _| if i < DIM { p[i] } else { 0.0 })
}

#[inline]
fn lifted_nodes<const DIM: usize>(mesh: &LogicallyOrthogonalMesh<DIM>) -> Vec<Vec3> {
    mesh.nodes().iter().map(lift).collect()
}

pub(super) fn cell_volumes<const DIM: usize>(mesh: &LogicallyOrthogonalMesh<DIM>) -> Vec<f64> {
    let lattice = mesh.lattice;
    let points = lifted_nodes(mesh);

    let volumes: Vec<f64> = match DIM {
        2 => lattice
            .index_corners(&lattice::CORNERS_2D, lattice.cells())
            .chunks_exact(lattice::CORNERS_2D.len())
            .map(|quad| geometry::quad_info(std::array::from_fn(|i| points[quad[i]])).area)
            .collect(),
        3 => {
            // the five tetrahedra of each decomposition are summed per cell
            // before averaging the two decompositions
            let [first, second] = lattice::TETRA_DECOMPOSITIONS.map(|decomposition| {
                let corners: Vec<Corner> = decomposition.iter().flatten().copied().collect();
                let tets = lattice.index_corners(&corners, lattice.cells());
                geometry::vol_tetra(&points, &tets)
                    .chunks_exact(decomposition.len())
                    .map(|vols| vols.iter().sum::<f64>())
                    .collect::<Vec<f64>>()
            });
            izip!(first, second).map(|(a, b)| (a + b) / 2.0).collect()
        }
        _ => unreachable!("mesh dimension is checked on construction"),
    };

    log::debug!("Computed {} cell volumes", volumes.len());
    volumes
}

pub(super) fn face_geometry<const DIM: usize>(
    mesh: &LogicallyOrthogonalMesh<DIM>,
) -> FaceGeometry<DIM> {
    let lattice = mesh.lattice;
    let face_count = lattice.total_face_count();
    let mut areas = Vec::with_capacity(face_count);

    let (raw_normals, normals_per_face) = match DIM {
        2 => {
            let nodes = mesh.nodes();
            let mut normals = Vec::with_capacity(face_count);
            for axis in Axis::up_to(DIM) {
                let corners = lattice::face_corners(DIM, axis);
                let segments = lattice.index_corners(corners, lattice.face_shape(axis));
                for segment in segments.chunks_exact(2) {
                    let edge = nodes[segment[1]] - nodes[segment[0]];
                    // (dx, dy) rotated clockwise into (dy, -dx)
                    normals.push(na::SVector::from_fn(|i, _| match i {
                        0 => edge[1],
                        _ => -edge[0],
                    }));
                    areas.push(edge.magnitude());
                }
            }
            (normals, 1)
        }
        3 => {
            let points = lifted_nodes(mesh);
            let mode = NormalMode::PerCorner { normalize: false };
            let mut normals = Vec::with_capacity(face_count * mode.normals_per_face());
            for axis in Axis::up_to(DIM) {
                let corners = lattice::face_corners(DIM, axis);
                let quads = lattice.index_corners(corners, lattice.face_shape(axis));
                let (family_normals, family_areas) = geometry::face_info(&points, &quads, mode);
                normals.extend(
                    family_normals
                        .iter()
                        .map(|n| na::SVector::from_fn(|i, _| n[i])),
                );
                areas.extend(family_areas);
            }
            (normals, mode.normals_per_face())
        }
        _ => unreachable!("mesh dimension is checked on construction"),
    };

    log::debug!("Computed areas and normals of {face_count} faces");
    FaceGeometry {
        areas,
        raw_normals,
        normals_per_face,
    }
}

/// Average the raw normals of each face and normalize.
/// Degenerate faces get NaN normals.
pub(super) fn averaged_normals<const DIM: usize>(
    faces: &FaceGeometry<DIM>,
) -> Vec<na::SVector<f64, DIM>> {
    let normals: Vec<na::SVector<f64, DIM>> = faces
        .raw_normals
        .chunks_exact(faces.normals_per_face)
        .map(|corner_normals| {
            let mean = corner_normals.iter().sum::<na::SVector<f64, DIM>>()
                / corner_normals.len() as f64;
            mean.normalize()
        })
        .collect();
    log::debug!("Computed {} unit face normals", normals.len());
    normals
}

pub(super) fn edge_geometry<const DIM: usize>(
    mesh: &LogicallyOrthogonalMesh<DIM>,
) -> EdgeGeometry<DIM> {
    let lattice = mesh.lattice;
    let nodes = mesh.nodes();
    let edge_count = lattice.total_edge_count();
    let mut lengths = Vec::with_capacity(edge_count);
    let mut tangents = Vec::with_capacity(edge_count);

    for axis in Axis::up_to(DIM) {
        let ends = lattice.index_corners(&lattice::edge_corners(axis), lattice.edge_shape(axis));
        for edge in ends.chunks_exact(2) {
            let v = nodes[edge[1]] - nodes[edge[0]];
            let length = v.magnitude();
            lengths.push(length);
            tangents.push(v / length);
        }
    }

    log::debug!("Computed lengths and tangents of {edge_count} edges");
    EdgeGeometry { lengths, tangents }
}
