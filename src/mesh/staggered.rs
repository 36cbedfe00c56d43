use nalgebra as na;
use nalgebra_sparse as nas;

use super::LogicallyOrthogonalMesh;
use crate::lattice::{self, Axis, Corner, Lattice};

/// Build the sparse operator averaging node values onto cells.
pub(super) fn node_to_cell_average<const DIM: usize>(lattice: &Lattice<DIM>) -> nas::CsrMatrix<f64> {
    let corners = Corner::all(DIM);
    let weight = 1.0 / corners.len() as f64;
    let indices = lattice.index_corners(corners, lattice.cells());

    // COO for simplicity, there are no duplicate entries to worry about
    let mut coo = nas::CooMatrix::new(lattice.cell_count(), lattice.node_count());
    for (cell_idx, cell_corners) in indices.chunks_exact(corners.len()).enumerate() {
        for &node_idx in cell_corners {
            coo.push(cell_idx, node_idx, weight);
        }
    }
    log::debug!(
        "Built node-to-cell averaging operator with {} nonzeros",
        coo.nnz()
    );
    nas::CsrMatrix::from(&coo)
}

/// Apply the node-to-cell averaging operator to each coordinate of the nodes.
pub(super) fn cell_centers<const DIM: usize>(
    mesh: &LogicallyOrthogonalMesh<DIM>,
) -> Vec<na::SVector<f64, DIM>> {
    let average = mesh.node_to_cell_average();
    let nodes = mesh.nodes();
    let coords: Vec<na::DVector<f64>> = (0..DIM)
        .map(|coord| {
            let node_coord = na::DVector::from_iterator(nodes.len(), nodes.iter().map(|p| p[coord]));
            average * &node_coord
        })
        .collect();

    log::debug!("Computed {} cell centers", average.nrows());
    (0..average.nrows())
        .map(|cell_idx| na::SVector::from_fn(|coord, _| coords[coord][cell_idx]))
        .collect()
}

pub(super) fn face_centers<const DIM: usize>(
    mesh: &LogicallyOrthogonalMesh<DIM>,
    axis: Axis,
) -> Vec<na::SVector<f64, DIM>> {
    let corners = lattice::face_corners(DIM, axis);
    let centers = stencil_average(mesh, corners, mesh.lattice.face_shape(axis));
    log::debug!("Computed {} {axis:?} face centers", centers.len());
    centers
}

pub(super) fn edge_centers<const DIM: usize>(
    mesh: &LogicallyOrthogonalMesh<DIM>,
    axis: Axis,
) -> Vec<na::SVector<f64, DIM>> {
    let corners = lattice::edge_corners(axis);
    let centers = stencil_average(mesh, &corners, mesh.lattice.edge_shape(axis));
    log::debug!("Computed {} {axis:?} edge centers", centers.len());
    centers
}

/// Average the nodes at the given corners
/// for every element of a lattice with the given shape.
fn stencil_average<const DIM: usize>(
    mesh: &LogicallyOrthogonalMesh<DIM>,
    corners: &[Corner],
    shape: [usize; DIM],
) -> Vec<na::SVector<f64, DIM>> {
    let nodes = mesh.nodes();
    let weight = 1.0 / corners.len() as f64;
    mesh.lattice
        .index_corners(corners, shape)
        .chunks_exact(corners.len())
        .map(|stencil| {
            let sum: na::SVector<f64, DIM> = stencil.iter().map(|&i| nodes[i]).sum();
            sum * weight
        })
        .collect()
}
