//! Node coordinate arrays used to construct meshes.

use nalgebra as na;

/// One coordinate component (x, y or z) of every node of a structured mesh,
/// stored as a column-major n-dimensional array.
///
/// A mesh is built from one of these per spatial dimension,
/// all with the same shape.
/// The shape is validated when the mesh is constructed,
/// so the array itself accepts any data.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeArray {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl NodeArray {
    /// Wrap column-major data with the given shape.
    #[inline]
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> Self {
        Self { shape, values }
    }

    /// Create an array by evaluating a function at every logical index.
    ///
    /// The function receives the subscript of each entry,
    /// visited in column-major order.
    pub fn from_fn(shape: Vec<usize>, mut f: impl FnMut(&[usize]) -> f64) -> Self {
        let len: usize = shape.iter().product();
        let mut values = Vec::with_capacity(len);
        let mut sub = vec![0; shape.len()];
        for _ in 0..len {
            values.push(f(&sub));
            for (i, n) in sub.iter_mut().zip(&shape) {
                *i += 1;
                if *i < *n {
                    break;
                }
                *i = 0;
            }
        }
        Self { shape, values }
    }

    /// Shape of the array (number of nodes along each axis).
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes in the array.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Values in column-major order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Matrices are interpreted with rows along the first logical axis,
/// which is also nalgebra's storage order.
impl From<na::DMatrix<f64>> for NodeArray {
    fn from(mat: na::DMatrix<f64>) -> Self {
        let shape = vec![mat.nrows(), mat.ncols()];
        Self::new(shape, mat.as_slice().to_vec())
    }
}

/// Build the node coordinate arrays of a tensor-product grid.
///
/// Given the node coordinates along each axis,
/// returns one [`NodeArray`] per axis
/// holding that coordinate for every node of the grid.
///
/// ```
/// # use lomesh::grid::ndgrid;
/// let xy = ndgrid(&[&[0.0, 1.0, 2.0], &[5.0, 6.0]]);
/// assert_eq!(xy[0].shape(), &[3, 2]);
/// assert_eq!(xy[0].values(), &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
/// assert_eq!(xy[1].values(), &[5.0, 5.0, 5.0, 6.0, 6.0, 6.0]);
/// ```
pub fn ndgrid(axes: &[&[f64]]) -> Vec<NodeArray> {
    let shape: Vec<usize> = axes.iter().map(|a| a.len()).collect();
    axes.iter()
        .enumerate()
        .map(|(axis, coords)| NodeArray::from_fn(shape.clone(), |sub| coords[sub[axis]]))
        .collect()
}

/// Node coordinates `0, h, 2h, ..., n*h` of `n` uniform cells of width `h`.
pub fn uniform_nodes(n: usize, h: f64) -> Vec<f64> {
    (0..=n).map(|i| i as f64 * h).collect()
}
