#![cfg_attr(docsrs, doc(cfg(feature = "mesh_ndarray")))]
//! Definition of functions to view the flat arrays of topology data as ndarray

use ndarray::Array2;

use crate::{
    entity::{ContactsData, Mesh1DData, Mesh2DData, Network1DData},
    errors::{MeshNdarrayError, UgridError},
};

/// Reshapes row-major `values` into rows of `width`.
fn rows<T: Clone>(values: &[T], width: usize) -> Result<Array2<T>, UgridError> {
    if width == 0 || values.len() % width != 0 {
        return Err(MeshNdarrayError::UnexpectedValuesLength(values.len(), width).into());
    }

    let shape = (values.len() / width, width);
    let array = Array2::from_shape_vec(shape, values.to_vec()).map_err(MeshNdarrayError::from)?;
    Ok(array)
}

/// Stacks two coordinate arrays into `[n, 2]`, x in the first column.
fn pairs(x: &[f64], y: &[f64]) -> Result<Array2<f64>, UgridError> {
    if x.len() != y.len() {
        return Err(MeshNdarrayError::UnexpectedValuesLength(y.len(), x.len()).into());
    }

    let interleaved: Vec<f64> = x.iter().zip(y).flat_map(|(&x, &y)| [x, y]).collect();
    rows(&interleaved, 2)
}

impl Mesh2DData {
    /// Returns `edge_nodes` as `[num_edges, 2]`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshNdarrayError::UnexpectedValuesLength`] when the array length is odd.
    #[cfg_attr(docsrs, doc(cfg(feature = "mesh_ndarray")))]
    pub fn edge_nodes_ndarray(&self) -> Result<Array2<i32>, UgridError> {
        rows(&self.edge_nodes, 2)
    }

    /// Returns `face_nodes` as `[num_faces, num_face_nodes_max]`, padding included.
    ///
    /// # Errors
    ///
    /// Returns [`MeshNdarrayError::UnexpectedValuesLength`] when the array length is not
    /// a multiple of `num_face_nodes_max`.
    #[cfg_attr(docsrs, doc(cfg(feature = "mesh_ndarray")))]
    pub fn face_nodes_ndarray(&self) -> Result<Array2<i32>, UgridError> {
        rows(&self.face_nodes, self.num_face_nodes_max)
    }

    /// Returns the node coordinates as `[num_nodes, 2]`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshNdarrayError::UnexpectedValuesLength`] when `node_x` and `node_y` differ in length.
    #[cfg_attr(docsrs, doc(cfg(feature = "mesh_ndarray")))]
    pub fn node_coordinates_ndarray(&self) -> Result<Array2<f64>, UgridError> {
        pairs(&self.node_x, &self.node_y)
    }
}

impl Mesh1DData {
    /// Returns `edge_nodes` as `[num_edges, 2]`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshNdarrayError::UnexpectedValuesLength`] when the array length is odd.
    #[cfg_attr(docsrs, doc(cfg(feature = "mesh_ndarray")))]
    pub fn edge_nodes_ndarray(&self) -> Result<Array2<i32>, UgridError> {
        rows(&self.edge_nodes, 2)
    }
}

impl Network1DData {
    /// Returns `edge_nodes` as `[num_edges, 2]`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshNdarrayError::UnexpectedValuesLength`] when the array length is odd.
    #[cfg_attr(docsrs, doc(cfg(feature = "mesh_ndarray")))]
    pub fn edge_nodes_ndarray(&self) -> Result<Array2<i32>, UgridError> {
        rows(&self.edge_nodes, 2)
    }

    /// Returns the node coordinates as `[num_nodes, 2]`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshNdarrayError::UnexpectedValuesLength`] when `node_x` and `node_y` differ in length.
    #[cfg_attr(docsrs, doc(cfg(feature = "mesh_ndarray")))]
    pub fn node_coordinates_ndarray(&self) -> Result<Array2<f64>, UgridError> {
        pairs(&self.node_x, &self.node_y)
    }
}

impl ContactsData {
    /// Returns the contacts as `[num_contacts, 2]`, `from` index first.
    ///
    /// # Errors
    ///
    /// Returns [`MeshNdarrayError::UnexpectedValuesLength`] when the array length is odd.
    #[cfg_attr(docsrs, doc(cfg(feature = "mesh_ndarray")))]
    pub fn edges_ndarray(&self) -> Result<Array2<i32>, UgridError> {
        rows(&self.edges, 2)
    }
}

#[cfg(test)]
mod tests {
    use crate::entity::{ContactsData, Mesh2DData};
    use crate::errors::{MeshNdarrayError, UgridError};
    use anyhow::Result;
    use ndarray::array;

    #[test]
    fn face_nodes_keep_padding() -> Result<()> {
        let data = Mesh2DData {
            face_nodes: vec![0, 1, 2, -999, 1, 3, 4, 2],
            num_face_nodes_max: 4,
            ..Mesh2DData::default()
        };

        let faces = data.face_nodes_ndarray()?;
        assert_eq!(faces, array![[0, 1, 2, -999], [1, 3, 4, 2]]);
        assert_eq!(faces.row(0)[3], -999);

        Ok(())
    }

    #[test]
    fn coordinates_as_columns() -> Result<()> {
        let data = Mesh2DData {
            node_x: vec![0.0, 1.0, 2.0],
            node_y: vec![5.0, 6.0, 7.0],
            ..Mesh2DData::default()
        };

        let nodes = data.node_coordinates_ndarray()?;
        assert_eq!(nodes.shape(), &[3, 2]);
        assert_eq!(nodes.column(1).to_vec(), vec![5.0, 6.0, 7.0]);

        Ok(())
    }

    #[test]
    fn odd_contacts_rejected() {
        let data = ContactsData {
            edges: vec![0, 1, 2],
            ..ContactsData::default()
        };

        assert!(matches!(
            data.edges_ndarray(),
            Err(UgridError::MeshNdarray(
                MeshNdarrayError::UnexpectedValuesLength(3, 2)
            ))
        ));
    }
}
