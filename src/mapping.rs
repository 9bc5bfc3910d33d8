//! Coordinate mapping over tensor backed positions.
//!
//! A `Conformation` holds the untransformed coordinates of a model, one row of
//! `[x, y, z]` per atom in a `[count, 3]` row-major space. `create_mapping` pairs it
//! with a 4x4 transform and hands back accessors for the transformed positions.
//! How operators are composed or inverted is the caller's business.

use nalgebra::{Matrix4, Point3};
use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::tensor::{Element, ElementKind, Space};

#[derive(Clone, Debug, PartialEq)]
pub struct Conformation {
    // `None` for a model with no atoms, `[0, 3]` is not a valid shape
    space: Option<Space>,
    coords: Vec<f64>,
}

impl Conformation {
    /// `count` atoms, all at the origin
    pub fn new(count: usize) -> Result<Conformation> {
        if count == 0 {
            return Ok(Conformation { space: None, coords: Vec::new() });
        }
        let space = Space::build(&[count, 3], None, Some(ElementKind::F64))?;
        let coords = space.create_vec();
        Ok(Conformation { space: Some(space), coords })
    }

    pub fn from_xyz(x: &[f64], y: &[f64], z: &[f64]) -> Result<Conformation> {
        if x.len() != y.len() || x.len() != z.len() {
            return Err(LayoutError::InvalidShape {
                dims: vec![x.len(), y.len(), z.len()],
                reason: "coordinate columns differ in length",
            });
        }
        let mut conformation = Conformation::new(x.len())?;
        for (i, ((&x, &y), &z)) in x.iter().zip(y).zip(z).enumerate() {
            conformation.set_position(i, Point3::new(x, y, z));
        }
        Ok(conformation)
    }

    pub fn len(&self) -> usize {
        self.coords.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The `[count, 3]` layout of the coordinates, `None` when there are no atoms
    pub fn space(&self) -> Option<&Space> {
        self.space.as_ref()
    }

    /// The flat `[count, 3]` storage
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Panics if `i` is not an atom of this conformation
    #[inline]
    pub fn coordinate(&self, i: usize, axis: usize) -> f64 {
        match &self.space {
            Some(space) => space.get(&self.coords, (i, axis)),
            None => panic!("atom {} out of range for an empty conformation", i),
        }
    }

    pub fn position(&self, i: usize) -> Point3<f64> {
        Point3::new(self.coordinate(i, 0), self.coordinate(i, 1), self.coordinate(i, 2))
    }

    pub fn set_position(&mut self, i: usize, p: Point3<f64>) {
        let Some(space) = &self.space else {
            panic!("atom {} out of range for an empty conformation", i);
        };
        for axis in 0..3 {
            space.set(&mut self.coords, (i, axis), p[axis]);
        }
    }
}

/// Maps an atom index to a 3D coordinate.
/// `position(i)` must equal the transform applied to `invariant_position(i)`.
pub trait PositionMapping {
    fn invariant_position(&self, i: usize) -> Point3<f64>;
    fn position(&self, i: usize) -> Point3<f64>;

    fn x(&self, i: usize) -> f64 {
        self.position(i).x
    }

    fn y(&self, i: usize) -> f64 {
        self.position(i).y
    }

    fn z(&self, i: usize) -> f64 {
        self.position(i).z
    }
}

/// The mapping produced by `create_mapping`
#[derive(Clone, Debug)]
pub struct OperatorMapping<'a> {
    transform: Matrix4<f64>,
    is_identity: bool,
    conformation: &'a Conformation,
}

impl<'a> OperatorMapping<'a> {
    pub fn transform(&self) -> &Matrix4<f64> {
        &self.transform
    }

    pub fn conformation(&self) -> &'a Conformation {
        self.conformation
    }
}

impl<'a> PositionMapping for OperatorMapping<'a> {
    fn invariant_position(&self, i: usize) -> Point3<f64> {
        self.conformation.position(i)
    }

    fn position(&self, i: usize) -> Point3<f64> {
        let p = self.conformation.position(i);
        if self.is_identity {
            p
        } else {
            self.transform.transform_point(&p)
        }
    }

    // the identity case reads straight from storage
    fn x(&self, i: usize) -> f64 {
        if self.is_identity { self.conformation.coordinate(i, 0) } else { self.position(i).x }
    }

    fn y(&self, i: usize) -> f64 {
        if self.is_identity { self.conformation.coordinate(i, 1) } else { self.position(i).y }
    }

    fn z(&self, i: usize) -> f64 {
        if self.is_identity { self.conformation.coordinate(i, 2) } else { self.position(i).z }
    }
}

/// Derives position accessors for `conformation` under `transform`
pub fn create_mapping<'a>(transform: &Matrix4<f64>, conformation: &'a Conformation) -> OperatorMapping<'a> {
    let is_identity = transform.is_identity(0.0);
    debug!(is_identity, atoms = conformation.len(), "created position mapping");
    OperatorMapping { transform: *transform, is_identity, conformation }
}

/// Reads a 4x4 transform out of a buffer laid out by any rank 2 space of shape [4, 4]
pub fn transform_from_space<T: Element>(space: &Space, data: &[T]) -> Result<Matrix4<f64>> {
    if space.dims() != [4, 4] {
        return Err(LayoutError::InvalidShape { dims: space.dims().to_vec(), reason: "a transform needs a 4x4 space" });
    }
    if data.len() < space.len() {
        return Err(LayoutError::BufferLength { expected: space.len(), found: data.len() });
    }
    Ok(Matrix4::from_fn(|i, j| space.get(data, (i, j)).as_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn sample() -> Conformation {
        Conformation::from_xyz(&[1.0, 0.0, -2.0], &[0.0, 2.0, 0.5], &[0.0, 0.0, 3.0]).unwrap()
    }

    #[test]
    fn conformation_storage_is_row_major() {
        let c = sample();
        assert_eq!(c.len(), 3);
        assert!(!c.is_empty());
        assert_eq!(c.space().unwrap().strides(), &[3, 1]);
        assert_eq!(&c.coords()[3..6], &[0.0, 2.0, 0.0]);
        assert_eq!(c.position(2), Point3::new(-2.0, 0.5, 3.0));
    }

    #[test]
    fn mismatched_columns() {
        assert!(matches!(
            Conformation::from_xyz(&[1.0], &[], &[0.0]),
            Err(LayoutError::InvalidShape { .. })
        ));
    }

    #[test]
    fn empty_model() {
        let c = Conformation::from_xyz(&[], &[], &[]).unwrap();
        assert_eq!(c.len(), 0);
        assert!(c.is_empty());
        assert!(c.space().is_none());
        assert_eq!(c, Conformation::new(0).unwrap());

        let t = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        let m = create_mapping(&t, &c);
        assert!(m.conformation().is_empty());
        assert_eq!(m.transform(), &t);
    }

    #[test]
    #[should_panic]
    fn empty_model_has_no_positions() {
        let c = Conformation::new(0).unwrap();
        create_mapping(&Matrix4::identity(), &c).x(0);
    }

    #[test]
    fn identity_mapping() {
        let c = sample();
        let m = create_mapping(&Matrix4::identity(), &c);
        for i in 0..c.len() {
            assert_eq!(m.position(i), m.invariant_position(i));
            assert_eq!(m.x(i), c.coordinate(i, 0));
            assert_eq!(m.z(i), c.coordinate(i, 2));
        }
    }

    #[test]
    fn translated_mapping() {
        let c = sample();
        let t = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        let m = create_mapping(&t, &c);
        assert_eq!(m.position(0), Point3::new(2.0, 2.0, 3.0));
        assert_eq!(m.invariant_position(0), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(m.y(1), 4.0);
        assert_eq!(m.z(2), 6.0);
    }

    #[test]
    fn transform_read_from_column_major_space() {
        let space = Space::column_major_matrix(4, 4, None).unwrap();
        let t = Matrix4::new_translation(&Vector3::new(5.0, 6.0, 7.0));
        // nalgebra storage is column-major, so it is a valid buffer for this space
        let read = transform_from_space(&space, t.as_slice()).unwrap();
        assert_eq!(read, t);

        let bad = Space::new(&[3, 3]).unwrap();
        assert!(transform_from_space(&bad, &[0.0; 9]).is_err());
    }
}
