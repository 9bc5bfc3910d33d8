use ndarray::{ArrayViewD, ArrayViewMutD, IxDyn, ShapeBuilder};
use smallvec::{smallvec, SmallVec};
use tracing::{debug, trace};

use super::element::{Buffer, Element, ElementKind};
use super::index::SpaceIndex;
use super::iter::Indices;
use super::display::SpaceDisplay;
use crate::error::{LayoutError, Result};

/// Per axis storage, ranks up to 4 never touch the heap
pub type Dims = SmallVec<[usize; 4]>;

/////////////////////////////////////////////////////////////////////
// Space is the layout descriptor of a dense, strided, n dimensional array
// stored in one flat buffer. It owns no data, only the recipe for turning
// a logical index into a flat offset.
/////////////////////////////////////////////////////////////////////

/// An immutable layout: shape, storage order of the axes, element kind, and the
/// strides derived from them.
///
/// `axis_order` lists the logical axes from slowest to fastest varying in storage.
/// The identity order gives the usual row-major layout, `[1, 0]` on a matrix makes
/// columns contiguous.
///
/// # Access is unchecked
/// `get` and `set` never validate indices per axis; they are meant for hot loops.
/// An index outside its axis lands on some other element of the same buffer, and
/// only an offset past the end of the slice panics (slice indexing). Arity is
/// checked with `debug_assert!` and nothing else. Use `checked_offset`, `try_get`
/// or `try_set` when the indices come from somewhere untrusted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Space {
    dims: Dims,
    axis_order: Dims,
    strides: Dims,
    kind: ElementKind,
    len: usize,
}

impl Space {
    /// Builds a layout, `axis_order` defaults to the identity and `kind` to `F64`
    pub fn build(dims: &[usize], axis_order: Option<&[usize]>, kind: Option<ElementKind>) -> Result<Space> {
        let rank = dims.len();
        if rank == 0 {
            return Err(LayoutError::InvalidShape { dims: dims.to_vec(), reason: "a space needs at least one dimension" });
        }
        if dims.contains(&0) {
            return Err(LayoutError::InvalidShape { dims: dims.to_vec(), reason: "dimensions must be positive" });
        }
        let len = dims.iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| LayoutError::InvalidShape { dims: dims.to_vec(), reason: "element count overflows usize" })?;

        let axis_order: Dims = match axis_order {
            Some(order) => {
                validate_permutation(order, rank)?;
                order.into()
            }
            None => (0..rank).collect(),
        };
        let strides = compute_strides(dims, &axis_order);
        let kind = kind.unwrap_or_default();

        debug!(?dims, ?axis_order, ?strides, %kind, len, "built space");
        Ok(Space { dims: dims.into(), axis_order, strides, kind, len })
    }

    /// Row-major `F64` layout of the given shape
    pub fn new(dims: &[usize]) -> Result<Space> {
        Space::build(dims, None, None)
    }

    /// Rank 1, same as `build(&[len], None, kind)`
    pub fn vector(len: usize, kind: Option<ElementKind>) -> Result<Space> {
        Space::build(&[len], None, kind)
    }

    /// Rank 2 with contiguous columns, same as `build(&[rows, cols], Some(&[1, 0]), kind)`
    pub fn column_major_matrix(rows: usize, cols: usize, kind: Option<ElementKind>) -> Result<Space> {
        Space::build(&[rows, cols], Some(&[1, 0]), kind)
    }

    /// Rank 2 with contiguous rows, same as `build(&[rows, cols], Some(&[0, 1]), kind)`
    pub fn row_major_matrix(rows: usize, cols: usize, kind: Option<ElementKind>) -> Result<Space> {
        Space::build(&[rows, cols], Some(&[0, 1]), kind)
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn axis_order(&self) -> &[usize] {
        &self.axis_order
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false, a valid shape has no zero dimension
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A fresh zeroed buffer of this layout's kind and length
    pub fn create(&self) -> Buffer {
        trace!(kind = %self.kind, len = self.len, "allocating buffer");
        Buffer::zeros(self.kind, self.len)
    }

    /// A fresh zeroed `Vec<T>` of this layout's length. The element type comes from
    /// `T`, not from the kind tag.
    pub fn create_vec<T: Element>(&self) -> Vec<T> {
        vec![T::zero(); self.len]
    }

    /// Flat offset of a logical index, see the type level docs on bounds
    #[inline]
    pub fn offset<I: SpaceIndex>(&self, idx: I) -> usize {
        debug_assert_eq!(idx.arity(), self.rank(), "index arity does not match rank");
        idx.offset(&self.strides)
    }

    /// Flat offset, `None` unless the arity matches and every axis is in range
    pub fn checked_offset<I: SpaceIndex>(&self, idx: I) -> Option<usize> {
        idx.checked_offset(&self.dims, &self.strides)
    }

    #[inline]
    pub fn get<T: Copy, I: SpaceIndex>(&self, data: &[T], idx: I) -> T {
        data[self.offset(idx)]
    }

    #[inline]
    pub fn set<T, I: SpaceIndex>(&self, data: &mut [T], idx: I, value: T) {
        data[self.offset(idx)] = value;
    }

    /// # Safety
    /// Every index must be inside its axis and `data` must be at least `self.len()` long.
    #[inline]
    pub unsafe fn get_unchecked<T: Copy, I: SpaceIndex>(&self, data: &[T], idx: I) -> T {
        *data.get_unchecked(idx.offset(&self.strides))
    }

    /// # Safety
    /// Same contract as `get_unchecked`.
    #[inline]
    pub unsafe fn set_unchecked<T, I: SpaceIndex>(&self, data: &mut [T], idx: I, value: T) {
        *data.get_unchecked_mut(idx.offset(&self.strides)) = value;
    }

    pub fn try_get<T: Copy, I: SpaceIndex>(&self, data: &[T], idx: I) -> Option<T> {
        self.checked_offset(idx).and_then(|o| data.get(o).copied())
    }

    /// Writes `value` and returns the element it replaced, or `None` (and writes
    /// nothing) if the index is invalid for this layout
    pub fn try_set<T, I: SpaceIndex>(&self, data: &mut [T], idx: I, value: T) -> Option<T> {
        let offset = self.checked_offset(idx)?;
        let slot = data.get_mut(offset)?;
        Some(std::mem::replace(slot, value))
    }

    /// `get` on a type erased buffer, the element is read as a float
    pub fn get_value<I: SpaceIndex>(&self, buffer: &Buffer, idx: I) -> f64 {
        buffer.get_value(self.offset(idx))
    }

    /// `set` on a type erased buffer, the value is cast to the buffer's kind
    pub fn set_value<I: SpaceIndex>(&self, buffer: &mut Buffer, idx: I, value: f64) {
        buffer.set_value(self.offset(idx), value);
    }

    /// Every logical index in physical storage order, the n-th item has offset n
    pub fn indices(&self) -> Indices {
        Indices::new(&self.dims, &self.axis_order)
    }

    /// Every logical index with axis 0 outermost, regardless of storage order
    pub fn logical_indices(&self) -> Indices {
        let identity: Dims = (0..self.rank()).collect();
        Indices::new(&self.dims, &identity)
    }

    /// Pretty printer for `data` in logical order.
    /// Formatting fails with `fmt::Error` if `data` is shorter than `len()`, so
    /// `to_string` and `format!` panic on such a buffer.
    pub fn display<'a, T: Element>(&'a self, data: &'a [T]) -> SpaceDisplay<'a, T> {
        SpaceDisplay::new(self, data)
    }

    /// Borrow `data` as an ndarray view with this layout's shape and strides
    pub fn view<'a, T>(&self, data: &'a [T]) -> Result<ArrayViewD<'a, T>> {
        self.check_len(data.len())?;
        let shape = IxDyn(&self.dims).strides(IxDyn(&self.strides));
        Ok(ArrayViewD::from_shape(shape, data)?)
    }

    pub fn view_mut<'a, T>(&self, data: &'a mut [T]) -> Result<ArrayViewMutD<'a, T>> {
        self.check_len(data.len())?;
        let shape = IxDyn(&self.dims).strides(IxDyn(&self.strides));
        Ok(ArrayViewMutD::from_shape(shape, data)?)
    }

    fn check_len(&self, found: usize) -> Result<()> {
        if found < self.len {
            return Err(LayoutError::BufferLength { expected: self.len, found });
        }
        Ok(())
    }
}

/// Checks that `order` holds each of 0..rank exactly once
fn validate_permutation(order: &[usize], rank: usize) -> Result<()> {
    let fail = |reason| Err(LayoutError::InvalidPermutation { order: order.to_vec(), rank, reason });
    if order.len() != rank {
        return fail("length does not match rank");
    }
    let mut seen: SmallVec<[bool; 4]> = smallvec![false; rank];
    for &axis in order {
        if axis >= rank {
            return fail("axis out of range");
        }
        if seen[axis] {
            return fail("axis repeated");
        }
        seen[axis] = true;
    }
    Ok(())
}

/// Computes the strides from dimensions and storage order, the fastest axis
/// always has stride 1
fn compute_strides(dims: &[usize], axis_order: &[usize]) -> Dims {
    let mut strides: Dims = smallvec![0; dims.len()];
    let mut k = 1usize;
    for &axis in axis_order.iter().rev() {
        strides[axis] = k;
        k *= dims[axis];
    }
    strides
}
