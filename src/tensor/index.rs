/// Indexing is generic over how the caller spells a multidimensional index, every
/// spelling is reduced to the same dot product of indices and strides.
///
/// Index representations | Offset computation
/// usize                 | rank 1
/// [usize; N], &[usize; N] | fixed length, unrolled by the compiler
/// (usize, usize, ..)    | rank 2 to 4
/// &[usize], &Vec<usize> | dynamic length
///
/// To make another type usable as an index, implement `SpaceIndex` for it.
pub trait SpaceIndex {
    /// Number of axes this index addresses
    fn arity(&self) -> usize;

    /// Flat offset for the given strides, no bounds checking at all
    fn offset(&self, strides: &[usize]) -> usize;

    /// Flat offset, or `None` if the arity is wrong or any axis is out of range
    fn checked_offset(&self, dims: &[usize], strides: &[usize]) -> Option<usize>;
}

#[inline]
fn dot(idx: &[usize], strides: &[usize]) -> usize {
    idx.iter().zip(strides).map(|(i, s)| i * s).sum()
}

#[inline]
fn checked_dot(idx: &[usize], dims: &[usize], strides: &[usize]) -> Option<usize> {
    if idx.len() != dims.len() {
        return None;
    }
    let mut offset = 0;
    for ((&i, &d), &s) in idx.iter().zip(dims).zip(strides) {
        if i >= d {
            return None;
        }
        offset += i * s;
    }
    Some(offset)
}

impl SpaceIndex for usize {
    #[inline]
    fn arity(&self) -> usize {
        1
    }

    #[inline]
    fn offset(&self, strides: &[usize]) -> usize {
        *self * strides[0]
    }

    fn checked_offset(&self, dims: &[usize], strides: &[usize]) -> Option<usize> {
        checked_dot(&[*self], dims, strides)
    }
}

impl<const N: usize> SpaceIndex for [usize; N] {
    #[inline]
    fn arity(&self) -> usize {
        N
    }

    #[inline]
    fn offset(&self, strides: &[usize]) -> usize {
        dot(self, strides)
    }

    fn checked_offset(&self, dims: &[usize], strides: &[usize]) -> Option<usize> {
        checked_dot(self, dims, strides)
    }
}

impl<const N: usize> SpaceIndex for &[usize; N] {
    #[inline]
    fn arity(&self) -> usize {
        N
    }

    #[inline]
    fn offset(&self, strides: &[usize]) -> usize {
        dot(*self, strides)
    }

    fn checked_offset(&self, dims: &[usize], strides: &[usize]) -> Option<usize> {
        checked_dot(*self, dims, strides)
    }
}

impl SpaceIndex for &[usize] {
    #[inline]
    fn arity(&self) -> usize {
        self.len()
    }

    #[inline]
    fn offset(&self, strides: &[usize]) -> usize {
        dot(self, strides)
    }

    fn checked_offset(&self, dims: &[usize], strides: &[usize]) -> Option<usize> {
        checked_dot(self, dims, strides)
    }
}

impl SpaceIndex for &Vec<usize> {
    #[inline]
    fn arity(&self) -> usize {
        self.len()
    }

    #[inline]
    fn offset(&self, strides: &[usize]) -> usize {
        dot(self, strides)
    }

    fn checked_offset(&self, dims: &[usize], strides: &[usize]) -> Option<usize> {
        checked_dot(self, dims, strides)
    }
}

// tuples just forward to the fixed size array case
macro_rules! tuple_index {
    (@usize $i:ident) => { usize };
    ($n:literal; $($i:ident),+) => {
        impl SpaceIndex for ($(tuple_index!(@usize $i),)+) {
            #[inline]
            fn arity(&self) -> usize {
                $n
            }

            #[inline]
            fn offset(&self, strides: &[usize]) -> usize {
                let ($($i,)+) = *self;
                [$($i),+].offset(strides)
            }

            fn checked_offset(&self, dims: &[usize], strides: &[usize]) -> Option<usize> {
                let ($($i,)+) = *self;
                [$($i),+].checked_offset(dims, strides)
            }
        }
    };
}

tuple_index!(2; a, b);
tuple_index!(3; a, b, c);
tuple_index!(4; a, b, c, d);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings_agree() {
        let strides = [20, 5, 1];
        let v = vec![1usize, 2, 3];
        let expected = 20 + 10 + 3;
        assert_eq!([1usize, 2, 3].offset(&strides), expected);
        assert_eq!((&[1usize, 2, 3]).offset(&strides), expected);
        assert_eq!((1usize, 2usize, 3usize).offset(&strides), expected);
        assert_eq!((&v[..]).offset(&strides), expected);
        assert_eq!((&v).offset(&strides), expected);
        assert_eq!(4usize.offset(&[3]), 12);
    }

    #[test]
    fn checked_rejects_bad_indices() {
        let dims = [3, 4];
        let strides = [1, 3];
        assert_eq!((2usize, 3usize).checked_offset(&dims, &strides), Some(11));
        assert_eq!((3usize, 0usize).checked_offset(&dims, &strides), None);
        assert_eq!((0usize, 4usize).checked_offset(&dims, &strides), None);
        assert_eq!([1usize].checked_offset(&dims, &strides), None);
        assert_eq!([1usize, 1, 1].checked_offset(&dims, &strides), None);
        assert_eq!(2usize.checked_offset(&[3], &[1]), Some(2));
        assert_eq!(3usize.checked_offset(&[3], &[1]), None);
    }
}
