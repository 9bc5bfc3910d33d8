use super::space::Dims;

/// Walks every logical index of a space with the axes nested in a given order,
/// the first axis of `order` outermost. Built from `Space::indices` it follows
/// physical storage, so the n-th index yielded lives at flat offset n.
pub struct Indices {
    dims: Dims,
    order: Dims,
    cursor: Dims,
    remaining: usize,
}

impl Indices {
    pub(crate) fn new(dims: &[usize], order: &[usize]) -> Indices {
        let remaining = dims.iter().product();
        Indices {
            dims: dims.into(),
            order: order.into(),
            cursor: dims.iter().map(|_| 0).collect(),
            remaining,
        }
    }
}

impl Iterator for Indices {
    type Item = Dims;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = self.cursor.clone();
        self.remaining -= 1;
        carry_over(&mut self.cursor, &self.dims, &self.order);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Indices {}

/// Increase the index by 1 along the fastest axis of `order`, and carry over to
/// slower axes if applicable. Returns true if the index wrapped around to all zeros.
fn carry_over(index: &mut [usize], dims: &[usize], order: &[usize]) -> bool {
    for &axis in order.iter().rev() {
        index[axis] += 1;
        if index[axis] < dims[axis] {
            return false;
        }
        index[axis] = 0;
    }
    true
}
