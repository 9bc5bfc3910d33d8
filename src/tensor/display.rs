use std::fmt::{self, Display};

use super::element::Element;
use super::space::Space;

/// Prints a buffer through a space in logical order, whatever the storage order.
///
/// Vectors print as a single row, matrices one row per line. Higher ranks are
/// partitioned into matrices over the last two axes, each labelled by its leading
/// index, *eg.* a rank 3 space of shape [2, 2, 2] prints as
/// (0)
/// [x,x]
/// [x,x]
///
/// (1)
/// [x,x]
/// [x,x]
///
/// Every element is padded to the widest one so columns line up.
/// A buffer shorter than the space is a formatting error.
pub struct SpaceDisplay<'a, T> {
    space: &'a Space,
    data: &'a [T],
}

impl<'a, T> SpaceDisplay<'a, T> {
    pub(crate) fn new(space: &'a Space, data: &'a [T]) -> Self {
        SpaceDisplay { space, data }
    }
}

impl<'a, T: Element> Display for SpaceDisplay<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.len() < self.space.len() {
            return Err(fmt::Error);
        }
        let dims = self.space.dims();
        let ndim = dims.len();
        let (rows, cols) = match ndim {
            1 => (1, dims[0]),
            _ => (dims[ndim - 2], dims[ndim - 1]),
        };
        let cells = format_pad_elem(
            self.space.logical_indices().map(|idx| self.space.get(self.data, &idx[..])),
        );

        for (block, chunk) in cells.chunks(rows * cols).enumerate() {
            if ndim > 2 {
                if block > 0 {
                    writeln!(f)?;
                }
                writeln!(f, "{}", block_label(block, &dims[..ndim - 2]))?;
            }
            for row in chunk.chunks(cols) {
                writeln!(f, "[{}]", row.join(","))?;
            }
        }
        Ok(())
    }
}

/// Pads each element so that every string representation has the same length
fn format_pad_elem<T: Display>(elems: impl Iterator<Item = T>) -> Vec<String> {
    let mut cells: Vec<String> = elems.map(|x| x.to_string()).collect();
    let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);
    for c in cells.iter_mut() {
        let pad = width - c.chars().count();
        c.push_str(&" ".repeat(pad));
    }
    cells
}

/// `(i)` for rank 3, `(i,j,..)` above, from the block number in row-major order
fn block_label(mut block: usize, leading: &[usize]) -> String {
    let mut idx = vec![0; leading.len()];
    for (slot, &d) in idx.iter_mut().zip(leading).rev() {
        *slot = block % d;
        block /= d;
    }
    let idx: Vec<String> = idx.iter().map(|i| i.to_string()).collect();
    format!("({})", idx.join(","))
}
