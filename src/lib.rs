//! Strided layouts for dense n-dimensional numeric arrays.
//!
//! A [`Space`] describes how a logical index of any rank maps onto one flat buffer,
//! for any order of the axes in memory. Vectors and row/column major matrices are
//! just preconfigured spaces.
//!
//! ```
//! use tensorspace_lib::{Space, ElementKind};
//!
//! let m = Space::column_major_matrix(3, 2, Some(ElementKind::I32)).unwrap();
//! let mut data = m.create();
//! let d = data.as_mut_slice::<i32>().unwrap();
//! for i in 0..3usize {
//!     for j in 0..2usize {
//!         m.set(d, (i, j), (i + j) as i32);
//!     }
//! }
//! assert_eq!(d, &[0, 1, 2, 1, 2, 3]);
//! ```
pub mod config;
pub mod error;
pub mod mapping;
pub mod tensor;

pub use config::{load_space, LayoutConfig};
pub use error::{LayoutError, Result};
pub use tensor::{Buffer, Element, ElementKind, Space, SpaceIndex};
