pub mod element;
pub mod index;
pub mod space;
pub mod iter;
pub mod display;

pub use element::{Buffer, Element, ElementKind};
pub use index::SpaceIndex;
pub use space::{Dims, Space};
pub use iter::Indices;
pub use display::SpaceDisplay;
