use thiserror::Error;

/// Everything that can go wrong while declaring a layout.
/// Element access never produces one of these, see `Space::get`.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid shape {dims:?}: {reason}")]
    InvalidShape {
        dims: Vec<usize>,
        reason: &'static str,
    },

    #[error("invalid axis order {order:?} for rank {rank}: {reason}")]
    InvalidPermutation {
        order: Vec<usize>,
        rank: usize,
        reason: &'static str,
    },

    #[error("buffer of {found} elements cannot back a layout of {expected}")]
    BufferLength { expected: usize, found: usize },

    #[error(transparent)]
    View(#[from] ndarray::ShapeError),

    #[error("malformed layout document: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("could not write layout document: {0}")]
    Serialize(#[from] ron::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
