/// Error categories.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A zero pivot or a zero determinant was found while inverting.
    #[error("Matrix is singular and cannot be inverted")]
    SingularMatrix,

    /// A caller-supplied argument violates a precondition.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub fn zero_dimension() -> Self {
        Self::InvalidArgument("matrix dimension must be at least 1".to_string())
    }

    pub fn length_mismatch(n: usize, expected: usize, len: usize) -> Self {
        Self::InvalidArgument(format!(
            "expected {expected} elements for a {n}x{n} matrix, got {len}"
        ))
    }

    pub fn dimension_overflow(n: usize) -> Self {
        Self::InvalidArgument(format!("a {n}x{n} matrix is too large to allocate"))
    }

    pub fn dimension_mismatch(lhs: usize, rhs: usize) -> Self {
        Self::InvalidArgument(format!("cannot multiply a {lhs}x{lhs} by a {rhs}x{rhs} matrix"))
    }

    pub fn degenerate_axis(axis: [f32; 3]) -> Self {
        Self::InvalidArgument(format!(
            "rotation axis ({}, {}, {}) has no direction",
            axis[0], axis[1], axis[2]
        ))
    }

    pub fn degenerate_view(what: &str) -> Self {
        Self::InvalidArgument(format!("look-at {what} vector has zero length"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// What a `*_into` inverse does when its input is singular.
///
/// Either way the output is left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SingularPolicy {
    /// Return [`Error::SingularMatrix`].
    #[default]
    Report,
    /// Return `Ok(())` and keep whatever the output held before.
    KeepPrevious,
}
