//! Object mapper abstraction used as the final step of a pipeline.

/// Maps a source value into a destination representation (for example a
/// domain aggregate into a DTO).
pub trait Mapper<S, D> {
    /// Map `source` into the destination type.
    fn map(&self, source: S) -> D;
}

impl<S, D, F> Mapper<S, D> for F
where
    F: Fn(S) -> D,
{
    fn map(&self, source: S) -> D {
        self(source)
    }
}
