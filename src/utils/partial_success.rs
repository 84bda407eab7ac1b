//! Type alias for operations that succeed even when some of their parts fail.

/// Represents a successful operation where some parts failed but didn't prevent overall success.
/// The `Vec<E>` contains errors from the failed parts; they are reported, never dropped.
pub type PartialSuccess<T, E> = ( T, Vec<E> );
