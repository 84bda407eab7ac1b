//! Splitting per-item results into what worked and what didn't.
//!
//! Scanning inspects every sibling file on its own; one unreadable file must not
//! hide the others. Collecting the per-file results into a [`ResultList`] keeps
//! both sides, in input order, ready to hand back as a [`PartialSuccess`].

use super::PartialSuccess ;

/// Collects an iterator of results into its successes and its failures,
/// keeping the input order of both.
pub(crate) struct ResultList<S, E> {
	successful: Vec<S>,
	failed: Vec<E>,
}

impl<S, E> ResultList<S, E> {
	pub(crate) fn new() -> Self {
		Self { successful: Vec::new(), failed: Vec::new() }
	}
	pub(crate) fn deconstruct( self ) -> PartialSuccess<Vec<S>, E> {( self.successful, self.failed )}
}

impl<S, E> FromIterator<Result<S, E>> for ResultList<S, E> {
	fn from_iter<T: IntoIterator<Item = Result<S, E>>>( iter: T ) -> Self {
		iter.into_iter().fold( ResultList::new(), | mut acc, item | {
			match item {
				Ok( s ) => acc.successful.push( s ),
				Err( e ) => acc.failed.push( e ),
			}
			acc
		})
	}
}
