use std::collections::HashMap ;
use std::collections::hash_map::Entry ;

use crate::Candidate ;



/// The deduplicated set of dependencies a [`LoadContext`]( crate::LoadContext ) may load from disk.
///
/// Holds at most one [`Candidate`] per identity name: the one with the highest
/// version seen. Built once per load and never modified afterwards.
#[derive( Debug, Clone, Default )]
pub struct DependencyPool {
	entries: HashMap<String, Candidate>,
}

impl DependencyPool {

	/// Merges candidates, keeping the highest version of every name.
	///
	/// When two candidates of the same name carry equal versions, the one that
	/// comes first in `candidates` is kept.
	pub fn merge( candidates: impl IntoIterator<Item = Candidate> ) -> Self {
		let entries = candidates.into_iter().fold( HashMap::new(), | mut entries: HashMap<String, Candidate>, candidate | {
			match entries.entry( candidate.name().to_string() ) {
				Entry::Vacant( slot ) => { slot.insert( candidate ); },
				Entry::Occupied( mut slot ) => if candidate.version() > slot.get().version() {
					slot.insert( candidate );
				},
			}
			entries
		});
		Self { entries }
	}

	/// The surviving candidate for `name`, if any.
	#[inline] pub fn get( &self, name: &str ) -> Option<&Candidate> { self.entries.get( name ) }

	#[inline] pub fn len( &self ) -> usize { self.entries.len() }

	#[inline] pub fn is_empty( &self ) -> bool { self.entries.is_empty() }

	/// All surviving candidates, in no particular order.
	pub fn iter( &self ) -> impl Iterator<Item = &Candidate> { self.entries.values() }

}
