//! The modules resident in the host at a chosen point in time.
//!
//! A [`HostSnapshot`] is taken once, typically at startup after the host has
//! set up its own modules, and then only read. Loaders that share dependencies
//! with the host bind to the snapshot's modules instead of loading their own
//! copies. Taking the snapshot late is allowed but anything the host adds
//! afterwards is simply not in it.

use std::collections::HashMap ;
use std::sync::{ Arc, PoisonError, RwLock };
use itertools::Itertools ;
use wasmtime::{ Linker, Store };

use crate::LoadedModule ;



static PROCESS_SNAPSHOT: RwLock<Option<Arc<HostSnapshot>>> = RwLock::new( None );

/// An immutable name → module map of what the host already has loaded.
#[derive( Debug, Clone, Default )]
pub struct HostSnapshot {
	modules: HashMap<String, LoadedModule>,
}

impl HostSnapshot {

	/// A snapshot of explicitly provided modules, keyed by their names.
	///
	/// If two modules share a name, the later one is kept.
	pub fn new( modules: impl IntoIterator<Item = LoadedModule> ) -> Self {
		Self {
			modules: modules.into_iter()
				.map(| module | ( module.name().to_string(), module ))
				.collect(),
		}
	}

	/// Captures everything currently defined in the host's linker, one module
	/// per module name.
	///
	/// The captured items belong to `store`; loaders using this snapshot must
	/// load into the same store.
	pub fn capture<T: 'static>( linker: &Linker<T>, store: &mut Store<T> ) -> Self {
		let modules = linker.iter( &mut *store )
			.map(|( module, field, item )| ( module.to_string(), ( field.to_string(), item )))
			.into_group_map()
			.into_iter()
			.map(|( name, exports )| ( name.clone(), LoadedModule::from_host( name, exports )))
			.collect();
		Self { modules }
	}

	/// The host's module for `name`, if it had one at snapshot time.
	#[inline] pub fn get( &self, name: &str ) -> Option<&LoadedModule> { self.modules.get( name ) }

	#[inline] pub fn contains( &self, name: &str ) -> bool { self.modules.contains_key( name ) }

	#[inline] pub fn len( &self ) -> usize { self.modules.len() }

	#[inline] pub fn is_empty( &self ) -> bool { self.modules.is_empty() }

	pub fn names( &self ) -> impl Iterator<Item = &str> { self.modules.keys().map( String::as_str ) }

}

/// Installs `snapshot` as the process-wide snapshot picked up by every
/// [`Loader`]( crate::Loader ) created afterwards.
///
/// Calling this again replaces the snapshot for loaders created from then on;
/// existing loaders keep the one they started with.
pub fn make_process_snapshot( snapshot: HostSnapshot ) -> Arc<HostSnapshot> {
	let snapshot = Arc::new( snapshot );
	*PROCESS_SNAPSHOT.write().unwrap_or_else( PoisonError::into_inner ) = Some( Arc::clone( &snapshot ));
	snapshot
}

/// The process-wide snapshot, if one was made.
pub fn process_snapshot() -> Option<Arc<HostSnapshot>> {
	PROCESS_SNAPSHOT.read().unwrap_or_else( PoisonError::into_inner ).clone()
}
