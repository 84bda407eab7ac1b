//! Handles to modules that have been loaded into a store.

use std::collections::HashMap ;
use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use wasmtime::{ Extern, Instance, Store, TypedFunc, WasmParams, WasmResults };

use crate::{ LoadError, ModuleVersion };



/// Where a [`LoadedModule`] came from.
#[derive( Debug, Clone, PartialEq, Eq )]
pub enum ModuleOrigin {
	/// Instantiated from this file by a [`LoadContext`]( crate::LoadContext ).
	File( PathBuf ),
	/// Provided by the host, either through a [`HostSnapshot`]( crate::HostSnapshot )
	/// or a [`DefaultResolver`]( crate::DefaultResolver ).
	Host,
}

/// A module loaded into a wasmtime [`Store`].
///
/// This is a handle type: cloning it yields another reference to the same
/// module, and two handles compare equal only if they refer to the same load.
/// A handle is only meaningful together with the store it was loaded into.
#[derive( Clone )]
pub struct LoadedModule( Arc<ModuleData> );

struct ModuleData {
	name: String,
	version: Option<ModuleVersion>,
	origin: ModuleOrigin,
	exports: Exports,
	dependencies: Vec<LoadedModule>,
}

enum Exports {
	Instance( Instance ),
	Host( HashMap<String, Extern> ),
}

impl LoadedModule {

	pub(crate) fn from_instance(
		name: impl Into<String>,
		version: Option<ModuleVersion>,
		path: &Path,
		instance: Instance,
		dependencies: Vec<LoadedModule>,
	) -> Self {
		Self( Arc::new( ModuleData {
			name: name.into(),
			version,
			origin: ModuleOrigin::File( path.to_path_buf() ),
			exports: Exports::Instance( instance ),
			dependencies,
		}))
	}

	/// Wraps items owned by the host as a module named `name`.
	///
	/// The items must belong to the store the module will be used with.
	pub fn from_host( name: impl Into<String>, exports: impl IntoIterator<Item = ( String, Extern )> ) -> Self {
		Self( Arc::new( ModuleData {
			name: name.into(),
			version: None,
			origin: ModuleOrigin::Host,
			exports: Exports::Host( exports.into_iter().collect() ),
			dependencies: Vec::with_capacity( 0 ),
		}))
	}

	/// Wraps an instance the host created itself as a module named `name`.
	pub fn from_host_instance( name: impl Into<String>, instance: Instance ) -> Self {
		Self( Arc::new( ModuleData {
			name: name.into(),
			version: None,
			origin: ModuleOrigin::Host,
			exports: Exports::Instance( instance ),
			dependencies: Vec::with_capacity( 0 ),
		}))
	}

	/// Identity name the module was resolved or loaded under.
	#[inline] pub fn name( &self ) -> &str { &self.0.name }

	/// Version of the file it was loaded from, when it had a readable one.
	#[inline] pub fn version( &self ) -> Option<ModuleVersion> { self.0.version }

	#[inline] pub fn origin( &self ) -> &ModuleOrigin { &self.0.origin }

	/// Modules its imports were bound to, one per imported module name, in import order.
	#[inline] pub fn dependencies( &self ) -> &[LoadedModule] { &self.0.dependencies }

	/// The dependency its imports from `name` were bound to.
	pub fn dependency( &self, name: &str ) -> Option<&LoadedModule> {
		self.0.dependencies.iter().find(| dependency | dependency.name() == name )
	}

	/// Whether both handles refer to the same load.
	#[inline] pub fn same_module( &self, other: &LoadedModule ) -> bool { Arc::ptr_eq( &self.0, &other.0 ) }

	/// Looks up an export by name.
	pub fn get_export<T: 'static>( &self, store: &mut Store<T>, name: &str ) -> Option<Extern> {
		match &self.0.exports {
			Exports::Instance( instance ) => instance.get_export( store, name ),
			Exports::Host( exports ) => exports.get( name ).cloned(),
		}
	}

	/// Looks up an exported function with a statically known signature.
	///
	/// # Errors
	/// Fails if there is no such function export or its signature differs.
	pub fn typed_func<T, Params, Results>(
		&self,
		store: &mut Store<T>,
		name: &str,
	) -> Result<TypedFunc<Params, Results>, LoadError>
	where
		T: 'static,
		Params: WasmParams,
		Results: WasmResults,
	{
		let func = self.get_export( store, name )
			.and_then( Extern::into_func )
			.ok_or_else(|| LoadError::MissingExport { module: self.name().to_string(), field: name.to_string() })?;
		func.typed::<Params, Results>( &*store )
			.map_err(| error | LoadError::EntryPoint { module: self.name().to_string(), entry: name.to_string(), error })
	}

	/// Calls the module's `() -> ()` entry point export `entry`.
	///
	/// # Errors
	/// Fails if the export is missing, has a different signature, or traps.
	pub fn run_entry_point<T: 'static>( &self, store: &mut Store<T>, entry: &str ) -> Result<(), LoadError> {
		self.typed_func::<T, (), ()>( store, entry )?
			.call( &mut *store, () )
			.map_err(| error | LoadError::EntryPoint { module: self.name().to_string(), entry: entry.to_string(), error })
	}

}

impl PartialEq for LoadedModule {
	fn eq( &self, other: &Self ) -> bool { self.same_module( other ) }
}
impl Eq for LoadedModule {}

impl std::fmt::Debug for LoadedModule {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "LoadedModule" )
			.field( "name", &self.0.name )
			.field( "version", &self.0.version )
			.field( "origin", &self.0.origin )
			.field( "dependencies", &self.0.dependencies.iter().map( LoadedModule::name ).collect::<Vec<_>>() )
			.finish_non_exhaustive()
	}
}
