//! The resolution scope of a single load.
//!
//! A [`LoadContext`] answers "which module does `name` mean here". Each name is
//! tried against four sources in a fixed order and the first hit wins:
//!
//! 1. the [`HostSnapshot`], but only when sharing with the host is enabled,
//! 2. the [`DefaultResolver`],
//! 3. modules this context has already loaded,
//! 4. the [`DependencyPool`], loading the candidate's file into the store.
//!
//! Misses in steps 1 to 3 just fall through. A miss in step 4 is a
//! [`LoadError::ResolutionFailure`]. A name that reaches step 4 while it is
//! still being loaded is a [`LoadError::CyclicDependency`].

use std::collections::{ HashMap, HashSet };
use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use itertools::Itertools ;
use thiserror::Error ;
use tracing::{ debug, info };
use wasmtime::{ Extern, Instance, Module, Store };

use crate::{ DefaultResolver, DependencyPool, HostSnapshot, LoadedModule, ModuleOrigin, ModuleVersion, ScanError };
use crate::inspect::{ identity_name, read_version };



/// Errors that can occur while loading modules or resolving their dependencies.
#[derive( Error, Debug )]
pub enum LoadError {
	/// A registered or pooled module file doesn't exist.
	#[error( "Module file not found: {0}" )]
	FileNotFound( PathBuf ),
	/// A module file exists but couldn't be read.
	#[error( "Failed to read {path}: {source}" )]
	Io { path: PathBuf, source: std::io::Error },
	/// A module file is not a valid WebAssembly module.
	#[error( "Invalid module file {path}: {error}" )]
	InvalidModuleFile { path: PathBuf, error: wasmtime::Error },
	/// No source could provide a module with this name.
	#[error( "Failed to resolve module '{name}'" )]
	ResolutionFailure { name: String },
	/// A module was requested again while it was still being loaded.
	#[error( "Cyclic dependency on module '{0}'" )]
	CyclicDependency( String ),
	/// A file was loaded directly under a name the context already bound to another file.
	#[error( "Module '{name}' is already loaded ({loaded:?}), refusing to also load {requested}" )]
	IdentityConflict { name: String, loaded: ModuleOrigin, requested: PathBuf },
	/// A resolved dependency doesn't export an item its dependent imports.
	#[error( "Module '{module}' has no export '{field}'" )]
	MissingExport { module: String, field: String },
	/// Imports were resolved but instantiation failed (type mismatch, trapping start function, ...).
	#[error( "Failed to instantiate module '{name}': {error}" )]
	InstantiationFailed { name: String, error: wasmtime::Error },
	/// An entry point export has the wrong signature or trapped.
	#[error( "Entry point '{entry}' of module '{module}' failed: {error}" )]
	EntryPoint { module: String, entry: String, error: wasmtime::Error },
	#[error( "Scan failed: {0}" )]
	Scan( #[from] ScanError ),
}

#[derive( Debug, Clone, Copy )]
enum Tier { HostSnapshot, DefaultResolver, Context, Pool }

/// An isolated scope that loads modules into a store and resolves their imports.
///
/// Every imported module name is resolved through the context that loads the
/// importer, so one context never sees modules another context loaded. A name
/// loaded once is reused for every later request in the same context.
///
/// # Type Parameters
/// - `T`: data of the wasmtime [`Store`] modules are loaded into
pub struct LoadContext<T: 'static> {
	pool: DependencyPool,
	share_with_host: bool,
	host_snapshot: Option<Arc<HostSnapshot>>,
	default_resolver: Arc<dyn DefaultResolver<T>>,
	host_resolved: HashMap<String, LoadedModule>,
	resolved: HashMap<String, LoadedModule>,
	resolving: HashSet<String>,
}

impl<T: 'static> LoadContext<T> {

	/// Creates a context over `pool` that does not share with the host.
	pub fn new( pool: DependencyPool, default_resolver: Arc<dyn DefaultResolver<T>> ) -> Self {
		Self {
			pool,
			share_with_host: false,
			host_snapshot: None,
			default_resolver,
			host_resolved: HashMap::new(),
			resolved: HashMap::new(),
			resolving: HashSet::new(),
		}
	}

	/// Enables or disables binding to the host's modules before anything else.
	///
	/// Sharing without a snapshot behaves like not sharing.
	pub fn with_host_sharing( mut self, share_with_host: bool, host_snapshot: Option<Arc<HostSnapshot>> ) -> Self {
		self.share_with_host = share_with_host ;
		self.host_snapshot = host_snapshot ;
		self
	}

	#[inline] pub fn pool( &self ) -> &DependencyPool { &self.pool }

	#[inline] pub fn shares_with_host( &self ) -> bool { self.share_with_host }

	/// Modules this context has loaded itself, keyed by name.
	pub fn loaded_modules( &self ) -> impl Iterator<Item = &LoadedModule> { self.resolved.values() }

	/// Resolves `name` to a module, loading it from the pool if nothing else provides it.
	///
	/// # Errors
	/// Fails if no source provides `name`, or loading it (or any of its own
	/// dependencies) fails.
	pub fn resolve( &mut self, store: &mut Store<T>, name: &str ) -> Result<LoadedModule, LoadError> {

		let found = self.host_module( name ).map(| module | ( Tier::HostSnapshot, module ))
			.or_else(|| self.default_module( store, name ).map(| module | ( Tier::DefaultResolver, module )))
			.or_else(|| self.resolved.get( name ).cloned().map(| module | ( Tier::Context, module )));

		let ( tier, module ) = match found {
			Some( found ) => found,
			None if self.resolving.contains( name ) => return Err( LoadError::CyclicDependency( name.to_string() )),
			None => ( Tier::Pool, self.load_from_pool( store, name )? ),
		};
		debug!( module = name, tier = ?tier, "resolved module" );
		Ok( module )

	}

	/// Loads the module file at `path` into the context under its file stem.
	///
	/// If this context already loaded that same file, by path or as a
	/// dependency, the existing module is returned instead of a second copy.
	///
	/// # Errors
	/// Fails if the file doesn't exist, isn't a valid module, or any of its
	/// dependencies can't be resolved. Also fails with
	/// [`LoadError::IdentityConflict`] if the context already loaded a
	/// different file under the same name.
	pub fn load_from_path( &mut self, store: &mut Store<T>, path: &Path ) -> Result<LoadedModule, LoadError> {

		if !path.is_file() { return Err( LoadError::FileNotFound( path.to_path_buf() )) }
		let name = identity_name( path );

		if let Some( loaded ) = self.resolved.get( &name ) {
			return match loaded.origin() {
				ModuleOrigin::File( loaded_path ) if same_file( loaded_path, path ) => Ok( loaded.clone() ),
				origin => Err( LoadError::IdentityConflict { name, loaded: origin.clone(), requested: path.to_path_buf() }),
			};
		}

		let module = self.instantiate( store, &name, None, path )?;
		self.resolved.insert( name, module.clone() );
		Ok( module )

	}

	fn host_module( &self, name: &str ) -> Option<LoadedModule> {
		match self.share_with_host {
			true => self.host_snapshot.as_ref()?.get( name ).cloned(),
			false => None,
		}
	}

	/// Tier 2, memoized so the resolver's answer for a name is one handle per context.
	fn default_module( &mut self, store: &mut Store<T>, name: &str ) -> Option<LoadedModule> {
		if let Some( module ) = self.host_resolved.get( name ) { return Some( module.clone() ) }
		let module = self.default_resolver.resolve_by_identity( store, name )?;
		self.host_resolved.insert( name.to_string(), module.clone() );
		Some( module )
	}

	fn load_from_pool( &mut self, store: &mut Store<T>, name: &str ) -> Result<LoadedModule, LoadError> {
		let candidate = self.pool.get( name )
			.cloned()
			.ok_or_else(|| LoadError::ResolutionFailure { name: name.to_string() })?;
		let module = self.instantiate( store, name, Some( candidate.version() ), candidate.path() )?;
		self.resolved.insert( name.to_string(), module.clone() );
		Ok( module )
	}

	fn instantiate(
		&mut self,
		store: &mut Store<T>,
		name: &str,
		version: Option<ModuleVersion>,
		path: &Path,
	) -> Result<LoadedModule, LoadError> {

		let bytes = std::fs::read( path ).map_err(| source | match source.kind() {
			std::io::ErrorKind::NotFound => LoadError::FileNotFound( path.to_path_buf() ),
			_ => LoadError::Io { path: path.to_path_buf(), source },
		})?;
		let module = Module::new( store.engine(), &bytes )
			.map_err(| error | LoadError::InvalidModuleFile { path: path.to_path_buf(), error })?;
		let version = version.or_else(|| read_version( &bytes ).ok() );

		self.resolving.insert( name.to_string() );
		let linked = self.link_imports( store, &module );
		self.resolving.remove( name );
		let ( imports, dependencies ) = linked?;

		let instance = Instance::new( &mut *store, &module, &imports )
			.map_err(| error | LoadError::InstantiationFailed { name: name.to_string(), error })?;

		info!(
			module = name,
			version = %version.map(| version | version.to_string() ).unwrap_or_default(),
			path = %path.display(),
			"loaded module"
		);
		Ok( LoadedModule::from_instance( name, version, path, instance, dependencies ))

	}

	/// Resolves each imported module name once, in import order, and collects
	/// the items to instantiate with.
	fn link_imports( &mut self, store: &mut Store<T>, module: &Module ) -> Result<( Vec<Extern>, Vec<LoadedModule> ), LoadError> {

		let imports = module.imports()
			.map(| import | ( import.module().to_string(), import.name().to_string() ))
			.collect::<Vec<_>>();

		let dependencies = imports.iter()
			.map(|( module_name, _ )| module_name.as_str() )
			.unique()
			.map(| module_name | self.resolve( store, module_name ).map(| module | ( module_name.to_string(), module )))
			.collect::<Result<HashMap<_, _>, _>>()?;

		let items = imports.iter()
			.map(|( module_name, field )| dependencies[ module_name ]
				.get_export( store, field )
				.ok_or_else(|| LoadError::MissingExport { module: module_name.clone(), field: field.clone() }))
			.collect::<Result<Vec<_>, _>>()?;

		let dependencies = imports.iter()
			.map(|( module_name, _ )| module_name )
			.unique()
			.map(| module_name | dependencies[ module_name ].clone() )
			.collect();

		Ok(( items, dependencies ))

	}

}

fn same_file( a: &Path, b: &Path ) -> bool {
	match ( a.canonicalize(), b.canonicalize() ) {
		( Ok( a ), Ok( b )) => a == b,
		_ => a == b,
	}
}

impl<T: 'static> std::fmt::Debug for LoadContext<T> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "LoadContext" )
			.field( "pool", &self.pool )
			.field( "share_with_host", &self.share_with_host )
			.field( "host_snapshot", &self.host_snapshot )
			.field( "host_resolved", &self.host_resolved.keys().collect::<Vec<_>>() )
			.field( "resolved", &self.resolved.keys().collect::<Vec<_>>() )
			.finish_non_exhaustive()
	}
}
