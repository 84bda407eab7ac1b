use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use tracing::{ debug, warn };
use wasmtime::Store ;

use crate::{ Candidate, DefaultResolver, DependencyPool, HostSnapshot, InspectError, LoadContext, LoadError, LoadedModule, NoDefaultResolver };
use crate::host_snapshot::process_snapshot ;
use crate::scan::{ scan, MODULE_EXTENSION };



/// Loads a set of module files, and the dependencies found beside them, into one
/// isolated [`LoadContext`].
///
/// Register every file first, then call [`Loader::load`] once. Each registered
/// file's directory is scanned on registration; on load the candidates of all
/// directories are merged so that every dependency name is bound to the newest
/// version found in any of them.
///
/// ```no_run
/// # use wasm_isolate::{ Loader, LoadError };
/// # use wasmtime::{ Engine, Store };
/// # fn main() -> Result<(), LoadError> {
/// let engine = Engine::default();
/// let mut store = Store::new( &engine, () );
///
/// let modules = Loader::new()
/// 	.set_share_with_host( false )
/// 	.register( "plugins/version1/Version1.wasm" )?
/// 	.register( "plugins/version2/Version2.wasm" )?
/// 	.load( &mut store )?;
///
/// for module in &modules {
/// 	module.run_entry_point( &mut store, "run" )?;
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Type Parameters
/// - `T`: data of the wasmtime [`Store`] modules are loaded into
pub struct Loader<T: 'static> {
	files: Vec<PathBuf>,
	candidates: Vec<Candidate>,
	diagnostics: Vec<InspectError>,
	share_with_host: bool,
	host_snapshot: Option<Arc<HostSnapshot>>,
	default_resolver: Arc<dyn DefaultResolver<T>>,
	extension: String,
}

impl<T: 'static> Default for Loader<T> {
	fn default() -> Self { Self::new() }
}

impl<T: 'static> Loader<T> {

	/// Creates an empty loader that shares with the process-wide
	/// [`HostSnapshot`], if one was made, and has no default resolver.
	pub fn new() -> Self {
		Self {
			files: Vec::new(),
			candidates: Vec::new(),
			diagnostics: Vec::new(),
			share_with_host: true,
			host_snapshot: process_snapshot(),
			default_resolver: Arc::new( NoDefaultResolver ),
			extension: MODULE_EXTENSION.to_string(),
		}
	}

	/// Uses `snapshot` instead of the process-wide snapshot.
	pub fn with_host_snapshot( mut self, snapshot: Arc<HostSnapshot> ) -> Self {
		self.host_snapshot = Some( snapshot );
		self
	}

	/// Sets the host resolver consulted before this loader's own modules.
	pub fn with_default_resolver( mut self, resolver: impl DefaultResolver<T> + 'static ) -> Self {
		self.default_resolver = Arc::new( resolver );
		self
	}

	/// Changes which file extension marks module files when scanning. Defaults to `wasm`.
	///
	/// Only affects files registered afterwards.
	pub fn with_module_extension( mut self, extension: impl Into<String> ) -> Self {
		self.extension = extension.into();
		self
	}

	/// Whether the load binds to the host's modules before anything else. Defaults to `true`.
	pub fn set_share_with_host( &mut self, share_with_host: bool ) -> &mut Self {
		self.share_with_host = share_with_host ;
		self
	}

	/// Adds `file` to the files to load and scans its directory for dependencies.
	///
	/// Files that fail version inspection are logged and kept in
	/// [`Loader::diagnostics`]; they never take part in version arbitration.
	///
	/// # Errors
	/// Fails if `file` doesn't exist or its directory can't be listed.
	pub fn register( &mut self, file: impl AsRef<Path> ) -> Result<&mut Self, LoadError> {

		let file = file.as_ref();
		let ( candidates, errors ) = scan( file, &self.extension )?;

		debug!( file = %file.display(), candidates = candidates.len(), "registered module" );
		errors.iter().for_each(| err | warn!( file = %err.path().display(), "{}", err ));

		self.files.push( file.to_path_buf() );
		self.candidates.extend( candidates );
		self.diagnostics.extend( errors );
		Ok( self )

	}

	/// Files registered so far, in registration order.
	#[inline] pub fn files( &self ) -> &[PathBuf] { &self.files }

	/// Inspection failures encountered while scanning.
	#[inline] pub fn diagnostics( &self ) -> &[InspectError] { &self.diagnostics }

	/// Builds the load context for the registered files without loading any of them.
	pub fn context( &self ) -> LoadContext<T> {
		LoadContext::new( DependencyPool::merge( self.candidates.iter().cloned() ), Arc::clone( &self.default_resolver ))
			.with_host_sharing( self.share_with_host, self.host_snapshot.clone() )
	}

	/// Loads every registered file into `store` through one fresh context.
	///
	/// Modules are returned in registration order. Each file is loaded, with all
	/// its dependencies, before the next one starts. A registered file that was
	/// already pulled in as a dependency of an earlier one is not loaded again;
	/// its existing module is returned, so importers and caller share one module.
	///
	/// # Errors
	/// Fails on the first module that can't be loaded, including a registered
	/// file whose name the context already bound to a different file
	/// ([`LoadError::IdentityConflict`]).
	pub fn load( &self, store: &mut Store<T> ) -> Result<Vec<LoadedModule>, LoadError> {
		self.load_with_context( store ).map(|( modules, _ )| modules )
	}

	/// Like [`Loader::load`], also returning the context the modules were loaded through.
	///
	/// # Errors
	/// Fails on the first module that can't be loaded.
	pub fn load_with_context( &self, store: &mut Store<T> ) -> Result<( Vec<LoadedModule>, LoadContext<T> ), LoadError> {
		let mut context = self.context();
		let modules = self.files.iter()
			.map(| file | context.load_from_path( store, file ))
			.collect::<Result<Vec<_>, _>>()?;
		Ok(( modules, context ))
	}

}

impl<T: 'static> std::fmt::Debug for Loader<T> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Loader" )
			.field( "files", &self.files )
			.field( "candidates", &self.candidates )
			.field( "diagnostics", &self.diagnostics )
			.field( "share_with_host", &self.share_with_host )
			.field( "host_snapshot", &self.host_snapshot )
			.field( "extension", &self.extension )
			.finish_non_exhaustive()
	}
}
