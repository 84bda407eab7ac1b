//! Isolated loading of WebAssembly plugin sets with newest-version dependency arbitration.
//!
//! Plugins are core WebAssembly modules shipped as `.wasm` files, each sitting in a
//! directory next to the modules it imports from. Independently built plugins may
//! ship different versions of the same dependency. `wasm_isolate` loads a set of
//! plugins so that every dependency name is bound to exactly one module, the
//! newest one found beside any plugin of the set, while keeping separately loaded
//! sets from seeing each other's dependencies.
//!
//! # Core Concepts
//!
//! - [`ModuleVersion`]: A `major.minor[.build[.revision]]` version, only used to
//! 	decide which of several same-named modules is newer.
//!
//! - [`Candidate`]: A module file found beside a plugin, with its identity name
//! 	(the file stem, which is what importers refer to it by) and its version.
//! 	Versions are read from the `file-version` custom section, falling back to the
//! 	`module-version` custom section. See [`inspect`].
//!
//! - [`DependencyPool`]: All candidates of a load merged so that each name maps to
//! 	its highest version.
//!
//! - [`LoadContext`]: The resolution scope of one load. Every import's module name
//! 	is resolved through it: first the [`HostSnapshot`] (if sharing with the host),
//! 	then the [`DefaultResolver`], then modules already loaded by the context, and
//! 	finally the pool.
//!
//! - [`Loader`]: Collects plugin files, scans their directories and loads them
//! 	through a fresh context.
//!
//! - [`HostSnapshot`]: The modules the host itself had loaded at a chosen point in
//! 	time. Plugins bind to these instead of loading their own copies when sharing
//! 	with the host is enabled.
//!
//! - [`LoadedModule`]: A handle to a loaded module. Cloning it does not load
//! 	anything again; equality is identity.
//!
//! # Example
//!
//! ```no_run
//! use wasm_isolate::{ Loader, HostSnapshot, make_process_snapshot };
//! use wasmtime::{ Engine, Linker, Store };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::default();
//! let mut store = Store::new( &engine, () );
//!
//! // Whatever the host defines before taking the snapshot is shared with plugins
//! // that opt in. Plugins importing "host" get these very items.
//! let mut linker = Linker::<()>::new( &engine );
//! linker.func_wrap( "host", "log", | value: i32 | println!( "{value}" ))?;
//! make_process_snapshot( HostSnapshot::capture( &linker, &mut store ));
//!
//! // Both plugins are loaded through one context: a dependency both of their
//! // directories ship is loaded once, from whichever directory has the newer one.
//! let plugins = Loader::new()
//! 	.register( "plugins/a/PluginA.wasm" )?
//! 	.register( "plugins/b/PluginB.wasm" )?
//! 	.load( &mut store )?;
//!
//! // A second loader gets a context of its own and never sees the modules above.
//! let isolated = Loader::new()
//! 	.set_share_with_host( false )
//! 	.register( "plugins/c/PluginC.wasm" )?
//! 	.load( &mut store )?;
//!
//! for plugin in plugins.iter().chain( &isolated ) {
//! 	plugin.run_entry_point( &mut store, "run" )?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Host Snapshots
//!
//! A snapshot groups everything a host [`Linker`]( wasmtime::Linker ) defines by
//! module name:
//!
//! ```
//! use wasm_isolate::HostSnapshot ;
//! use wasmtime::{ Engine, Linker, Store };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::default();
//! let mut store = Store::new( &engine, () );
//! let mut linker = Linker::<()>::new( &engine );
//! linker.func_wrap( "Dep", "version", || 1_i32 )?;
//!
//! let snapshot = HostSnapshot::capture( &linker, &mut store );
//! assert!( snapshot.contains( "Dep" ));
//! assert!( snapshot.get( "Dep" ).unwrap().get_export( &mut store, "version" ).is_some() );
//! # Ok(())
//! # }
//! ```
//!
//! Snapshot items belong to the store they were captured with, so loaders sharing
//! with the host must load into that same store.
//!
//! # Errors
//!
//! Inspection failures of individual files beside a plugin never abort a scan; they
//! are logged and listed by [`Loader::diagnostics`]. Everything else (a missing
//! file, an invalid module, an import no source can satisfy) fails the load with a
//! [`LoadError`].

mod version ;
pub mod inspect ;
mod scan ;
mod pool ;
mod loaded_module ;
mod resolver ;
mod host_snapshot ;
mod context ;
mod loader ;
mod utils ;

pub use version::{ ModuleVersion, VersionParseError };
pub use inspect::{ Candidate, InspectError, FILE_VERSION_SECTION, MODULE_VERSION_SECTION };
pub use scan::{ scan, ScanError, MODULE_EXTENSION };
pub use pool::DependencyPool ;
pub use loaded_module::{ LoadedModule, ModuleOrigin };
pub use resolver::{ DefaultResolver, NoDefaultResolver };
pub use host_snapshot::{ HostSnapshot, make_process_snapshot, process_snapshot };
pub use context::{ LoadContext, LoadError };
pub use loader::Loader ;
pub use utils::PartialSuccess ;
