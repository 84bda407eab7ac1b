use std::collections::HashMap ;
use wasmtime::{ Linker, Store };

use crate::LoadedModule ;



/// The host's own module resolution, consulted before a [`LoadContext`]( crate::LoadContext )
/// falls back to its own cache and pool.
///
/// Whatever this returns for a name wins over anything on disk, regardless of
/// the host sharing flag, so keep it to modules every plugin set must see the
/// same way (platform functions, `env` shims and the like).
pub trait DefaultResolver<T>: Send + Sync {
	/// Returns a module for `name`, or `None` to let resolution continue.
	fn resolve_by_identity( &self, store: &mut Store<T>, name: &str ) -> Option<LoadedModule> ;
}

/// A resolver that never resolves anything.
#[derive( Debug, Clone, Copy, Default )]
pub struct NoDefaultResolver ;

impl<T> DefaultResolver<T> for NoDefaultResolver {
	fn resolve_by_identity( &self, _: &mut Store<T>, _: &str ) -> Option<LoadedModule> { None }
}

/// Resolves `name` to everything the linker defines under that module name.
impl<T: 'static> DefaultResolver<T> for Linker<T> {
	fn resolve_by_identity( &self, store: &mut Store<T>, name: &str ) -> Option<LoadedModule> {
		let exports = self.iter( &mut *store )
			.filter(|( module, _, _ )| *module == name )
			.map(|( _, field, item )| ( field.to_string(), item ))
			.collect::<HashMap<_, _>>();
		match exports.is_empty() {
			true => None,
			false => Some( LoadedModule::from_host( name, exports )),
		}
	}
}
