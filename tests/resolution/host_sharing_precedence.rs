use std::sync::Arc ;
use wasm_isolate::{ HostSnapshot, Loader, ModuleOrigin, FILE_VERSION_SECTION };
use wasmtime::{ Engine, Linker, Store };

use crate::fixture_modules::{ write_app, write_module, write_versioned_dep, call_i32 };

/// Would trap on instantiation, so binding to it fails the load.
const TRAPPING_DEP: &str = r#"(module
	(func $boom unreachable)
	(start $boom)
	(func (export "version") (result i32) i32.const 99)
)"# ;

fn host_with_dep( engine: &Engine, store: &mut Store<()> ) -> Arc<HostSnapshot> {
	let mut linker = Linker::<()>::new( engine );
	linker.func_wrap( "Dep", "version", || 1_i32 ).expect( "failed to define host Dep" );
	Arc::new( HostSnapshot::capture( &linker, store ))
}

#[test]
fn host_module_wins_over_newer_pool_version() {

	crate::init_tracing();
	let engine = Engine::default();
	let mut store = Store::new( &engine, () );
	let snapshot = host_with_dep( &engine, &mut store );

	let dir = fixture_dir!( "host-wins" );
	let app = write_app( &dir, "App", &[ "Dep" ]);
	write_module( &dir, "Dep.wasm", TRAPPING_DEP, &[( FILE_VERSION_SECTION, b"99.0" )]);

	let ( modules, context ) = Loader::new()
		.with_host_snapshot( Arc::clone( &snapshot ))
		.register( &app ).expect( "failed to register App" )
		.load_with_context( &mut store ).expect( "failed to load App" );

	assert_eq!( call_i32( &modules[0], &mut store, "Dep_version" ), 1 );
	match modules[0].dependency( "Dep" ) {
		Some( dep ) if dep.origin() == &ModuleOrigin::Host => {
			assert!( dep.same_module( snapshot.get( "Dep" ).expect( "snapshot lost Dep" )));
		}
		other => panic!( "Expected the host's Dep, got: {:#?}", other ),
	}
	assert!( context.loaded_modules().all(| module | module.name() != "Dep" ));

}

#[test]
fn disabled_sharing_ignores_the_snapshot() {

	crate::init_tracing();
	let engine = Engine::default();
	let mut store = Store::new( &engine, () );
	let snapshot = host_with_dep( &engine, &mut store );

	let dir = fixture_dir!( "host-ignored" );
	let app = write_app( &dir, "App", &[ "Dep" ]);
	let dep = write_versioned_dep( &dir, "Dep", "1.0", 2 );

	let modules = Loader::new()
		.with_host_snapshot( snapshot )
		.set_share_with_host( false )
		.register( &app ).expect( "failed to register App" )
		.load( &mut store ).expect( "failed to load App" );

	assert_eq!( call_i32( &modules[0], &mut store, "Dep_version" ), 2 );
	assert_eq!( modules[0].dependency( "Dep" ).map( wasm_isolate::LoadedModule::origin ), Some( &ModuleOrigin::File( dep )));

}

#[test]
fn sharing_falls_through_for_names_the_host_lacks() {

	crate::init_tracing();
	let engine = Engine::default();
	let mut store = Store::new( &engine, () );
	let snapshot = host_with_dep( &engine, &mut store );

	let dir = fixture_dir!( "host-partial" );
	let app = write_app( &dir, "App", &[ "Dep", "Other" ]);
	write_versioned_dep( &dir, "Dep", "5.0", 5 );
	write_versioned_dep( &dir, "Other", "1.0", 7 );

	let modules = Loader::new()
		.with_host_snapshot( snapshot )
		.register( &app ).expect( "failed to register App" )
		.load( &mut store ).expect( "failed to load App" );

	assert_eq!( call_i32( &modules[0], &mut store, "Dep_version" ), 1 );
	assert_eq!( call_i32( &modules[0], &mut store, "Other_version" ), 7 );

}
