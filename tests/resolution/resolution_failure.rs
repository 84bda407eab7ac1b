use wasm_isolate::{ Loader, LoadError };
use wasmtime::{ Engine, Store };

use crate::fixture_modules::{ write_app, write_versioned_dep };

#[test]
fn missing_dependency_fails_the_load() {

	crate::init_tracing();
	let engine = Engine::default();
	let mut store = Store::new( &engine, () );

	let dir = fixture_dir!( "missing" );
	let app = write_app( &dir, "App", &[ "Present", "Missing" ]);
	write_versioned_dep( &dir, "Present", "1.0", 1 );

	match Loader::new().set_share_with_host( false ).register( &app ).expect( "failed to register App" ).load( &mut store ) {
		Err( LoadError::ResolutionFailure { name }) => assert_eq!( name, "Missing" ),
		other => panic!( "Expected ResolutionFailure, got: {:#?}", other ),
	}

}

#[test]
fn dependency_in_another_loaders_directory_is_not_found() {

	crate::init_tracing();
	let engine = Engine::default();
	let mut store = Store::new( &engine, () );

	let dir = fixture_dir!( "elsewhere" );
	let first = crate::fixture_modules::subdir( &dir, "first" );
	let second = crate::fixture_modules::subdir( &dir, "second" );
	let provider = write_app( &first, "Provider", &[ "Dep" ]);
	write_versioned_dep( &first, "Dep", "1.0", 1 );
	let consumer = write_app( &second, "Consumer", &[ "Dep" ]);

	Loader::new()
		.set_share_with_host( false )
		.register( &provider ).expect( "failed to register Provider" )
		.load( &mut store ).expect( "failed to load Provider" );

	match Loader::new().set_share_with_host( false ).register( &consumer ).expect( "failed to register Consumer" ).load( &mut store ) {
		Err( LoadError::ResolutionFailure { name }) => assert_eq!( name, "Dep" ),
		other => panic!( "Expected ResolutionFailure, got: {:#?}", other ),
	}

}
