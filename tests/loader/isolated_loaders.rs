use wasm_isolate::Loader ;
use wasmtime::{ Engine, Store };

use crate::fixture_modules::{ subdir, write_app, write_versioned_dep, call_i32 };

#[test]
fn separate_loaders_keep_their_own_versions() {

	crate::init_tracing();
	let engine = Engine::default();
	let mut store = Store::new( &engine, () );

	let dir = fixture_dir!( "separate" );
	let old_dir = subdir( &dir, "version1" );
	let new_dir = subdir( &dir, "version2" );
	let first = write_app( &old_dir, "Version1", &[ "Dep" ]);
	write_versioned_dep( &old_dir, "Dep", "1.0.0.0", 10 );
	let second = write_app( &new_dir, "Version2", &[ "Dep" ]);
	write_versioned_dep( &new_dir, "Dep", "1.1.0.0", 11 );

	let old = Loader::new()
		.set_share_with_host( false )
		.register( &first ).expect( "failed to register Version1" )
		.load( &mut store ).expect( "failed to load Version1" );
	let new = Loader::new()
		.set_share_with_host( false )
		.register( &second ).expect( "failed to register Version2" )
		.load( &mut store ).expect( "failed to load Version2" );

	assert_eq!( call_i32( &old[0], &mut store, "Dep_version" ), 10 );
	assert_eq!( call_i32( &new[0], &mut store, "Dep_version" ), 11 );

	match ( old[0].dependency( "Dep" ), new[0].dependency( "Dep" )) {
		( Some( a ), Some( b )) if !a.same_module( b ) => {}
		other => panic!( "Expected two distinct Dep modules, got: {:#?}", other ),
	}

}

#[test]
fn loading_twice_builds_a_fresh_context() {

	crate::init_tracing();
	let engine = Engine::default();
	let mut store = Store::new( &engine, () );

	let dir = fixture_dir!( "twice" );
	let app = write_app( &dir, "App", &[ "Dep" ]);
	write_versioned_dep( &dir, "Dep", "1.0", 1 );

	let mut loader = Loader::new();
	loader.set_share_with_host( false ).register( &app ).expect( "failed to register App" );
	let first = loader.load( &mut store ).expect( "first load failed" );
	let second = loader.load( &mut store ).expect( "second load failed" );

	assert!( !first[0].same_module( &second[0] ));
	match ( first[0].dependency( "Dep" ), second[0].dependency( "Dep" )) {
		( Some( a ), Some( b )) if !a.same_module( b ) => {}
		other => panic!( "Expected each load to bind its own Dep, got: {:#?}", other ),
	}

}
