use wasm_isolate::{ Loader, LoadError, MODULE_VERSION_SECTION };
use wasmtime::{ Engine, Store };

use crate::fixture_modules::{ write_app, write_module };

fn forwarding_module( target: &str ) -> String {
	format!( r#"(module
		(import "{target}" "version" (func $target (result i32)))
		(func (export "version") (result i32) call $target)
	)"# )
}

#[test]
fn mutual_imports_are_reported() {

	crate::init_tracing();
	let engine = Engine::default();
	let mut store = Store::new( &engine, () );

	let dir = fixture_dir!( "mutual" );
	let root = write_app( &dir, "Root", &[ "A" ]);
	write_module( &dir, "A.wasm", &forwarding_module( "B" ), &[( MODULE_VERSION_SECTION, b"1.0" )]);
	write_module( &dir, "B.wasm", &forwarding_module( "A" ), &[( MODULE_VERSION_SECTION, b"1.0" )]);

	match Loader::new().set_share_with_host( false ).register( &root ).expect( "failed to register Root" ).load( &mut store ) {
		Err( LoadError::CyclicDependency( name )) => assert_eq!( name, "A" ),
		other => panic!( "Expected CyclicDependency, got: {:#?}", other ),
	}

}

#[test]
fn module_importing_itself_is_reported() {

	crate::init_tracing();
	let engine = Engine::default();
	let mut store = Store::new( &engine, () );

	let dir = fixture_dir!( "self" );
	let root = write_app( &dir, "Root", &[ "Loop" ]);
	write_module( &dir, "Loop.wasm", &forwarding_module( "Loop" ), &[( MODULE_VERSION_SECTION, b"1.0" )]);

	match Loader::new().set_share_with_host( false ).register( &root ).expect( "failed to register Root" ).load( &mut store ) {
		Err( LoadError::CyclicDependency( name )) => assert_eq!( name, "Loop" ),
		other => panic!( "Expected CyclicDependency, got: {:#?}", other ),
	}

}

#[test]
fn cycle_through_registered_module_is_reported() {

	crate::init_tracing();
	let engine = Engine::default();
	let mut store = Store::new( &engine, () );

	// Root is never a candidate of its own directory, so only the cycle check can catch this.
	let dir = fixture_dir!( "through-root" );
	let root = write_app( &dir, "Root", &[ "A" ]);
	write_module( &dir, "A.wasm", &forwarding_module( "Root" ), &[( MODULE_VERSION_SECTION, b"1.0" )]);

	match Loader::new().set_share_with_host( false ).register( &root ).expect( "failed to register Root" ).load( &mut store ) {
		Err( LoadError::CyclicDependency( name )) => assert_eq!( name, "Root" ),
		other => panic!( "Expected CyclicDependency, got: {:#?}", other ),
	}

}
