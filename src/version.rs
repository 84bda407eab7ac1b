//! Comparable module versions.
//!
//! A [`ModuleVersion`] is only ever used to decide which of several same-named
//! modules is newer. It carries no compatibility meaning: `2.0` does not
//! "break" `1.9`, it simply wins.

use std::str::FromStr ;
use thiserror::Error ;



/// A `major.minor[.build[.revision]]` version.
///
/// Ordering is component-wise from left to right. A missing trailing component
/// orders below any present one, so `1.2 < 1.2.0 < 1.2.0.0 < 1.2.0.1`.
///
/// ```
/// use wasm_isolate::ModuleVersion ;
///
/// let old: ModuleVersion = "3.1.0.0".parse().unwrap();
/// let new: ModuleVersion = "3.1.1".parse().unwrap();
/// assert!( new > old );
/// assert_eq!( new.to_string(), "3.1.1" );
/// ```
#[derive( Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash )]
pub struct ModuleVersion {
	major: u32,
	minor: u32,
	build: Option<u32>,
	revision: Option<u32>,
}

impl ModuleVersion {

	/// A two-component version.
	pub const fn new( major: u32, minor: u32 ) -> Self {
		Self { major, minor, build: None, revision: None }
	}

	/// A four-component version.
	pub const fn full( major: u32, minor: u32, build: u32, revision: u32 ) -> Self {
		Self { major, minor, build: Some( build ), revision: Some( revision ) }
	}

	#[inline] pub fn major( &self ) -> u32 { self.major }
	#[inline] pub fn minor( &self ) -> u32 { self.minor }
	#[inline] pub fn build( &self ) -> Option<u32> { self.build }
	#[inline] pub fn revision( &self ) -> Option<u32> { self.revision }

}

/// Reasons a version string was rejected.
#[derive( Error, Debug, Clone, PartialEq, Eq )]
pub enum VersionParseError {
	/// Versions need between two and four dot-separated components.
	#[error( "Expected 2 to 4 version components, found {0}" )] ComponentCount( usize ),
	/// A component was not a non-negative integer.
	#[error( "Invalid version component: {0:?}" )] InvalidComponent( String ),
}

impl FromStr for ModuleVersion {
	type Err = VersionParseError ;

	fn from_str( text: &str ) -> Result<Self, Self::Err> {

		let components = text.trim()
			.split( '.' )
			.map(| component | component.trim().parse::<u32>()
				.map_err(| _ | VersionParseError::InvalidComponent( component.to_string() )))
			.collect::<Result<Vec<_>, _>>()?;

		match components.as_slice() {
			[ major, minor ] => Ok( Self::new( *major, *minor )),
			[ major, minor, build ] => Ok( Self { major: *major, minor: *minor, build: Some( *build ), revision: None }),
			[ major, minor, build, revision ] => Ok( Self::full( *major, *minor, *build, *revision )),
			other => Err( VersionParseError::ComponentCount( other.len() )),
		}

	}
}

impl std::fmt::Display for ModuleVersion {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result {
		write!( f, "{}.{}", self.major, self.minor )?;
		if let Some( build ) = self.build { write!( f, ".{}", build )?; }
		if let Some( revision ) = self.revision { write!( f, ".{}", revision )?; }
		Ok(())
	}
}
