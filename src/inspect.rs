//! Version inspection of candidate module files.
//!
//! Two version marks may be embedded in a module as custom sections:
//!
//! - [`FILE_VERSION_SECTION`]: the build-level version. It is bumped on every
//! 	release build and is the preferred tie-breaker.
//! - [`MODULE_VERSION_SECTION`]: the coarse version the module declares for
//! 	itself. Used whenever the file version is missing or unparseable.

use std::path::{ Path, PathBuf };
use thiserror::Error ;
use wasmparser::{ Parser, Payload };

use crate::ModuleVersion ;



/// Name of the custom section holding the fine-grained file version.
pub const FILE_VERSION_SECTION: &str = "file-version" ;

/// Name of the custom section holding the coarse module version.
pub const MODULE_VERSION_SECTION: &str = "module-version" ;

/// A module file found beside a requested module, with its identity and version.
///
/// Candidates only live long enough to be merged into a
/// [`DependencyPool`]( crate::DependencyPool ).
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct Candidate {
	name: String,
	version: ModuleVersion,
	path: PathBuf,
}

impl Candidate {

	pub fn new( name: impl Into<String>, version: ModuleVersion, path: impl Into<PathBuf> ) -> Self {
		Self { name: name.into(), version, path: path.into() }
	}

	/// Identity name the module is looked up by.
	#[inline] pub fn name( &self ) -> &str { &self.name }

	/// Version used to pick between same-named candidates.
	#[inline] pub fn version( &self ) -> ModuleVersion { self.version }

	/// Location of the module file.
	#[inline] pub fn path( &self ) -> &Path { &self.path }

}

/// Failure to inspect one candidate file.
///
/// Inspection failures are per-candidate: the scan that produced them still
/// yields every other candidate.
#[derive( Error, Debug )]
pub enum InspectError {
	#[error( "Failed to read {path}: {source}" )]
	Io { path: PathBuf, source: std::io::Error },
	#[error( "Malformed module {path}: {source}" )]
	Malformed { path: PathBuf, source: wasmparser::BinaryReaderError },
	#[error( "Version unreadable for {path}: {reason}" )]
	VersionUnreadable { path: PathBuf, reason: String },
}

impl InspectError {
	/// The file the failure refers to.
	pub fn path( &self ) -> &Path {
		match self {
			Self::Io { path, .. } | Self::Malformed { path, .. } | Self::VersionUnreadable { path, .. } => path,
		}
	}
}

/// Reads a module file and determines its identity name and version.
///
/// # Errors
/// Fails if the file can't be read, is not a WebAssembly binary, or carries
/// neither a usable file version nor a usable module version.
pub fn inspect( path: &Path ) -> Result<Candidate, InspectError> {
	let bytes = std::fs::read( path )
		.map_err(| source | InspectError::Io { path: path.to_path_buf(), source })?;
	let version = read_version( &bytes ).map_err(| err | err.at( path ))?;
	Ok( Candidate::new( identity_name( path ), version, path ))
}

/// File stem of `path`, the name other modules import it by.
pub(crate) fn identity_name( path: &Path ) -> String {
	path.file_stem()
		.map(| stem | stem.to_string_lossy().into_owned() )
		.unwrap_or_default()
}

pub(crate) enum VersionReadError {
	Malformed( wasmparser::BinaryReaderError ),
	Unreadable( String ),
}

impl VersionReadError {
	pub(crate) fn at( self, path: &Path ) -> InspectError {
		match self {
			Self::Malformed( source ) => InspectError::Malformed { path: path.to_path_buf(), source },
			Self::Unreadable( reason ) => InspectError::VersionUnreadable { path: path.to_path_buf(), reason },
		}
	}
}

pub(crate) fn read_version( bytes: &[u8] ) -> Result<ModuleVersion, VersionReadError> {

	let mut file_version = None ;
	let mut module_version = None ;

	for payload in Parser::new( 0 ).parse_all( bytes ) {
		if let Payload::CustomSection( reader ) = payload.map_err( VersionReadError::Malformed )? {
			match reader.name() {
				FILE_VERSION_SECTION => file_version = Some( reader.data() ),
				MODULE_VERSION_SECTION => module_version = Some( reader.data() ),
				_ => {}
			}
		}
	}

	if let Some( version ) = file_version.and_then(| data | parse_section( data ).ok() ) {
		return Ok( version );
	}

	match module_version {
		Some( data ) => parse_section( data )
			.map_err(| reason | VersionReadError::Unreadable( format!( "{} section: {}", MODULE_VERSION_SECTION, reason ))),
		None => Err( VersionReadError::Unreadable( format!(
			"no usable {} section and no {} section", FILE_VERSION_SECTION, MODULE_VERSION_SECTION,
		))),
	}

}

fn parse_section( data: &[u8] ) -> Result<ModuleVersion, String> {
	std::str::from_utf8( data )
		.map_err(| err | err.to_string() )?
		.parse::<ModuleVersion>()
		.map_err(| err | err.to_string() )
}
