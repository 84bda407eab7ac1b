use std::path::{ Path, PathBuf };
use itertools::Itertools ;
use pipe_trait::Pipe ;
use thiserror::Error ;
use tracing::trace ;

use crate::inspect::{ inspect, Candidate, InspectError };
use crate::utils::{ PartialSuccess, ResultList };



/// Default file extension of module binaries.
pub const MODULE_EXTENSION: &str = "wasm" ;

/// Failure to scan a requested module's directory.
#[derive( Error, Debug )]
pub enum ScanError {
	#[error( "Module file not found: {0}" )]
	FileNotFound( PathBuf ),
	#[error( "Module file has no parent directory: {0}" )]
	NoParentDirectory( PathBuf ),
	#[error( "Failed to list {dir}: {source}" )]
	DirectoryUnreadable { dir: PathBuf, source: std::io::Error },
}

/// Inspects every module file sitting beside `requested`.
///
/// Only the requested file's own directory is listed, without recursion, and
/// the requested file itself is skipped. Entries are visited in file name
/// order so the resulting candidate order is stable across platforms.
/// Candidates are not deduplicated here.
///
/// # Errors
/// Fails if `requested` doesn't exist or its directory can't be listed. Files
/// that fail inspection are returned alongside the successful candidates.
pub fn scan( requested: &Path, extension: &str ) -> Result<PartialSuccess<Vec<Candidate>, InspectError>, ScanError> {

	if !requested.is_file() { return Err( ScanError::FileNotFound( requested.to_path_buf() )) }

	let dir = match requested.parent() {
		Some( dir ) if dir.as_os_str().is_empty() => Path::new( "." ),
		Some( dir ) => dir,
		None => return Err( ScanError::NoParentDirectory( requested.to_path_buf() )),
	};
	let requested_name = requested.file_name();

	let entries = std::fs::read_dir( dir )
		.map_err(| source | ScanError::DirectoryUnreadable { dir: dir.to_path_buf(), source })?
		.map(| entry | entry.map(| entry | entry.path() ))
		.collect::<Result<Vec<_>, _>>()
		.map_err(| source | ScanError::DirectoryUnreadable { dir: dir.to_path_buf(), source })?;

	let siblings = entries.into_iter()
		.filter(| path | path.is_file() )
		.filter(| path | has_extension( path, extension ))
		.filter(| path | path.file_name() != requested_name )
		.sorted()
		.collect::<Vec<_>>();

	trace!( requested = %requested.display(), siblings = siblings.len(), "scanned module directory" );

	siblings.iter()
		.map(| path | inspect( path ))
		.collect::<ResultList<_, _>>()
		.deconstruct()
		.pipe( Ok )

}

fn has_extension( path: &Path, extension: &str ) -> bool {
	path.extension()
		.and_then(| ext | ext.to_str() )
		.is_some_and(| ext | ext.eq_ignore_ascii_case( extension ))
}
