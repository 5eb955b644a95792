use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Write `bytes` to `path` all-or-nothing: a temporary sibling is written,
/// synced, and renamed over the destination.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let mut file = NamedTempFile::new_in(dir)?;
	file.write_all(bytes)?;
	file.as_file().sync_all()?;
	file.persist(path).map_err(|err| err.error)?;
	Ok(())
}
