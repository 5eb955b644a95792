use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use log::{debug, error, info};

use crate::model::ModelGraph;
use crate::script::{Adapters, ExportFileType, Result, ScriptError};
use crate::util::write_atomic;

/// Extension of Diesel model containers.
pub const MODEL_EXTENSION: &str = "model";

/// One file that could not be exported.
#[derive(Debug)]
pub struct BatchFailure {
	/// Source file.
	pub path: PathBuf,
	/// Why it failed.
	pub error: ScriptError,
}

/// Outcome of [`batch_export`], in discovery order.
#[derive(Debug, Default)]
pub struct BatchReport {
	/// Written output files.
	pub exported: Vec<PathBuf>,
	/// Files that failed to load or export.
	pub failures: Vec<BatchFailure>,
	/// Whether the stop flag ended the run early.
	pub cancelled: bool,
}

/// Every `.model` file below `dir`, sorted by path.
pub fn find_model_files(dir: &Path) -> Result<Vec<PathBuf>> {
	let mut out = Vec::new();
	let mut pending = vec![dir.to_path_buf()];
	while let Some(current) = pending.pop() {
		let entries = fs::read_dir(&current).map_err(|err| ScriptError::io(&current, err))?;
		for entry in entries {
			let entry = entry.map_err(|err| ScriptError::io(&current, err))?;
			let path = entry.path();
			let file_type = entry.file_type().map_err(|err| ScriptError::io(&path, err))?;
			if file_type.is_dir() {
				pending.push(path);
			} else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(MODEL_EXTENSION)) {
				out.push(path);
			}
		}
	}
	out.sort();
	Ok(out)
}

/// Output path for `source`: same directory, extension replaced.
pub fn export_path(source: &Path, file_type: ExportFileType) -> PathBuf {
	source.with_extension(file_type.extension())
}

fn export_one(path: &Path, file_type: ExportFileType, adapters: &Adapters) -> Result<PathBuf> {
	let bytes = fs::read(path).map_err(|err| ScriptError::io(path, err))?;
	let graph = ModelGraph::load(&bytes)?;
	let output = adapters.exporter_for(file_type)?.export(&graph)?;
	let target = export_path(path, file_type);
	write_atomic(&target, &output).map_err(|err| ScriptError::io(&target, err))?;
	Ok(target)
}

/// Export every `.model` file under `dir` as `file_type`.
///
/// Files are spread over scoped worker threads, each decoding into its own
/// graph. A failing file is recorded and logged; the rest still run. The
/// stop flag is checked before each file.
pub fn batch_export(dir: &Path, file_type: ExportFileType, adapters: &Adapters, cancel: &AtomicBool) -> Result<BatchReport> {
	let files = find_model_files(dir)?;
	let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get).min(files.len()).max(1);
	info!("batch exporting {} files from {} on {workers} workers", files.len(), dir.display());

	let next = AtomicUsize::new(0);
	let results: Mutex<Vec<(usize, Result<PathBuf>)>> = Mutex::new(Vec::with_capacity(files.len()));
	thread::scope(|scope| {
		for _ in 0..workers {
			scope.spawn(|| {
				loop {
					if cancel.load(Ordering::Relaxed) {
						break;
					}
					let index = next.fetch_add(1, Ordering::Relaxed);
					let Some(path) = files.get(index) else {
						break;
					};
					debug!("exporting {}", path.display());
					let result = export_one(path, file_type, adapters);
					if let Err(err) = &result {
						error!("{}: {err}", path.display());
					}
					if let Ok(mut guard) = results.lock() {
						guard.push((index, result));
					}
				}
			});
		}
	});

	let mut results = results.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
	results.sort_by_key(|(index, _)| *index);

	let mut report = BatchReport {
		cancelled: results.len() < files.len() && cancel.load(Ordering::Relaxed),
		..BatchReport::default()
	};
	for (index, result) in results {
		match result {
			Ok(target) => report.exported.push(target),
			Err(error) => report.failures.push(BatchFailure {
				path: files[index].clone(),
				error,
			}),
		}
	}
	Ok(report)
}

#[cfg(test)]
mod tests;
