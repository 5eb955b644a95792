use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};

use crate::model::ModelGraph;
use crate::script::{Adapters, DataState, ExportFileType, Result, ScriptError, ScriptItem, Validator, parse_script};

/// Deepest allowed chain of nested Run-script items.
pub const MAX_SCRIPT_DEPTH: usize = 16;

/// Mutable context threaded through every item of a run.
#[derive(Debug)]
pub struct ScriptState {
	model: Option<ModelGraph>,
	/// Base for relative paths.
	pub work_dir: PathBuf,
	/// Export format used when the output path has no known extension.
	pub default_export_type: ExportFileType,
	/// Whether imports may create missing models.
	pub create_new_objects: bool,
	/// Attachment node for created models.
	pub root_point: Option<String>,
	adapters: Arc<Adapters>,
	cancel: Arc<AtomicBool>,
	last_import: Option<Vec<String>>,
	depth: usize,
}

impl ScriptState {
	/// Fresh state with built-in adapters and default settings.
	pub fn new(work_dir: impl Into<PathBuf>) -> Self {
		Self {
			model: None,
			work_dir: work_dir.into(),
			default_export_type: ExportFileType::Obj,
			create_new_objects: false,
			root_point: None,
			adapters: Arc::new(Adapters::builtin()),
			cancel: Arc::new(AtomicBool::new(false)),
			last_import: None,
			depth: 0,
		}
	}

	/// Replace the adapter set.
	pub fn with_adapters(mut self, adapters: Arc<Adapters>) -> Self {
		self.adapters = adapters;
		self
	}

	/// Adapters used by import and export items.
	pub fn adapters(&self) -> &Adapters {
		&self.adapters
	}

	/// Shared stop flag; raising it stops the run before the next item or batch file.
	pub fn cancel_handle(&self) -> Arc<AtomicBool> {
		Arc::clone(&self.cancel)
	}

	pub(crate) fn cancel_flag(&self) -> &AtomicBool {
		&self.cancel
	}

	/// Whether the stop flag is raised.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.load(Ordering::Relaxed)
	}

	/// `path` joined onto the working directory unless absolute.
	pub fn resolve_path(&self, path: &Path) -> PathBuf {
		resolve_in(&self.work_dir, path)
	}

	/// Whether a model is present.
	pub fn data_state(&self) -> DataState {
		if self.model.is_some() { DataState::HasData } else { DataState::NoData }
	}

	/// Current model, if any.
	pub fn graph(&self) -> Option<&ModelGraph> {
		self.model.as_ref()
	}

	/// Current model, failing when none exists.
	pub fn model(&self) -> Result<&ModelGraph> {
		self.model.as_ref().ok_or(ScriptError::NoModel)
	}

	/// Mutable current model, failing when none exists.
	pub fn model_mut(&mut self) -> Result<&mut ModelGraph> {
		self.model.as_mut().ok_or(ScriptError::NoModel)
	}

	/// Swap in a new model; forgets the previous import.
	pub fn replace_model(&mut self, graph: ModelGraph) {
		self.model = Some(graph);
		self.last_import = None;
	}

	/// Names merged by the most recent import.
	pub fn last_import(&self) -> &[String] {
		self.last_import.as_deref().unwrap_or_default()
	}

	pub(crate) fn set_last_import(&mut self, names: Vec<String>) {
		self.last_import = Some(names);
	}

	/// Validator seeded from the live state.
	pub fn validator(&self) -> Validator {
		Validator::new(self.data_state(), self.last_import.is_some())
	}

	/// Validate `items` against the live state without running anything.
	///
	/// Nested scripts are read and walked in place, so their effect on the
	/// model is known before the first item executes.
	pub fn check_items(&self, items: &[ScriptItem]) -> Result<()> {
		let mut validator = self.validator();
		check_nested(&mut validator, items, &self.work_dir, self.depth)
	}

	/// Validate `items` against the live state, then run them in order.
	pub fn execute_items(&mut self, items: &[ScriptItem]) -> Result<()> {
		self.check_items(items)?;
		for (index, item) in items.iter().enumerate() {
			if self.is_cancelled() {
				return Err(ScriptError::Cancelled);
			}
			debug!("action {index}:{} at depth {}", item.kind(), self.depth);
			item.execute(self)?;
		}
		Ok(())
	}

	/// Validate and run a single item against the live state.
	pub fn execute_item(&mut self, item: &ScriptItem) -> Result<()> {
		self.check_items(std::slice::from_ref(item))?;
		item.execute(self)
	}

	/// Parse and run a script file on this state.
	///
	/// Relative paths inside the script resolve against its directory; the
	/// working directory is restored afterwards, on success or failure.
	pub fn run_script(&mut self, path: &Path) -> Result<()> {
		if self.depth >= MAX_SCRIPT_DEPTH {
			return Err(ScriptError::ScriptDepth { limit: MAX_SCRIPT_DEPTH });
		}

		let path = self.resolve_path(path);
		let items = read_script(&path)?;
		let script_dir = script_dir(&path, &self.work_dir);
		info!("running {} ({} items)", path.display(), items.len());

		let saved = std::mem::replace(&mut self.work_dir, script_dir);
		self.depth += 1;
		let result = self.execute_items(&items);
		self.depth -= 1;
		self.work_dir = saved;
		result
	}
}

fn resolve_in(dir: &Path, path: &Path) -> PathBuf {
	if path.is_absolute() { path.to_path_buf() } else { dir.join(path) }
}

fn script_dir(path: &Path, fallback: &Path) -> PathBuf {
	path.parent().map_or_else(|| fallback.to_path_buf(), Path::to_path_buf)
}

fn read_script(path: &Path) -> Result<Vec<ScriptItem>> {
	let text = fs::read_to_string(path).map_err(|err| ScriptError::io(path, err))?;
	parse_script(&text, path)
}

fn check_nested(validator: &mut Validator, items: &[ScriptItem], dir: &Path, depth: usize) -> Result<()> {
	for (index, item) in items.iter().enumerate() {
		let ScriptItem::RunScript(path) = item else {
			validator.check(index, item)?;
			continue;
		};
		if depth >= MAX_SCRIPT_DEPTH {
			return Err(ScriptError::ScriptDepth { limit: MAX_SCRIPT_DEPTH });
		}
		let path = resolve_in(dir, path);
		let nested = read_script(&path)?;
		check_nested(validator, &nested, &script_dir(&path, dir), depth + 1)?;
	}
	Ok(())
}
