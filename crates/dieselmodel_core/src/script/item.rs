use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{info, warn};
use serde::Serialize;

use crate::model::{MergeOptions, ModelGraph, apply_pattern_uv, merge_fragment};
use crate::script::{ScriptError, ScriptState, Result, batch_export};
use crate::util::write_atomic;

/// Output formats an Export item can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFileType {
	/// Wavefront OBJ.
	Obj,
	/// glTF 2.0.
	Gltf,
	/// Autodesk FBX.
	Fbx,
	/// Collada.
	Dae,
	/// Section table dump.
	Json,
}

impl ExportFileType {
	/// Every type, in declaration order.
	pub const ALL: [Self; 5] = [Self::Obj, Self::Gltf, Self::Fbx, Self::Dae, Self::Json];

	/// File extension without the dot.
	pub fn extension(self) -> &'static str {
		match self {
			Self::Obj => "obj",
			Self::Gltf => "gltf",
			Self::Fbx => "fbx",
			Self::Dae => "dae",
			Self::Json => "json",
		}
	}

	/// Type for a file extension, case-insensitively.
	pub fn from_extension(extension: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|item| item.extension().eq_ignore_ascii_case(extension))
	}

	/// Type implied by the extension of `path`.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
	}
}

impl fmt::Display for ExportFileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.extension())
	}
}

impl FromStr for ExportFileType {
	type Err = ScriptError;

	fn from_str(value: &str) -> Result<Self> {
		Self::from_extension(value).ok_or_else(|| ScriptError::UnknownExportType { value: value.to_owned() })
	}
}

/// One pipeline operation.
///
/// Relative paths resolve against the state's working directory when the
/// item executes.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptItem {
	/// Replace the graph with an empty one.
	NewModel,
	/// Replace the graph with a decoded file.
	LoadModel(PathBuf),
	/// Encode the graph to a file.
	SaveModel(PathBuf),
	/// Merge meshes from an external file.
	Import(PathBuf),
	/// Apply pattern uvs to the most recently imported meshes.
	PatternUv(PathBuf),
	/// Write the graph through an exporter.
	Export(PathBuf),
	/// Attachment node for later imports; `None` attaches at the root.
	SetRootPoint(Option<String>),
	/// Fallback export format.
	SetDefaultType(ExportFileType),
	/// Whether imports may create missing models.
	CreateNewObjects(bool),
	/// Execute a nested script on the same state.
	RunScript(PathBuf),
	/// Export every `.model` file under a directory.
	BatchExport(PathBuf),
}

impl ScriptItem {
	/// Short name for diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::NewModel => "NewModel",
			Self::LoadModel(_) => "LoadModel",
			Self::SaveModel(_) => "SaveModel",
			Self::Import(_) => "Import",
			Self::PatternUv(_) => "PatternUV",
			Self::Export(_) => "Export",
			Self::SetRootPoint(_) => "SetRootPoint",
			Self::SetDefaultType(_) => "SetDefaultType",
			Self::CreateNewObjects(_) => "CreateNewObjects",
			Self::RunScript(_) => "RunScript",
			Self::BatchExport(_) => "BatchExport",
		}
	}

	/// Whether the item needs a loaded or created model.
	pub fn requires_data(&self) -> bool {
		matches!(self, Self::SaveModel(_) | Self::Import(_) | Self::PatternUv(_) | Self::Export(_))
	}

	/// Whether the item leaves a model in place.
	pub fn provides_data(&self) -> bool {
		matches!(self, Self::NewModel | Self::LoadModel(_))
	}

	/// Run the item against `state`.
	pub fn execute(&self, state: &mut ScriptState) -> Result<()> {
		match self {
			Self::NewModel => {
				state.replace_model(ModelGraph::new());
				info!("created new model");
			}
			Self::LoadModel(path) => {
				let path = state.resolve_path(path);
				let bytes = fs::read(&path).map_err(|err| ScriptError::io(&path, err))?;
				let graph = ModelGraph::load(&bytes)?;
				info!("loaded {} ({} sections)", path.display(), graph.len());
				state.replace_model(graph);
			}
			Self::SaveModel(path) => {
				let path = state.resolve_path(path);
				let bytes = state.model()?.save()?;
				write_atomic(&path, &bytes).map_err(|err| ScriptError::io(&path, err))?;
				info!("saved {} ({} bytes)", path.display(), bytes.len());
			}
			Self::Import(path) => {
				let path = state.resolve_path(path);
				let fragment = state.adapters().importer_for(&path)?.import(&path)?;
				let options = MergeOptions {
					root_point: state.root_point.clone(),
					create_new_objects: state.create_new_objects,
				};
				let report = merge_fragment(state.model_mut()?, &fragment, &options)?;
				let merged = report.merged().cloned().collect();
				state.set_last_import(merged);
			}
			Self::PatternUv(path) => {
				let path = state.resolve_path(path);
				let fragment = state.adapters().importer_for(&path)?.import(&path)?;
				let targets = state.last_import().to_vec();
				let applied = apply_pattern_uv(state.model_mut()?, &fragment, &targets)?;
				info!("applied pattern uvs from {} to {applied} models", path.display());
			}
			Self::Export(path) => {
				let path = state.resolve_path(path);
				let file_type = ExportFileType::from_path(&path).unwrap_or(state.default_export_type);
				let bytes = state.adapters().exporter_for(file_type)?.export(state.model()?)?;
				write_atomic(&path, &bytes).map_err(|err| ScriptError::io(&path, err))?;
				info!("exported {} as {file_type}", path.display());
			}
			Self::SetRootPoint(name) => state.root_point = name.clone(),
			Self::SetDefaultType(file_type) => state.default_export_type = *file_type,
			Self::CreateNewObjects(create) => state.create_new_objects = *create,
			Self::RunScript(path) => state.run_script(path)?,
			Self::BatchExport(dir) => {
				let dir = state.resolve_path(dir);
				let report = batch_export(&dir, state.default_export_type, state.adapters(), state.cancel_flag())?;
				for failure in &report.failures {
					warn!("batch export of {} failed: {}", failure.path.display(), failure.error);
				}
				info!(
					"batch exported {} files from {} ({} failed)",
					report.exported.len(),
					dir.display(),
					report.failures.len()
				);
			}
		}
		Ok(())
	}
}
