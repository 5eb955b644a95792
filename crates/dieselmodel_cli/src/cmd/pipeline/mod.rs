use std::path::PathBuf;

use clap::{ArgAction, ArgMatches};
use dieselmodel::script::{ExportFileType, Result, ScriptItem, ScriptState, parse_switch};
use log::info;

fn switch(value: &str) -> std::result::Result<bool, String> {
	parse_switch(value).ok_or_else(|| format!("expected +, -, true or false, got {value:?}"))
}

/// Actions, each of which may repeat; their relative order is recovered from argv positions.
#[derive(clap::Args, Debug, Default)]
pub struct Actions {
	/// Allow imports to create missing objects (`-n`, `-n=false`).
	#[arg(short = 'n', long = "new-objects", value_name = "BOOL", num_args = 0..=1, require_equals = true,
		default_missing_value = "true", value_parser = switch, action = ArgAction::Append)]
	pub new_objects: Vec<bool>,
	/// Attach new objects to this node; empty resets to the root.
	#[arg(short = 'r', long = "root-point", value_name = "NAME", num_args = 0..=1, require_equals = true,
		default_missing_value = "", action = ArgAction::Append)]
	pub root_point: Vec<String>,
	/// Create an empty model.
	#[arg(long = "new", num_args = 0..=1, require_equals = true, default_missing_value = "true",
		value_parser = switch, action = ArgAction::Append)]
	pub new: Vec<bool>,
	/// Load a .model file.
	#[arg(long, value_name = "FILE", action = ArgAction::Append)]
	pub load: Vec<PathBuf>,
	/// Save to a .model file.
	#[arg(long, value_name = "FILE", action = ArgAction::Append)]
	pub save: Vec<PathBuf>,
	/// Merge meshes from a 3D file.
	#[arg(long, value_name = "FILE", action = ArgAction::Append)]
	pub import: Vec<PathBuf>,
	/// Apply pattern uvs from a 3D file to the last import.
	#[arg(long = "import-pattern-uv", value_name = "FILE", action = ArgAction::Append)]
	pub import_pattern_uv: Vec<PathBuf>,
	/// Export to a 3D file.
	#[arg(long, value_name = "FILE", action = ArgAction::Append)]
	pub export: Vec<PathBuf>,
	/// Default type for exports without a known extension and for batch exports.
	#[arg(long = "export-type", value_name = "TYPE", action = ArgAction::Append)]
	pub export_type: Vec<ExportFileType>,
	/// Run a directive script.
	#[arg(long, value_name = "FILE", action = ArgAction::Append)]
	pub script: Vec<PathBuf>,
	/// Export every .model file below a directory.
	#[arg(long = "batch-export", value_name = "DIR", action = ArgAction::Append)]
	pub batch_export: Vec<PathBuf>,
}

fn collect<T>(matches: &ArgMatches, id: &str, make: impl Fn(T) -> Option<ScriptItem>, out: &mut Vec<(usize, ScriptItem)>)
where
	T: Clone + Send + Sync + 'static,
{
	let (Some(indices), Some(values)) = (matches.indices_of(id), matches.get_many::<T>(id)) else {
		return;
	};
	out.extend(indices.zip(values.cloned()).filter_map(|(index, value)| make(value).map(|item| (index, item))));
}

/// Action items in the order they appeared on the command line.
pub fn ordered_items(matches: &ArgMatches) -> Vec<ScriptItem> {
	let mut out = Vec::new();
	collect(matches, "new_objects", |value| Some(ScriptItem::CreateNewObjects(value)), &mut out);
	collect(
		matches,
		"root_point",
		|value: String| Some(ScriptItem::SetRootPoint(Some(value).filter(|name| !name.is_empty()))),
		&mut out,
	);
	collect(matches, "new", |value: bool| value.then_some(ScriptItem::NewModel), &mut out);
	collect(matches, "load", |path| Some(ScriptItem::LoadModel(path)), &mut out);
	collect(matches, "save", |path| Some(ScriptItem::SaveModel(path)), &mut out);
	collect(matches, "import", |path| Some(ScriptItem::Import(path)), &mut out);
	collect(matches, "import_pattern_uv", |path| Some(ScriptItem::PatternUv(path)), &mut out);
	collect(matches, "export", |path| Some(ScriptItem::Export(path)), &mut out);
	collect(matches, "export_type", |file_type| Some(ScriptItem::SetDefaultType(file_type)), &mut out);
	collect(matches, "script", |path| Some(ScriptItem::RunScript(path)), &mut out);
	collect(matches, "batch_export", |path| Some(ScriptItem::BatchExport(path)), &mut out);

	out.sort_by_key(|(index, _)| *index);
	out.into_iter().map(|(_, item)| item).collect()
}

/// Validate then execute the command-line actions.
pub fn run(mut state: ScriptState, items: &[ScriptItem]) -> Result<()> {
	info!("running {} actions in {}", items.len(), state.work_dir.display());
	state.execute_items(items)
}

#[cfg(test)]
mod tests;
