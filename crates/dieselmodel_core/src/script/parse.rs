use std::path::{Path, PathBuf};

use crate::script::{ExportFileType, Result, ScriptError, ScriptItem};

fn required(directive: &str, value: Option<&str>) -> Result<PathBuf> {
	match value.map(str::trim).filter(|value| !value.is_empty()) {
		Some(value) => Ok(PathBuf::from(value)),
		None => Err(ScriptError::MissingValue {
			directive: directive.to_owned(),
		}),
	}
}

/// Parse a boolean switch value: `+`/`-`, `true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0`.
pub fn parse_switch(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"+" | "true" | "yes" | "on" | "1" => Some(true),
		"-" | "false" | "no" | "off" | "0" => Some(false),
		_ => None,
	}
}

/// Parse one directive line.
///
/// Returns `None` for blank lines and comments. A leading `--` is accepted so
/// command-line spellings can be pasted into scripts.
pub fn parse_directive(line: &str) -> Result<Option<ScriptItem>> {
	let content = line.split('#').next().unwrap_or_default().trim();
	if content.is_empty() {
		return Ok(None);
	}
	let content = content.strip_prefix("--").unwrap_or(content);
	let (key, value) = match content.split_once('=') {
		Some((key, value)) => (key.trim(), Some(value)),
		None => (content, None),
	};

	let item = match key {
		"new" => ScriptItem::NewModel,
		"load" => ScriptItem::LoadModel(required(key, value)?),
		"save" => ScriptItem::SaveModel(required(key, value)?),
		"import" => ScriptItem::Import(required(key, value)?),
		"import-pattern-uv" => ScriptItem::PatternUv(required(key, value)?),
		"export" => ScriptItem::Export(required(key, value)?),
		"script" => ScriptItem::RunScript(required(key, value)?),
		"batch-export" => ScriptItem::BatchExport(required(key, value)?),
		"export-type" => {
			let value = value.map(str::trim).filter(|value| !value.is_empty()).ok_or_else(|| ScriptError::MissingValue {
				directive: key.to_owned(),
			})?;
			ScriptItem::SetDefaultType(value.parse::<ExportFileType>()?)
		}
		"root-point" => ScriptItem::SetRootPoint(value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_owned)),
		"new-objects" => ScriptItem::CreateNewObjects(match value {
			None => true,
			Some(value) => parse_switch(value).ok_or_else(|| ScriptError::InvalidValue {
				directive: key.to_owned(),
				value: value.to_owned(),
			})?,
		}),
		"new-objects+" => ScriptItem::CreateNewObjects(true),
		"new-objects-" => ScriptItem::CreateNewObjects(false),
		other => {
			return Err(ScriptError::UnknownDirective {
				directive: other.to_owned(),
			});
		}
	};
	Ok(Some(item))
}

/// Parse a whole script; errors carry the script path and line number.
pub fn parse_script(text: &str, path: &Path) -> Result<Vec<ScriptItem>> {
	let mut items = Vec::new();
	for (idx, line) in text.lines().enumerate() {
		let parsed = parse_directive(line).map_err(|source| ScriptError::Parse {
			path: path.to_path_buf(),
			line: idx + 1,
			source: Box::new(source),
		})?;
		items.extend(parsed);
	}
	Ok(items)
}

#[cfg(test)]
mod tests {
	use std::path::{Path, PathBuf};

	use super::{parse_directive, parse_script};
	use crate::script::{ExportFileType, ScriptError, ScriptItem};

	#[test]
	fn script_lines_map_to_items_in_order() {
		let text = "\
# build a prop
new
import = meshes/crate.obj
root-point=Hips
root-point
new-objects+
new-objects=off
--export-type=JSON
export=out/crate.json   # trailing comment

batch-export=levels
";
		let items = parse_script(text, Path::new("build.txt")).expect("script parses");
		assert_eq!(
			items,
			vec![
				ScriptItem::NewModel,
				ScriptItem::Import(PathBuf::from("meshes/crate.obj")),
				ScriptItem::SetRootPoint(Some("Hips".to_owned())),
				ScriptItem::SetRootPoint(None),
				ScriptItem::CreateNewObjects(true),
				ScriptItem::CreateNewObjects(false),
				ScriptItem::SetDefaultType(ExportFileType::Json),
				ScriptItem::Export(PathBuf::from("out/crate.json")),
				ScriptItem::BatchExport(PathBuf::from("levels")),
			]
		);
	}

	#[test]
	fn parse_errors_carry_line_numbers() {
		let err = parse_script("new\n\nfrobnicate=1\n", Path::new("bad.txt")).expect_err("unknown directive");
		match err {
			ScriptError::Parse { path, line, source } => {
				assert_eq!(path, PathBuf::from("bad.txt"));
				assert_eq!(line, 3);
				assert!(matches!(*source, ScriptError::UnknownDirective { .. }));
			}
			other => panic!("unexpected error {other}"),
		}
	}

	#[test]
	fn path_directives_need_values() {
		assert!(matches!(parse_directive("save="), Err(ScriptError::MissingValue { .. })));
		assert!(matches!(parse_directive("load"), Err(ScriptError::MissingValue { .. })));
		assert!(matches!(parse_directive("export-type=stl"), Err(ScriptError::UnknownExportType { .. })));
		assert!(matches!(parse_directive("   # only a comment"), Ok(None)));
	}
}
