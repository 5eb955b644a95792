use std::path::PathBuf;

use thiserror::Error;

use crate::model::ModelError;
use crate::script::ExportFileType;

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Failures raised by import and export adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
	/// Reading an adapter input failed.
	#[error("{path}: {source}")]
	Io {
		/// File being read.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// No importer handles the file extension.
	#[error("no importer registered for {path}")]
	NoImporter {
		/// Input file.
		path: PathBuf,
	},
	/// The export type parses but nothing produces it.
	#[error("no exporter registered for {file_type}")]
	NoExporter {
		/// Requested output type.
		file_type: ExportFileType,
	},
	/// Malformed Wavefront OBJ input.
	#[error("obj line {line}: {reason}")]
	ObjSyntax {
		/// One-based source line.
		line: usize,
		/// What was wrong.
		reason: String,
	},
	/// JSON encoding failed.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Graph data could not be read for export.
	#[error(transparent)]
	Model(#[from] ModelError),
}

/// Pipeline errors: validation, parsing, and wrapped execution failures.
#[derive(Debug, Error)]
pub enum ScriptError {
	/// Codec or graph failure.
	#[error(transparent)]
	Model(#[from] ModelError),
	/// Adapter failure.
	#[error(transparent)]
	Adapter(#[from] AdapterError),
	/// Filesystem failure outside the codec.
	#[error("{path}: {source}")]
	Io {
		/// File or directory involved.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// An item needs a model but none exists at that point.
	#[error("action {index}:{kind} is run before a model is created or loaded")]
	NoData {
		/// Position in the sequence.
		index: usize,
		/// Item kind.
		kind: &'static str,
	},
	/// Pattern uvs requested before any import.
	#[error("action {index}:{kind} needs an earlier import")]
	PatternUvWithoutImport {
		/// Position in the sequence.
		index: usize,
		/// Item kind.
		kind: &'static str,
	},
	/// Runtime guard for a missing model.
	#[error("no model is loaded")]
	NoModel,
	/// Data-bearing actions were combined with interactive mode.
	#[error("cannot process files in interactive mode")]
	InteractiveWithData,
	/// Verbosity adjusted past either end of the level range.
	#[error("cannot be that verbose or quiet (verbosity {verbosity} of 0-{max})")]
	Verbosity {
		/// Resulting verbosity.
		verbosity: i32,
		/// Quietest level.
		max: i32,
	},
	/// Directive keyword not recognised.
	#[error("unknown directive {directive:?}")]
	UnknownDirective {
		/// Offending keyword.
		directive: String,
	},
	/// Directive that needs a value was given none.
	#[error("directive {directive:?} needs a value")]
	MissingValue {
		/// Offending keyword.
		directive: String,
	},
	/// Directive value could not be interpreted.
	#[error("invalid value {value:?} for {directive:?}")]
	InvalidValue {
		/// Directive keyword.
		directive: String,
		/// Offending value.
		value: String,
	},
	/// Export type name not recognised.
	#[error("unknown export type {value:?}")]
	UnknownExportType {
		/// Offending name.
		value: String,
	},
	/// A script line failed to parse.
	#[error("{path}:{line}: {source}")]
	Parse {
		/// Script file.
		path: PathBuf,
		/// One-based line number.
		line: usize,
		/// Directive error.
		#[source]
		source: Box<ScriptError>,
	},
	/// Nested scripts went deeper than allowed.
	#[error("script nesting deeper than {limit}")]
	ScriptDepth {
		/// Maximum depth.
		limit: usize,
	},
	/// The stop flag was raised between items.
	#[error("cancelled")]
	Cancelled,
}

impl ScriptError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}
}
