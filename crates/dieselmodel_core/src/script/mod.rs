mod adapter;
mod batch;
mod error;
mod item;
mod json;
mod obj;
mod parse;
mod state;
mod validate;

/// Import/export adapter traits and their registry.
pub use adapter::{Adapters, MeshExporter, MeshImporter};
/// Directory-wide export.
pub use batch::{BatchFailure, BatchReport, MODEL_EXTENSION, batch_export, export_path, find_model_files};
/// Error and result aliases.
pub use error::{AdapterError, Result, ScriptError};
/// Operation items and export formats.
pub use item::{ExportFileType, ScriptItem};
/// JSON section dump.
pub use json::JsonExporter;
/// Wavefront OBJ adapters.
pub use obj::{ObjExporter, ObjImporter, parse_obj, write_obj};
/// Directive and script parsing.
pub use parse::{parse_directive, parse_script, parse_switch};
/// Interpreter state.
pub use state::{MAX_SCRIPT_DEPTH, ScriptState};
/// Pre-execution ordering checks.
pub use validate::{DataState, Validator, validate};
