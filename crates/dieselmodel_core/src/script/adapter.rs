use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::model::{MeshFragment, ModelGraph};
use crate::script::{AdapterError, ExportFileType, JsonExporter, ObjExporter, ObjImporter};

/// Reads an external mesh file into a [`MeshFragment`].
pub trait MeshImporter: Send + Sync {
	/// Adapter name for logs.
	fn name(&self) -> &'static str;

	/// Lowercase file extensions handled, without the dot.
	fn extensions(&self) -> &[&'static str];

	/// Read and convert `path`.
	fn import(&self, path: &Path) -> Result<MeshFragment, AdapterError>;
}

/// Converts a graph to the bytes of one output format.
pub trait MeshExporter: Send + Sync {
	/// Format produced.
	fn file_type(&self) -> ExportFileType;

	/// Encode `graph`.
	fn export(&self, graph: &ModelGraph) -> Result<Vec<u8>, AdapterError>;
}

/// Importers by extension and exporters by output type.
pub struct Adapters {
	importers: Vec<Box<dyn MeshImporter>>,
	exporters: HashMap<ExportFileType, Box<dyn MeshExporter>>,
}

impl Adapters {
	/// No adapters at all.
	pub fn empty() -> Self {
		Self {
			importers: Vec::new(),
			exporters: HashMap::new(),
		}
	}

	/// OBJ import/export and the JSON section dump.
	pub fn builtin() -> Self {
		let mut out = Self::empty();
		out.register_importer(ObjImporter);
		out.register_exporter(ObjExporter);
		out.register_exporter(JsonExporter);
		out
	}

	/// Add an importer; later registrations win for shared extensions.
	pub fn register_importer(&mut self, importer: impl MeshImporter + 'static) {
		self.importers.insert(0, Box::new(importer));
	}

	/// Add or replace the exporter for its output type.
	pub fn register_exporter(&mut self, exporter: impl MeshExporter + 'static) {
		self.exporters.insert(exporter.file_type(), Box::new(exporter));
	}

	/// Importer for the extension of `path`.
	pub fn importer_for(&self, path: &Path) -> Result<&dyn MeshImporter, AdapterError> {
		let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
		self.importers
			.iter()
			.find(|item| item.extensions().iter().any(|ext| ext.eq_ignore_ascii_case(extension)))
			.map(|item| item.as_ref())
			.ok_or_else(|| AdapterError::NoImporter { path: path.to_path_buf() })
	}

	/// Exporter producing `file_type`.
	pub fn exporter_for(&self, file_type: ExportFileType) -> Result<&dyn MeshExporter, AdapterError> {
		self.exporters
			.get(&file_type)
			.map(|item| item.as_ref())
			.ok_or(AdapterError::NoExporter { file_type })
	}
}

impl Default for Adapters {
	fn default() -> Self {
		Self::builtin()
	}
}

impl fmt::Debug for Adapters {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut exporters: Vec<_> = self.exporters.keys().copied().collect();
		exporters.sort_by_key(|item| item.extension());
		f.debug_struct("Adapters")
			.field("importers", &self.importers.iter().map(|item| item.name()).collect::<Vec<_>>())
			.field("exporters", &exporters)
			.finish()
	}
}
