use serde::Serialize;

use crate::model::sections::{Geometry, Model, ModelLayout, PassthroughGp, Topology};
use crate::model::{ModelGraph, PreambleStyle, SectionSummary};
use crate::script::{AdapterError, ExportFileType, MeshExporter};

/// Section table and per-model overview as pretty JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

#[derive(Serialize)]
struct GraphJson {
	style: PreambleStyle,
	trailing_bytes: usize,
	sections: Vec<SectionSummary>,
	models: Vec<ModelJson>,
}

#[derive(Serialize)]
struct ModelJson {
	id: u32,
	hashname: String,
	version: u32,
	layout: &'static str,
	bounds_min: [f32; 3],
	bounds_max: [f32; 3],
	vertices: Option<usize>,
	triangles: Option<usize>,
}

fn model_json(graph: &ModelGraph, id: u32, model: &Model) -> ModelJson {
	let (min, max) = model.bounds();
	let link = model.as_full().and_then(|full| graph.resolve::<PassthroughGp>(full.passthrough));
	ModelJson {
		id,
		hashname: model.object.hashname.to_string(),
		version: model.version(),
		layout: match model.layout() {
			ModelLayout::Compact(_) => "compact",
			ModelLayout::Full(_) => "full",
		},
		bounds_min: min.to_array(),
		bounds_max: max.to_array(),
		vertices: link.and_then(|link| graph.resolve::<Geometry>(link.geometry)).map(Geometry::vertex_count),
		triangles: link.and_then(|link| graph.resolve::<Topology>(link.topology)).map(Topology::triangle_count),
	}
}

impl MeshExporter for JsonExporter {
	fn file_type(&self) -> ExportFileType {
		ExportFileType::Json
	}

	fn export(&self, graph: &ModelGraph) -> Result<Vec<u8>, AdapterError> {
		let payload = GraphJson {
			style: graph.style(),
			trailing_bytes: graph.trailing().len(),
			sections: graph.summaries()?,
			models: graph.sections_of::<Model>().map(|(id, model)| model_json(graph, id, model)).collect(),
		};
		let mut bytes = serde_json::to_vec_pretty(&payload)?;
		bytes.push(b'\n');
		Ok(bytes)
	}
}

#[cfg(test)]
mod tests {
	use dieselmodel_testkit::{ModelFile, mesh_ids};

	use super::JsonExporter;
	use crate::model::ModelGraph;
	use crate::script::MeshExporter;

	#[test]
	fn dump_lists_sections_and_models() {
		let graph = ModelGraph::load(&ModelFile::plain().triangle_mesh(0x10, 0x99).trailing(&[1, 2]).build()).expect("file loads");
		let bytes = JsonExporter.export(&graph).expect("json export");
		let value: serde_json::Value = serde_json::from_slice(&bytes).expect("valid json");

		assert_eq!(value["style"], "plain");
		assert_eq!(value["trailing_bytes"], 2);
		assert_eq!(value["sections"].as_array().map(Vec::len), Some(7));
		let model = &value["models"][0];
		assert_eq!(model["id"], 0x10 + mesh_ids::MODEL);
		assert_eq!(model["hashname"], "0000000000000099");
		assert_eq!(model["layout"], "full");
		assert_eq!(model["vertices"], 3);
		assert_eq!(model["triangles"], 1);
	}
}
