use std::path::Path;

use dieselmodel::model::{ModelGraph, PreambleStyle};
use dieselmodel::script::Result;
use serde::Serialize;

use crate::cmd::util::{emit_json, id_hex};

#[derive(Serialize)]
struct InfoJson {
	path: String,
	style: PreambleStyle,
	section_count: usize,
	trailing_bytes: usize,
	sections: Vec<SectionJson>,
}

#[derive(Serialize)]
struct SectionJson {
	id: String,
	tag: String,
	kind: &'static str,
	size: usize,
}

/// Print the section table of one `.model` file.
pub fn run(path: &Path, json: bool) -> Result<()> {
	let graph = ModelGraph::open(path)?;
	let sections = graph.summaries()?;

	if json {
		emit_json(&InfoJson {
			path: path.display().to_string(),
			style: graph.style(),
			section_count: graph.len(),
			trailing_bytes: graph.trailing().len(),
			sections: sections
				.iter()
				.map(|item| SectionJson {
					id: id_hex(item.id),
					tag: id_hex(item.tag),
					kind: item.kind,
					size: item.size,
				})
				.collect(),
		});
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("style: {:?}", graph.style());
	println!("sections: {}", graph.len());
	println!("trailing_bytes: {}", graph.trailing().len());
	println!("id\ttag\tkind\tsize");
	for item in &sections {
		println!("{}\t{}\t{}\t{}", id_hex(item.id), id_hex(item.tag), item.kind, item.size);
	}
	Ok(())
}
