use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use log::{debug, warn};

use crate::model::sections::{Geometry, Model, PassthroughGp, Topology, channel_kind};
use crate::model::{ImportedObject, MeshFragment, ModelGraph};
use crate::script::{AdapterError, ExportFileType, MeshExporter, MeshImporter};

const DEFAULT_OBJECT: &str = "default";

/// Wavefront OBJ reader: positions, texture coordinates, and `o`/`g` objects.
///
/// Polygons are fan-triangulated; normals and materials are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjImporter;

impl MeshImporter for ObjImporter {
	fn name(&self) -> &'static str {
		"obj"
	}

	fn extensions(&self) -> &[&'static str] {
		&["obj"]
	}

	fn import(&self, path: &Path) -> Result<MeshFragment, AdapterError> {
		let text = fs::read_to_string(path).map_err(|source| AdapterError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let fragment = parse_obj(&text)?;
		debug!("{}: {} objects", path.display(), fragment.objects.len());
		Ok(fragment)
	}
}

#[derive(Default)]
struct ObjectBuilder {
	name: String,
	positions: Vec<Vec3>,
	uvs: Vec<Vec2>,
	all_uv: bool,
	triangles: Vec<[u32; 3]>,
	corners: HashMap<(usize, Option<usize>), u32>,
}

impl ObjectBuilder {
	fn new(name: &str) -> Self {
		Self {
			name: name.to_owned(),
			all_uv: true,
			..Self::default()
		}
	}

	fn corner(&mut self, position: usize, uv: Option<usize>, positions: &[Vec3], uvs: &[Vec2]) -> u32 {
		if let Some(index) = self.corners.get(&(position, uv)) {
			return *index;
		}
		let index = self.positions.len() as u32;
		self.positions.push(positions[position]);
		match uv {
			Some(uv) => self.uvs.push(uvs[uv]),
			None => {
				self.all_uv = false;
				self.uvs.push(Vec2::ZERO);
			}
		}
		self.corners.insert((position, uv), index);
		index
	}

	fn finish(self, out: &mut MeshFragment) {
		if self.triangles.is_empty() {
			return;
		}
		out.objects.push(ImportedObject {
			name: self.name,
			positions: self.positions,
			uvs: self.all_uv.then_some(self.uvs),
			triangles: self.triangles,
		});
	}
}

fn syntax(line: usize, reason: impl Into<String>) -> AdapterError {
	AdapterError::ObjSyntax {
		line,
		reason: reason.into(),
	}
}

fn parse_floats<const N: usize>(line: usize, fields: &mut std::str::SplitWhitespace<'_>) -> Result<[f32; N], AdapterError> {
	let mut out = [0.0; N];
	for slot in &mut out {
		let field = fields.next().ok_or_else(|| syntax(line, format!("expected {N} numbers")))?;
		*slot = field.parse().map_err(|_| syntax(line, format!("invalid number {field:?}")))?;
	}
	Ok(out)
}

/// OBJ indices are one-based; negative values count back from the end.
fn resolve_index(line: usize, field: &str, len: usize) -> Result<usize, AdapterError> {
	let raw: i64 = field.parse().map_err(|_| syntax(line, format!("invalid index {field:?}")))?;
	let index = match raw {
		0 => None,
		1.. => usize::try_from(raw - 1).ok(),
		_ => usize::try_from(len as i64 + raw).ok(),
	};
	index.filter(|index| *index < len).ok_or_else(|| syntax(line, format!("index {raw} out of range")))
}

/// Parse OBJ source text into one object per `o`/`g` block with faces.
pub fn parse_obj(text: &str) -> Result<MeshFragment, AdapterError> {
	let mut fragment = MeshFragment::default();
	let mut positions = Vec::new();
	let mut uvs = Vec::new();
	let mut current = ObjectBuilder::new(DEFAULT_OBJECT);

	for (idx, raw) in text.lines().enumerate() {
		let line = idx + 1;
		let content = raw.split('#').next().unwrap_or_default();
		let mut fields = content.split_whitespace();
		let Some(keyword) = fields.next() else {
			continue;
		};

		match keyword {
			"v" => positions.push(Vec3::from_array(parse_floats::<3>(line, &mut fields)?)),
			"vt" => uvs.push(Vec2::from_array(parse_floats::<2>(line, &mut fields)?)),
			"o" | "g" => {
				let name = fields.collect::<Vec<_>>().join(" ");
				let next = ObjectBuilder::new(if name.is_empty() { DEFAULT_OBJECT } else { &name });
				std::mem::replace(&mut current, next).finish(&mut fragment);
			}
			"f" => {
				let mut corners = Vec::new();
				for field in fields {
					let mut parts = field.split('/');
					let position = resolve_index(line, parts.next().unwrap_or_default(), positions.len())?;
					let uv = match parts.next().filter(|part| !part.is_empty()) {
						Some(part) => Some(resolve_index(line, part, uvs.len())?),
						None => None,
					};
					corners.push(current.corner(position, uv, &positions, &uvs));
				}
				if corners.len() < 3 {
					return Err(syntax(line, "face needs at least three corners"));
				}
				for pair in corners[1..].windows(2) {
					current.triangles.push([corners[0], pair[0], pair[1]]);
				}
			}
			"vn" | "s" | "usemtl" | "mtllib" | "l" | "p" => {}
			other => debug!("obj line {line}: ignoring {other:?}"),
		}
	}

	current.finish(&mut fragment);
	Ok(fragment)
}

/// Wavefront OBJ writer for every full-layout model with reachable mesh data.
///
/// Objects are named by their idstring in hex, which [`crate::model::HashName::from_label`]
/// maps back on import.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjExporter;

impl MeshExporter for ObjExporter {
	fn file_type(&self) -> ExportFileType {
		ExportFileType::Obj
	}

	fn export(&self, graph: &ModelGraph) -> Result<Vec<u8>, AdapterError> {
		Ok(write_obj(graph).into_bytes())
	}
}

/// Render every exportable model of `graph` as OBJ text.
pub fn write_obj(graph: &ModelGraph) -> String {
	let mut out = String::new();
	let mut vertex_base = 1_usize;
	let mut uv_base = 1_usize;

	for (id, model) in graph.sections_of::<Model>() {
		let Some(full) = model.as_full() else {
			debug!("model {id:#010x}: compact layout has no mesh, skipping");
			continue;
		};
		let link = graph.resolve::<PassthroughGp>(full.passthrough);
		let geometry = link.and_then(|link| graph.resolve::<Geometry>(link.geometry));
		let topology = link.and_then(|link| graph.resolve::<Topology>(link.topology));
		let (Some(geometry), Some(topology)) = (geometry, topology) else {
			warn!("model {id:#010x}: no reachable geometry and topology, skipping");
			continue;
		};

		let positions = geometry.positions();
		let uvs = geometry.channel(channel_kind::UV).and_then(|channel| channel.as_vec2());

		let _ = writeln!(out, "o {}", model.object.hashname);
		for position in &positions {
			let _ = writeln!(out, "v {} {} {}", position.x, position.y, position.z);
		}
		if let Some(uvs) = &uvs {
			for uv in uvs {
				let _ = writeln!(out, "vt {} {}", uv.x, uv.y);
			}
		}

		for atom in &full.atoms {
			for tri in 0..atom.triangle_count as usize {
				let Some(corners) = topology.triangle(atom.base_index as usize, tri) else {
					warn!("model {id:#010x}: render atom runs past the index buffer");
					break;
				};
				let _ = write!(out, "f");
				for corner in corners {
					let local = atom.base_vertex as usize + corner as usize;
					if uvs.is_some() {
						let _ = write!(out, " {}/{}", vertex_base + local, uv_base + local);
					} else {
						let _ = write!(out, " {}", vertex_base + local);
					}
				}
				let _ = writeln!(out);
			}
		}

		vertex_base += positions.len();
		uv_base += uvs.as_ref().map_or(0, Vec::len);
	}
	out
}
