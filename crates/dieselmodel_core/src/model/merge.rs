use glam::{Vec2, Vec3};
use log::{info, warn};

use crate::model::sections::{
	FullModel, Geometry, GeometryChannel, Material, MaterialGroup, Model, ObjectBase, PassthroughGp, RenderAtom, Topology, TopologyIp,
	channel_kind, pack_indices,
};
use crate::model::{HashName, ModelError, ModelGraph, Result, SectionRef, recompute_bounds};

/// Name of the material shared by every created model.
pub const DEFAULT_MATERIAL: &str = "Material: Default Material";

/// One named mesh produced by an import adapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedObject {
	/// Object name; matched against model idstrings.
	pub name: String,
	/// Vertex positions.
	pub positions: Vec<Vec3>,
	/// Per-vertex texture coordinates, when the source has them.
	pub uvs: Option<Vec<Vec2>>,
	/// Triangles as indices into `positions`.
	pub triangles: Vec<[u32; 3]>,
}

/// Partial graph content produced by an import adapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshFragment {
	/// Objects in source order.
	pub objects: Vec<ImportedObject>,
}

/// Settings that steer [`merge_fragment`].
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
	/// Node that created models are parented to.
	pub root_point: Option<String>,
	/// Whether objects without a matching model create one.
	pub create_new_objects: bool,
}

/// What a merge did, by object name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
	/// Existing models whose mesh was replaced.
	pub updated: Vec<String>,
	/// Newly created models.
	pub created: Vec<String>,
	/// Objects left out.
	pub skipped: Vec<String>,
}

impl MergeReport {
	/// Names of every object that now lives in the graph.
	pub fn merged(&self) -> impl Iterator<Item = &String> {
		self.updated.iter().chain(&self.created)
	}
}

struct PreparedMesh<'a> {
	object: &'a ImportedObject,
	indices: Vec<u16>,
}

impl<'a> PreparedMesh<'a> {
	fn new(object: &'a ImportedObject) -> Result<Self> {
		let vertices = object.positions.len();
		if let Some(index) = object.triangles.iter().flatten().find(|index| **index as usize >= vertices) {
			return Err(ModelError::IndexOutOfRange { index: *index, vertices });
		}
		if let Some(uvs) = object.uvs.as_ref().filter(|uvs| uvs.len() != vertices) {
			return Err(ModelError::ChannelLengthMismatch {
				kind: channel_kind::UV,
				expected: vertices,
				got: uvs.len(),
			});
		}

		Ok(Self {
			object,
			indices: pack_indices(&object.triangles)?,
		})
	}

	fn atom(&self) -> RenderAtom {
		RenderAtom {
			triangle_count: self.object.triangles.len() as u32,
			geometry_slice_length: self.object.positions.len() as u32,
			..RenderAtom::default()
		}
	}
}

/// Merge imported meshes into `graph`.
///
/// Objects whose name matches a full-layout model replace that model's mesh;
/// others create a new model chain when enabled, or are skipped. Bounds are
/// recomputed for every model touched.
pub fn merge_fragment(graph: &mut ModelGraph, fragment: &MeshFragment, options: &MergeOptions) -> Result<MergeReport> {
	let parent = match &options.root_point {
		Some(name) => match graph.find_node(HashName::from_label(name)) {
			Some(id) => SectionRef::to(id),
			None => {
				warn!("root point {name:?} not found, attaching new objects at the scene root");
				SectionRef::NONE
			}
		},
		None => SectionRef::NONE,
	};

	let meshes = fragment.objects.iter().map(PreparedMesh::new).collect::<Result<Vec<_>>>()?;

	let mut report = MergeReport::default();
	for mesh in &meshes {
		let name = mesh.object.name.clone();

		if let Some(model_id) = graph.find_model(HashName::from_label(&name)) {
			if replace_mesh(graph, model_id, mesh)? {
				report.updated.push(name);
			} else {
				warn!("skipping {name:?}: model {model_id:#010x} has no editable geometry");
				report.skipped.push(name);
			}
		} else if options.create_new_objects {
			create_model(graph, mesh, parent)?;
			report.created.push(name);
		} else {
			warn!("skipping {name:?}: no model of that name and new objects are disabled");
			report.skipped.push(name);
		}
	}

	info!(
		"merged {} objects ({} updated, {} created, {} skipped)",
		fragment.objects.len(),
		report.updated.len(),
		report.created.len(),
		report.skipped.len()
	);
	Ok(report)
}

fn replace_mesh(graph: &mut ModelGraph, model_id: u32, mesh: &PreparedMesh<'_>) -> Result<bool> {
	let Some(full) = graph.get_as::<Model>(model_id).and_then(Model::as_full) else {
		return Ok(false);
	};
	let Some(link) = graph.resolve::<PassthroughGp>(full.passthrough) else {
		return Ok(false);
	};
	let (Some(geometry_id), Some(topology_id)) = (link.geometry.get(), link.topology.get()) else {
		return Ok(false);
	};
	if graph.get_as::<Geometry>(geometry_id).is_none() || graph.get_as::<Topology>(topology_id).is_none() {
		return Ok(false);
	}

	if let Some(geometry) = graph.get_as_mut::<Geometry>(geometry_id) {
		geometry.rebuild(&mesh.object.positions, mesh.object.uvs.as_deref())?;
	}
	if let Some(topology) = graph.get_as_mut::<Topology>(topology_id) {
		topology.indices = mesh.indices.clone();
	}
	if let Some(full) = graph.get_as_mut::<Model>(model_id).and_then(Model::as_full_mut) {
		full.atoms = vec![mesh.atom()];
	}

	recompute_bounds(graph, model_id)
}

fn default_material(graph: &mut ModelGraph) -> Result<u32> {
	let hashname = HashName::of(DEFAULT_MATERIAL);
	let existing = graph.sections_of::<Material>().find_map(|(id, item)| (item.hashname == hashname).then_some(id));
	match existing {
		Some(id) => Ok(id),
		None => graph.insert(DEFAULT_MATERIAL, Material::new(DEFAULT_MATERIAL)),
	}
}

fn create_model(graph: &mut ModelGraph, mesh: &PreparedMesh<'_>, parent: SectionRef) -> Result<u32> {
	let name = mesh.object.name.as_str();
	let geometry = Geometry::new(name, &mesh.object.positions, mesh.object.uvs.as_deref())?;
	let topology = Topology::from_triangles(name, &mesh.object.triangles)?;

	let geometry_id = graph.insert(&format!("{name}.geometry"), geometry)?;
	let topology_id = graph.insert(&format!("{name}.topology"), topology)?;
	let topology_ip_id = graph.insert(&format!("{name}.topology_ip"), TopologyIp::new(topology_id))?;
	let passthrough_id = graph.insert(&format!("{name}.passthrough_gp"), PassthroughGp::new(geometry_id, topology_id))?;
	let material_id = default_material(graph)?;
	let group_id = graph.insert(&format!("{name}.material_group"), MaterialGroup::new(&[material_id]))?;

	let atom = mesh.atom();
	let body = FullModel::new(passthrough_id, topology_ip_id, group_id, atom.triangle_count, atom.geometry_slice_length);
	let mut object = ObjectBase::new(name, parent);
	object.hashname = HashName::from_label(name);
	let model_id = graph.insert(name, Model::full(object, body))?;
	recompute_bounds(graph, model_id)?;
	Ok(model_id)
}

/// Write pattern uvs from `fragment` into the models named in `targets`.
///
/// Every target is checked before any geometry changes. Returns how many
/// models received a pattern channel.
pub fn apply_pattern_uv(graph: &mut ModelGraph, fragment: &MeshFragment, targets: &[String]) -> Result<usize> {
	let mut planned = Vec::new();
	for object in &fragment.objects {
		if !targets.contains(&object.name) {
			warn!("pattern uv object {:?} was not part of the last import, ignoring", object.name);
			continue;
		}
		let Some(uvs) = object.uvs.as_deref() else {
			warn!("pattern uv object {:?} has no texture coordinates, ignoring", object.name);
			continue;
		};

		let geometry_id = graph
			.find_model(HashName::from_label(&object.name))
			.and_then(|id| graph.get_as::<Model>(id))
			.and_then(Model::as_full)
			.and_then(|full| graph.resolve::<PassthroughGp>(full.passthrough))
			.and_then(|link| link.geometry.get());
		let Some((geometry_id, geometry)) = geometry_id.and_then(|id| graph.get_as::<Geometry>(id).map(|item| (id, item))) else {
			warn!("pattern uv object {:?} has no target geometry, ignoring", object.name);
			continue;
		};
		if uvs.len() != geometry.vertex_count() {
			return Err(ModelError::ChannelLengthMismatch {
				kind: channel_kind::PATTERN_UV,
				expected: geometry.vertex_count(),
				got: uvs.len(),
			});
		}
		planned.push((geometry_id, GeometryChannel::vec2(channel_kind::PATTERN_UV, uvs)));
	}

	let applied = planned.len();
	for (geometry_id, channel) in planned {
		if let Some(geometry) = graph.get_as_mut::<Geometry>(geometry_id) {
			geometry.set_channel(channel)?;
		}
	}
	Ok(applied)
}
