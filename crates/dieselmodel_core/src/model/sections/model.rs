use bitflags::bitflags;
use glam::Vec3;

use crate::model::bytes::{Cursor, Writer};
use crate::model::section::section_any;
use crate::model::sections::ObjectBase;
use crate::model::{DanglingRef, Result, Section, SectionHeader, SectionLookup, SectionRef, TypedSection, tags};

/// Version selecting the compact layout; every other version uses the full layout.
pub const COMPACT_VERSION: u32 = 6;
/// Version written for newly created models.
pub const DEFAULT_FULL_VERSION: u32 = 3;

bitflags! {
	/// Render property bits of a full-layout model.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct ModelProperties: u32 {
		/// Model casts shadows.
		const CAST_SHADOWS = 0x0000_0001;
		/// Model has an opacity channel.
		const HAS_OPACITY = 0x0000_0004;
	}
}

/// One drawcall-sized slice of the shared vertex and index buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderAtom {
	/// Vertex that indexes are relative to.
	pub base_vertex: u32,
	/// Triangles to draw.
	pub triangle_count: u32,
	/// Offset into the topology, in indexes.
	pub base_index: u32,
	/// Vertices after `base_vertex` referenced by this atom.
	pub geometry_slice_length: u32,
	/// Index into the model's material group.
	pub material_id: u32,
}

impl RenderAtom {
	/// Encoded length.
	pub const LEN: usize = 20;

	fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
		Ok(Self {
			base_vertex: cursor.read_u32()?,
			triangle_count: cursor.read_u32()?,
			base_index: cursor.read_u32()?,
			geometry_slice_length: cursor.read_u32()?,
			material_id: cursor.read_u32()?,
		})
	}

	fn write(&self, out: &mut Writer) {
		out.write_u32(self.base_vertex);
		out.write_u32(self.triangle_count);
		out.write_u32(self.base_index);
		out.write_u32(self.geometry_slice_length);
		out.write_u32(self.material_id);
	}
}

/// Version 6 body: stored bounds only.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactModel {
	/// Stored minimum corner.
	pub bounds_min: Vec3,
	/// Stored maximum corner.
	pub bounds_max: Vec3,
	/// Unidentified float.
	pub unknown7: f32,
	/// Unidentified word.
	pub unknown8: u32,
}

/// Body used by every version except 6.
#[derive(Debug, Clone, PartialEq)]
pub struct FullModel {
	/// Linked geometry/topology pair.
	pub passthrough: SectionRef,
	/// Linked index-buffer wrapper.
	pub topology_ip: SectionRef,
	/// Drawable slices in render order.
	pub atoms: Vec<RenderAtom>,
	/// Linked material list.
	pub material_group: SectionRef,
	/// Linked light set.
	pub lightset: SectionRef,
	/// Render property bits; unknown bits are retained.
	pub properties: ModelProperties,
	/// Minimum corner of the bounding box.
	pub bounds_min: Vec3,
	/// Maximum corner of the bounding box.
	pub bounds_max: Vec3,
	/// Bounding sphere radius around the local origin.
	pub bounding_radius: f32,
	/// Unidentified word.
	pub unknown13: u32,
	/// Linked skinning bones.
	pub skin_bones: SectionRef,
}

impl FullModel {
	/// Full body wired to the given links, with one render atom and zero bounds.
	pub fn new(passthrough: u32, topology_ip: u32, material_group: u32, triangles: u32, vertices: u32) -> Self {
		Self {
			passthrough: SectionRef::to(passthrough),
			topology_ip: SectionRef::to(topology_ip),
			atoms: vec![RenderAtom {
				triangle_count: triangles,
				geometry_slice_length: vertices,
				..RenderAtom::default()
			}],
			material_group: SectionRef::to(material_group),
			lightset: SectionRef::NONE,
			properties: ModelProperties::empty(),
			bounds_min: Vec3::ZERO,
			bounds_max: Vec3::ZERO,
			bounding_radius: 1.0,
			unknown13: 6,
			skin_bones: SectionRef::NONE,
		}
	}
}

/// Version-selected body of a [`Model`].
#[derive(Debug, Clone, PartialEq)]
pub enum ModelLayout {
	/// Version 6.
	Compact(CompactModel),
	/// Any other version.
	Full(FullModel),
}

/// Renderable node.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
	/// Node fields.
	pub object: ObjectBase,
	version: u32,
	layout: ModelLayout,
	/// Undecoded body bytes after the known fields.
	pub tail: Vec<u8>,
}

impl Model {
	/// Full-layout model at [`DEFAULT_FULL_VERSION`].
	pub fn full(object: ObjectBase, body: FullModel) -> Self {
		Self {
			object,
			version: DEFAULT_FULL_VERSION,
			layout: ModelLayout::Full(body),
			tail: Vec::new(),
		}
	}

	/// Compact-layout model.
	pub fn compact(object: ObjectBase, body: CompactModel) -> Self {
		Self {
			object,
			version: COMPACT_VERSION,
			layout: ModelLayout::Compact(body),
			tail: Vec::new(),
		}
	}

	/// Stored version; authoritative for the layout.
	pub fn version(&self) -> u32 {
		self.version
	}

	/// Version-selected body.
	pub fn layout(&self) -> &ModelLayout {
		&self.layout
	}

	/// Full body, if this model uses the full layout.
	pub fn as_full(&self) -> Option<&FullModel> {
		match &self.layout {
			ModelLayout::Full(body) => Some(body),
			ModelLayout::Compact(_) => None,
		}
	}

	/// Mutable full body.
	pub fn as_full_mut(&mut self) -> Option<&mut FullModel> {
		match &mut self.layout {
			ModelLayout::Full(body) => Some(body),
			ModelLayout::Compact(_) => None,
		}
	}

	/// Compact body, if this model uses the compact layout.
	pub fn as_compact(&self) -> Option<&CompactModel> {
		match &self.layout {
			ModelLayout::Compact(body) => Some(body),
			ModelLayout::Full(_) => None,
		}
	}

	/// Stored bounding box of either layout.
	pub fn bounds(&self) -> (Vec3, Vec3) {
		match &self.layout {
			ModelLayout::Compact(body) => (body.bounds_min, body.bounds_max),
			ModelLayout::Full(body) => (body.bounds_min, body.bounds_max),
		}
	}
}

fn read_compact(cursor: &mut Cursor<'_>) -> Result<CompactModel> {
	Ok(CompactModel {
		bounds_min: cursor.read_vec3()?,
		bounds_max: cursor.read_vec3()?,
		unknown7: cursor.read_f32()?,
		unknown8: cursor.read_u32()?,
	})
}

fn read_full(cursor: &mut Cursor<'_>) -> Result<FullModel> {
	let passthrough = SectionRef::unresolved(cursor.read_u32()?);
	let topology_ip = SectionRef::unresolved(cursor.read_u32()?);
	let count = cursor.read_count("render atom", RenderAtom::LEN)?;
	let mut atoms = Vec::with_capacity(count as usize);
	for _ in 0..count {
		atoms.push(RenderAtom::read(cursor)?);
	}

	Ok(FullModel {
		passthrough,
		topology_ip,
		atoms,
		material_group: SectionRef::unresolved(cursor.read_u32()?),
		lightset: SectionRef::unresolved(cursor.read_u32()?),
		properties: ModelProperties::from_bits_retain(cursor.read_u32()?),
		bounds_min: cursor.read_vec3()?,
		bounds_max: cursor.read_vec3()?,
		bounding_radius: cursor.read_f32()?,
		unknown13: cursor.read_u32()?,
		skin_bones: SectionRef::unresolved(cursor.read_u32()?),
	})
}

fn write_full(body: &FullModel, out: &mut Writer) -> Result<()> {
	out.write_u32(body.passthrough.raw());
	out.write_u32(body.topology_ip.raw());
	out.write_len("render atom list", body.atoms.len())?;
	for atom in &body.atoms {
		atom.write(out);
	}
	out.write_u32(body.material_group.raw());
	out.write_u32(body.lightset.raw());
	out.write_u32(body.properties.bits());
	out.write_vec3(body.bounds_min);
	out.write_vec3(body.bounds_max);
	out.write_f32(body.bounding_radius);
	out.write_u32(body.unknown13);
	out.write_u32(body.skin_bones.raw());
	Ok(())
}

impl TypedSection for Model {
	const TAG: u32 = tags::MODEL;
	const KIND: &'static str = "model";

	fn decode(cursor: &mut Cursor<'_>, _header: &SectionHeader) -> Result<Self> {
		let object = ObjectBase::read(cursor)?;
		let version = cursor.read_u32()?;
		let layout = if version == COMPACT_VERSION {
			ModelLayout::Compact(read_compact(cursor)?)
		} else {
			ModelLayout::Full(read_full(cursor)?)
		};

		Ok(Self {
			object,
			version,
			layout,
			tail: cursor.read_rest().to_vec(),
		})
	}
}

impl Section for Model {
	section_any!();

	fn encode(&self, out: &mut Writer) -> Result<()> {
		self.object.write(out)?;
		out.write_u32(self.version);
		match &self.layout {
			ModelLayout::Compact(body) => {
				out.write_vec3(body.bounds_min);
				out.write_vec3(body.bounds_max);
				out.write_f32(body.unknown7);
				out.write_u32(body.unknown8);
			}
			ModelLayout::Full(body) => write_full(body, out)?,
		}
		out.write_bytes(&self.tail);
		Ok(())
	}

	fn resolve_refs(&mut self, lookup: &SectionLookup) -> Vec<DanglingRef> {
		let mut dangling: Vec<DanglingRef> = self.object.resolve(lookup).into_iter().collect();
		if let ModelLayout::Full(body) = &mut self.layout {
			let links = [
				("passthrough", &mut body.passthrough, tags::PASSTHROUGH_GP),
				("topology_ip", &mut body.topology_ip, tags::TOPOLOGY_IP),
				("material_group", &mut body.material_group, tags::MATERIAL_GROUP),
				("lightset", &mut body.lightset, tags::LIGHT_SET),
				("skin_bones", &mut body.skin_bones, tags::SKIN_BONES),
			];
			for (field, reference, tag) in links {
				dangling.extend(DanglingRef::check(field, reference, lookup, &[tag]));
			}
		}
		dangling
	}
}
