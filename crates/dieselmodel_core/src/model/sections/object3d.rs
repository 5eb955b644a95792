use glam::{Mat4, Vec3};

use crate::model::bytes::{Cursor, Writer};
use crate::model::section::section_any;
use crate::model::{DanglingRef, HashName, Result, Section, SectionHeader, SectionLookup, SectionRef, TypedSection, tags};

/// Spatial fields shared by every node-like section.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectBase {
	/// Node name idstring.
	pub hashname: HashName,
	/// Animation controller section ids, kept as stored.
	pub controllers: Vec<u32>,
	/// Local transform, sixteen column-major floats as stored on disk.
	pub transform: [f32; 16],
	/// Local position.
	pub position: Vec3,
	/// Parent node; forms the scene tree.
	pub parent: SectionRef,
}

impl ObjectBase {
	/// Node named `name` with identity transform under `parent`.
	pub fn new(name: &str, parent: SectionRef) -> Self {
		Self {
			hashname: HashName::of(name),
			controllers: Vec::new(),
			transform: Mat4::IDENTITY.to_cols_array(),
			position: Vec3::ZERO,
			parent,
		}
	}

	/// Read the shared node prefix.
	pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
		let hashname = HashName(cursor.read_u64()?);
		let count = cursor.read_count("animation controller", 4)?;
		let mut controllers = Vec::with_capacity(count as usize);
		for _ in 0..count {
			controllers.push(cursor.read_u32()?);
		}
		let transform = cursor.read_f32s::<16>()?;
		let position = cursor.read_vec3()?;
		let parent = SectionRef::unresolved(cursor.read_u32()?);

		Ok(Self {
			hashname,
			controllers,
			transform,
			position,
			parent,
		})
	}

	/// Write the shared node prefix.
	pub fn write(&self, out: &mut Writer) -> Result<()> {
		out.write_u64(self.hashname.0);
		out.write_len("animation controller list", self.controllers.len())?;
		for item in &self.controllers {
			out.write_u32(*item);
		}
		out.write_f32s(&self.transform);
		out.write_vec3(self.position);
		out.write_u32(self.parent.raw());
		Ok(())
	}

	/// Local transform as a matrix.
	pub fn matrix(&self) -> Mat4 {
		Mat4::from_cols_array(&self.transform)
	}

	/// Scale component of the local transform.
	pub fn scale(&self) -> Vec3 {
		let (scale, _, _) = self.matrix().to_scale_rotation_translation();
		scale
	}

	/// Resolve the parent link. Any node-like tag is accepted.
	pub fn resolve(&mut self, lookup: &SectionLookup) -> Option<DanglingRef> {
		DanglingRef::check("parent", &mut self.parent, lookup, &[])
	}
}

/// Plain scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct Object3D {
	/// Node fields.
	pub object: ObjectBase,
	/// Undecoded body bytes after the known fields.
	pub tail: Vec<u8>,
}

impl Object3D {
	/// Node named `name` under `parent`.
	pub fn new(name: &str, parent: SectionRef) -> Self {
		Self {
			object: ObjectBase::new(name, parent),
			tail: Vec::new(),
		}
	}
}

impl TypedSection for Object3D {
	const TAG: u32 = tags::OBJECT3D;
	const KIND: &'static str = "object3d";

	fn decode(cursor: &mut Cursor<'_>, _header: &SectionHeader) -> Result<Self> {
		let object = ObjectBase::read(cursor)?;
		Ok(Self {
			object,
			tail: cursor.read_rest().to_vec(),
		})
	}
}

impl Section for Object3D {
	section_any!();

	fn encode(&self, out: &mut Writer) -> Result<()> {
		self.object.write(out)?;
		out.write_bytes(&self.tail);
		Ok(())
	}

	fn resolve_refs(&mut self, lookup: &SectionLookup) -> Vec<DanglingRef> {
		self.object.resolve(lookup).into_iter().collect()
	}
}

#[cfg(test)]
mod tests {
	use dieselmodel_testkit::{Body, IDENTITY, ModelFile, object_prefix};

	use super::*;
	use crate::model::ModelGraph;

	fn animated_node(parent: u32) -> Vec<u8> {
		let mut transform = IDENTITY;
		transform[0] = 2.0;
		Body::new()
			.u64(0xBEEF)
			.u32(3)
			.u32(0x11)
			.u32(0x22)
			.u32(0x33)
			.f32s(&transform)
			.f32s(&[1.0, 2.0, 3.0])
			.u32(parent)
			.raw(&[0xEE])
			.build()
	}

	#[test]
	fn controllers_and_tail_round_trip() {
		let bytes = ModelFile::sized()
			.section(tags::OBJECT3D, 0x40, object_prefix(0xCAFE, IDENTITY, 0).build())
			.section(tags::OBJECT3D, 0x41, animated_node(0x40))
			.build();

		let graph = ModelGraph::load(&bytes).expect("loads");
		let node = graph.require::<Object3D>(0x41).expect("node");
		assert_eq!(node.object.hashname, HashName(0xBEEF));
		assert_eq!(node.object.controllers, vec![0x11, 0x22, 0x33]);
		assert_eq!(node.object.position, Vec3::new(1.0, 2.0, 3.0));
		assert_eq!(node.object.scale(), Vec3::new(2.0, 1.0, 1.0));
		assert_eq!(node.object.parent.get(), Some(0x40));
		assert_eq!(node.tail, vec![0xEE]);
		assert_eq!(graph.save().expect("save"), bytes);
	}

	#[test]
	fn controller_count_past_body_is_rejected() {
		let body = Body::new().u64(1).u32(1000).build();
		let header = SectionHeader {
			tag: tags::OBJECT3D,
			id: 1,
			size: body.len() as u32,
			offset: 0,
		};
		assert!(matches!(
			Object3D::decode(&mut Cursor::new(&body), &header),
			Err(crate::model::ModelError::CountOutOfRange {
				what: "animation controller",
				count: 1000,
				..
			})
		));
	}
}
