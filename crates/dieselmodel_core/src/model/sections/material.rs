use crate::model::bytes::{Cursor, Writer};
use crate::model::section::section_any;
use crate::model::{DanglingRef, HashName, Result, Section, SectionHeader, SectionLookup, SectionRef, TypedSection, tags};

/// Material definition. Only the name is decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
	/// Material name idstring.
	pub hashname: HashName,
	/// Shader parameters and texture slots, kept verbatim.
	pub tail: Vec<u8>,
}

impl Material {
	/// Empty material named `name`.
	pub fn new(name: &str) -> Self {
		Self {
			hashname: HashName::of(name),
			tail: Vec::new(),
		}
	}
}

impl TypedSection for Material {
	const TAG: u32 = tags::MATERIAL;
	const KIND: &'static str = "material";

	fn decode(cursor: &mut Cursor<'_>, _header: &SectionHeader) -> Result<Self> {
		Ok(Self {
			hashname: HashName(cursor.read_u64()?),
			tail: cursor.read_rest().to_vec(),
		})
	}
}

impl Section for Material {
	section_any!();

	fn encode(&self, out: &mut Writer) -> Result<()> {
		out.write_u64(self.hashname.0);
		out.write_bytes(&self.tail);
		Ok(())
	}
}

/// Ordered material list indexed by [`crate::model::sections::RenderAtom::material_id`].
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialGroup {
	/// Materials in slot order.
	pub materials: Vec<SectionRef>,
	/// Undecoded body bytes after the known fields.
	pub tail: Vec<u8>,
}

impl MaterialGroup {
	/// Group over existing materials.
	pub fn new(materials: &[u32]) -> Self {
		Self {
			materials: materials.iter().copied().map(SectionRef::to).collect(),
			tail: Vec::new(),
		}
	}
}

impl TypedSection for MaterialGroup {
	const TAG: u32 = tags::MATERIAL_GROUP;
	const KIND: &'static str = "material_group";

	fn decode(cursor: &mut Cursor<'_>, _header: &SectionHeader) -> Result<Self> {
		let count = cursor.read_count("material", 4)?;
		let mut materials = Vec::with_capacity(count as usize);
		for _ in 0..count {
			materials.push(SectionRef::unresolved(cursor.read_u32()?));
		}
		Ok(Self {
			materials,
			tail: cursor.read_rest().to_vec(),
		})
	}
}

impl Section for MaterialGroup {
	section_any!();

	fn encode(&self, out: &mut Writer) -> Result<()> {
		out.write_len("material list", self.materials.len())?;
		for item in &self.materials {
			out.write_u32(item.raw());
		}
		out.write_bytes(&self.tail);
		Ok(())
	}

	fn resolve_refs(&mut self, lookup: &SectionLookup) -> Vec<DanglingRef> {
		self.materials
			.iter_mut()
			.filter_map(|item| DanglingRef::check("material", item, lookup, &[tags::MATERIAL]))
			.collect()
	}
}
