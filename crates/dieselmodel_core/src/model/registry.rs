use std::collections::HashMap;

use log::{debug, warn};

use crate::model::bytes::Cursor;
use crate::model::sections::{Author, Geometry, Material, MaterialGroup, Model, Object3D, Opaque, PassthroughGp, Topology, TopologyIp};
use crate::model::{ModelError, Result, Section, SectionHeader, TypedSection};

/// Decode a section body. The cursor spans exactly the body declared by `header`.
pub type DecodeFn = fn(&mut Cursor<'_>, &SectionHeader) -> Result<Box<dyn Section>>;

#[derive(Clone, Copy)]
struct Decoder {
	kind: &'static str,
	decode: DecodeFn,
}

/// Type tag → decoder table.
#[derive(Clone)]
pub struct Registry {
	decoders: HashMap<u32, Decoder>,
}

impl Registry {
	/// Empty registry: every section decodes as [`Opaque`].
	pub fn empty() -> Self {
		Self { decoders: HashMap::new() }
	}

	/// Registry with every built-in section variant.
	pub fn standard() -> Self {
		let mut registry = Self::empty();
		registry.register_typed::<Object3D>();
		registry.register_typed::<Model>();
		registry.register_typed::<Geometry>();
		registry.register_typed::<Topology>();
		registry.register_typed::<PassthroughGp>();
		registry.register_typed::<TopologyIp>();
		registry.register_typed::<MaterialGroup>();
		registry.register_typed::<Material>();
		registry.register_typed::<Author>();
		registry
	}

	/// Register a [`TypedSection`] under its own tag.
	pub fn register_typed<T: TypedSection>(&mut self) {
		self.register(T::TAG, T::KIND, decode_typed::<T>);
	}

	/// Register or replace the decoder for `tag`.
	pub fn register(&mut self, tag: u32, kind: &'static str, decode: DecodeFn) {
		self.decoders.insert(tag, Decoder { kind, decode });
	}

	/// Decode one body. Unknown tags become [`Opaque`] sections, as do known
	/// tags whose body uses a layout the decoder cannot size.
	pub fn decode(&self, header: &SectionHeader, body: &[u8]) -> Result<Box<dyn Section>> {
		let Some(decoder) = self.decoders.get(&header.tag) else {
			debug!(
				"section {:#010x}: unknown tag {:#010x}, keeping {} bytes opaque",
				header.id,
				header.tag,
				body.len()
			);
			return Ok(Box::new(Opaque::new(header.tag, body.to_vec())));
		};

		let mut cursor = Cursor::new(body);
		match (decoder.decode)(&mut cursor, header) {
			Ok(section) => Ok(section),
			Err(err @ ModelError::UnknownComponentFormat { .. }) => {
				warn!("section {:#010x} ({}): {err}, keeping {} bytes opaque", header.id, decoder.kind, body.len());
				Ok(Box::new(Opaque::new(header.tag, body.to_vec())))
			}
			Err(err) => Err(ModelError::malformed(header.id, decoder.kind, err)),
		}
	}
}

fn decode_typed<T: TypedSection>(cursor: &mut Cursor<'_>, header: &SectionHeader) -> Result<Box<dyn Section>> {
	Ok(Box::new(T::decode(cursor, header)?))
}

impl Default for Registry {
	fn default() -> Self {
		Self::standard()
	}
}
