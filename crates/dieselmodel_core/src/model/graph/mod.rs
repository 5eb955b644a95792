use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::Serialize;

use crate::model::section::warn_dangling;
use crate::model::sections::{Model, Object3D};
use crate::model::{
	Cursor, FileHeader, HashName, ModelError, PreambleStyle, Registry, Result, Section, SectionHeader, SectionLookup, SectionRef, TypedSection,
	Writer,
};
use crate::util::write_atomic;

/// One section row for listings and JSON dumps.
#[derive(Debug, Clone, Serialize)]
pub struct SectionSummary {
	/// Section id.
	pub id: u32,
	/// Type tag.
	pub tag: u32,
	/// Variant name.
	pub kind: &'static str,
	/// Encoded body size.
	pub size: usize,
}

/// In-memory section graph of one `.model` file.
///
/// Sections are keyed by id and kept in file order; cross-references stay
/// weak ids resolved through [`ModelGraph::resolve`].
#[derive(Debug, Default)]
pub struct ModelGraph {
	sections: HashMap<u32, Box<dyn Section>>,
	order: Vec<u32>,
	style: PreambleStyle,
	trailing: Vec<u8>,
}

impl ModelGraph {
	/// Empty graph written in the sized preamble style.
	pub fn new() -> Self {
		Self::default()
	}

	/// Read and decode a file with the standard registry.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let bytes = fs::read(path)?;
		let graph = Self::load(&bytes)?;
		info!("loaded {} ({} sections)", path.display(), graph.len());
		Ok(graph)
	}

	/// Decode a complete file with the standard registry.
	pub fn load(bytes: &[u8]) -> Result<Self> {
		Self::load_with(bytes, &Registry::standard())
	}

	/// Decode a complete file, then run post-load reference resolution.
	pub fn load_with(bytes: &[u8], registry: &Registry) -> Result<Self> {
		let mut cursor = Cursor::new(bytes);
		let header = FileHeader::parse(&mut cursor)?;
		if let Some(declared) = header.declared_size.filter(|size| *size as usize != bytes.len()) {
			warn!("preamble declares {declared} bytes, file has {}", bytes.len());
		}

		let mut graph = Self {
			style: header.style,
			..Self::default()
		};

		for _ in 0..header.section_count {
			let head = SectionHeader::parse(&mut cursor)?;
			let rem = cursor.remaining();
			if head.size as usize > rem {
				return Err(ModelError::SectionOutOfRange {
					id: head.id,
					at: head.offset,
					size: head.size,
					rem,
				});
			}
			let body = cursor.read_exact(head.size as usize)?;

			if graph.sections.contains_key(&head.id) {
				return Err(ModelError::DuplicateSectionId { id: head.id, at: head.offset });
			}

			let section = registry.decode(&head, body)?;
			graph.sections.insert(head.id, section);
			graph.order.push(head.id);
		}

		graph.trailing = cursor.read_rest().to_vec();
		if !graph.trailing.is_empty() {
			debug!("keeping {} trailing bytes after the section table", graph.trailing.len());
		}

		graph.resolve_all();
		Ok(graph)
	}

	/// Resolve every section's weak references against the current id set.
	///
	/// Returns the number of dangling references, each of which is logged.
	pub fn resolve_all(&mut self) -> usize {
		let lookup = SectionLookup::new(self.sections.iter().map(|(id, section)| (*id, section.tag())));
		let mut total = 0;
		for id in &self.order {
			let Some(section) = self.sections.get_mut(id) else {
				continue;
			};
			let dangling = section.resolve_refs(&lookup);
			warn_dangling(*id, section.kind(), &dangling);
			total += dangling.len();
		}
		total
	}

	/// Encode every section in order with recomputed sizes.
	pub fn save(&self) -> Result<Vec<u8>> {
		let mut table = Writer::new();
		for id in &self.order {
			let Some(section) = self.sections.get(id) else {
				continue;
			};
			let mut body = Writer::new();
			section.encode(&mut body)?;
			SectionHeader::write(&mut table, section.tag(), *id, body.len())?;
			table.write_bytes(&body.into_inner());
		}
		table.write_bytes(&self.trailing);

		let total = FileHeader::encoded_len(self.style) + table.len();
		let mut out = Writer::new();
		FileHeader::write(&mut out, self.style, self.order.len(), total)?;
		out.write_bytes(&table.into_inner());
		Ok(out.into_inner())
	}

	/// Encode and write to `path` atomically.
	pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let bytes = self.save()?;
		write_atomic(path, &bytes)?;
		info!("saved {} ({} sections, {} bytes)", path.display(), self.len(), bytes.len());
		Ok(())
	}

	/// Number of sections.
	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Whether the graph has no sections.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Preamble style used on save.
	pub fn style(&self) -> PreambleStyle {
		self.style
	}

	/// Bytes found after the last section, re-emitted on save.
	pub fn trailing(&self) -> &[u8] {
		&self.trailing
	}

	/// Section ids in file order.
	pub fn ids(&self) -> &[u32] {
		&self.order
	}

	/// Sections in file order.
	pub fn iter(&self) -> impl Iterator<Item = (u32, &dyn Section)> + '_ {
		self.order.iter().filter_map(|id| self.sections.get(id).map(|section| (*id, section.as_ref())))
	}

	/// Whether `id` is present.
	pub fn contains(&self, id: u32) -> bool {
		self.sections.contains_key(&id)
	}

	/// Section with `id`.
	pub fn get(&self, id: u32) -> Option<&dyn Section> {
		self.sections.get(&id).map(|section| section.as_ref())
	}

	/// Mutable section with `id`.
	pub fn get_mut(&mut self, id: u32) -> Option<&mut dyn Section> {
		self.sections.get_mut(&id).map(|section| section.as_mut())
	}

	/// Section with `id` downcast to `T`.
	pub fn get_as<T: Section>(&self, id: u32) -> Option<&T> {
		self.get(id)?.as_any().downcast_ref::<T>()
	}

	/// Mutable section with `id` downcast to `T`.
	pub fn get_as_mut<T: TypedSection>(&mut self, id: u32) -> Option<&mut T> {
		self.sections.get_mut(&id)?.as_any_mut().downcast_mut::<T>()
	}

	/// Section with `id` as `T`, failing when absent or of another kind.
	pub fn require<T: TypedSection>(&self, id: u32) -> Result<&T> {
		let section = self.get(id).ok_or(ModelError::SectionNotFound { id })?;
		section.as_any().downcast_ref::<T>().ok_or(ModelError::SectionKindMismatch {
			id,
			expected: T::KIND,
			got: section.kind(),
		})
	}

	/// Follow a weak reference. Unresolved, dangling, removed, or mistyped targets yield `None`.
	pub fn resolve<T: TypedSection>(&self, reference: SectionRef) -> Option<&T> {
		self.get_as(reference.get()?)
	}

	/// Typed sections of kind `T` in file order.
	pub fn sections_of<T: TypedSection>(&self) -> impl Iterator<Item = (u32, &T)> + '_ {
		self.iter().filter_map(|(id, section)| section.as_any().downcast_ref::<T>().map(|item| (id, item)))
	}

	/// Pick an unused, non-zero id derived from `name`.
	pub fn allocate_id(&self, name: &str) -> Result<u32> {
		let mut id = HashName::of(name).low32();
		for _ in 0..=self.sections.len() + 1 {
			if id != 0 && !self.sections.contains_key(&id) {
				return Ok(id);
			}
			id = id.wrapping_add(1);
		}
		Err(ModelError::IdSpaceExhausted)
	}

	/// Insert `section` under an id derived from `name`; returns the id.
	pub fn insert<S: Section>(&mut self, name: &str, section: S) -> Result<u32> {
		let id = self.allocate_id(name)?;
		self.sections.insert(id, Box::new(section));
		self.order.push(id);
		debug!("inserted section {id:#010x} for {name:?}");
		Ok(id)
	}

	/// Insert a boxed section under an explicit id.
	pub fn insert_with_id(&mut self, id: u32, section: Box<dyn Section>) -> Result<()> {
		if id == 0 || self.sections.contains_key(&id) {
			return Err(ModelError::IdInUse { id });
		}
		self.sections.insert(id, section);
		self.order.push(id);
		Ok(())
	}

	/// Remove and return the section with `id`.
	///
	/// References to it elsewhere keep their raw id and resolve to `None`.
	pub fn remove(&mut self, id: u32) -> Option<Box<dyn Section>> {
		let section = self.sections.remove(&id)?;
		self.order.retain(|item| *item != id);
		Some(section)
	}

	/// Id of the node-like section (object or model) named by `hashname`.
	pub fn find_node(&self, hashname: HashName) -> Option<u32> {
		self.iter().find_map(|(id, section)| {
			let any = section.as_any();
			let name = any
				.downcast_ref::<Object3D>()
				.map(|item| item.object.hashname)
				.or_else(|| any.downcast_ref::<Model>().map(|item| item.object.hashname))?;
			(name == hashname).then_some(id)
		})
	}

	/// Id of the model named by `hashname`.
	pub fn find_model(&self, hashname: HashName) -> Option<u32> {
		self.sections_of::<Model>().find_map(|(id, item)| (item.object.hashname == hashname).then_some(id))
	}

	/// Per-section rows for listings.
	pub fn summaries(&self) -> Result<Vec<SectionSummary>> {
		let mut out = Vec::with_capacity(self.len());
		for (id, section) in self.iter() {
			let mut body = Writer::new();
			section.encode(&mut body)?;
			out.push(SectionSummary {
				id,
				tag: section.tag(),
				kind: section.kind(),
				size: body.len(),
			});
		}
		Ok(out)
	}
}

#[cfg(test)]
mod tests;
