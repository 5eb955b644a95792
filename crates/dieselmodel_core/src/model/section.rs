use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use log::warn;

use crate::model::bytes::{Cursor, Writer};
use crate::model::{Result, SectionHeader};

/// Behaviour shared by every decoded section variant.
///
/// Object safe; decoding lives on [`TypedSection`] and is dispatched through
/// the [`crate::model::Registry`].
pub trait Section: fmt::Debug + Any + Send + Sync {
	/// On-disk type tag.
	fn tag(&self) -> u32;

	/// Short variant name used in logs and summaries.
	fn kind(&self) -> &'static str;

	/// Encode the body: known fields followed by the preserved tail.
	fn encode(&self, out: &mut Writer) -> Result<()>;

	/// Resolve weak references once every section of the file is known.
	///
	/// Returns the references that did not resolve; the default declares none.
	fn resolve_refs(&mut self, _lookup: &SectionLookup) -> Vec<DanglingRef> {
		Vec::new()
	}

	/// Borrow as [`Any`] for downcasting.
	fn as_any(&self) -> &dyn Any;

	/// Mutably borrow as [`Any`] for downcasting.
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Section variant with a fixed tag and its own decoder.
pub trait TypedSection: Section + Sized {
	/// On-disk type tag.
	const TAG: u32;
	/// Short variant name.
	const KIND: &'static str;

	/// Decode from a cursor spanning exactly the section body.
	fn decode(cursor: &mut Cursor<'_>, header: &SectionHeader) -> Result<Self>;
}

/// Fill in the tag, kind, and downcast methods of [`Section`] for a [`TypedSection`].
macro_rules! section_any {
	() => {
		fn tag(&self) -> u32 {
			<Self as $crate::model::TypedSection>::TAG
		}

		fn kind(&self) -> &'static str {
			<Self as $crate::model::TypedSection>::KIND
		}

		fn as_any(&self) -> &dyn std::any::Any {
			self
		}

		fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
			self
		}
	};
}
pub(crate) use section_any;

/// Resolution state of a [`SectionRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefState {
	Unresolved,
	Resolved,
	Dangling,
}

/// Weak reference to another section by id.
///
/// The raw id is always preserved for encoding; [`SectionRef::get`] only
/// reports a target once post-load resolution found it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SectionRef {
	raw: u32,
	state: RefState,
}

impl SectionRef {
	/// No reference.
	pub const NONE: Self = Self {
		raw: 0,
		state: RefState::Dangling,
	};

	/// Reference read from disk, pending resolution.
	pub fn unresolved(raw: u32) -> Self {
		Self {
			raw,
			state: RefState::Unresolved,
		}
	}

	/// Reference to a section known to exist.
	pub fn to(id: u32) -> Self {
		if id == 0 {
			return Self::NONE;
		}
		Self {
			raw: id,
			state: RefState::Resolved,
		}
	}

	/// Raw id as stored on disk.
	pub fn raw(self) -> u32 {
		self.raw
	}

	/// Target id when the reference resolved.
	pub fn get(self) -> Option<u32> {
		(self.state == RefState::Resolved).then_some(self.raw)
	}

	/// Whether the reference names a section that was not found.
	pub fn is_dangling(self) -> bool {
		self.raw != 0 && self.state == RefState::Dangling
	}

	/// Resolve against `lookup`, accepting targets whose tag is in `accepted`.
	///
	/// An empty `accepted` slice accepts any tag.
	pub fn resolve(&mut self, lookup: &SectionLookup, accepted: &[u32]) -> bool {
		if self.raw == 0 {
			self.state = RefState::Dangling;
			return true;
		}

		let ok = lookup.tag_of(self.raw).is_some_and(|tag| accepted.is_empty() || accepted.contains(&tag));
		self.state = if ok { RefState::Resolved } else { RefState::Dangling };
		ok
	}
}

impl Default for SectionRef {
	fn default() -> Self {
		Self::NONE
	}
}

impl fmt::Debug for SectionRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.state {
			RefState::Resolved => write!(f, "ref({:#010x})", self.raw),
			_ if self.raw == 0 => f.write_str("ref(none)"),
			RefState::Unresolved => write!(f, "ref({:#010x}?)", self.raw),
			RefState::Dangling => write!(f, "ref({:#010x}!)", self.raw),
		}
	}
}

/// Reference that failed to resolve during post-load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
	/// Field holding the reference.
	pub field: &'static str,
	/// Raw id that was not found.
	pub target: u32,
}

impl DanglingRef {
	/// Resolve `reference` and report it when it dangles.
	pub fn check(field: &'static str, reference: &mut SectionRef, lookup: &SectionLookup, accepted: &[u32]) -> Option<Self> {
		if reference.resolve(lookup, accepted) {
			return None;
		}
		Some(Self {
			field,
			target: reference.raw(),
		})
	}
}

/// Read-only id → tag view of a complete graph, used during post-load.
#[derive(Debug, Default)]
pub struct SectionLookup {
	tags: HashMap<u32, u32>,
}

impl SectionLookup {
	/// Build a lookup from `(id, tag)` pairs.
	pub fn new(pairs: impl IntoIterator<Item = (u32, u32)>) -> Self {
		Self {
			tags: pairs.into_iter().collect(),
		}
	}

	/// Tag of the section with `id`.
	pub fn tag_of(&self, id: u32) -> Option<u32> {
		self.tags.get(&id).copied()
	}
}

/// Log every dangling reference reported by section `id`.
pub(crate) fn warn_dangling(id: u32, kind: &str, dangling: &[DanglingRef]) {
	for item in dangling {
		warn!(
			"section {id:#010x} ({kind}): {} references missing section {:#010x}, treating as none",
			item.field, item.target
		);
	}
}
