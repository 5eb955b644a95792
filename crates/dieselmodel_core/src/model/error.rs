use thiserror::Error;

/// Crate-local result type for codec and graph operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors produced while reading, decoding, mutating, and writing `.model` data.
///
/// Every variant except [`ModelError::Io`] is a format violation: it is fatal
/// for the file being decoded but never for unrelated files.
#[derive(Debug, Error)]
pub enum ModelError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// File preamble declared a negative section count other than the sized-style marker.
	#[error("invalid section count {count}")]
	InvalidSectionCount {
		/// Parsed signed count.
		count: i32,
	},
	/// Section body would extend past the end of the file.
	#[error("section {id:#010x} at offset {at} declares {size} bytes, only {rem} remain")]
	SectionOutOfRange {
		/// Section id from the header.
		id: u32,
		/// Header file offset.
		at: usize,
		/// Declared body size.
		size: u32,
		/// Bytes remaining after the header.
		rem: usize,
	},
	/// Two section headers in one file share an id.
	#[error("duplicate section id {id:#010x} at offset {at}")]
	DuplicateSectionId {
		/// Colliding id.
		id: u32,
		/// File offset of the second header.
		at: usize,
	},
	/// Decoder for a known tag failed inside its section body.
	#[error("section {id:#010x} ({kind}) is malformed: {source}")]
	MalformedSection {
		/// Section id.
		id: u32,
		/// Human-readable variant name.
		kind: &'static str,
		/// Underlying decode failure.
		#[source]
		source: Box<ModelError>,
	},
	/// Geometry channel declared a component format with unknown stride.
	#[error("unknown geometry component format {format} (channel kind {kind})")]
	UnknownComponentFormat {
		/// Declared format code.
		format: u32,
		/// Declared channel kind.
		kind: u32,
	},
	/// A count field exceeds what the remaining body can hold.
	#[error("{what} count {count} exceeds remaining {rem} bytes")]
	CountOutOfRange {
		/// Field being decoded.
		what: &'static str,
		/// Declared element count.
		count: u32,
		/// Bytes remaining in the body.
		rem: usize,
	},
	/// Encoded body or file grew past the `u32` range of the size fields.
	#[error("{what} length {len} does not fit in 32 bits")]
	LengthOverflow {
		/// Item being encoded.
		what: &'static str,
		/// Offending length.
		len: usize,
	},
	/// Index buffer references a vertex above the `u16` range.
	#[error("vertex index {index} exceeds 16-bit topology range")]
	IndexOverflow {
		/// Offending vertex index.
		index: u32,
	},
	/// Triangle references a vertex the mesh does not have.
	#[error("triangle index {index} out of range for {vertices} vertices")]
	IndexOutOfRange {
		/// Offending vertex index.
		index: u32,
		/// Vertices available.
		vertices: usize,
	},
	/// Channel data length does not match the geometry vertex count.
	#[error("channel kind {kind} holds {got} vertices, geometry has {expected}")]
	ChannelLengthMismatch {
		/// Channel kind.
		kind: u32,
		/// Geometry vertex count.
		expected: usize,
		/// Vertices in the channel.
		got: usize,
	},
	/// Explicit insert used an id that is already present.
	#[error("section id {id:#010x} already in use")]
	IdInUse {
		/// Colliding id.
		id: u32,
	},
	/// Every 32-bit section id is taken.
	#[error("section id space exhausted")]
	IdSpaceExhausted,
	/// Requested section id is not present in the graph.
	#[error("section {id:#010x} not found")]
	SectionNotFound {
		/// Missing id.
		id: u32,
	},
	/// Section exists but has a different variant than requested.
	#[error("section {id:#010x} is a {got}, expected {expected}")]
	SectionKindMismatch {
		/// Section id.
		id: u32,
		/// Requested variant.
		expected: &'static str,
		/// Actual variant.
		got: &'static str,
	},
}

impl ModelError {
	pub(crate) fn malformed(id: u32, kind: &'static str, source: ModelError) -> Self {
		Self::MalformedSection {
			id,
			kind,
			source: Box::new(source),
		}
	}
}
