use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, MayaError>;

/// Errors produced while sniffing, walking, and interpreting Maya scene data.
#[derive(Debug, Error)]
pub enum MayaError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Leading bytes match neither the binary container nor the ASCII dialect.
	#[error("not a Maya scene file (magic={magic:?})")]
	UnknownFormat {
		/// First up-to-4 bytes of the stream.
		magic: [u8; 4],
	},
	/// Container structure cannot be followed any further.
	#[error("corrupt container at offset {offset}: {reason}")]
	CorruptContainer {
		/// Byte offset of the offending chunk header.
		offset: usize,
		/// Short description of what could not be read.
		reason: String,
	},
	/// Input ended inside a chunk header, a chunk payload, or a group that promised more bytes.
	#[error("truncated input at offset {offset}")]
	TruncatedInput {
		/// Byte offset where more data was required.
		offset: usize,
	},
	/// Scene declares a Maya version older than any layout in the type registry.
	#[error("unsupported format version {version:?}")]
	UnsupportedFormatVersion {
		/// Version text as stored in the file.
		version: String,
	},
	/// Not enough bytes remained for a requested read.
	#[error("out of bounds read at offset {at}, need {need} bytes, remaining {rem}")]
	OutOfBounds {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Child chunk extends past the end of its parent group.
	#[error("chunk at offset {at} ends at {end}, past parent end {parent_end}")]
	NestedOverrun {
		/// Byte offset of the child chunk header.
		at: usize,
		/// Declared end of the child payload.
		end: usize,
		/// Declared end of the parent payload.
		parent_end: usize,
	},
	/// Bundled or supplied type table is malformed.
	#[error("type registry line {line}: {reason}")]
	Registry {
		/// One-based line number in the table source.
		line: usize,
		/// Description of the problem.
		reason: String,
	},
}

impl MayaError {
	/// Return `true` when the error ends the whole decode rather than one chunk or statement.
	pub fn is_fatal(&self) -> bool {
		!matches!(self, Self::OutOfBounds { .. } | Self::NestedOverrun { .. })
	}
}
