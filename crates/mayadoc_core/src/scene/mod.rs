mod ascii;
mod bytes;
mod chunk;
mod error;
mod event;
mod fields;
mod file;
mod format;
mod layout;
mod registry;
mod tag;
mod value;
mod walker;

/// ASCII command-stream tokenizer and interpreter.
pub use ascii::{CommandInterpreter, Token, TokenKind, Tokenizer};
/// Bounded byte cursor and alignment helper.
pub use bytes::{Cursor, padding_for};
/// Transient chunk header record.
pub use chunk::Chunk;
/// Error and result aliases.
pub use error::{MayaError, Result};
/// Event vocabulary, sink trait, and running counts.
pub use event::{DecodeStats, EventSink, SceneEvent, UnsupportedReason, split_plug};
/// Registry-driven payload field decoding.
pub use fields::{DecodedFields, FieldValue, decode_fields};
/// In-memory scene file and event stream entry points.
pub use file::{SceneEvents, SceneFile, decode};
/// Format sniffing.
pub use format::SceneFormat;
/// Binary container geometry.
pub use layout::{ContainerKind, ContainerLayout, Endianness, GroupClass};
/// Version-aware type-id registry.
pub use registry::{FieldCount, FieldSpec, GroupRole, LeafCategory, PrimitiveKind, TypeCategory, TypeDescriptor, TypeRegistry};
/// Four-character tag helpers.
pub use tag::{fourcc, parse_tag, tag_label};
/// Decoded attribute values.
pub use value::Value;
/// Binary chunk walker and its options.
pub use walker::{ChunkWalker, DecodeOptions};
