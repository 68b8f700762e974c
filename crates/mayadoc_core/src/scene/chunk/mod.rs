use crate::scene::bytes::{Cursor, padding_for};
use crate::scene::{ContainerLayout, MayaError, Result, tag_label};

/// One chunk located inside a container buffer.
///
/// Chunks exist only while the walker is positioned on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
	/// Four-character chunk tag read in file byte order.
	pub tag: u32,
	/// Payload length stored in the size field.
	pub declared_length: u64,
	/// Absolute byte offset of the chunk header.
	pub header_offset: usize,
	/// Absolute byte offset of the first payload byte.
	pub payload_offset: usize,
	/// Absolute byte offset one past the last payload byte.
	pub payload_end: usize,
}

impl Chunk {
	/// Read a chunk header at the cursor position and compute its payload span.
	///
	/// The span is not checked against the buffer; callers decide whether an oversized span is a
	/// truncation or an overrun of the parent. A size that cannot be represented as an offset is a
	/// [`MayaError::CorruptContainer`].
	pub fn read(cursor: &mut Cursor<'_>, layout: ContainerLayout) -> Result<Self> {
		let header_offset = cursor.offset();
		let tag = cursor.read_u32()?;
		cursor.skip(layout.tag_padding())?;
		let declared_length = match layout.size_bytes() {
			8 => cursor.read_u64()?,
			_ => u64::from(cursor.read_u32()?),
		};
		let payload_offset = cursor.offset();

		let payload_end = usize::try_from(declared_length)
			.ok()
			.and_then(|len| payload_offset.checked_add(len))
			.ok_or_else(|| MayaError::CorruptContainer {
				offset: header_offset,
				reason: format!("declared length {declared_length} of '{}' overflows the address space", tag_label(tag)),
			})?;

		Ok(Self {
			tag,
			declared_length,
			header_offset,
			payload_offset,
			payload_end,
		})
	}

	/// Payload length in bytes.
	pub fn len(&self) -> usize {
		self.payload_end - self.payload_offset
	}

	/// Return `true` for zero-length chunks.
	pub fn is_empty(&self) -> bool {
		self.payload_end == self.payload_offset
	}

	/// Offset of the next sibling: payload end rounded up to the chunk alignment.
	pub fn padded_end(&self, layout: ContainerLayout) -> usize {
		self.payload_end.saturating_add(padding_for(self.payload_end, layout.chunk_alignment()))
	}

	/// Borrow the payload bytes when they lie inside `bytes`.
	pub fn payload<'a>(&self, bytes: &'a [u8]) -> Option<&'a [u8]> {
		bytes.get(self.payload_offset..self.payload_end)
	}
}
