use crate::scene::{MayaError, Result, fourcc};

/// Byte order of the binary container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	/// Little-endian byte order (byte-reversed magic).
	Little,
	/// Big-endian byte order (the order Maya writes).
	Big,
}

impl Endianness {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// Container flavor selected by the leading group tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
	/// Classic IFF (`FORM`): 32-bit sizes, 2-byte alignment.
	Iff85,
	/// Maya 32-bit IFF (`FOR4`): 32-bit sizes, 4-byte alignment.
	Maya32,
	/// Maya 64-bit IFF (`FOR8`): 64-bit sizes, 8-byte alignment.
	Maya64,
}

/// Kind of group chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupClass {
	/// `FORM` / `FOR4` / `FOR8`.
	Form,
	/// `LIST` / `LIS4` / `LIS8`.
	List,
	/// `CAT ` / `CAT4` / `CAT8`.
	Catalog,
}

/// Chunk header geometry and byte order of one binary container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerLayout {
	/// Container flavor.
	pub kind: ContainerKind,
	/// Byte order for tags, sizes, and payload scalars.
	pub endianness: Endianness,
}

impl ContainerLayout {
	/// Number of leading bytes inspected for the magic.
	pub const MAGIC_LEN: usize = 4;

	/// Identify a binary container from its first four bytes.
	pub fn sniff(bytes: &[u8]) -> Option<Self> {
		let magic: [u8; 4] = bytes.get(0..Self::MAGIC_LEN)?.try_into().ok()?;
		let mut reversed = magic;
		reversed.reverse();

		for (code, endianness) in [(magic, Endianness::Big), (reversed, Endianness::Little)] {
			let kind = match &code {
				b"FORM" => ContainerKind::Iff85,
				b"FOR4" => ContainerKind::Maya32,
				b"FOR8" => ContainerKind::Maya64,
				_ => continue,
			};
			return Some(Self { kind, endianness });
		}
		None
	}

	/// Parse the container layout, failing on short or unrecognized input.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		if bytes.len() < Self::MAGIC_LEN {
			return Err(MayaError::TruncatedInput { offset: bytes.len() });
		}
		Self::sniff(bytes).ok_or(MayaError::UnknownFormat { magic: first4(bytes) })
	}

	/// Width of the size field in bytes.
	pub fn size_bytes(self) -> usize {
		match self.kind {
			ContainerKind::Iff85 | ContainerKind::Maya32 => 4,
			ContainerKind::Maya64 => 8,
		}
	}

	/// Alignment applied after the tag and after a group's type id.
	pub fn header_alignment(self) -> usize {
		match self.kind {
			ContainerKind::Iff85 => 2,
			ContainerKind::Maya32 => 4,
			ContainerKind::Maya64 => 8,
		}
	}

	/// Alignment applied after every chunk payload.
	pub fn chunk_alignment(self) -> usize {
		self.header_alignment()
	}

	/// Padding bytes between the tag and the size field.
	pub fn tag_padding(self) -> usize {
		self.header_alignment().saturating_sub(4)
	}

	/// Total chunk header size.
	pub fn header_size(self) -> usize {
		4 + self.tag_padding() + self.size_bytes()
	}

	/// Bytes a group payload spends on its type id, including realignment.
	pub fn type_id_span(self) -> usize {
		4_usize.next_multiple_of(self.header_alignment())
	}

	/// Classify a chunk tag as one of this layout's group tags.
	pub fn group_class(self, tag: u32) -> Option<GroupClass> {
		let [form, list, cat] = self.group_tags();
		if tag == form {
			Some(GroupClass::Form)
		} else if tag == list {
			Some(GroupClass::List)
		} else if tag == cat {
			Some(GroupClass::Catalog)
		} else {
			None
		}
	}

	/// Return `[form, list, catalog]` tags for this layout.
	pub fn group_tags(self) -> [u32; 3] {
		match self.kind {
			ContainerKind::Iff85 => [fourcc(b"FORM"), fourcc(b"LIST"), fourcc(b"CAT ")],
			ContainerKind::Maya32 => [fourcc(b"FOR4"), fourcc(b"LIS4"), fourcc(b"CAT4")],
			ContainerKind::Maya64 => [fourcc(b"FOR8"), fourcc(b"LIS8"), fourcc(b"CAT8")],
		}
	}

	/// Stable label for the container flavor.
	pub fn label(self) -> &'static str {
		match self.kind {
			ContainerKind::Iff85 => "FORM",
			ContainerKind::Maya32 => "FOR4",
			ContainerKind::Maya64 => "FOR8",
		}
	}
}

pub(crate) fn first4(bytes: &[u8]) -> [u8; 4] {
	let mut magic = [0_u8; 4];
	let take = bytes.len().min(4);
	magic[..take].copy_from_slice(&bytes[..take]);
	magic
}

#[cfg(test)]
mod tests {
	use crate::scene::{ContainerKind, ContainerLayout, Endianness, GroupClass, MayaError, fourcc};

	#[test]
	fn sniffs_maya_32_bit_container() {
		let layout = ContainerLayout::parse(b"FOR4\0\0\0\x04Maya").expect("layout parses");
		assert_eq!(layout.kind, ContainerKind::Maya32);
		assert_eq!(layout.endianness, Endianness::Big);
		assert_eq!(layout.header_size(), 8);
		assert_eq!(layout.type_id_span(), 4);
		assert_eq!(layout.label(), "FOR4");
	}

	#[test]
	fn sniffs_maya_64_bit_container() {
		let layout = ContainerLayout::parse(b"FOR8").expect("layout parses");
		assert_eq!(layout.kind, ContainerKind::Maya64);
		assert_eq!(layout.header_size(), 16);
		assert_eq!(layout.tag_padding(), 4);
		assert_eq!(layout.type_id_span(), 8);
		assert_eq!(layout.chunk_alignment(), 8);
	}

	#[test]
	fn sniffs_classic_iff_with_two_byte_alignment() {
		let layout = ContainerLayout::parse(b"FORM").expect("layout parses");
		assert_eq!(layout.kind, ContainerKind::Iff85);
		assert_eq!(layout.chunk_alignment(), 2);
		assert_eq!(layout.header_size(), 8);
		assert_eq!(layout.type_id_span(), 4);
	}

	#[test]
	fn reversed_magic_selects_little_endian() {
		let layout = ContainerLayout::parse(b"4ROF").expect("layout parses");
		assert_eq!(layout.kind, ContainerKind::Maya32);
		assert_eq!(layout.endianness, Endianness::Little);
	}

	#[test]
	fn classifies_group_tags_per_layout() {
		let layout = ContainerLayout::parse(b"FOR4").expect("layout parses");
		assert_eq!(layout.group_class(fourcc(b"FOR4")), Some(GroupClass::Form));
		assert_eq!(layout.group_class(fourcc(b"LIS4")), Some(GroupClass::List));
		assert_eq!(layout.group_class(fourcc(b"FOR8")), None);
		assert_eq!(layout.group_class(fourcc(b"CREA")), None);
	}

	#[test]
	fn rejects_short_and_foreign_input() {
		assert!(matches!(ContainerLayout::parse(b"FO"), Err(MayaError::TruncatedInput { offset: 2 })));
		assert!(matches!(
			ContainerLayout::parse(b"BLENDER"),
			Err(MayaError::UnknownFormat { magic }) if &magic == b"BLEN"
		));
	}
}
