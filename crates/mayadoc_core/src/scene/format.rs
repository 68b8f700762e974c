use crate::scene::layout::first4;
use crate::scene::{ContainerLayout, MayaError, Result};

/// Encoding of a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneFormat {
	/// IFF chunk container (`.mb`).
	Binary,
	/// Command stream (`.ma`).
	Ascii,
}

impl SceneFormat {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Binary => "binary",
			Self::Ascii => "ascii",
		}
	}

	/// Identify the format from leading bytes.
	///
	/// A container magic wins. Otherwise text that starts, after an optional byte order mark and
	/// whitespace, with a comment or an identifier character is ASCII. Whitespace-only input is an
	/// empty ASCII scene.
	pub fn sniff(bytes: &[u8]) -> Option<Self> {
		if bytes.is_empty() {
			return None;
		}
		if ContainerLayout::sniff(bytes).is_some() {
			return Some(Self::Binary);
		}

		let text = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
		let start = text.iter().position(|byte| !byte.is_ascii_whitespace());
		let Some(start) = start else {
			return Some(Self::Ascii);
		};
		let rest = &text[start..];
		if rest.starts_with(b"//") || rest.starts_with(b"/*") || rest[0].is_ascii_alphabetic() || matches!(rest[0], b'_' | b':' | b'|') {
			return Some(Self::Ascii);
		}
		None
	}

	/// Identify the format, failing on empty or unrecognized input.
	pub fn detect(bytes: &[u8]) -> Result<Self> {
		if bytes.is_empty() {
			return Err(MayaError::TruncatedInput { offset: 0 });
		}
		Self::sniff(bytes).ok_or(MayaError::UnknownFormat { magic: first4(bytes) })
	}
}
