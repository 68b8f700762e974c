use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::OnceLock;

use crate::scene::{MayaError, Result, parse_tag, tag_label};

const BUNDLED_TYPEIDS: &str = include_str!("../../../data/typeids.dat");

static BUNDLED: OnceLock<std::result::Result<TypeRegistry, (usize, String)>> = OnceLock::new();

/// Scalar encoding of one payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
	/// Unsigned byte, decoded as `Int32`.
	U8,
	/// Signed 16-bit integer, decoded as `Int32`.
	I16,
	/// Signed 32-bit integer.
	I32,
	/// Unsigned 32-bit integer, decoded as `Int64`.
	U32,
	/// Signed 64-bit integer.
	I64,
	/// 32-bit float.
	F32,
	/// 64-bit float.
	F64,
	/// One byte, non-zero is `true`.
	Bool,
	/// Zero-terminated string.
	CString,
	/// `u32` length-prefixed string.
	PString,
	/// Rest of the payload as text, trailing zero bytes trimmed.
	Chars,
	/// Raw bytes.
	Bytes,
}

impl PrimitiveKind {
	fn parse(text: &str) -> Option<Self> {
		Some(match text {
			"u8" => Self::U8,
			"i16" => Self::I16,
			"i32" => Self::I32,
			"u32" => Self::U32,
			"i64" => Self::I64,
			"f32" => Self::F32,
			"f64" => Self::F64,
			"bool" => Self::Bool,
			"cstring" => Self::CString,
			"pstring" => Self::PString,
			"chars" => Self::Chars,
			"bytes" => Self::Bytes,
			_ => return None,
		})
	}

	/// Return `true` for kinds that decode to text.
	pub fn is_text(self) -> bool {
		matches!(self, Self::CString | Self::PString | Self::Chars)
	}
}

/// How many times a field repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCount {
	/// Exactly once.
	One,
	/// Exactly `n` elements (for `bytes`, `n` bytes).
	Fixed(usize),
	/// Repeat until the payload is exhausted.
	Rest,
	/// Once if any payload bytes remain, otherwise absent.
	Optional,
}

/// One named field of a leaf chunk payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
	/// Field name used by the walker to build events.
	pub name: Box<str>,
	/// Scalar encoding.
	pub kind: PrimitiveKind,
	/// Repetition.
	pub count: FieldCount,
}

/// What a group chunk's type id stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRole {
	/// Plain container whose children are walked in order.
	Scene,
	/// File header; unit records are flushed when it closes.
	Header,
	/// Connection list or a single connection record.
	Connections,
	/// File reference block.
	Reference,
}

/// How the walker turns a decoded leaf into events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafCategory {
	/// Required Maya version (`version`).
	Requires,
	/// Required plug-in (`name`, `version`).
	Plugin,
	/// File info pair (`key`, `value`).
	FileInfo,
	/// Angular unit (`value`).
	UnitAngle,
	/// Linear unit (`value`).
	UnitLinear,
	/// Time unit (`value`).
	UnitTime,
	/// Node creation (`name`, optional `parent`).
	Create,
	/// Node selection (optional `name`).
	Select,
	/// Attribute assignment (`attr`, `value`).
	Attribute,
	/// Attribute connection (`src`, `dst`).
	Connect,
	/// File reference (`path`).
	Reference,
	/// Known record that carries nothing to report.
	Skip,
}

impl LeafCategory {
	fn parse(text: &str) -> Option<Self> {
		Some(match text {
			"requires" => Self::Requires,
			"plugin" => Self::Plugin,
			"file-info" => Self::FileInfo,
			"unit-angle" => Self::UnitAngle,
			"unit-linear" => Self::UnitLinear,
			"unit-time" => Self::UnitTime,
			"create" => Self::Create,
			"select" => Self::Select,
			"attribute" => Self::Attribute,
			"connect" => Self::Connect,
			"reference" => Self::Reference,
			"skip" => Self::Skip,
			_ => return None,
		})
	}

	/// Text fields that must be present exactly once.
	fn required_text(self) -> &'static [&'static str] {
		match self {
			Self::Requires => &["version"],
			Self::Plugin => &["name", "version"],
			Self::FileInfo => &["key", "value"],
			Self::UnitAngle | Self::UnitLinear | Self::UnitTime => &["value"],
			Self::Create => &["name"],
			Self::Attribute => &["attr"],
			Self::Connect => &["src", "dst"],
			Self::Reference => &["path"],
			Self::Select | Self::Skip => &[],
		}
	}

	/// Text fields that may be present.
	fn optional_text(self) -> &'static [&'static str] {
		match self {
			Self::Create => &["parent"],
			Self::Select => &["name"],
			_ => &[],
		}
	}
}

/// Semantic class of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
	/// Group type id with a structural role.
	Group(GroupRole),
	/// Group type id naming a node type.
	Node,
	/// Leaf chunk tag.
	Leaf(LeafCategory),
}

/// Registry entry for one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
	/// Four-character tag.
	pub tag: u32,
	/// Type name (node type name for nodes).
	pub name: Box<str>,
	/// Semantic class.
	pub category: TypeCategory,
	/// Payload fields in stored order (leaves only).
	pub fields: Vec<FieldSpec>,
}

#[derive(Debug)]
struct Section {
	version: u32,
	forms: HashMap<u32, TypeDescriptor>,
	leaves: HashMap<u32, TypeDescriptor>,
}

/// Immutable, version-aware lookup from tag to type descriptor.
///
/// Sections are ordered by ascending Maya version; the first one is the base layout and each later
/// section overrides or adds entries for files written by that version or newer.
#[derive(Debug)]
pub struct TypeRegistry {
	sections: Vec<Section>,
}

impl TypeRegistry {
	/// Return the process-wide registry parsed from the bundled `typeids.dat`.
	///
	/// The table is parsed on first access; a malformed table is reported on every call.
	pub fn bundled() -> Result<&'static TypeRegistry> {
		match BUNDLED.get_or_init(|| Self::parse(BUNDLED_TYPEIDS).map_err(into_parts)) {
			Ok(registry) => Ok(registry),
			Err((line, reason)) => Err(MayaError::Registry {
				line: *line,
				reason: reason.clone(),
			}),
		}
	}

	/// Parse a registry table.
	pub fn parse(text: &str) -> Result<Self> {
		let mut sections: Vec<Section> = Vec::new();

		for (idx, raw) in text.lines().enumerate() {
			let line = idx + 1;
			let content = raw.split('#').next().unwrap_or("").trim();
			if content.is_empty() {
				continue;
			}

			let words: Vec<&str> = content.split_whitespace().collect();
			if words[0] == "@version" {
				let version = match words.as_slice() {
					[_, value] => value.parse::<u32>().map_err(|_| registry_err(line, format!("invalid version {value:?}")))?,
					_ => return Err(registry_err(line, "expected `@version <number>`")),
				};
				if let Some(prev) = sections.last().map(|section| section.version).filter(|prev| version <= *prev) {
					return Err(registry_err(line, format!("version {version} does not follow {prev}")));
				}
				sections.push(Section {
					version,
					forms: HashMap::new(),
					leaves: HashMap::new(),
				});
				continue;
			}

			let section = sections.last_mut().ok_or_else(|| registry_err(line, "entry before the first @version"))?;
			let (is_form, item) = parse_entry(line, &words)?;
			let table = if is_form { &mut section.forms } else { &mut section.leaves };
			match table.entry(item.tag) {
				Entry::Occupied(_) => return Err(registry_err(line, format!("duplicate tag '{}'", tag_label(item.tag)))),
				Entry::Vacant(slot) => {
					slot.insert(item);
				}
			}
		}

		if sections.is_empty() {
			return Err(registry_err(0, "no @version sections"));
		}
		Ok(Self { sections })
	}

	/// Oldest version the registry describes.
	pub fn base_version(&self) -> u32 {
		self.sections.first().map_or(0, |section| section.version)
	}

	/// Section versions in ascending order.
	pub fn versions(&self) -> impl Iterator<Item = u32> + '_ {
		self.sections.iter().map(|section| section.version)
	}

	/// Look up a leaf chunk tag as seen by a file of `version`.
	pub fn lookup(&self, version: u32, tag: u32) -> Option<&TypeDescriptor> {
		self.visible(version).find_map(|section| section.leaves.get(&tag))
	}

	/// Look up a group type id as seen by a file of `version`.
	pub fn lookup_form(&self, version: u32, type_id: u32) -> Option<&TypeDescriptor> {
		self.visible(version).find_map(|section| section.forms.get(&type_id))
	}

	fn visible(&self, version: u32) -> impl Iterator<Item = &Section> {
		self.sections.iter().rev().filter(move |section| section.version <= version)
	}
}

fn parse_entry(line: usize, words: &[&str]) -> Result<(bool, TypeDescriptor)> {
	let tag_at = |idx: usize| -> Result<u32> {
		let text = words.get(idx).ok_or_else(|| registry_err(line, "missing tag"))?;
		parse_tag(text).ok_or_else(|| registry_err(line, format!("invalid tag {text:?}")))
	};

	match words[0] {
		"group" => {
			if words.len() != 4 {
				return Err(registry_err(line, "expected `group <tag> <name> <role>`"));
			}
			let role = match words[3] {
				"scene" => GroupRole::Scene,
				"header" => GroupRole::Header,
				"connections" => GroupRole::Connections,
				"reference" => GroupRole::Reference,
				other => return Err(registry_err(line, format!("unknown group role {other:?}"))),
			};
			Ok((
				true,
				TypeDescriptor {
					tag: tag_at(1)?,
					name: words[2].into(),
					category: TypeCategory::Group(role),
					fields: Vec::new(),
				},
			))
		}
		"node" => {
			if words.len() != 3 {
				return Err(registry_err(line, "expected `node <tag> <type name>`"));
			}
			Ok((
				true,
				TypeDescriptor {
					tag: tag_at(1)?,
					name: words[2].into(),
					category: TypeCategory::Node,
					fields: Vec::new(),
				},
			))
		}
		"leaf" => {
			let tag = tag_at(1)?;
			let name = *words.get(2).ok_or_else(|| registry_err(line, "missing name"))?;
			let category_text = *words.get(3).ok_or_else(|| registry_err(line, "missing category"))?;
			let category = LeafCategory::parse(category_text).ok_or_else(|| registry_err(line, format!("unknown leaf category {category_text:?}")))?;

			let mut fields = Vec::with_capacity(words.len().saturating_sub(4));
			for spec in &words[4..] {
				let field = parse_field(line, spec)?;
				if fields.iter().any(|item: &FieldSpec| item.name == field.name) {
					return Err(registry_err(line, format!("duplicate field {:?}", field.name)));
				}
				fields.push(field);
			}
			check_required(line, category, &fields)?;

			Ok((
				false,
				TypeDescriptor {
					tag,
					name: name.into(),
					category: TypeCategory::Leaf(category),
					fields,
				},
			))
		}
		other => Err(registry_err(line, format!("unknown entry kind {other:?}"))),
	}
}

fn parse_field(line: usize, spec: &str) -> Result<FieldSpec> {
	let (name, kind_text) = spec.split_once(':').ok_or_else(|| registry_err(line, format!("field {spec:?} is not `name:kind`")))?;
	if name.is_empty() {
		return Err(registry_err(line, format!("field {spec:?} has no name")));
	}

	let (kind_text, count) = if let Some(base) = kind_text.strip_suffix('?') {
		(base, FieldCount::Optional)
	} else if let Some(base) = kind_text.strip_suffix("[]") {
		(base, FieldCount::Rest)
	} else if let Some((base, tail)) = kind_text.split_once('[') {
		let digits = tail.strip_suffix(']').ok_or_else(|| registry_err(line, format!("unclosed count in {spec:?}")))?;
		let count = digits.parse::<usize>().map_err(|_| registry_err(line, format!("invalid count in {spec:?}")))?;
		(base, FieldCount::Fixed(count))
	} else {
		(kind_text, FieldCount::One)
	};

	let kind = PrimitiveKind::parse(kind_text).ok_or_else(|| registry_err(line, format!("unknown field kind {kind_text:?}")))?;
	if kind == PrimitiveKind::Chars && !matches!(count, FieldCount::One | FieldCount::Optional) {
		return Err(registry_err(line, format!("`chars` field {name:?} cannot repeat")));
	}

	Ok(FieldSpec {
		name: name.into(),
		kind,
		count,
	})
}

fn check_required(line: usize, category: LeafCategory, fields: &[FieldSpec]) -> Result<()> {
	for required in category.required_text() {
		let Some(field) = fields.iter().find(|item| item.name.as_ref() == *required) else {
			return Err(registry_err(line, format!("leaf category requires field {required:?}")));
		};
		if !field.kind.is_text() || field.count != FieldCount::One {
			return Err(registry_err(line, format!("field {required:?} must be a single text field")));
		}
	}

	for optional in category.optional_text() {
		let Some(field) = fields.iter().find(|item| item.name.as_ref() == *optional) else {
			continue;
		};
		if !field.kind.is_text() || !matches!(field.count, FieldCount::One | FieldCount::Optional) {
			return Err(registry_err(line, format!("field {optional:?} must be a text field")));
		}
	}

	if category == LeafCategory::Attribute && !fields.iter().any(|item| item.name.as_ref() == "value") {
		return Err(registry_err(line, "attribute leaf requires field \"value\""));
	}
	Ok(())
}

fn registry_err(line: usize, reason: impl Into<String>) -> MayaError {
	MayaError::Registry { line, reason: reason.into() }
}

fn into_parts(err: MayaError) -> (usize, String) {
	match err {
		MayaError::Registry { line, reason } => (line, reason),
		other => (0, other.to_string()),
	}
}
