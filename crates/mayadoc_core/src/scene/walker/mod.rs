use std::collections::VecDeque;

use log::{debug, trace, warn};

use crate::scene::bytes::Cursor;
use crate::scene::{
	Chunk, ContainerLayout, DecodedFields, GroupClass, GroupRole, LeafCategory, MayaError, Result, SceneEvent, TypeCategory, TypeRegistry,
	UnsupportedReason, Value, decode_fields, tag_label,
};

/// Limits and overrides for one decode pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
	/// Deepest group nesting walked before groups are skipped as `DepthExceeded`.
	pub max_depth: usize,
	/// Registry version used instead of the one read from the file header.
	pub version_override: Option<u32>,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 64,
			version_override: None,
		}
	}
}

#[derive(Debug, Clone)]
enum FrameRole {
	Root,
	Group(GroupRole),
	Node(Box<str>),
}

#[derive(Debug)]
struct Frame {
	type_id: u32,
	/// Children are read up to here; the declared end clamped to the buffer.
	end: usize,
	declared_end: usize,
	resume: usize,
	role: FrameRole,
}

#[derive(Debug, Default)]
struct PendingUnits {
	angle: Option<Box<str>>,
	linear: Option<Box<str>>,
	time: Option<Box<str>>,
}

impl PendingUnits {
	fn is_complete(&self) -> bool {
		self.angle.is_some() && self.linear.is_some() && self.time.is_some()
	}

	fn is_empty(&self) -> bool {
		self.angle.is_none() && self.linear.is_none() && self.time.is_none()
	}
}

/// Pull-based walker over a binary Maya IFF container.
///
/// Nesting is tracked on an explicit stack of open groups, each bounded by its declared payload end.
/// Every call to [`Iterator::next`] advances by at most one chunk. Damaged or unknown chunks become
/// [`SceneEvent::Unsupported`]; a fatal error is yielded once, after every event produced before it,
/// and ends the stream.
pub struct ChunkWalker<'a> {
	bytes: &'a [u8],
	layout: ContainerLayout,
	registry: &'a TypeRegistry,
	options: DecodeOptions,
	version: u32,
	pos: usize,
	stack: Vec<Frame>,
	pending: VecDeque<SceneEvent>,
	current_node: Option<Box<str>>,
	units: PendingUnits,
	failed: Option<MayaError>,
	done: bool,
}

impl<'a> ChunkWalker<'a> {
	/// Create a walker over a whole container buffer.
	pub fn new(bytes: &'a [u8], registry: &'a TypeRegistry, options: DecodeOptions) -> Result<Self> {
		let layout = ContainerLayout::parse(bytes)?;
		let root = Frame {
			type_id: layout.group_tags()[0],
			end: bytes.len(),
			declared_end: bytes.len(),
			resume: bytes.len(),
			role: FrameRole::Root,
		};

		Ok(Self {
			bytes,
			layout,
			registry,
			options,
			version: options.version_override.unwrap_or_else(|| registry.base_version()),
			pos: 0,
			stack: vec![root],
			pending: VecDeque::new(),
			current_node: None,
			units: PendingUnits::default(),
			failed: None,
			done: false,
		})
	}

	/// Container layout detected from the magic.
	pub fn layout(&self) -> ContainerLayout {
		self.layout
	}

	/// Registry version currently used for lookups.
	pub fn version(&self) -> u32 {
		self.version
	}

	/// Absolute offset of the next chunk header.
	pub fn offset(&self) -> usize {
		self.pos
	}

	/// Number of open groups.
	pub fn depth(&self) -> usize {
		self.stack.len().saturating_sub(1)
	}

	fn step(&mut self) -> Result<()> {
		let Some(frame) = self.stack.last() else {
			self.done = true;
			return Ok(());
		};

		if self.pos >= frame.end {
			return self.close_frame();
		}

		let header_size = self.layout.header_size();
		let is_root = matches!(frame.role, FrameRole::Root);
		if self.pos + header_size > frame.end {
			if is_root || frame.end < frame.declared_end {
				return Err(MayaError::TruncatedInput { offset: self.bytes.len() });
			}
			let err = MayaError::NestedOverrun {
				at: self.pos,
				end: self.pos + header_size,
				parent_end: frame.declared_end,
			};
			let what = tag_label(frame.type_id);
			self.recover(what, self.pos, &err, UnsupportedReason::Overrun);
			return self.close_frame();
		}

		let parent_declared_end = frame.declared_end;
		let mut cursor = Cursor::at(&self.bytes[self.pos..frame.end], self.pos, self.layout.endianness);
		let chunk = Chunk::read(&mut cursor, self.layout).map_err(|err| {
			if err.is_fatal() {
				err
			} else {
				MayaError::TruncatedInput { offset: self.bytes.len() }
			}
		})?;

		if !is_root && chunk.payload_end > parent_declared_end {
			let err = MayaError::NestedOverrun {
				at: chunk.header_offset,
				end: chunk.payload_end,
				parent_end: parent_declared_end,
			};
			self.recover(tag_label(chunk.tag), chunk.header_offset, &err, UnsupportedReason::Overrun);
			return self.close_frame();
		}

		match self.layout.group_class(chunk.tag) {
			Some(class) => self.enter_group(chunk, class),
			None => self.leaf(chunk),
		}
	}

	fn enter_group(&mut self, chunk: Chunk, class: GroupClass) -> Result<()> {
		let label = tag_label(chunk.tag);
		if self.stack.len() > self.options.max_depth {
			warn!("group '{label}' at {} exceeds depth {}; skipping", chunk.header_offset, self.options.max_depth);
			self.push(SceneEvent::unsupported(label, chunk.header_offset, UnsupportedReason::DepthExceeded));
			return self.skip(&chunk);
		}

		if chunk.len() < 4 {
			warn!("group '{label}' at {} has no type id", chunk.header_offset);
			self.push(SceneEvent::unsupported(label, chunk.header_offset, UnsupportedReason::Malformed));
			return self.skip(&chunk);
		}

		let type_id = match self.bytes.get(chunk.payload_offset..chunk.payload_offset + 4) {
			Some(raw) => Cursor::at(raw, chunk.payload_offset, self.layout.endianness).read_u32()?,
			None => return Err(MayaError::TruncatedInput { offset: self.bytes.len() }),
		};

		let registry = self.registry;
		let role = match registry.lookup_form(self.version, type_id) {
			Some(desc) => match desc.category {
				TypeCategory::Group(role) => FrameRole::Group(role),
				_ => FrameRole::Node(desc.name.clone()),
			},
			None if class == GroupClass::Form => FrameRole::Node(tag_label(type_id).into()),
			None => {
				let what = tag_label(type_id);
				debug!("skipping unknown {label} '{what}' at {}", chunk.header_offset);
				self.push(SceneEvent::unsupported(what, chunk.header_offset, UnsupportedReason::UnknownTag));
				return self.skip(&chunk);
			}
		};

		trace!("enter {label} '{}' at {}", tag_label(type_id), chunk.header_offset);
		let end = chunk.payload_end.min(self.bytes.len());
		self.stack.push(Frame {
			type_id,
			end,
			declared_end: chunk.payload_end,
			resume: chunk.padded_end(self.layout),
			role,
		});
		self.pos = (chunk.payload_offset + self.layout.type_id_span()).min(end);
		Ok(())
	}

	fn close_frame(&mut self) -> Result<()> {
		let Some(frame) = self.stack.pop() else {
			self.done = true;
			return Ok(());
		};

		if frame.declared_end > self.bytes.len() {
			return Err(MayaError::TruncatedInput { offset: self.bytes.len() });
		}

		match frame.role {
			FrameRole::Root => {
				self.flush_units();
				self.done = true;
			}
			FrameRole::Group(GroupRole::Header) => self.flush_units(),
			FrameRole::Node(_) => self.current_node = None,
			FrameRole::Group(_) => {}
		}

		trace!("leave '{}' at {}", tag_label(frame.type_id), frame.end);
		self.pos = frame.resume;
		Ok(())
	}

	fn skip(&mut self, chunk: &Chunk) -> Result<()> {
		if chunk.payload_end > self.bytes.len() {
			return Err(MayaError::TruncatedInput { offset: self.bytes.len() });
		}
		self.pos = chunk.padded_end(self.layout);
		Ok(())
	}

	fn leaf(&mut self, chunk: Chunk) -> Result<()> {
		if chunk.payload_end > self.bytes.len() {
			return Err(MayaError::TruncatedInput { offset: self.bytes.len() });
		}

		let registry = self.registry;
		let Some(desc) = registry.lookup(self.version, chunk.tag) else {
			let what = tag_label(chunk.tag);
			debug!("skipping unknown chunk '{what}' at {} ({} bytes)", chunk.header_offset, chunk.len());
			self.push(SceneEvent::unsupported(what, chunk.header_offset, UnsupportedReason::UnknownTag));
			return self.skip(&chunk);
		};

		let bytes = self.bytes;
		let mut cursor = Cursor::at(&bytes[chunk.payload_offset..chunk.payload_end], chunk.payload_offset, self.layout.endianness);
		self.pos = chunk.padded_end(self.layout);

		let category = match desc.category {
			TypeCategory::Leaf(category) => category,
			_ => LeafCategory::Skip,
		};
		let decoded = match decode_fields(&mut cursor, &desc.fields) {
			Ok(fields) => fields,
			Err(err) if !err.is_fatal() => {
				self.recover(tag_label(chunk.tag), chunk.header_offset, &err, UnsupportedReason::Malformed);
				return Ok(());
			}
			Err(err) => return Err(err),
		};

		if let Some(event) = self.leaf_event(category, decoded, &chunk)? {
			self.push(event);
		}
		Ok(())
	}

	fn leaf_event(&mut self, category: LeafCategory, mut fields: DecodedFields, chunk: &Chunk) -> Result<Option<SceneEvent>> {
		let event = match category {
			LeafCategory::Requires => {
				let version = text(&fields, "version");
				self.apply_version(&version)?;
				SceneEvent::RequiresMaya { version }
			}
			LeafCategory::Plugin => SceneEvent::RequiresPlugin {
				plugin: text(&fields, "name"),
				version: text(&fields, "version"),
			},
			LeafCategory::FileInfo => SceneEvent::FileInfo {
				key: text(&fields, "key"),
				value: text(&fields, "value"),
			},
			LeafCategory::UnitAngle | LeafCategory::UnitLinear | LeafCategory::UnitTime => {
				let value = Some(text(&fields, "value"));
				match category {
					LeafCategory::UnitAngle => self.units.angle = value,
					LeafCategory::UnitLinear => self.units.linear = value,
					_ => self.units.time = value,
				}
				if self.units.is_complete() {
					self.flush_units();
				}
				return Ok(None);
			}
			LeafCategory::Create => {
				let node_name = text(&fields, "name");
				self.current_node = Some(node_name.clone());
				SceneEvent::NodeCreated {
					type_name: self.node_type(),
					node_name,
					parent: fields.text("parent").filter(|name| !name.is_empty()).map(Into::into),
				}
			}
			LeafCategory::Select => {
				let named = fields.text("name").filter(|name| !name.is_empty()).map(Box::<str>::from);
				let Some(node_name) = named.or_else(|| self.current_node.clone()) else {
					return Ok(Some(self.malformed(chunk, "select without a node")));
				};
				self.current_node = Some(node_name.clone());
				SceneEvent::NodeSelected { node_name }
			}
			LeafCategory::Attribute => {
				let Some(node_name) = self.current_node.clone() else {
					return Ok(Some(self.malformed(chunk, "attribute before any node")));
				};
				let attr = text(&fields, "attr");
				SceneEvent::AttributeSet {
					node_name,
					attr_path: attr.strip_prefix('.').unwrap_or(&attr).into(),
					value: fields.take("value").unwrap_or(Value::Vector(Vec::new())),
				}
			}
			LeafCategory::Connect => SceneEvent::connection(&text(&fields, "src"), &text(&fields, "dst")),
			LeafCategory::Reference => SceneEvent::FileReference { path: text(&fields, "path") },
			LeafCategory::Skip => return Ok(None),
		};
		Ok(Some(event))
	}

	fn apply_version(&mut self, text: &str) -> Result<()> {
		if self.options.version_override.is_some() {
			return Ok(());
		}
		let digits: String = text.trim_start().chars().take_while(char::is_ascii_digit).collect();
		let Ok(version) = digits.parse::<u32>() else {
			debug!("version text {text:?} has no leading number; keeping {}", self.version);
			return Ok(());
		};
		if version < self.registry.base_version() {
			return Err(MayaError::UnsupportedFormatVersion { version: text.to_owned() });
		}
		self.version = version;
		Ok(())
	}

	fn node_type(&self) -> Box<str> {
		self.stack
			.iter()
			.rev()
			.find_map(|frame| match &frame.role {
				FrameRole::Node(name) => Some(name.clone()),
				_ => None,
			})
			.unwrap_or_else(|| tag_label(self.stack.last().map_or(0, |frame| frame.type_id)).into())
	}

	fn malformed(&self, chunk: &Chunk, reason: &str) -> SceneEvent {
		let what = tag_label(chunk.tag);
		warn!("chunk '{what}' at {}: {reason}", chunk.header_offset);
		SceneEvent::unsupported(what, chunk.header_offset, UnsupportedReason::Malformed)
	}

	fn recover(&mut self, what: String, offset: usize, err: &MayaError, reason: UnsupportedReason) {
		warn!("{err}; skipping '{what}'");
		self.push(SceneEvent::unsupported(what, offset, reason));
	}

	fn flush_units(&mut self) {
		if self.units.is_empty() {
			return;
		}
		let units = std::mem::take(&mut self.units);
		self.push(SceneEvent::CurrentUnit {
			angle: units.angle,
			linear: units.linear,
			time: units.time,
		});
	}

	fn push(&mut self, event: SceneEvent) {
		self.pending.push_back(event);
	}
}

impl Iterator for ChunkWalker<'_> {
	type Item = Result<SceneEvent>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(event) = self.pending.pop_front() {
				return Some(Ok(event));
			}
			if let Some(err) = self.failed.take() {
				return Some(Err(err));
			}
			if self.done {
				return None;
			}
			if let Err(err) = self.step() {
				self.failed = Some(err);
				self.done = true;
			}
		}
	}
}

fn text(fields: &DecodedFields, name: &str) -> Box<str> {
	fields.text(name).unwrap_or_default().into()
}
