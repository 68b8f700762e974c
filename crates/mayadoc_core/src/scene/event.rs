use crate::scene::Value;

/// Why a chunk or statement was reported as [`SceneEvent::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnsupportedReason {
	/// Chunk tag or group type id missing from the type registry.
	UnknownTag,
	/// Command name not in the recognized command set.
	UnknownCommand,
	/// Recognized unit whose fields or arguments could not be decoded.
	Malformed,
	/// Chunk extended past its parent group.
	Overrun,
	/// Statement cut off by end of input.
	Truncated,
	/// Group nested deeper than the configured ceiling.
	DepthExceeded,
}

impl UnsupportedReason {
	/// Stable snake_case label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::UnknownTag => "unknown_tag",
			Self::UnknownCommand => "unknown_command",
			Self::Malformed => "malformed",
			Self::Overrun => "overrun",
			Self::Truncated => "truncated",
			Self::DepthExceeded => "depth_exceeded",
		}
	}

	/// Return `true` when the unit was recognized but damaged, rather than merely unknown.
	pub fn is_recovery(self) -> bool {
		!matches!(self, Self::UnknownTag | Self::UnknownCommand)
	}
}

/// One scene-construction action, in file order.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
	/// A node was created.
	NodeCreated {
		/// Node type name, for example `transform`.
		type_name: Box<str>,
		/// Node name as written in the file.
		node_name: Box<str>,
		/// Optional parent node name.
		parent: Option<Box<str>>,
	},
	/// An attribute value was assigned.
	AttributeSet {
		/// Owning node name.
		node_name: Box<str>,
		/// Attribute path relative to the node, without a leading `.`.
		attr_path: Box<str>,
		/// Decoded value.
		value: Value,
	},
	/// Two plugs were connected.
	AttributeConnected {
		/// Source node name.
		src_node: Box<str>,
		/// Source attribute path.
		src_attr: Box<str>,
		/// Destination node name.
		dst_node: Box<str>,
		/// Destination attribute path.
		dst_attr: Box<str>,
	},
	/// Another scene file is referenced.
	FileReference {
		/// Referenced file path.
		path: Box<str>,
	},
	/// The scene requires a Maya version.
	RequiresMaya {
		/// Version text as written.
		version: Box<str>,
	},
	/// The scene requires a plug-in.
	RequiresPlugin {
		/// Plug-in name.
		plugin: Box<str>,
		/// Plug-in version text.
		version: Box<str>,
	},
	/// A `fileInfo` key/value pair.
	FileInfo {
		/// Key.
		key: Box<str>,
		/// Value.
		value: Box<str>,
	},
	/// Working units for the scene.
	CurrentUnit {
		/// Angular unit.
		angle: Option<Box<str>>,
		/// Linear unit.
		linear: Option<Box<str>>,
		/// Time unit.
		time: Option<Box<str>>,
	},
	/// An existing node became the target of subsequent attribute assignments.
	NodeSelected {
		/// Node name.
		node_name: Box<str>,
	},
	/// Nodes were re-parented.
	NodeParented {
		/// Child node names.
		children: Vec<Box<str>>,
		/// New parent, or `None` for the world.
		parent: Option<Box<str>>,
	},
	/// A namespace was created.
	NamespaceAdded {
		/// Namespace name.
		name: Box<str>,
		/// Parent namespace, when given.
		parent: Option<Box<str>>,
	},
	/// The current namespace changed.
	NamespaceSet {
		/// Namespace name.
		name: Box<str>,
	},
	/// A chunk or statement was skipped.
	Unsupported {
		/// Rendered chunk tag or command name.
		what: Box<str>,
		/// Byte offset of the chunk header or statement start.
		offset: usize,
		/// Why it was skipped.
		reason: UnsupportedReason,
	},
}

impl SceneEvent {
	/// Stable snake_case label for the variant.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::NodeCreated { .. } => "node_created",
			Self::AttributeSet { .. } => "attribute_set",
			Self::AttributeConnected { .. } => "attribute_connected",
			Self::FileReference { .. } => "file_reference",
			Self::RequiresMaya { .. } => "requires_maya",
			Self::RequiresPlugin { .. } => "requires_plugin",
			Self::FileInfo { .. } => "file_info",
			Self::CurrentUnit { .. } => "current_unit",
			Self::NodeSelected { .. } => "node_selected",
			Self::NodeParented { .. } => "node_parented",
			Self::NamespaceAdded { .. } => "namespace_added",
			Self::NamespaceSet { .. } => "namespace_set",
			Self::Unsupported { .. } => "unsupported",
		}
	}

	pub(crate) fn unsupported(what: impl Into<Box<str>>, offset: usize, reason: UnsupportedReason) -> Self {
		Self::Unsupported {
			what: what.into(),
			offset,
			reason,
		}
	}

	pub(crate) fn connection(src: &str, dst: &str) -> Self {
		let (src_node, src_attr) = split_plug(src);
		let (dst_node, dst_attr) = split_plug(dst);
		Self::AttributeConnected {
			src_node: src_node.into(),
			src_attr: src_attr.into(),
			dst_node: dst_node.into(),
			dst_attr: dst_attr.into(),
		}
	}
}

/// Split `node.attr.path` at the first `.` into `(node, attr)`.
///
/// A plug without a `.` names only a node and yields an empty attribute.
pub fn split_plug(plug: &str) -> (&str, &str) {
	plug.split_once('.').unwrap_or((plug, ""))
}

/// Consumer of decoded events.
pub trait EventSink {
	/// Receive the next event in file order.
	fn event(&mut self, event: SceneEvent);
}

impl EventSink for Vec<SceneEvent> {
	fn event(&mut self, event: SceneEvent) {
		self.push(event);
	}
}

/// Running counts over an event stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
	/// Events produced.
	pub events: usize,
	/// `Unsupported` events among them.
	pub unsupported: usize,
	/// `Unsupported` events caused by damaged units rather than unknown ones.
	pub recovered: usize,
}

impl DecodeStats {
	pub(crate) fn record(&mut self, event: &SceneEvent) {
		self.events += 1;
		if let SceneEvent::Unsupported { reason, .. } = event {
			self.unsupported += 1;
			if reason.is_recovery() {
				self.recovered += 1;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{DecodeStats, SceneEvent, UnsupportedReason, split_plug};

	#[test]
	fn splits_plug_at_first_dot() {
		assert_eq!(split_plug("pCube1.t"), ("pCube1", "t"));
		assert_eq!(split_plug("|grp|pCubeShape1.iog[0].og[2]"), ("|grp|pCubeShape1", "iog[0].og[2]"));
		assert_eq!(split_plug("ns:node"), ("ns:node", ""));
	}

	#[test]
	fn stats_separate_unknown_from_recovered() {
		let mut stats = DecodeStats::default();
		stats.record(&SceneEvent::FileReference { path: "a.ma".into() });
		stats.record(&SceneEvent::unsupported("ZZZZ", 8, UnsupportedReason::UnknownTag));
		stats.record(&SceneEvent::unsupported("CREA", 16, UnsupportedReason::Malformed));

		assert_eq!(
			stats,
			DecodeStats {
				events: 3,
				unsupported: 2,
				recovered: 1,
			}
		);
	}
}
