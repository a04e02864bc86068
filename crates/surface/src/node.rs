use std::fmt::Write as _;

use indexmap::IndexMap;
use smallvec::SmallVec;

/// Identity of a node within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Visual unit stored in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	/// A single-character text span.
	Char(char),
	/// A line break.
	LineBreak,
	/// An empty span used as a positional marker (e.g. a caret).
	Marker,
}

impl NodeKind {
	/// Maps a typed character to the node that renders it.
	pub fn from_char(ch: char) -> Self {
		if ch == '\n' { Self::LineBreak } else { Self::Char(ch) }
	}

	/// Text this node contributes to the container's content.
	pub fn text(self) -> Option<char> {
		match self {
			Self::Char(ch) => Some(ch),
			Self::LineBreak => Some('\n'),
			Self::Marker => None,
		}
	}
}

/// One child of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
	id: NodeId,
	kind: NodeKind,
	classes: SmallVec<[String; 2]>,
	style: IndexMap<String, String>,
}

impl Node {
	pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
		Self {
			id,
			kind,
			classes: SmallVec::new(),
			style: IndexMap::new(),
		}
	}

	pub fn id(&self) -> NodeId {
		self.id
	}

	pub fn kind(&self) -> NodeKind {
		self.kind
	}

	pub fn classes(&self) -> impl Iterator<Item = &str> {
		self.classes.iter().map(String::as_str)
	}

	pub fn has_class(&self, class: &str) -> bool {
		self.classes.iter().any(|c| c == class)
	}

	/// Adds a class; returns false if it was already present.
	pub fn add_class(&mut self, class: &str) -> bool {
		if self.has_class(class) {
			return false;
		}
		self.classes.push(class.to_string());
		true
	}

	/// Removes a class; returns false if it was not present.
	pub fn remove_class(&mut self, class: &str) -> bool {
		let before = self.classes.len();
		self.classes.retain(|c| c != class);
		self.classes.len() != before
	}

	pub fn style_property(&self, name: &str) -> Option<&str> {
		self.style.get(name).map(String::as_str)
	}

	pub fn set_style_property(&mut self, name: &str, value: &str) {
		self.style.insert(name.to_string(), value.to_string());
	}

	/// Renders the node as HTML-like markup.
	pub fn markup(&self) -> String {
		let tag = match self.kind {
			NodeKind::LineBreak => "br",
			NodeKind::Char(_) | NodeKind::Marker => "span",
		};
		let mut out = format!("<{tag}");
		if !self.classes.is_empty() {
			let _ = write!(out, " class=\"{}\"", self.classes.join(" "));
		}
		if !self.style.is_empty() {
			let decls: Vec<String> = self.style.iter().map(|(k, v)| format!("{k}: {v}")).collect();
			let _ = write!(out, " style=\"{}\"", decls.join("; "));
		}
		out.push('>');
		match self.kind {
			NodeKind::LineBreak => {}
			NodeKind::Char(ch) => {
				push_escaped(&mut out, ch);
				out.push_str("</span>");
			}
			NodeKind::Marker => out.push_str("</span>"),
		}
		out
	}
}

fn push_escaped(out: &mut String, ch: char) {
	match ch {
		'<' => out.push_str("&lt;"),
		'>' => out.push_str("&gt;"),
		'&' => out.push_str("&amp;"),
		_ => out.push(ch),
	}
}
