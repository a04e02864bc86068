use std::any::Any;
use std::sync::{Arc, Weak};

use smallvec::SmallVec;

use crate::{Node, NodeId, NodeKind, Result, SurfaceError};

/// Ordered child list of one container element.
///
/// Positions are plain indices into `children`; nodes never move between
/// containers.
#[derive(Default)]
pub struct Container {
	classes: SmallVec<[String; 2]>,
	children: Vec<Node>,
	next_node: u64,
	attachment: Option<Weak<dyn Any + Send + Sync>>,
}

impl std::fmt::Debug for Container {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Container")
			.field("classes", &self.classes)
			.field("children", &self.children.len())
			.field("attached", &self.attachment.as_ref().is_some_and(|w| w.strong_count() > 0))
			.finish()
	}
}

impl Container {
	pub fn len(&self) -> usize {
		self.children.len()
	}

	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}

	pub fn children(&self) -> impl Iterator<Item = &Node> {
		self.children.iter()
	}

	pub fn index_of(&self, id: NodeId) -> Result<usize> {
		self.children.iter().position(|n| n.id() == id).ok_or(SurfaceError::MissingNode(id))
	}

	pub fn node(&self, id: NodeId) -> Result<&Node> {
		let idx = self.index_of(id)?;
		Ok(&self.children[idx])
	}

	pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
		let idx = self.index_of(id)?;
		Ok(&mut self.children[idx])
	}

	/// Node at `index`, if in bounds.
	pub fn get(&self, index: usize) -> Option<&Node> {
		self.children.get(index)
	}

	/// Appends a new node at the end.
	pub fn append(&mut self, kind: NodeKind) -> NodeId {
		let node = self.alloc(kind);
		let id = node.id();
		self.children.push(node);
		id
	}

	/// Inserts a new node before `reference`, or at the end when `None`.
	pub fn insert_before(&mut self, kind: NodeKind, reference: Option<NodeId>) -> Result<NodeId> {
		let at = self.slot(reference)?;
		let node = self.alloc(kind);
		let id = node.id();
		self.children.insert(at, node);
		Ok(id)
	}

	/// Moves an existing node before `reference`, or to the end when `None`.
	///
	/// Moving a node before itself leaves it in place.
	pub fn move_before(&mut self, id: NodeId, reference: Option<NodeId>) -> Result<()> {
		if reference == Some(id) {
			return self.index_of(id).map(|_| ());
		}
		let from = self.index_of(id)?;
		// Validate the reference before detaching anything.
		self.slot(reference)?;
		let node = self.children.remove(from);
		let at = self.slot(reference)?;
		self.children.insert(at, node);
		Ok(())
	}

	/// Moves an existing node to `index` (clamped), counted after removal.
	pub fn move_to(&mut self, id: NodeId, index: usize) -> Result<()> {
		let from = self.index_of(id)?;
		let node = self.children.remove(from);
		let at = index.min(self.children.len());
		self.children.insert(at, node);
		Ok(())
	}

	pub fn remove(&mut self, id: NodeId) -> Result<Node> {
		let idx = self.index_of(id)?;
		Ok(self.children.remove(idx))
	}

	/// Removes every node matching `pred`; returns how many were removed.
	pub fn remove_where(&mut self, mut pred: impl FnMut(&Node) -> bool) -> usize {
		let before = self.children.len();
		self.children.retain(|n| !pred(n));
		before - self.children.len()
	}

	pub fn previous_sibling(&self, id: NodeId) -> Result<Option<NodeId>> {
		let idx = self.index_of(id)?;
		Ok(idx.checked_sub(1).map(|i| self.children[i].id()))
	}

	pub fn next_sibling(&self, id: NodeId) -> Result<Option<NodeId>> {
		let idx = self.index_of(id)?;
		Ok(self.children.get(idx + 1).map(Node::id))
	}

	pub fn has_class(&self, class: &str) -> bool {
		self.classes.iter().any(|c| c == class)
	}

	pub fn add_class(&mut self, class: &str) -> bool {
		if self.has_class(class) {
			return false;
		}
		self.classes.push(class.to_string());
		true
	}

	pub fn remove_class(&mut self, class: &str) -> bool {
		let before = self.classes.len();
		self.classes.retain(|c| c != class);
		self.classes.len() != before
	}

	/// Text content of the container; markers contribute nothing.
	pub fn text(&self) -> String {
		self.children.iter().filter_map(|n| n.kind().text()).collect()
	}

	/// Inner markup of the container.
	pub fn markup(&self) -> String {
		self.children.iter().map(Node::markup).collect()
	}

	/// Returns the live object bound to this container, if it is a `T`.
	pub fn attachment<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		self.attachment.as_ref()?.upgrade()?.downcast::<T>().ok()
	}

	/// Records a weak back-reference to the object bound to this container.
	pub fn set_attachment(&mut self, weak: Weak<dyn Any + Send + Sync>) {
		self.attachment = Some(weak);
	}

	pub fn clear_attachment(&mut self) {
		self.attachment = None;
	}

	fn alloc(&mut self, kind: NodeKind) -> Node {
		self.next_node += 1;
		Node::new(NodeId(self.next_node), kind)
	}

	fn slot(&self, reference: Option<NodeId>) -> Result<usize> {
		match reference {
			Some(id) => self.index_of(id),
			None => Ok(self.children.len()),
		}
	}
}
