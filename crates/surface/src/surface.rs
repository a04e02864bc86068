use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use slab::Slab;

use crate::{Container, Result, SurfaceError};

/// Identity of a container on its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(usize);

struct Slot {
	connected: bool,
	container: Container,
}

#[derive(Default)]
struct SurfaceState {
	containers: Slab<Slot>,
	/// Page-wide stylesheets keyed by element id, in installation order.
	stylesheets: IndexMap<String, String>,
}

/// Shared handle to one page.
///
/// Cloning yields another handle to the same page. All access goes through
/// short critical sections; closures passed to [`update`](Self::update) must
/// not call back into the surface.
#[derive(Clone, Default)]
pub struct Surface {
	state: Arc<Mutex<SurfaceState>>,
}

impl std::fmt::Debug for Surface {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.lock();
		f.debug_struct("Surface")
			.field("containers", &state.containers.len())
			.field("stylesheets", &state.stylesheets.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl Surface {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns true if both handles refer to the same page.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.state, &other.state)
	}

	/// Creates an empty container attached to the page.
	pub fn create_container(&self) -> ContainerId {
		let mut state = self.state.lock();
		ContainerId(state.containers.insert(Slot {
			connected: true,
			container: Container::default(),
		}))
	}

	/// Removes a container from the page.
	///
	/// Its contents stay readable through [`read`](Self::read), but further
	/// [`update`](Self::update) calls fail with [`SurfaceError::Detached`].
	pub fn detach(&self, id: ContainerId) -> Result<()> {
		let mut state = self.state.lock();
		let slot = state.containers.get_mut(id.0).ok_or(SurfaceError::UnknownContainer(id))?;
		slot.connected = false;
		Ok(())
	}

	pub fn is_connected(&self, id: ContainerId) -> bool {
		self.state.lock().containers.get(id.0).is_some_and(|s| s.connected)
	}

	/// Runs `f` with mutable access to a connected container.
	pub fn update<R>(&self, id: ContainerId, f: impl FnOnce(&mut Container) -> R) -> Result<R> {
		let mut state = self.state.lock();
		let slot = state.containers.get_mut(id.0).ok_or(SurfaceError::UnknownContainer(id))?;
		if !slot.connected {
			return Err(SurfaceError::Detached(id));
		}
		Ok(f(&mut slot.container))
	}

	/// Runs `f` with shared access to a container, connected or not.
	pub fn read<R>(&self, id: ContainerId, f: impl FnOnce(&Container) -> R) -> Result<R> {
		let state = self.state.lock();
		let slot = state.containers.get(id.0).ok_or(SurfaceError::UnknownContainer(id))?;
		Ok(f(&slot.container))
	}

	/// Text content of a container.
	pub fn text(&self, id: ContainerId) -> Result<String> {
		self.read(id, Container::text)
	}

	/// Inner markup of a container.
	pub fn markup(&self, id: ContainerId) -> Result<String> {
		self.read(id, Container::markup)
	}

	/// Installs a stylesheet under `id` unless one with that id exists.
	///
	/// Returns true when the stylesheet was newly installed.
	pub fn install_stylesheet(&self, id: &str, css: &str) -> bool {
		let mut state = self.state.lock();
		if state.stylesheets.contains_key(id) {
			return false;
		}
		state.stylesheets.insert(id.to_string(), css.to_string());
		true
	}

	pub fn stylesheet(&self, id: &str) -> Option<String> {
		self.state.lock().stylesheets.get(id).cloned()
	}

	pub fn stylesheet_count(&self) -> usize {
		self.state.lock().stylesheets.len()
	}
}
