//! Shared setup for typefx integration tests.

use std::time::Duration;

use typefx::{ContainerId, Surface, TypeFx, TypeFxOptions};
use typefx_surface::NodeKind;

pub fn ms(n: u64) -> Duration {
	Duration::from_millis(n)
}

/// Fixed 10ms steps with no jitter.
pub fn steady() -> TypeFxOptions {
	TypeFxOptions::default().with_speed(ms(10)).with_speed_range(Duration::ZERO).with_seed(7)
}

/// Fresh surface with one connected container.
pub fn page() -> (Surface, ContainerId) {
	let _ = tracing_subscriber::fmt::try_init();
	let surface = Surface::new();
	let container = surface.create_container();
	(surface, container)
}

/// Animator on a fresh page with [`steady`] timing.
pub fn bound() -> (Surface, ContainerId, TypeFx) {
	let (surface, container) = page();
	let fx = TypeFx::bind(&surface, container, steady()).unwrap();
	(surface, container, fx)
}

/// Number of caret markers in the container.
pub fn carets(surface: &Surface, container: ContainerId) -> usize {
	surface
		.read(container, |c| {
			c.children()
				.filter(|n| n.kind() == NodeKind::Marker && n.has_class(typefx::style::CARET_CLASS))
				.count()
		})
		.unwrap()
}

/// Whether the caret node currently carries `class`.
pub fn caret_has(fx: &TypeFx, class: &str) -> bool {
	let at = fx.caret_index().unwrap();
	fx.surface()
		.read(fx.container(), |c| c.get(at).is_some_and(|n| n.has_class(class)))
		.unwrap()
}
