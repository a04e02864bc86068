use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use indexmap::IndexSet;
use parking_lot::Mutex;
use typefx_surface::{Container, ContainerId, NodeId, NodeKind, Surface};
use typefx_worker::{ActionQueue, TaskContext};

use crate::count::{Count, Shift};
use crate::error::{Result, TypeFxError};
use crate::options::TypeFxOptions;
use crate::pacer::Pacer;
use crate::steps::Pace;
use crate::style::{self, CARET_BLINK_CLASS, CARET_CLASS, CARET_COLOR_VAR, CARET_WIDTH_VAR, CONTAINER_CLASS, SELECTED_CLASS};

/// Typewriter animator bound to one container.
///
/// Cheap to clone; clones share the same queue and caret. Every verb returns
/// `&Self` so calls chain, and only schedules work: nothing touches the
/// container until the step's turn comes up on the queue.
#[derive(Clone)]
pub struct TypeFx {
	inner: Arc<Inner>,
}

/// State shared by all handles of one animator.
pub(crate) struct Inner {
	pub(crate) surface: Surface,
	pub(crate) container: ContainerId,
	pub(crate) caret: NodeId,
	pub(crate) state: Mutex<State>,
	queue: ActionQueue<TypeFxError>,
}

pub(crate) struct State {
	pub(crate) options: TypeFxOptions,
	/// Nodes marked by select and not yet consumed by delete.
	pub(crate) selection: IndexSet<NodeId>,
	pub(crate) pacer: Pacer,
}

impl fmt::Debug for TypeFx {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeFx")
			.field("container", &self.inner.container)
			.field("caret", &self.inner.caret)
			.field("queue", &self.inner.queue)
			.finish()
	}
}

impl TypeFx {
	/// Binds an animator to `container`, or returns the one already bound.
	///
	/// A fresh binding marks the container, appends the caret (or adopts a
	/// caret left behind by an animator that was dropped), and installs the
	/// shared stylesheet on first use. Options are ignored when an animator
	/// is already bound.
	pub fn bind(surface: &Surface, container: ContainerId, options: TypeFxOptions) -> Result<Self> {
		let (inner, fresh) = surface.update(container, |c| {
			if let Some(existing) = c.attachment::<Inner>() {
				return (existing, false);
			}
			let inner = Arc::new(Inner::attach(surface.clone(), container, c, options));
			let weak: Weak<dyn Any + Send + Sync> = Arc::downgrade(&inner) as Weak<dyn Any + Send + Sync>;
			c.set_attachment(weak);
			(inner, true)
		})?;
		if fresh {
			style::inject(surface);
			tracing::debug!(container = ?container, caret = inner.caret.0, "typefx.bind");
		} else {
			tracing::trace!(container = ?container, "typefx.bind_existing");
		}
		Ok(Self { inner })
	}

	/// Types `text` one character at a time before the caret.
	///
	/// `'\n'` becomes a line break.
	pub fn type_text(&self, text: impl Into<String>) -> &Self {
		let text = text.into();
		self.schedule("type", move |fx, ctx| async move { fx.type_text(&ctx, &text, Pace::Animated).await })
	}

	/// Inserts `text` before the caret in one step.
	pub fn quick_type(&self, text: impl Into<String>) -> &Self {
		let text = text.into();
		self.schedule("quick_type", move |fx, ctx| async move { fx.type_text(&ctx, &text, Pace::Quick).await })
	}

	/// Pauses the chain for `duration`. Cancellation cuts the pause short.
	pub fn wait(&self, duration: Duration) -> &Self {
		self.schedule("wait", move |_, ctx| async move {
			ctx.sleep(duration).await;
			Ok(())
		})
	}

	/// Removes the selection, if any, then up to `count` nodes behind the caret.
	pub fn delete(&self, count: impl Into<Count>) -> &Self {
		let count = count.into();
		self.schedule("delete", move |fx, ctx| async move { fx.delete(&ctx, count, Pace::Animated).await })
	}

	/// [`delete`](Self::delete) without pauses.
	pub fn quick_delete(&self, count: impl Into<Count>) -> &Self {
		let count = count.into();
		self.schedule("quick_delete", move |fx, ctx| async move { fx.delete(&ctx, count, Pace::Quick).await })
	}

	/// Walks the caret over existing content; negative distances go backward.
	pub fn move_caret(&self, shift: impl Into<Shift>) -> &Self {
		let shift = shift.into();
		self.schedule("move", move |fx, ctx| async move { fx.walk(&ctx, shift, false, Pace::Animated).await })
	}

	/// Relocates the caret in a single jump.
	pub fn quick_move(&self, shift: impl Into<Shift>) -> &Self {
		let shift = shift.into();
		self.schedule("quick_move", move |fx, ctx| async move { fx.walk(&ctx, shift, false, Pace::Quick).await })
	}

	/// Walks the caret like [`move_caret`](Self::move_caret), marking every
	/// node it crosses as selected.
	pub fn select(&self, shift: impl Into<Shift>) -> &Self {
		let shift = shift.into();
		self.schedule("select", move |fx, ctx| async move { fx.walk(&ctx, shift, true, Pace::Animated).await })
	}

	/// Selects in a single jump.
	pub fn quick_select(&self, shift: impl Into<Shift>) -> &Self {
		let shift = shift.into();
		self.schedule("quick_select", move |fx, ctx| async move { fx.walk(&ctx, shift, true, Pace::Quick).await })
	}

	/// Deletes everything behind the caret.
	pub fn clear(&self) -> &Self {
		self.delete(Count::Unbounded)
	}

	/// Deletes everything behind the caret without pauses.
	pub fn quick_clear(&self) -> &Self {
		self.quick_delete(Count::Unbounded)
	}

	/// Sets the base step delay for steps that run after this one.
	pub fn speed(&self, speed: Duration) -> &Self {
		self.schedule("speed", move |fx, _| async move {
			fx.state.lock().options.speed = speed;
			Ok(())
		})
	}

	/// Sets the jitter span for steps that run after this one.
	pub fn speed_range(&self, range: Duration) -> &Self {
		self.schedule("speed_range", move |fx, _| async move {
			fx.state.lock().options.speed_range = range;
			Ok(())
		})
	}

	pub fn hide_caret(&self) -> &Self {
		self.schedule("hide_caret", |fx, _| async move { fx.set_caret_hidden(true) })
	}

	pub fn show_caret(&self) -> &Self {
		self.schedule("show_caret", |fx, _| async move { fx.set_caret_hidden(false) })
	}

	/// Stops the running step at its next boundary and drops everything
	/// queued so far. Verbs chained after this call run normally.
	pub fn cancel(&self) -> &Self {
		self.inner.queue.cancel();
		self
	}

	/// Removes the caret and the container marker once the chain drains,
	/// leaving typed content in place. The container can be bound again.
	pub fn unbind(&self) -> &Self {
		self.schedule("unbind", |fx, _| async move { fx.release() })
	}

	/// Resolves once everything scheduled before this call has finished.
	///
	/// Yields the first step failure, if one happened at or before that point.
	pub fn settled(&self) -> impl Future<Output = Result<()>> + Send + 'static {
		self.inner.queue.settled()
	}

	/// Runs `on_settled` once everything scheduled so far has finished
	/// without error.
	pub fn then(&self, on_settled: impl FnOnce() + Send + 'static) -> &Self {
		let settled = self.settled();
		typefx_worker::spawn("typefx.then", async move {
			if settled.await.is_ok() {
				on_settled();
			}
		});
		self
	}

	/// Runs `on_error` if a step scheduled so far fails.
	pub fn catch(&self, on_error: impl FnOnce(TypeFxError) + Send + 'static) -> &Self {
		let settled = self.settled();
		typefx_worker::spawn("typefx.catch", async move {
			if let Err(err) = settled.await {
				on_error(err);
			}
		});
		self
	}

	/// Runs `on_settled` once everything scheduled so far has finished,
	/// whether or not a step failed.
	pub fn finally(&self, on_settled: impl FnOnce() + Send + 'static) -> &Self {
		let settled = self.settled();
		typefx_worker::spawn("typefx.finally", async move {
			let _ = settled.await;
			on_settled();
		});
		self
	}

	/// Current text content, markers excluded.
	pub fn text(&self) -> Result<String> {
		Ok(self.inner.surface.text(self.inner.container)?)
	}

	/// Current inner markup of the container.
	pub fn markup(&self) -> Result<String> {
		Ok(self.inner.surface.markup(self.inner.container)?)
	}

	/// Index of the caret among the container's children.
	pub fn caret_index(&self) -> Result<usize> {
		let caret = self.inner.caret;
		Ok(self.inner.surface.read(self.inner.container, |c| c.index_of(caret))??)
	}

	/// Number of nodes currently selected.
	pub fn selection_len(&self) -> usize {
		self.inner.state.lock().selection.len()
	}

	/// Options as of the last step that ran.
	pub fn options(&self) -> TypeFxOptions {
		self.inner.state.lock().options.clone()
	}

	pub fn container(&self) -> ContainerId {
		self.inner.container
	}

	pub fn surface(&self) -> &Surface {
		&self.inner.surface
	}

	/// Number of queued entries not yet finished.
	pub fn pending(&self) -> u64 {
		self.inner.queue.pending()
	}

	/// Whether both handles drive the same animator.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	fn schedule<F, Fut>(&self, label: &'static str, step: F) -> &Self
	where
		F: FnOnce(Arc<Inner>, TaskContext) -> Fut + Send + 'static,
		Fut: Future<Output = Result<()>> + Send + 'static,
	{
		let inner = Arc::clone(&self.inner);
		self.inner.queue.enqueue(label, move |ctx| step(inner, ctx));
		self
	}
}

impl Inner {
	/// Prepares a fresh binding inside the container's update.
	fn attach(surface: Surface, container: ContainerId, c: &mut Container, options: TypeFxOptions) -> Self {
		c.add_class(CONTAINER_CLASS);
		let adopted = c.children().find(|n| n.kind() == NodeKind::Marker && n.has_class(CARET_CLASS)).map(|n| n.id());
		let caret = adopted.unwrap_or_else(|| c.append(NodeKind::Marker));
		if let Ok(node) = c.node_mut(caret) {
			node.add_class(CARET_CLASS);
			node.add_class(CARET_BLINK_CLASS);
			node.set_style_property(CARET_WIDTH_VAR, &options.caret_width);
			node.set_style_property(CARET_COLOR_VAR, &options.caret_color);
		}
		let selection = c.children().filter(|n| n.has_class(SELECTED_CLASS)).map(|n| n.id()).collect();
		Self {
			surface,
			container,
			caret,
			state: Mutex::new(State {
				pacer: Pacer::new(options.seed),
				options,
				selection,
			}),
			queue: ActionQueue::new("typefx"),
		}
	}
}
