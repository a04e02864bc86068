//! Caret-relative mutations run by queued steps.
//!
//! Each step edits the container in short critical sections and sleeps
//! between them; no lock is held across a suspension point. Running off
//! either end of the child list ends a step early without error.

use std::future::Future;
use std::ops::ControlFlow;

use typefx_surface::{Container, Node, NodeId, NodeKind};
use typefx_worker::{Sleep, TaskContext};

use crate::count::{Count, Direction, Shift};
use crate::error::Result;
use crate::fx::Inner;
use crate::style::{CARET_BLINK_CLASS, CARET_HIDDEN_CLASS, CONTAINER_CLASS, SELECTED_CLASS};

/// Whether a step pauses between its iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pace {
	Animated,
	Quick,
}

impl Inner {
	pub(crate) async fn type_text(&self, ctx: &TaskContext, text: &str, pace: Pace) -> Result<()> {
		let caret = self.caret;
		if pace == Pace::Quick {
			return self.edit(|c| {
				for ch in text.chars() {
					c.insert_before(NodeKind::from_char(ch), Some(caret))?;
				}
				Ok(())
			});
		}
		self.animated(async {
			for ch in text.chars() {
				if ctx.is_cancelled() {
					break;
				}
				self.edit(|c| c.insert_before(NodeKind::from_char(ch), Some(caret)))?;
				if self.pause(ctx).await.is_break() {
					break;
				}
			}
			Ok(())
		})
		.await
	}

	pub(crate) async fn delete(&self, ctx: &TaskContext, count: Count, pace: Pace) -> Result<()> {
		let caret = self.caret;
		if pace == Pace::Quick {
			let selected = std::mem::take(&mut self.state.lock().selection);
			return self.edit(|c| {
				c.remove_where(|n| selected.contains(&n.id()));
				let at = c.index_of(caret)?;
				for _ in 0..count.clamp(at) {
					if let Some(prev) = c.previous_sibling(caret)? {
						c.remove(prev)?;
					}
				}
				Ok(())
			});
		}
		self.animated(async {
			let selected = std::mem::take(&mut self.state.lock().selection);
			if !selected.is_empty() {
				// Nodes removed by other means since selecting are skipped.
				let removed = self.edit(|c| Ok(c.remove_where(|n| selected.contains(&n.id()))))?;
				tracing::trace!(removed, "typefx.delete_selection");
				if self.pause(ctx).await.is_break() {
					return Ok(());
				}
			}
			let mut budget = count;
			while budget.take_one() {
				if ctx.is_cancelled() {
					break;
				}
				let removed = self.edit(|c| match c.previous_sibling(caret)? {
					Some(prev) => c.remove(prev).map(|_| true),
					None => Ok(false),
				})?;
				if !removed {
					break;
				}
				if self.pause(ctx).await.is_break() {
					break;
				}
			}
			Ok(())
		})
		.await
	}

	/// Moves the caret by `shift`, optionally selecting what it crosses.
	pub(crate) async fn walk(&self, ctx: &TaskContext, shift: Shift, mark: bool, pace: Pace) -> Result<()> {
		if pace == Pace::Quick {
			return self.jump(shift, mark);
		}
		let caret = self.caret;
		self.animated(async {
			let mut budget = shift.count;
			while budget.take_one() {
				if ctx.is_cancelled() {
					break;
				}
				let Some(crossed) = self.edit(|c| step(c, caret, shift.direction, mark))? else {
					break;
				};
				if mark {
					self.state.lock().selection.insert(crossed);
				}
				if self.pause(ctx).await.is_break() {
					break;
				}
			}
			Ok(())
		})
		.await
	}

	pub(crate) fn set_caret_hidden(&self, hidden: bool) -> Result<()> {
		self.set_caret_class(CARET_HIDDEN_CLASS, hidden)
	}

	/// Undoes a binding: drops the caret, selection marks and container
	/// marker. Typed content stays.
	pub(crate) fn release(&self) -> Result<()> {
		let selected = std::mem::take(&mut self.state.lock().selection);
		let caret = self.caret;
		self.edit(|c| {
			for id in &selected {
				if let Ok(node) = c.node_mut(*id) {
					node.remove_class(SELECTED_CLASS);
				}
			}
			c.remove(caret)?;
			c.remove_class(CONTAINER_CLASS);
			c.clear_attachment();
			Ok(())
		})?;
		tracing::debug!(container = ?self.container, "typefx.unbind");
		Ok(())
	}

	/// Single relocation covering the whole shift.
	fn jump(&self, shift: Shift, mark: bool) -> Result<()> {
		let caret = self.caret;
		let crossed = self.edit(|c| {
			let at = c.index_of(caret)?;
			let (target, span) = match shift.direction {
				Direction::Backward => {
					let k = shift.count.clamp(at);
					(at - k, at - k..at)
				}
				Direction::Forward => {
					let k = shift.count.clamp(c.len() - 1 - at);
					(at + k, at + 1..at + 1 + k)
				}
			};
			let crossed: Vec<NodeId> = span.filter_map(|i| c.get(i).map(Node::id)).collect();
			if mark {
				for id in &crossed {
					c.node_mut(*id)?.add_class(SELECTED_CLASS);
				}
			}
			c.move_to(caret, target)?;
			Ok(crossed)
		})?;
		if mark {
			self.state.lock().selection.extend(crossed);
		}
		Ok(())
	}

	/// Runs a step loop with the caret blink paused, restoring it afterwards
	/// even when the loop fails.
	async fn animated(&self, body: impl Future<Output = Result<()>>) -> Result<()> {
		self.set_caret_class(CARET_BLINK_CLASS, false)?;
		let outcome = body.await;
		let restored = self.set_caret_class(CARET_BLINK_CLASS, true);
		outcome.and(restored)
	}

	/// Sleeps one jittered step delay; breaks when cancellation cut it short.
	async fn pause(&self, ctx: &TaskContext) -> ControlFlow<()> {
		let delay = {
			let mut state = self.state.lock();
			let (speed, range) = (state.options.speed, state.options.speed_range);
			state.pacer.delay(speed, range)
		};
		match ctx.sleep(delay).await {
			Sleep::Elapsed => ControlFlow::Continue(()),
			Sleep::Cancelled => ControlFlow::Break(()),
		}
	}

	fn set_caret_class(&self, class: &'static str, on: bool) -> Result<()> {
		let caret = self.caret;
		self.edit(|c| {
			let node = c.node_mut(caret)?;
			if on {
				node.add_class(class);
			} else {
				node.remove_class(class);
			}
			Ok(())
		})
	}

	fn edit<R>(&self, f: impl FnOnce(&mut Container) -> typefx_surface::Result<R>) -> Result<R> {
		Ok(self.surface.update(self.container, f)??)
	}
}

/// Moves the caret past one neighbour; returns the node crossed, or `None`
/// at a boundary.
fn step(c: &mut Container, caret: NodeId, direction: Direction, mark: bool) -> typefx_surface::Result<Option<NodeId>> {
	let crossed = match direction {
		Direction::Backward => {
			let Some(prev) = c.previous_sibling(caret)? else {
				return Ok(None);
			};
			c.move_before(caret, Some(prev))?;
			prev
		}
		Direction::Forward => {
			let Some(next) = c.next_sibling(caret)? else {
				return Ok(None);
			};
			let after = c.next_sibling(next)?;
			c.move_before(caret, after)?;
			next
		}
	};
	if mark {
		c.node_mut(crossed)?.add_class(SELECTED_CLASS);
	}
	Ok(Some(crossed))
}
