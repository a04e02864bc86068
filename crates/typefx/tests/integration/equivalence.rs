//! Animated and quick verbs against a plain model of the child list.

use std::time::Duration;

use proptest::prelude::*;
use typefx::{Surface, TypeFx, TypeFxOptions};

#[derive(Debug, Clone)]
enum Op {
	Type(String),
	Delete(i32),
	Move(i32),
	Select(i32),
}

fn arb_op() -> impl Strategy<Value = Op> {
	prop_oneof![
		"[a-z]{0,6}".prop_map(Op::Type),
		(-3i32..8).prop_map(Op::Delete),
		(-8i32..8).prop_map(Op::Move),
		(-8i32..8).prop_map(Op::Select),
	]
}

/// Characters with their selection mark, plus the caret position.
#[derive(Debug, Default)]
struct Model {
	cells: Vec<(char, bool)>,
	caret: usize,
}

impl Model {
	fn apply(&mut self, op: &Op) {
		match op {
			Op::Type(text) => {
				for ch in text.chars() {
					self.cells.insert(self.caret, (ch, false));
					self.caret += 1;
				}
			}
			Op::Delete(n) => {
				let behind = self.cells[..self.caret].iter().filter(|(_, sel)| *sel).count();
				self.cells.retain(|(_, sel)| !sel);
				self.caret -= behind;
				let k = usize::try_from(*n).unwrap_or(0).min(self.caret);
				self.cells.drain(self.caret - k..self.caret);
				self.caret -= k;
			}
			Op::Move(d) => self.shift(*d, false),
			Op::Select(d) => self.shift(*d, true),
		}
	}

	fn shift(&mut self, d: i32, mark: bool) {
		let k = d.unsigned_abs() as usize;
		let span = if d < 0 {
			let k = k.min(self.caret);
			self.caret -= k;
			self.caret..self.caret + k
		} else {
			let k = k.min(self.cells.len() - self.caret);
			self.caret += k;
			self.caret - k..self.caret
		};
		if mark {
			for cell in &mut self.cells[span] {
				cell.1 = true;
			}
		}
	}

	fn text(&self) -> String {
		self.cells.iter().map(|(ch, _)| *ch).collect()
	}

	fn selected(&self) -> usize {
		self.cells.iter().filter(|(_, sel)| *sel).count()
	}
}

fn schedule(fx: &TypeFx, op: &Op, quick: bool) {
	match (op, quick) {
		(Op::Type(text), false) => fx.type_text(text.clone()),
		(Op::Type(text), true) => fx.quick_type(text.clone()),
		(Op::Delete(n), false) => fx.delete(*n),
		(Op::Delete(n), true) => fx.quick_delete(*n),
		(Op::Move(d), false) => fx.move_caret(*d),
		(Op::Move(d), true) => fx.quick_move(*d),
		(Op::Select(d), false) => fx.select(*d),
		(Op::Select(d), true) => fx.quick_select(*d),
	};
}

/// Final (text, caret, selection size) after running `ops`.
fn run(ops: &[Op], quick: bool) -> (String, usize, usize) {
	let rt = tokio::runtime::Builder::new_current_thread().enable_time().start_paused(true).build().unwrap();
	rt.block_on(async {
		let surface = Surface::new();
		let container = surface.create_container();
		let options = TypeFxOptions::default().with_speed(Duration::from_millis(3)).with_seed(11);
		let fx = TypeFx::bind(&surface, container, options).unwrap();
		for op in ops {
			schedule(&fx, op, quick);
		}
		fx.settled().await.unwrap();
		(fx.text().unwrap(), fx.caret_index().unwrap(), fx.selection_len())
	})
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	#[test]
	fn animated_verbs_match_the_model(ops in prop::collection::vec(arb_op(), 1..12)) {
		let mut model = Model::default();
		for op in &ops {
			model.apply(op);
		}
		let (text, caret, selected) = run(&ops, false);
		prop_assert_eq!(text, model.text());
		prop_assert_eq!(caret, model.caret);
		prop_assert_eq!(selected, model.selected());
	}

	#[test]
	fn quick_verbs_match_animated_ones(ops in prop::collection::vec(arb_op(), 1..12)) {
		prop_assert_eq!(run(&ops, true), run(&ops, false));
	}

	#[test]
	fn move_round_trip_restores_caret(text in "[a-z]{1,10}", back in 0usize..10) {
		let back = back.min(text.len());
		let ops = [
			Op::Type(text.clone()),
			Op::Move(-(back as i32)),
			Op::Move(back as i32),
		];
		let (_, caret, _) = run(&ops, false);
		prop_assert_eq!(caret, text.len());
	}

	#[test]
	fn type_then_delete_round_trips(prefix in "[a-z]{0,6}", typed in "[a-z]{0,6}") {
		let ops = [
			Op::Type(prefix.clone()),
			Op::Type(typed.clone()),
			Op::Delete(typed.len() as i32),
		];
		let (text, caret, _) = run(&ops, false);
		prop_assert_eq!(text, prefix.clone());
		prop_assert_eq!(caret, prefix.len());
	}
}
