//! Step counts for delete, move, and select.

/// How many steps a verb may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Count {
	/// At most this many steps.
	Bounded(usize),
	/// Keep going until a boundary stops the walk.
	Unbounded,
}

impl Count {
	pub const ZERO: Self = Self::Bounded(0);

	/// Consumes one step; returns false once the budget is spent.
	pub(crate) fn take_one(&mut self) -> bool {
		match self {
			Self::Unbounded => true,
			Self::Bounded(0) => false,
			Self::Bounded(n) => {
				*n -= 1;
				true
			}
		}
	}

	/// Caps this count at `limit`.
	pub(crate) fn clamp(self, limit: usize) -> usize {
		match self {
			Self::Unbounded => limit,
			Self::Bounded(n) => n.min(limit),
		}
	}
}

macro_rules! count_from_unsigned {
	($($ty:ty),*) => {$(
		impl From<$ty> for Count {
			fn from(n: $ty) -> Self {
				Self::Bounded(usize::try_from(n).unwrap_or(usize::MAX))
			}
		}
	)*};
}

// Negative counts take no steps.
macro_rules! count_from_signed {
	($($ty:ty),*) => {$(
		impl From<$ty> for Count {
			fn from(n: $ty) -> Self {
				Self::Bounded(usize::try_from(n).unwrap_or(0))
			}
		}
	)*};
}

count_from_unsigned!(u32, u64, usize);
count_from_signed!(i32, i64, isize);

/// Direction the caret travels through the child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	/// Towards the start (over already-typed content).
	Backward,
	/// Towards the end (over not-yet-visited content).
	Forward,
}

/// Signed caret distance used by move and select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shift {
	pub direction: Direction,
	pub count: Count,
}

impl Shift {
	pub fn backward(count: impl Into<Count>) -> Self {
		Self {
			direction: Direction::Backward,
			count: count.into(),
		}
	}

	pub fn forward(count: impl Into<Count>) -> Self {
		Self {
			direction: Direction::Forward,
			count: count.into(),
		}
	}

	/// Walks back until the first child.
	pub fn to_start() -> Self {
		Self::backward(Count::Unbounded)
	}

	/// Walks forward until the last child.
	pub fn to_end() -> Self {
		Self::forward(Count::Unbounded)
	}
}

macro_rules! shift_from_signed {
	($($ty:ty),*) => {$(
		impl From<$ty> for Shift {
			fn from(n: $ty) -> Self {
				let steps = usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX);
				if n < 0 { Self::backward(steps) } else { Self::forward(steps) }
			}
		}
	)*};
}

shift_from_signed!(i32, i64, isize);
