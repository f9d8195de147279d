use std::fmt;

/// Constraint on how many contributions a configuration point accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occurrences {
	/// No contributions allowed.
	None,
	/// Zero or one.
	Optional,
	/// Exactly one.
	Required,
	/// One or more.
	OnePlus,
	/// Any number, including zero.
	Unbounded,
}

impl Occurrences {
	/// True when `count` satisfies this constraint. Pure and stateless.
	pub fn in_range(self, count: usize) -> bool {
		match self {
			Self::None => count == 0,
			Self::Optional => count <= 1,
			Self::Required => count == 1,
			Self::OnePlus => count >= 1,
			Self::Unbounded => true,
		}
	}
}

impl fmt::Display for Occurrences {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let text = match self {
			Self::None => "none",
			Self::Optional => "0..1",
			Self::Required => "1",
			Self::OnePlus => "1..n",
			Self::Unbounded => "0..n",
		};
		f.write_str(text)
	}
}
