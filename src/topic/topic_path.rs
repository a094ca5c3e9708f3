//! Concrete topics as supplied at lookup time
#![allow(missing_docs)]

use std::fmt;

use arcstr::{ArcStr, Substr};
use smallvec::SmallVec;

/// Segment storage shared by topics and patterns; most topic hierarchies
/// stay within a handful of levels.
pub(crate) type SegmentVec<T> = SmallVec<[T; 8]>;

/// Splits a path into `/`-delimited segments after dropping one trailing
/// separator.
///
/// The empty path (and `/`) yields no segments at all, addressing the root.
/// Embedded and leading empty segments are preserved.
pub(crate) fn split_segments(path: &ArcStr) -> (Substr, SegmentVec<Substr>) {
	let normalized = match path.strip_suffix('/') {
		| Some(trimmed) => path.substr(.. trimmed.len()),
		| None => path.substr(..),
	};
	let segments = if normalized.is_empty() {
		SegmentVec::new()
	} else {
		normalized.split('/').map(|s| path.substr_from(s)).collect()
	};
	(normalized, segments)
}

/// A concrete, already-normalized topic.
///
/// Wildcard characters carry no meaning here; `+` and `#` in a topic are
/// ordinary segment values.
#[derive(Debug, Clone)]
pub struct TopicPath {
	path: Substr,
	segments: SegmentVec<Substr>,
}

impl TopicPath {
	pub fn new(path: impl Into<ArcStr>) -> Self {
		let (path, segments) = split_segments(&path.into());
		Self { path, segments }
	}

	/// Normalized topic string (trailing separator removed)
	pub fn as_str(&self) -> &str {
		&self.path
	}

	pub fn segments(&self) -> &[Substr] {
		&self.segments
	}

	/// Number of segments; zero for the root topic
	pub fn depth(&self) -> usize {
		self.segments.len()
	}
}

impl From<&str> for TopicPath {
	fn from(path: &str) -> Self {
		Self::new(path)
	}
}

impl From<String> for TopicPath {
	fn from(path: String) -> Self {
		Self::new(path)
	}
}

impl From<ArcStr> for TopicPath {
	fn from(path: ArcStr) -> Self {
		Self::new(path)
	}
}

impl fmt::Display for TopicPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.path)
	}
}
