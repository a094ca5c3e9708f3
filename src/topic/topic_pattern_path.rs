use std::convert::TryFrom;
use std::fmt::{self, Display};
use std::slice::Iter;
use std::str::FromStr;

use arcstr::{ArcStr, Substr};

use super::topic_path::{SegmentVec, split_segments};
use super::topic_segment::{TopicPatternError, TopicSegment};

/// Parsed registration pattern with wildcard support.
///
/// Parsing drops one trailing `/`, splits on `/` and classifies every
/// token. The only structural rule enforced here is that `#` is the last
/// segment; size limits are checked separately against the index settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPatternPath {
	pattern: Substr, // normalized pattern "sensors/+/data"
	segments: SegmentVec<TopicSegment>,
}

impl TopicPatternPath {
	/// Parses and validates a pattern string.
	pub fn parse(
		topic_pattern: impl Into<ArcStr>,
	) -> Result<Self, TopicPatternError> {
		let topic_pattern = topic_pattern.into();
		let (pattern, raw_segments) = split_segments(&topic_pattern);

		let segments: SegmentVec<TopicSegment> =
			raw_segments.into_iter().map(TopicSegment::classify).collect();

		if let Some(hash_pos) =
			segments.iter().position(|s| matches!(s, TopicSegment::Multi))
		{
			if hash_pos != segments.len() - 1 {
				return Err(TopicPatternError::hash_position(
					topic_pattern.as_str(),
				));
			}
		}

		Ok(Self { pattern, segments })
	}

	/// Builds a pattern from already-classified segments.
	pub fn from_segments(
		segments: &[TopicSegment],
	) -> Result<Self, TopicPatternError> {
		Self::parse(join_segments(segments))
	}

	/// Returns the normalized pattern string.
	pub fn as_str(&self) -> &str {
		&self.pattern
	}

	/// Returns true if the pattern addresses the root (no segments).
	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	/// Returns true if pattern contains multi-level wildcard (#).
	pub fn contains_hash(&self) -> bool {
		self.segments
			.last()
			.is_some_and(|s| matches!(s, TopicSegment::Multi))
	}

	/// Returns true if any segment is a wildcard.
	pub fn has_wildcards(&self) -> bool {
		self.segments.iter().any(TopicSegment::is_wildcard)
	}

	/// Returns iterator over pattern segments.
	pub fn iter(&self) -> Iter<'_, TopicSegment> {
		self.segments.iter()
	}

	/// Returns number of segments in pattern.
	pub fn len(&self) -> usize {
		self.segments.len()
	}

	/// Returns pattern segments as slice.
	pub fn slice(&self) -> &[TopicSegment] {
		&self.segments
	}

	/// Returns the route form of the pattern: `/a/+/c`, or `""` for the root.
	pub fn route(&self) -> String {
		route_from_segments(&self.segments)
	}
}

fn str_len(segments: &[TopicSegment]) -> usize {
	if segments.is_empty() {
		return 0;
	}
	(segments.len() - 1) + // slashes count
	segments.iter().map(|s| s.as_str().len()).sum::<usize>()
}

/// Joins segments with `/`, the inverse of parsing.
pub fn join_segments(segments: &[TopicSegment]) -> String {
	let mut joined = String::with_capacity(str_len(segments));
	segments.iter().enumerate().for_each(|(i, segment)| {
		if i > 0 {
			joined.push('/');
		}
		joined.push_str(segment.as_str());
	});
	joined
}

/// Renders matched segments as a route, each one prefixed with `/`.
pub fn route_from_segments(segments: &[TopicSegment]) -> String {
	let mut route = String::with_capacity(str_len(segments) + 1);
	for segment in segments {
		route.push('/');
		route.push_str(segment.as_str());
	}
	route
}

impl Display for TopicPatternPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

impl FromStr for TopicPatternPath {
	type Err = TopicPatternError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<String> for TopicPatternPath {
	type Error = TopicPatternError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

impl TryFrom<&str> for TopicPatternPath {
	type Error = TopicPatternError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

impl TryFrom<ArcStr> for TopicPatternPath {
	type Error = TopicPatternError;

	fn try_from(value: ArcStr) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}
