//! Topic segment classification and pattern errors

use arcstr::Substr;
use thiserror::Error;

/// Error types for registration pattern parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopicPatternError {
	/// Hash wildcard (#) used not at the end of the pattern
	#[error(
		"Invalid topic pattern '{pattern}': # wildcard can only be the last \
		 segment"
	)]
	HashPosition {
		/// The invalid pattern
		pattern: String,
	},

	/// Pattern has more segments than the index allows
	#[error(
		"Invalid topic pattern '{pattern}': {depth} segments exceed the \
		 limit of {max}"
	)]
	TooDeep {
		/// The invalid pattern
		pattern: String,
		/// Number of segments in the pattern
		depth: usize,
		/// Configured limit
		max: usize,
	},

	/// A single segment is longer than the index allows
	#[error(
		"Segment '{segment}' at position {position} exceeds the limit of \
		 {max} bytes"
	)]
	SegmentTooLong {
		/// The offending segment
		segment: String,
		/// Zero-based segment position
		position: usize,
		/// Configured limit
		max: usize,
	},

	/// Whole pattern is longer than the index allows
	#[error("Topic pattern of {length} bytes exceeds the limit of {max}")]
	PatternTooLong {
		/// Pattern length in bytes
		length: usize,
		/// Configured limit
		max: usize,
	},
}

impl TopicPatternError {
	/// Creates a new HashPosition error
	pub fn hash_position(pattern: impl Into<String>) -> Self {
		Self::HashPosition {
			pattern: pattern.into(),
		}
	}

	/// Creates a new TooDeep error
	pub fn too_deep(pattern: impl Into<String>, depth: usize, max: usize) -> Self {
		Self::TooDeep {
			pattern: pattern.into(),
			depth,
			max,
		}
	}

	/// Creates a new SegmentTooLong error
	pub fn segment_too_long(
		segment: impl Into<String>,
		position: usize,
		max: usize,
	) -> Self {
		Self::SegmentTooLong {
			segment: segment.into(),
			position,
			max,
		}
	}
}

/// One `/`-delimited token of a registration pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TopicSegment {
	/// Literal segment, matched byte for byte (may be empty)
	Literal(Substr),
	/// Single-level wildcard `+`
	Single,
	/// Multi-level wildcard `#`
	Multi,
}

impl TopicSegment {
	/// Classifies a pattern token.
	///
	/// Only the exact tokens `+` and `#` are wildcards; everything else,
	/// including the empty string, is a literal.
	pub fn classify(token: Substr) -> Self {
		match token.as_str() {
			| "+" => TopicSegment::Single,
			| "#" => TopicSegment::Multi,
			| _ => TopicSegment::Literal(token),
		}
	}

	/// Returns string representation of the segment.
	pub fn as_str(&self) -> &str {
		match self {
			| TopicSegment::Literal(s) => s,
			| TopicSegment::Single => "+",
			| TopicSegment::Multi => "#",
		}
	}

	/// Returns true if this segment is a wildcard (+ or #).
	pub fn is_wildcard(&self) -> bool {
		matches!(self, TopicSegment::Single | TopicSegment::Multi)
	}
}

impl From<Substr> for TopicSegment {
	fn from(token: Substr) -> Self {
		Self::classify(token)
	}
}

impl From<&str> for TopicSegment {
	fn from(token: &str) -> Self {
		Self::classify(Substr::from(token))
	}
}

impl std::fmt::Display for TopicSegment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}
