//! Shared constants and validation for the topic module
//!
//! Individual error types live next to the code that raises them; this
//! module holds the limits every registration is checked against.

use super::topic_segment::TopicPatternError;

/// Convenient Result type for pattern operations
pub type PatternResult<T> = Result<T, TopicPatternError>;

/// Topic processing limits and constants
pub mod limits {
	/// Maximum topic nesting depth allowed
	pub const MAX_TOPIC_DEPTH: usize = 32;

	/// Maximum length of a single topic segment
	pub const MAX_SEGMENT_LENGTH: usize = 256;

	/// Maximum total topic path length (MQTT string length limit)
	pub const MAX_TOPIC_LENGTH: usize = 65_535;
}

/// Validation utilities for registration patterns
pub mod validation {
	use super::TopicPatternError;
	use crate::config::IndexSettings;
	use crate::topic::TopicPatternPath;

	/// Checks a parsed pattern against the configured limits.
	///
	/// Wildcard placement is already enforced by parsing; this only covers
	/// size constraints.
	pub fn validate_pattern(
		pattern: &TopicPatternPath,
		settings: &IndexSettings,
	) -> Result<(), TopicPatternError> {
		let length = pattern.as_str().len();
		if length > settings.max_pattern_length {
			return Err(TopicPatternError::PatternTooLong {
				length,
				max: settings.max_pattern_length,
			});
		}

		if pattern.len() > settings.max_pattern_depth {
			return Err(TopicPatternError::too_deep(
				pattern.as_str(),
				pattern.len(),
				settings.max_pattern_depth,
			));
		}

		for (position, segment) in pattern.iter().enumerate() {
			if segment.as_str().len() > settings.max_segment_length {
				return Err(TopicPatternError::segment_too_long(
					segment.as_str(),
					position,
					settings.max_segment_length,
				));
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::validation::validate_pattern;
	use super::*;
	use crate::config::IndexSettings;
	use crate::topic::TopicPatternPath;

	fn pattern(s: &str) -> TopicPatternPath {
		TopicPatternPath::parse(s).unwrap()
	}

	#[test]
	fn test_default_limits_accept_ordinary_patterns() {
		let settings = IndexSettings::default();
		assert!(validate_pattern(&pattern("a/+/b/#"), &settings).is_ok());
		assert!(validate_pattern(&pattern(""), &settings).is_ok());
	}

	#[test]
	fn test_depth_limit() {
		let settings = IndexSettings::default().with_max_pattern_depth(2);
		assert!(validate_pattern(&pattern("a/b"), &settings).is_ok());
		assert_eq!(
			validate_pattern(&pattern("a/b/c"), &settings),
			Err(TopicPatternError::too_deep("a/b/c", 3, 2))
		);
	}

	#[test]
	fn test_segment_length_limit() {
		let settings = IndexSettings::default().with_max_segment_length(3);
		let err = validate_pattern(&pattern("abc/abcd"), &settings)
			.unwrap_err();
		assert_eq!(err, TopicPatternError::segment_too_long("abcd", 1, 3));
	}

	#[test]
	fn test_total_length_limit() {
		let settings = IndexSettings::default().with_max_pattern_length(4);
		assert!(matches!(
			validate_pattern(&pattern("abc/de"), &settings),
			Err(TopicPatternError::PatternTooLong { length: 6, max: 4 })
		));
	}
}
