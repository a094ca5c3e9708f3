//! Configuration for topic index construction

use crate::topic::limits;

/// Index-level limits and matching behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IndexSettings {
	/// Maximum number of segments in a registered pattern
	pub max_pattern_depth: usize,
	/// Maximum length of a single pattern segment, in bytes
	pub max_segment_length: usize,
	/// Maximum total pattern length, in bytes
	pub max_pattern_length: usize,
	/// Keep `$`-prefixed topics away from root-level `+` and `#` patterns
	pub protect_system_topics: bool,
}

impl Default for IndexSettings {
	fn default() -> Self {
		Self {
			max_pattern_depth: limits::MAX_TOPIC_DEPTH,
			max_segment_length: limits::MAX_SEGMENT_LENGTH,
			max_pattern_length: limits::MAX_TOPIC_LENGTH,
			protect_system_topics: false,
		}
	}
}

impl IndexSettings {
	/// Settings that follow the MQTT rule for `$SYS`-style topics.
	///
	/// A topic such as `$SYS/broker/uptime` is then only delivered to
	/// patterns that spell the `$SYS` segment out literally.
	pub fn mqtt_compliant() -> Self {
		Self {
			protect_system_topics: true,
			..Self::default()
		}
	}

	/// Set the maximum pattern depth
	pub fn with_max_pattern_depth(mut self, depth: usize) -> Self {
		self.max_pattern_depth = depth;
		self
	}

	/// Set the maximum segment length
	pub fn with_max_segment_length(mut self, length: usize) -> Self {
		self.max_segment_length = length;
		self
	}

	/// Set the maximum total pattern length
	pub fn with_max_pattern_length(mut self, length: usize) -> Self {
		self.max_pattern_length = length;
		self
	}

	/// Enable or disable `$`-topic protection
	pub fn with_protect_system_topics(mut self, protect: bool) -> Self {
		self.protect_system_topics = protect;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_follow_limits() {
		let settings = IndexSettings::default();
		assert_eq!(settings.max_pattern_depth, limits::MAX_TOPIC_DEPTH);
		assert_eq!(settings.max_segment_length, limits::MAX_SEGMENT_LENGTH);
		assert_eq!(settings.max_pattern_length, limits::MAX_TOPIC_LENGTH);
		assert!(!settings.protect_system_topics);
	}

	#[test]
	fn test_builder_methods() {
		let settings = IndexSettings::mqtt_compliant()
			.with_max_pattern_depth(4)
			.with_max_segment_length(8)
			.with_max_pattern_length(64);
		assert!(settings.protect_system_topics);
		assert_eq!(settings.max_pattern_depth, 4);
		assert_eq!(settings.max_segment_length, 8);
		assert_eq!(settings.max_pattern_length, 64);
	}

	#[cfg(feature = "serde")]
	#[test]
	fn test_partial_settings_from_json() {
		let settings: IndexSettings = serde_json::from_str(
			r#"{ "max_pattern_depth": 8, "protect_system_topics": true }"#,
		)
		.unwrap();
		assert_eq!(settings.max_pattern_depth, 8);
		assert!(settings.protect_system_topics);
		assert_eq!(settings.max_segment_length, limits::MAX_SEGMENT_LENGTH);
	}
}
