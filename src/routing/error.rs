use thiserror::Error;

use crate::topic::TopicPatternError;

/// Errors during subscription registration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
	/// `$share/…` or `$queue/…` prefix is malformed
	#[error("Invalid shared subscription '{pattern}': {reason}")]
	InvalidShareSubscription {
		/// The raw pattern as registered
		pattern: String,
		/// What is wrong with the prefix
		reason: String,
	},
	/// Pattern left after prefix stripping is malformed
	#[error("Invalid topic pattern: {0}")]
	InvalidTopicPattern(#[from] TopicPatternError),
}

impl SubscriptionError {
	/// Creates a new InvalidShareSubscription error
	pub fn invalid_share(
		pattern: impl Into<String>,
		reason: impl Into<String>,
	) -> Self {
		Self::InvalidShareSubscription {
			pattern: pattern.into(),
			reason: reason.into(),
		}
	}
}
