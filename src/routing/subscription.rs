use std::fmt;
use std::str::FromStr;

use arcstr::{ArcStr, Substr};

use super::error::SubscriptionError;
use crate::topic::TopicPatternPath;
use crate::topic::topic_path::split_segments;

/// Control prefix of a shared subscription: `$share/<group>/<pattern>`
pub const SHARE_PREFIX: &str = "$share";

/// Control prefix of a queued subscription: `$queue/<pattern>`
pub const QUEUE_PREFIX: &str = "$queue";

/// Delivery semantics requested by a subscription.
///
/// None of these affect matching; they are carried for the transport's
/// load-balancing decisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubscriptionKind {
	/// Ordinary subscription, every subscriber gets every message
	Direct,
	/// Shared subscription, one member of `group` gets each message
	Shared {
		/// Share group name
		group: ArcStr,
	},
	/// Queued subscription, a single consumer gets each message
	Queue,
}

/// A subscription pattern with its delivery prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
	raw_pattern: ArcStr,
	kind: SubscriptionKind,
	match_pattern: TopicPatternPath,
}

impl Subscription {
	/// Parses a raw subscription pattern.
	///
	/// The `$share`/`$queue` prefix is validated first and stripped; only
	/// then is the remaining pattern checked for `#` placement. A malformed
	/// prefix is therefore reported even when the rest is malformed too.
	pub fn parse(
		raw_pattern: impl Into<ArcStr>,
	) -> Result<Self, SubscriptionError> {
		let raw_pattern = raw_pattern.into();
		let (_, segments) = split_segments(&raw_pattern);

		let (kind, match_source) =
			match segments.first().map(Substr::as_str) {
				| Some(SHARE_PREFIX) => {
					if segments.len() < 3 {
						return Err(SubscriptionError::invalid_share(
							raw_pattern.as_str(),
							"expected $share/<group>/<topic filter>",
						));
					}
					let group = &segments[1];
					if group.is_empty() || group.contains(['+', '#']) {
						return Err(SubscriptionError::invalid_share(
							raw_pattern.as_str(),
							format!("invalid share group name '{group}'"),
						));
					}
					let kind = SubscriptionKind::Shared {
						group: ArcStr::from(group.as_str()),
					};
					(kind, join(&segments[2 ..]))
				}
				| Some(QUEUE_PREFIX) => {
					if segments.len() < 2 {
						return Err(SubscriptionError::invalid_share(
							raw_pattern.as_str(),
							"expected $queue/<topic filter>",
						));
					}
					(SubscriptionKind::Queue, join(&segments[1 ..]))
				}
				| _ => (SubscriptionKind::Direct, raw_pattern.clone()),
			};

		let match_pattern = TopicPatternPath::parse(match_source)?;

		Ok(Self {
			raw_pattern,
			kind,
			match_pattern,
		})
	}

	/// The pattern exactly as registered
	pub fn raw_pattern(&self) -> &str {
		&self.raw_pattern
	}

	/// Delivery semantics
	pub fn kind(&self) -> &SubscriptionKind {
		&self.kind
	}

	/// Pattern actually inserted into the trie
	pub fn match_pattern(&self) -> &TopicPatternPath {
		&self.match_pattern
	}

	/// True for `$share/…` subscriptions
	pub fn is_shared(&self) -> bool {
		matches!(self.kind, SubscriptionKind::Shared { .. })
	}

	/// True for `$queue/…` subscriptions
	pub fn is_queue(&self) -> bool {
		matches!(self.kind, SubscriptionKind::Queue)
	}

	/// Share group name, for shared subscriptions only
	pub fn group_name(&self) -> Option<&str> {
		match &self.kind {
			| SubscriptionKind::Shared { group } => Some(group),
			| _ => None,
		}
	}
}

fn join(segments: &[Substr]) -> ArcStr {
	let parts: Vec<&str> = segments.iter().map(Substr::as_str).collect();
	ArcStr::from(parts.join("/"))
}

impl fmt::Display for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.raw_pattern)
	}
}

impl FromStr for Subscription {
	type Err = SubscriptionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::topic::TopicPatternError;

	#[test]
	fn test_direct_subscription_is_unchanged() {
		let sub = Subscription::parse("sensors/+/temperature").unwrap();
		assert_eq!(sub.kind(), &SubscriptionKind::Direct);
		assert!(!sub.is_shared());
		assert!(!sub.is_queue());
		assert_eq!(sub.group_name(), None);
		assert_eq!(sub.match_pattern().as_str(), "sensors/+/temperature");
		assert_eq!(sub.raw_pattern(), "sensors/+/temperature");
	}

	#[test]
	fn test_shared_subscription() {
		let sub = Subscription::parse("$share/g1/a/+/b").unwrap();
		assert!(sub.is_shared());
		assert!(!sub.is_queue());
		assert_eq!(sub.group_name(), Some("g1"));
		assert_eq!(sub.match_pattern().as_str(), "a/+/b");
		assert_eq!(sub.to_string(), "$share/g1/a/+/b");
	}

	#[test]
	fn test_shared_subscription_needs_topic() {
		for raw in ["$share", "$share/g1", "$share/g1/"] {
			assert!(
				matches!(
					Subscription::parse(raw),
					Err(SubscriptionError::InvalidShareSubscription { .. })
				),
				"{raw} should be rejected"
			);
		}
	}

	#[test]
	fn test_shared_subscription_group_name() {
		for raw in ["$share//a", "$share/+/a", "$share/g#/a"] {
			assert!(
				matches!(
					Subscription::parse(raw),
					Err(SubscriptionError::InvalidShareSubscription { .. })
				),
				"{raw} should be rejected"
			);
		}
	}

	#[test]
	fn test_queue_subscription() {
		let sub = Subscription::parse("$queue/device/+/state").unwrap();
		assert!(sub.is_queue());
		assert!(!sub.is_shared());
		assert_eq!(sub.group_name(), None);
		assert_eq!(sub.match_pattern().as_str(), "device/+/state");
	}

	#[test]
	fn test_queue_subscription_needs_topic() {
		for raw in ["$queue", "$queue/"] {
			assert!(matches!(
				Subscription::parse(raw),
				Err(SubscriptionError::InvalidShareSubscription { .. })
			));
		}
	}

	#[test]
	fn test_prefix_error_precedes_pattern_error() {
		assert!(matches!(
			Subscription::parse("$share/#"),
			Err(SubscriptionError::InvalidShareSubscription { .. })
		));
	}

	#[test]
	fn test_hash_placement_after_stripping() {
		assert_eq!(
			Subscription::parse("$share/g/a/#/b"),
			Err(SubscriptionError::InvalidTopicPattern(
				TopicPatternError::hash_position("a/#/b")
			))
		);
		assert!(matches!(
			Subscription::parse("$queue/#/x"),
			Err(SubscriptionError::InvalidTopicPattern(_))
		));
	}

	#[test]
	fn test_prefix_only_recognized_as_first_segment() {
		let sub = Subscription::parse("a/$share/g/b").unwrap();
		assert_eq!(sub.kind(), &SubscriptionKind::Direct);
		assert_eq!(sub.match_pattern().as_str(), "a/$share/g/b");
	}

	#[test]
	fn test_from_str() {
		let sub: Subscription = "$queue/jobs".parse().unwrap();
		assert_eq!(sub.match_pattern().as_str(), "jobs");
	}
}
