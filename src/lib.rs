//! # MQTT Topic Index
//!
//! A concurrent trie for routing MQTT-style topics to values registered
//! under wildcard patterns.
//!
//! ## Features
//!
//! - **Priority matching**: at every level a literal segment beats `+`,
//!   and `+` beats `#`, with full backtracking
//! - **Single-value routing**: [`RoutingIndex`] keeps one value per pattern
//!   and reports which pattern won a lookup
//! - **Handler multiplexing**: [`SubscriptionIndex`] keeps an ordered list
//!   of handlers per pattern and understands `$share/<group>/…` and
//!   `$queue/…` subscriptions
//! - **Fan-out**: collect every matching pattern instead of only the best
//! - **Thread safety**: reads run in parallel, writes are exclusive
//!
//! ## Quick Start
//!
//! ```rust
//! use mqtt_topic_index::{RoutingIndex, SubscriptionIndex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let routes = RoutingIndex::new();
//! routes.set_value("sensors/+/temperature", 1)?;
//! routes.set_value("sensors/#", 2)?;
//!
//! let matched = routes.match_route("sensors/kitchen/temperature").unwrap();
//! assert_eq!(matched.route, "/sensors/+/temperature");
//! assert_eq!(*matched.value, 1);
//!
//! let subscriptions = SubscriptionIndex::new();
//! subscriptions.register("$share/loggers/sensors/#", "file-logger")?;
//! subscriptions.register("sensors/#", "dashboard")?;
//! let handlers = subscriptions.get("sensors/kitchen/humidity").unwrap();
//! assert_eq!(handlers.as_slice(), ["file-logger", "dashboard"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Pattern Matching
//!
//! - `+` matches exactly one topic level (e.g. `sensors/+/temperature`)
//! - `#` matches one or more trailing levels (e.g. `sensors/#` matches
//!   `sensors/a` and `sensors/a/b`, but not `sensors`)
//! - A single trailing `/` is ignored; `""` and `/` address the root
//! - Empty levels are literal (`a//b` has three levels)

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod config;
pub mod routing;
pub mod topic;

// === Core Public API ===
pub use config::IndexSettings;
pub use routing::{
	HandlerList, RouteMatch, RoutingIndex, Subscription, SubscriptionError,
	SubscriptionIndex, SubscriptionKind,
};
pub use topic::{TopicPath, TopicPatternError, TopicPatternPath, TopicSegment};

/// Prelude module for convenient imports
///
/// ```rust
/// use mqtt_topic_index::prelude::*;
/// ```
pub mod prelude {
	//! Essential types for most routing setups

	pub use crate::{
		HandlerList, IndexSettings, RouteMatch, RoutingIndex,
		SubscriptionIndex,
	};
}

/// Error types used throughout the library
///
/// ```rust
/// use mqtt_topic_index::errors::*;
/// ```
pub mod errors {
	//! All error types used in the library

	pub use crate::{SubscriptionError, TopicPatternError};
	pub use crate::topic::PatternResult;
}
