//! Handler multiplexer keyed by subscription patterns

use std::fmt;

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::error::SubscriptionError;
use super::handler_list::HandlerList;
use super::routing_index::RouteMatch;
use super::subscription::Subscription;
use crate::config::IndexSettings;
use crate::topic::topic_pattern_path::{join_segments, route_from_segments};
use crate::topic::{TopicMatcherNode, TopicPath, TopicSegment, validation};

type HandlerTree<H> = TopicMatcherNode<HandlerList<H>>;

fn has_handlers<H>(handlers: &HandlerList<H>) -> bool {
	!handlers.is_empty()
}

/// Thread-safe index of handler lists keyed by subscription pattern.
///
/// Registering the same pattern repeatedly appends to its handler list.
/// `$share/<group>/…` and `$queue/…` prefixes are stripped before insertion,
/// so they match exactly like the underlying pattern.
///
/// ```rust
/// use mqtt_topic_index::SubscriptionIndex;
///
/// let index = SubscriptionIndex::new();
/// index.register("device/+/state", "any-device")?;
/// let sub = index.register("$share/workers/device/+/state", "worker")?;
/// assert_eq!(sub.group_name(), Some("workers"));
///
/// let handlers = index.get("device/gear-001/state").unwrap();
/// assert_eq!(handlers.as_slice(), ["any-device", "worker"]);
/// # Ok::<(), mqtt_topic_index::SubscriptionError>(())
/// ```
pub struct SubscriptionIndex<H> {
	root: RwLock<HandlerTree<H>>,
	settings: IndexSettings,
}

impl<H> Default for SubscriptionIndex<H> {
	fn default() -> Self {
		Self::new()
	}
}

impl<H> SubscriptionIndex<H> {
	/// Creates an empty index with default settings
	pub fn new() -> Self {
		Self::with_settings(IndexSettings::default())
	}

	/// Creates an empty index with the given settings
	pub fn with_settings(settings: IndexSettings) -> Self {
		Self {
			root: RwLock::new(HandlerTree::new()),
			settings,
		}
	}

	/// Settings this index was built with
	pub fn settings(&self) -> &IndexSettings {
		&self.settings
	}

	fn parse_subscription(
		&self,
		raw_pattern: &str,
	) -> Result<Subscription, SubscriptionError> {
		let parsed = Subscription::parse(raw_pattern).and_then(|sub| {
			validation::validate_pattern(sub.match_pattern(), &self.settings)?;
			Ok(sub)
		});
		if let Err(err) = &parsed {
			debug!(pattern = raw_pattern, error = %err, "Rejected subscription");
		}
		parsed
	}

	/// Normalizes `raw_pattern` and hands the handler list stored under the
	/// resulting pattern to `mutate`, creating it if needed.
	///
	/// Nothing is created when the pattern is rejected.
	pub fn set<F>(
		&self,
		raw_pattern: &str,
		mutate: F,
	) -> Result<Subscription, SubscriptionError>
	where
		F: FnOnce(&mut HandlerList<H>),
	{
		let subscription = self.parse_subscription(raw_pattern)?;
		let mut root = self.root.write();
		let handlers = root
			.get_or_create_node(subscription.match_pattern())
			.data_mut()
			.get_or_insert_with(HandlerList::new);
		mutate(handlers);
		debug!(
			pattern = raw_pattern,
			match_pattern = %subscription.match_pattern(),
			group = ?subscription.group_name(),
			queue = subscription.is_queue(),
			handlers = handlers.len(),
			"Registered subscription"
		);
		Ok(subscription)
	}

	/// Appends `handler` under `raw_pattern`.
	pub fn register(
		&self,
		raw_pattern: &str,
		handler: H,
	) -> Result<Subscription, SubscriptionError>
	where
		H: Clone,
	{
		self.set(raw_pattern, |handlers| handlers.push(handler))
	}

	/// Handlers of the highest-priority pattern matching `topic`.
	///
	/// Patterns with an empty handler list are skipped. The returned list
	/// is a snapshot; later registrations do not change it.
	pub fn get(&self, topic: &str) -> Option<HandlerList<H>> {
		self.match_route(topic).map(|matched| matched.value)
	}

	/// Like [`get`](Self::get), also returning the winning pattern.
	pub fn match_route(
		&self,
		topic: &str,
	) -> Option<RouteMatch<HandlerList<H>>> {
		let topic = TopicPath::new(topic);
		let root = self.root.read_recursive();
		let found = root
			.find_first(&topic, self.settings.protect_system_topics, has_handlers)
			.map(|(matched, handlers)| RouteMatch {
				route: route_from_segments(&matched),
				value: handlers.clone(),
			});
		trace!(
			topic = %topic,
			route = found.as_ref().map(|m| m.route.as_str()),
			"Subscription lookup"
		);
		found
	}

	/// Every pattern matching `topic` with its handlers, for fan-out to all
	/// subscribers.
	///
	/// Ordered depth-first, literal before `+` before `#` at each level.
	pub fn route_all(&self, topic: &str) -> Vec<RouteMatch<HandlerList<H>>> {
		let topic = TopicPath::new(topic);
		let root = self.root.read_recursive();
		let matches: Vec<_> = root
			.collect_matches(
				&topic,
				self.settings.protect_system_topics,
				has_handlers,
			)
			.into_iter()
			.map(|(matched, handlers)| RouteMatch {
				route: route_from_segments(&matched),
				value: handlers.clone(),
			})
			.collect();
		trace!(topic = %topic, routes = matches.len(), "Subscription fan-out");
		matches
	}

	/// All handlers from [`route_all`](Self::route_all), flattened in order.
	pub fn handlers(&self, topic: &str) -> Vec<H>
	where
		H: Clone,
	{
		self.route_all(topic)
			.iter()
			.flat_map(|matched| matched.value.iter().cloned())
			.collect()
	}

	/// Visits every node ever created, in pre-order.
	///
	/// `path` is in pattern form; `handlers` is `None` for nodes that only
	/// exist as a path prefix. `visit` may read this index but must not
	/// write to it.
	pub fn walk<F>(&self, mut visit: F)
	where
		F: FnMut(&str, Option<&HandlerList<H>>),
	{
		let root = self.root.read_recursive();
		root.walk(
			&mut |segments: &[TopicSegment],
			      handlers: Option<&HandlerList<H>>| {
				visit(&join_segments(segments), handlers)
			},
		);
	}

	/// Number of patterns with at least one handler
	pub fn len(&self) -> usize {
		self.root.read_recursive().count(&has_handlers)
	}

	/// True if no pattern has a handler
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Total number of handlers across all patterns
	pub fn handler_count(&self) -> usize {
		let mut total = 0;
		self.walk(|_, handlers| {
			total += handlers.map_or(0, |handlers| handlers.len());
		});
		total
	}
}

impl<H> fmt::Display for SubscriptionIndex<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.root.read_recursive().render(
			f,
			&|handlers: &HandlerList<H>, f: &mut fmt::Formatter<'_>| {
				match handlers.len() {
					| 1 => write!(f, "1 handler"),
					| n => write!(f, "{n} handlers"),
				}
			},
		)
	}
}

impl<H> fmt::Debug for SubscriptionIndex<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SubscriptionIndex")
			.field("patterns", &self.len())
			.field("handlers", &self.handler_count())
			.field("settings", &self.settings)
			.finish()
	}
}
