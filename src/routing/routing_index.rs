//! Generic pattern → value index

use std::fmt;

use parking_lot::{
	MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard,
	RwLockWriteGuard,
};
use tracing::{debug, trace};

use crate::config::IndexSettings;
use crate::topic::topic_pattern_path::{join_segments, route_from_segments};
use crate::topic::{
	TopicMatcherNode, TopicPath, TopicPatternError, TopicPatternPath,
	TopicSegment, validation,
};

/// A lookup result together with the pattern that produced it.
///
/// `route` is the matched pattern in route form (`/a/+/c`, or `""` for the
/// root pattern).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<V> {
	/// Matched pattern, each segment prefixed with `/`
	pub route: String,
	/// Value stored under the matched pattern
	pub value: V,
}

/// Thread-safe index mapping wildcard patterns to one value each.
///
/// Lookups prefer an exact literal segment over `+`, and `+` over `#`, at
/// every level. Registering a pattern again overwrites its value.
///
/// ```rust
/// use mqtt_topic_index::RoutingIndex;
///
/// let index = RoutingIndex::new();
/// index.set_value("device/gear-001/state", "exact")?;
/// index.set_value("device/+/state", "single")?;
/// index.set_value("logs/#", "multi")?;
///
/// assert_eq!(index.get_value("device/gear-001/state"), Some("exact"));
/// assert_eq!(index.get_value("device/gear-002/state"), Some("single"));
/// assert_eq!(index.get_value("logs/app/debug"), Some("multi"));
/// assert_eq!(index.get_value("logs"), None);
/// # Ok::<(), mqtt_topic_index::TopicPatternError>(())
/// ```
pub struct RoutingIndex<T> {
	root: RwLock<TopicMatcherNode<T>>,
	settings: IndexSettings,
}

impl<T> Default for RoutingIndex<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> RoutingIndex<T> {
	/// Creates an empty index with default settings
	pub fn new() -> Self {
		Self::with_settings(IndexSettings::default())
	}

	/// Creates an empty index with the given settings
	pub fn with_settings(settings: IndexSettings) -> Self {
		Self {
			root: RwLock::new(TopicMatcherNode::new()),
			settings,
		}
	}

	/// Settings this index was built with
	pub fn settings(&self) -> &IndexSettings {
		&self.settings
	}

	fn parse_pattern(
		&self,
		pattern: &str,
	) -> Result<TopicPatternPath, TopicPatternError> {
		let parsed = TopicPatternPath::parse(pattern).and_then(|path| {
			validation::validate_pattern(&path, &self.settings)?;
			Ok(path)
		});
		if let Err(err) = &parsed {
			debug!(pattern, error = %err, "Rejected routing pattern");
		}
		parsed
	}

	/// Stores `value` under `pattern`, replacing any previous value.
	///
	/// The pattern is fully validated before the trie is touched, so a
	/// rejected pattern leaves the index unchanged.
	pub fn set_value(
		&self,
		pattern: &str,
		value: T,
	) -> Result<(), TopicPatternError> {
		let path = self.parse_pattern(pattern)?;
		let mut root = self.root.write();
		*root.get_or_create_node(&path).data_mut() = Some(value);
		debug!(pattern = %path, "Stored routing value");
		Ok(())
	}

	/// Get-or-create mutation of the value under `pattern`.
	///
	/// `mutate` receives the stored value (a fresh `T::default()` when none
	/// was present) and whether a value already existed. If it fails, the
	/// error is returned and a freshly defaulted slot is left unset; the
	/// nodes created for the pattern stay in place.
	pub fn set<F, E>(&self, pattern: &str, mutate: F) -> Result<(), E>
	where
		T: Default,
		F: FnOnce(&mut T, bool) -> Result<(), E>,
		E: From<TopicPatternError>,
	{
		let path = self.parse_pattern(pattern)?;
		let mut root = self.root.write();
		let slot = root.get_or_create_node(&path).data_mut();
		let existed = slot.is_some();
		let value = slot.get_or_insert_with(T::default);
		match mutate(value, existed) {
			| Ok(()) => {
				debug!(pattern = %path, existed, "Updated routing value");
				Ok(())
			}
			| Err(err) => {
				if !existed {
					*slot = None;
				}
				Err(err)
			}
		}
	}

	/// Best match for `topic`, borrowed in place.
	///
	/// The returned guard holds a shared lock until dropped. Further lookups
	/// from the same thread are fine; writes from it deadlock.
	pub fn get(&self, topic: &str) -> Option<MappedRwLockReadGuard<'_, T>> {
		let topic = TopicPath::new(topic);
		let protect = self.settings.protect_system_topics;
		let root = self.root.read_recursive();
		let found = RwLockReadGuard::try_map(root, |root| {
			root.find_first(&topic, protect, |_| true)
				.map(|(_, value)| value)
		})
		.ok();
		trace!(topic = %topic, found = found.is_some(), "Routing lookup");
		found
	}

	/// Best match for `topic`, cloned.
	pub fn get_value(&self, topic: &str) -> Option<T>
	where
		T: Clone,
	{
		self.get(topic).map(|value| T::clone(&value))
	}

	/// Best match for `topic` together with the pattern that won.
	pub fn match_route(
		&self,
		topic: &str,
	) -> Option<RouteMatch<MappedRwLockReadGuard<'_, T>>> {
		let topic = TopicPath::new(topic);
		let protect = self.settings.protect_system_topics;
		let mut route = String::new();
		let root = self.root.read_recursive();
		let value = RwLockReadGuard::try_map(root, |root| {
			let (matched, value) = root.find_first(&topic, protect, |_| true)?;
			route = route_from_segments(&matched);
			Some(value)
		})
		.ok()?;
		trace!(topic = %topic, route = %route, "Routing match");
		Some(RouteMatch { route, value })
	}

	/// Like [`match_route`](Self::match_route), but the guard allows
	/// mutating the matched value in place.
	pub fn match_route_mut(
		&self,
		topic: &str,
	) -> Option<RouteMatch<MappedRwLockWriteGuard<'_, T>>> {
		let topic = TopicPath::new(topic);
		let protect = self.settings.protect_system_topics;
		let mut route = String::new();
		let value = RwLockWriteGuard::try_map(self.root.write(), |root| {
			let matched = root
				.find_first(&topic, protect, |_| true)
				.map(|(matched, _)| matched)?;
			route = route_from_segments(&matched);
			root.node_mut(&matched)?.data_mut().as_mut()
		})
		.ok()?;
		trace!(topic = %topic, route = %route, "Routing match for update");
		Some(RouteMatch { route, value })
	}

	/// Every pattern matching `topic`, not just the best one.
	///
	/// Ordered depth-first, literal before `+` before `#` at each level.
	pub fn match_all(&self, topic: &str) -> Vec<RouteMatch<T>>
	where
		T: Clone,
	{
		let topic = TopicPath::new(topic);
		let root = self.root.read_recursive();
		let matches: Vec<_> = root
			.collect_matches(&topic, self.settings.protect_system_topics, |_| {
				true
			})
			.into_iter()
			.map(|(matched, value)| RouteMatch {
				route: route_from_segments(&matched),
				value: value.clone(),
			})
			.collect();
		trace!(topic = %topic, routes = matches.len(), "Routing fan-out");
		matches
	}

	/// Visits every node ever created, in pre-order.
	///
	/// `path` is in pattern form (`a/+/c`, `""` for the root) and `value`
	/// is `None` for nodes that only exist as a path prefix. A shared lock
	/// is held for the whole walk: `visit` may read this index but must not
	/// write to it.
	pub fn walk<F>(&self, mut visit: F)
	where
		F: FnMut(&str, Option<&T>),
	{
		let root = self.root.read_recursive();
		root.walk(&mut |segments: &[TopicSegment], value: Option<&T>| {
			visit(&join_segments(segments), value)
		});
	}

	/// Number of patterns holding a value
	pub fn len(&self) -> usize {
		self.root.read_recursive().count(&|_: &T| true)
	}

	/// True if no pattern holds a value
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl<T: fmt::Display> fmt::Display for RoutingIndex<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.root
			.read_recursive()
			.render(f, &|value: &T, f: &mut fmt::Formatter<'_>| {
				write!(f, "{value}")
			})
	}
}

impl<T> fmt::Debug for RoutingIndex<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RoutingIndex")
			.field("len", &self.len())
			.field("settings", &self.settings)
			.finish()
	}
}
