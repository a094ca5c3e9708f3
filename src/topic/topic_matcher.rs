#![allow(clippy::missing_docs_in_private_items)]
#![allow(missing_docs)]
use std::collections::HashMap;
use std::fmt;

use arcstr::Substr;
use smallvec::SmallVec;

use super::topic_path::{SegmentVec, TopicPath};
use super::topic_pattern_path::TopicPatternPath;
use super::topic_segment::TopicSegment;

/// Pattern segments leading from the root to a matched node.
pub type MatchedRoute = SegmentVec<TopicSegment>;

/// Child reachable from a node for one topic segment, tagged with the
/// pattern segment that leads to it.
pub type Candidate<'a, T> = (TopicSegment, &'a TopicMatcherNode<T>);

/// Node in the topic matching tree that represents a part of the pattern
/// path. Used internally by the routing and subscription indexes.
#[derive(Debug)]
pub struct TopicMatcherNode<T> {
	/// Registration payload stored at this exact path
	data: Option<T>,

	/// Children nodes for exact matches of next segment
	exact_children: HashMap<Substr, TopicMatcherNode<T>>,

	/// Node for '+' pattern wildcard match (single segment)
	single_level_wildcard_node: Option<Box<TopicMatcherNode<T>>>,

	/// Terminal node for '#' pattern wildcard match (one or more segments)
	multi_level_wildcard_node: Option<Box<TopicMatcherNode<T>>>,
}

impl<T> Default for TopicMatcherNode<T> {
	fn default() -> Self {
		Self::new()
	}
}

/// `$`-prefixed first segments skip root-level wildcards when protection is
/// enabled.
fn wildcards_allowed(segment: &str, depth: usize, protect: bool) -> bool {
	!(protect && depth == 0 && segment.starts_with('$'))
}

impl<T> TopicMatcherNode<T> {
	/// Creates a new empty topic matcher node
	pub fn new() -> Self {
		Self {
			data: None,
			exact_children: HashMap::new(),
			single_level_wildcard_node: None,
			multi_level_wildcard_node: None,
		}
	}

	pub fn data(&self) -> Option<&T> {
		self.data.as_ref()
	}

	pub fn data_mut(&mut self) -> &mut Option<T> {
		&mut self.data
	}

	/// Finds or creates the node addressed by a validated pattern.
	///
	/// Every node on the way is created lazily; nothing is ever removed.
	pub fn get_or_create_node(
		&mut self,
		topic_path: &TopicPatternPath,
	) -> &mut Self {
		let mut current_node = self;

		for segment in topic_path.iter() {
			current_node = match segment {
				| TopicSegment::Literal(s) => {
					current_node.exact_children.entry(s.clone()).or_default()
				}
				| TopicSegment::Single => current_node
					.single_level_wildcard_node
					.get_or_insert_with(Default::default)
					.as_mut(),
				| TopicSegment::Multi => current_node
					.multi_level_wildcard_node
					.get_or_insert_with(Default::default)
					.as_mut(),
			};
		}
		current_node
	}

	/// Walks an existing route without creating anything.
	pub fn node_mut(&mut self, route: &[TopicSegment]) -> Option<&mut Self> {
		let mut current_node = self;
		for segment in route {
			current_node = match segment {
				| TopicSegment::Literal(s) => {
					current_node.exact_children.get_mut(s)?
				}
				| TopicSegment::Single => {
					current_node.single_level_wildcard_node.as_deref_mut()?
				}
				| TopicSegment::Multi => {
					current_node.multi_level_wildcard_node.as_deref_mut()?
				}
			};
		}
		Some(current_node)
	}

	/// Children to descend into for `segment`, in priority order:
	/// exact literal, then `+`, then `#`.
	pub fn candidate_children(
		&self,
		segment: &Substr,
		allow_wildcards: bool,
	) -> SmallVec<[Candidate<'_, T>; 3]> {
		let mut candidates = SmallVec::new();
		if let Some((key, child)) = self.exact_children.get_key_value(segment) {
			candidates.push((TopicSegment::Literal(key.clone()), child));
		}
		if allow_wildcards {
			if let Some(child) = &self.single_level_wildcard_node {
				candidates.push((TopicSegment::Single, child.as_ref()));
			}
			if let Some(child) = &self.multi_level_wildcard_node {
				candidates.push((TopicSegment::Multi, child.as_ref()));
			}
		}
		candidates
	}

	/// Depth-first search returning the first node whose data passes
	/// `accept`, together with the route that reached it.
	pub fn find_first<F>(
		&self,
		topic: &TopicPath,
		protect_system_topics: bool,
		accept: F,
	) -> Option<(MatchedRoute, &T)>
	where
		F: Fn(&T) -> bool,
	{
		let mut route = MatchedRoute::new();
		let data = self.find_first_internal(
			topic.segments(),
			0,
			protect_system_topics,
			&accept,
			&mut route,
		)?;
		Some((route, data))
	}

	fn find_first_internal<'a, F>(
		&'a self,
		topic: &[Substr],
		depth: usize,
		protect: bool,
		accept: &F,
		route: &mut MatchedRoute,
	) -> Option<&'a T>
	where
		F: Fn(&T) -> bool,
	{
		match topic {
			| [] => self.data.as_ref().filter(|data| accept(*data)),
			| [segment, remaining_segments @ ..] => {
				let allow = wildcards_allowed(segment, depth, protect);
				for (step, child) in self.candidate_children(segment, allow) {
					let consumes_rest = matches!(step, TopicSegment::Multi);
					route.push(step);
					let found = if consumes_rest {
						child.data.as_ref().filter(|data| accept(*data))
					} else {
						child.find_first_internal(
							remaining_segments,
							depth + 1,
							protect,
							accept,
							route,
						)
					};
					if found.is_some() {
						return found;
					}
					route.pop();
				}
				None
			}
		}
	}

	/// Collects every node whose data passes `accept`.
	///
	/// Results are ordered by depth-first traversal, trying the literal
	/// branch before `+` before `#` at each level.
	pub fn collect_matches<F>(
		&self,
		topic: &TopicPath,
		protect_system_topics: bool,
		accept: F,
	) -> Vec<(MatchedRoute, &T)>
	where
		F: Fn(&T) -> bool,
	{
		let mut matching_data = Vec::new();
		self.collect_matches_internal(
			topic.segments(),
			0,
			protect_system_topics,
			&accept,
			&mut MatchedRoute::new(),
			&mut matching_data,
		);
		matching_data
	}

	fn collect_matches_internal<'a, F>(
		&'a self,
		topic: &[Substr],
		depth: usize,
		protect: bool,
		accept: &F,
		route: &mut MatchedRoute,
		matching_data: &mut Vec<(MatchedRoute, &'a T)>,
	) where
		F: Fn(&T) -> bool,
	{
		match topic {
			| [] => {
				// At end of path, collect data from this node if present
				if let Some(data) = self.data.as_ref().filter(|d| accept(*d)) {
					matching_data.push((route.clone(), data));
				}
			}
			| [segment, remaining_segments @ ..] => {
				let allow = wildcards_allowed(segment, depth, protect);
				for (step, child) in self.candidate_children(segment, allow) {
					let consumes_rest = matches!(step, TopicSegment::Multi);
					route.push(step);
					if consumes_rest {
						if let Some(data) =
							child.data.as_ref().filter(|d| accept(*d))
						{
							matching_data.push((route.clone(), data));
						}
					} else {
						child.collect_matches_internal(
							remaining_segments,
							depth + 1,
							protect,
							accept,
							route,
							matching_data,
						);
					}
					route.pop();
				}
			}
		}
	}

	/// Pre-order traversal of every node, literal children in sorted order.
	pub fn walk<F>(&self, f: &mut F)
	where
		F: FnMut(&[TopicSegment], Option<&T>),
	{
		self.walk_internal(&mut MatchedRoute::new(), f);
	}

	fn walk_internal<F>(&self, path: &mut MatchedRoute, f: &mut F)
	where
		F: FnMut(&[TopicSegment], Option<&T>),
	{
		f(path.as_slice(), self.data.as_ref());
		for (segment, child) in self.sorted_exact_children() {
			path.push(TopicSegment::Literal(segment.clone()));
			child.walk_internal(path, f);
			path.pop();
		}
		if let Some(plus_node) = &self.single_level_wildcard_node {
			path.push(TopicSegment::Single);
			plus_node.walk_internal(path, f);
			path.pop();
		}
		if let Some(hash_node) = &self.multi_level_wildcard_node {
			path.push(TopicSegment::Multi);
			hash_node.walk_internal(path, f);
			path.pop();
		}
	}

	fn sorted_exact_children(&self) -> Vec<(&Substr, &Self)> {
		let mut children: Vec<_> = self.exact_children.iter().collect();
		children.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
		children
	}

	/// Counts nodes whose data passes `accept`.
	pub fn count<F>(&self, accept: &F) -> usize
	where
		F: Fn(&T) -> bool,
	{
		let own = usize::from(self.data.as_ref().is_some_and(accept));
		own + self
			.exact_children
			.values()
			.chain(self.single_level_wildcard_node.as_deref())
			.chain(self.multi_level_wildcard_node.as_deref())
			.map(|child| child.count(accept))
			.sum::<usize>()
	}

	/// Renders the tree shape, one node per line, indented by depth.
	///
	/// ```text
	/// /
	///   sensors
	///     + => 1
	///     # => 2
	/// ```
	pub fn render<F>(
		&self,
		f: &mut fmt::Formatter<'_>,
		render_data: &F,
	) -> fmt::Result
	where
		F: Fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
	{
		self.render_internal("/", 0, f, render_data)
	}

	fn render_internal<F>(
		&self,
		label: &str,
		depth: usize,
		f: &mut fmt::Formatter<'_>,
		render_data: &F,
	) -> fmt::Result
	where
		F: Fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
	{
		if depth > 0 {
			writeln!(f)?;
		}
		write!(f, "{:indent$}{label}", "", indent = depth * 2)?;
		if let Some(data) = &self.data {
			write!(f, " => ")?;
			render_data(data, f)?;
		}
		for (segment, child) in self.sorted_exact_children() {
			child.render_internal(segment, depth + 1, f, render_data)?;
		}
		if let Some(plus_node) = &self.single_level_wildcard_node {
			plus_node.render_internal("+", depth + 1, f, render_data)?;
		}
		if let Some(hash_node) = &self.multi_level_wildcard_node {
			hash_node.render_internal("#", depth + 1, f, render_data)?;
		}
		Ok(())
	}
}
