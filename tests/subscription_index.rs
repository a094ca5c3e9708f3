//! Integration tests for the subscription index
//!
//! Exercises shared/queued prefix handling, handler accumulation and
//! the first-match and fan-out lookups used when delivering messages.

use mqtt_topic_index::{
	IndexSettings, SubscriptionError, SubscriptionIndex, SubscriptionKind,
	TopicPatternError,
};

#[cfg(test)]
mod registration_tests {
	use super::*;

	#[test]
	fn test_shared_subscription_matches_stripped_pattern() {
		let index = SubscriptionIndex::new();
		let sub = index.register("$share/g1/a/+/b", "h1").unwrap();

		assert!(sub.is_shared());
		assert_eq!(sub.group_name(), Some("g1"));
		assert_eq!(sub.match_pattern().as_str(), "a/+/b");
		assert_eq!(index.get("a/x/b").unwrap().as_slice(), ["h1"]);
		assert!(index.get("$share/g1/a/x/b").is_none());
	}

	#[test]
	fn test_shared_and_direct_share_a_node() {
		let index = SubscriptionIndex::new();
		index.register("a/+/b", "direct").unwrap();
		index.register("$share/g1/a/+/b", "shared").unwrap();
		index.register("$queue/a/+/b", "queued").unwrap();

		assert_eq!(
			index.get("a/x/b").unwrap().as_slice(),
			["direct", "shared", "queued"]
		);
		assert_eq!(index.len(), 1);
	}

	#[test]
	fn test_queue_subscription() {
		let index = SubscriptionIndex::new();
		let sub = index.register("$queue/jobs/#", 1).unwrap();

		assert_eq!(sub.kind(), &SubscriptionKind::Queue);
		assert_eq!(index.get("jobs/render/42").unwrap().as_slice(), [1]);
	}

	#[test]
	fn test_malformed_prefixes_are_rejected() {
		let index = SubscriptionIndex::new();
		for raw in ["$share/g1", "$share", "$share//a", "$queue", "$queue/"] {
			assert!(
				matches!(
					index.register(raw, "h"),
					Err(SubscriptionError::InvalidShareSubscription { .. })
				),
				"{raw} should be rejected"
			);
		}

		assert!(index.is_empty());
		let mut nodes = 0;
		index.walk(|_, _| nodes += 1);
		assert_eq!(nodes, 1);
	}

	#[test]
	fn test_hash_placement_rejected_without_side_effects() {
		let index = SubscriptionIndex::new();

		assert_eq!(
			index.register("a/#/c", "h").unwrap_err(),
			SubscriptionError::InvalidTopicPattern(
				TopicPatternError::hash_position("a/#/c")
			)
		);
		assert!(matches!(
			index.register("$share/g/a/#/b", "h"),
			Err(SubscriptionError::InvalidTopicPattern(_))
		));

		assert!(index.get("a/b/c").is_none());
		assert_eq!(index.handler_count(), 0);
	}

	#[test]
	fn test_limits_apply_to_stripped_pattern() {
		let settings = IndexSettings::default().with_max_pattern_depth(2);
		let index = SubscriptionIndex::with_settings(settings);

		assert!(index.register("$share/group/a/b", "h").is_ok());
		assert!(matches!(
			index.register("$queue/a/b/c", "h"),
			Err(SubscriptionError::InvalidTopicPattern(
				TopicPatternError::TooDeep { depth: 3, max: 2, .. }
			))
		));
	}

	#[test]
	fn test_error_messages() {
		let index = SubscriptionIndex::<u8>::new();
		let err = index.register("$share/g1", 0).unwrap_err();
		assert_eq!(
			err.to_string(),
			"Invalid shared subscription '$share/g1': expected \
			 $share/<group>/<topic filter>"
		);
	}
}

#[cfg(test)]
mod routing_tests {
	use super::*;

	#[test]
	fn test_handlers_accumulate_in_order() {
		let index = SubscriptionIndex::new();
		for handler in ["first", "second", "third"] {
			index.register("sensors/temp", handler).unwrap();
		}

		let handlers = index.get("sensors/temp").unwrap();
		assert_eq!(handlers.as_slice(), ["first", "second", "third"]);
		assert_eq!(index.len(), 1);
		assert_eq!(index.handler_count(), 3);
	}

	#[test]
	fn test_first_match_prefers_exact() {
		let index = SubscriptionIndex::new();
		index.register("a/#", "multi").unwrap();
		index.register("a/+/c", "single").unwrap();
		index.register("a/b/c", "exact").unwrap();

		let matched = index.match_route("a/b/c").unwrap();
		assert_eq!(matched.route, "/a/b/c");
		assert_eq!(matched.value.as_slice(), ["exact"]);

		assert_eq!(index.get("a/q/c").unwrap().as_slice(), ["single"]);
		assert_eq!(index.get("a/q").unwrap().as_slice(), ["multi"]);
		assert!(index.get("a").is_none());
	}

	#[test]
	fn test_empty_handler_lists_are_skipped() {
		let index = SubscriptionIndex::new();
		index.set("a/b", |_| {}).unwrap();
		index.register("a/+", "fallback").unwrap();

		let matched = index.match_route("a/b").unwrap();
		assert_eq!(matched.route, "/a/+");
		assert_eq!(matched.value.as_slice(), ["fallback"]);
		assert_eq!(index.len(), 1);
	}

	#[test]
	fn test_set_exposes_handler_list() {
		let index = SubscriptionIndex::new();
		index.register("a", 1).unwrap();
		index
			.set("a", |handlers| {
				assert_eq!(handlers.len(), 1);
				handlers.push(2);
			})
			.unwrap();

		assert_eq!(index.get("a").unwrap().as_slice(), [1, 2]);
	}

	#[test]
	fn test_fan_out_collects_every_match() {
		let index = SubscriptionIndex::new();
		index.register("home/#", "logger").unwrap();
		index.register("home/+/temperature", "thermostat").unwrap();
		index.register("home/kitchen/temperature", "display").unwrap();
		index.register("$share/ui/home/kitchen/temperature", "panel").unwrap();
		index.register("office/#", "unrelated").unwrap();

		let routes: Vec<_> = index
			.route_all("home/kitchen/temperature")
			.into_iter()
			.map(|m| (m.route, m.value.to_vec()))
			.collect();
		assert_eq!(
			routes,
			[
				("/home/kitchen/temperature".to_string(), vec!["display", "panel"]),
				("/home/+/temperature".to_string(), vec!["thermostat"]),
				("/home/#".to_string(), vec!["logger"]),
			]
		);

		assert_eq!(
			index.handlers("home/kitchen/temperature"),
			["display", "panel", "thermostat", "logger"]
		);
		assert!(index.route_all("garden").is_empty());
	}

	#[test]
	fn test_lookup_result_is_a_snapshot() {
		let index = SubscriptionIndex::new();
		index.register("a", "one").unwrap();

		let snapshot = index.get("a").unwrap();
		index.register("a", "two").unwrap();

		assert_eq!(snapshot.as_slice(), ["one"]);
		assert_eq!(index.get("a").unwrap().as_slice(), ["one", "two"]);
	}

	#[test]
	fn test_system_topics_need_literal_patterns() {
		let index = SubscriptionIndex::with_settings(
			IndexSettings::mqtt_compliant(),
		);
		index.register("#", "all").unwrap();
		index.register("+/uptime", "any-uptime").unwrap();
		index.register("$SYS/#", "sys").unwrap();

		assert_eq!(index.handlers("$SYS/uptime"), ["sys"]);
		assert_eq!(index.handlers("broker/uptime"), ["any-uptime", "all"]);
	}
}

#[cfg(test)]
mod introspection_tests {
	use super::*;

	#[test]
	fn test_walk_reports_handler_lists() {
		let index = SubscriptionIndex::new();
		index.register("a/b", 'x').unwrap();
		index.register("$share/g/a/b", 'y').unwrap();
		index.register("c", 'z').unwrap();

		let mut visited = Vec::new();
		index.walk(|path, handlers| {
			visited.push((path.to_string(), handlers.map_or(0, |h| h.len())));
		});

		let expected = [("", 0), ("a", 0), ("a/b", 2), ("c", 1)]
			.map(|(path, count)| (path.to_string(), count));
		assert_eq!(visited, expected);
	}

	#[test]
	fn test_display_counts_handlers() {
		let index = SubscriptionIndex::new();
		index.register("a/b", "x").unwrap();
		index.register("a/b", "y").unwrap();
		index.register("a/+", "z").unwrap();

		assert_eq!(
			index.to_string(),
			"/\n  a\n    b => 2 handlers\n    + => 1 handler"
		);
	}
}
