//! # Subscription Tree - MQTT Topic Index
//!
//! Builds a small broker-style subscription table and routes a few
//! published topics through it:
//! - Exact patterns win over `+`, and `+` over `#`
//! - `$share/<group>/…` and `$queue/…` subscriptions match like the bare pattern
//! - Fan-out returns every matching subscriber, first match returns one
//!
//! Run with `RUST_LOG=mqtt_topic_index=debug` to see registrations logged.

use mqtt_topic_index::{IndexSettings, SubscriptionIndex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Subscriber handle stored in the index
#[derive(Clone, Debug)]
struct Client {
	id: &'static str,
}

/// Setup tracing from RUST_LOG, staying silent when it is unset
fn setup_tracing() {
	if std::env::var("RUST_LOG").is_err() {
		return;
	}
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| "info".into());
	tracing_subscriber::registry()
		.with(filter)
		.with(
			tracing_subscriber::fmt::layer()
				.with_target(true)
				.with_thread_ids(false)
				.compact(),
		)
		.init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	setup_tracing();

	let index = SubscriptionIndex::with_settings(IndexSettings::mqtt_compliant());

	// === 1. REGISTRATION ===
	let subscriptions = [
		("home/+/temperature", "thermostat"),
		("home/kitchen/temperature", "kitchen-display"),
		("home/#", "audit-log"),
		("$share/dashboards/home/+/temperature", "dashboard-a"),
		("$share/dashboards/home/+/temperature", "dashboard-b"),
		("$queue/jobs/#", "job-runner"),
		("$SYS/#", "monitoring"),
	];
	for (pattern, id) in subscriptions {
		let sub = index.register(pattern, Client { id })?;
		println!(
			"{:<40} -> {:<28} group={:?} queue={}",
			sub.raw_pattern(),
			sub.match_pattern().as_str(),
			sub.group_name(),
			sub.is_queue()
		);
	}

	// Malformed subscriptions are rejected without touching the tree
	for bad in ["$share/dashboards", "home/#/temperature"] {
		if let Err(err) = index.register(bad, Client { id: "rejected" }) {
			println!("rejected {bad:?}: {err}");
		}
	}

	println!("\nSubscription tree ({} patterns):\n{index}\n", index.len());

	// === 2. ROUTING ===
	for topic in [
		"home/kitchen/temperature",
		"home/garage/temperature",
		"home/garage/door",
		"jobs/render/42",
		"$SYS/broker/uptime",
		"garden/soil",
	] {
		let best = index
			.match_route(topic)
			.map(|m| (m.route, ids(&m.value)));
		let all = ids(&index.handlers(topic));
		println!("{topic:<28} best={best:?}\n{:<28} all={all:?}", "");
	}

	Ok(())
}

fn ids(clients: &[Client]) -> Vec<&'static str> {
	clients.iter().map(|c| c.id).collect()
}
