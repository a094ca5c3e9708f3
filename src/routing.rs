//! Pattern routing and subscription indexing module
//!
//! [`RoutingIndex`] maps patterns to one value each; [`SubscriptionIndex`]
//! keeps a list of handlers per pattern and understands the `$share` and
//! `$queue` subscription prefixes.

/// Routing and subscription error types
pub mod error;
pub mod handler_list;
pub mod routing_index;
/// Shared/queued subscription prefix parsing
pub mod subscription;
pub mod subscription_index;

// Re-export commonly used types for convenience
pub use error::SubscriptionError;
pub use handler_list::HandlerList;
pub use routing_index::{RouteMatch, RoutingIndex};
pub use subscription::{Subscription, SubscriptionKind};
pub use subscription_index::SubscriptionIndex;
