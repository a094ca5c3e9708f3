//! Copy-on-append handler storage

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Handlers registered on one pattern, in registration order.
///
/// Cloning is a reference-count increment. Appending copies the backing
/// vector only while a clone handed out by a lookup is still alive, so a
/// snapshot returned from a route never changes underneath its holder.
pub struct HandlerList<H> {
	handlers: Arc<Vec<H>>,
}

impl<H> HandlerList<H> {
	/// Creates an empty list
	pub fn new() -> Self {
		Self {
			handlers: Arc::new(Vec::new()),
		}
	}

	/// Appends a handler
	pub fn push(&mut self, handler: H)
	where
		H: Clone,
	{
		Arc::make_mut(&mut self.handlers).push(handler);
	}

	/// Handlers as a slice
	pub fn as_slice(&self) -> &[H] {
		&self.handlers
	}

	/// True if both lists share the same backing storage
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.handlers, &other.handlers)
	}
}

impl<H> Default for HandlerList<H> {
	fn default() -> Self {
		Self::new()
	}
}

impl<H> Clone for HandlerList<H> {
	fn clone(&self) -> Self {
		Self {
			handlers: Arc::clone(&self.handlers),
		}
	}
}

impl<H> Deref for HandlerList<H> {
	type Target = [H];

	fn deref(&self) -> &Self::Target {
		&self.handlers
	}
}

impl<H> From<Vec<H>> for HandlerList<H> {
	fn from(handlers: Vec<H>) -> Self {
		Self {
			handlers: Arc::new(handlers),
		}
	}
}

impl<'a, H> IntoIterator for &'a HandlerList<H> {
	type Item = &'a H;
	type IntoIter = std::slice::Iter<'a, H>;

	fn into_iter(self) -> Self::IntoIter {
		self.handlers.iter()
	}
}

impl<H: fmt::Debug> fmt::Debug for HandlerList<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.handlers.iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_push_keeps_order() {
		let mut list = HandlerList::new();
		list.push("a");
		list.push("b");
		list.push("c");
		assert_eq!(list.as_slice(), ["a", "b", "c"]);
		assert_eq!(list.len(), 3);
	}

	#[test]
	fn test_snapshot_survives_append() {
		let mut list = HandlerList::new();
		list.push(1);
		let snapshot = list.clone();
		assert!(snapshot.ptr_eq(&list));

		list.push(2);
		assert_eq!(snapshot.as_slice(), [1]);
		assert_eq!(list.as_slice(), [1, 2]);
		assert!(!snapshot.ptr_eq(&list));
	}
}
