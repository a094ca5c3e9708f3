//! Topic handling module
//!
//! This module provides the building blocks of the index: segment
//! classification, pattern and topic normalization, and the matching trie.

// Submodules
pub mod error;
pub mod topic_matcher;
/// Registration pattern parsing and normalization
pub mod topic_pattern_path;
pub mod topic_path;
pub mod topic_segment;


// Re-export commonly used types for convenience
pub use error::PatternResult;
// Re-export constants and validation utilities
pub use error::{limits, validation};
pub use topic_matcher::TopicMatcherNode;
pub use topic_path::TopicPath;
pub use topic_pattern_path::TopicPatternPath;
pub use topic_segment::{TopicPatternError, TopicSegment};
