//! Property-based tests for stripping and merge ordering guarantees

mod merge_order;
