//! Flutter-facing bindings for the Do It Now core.

pub mod api;
