//! Content domains.
//!
//! Each domain module declares its schema, builds its repository once behind
//! a `LazyLock`, and exposes thin query functions over it.

pub mod education;
pub mod labs;
pub mod oncology;
pub mod regions;

/// Shorthand for authoring ordered string lists.
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
