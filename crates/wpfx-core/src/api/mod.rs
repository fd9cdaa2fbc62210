//! API implementation submodules.
//!
//! Each submodule contains `impl WpfxApi` blocks that extend the public API
//! with domain-specific methods. The struct definition remains in `lib.rs`.

mod apps;
mod builder;
mod discovery;
mod settings;

pub use builder::WpfxApiBuilder;
