//! Module-level documentation for the courier core modules.

pub mod core_dispatch;
