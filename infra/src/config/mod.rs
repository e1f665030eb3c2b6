//! Layered configuration loading
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults for the detected environment
//! 2. `micro-shop.toml`, then the environment-specific file
//!    (`micro-shop.<env>.toml`), or one explicitly named file
//! 3. `MICRO_SHOP__*` environment variables (`__` separates nesting levels)

mod loader;

pub use loader::ConfigLoader;
