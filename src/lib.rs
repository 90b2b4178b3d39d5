//! Bookshelf application library
//!
//! Feature modules mounted by the bookshelf server, plus the router assembly
//! shared by the binary and the integration tests.

pub mod modules;

use std::sync::Arc;

use axum::Router;
use bookshelf_db::BookStore;
use bookshelf_kernel::{settings::Settings, ModuleRegistry};

/// Re-export commonly used types
pub use modules::*;

/// Registry with every application module wired to `store`.
pub fn build_registry(store: Arc<dyn BookStore>) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store)?;
    Ok(registry)
}

/// Complete HTTP application for `store`, as served by the binary.
pub fn app(store: Arc<dyn BookStore>, settings: &Settings) -> anyhow::Result<Router> {
    let registry = build_registry(store)?;
    Ok(bookshelf_http::build_router(&registry, settings))
}
