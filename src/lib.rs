//! # curby-gateway
//!
//! Admin REST gateway and typed data-access layer for the Curby local
//! marketplace. Every entity shares one generic contract (`id`,
//! `created_at`, `updated_at` plus a per-field metadata descriptor), and
//! one generic store implements CRUD and declarative querying for all of
//! them — requests are validated against the metadata locally and fail
//! fast before any SQL is produced.
//!
//! ## Architecture
//!
//! ```text
//! Admin clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── Admin auth gate (api/auth)
//!     │
//!     ├── ModerationService, BroadcastService (service/)
//!     │
//!     ├── EntityStore<T> (store/)
//!     ├── Query builder (query/)
//!     ├── Entity descriptors (schema/)
//!     │
//!     └── PostgreSQL (sqlx)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod entities;
pub mod error;
pub mod query;
pub mod schema;
pub mod service;
pub mod store;
