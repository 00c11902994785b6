//! HTTP transport layer: `ZaboHttp` plus cursor pagination.

pub mod client;
pub mod pagination;

pub use client::ZaboHttp;
pub use pagination::{ListCursor, ListEnvelope, Paginator};
