//! HTTP API Module
//!
//! The thin surface between the rendering layer and the shard manager: ingest a
//! dataset, navigate pages, and read the render-ready state. All algorithmic
//! content lives in `sharding`, `worker`, `store`, and `pager`; this module only
//! translates HTTP requests into calls on those components.

pub mod handlers;
pub mod protocol;
