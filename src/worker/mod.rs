//! Background Worker Module
//!
//! Hosts the partitioner behind an isolated, message-passing execution context so
//! large-array scans never run on the caller's task.
//!
//! ## Architecture Overview
//! The worker follows a **request/reply** model with explicit correlation:
//! 1. **Submission**: Callers enqueue a `ShardJob` carrying an action name, a
//!    self-contained payload (the full groups collection and shard size travel
//!    with each message), and a fresh correlation id.
//! 2. **Execution**: A dedicated task drains the job queue and dispatches on the
//!    action name. Unknown actions come back as typed error payloads, never as a
//!    fault thrown across the boundary.
//! 3. **Correlation**: Replies are matched to waiters by request id, so multiple
//!    in-flight requests cannot be confused even when replies arrive out of order.
//! 4. **Fallback**: If the worker context is unavailable, the caller logs a
//!    warning and computes the result synchronously in-thread (degraded, not
//!    fatal).
//!
//! ## Submodules
//! - **`protocol`**: Action names and the job/reply/payload DTOs.
//! - **`executor`**: The worker task, the reply dispatcher, and the typed
//!   client-side helpers.

pub mod executor;
pub mod protocol;

#[cfg(test)]
mod tests;
