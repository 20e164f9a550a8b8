//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (rules engines, databases, notification sinks).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │  Rules  │            │   Store     │              │ Notifier  │
//! │ Adapter │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```

pub mod outbound;
