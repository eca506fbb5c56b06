//! chainview-core — domain model for the ChainView indexing core.
//!
//! # Architecture
//!
//! ```text
//! raw block data (model) → parsers → Command sequence
//!                                        │ (business validation, external)
//!                                        ▼
//!                    Event sequence ← EventRegistry (encode/decode)
//!                                        │
//!                                        ▼
//!                    projections replay events into SQL views
//! ```

pub mod command;
pub mod error;
pub mod event;
pub mod model;
pub mod registry;

pub use command::Command;
pub use error::RegistryError;
pub use event::Event;
pub use registry::EventRegistry;
