//! Terminology & profile store
//!
//! Loads the conformance artifact set (structure definitions, code systems,
//! value sets, naming systems) named by a startup index into four in-memory
//! maps keyed by canonical URL. Built once, single-threaded, before
//! concurrent use begins; read-only afterward, so steady-state lookups need
//! no locking.
//!
//! A path listed in the index but absent at load time aborts startup — an
//! incomplete terminology set would silently produce wrong validation
//! results. After startup, a missed lookup is `None`, never an error.

pub mod error;
mod index;
mod store;

pub use error::{Result, StoreError};
pub use index::parse_index;
pub use store::{ArtifactKind, ArtifactRef, TerminologyStore};
