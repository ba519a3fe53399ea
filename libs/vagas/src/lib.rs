//! # estagios-vagas
//!
//! Job posting ("vaga") records and the workflow that creates, lists,
//! updates and deletes them.
//!
//! ## Layers
//!
//! - [`field`]: one normalize-or-reject rule per posting field
//! - [`form`]: runs every field rule over a submission and collects errors
//! - [`store`]: the record store contract plus an in-memory store
//! - [`workflow`]: maps actions to validation and store calls and picks the
//!   next view
//!
//! ## Guarantees
//!
//! - A posting that fails any field rule is never written to the store
//! - Updates replace the whole record; a rejected edit changes nothing
//! - Unknown ids never raise errors; they fall back to an empty or list view
//! - Store ids are never reused

pub mod field;
pub mod form;
pub mod posting;
pub mod store;
pub mod workflow;

pub use field::{Field, FieldDescriptor, FieldError, FieldErrorKind, FieldRule};
pub use form::{BoundForm, ErrorSet, PostingForm, Submission};
pub use posting::{Posting, PostingFields, PostingId};
pub use store::{MemoryStore, RecordStore, StoreError};
pub use workflow::{Action, Mode, Request, Transition, View, WorkflowController, EMPTY_STATE};
