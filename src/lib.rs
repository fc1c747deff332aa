//! Document storage on top of relational databases.
//!
//! Every document lives in one table as a row with a kind, an id, an optional parent, four
//! indexed keys and a JSON payload holding the remaining fields. Statements are composed with
//! immutable builders and a condition algebra, compiled by a [`Dialect`] and run on an
//! [`Executor`] owned by the caller.
//!
//! The kind, id and parent fields of a document hold text:
//!
//! ```
//! use jdb::Document;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize, Document)]
//! struct Note {
//!     #[jdb(id)]
//!     id: String,
//!     #[jdb(parent_kind)]
//!     parent_kind: Option<String>,
//!     #[jdb(parent_id)]
//!     parent_id: Option<String>,
//!     text: String,
//! }
//! ```
//!
//! Any other type is rejected when the document is derived:
//!
//! ```compile_fail
//! use jdb::Document;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize, Document)]
//! struct Note {
//!     #[jdb(id)]
//!     id: i64,
//!     text: String,
//! }
//! ```

pub use jdb_core::*;
pub use jdb_macros::Document;
