mod as_value;
mod client;
mod condition;
mod dialect;
mod document;
mod error;
mod executor;
mod field;
mod migration;
mod options;
mod order;
mod query;
mod row;
mod statement;
mod tx;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use client::*;
pub use condition::*;
pub use dialect::*;
pub use document::*;
pub use error::*;
pub use executor::*;
pub use field::*;
pub use migration::*;
pub use options::*;
pub use order::*;
pub use query::*;
pub use row::*;
pub use statement::*;
pub use tx::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;
pub use ::serde;
pub use ::serde_json;
pub use ::time;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
