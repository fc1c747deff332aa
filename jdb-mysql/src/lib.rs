mod dialect;
mod migration;

pub use dialect::*;
pub use migration::*;

use jdb_core::register_dialect;
use std::sync::Once;

pub const NAME: &str = "mysql";

pub static DIALECT: MySqlDialect = MySqlDialect::new();

/// Makes the dialect available to `Client::open` under [`NAME`], calling it again is a no-op.
pub fn register() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| register_dialect(NAME, &DIALECT));
}
