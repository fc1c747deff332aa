mod documents;
mod mock;
mod scenarios;

pub use documents::*;
pub use mock::*;

use jdb::Dialect;
use log::LevelFilter;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Data source names a dialect accepts, one opened read-write and one read-only.
#[derive(Debug, Clone, Copy)]
pub struct DataSources<'a> {
    pub read_write: &'a str,
    pub read_only: &'a str,
}

/// Shared scenarios every dialect has to pass.
pub async fn execute_tests(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    scenarios::insert(dialect, sources).await;
    scenarios::get(dialect, sources).await;
    scenarios::filter(dialect, sources).await;
    scenarios::update(dialect, sources).await;
    scenarios::delete(dialect, sources).await;
    scenarios::count(dialect, sources).await;
    scenarios::read_only(dialect, sources).await;
    scenarios::errors(dialect, sources).await;
    scenarios::now(dialect, sources).await;
    if dialect.migrations().is_some() {
        scenarios::migrate(dialect, sources).await;
    }
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
