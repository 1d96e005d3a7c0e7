pub mod fetch;
pub mod models;
pub mod scraping;
pub mod storage;
pub mod utils;

pub use models::{CardStub, EventRecord};
pub use scraping::{list_sources, run_all, run_source, SourceReport};
