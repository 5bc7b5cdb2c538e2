pub mod lookup;
pub mod store;
pub mod tracker;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use lookup::{lookup_rank, position_in_page, PageQuery, RankSearcher, SerpApiSearcher};
pub use store::{Document, DomainStore, JsonFileStore, MemoryStore};
pub use tracker::Tracker;
