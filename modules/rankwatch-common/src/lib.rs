pub mod config;
pub mod domain;
pub mod error;
pub mod types;

pub use config::Config;
pub use domain::normalize_domain;
pub use error::{RankWatchError, Result};
pub use types::*;
