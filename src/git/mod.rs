pub mod extractor;
pub mod locator;
pub mod parser;
pub mod runner;

pub use extractor::{CommitExtractor, lookback_start};
pub use runner::{GitCli, GitRunner, LogQuery};
