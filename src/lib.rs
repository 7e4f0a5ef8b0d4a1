pub mod config;
pub mod models;
pub mod parsing;
pub mod pipeline;
pub mod scoring;
pub mod screener;
pub mod sources;
#[cfg(test)]
pub mod test_helpers;
