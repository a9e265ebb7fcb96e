pub mod client;

#[cfg(test)]
pub mod testing;

pub use client::HttpFetcher;
