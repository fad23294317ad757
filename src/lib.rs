// Library root — the binaries in src/main.rs and src/bin/ are thin wrappers.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod logger;
pub mod payment;

#[cfg(test)]
mod test_support;
