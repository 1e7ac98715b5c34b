pub mod aggregate;
pub mod isp;

#[cfg(test)]
mod index_tests;

pub use aggregate::*;
pub use isp::*;
