pub mod indicators;
pub mod metrics;
pub mod score;


pub use indicators::*;
pub use metrics::*;
pub use score::*;
