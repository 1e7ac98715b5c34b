pub mod models;
pub mod signals;
pub mod summary;

pub use models::*;
pub use signals::*;
pub use summary::*;
