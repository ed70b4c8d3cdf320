pub mod loader;
pub mod lookup;
pub mod metrics;
pub mod schema;

pub use loader::*;
pub use metrics::*;
