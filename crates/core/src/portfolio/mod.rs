pub mod composition;
pub mod performance;
pub mod risk;
pub mod snapshot;
pub mod valuation;

pub use composition::*;
pub use performance::*;
pub use risk::*;
pub use snapshot::*;
pub use valuation::*;
