pub mod coordinator;
pub mod debouncer;
pub mod normalize;
pub mod worker;

// Re-export public types
pub use coordinator::{Phase, QueryCoordinator, Settlement, SettlementOrigin};
pub use debouncer::Debouncer;
pub use normalize::{NormalizedQuery, normalize};
