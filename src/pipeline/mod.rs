pub mod gesture;
pub mod projection;
pub mod snapshot;

// Re-exports for convenience
pub use gesture::{MalformedNamePolicy, evaluate_gestures};
pub use projection::{project_joint, project_snapshot};
pub use snapshot::{BodySlot, Snapshot};
