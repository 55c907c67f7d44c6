//! Collaborator traits for the collections call agent
//!
//! The state machine talks to everything outside it through these traits so
//! that implementations can be swapped without touching the flow:
//!
//! ```text
//! Classification:
//!   - IntentClassifier: free text → PaymentStatus
//!
//! Lookup:
//!   - CustomerDirectory: phone → CustomerRecord (read-only)
//!
//! Text generation:
//!   - ResponseRenderer: optional rephrasing of canned replies
//!
//! Observability:
//!   - CallObserver: stage transitions and state snapshots
//! ```

mod classifier;
mod directory;
mod observer;
mod renderer;

pub use classifier::IntentClassifier;
pub use directory::CustomerDirectory;
pub use observer::CallObserver;
pub use renderer::{CannedRenderer, ResponseRenderer};
