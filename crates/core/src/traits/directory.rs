//! Customer lookup trait

use crate::customer::CustomerRecord;

/// Read-only customer lookup consulted once at call start.
///
/// The state machine never writes customer records; it copies the record it
/// is given into the call state.
pub trait CustomerDirectory: Send + Sync {
    /// Find the customer reachable at `phone`
    fn find_by_phone(&self, phone: &str) -> Option<CustomerRecord>;
}
