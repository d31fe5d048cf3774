use crate::error::Result;

/// The completed value a timeline reports once its device has been removed.
pub const LOST_VALUE: u64 = u64::MAX;

/// A monotonically increasing counter that the GPU advances as it finishes
/// submitted work.
///
/// On Direct3D 12 this is a fence paired with the queue that signals it and
/// an event the CPU blocks on.
pub trait Timeline {
    /// Schedules the counter to reach `value` once all work submitted so far
    /// has completed.
    fn signal(&self, value: u64) -> Result<()>;

    /// The last value the GPU has reached.
    fn completed_value(&self) -> u64;

    /// Blocks the calling thread until `completed_value() >= value`.
    fn wait(&self, value: u64) -> Result<()>;

    fn is_complete(&self, value: u64) -> bool {
        self.completed_value() >= value
    }

    /// A lost timeline reports every value as complete, so callers check this
    /// before trusting [`Timeline::is_complete`].
    fn is_lost(&self) -> bool {
        self.completed_value() == LOST_VALUE
    }
}
