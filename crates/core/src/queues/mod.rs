pub mod fifo_drop_oldest_queue;
pub mod isolated_forwarder;

pub use fifo_drop_oldest_queue::*;
pub use isolated_forwarder::*;

pub enum QueueKind {
    /// Bounded in-memory queue; a full queue evicts its oldest item.
    FifoDropOldest { capacity: usize },
    /// Dedicated channel drained by its own task, so a slow consumer never
    /// blocks the publisher.
    Isolated { output_buffer: usize },
}
