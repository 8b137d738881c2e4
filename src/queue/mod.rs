pub mod selection;

pub use selection::{ControlStates, ItemId, ItemPayload, ListKind, QueueItem, SelectionQueue};
