//! Session-local state and the messages that mutate it.

pub mod messages;
pub mod state;
