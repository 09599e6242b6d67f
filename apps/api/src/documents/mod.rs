// Document persistence: the store trait and its Postgres and in-memory
// implementations, the draft session controller with its debounce
// scheduler, and the HTTP handlers.

pub mod handlers;
pub mod memory;
pub mod scheduler;
pub mod session;
pub mod store;
