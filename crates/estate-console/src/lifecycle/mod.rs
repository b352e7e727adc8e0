//! # System Lifecycle
//!
//! Starts one [`ResourceStore`](list_controller::ResourceStore) task per record type and
//! stops them again.
//!
//! ## Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of each channel
//! 2. **Stores detect closure** - `receiver.recv()` returns `None`
//! 3. **Await completion** - wait for every store task to finish
//!
//! Controllers hold clones of the clients, so drop the pages before calling
//! [`ConsoleSystem::shutdown`] or it will wait for them.
//!
//! ## Tracing
//!
//! [`setup_tracing`] installs the subscriber once per process:
//!
//! ```bash
//! RUST_LOG=info cargo run      # Fetches, saves, deletes
//! RUST_LOG=debug cargo run     # Queries, payloads, guard decisions
//! ```

pub mod console_system;
pub mod tracing;

pub use self::console_system::ConsoleSystem;
pub use self::tracing::setup_tracing;
