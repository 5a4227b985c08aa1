//! Interactive command console.
//!
//! # Data Flow
//! ```text
//! input line
//!     → command.rs (parse, case-insensitive keywords)
//!     → repl.rs (one SnapshotStore::current() per view,
//!                on-demand virtual server fetch)
//!     → render.rs (text)
//!     → output
//!
//! poller events → repl.rs prints STATE CHANGE between prompts
//! ```

pub mod command;
pub mod render;
pub mod repl;

pub use command::{Command, COMMANDS};
pub use repl::{Console, ExitReason};
