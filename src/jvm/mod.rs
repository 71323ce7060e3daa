//! Static, process-wide taxonomy of the JVM constructs the checker reasons
//! about: access flags, opcodes, method handles, stack-map frame elements.
//!
//! None of these types parse or write class-file bytes; they are the
//! read-only tables the checker state machines in [`crate::checker`] consult.

pub mod access_flags;
pub mod constant;
pub mod frame;
pub mod handle;
pub mod opcodes;
