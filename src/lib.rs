#![warn(
    clippy::pedantic,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rust_2021_compatibility
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

//! `class_check` verifies the event stream produced while traversing a JVM
//! class: a class producer (a byte-level reader or an in-memory builder)
//! drives a chain of [`visitor`] trait objects, and the [`checker`] adapters
//! in this crate can be inserted anywhere in that chain to confirm — purely
//! from the sequence and arguments of the events it receives — that the
//! producer is well-formed with respect to the JVM class-file specification.
//!
//! This crate does not parse or write class-file bytes, and it does not run
//! a full JVM verifier with class-hierarchy lookups: those are external
//! collaborators. What it owns is the checker state machines, the
//! descriptor/signature/internal-name grammars they lean on, and the
//! interface by which a method checker can hand a fully-accumulated method
//! to a pluggable dataflow verifier.
//! ## Features
#![doc = document_features::document_features!()]

pub mod checker;
pub mod error;
pub mod jvm;
pub mod types;
pub mod visitor;

#[cfg(test)]
pub(crate) mod tests;

pub use error::{CheckError, CheckResult, ErrorKind};

/// The API version a visitor chain negotiates with its checkers.
///
/// Methods on a visitor trait marked `#[unstable]` (record components,
/// permitted subclasses) require [`ApiVersion::V25`] or above; calling them
/// at a lower version is rejected with [`ErrorKind::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApiVersion {
    /// The baseline API: class, field, method, module and annotation events.
    V9,
    /// Adds record components and nest-mate/permitted-subclass events.
    V25,
}

impl ApiVersion {
    /// The minimum API version required to call an experimental visitor method.
    pub const EXPERIMENTAL_FLOOR: Self = Self::V25;
}

/// The class file major version (low 16 bits of the 32-bit version word),
/// used to gate version-dependent checker rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassVersion {
    /// The major version, e.g. `52` for Java 8.
    pub major: u16,
    /// The minor version.
    pub minor: u16,
}

impl ClassVersion {
    /// Java 1.5 (49.0): the first version to allow `invokedynamic`-adjacent
    /// constructs like a `LDC` of a `Class`/array type.
    pub const JAVA_5: Self = Self::of(49);
    /// Java 1.7 (51.0): the first version to allow `LDC` of a method type or
    /// method handle.
    pub const JAVA_7: Self = Self::of(51);
    /// Java 1.8 (52.0): the first version to allow `INVOKESPECIAL` on an
    /// interface.
    pub const JAVA_8: Self = Self::of(52);
    /// Java 9 (53.0): the first version with module-info classes.
    pub const JAVA_9: Self = Self::of(53);
    /// Java 10 (54.0): the version after which `requires java.base` may not
    /// set `transitive`/`static_phase`.
    pub const JAVA_10: Self = Self::of(54);
    /// Java 11 (55.0): the first version to allow a dynamically-computed
    /// constant (`constantdynamic`) as an `LDC` operand.
    pub const JAVA_11: Self = Self::of(55);

    /// Constructs a version with the given major and a zero minor.
    #[must_use]
    pub const fn of(major: u16) -> Self {
        Self { major, minor: 0 }
    }
}
