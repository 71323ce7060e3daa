//! Access-flag bit sets and the per-site admissible masks.
use bitflags::bitflags;

use crate::error::{CheckError, CheckResult};

bitflags! {
    /// The full access-flag bit set.
    ///
    /// The JVM overloads several bits depending on where they appear: bit
    /// `0x0020` is `super` on a class, `synchronized` on a method, `open` on
    /// a module and `transitive` on a `requires` directive. This type gives
    /// every overload its own name as an alias for the same bit, and
    /// [`Site::admissible`] is what actually disambiguates which aliases are
    /// legal where. `DEPRECATED` and `CONSTRUCTOR` are pseudo-bits outside
    /// the 16-bit range stored in the class file; they exist only so a
    /// renderer (the re-emitter) can carry synthesized-by-the-toolkit
    /// information alongside the real flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        /// `ACC_PUBLIC`.
        const PUBLIC = 0x0001;
        /// `ACC_PRIVATE`.
        const PRIVATE = 0x0002;
        /// `ACC_PROTECTED`.
        const PROTECTED = 0x0004;
        /// `ACC_STATIC`.
        const STATIC = 0x0008;
        /// `ACC_FINAL`.
        const FINAL = 0x0010;
        /// `ACC_SUPER` on a class.
        const SUPER = 0x0020;
        /// `ACC_SYNCHRONIZED` on a method.
        const SYNCHRONIZED = 0x0020;
        /// `ACC_OPEN` on a module.
        const OPEN = 0x0020;
        /// `ACC_TRANSITIVE` on a `requires` directive.
        const TRANSITIVE = 0x0020;
        /// `ACC_VOLATILE` on a field.
        const VOLATILE = 0x0040;
        /// `ACC_BRIDGE` on a method.
        const BRIDGE = 0x0040;
        /// `ACC_STATIC_PHASE` on a `requires` directive.
        const STATIC_PHASE = 0x0040;
        /// `ACC_TRANSIENT` on a field.
        const TRANSIENT = 0x0080;
        /// `ACC_VARARGS` on a method.
        const VARARGS = 0x0080;
        /// `ACC_NATIVE` on a method.
        const NATIVE = 0x0100;
        /// `ACC_INTERFACE` on a class or inner class.
        const INTERFACE = 0x0200;
        /// `ACC_ABSTRACT` on a class, method or inner class.
        const ABSTRACT = 0x0400;
        /// `ACC_STRICT` on a method.
        const STRICT = 0x0800;
        /// `ACC_SYNTHETIC`, admissible almost everywhere.
        const SYNTHETIC = 0x1000;
        /// `ACC_ANNOTATION` on a class or inner class.
        const ANNOTATION = 0x2000;
        /// `ACC_ENUM` on a class, field or inner class.
        const ENUM = 0x4000;
        /// `ACC_MODULE` on a class.
        const MODULE = 0x8000;
        /// `ACC_MANDATED` on a parameter, inner class or module directive.
        const MANDATED = 0x8000;
        /// Pseudo-bit: the element carries a `Deprecated` attribute.
        const DEPRECATED = 0x2_0000;
        /// Pseudo-bit: the method is `<init>` or `<clinit>`.
        const CONSTRUCTOR = 0x4_0000;
    }
}

/// A site at which an access-flag set is validated.
///
/// Each variant names its admissible mask via [`Site::admissible`] and a
/// human-readable name via [`Site::name`] used in [`CheckError`] messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    /// A top-level or nested class/interface header.
    Class,
    /// A field.
    Field,
    /// A method.
    Method,
    /// An `InnerClasses` entry.
    InnerClass,
    /// A `MethodParameters` entry.
    Parameter,
    /// A module (the `open` bit and pseudo bits).
    Module,
    /// A `requires` directive.
    ModuleRequires,
    /// An `exports` directive.
    ModuleExports,
    /// An `opens` directive.
    ModuleOpens,
}

impl Site {
    /// The bits that are legal to set at this site.
    #[must_use]
    pub const fn admissible(self) -> AccessFlags {
        match self {
            Self::Class => AccessFlags::PUBLIC
                .union(AccessFlags::FINAL)
                .union(AccessFlags::SUPER)
                .union(AccessFlags::INTERFACE)
                .union(AccessFlags::ABSTRACT)
                .union(AccessFlags::SYNTHETIC)
                .union(AccessFlags::ANNOTATION)
                .union(AccessFlags::ENUM)
                .union(AccessFlags::MODULE)
                .union(AccessFlags::DEPRECATED),
            Self::Field => AccessFlags::PUBLIC
                .union(AccessFlags::PRIVATE)
                .union(AccessFlags::PROTECTED)
                .union(AccessFlags::STATIC)
                .union(AccessFlags::FINAL)
                .union(AccessFlags::VOLATILE)
                .union(AccessFlags::TRANSIENT)
                .union(AccessFlags::SYNTHETIC)
                .union(AccessFlags::ENUM)
                .union(AccessFlags::DEPRECATED),
            Self::Method => AccessFlags::PUBLIC
                .union(AccessFlags::PRIVATE)
                .union(AccessFlags::PROTECTED)
                .union(AccessFlags::STATIC)
                .union(AccessFlags::FINAL)
                .union(AccessFlags::SYNCHRONIZED)
                .union(AccessFlags::BRIDGE)
                .union(AccessFlags::VARARGS)
                .union(AccessFlags::NATIVE)
                .union(AccessFlags::ABSTRACT)
                .union(AccessFlags::STRICT)
                .union(AccessFlags::SYNTHETIC)
                .union(AccessFlags::DEPRECATED)
                .union(AccessFlags::CONSTRUCTOR),
            Self::InnerClass => AccessFlags::PUBLIC
                .union(AccessFlags::PRIVATE)
                .union(AccessFlags::PROTECTED)
                .union(AccessFlags::STATIC)
                .union(AccessFlags::FINAL)
                .union(AccessFlags::INTERFACE)
                .union(AccessFlags::ABSTRACT)
                .union(AccessFlags::SYNTHETIC)
                .union(AccessFlags::ANNOTATION)
                .union(AccessFlags::ENUM)
                .union(AccessFlags::MANDATED),
            Self::Parameter => AccessFlags::FINAL
                .union(AccessFlags::SYNTHETIC)
                .union(AccessFlags::MANDATED),
            Self::Module => AccessFlags::OPEN
                .union(AccessFlags::SYNTHETIC)
                .union(AccessFlags::MANDATED),
            Self::ModuleRequires => AccessFlags::TRANSITIVE
                .union(AccessFlags::STATIC_PHASE)
                .union(AccessFlags::SYNTHETIC)
                .union(AccessFlags::MANDATED),
            Self::ModuleExports | Self::ModuleOpens => {
                AccessFlags::SYNTHETIC.union(AccessFlags::MANDATED)
            }
        }
    }

    /// A short name for this site, used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Field => "field",
            Self::Method => "method",
            Self::InnerClass => "inner class",
            Self::Parameter => "parameter",
            Self::Module => "module",
            Self::ModuleRequires => "requires directive",
            Self::ModuleExports => "exports directive",
            Self::ModuleOpens => "opens directive",
        }
    }
}

/// Validates `flags` against `site`'s admissible mask, at-most-one-visibility
/// rule, and final/abstract mutual exclusion.
pub fn validate(flags: AccessFlags, site: Site) -> CheckResult<()> {
    let admissible = site.admissible();
    if !admissible.contains(flags) {
        return Err(CheckError::DisallowedAccessFlags {
            site: site.name(),
            flags: flags.bits() as u16,
            admissible: admissible.bits() as u16,
        });
    }
    let visibility = AccessFlags::PUBLIC | AccessFlags::PROTECTED | AccessFlags::PRIVATE;
    if (flags & visibility).bits().count_ones() > 1 {
        return Err(CheckError::ConflictingVisibility { site: site.name() });
    }
    if flags.contains(AccessFlags::FINAL) && flags.contains(AccessFlags::ABSTRACT) {
        return Err(CheckError::FinalAndAbstract { site: site.name() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_accepts_public_super() {
        let flags = AccessFlags::PUBLIC | AccessFlags::SUPER;
        assert!(validate(flags, Site::Class).is_ok());
    }

    #[test]
    fn class_rejects_native() {
        let flags = AccessFlags::PUBLIC | AccessFlags::NATIVE;
        assert!(validate(flags, Site::Class).is_err());
    }

    #[test]
    fn rejects_conflicting_visibility() {
        let flags = AccessFlags::PUBLIC | AccessFlags::PRIVATE;
        let err = validate(flags, Site::Method).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Argument);
    }

    #[test]
    fn rejects_final_and_abstract() {
        let flags = AccessFlags::FINAL | AccessFlags::ABSTRACT;
        assert!(matches!(
            validate(flags, Site::Method),
            Err(CheckError::FinalAndAbstract { .. })
        ));
    }

    #[test]
    fn field_volatile_is_distinct_bit_from_method_bridge() {
        // Same underlying bit (0x0040), different admissible sites.
        assert!(validate(AccessFlags::VOLATILE, Site::Field).is_ok());
        assert!(validate(AccessFlags::BRIDGE, Site::Field).is_err());
        assert!(validate(AccessFlags::BRIDGE, Site::Method).is_ok());
    }

    #[test]
    fn module_requires_java_base_flags_rejected_by_caller_not_mask() {
        // The mask itself permits transitive/static_phase; the java.base
        // version-gated prohibition is enforced by the module checker, not here.
        let flags = AccessFlags::TRANSITIVE | AccessFlags::STATIC_PHASE;
        assert!(validate(flags, Site::ModuleRequires).is_ok());
    }
}
