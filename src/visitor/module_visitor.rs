use std::fmt::Debug;

use crate::jvm::access_flags::AccessFlags;
use crate::error::CheckResult;

/// Observes the five uniqueness-constrained directive kinds of a
/// `module-info` class's `Module` attribute: `requires`, `exports`, `opens`,
/// `uses`, `provides`.
pub trait ModuleVisitor: Debug {
    /// The `main-class` attribute, if present.
    fn visit_main_class(&mut self, _main_class: &str) -> CheckResult<()> {
        Ok(())
    }

    /// One entry of the `ModulePackages` attribute.
    fn visit_package(&mut self, _package: &str) -> CheckResult<()> {
        Ok(())
    }

    /// One `requires` directive.
    fn visit_require(
        &mut self,
        _module: &str,
        _access: AccessFlags,
        _version: Option<&str>,
    ) -> CheckResult<()> {
        Ok(())
    }

    /// One `exports` directive, naming the packages it is limited to (empty
    /// for an unqualified export).
    fn visit_export(&mut self, _package: &str, _access: AccessFlags, _to: &[String]) -> CheckResult<()> {
        Ok(())
    }

    /// One `opens` directive, naming the packages it is limited to (empty for
    /// an unqualified opens).
    fn visit_open(&mut self, _package: &str, _access: AccessFlags, _to: &[String]) -> CheckResult<()> {
        Ok(())
    }

    /// One `uses` directive.
    fn visit_use(&mut self, _service: &str) -> CheckResult<()> {
        Ok(())
    }

    /// One `provides` directive, naming its implementation classes.
    fn visit_provide(&mut self, _service: &str, _providers: &[String]) -> CheckResult<()> {
        Ok(())
    }

    /// The mandatory closing event.
    fn visit_end(&mut self) -> CheckResult<()> {
        Ok(())
    }
}
