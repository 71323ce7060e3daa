//! Uniqueness and ordering enforcement for a `module-info` class's `Module`
//! attribute: each of `requires`, `exports`, `opens`, `uses` and `provides`
//! may name a given module/package/service at most once.
use std::{collections::HashSet, fmt::Debug};

use crate::{
    ClassVersion,
    error::{CheckError, CheckResult},
    jvm::access_flags::{self, AccessFlags, Site},
    visitor::ModuleVisitor,
};

/// Wraps an optional downstream [`ModuleVisitor`], rejecting a second
/// directive of the same kind naming an already-seen primary name, and
/// enforcing the open-module/`opens` and `java.base`/`requires` version
/// rules.
#[derive(Debug)]
pub struct ModuleChecker {
    delegate: Option<Box<dyn ModuleVisitor>>,
    is_open: bool,
    class_version: ClassVersion,
    seen_requires: HashSet<String>,
    seen_exports: HashSet<String>,
    seen_opens: HashSet<String>,
    seen_uses: HashSet<String>,
    seen_provides: HashSet<String>,
    main_class_seen: bool,
    ended: bool,
}

impl ModuleChecker {
    /// Wraps `delegate`. `is_open` is whether the enclosing module itself
    /// carries `ACC_OPEN`; `class_version` gates the `requires java.base`
    /// flag restriction.
    #[must_use]
    pub fn new(is_open: bool, class_version: ClassVersion, delegate: Option<Box<dyn ModuleVisitor>>) -> Self {
        Self {
            delegate,
            is_open,
            class_version,
            seen_requires: HashSet::new(),
            seen_exports: HashSet::new(),
            seen_opens: HashSet::new(),
            seen_uses: HashSet::new(),
            seen_provides: HashSet::new(),
            main_class_seen: false,
            ended: false,
        }
    }

    fn require_open(&self, method: &'static str) -> CheckResult<()> {
        if self.ended {
            Err(CheckError::AfterEnd(method))
        } else {
            Ok(())
        }
    }

    fn require_unique(set: &mut HashSet<String>, kind: &'static str, name: &str) -> CheckResult<()> {
        if !set.insert(name.to_owned()) {
            return Err(CheckError::DuplicateModuleDirective {
                kind,
                name: name.to_owned(),
            });
        }
        Ok(())
    }
}

impl ModuleVisitor for ModuleChecker {
    fn visit_main_class(&mut self, main_class: &str) -> CheckResult<()> {
        self.require_open("visit_main_class")?;
        if self.main_class_seen {
            return Err(CheckError::AlreadySeen("visit_main_class"));
        }
        self.main_class_seen = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_main_class(main_class)?;
        }
        Ok(())
    }

    fn visit_package(&mut self, package: &str) -> CheckResult<()> {
        self.require_open("visit_package")?;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_package(package)?;
        }
        Ok(())
    }

    fn visit_require(&mut self, module: &str, access: AccessFlags, version: Option<&str>) -> CheckResult<()> {
        self.require_open("visit_require")?;
        access_flags::validate(access, Site::ModuleRequires)?;
        Self::require_unique(&mut self.seen_requires, "requires", module)?;
        let java_base_flags = AccessFlags::TRANSITIVE | AccessFlags::STATIC_PHASE;
        if module == "java.base" && self.class_version >= ClassVersion::JAVA_10 && access.intersects(java_base_flags)
        {
            return Err(CheckError::JavaBaseRequiresFlags);
        }
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_require(module, access, version)?;
        }
        Ok(())
    }

    fn visit_export(&mut self, package: &str, access: AccessFlags, to: &[String]) -> CheckResult<()> {
        self.require_open("visit_export")?;
        access_flags::validate(access, Site::ModuleExports)?;
        Self::require_unique(&mut self.seen_exports, "exports", package)?;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_export(package, access, to)?;
        }
        Ok(())
    }

    fn visit_open(&mut self, package: &str, access: AccessFlags, to: &[String]) -> CheckResult<()> {
        self.require_open("visit_open")?;
        access_flags::validate(access, Site::ModuleOpens)?;
        if self.is_open {
            return Err(CheckError::OpensInOpenModule);
        }
        Self::require_unique(&mut self.seen_opens, "opens", package)?;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_open(package, access, to)?;
        }
        Ok(())
    }

    fn visit_use(&mut self, service: &str) -> CheckResult<()> {
        self.require_open("visit_use")?;
        Self::require_unique(&mut self.seen_uses, "uses", service)?;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_use(service)?;
        }
        Ok(())
    }

    fn visit_provide(&mut self, service: &str, providers: &[String]) -> CheckResult<()> {
        self.require_open("visit_provide")?;
        Self::require_unique(&mut self.seen_provides, "provides", service)?;
        if providers.is_empty() {
            return Err(CheckError::EmptyProvidesWith(service.to_owned()));
        }
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_provide(service, providers)?;
        }
        Ok(())
    }

    fn visit_end(&mut self) -> CheckResult<()> {
        self.require_open("visit_end")?;
        self.ended = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_end()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_requires() {
        let mut checker = ModuleChecker::new(false, ClassVersion::JAVA_9, None);
        checker.visit_require("java.base", AccessFlags::empty(), None).unwrap();
        assert!(checker.visit_require("java.base", AccessFlags::empty(), None).is_err());
    }

    #[test]
    fn rejects_opens_in_open_module() {
        let mut checker = ModuleChecker::new(true, ClassVersion::JAVA_9, None);
        assert!(checker.visit_open("com/example", AccessFlags::empty(), &[]).is_err());
    }

    #[test]
    fn rejects_java_base_transitive_at_version_10_and_above() {
        let mut checker = ModuleChecker::new(false, ClassVersion::JAVA_10, None);
        assert!(checker
            .visit_require("java.base", AccessFlags::TRANSITIVE, None)
            .is_err());
    }

    #[test]
    fn allows_java_base_transitive_below_version_10() {
        let mut checker = ModuleChecker::new(false, ClassVersion::JAVA_9, None);
        assert!(checker
            .visit_require("java.base", AccessFlags::TRANSITIVE, None)
            .is_ok());
    }

    #[test]
    fn rejects_empty_provides_with_list() {
        let mut checker = ModuleChecker::new(false, ClassVersion::JAVA_9, None);
        assert!(checker.visit_provide("com/example/Service", &[]).is_err());
    }

    #[test]
    fn rejects_disallowed_flags_on_requires() {
        let mut checker = ModuleChecker::new(false, ClassVersion::JAVA_9, None);
        assert!(matches!(
            checker.visit_require("com.example", AccessFlags::PUBLIC, None),
            Err(CheckError::DisallowedAccessFlags { .. })
        ));
    }

    #[test]
    fn rejects_disallowed_flags_on_exports() {
        let mut checker = ModuleChecker::new(false, ClassVersion::JAVA_9, None);
        assert!(matches!(
            checker.visit_export("com/example", AccessFlags::TRANSITIVE, &[]),
            Err(CheckError::DisallowedAccessFlags { .. })
        ));
    }

    #[test]
    fn rejects_disallowed_flags_on_opens() {
        let mut checker = ModuleChecker::new(false, ClassVersion::JAVA_9, None);
        assert!(matches!(
            checker.visit_open("com/example", AccessFlags::TRANSITIVE, &[]),
            Err(CheckError::DisallowedAccessFlags { .. })
        ));
    }
}
