//! The top-level class event state machine: governs which class-level
//! events may occur and in what order, and spawns the per-member child
//! checkers.
use std::{cell::RefCell, fmt::Debug, rc::Rc};

use crate::{
    ApiVersion, ClassVersion,
    checker::{
        CheckerOptions, annotation_checker::AnnotationChecker, field_checker::FieldChecker,
        label::LabelTable, method_checker::MethodChecker, module_checker::ModuleChecker,
        record_component_checker::RecordComponentChecker, signature_checker::check_class_signature,
    },
    error::{CheckError, CheckResult},
    jvm::access_flags::{self, AccessFlags, Site},
    types::{
        descriptor::{is_valid_field_descriptor, is_valid_method_descriptor},
        internal_name::{is_info_pseudo_class, is_valid_internal_name, package_of},
    },
    visitor::{AnnotationVisitor, ClassVisitor, FieldVisitor, MethodVisitor, ModuleVisitor, RecordComponentVisitor},
};

#[derive(Debug, Default)]
struct State {
    header_seen: bool,
    end_seen: bool,
    source_seen: bool,
    module_seen: bool,
    nest_host_seen: bool,
    nest_member_seen: bool,
    outer_class_seen: bool,
    nest_member_package: Option<String>,
}

/// Wraps an optional downstream [`ClassVisitor`], enforcing the class-level
/// event order and spawning validated per-member child checkers.
#[derive(Debug)]
pub struct ClassChecker {
    delegate: Option<Box<dyn ClassVisitor>>,
    options: CheckerOptions,
    state: State,
    access: AccessFlags,
    class_version: ClassVersion,
    is_interface: bool,
    labels: Rc<RefCell<LabelTable>>,
}

impl ClassChecker {
    /// Wraps `delegate`, driven by `options`.
    #[must_use]
    pub fn new(delegate: Option<Box<dyn ClassVisitor>>, options: CheckerOptions) -> Self {
        Self {
            delegate,
            options,
            state: State::default(),
            access: AccessFlags::empty(),
            class_version: ClassVersion::of(0),
            is_interface: false,
            labels: Rc::new(RefCell::new(LabelTable::new())),
        }
    }

    fn require_open(&self, method: &'static str) -> CheckResult<()> {
        if !self.state.header_seen {
            Err(CheckError::BeforeOpeningEvent(method))
        } else if self.state.end_seen {
            Err(CheckError::AfterEnd(method))
        } else {
            Ok(())
        }
    }
}

impl ClassVisitor for ClassChecker {
    fn visit_header(
        &mut self,
        version: ClassVersion,
        access: AccessFlags,
        name: &str,
        signature: Option<&str>,
        super_name: Option<&str>,
        interfaces: &[String],
    ) -> CheckResult<()> {
        if self.state.header_seen {
            return Err(CheckError::AlreadySeen("visit_header"));
        }
        access_flags::validate(access, Site::Class)?;
        self.is_interface = access.contains(AccessFlags::INTERFACE);
        if !is_info_pseudo_class(name) && !is_valid_internal_name(name) {
            return Err(CheckError::MalformedInternalName(name.to_owned()));
        }
        match super_name {
            None => {
                if name != "java/lang/Object" && !is_info_pseudo_class(name) {
                    return Err(CheckError::MalformedInternalName(name.to_owned()));
                }
            }
            Some(super_name) => {
                if !is_valid_internal_name(super_name) {
                    return Err(CheckError::MalformedInternalName(super_name.to_owned()));
                }
                if self.is_interface && super_name != "java/lang/Object" {
                    return Err(CheckError::MalformedInternalName(super_name.to_owned()));
                }
            }
        }
        for interface in interfaces {
            if !is_valid_internal_name(interface) {
                return Err(CheckError::MalformedInternalName(interface.clone()));
            }
        }
        if let Some(signature) = signature {
            check_class_signature(signature, None)?;
        }
        self.access = access;
        self.class_version = version;
        self.state.header_seen = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_header(version, access, name, signature, super_name, interfaces)?;
        }
        Ok(())
    }

    fn visit_source(&mut self, file: Option<&str>, debug: Option<&str>) -> CheckResult<()> {
        self.require_open("visit_source")?;
        if self.state.source_seen {
            return Err(CheckError::AlreadySeen("visit_source"));
        }
        self.state.source_seen = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_source(file, debug)?;
        }
        Ok(())
    }

    fn visit_module(
        &mut self,
        name: &str,
        access: AccessFlags,
        version: Option<&str>,
    ) -> CheckResult<Option<Box<dyn ModuleVisitor>>> {
        self.require_open("visit_module")?;
        if self.state.module_seen {
            return Err(CheckError::AlreadySeen("visit_module"));
        }
        access_flags::validate(access, Site::Module)?;
        self.state.module_seen = true;
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_module(name, access, version)?,
            None => None,
        };
        let is_open = access.contains(AccessFlags::OPEN);
        Ok(Some(Box::new(ModuleChecker::new(is_open, self.class_version, child))))
    }

    fn visit_nest_host(&mut self, host: &str) -> CheckResult<()> {
        self.require_open("visit_nest_host")?;
        if self.state.nest_host_seen || self.state.nest_member_seen {
            return Err(CheckError::NestHostAndMemberConflict);
        }
        if !is_valid_internal_name(host) {
            return Err(CheckError::MalformedInternalName(host.to_owned()));
        }
        self.state.nest_host_seen = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_nest_host(host)?;
        }
        Ok(())
    }

    fn visit_nest_member(&mut self, member: &str) -> CheckResult<()> {
        self.require_open("visit_nest_member")?;
        if self.state.nest_host_seen {
            return Err(CheckError::NestHostAndMemberConflict);
        }
        if !is_valid_internal_name(member) {
            return Err(CheckError::MalformedInternalName(member.to_owned()));
        }
        let package = package_of(member);
        match &self.state.nest_member_package {
            None => self.state.nest_member_package = Some(package.to_owned()),
            Some(expected) if expected == package => {}
            Some(expected) => {
                return Err(CheckError::NestMemberPackageMismatch {
                    member: member.to_owned(),
                    expected_package: expected.clone(),
                });
            }
        }
        self.state.nest_member_seen = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_nest_member(member)?;
        }
        Ok(())
    }

    fn visit_outer_class(&mut self, owner: &str, name: Option<&str>, descriptor: Option<&str>) -> CheckResult<()> {
        self.require_open("visit_outer_class")?;
        if self.state.outer_class_seen {
            return Err(CheckError::AlreadySeen("visit_outer_class"));
        }
        if !is_valid_internal_name(owner) {
            return Err(CheckError::MalformedInternalName(owner.to_owned()));
        }
        self.state.outer_class_seen = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_outer_class(owner, name, descriptor)?;
        }
        Ok(())
    }

    fn visit_inner_class(
        &mut self,
        name: &str,
        outer_name: Option<&str>,
        inner_name: Option<&str>,
        access: AccessFlags,
    ) -> CheckResult<()> {
        self.require_open("visit_inner_class")?;
        if !is_valid_internal_name(name) {
            return Err(CheckError::MalformedInternalName(name.to_owned()));
        }
        access_flags::validate(access, Site::InnerClass)?;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_inner_class(name, outer_name, inner_name, access)?;
        }
        Ok(())
    }

    fn visit_record_component(
        &mut self,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
    ) -> CheckResult<Option<Box<dyn RecordComponentVisitor>>> {
        self.require_open("visit_record_component")?;
        if self.options.api_version < ApiVersion::EXPERIMENTAL_FLOOR {
            return Err(CheckError::BelowMinimumApiVersion(
                "visit_record_component",
                ApiVersion::EXPERIMENTAL_FLOOR,
            ));
        }
        if !is_valid_field_descriptor(descriptor) {
            return Err(CheckError::MalformedFieldDescriptor(descriptor.to_owned()));
        }
        if let Some(signature) = signature {
            crate::types::signature::visit_field_signature(signature, &mut NullSignatureSink)?;
        }
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_record_component(name, descriptor, signature)?,
            None => None,
        };
        Ok(Some(Box::new(RecordComponentChecker::new(child))))
    }

    fn visit_permitted_subclass(&mut self, subclass: &str) -> CheckResult<()> {
        self.require_open("visit_permitted_subclass")?;
        if self.options.api_version < ApiVersion::EXPERIMENTAL_FLOOR {
            return Err(CheckError::BelowMinimumApiVersion(
                "visit_permitted_subclass",
                ApiVersion::EXPERIMENTAL_FLOOR,
            ));
        }
        if !is_valid_internal_name(subclass) {
            return Err(CheckError::MalformedInternalName(subclass.to_owned()));
        }
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_permitted_subclass(subclass)?;
        }
        Ok(())
    }

    fn visit_field(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
    ) -> CheckResult<Option<Box<dyn FieldVisitor>>> {
        self.require_open("visit_field")?;
        let _ = name;
        access_flags::validate(access, Site::Field)?;
        if !is_valid_field_descriptor(descriptor) {
            return Err(CheckError::MalformedFieldDescriptor(descriptor.to_owned()));
        }
        if let Some(signature) = signature {
            crate::types::signature::visit_field_signature(signature, &mut NullSignatureSink)?;
        }
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_field(access, name, descriptor, signature)?,
            None => None,
        };
        Ok(Some(Box::new(FieldChecker::new(descriptor, child))))
    }

    fn visit_method(
        &mut self,
        access: AccessFlags,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        exceptions: &[String],
    ) -> CheckResult<Option<Box<dyn MethodVisitor>>> {
        self.require_open("visit_method")?;
        access_flags::validate(access, Site::Method)?;
        if !is_valid_method_descriptor(descriptor) {
            return Err(CheckError::MalformedMethodDescriptor(descriptor.to_owned()));
        }
        if let Some(signature) = signature {
            crate::types::signature::visit_method_signature(signature, &mut NullSignatureSink)?;
        }
        for exception in exceptions {
            if !is_valid_internal_name(exception) {
                return Err(CheckError::MalformedInternalName(exception.clone()));
            }
        }
        let is_init = name == "<init>" || name == "<clinit>";
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_method(access, name, descriptor, signature, exceptions)?,
            None => None,
        };
        Ok(Some(Box::new(MethodChecker::new(
            descriptor,
            self.is_interface,
            self.class_version,
            is_init,
            self.options,
            Rc::clone(&self.labels),
            child,
        ))))
    }

    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        self.require_open("visit_annotation")?;
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_annotation(descriptor, visible)?,
            None => None,
        };
        Ok(Some(Box::new(AnnotationChecker::new(child))))
    }

    fn visit_attribute(&mut self, name: &str) -> CheckResult<()> {
        self.require_open("visit_attribute")?;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_attribute(name)?;
        }
        Ok(())
    }

    fn visit_end(&mut self) -> CheckResult<()> {
        self.require_open("visit_end")?;
        self.state.end_seen = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_end()?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct NullSignatureSink;

impl crate::visitor::SignatureVisitor for NullSignatureSink {}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(checker: &mut ClassChecker, name: &str, super_name: Option<&str>) -> CheckResult<()> {
        checker.visit_header(
            ClassVersion::of(52),
            AccessFlags::PUBLIC | AccessFlags::SUPER,
            name,
            None,
            super_name,
            &[],
        )
    }

    #[test]
    fn accepts_a_minimal_class() {
        let mut checker = ClassChecker::new(None, CheckerOptions::default());
        assert!(header(&mut checker, "Hello", Some("java/lang/Object")).is_ok());
        assert!(checker.visit_end().is_ok());
    }

    #[test]
    fn rejects_second_header() {
        let mut checker = ClassChecker::new(None, CheckerOptions::default());
        header(&mut checker, "Hello", Some("java/lang/Object")).unwrap();
        assert!(header(&mut checker, "Hello", Some("java/lang/Object")).is_err());
    }

    #[test]
    fn rejects_events_before_header() {
        let mut checker = ClassChecker::new(None, CheckerOptions::default());
        assert!(matches!(
            checker.visit_source(None, None),
            Err(CheckError::BeforeOpeningEvent(_))
        ));
    }

    #[test]
    fn rejects_events_after_end() {
        let mut checker = ClassChecker::new(None, CheckerOptions::default());
        header(&mut checker, "Hello", Some("java/lang/Object")).unwrap();
        checker.visit_end().unwrap();
        assert!(matches!(checker.visit_source(None, None), Err(CheckError::AfterEnd(_))));
    }

    #[test]
    fn nest_host_and_member_are_mutually_exclusive() {
        let mut checker = ClassChecker::new(None, CheckerOptions::default());
        header(&mut checker, "Hello", Some("java/lang/Object")).unwrap();
        checker.visit_nest_host("A").unwrap();
        assert!(matches!(
            checker.visit_nest_member("B"),
            Err(CheckError::NestHostAndMemberConflict)
        ));
    }

    #[test]
    fn nest_members_must_share_package() {
        let mut checker = ClassChecker::new(None, CheckerOptions::default());
        header(&mut checker, "com/example/Hello", Some("java/lang/Object")).unwrap();
        checker.visit_nest_member("com/example/A").unwrap();
        assert!(matches!(
            checker.visit_nest_member("com/other/B"),
            Err(CheckError::NestMemberPackageMismatch { .. })
        ));
    }

    #[test]
    fn interface_must_extend_object() {
        let mut checker = ClassChecker::new(None, CheckerOptions::default());
        let result = checker.visit_header(
            ClassVersion::of(52),
            AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
            "com/example/Thing",
            None,
            Some("com/example/Base"),
            &[],
        );
        assert!(result.is_err());
    }

    #[test]
    fn record_component_rejected_below_experimental_floor() {
        let mut checker = ClassChecker::new(None, CheckerOptions::default());
        header(&mut checker, "Hello", Some("java/lang/Object")).unwrap();
        assert!(matches!(
            checker.visit_record_component("x", "I", None),
            Err(CheckError::BelowMinimumApiVersion(..))
        ));
    }

    #[test]
    fn record_component_accepted_at_experimental_floor() {
        let options = CheckerOptions {
            api_version: ApiVersion::EXPERIMENTAL_FLOOR,
            ..CheckerOptions::default()
        };
        let mut checker = ClassChecker::new(None, options);
        header(&mut checker, "Hello", Some("java/lang/Object")).unwrap();
        assert!(checker.visit_record_component("x", "I", None).is_ok());
    }
}
