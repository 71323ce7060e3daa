use std::fmt::Debug;

use crate::{
    ClassVersion,
    error::CheckResult,
    jvm::access_flags::AccessFlags,
    visitor::{AnnotationVisitor, FieldVisitor, MethodVisitor, ModuleVisitor, RecordComponentVisitor},
};

/// Observes one class's event stream, from `visit_header` to `visit_end`.
pub trait ClassVisitor: Debug {
    /// The mandatory opening event. Always the first call.
    fn visit_header(
        &mut self,
        _version: ClassVersion,
        _access: AccessFlags,
        _name: &str,
        _signature: Option<&str>,
        _super_name: Option<&str>,
        _interfaces: &[String],
    ) -> CheckResult<()> {
        Ok(())
    }

    /// The `SourceFile`/`SourceDebugExtension` attributes.
    fn visit_source(&mut self, _file: Option<&str>, _debug: Option<&str>) -> CheckResult<()> {
        Ok(())
    }

    /// The `Module` attribute subtree, present only on `module-info` classes.
    fn visit_module(
        &mut self,
        _name: &str,
        _access: AccessFlags,
        _version: Option<&str>,
    ) -> CheckResult<Option<Box<dyn ModuleVisitor>>> {
        Ok(None)
    }

    /// The `NestHost` attribute.
    fn visit_nest_host(&mut self, _host: &str) -> CheckResult<()> {
        Ok(())
    }

    /// One entry of the `NestMembers` attribute.
    fn visit_nest_member(&mut self, _member: &str) -> CheckResult<()> {
        Ok(())
    }

    /// The `EnclosingMethod` attribute.
    fn visit_outer_class(
        &mut self,
        _owner: &str,
        _name: Option<&str>,
        _descriptor: Option<&str>,
    ) -> CheckResult<()> {
        Ok(())
    }

    /// One entry of the `InnerClasses` attribute.
    fn visit_inner_class(
        &mut self,
        _name: &str,
        _outer_name: Option<&str>,
        _inner_name: Option<&str>,
        _access: AccessFlags,
    ) -> CheckResult<()> {
        Ok(())
    }

    /// A record component (experimental; requires [`crate::ApiVersion::EXPERIMENTAL_FLOOR`]).
    fn visit_record_component(
        &mut self,
        _name: &str,
        _descriptor: &str,
        _signature: Option<&str>,
    ) -> CheckResult<Option<Box<dyn RecordComponentVisitor>>> {
        Ok(None)
    }

    /// One entry of the `PermittedSubclasses` attribute (experimental).
    fn visit_permitted_subclass(&mut self, _subclass: &str) -> CheckResult<()> {
        Ok(())
    }

    /// A field declaration.
    fn visit_field(
        &mut self,
        _access: AccessFlags,
        _name: &str,
        _descriptor: &str,
        _signature: Option<&str>,
    ) -> CheckResult<Option<Box<dyn FieldVisitor>>> {
        Ok(None)
    }

    /// A method declaration.
    fn visit_method(
        &mut self,
        _access: AccessFlags,
        _name: &str,
        _descriptor: &str,
        _signature: Option<&str>,
        _exceptions: &[String],
    ) -> CheckResult<Option<Box<dyn MethodVisitor>>> {
        Ok(None)
    }

    /// A class-level annotation.
    fn visit_annotation(
        &mut self,
        _descriptor: &str,
        _visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// An unrecognized or custom attribute, passed through opaquely.
    fn visit_attribute(&mut self, _name: &str) -> CheckResult<()> {
        Ok(())
    }

    /// The mandatory closing event. No further calls are legal afterwards.
    fn visit_end(&mut self) -> CheckResult<()> {
        Ok(())
    }
}
