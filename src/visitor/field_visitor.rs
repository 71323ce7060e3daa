use std::fmt::Debug;

use crate::{error::CheckResult, jvm::constant::ConstantValue, visitor::AnnotationVisitor};

/// Observes one field's event stream: at most one `ConstantValue`, zero or
/// more annotations, then `visit_end`.
pub trait FieldVisitor: Debug {
    /// The field's `ConstantValue` attribute, if it declared one.
    fn visit_constant_value(&mut self, _value: &ConstantValue) -> CheckResult<()> {
        Ok(())
    }

    /// A field-level annotation.
    fn visit_annotation(
        &mut self,
        _descriptor: &str,
        _visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// A type annotation targeting this field's declared type.
    fn visit_type_annotation(
        &mut self,
        _type_reference: u32,
        _descriptor: &str,
        _visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// An unrecognized or custom attribute, passed through opaquely.
    fn visit_attribute(&mut self, _name: &str) -> CheckResult<()> {
        Ok(())
    }

    /// The mandatory closing event.
    fn visit_end(&mut self) -> CheckResult<()> {
        Ok(())
    }
}
