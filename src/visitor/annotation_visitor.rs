use std::fmt::Debug;

use crate::{error::CheckResult, jvm::constant::AnnotationValue};

/// Observes one annotation's key/value event stream, including nested
/// annotation and array values.
///
/// `name` is `Some` for a top-level or nested-annotation element (a
/// `named_values` context) and `None` for an array element (an unnamed
/// context) — the same call sequence drives both, distinguished only by
/// this presence/absence.
pub trait AnnotationVisitor: Debug {
    /// An element with a constant, class, or enum value.
    fn visit(&mut self, _name: Option<&str>, _value: &AnnotationValue) -> CheckResult<()> {
        Ok(())
    }

    /// An element with an enum-constant value.
    fn visit_enum(&mut self, _name: Option<&str>, _descriptor: &str, _value: &str) -> CheckResult<()> {
        Ok(())
    }

    /// An element whose value is itself an annotation.
    fn visit_annotation(
        &mut self,
        _name: Option<&str>,
        _descriptor: &str,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// An element whose value is an array of values.
    fn visit_array(&mut self, _name: Option<&str>) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// The mandatory closing event.
    fn visit_end(&mut self) -> CheckResult<()> {
        Ok(())
    }
}
