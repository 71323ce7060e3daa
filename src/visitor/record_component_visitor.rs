use std::fmt::Debug;

use crate::{error::CheckResult, visitor::AnnotationVisitor};

/// Observes one record component's event stream. Experimental: gated behind
/// the `unstable` feature and [`crate::ApiVersion::EXPERIMENTAL_FLOOR`].
#[instability::unstable(feature = "record-component")]
pub trait RecordComponentVisitor: Debug {
    /// A record-component-level annotation.
    fn visit_annotation(
        &mut self,
        _descriptor: &str,
        _visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// A type annotation targeting this component's declared type.
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
