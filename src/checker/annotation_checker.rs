//! Order and value-kind enforcement for one annotation's event stream.
use std::fmt::Debug;

use crate::{
    error::{CheckError, CheckResult},
    jvm::constant::AnnotationValue,
    visitor::AnnotationVisitor,
};

/// Wraps an optional downstream [`AnnotationVisitor`], forwarding every call
/// after confirming it occurs before `visit_end` and, for array elements,
/// that every element shares the first element's kind.
#[derive(Debug)]
pub struct AnnotationChecker {
    delegate: Option<Box<dyn AnnotationVisitor>>,
    ended: bool,
    array_element_kind: Option<&'static str>,
    named_values: bool,
}

impl AnnotationChecker {
    /// Wraps `delegate`, forwarding every accepted call to it. Values in this
    /// context must carry a name (top-level annotation or nested-annotation
    /// body).
    #[must_use]
    pub fn new(delegate: Option<Box<dyn AnnotationVisitor>>) -> Self {
        Self {
            delegate,
            ended: false,
            array_element_kind: None,
            named_values: true,
        }
    }

    /// An `AnnotationChecker` for the body of an array, which tracks that
    /// array elements stay one homogeneous kind and forbids a name on each
    /// element.
    #[must_use]
    pub fn for_array(delegate: Option<Box<dyn AnnotationVisitor>>) -> Self {
        Self {
            delegate,
            ended: false,
            array_element_kind: None,
            named_values: false,
        }
    }

    fn require_open(&self, method: &'static str) -> CheckResult<()> {
        if self.ended {
            Err(CheckError::AfterEnd(method))
        } else {
            Ok(())
        }
    }

    fn require_name_presence(&self, name: Option<&str>) -> CheckResult<()> {
        if name.is_some() == self.named_values {
            Ok(())
        } else {
            Err(CheckError::AnnotationNamePresence {
                expected_named: self.named_values,
            })
        }
    }

    fn track_array_kind(&mut self, kind: &'static str) -> CheckResult<()> {
        match self.array_element_kind {
            None => {
                self.array_element_kind = Some(kind);
                Ok(())
            }
            Some(expected) if expected == kind => Ok(()),
            Some(expected) => Err(CheckError::IllegalConstantKind {
                context: expected,
                kind,
            }),
        }
    }
}

impl AnnotationVisitor for AnnotationChecker {
    fn visit(&mut self, name: Option<&str>, value: &AnnotationValue) -> CheckResult<()> {
        self.require_open("visit")?;
        self.require_name_presence(name)?;
        self.track_array_kind(value.kind_name())?;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit(name, value)?;
        }
        Ok(())
    }

    fn visit_enum(&mut self, name: Option<&str>, descriptor: &str, value: &str) -> CheckResult<()> {
        self.require_open("visit_enum")?;
        self.require_name_presence(name)?;
        self.track_array_kind("enum")?;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_enum(name, descriptor, value)?;
        }
        Ok(())
    }

    fn visit_annotation(
        &mut self,
        name: Option<&str>,
        descriptor: &str,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        self.require_open("visit_annotation")?;
        self.require_name_presence(name)?;
        self.track_array_kind("annotation")?;
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_annotation(name, descriptor)?,
            None => None,
        };
        Ok(Some(Box::new(AnnotationChecker::new(child))))
    }

    fn visit_array(&mut self, name: Option<&str>) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        self.require_open("visit_array")?;
        self.require_name_presence(name)?;
        self.track_array_kind("array")?;
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_array(name)?,
            None => None,
        };
        Ok(Some(Box::new(AnnotationChecker::for_array(child))))
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
    fn rejects_calls_after_end() {
        let mut checker = AnnotationChecker::new(None);
        checker.visit_end().unwrap();
        assert!(checker.visit(Some("x"), &AnnotationValue::Int(1)).is_err());
    }

    #[test]
    fn rejects_mixed_array_element_kinds() {
        let mut checker = AnnotationChecker::for_array(None);
        checker.visit(None, &AnnotationValue::Int(1)).unwrap();
        assert!(matches!(
            checker.visit(None, &AnnotationValue::String("x".into())),
            Err(CheckError::IllegalConstantKind { .. })
        ));
    }

    #[test]
    fn accepts_homogeneous_array() {
        let mut checker = AnnotationChecker::for_array(None);
        checker.visit(None, &AnnotationValue::Int(1)).unwrap();
        checker.visit(None, &AnnotationValue::Int(2)).unwrap();
        assert!(checker.visit_end().is_ok());
    }

    #[test]
    fn rejects_named_value_in_array_context() {
        let mut checker = AnnotationChecker::for_array(None);
        assert!(matches!(
            checker.visit(Some("x"), &AnnotationValue::Int(1)),
            Err(CheckError::AnnotationNamePresence { expected_named: false })
        ));
    }

    #[test]
    fn rejects_unnamed_value_in_named_context() {
        let mut checker = AnnotationChecker::new(None);
        assert!(matches!(
            checker.visit(None, &AnnotationValue::Int(1)),
            Err(CheckError::AnnotationNamePresence { expected_named: true })
        ));
    }
}
