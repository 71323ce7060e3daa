//! Order enforcement for one field's event stream: at most one
//! `ConstantValue`, matching its declared descriptor's kind, then any number
//! of annotations, then `visit_end`.
use std::fmt::Debug;

use crate::{
    checker::annotation_checker::AnnotationChecker,
    error::{CheckError, CheckResult},
    jvm::constant::ConstantValue,
    visitor::{AnnotationVisitor, FieldVisitor},
};

/// Whether a field descriptor's kind matches a `ConstantValue`'s kind. A
/// `ConstantValue` may only be declared on a primitive or `String`-typed
/// field.
fn constant_value_matches_descriptor(descriptor: &str, value: &ConstantValue) -> bool {
    match (descriptor, value) {
        ("B" | "C" | "I" | "S" | "Z", ConstantValue::Int(_)) => true,
        ("F", ConstantValue::Float(_)) => true,
        ("J", ConstantValue::Long(_)) => true,
        ("D", ConstantValue::Double(_)) => true,
        (d, ConstantValue::String(_)) if d.starts_with("Ljava/lang/String;") => true,
        _ => false,
    }
}

/// Wraps an optional downstream [`FieldVisitor`], enforcing a field's event
/// order and the `ConstantValue`/descriptor-kind agreement.
#[derive(Debug)]
pub struct FieldChecker {
    delegate: Option<Box<dyn FieldVisitor>>,
    descriptor: String,
    seen_constant_value: bool,
    ended: bool,
}

impl FieldChecker {
    /// Wraps `delegate`, validating calls against `descriptor`, the field's
    /// own declared field descriptor.
    #[must_use]
    pub fn new(descriptor: impl Into<String>, delegate: Option<Box<dyn FieldVisitor>>) -> Self {
        Self {
            delegate,
            descriptor: descriptor.into(),
            seen_constant_value: false,
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
}

impl FieldVisitor for FieldChecker {
    fn visit_constant_value(&mut self, value: &ConstantValue) -> CheckResult<()> {
        self.require_open("visit_constant_value")?;
        if self.seen_constant_value {
            return Err(CheckError::AlreadySeen("visit_constant_value"));
        }
        if !constant_value_matches_descriptor(&self.descriptor, value) {
            return Err(CheckError::IllegalConstantKind {
                context: "field ConstantValue",
                kind: value.kind_name(),
            });
        }
        self.seen_constant_value = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_constant_value(value)?;
        }
        Ok(())
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

    fn visit_type_annotation(
        &mut self,
        type_reference: u32,
        descriptor: &str,
        visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        self.require_open("visit_type_annotation")?;
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_type_annotation(type_reference, descriptor, visible)?,
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
    fn accepts_matching_constant_value() {
        let mut checker = FieldChecker::new("I", None);
        assert!(checker.visit_constant_value(&ConstantValue::Int(1)).is_ok());
    }

    #[test]
    fn rejects_mismatched_constant_value() {
        let mut checker = FieldChecker::new("I", None);
        assert!(checker.visit_constant_value(&ConstantValue::Float(1.0)).is_err());
    }

    #[test]
    fn rejects_second_constant_value() {
        let mut checker = FieldChecker::new("I", None);
        checker.visit_constant_value(&ConstantValue::Int(1)).unwrap();
        assert!(checker.visit_constant_value(&ConstantValue::Int(2)).is_err());
    }

    #[test]
    fn rejects_calls_after_end() {
        let mut checker = FieldChecker::new("I", None);
        checker.visit_end().unwrap();
        assert!(checker.visit_attribute("Foo").is_err());
    }
}
