//! Order enforcement for one record component's event stream. Experimental,
//! mirroring [`crate::visitor::RecordComponentVisitor`]'s own gating.
use std::fmt::Debug;

use crate::{
    checker::annotation_checker::AnnotationChecker,
    error::{CheckError, CheckResult},
    visitor::{AnnotationVisitor, RecordComponentVisitor},
};

/// Wraps an optional downstream [`RecordComponentVisitor`], enforcing that no
/// call occurs after `visit_end`.
#[derive(Debug)]
#[instability::unstable(feature = "record-component")]
pub struct RecordComponentChecker {
    delegate: Option<Box<dyn RecordComponentVisitor>>,
    ended: bool,
}

impl RecordComponentChecker {
    /// Wraps `delegate`, forwarding every accepted call to it.
    #[must_use]
    pub fn new(delegate: Option<Box<dyn RecordComponentVisitor>>) -> Self {
        Self { delegate, ended: false }
    }

    fn require_open(&self, method: &'static str) -> CheckResult<()> {
        if self.ended {
            Err(CheckError::AfterEnd(method))
        } else {
            Ok(())
        }
    }
}

impl RecordComponentVisitor for RecordComponentChecker {
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
    fn rejects_calls_after_end() {
        let mut checker = RecordComponentChecker::new(None);
        checker.visit_end().unwrap();
        assert!(checker.visit_attribute("Foo").is_err());
    }
}
