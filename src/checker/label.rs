//! Label bookkeeping for one class body: an arena of interned label names
//! plus a lightweight index handle, instead of a shared `Rc<RefCell<_>>` per
//! label. A single [`LabelTable`] owns the arena for every method of one
//! class, wrapped once in `Rc<RefCell<_>>` by [`crate::checker::ClassChecker`]
//! and shared with each [`crate::checker::MethodChecker`] it spawns; a
//! [`Label`] is just an index into it, so it is `Copy` and can be embedded in
//! [`crate::jvm::frame::FrameElement`] and other small value types without
//! reference-counting overhead.
use std::collections::HashMap;

use crate::error::{CheckError, CheckResult};

/// A lightweight handle to a label name, valid only against the
/// [`LabelTable`] that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(usize);

/// The arena of label names seen so far in one method body, plus whether
/// each has been defined (placed with `visit_label`) yet.
#[derive(Debug, Default)]
pub struct LabelTable {
    names: Vec<String>,
    by_name: HashMap<String, Label>,
    defined: Vec<bool>,
}

impl LabelTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `name`, returning its existing handle if already seen or
    /// allocating a new, as-yet-undefined one.
    pub fn intern(&mut self, name: &str) -> Label {
        if let Some(&label) = self.by_name.get(name) {
            return label;
        }
        let label = Label(self.names.len());
        self.names.push(name.to_owned());
        self.defined.push(false);
        self.by_name.insert(name.to_owned(), label);
        label
    }

    /// Marks `name`'s label as defined, at the position `visit_label` placed
    /// it. Errors if it was already defined.
    pub fn define(&mut self, name: &str) -> CheckResult<Label> {
        let label = self.intern(name);
        if self.defined[label.0] {
            return Err(CheckError::LabelRedefined);
        }
        self.defined[label.0] = true;
        Ok(label)
    }

    /// Whether `label` has been placed with `visit_label` yet.
    #[must_use]
    pub fn is_defined(&self, label: Label) -> bool {
        self.defined[label.0]
    }

    /// The original string name a label was interned from, for error messages.
    #[must_use]
    pub fn name_of(&self, label: Label) -> &str {
        &self.names[label.0]
    }

    /// Requires that every label interned so far has also been defined,
    /// for use at `visit_end` of a method's code.
    pub fn require_all_defined(&self, context: &'static str) -> CheckResult<()> {
        if self.defined.iter().all(|&d| d) {
            Ok(())
        } else {
            Err(CheckError::UndefinedLabel(context))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        let mut table = LabelTable::new();
        let a = table.intern("L1");
        let b = table.intern("L1");
        assert_eq!(a, b);
    }

    #[test]
    fn define_twice_errors() {
        let mut table = LabelTable::new();
        table.define("L1").unwrap();
        assert!(table.define("L1").is_err());
    }

    #[test]
    fn undefined_labels_are_reported() {
        let mut table = LabelTable::new();
        table.intern("L1");
        assert!(table.require_all_defined("try-catch block").is_err());
        table.define("L1").unwrap();
        assert!(table.require_all_defined("try-catch block").is_ok());
    }
}
