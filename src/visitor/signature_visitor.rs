use std::fmt::Debug;

use crate::error::CheckResult;

/// The variance marker preceding a type argument in a parameterized type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardKind {
    /// `+`: an upper-bounded (`? extends`) argument.
    Extends,
    /// `-`: a lower-bounded (`? super`) argument.
    Super,
    /// No marker: an exact argument.
    Instanceof,
}

/// Observes the token stream of a class, method, or field signature, driving
/// the same push-down automaton regardless of which of the three signature
/// kinds is being walked.
pub trait SignatureVisitor: Debug {
    /// A formal type parameter's name, e.g. the `T` in `<T:...>`.
    fn visit_formal_type_parameter(&mut self, _name: &str) -> CheckResult<()> {
        Ok(())
    }

    /// The opening of a formal type parameter's class bound (the part before
    /// the first `:`, or after `:` when there is no interface bound list).
    fn visit_class_bound(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        Ok(None)
    }

    /// The opening of one of a formal type parameter's interface bounds.
    fn visit_interface_bound(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        Ok(None)
    }

    /// The opening of a class signature's superclass type.
    fn visit_superclass(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        Ok(None)
    }

    /// The opening of one of a class signature's superinterface types.
    fn visit_interface(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        Ok(None)
    }

    /// The opening of one of a method signature's parameter types.
    fn visit_parameter_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        Ok(None)
    }

    /// The opening of a method signature's return type. Always present on a
    /// method signature.
    fn visit_return_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        Ok(None)
    }

    /// The opening of one of a method signature's declared exception types.
    fn visit_exception_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        Ok(None)
    }

    /// A primitive type code (`B`, `C`, `D`, `F`, `I`, `J`, `S`, `Z`) or `V`
    /// for a method return type.
    fn visit_base_type(&mut self, _descriptor: char) -> CheckResult<()> {
        Ok(())
    }

    /// A type variable reference, e.g. the `T` in `TT;`.
    fn visit_type_variable(&mut self, _name: &str) -> CheckResult<()> {
        Ok(())
    }

    /// The opening of an array type's element type.
    fn visit_array_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        Ok(None)
    }

    /// The start of a (possibly parameterized, possibly nested) class type,
    /// naming its outermost internal name.
    fn visit_class_type(&mut self, _name: &str) -> CheckResult<()> {
        Ok(())
    }

    /// A `.`-qualified inner class segment of the class type currently open.
    fn visit_inner_class_type(&mut self, _name: &str) -> CheckResult<()> {
        Ok(())
    }

    /// An exact (non-wildcard) type argument.
    fn visit_type_argument(&mut self) -> CheckResult<()> {
        Ok(())
    }

    /// A bounded or unbounded wildcard type argument. `Instanceof` opens a
    /// bound subtree; the other two kinds do not.
    fn visit_wildcard_type_argument(
        &mut self,
        wildcard: WildcardKind,
    ) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        let _ = wildcard;
        Ok(None)
    }

    /// The mandatory closing event of the class type currently open.
    fn visit_end(&mut self) -> CheckResult<()> {
        Ok(())
    }
}
