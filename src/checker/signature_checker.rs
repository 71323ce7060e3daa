//! Checker-layer entry points over [`crate::types::signature`]'s grammar
//! walkers, and [`SignatureChecker`], a standalone push-down automaton over
//! [`SignatureVisitor`] events that validates a call sequence on its own
//! terms rather than relying on the grammar walker to only ever produce a
//! legal one.
use crate::{
    error::{CheckError, CheckResult},
    types::signature::{visit_class_signature, visit_field_signature, visit_method_signature},
    visitor::{SignatureVisitor, WildcardKind},
};

/// Validates and (if `visitor` is given) walks a class signature string.
pub fn check_class_signature(signature: &str, visitor: Option<&mut dyn SignatureVisitor>) -> CheckResult<()> {
    match visitor {
        Some(visitor) => visit_class_signature(signature, visitor),
        None => visit_class_signature(signature, &mut NullSignatureVisitor),
    }
}

/// Validates and (if `visitor` is given) walks a method signature string.
pub fn check_method_signature(signature: &str, visitor: Option<&mut dyn SignatureVisitor>) -> CheckResult<()> {
    match visitor {
        Some(visitor) => visit_method_signature(signature, visitor),
        None => visit_method_signature(signature, &mut NullSignatureVisitor),
    }
}

/// Validates and (if `visitor` is given) walks a field signature string.
pub fn check_field_signature(signature: &str, visitor: Option<&mut dyn SignatureVisitor>) -> CheckResult<()> {
    match visitor {
        Some(visitor) => visit_field_signature(signature, visitor),
        None => visit_field_signature(signature, &mut NullSignatureVisitor),
    }
}

/// A visitor that only exists to let the grammar walkers drive a concrete
/// `dyn SignatureVisitor` when the caller supplied none of its own.
#[derive(Debug)]
struct NullSignatureVisitor;

impl SignatureVisitor for NullSignatureVisitor {}

/// A state of [`SignatureChecker`]'s push-down automaton.
///
/// `Formal`, `Bound`, `Super`, `Param` and `Return` are declaration-phase
/// markers held by whichever checker is spawning the nested types of a
/// formal type parameter, superclass/superinterface, or method signature;
/// `SimpleType` and `ClassType` are held by whichever checker is directly
/// receiving one reference type's own events. A checker never holds more
/// than one state at a time; nesting is carried by a stack of return states
/// rather than by a separate state per nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Empty,
    Formal,
    Bound,
    Super,
    Param,
    Return,
    SimpleType,
    ClassType,
    End,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::Empty => "empty",
            State::Formal => "formal",
            State::Bound => "bound",
            State::Super => "super",
            State::Param => "param",
            State::Return => "return",
            State::SimpleType => "simple_type",
            State::ClassType => "class_type",
            State::End => "end",
        }
    }
}

/// Wraps an optional downstream [`SignatureVisitor`], rejecting any event
/// whose method has no transition out of the automaton's current state.
///
/// Every event that opens a nested reference type (a bound, a superclass or
/// superinterface, a parameter or return type, an array's element, or a
/// wildcard's bound) spawns a new `SignatureChecker` starting in the state
/// named for that opening, so a given instance's own state only ever tracks
/// what can legally happen next at its own nesting level. A type's own
/// content — `visit_class_type`, `visit_base_type`, `visit_type_variable`,
/// and the inner-class/type-argument events nested inside a class type —
/// lands on that spawned checker directly, with `visit_end` popping back to
/// whatever state was active before the type that it closes was opened.
#[derive(Debug)]
pub struct SignatureChecker {
    delegate: Option<Box<dyn SignatureVisitor>>,
    state: State,
    returns: Vec<State>,
    produced_content: bool,
}

impl SignatureChecker {
    /// Wraps `delegate`, forwarding every accepted call to it.
    #[must_use]
    pub fn new(delegate: Option<Box<dyn SignatureVisitor>>) -> Self {
        Self {
            delegate,
            state: State::Empty,
            returns: Vec::new(),
            produced_content: false,
        }
    }

    fn child(state: State, delegate: Option<Box<dyn SignatureVisitor>>) -> Self {
        Self {
            delegate,
            state,
            returns: Vec::new(),
            produced_content: false,
        }
    }

    fn require(&self, ok: bool, event: &'static str) -> CheckResult<()> {
        if ok {
            Ok(())
        } else {
            Err(CheckError::IllegalSignatureTransition {
                event,
                state: self.state.name(),
            })
        }
    }

    /// The predecessor set shared by every event that produces a leaf type:
    /// a fresh declaration-phase opening, or a type argument nested inside
    /// the class type currently open.
    fn require_type_position(&self, event: &'static str) -> CheckResult<()> {
        self.require(
            matches!(
                self.state,
                State::Empty | State::Bound | State::Super | State::Param | State::Return | State::ClassType
            ),
            event,
        )
    }
}

impl SignatureVisitor for SignatureChecker {
    fn visit_formal_type_parameter(&mut self, name: &str) -> CheckResult<()> {
        self.require(matches!(self.state, State::Empty | State::Formal), "visit_formal_type_parameter")?;
        self.state = State::Formal;
        self.produced_content = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_formal_type_parameter(name)?;
        }
        Ok(())
    }

    fn visit_class_bound(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        self.require(self.state == State::Formal, "visit_class_bound")?;
        let child_delegate = match &mut self.delegate {
            Some(delegate) => delegate.visit_class_bound()?,
            None => None,
        };
        Ok(Some(Box::new(Self::child(State::Bound, child_delegate))))
    }

    fn visit_interface_bound(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        self.require(self.state == State::Formal, "visit_interface_bound")?;
        let child_delegate = match &mut self.delegate {
            Some(delegate) => delegate.visit_interface_bound()?,
            None => None,
        };
        Ok(Some(Box::new(Self::child(State::Bound, child_delegate))))
    }

    fn visit_superclass(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        self.require(matches!(self.state, State::Empty | State::Formal), "visit_superclass")?;
        self.state = State::Super;
        self.produced_content = true;
        let child_delegate = match &mut self.delegate {
            Some(delegate) => delegate.visit_superclass()?,
            None => None,
        };
        Ok(Some(Box::new(Self::child(State::Super, child_delegate))))
    }

    fn visit_interface(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        self.require(self.state == State::Super, "visit_interface")?;
        let child_delegate = match &mut self.delegate {
            Some(delegate) => delegate.visit_interface()?,
            None => None,
        };
        Ok(Some(Box::new(Self::child(State::Super, child_delegate))))
    }

    fn visit_parameter_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        self.require(matches!(self.state, State::Empty | State::Formal | State::Param), "visit_parameter_type")?;
        self.state = State::Param;
        self.produced_content = true;
        let child_delegate = match &mut self.delegate {
            Some(delegate) => delegate.visit_parameter_type()?,
            None => None,
        };
        Ok(Some(Box::new(Self::child(State::Param, child_delegate))))
    }

    fn visit_return_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        self.require(matches!(self.state, State::Empty | State::Formal | State::Param), "visit_return_type")?;
        self.state = State::Return;
        self.produced_content = true;
        let child_delegate = match &mut self.delegate {
            Some(delegate) => delegate.visit_return_type()?,
            None => None,
        };
        Ok(Some(Box::new(Self::child(State::Return, child_delegate))))
    }

    fn visit_exception_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        self.require(self.state == State::Return, "visit_exception_type")?;
        let child_delegate = match &mut self.delegate {
            Some(delegate) => delegate.visit_exception_type()?,
            None => None,
        };
        Ok(Some(Box::new(Self::child(State::Return, child_delegate))))
    }

    fn visit_base_type(&mut self, descriptor: char) -> CheckResult<()> {
        self.require_type_position("visit_base_type")?;
        self.state = State::SimpleType;
        self.produced_content = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_base_type(descriptor)?;
        }
        Ok(())
    }

    fn visit_type_variable(&mut self, name: &str) -> CheckResult<()> {
        self.require_type_position("visit_type_variable")?;
        self.state = State::SimpleType;
        self.produced_content = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_type_variable(name)?;
        }
        Ok(())
    }

    fn visit_array_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        self.require_type_position("visit_array_type")?;
        self.produced_content = true;
        let child_delegate = match &mut self.delegate {
            Some(delegate) => delegate.visit_array_type()?,
            None => None,
        };
        Ok(Some(Box::new(Self::child(State::Empty, child_delegate))))
    }

    fn visit_class_type(&mut self, name: &str) -> CheckResult<()> {
        self.require_type_position("visit_class_type")?;
        self.returns.push(self.state);
        self.state = State::ClassType;
        self.produced_content = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_class_type(name)?;
        }
        Ok(())
    }

    fn visit_inner_class_type(&mut self, name: &str) -> CheckResult<()> {
        self.require(self.state == State::ClassType, "visit_inner_class_type")?;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_inner_class_type(name)?;
        }
        Ok(())
    }

    fn visit_type_argument(&mut self) -> CheckResult<()> {
        self.require(self.state == State::ClassType, "visit_type_argument")?;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_type_argument()?;
        }
        Ok(())
    }

    fn visit_wildcard_type_argument(
        &mut self,
        wildcard: WildcardKind,
    ) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
        self.require(self.state == State::ClassType, "visit_wildcard_type_argument")?;
        let child_delegate = match &mut self.delegate {
            Some(delegate) => delegate.visit_wildcard_type_argument(wildcard)?,
            None => None,
        };
        match wildcard {
            WildcardKind::Instanceof => Ok(None),
            WildcardKind::Extends | WildcardKind::Super => {
                Ok(Some(Box::new(Self::child(State::Empty, child_delegate))))
            }
        }
    }

    fn visit_end(&mut self) -> CheckResult<()> {
        let ok = match self.state {
            State::ClassType | State::SimpleType | State::Super | State::Return => true,
            State::Empty => self.produced_content,
            State::Formal | State::Bound | State::Param | State::End => false,
        };
        self.require(ok, "visit_end")?;
        self.state = self.returns.pop().unwrap_or(State::End);
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
    fn validates_without_a_visitor() {
        assert!(check_field_signature("Ljava/lang/String;", None).is_ok());
        assert!(check_field_signature("not a signature", None).is_err());
    }

    #[test]
    fn validates_method_signature() {
        assert!(check_method_signature("()V", None).is_ok());
        assert!(check_method_signature("(I", None).is_err());
    }

    #[test]
    fn drives_class_signature_through_signature_checker() {
        let mut checker = SignatureChecker::new(None);
        assert!(check_class_signature("<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/io/Serializable;", Some(&mut checker)).is_ok());
    }

    #[test]
    fn drives_parameterized_field_signature_through_signature_checker() {
        let mut checker = SignatureChecker::new(None);
        assert!(check_field_signature("Ljava/util/List<Ljava/lang/String;>;", Some(&mut checker)).is_ok());
    }

    #[test]
    fn rejects_interface_before_superclass() {
        let mut checker = SignatureChecker::new(None);
        assert!(matches!(
            checker.visit_interface(),
            Err(CheckError::IllegalSignatureTransition { event: "visit_interface", .. })
        ));
    }

    #[test]
    fn rejects_class_bound_without_a_formal_type_parameter() {
        let mut checker = SignatureChecker::new(None);
        assert!(matches!(
            checker.visit_class_bound(),
            Err(CheckError::IllegalSignatureTransition { event: "visit_class_bound", .. })
        ));
    }

    #[test]
    fn rejects_end_with_nothing_opened() {
        let mut checker = SignatureChecker::new(None);
        assert!(matches!(
            checker.visit_end(),
            Err(CheckError::IllegalSignatureTransition { event: "visit_end", .. })
        ));
    }

    #[test]
    fn rejects_calls_after_the_final_end() {
        let mut checker = SignatureChecker::new(None);
        checker.visit_class_type("java/lang/String").unwrap();
        checker.visit_end().unwrap();
        checker.visit_end().unwrap();
        assert!(matches!(
            checker.visit_class_type("java/lang/Object"),
            Err(CheckError::IllegalSignatureTransition { event: "visit_class_type", .. })
        ));
    }

    #[test]
    fn rejects_type_argument_outside_a_class_type() {
        let mut checker = SignatureChecker::new(None);
        assert!(matches!(
            checker.visit_type_argument(),
            Err(CheckError::IllegalSignatureTransition { event: "visit_type_argument", .. })
        ));
    }

    #[test]
    fn rejects_a_parameter_type_visited_after_the_return_type() {
        let mut checker = SignatureChecker::new(None);
        checker.visit_parameter_type().unwrap();
        checker.visit_return_type().unwrap();
        assert!(matches!(
            checker.visit_parameter_type(),
            Err(CheckError::IllegalSignatureTransition { event: "visit_parameter_type", .. })
        ));
    }
}
