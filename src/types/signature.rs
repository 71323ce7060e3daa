//! Class, method and field signature grammars, and the order-enforcing
//! adapter that drives a [`SignatureVisitor`] through them.
//!
//! A signature is a string-form encoding of generic type information layered
//! on top of a plain descriptor. The three entry points below each walk one
//! of the three signature kinds, calling into a visitor as they go and
//! rejecting malformed input with [`CheckError::MalformedSignature`].
use crate::{
    error::{CheckError, CheckResult},
    types::internal_name::is_valid_unqualified_name,
    visitor::{SignatureVisitor, WildcardKind},
};

fn malformed(signature: &str) -> CheckError {
    CheckError::MalformedSignature(signature.to_owned())
}

/// Parses a class signature (`ClassSignature` grammar: optional formal type
/// parameters, one superclass type, zero or more superinterface types) and
/// drives `visitor` through it.
pub fn visit_class_signature(signature: &str, visitor: &mut dyn SignatureVisitor) -> CheckResult<()> {
    let full = signature;
    let rest = parse_formal_type_parameters(signature, visitor)?;
    let rest = parse_required_class_type(rest, full, |v| v.visit_superclass(), visitor)?;
    let mut rest = rest;
    while !rest.is_empty() {
        rest = parse_required_class_type(rest, full, |v| v.visit_interface(), visitor)?;
    }
    visitor.visit_end()
}

/// Parses a method signature (`MethodSignature` grammar: optional formal
/// type parameters, parenthesized parameter types, one return type, zero or
/// more thrown exception types) and drives `visitor` through it.
pub fn visit_method_signature(signature: &str, visitor: &mut dyn SignatureVisitor) -> CheckResult<()> {
    let full = signature;
    let rest = parse_formal_type_parameters(signature, visitor)?;
    let mut rest = rest.strip_prefix('(').ok_or_else(|| malformed(full))?;
    while !rest.starts_with(')') {
        if rest.is_empty() {
            return Err(malformed(full));
        }
        rest = parse_required_type(rest, full, |v| v.visit_parameter_type(), visitor)?;
    }
    rest = &rest[1..];
    let mut rest = if let Some(after_void) = rest.strip_prefix('V') {
        let mut child = visitor.visit_return_type()?;
        let sink: &mut dyn SignatureVisitor = child.as_deref_mut().unwrap_or(visitor);
        sink.visit_base_type('V')?;
        after_void
    } else {
        parse_required_type(rest, full, |v| v.visit_return_type(), visitor)?
    };
    while rest.starts_with('^') {
        rest = parse_required_reference_type(&rest[1..], full, |v| v.visit_exception_type(), visitor)?;
    }
    if !rest.is_empty() {
        return Err(malformed(full));
    }
    visitor.visit_end()
}

/// Parses a field signature (`FieldSignature` grammar: a single reference
/// type) and drives `visitor` through it.
pub fn visit_field_signature(signature: &str, visitor: &mut dyn SignatureVisitor) -> CheckResult<()> {
    let full = signature;
    let rest = parse_reference_type(signature, full, visitor)?;
    if !rest.is_empty() {
        return Err(malformed(full));
    }
    visitor.visit_end()
}

fn parse_formal_type_parameters<'a>(
    signature: &'a str,
    visitor: &mut dyn SignatureVisitor,
) -> CheckResult<&'a str> {
    let Some(after_open) = signature.strip_prefix('<') else {
        return Ok(signature);
    };
    let mut rest = after_open;
    let full = signature;
    loop {
        let colon = rest.find(':').ok_or_else(|| malformed(full))?;
        let name = &rest[..colon];
        if !is_valid_unqualified_name(name) {
            return Err(malformed(full));
        }
        visitor.visit_formal_type_parameter(name)?;
        rest = &rest[colon + 1..];
        if !rest.starts_with(':') && !rest.starts_with('>') && !rest.is_empty() {
            rest = parse_optional_reference_type(rest, full, |v| v.visit_class_bound(), visitor)?;
        }
        while rest.starts_with(':') {
            rest = parse_required_reference_type(&rest[1..], full, |v| v.visit_interface_bound(), visitor)?;
        }
        if let Some(after_close) = rest.strip_prefix('>') {
            return Ok(after_close);
        }
    }
}

fn parse_optional_reference_type<'a>(
    rest: &'a str,
    full: &str,
    open: impl FnOnce(&mut dyn SignatureVisitor) -> CheckResult<Option<Box<dyn SignatureVisitor>>>,
    visitor: &mut dyn SignatureVisitor,
) -> CheckResult<&'a str> {
    parse_required_reference_type(rest, full, open, visitor)
}

fn parse_required_class_type<'a>(
    rest: &'a str,
    full: &str,
    open: impl FnOnce(&mut dyn SignatureVisitor) -> CheckResult<Option<Box<dyn SignatureVisitor>>>,
    visitor: &mut dyn SignatureVisitor,
) -> CheckResult<&'a str> {
    if !rest.starts_with('L') {
        return Err(malformed(full));
    }
    parse_required_reference_type(rest, full, open, visitor)
}

fn parse_required_reference_type<'a>(
    rest: &'a str,
    full: &str,
    open: impl FnOnce(&mut dyn SignatureVisitor) -> CheckResult<Option<Box<dyn SignatureVisitor>>>,
    visitor: &mut dyn SignatureVisitor,
) -> CheckResult<&'a str> {
    let mut child = open(visitor)?;
    let sink: &mut dyn SignatureVisitor = child.as_deref_mut().unwrap_or(visitor);
    parse_reference_type(rest, full, sink)
}

fn parse_required_type<'a>(
    rest: &'a str,
    full: &str,
    open: impl FnOnce(&mut dyn SignatureVisitor) -> CheckResult<Option<Box<dyn SignatureVisitor>>>,
    visitor: &mut dyn SignatureVisitor,
) -> CheckResult<&'a str> {
    let mut child = open(visitor)?;
    let sink: &mut dyn SignatureVisitor = child.as_deref_mut().unwrap_or(visitor);
    parse_type(rest, full, sink)
}

/// Parses one `TypeSignature`: a primitive base type, or a reference type
/// (class type, type variable, or array).
fn parse_type<'a>(rest: &'a str, full: &str, visitor: &mut dyn SignatureVisitor) -> CheckResult<&'a str> {
    let mut chars = rest.chars();
    match chars.next().ok_or_else(|| malformed(full))? {
        tag @ ('B' | 'C' | 'D' | 'F' | 'I' | 'J' | 'S' | 'Z') => {
            visitor.visit_base_type(tag)?;
            Ok(chars.as_str())
        }
        _ => parse_reference_type(rest, full, visitor),
    }
}

/// Parses one `ReferenceTypeSignature`: a class type, a type variable, or an
/// array type.
fn parse_reference_type<'a>(rest: &'a str, full: &str, visitor: &mut dyn SignatureVisitor) -> CheckResult<&'a str> {
    let mut chars = rest.chars();
    match chars.next().ok_or_else(|| malformed(full))? {
        'L' => parse_class_type(chars.as_str(), full, visitor),
        'T' => {
            let body = chars.as_str();
            let end = body.find(';').ok_or_else(|| malformed(full))?;
            let name = &body[..end];
            if !is_valid_unqualified_name(name) {
                return Err(malformed(full));
            }
            visitor.visit_type_variable(name)?;
            Ok(&body[end + 1..])
        }
        '[' => {
            let mut child = visitor.visit_array_type()?;
            let sink: &mut dyn SignatureVisitor = child.as_deref_mut().unwrap_or(visitor);
            parse_type(chars.as_str(), full, sink)
        }
        _ => Err(malformed(full)),
    }
}

/// Parses the body of a class type after the leading `L`: a dotted-segment
/// internal name, an optional type-argument list, zero or more `.`-qualified
/// inner-class segments each with their own optional type-argument list, and
/// the closing `;`.
fn parse_class_type<'a>(rest: &'a str, full: &str, visitor: &mut dyn SignatureVisitor) -> CheckResult<&'a str> {
    let name_end = rest
        .find(|c| matches!(c, ';' | '.' | '<'))
        .ok_or_else(|| malformed(full))?;
    let name = &rest[..name_end];
    if name.is_empty() {
        return Err(malformed(full));
    }
    visitor.visit_class_type(name)?;
    let mut rest = &rest[name_end..];
    rest = parse_optional_type_arguments(rest, full, visitor)?;
    while let Some(after_dot) = rest.strip_prefix('.') {
        let inner_end = after_dot
            .find(|c| matches!(c, ';' | '.' | '<'))
            .ok_or_else(|| malformed(full))?;
        let inner_name = &after_dot[..inner_end];
        if inner_name.is_empty() {
            return Err(malformed(full));
        }
        visitor.visit_inner_class_type(inner_name)?;
        rest = &after_dot[inner_end..];
        rest = parse_optional_type_arguments(rest, full, visitor)?;
    }
    let rest = rest.strip_prefix(';').ok_or_else(|| malformed(full))?;
    visitor.visit_end()?;
    Ok(rest)
}

fn parse_optional_type_arguments<'a>(
    rest: &'a str,
    full: &str,
    visitor: &mut dyn SignatureVisitor,
) -> CheckResult<&'a str> {
    let Some(after_open) = rest.strip_prefix('<') else {
        return Ok(rest);
    };
    let mut rest = after_open;
    loop {
        rest = match rest.chars().next().ok_or_else(|| malformed(full))? {
            '>' => return Ok(&rest[1..]),
            '*' => {
                visitor.visit_wildcard_type_argument(WildcardKind::Instanceof)?;
                &rest[1..]
            }
            tag @ ('+' | '-') => {
                let wildcard = if tag == '+' {
                    WildcardKind::Extends
                } else {
                    WildcardKind::Super
                };
                let mut child = visitor.visit_wildcard_type_argument(wildcard)?;
                let sink: &mut dyn SignatureVisitor = child.as_deref_mut().unwrap_or(visitor);
                parse_reference_type(&rest[1..], full, sink)?
            }
            _ => {
                visitor.visit_type_argument()?;
                parse_reference_type(rest, full, visitor)?
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl SignatureVisitor for Recorder {
        fn visit_formal_type_parameter(&mut self, name: &str) -> CheckResult<()> {
            self.events.push(format!("formal:{name}"));
            Ok(())
        }
        fn visit_class_bound(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
            self.events.push("class_bound".into());
            Ok(None)
        }
        fn visit_interface_bound(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
            self.events.push("interface_bound".into());
            Ok(None)
        }
        fn visit_superclass(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
            self.events.push("superclass".into());
            Ok(None)
        }
        fn visit_interface(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
            self.events.push("interface".into());
            Ok(None)
        }
        fn visit_parameter_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
            self.events.push("parameter".into());
            Ok(None)
        }
        fn visit_return_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
            self.events.push("return".into());
            Ok(None)
        }
        fn visit_exception_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
            self.events.push("exception".into());
            Ok(None)
        }
        fn visit_base_type(&mut self, descriptor: char) -> CheckResult<()> {
            self.events.push(format!("base:{descriptor}"));
            Ok(())
        }
        fn visit_type_variable(&mut self, name: &str) -> CheckResult<()> {
            self.events.push(format!("var:{name}"));
            Ok(())
        }
        fn visit_array_type(&mut self) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
            self.events.push("array".into());
            Ok(None)
        }
        fn visit_class_type(&mut self, name: &str) -> CheckResult<()> {
            self.events.push(format!("class:{name}"));
            Ok(())
        }
        fn visit_inner_class_type(&mut self, name: &str) -> CheckResult<()> {
            self.events.push(format!("inner:{name}"));
            Ok(())
        }
        fn visit_type_argument(&mut self) -> CheckResult<()> {
            self.events.push("arg".into());
            Ok(())
        }
        fn visit_wildcard_type_argument(
            &mut self,
            wildcard: WildcardKind,
        ) -> CheckResult<Option<Box<dyn SignatureVisitor>>> {
            self.events.push(format!("wildcard:{wildcard:?}"));
            Ok(None)
        }
        fn visit_end(&mut self) -> CheckResult<()> {
            self.events.push("end".into());
            Ok(())
        }
    }

    #[test]
    fn field_signature_simple_class_type() {
        let mut recorder = Recorder::default();
        visit_field_signature("Ljava/lang/String;", &mut recorder).unwrap();
        assert_eq!(recorder.events, vec!["class:java/lang/String", "end", "end"]);
    }

    #[test]
    fn field_signature_parameterized_type() {
        let mut recorder = Recorder::default();
        visit_field_signature("Ljava/util/List<Ljava/lang/String;>;", &mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec!["class:java/util/List", "arg", "class:java/lang/String", "end", "end", "end"]
        );
    }

    #[test]
    fn method_signature_generic_with_bound_and_exception() {
        let mut recorder = Recorder::default();
        visit_method_signature(
            "<T:Ljava/lang/Object;>(TT;)V^Ljava/io/IOException;",
            &mut recorder,
        )
        .unwrap();
        assert!(recorder.events.contains(&"formal:T".to_string()));
        assert!(recorder.events.contains(&"class_bound".to_string()));
        assert!(recorder.events.contains(&"parameter".to_string()));
        assert!(recorder.events.contains(&"return".to_string()));
        assert!(recorder.events.contains(&"exception".to_string()));
    }

    #[test]
    fn class_signature_superclass_and_interfaces() {
        let mut recorder = Recorder::default();
        visit_class_signature(
            "Ljava/lang/Object;Ljava/io/Serializable;Ljava/lang/Cloneable;",
            &mut recorder,
        )
        .unwrap();
        assert_eq!(
            recorder.events,
            vec![
                "superclass".into(),
                "class:java/lang/Object".into(),
                "end".into(),
                "interface".into(),
                "class:java/io/Serializable".into(),
                "end".into(),
                "interface".into(),
                "class:java/lang/Cloneable".into(),
                "end".into(),
                "end".into(),
            ]
        );
    }

    #[test]
    fn rejects_malformed_signatures() {
        let mut recorder = Recorder::default();
        assert!(visit_field_signature("Ljava/lang/String", &mut recorder).is_err());
        assert!(visit_field_signature("Q", &mut recorder).is_err());
        assert!(visit_method_signature("(I", &mut recorder).is_err());
    }

    #[test]
    fn array_and_wildcard_type_arguments() {
        let mut recorder = Recorder::default();
        visit_field_signature("[Ljava/lang/String;", &mut recorder).unwrap();
        assert_eq!(recorder.events[0], "array");

        let mut recorder = Recorder::default();
        visit_field_signature("Ljava/util/List<+Ljava/lang/Number;>;", &mut recorder).unwrap();
        assert!(recorder.events.contains(&"wildcard:Extends".to_string()));

        let mut recorder = Recorder::default();
        visit_field_signature("Ljava/util/List<*>;", &mut recorder).unwrap();
        assert!(recorder.events.contains(&"wildcard:Instanceof".to_string()));
    }
}
