//! Field and method descriptor grammars:
//!
//! ```text
//! FieldDescriptor  ::= B|C|D|F|I|J|S|Z | L InternalName ; | [ FieldDescriptor
//! MethodDescriptor ::= ( FieldDescriptor* ) ( V | FieldDescriptor )
//! ```
use super::internal_name::is_valid_internal_name;

const PRIMITIVE_TAGS: &[char] = &['B', 'C', 'D', 'F', 'I', 'J', 'S', 'Z'];

/// Consumes one field descriptor from the front of `input`, returning the
/// unconsumed remainder on success.
#[must_use]
pub fn parse_field_descriptor(input: &str) -> Option<&str> {
    let mut chars = input.chars();
    match chars.next()? {
        tag if PRIMITIVE_TAGS.contains(&tag) => Some(chars.as_str()),
        '[' => parse_field_descriptor(chars.as_str()),
        'L' => {
            let rest = chars.as_str();
            let end = rest.find(';')?;
            let internal_name = &rest[..end];
            if is_valid_internal_name(internal_name) {
                Some(&rest[end + 1..])
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Whether `descriptor` is, in its entirety, one valid field descriptor.
#[must_use]
pub fn is_valid_field_descriptor(descriptor: &str) -> bool {
    matches!(parse_field_descriptor(descriptor), Some(""))
}

/// Whether `descriptor` is, in its entirety, one valid method descriptor.
#[must_use]
pub fn is_valid_method_descriptor(descriptor: &str) -> bool {
    let Some(after_open) = descriptor.strip_prefix('(') else {
        return false;
    };
    let mut rest = after_open;
    loop {
        if let Some(after_close) = rest.strip_prefix(')') {
            rest = after_close;
            break;
        }
        match parse_field_descriptor(rest) {
            Some(next) => rest = next,
            None => return false,
        }
    }
    if let Some(stripped) = rest.strip_prefix('V') {
        return stripped.is_empty();
    }
    matches!(parse_field_descriptor(rest), Some(""))
}

/// The number of parameter descriptors in a method descriptor, or `None` if
/// `descriptor` is not a valid method descriptor. Used to validate annotable
/// parameter counts against a method's actual parameter count.
#[must_use]
pub fn method_parameter_count(descriptor: &str) -> Option<u16> {
    let after_open = descriptor.strip_prefix('(')?;
    let mut rest = after_open;
    let mut count: u16 = 0;
    loop {
        if let Some(after_close) = rest.strip_prefix(')') {
            rest = after_close;
            break;
        }
        rest = parse_field_descriptor(rest)?;
        count += 1;
    }
    let _ = rest;
    Some(count)
}

/// The number of leading `[` characters, i.e. the array dimension of a field
/// descriptor, used by `multianewarray`'s dimension-count check.
#[must_use]
pub fn bracket_depth(descriptor: &str) -> u8 {
    u8::try_from(descriptor.chars().take_while(|&c| c == '[').count()).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_descriptors_are_valid() {
        for tag in PRIMITIVE_TAGS {
            assert!(is_valid_field_descriptor(&tag.to_string()));
        }
    }

    #[test]
    fn object_and_array_descriptors() {
        assert!(is_valid_field_descriptor("Ljava/lang/String;"));
        assert!(is_valid_field_descriptor("[I"));
        assert!(is_valid_field_descriptor("[[Ljava/lang/String;"));
        assert!(!is_valid_field_descriptor("Ljava/lang/String"));
        assert!(!is_valid_field_descriptor("Q"));
        assert!(!is_valid_field_descriptor(""));
        assert!(!is_valid_field_descriptor("[I extra"));
    }

    #[test]
    fn method_descriptors() {
        assert!(is_valid_method_descriptor("()V"));
        assert!(is_valid_method_descriptor("([Ljava/lang/String;)V"));
        assert!(is_valid_method_descriptor("(IJ)Ljava/lang/String;"));
        assert!(!is_valid_method_descriptor("(I)"));
        assert!(!is_valid_method_descriptor("V()"));
        assert!(!is_valid_method_descriptor("()VV"));
    }

    #[test]
    fn parameter_count() {
        assert_eq!(method_parameter_count("()V"), Some(0));
        assert_eq!(method_parameter_count("(IJLjava/lang/String;)V"), Some(3));
        assert_eq!(method_parameter_count("(broken"), None);
    }

    #[test]
    fn bracket_depth_examples() {
        assert_eq!(bracket_depth("[[[I"), 3);
        assert_eq!(bracket_depth("I"), 0);
        assert_eq!(bracket_depth("Ljava/lang/Object;"), 0);
    }
}
