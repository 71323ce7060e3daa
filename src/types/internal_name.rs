//! Internal names and the identifier grammar they're built from.
use itertools::Itertools;

/// Characters forbidden in any unqualified identifier, per the JVM's
/// unqualified-name grammar.
const FORBIDDEN_IN_IDENTIFIER: &[char] = &['.', ';', '[', '/', '<', '>', ':'];

/// Characters additionally forbidden in a class name's identifier segments
/// (a class name allows `/` as the package separator, but not as part of a
/// segment).
const FORBIDDEN_IN_CLASS_SEGMENT: &[char] = &['.', ';', '[', '<', '>', ':'];

/// Validates a bare (non-internal-name) identifier: a method name, a field
/// name, a module or package simple name. Empty identifiers are rejected.
#[must_use]
pub fn is_valid_unqualified_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(FORBIDDEN_IN_IDENTIFIER)
}

/// Validates a slash-separated internal name: zero or more `/`-delimited
/// segments, each a valid identifier under [`FORBIDDEN_IN_CLASS_SEGMENT`].
///
/// `package-info` and `module-info` pseudo-classes are accepted by the class
/// checker without being run through this grammar; everything else,
/// including array and primitive internal-name-shaped strings, is rejected
/// since an internal name never carries `L...;` or `[` wrapping.
#[must_use]
pub fn is_valid_internal_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    name.split('/')
        .all(|segment| !segment.is_empty() && !segment.contains(FORBIDDEN_IN_CLASS_SEGMENT))
}

/// Validates a fully-qualified (dotted) module name, used by `requires`
/// directives. Dots separate segments instead of slashes.
#[must_use]
pub fn is_valid_module_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    name.split('.')
        .all(|segment| !segment.is_empty() && !segment.contains(FORBIDDEN_IN_CLASS_SEGMENT))
}

/// The binary name's package prefix: everything up to and including the last
/// `/`, or the empty string for a name in the unnamed package.
#[must_use]
pub fn package_of(internal_name: &str) -> &str {
    internal_name
        .rfind('/')
        .map_or("", |idx| &internal_name[..=idx])
}

/// Whether `name` ends in the `package-info` or `module-info` pseudo-class
/// marker the class checker exempts from the internal-name grammar.
#[must_use]
pub fn is_info_pseudo_class(name: &str) -> bool {
    name.rsplit('/').next().is_some_and(|last_segment| {
        last_segment == "package-info" || last_segment == "module-info"
    })
}

/// True if `segments` form a dominance chain with no empty link — a small
/// helper used by the class-type signature grammar's inner-class chain.
#[must_use]
pub(crate) fn all_nonempty<'a>(segments: impl IntoIterator<Item = &'a str>) -> bool {
    segments.into_iter().all(|s| !s.is_empty())
}

#[allow(dead_code)]
pub(crate) fn join_dotted(segments: &[&str]) -> String {
    segments.iter().join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_and_nested_names() {
        assert!(is_valid_internal_name("Hello"));
        assert!(is_valid_internal_name("java/lang/Object"));
    }

    #[test]
    fn rejects_empty_segments_and_forbidden_chars() {
        assert!(!is_valid_internal_name(""));
        assert!(!is_valid_internal_name("java//Object"));
        assert!(!is_valid_internal_name("java.lang.Object"));
        assert!(!is_valid_internal_name("[Ljava/lang/Object;"));
        assert!(!is_valid_internal_name("java/lang/Object;"));
    }

    #[test]
    fn module_name_uses_dots() {
        assert!(is_valid_module_name("java.base"));
        assert!(!is_valid_module_name("java/base"));
        assert!(!is_valid_module_name(""));
    }

    #[test]
    fn package_of_examples() {
        assert_eq!(package_of("java/lang/Object"), "java/lang/");
        assert_eq!(package_of("Hello"), "");
    }

    #[test]
    fn info_pseudo_class_detection() {
        assert!(is_info_pseudo_class("module-info"));
        assert!(is_info_pseudo_class("com/example/package-info"));
        assert!(!is_info_pseudo_class("com/example/Hello"));
    }
}
