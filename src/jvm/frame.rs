//! Stack-map frame element kinds and frame-type shape limits.
use derive_more::Display;

/// One element of a stack-map frame's locals or operand stack: either a
/// primitive verification kind, a reference named by internal name, or a
/// reference to the `new` instruction that produced an as-yet-uninitialized
/// object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameElement {
    /// Ordinal 0: `top` (unusable / padding slot).
    Top,
    /// Ordinal 1: `int`.
    Integer,
    /// Ordinal 2: `float`.
    Float,
    /// Ordinal 4: `double`.
    Double,
    /// Ordinal 3: `long`.
    Long,
    /// Ordinal 5: `null`.
    Null,
    /// Ordinal 6: `uninitializedThis`.
    UninitializedThis,
    /// A reference type, named by internal name.
    Reference(String),
    /// An uninitialized value produced by the `new` instruction at the given
    /// label, named the same way every other label-valued operand in
    /// [`crate::visitor::MethodVisitor`] is: by its string name, resolved
    /// against the method checker's own label table.
    Uninitialized(String),
}

impl FrameElement {
    /// This element's ordinal in the 0..=6 primitive-kind enumeration, or
    /// `None` for the two non-primitive variants.
    #[must_use]
    pub const fn primitive_ordinal(&self) -> Option<u8> {
        match self {
            Self::Top => Some(0),
            Self::Integer => Some(1),
            Self::Float => Some(2),
            Self::Double => Some(3),
            Self::Long => Some(4),
            Self::Null => Some(5),
            Self::UninitializedThis => Some(6),
            Self::Reference(_) | Self::Uninitialized(_) => None,
        }
    }
}

/// The shape of a stack-map frame, as visited through the method checker.
///
/// `Same` through `Chop` are "compressed" forms; `Full` (and, by convention
/// here, any frame whose element counts exceed a compressed form's limit) is
/// the "expanded"/"new" form. Invariant: a method's frames are either all
/// compressed or all expanded (never mixed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FrameKind {
    /// `same_frame` / `same_frame_extended`: 0 locals delta, 0 stack elements.
    Same,
    /// `same_locals_1_stack_item(_extended)`: 0 locals delta, 1 stack element.
    Same1,
    /// `append_frame`: up to 3 locals appended, 0 stack elements.
    Append,
    /// `chop_frame`: up to 3 locals removed, 0 stack elements.
    Chop,
    /// `full_frame`: unrestricted locals and stack elements ("new"/"expanded").
    Full,
}

impl FrameKind {
    /// The maximum number of locals this frame type may carry, or `None` if unbounded.
    #[must_use]
    pub const fn max_locals(self) -> Option<u16> {
        match self {
            Self::Same | Self::Same1 => Some(0),
            Self::Append | Self::Chop => Some(3),
            Self::Full => None,
        }
    }

    /// The maximum number of stack elements this frame type may carry, or `None` if unbounded.
    #[must_use]
    pub const fn max_stack(self) -> Option<u16> {
        match self {
            Self::Same | Self::Append | Self::Chop => Some(0),
            Self::Same1 => Some(1),
            Self::Full => None,
        }
    }

    /// Whether this frame type belongs to the "expanded" ("new") family
    /// rather than the "compressed" family; only [`FrameKind::Full`] is expanded.
    #[must_use]
    pub const fn is_expanded(self) -> bool {
        matches!(self, Self::Full)
    }

    /// A lowercase name for this frame kind, for error messages that need a
    /// `&'static str` rather than a `Display` impl.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Same1 => "same1",
            Self::Append => "append",
            Self::Chop => "chop",
            Self::Full => "full",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_kind_shape_limits() {
        assert_eq!(FrameKind::Same.max_locals(), Some(0));
        assert_eq!(FrameKind::Same.max_stack(), Some(0));
        assert_eq!(FrameKind::Same1.max_stack(), Some(1));
        assert_eq!(FrameKind::Append.max_locals(), Some(3));
        assert_eq!(FrameKind::Chop.max_locals(), Some(3));
        assert_eq!(FrameKind::Full.max_locals(), None);
        assert_eq!(FrameKind::Full.max_stack(), None);
    }

    #[test]
    fn only_full_is_expanded() {
        assert!(FrameKind::Full.is_expanded());
        assert!(!FrameKind::Same.is_expanded());
        assert!(!FrameKind::Same1.is_expanded());
        assert!(!FrameKind::Append.is_expanded());
        assert!(!FrameKind::Chop.is_expanded());
    }

    #[test]
    fn primitive_ordinals_are_stable() {
        assert_eq!(FrameElement::Top.primitive_ordinal(), Some(0));
        assert_eq!(FrameElement::Integer.primitive_ordinal(), Some(1));
        assert_eq!(FrameElement::Float.primitive_ordinal(), Some(2));
        assert_eq!(FrameElement::Double.primitive_ordinal(), Some(3));
        assert_eq!(FrameElement::Long.primitive_ordinal(), Some(4));
        assert_eq!(FrameElement::Null.primitive_ordinal(), Some(5));
        assert_eq!(FrameElement::UninitializedThis.primitive_ordinal(), Some(6));
        assert_eq!(FrameElement::Reference("X".into()).primitive_ordinal(), None);
    }
}
