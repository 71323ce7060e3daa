//! Method handles and dynamically-computed constants.
use derive_more::Display;

/// The nine method-handle kinds, tag values 1..9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum HandleKind {
    /// Tag 1: `REF_getField`.
    #[display("GETFIELD")]
    GetField,
    /// Tag 2: `REF_getStatic`.
    #[display("GETSTATIC")]
    GetStatic,
    /// Tag 3: `REF_putField`.
    #[display("PUTFIELD")]
    PutField,
    /// Tag 4: `REF_putStatic`.
    #[display("PUTSTATIC")]
    PutStatic,
    /// Tag 5: `REF_invokeVirtual`.
    #[display("INVOKEVIRTUAL")]
    InvokeVirtual,
    /// Tag 6: `REF_invokeStatic`.
    #[display("INVOKESTATIC")]
    InvokeStatic,
    /// Tag 7: `REF_invokeSpecial`.
    #[display("INVOKESPECIAL")]
    InvokeSpecial,
    /// Tag 8: `REF_newInvokeSpecial`.
    #[display("NEWINVOKESPECIAL")]
    NewInvokeSpecial,
    /// Tag 9: `REF_invokeInterface`.
    #[display("INVOKEINTERFACE")]
    InvokeInterface,
}

impl HandleKind {
    /// Recovers the handle kind whose tag value is `tag`.
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::GetField),
            2 => Some(Self::GetStatic),
            3 => Some(Self::PutField),
            4 => Some(Self::PutStatic),
            5 => Some(Self::InvokeVirtual),
            6 => Some(Self::InvokeStatic),
            7 => Some(Self::InvokeSpecial),
            8 => Some(Self::NewInvokeSpecial),
            9 => Some(Self::InvokeInterface),
            _ => None,
        }
    }

    /// Whether this kind may be used as an `invokedynamic`/`constantdynamic`
    /// bootstrap method handle. Only `INVOKESTATIC` and `NEWINVOKESPECIAL`
    /// qualify.
    #[must_use]
    pub const fn is_legal_bootstrap_handle(self) -> bool {
        matches!(self, Self::InvokeStatic | Self::NewInvokeSpecial)
    }

    /// The tag's uppercase name, e.g. `"GETFIELD"`, for error messages that
    /// need a `&'static str` rather than a `Display` impl.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetField => "GETFIELD",
            Self::GetStatic => "GETSTATIC",
            Self::PutField => "PUTFIELD",
            Self::PutStatic => "PUTSTATIC",
            Self::InvokeVirtual => "INVOKEVIRTUAL",
            Self::InvokeStatic => "INVOKESTATIC",
            Self::InvokeSpecial => "INVOKESPECIAL",
            Self::NewInvokeSpecial => "NEWINVOKESPECIAL",
            Self::InvokeInterface => "INVOKEINTERFACE",
        }
    }
}

/// A reified reference to a field or method, tagged with the kind of access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
    /// The kind of member access this handle performs.
    pub kind: HandleKind,
    /// The internal name of the owner class or interface.
    pub owner: String,
    /// The member's name.
    pub name: String,
    /// The member's field or method descriptor.
    pub descriptor: String,
    /// Whether `owner` is an interface.
    pub is_interface: bool,
}

/// A constant-pool entry whose value is produced by invoking a bootstrap
/// method at link time. Bootstrap arguments may recursively contain
/// constant-dynamic values.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDynamic {
    /// The constant's name.
    pub name: String,
    /// The constant's field descriptor.
    pub descriptor: String,
    /// The bootstrap method handle.
    pub bootstrap_method: Handle,
    /// The static arguments passed to the bootstrap method.
    pub bootstrap_arguments: Vec<BootstrapArgument>,
}

/// One static argument to a bootstrap method: any loadable constant,
/// including (recursively) another constant-dynamic value.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum BootstrapArgument {
    /// A 32-bit integer constant.
    Int(i32),
    /// A 32-bit floating point constant.
    Float(f32),
    /// A 64-bit integer constant.
    Long(i64),
    /// A 64-bit floating point constant.
    Double(f64),
    /// A `String` constant.
    String(String),
    /// A `Class` constant naming a type descriptor.
    ClassType(String),
    /// A method handle constant.
    Handle(Handle),
    /// A method type (descriptor-only) constant.
    MethodType(String),
    /// A nested dynamically-computed constant.
    ConstantDynamic(Box<ConstantDynamic>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_static_and_new_invoke_special_are_legal_bootstrap_handles() {
        for tag in 1..=9u8 {
            let kind = HandleKind::from_tag(tag).unwrap();
            let expected = matches!(kind, HandleKind::InvokeStatic | HandleKind::NewInvokeSpecial);
            assert_eq!(kind.is_legal_bootstrap_handle(), expected, "{kind:?}");
        }
    }

    #[test]
    fn unknown_tag_is_none() {
        assert_eq!(HandleKind::from_tag(0), None);
        assert_eq!(HandleKind::from_tag(10), None);
    }
}
