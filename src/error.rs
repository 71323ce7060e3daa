//! The error taxonomy raised by every checker in this crate.

/// The five error kinds from the checker's error handling design.
///
/// Every [`CheckError`] variant maps to exactly one kind via [`CheckError::kind`],
/// so a caller that only cares about the taxonomy (and not the exact wording)
/// can match on this instead of the `Display` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A single argument is out of its declared domain: null where forbidden,
    /// an out-of-range integer, a malformed descriptor/signature, an unknown
    /// flag bit, a wrong-length array.
    Argument,
    /// A method was called in a forbidden state: before the header, after
    /// `end`, mixed frame modes, an already-seen unique event, a redefined
    /// label.
    State,
    /// A label or nest-member was referenced but never defined, or a
    /// try-catch range whose labels were visited in an unacceptable order.
    Reference,
    /// The dataflow option was requested but max-stack/max-locals are zero,
    /// or the API version is below the minimum for an experimental call.
    Configuration,
    /// A visitor method that this checker refuses to support.
    Unsupported,
}

/// An error raised synchronously by a checker when it rejects an event.
///
/// The call that produced this error is rejected: the checker's downstream
/// delegate, if any, is never invoked for that call, and the chain that
/// produced the error must be discarded (see the crate's concurrency and
/// resource model).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    /// Access flags are not a subset of the site's admissible mask.
    #[error("access flags {flags:#06x} at {site} are not a subset of the admissible mask {admissible:#06x}")]
    DisallowedAccessFlags {
        /// The name of the site being validated, e.g. `"class"` or `"method"`.
        site: &'static str,
        /// The flags that were rejected.
        flags: u16,
        /// The admissible mask for `site`.
        admissible: u16,
    },
    /// More than one of `public`/`protected`/`private` was set.
    #[error("access flags at {site} set more than one of public, protected and private")]
    ConflictingVisibility {
        /// The name of the site being validated.
        site: &'static str,
    },
    /// Both `final` and `abstract` were set.
    #[error("access flags at {site} declare both final and abstract")]
    FinalAndAbstract {
        /// The name of the site being validated.
        site: &'static str,
    },
    /// An internal name failed the internal-name grammar.
    #[error("malformed internal name: {0:?}")]
    MalformedInternalName(String),
    /// A field descriptor failed the field-descriptor grammar.
    #[error("malformed field descriptor: {0:?}")]
    MalformedFieldDescriptor(String),
    /// A method descriptor failed the method-descriptor grammar.
    #[error("malformed method descriptor: {0:?}")]
    MalformedMethodDescriptor(String),
    /// A signature string failed the signature grammar.
    #[error("malformed signature: {0:?}")]
    MalformedSignature(String),
    /// An opcode was routed to the wrong generic `visit_*` method.
    #[error("{opcode} cannot be visited through visit_{method}")]
    WrongVisitMethod {
        /// The mnemonic of the misrouted opcode.
        opcode: &'static str,
        /// The generic visitor method it was (incorrectly) routed to.
        method: &'static str,
    },
    /// An instruction operand is out of its declared domain.
    #[error("operand {value} is out of range for {insn}")]
    OperandOutOfRange {
        /// The mnemonic of the instruction.
        insn: &'static str,
        /// The offending operand value.
        value: i64,
    },
    /// `INVOKEVIRTUAL` was used with an interface owner.
    #[error("INVOKEVIRTUAL can't be used with interfaces")]
    InvokeVirtualOnInterface,
    /// `INVOKEINTERFACE` was used with a non-interface owner.
    #[error("INVOKEINTERFACE can only be used with interfaces")]
    InvokeInterfaceOnClass,
    /// `INVOKESPECIAL` was used on an interface below class version 52.0 (Java 8).
    #[error("INVOKESPECIAL on an interface requires class file version 52.0 or above")]
    InvokeSpecialInterfaceTooOld,
    /// `<init>` was invoked with an opcode other than `INVOKESPECIAL`.
    #[error("<init> may only be invoked with INVOKESPECIAL")]
    InitNotInvokedWithInvokeSpecial,
    /// `NEW` was given an array descriptor.
    #[error("NEW cannot be used with an array type")]
    NewWithArrayType,
    /// `MULTIANEWARRAY`'s dimension count is outside `[1, bracket count]`.
    #[error("invalid dimension count {dimensions} for descriptor {descriptor:?} (max {max})")]
    InvalidArrayDimensions {
        /// The dimension count supplied.
        dimensions: u8,
        /// The array descriptor.
        descriptor: String,
        /// The maximum permitted dimension count (the descriptor's bracket run).
        max: u8,
    },
    /// A handle tag is not a legal bootstrap method handle kind.
    #[error("handle kind {0:?} cannot be used as an invokedynamic bootstrap method")]
    IllegalBootstrapHandleKind(&'static str),
    /// A constant kind is not permitted in the given context (annotation value or LDC).
    #[error("{context} does not accept a constant of kind {kind}")]
    IllegalConstantKind {
        /// The context, e.g. `"annotation value"` or `"LDC"`.
        context: &'static str,
        /// The rejected constant kind's name.
        kind: &'static str,
    },
    /// A visitor method was called before the mandatory opening event.
    #[error("{0} was called before the required opening event")]
    BeforeOpeningEvent(&'static str),
    /// A visitor method was called after `end`.
    #[error("{0} was called after end")]
    AfterEnd(&'static str),
    /// A unique event was visited more than once.
    #[error("{0} was already visited")]
    AlreadySeen(&'static str),
    /// `visit_label` was called with a label that is already defined.
    #[error("label is already defined")]
    LabelRedefined,
    /// `visit_nest_host` and `visit_nest_member` were both used on one class.
    #[error("visitNestMember and visitNestHost are mutually exclusive")]
    NestHostAndMemberConflict,
    /// A second nest member did not share the first member's package.
    #[error("nest member {member:?} is not in the nest's package {expected_package:?}")]
    NestMemberPackageMismatch {
        /// The offending member's internal name.
        member: String,
        /// The package established by the first nest member.
        expected_package: String,
    },
    /// A module directive of some kind was declared twice with the same primary name.
    #[error("{kind} {name:?} is already declared in this module")]
    DuplicateModuleDirective {
        /// The directive kind, e.g. `"requires"` or `"exports"`.
        kind: &'static str,
        /// The duplicated primary name.
        name: String,
    },
    /// An `open` directive was used on a module that is itself open.
    #[error("an open module cannot declare an opens directive")]
    OpensInOpenModule,
    /// `transitive`/`static_phase` were set on a `requires java.base` directive at class version >= 10.
    #[error("requires java.base cannot set transitive or static_phase at class version 10 or above")]
    JavaBaseRequiresFlags,
    /// `provides` was declared with an empty `with` list.
    #[error("provides {0:?} must name at least one implementation")]
    EmptyProvidesWith(String),
    /// A parameter annotation's index was not less than the declared count.
    #[error("parameter index {index} is not less than the declared annotable parameter count {count}")]
    ParameterIndexOutOfRange {
        /// The supplied parameter index.
        index: u16,
        /// The declared annotable-parameter count for that visibility.
        count: u16,
    },
    /// A label used by a jump, switch, frame, try-catch range or local-variable
    /// range was never defined by the time it was required to be.
    #[error("undefined label used in {0}")]
    UndefinedLabel(&'static str),
    /// A try-catch range's end index was not strictly greater than its start index.
    #[error("try-catch range end index {end} is not greater than start index {start}")]
    InvalidTryCatchRange {
        /// The range's start instruction index.
        start: u32,
        /// The range's end instruction index.
        end: u32,
    },
    /// A local-variable range's end index was not strictly greater than its start index.
    #[error("local variable range end index {end} is not greater than start index {start}")]
    InvalidLocalVariableRange {
        /// The range's start instruction index.
        start: u32,
        /// The range's end instruction index.
        end: u32,
    },
    /// A try-catch range's labels were visited out of the order the checker requires.
    #[error("try-catch handler labels were visited out of order: {0}")]
    TryCatchLabelOrder(&'static str),
    /// More than one stack map frame was recorded at the same instruction index.
    #[error("more than one stack map frame at instruction index {0}")]
    DuplicateFrame(u32),
    /// Compressed and expanded stack map frames were mixed within one method.
    #[error("compressed and expanded stack map frames cannot be mixed in one method")]
    MixedFrameModes,
    /// A stack map frame's local or stack element count exceeds its frame type's limit.
    #[error("{frame_kind} frame permits at most {limit} {what}, got {actual}")]
    FrameElementCountExceeded {
        /// The frame kind's name, e.g. `"same1"`.
        frame_kind: &'static str,
        /// Which count was exceeded: `"locals"` or `"stack elements"`.
        what: &'static str,
        /// The permitted maximum.
        limit: u16,
        /// The actual count supplied.
        actual: u16,
    },
    /// A signature-visitor event arrived in a state that has no transition for it.
    #[error("{event} cannot follow the {state} state of a signature's push-down automaton")]
    IllegalSignatureTransition {
        /// The rejected event's method name.
        event: &'static str,
        /// The automaton's state at the time of the call.
        state: &'static str,
    },
    /// An unsigned 16-bit field received a value outside `0..=0xFFFF`.
    #[error("{field} value {value} does not fit in an unsigned 16-bit integer")]
    NotU16 {
        /// The field's name, e.g. `"var index"` or `"max_stack"`.
        field: &'static str,
        /// The offending value.
        value: i64,
    },
    /// The dataflow option was requested but max-stack or max-locals is zero.
    #[error("dataflow verification was requested but {0} is zero")]
    ZeroMaxForDataflow(&'static str),
    /// A call is below the minimum API version required for an experimental feature.
    #[error("{0} requires API version {1:?} or above")]
    BelowMinimumApiVersion(&'static str, crate::ApiVersion),
    /// A visitor method that this checker does not support was called.
    #[error("{0} is not supported by this checker")]
    Unsupported(&'static str),
    /// An `LDC` operand's kind requires a class file version newer than the
    /// method's enclosing class declares.
    #[error("a {kind} LDC operand requires class file version {minimum:?} or above")]
    LdcBelowMinimumClassVersion {
        /// The LDC operand kind's name.
        kind: &'static str,
        /// The minimum class version this kind requires.
        minimum: crate::ClassVersion,
    },
    /// An annotation value's name presence disagreed with its context: absent
    /// in a named (top-level or nested-annotation) context, or present in an
    /// unnamed (array-element) context.
    #[error("annotation value name presence does not match its context (named context: {expected_named})")]
    AnnotationNamePresence {
        /// Whether the enclosing context requires a name.
        expected_named: bool,
    },
    /// The embedded dataflow verifier rejected the method.
    #[error("dataflow verification failed at instruction {instruction_index}: {message}")]
    DataflowRejected {
        /// The index of the offending instruction.
        instruction_index: u32,
        /// The analyzer's rendered failure message.
        message: String,
    },
}

impl CheckError {
    /// The error kind this error belongs to, per the checker's error handling design.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        use CheckError::{
            AfterEnd, AlreadySeen, AnnotationNamePresence, BeforeOpeningEvent, BelowMinimumApiVersion,
            ConflictingVisibility, DataflowRejected, DisallowedAccessFlags,
            DuplicateFrame, DuplicateModuleDirective, EmptyProvidesWith, FinalAndAbstract,
            FrameElementCountExceeded, IllegalBootstrapHandleKind, IllegalConstantKind,
            IllegalSignatureTransition, InitNotInvokedWithInvokeSpecial, InvalidArrayDimensions, InvalidLocalVariableRange,
            InvalidTryCatchRange, InvokeInterfaceOnClass, InvokeSpecialInterfaceTooOld,
            InvokeVirtualOnInterface, JavaBaseRequiresFlags, LabelRedefined,
            LdcBelowMinimumClassVersion, MalformedFieldDescriptor, MalformedInternalName, MalformedMethodDescriptor,
            MalformedSignature, MixedFrameModes, NestHostAndMemberConflict,
            NestMemberPackageMismatch, NewWithArrayType, NotU16, OpensInOpenModule,
            OperandOutOfRange, ParameterIndexOutOfRange, TryCatchLabelOrder, UndefinedLabel,
            Unsupported, WrongVisitMethod, ZeroMaxForDataflow,
        };
        match self {
            DisallowedAccessFlags { .. }
            | ConflictingVisibility { .. }
            | FinalAndAbstract { .. }
            | MalformedInternalName(_)
            | MalformedFieldDescriptor(_)
            | MalformedMethodDescriptor(_)
            | MalformedSignature(_)
            | WrongVisitMethod { .. }
            | OperandOutOfRange { .. }
            | InvokeVirtualOnInterface
            | InvokeInterfaceOnClass
            | InvokeSpecialInterfaceTooOld
            | InitNotInvokedWithInvokeSpecial
            | NewWithArrayType
            | InvalidArrayDimensions { .. }
            | IllegalBootstrapHandleKind(_)
            | IllegalConstantKind { .. }
            | OpensInOpenModule
            | JavaBaseRequiresFlags
            | EmptyProvidesWith(_)
            | ParameterIndexOutOfRange { .. }
            | LdcBelowMinimumClassVersion { .. }
            | AnnotationNamePresence { .. }
            | NotU16 { .. } => ErrorKind::Argument,

            BeforeOpeningEvent(_)
            | AfterEnd(_)
            | AlreadySeen(_)
            | LabelRedefined
            | NestHostAndMemberConflict
            | NestMemberPackageMismatch { .. }
            | DuplicateModuleDirective { .. }
            | DuplicateFrame(_)
            | MixedFrameModes
            | FrameElementCountExceeded { .. }
            | IllegalSignatureTransition { .. } => ErrorKind::State,

            UndefinedLabel(_) | InvalidTryCatchRange { .. } | InvalidLocalVariableRange { .. }
            | TryCatchLabelOrder(_) => ErrorKind::Reference,

            ZeroMaxForDataflow(_) | BelowMinimumApiVersion(..) | DataflowRejected { .. } => {
                ErrorKind::Configuration
            }

            Unsupported(_) => ErrorKind::Unsupported,
        }
    }
}

/// The result type returned by every visitor method in this crate.
pub type CheckResult<T = ()> = Result<T, CheckError>;
