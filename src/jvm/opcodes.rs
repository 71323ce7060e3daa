//! The 202-ordinal JVM opcode table and the opcode-to-visit-method
//! admissibility mapping.
use derive_more::Display;

/// Which of the seven generic instruction-visiting methods an opcode must be
/// routed through, or [`VisitMethod::None`] if the opcode instead has its own
/// dedicated visitor method (`ldc`, `iinc`, `tableswitch`, `lookupswitch`,
/// `multianewarray`, `invokedynamic`) or is never exposed to a visitor at all
/// (the constant-indexed `iload_0`-style forms, and `wide`, which are
/// write-time encodings of `var_insn`/`iinc` that a producer must not emit
/// directly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitMethod {
    /// `visit_insn`: no operand.
    Insn,
    /// `visit_int_insn`: a single integer operand (`bipush`, `sipush`, `newarray`).
    IntInsn,
    /// `visit_var_insn`: a local variable index operand.
    VarInsn,
    /// `visit_type_insn`: an internal-name or array-descriptor operand.
    TypeInsn,
    /// `visit_field_insn`: an owner/name/descriptor operand.
    FieldInsn,
    /// `visit_method_insn`: an owner/name/descriptor/`is_interface` operand.
    MethodInsn,
    /// `visit_jump_insn`: a single label operand.
    JumpInsn,
    /// Not routable through any of the seven generic methods.
    None,
}

macro_rules! define_opcodes {
    ($( $ord:literal => $variant:ident, $mnemonic:literal, $method:ident; )*) => {
        /// One of the 202 JVM opcode ordinals (0..=201).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
        #[repr(u8)]
        pub enum Opcode {
            $(
                #[display($mnemonic)]
                $variant = $ord,
            )*
        }

        impl Opcode {
            /// Recovers the opcode whose ordinal is `ordinal`, if any.
            #[must_use]
            pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
                match ordinal {
                    $( $ord => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// This opcode's ordinal, `0..=201`.
            #[must_use]
            pub const fn ordinal(self) -> u8 {
                self as u8
            }

            /// The mnemonic, e.g. `"invokevirtual"`.
            #[must_use]
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $( Self::$variant => $mnemonic, )*
                }
            }

            /// Which generic visitor method admits this opcode.
            #[must_use]
            pub const fn visit_method(self) -> VisitMethod {
                match self {
                    $( Self::$variant => VisitMethod::$method, )*
                }
            }
        }
    };
}

define_opcodes! {
    0   => Nop, "nop", Insn;
    1   => AconstNull, "aconst_null", Insn;
    2   => IconstM1, "iconst_m1", Insn;
    3   => Iconst0, "iconst_0", Insn;
    4   => Iconst1, "iconst_1", Insn;
    5   => Iconst2, "iconst_2", Insn;
    6   => Iconst3, "iconst_3", Insn;
    7   => Iconst4, "iconst_4", Insn;
    8   => Iconst5, "iconst_5", Insn;
    9   => Lconst0, "lconst_0", Insn;
    10  => Lconst1, "lconst_1", Insn;
    11  => Fconst0, "fconst_0", Insn;
    12  => Fconst1, "fconst_1", Insn;
    13  => Fconst2, "fconst_2", Insn;
    14  => Dconst0, "dconst_0", Insn;
    15  => Dconst1, "dconst_1", Insn;
    16  => Bipush, "bipush", IntInsn;
    17  => Sipush, "sipush", IntInsn;
    18  => Ldc, "ldc", None;
    19  => LdcW, "ldc_w", None;
    20  => Ldc2W, "ldc2_w", None;
    21  => Iload, "iload", VarInsn;
    22  => Lload, "lload", VarInsn;
    23  => Fload, "fload", VarInsn;
    24  => Dload, "dload", VarInsn;
    25  => Aload, "aload", VarInsn;
    26  => Iload0, "iload_0", None;
    27  => Iload1, "iload_1", None;
    28  => Iload2, "iload_2", None;
    29  => Iload3, "iload_3", None;
    30  => Lload0, "lload_0", None;
    31  => Lload1, "lload_1", None;
    32  => Lload2, "lload_2", None;
    33  => Lload3, "lload_3", None;
    34  => Fload0, "fload_0", None;
    35  => Fload1, "fload_1", None;
    36  => Fload2, "fload_2", None;
    37  => Fload3, "fload_3", None;
    38  => Dload0, "dload_0", None;
    39  => Dload1, "dload_1", None;
    40  => Dload2, "dload_2", None;
    41  => Dload3, "dload_3", None;
    42  => Aload0, "aload_0", None;
    43  => Aload1, "aload_1", None;
    44  => Aload2, "aload_2", None;
    45  => Aload3, "aload_3", None;
    46  => Iaload, "iaload", Insn;
    47  => Laload, "laload", Insn;
    48  => Faload, "faload", Insn;
    49  => Daload, "daload", Insn;
    50  => Aaload, "aaload", Insn;
    51  => Baload, "baload", Insn;
    52  => Caload, "caload", Insn;
    53  => Saload, "saload", Insn;
    54  => Istore, "istore", VarInsn;
    55  => Lstore, "lstore", VarInsn;
    56  => Fstore, "fstore", VarInsn;
    57  => Dstore, "dstore", VarInsn;
    58  => Astore, "astore", VarInsn;
    59  => Istore0, "istore_0", None;
    60  => Istore1, "istore_1", None;
    61  => Istore2, "istore_2", None;
    62  => Istore3, "istore_3", None;
    63  => Lstore0, "lstore_0", None;
    64  => Lstore1, "lstore_1", None;
    65  => Lstore2, "lstore_2", None;
    66  => Lstore3, "lstore_3", None;
    67  => Fstore0, "fstore_0", None;
    68  => Fstore1, "fstore_1", None;
    69  => Fstore2, "fstore_2", None;
    70  => Fstore3, "fstore_3", None;
    71  => Dstore0, "dstore_0", None;
    72  => Dstore1, "dstore_1", None;
    73  => Dstore2, "dstore_2", None;
    74  => Dstore3, "dstore_3", None;
    75  => Astore0, "astore_0", None;
    76  => Astore1, "astore_1", None;
    77  => Astore2, "astore_2", None;
    78  => Astore3, "astore_3", None;
    79  => Iastore, "iastore", Insn;
    80  => Lastore, "lastore", Insn;
    81  => Fastore, "fastore", Insn;
    82  => Dastore, "dastore", Insn;
    83  => Aastore, "aastore", Insn;
    84  => Bastore, "bastore", Insn;
    85  => Castore, "castore", Insn;
    86  => Sastore, "sastore", Insn;
    87  => Pop, "pop", Insn;
    88  => Pop2, "pop2", Insn;
    89  => Dup, "dup", Insn;
    90  => DupX1, "dup_x1", Insn;
    91  => DupX2, "dup_x2", Insn;
    92  => Dup2, "dup2", Insn;
    93  => Dup2X1, "dup2_x1", Insn;
    94  => Dup2X2, "dup2_x2", Insn;
    95  => Swap, "swap", Insn;
    96  => Iadd, "iadd", Insn;
    97  => Ladd, "ladd", Insn;
    98  => Fadd, "fadd", Insn;
    99  => Dadd, "dadd", Insn;
    100 => Isub, "isub", Insn;
    101 => Lsub, "lsub", Insn;
    102 => Fsub, "fsub", Insn;
    103 => Dsub, "dsub", Insn;
    104 => Imul, "imul", Insn;
    105 => Lmul, "lmul", Insn;
    106 => Fmul, "fmul", Insn;
    107 => Dmul, "dmul", Insn;
    108 => Idiv, "idiv", Insn;
    109 => Ldiv, "ldiv", Insn;
    110 => Fdiv, "fdiv", Insn;
    111 => Ddiv, "ddiv", Insn;
    112 => Irem, "irem", Insn;
    113 => Lrem, "lrem", Insn;
    114 => Frem, "frem", Insn;
    115 => Drem, "drem", Insn;
    116 => Ineg, "ineg", Insn;
    117 => Lneg, "lneg", Insn;
    118 => Fneg, "fneg", Insn;
    119 => Dneg, "dneg", Insn;
    120 => Ishl, "ishl", Insn;
    121 => Lshl, "lshl", Insn;
    122 => Ishr, "ishr", Insn;
    123 => Lshr, "lshr", Insn;
    124 => Iushr, "iushr", Insn;
    125 => Lushr, "lushr", Insn;
    126 => Iand, "iand", Insn;
    127 => Land, "land", Insn;
    128 => Ior, "ior", Insn;
    129 => Lor, "lor", Insn;
    130 => Ixor, "ixor", Insn;
    131 => Lxor, "lxor", Insn;
    132 => Iinc, "iinc", None;
    133 => I2l, "i2l", Insn;
    134 => I2f, "i2f", Insn;
    135 => I2d, "i2d", Insn;
    136 => L2i, "l2i", Insn;
    137 => L2f, "l2f", Insn;
    138 => L2d, "l2d", Insn;
    139 => F2i, "f2i", Insn;
    140 => F2l, "f2l", Insn;
    141 => F2d, "f2d", Insn;
    142 => D2i, "d2i", Insn;
    143 => D2l, "d2l", Insn;
    144 => D2f, "d2f", Insn;
    145 => I2b, "i2b", Insn;
    146 => I2c, "i2c", Insn;
    147 => I2s, "i2s", Insn;
    148 => Lcmp, "lcmp", Insn;
    149 => Fcmpl, "fcmpl", Insn;
    150 => Fcmpg, "fcmpg", Insn;
    151 => Dcmpl, "dcmpl", Insn;
    152 => Dcmpg, "dcmpg", Insn;
    153 => Ifeq, "ifeq", JumpInsn;
    154 => Ifne, "ifne", JumpInsn;
    155 => Iflt, "iflt", JumpInsn;
    156 => Ifge, "ifge", JumpInsn;
    157 => Ifgt, "ifgt", JumpInsn;
    158 => Ifle, "ifle", JumpInsn;
    159 => IfIcmpeq, "if_icmpeq", JumpInsn;
    160 => IfIcmpne, "if_icmpne", JumpInsn;
    161 => IfIcmplt, "if_icmplt", JumpInsn;
    162 => IfIcmpge, "if_icmpge", JumpInsn;
    163 => IfIcmpgt, "if_icmpgt", JumpInsn;
    164 => IfIcmple, "if_icmple", JumpInsn;
    165 => IfAcmpeq, "if_acmpeq", JumpInsn;
    166 => IfAcmpne, "if_acmpne", JumpInsn;
    167 => Goto, "goto", JumpInsn;
    168 => Jsr, "jsr", JumpInsn;
    169 => Ret, "ret", VarInsn;
    170 => TableSwitch, "tableswitch", None;
    171 => LookupSwitch, "lookupswitch", None;
    172 => Ireturn, "ireturn", Insn;
    173 => Lreturn, "lreturn", Insn;
    174 => Freturn, "freturn", Insn;
    175 => Dreturn, "dreturn", Insn;
    176 => Areturn, "areturn", Insn;
    177 => Return, "return", Insn;
    178 => Getstatic, "getstatic", FieldInsn;
    179 => Putstatic, "putstatic", FieldInsn;
    180 => Getfield, "getfield", FieldInsn;
    181 => Putfield, "putfield", FieldInsn;
    182 => Invokevirtual, "invokevirtual", MethodInsn;
    183 => Invokespecial, "invokespecial", MethodInsn;
    184 => Invokestatic, "invokestatic", MethodInsn;
    185 => Invokeinterface, "invokeinterface", MethodInsn;
    186 => Invokedynamic, "invokedynamic", None;
    187 => New, "new", TypeInsn;
    188 => Newarray, "newarray", IntInsn;
    189 => Anewarray, "anewarray", TypeInsn;
    190 => Arraylength, "arraylength", Insn;
    191 => Athrow, "athrow", Insn;
    192 => Checkcast, "checkcast", TypeInsn;
    193 => Instanceof, "instanceof", TypeInsn;
    194 => Monitorenter, "monitorenter", Insn;
    195 => Monitorexit, "monitorexit", Insn;
    196 => Wide, "wide", None;
    197 => Multianewarray, "multianewarray", None;
    198 => Ifnull, "ifnull", JumpInsn;
    199 => Ifnonnull, "ifnonnull", JumpInsn;
    200 => GotoW, "goto_w", JumpInsn;
    201 => JsrW, "jsr_w", JumpInsn;
}

/// Array type codes legal as the operand of `newarray`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewArrayType {
    /// `T_BOOLEAN` (4).
    Boolean,
    /// `T_CHAR` (5).
    Char,
    /// `T_FLOAT` (6).
    Float,
    /// `T_DOUBLE` (7).
    Double,
    /// `T_BYTE` (8).
    Byte,
    /// `T_SHORT` (9).
    Short,
    /// `T_INT` (10).
    Int,
    /// `T_LONG` (11).
    Long,
}

impl NewArrayType {
    /// Recovers the array type code whose operand value is `code`.
    #[must_use]
    pub const fn from_operand(code: u8) -> Option<Self> {
        match code {
            4 => Some(Self::Boolean),
            5 => Some(Self::Char),
            6 => Some(Self::Float),
            7 => Some(Self::Double),
            8 => Some(Self::Byte),
            9 => Some(Self::Short),
            10 => Some(Self::Int),
            11 => Some(Self::Long),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_count_is_202() {
        assert!(Opcode::from_ordinal(201).is_some());
        assert!(Opcode::from_ordinal(202).is_none());
    }

    #[test]
    fn invokevirtual_is_method_insn() {
        assert_eq!(Opcode::Invokevirtual.visit_method(), VisitMethod::MethodInsn);
        assert_eq!(Opcode::Invokevirtual.mnemonic(), "invokevirtual");
    }

    #[test]
    fn constant_indexed_load_forms_are_unroutable() {
        assert_eq!(Opcode::Iload0.visit_method(), VisitMethod::None);
    }

    #[test]
    fn newarray_operand_roundtrip() {
        assert_eq!(NewArrayType::from_operand(10), Some(NewArrayType::Int));
        assert_eq!(NewArrayType::from_operand(3), None);
    }

    #[test]
    fn every_mnemonic_is_lowercase_and_unique() {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        for ord in 0..=201u8 {
            let op = Opcode::from_ordinal(ord).expect("ordinal in range");
            assert!(seen.insert(op.mnemonic()), "duplicate mnemonic {}", op.mnemonic());
        }
    }
}
