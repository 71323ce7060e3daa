use std::fmt::Debug;

use crate::{
    error::CheckResult,
    jvm::{
        constant::LdcValue,
        frame::{FrameElement, FrameKind},
        handle::Handle,
        opcodes::Opcode,
    },
    visitor::AnnotationVisitor,
};

/// One entry of a `tableswitch` or `lookupswitch` instruction's jump table,
/// keyed by an explicit match value for `lookupswitch` and by position for
/// `tableswitch`.
pub type SwitchLabel = String;

/// Observes one method body's event stream: parameter annotations, code
/// (bytecode, exception table, line numbers, local variables, frames), then
/// `visit_end`. A method with no `Code` attribute (abstract or native) never
/// receives `visit_code`.
pub trait MethodVisitor: Debug {
    /// The `AnnotationDefault`-adjacent `visit_parameter_annotation` count:
    /// how many of the method's declared parameters are annotable, for the
    /// given visibility. Parameter indices passed to
    /// [`MethodVisitor::visit_parameter_annotation`] must stay below this.
    fn visit_annotable_parameter_count(&mut self, _count: u16, _visible: bool) -> CheckResult<()> {
        Ok(())
    }

    /// A parameter-level annotation, indexed by the declared parameter's
    /// position in the descriptor (not including an implicit `this`).
    fn visit_parameter_annotation(
        &mut self,
        _parameter: u16,
        _descriptor: &str,
        _visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// A method-level annotation.
    fn visit_annotation(
        &mut self,
        _descriptor: &str,
        _visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// The annotation-default value of an annotation interface element.
    fn visit_annotation_default(&mut self) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// The opening of the `Code` attribute. Always the first code-related
    /// call, if the method has a body at all.
    fn visit_code(&mut self) -> CheckResult<()> {
        Ok(())
    }

    /// A stack-map frame, expressed as a diff (`Same`, `Append`, `Chop`) or
    /// in full (`Full`), ahead of the instruction it describes.
    fn visit_frame(&mut self, _kind: FrameKind, _locals: &[FrameElement], _stack: &[FrameElement]) -> CheckResult<()> {
        Ok(())
    }

    /// A zero-operand instruction.
    fn visit_insn(&mut self, _opcode: Opcode) -> CheckResult<()> {
        Ok(())
    }

    /// `bipush`, `sipush`, or `newarray`: a single integer operand.
    fn visit_int_insn(&mut self, _opcode: Opcode, _operand: i32) -> CheckResult<()> {
        Ok(())
    }

    /// A load or store of a local variable slot.
    fn visit_var_insn(&mut self, _opcode: Opcode, _variable: u16) -> CheckResult<()> {
        Ok(())
    }

    /// `new`, `anewarray`, `checkcast`, or `instanceof`: an internal-name or
    /// array-descriptor operand.
    fn visit_type_insn(&mut self, _opcode: Opcode, _descriptor: &str) -> CheckResult<()> {
        Ok(())
    }

    /// A field access instruction.
    fn visit_field_insn(
        &mut self,
        _opcode: Opcode,
        _owner: &str,
        _name: &str,
        _descriptor: &str,
    ) -> CheckResult<()> {
        Ok(())
    }

    /// A method invocation instruction.
    fn visit_method_insn(
        &mut self,
        _opcode: Opcode,
        _owner: &str,
        _name: &str,
        _descriptor: &str,
        _is_interface: bool,
    ) -> CheckResult<()> {
        Ok(())
    }

    /// An `invokedynamic` instruction.
    fn visit_invoke_dynamic_insn(
        &mut self,
        _name: &str,
        _descriptor: &str,
        _bootstrap_method: &Handle,
    ) -> CheckResult<()> {
        Ok(())
    }

    /// A conditional or unconditional branch to a label.
    fn visit_jump_insn(&mut self, _opcode: Opcode, _target: &str) -> CheckResult<()> {
        Ok(())
    }

    /// The position a subsequent instruction, branch target, or exception
    /// range endpoint refers back to.
    fn visit_label(&mut self, _label: &str) -> CheckResult<()> {
        Ok(())
    }

    /// An `ldc`/`ldc_w`/`ldc2_w` instruction.
    fn visit_ldc_insn(&mut self, _value: &LdcValue) -> CheckResult<()> {
        Ok(())
    }

    /// An `iinc` instruction.
    fn visit_iinc_insn(&mut self, _variable: u16, _increment: i32) -> CheckResult<()> {
        Ok(())
    }

    /// A `tableswitch` instruction.
    fn visit_table_switch_insn(
        &mut self,
        _min: i32,
        _max: i32,
        _default: &str,
        _labels: &[SwitchLabel],
    ) -> CheckResult<()> {
        Ok(())
    }

    /// A `lookupswitch` instruction.
    fn visit_lookup_switch_insn(&mut self, _default: &str, _keys: &[i32], _labels: &[SwitchLabel]) -> CheckResult<()> {
        Ok(())
    }

    /// A `multianewarray` instruction.
    fn visit_multi_anew_array_insn(&mut self, _descriptor: &str, _dimensions: u8) -> CheckResult<()> {
        Ok(())
    }

    /// A type annotation targeting an instruction, a local variable's live
    /// range, or a `catch` clause.
    fn visit_insn_annotation(
        &mut self,
        _type_reference: u32,
        _descriptor: &str,
        _visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// One entry of the exception table.
    fn visit_try_catch_block(
        &mut self,
        _start: &str,
        _end: &str,
        _handler: &str,
        _exception_type: Option<&str>,
    ) -> CheckResult<()> {
        Ok(())
    }

    /// A type annotation targeting a `try`/`catch` block.
    fn visit_try_catch_annotation(
        &mut self,
        _type_reference: u32,
        _descriptor: &str,
        _visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// One entry of the `LocalVariableTable`/`LocalVariableTypeTable`.
    fn visit_local_variable(
        &mut self,
        _name: &str,
        _descriptor: &str,
        _signature: Option<&str>,
        _start: &str,
        _end: &str,
        _index: u16,
    ) -> CheckResult<()> {
        Ok(())
    }

    /// A type annotation targeting a local variable's live range.
    fn visit_local_variable_annotation(
        &mut self,
        _type_reference: u32,
        _start: &[String],
        _end: &[String],
        _index: &[u16],
        _descriptor: &str,
        _visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        Ok(None)
    }

    /// One entry of the `LineNumberTable`.
    fn visit_line_number(&mut self, _line: u16, _start: &str) -> CheckResult<()> {
        Ok(())
    }

    /// The closing of the `Code` attribute, carrying the class-file's
    /// declared `max_stack`/`max_locals`.
    fn visit_max(&mut self, _max_stack: u16, _max_locals: u16) -> CheckResult<()> {
        Ok(())
    }

    /// The mandatory closing event.
    fn visit_end(&mut self) -> CheckResult<()> {
        Ok(())
    }
}
