//! Per-instruction argument validation, label bookkeeping, and
//! frame/try-catch/local-variable range checks for one method body, plus the
//! optional embedded dataflow pass.
use std::{
    cell::RefCell,
    collections::HashMap,
    rc::Rc,
};

use crate::{
    ClassVersion,
    checker::{
        CheckerOptions,
        annotation_checker::AnnotationChecker,
        label::{Label, LabelTable},
        signature_checker::check_field_signature,
    },
    error::{CheckError, CheckResult},
    jvm::{
        constant::LdcValue,
        frame::{FrameElement, FrameKind},
        handle::{BootstrapArgument, ConstantDynamic, Handle},
        opcodes::{NewArrayType, Opcode, VisitMethod},
    },
    types::{
        descriptor::{bracket_depth, is_valid_field_descriptor, is_valid_method_descriptor, method_parameter_count},
        internal_name::{is_valid_internal_name, is_valid_unqualified_name},
    },
    visitor::{AnnotationVisitor, MethodVisitor},
};

#[cfg(feature = "dataflow")]
use crate::checker::dataflow::{self, BufferedInstruction, BufferedMethod, BufferedTryCatch, IdentityTypeResolver};

/// Wraps an optional downstream [`MethodVisitor`], validating one method
/// body's event stream: the opcode-to-visit-method table, operand domains,
/// label definition/reference bookkeeping, stack-map frame shape, and
/// try-catch/local-variable range ordering. Spawned by
/// [`crate::checker::ClassChecker`] per method.
#[derive(Debug)]
pub struct MethodChecker {
    delegate: Option<Box<dyn MethodVisitor>>,
    descriptor: String,
    owner_is_interface: bool,
    class_version: ClassVersion,
    is_init: bool,
    options: CheckerOptions,

    code_called: bool,
    maxs_called: bool,
    end_called: bool,

    insn_count: u32,
    labels: Rc<RefCell<LabelTable>>,
    label_positions: HashMap<Label, u32>,
    frames: HashMap<u32, (Vec<FrameElement>, Vec<FrameElement>)>,
    num_expanded_frames: u32,
    num_compressed_frames: u32,

    try_catch_handlers: Vec<(Label, Label, Label, Option<String>)>,
    local_variable_ranges: Vec<(Label, Label)>,

    visible_annotable_param_count: Option<u16>,
    invisible_annotable_param_count: Option<u16>,

    max_stack: u16,
    max_locals: u16,

    #[cfg(feature = "dataflow")]
    buffered_instructions: Vec<BufferedInstruction>,
}

impl MethodChecker {
    /// Wraps `delegate`, validating this method's event stream against its
    /// own `descriptor`, `owner_is_interface` (the enclosing class's
    /// `ACC_INTERFACE` bit), `class_version`, and whether this method is
    /// `<init>`/`<clinit>` (`is_init`). `labels` is the enclosing class's
    /// shared label arena, handed down by
    /// [`crate::checker::ClassChecker`] so that every method of one class
    /// interns labels into the same table.
    #[must_use]
    pub fn new(
        descriptor: impl Into<String>,
        owner_is_interface: bool,
        class_version: ClassVersion,
        is_init: bool,
        options: CheckerOptions,
        labels: Rc<RefCell<LabelTable>>,
        delegate: Option<Box<dyn MethodVisitor>>,
    ) -> Self {
        Self {
            delegate,
            descriptor: descriptor.into(),
            owner_is_interface,
            class_version,
            is_init,
            options,
            code_called: false,
            maxs_called: false,
            end_called: false,
            insn_count: 0,
            labels,
            label_positions: HashMap::new(),
            frames: HashMap::new(),
            num_expanded_frames: 0,
            num_compressed_frames: 0,
            try_catch_handlers: Vec::new(),
            local_variable_ranges: Vec::new(),
            visible_annotable_param_count: None,
            invisible_annotable_param_count: None,
            max_stack: 0,
            max_locals: 0,
            #[cfg(feature = "dataflow")]
            buffered_instructions: Vec::new(),
        }
    }

    fn require_not_ended(&self, method: &'static str) -> CheckResult<()> {
        if self.end_called {
            Err(CheckError::AfterEnd(method))
        } else {
            Ok(())
        }
    }

    /// The window in which instructions, labels, frames, try-catch ranges,
    /// local-variable ranges and line numbers may be visited: after `code`,
    /// before `maxs`.
    fn require_in_code(&self, method: &'static str) -> CheckResult<()> {
        self.require_not_ended(method)?;
        if !self.code_called {
            return Err(CheckError::BeforeOpeningEvent(method));
        }
        if self.maxs_called {
            return Err(CheckError::AfterEnd(method));
        }
        Ok(())
    }

    fn check_visit_method(opcode: Opcode, expected: VisitMethod, method: &'static str) -> CheckResult<()> {
        if opcode.visit_method() != expected {
            return Err(CheckError::WrongVisitMethod {
                opcode: opcode.mnemonic(),
                method,
            });
        }
        Ok(())
    }

    /// Advances the instruction counter and, if the dataflow pass is
    /// requested, buffers this instruction (with whatever frame was declared
    /// immediately ahead of it) for the analyzer handed off at `visit_end`.
    fn record_instruction(&mut self, _mnemonic: &'static str) {
        #[cfg(feature = "dataflow")]
        {
            if self.options.enable_dataflow {
                let declared_frame = self.frames.get(&self.insn_count).cloned();
                self.buffered_instructions.push(BufferedInstruction {
                    index: self.insn_count,
                    mnemonic: _mnemonic,
                    declared_frame,
                });
            }
        }
        self.insn_count += 1;
    }

    fn validate_frame_element(&mut self, element: &FrameElement) -> CheckResult<()> {
        match element {
            FrameElement::Reference(name) => {
                if !is_valid_internal_name(name) {
                    return Err(CheckError::MalformedInternalName(name.clone()));
                }
            }
            FrameElement::Uninitialized(label) => {
                self.labels.borrow_mut().intern(label);
            }
            _ => {}
        }
        Ok(())
    }

    fn validate_constant_dynamic(&self, constant_dynamic: &ConstantDynamic) -> CheckResult<()> {
        if !is_valid_unqualified_name(&constant_dynamic.name) {
            return Err(CheckError::MalformedInternalName(constant_dynamic.name.clone()));
        }
        if !is_valid_field_descriptor(&constant_dynamic.descriptor) {
            return Err(CheckError::MalformedFieldDescriptor(constant_dynamic.descriptor.clone()));
        }
        if !constant_dynamic.bootstrap_method.kind.is_legal_bootstrap_handle() {
            return Err(CheckError::IllegalBootstrapHandleKind(
                constant_dynamic.bootstrap_method.kind.name(),
            ));
        }
        for argument in &constant_dynamic.bootstrap_arguments {
            if let BootstrapArgument::ConstantDynamic(nested) = argument {
                self.validate_constant_dynamic(nested)?;
            }
        }
        Ok(())
    }

    #[cfg(feature = "dataflow")]
    fn build_buffered_method(&self) -> BufferedMethod {
        let try_catch_blocks = self
            .try_catch_handlers
            .iter()
            .map(|(start, end, handler, exception_type)| BufferedTryCatch {
                start: self.label_positions.get(start).copied().unwrap_or(0),
                end: self.label_positions.get(end).copied().unwrap_or(0),
                handler: self.label_positions.get(handler).copied().unwrap_or(0),
                exception_type: exception_type.clone(),
            })
            .collect();
        BufferedMethod {
            instructions: self.buffered_instructions.clone(),
            try_catch_blocks,
            max_stack: self.max_stack,
            max_locals: self.max_locals,
        }
    }
}

impl MethodVisitor for MethodChecker {
    fn visit_annotable_parameter_count(&mut self, count: u16, visible: bool) -> CheckResult<()> {
        self.require_not_ended("visit_annotable_parameter_count")?;
        if visible {
            self.visible_annotable_param_count = Some(count);
        } else {
            self.invisible_annotable_param_count = Some(count);
        }
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_annotable_parameter_count(count, visible)?;
        }
        Ok(())
    }

    fn visit_parameter_annotation(
        &mut self,
        parameter: u16,
        descriptor: &str,
        visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        self.require_not_ended("visit_parameter_annotation")?;
        let declared = if visible {
            self.visible_annotable_param_count
        } else {
            self.invisible_annotable_param_count
        }
        .or_else(|| method_parameter_count(&self.descriptor))
        .unwrap_or(0);
        if parameter >= declared {
            return Err(CheckError::ParameterIndexOutOfRange {
                index: parameter,
                count: declared,
            });
        }
        if !is_valid_field_descriptor(descriptor) {
            return Err(CheckError::MalformedFieldDescriptor(descriptor.to_owned()));
        }
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_parameter_annotation(parameter, descriptor, visible)?,
            None => None,
        };
        Ok(Some(Box::new(AnnotationChecker::new(child))))
    }

    fn visit_annotation(
        &mut self,
        descriptor: &str,
        visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        self.require_not_ended("visit_annotation")?;
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_annotation(descriptor, visible)?,
            None => None,
        };
        Ok(Some(Box::new(AnnotationChecker::new(child))))
    }

    fn visit_annotation_default(&mut self) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        self.require_not_ended("visit_annotation_default")?;
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_annotation_default()?,
            None => None,
        };
        Ok(Some(Box::new(AnnotationChecker::new(child))))
    }

    fn visit_code(&mut self) -> CheckResult<()> {
        self.require_not_ended("visit_code")?;
        if self.code_called {
            return Err(CheckError::AlreadySeen("visit_code"));
        }
        if self.is_init && !self.descriptor.ends_with('V') {
            return Err(CheckError::MalformedMethodDescriptor(self.descriptor.clone()));
        }
        if self.is_init && self.owner_is_interface && self.descriptor != "()V" {
            // An interface has no instance initialization method, so a name of
            // `<init>`/`<clinit>` here can only be `<clinit>`, which always
            // takes no arguments.
            return Err(CheckError::MalformedMethodDescriptor(self.descriptor.clone()));
        }
        self.code_called = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_code()?;
        }
        Ok(())
    }

    fn visit_frame(&mut self, kind: FrameKind, locals: &[FrameElement], stack: &[FrameElement]) -> CheckResult<()> {
        self.require_in_code("visit_frame")?;
        if self.frames.contains_key(&self.insn_count) {
            return Err(CheckError::DuplicateFrame(self.insn_count));
        }
        if let Some(limit) = kind.max_locals() {
            let actual = u16::try_from(locals.len()).unwrap_or(u16::MAX);
            if actual > limit {
                return Err(CheckError::FrameElementCountExceeded {
                    frame_kind: kind.name(),
                    what: "locals",
                    limit,
                    actual,
                });
            }
        }
        if let Some(limit) = kind.max_stack() {
            let actual = u16::try_from(stack.len()).unwrap_or(u16::MAX);
            if actual > limit {
                return Err(CheckError::FrameElementCountExceeded {
                    frame_kind: kind.name(),
                    what: "stack elements",
                    limit,
                    actual,
                });
            }
        }
        if kind.is_expanded() {
            if self.num_compressed_frames > 0 {
                return Err(CheckError::MixedFrameModes);
            }
            self.num_expanded_frames += 1;
        } else {
            if self.num_expanded_frames > 0 {
                return Err(CheckError::MixedFrameModes);
            }
            self.num_compressed_frames += 1;
        }
        for element in locals.iter().chain(stack.iter()) {
            self.validate_frame_element(element)?;
        }
        self.frames.insert(self.insn_count, (locals.to_vec(), stack.to_vec()));
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_frame(kind, locals, stack)?;
        }
        Ok(())
    }

    fn visit_insn(&mut self, opcode: Opcode) -> CheckResult<()> {
        self.require_in_code("visit_insn")?;
        Self::check_visit_method(opcode, VisitMethod::Insn, "insn")?;
        self.record_instruction(opcode.mnemonic());
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_insn(opcode)?;
        }
        Ok(())
    }

    fn visit_int_insn(&mut self, opcode: Opcode, operand: i32) -> CheckResult<()> {
        self.require_in_code("visit_int_insn")?;
        Self::check_visit_method(opcode, VisitMethod::IntInsn, "int_insn")?;
        match opcode {
            Opcode::Bipush => {
                if !(i32::from(i8::MIN)..=i32::from(i8::MAX)).contains(&operand) {
                    return Err(CheckError::OperandOutOfRange {
                        insn: "bipush",
                        value: i64::from(operand),
                    });
                }
            }
            Opcode::Sipush => {
                if !(i32::from(i16::MIN)..=i32::from(i16::MAX)).contains(&operand) {
                    return Err(CheckError::OperandOutOfRange {
                        insn: "sipush",
                        value: i64::from(operand),
                    });
                }
            }
            Opcode::Newarray => {
                let code = u8::try_from(operand).ok().and_then(NewArrayType::from_operand);
                if code.is_none() {
                    return Err(CheckError::OperandOutOfRange {
                        insn: "newarray",
                        value: i64::from(operand),
                    });
                }
            }
            _ => {}
        }
        self.record_instruction(opcode.mnemonic());
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_int_insn(opcode, operand)?;
        }
        Ok(())
    }

    fn visit_var_insn(&mut self, opcode: Opcode, variable: u16) -> CheckResult<()> {
        self.require_in_code("visit_var_insn")?;
        Self::check_visit_method(opcode, VisitMethod::VarInsn, "var_insn")?;
        self.record_instruction(opcode.mnemonic());
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_var_insn(opcode, variable)?;
        }
        Ok(())
    }

    fn visit_type_insn(&mut self, opcode: Opcode, descriptor: &str) -> CheckResult<()> {
        self.require_in_code("visit_type_insn")?;
        Self::check_visit_method(opcode, VisitMethod::TypeInsn, "type_insn")?;
        if opcode == Opcode::New {
            if descriptor.starts_with('[') {
                return Err(CheckError::NewWithArrayType);
            }
            if !is_valid_internal_name(descriptor) {
                return Err(CheckError::MalformedInternalName(descriptor.to_owned()));
            }
        } else if descriptor.starts_with('[') {
            if !is_valid_field_descriptor(descriptor) {
                return Err(CheckError::MalformedFieldDescriptor(descriptor.to_owned()));
            }
        } else if !is_valid_internal_name(descriptor) {
            return Err(CheckError::MalformedInternalName(descriptor.to_owned()));
        }
        self.record_instruction(opcode.mnemonic());
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_type_insn(opcode, descriptor)?;
        }
        Ok(())
    }

    fn visit_field_insn(&mut self, opcode: Opcode, owner: &str, name: &str, descriptor: &str) -> CheckResult<()> {
        self.require_in_code("visit_field_insn")?;
        Self::check_visit_method(opcode, VisitMethod::FieldInsn, "field_insn")?;
        if !is_valid_internal_name(owner) {
            return Err(CheckError::MalformedInternalName(owner.to_owned()));
        }
        if !is_valid_unqualified_name(name) {
            return Err(CheckError::MalformedInternalName(name.to_owned()));
        }
        if !is_valid_field_descriptor(descriptor) {
            return Err(CheckError::MalformedFieldDescriptor(descriptor.to_owned()));
        }
        self.record_instruction(opcode.mnemonic());
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_field_insn(opcode, owner, name, descriptor)?;
        }
        Ok(())
    }

    fn visit_method_insn(
        &mut self,
        opcode: Opcode,
        owner: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    ) -> CheckResult<()> {
        self.require_in_code("visit_method_insn")?;
        Self::check_visit_method(opcode, VisitMethod::MethodInsn, "method_insn")?;
        if !is_valid_internal_name(owner) {
            return Err(CheckError::MalformedInternalName(owner.to_owned()));
        }
        if !is_valid_unqualified_name(name) {
            return Err(CheckError::MalformedInternalName(name.to_owned()));
        }
        if !is_valid_method_descriptor(descriptor) {
            return Err(CheckError::MalformedMethodDescriptor(descriptor.to_owned()));
        }
        match opcode {
            Opcode::Invokevirtual if is_interface => return Err(CheckError::InvokeVirtualOnInterface),
            Opcode::Invokeinterface if !is_interface => return Err(CheckError::InvokeInterfaceOnClass),
            Opcode::Invokespecial if is_interface && self.class_version < ClassVersion::JAVA_8 => {
                return Err(CheckError::InvokeSpecialInterfaceTooOld);
            }
            _ => {}
        }
        if name == "<init>" && opcode != Opcode::Invokespecial {
            return Err(CheckError::InitNotInvokedWithInvokeSpecial);
        }
        self.record_instruction(opcode.mnemonic());
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_method_insn(opcode, owner, name, descriptor, is_interface)?;
        }
        Ok(())
    }

    fn visit_invoke_dynamic_insn(
        &mut self,
        name: &str,
        descriptor: &str,
        bootstrap_method: &Handle,
    ) -> CheckResult<()> {
        self.require_in_code("visit_invoke_dynamic_insn")?;
        if !is_valid_unqualified_name(name) {
            return Err(CheckError::MalformedInternalName(name.to_owned()));
        }
        if !is_valid_method_descriptor(descriptor) {
            return Err(CheckError::MalformedMethodDescriptor(descriptor.to_owned()));
        }
        if !bootstrap_method.kind.is_legal_bootstrap_handle() {
            return Err(CheckError::IllegalBootstrapHandleKind(bootstrap_method.kind.name()));
        }
        self.record_instruction("invokedynamic");
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_invoke_dynamic_insn(name, descriptor, bootstrap_method)?;
        }
        Ok(())
    }

    fn visit_jump_insn(&mut self, opcode: Opcode, target: &str) -> CheckResult<()> {
        self.require_in_code("visit_jump_insn")?;
        Self::check_visit_method(opcode, VisitMethod::JumpInsn, "jump_insn")?;
        self.labels.borrow_mut().intern(target);
        self.record_instruction(opcode.mnemonic());
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_jump_insn(opcode, target)?;
        }
        Ok(())
    }

    fn visit_label(&mut self, label: &str) -> CheckResult<()> {
        self.require_in_code("visit_label")?;
        let handle = self.labels.borrow_mut().define(label)?;
        self.label_positions.insert(handle, self.insn_count);
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_label(label)?;
        }
        Ok(())
    }

    fn visit_ldc_insn(&mut self, value: &LdcValue) -> CheckResult<()> {
        self.require_in_code("visit_ldc_insn")?;
        let minimum = value.minimum_class_version();
        if self.class_version < minimum {
            return Err(CheckError::LdcBelowMinimumClassVersion {
                kind: value.kind_name(),
                minimum,
            });
        }
        match value {
            LdcValue::Type(descriptor) => {
                let is_array = descriptor.starts_with('[');
                let valid = if is_array {
                    is_valid_field_descriptor(descriptor)
                } else {
                    is_valid_internal_name(descriptor)
                };
                if !valid {
                    return Err(CheckError::MalformedFieldDescriptor(descriptor.clone()));
                }
            }
            LdcValue::MethodType(descriptor) => {
                if !is_valid_method_descriptor(descriptor) {
                    return Err(CheckError::MalformedMethodDescriptor(descriptor.clone()));
                }
            }
            LdcValue::ConstantDynamic(constant_dynamic) => {
                self.validate_constant_dynamic(constant_dynamic)?;
            }
            LdcValue::Int(_) | LdcValue::Float(_) | LdcValue::Long(_) | LdcValue::Double(_) | LdcValue::String(_) => {}
            LdcValue::Handle(_) => {}
        }
        self.record_instruction("ldc");
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_ldc_insn(value)?;
        }
        Ok(())
    }

    fn visit_iinc_insn(&mut self, variable: u16, increment: i32) -> CheckResult<()> {
        self.require_in_code("visit_iinc_insn")?;
        self.record_instruction("iinc");
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_iinc_insn(variable, increment)?;
        }
        Ok(())
    }

    fn visit_table_switch_insn(&mut self, min: i32, max: i32, default: &str, labels: &[String]) -> CheckResult<()> {
        self.require_in_code("visit_table_switch_insn")?;
        if min > max {
            return Err(CheckError::OperandOutOfRange {
                insn: "tableswitch",
                value: i64::from(min),
            });
        }
        let expected_len = u64::from(max.abs_diff(min)) + 1;
        if labels.len() as u64 != expected_len {
            return Err(CheckError::OperandOutOfRange {
                insn: "tableswitch",
                value: labels.len() as i64,
            });
        }
        self.labels.borrow_mut().intern(default);
        for label in labels {
            self.labels.borrow_mut().intern(label);
        }
        self.record_instruction("tableswitch");
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_table_switch_insn(min, max, default, labels)?;
        }
        Ok(())
    }

    fn visit_lookup_switch_insn(&mut self, default: &str, keys: &[i32], labels: &[String]) -> CheckResult<()> {
        self.require_in_code("visit_lookup_switch_insn")?;
        if keys.len() != labels.len() {
            return Err(CheckError::OperandOutOfRange {
                insn: "lookupswitch",
                value: labels.len() as i64,
            });
        }
        self.labels.borrow_mut().intern(default);
        for label in labels {
            self.labels.borrow_mut().intern(label);
        }
        self.record_instruction("lookupswitch");
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_lookup_switch_insn(default, keys, labels)?;
        }
        Ok(())
    }

    fn visit_multi_anew_array_insn(&mut self, descriptor: &str, dimensions: u8) -> CheckResult<()> {
        self.require_in_code("visit_multi_anew_array_insn")?;
        if !descriptor.starts_with('[') || !is_valid_field_descriptor(descriptor) {
            return Err(CheckError::MalformedFieldDescriptor(descriptor.to_owned()));
        }
        let max = bracket_depth(descriptor);
        if dimensions < 1 || dimensions > max {
            return Err(CheckError::InvalidArrayDimensions {
                dimensions,
                descriptor: descriptor.to_owned(),
                max,
            });
        }
        self.record_instruction("multianewarray");
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_multi_anew_array_insn(descriptor, dimensions)?;
        }
        Ok(())
    }

    fn visit_insn_annotation(
        &mut self,
        type_reference: u32,
        descriptor: &str,
        visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        self.require_in_code("visit_insn_annotation")?;
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_insn_annotation(type_reference, descriptor, visible)?,
            None => None,
        };
        Ok(Some(Box::new(AnnotationChecker::new(child))))
    }

    fn visit_try_catch_block(
        &mut self,
        start: &str,
        end: &str,
        handler: &str,
        exception_type: Option<&str>,
    ) -> CheckResult<()> {
        self.require_in_code("visit_try_catch_block")?;
        if let Some(exception_type) = exception_type {
            if !is_valid_internal_name(exception_type) {
                return Err(CheckError::MalformedInternalName(exception_type.to_owned()));
            }
        }
        let start_label = self.labels.borrow_mut().intern(start);
        let end_label = self.labels.borrow_mut().intern(end);
        let handler_label = self.labels.borrow_mut().intern(handler);
        if self.labels.borrow().is_defined(start_label) || self.labels.borrow().is_defined(end_label) || self.labels.borrow().is_defined(handler_label)
        {
            return Err(CheckError::TryCatchLabelOrder(
                "try-catch range labels must be declared before the labels they name are visited",
            ));
        }
        self.try_catch_handlers
            .push((start_label, end_label, handler_label, exception_type.map(str::to_owned)));
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_try_catch_block(start, end, handler, exception_type)?;
        }
        Ok(())
    }

    fn visit_try_catch_annotation(
        &mut self,
        type_reference: u32,
        descriptor: &str,
        visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        self.require_in_code("visit_try_catch_annotation")?;
        let child = match &mut self.delegate {
            Some(delegate) => delegate.visit_try_catch_annotation(type_reference, descriptor, visible)?,
            None => None,
        };
        Ok(Some(Box::new(AnnotationChecker::new(child))))
    }

    fn visit_local_variable(
        &mut self,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        start: &str,
        end: &str,
        index: u16,
    ) -> CheckResult<()> {
        self.require_in_code("visit_local_variable")?;
        if !is_valid_unqualified_name(name) {
            return Err(CheckError::MalformedInternalName(name.to_owned()));
        }
        if !is_valid_field_descriptor(descriptor) {
            return Err(CheckError::MalformedFieldDescriptor(descriptor.to_owned()));
        }
        if let Some(signature) = signature {
            check_field_signature(signature, None)?;
        }
        let start_label = self.labels.borrow_mut().intern(start);
        let end_label = self.labels.borrow_mut().intern(end);
        self.local_variable_ranges.push((start_label, end_label));
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_local_variable(name, descriptor, signature, start, end, index)?;
        }
        Ok(())
    }

    fn visit_local_variable_annotation(
        &mut self,
        type_reference: u32,
        start: &[String],
        end: &[String],
        index: &[u16],
        descriptor: &str,
        visible: bool,
    ) -> CheckResult<Option<Box<dyn AnnotationVisitor>>> {
        self.require_in_code("visit_local_variable_annotation")?;
        if start.len() != end.len() || start.len() != index.len() {
            return Err(CheckError::OperandOutOfRange {
                insn: "local_variable_annotation",
                value: start.len() as i64,
            });
        }
        let child = match &mut self.delegate {
            Some(delegate) => {
                delegate.visit_local_variable_annotation(type_reference, start, end, index, descriptor, visible)?
            }
            None => None,
        };
        Ok(Some(Box::new(AnnotationChecker::new(child))))
    }

    fn visit_line_number(&mut self, line: u16, start: &str) -> CheckResult<()> {
        self.require_in_code("visit_line_number")?;
        self.labels.borrow_mut().intern(start);
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_line_number(line, start)?;
        }
        Ok(())
    }

    fn visit_max(&mut self, max_stack: u16, max_locals: u16) -> CheckResult<()> {
        self.require_in_code("visit_max")?;
        self.labels.borrow().require_all_defined("visit_max")?;
        for (start, end, _handler, _exception_type) in &self.try_catch_handlers {
            let start_idx = *self.label_positions.get(start).expect("defined label has a recorded position");
            let end_idx = *self.label_positions.get(end).expect("defined label has a recorded position");
            if end_idx <= start_idx {
                return Err(CheckError::InvalidTryCatchRange {
                    start: start_idx,
                    end: end_idx,
                });
            }
        }
        for (start, end) in &self.local_variable_ranges {
            let start_idx = *self.label_positions.get(start).expect("defined label has a recorded position");
            let end_idx = *self.label_positions.get(end).expect("defined label has a recorded position");
            if end_idx <= start_idx {
                return Err(CheckError::InvalidLocalVariableRange {
                    start: start_idx,
                    end: end_idx,
                });
            }
        }
        self.max_stack = max_stack;
        self.max_locals = max_locals;
        self.maxs_called = true;
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_max(max_stack, max_locals)?;
        }
        Ok(())
    }

    fn visit_end(&mut self) -> CheckResult<()> {
        self.require_not_ended("visit_end")?;
        self.end_called = true;
        #[cfg(feature = "dataflow")]
        if self.code_called && self.options.enable_dataflow {
            let method = self.build_buffered_method();
            dataflow::analyze(&method, &IdentityTypeResolver)?;
        }
        if let Some(delegate) = &mut self.delegate {
            delegate.visit_end()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(descriptor: &str) -> MethodChecker {
        MethodChecker::new(
            descriptor,
            false,
            ClassVersion::of(52),
            false,
            CheckerOptions::default(),
            Rc::new(RefCell::new(LabelTable::new())),
            None,
        )
    }

    fn run_hello_world(checker: &mut MethodChecker) -> CheckResult<()> {
        checker.visit_code()?;
        checker.visit_field_insn(
            Opcode::Getstatic,
            "java/lang/System",
            "out",
            "Ljava/io/PrintStream;",
        )?;
        checker.visit_ldc_insn(&LdcValue::String("hello".into()))?;
        checker.visit_method_insn(
            Opcode::Invokevirtual,
            "java/io/PrintStream",
            "println",
            "(Ljava/lang/String;)V",
            false,
        )?;
        checker.visit_insn(Opcode::Return)?;
        checker.visit_max(2, 1)?;
        checker.visit_end()
    }

    #[test]
    fn s1_accepts_hello_world() {
        let mut checker = checker("([Ljava/lang/String;)V");
        assert!(run_hello_world(&mut checker).is_ok());
    }

    #[test]
    fn s2_rejects_invokevirtual_on_interface() {
        let mut checker = checker("([Ljava/lang/String;)V");
        checker.visit_code().unwrap();
        let result = checker.visit_method_insn(
            Opcode::Invokevirtual,
            "java/io/PrintStream",
            "println",
            "(Ljava/lang/String;)V",
            true,
        );
        assert!(matches!(result, Err(CheckError::InvokeVirtualOnInterface)));
    }

    #[test]
    fn s3_rejects_undefined_label_at_maxs() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        checker.visit_label("L1").unwrap();
        checker.visit_jump_insn(Opcode::Goto, "L2").unwrap();
        assert!(matches!(checker.visit_max(0, 0), Err(CheckError::UndefinedLabel(_))));
    }

    #[test]
    fn rejects_wrong_visit_method_for_opcode() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        let result = checker.visit_insn(Opcode::Bipush);
        assert!(matches!(result, Err(CheckError::WrongVisitMethod { .. })));
    }

    #[test]
    fn rejects_out_of_range_bipush() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        assert!(checker.visit_int_insn(Opcode::Bipush, 200).is_err());
        assert!(checker.visit_int_insn(Opcode::Bipush, 100).is_ok());
    }

    #[test]
    fn rejects_new_with_array_type() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        assert!(matches!(
            checker.visit_type_insn(Opcode::New, "[Ljava/lang/String;"),
            Err(CheckError::NewWithArrayType)
        ));
    }

    #[test]
    fn rejects_invokeinterface_on_non_interface_owner() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        assert!(matches!(
            checker.visit_method_insn(Opcode::Invokeinterface, "java/lang/Runnable", "run", "()V", false),
            Err(CheckError::InvokeInterfaceOnClass)
        ));
    }

    #[test]
    fn rejects_invokespecial_interface_below_java_8() {
        let mut checker = MethodChecker::new(
            "()V",
            true,
            ClassVersion::of(51),
            false,
            CheckerOptions::default(),
            Rc::new(RefCell::new(LabelTable::new())),
            None,
        );
        checker.visit_code().unwrap();
        assert!(matches!(
            checker.visit_method_insn(Opcode::Invokespecial, "com/example/Iface", "m", "()V", true),
            Err(CheckError::InvokeSpecialInterfaceTooOld)
        ));
    }

    #[test]
    fn rejects_init_invoked_with_invokestatic() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        assert!(matches!(
            checker.visit_method_insn(Opcode::Invokestatic, "java/lang/Object", "<init>", "()V", false),
            Err(CheckError::InitNotInvokedWithInvokeSpecial)
        ));
    }

    #[test]
    fn rejects_duplicate_frame_at_same_index() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        checker.visit_frame(FrameKind::Same, &[], &[]).unwrap();
        assert!(matches!(
            checker.visit_frame(FrameKind::Same, &[], &[]),
            Err(CheckError::DuplicateFrame(0))
        ));
    }

    #[test]
    fn rejects_mixed_frame_modes() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        checker.visit_frame(FrameKind::Same, &[], &[]).unwrap();
        checker.visit_insn(Opcode::Nop).unwrap();
        assert!(matches!(
            checker.visit_frame(FrameKind::Full, &[], &[]),
            Err(CheckError::MixedFrameModes)
        ));
    }

    #[test]
    fn rejects_frame_exceeding_same1_stack_limit() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        let stack = vec![FrameElement::Integer, FrameElement::Integer];
        assert!(matches!(
            checker.visit_frame(FrameKind::Same1, &[], &stack),
            Err(CheckError::FrameElementCountExceeded { .. })
        ));
    }

    #[test]
    fn rejects_try_catch_labels_visited_before_registration() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        checker.visit_label("start").unwrap();
        assert!(matches!(
            checker.visit_try_catch_block("start", "end", "handler", None),
            Err(CheckError::TryCatchLabelOrder(_))
        ));
    }

    #[test]
    fn accepts_try_catch_block_with_valid_range() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        checker.visit_try_catch_block("start", "end", "handler", Some("java/lang/Exception")).unwrap();
        checker.visit_label("start").unwrap();
        checker.visit_insn(Opcode::Nop).unwrap();
        checker.visit_label("end").unwrap();
        checker.visit_jump_insn(Opcode::Goto, "after").unwrap();
        checker.visit_label("handler").unwrap();
        checker.visit_insn(Opcode::Athrow).unwrap();
        checker.visit_label("after").unwrap();
        checker.visit_insn(Opcode::Return).unwrap();
        assert!(checker.visit_max(1, 0).is_ok());
    }

    #[test]
    fn rejects_empty_try_catch_range() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        checker.visit_try_catch_block("start", "end", "handler", None).unwrap();
        checker.visit_label("start").unwrap();
        checker.visit_label("end").unwrap();
        checker.visit_label("handler").unwrap();
        checker.visit_insn(Opcode::Return).unwrap();
        assert!(matches!(
            checker.visit_max(1, 0),
            Err(CheckError::InvalidTryCatchRange { .. })
        ));
    }

    #[test]
    fn rejects_parameter_annotation_index_out_of_range() {
        let mut checker = checker("(I)V");
        assert!(matches!(
            checker.visit_parameter_annotation(1, "Ljava/lang/annotation/Retention;", true),
            Err(CheckError::ParameterIndexOutOfRange { .. })
        ));
        assert!(checker.visit_parameter_annotation(0, "Ljava/lang/annotation/Retention;", true).is_ok());
    }

    #[test]
    fn rejects_multianewarray_dimensions_out_of_range() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        assert!(matches!(
            checker.visit_multi_anew_array_insn("[[I", 3),
            Err(CheckError::InvalidArrayDimensions { .. })
        ));
        assert!(checker.visit_multi_anew_array_insn("[[I", 2).is_ok());
    }

    #[test]
    fn rejects_init_named_method_on_interface_with_arguments() {
        let mut checker = MethodChecker::new(
            "(I)V",
            true,
            ClassVersion::JAVA_8,
            true,
            CheckerOptions::default(),
            Rc::new(RefCell::new(LabelTable::new())),
            None,
        );
        assert!(matches!(
            checker.visit_code(),
            Err(CheckError::MalformedMethodDescriptor(_))
        ));
    }

    #[test]
    fn rejects_calls_before_code() {
        let mut checker = checker("()V");
        assert!(matches!(
            checker.visit_insn(Opcode::Nop),
            Err(CheckError::BeforeOpeningEvent(_))
        ));
    }

    #[test]
    fn rejects_calls_after_maxs() {
        let mut checker = checker("()V");
        checker.visit_code().unwrap();
        checker.visit_insn(Opcode::Return).unwrap();
        checker.visit_max(0, 0).unwrap();
        assert!(checker.visit_insn(Opcode::Nop).is_err());
    }

    #[test]
    fn rejects_ldc_below_minimum_class_version() {
        let mut checker = MethodChecker::new(
            "()V",
            false,
            ClassVersion::of(50),
            false,
            CheckerOptions::default(),
            Rc::new(RefCell::new(LabelTable::new())),
            None,
        );
        checker.visit_code().unwrap();
        assert!(matches!(
            checker.visit_ldc_insn(&LdcValue::MethodType("()V".into())),
            Err(CheckError::LdcBelowMinimumClassVersion { .. })
        ));
    }
}
