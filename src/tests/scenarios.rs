//! The literal end-to-end scenarios: one assembled event sequence driven
//! through a real checker chain, asserting the documented accept/reject
//! outcome.
use crate::{
    CheckError, ClassVersion,
    checker::{AnnotationChecker, ClassChecker, CheckerOptions, signature_checker::check_class_signature},
    jvm::{access_flags::AccessFlags, constant::LdcValue, opcodes::Opcode},
    visitor::{AnnotationVisitor, ClassVisitor, MethodVisitor},
};

fn hello_world_header(checker: &mut ClassChecker) {
    checker
        .visit_header(
            ClassVersion::of(52),
            AccessFlags::PUBLIC | AccessFlags::SUPER,
            "Hello",
            None,
            Some("java/lang/Object"),
            &[],
        )
        .unwrap();
}

fn run_main_body(method: &mut dyn MethodVisitor, invoke_on_interface: bool) -> crate::CheckResult<()> {
    method.visit_code()?;
    method.visit_field_insn(Opcode::Getstatic, "java/lang/System", "out", "Ljava/io/PrintStream;")?;
    method.visit_ldc_insn(&LdcValue::String("hello".into()))?;
    method.visit_method_insn(
        Opcode::Invokevirtual,
        "java/io/PrintStream",
        "println",
        "(Ljava/lang/String;)V",
        invoke_on_interface,
    )?;
    method.visit_insn(Opcode::Return)?;
    method.visit_max(2, 1)?;
    method.visit_end()
}

#[test]
fn s1_hello_world_is_accepted() {
    let mut checker = ClassChecker::new(None, CheckerOptions::default());
    hello_world_header(&mut checker);
    let mut method = checker
        .visit_method(
            AccessFlags::PUBLIC | AccessFlags::STATIC,
            "main",
            "([Ljava/lang/String;)V",
            None,
            &[],
        )
        .unwrap()
        .unwrap();
    assert!(run_main_body(&mut *method, false).is_ok());
    assert!(checker.visit_end().is_ok());
}

#[test]
fn s2_invokevirtual_on_interface_is_rejected() {
    let mut checker = ClassChecker::new(None, CheckerOptions::default());
    hello_world_header(&mut checker);
    let mut method = checker
        .visit_method(
            AccessFlags::PUBLIC | AccessFlags::STATIC,
            "main",
            "([Ljava/lang/String;)V",
            None,
            &[],
        )
        .unwrap()
        .unwrap();
    let err = run_main_body(&mut *method, true).unwrap_err();
    assert!(matches!(&err, CheckError::InvokeVirtualOnInterface));
    assert_eq!(err.kind(), crate::ErrorKind::Argument);
}

#[test]
fn s3_undefined_label_at_maxs_is_rejected() {
    let mut checker = ClassChecker::new(None, CheckerOptions::default());
    hello_world_header(&mut checker);
    let mut method = checker
        .visit_method(AccessFlags::PUBLIC | AccessFlags::STATIC, "m", "()V", None, &[])
        .unwrap()
        .unwrap();
    method.visit_code().unwrap();
    method.visit_label("L1").unwrap();
    method.visit_jump_insn(Opcode::Goto, "L2").unwrap();
    assert!(matches!(method.visit_max(0, 0), Err(CheckError::UndefinedLabel(_))));
}

#[test]
fn s4_nest_host_and_member_are_mutually_exclusive() {
    let mut checker = ClassChecker::new(None, CheckerOptions::default());
    hello_world_header(&mut checker);
    checker.visit_nest_host("A").unwrap();
    assert!(matches!(
        checker.visit_nest_member("B"),
        Err(CheckError::NestHostAndMemberConflict)
    ));
}

#[test]
fn s5_annotation_visit_after_end_is_rejected() {
    let mut checker = AnnotationChecker::new(None);
    checker.visit_end().unwrap();
    let result = checker.visit(Some("x"), &crate::jvm::constant::AnnotationValue::Int(42));
    assert!(matches!(result, Err(CheckError::AfterEnd(_))));
}

#[test]
fn s6_generic_class_signature_is_accepted() {
    assert!(check_class_signature("<T:Ljava/lang/Object;>Ljava/lang/Object;", None).is_ok());
}
