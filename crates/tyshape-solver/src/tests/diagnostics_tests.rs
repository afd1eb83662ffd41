use super::*;

#[test]
fn test_diagnostic_tracer_keeps_first_failure() {
    let mut tracer = DiagnosticTracer::new();
    assert!(!tracer.has_failure());

    tracer.on_mismatch(|| ContainmentFailure::NotAList);
    tracer.on_mismatch(|| ContainmentFailure::PossiblyEmpty);

    assert!(tracer.has_failure());
    assert_eq!(tracer.take_failure(), Some(ContainmentFailure::NotAList));
    assert_eq!(tracer.take_failure(), None);
}

#[test]
fn test_fast_tracer_never_builds_a_reason() {
    let mut tracer = FastTracer;
    tracer.on_mismatch(|| panic!("fast tracer must not build failure reasons"));
}
