use libtx0::MachineError;
use tx0asm::load_with_listing;
use tx0sim::{run_session, split_batches};

fn run(program_text: &str, input: &str) -> (anyhow::Result<()>, String) {
    let (program, listing) = load_with_listing(program_text, "test").unwrap();
    let batches = split_batches(input).unwrap();
    let mut out = Vec::new();
    let result = run_session(&program, &listing, batches, 10_000, &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_sum() {
    let program = include_str!("../../programs/sum.tx0r");
    let input = "Test 1\n1\n2\n3\nTest 2\n\nTest 3\n-4\n 10 \n";

    let (result, output) = run(program, input);

    result.unwrap();
    assert_eq!(output, "Test 1\nHALT 6\nTest 2\nHALT 0\nTest 3\nHALT 6\n");
}

#[test]
fn test_check() {
    let program = include_str!("../../programs/check.tx0r");
    let input = "12\nnegative\n-3\n";

    let (result, output) = run(program, input);

    result.unwrap();
    assert_eq!(output, "HALT 12\nnegative\nERROR\n");
}

#[test]
fn test_fault_names_source_line() {
    let program = include_str!("../../programs/broken.tx0r");

    let (result, output) = run(program, "first\n1\nsecond\n2\n");

    let err = result.unwrap_err();
    assert_eq!(output, "first\n");
    assert_eq!(err.to_string(), "Batch 1 faulted on line 3 (STORE MISSING)");
    let fault = err.downcast_ref::<libtx0::Fault>().unwrap();
    assert_eq!(fault.error, MachineError::UnresolvedLabel("MISSING".into()));
}

#[test]
fn test_no_terminal_instruction() {
    let (result, output) = run("A: WORD 1\nB: WORD 2\n", "1\n");

    let err = result.unwrap_err();
    assert!(output.is_empty());
    assert_eq!(
        err.downcast_ref::<MachineError>(),
        Some(&MachineError::NoTerminalInstruction)
    );
}

#[test]
fn test_step_limit() {
    let program = "OPERATE READ,COPY,AC\nSPIN: TRANSFER SPIN\nOPERATE AC,COPY,HALT\n";

    let (result, output) = run(program, "-1\n");

    assert!(output.is_empty());
    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Batch 1 faulted on line 2 (SPIN: TRANSFER SPIN)"
    );
    let fault = err.downcast_ref::<libtx0::Fault>().unwrap();
    assert_eq!(fault.error, MachineError::StepLimit(10_000));
}

#[test]
fn test_transfer_falls_through() {
    let program = "OPERATE READ,COPY,AC\nSPIN: TRANSFER SPIN\nOPERATE AC,COPY,HALT\n";

    let (result, output) = run(program, "a\n1\nb\n");

    result.unwrap();
    assert_eq!(output, "a\nHALT 1\nb\nHALT 0\n");
}
