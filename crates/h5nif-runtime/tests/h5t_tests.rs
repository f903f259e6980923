//! Datatype bridge tests
//!
//! Drives the five operations through the host-facing entry point against
//! both backends.

mod common;

use common::*;
use common::{assert_eq, assert_ne};
use h5nif_runtime::ffi::types::{ByteOrder, DatatypeClass};
use h5nif_runtime::h5t::{Fault, TYPE_TABLE};
use h5nif_runtime::{NativeType, Operation, Term};
use rstest::rstest;
use serial_test::serial;

macro_rules! backend_or_skip {
    ($kind:expr) => {
        match datatypes($kind) {
            Some(dt) => dt,
            None => return,
        }
    };
}

// ============================================================================
// Happy path
// ============================================================================

#[rstest]
#[case::memory(BackendKind::Memory)]
#[case::hdf5(BackendKind::Hdf5)]
#[serial(hdf5)]
fn test_native_int_lifecycle(#[case] kind: BackendKind) {
    let dt = backend_or_skip!(kind);

    let copied = dt.invoke(Operation::Copy, &[Term::atom("H5T_NATIVE_INT")]);
    let id = expect_handle(&copied);
    assert!(id > 0);

    let handle = [Term::Int(id)];
    assert_eq!(
        dt.invoke(Operation::GetClass, &handle),
        Term::ok_tuple(Term::Int(DatatypeClass::Integer.raw() as i64))
    );
    assert_eq!(
        dt.invoke(Operation::GetOrder, &handle),
        Term::ok_tuple(Term::Int(ByteOrder::native().raw() as i64))
    );
    assert_eq!(
        dt.invoke(Operation::GetSize, &handle),
        Term::ok_tuple(Term::Int(std::mem::size_of::<std::os::raw::c_int>() as i64))
    );
    assert_eq!(dt.invoke(Operation::Close, &handle), Term::ok());
}

#[rstest]
#[case::memory(BackendKind::Memory)]
#[case::hdf5(BackendKind::Hdf5)]
#[serial(hdf5)]
fn test_every_table_entry_round_trips(#[case] kind: BackendKind) {
    let dt = backend_or_skip!(kind);

    for entry in TYPE_TABLE.iter() {
        let handle = dt.copy(entry.name).unwrap();
        assert_eq!(
            dt.get_class(&handle),
            Ok(entry.class.raw()),
            "class of {}",
            entry.name
        );
        assert_eq!(dt.get_size(&handle), Ok(entry.size), "size of {}", entry.name);
        dt.close(handle).unwrap();
    }
}

#[rstest]
#[case::memory(BackendKind::Memory)]
#[case::hdf5(BackendKind::Hdf5)]
#[serial(hdf5)]
fn test_string_type_name_accepted(#[case] kind: BackendKind) {
    let dt = backend_or_skip!(kind);
    let copied = dt.invoke(Operation::Copy, &[Term::string("H5T_NATIVE_DOUBLE")]);
    let id = expect_handle(&copied);
    assert_eq!(
        dt.invoke(Operation::GetSize, &[Term::Int(id)]),
        Term::ok_tuple(Term::Int(8))
    );
    assert_eq!(dt.invoke(Operation::Close, &[Term::Int(id)]), Term::ok());
}

#[rstest]
#[case::memory(BackendKind::Memory)]
#[case::hdf5(BackendKind::Hdf5)]
#[serial(hdf5)]
fn test_copies_are_distinct(#[case] kind: BackendKind) {
    let dt = backend_or_skip!(kind);
    let a = dt.copy_native(NativeType::Int).unwrap();
    let b = dt.copy_native(NativeType::Int).unwrap();
    assert_ne!(a.id(), b.id());
    dt.close(a).unwrap();
    dt.close(b).unwrap();
}

// ============================================================================
// Native failures
// ============================================================================

#[rstest]
#[case::memory(BackendKind::Memory)]
#[case::hdf5(BackendKind::Hdf5)]
#[serial(hdf5)]
fn test_foreign_handle_fails_every_query(
    #[case] kind: BackendKind,
    #[values(0, -1, 0x7fff_0000)] id: i64,
) {
    let dt = backend_or_skip!(kind);
    let handle = [Term::Int(id)];

    assert_eq!(
        expect_error(&dt.invoke(Operation::GetClass, &handle)),
        "Can not get type class"
    );
    assert_eq!(
        expect_error(&dt.invoke(Operation::GetOrder, &handle)),
        "Can not get order"
    );
    assert_eq!(
        expect_error(&dt.invoke(Operation::GetSize, &handle)),
        "Can not get size"
    );
    assert_eq!(
        expect_error(&dt.invoke(Operation::Close, &handle)),
        "Can not close type"
    );
}

#[rstest]
#[case::memory(BackendKind::Memory)]
#[case::hdf5(BackendKind::Hdf5)]
#[serial(hdf5)]
fn test_closed_handle_is_dead(#[case] kind: BackendKind) {
    let dt = backend_or_skip!(kind);
    let id = expect_handle(&dt.invoke(Operation::Copy, &[Term::atom("H5T_NATIVE_INT")]));
    assert_eq!(dt.invoke(Operation::Close, &[Term::Int(id)]), Term::ok());
    assert_eq!(
        expect_error(&dt.invoke(Operation::GetSize, &[Term::Int(id)])),
        "Can not get size"
    );
}

#[rstest]
#[case::memory(BackendKind::Memory)]
#[case::hdf5(BackendKind::Hdf5)]
#[serial(hdf5)]
fn test_calls_from_another_thread(#[case] kind: BackendKind) {
    let dt = backend_or_skip!(kind);
    let worker = dt.clone();
    let (size, dead) = std::thread::spawn(move || {
        let id = expect_handle(&worker.invoke(Operation::Copy, &[Term::atom("H5T_NATIVE_INT")]));
        let size = worker.invoke(Operation::GetSize, &[Term::Int(id)]);
        assert_eq!(worker.invoke(Operation::Close, &[Term::Int(id)]), Term::ok());
        (size, worker.invoke(Operation::GetSize, &[Term::Int(id)]))
    })
    .join()
    .unwrap();
    assert_eq!(size, Term::ok_tuple(Term::Int(4)));
    assert_eq!(dead, Term::error_tuple("Can not get size"));
}

#[test]
fn test_stale_copy_reports_copy_failure_without_leaking() {
    let (library, dt) = memory();
    library.inject(Fault::CopyYieldsStaleHandle);
    assert_eq!(
        dt.invoke(Operation::Copy, &[Term::atom("H5T_NATIVE_INT")]),
        Term::error_tuple("Can not copy type")
    );
    assert_eq!(library.open_count(), 0);
    // The positive identifier got a cleanup close
    assert_eq!(library.close_count(), 1);

    // The fault was one-shot
    assert!(dt
        .invoke(Operation::Copy, &[Term::atom("H5T_NATIVE_INT")])
        .is_ok());
}

#[test]
fn test_failed_copy_reports_error_without_close() {
    let (library, dt) = memory();
    library.inject(Fault::CopyFails);
    assert_eq!(
        dt.invoke(Operation::Copy, &[Term::atom("H5T_NATIVE_INT")]),
        Term::error_tuple("Can not copy type")
    );
    assert_eq!(library.close_count(), 0);
    assert_eq!(library.open_count(), 0);
}

#[test]
fn test_missing_predefined_type_reports_copy_failure() {
    let (library, dt) = memory();
    library.inject(Fault::PredefinedUnavailable);
    assert_eq!(
        dt.invoke(Operation::Copy, &[Term::atom("H5T_NATIVE_DOUBLE")]),
        Term::error_tuple("Can not copy type")
    );
    assert_eq!(library.call_count(), 0);
    assert_eq!(library.close_count(), 0);
}

#[test]
fn test_failed_close_leaves_handle_usable() {
    let (library, dt) = memory();
    let id = expect_handle(&dt.invoke(Operation::Copy, &[Term::atom("H5T_NATIVE_INT")]));
    library.inject(Fault::CloseFails);
    assert_eq!(
        dt.invoke(Operation::Close, &[Term::Int(id)]),
        Term::error_tuple("Can not close type")
    );
    assert!(dt.invoke(Operation::GetSize, &[Term::Int(id)]).is_ok());
    assert_eq!(dt.invoke(Operation::Close, &[Term::Int(id)]), Term::ok());
}

// ============================================================================
// Argument errors
// ============================================================================

#[rstest]
#[case::no_args(Operation::Copy, vec![], "Incorrect number of arguments")]
#[case::two_args(
    Operation::GetSize,
    vec![Term::Int(1), Term::Int(2)],
    "Incorrect number of arguments"
)]
#[case::integer_type_name(Operation::Copy, vec![Term::Int(5)], "Can't get type from argv")]
#[case::list_type_name(
    Operation::Copy,
    vec![Term::List(vec![Term::atom("H5T_NATIVE_INT")])],
    "Can't get type from argv"
)]
#[case::atom_handle(Operation::Close, vec![Term::atom("h")], "Can't get resource from argv")]
#[case::string_handle(Operation::GetClass, vec![Term::string("7")], "Can't get resource from argv")]
#[case::float_handle(Operation::GetOrder, vec![Term::Float(1.5.into())], "Can't get resource from argv")]
#[case::unknown_type(
    Operation::Copy,
    vec![Term::atom("H5T_NATIVE_BOOL")],
    "Unknown type H5T_NATIVE_BOOL"
)]
#[case::case_changed(
    Operation::Copy,
    vec![Term::atom("h5t_native_int")],
    "Unknown type h5t_native_int"
)]
#[case::empty_name(Operation::Copy, vec![Term::string("")], "Unknown type ")]
fn test_argument_errors_never_reach_native(
    #[case] op: Operation,
    #[case] args: Vec<Term>,
    #[case] message: &str,
) {
    let (library, dt) = memory();
    assert_eq!(dt.invoke(op, &args), Term::error_tuple(message));
    assert_eq!(library.call_count(), 0);
}

#[test]
fn test_over_length_name_rejected_not_truncated() {
    let (library, dt) = memory();
    let long = format!("H5T_NATIVE_INT{}", "X".repeat(2048));
    assert_eq!(
        dt.invoke(Operation::Copy, &[Term::atom(long)]),
        Term::error_tuple("Can't get type from argv")
    );

    // Exactly at the bound is also rejected
    let dt = dt.with_max_type_name_len("H5T_NATIVE_INT".len());
    assert_eq!(
        dt.invoke(Operation::Copy, &[Term::atom("H5T_NATIVE_INT")]),
        Term::error_tuple("Can't get type from argv")
    );
    assert_eq!(library.call_count(), 0);
}
