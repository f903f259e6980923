//! Native function table tests

mod common;

use common::*;
use common::assert_eq;
use h5nif_runtime::api::native::NativeFunctionBuilder;
use h5nif_runtime::{Term, VERSION};
use rstest::rstest;
use serial_test::serial;

fn listing() -> String {
    let module = module(BackendKind::Memory).unwrap();
    module
        .functions()
        .iter()
        .map(|f| {
            let arity = f.arity.map(|a| a.to_string()).unwrap_or_else(|| "*".to_string());
            format!("{}/{} {}", f.name, arity, f.aliases.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_function_table_snapshot() {
    insta::assert_snapshot!(listing(), @r"
    h5tcopy/1 copy
    h5tclose/1 close
    h5tget_class/1 get_class
    h5tget_order/1 get_order
    h5tget_size/1 get_size
    ");
}

#[test]
fn test_version() {
    assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
}

#[rstest]
#[case::memory(BackendKind::Memory)]
#[case::hdf5(BackendKind::Hdf5)]
#[serial(hdf5)]
fn test_host_session(#[case] kind: BackendKind) {
    let Some(m) = module(kind) else {
        return;
    };

    let id = expect_handle(&m.call("h5tcopy", &[Term::atom("H5T_NATIVE_INT")]));
    assert_eq!(m.call("get_size", &[Term::Int(id)]), Term::ok_tuple(Term::Int(4)));
    assert_eq!(m.call("h5tclose", &[Term::Int(id)]), Term::ok());
}

#[rstest]
#[case("h5tcopy")]
#[case("copy")]
#[case("h5tclose")]
#[case("h5tget_class")]
#[case("get_order")]
#[case("h5tget_size")]
fn test_every_name_checks_arity(#[case] name: &str) {
    let m = module(BackendKind::Memory).unwrap();
    assert_eq!(
        expect_error(&m.call(name, &[])),
        "Incorrect number of arguments"
    );
}

#[test]
fn test_unknown_function_reports_name_and_arity() {
    let m = module(BackendKind::Memory).unwrap();
    assert_eq!(
        expect_error(&m.call("h5tset_size", &[Term::Int(1), Term::Int(8)])),
        "Unknown function h5tset_size/2"
    );
}

#[test]
fn test_panicking_function_does_not_unwind_into_host() {
    let mut m = module(BackendKind::Memory).unwrap();
    m.register(
        NativeFunctionBuilder::new("h5tbroken")
            .with_arity(1)
            .with_implementation(|args| {
                let items: Vec<Term> = Vec::new();
                Ok(items[args.len() + 5].clone())
            })
            .build()
            .unwrap(),
    );
    assert_eq!(
        m.call("h5tbroken", &[Term::Int(1)]),
        Term::error_tuple("Internal error in h5tbroken")
    );
}

#[test]
fn test_registration_shadows_builtin() {
    let mut m = module(BackendKind::Memory).unwrap();
    m.register(
        NativeFunctionBuilder::new("h5tget_size")
            .with_arity(1)
            .with_implementation(|_| Ok(Term::ok_tuple(Term::Int(-1))))
            .build()
            .unwrap(),
    );
    assert_eq!(
        m.call("h5tget_size", &[Term::Int(1)]),
        Term::ok_tuple(Term::Int(-1))
    );
    // The alias still reaches the built-in
    assert_eq!(
        expect_error(&m.call("get_size", &[Term::Int(1)])),
        "Can not get size"
    );
}
