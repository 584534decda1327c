//! # Access Type Tests
//!
//! Verifies classification helpers and the textual encoding of memory
//! access types.

use memsim_core::common::{AccessType, UnknownAccessKind};
use rstest::rstest;

#[test]
fn only_stores_write() {
    assert!(!AccessType::Ifetch.is_write());
    assert!(!AccessType::Load.is_write());
    assert!(AccessType::Store.is_write());
}

#[test]
fn labels_are_upper_case_names() {
    let labels: Vec<_> = [AccessType::Ifetch, AccessType::Load, AccessType::Store]
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(labels, ["IFETCH", "LOAD", "STORE"]);
}

#[rstest]
#[case("I", AccessType::Ifetch)]
#[case("ifetch", AccessType::Ifetch)]
#[case("L", AccessType::Load)]
#[case("Load", AccessType::Load)]
#[case("s", AccessType::Store)]
#[case("STORE", AccessType::Store)]
fn parses_kind_names(#[case] text: &str, #[case] expected: AccessType) {
    assert_eq!(text.parse::<AccessType>().unwrap(), expected);
}

#[test]
fn unknown_kind_is_reported() {
    let err = "X".parse::<AccessType>().unwrap_err();
    assert_eq!(err, UnknownAccessKind("X".to_owned()));
}
