//! # Error Message Tests
//!
//! Verifies that errors name the offending parameter and value.

use memsim_core::common::{AccessError, ConfigError, TraceError};

#[test]
fn config_error_messages() {
    let err = ConfigError::NotPowerOfTwo {
        what: "cache set count",
        value: 3,
    };
    assert_eq!(err.to_string(), "cache set count must be a power of two, got 3");

    let err = ConfigError::TooManyWays { ways: 32, max: 16 };
    assert_eq!(err.to_string(), "associativity 32 exceeds the maximum of 16 ways per set");
}

#[test]
fn access_error_message() {
    let err = AccessError::CoreOutOfRange { core: 2, num_cores: 2 };
    assert_eq!(err.to_string(), "core 2 is out of range for a 2-core memory system");
}

#[test]
fn trace_error_message_carries_line_number() {
    let err = TraceError::Malformed {
        line: 7,
        reason: "missing address".to_owned(),
    };
    assert_eq!(err.to_string(), "line 7: missing address");
}
