//! In-band failure sentinels
//!
//! Each `H5T` call reports failure through a reserved return value rather
//! than a separate error channel, and the reserved value differs per call.
//! `NativeCall::sentinel` is the single table of those values; it is an
//! exhaustive match, so a new call cannot be added without choosing its
//! sentinel. `check` runs before any native result is encoded.

use crate::ffi::types::{H5I_INVALID_HID, H5T_NO_CLASS, H5T_ORDER_ERROR};
use crate::h5t::{H5tError, H5tResult, Operation};
use std::fmt;

/// A wrapped native call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeCall {
    /// Read a predefined type's global identifier
    Predefined,
    /// `H5Tcopy`
    Copy,
    /// `H5Tclose`
    Close,
    /// `H5Tget_class`
    GetClass,
    /// `H5Tget_order`
    GetOrder,
    /// `H5Tget_size`
    GetSize,
    /// `H5Iis_valid`
    IsValid,
}

/// How a native call signals failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// Identifier ≤ 0
    NonPositive,
    /// Status ≠ 0
    NonZero,
    /// One reserved enumerator value
    Reserved(i64),
    /// Zero (for unsigned counts)
    Zero,
}

impl NativeCall {
    pub const ALL: [NativeCall; 7] = [
        NativeCall::Predefined,
        NativeCall::Copy,
        NativeCall::Close,
        NativeCall::GetClass,
        NativeCall::GetOrder,
        NativeCall::GetSize,
        NativeCall::IsValid,
    ];

    /// The failure sentinel documented for this call
    pub const fn sentinel(self) -> Sentinel {
        match self {
            NativeCall::Predefined => Sentinel::NonPositive,
            NativeCall::Copy => Sentinel::NonPositive,
            NativeCall::Close => Sentinel::NonZero,
            NativeCall::GetClass => Sentinel::Reserved(H5T_NO_CLASS as i64),
            NativeCall::GetOrder => Sentinel::Reserved(H5T_ORDER_ERROR as i64),
            NativeCall::GetSize => Sentinel::Zero,
            // 0 is "not valid", negative is an error; both fail
            NativeCall::IsValid => Sentinel::NonPositive,
        }
    }

    /// Native symbol name
    pub fn symbol(self) -> &'static str {
        match self {
            NativeCall::Predefined => "H5T_NATIVE_*_g",
            NativeCall::Copy => "H5Tcopy",
            NativeCall::Close => "H5Tclose",
            NativeCall::GetClass => "H5Tget_class",
            NativeCall::GetOrder => "H5Tget_order",
            NativeCall::GetSize => "H5Tget_size",
            NativeCall::IsValid => "H5Iis_valid",
        }
    }

    /// True if `raw` is this call's failure value
    pub fn fails(self, raw: i128) -> bool {
        self.sentinel().trips(raw)
    }
}

impl fmt::Display for NativeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Sentinel {
    /// True if `raw` matches the sentinel
    pub fn trips(self, raw: i128) -> bool {
        match self {
            Sentinel::NonPositive => raw <= 0,
            Sentinel::NonZero => raw != 0,
            Sentinel::Reserved(value) => raw == value as i128,
            Sentinel::Zero => raw == 0,
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentinel::NonPositive => write!(f, "returned identifier <= 0"),
            Sentinel::NonZero => write!(f, "nonzero status"),
            Sentinel::Reserved(value) => write!(f, "reserved value {}", value),
            Sentinel::Zero => write!(f, "zero"),
        }
    }
}

/// Check a raw native return value on behalf of `op`
///
/// Returns the value unchanged when it is not the call's sentinel.
pub fn check(op: Operation, call: NativeCall, raw: i128) -> H5tResult<i128> {
    if call.fails(raw) {
        log::debug!("{} returned {} ({}) during {}", call, raw, call.sentinel(), op);
        return Err(H5tError::Native { op, call, raw });
    }
    log::trace!("{} returned {}", call, raw);
    Ok(raw)
}

// H5I_INVALID_HID must itself trip the identifier sentinel
const _: () = assert!(H5I_INVALID_HID <= 0);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::types::H5I_INVALID_HID;

    #[test]
    fn test_copy_sentinel() {
        assert!(NativeCall::Copy.fails(0));
        assert!(NativeCall::Copy.fails(H5I_INVALID_HID as i128));
        assert!(!NativeCall::Copy.fails(1));
        assert!(!NativeCall::Copy.fails(0x0300_0000_0000_0100));
    }

    #[test]
    fn test_close_sentinel() {
        assert!(!NativeCall::Close.fails(0));
        assert!(NativeCall::Close.fails(-1));
        assert!(NativeCall::Close.fails(1));
    }

    #[test]
    fn test_class_sentinel_only_no_class() {
        assert!(NativeCall::GetClass.fails(-1));
        // H5T_INTEGER is 0 and must not be mistaken for failure
        assert!(!NativeCall::GetClass.fails(0));
        assert!(!NativeCall::GetClass.fails(10));
    }

    #[test]
    fn test_order_sentinel_only_order_error() {
        assert!(NativeCall::GetOrder.fails(-1));
        // H5T_ORDER_LE is 0 and must not be mistaken for failure
        assert!(!NativeCall::GetOrder.fails(0));
        assert!(!NativeCall::GetOrder.fails(4));
    }

    #[test]
    fn test_size_sentinel() {
        assert!(NativeCall::GetSize.fails(0));
        assert!(!NativeCall::GetSize.fails(4));
        assert!(!NativeCall::GetSize.fails(usize::MAX as i128));
    }

    #[test]
    fn test_is_valid_sentinel() {
        assert!(NativeCall::IsValid.fails(0));
        assert!(NativeCall::IsValid.fails(-1));
        assert!(!NativeCall::IsValid.fails(1));
    }

    #[test]
    fn test_every_call_has_a_symbol() {
        for call in NativeCall::ALL {
            assert!(!call.symbol().is_empty());
        }
    }

    #[test]
    fn test_check_passes_value_through() {
        assert_eq!(check(Operation::GetSize, NativeCall::GetSize, 4), Ok(4));
        assert_eq!(
            check(Operation::GetSize, NativeCall::GetSize, 0),
            Err(H5tError::Native {
                op: Operation::GetSize,
                call: NativeCall::GetSize,
                raw: 0
            })
        );
    }
}
