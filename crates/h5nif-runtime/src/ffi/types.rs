//! FFI type system - C-compatible types for the HDF5 boundary
//!
//! Defines:
//! - The raw HDF5 typedefs and reserved enumerator values used by `H5T`
//! - `DatatypeClass` / `ByteOrder`: checked views of the raw enumerators
//! - `ArgKind`: the primitive shape a host argument must decode to
//! - `NativeArg`: a decoded argument ready for a native call
//!
//! Type mapping:
//! - ArgKind::TypeName → NativeArg::TypeName(String)  (atom or string term)
//! - ArgKind::Handle   → NativeArg::Handle(hid_t)     (integer term)

#![allow(non_camel_case_types)]

use serde::Serialize;
use std::fmt;
use std::os::raw::{c_int, c_uint};

/// HDF5 object identifier (64-bit since HDF5 1.10)
pub type hid_t = i64;
/// HDF5 status return: non-negative on success
pub type herr_t = c_int;
/// HDF5 tri-state return: positive true, zero false, negative error
pub type htri_t = c_int;
/// Raw `H5T_class_t`
pub type H5T_class_t = c_int;
/// Raw `H5T_order_t`
pub type H5T_order_t = c_int;
/// `size_t`
pub type size_t = usize;
/// `unsigned` as used by `H5get_libversion`
pub type unsigned = c_uint;

/// Invalid identifier returned by identifier-producing calls on failure
pub const H5I_INVALID_HID: hid_t = -1;
/// Default error stack
pub const H5E_DEFAULT: hid_t = 0;

/// Reserved "no class" enumerator returned by `H5Tget_class` on failure
pub const H5T_NO_CLASS: H5T_class_t = -1;
/// Reserved "order error" enumerator returned by `H5Tget_order` on failure
pub const H5T_ORDER_ERROR: H5T_order_t = -1;

/// Datatype class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum DatatypeClass {
    Integer = 0,
    Float = 1,
    Time = 2,
    String = 3,
    Bitfield = 4,
    Opaque = 5,
    Compound = 6,
    Reference = 7,
    Enum = 8,
    Vlen = 9,
    Array = 10,
    Complex = 11,
}

impl DatatypeClass {
    /// Convert a raw enumerator; `None` for the sentinel and unknown values
    pub fn from_raw(raw: H5T_class_t) -> Option<Self> {
        Some(match raw {
            0 => DatatypeClass::Integer,
            1 => DatatypeClass::Float,
            2 => DatatypeClass::Time,
            3 => DatatypeClass::String,
            4 => DatatypeClass::Bitfield,
            5 => DatatypeClass::Opaque,
            6 => DatatypeClass::Compound,
            7 => DatatypeClass::Reference,
            8 => DatatypeClass::Enum,
            9 => DatatypeClass::Vlen,
            10 => DatatypeClass::Array,
            11 => DatatypeClass::Complex,
            _ => return None,
        })
    }

    /// Raw enumerator value as the native library reports it
    pub fn raw(self) -> H5T_class_t {
        self as H5T_class_t
    }

    /// HDF5 constant name
    pub fn constant_name(self) -> &'static str {
        match self {
            DatatypeClass::Integer => "H5T_INTEGER",
            DatatypeClass::Float => "H5T_FLOAT",
            DatatypeClass::Time => "H5T_TIME",
            DatatypeClass::String => "H5T_STRING",
            DatatypeClass::Bitfield => "H5T_BITFIELD",
            DatatypeClass::Opaque => "H5T_OPAQUE",
            DatatypeClass::Compound => "H5T_COMPOUND",
            DatatypeClass::Reference => "H5T_REFERENCE",
            DatatypeClass::Enum => "H5T_ENUM",
            DatatypeClass::Vlen => "H5T_VLEN",
            DatatypeClass::Array => "H5T_ARRAY",
            DatatypeClass::Complex => "H5T_COMPLEX",
        }
    }
}

impl fmt::Display for DatatypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constant_name())
    }
}

/// Byte order of an atomic datatype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum ByteOrder {
    LittleEndian = 0,
    BigEndian = 1,
    Vax = 2,
    Mixed = 3,
    Unordered = 4,
}

impl ByteOrder {
    /// Convert a raw enumerator; `None` for the sentinel and unknown values
    pub fn from_raw(raw: H5T_order_t) -> Option<Self> {
        Some(match raw {
            0 => ByteOrder::LittleEndian,
            1 => ByteOrder::BigEndian,
            2 => ByteOrder::Vax,
            3 => ByteOrder::Mixed,
            4 => ByteOrder::Unordered,
            _ => return None,
        })
    }

    /// Byte order of the machine this crate was compiled for
    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }

    /// Raw enumerator value as the native library reports it
    pub fn raw(self) -> H5T_order_t {
        self as H5T_order_t
    }

    /// HDF5 constant name
    pub fn constant_name(self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "H5T_ORDER_LE",
            ByteOrder::BigEndian => "H5T_ORDER_BE",
            ByteOrder::Vax => "H5T_ORDER_VAX",
            ByteOrder::Mixed => "H5T_ORDER_MIXED",
            ByteOrder::Unordered => "H5T_ORDER_NONE",
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constant_name())
    }
}

/// Primitive shape an argument must decode to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// Symbolic type name: atom or string, length-bounded
    TypeName,
    /// Datatype handle: integer
    Handle,
}

impl ArgKind {
    /// Noun used in "Can't get <thing> from argv"
    pub fn display_name(&self) -> &'static str {
        match self {
            ArgKind::TypeName => "type",
            ArgKind::Handle => "resource",
        }
    }
}

/// A decoded argument ready to pass to the native library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeArg {
    TypeName(String),
    Handle(hid_t),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_sentinel_has_no_variant() {
        assert_eq!(DatatypeClass::from_raw(H5T_NO_CLASS), None);
        assert_eq!(DatatypeClass::from_raw(12), None);
        assert_eq!(DatatypeClass::from_raw(0), Some(DatatypeClass::Integer));
        assert_eq!(DatatypeClass::from_raw(1), Some(DatatypeClass::Float));
    }

    #[test]
    fn test_class_raw_roundtrip() {
        for raw in 0..=11 {
            let class = DatatypeClass::from_raw(raw).unwrap();
            assert_eq!(class.raw(), raw);
        }
    }

    #[test]
    fn test_order_sentinel_has_no_variant() {
        assert_eq!(ByteOrder::from_raw(H5T_ORDER_ERROR), None);
        assert_eq!(ByteOrder::from_raw(5), None);
        for raw in 0..=4 {
            assert_eq!(ByteOrder::from_raw(raw).unwrap().raw(), raw);
        }
    }

    #[test]
    fn test_native_order_matches_target() {
        #[cfg(target_endian = "little")]
        assert_eq!(ByteOrder::native(), ByteOrder::LittleEndian);
        #[cfg(target_endian = "big")]
        assert_eq!(ByteOrder::native(), ByteOrder::BigEndian);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(DatatypeClass::Integer.to_string(), "H5T_INTEGER");
        assert_eq!(ByteOrder::LittleEndian.to_string(), "H5T_ORDER_LE");
        assert_eq!(ArgKind::TypeName.display_name(), "type");
        assert_eq!(ArgKind::Handle.display_name(), "resource");
    }
}
