//! Type-name resolution
//!
//! Maps the symbolic names hosts use (`H5T_NATIVE_INT`, ...) to the
//! predefined native datatypes. The table is a process-wide static indexed
//! by `NativeType`; comparison is exact and case-sensitive.

use crate::ffi::marshal::MarshalContext;
use crate::ffi::types::{ArgKind, DatatypeClass};
use crate::h5t::{H5tError, H5tResult};
use serde::Serialize;
use std::fmt;
use std::mem::size_of;
use std::os::raw::{
    c_char, c_double, c_float, c_int, c_long, c_longlong, c_short, c_uchar, c_uint, c_ulong,
    c_ulonglong, c_ushort,
};

/// A predefined native atomic datatype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NativeType {
    Int,
    Schar,
    Uchar,
    Short,
    Ushort,
    Uint,
    Long,
    Ulong,
    Llong,
    Ullong,
    Float,
    Double,
}

impl NativeType {
    pub const COUNT: usize = 12;

    pub const ALL: [NativeType; NativeType::COUNT] = [
        NativeType::Int,
        NativeType::Schar,
        NativeType::Uchar,
        NativeType::Short,
        NativeType::Ushort,
        NativeType::Uint,
        NativeType::Long,
        NativeType::Ulong,
        NativeType::Llong,
        NativeType::Ullong,
        NativeType::Float,
        NativeType::Double,
    ];

    /// Position in `TYPE_TABLE`
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Table entry for this type
    pub fn entry(self) -> &'static TypeEntry {
        &TYPE_TABLE[self.index()]
    }

    /// Symbolic name, e.g. `H5T_NATIVE_INT`
    pub fn name(self) -> &'static str {
        self.entry().name
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the type table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeEntry {
    /// Symbolic name accepted from the host
    pub name: &'static str,
    pub native: NativeType,
    /// Global variable holding the predefined identifier
    pub symbol: &'static str,
    pub class: DatatypeClass,
    /// Size of the corresponding C type in bytes
    pub size: usize,
}

const fn entry(
    name: &'static str,
    native: NativeType,
    symbol: &'static str,
    class: DatatypeClass,
    size: usize,
) -> TypeEntry {
    TypeEntry {
        name,
        native,
        symbol,
        class,
        size,
    }
}

/// Supported type names, in `NativeType` order
pub static TYPE_TABLE: [TypeEntry; NativeType::COUNT] = [
    entry(
        "H5T_NATIVE_INT",
        NativeType::Int,
        "H5T_NATIVE_INT_g",
        DatatypeClass::Integer,
        size_of::<c_int>(),
    ),
    entry(
        "H5T_NATIVE_SCHAR",
        NativeType::Schar,
        "H5T_NATIVE_SCHAR_g",
        DatatypeClass::Integer,
        size_of::<c_char>(),
    ),
    entry(
        "H5T_NATIVE_UCHAR",
        NativeType::Uchar,
        "H5T_NATIVE_UCHAR_g",
        DatatypeClass::Integer,
        size_of::<c_uchar>(),
    ),
    entry(
        "H5T_NATIVE_SHORT",
        NativeType::Short,
        "H5T_NATIVE_SHORT_g",
        DatatypeClass::Integer,
        size_of::<c_short>(),
    ),
    entry(
        "H5T_NATIVE_USHORT",
        NativeType::Ushort,
        "H5T_NATIVE_USHORT_g",
        DatatypeClass::Integer,
        size_of::<c_ushort>(),
    ),
    entry(
        "H5T_NATIVE_UINT",
        NativeType::Uint,
        "H5T_NATIVE_UINT_g",
        DatatypeClass::Integer,
        size_of::<c_uint>(),
    ),
    entry(
        "H5T_NATIVE_LONG",
        NativeType::Long,
        "H5T_NATIVE_LONG_g",
        DatatypeClass::Integer,
        size_of::<c_long>(),
    ),
    entry(
        "H5T_NATIVE_ULONG",
        NativeType::Ulong,
        "H5T_NATIVE_ULONG_g",
        DatatypeClass::Integer,
        size_of::<c_ulong>(),
    ),
    entry(
        "H5T_NATIVE_LLONG",
        NativeType::Llong,
        "H5T_NATIVE_LLONG_g",
        DatatypeClass::Integer,
        size_of::<c_longlong>(),
    ),
    entry(
        "H5T_NATIVE_ULLONG",
        NativeType::Ullong,
        "H5T_NATIVE_ULLONG_g",
        DatatypeClass::Integer,
        size_of::<c_ulonglong>(),
    ),
    entry(
        "H5T_NATIVE_FLOAT",
        NativeType::Float,
        "H5T_NATIVE_FLOAT_g",
        DatatypeClass::Float,
        size_of::<c_float>(),
    ),
    entry(
        "H5T_NATIVE_DOUBLE",
        NativeType::Double,
        "H5T_NATIVE_DOUBLE_g",
        DatatypeClass::Float,
        size_of::<c_double>(),
    ),
];

/// Name → native type lookup with a bounded name length
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeResolver {
    marshal: MarshalContext,
}

impl TypeResolver {
    pub fn new(marshal: MarshalContext) -> Self {
        Self { marshal }
    }

    /// Resolve a symbolic type name
    ///
    /// Names that do not fit the bounded buffer fail the same way an
    /// undecodable argument does.
    pub fn resolve(&self, name: &str) -> H5tResult<NativeType> {
        if self.marshal.check_name(name).is_err() {
            return Err(H5tError::decode(ArgKind::TypeName));
        }
        lookup(name).ok_or_else(|| H5tError::UnknownType(name.to_string()))
    }
}

/// Exact table lookup without a length bound
pub fn lookup(name: &str) -> Option<NativeType> {
    TYPE_TABLE
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.native)
}
