//! Call/result adapter
//!
//! Every exposed operation runs the same template:
//!
//! 1. arity check
//! 2. decode the argument to its primitive shape
//! 3. resolve the type name (copy only)
//! 4. invoke the native call
//! 5. check the call's sentinel
//! 6. encode `{ok, Value}` / `ok`
//!
//! Steps 1-3 fail without touching the native library.

use crate::api::conversion::ToTerm;
use crate::ffi::marshal::MarshalContext;
use crate::ffi::types::{hid_t, ArgKind, H5T_class_t, H5T_order_t, NativeArg};
use crate::ffi::LoadError;
use crate::h5t::handle::{self, TypeHandle};
use crate::h5t::library::{open_backend, DatatypeLibrary};
use crate::h5t::resolver::{self, NativeType, TypeResolver};
use crate::h5t::sentinel::{self, NativeCall};
use crate::h5t::{H5tError, H5tResult};
use crate::value::Term;
use h5nif_config::Config;
use std::fmt;
use std::sync::Arc;

/// An exposed datatype operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Copy,
    Close,
    GetClass,
    GetOrder,
    GetSize,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Copy,
        Operation::Close,
        Operation::GetClass,
        Operation::GetOrder,
        Operation::GetSize,
    ];

    /// Short name
    pub fn name(self) -> &'static str {
        match self {
            Operation::Copy => "copy",
            Operation::Close => "close",
            Operation::GetClass => "get_class",
            Operation::GetOrder => "get_order",
            Operation::GetSize => "get_size",
        }
    }

    /// Name registered with the host
    pub fn host_name(self) -> &'static str {
        match self {
            Operation::Copy => "h5tcopy",
            Operation::Close => "h5tclose",
            Operation::GetClass => "h5tget_class",
            Operation::GetOrder => "h5tget_order",
            Operation::GetSize => "h5tget_size",
        }
    }

    pub fn arity(self) -> usize {
        1
    }

    /// Shape of the single argument
    pub fn arg_kind(self) -> ArgKind {
        match self {
            Operation::Copy => ArgKind::TypeName,
            _ => ArgKind::Handle,
        }
    }

    /// Message reported when the native call fails
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Copy => "Can not copy type",
            Operation::Close => "Can not close type",
            Operation::GetClass => "Can not get type class",
            Operation::GetOrder => "Can not get order",
            Operation::GetSize => "Can not get size",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Datatype operations bound to one backend
#[derive(Clone)]
pub struct Datatypes {
    library: Arc<dyn DatatypeLibrary>,
    marshal: MarshalContext,
}

impl Datatypes {
    pub fn new(library: Arc<dyn DatatypeLibrary>) -> Self {
        Self {
            library,
            marshal: MarshalContext::new(),
        }
    }

    /// Override the type name bound
    pub fn with_max_type_name_len(mut self, max: usize) -> Self {
        self.marshal = MarshalContext::with_max_name_len(max);
        self
    }

    /// Open the configured backend
    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        Ok(Self::new(open_backend(config)?).with_max_type_name_len(config.max_type_name_len()))
    }

    /// The backend in use
    pub fn library(&self) -> &dyn DatatypeLibrary {
        self.library.as_ref()
    }

    pub fn resolver(&self) -> TypeResolver {
        TypeResolver::new(self.marshal)
    }

    pub fn resolve(&self, name: &str) -> H5tResult<NativeType> {
        self.resolver().resolve(name)
    }

    /// Resolve `name` and copy it
    pub fn copy(&self, name: &str) -> H5tResult<TypeHandle> {
        self.copy_native(self.resolve(name)?)
    }

    pub fn copy_native(&self, native: NativeType) -> H5tResult<TypeHandle> {
        handle::acquire_copy(self.library(), native)
    }

    pub fn close(&self, handle: TypeHandle) -> H5tResult<()> {
        handle::release(self.library(), handle)
    }

    /// Raw class enumerator of an open datatype
    pub fn get_class(&self, handle: &TypeHandle) -> H5tResult<H5T_class_t> {
        let raw = self.library.get_class(handle.id());
        sentinel::check(Operation::GetClass, NativeCall::GetClass, raw as i128)?;
        Ok(raw)
    }

    /// Raw byte order enumerator of an open datatype
    pub fn get_order(&self, handle: &TypeHandle) -> H5tResult<H5T_order_t> {
        let raw = self.library.get_order(handle.id());
        sentinel::check(Operation::GetOrder, NativeCall::GetOrder, raw as i128)?;
        Ok(raw)
    }

    /// Size in bytes of an open datatype
    pub fn get_size(&self, handle: &TypeHandle) -> H5tResult<usize> {
        let raw = self.library.get_size(handle.id());
        sentinel::check(Operation::GetSize, NativeCall::GetSize, raw as i128)?;
        Ok(raw)
    }

    /// Run `op` on host arguments
    pub fn execute(&self, op: Operation, args: &[Term]) -> H5tResult<Term> {
        if args.len() != op.arity() {
            return Err(H5tError::Arity {
                expected: op.arity(),
                got: args.len(),
            });
        }

        let kind = op.arg_kind();
        let arg = self.marshal.term_to_native(&args[0], kind).map_err(|e| {
            log::debug!("{}: {}", op, e);
            H5tError::decode(kind)
        })?;

        match (op, arg) {
            (Operation::Copy, NativeArg::TypeName(name)) => {
                // Length already bounded by the marshal step
                let native =
                    resolver::lookup(&name).ok_or_else(|| H5tError::UnknownType(name.clone()))?;
                let handle = self.copy_native(native)?;
                Ok(Term::ok_tuple(self.marshal.native_to_term(handle.into_raw())))
            }
            (Operation::Close, NativeArg::Handle(id)) => {
                self.close(TypeHandle::from_raw(id))?;
                Ok(().to_term())
            }
            (Operation::GetClass, NativeArg::Handle(id)) => {
                let class = self.get_class(&TypeHandle::from_raw(id))?;
                Ok(Term::ok_tuple(self.marshal.native_to_term(class as i64)))
            }
            (Operation::GetOrder, NativeArg::Handle(id)) => {
                let order = self.get_order(&TypeHandle::from_raw(id))?;
                Ok(Term::ok_tuple(self.marshal.native_to_term(order as i64)))
            }
            (Operation::GetSize, NativeArg::Handle(id)) => {
                let size = self.get_size(&TypeHandle::from_raw(id))?;
                let term = self.marshal.unsigned_to_term(size).map_err(|_| H5tError::Native {
                    op,
                    call: NativeCall::GetSize,
                    raw: size as i128,
                })?;
                Ok(Term::ok_tuple(term))
            }
            _ => Err(H5tError::decode(kind)),
        }
    }

    /// Run `op` and encode the outcome as a host term
    pub fn invoke(&self, op: Operation, args: &[Term]) -> Term {
        match self.execute(op, args) {
            Ok(term) => term,
            Err(e) => Term::error_tuple(e.to_string()),
        }
    }
}

impl fmt::Debug for Datatypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datatypes")
            .field("library", &self.library.describe())
            .field("max_type_name_len", &self.marshal.max_name_len())
            .finish()
    }
}

/// Identifier encoded in a successful copy result
pub fn handle_of(term: &Term) -> Option<hid_t> {
    match term.ok_value() {
        Some(Term::Int(id)) => Some(*id),
        _ => None,
    }
}
