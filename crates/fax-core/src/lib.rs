//! fax-core — tagged value representation, hash table, heap object
//! header, and native-function argument parser for the Fax runtime.
//!
//! This crate is deliberately agnostic of the bytecode compiler, the
//! execution loop, class/method binding, I/O, and the module loader —
//! those are external collaborators, reached only through the
//! [`context::VmContext`] / [`context::KwargsDict`] / [`context::RetentionList`]
//! traits. The garbage collector is likewise external; [`gc`] is a thin
//! C-ABI wrapper around [`fax_gc`] for allocation, not part of the value
//! layer's contract.

pub mod argparse;
pub mod context;
pub mod error;
mod gc;
pub mod object;
pub mod table;
pub mod value;

pub use argparse::{ArgSlot, Format, IntWidth, ParseOutcome, TypeLetter};
pub use context::{KwargsDict, RetentionList, VmContext};
pub use error::CoreError;
pub use gc::*;
pub use object::{FaxString, HeaderFlags, ObjectHeader, ObjectKind, TypeDescriptor};
pub use table::Table;
pub use value::{equals, hash, is_falsy, type_of, Value};
