//! Heap object header (spec §3.2/§4.2).
//!
//! Every heap object begins with a fixed-layout header: a kind tag, a
//! flags byte (currently only `VALID_HASH`), a cached `u32` hash, and a
//! slot reserved for the collector. The collector's bits are opaque to
//! this crate — we never branch on them — they exist purely so the header
//! size is stable for whichever `fax-gc` allocation backs the object.

use std::cell::Cell;
use std::ptr::NonNull;

use fax_util::symbol::{self, Symbol};

use crate::context::VmContext;
use crate::error::CoreError;
use crate::value::Value;

bitflags::bitflags! {
    /// Header flag bits. Only one is defined at the core level.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HeaderFlags: u8 {
        /// `hash` is authoritative and may be used without recomputing it.
        const VALID_HASH = 1 << 0;
    }
}

/// Per-object kind tag (spec §3.2). Only `Str` has a concrete
/// representation in this crate — every other kind is an opaque heap
/// object whose behavior is supplied by the embedding VM through
/// `TypeDescriptor`; the core never looks inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ObjectKind {
    Str,
    Bytes,
    Tuple,
    List,
    Dict,
    Instance,
    Class,
    Closure,
    Function,
    NativeFunction,
    Module,
    Generator,
}

/// Standard header every heap object carries (spec §3.2).
#[repr(C)]
pub struct ObjectHeader {
    pub kind: ObjectKind,
    flags: Cell<HeaderFlags>,
    hash: Cell<u32>,
    /// Mark color / next-in-heap link. Never read or written by the core;
    /// reserved so the collector has somewhere to put its bookkeeping
    /// without relayouting objects that embed this header.
    gc_private: Cell<u64>,
}

impl ObjectHeader {
    pub fn new(kind: ObjectKind) -> Self {
        ObjectHeader {
            kind,
            flags: Cell::new(HeaderFlags::empty()),
            hash: Cell::new(0),
            gc_private: Cell::new(0),
        }
    }

    pub fn has_valid_hash(&self) -> bool {
        self.flags.get().contains(HeaderFlags::VALID_HASH)
    }

    /// `mark_hash` (spec §4.2): set `hash` and the `VALID_HASH` flag.
    /// Intended for constructors of inherently hashable objects (strings,
    /// frozen tuples) so they never need a dispatch through the type's
    /// hash method.
    pub fn mark_hash(&self, h: u32) {
        self.hash.set(h);
        let mut f = self.flags.get();
        f.insert(HeaderFlags::VALID_HASH);
        self.flags.set(f);
    }

    /// The cached hash, valid only when `has_valid_hash()` is true.
    pub fn cached_hash(&self) -> u32 {
        self.hash.get()
    }
}

/// `header_hash` (spec §4.2): return the cached hash if valid, otherwise
/// dispatch to the type's hash method (through `ctx`), cache the result,
/// and set `VALID_HASH`.
///
/// `kind_name` and `has_hash_method` come from the object's
/// `TypeDescriptor` — the core only calls into `ctx` when the type
/// actually declares a hash method; an object with none fails immediately
/// without ever reaching the VM.
pub fn header_hash(
    ctx: &mut dyn VmContext,
    header: &ObjectHeader,
    owner: Value,
    kind_name: &str,
    has_hash_method: bool,
) -> Result<u32, CoreError> {
    if header.has_valid_hash() {
        return Ok(header.cached_hash());
    }
    if !has_hash_method {
        return Err(CoreError::Unhashable {
            type_name: kind_name.to_string(),
        });
    }
    let h = ctx.invoke_hash(owner)?;
    header.mark_hash(h);
    Ok(h)
}

/// The only concrete heap object this crate implements (spec §3.4):
/// everything else (lists, dicts, instances, classes, closures...) is an
/// external collaborator's concern, reached only through `Value::Object`
/// plus a `TypeDescriptor`.
pub struct FaxString {
    pub header: ObjectHeader,
    bytes: Box<[u8]>,
    codepoint_len: usize,
}

impl FaxString {
    /// Interned strings always have `VALID_HASH` set at construction
    /// (spec §3.4): the hash is computed once, here, and never recomputed.
    pub fn new(bytes: impl Into<Box<[u8]>>, hash: u32) -> NonNull<FaxString> {
        let bytes = bytes.into();
        let codepoint_len = std::str::from_utf8(&bytes)
            .map(|s| s.chars().count())
            .unwrap_or(bytes.len());
        let header = ObjectHeader::new(ObjectKind::Str);
        header.mark_hash(hash);
        let boxed = Box::new(FaxString {
            header,
            bytes,
            codepoint_len,
        });
        // SAFETY: `Box::into_raw` never returns null.
        unsafe { NonNull::new_unchecked(Box::into_raw(boxed)) }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn codepoint_len(&self) -> usize {
        self.codepoint_len
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// A type descriptor is a record of capability function pointers, not an
/// inheritance hierarchy (spec §9, "Polymorphism on types"). Immediate
/// kinds get a fixed `'static` descriptor; heap objects carry one supplied
/// by the embedding VM's class system.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    /// Interned via `fax_util::Symbol` — type names are exactly the
    /// "stable, O(1)-comparable names" the interner exists for. The
    /// well-known ones below use pre-reserved indices
    /// (`fax_util::symbol::TY_*`/`VAL_*`) so building a descriptor never
    /// touches the interner at runtime.
    pub name: Symbol,
    pub has_hash: bool,
    pub has_eq: bool,
    pub has_falsy: bool,
    pub has_float: bool,
}

impl TypeDescriptor {
    pub const fn immediate(name: Symbol) -> Self {
        TypeDescriptor {
            name,
            has_hash: false,
            has_eq: false,
            has_falsy: false,
            has_float: false,
        }
    }
}

pub static NONE_TYPE: TypeDescriptor = TypeDescriptor::immediate(symbol::VAL_NONE);
pub static BOOL_TYPE: TypeDescriptor = TypeDescriptor::immediate(symbol::TY_BOOL);
pub static INT_TYPE: TypeDescriptor = TypeDescriptor::immediate(symbol::TY_INT);
pub static FLOAT_TYPE: TypeDescriptor = TypeDescriptor::immediate(symbol::TY_FLOAT);
pub static HANDLER_TYPE: TypeDescriptor = TypeDescriptor::immediate(symbol::VAL_HANDLER);
pub static KWARGS_TYPE: TypeDescriptor = TypeDescriptor::immediate(symbol::VAL_KWARGS);
pub static STR_TYPE: TypeDescriptor = TypeDescriptor {
    name: symbol::TY_STR,
    has_hash: true,
    has_eq: true,
    has_falsy: true,
    has_float: false,
};
