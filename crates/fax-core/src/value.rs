//! The tagged `Value` type (spec §3.1/§4.1).

use std::ptr::NonNull;

use crate::context::VmContext;
use crate::error::CoreError;
use crate::object::{
    self, FaxString, ObjectHeader, ObjectKind, TypeDescriptor, BOOL_TYPE, FLOAT_TYPE,
    HANDLER_TYPE, INT_TYPE, KWARGS_TYPE, NONE_TYPE, STR_TYPE,
};

/// The zero-payload `Kwargs` instance doubles as the hash table's
/// empty-slot key and the argument parser's "not supplied" marker (spec
/// §3.1, "This is a core design decision").
pub const KWARGS_EMPTY: i32 = 0;

/// A `Value` is one of the disjoint kinds in spec §3.1: unboxed
/// immediates, or a pointer to a heap object carrying the standard header.
///
/// `Object` holds a raw, non-owning pointer: lifetime and reclamation are
/// the collector's responsibility (spec §5); this crate never frees one.
#[derive(Debug, Clone, Copy)]
pub enum Value {
    None,
    Boolean(bool),
    Integer(i64),
    Floating(f64),
    /// VM-internal sentinel used by exception handling; opaque payload.
    Handler(i64),
    /// The shared sentinel (spec §3.1). `Kwargs(KWARGS_EMPTY)` is the only
    /// instance the core itself constructs; other tags are opaque to us.
    Kwargs(i32),
    Object(NonNull<ObjectHeader>),
}

impl Value {
    pub fn kwargs_empty() -> Value {
        Value::Kwargs(KWARGS_EMPTY)
    }

    pub fn is_kwargs_empty(&self) -> bool {
        matches!(self, Value::Kwargs(KWARGS_EMPTY))
    }

    pub fn object_header(&self) -> Option<&ObjectHeader> {
        match self {
            Value::Object(p) => Some(unsafe { p.as_ref() }),
            _ => None,
        }
    }

    /// Pointer identity, used by `Table::get_fast`'s fast path and by the
    /// default object-equality fallback (spec §3.1).
    pub fn same_object(a: Value, b: Value) -> bool {
        match (a, b) {
            (Value::Object(x), Value::Object(y)) => x == y,
            _ => false,
        }
    }

    /// Downcast to a string object, if this value is one and the header
    /// says so.
    pub fn as_fax_string(&self) -> Option<&FaxString> {
        match self {
            Value::Object(p) => {
                let header = unsafe { p.as_ref() };
                if header.kind == ObjectKind::Str {
                    // SAFETY: `kind == Str` is only ever set by
                    // `FaxString::new`, which lays the header out as the
                    // first field of a `FaxString`.
                    Some(unsafe { &*(p.as_ptr() as *const FaxString) })
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Bitwise equality on the payload — correct for every non-`Object`
    /// kind per spec §3.1; never compares two `Object`s (use `equals`).
    fn raw_eq_immediate(a: Value, b: Value) -> Option<bool> {
        match (a, b) {
            (Value::None, Value::None) => Some(true),
            (Value::Boolean(x), Value::Boolean(y)) => Some(x == y),
            (Value::Integer(x), Value::Integer(y)) => Some(x == y),
            (Value::Floating(x), Value::Floating(y)) => Some(x.to_bits() == y.to_bits()),
            (Value::Handler(x), Value::Handler(y)) => Some(x == y),
            (Value::Kwargs(x), Value::Kwargs(y)) => Some(x == y),
            _ => None,
        }
    }
}

/// `type_of` (spec §4.1): fixed descriptor per immediate kind, or the
/// object's class descriptor for heap values.
pub fn type_of(ctx: &dyn VmContext, v: Value) -> &'static TypeDescriptor {
    match v {
        Value::None => &NONE_TYPE,
        Value::Boolean(_) => &BOOL_TYPE,
        Value::Integer(_) => &INT_TYPE,
        Value::Floating(_) => &FLOAT_TYPE,
        Value::Handler(_) => &HANDLER_TYPE,
        Value::Kwargs(_) => &KWARGS_TYPE,
        Value::Object(_) => ctx.type_of(v),
    }
}

/// `equals` (spec §3.1/§4.1): bitwise for non-object kinds; for objects,
/// defers to the type's comparator, falling back to reference equality.
pub fn equals(ctx: &mut dyn VmContext, a: Value, b: Value) -> Result<bool, CoreError> {
    if let Some(r) = Value::raw_eq_immediate(a, b) {
        return Ok(r);
    }
    match (a, b) {
        (Value::Object(_), Value::Object(_)) => {
            if Value::same_object(a, b) {
                return Ok(true);
            }
            let td = ctx.type_of(a);
            if td.has_eq {
                ctx.invoke_eq(a, b)
            } else {
                Ok(false)
            }
        }
        _ => Ok(false),
    }
}

/// `is_falsy` (spec §4.1).
pub fn is_falsy(ctx: &mut dyn VmContext, v: Value) -> Result<bool, CoreError> {
    match v {
        Value::None => Ok(true),
        Value::Boolean(b) => Ok(!b),
        Value::Integer(i) => Ok(i == 0),
        Value::Floating(f) => Ok(f == 0.0),
        Value::Handler(_) | Value::Kwargs(_) => Ok(false),
        Value::Object(_) => {
            let td = ctx.type_of(v);
            if td.has_falsy {
                ctx.invoke_falsy(v)
            } else {
                Ok(false)
            }
        }
    }
}

/// `hash` (spec §3.1/§4.1/§4.3).
///
/// Immediates reinterpret their payload as `u32` (booleans/ints/None/
/// handler/kwargs) or truncate (floats) — preserved as-is per the Open
/// Question in spec §9: `hash(Integer(x)) != hash(Floating(x))` in
/// general, matching the source family this was distilled from rather
/// than "fixing" the oddity.
pub fn hash(ctx: &mut dyn VmContext, v: Value) -> Result<u32, CoreError> {
    match v {
        Value::None => Ok(0),
        Value::Boolean(b) => Ok(b as u32),
        Value::Integer(i) => Ok(i as u32),
        Value::Floating(f) => Ok(f as u32),
        Value::Handler(h) => Ok(h as u32),
        Value::Kwargs(k) => Ok(k as u32),
        Value::Object(p) => {
            let header = unsafe { p.as_ref() };
            let td = type_of(ctx, v);
            object::header_hash(ctx, header, v, td.name.as_str(), td.has_hash)
        }
    }
}

/// Hash of an already-known string, used by the interner and by
/// `Table::get_fast` — skips the `type_of`/dispatch path entirely since
/// strings always carry a valid cached hash (spec §3.4).
pub fn hash_of_string(s: &FaxString) -> u32 {
    debug_assert!(s.header.has_valid_hash());
    s.header.cached_hash()
}
