//! Collaborator traits (spec §1/§5/§9).
//!
//! The core assumes a VM thread supplies a current-thread exception slot,
//! a type-lookup function, a string-copy/intern function, and a
//! method-bind+call function. Rust has no ambient VM singleton to reach
//! for those, so they are modeled as traits the embedding VM implements —
//! this is the "builder-style binding helper" the spec's Open Questions
//! anticipate in place of a variadic C carrier.

use crate::error::CoreError;
use crate::object::TypeDescriptor;
use crate::value::Value;

/// Everything the value/hash layer needs from "the VM".
pub trait VmContext {
    /// Type descriptor for a value — fixed per-kind for immediates, the
    /// class's descriptor for objects.
    fn type_of(&self, v: Value) -> &'static TypeDescriptor;

    /// Dispatch the type's hash method. Only called when
    /// `type_of(v).has_hash` is true. Must return the integer the method
    /// produced; the caller truncates to `u32`.
    fn invoke_hash(&mut self, v: Value) -> Result<u32, CoreError>;

    /// Dispatch the type's equality method. Only called when
    /// `type_of(a).has_eq` is true and `a`/`b` are not the same pointer.
    fn invoke_eq(&mut self, a: Value, b: Value) -> Result<bool, CoreError>;

    /// Dispatch the type's truthiness method. Only called when
    /// `type_of(v).has_falsy` is true.
    fn invoke_falsy(&mut self, v: Value) -> Result<bool, CoreError>;

    /// Dispatch the type's float-conversion method (used by the `f`/`d`
    /// argparser directives on non-float arguments).
    fn invoke_float(&mut self, v: Value) -> Result<f64, CoreError>;

    /// `isinstance`-style check used by the `!` argparser modifier.
    fn is_instance(&self, v: Value, class: Value) -> bool;

    /// Name of `class`, for the `!` modifier's error message.
    fn class_name(&self, class: Value) -> String;

    /// Copy-and-intern a byte string, returning a `Value::Object` wrapping
    /// a `FaxString` with `VALID_HASH` already set. Used when the core
    /// needs to materialize a string it didn't already hold (not required
    /// by any operation in the current scope, but part of the assumed
    /// collaborator surface per spec §1).
    fn intern_copy(&mut self, bytes: &[u8]) -> Value;

    /// Set the current thread's exception slot. Entry points that fail
    /// call this before returning their failure indicator (spec §7).
    fn raise(&mut self, err: CoreError);
}

/// Stand-in for the kwargs dict passed to the argument parser
/// (`argv[argc]` in the C calling convention, spec §4.5). Extraction
/// removes the entry, matching "delete it from the dict".
pub trait KwargsDict {
    fn take(&mut self, name: &str) -> Option<Value>;

    /// Names still present after the directive loop, for the
    /// unexpected/duplicate-keyword checks in the post-loop pass.
    fn remaining_names(&self) -> Vec<String>;

    fn is_empty(&self) -> bool {
        self.remaining_names().is_empty()
    }
}

/// Stand-in for `argv[argc+1]`, the reference-retention list: every value
/// pulled out of kwargs is pushed here so the collector cannot reclaim it
/// mid-call (spec §4.5, §5, §9).
pub trait RetentionList {
    fn push(&mut self, v: Value);
}

impl RetentionList for Vec<Value> {
    fn push(&mut self, v: Value) {
        Vec::push(self, v);
    }
}
