//! Format-string-driven native argument parser (spec §4.5).
//!
//! The C calling convention this is translated from passes a variadic
//! output tail; there is no equivalent in safe Rust, so `parse` instead
//! returns a `Vec<ArgSlot>` in directive order (spec §9, "Variadic
//! interface" — the grammar is the invariant, its carrier is not).

use crate::context::{KwargsDict, RetentionList, VmContext};
use crate::error::CoreError;
use crate::value::{self, Value};

/// One argument-producing directive's type letter (spec §4.5). The
/// fixed-width integer letters are carried through to a concrete
/// signed/unsigned + byte width, resolving this crate's share of the Open
/// Question on range checking: out-of-range values are truncated, not
/// rejected, matching the source family's documented behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLetter {
    /// `O` — heap object pointer, or `None`.
    Object,
    /// `V` — any `Value`, unconstrained.
    AnyValue,
    /// `z` — nullable string.
    NullableStr,
    /// `s` — non-nullable string.
    Str,
    /// Fixed-width integer conversions.
    Int(IntWidth),
    /// `C` — single-codepoint string, yielded as an int.
    Codepoint,
    /// `f`/`d` — float/double.
    Float { double: bool },
    /// `p` — truthiness predicate, yielded as an int.
    Predicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    ISize,
    USize,
}

impl IntWidth {
    fn from_letter(c: char) -> Option<IntWidth> {
        Some(match c {
            'b' => IntWidth::I8,
            'h' => IntWidth::I16,
            'H' => IntWidth::U16,
            'i' => IntWidth::I32,
            'I' => IntWidth::U32,
            'l' => IntWidth::I64,
            'k' => IntWidth::U64,
            'L' => IntWidth::I64,
            'K' => IntWidth::U64,
            'n' => IntWidth::ISize,
            'N' => IntWidth::USize,
            _ => return None,
        })
    }
}

/// A single type-directive, with its modifiers (spec §4.5).
#[derive(Debug, Clone)]
struct Directive {
    letter: TypeLetter,
    name: String,
    optional: bool,
    want_present_flag: bool, // `?`
    want_instance_check: bool, // `!`
    want_length: bool, // `#` (only meaningful after z/s)
    /// True for the single directive created by `*` — identifies the
    /// rest-capture slot positionally instead of by "is it the last
    /// directive", so a keyword-only tail (`$`) can follow it.
    is_star: bool,
    /// True once `$` has been seen in the format string: this directive
    /// must never be filled from `argv`, only from kwargs (spec §4.5: `$`
    /// "forbid further positionals").
    keyword_only: bool,
}

/// A compiled format string, ready to run against a concrete call.
pub struct Format {
    method_name: String,
    skip_self: bool,
    directives: Vec<Directive>,
    allow_unknown_kwargs: bool, // `~`
    /// True unless the format string never left required mode (no `|`/`*`
    /// seen) — distinguishes the "exactly"/"at most" wording in the
    /// arity-mismatch message.
    had_optional_section: bool,
    has_star: bool,
}

/// One parsed output, in directive order. `*`-captured positionals are a
/// single `Rest` slot holding every remaining positional argument.
#[derive(Debug, Clone)]
pub enum ArgSlot {
    Object(Option<Value>),
    AnyValue(Option<Value>),
    NullableStr(Option<Option<Value>>),
    Str(Option<Value>),
    Int(Option<i64>),
    UInt(Option<u64>),
    Codepoint(Option<u32>),
    Float(Option<f64>),
    Predicate(Option<bool>),
    Rest(Vec<Value>),
}

impl ArgSlot {
    /// Per-directive "was this argument even supplied" flag, used to fill
    /// the `?` modifier's companion output and to implement "leave the
    /// output untouched" for absent optional arguments (spec invariant 9).
    fn unset_for(letter: TypeLetter) -> ArgSlot {
        match letter {
            TypeLetter::Object => ArgSlot::Object(None),
            TypeLetter::AnyValue => ArgSlot::AnyValue(None),
            TypeLetter::NullableStr => ArgSlot::NullableStr(None),
            TypeLetter::Str => ArgSlot::Str(None),
            TypeLetter::Int(w) => match w {
                IntWidth::U8 | IntWidth::U16 | IntWidth::U32 | IntWidth::U64 | IntWidth::USize => {
                    ArgSlot::UInt(None)
                }
                _ => ArgSlot::Int(None),
            },
            TypeLetter::Codepoint => ArgSlot::Codepoint(None),
            TypeLetter::Float { .. } => ArgSlot::Float(None),
            TypeLetter::Predicate => ArgSlot::Predicate(None),
        }
    }
}

/// The fully worked-out result of a `parse` call: the typed outputs, the
/// `?`-modifier presence flags (index-aligned with `values`, `None` where
/// the directive had no `?`), and presence is also reflected by the
/// `Option`-wrapping inside each `ArgSlot` for non-`?` consumers.
pub struct ParseOutcome {
    pub values: Vec<ArgSlot>,
    pub presence: Vec<Option<bool>>,
}

impl Format {
    /// Compile a format string against a parallel argument-names array
    /// (spec §4.5's grammar). `names.len()` must equal the number of
    /// type directives in `fmt`, aligned left to right.
    pub fn compile(method_name: &str, fmt: &str, names: &[&str]) -> Result<Format, CoreError> {
        let mut chars = fmt.chars().peekable();
        let mut method_name = method_name.to_string();
        let mut skip_self = false;
        let mut directives = Vec::new();
        let mut allow_unknown_kwargs = false;
        let mut optional_mode = false;
        let mut had_optional_section = false;
        let mut has_star = false;
        let mut keyword_only_mode = false;
        let mut name_idx = 0usize;

        while let Some(&c) = chars.peek() {
            match c {
                '.' => {
                    chars.next();
                    skip_self = true;
                }
                ':' => {
                    chars.next();
                    let rest: String = chars.by_ref().collect();
                    method_name = rest;
                    break;
                }
                '|' => {
                    chars.next();
                    optional_mode = true;
                    had_optional_section = true;
                }
                '$' => {
                    chars.next();
                    keyword_only_mode = true;
                }
                '~' => {
                    chars.next();
                    allow_unknown_kwargs = true;
                }
                '*' => {
                    chars.next();
                    has_star = true;
                    optional_mode = true;
                    had_optional_section = true;
                    let name = names.get(name_idx).copied().unwrap_or("args").to_string();
                    name_idx += 1;
                    directives.push(Directive {
                        letter: TypeLetter::AnyValue, // placeholder; Rest is synthesized at runtime
                        name,
                        optional: true,
                        want_present_flag: false,
                        want_instance_check: false,
                        want_length: false,
                        is_star: true,
                        keyword_only: keyword_only_mode,
                    });
                }
                _ => {
                    let letter = parse_type_letter(c).ok_or_else(|| CoreError::BadFormatDirective {
                        method: method_name.clone(),
                        directive: c,
                    })?;
                    chars.next();
                    let name = names.get(name_idx).copied().unwrap_or("").to_string();
                    name_idx += 1;

                    let mut want_present_flag = false;
                    let mut want_instance_check = false;
                    let mut want_length = false;
                    while let Some(&m) = chars.peek() {
                        match m {
                            '?' => {
                                want_present_flag = true;
                                chars.next();
                            }
                            '!' => {
                                want_instance_check = true;
                                chars.next();
                            }
                            '#' => {
                                want_length = true;
                                chars.next();
                            }
                            _ => break,
                        }
                    }
                    directives.push(Directive {
                        letter,
                        name,
                        optional: optional_mode,
                        want_present_flag,
                        want_instance_check,
                        want_length,
                        is_star: false,
                        keyword_only: keyword_only_mode,
                    });
                }
            }
        }

        Ok(Format {
            method_name,
            skip_self,
            directives,
            allow_unknown_kwargs,
            had_optional_section,
            has_star,
        })
    }

    /// `parse` (spec §4.5/§6): translate `argv` (plus, if `kwargs` is
    /// `Some`, a dict and a retention list standing in for
    /// `argv[argc]`/`argv[argc+1]`) into typed outputs.
    ///
    /// `classes` supplies one class `Value` per `!`-modified directive, in
    /// directive order, for the instance-of check.
    pub fn parse(
        &self,
        ctx: &mut dyn VmContext,
        argv: &[Value],
        mut kwargs: Option<(&mut dyn KwargsDict, &mut dyn RetentionList)>,
        classes: &[Value],
    ) -> Result<ParseOutcome, CoreError> {
        log::trace!(
            "argparse: dispatching {}() with {} positional, kwargs={}",
            self.method_name,
            argv.len(),
            kwargs.is_some()
        );
        let mut iarg = if self.skip_self { 1usize.min(argv.len()) } else { 0 };
        let argc = argv.len();
        let mut class_idx = 0usize;

        let mut values = Vec::with_capacity(self.directives.len());
        let mut presence = Vec::with_capacity(self.directives.len());

        for (oarg, dir) in self.directives.iter().enumerate() {
            if dir.is_star {
                let rest: Vec<Value> = argv[iarg..].to_vec();
                iarg = argc;
                values.push(ArgSlot::Rest(rest));
                presence.push(None);
                continue;
            }

            let arg: Value;
            if !dir.keyword_only && iarg < argc {
                arg = argv[iarg];
                iarg += 1;
            } else if let Some((dict, retention)) = kwargs.as_mut() {
                if let Some(v) = dict.take(&dir.name) {
                    retention.push(v);
                    arg = v;
                } else if dir.optional {
                    arg = Value::kwargs_empty();
                } else {
                    return Err(self.missing_required(dir));
                }
            } else if dir.optional {
                arg = Value::kwargs_empty();
            } else {
                return Err(self.missing_required(dir));
            }

            let present = !arg.is_kwargs_empty();
            if dir.want_present_flag {
                presence.push(Some(present));
            } else {
                presence.push(None);
            }

            if dir.want_instance_check && present {
                let class = classes.get(class_idx).copied();
                class_idx += 1;
                if let Some(class) = class {
                    if !ctx.is_instance(arg, class) {
                        return Err(CoreError::WrongArgumentType {
                            method: self.method_name.clone(),
                            index: oarg + 1,
                            expected: ctx.class_name(class),
                            actual: value::type_of(ctx, arg).name.to_string(),
                        });
                    }
                }
            } else if dir.want_instance_check {
                class_idx += 1;
            }

            if !present {
                values.push(ArgSlot::unset_for(dir.letter));
                continue;
            }

            values.push(self.decode(ctx, dir, oarg, arg)?);
        }

        if iarg < argc {
            return Err(if self.had_optional_section {
                CoreError::TakesAtMost {
                    method: self.method_name.clone(),
                    count: self.required_and_optional_positional_count(),
                    given: argc - (self.skip_self as usize),
                }
            } else {
                CoreError::TakesExactly {
                    method: self.method_name.clone(),
                    count: self.positional_directive_count(),
                    given: argc - (self.skip_self as usize),
                }
            });
        }

        if let Some((dict, _)) = kwargs.as_mut() {
            if !self.allow_unknown_kwargs {
                for name in dict.remaining_names() {
                    if self.directives.iter().any(|d| d.name == name) {
                        return Err(CoreError::MultipleValuesForArgument {
                            method: self.method_name.clone(),
                            name,
                        });
                    } else {
                        return Err(CoreError::UnexpectedKeywordArgument {
                            method: self.method_name.clone(),
                            name,
                        });
                    }
                }
            }
        }

        Ok(ParseOutcome { values, presence })
    }

    fn missing_required(&self, dir: &Directive) -> CoreError {
        CoreError::MissingRequiredArgument {
            method: self.method_name.clone(),
            name: dir.name.clone(),
        }
    }

    fn positional_directive_count(&self) -> usize {
        self.directives.len()
    }

    fn required_and_optional_positional_count(&self) -> usize {
        if self.has_star {
            self.directives.len() - 1
        } else {
            self.directives.len()
        }
    }

    fn decode(
        &self,
        ctx: &mut dyn VmContext,
        dir: &Directive,
        oarg: usize,
        arg: Value,
    ) -> Result<ArgSlot, CoreError> {
        let type_mismatch = |expected: &str| CoreError::WrongArgumentType {
            method: self.method_name.clone(),
            index: oarg + 1,
            expected: expected.to_string(),
            actual: value::type_of(ctx, arg).name.to_string(),
        };

        Ok(match dir.letter {
            TypeLetter::Object => match arg {
                Value::None => ArgSlot::Object(None),
                Value::Object(_) => ArgSlot::Object(Some(arg)),
                _ => return Err(type_mismatch("object")),
            },
            TypeLetter::AnyValue => ArgSlot::AnyValue(Some(arg)),
            TypeLetter::NullableStr => match arg {
                Value::None => ArgSlot::NullableStr(Some(None)),
                _ if arg.as_fax_string().is_some() => ArgSlot::NullableStr(Some(Some(arg))),
                _ => return Err(type_mismatch("str or None")),
            },
            TypeLetter::Str => {
                if arg.as_fax_string().is_some() {
                    ArgSlot::Str(Some(arg))
                } else {
                    return Err(type_mismatch("str"));
                }
            }
            TypeLetter::Int(width) => {
                let n = match arg {
                    Value::Integer(i) => i,
                    Value::Boolean(b) => b as i64,
                    _ => return Err(type_mismatch("int")),
                };
                match width {
                    IntWidth::U8 | IntWidth::U16 | IntWidth::U32 | IntWidth::U64 | IntWidth::USize => {
                        ArgSlot::UInt(Some(truncate_unsigned(n, width)))
                    }
                    _ => ArgSlot::Int(Some(truncate_signed(n, width))),
                }
            }
            TypeLetter::Codepoint => {
                let s = arg
                    .as_fax_string()
                    .and_then(|s| s.as_str())
                    .ok_or_else(|| type_mismatch("a single character string"))?;
                let mut chars = s.chars();
                let c = chars.next().ok_or_else(|| type_mismatch("a single character string"))?;
                if chars.next().is_some() {
                    return Err(type_mismatch("a single character string"));
                }
                ArgSlot::Codepoint(Some(c as u32))
            }
            TypeLetter::Float { .. } => {
                let f = match arg {
                    Value::Floating(f) => f,
                    _ => ctx.invoke_float(arg)?,
                };
                ArgSlot::Float(Some(f))
            }
            TypeLetter::Predicate => {
                let truthy = !value::is_falsy(ctx, arg)?;
                ArgSlot::Predicate(Some(truthy))
            }
        })
    }
}

fn parse_type_letter(c: char) -> Option<TypeLetter> {
    match c {
        'O' => Some(TypeLetter::Object),
        'V' => Some(TypeLetter::AnyValue),
        'z' => Some(TypeLetter::NullableStr),
        's' => Some(TypeLetter::Str),
        'C' => Some(TypeLetter::Codepoint),
        'f' => Some(TypeLetter::Float { double: false }),
        'd' => Some(TypeLetter::Float { double: true }),
        'p' => Some(TypeLetter::Predicate),
        other => IntWidth::from_letter(other).map(TypeLetter::Int),
    }
}

fn truncate_signed(n: i64, width: IntWidth) -> i64 {
    match width {
        IntWidth::I8 => n as i8 as i64,
        IntWidth::I16 => n as i16 as i64,
        IntWidth::I32 => n as i32 as i64,
        IntWidth::I64 => n,
        IntWidth::ISize => n as isize as i64,
        _ => n,
    }
}

fn truncate_unsigned(n: i64, width: IntWidth) -> u64 {
    match width {
        IntWidth::U8 => n as u8 as u64,
        IntWidth::U16 => n as u16 as u64,
        IntWidth::U32 => n as u32 as u64,
        IntWidth::U64 => n as u64,
        IntWidth::USize => n as usize as u64,
        _ => n as u64,
    }
}
