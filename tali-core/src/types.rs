//! The Tali type model, shared by every compiler stage.
//!
//! Types are immutable once built; nested payloads are shared through `Rc`
//! so that cloning a `Type` never deep-copies a tree. Equality is
//! structural: record types compare their field types positionally and
//! ignore field names, which is what makes positional record literals
//! assignable to declared record types.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    I32,
    I64,
    U64,
    Bool,
    Char,
    Void,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: Rc<Type>,
}

#[derive(Debug, Clone)]
pub enum Type {
    Builtin(Builtin),
    Pointer(Rc<Type>),
    Array { element: Rc<Type>, size: u64 },
    Record(Vec<Field>),
}

impl Type {
    pub fn pointer_to(pointee: Type) -> Type {
        Type::Pointer(Rc::new(pointee))
    }

    pub fn array_of(element: Type, size: u64) -> Type {
        Type::Array {
            element: Rc::new(element),
            size,
        }
    }

    pub fn is_builtin(&self, kind: Builtin) -> bool {
        matches!(self, Type::Builtin(b) if *b == kind)
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Type::Builtin(Builtin::I32 | Builtin::I64))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Builtin(Builtin::I32 | Builtin::I64 | Builtin::U64))
    }

    /// Integers, char, and any pointer order; bool and void do not.
    pub fn is_comparable(&self) -> bool {
        match self {
            Type::Builtin(Builtin::I32 | Builtin::I64 | Builtin::U64 | Builtin::Char) => true,
            Type::Pointer(_) => true,
            _ => false,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Type::Record(_))
    }

    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<&Type> {
        match self {
            Type::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Type::Record(fields) => Some(fields),
            _ => None,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Builtin(a), Type::Builtin(b)) => a == b,
            (Type::Pointer(a), Type::Pointer(b)) => **a == **b,
            (
                Type::Array {
                    element: ea,
                    size: sa,
                },
                Type::Array {
                    element: eb,
                    size: sb,
                },
            ) => sa == sb && **ea == **eb,
            (Type::Record(fa), Type::Record(fb)) => {
                // Positional over field types; names are not part of the
                // structural identity of a record.
                fa.len() == fb.len() && fa.iter().zip(fb).all(|(a, b)| *a.ty == *b.ty)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Builtin(b) => {
                let name = match b {
                    Builtin::I32 => "i32",
                    Builtin::I64 => "i64",
                    Builtin::U64 => "u64",
                    Builtin::Bool => "bool",
                    Builtin::Char => "char",
                    Builtin::Void => "void",
                };
                f.write_str(name)
            }
            // Suffixes append left-to-right, so the rendering of any
            // builtin/pointer/array combination parses back to the same
            // type through the type grammar.
            Type::Pointer(inner) => write!(f, "{inner}*"),
            Type::Array { element, size } => write!(f, "{element}[{size}]"),
            Type::Record(fields) => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", field.ty)?;
                }
                f.write_str("}")
            }
        }
    }
}
