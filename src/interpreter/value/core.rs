use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{
    ast::{DoBlock, FunctionDef, LiteralValue},
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
};

/// Represents a runtime value in the interpreter.
///
/// Tuples and variants are immutable and shared freely. Lists and struct
/// instances are shared by reference: copying one into another variable or
/// passing it to a function aliases the same storage, so mutation through
/// any alias is visible through all of them.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer. Arithmetic wraps on overflow.
    Integer(i64),
    /// A boolean value (`true` or `false`).
    /// Produced by comparison operators (`<`, `==`, `!=`, etc.) or logical
    /// operations (`not`). Used as conditions in `if`, `while` and `proof`.
    Bool(bool),
    /// An immutable string.
    Str(String),
    /// A fixed-length, immutable sequence.
    Tuple(Rc<Vec<Self>>),
    /// A growable, mutable sequence with shared ownership.
    List(Rc<RefCell<Vec<Self>>>),
    /// An instance of a declared struct, mutable with shared ownership.
    Struct(Rc<RefCell<StructValue>>),
    /// A constructed enum variant.
    Variant(Rc<VariantValue>),
    /// A callable value.
    Function(Rc<FunctionValue>),
}

/// The fields of a struct instance, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    /// Name of the struct type.
    pub type_name: String,
    /// Field names and their current values.
    pub fields:    Vec<(String, Value)>,
}

impl StructValue {
    /// Returns the value of a field, if it exists.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(name, value)| (name == field).then_some(value))
    }

    /// Returns a mutable reference to a field, if it exists.
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find_map(|(name, value)| (name == field).then_some(value))
    }
}

/// A constructed enum variant with its positional fields.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantValue {
    /// The enum the variant belongs to.
    pub enum_name: String,
    /// The variant's name.
    pub variant:   String,
    /// Field values in declaration order.
    pub fields:    Vec<Value>,
}

/// What a function value calls.
#[derive(Debug)]
pub enum FunctionValue {
    /// A declared function or method.
    Named(Rc<FunctionDef>),
    /// The rest of a monadic block, passed to a `bind` method.
    Continuation(Continuation),
}

/// The remaining clauses of a monadic block after the clause at `index`.
///
/// Calling it with one argument binds that argument to the clause's name and
/// evaluates the block from the next clause on.
#[derive(Debug)]
pub struct Continuation {
    /// The block being evaluated.
    pub block:    Rc<DoBlock>,
    /// Index of the clause whose value the argument stands for.
    pub index:    usize,
    /// Local bindings visible where the block was evaluated, copied when the
    /// continuation was created.
    pub captured: HashMap<String, Value>,
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(Rc::new(RefCell::new(v)))
    }
}

impl From<&LiteralValue> for Value {
    fn from(lit: &LiteralValue) -> Self {
        match lit {
            LiteralValue::Integer(i) => (*i).into(),
            LiteralValue::Bool(b) => (*b).into(),
            LiteralValue::Str(s) => s.as_str().into(),
        }
    }
}

impl Value {
    /// Builds a tuple value.
    #[must_use]
    pub fn tuple(elements: Vec<Self>) -> Self {
        Self::Tuple(Rc::new(elements))
    }

    /// Wraps a declared function as a callable value.
    #[must_use]
    pub fn function(def: &Rc<FunctionDef>) -> Self {
        Self::Function(Rc::new(FunctionValue::Named(Rc::clone(def))))
    }

    /// Returns the runtime type name used for method dispatch and error
    /// messages: `int`, `bool`, `str`, `tuple`, `list`, `fn`, or the declared
    /// name of a struct or enum.
    ///
    /// # Example
    /// ```
    /// use rinse::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(3).type_name(), "int");
    /// assert_eq!(Value::from(vec![Value::Bool(true)]).type_name(), "list");
    /// ```
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Integer(_) => "int".to_string(),
            Self::Bool(_) => "bool".to_string(),
            Self::Str(_) => "str".to_string(),
            Self::Tuple(_) => "tuple".to_string(),
            Self::List(_) => "list".to_string(),
            Self::Struct(s) => s.borrow().type_name.clone(),
            Self::Variant(v) => v.enum_name.clone(),
            Self::Function(_) => "fn".to_string(),
        }
    }

    /// Converts the value to `i64`, or returns an error if not an integer.
    ///
    /// # Parameters
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Returns
    /// - `Ok(i64)`: The integer value.
    /// - `Err(RuntimeError::TypeError)`: If not an integer.
    pub fn as_integer(&self, line: usize) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            other => Err(other.mismatch("int", line)),
        }
    }

    /// Converts the value to `bool`, or returns an error if not boolean.
    ///
    /// Used for conditions in `if`, `while` and `proof` and for logical
    /// operations.
    ///
    /// # Parameters
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Returns
    /// - `Ok(bool)`: The boolean value.
    /// - `Err(RuntimeError::TypeError)`: If not boolean.
    pub fn as_bool(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(other.mismatch("bool", line)),
        }
    }

    /// Builds the error for a value that was expected to be `expected`.
    #[must_use]
    pub fn mismatch(&self, expected: &str, line: usize) -> RuntimeError {
        RuntimeError::TypeError { details: format!("expected {expected}, found {}",
                                                   self.type_name()),
                                  line }
    }

    /// Writes the value. `nested` quotes strings, as inside a container.
    ///
    /// `open` holds the lists and structs currently being written; meeting
    /// one of them again writes a `...` placeholder instead of recursing.
    fn write_to(&self,
                f: &mut fmt::Formatter<'_>,
                open: &mut Vec<*const ()>,
                nested: bool)
                -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) if nested => write!(f, "{s:?}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Tuple(t) if t.len() == 1 => write_sequence(f, open, "(", t, ",)"),
            Self::Tuple(t) => write_sequence(f, open, "(", t, ")"),
            Self::List(l) => {
                let id = Rc::as_ptr(l).cast::<()>();
                if open.contains(&id) {
                    return write!(f, "[...]");
                }
                open.push(id);
                let result = write_sequence(f, open, "[", &l.borrow(), "]");
                open.pop();
                result
            },
            Self::Struct(s) => {
                let id = Rc::as_ptr(s).cast::<()>();
                let s = s.borrow();
                if open.contains(&id) {
                    return write!(f, "{} {{ ... }}", s.type_name);
                }
                open.push(id);
                let result = write_struct(f, open, &s);
                open.pop();
                result
            },
            Self::Variant(v) if v.fields.is_empty() => write!(f, "{}::{}", v.enum_name, v.variant),
            Self::Variant(v) => {
                let owner = format!("{}::{}(", v.enum_name, v.variant);
                write_sequence(f, open, &owner, &v.fields, ")")
            },
            Self::Function(function) => match function.as_ref() {
                FunctionValue::Named(def) => write!(f, "<fn {}>", def.name),
                FunctionValue::Continuation(_) => write!(f, "<fn continuation>"),
            },
        }
    }

    /// Structural equality that terminates on cyclic values.
    ///
    /// `assumed` holds the pairs of lists or structs already under
    /// comparison; meeting such a pair again is taken as equal, so two
    /// cycles of the same shape compare equal.
    fn equals(&self, other: &Self, assumed: &mut Vec<(*const (), *const ())>) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => all_equal(a, b, assumed),
            (Self::List(a), Self::List(b)) => {
                let pair = (Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>());
                if Rc::ptr_eq(a, b) || assumed.contains(&pair) {
                    return true;
                }
                assumed.push(pair);
                let result = all_equal(&a.borrow(), &b.borrow(), assumed);
                assumed.pop();
                result
            },
            (Self::Struct(a), Self::Struct(b)) => {
                let pair = (Rc::as_ptr(a).cast::<()>(), Rc::as_ptr(b).cast::<()>());
                if Rc::ptr_eq(a, b) || assumed.contains(&pair) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                if a.type_name != b.type_name || a.fields.len() != b.fields.len() {
                    return false;
                }
                assumed.push(pair);
                let result = a.fields
                              .iter()
                              .zip(&b.fields)
                              .all(|((x_name, x), (y_name, y))| {
                                  x_name == y_name && x.equals(y, assumed)
                              });
                assumed.pop();
                result
            },
            (Self::Variant(a), Self::Variant(b)) => {
                a.enum_name == b.enum_name
                && a.variant == b.variant
                && all_equal(&a.fields, &b.fields, assumed)
            },
            (Self::Function(a), Self::Function(b)) => match (a.as_ref(), b.as_ref()) {
                (FunctionValue::Named(x), FunctionValue::Named(y)) => Rc::ptr_eq(x, y),
                _ => Rc::ptr_eq(a, b),
            },
            _ => false,
        }
    }
}

fn all_equal(a: &[Value], b: &[Value], assumed: &mut Vec<(*const (), *const ())>) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y, assumed))
}

/// Writes `open item, item, .. close` with nested formatting for the items.
fn write_sequence(f: &mut fmt::Formatter<'_>,
                  open: &mut Vec<*const ()>,
                  start: &str,
                  items: &[Value],
                  close: &str)
                  -> fmt::Result {
    write!(f, "{start}")?;
    for (index, value) in items.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        value.write_to(f, open, true)?;
    }
    write!(f, "{close}")
}

fn write_struct(f: &mut fmt::Formatter<'_>,
                open: &mut Vec<*const ()>,
                s: &StructValue)
                -> fmt::Result {
    write!(f, "{} {{ ", s.type_name)?;
    for (index, (name, value)) in s.fields.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{name}: ")?;
        value.write_to(f, open, true)?;
    }
    write!(f, " }}")
}

impl fmt::Display for Value {
    /// Lists and structs that contain themselves print `[...]` or
    /// `Name { ... }` where the cycle closes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, &mut Vec::new(), false)
    }
}

impl PartialEq for Value {
    /// Structural equality; functions are equal only to themselves.
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut Vec::new())
    }
}
