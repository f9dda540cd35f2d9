use crate::{
    ast::{DestructureTarget, Expr, Place, PlaceSegment, TypeName},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::{num::checked_index, stack::ensure_sufficient_stack},
};

/// Type names every program knows without declaring them.
pub const BUILTIN_TYPES: &[&str] = &["int", "bool", "str", "tuple", "list", "fn"];

impl Context {
    /// Runs `f` inside a new block scope.
    ///
    /// The scope is removed again whether `f` succeeds or fails, so the
    /// environment stays balanced for the rest of the run.
    pub fn scoped<T>(&mut self, f: impl FnOnce(&mut Self) -> EvalResult<T>) -> EvalResult<T> {
        self.env.push_scope();
        let result = f(self);
        self.env.pop_scope();
        result
    }

    /// Runs `f` inside a new call frame, counting it against the call depth
    /// limit.
    ///
    /// # Errors
    /// `ResourceExhausted` if the frame would exceed
    /// `Config::max_call_depth`; `f` is not run then.
    pub fn in_frame<T>(&mut self,
                       line: usize,
                       f: impl FnOnce(&mut Self) -> EvalResult<T>)
                       -> EvalResult<T> {
        if self.call_depth >= self.config.max_call_depth {
            return Err(RuntimeError::ResourceExhausted { limit: self.config.max_call_depth,
                                                         line });
        }

        self.env.push_frame();
        self.call_depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.call_depth -= 1;
        self.env.pop_frame();
        result
    }

    /// Checks a `let` or field annotation against a value.
    ///
    /// Builtin type names and declared struct or enum names are checked
    /// against the value's runtime type. Anything else, such as a generic
    /// parameter `T`, is accepted as is. Type arguments like the `int` in
    /// `list<int>` are not checked.
    ///
    /// # Errors
    /// `TypeError` when a checked annotation does not match.
    pub fn check_annotation(&self,
                            annotation: &TypeName,
                            value: &Value,
                            line: usize)
                            -> EvalResult<()> {
        let checked = BUILTIN_TYPES.contains(&annotation.name.as_str())
                      || self.registry.is_type(&annotation.name);
        if checked && value.type_name() != annotation.name {
            return Err(value.mismatch(&annotation.to_string(), line));
        }
        Ok(())
    }

    /// Binds the parts of a value according to a destructuring `let`.
    ///
    /// # Errors
    /// - `TypeError` if the value has a different shape than the target.
    /// - `DestructureMismatch` if a tuple or variant has a different number
    ///   of elements than names are given.
    ///
    /// # Example
    /// ```
    /// use rinse::{error::ErrorKind, get_output};
    ///
    /// let src = "init main { let (a, b) = (1, 2) print(a + b) }";
    /// assert_eq!(get_output(src).unwrap(), vec!["3"]);
    ///
    /// let err = get_output("init main { let (a, b) = (1, 2, 3) }").unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::Type);
    /// ```
    pub fn exec_destructure(&mut self,
                            target: &DestructureTarget,
                            value: &Value,
                            line: usize)
                            -> EvalResult<()> {
        let bound: Vec<(String, Value)> = match target {
            DestructureTarget::Tuple(names) => {
                let Value::Tuple(elements) = value else {
                    return Err(value.mismatch("tuple", line));
                };
                Self::zip_names(names, elements, line)?
            },
            DestructureTarget::Struct { type_name, fields } => {
                let Value::Struct(instance) = value else {
                    return Err(value.mismatch(type_name, line));
                };
                let instance = instance.borrow();
                if instance.type_name != *type_name {
                    return Err(value.mismatch(type_name, line));
                }
                fields.iter()
                      .map(|name| {
                          instance.get(name)
                                  .map(|v| (name.clone(), v.clone()))
                                  .ok_or_else(|| RuntimeError::TypeError { details: format!("struct '{type_name}' has no field '{name}'"),
                                                                           line })
                      })
                      .collect::<EvalResult<_>>()?
            },
            DestructureTarget::Variant { enum_name,
                                         variant,
                                         bindings, } => {
                let Value::Variant(actual) = value else {
                    return Err(value.mismatch(enum_name, line));
                };
                if actual.enum_name != *enum_name || actual.variant != *variant {
                    return Err(RuntimeError::TypeError { details: format!("expected {enum_name}::{variant}, found {}::{}",
                                                                          actual.enum_name,
                                                                          actual.variant),
                                                         line });
                }
                Self::zip_names(bindings, &actual.fields, line)?
            },
        };

        for (name, value) in bound {
            self.env.define(&name, value);
        }
        Ok(())
    }

    fn zip_names(names: &[String],
                 values: &[Value],
                 line: usize)
                 -> EvalResult<Vec<(String, Value)>> {
        if names.len() != values.len() {
            return Err(RuntimeError::DestructureMismatch { expected: names.len(),
                                                           found: values.len(),
                                                           line });
        }
        Ok(names.iter().cloned().zip(values.iter().cloned()).collect())
    }

    /// Executes `place = value`.
    ///
    /// The right-hand side is evaluated first. A plain name overwrites its
    /// nearest visible binding. A path such as `grid[i][j]` or `self.pos.x`
    /// is followed left to right to its last container, which is then
    /// mutated in place; every alias of that list or struct sees the change.
    ///
    /// # Errors
    /// - `UnknownVariable` if the root name is unbound.
    /// - `IndexOutOfBounds` for a list index outside the list.
    /// - `TypeError` when writing into a tuple, a string, a missing field, or
    ///   anything that is not a list or struct.
    ///
    /// # Example
    /// ```
    /// use rinse::get_output;
    ///
    /// let src = "init main {
    ///     let grid = [[0, 0], [0, 0]]
    ///     let alias = grid
    ///     grid[1][0] = 5
    ///     print(alias)
    /// }";
    /// assert_eq!(get_output(src).unwrap(), vec!["[[0, 0], [5, 0]]"]);
    /// ```
    pub fn exec_assign(&mut self, place: &Place, value: &Expr, line: usize) -> EvalResult<()> {
        let value = self.eval_child(value, line)?;
        let unknown = || RuntimeError::UnknownVariable { name: place.root.clone(),
                                                         line };

        let Some((last, init)) = place.path.split_last() else {
            return if self.env.assign(&place.root, value) {
                Ok(())
            } else {
                Err(unknown())
            };
        };

        let mut container = self.env.get(&place.root).cloned().ok_or_else(unknown)?;
        for segment in init {
            container = match segment {
                PlaceSegment::Field(field) => Self::read_field(&container, field, line)?,
                PlaceSegment::Index(index) => {
                    let index = self.eval_child(index, line)?.as_integer(line)?;
                    Self::read_index(&container, index, line)?
                },
            };
        }

        match (last, &container) {
            (PlaceSegment::Field(field), Value::Struct(instance)) => {
                let mut instance = instance.borrow_mut();
                let type_name = instance.type_name.clone();
                let slot = instance.get_mut(field).ok_or_else(|| {
                               RuntimeError::TypeError { details: format!("struct '{type_name}' has no field '{field}'"),
                                                         line }
                           })?;
                *slot = value;
                Ok(())
            },
            (PlaceSegment::Index(index), Value::List(list)) => {
                let index = self.eval_child(index, line)?.as_integer(line)?;
                let len = list.borrow().len();
                let position = checked_index(index, len, line)?;
                list.borrow_mut()[position] = value;
                Ok(())
            },
            (_, other) => Err(RuntimeError::TypeError { details: format!("cannot assign into a value of type {}",
                                                                         other.type_name()),
                                                        line }),
        }
    }

    /// Reads `object.field`.
    ///
    /// Structs are read by field name and tuples by position (`pair.0`).
    ///
    /// # Errors
    /// `TypeError` for a missing field or a value without fields;
    /// `IndexOutOfBounds` for a tuple position past the end.
    pub fn read_field(object: &Value, field: &str, line: usize) -> EvalResult<Value> {
        match object {
            Value::Struct(instance) => {
                let instance = instance.borrow();
                instance.get(field).cloned().ok_or_else(|| {
                                                RuntimeError::TypeError { details: format!("struct '{}' has no field '{field}'",
                                                                                           instance.type_name),
                                                                          line }
                                            })
            },
            Value::Tuple(elements) => match field.parse::<i64>() {
                Ok(position) => {
                    let position = checked_index(position, elements.len(), line)?;
                    Ok(elements[position].clone())
                },
                Err(_) => Err(object.mismatch("struct", line)),
            },
            other => Err(other.mismatch("struct", line)),
        }
    }

    /// Reads `target[index]` from a list, tuple or string.
    ///
    /// Indexing a string yields its character at that position as a
    /// one-character string.
    ///
    /// # Example
    /// ```
    /// use rinse::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let list = Value::from(vec![Value::Integer(10), Value::Integer(20)]);
    /// assert_eq!(Context::read_index(&list, 1, 1).unwrap(), Value::Integer(20));
    /// assert!(Context::read_index(&list, 2, 1).is_err());
    ///
    /// assert_eq!(Context::read_index(&Value::from("abc"), 0, 1).unwrap(), Value::from("a"));
    /// ```
    pub fn read_index(target: &Value, index: i64, line: usize) -> EvalResult<Value> {
        match target {
            Value::List(list) => {
                let list = list.borrow();
                Ok(list[checked_index(index, list.len(), line)?].clone())
            },
            Value::Tuple(elements) => Ok(elements[checked_index(index, elements.len(), line)?].clone()),
            Value::Str(s) => {
                let chars: Vec<char> = s.chars().collect();
                let position = checked_index(index, chars.len(), line)?;
                Ok(Value::Str(chars[position].to_string()))
            },
            other => Err(other.mismatch("list, tuple or str", line)),
        }
    }
}
