use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::usize_to_i64_checked,
};

/// Signature shared by every builtin method: receiver, arguments, line.
pub type BuiltinMethod = fn(&Value, &[Value], usize) -> EvalResult<Option<Value>>;

/// Generates [`lookup_builtin`] from a table of
/// `(type name, method name, arity) => function` rows.
macro_rules! builtin_methods {
    ($(($type_name:literal, $method:literal, $arity:literal) => $func:ident),* $(,)?) => {
        /// Finds the builtin method for a receiver type, method name and
        /// argument count.
        ///
        /// # Example
        /// ```
        /// use rinse::interpreter::{evaluator::function::builtin::lookup_builtin, value::core::Value};
        ///
        /// let len = lookup_builtin("str", "len", 0).unwrap();
        /// assert_eq!(len(&Value::from("héllo"), &[], 1).unwrap(), Some(Value::Integer(5)));
        ///
        /// assert!(lookup_builtin("str", "len", 1).is_none());
        /// ```
        #[must_use]
        pub fn lookup_builtin(type_name: &str, method: &str, arity: usize) -> Option<BuiltinMethod> {
            match (type_name, method, arity) {
                $(($type_name, $method, $arity) => Some($func as BuiltinMethod),)*
                _ => None,
            }
        }
    };
}

builtin_methods! {
    ("list", "len", 0) => list_len,
    ("list", "push", 1) => list_push,
    ("list", "pop", 0) => list_pop,
    ("list", "contains", 1) => list_contains,
    ("str", "len", 0) => str_len,
    ("tuple", "len", 0) => tuple_len,
}

fn list_len(receiver: &Value, _: &[Value], line: usize) -> EvalResult<Option<Value>> {
    let Value::List(list) = receiver else {
        return Err(receiver.mismatch("list", line));
    };
    let len = usize_to_i64_checked(list.borrow().len(), line)?;
    Ok(Some(Value::Integer(len)))
}

/// Appends in place; every alias of the list sees the new element.
fn list_push(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Option<Value>> {
    let Value::List(list) = receiver else {
        return Err(receiver.mismatch("list", line));
    };
    list.borrow_mut().extend(args.iter().cloned());
    Ok(None)
}

fn list_pop(receiver: &Value, _: &[Value], line: usize) -> EvalResult<Option<Value>> {
    let Value::List(list) = receiver else {
        return Err(receiver.mismatch("list", line));
    };
    let popped = list.borrow_mut().pop();
    popped.map(Some)
          .ok_or_else(|| RuntimeError::TypeError { details: "pop from an empty list".to_string(),
                                                   line })
}

fn list_contains(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Option<Value>> {
    let Value::List(list) = receiver else {
        return Err(receiver.mismatch("list", line));
    };
    let found = args.first()
                    .is_some_and(|needle| list.borrow().iter().any(|item| item == needle));
    Ok(Some(Value::Bool(found)))
}

fn str_len(receiver: &Value, _: &[Value], line: usize) -> EvalResult<Option<Value>> {
    let Value::Str(s) = receiver else {
        return Err(receiver.mismatch("str", line));
    };
    Ok(Some(Value::Integer(usize_to_i64_checked(s.chars().count(), line)?)))
}

fn tuple_len(receiver: &Value, _: &[Value], line: usize) -> EvalResult<Option<Value>> {
    let Value::Tuple(tuple) = receiver else {
        return Err(receiver.mismatch("tuple", line));
    };
    Ok(Some(Value::Integer(usize_to_i64_checked(tuple.len(), line)?)))
}
