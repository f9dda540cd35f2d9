use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates `+ - * / %`.
    ///
    /// Integer arithmetic wraps on overflow and division truncates toward
    /// zero. `+` also concatenates two strings or two lists; list
    /// concatenation produces a new list and leaves both operands untouched.
    ///
    /// # Errors
    /// - `DivisionByZero` for `/` or `%` with a zero divisor.
    /// - `TypeError` for any other combination of operands.
    ///
    /// # Example
    /// ```
    /// use rinse::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let max = Value::Integer(i64::MAX);
    /// let one = Value::Integer(1);
    /// let wrapped = Context::eval_arithmetic(BinaryOperator::Add, &max, &one, 1).unwrap();
    /// assert_eq!(wrapped, Value::Integer(i64::MIN));
    ///
    /// let div = Context::eval_arithmetic(BinaryOperator::Div,
    ///                                    &Value::Integer(-7),
    ///                                    &Value::Integer(2),
    ///                                    1).unwrap();
    /// assert_eq!(div, Value::Integer(-3));
    /// ```
    pub fn eval_arithmetic(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        use BinaryOperator::{Add, Div, Mod, Mul, Sub};

        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => {
                let (a, b) = (*a, *b);
                let result = match op {
                    Add => a.wrapping_add(b),
                    Sub => a.wrapping_sub(b),
                    Mul => a.wrapping_mul(b),
                    Div | Mod if b == 0 => return Err(RuntimeError::DivisionByZero { line }),
                    Div => a.wrapping_div(b),
                    Mod => a.wrapping_rem(b),
                    _ => return Err(Self::operand_error(op, left, right, line)),
                };
                Ok(Value::Integer(result))
            },
            (Value::Str(a), Value::Str(b)) if op == Add => Ok(Value::Str(format!("{a}{b}"))),
            (Value::List(a), Value::List(b)) if op == Add => {
                let mut joined = a.borrow().clone();
                joined.extend(b.borrow().iter().cloned());
                Ok(Value::from(joined))
            },
            _ => Err(Self::operand_error(op, left, right, line)),
        }
    }

    /// Builds the error for an operator applied to unsupported operands.
    pub(crate) fn operand_error(op: BinaryOperator,
                                left: &Value,
                                right: &Value,
                                line: usize)
                                -> RuntimeError {
        RuntimeError::TypeError { details: format!("cannot apply '{op}' to {} and {}",
                                                   left.type_name(),
                                                   right.type_name()),
                                  line }
    }
}
