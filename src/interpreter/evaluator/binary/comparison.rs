use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// `==` and `!=` compare any two values structurally; values of different
    /// types are simply unequal. The relational operators order integers
    /// numerically and strings lexicographically.
    ///
    /// # Errors
    /// `TypeError` when a relational operator is applied to anything other
    /// than two integers or two strings.
    ///
    /// # Example
    /// ```
    /// use rinse::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let a = Value::from("apple");
    /// let b = Value::from("pear");
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Less, &a, &b, 1);
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Equal, &a, &Value::Integer(1), 1);
    /// assert_eq!(result.unwrap(), Value::Bool(false));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

        if let Equal | NotEqual = op {
            return Ok(Value::Bool((left == right) == (op == Equal)));
        }

        let ordering = match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => return Err(Self::operand_error(op, left, right, line)),
        };

        let result = match op {
            Less => ordering == Ordering::Less,
            LessEqual => ordering != Ordering::Greater,
            Greater => ordering == Ordering::Greater,
            GreaterEqual => ordering != Ordering::Less,
            _ => return Err(Self::operand_error(op, left, right, line)),
        };
        Ok(Value::Bool(result))
    }
}
