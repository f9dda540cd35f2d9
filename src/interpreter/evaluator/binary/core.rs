use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary expression from its operand expressions.
    ///
    /// `and` and `or` are handed their operands unevaluated so they can
    /// short-circuit. Every other operator evaluates the left operand, then
    /// the right one, then calls [`Context::eval_binary`].
    pub fn eval_binary_op(&mut self,
                          left: &Expr,
                          op: BinaryOperator,
                          right: &Expr,
                          line: usize)
                          -> EvalResult<Value> {
        if matches!(op, BinaryOperator::And | BinaryOperator::Or) {
            return self.eval_logic(op, left, right, line);
        }

        let left = self.eval_child(left, line)?;
        let right = self.eval_child(right, line)?;
        Self::eval_binary(op, &left, &right, line)
    }

    /// Evaluates a binary operation between two values.
    ///
    /// Arithmetic operators go to [`Context::eval_arithmetic`], equality and
    /// relational operators to [`Context::eval_comparison`].
    ///
    /// # Parameters
    /// - `op`: The operator. Must not be `and` or `or`.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Example
    /// ```
    /// use rinse::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let left = Value::Integer(3);
    /// let right = Value::Integer(4);
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add, &left, &right, 1);
    /// assert_eq!(result.unwrap(), Value::Integer(7));
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Sub,
        };

        match op {
            Add | Sub | Mul | Div | Mod => Self::eval_arithmetic(op, left, right, line),
            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
                Self::eval_comparison(op, left, right, line)
            },
            And | Or => Ok(Value::Bool(match op {
                                           And => left.as_bool(line)? && right.as_bool(line)?,
                                           _ => left.as_bool(line)? || right.as_bool(line)?,
                                       })),
        }
    }
}
