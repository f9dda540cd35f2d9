use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates `and` / `or` with short-circuiting.
    ///
    /// The right operand is only evaluated when the left one does not already
    /// decide the result. Both operands must be booleans.
    ///
    /// # Example
    /// ```
    /// use rinse::get_output;
    ///
    /// // The right-hand side would divide by zero if it were evaluated.
    /// let output = get_output("init main { print(false and 1 / 0 == 0) }").unwrap();
    /// assert_eq!(output, vec!["false".to_string()]);
    /// ```
    pub fn eval_logic(&mut self,
                      op: BinaryOperator,
                      left: &Expr,
                      right: &Expr,
                      line: usize)
                      -> EvalResult<Value> {
        let left = self.eval_child(left, line)?.as_bool(line)?;
        let decided = match op {
            BinaryOperator::And => !left,
            _ => left,
        };
        if decided {
            return Ok(Value::Bool(left));
        }
        let right = self.eval_child(right, line)?.as_bool(line)?;
        Ok(Value::Bool(right))
    }
}
