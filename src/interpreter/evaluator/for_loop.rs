use crate::{
    ast::{Expr, ForIterable, Statement},
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        value::core::Value,
    },
};

/// What a loop does after one pass of its body.
enum Step {
    Next,
    Exit(Flow),
}

/// Consumes the loop-level flows of one body pass.
///
/// `break` ends the loop normally, `continue` moves on, and `return` leaves
/// the loop carrying its value.
fn step(flow: Flow) -> Step {
    match flow {
        Flow::Normal | Flow::Continue { .. } => Step::Next,
        Flow::Break { .. } => Step::Exit(Flow::Normal),
        Flow::Return(value) => Step::Exit(Flow::Return(value)),
    }
}

impl Context {
    /// Executes a `for` statement.
    ///
    /// Two forms are supported:
    ///
    /// 1. **Range form:** `for i in start..end { body }`. Both bounds must
    ///    evaluate to integers; the range is inclusive and ascending, and
    ///    empty when `start > end`.
    ///
    /// 2. **Collection form:** `for x in items { body }`. The iterable must
    ///    be a list or a tuple. A list is copied before the first pass, so
    ///    pushing to it inside the body does not extend the loop.
    ///
    /// Every pass runs in a fresh scope holding only the loop variable, which
    /// is gone once the loop ends.
    ///
    /// # Example
    /// ```
    /// use rinse::get_output;
    ///
    /// let src = "init main { for i in 1..3 { print(i) } for c in (\"a\", \"b\") { print(c) } }";
    /// assert_eq!(get_output(src).unwrap(), vec!["1", "2", "3", "a", "b"]);
    /// ```
    pub fn exec_for(&mut self,
                    var: &str,
                    iterable: &ForIterable,
                    body: &[Statement],
                    line: usize)
                    -> EvalResult<Flow> {
        match iterable {
            ForIterable::Range { start, end } => {
                let start = self.eval_child(start, line)?.as_integer(line)?;
                let end = self.eval_child(end, line)?.as_integer(line)?;
                self.run_passes((start..=end).map(Value::Integer), var, body)
            },
            ForIterable::Collection(expr) => {
                let elements = match self.eval_child(expr, line)? {
                    Value::List(list) => list.borrow().clone(),
                    Value::Tuple(tuple) => tuple.as_ref().clone(),
                    other => return Err(other.mismatch("list or tuple", line)),
                };
                self.run_passes(elements.into_iter(), var, body)
            },
        }
    }

    /// Runs the body once per item, binding `var` in a fresh scope.
    fn run_passes(&mut self,
                  items: impl Iterator<Item = Value>,
                  var: &str,
                  body: &[Statement])
                  -> EvalResult<Flow> {
        for item in items {
            let flow = self.scoped(|context| {
                               context.env.define(var, item);
                               context.exec_block(body)
                           })?;
            if let Step::Exit(flow) = step(flow) {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a `while` statement.
    ///
    /// The condition is evaluated before every pass and must be a boolean.
    /// Each pass of the body runs in its own scope.
    pub fn exec_while(&mut self,
                      condition: &Expr,
                      body: &[Statement],
                      line: usize)
                      -> EvalResult<Flow> {
        while self.eval_child(condition, line)?.as_bool(line)? {
            if let Step::Exit(flow) = step(self.exec_scoped(body)?) {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }
}
