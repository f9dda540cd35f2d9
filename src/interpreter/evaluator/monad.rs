use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::DoBlock,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{Continuation, FunctionValue, Value},
    },
};

impl Context {
    /// Evaluates a monadic block from clause `start` on.
    ///
    /// The clause's right-hand side is evaluated and handed to the `bind`
    /// method of its runtime type together with a continuation standing for
    /// the rest of the block. Once every clause is bound, the final `yield`
    /// expression is the result; a block without one yields no value.
    ///
    /// # Errors
    /// `UnknownMethod` if the clause's value has no one-argument `bind`.
    ///
    /// # Example
    /// ```
    /// use rinse::get_output;
    ///
    /// let src = "init main {
    ///     enum Maybe { Just(v), Nothing }
    ///     impl Maybe {
    ///         fn bind(self, k) {
    ///             switch self {
    ///                 case Maybe::Just(v) { return k(v) }
    ///                 default { return self }
    ///             }
    ///         }
    ///     }
    ///     print(do { a <- Maybe::Just(2) b <- Maybe::Just(3) yield Maybe::Just(a * b) })
    ///     print(do { a <- Maybe::Just(2) b <- Maybe::Nothing yield Maybe::Just(a * b) })
    /// }";
    /// assert_eq!(get_output(src).unwrap(), vec!["Maybe::Just(6)", "Maybe::Nothing"]);
    /// ```
    pub fn eval_do(&mut self, block: &Rc<DoBlock>, start: usize) -> EvalResult<Option<Value>> {
        let Some(clause) = block.clauses.get(start) else {
            return match &block.result {
                Some(expr) => self.eval(expr),
                None => Ok(None),
            };
        };

        let value = self.eval_child(&clause.value, clause.line)?;
        let type_name = value.type_name();
        let Some(bind) = self.registry.method(&type_name, "bind", 1).cloned() else {
            return Err(RuntimeError::UnknownMethod { type_name,
                                                     method: "bind".to_string(),
                                                     arity: 1,
                                                     line: clause.line });
        };

        let continuation = Continuation { block:    Rc::clone(block),
                                          index:    start,
                                          captured: self.env.snapshot(), };
        trace!(type_name = %type_name, clause = %clause.name, "monadic bind");

        let continuation = Value::Function(Rc::new(FunctionValue::Continuation(continuation)));
        self.call_function(&bind, Some(value), vec![continuation], clause.line)
    }

    /// Resumes a monadic block with the unwrapped value of one clause.
    ///
    /// The rest of the block runs in a new call frame holding the bindings
    /// captured when the continuation was made plus the clause's name bound
    /// to the argument.
    ///
    /// # Errors
    /// `ArgumentCountMismatch` unless exactly one argument is given.
    pub fn call_continuation(&mut self,
                             continuation: &Continuation,
                             mut args: Vec<Value>,
                             line: usize)
                             -> EvalResult<Option<Value>> {
        if args.len() != 1 {
            return Err(RuntimeError::ArgumentCountMismatch { name: "continuation".to_string(),
                                                             expected: 1,
                                                             found: args.len(),
                                                             line });
        }
        let argument = args.remove(0);

        self.in_frame(line, |context| {
                for (name, value) in &continuation.captured {
                    context.env.define(name, value.clone());
                }
                if let Some(clause) = continuation.block.clauses.get(continuation.index) {
                    context.env.define(&clause.name, argument);
                }
                context.eval_do(&continuation.block, continuation.index + 1)
            })
    }
}
