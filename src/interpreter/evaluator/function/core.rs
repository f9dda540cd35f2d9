use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{Expr, FunctionDef},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow},
            function::builtin::lookup_builtin,
        },
        value::core::{FunctionValue, Value, VariantValue},
    },
};

impl Context {
    /// Evaluates `name(args)`.
    ///
    /// A variable holding a function value takes precedence over a declared
    /// function of the same name. Arguments are evaluated left to right in
    /// the caller's scope before the call starts.
    ///
    /// # Errors
    /// - `UnknownFunction` if `name` is neither a variable nor a function.
    /// - `TypeError` if the variable holds something that is not callable.
    pub fn eval_call(&mut self,
                     callee: &str,
                     arguments: &[Expr],
                     line: usize)
                     -> EvalResult<Option<Value>> {
        if let Some(value) = self.env.get(callee).cloned() {
            let args = self.eval_all(arguments, line)?;
            return self.call_value(&value, args, line);
        }

        let Some(def) = self.registry.function(callee).cloned() else {
            return Err(RuntimeError::UnknownFunction { name: callee.to_string(),
                                                       line });
        };
        let args = self.eval_all(arguments, line)?;
        self.call_function(&def, None, args, line)
    }

    /// Calls a function value.
    ///
    /// # Errors
    /// `TypeError` if `callee` is not a function.
    pub fn call_value(&mut self,
                      callee: &Value,
                      args: Vec<Value>,
                      line: usize)
                      -> EvalResult<Option<Value>> {
        let Value::Function(function) = callee else {
            return Err(callee.mismatch("fn", line));
        };
        match function.as_ref() {
            FunctionValue::Named(def) => self.call_function(def, None, args, line),
            FunctionValue::Continuation(continuation) => {
                self.call_continuation(continuation, args, line)
            },
        }
    }

    /// Runs a declared function or method in a new call frame.
    ///
    /// `receiver` is bound to `self` for methods. The body sees its own
    /// parameters and the global scope, never the caller's locals.
    ///
    /// # Returns
    /// The value of the `return` that ended the call, or `None` if the body
    /// ran to the end or returned without a value.
    ///
    /// # Errors
    /// - `ArgumentCountMismatch` if `args` does not match the declared
    ///   parameters.
    /// - `ResourceExhausted` if the call would exceed the depth limit.
    /// - `StrayControlFlow` if a `break` or `continue` escapes the body.
    ///
    /// # Example
    /// ```
    /// use rinse::get_output;
    ///
    /// let src = "init main {
    ///     fn fact(n) { if n <= 1 { return 1 } return n * fact(n - 1) }
    ///     print(fact(10))
    /// }";
    /// assert_eq!(get_output(src).unwrap(), vec!["3628800"]);
    /// ```
    pub fn call_function(&mut self,
                         def: &Rc<FunctionDef>,
                         receiver: Option<Value>,
                         args: Vec<Value>,
                         line: usize)
                         -> EvalResult<Option<Value>> {
        if args.len() != def.arity() {
            return Err(RuntimeError::ArgumentCountMismatch { name: def.name.clone(),
                                                             expected: def.arity(),
                                                             found: args.len(),
                                                             line });
        }
        if def.has_self() && receiver.is_none() {
            return Err(RuntimeError::TypeError { details: format!("method '{}' needs a receiver",
                                                                  def.name),
                                                 line });
        }
        trace!(function = %def.name, depth = self.call_depth + 1, line, "call");
        let flow = self.in_frame(line, |context| {
                           let mut params = def.params.iter();
                           if let Some(receiver) = receiver
                              && def.has_self()
                           {
                               params.next();
                               context.env.define("self", receiver);
                           }
                           for (param, arg) in params.zip(args) {
                               context.env.define(param, arg);
                           }
                           context.exec_block(&def.body)
                       })?;

        match flow {
            Flow::Normal => Ok(None),
            Flow::Return(value) => Ok(value),
            Flow::Break { line } => Err(RuntimeError::StrayControlFlow { keyword: "break",
                                                                         line }),
            Flow::Continue { line } => {
                Err(RuntimeError::StrayControlFlow { keyword: "continue",
                                                     line })
            },
        }
    }

    /// Evaluates `receiver.method(args)`.
    ///
    /// User methods registered for the receiver's runtime type are looked up
    /// first by (type, name, argument count); the builtin methods of lists,
    /// strings and tuples come second. A user method's `self` aliases the
    /// receiver, so mutating a struct or list through `self` is visible to
    /// the caller.
    ///
    /// # Errors
    /// `UnknownMethod` if neither table has a match.
    pub fn eval_method_call(&mut self,
                            receiver: &Expr,
                            method: &str,
                            arguments: &[Expr],
                            line: usize)
                            -> EvalResult<Option<Value>> {
        let receiver = self.eval_child(receiver, line)?;
        let args = self.eval_all(arguments, line)?;
        let type_name = receiver.type_name();

        if let Some(def) = self.registry.method(&type_name, method, args.len()).cloned() {
            trace!(type_name = %type_name, method, "method dispatch");
            if !def.has_self() {
                return Err(RuntimeError::TypeError { details: format!("'{type_name}::{method}' is an associated function"),
                                                     line });
            }
            return self.call_function(&def, Some(receiver), args, line);
        }

        if let Some(builtin) = lookup_builtin(&type_name, method, args.len()) {
            trace!(type_name = %type_name, method, "builtin method");
            return builtin(&receiver, &args, line);
        }

        Err(RuntimeError::UnknownMethod { type_name,
                                          method: method.to_string(),
                                          arity: args.len(),
                                          line })
    }

    /// Evaluates `Owner::name(args)`.
    ///
    /// If `Owner` is an enum with a variant `name`, the variant is
    /// constructed from the arguments. Otherwise an associated function of
    /// `Owner` (a method without `self`) is called.
    ///
    /// # Errors
    /// - `ArgumentCountMismatch` if a variant gets the wrong number of
    ///   fields.
    /// - `UnknownType` if `Owner` is not a declared type, or is an enum
    ///   without such a variant or function.
    /// - `UnknownMethod` if a declared type has no such associated function.
    ///
    /// # Example
    /// ```
    /// use rinse::get_output;
    ///
    /// let src = "init main {
    ///     enum Shape { Circle(r), Rect(w, h) }
    ///     print(Shape::Rect(2, 3))
    /// }";
    /// assert_eq!(get_output(src).unwrap(), vec!["Shape::Rect(2, 3)"]);
    /// ```
    pub fn eval_path_call(&mut self,
                          owner: &str,
                          name: &str,
                          arguments: &[Expr],
                          line: usize)
                          -> EvalResult<Option<Value>> {
        let args = self.eval_all(arguments, line)?;

        if let Some(variant) = self.registry.variant(owner, name) {
            if variant.fields.len() != args.len() {
                return Err(RuntimeError::ArgumentCountMismatch { name: format!("{owner}::{name}"),
                                                                 expected: variant.fields.len(),
                                                                 found: args.len(),
                                                                 line });
            }
            return Ok(Some(Self::variant(owner, name, args)));
        }

        if let Some(def) = self.registry.method(owner, name, args.len()).cloned() {
            if def.has_self() {
                return Err(RuntimeError::TypeError { details: format!("'{owner}.{name}' needs a receiver"),
                                                     line });
            }
            return self.call_function(&def, None, args, line);
        }

        if !self.registry.is_type(owner) {
            return Err(RuntimeError::UnknownType { name: owner.to_string(),
                                                   line });
        }
        if self.registry.enum_def(owner).is_some() {
            return Err(RuntimeError::UnknownType { name: format!("{owner}::{name}"),
                                                   line });
        }
        Err(RuntimeError::UnknownMethod { type_name: owner.to_string(),
                                          method: name.to_string(),
                                          arity: args.len(),
                                          line })
    }

    /// Evaluates `Enum::Variant` without parentheses.
    ///
    /// # Errors
    /// - `ArgumentCountMismatch` if the variant carries fields.
    /// - `UnknownType` if the enum or the variant does not exist.
    pub fn eval_path(&self, owner: &str, name: &str, line: usize) -> EvalResult<Value> {
        let Some(variant) = self.registry.variant(owner, name) else {
            let unknown = if self.registry.enum_def(owner).is_some() {
                format!("{owner}::{name}")
            } else {
                owner.to_string()
            };
            return Err(RuntimeError::UnknownType { name: unknown,
                                                   line });
        };
        if !variant.fields.is_empty() {
            return Err(RuntimeError::ArgumentCountMismatch { name: format!("{owner}::{name}"),
                                                             expected: variant.fields.len(),
                                                             found: 0,
                                                             line });
        }
        Ok(Self::variant(owner, name, Vec::new()))
    }

    fn variant(owner: &str, name: &str, fields: Vec<Value>) -> Value {
        Value::Variant(Rc::new(VariantValue { enum_name: owner.to_string(),
                                              variant: name.to_string(),
                                              fields }))
    }
}
