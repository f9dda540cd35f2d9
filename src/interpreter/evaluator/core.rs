use tracing::{debug, trace};

use crate::{
    ast::{Expr, Program, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::{environment::Environment, registry::Registry},
        value::core::Value,
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default bound on nested calls.
pub const MAX_CALL_DEPTH: usize = 200;

/// Settings of a [`Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Also write every printed line to standard output.
    pub echo:           bool,
    /// Nested calls allowed before the run aborts with `ResourceExhausted`.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { echo:           false,
               max_call_depth: MAX_CALL_DEPTH, }
    }
}

/// How a statement finished.
///
/// Loops consume `Break` and `Continue`, calls consume `Return`.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Fall through to the next statement.
    Normal,
    /// Leave the innermost loop.
    Break {
        /// Line of the `break`.
        line: usize,
    },
    /// Skip to the next iteration of the innermost loop.
    Continue {
        /// Line of the `continue`.
        line: usize,
    },
    /// Leave the current function, or the program at top level.
    Return(Option<Value>),
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state of one run: the variable
/// environment, every registered declaration, the printed lines and the call
/// depth.
///
/// ## Usage
///
/// A `Context` is created once per program. Output printed before a runtime
/// error stays available through [`Context::output`].
///
/// ```
/// use rinse::{interpreter::evaluator::core::Context, parse_program};
///
/// let program = parse_program("init demo { print(1) print(2 / 0) }").unwrap();
/// let mut context = Context::new();
///
/// assert!(context.run(&program).is_err());
/// assert_eq!(context.output(), ["1"]);
/// ```
#[derive(Debug, Default)]
pub struct Context {
    pub(crate) env:        Environment,
    pub(crate) registry:   Registry,
    output:                Vec<String>,
    pub(crate) config:     Config,
    pub(crate) call_depth: usize,
}

impl Context {
    /// Creates a context with the default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a context with the given settings.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self { env: Environment::new(),
               registry: Registry::default(),
               output: Vec::new(),
               config,
               call_depth: 0 }
    }

    /// Lines printed so far, in order.
    #[must_use]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Consumes the context, returning the printed lines.
    #[must_use]
    pub fn into_output(self) -> Vec<String> {
        self.output
    }

    /// Runs a program from a fresh environment and empty registries.
    ///
    /// The program body executes in the global scope. A top-level `return`
    /// ends the run early with its value.
    ///
    /// # Errors
    /// The first runtime error aborts the run and is returned. A `break` or
    /// `continue` outside any loop is a `StrayControlFlow` error.
    ///
    /// # Example
    /// ```
    /// use rinse::{
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    ///     parse_program,
    /// };
    ///
    /// let program = parse_program("init demo { let x = 20 return x + 1 }").unwrap();
    /// let mut context = Context::new();
    ///
    /// assert_eq!(context.run(&program).unwrap(), Some(Value::Integer(21)));
    /// ```
    #[tracing::instrument(skip_all, fields(program = %program.name))]
    pub fn run(&mut self, program: &Program) -> EvalResult<Option<Value>> {
        self.env = Environment::new();
        self.registry = Registry::default();
        self.output.clear();
        self.call_depth = 0;
        debug!(statements = program.body.len(), "run started");

        let result = match self.exec_block(&program.body)? {
            Flow::Normal => None,
            Flow::Return(value) => value,
            Flow::Break { line } => {
                return Err(RuntimeError::StrayControlFlow { keyword: "break",
                                                            line });
            },
            Flow::Continue { line } => {
                return Err(RuntimeError::StrayControlFlow { keyword: "continue",
                                                            line });
            },
        };

        debug!(lines = self.output.len(), "run finished");
        Ok(result)
    }

    /// Executes statements in order in the current scope, stopping at the
    /// first one that does not finish normally.
    pub fn exec_block(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        for statement in statements {
            let flow = self.exec_statement(statement)?;
            if flow != Flow::Normal {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes statements in a fresh scope that is dropped afterwards.
    pub fn exec_scoped(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        self.scoped(|context| context.exec_block(statements))
    }

    /// Executes a single statement.
    ///
    /// Declarations register into the context's registries; control flow
    /// statements report how they finished through [`Flow`].
    pub fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        ensure_sufficient_stack(|| match statement {
            Statement::Let { name,
                             annotation,
                             value,
                             line, } => {
                let value = self.eval_child(value, *line)?;
                if let Some(annotation) = annotation {
                    self.check_annotation(annotation, &value, *line)?;
                }
                self.env.define(name, value);
                Ok(Flow::Normal)
            },
            Statement::Destructure { target, value, line } => {
                let value = self.eval_child(value, *line)?;
                self.exec_destructure(target, &value, *line)?;
                Ok(Flow::Normal)
            },
            Statement::Assign { target, value, line } => {
                self.exec_assign(target, value, *line)?;
                Ok(Flow::Normal)
            },
            Statement::Print { expr, line } => {
                let text = self.eval_child(expr, *line)?.to_string();
                if self.config.echo {
                    println!("{text}");
                }
                self.output.push(text);
                Ok(Flow::Normal)
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            line, } => {
                if self.eval_child(condition, *line)?.as_bool(*line)? {
                    self.exec_scoped(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_scoped(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            },
            Statement::For { var,
                             iterable,
                             body,
                             line, } => self.exec_for(var, iterable, body, *line),
            Statement::While { condition, body, line } => self.exec_while(condition, body, *line),
            Statement::Block { statements, .. } => self.exec_scoped(statements),
            Statement::Function(def) => {
                self.declare_function(def)?;
                Ok(Flow::Normal)
            },
            Statement::Struct(def) => {
                self.registry.register_struct(def)?;
                Ok(Flow::Normal)
            },
            Statement::Enum(def) => {
                self.registry.register_enum(def)?;
                Ok(Flow::Normal)
            },
            Statement::Trait(def) => {
                self.registry.register_trait(def)?;
                Ok(Flow::Normal)
            },
            Statement::Impl(def) => {
                self.registry.register_impl(def)?;
                Ok(Flow::Normal)
            },
            Statement::Return { value, line } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => None,
                };
                trace!(line, "return");
                Ok(Flow::Return(value))
            },
            Statement::Break { line } => Ok(Flow::Break { line: *line }),
            Statement::Continue { line } => Ok(Flow::Continue { line: *line }),
            Statement::Switch { subject,
                                cases,
                                default,
                                line, } => self.exec_switch(subject, cases, default.as_deref(), *line),
            Statement::Proof { condition, body, line } => {
                if !self.eval_child(condition, *line)?.as_bool(*line)? {
                    return Err(RuntimeError::AssertionFailed { line: *line });
                }
                self.exec_scoped(body)
            },
            Statement::Expression { expr, .. } => {
                self.eval(expr)?;
                Ok(Flow::Normal)
            },
        })
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. Only calls can
    /// produce no value: a function that finishes without `return`, or a
    /// monadic block without a final expression.
    ///
    /// # Returns
    /// `Some(Value)` for expressions that produce a value, or `None` for
    /// calls that do not yield one.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Option<Value>> {
        ensure_sufficient_stack(|| match expr {
            Expr::Literal { value, .. } => Ok(Some(Value::from(value))),
            Expr::Variable { name, line } => self.eval_variable(name, *line).map(Some),
            Expr::Unary { op, expr, line } => {
                let value = self.eval_child(expr, *line)?;
                Self::eval_unary(*op, &value, *line).map(Some)
            },
            Expr::Binary { left,
                           op,
                           right,
                           line, } => self.eval_binary_op(left, *op, right, *line).map(Some),
            Expr::Call { callee,
                         arguments,
                         line, } => self.eval_call(callee, arguments, *line),
            Expr::Apply { callee,
                          arguments,
                          line, } => {
                let callee = self.eval_child(callee, *line)?;
                let args = self.eval_all(arguments, *line)?;
                self.call_value(&callee, args, *line)
            },
            Expr::MethodCall { receiver,
                               method,
                               arguments,
                               line, } => self.eval_method_call(receiver, method, arguments, *line),
            Expr::PathCall { owner,
                             name,
                             arguments,
                             line, } => self.eval_path_call(owner, name, arguments, *line),
            Expr::Path { owner, name, line } => self.eval_path(owner, name, *line).map(Some),
            Expr::FieldAccess { object, field, line } => {
                let object = self.eval_child(object, *line)?;
                Self::read_field(&object, field, *line).map(Some)
            },
            Expr::Index { target, index, line } => {
                let target = self.eval_child(target, *line)?;
                let index = self.eval_child(index, *line)?.as_integer(*line)?;
                Self::read_index(&target, index, *line).map(Some)
            },
            Expr::Tuple { elements, line } => {
                let values = self.eval_all(elements, *line)?;
                Ok(Some(Value::tuple(values)))
            },
            Expr::List { elements, line } => {
                let values = self.eval_all(elements, *line)?;
                Ok(Some(Value::from(values)))
            },
            Expr::StructLiteral { type_name,
                                  fields,
                                  line, } => {
                self.eval_struct_literal(type_name, fields, *line).map(Some)
            },
            Expr::Do { block, .. } => self.eval_do(block, 0),
        })
    }

    /// Evaluates a subexpression and ensures that it produces a value.
    ///
    /// # Errors
    /// `MissingValue` when the expression yields nothing, e.g. a call to a
    /// function that finished without returning a value.
    ///
    /// # Example
    /// ```
    /// use rinse::{
    ///     ast::Expr,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let mut context = Context::new();
    /// let expr = Expr::Literal { value: 10.into(),
    ///                            line:  1, };
    ///
    /// assert_eq!(context.eval_child(&expr, 1).unwrap(), Value::Integer(10));
    /// ```
    pub fn eval_child(&mut self, expr: &Expr, line: usize) -> EvalResult<Value> {
        self.eval(expr)?.ok_or(RuntimeError::MissingValue { line })
    }

    /// Evaluates expressions left to right, each of which must produce a
    /// value.
    pub fn eval_all(&mut self, exprs: &[Expr], line: usize) -> EvalResult<Vec<Value>> {
        exprs.iter().map(|expr| self.eval_child(expr, line)).collect()
    }

    /// Looks up a variable, falling back to a declared function of that name.
    ///
    /// # Errors
    /// `UnknownVariable` if neither exists.
    pub fn eval_variable(&self, name: &str, line: usize) -> EvalResult<Value> {
        if let Some(value) = self.env.get(name) {
            return Ok(value.clone());
        }
        if let Some(def) = self.registry.function(name) {
            return Ok(Value::function(def));
        }
        Err(RuntimeError::UnknownVariable { name: name.to_string(),
                                            line })
    }
}
