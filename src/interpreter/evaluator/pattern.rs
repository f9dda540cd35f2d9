use tracing::trace;

use crate::{
    ast::{Case, Expr, Pattern, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        value::core::Value,
    },
};

/// Bindings collected while matching, committed only on success.
pub type Bindings = Vec<(String, Value)>;

impl Context {
    /// Tests a value against a pattern.
    ///
    /// Bindings are appended to `bindings` as they are found. The caller
    /// commits them only when the whole pattern matched, so a failed
    /// composite pattern leaves nothing behind.
    ///
    /// # Errors
    /// `DestructureMismatch` when a struct or variant pattern names the right
    /// type but a different number of fields than the value carries.
    ///
    /// # Example
    /// ```
    /// use rinse::{
    ///     ast::{LiteralValue, Pattern},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let pattern = Pattern::Tuple(vec![Pattern::Binding("x".into()),
    ///                                   Pattern::Literal(LiteralValue::Integer(0))]);
    /// let value = Value::tuple(vec![Value::Integer(7), Value::Integer(1)]);
    ///
    /// let mut bindings = Vec::new();
    /// assert!(!Context::match_pattern(&pattern, &value, &mut bindings, 1).unwrap());
    /// ```
    pub fn match_pattern(pattern: &Pattern,
                         value: &Value,
                         bindings: &mut Bindings,
                         line: usize)
                         -> EvalResult<bool> {
        match pattern {
            Pattern::Wildcard => Ok(true),
            Pattern::Literal(literal) => Ok(Value::from(literal) == *value),
            Pattern::Range { start, end } => {
                Ok(matches!(value, Value::Integer(n) if (*start..=*end).contains(n)))
            },
            Pattern::Binding(name) => {
                bindings.push((name.clone(), value.clone()));
                Ok(true)
            },
            Pattern::Tuple(patterns) => match value {
                Value::Tuple(elements) if elements.len() == patterns.len() => {
                    Self::match_all(patterns, elements, bindings, line)
                },
                _ => Ok(false),
            },
            Pattern::Destructure { owner,
                                   variant: None,
                                   fields, } => match value {
                Value::Struct(s) if s.borrow().type_name == *owner => {
                    let values: Vec<Value> =
                        s.borrow().fields.iter().map(|(_, v)| v.clone()).collect();
                    Self::match_positional(fields, &values, bindings, line)
                },
                _ => Ok(false),
            },
            Pattern::Destructure { owner,
                                   variant: Some(variant),
                                   fields, } => match value {
                Value::Variant(v) if v.enum_name == *owner && v.variant == *variant => {
                    Self::match_positional(fields, &v.fields, bindings, line)
                },
                _ => Ok(false),
            },
        }
    }

    /// Matches a type's fields positionally after its name already matched.
    fn match_positional(patterns: &[Pattern],
                        values: &[Value],
                        bindings: &mut Bindings,
                        line: usize)
                        -> EvalResult<bool> {
        if patterns.len() != values.len() {
            return Err(RuntimeError::DestructureMismatch { expected: patterns.len(),
                                                           found: values.len(),
                                                           line });
        }
        Self::match_all(patterns, values, bindings, line)
    }

    fn match_all(patterns: &[Pattern],
                 values: &[Value],
                 bindings: &mut Bindings,
                 line: usize)
                 -> EvalResult<bool> {
        for (pattern, value) in patterns.iter().zip(values) {
            if !Self::match_pattern(pattern, value, bindings, line)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Executes a `switch` statement.
    ///
    /// The subject is evaluated once. The first case whose pattern matches
    /// runs in a fresh scope holding the pattern's bindings; if none does,
    /// the `default` block runs, if present. `break`, `continue` and `return`
    /// inside a case propagate to the enclosing loop or function.
    ///
    /// # Example
    /// ```
    /// use rinse::get_output;
    ///
    /// let src = "init main {
    ///     switch 7 {
    ///         case 1..5 { print(\"low\") }
    ///         case 5..10 { print(\"mid\") }
    ///         case 7 { print(\"seven\") }
    ///         default { print(\"high\") }
    ///     }
    /// }";
    /// assert_eq!(get_output(src).unwrap(), vec!["mid"]);
    /// ```
    pub fn exec_switch(&mut self,
                       subject: &Expr,
                       cases: &[Case],
                       default: Option<&[Statement]>,
                       line: usize)
                       -> EvalResult<Flow> {
        let value = self.eval_child(subject, line)?;

        for case in cases {
            let mut bindings = Vec::new();
            if !Self::match_pattern(&case.pattern, &value, &mut bindings, case.line)? {
                continue;
            }
            trace!(line = case.line, bindings = bindings.len(), "case matched");
            return self.scoped(|context| {
                           for (name, bound) in bindings {
                               context.env.define(&name, bound);
                           }
                           context.exec_block(&case.body)
                       });
        }

        match default {
            Some(body) => self.exec_scoped(body),
            None => Ok(Flow::Normal),
        }
    }
}
