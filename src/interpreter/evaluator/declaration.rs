use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::{Expr, FunctionDef},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{StructValue, Value},
    },
};

impl Context {
    /// Registers a function declaration.
    ///
    /// `fn Type.name(..)` goes into the method table of `Type`; any other
    /// function into the function table.
    pub fn declare_function(&mut self, def: &Rc<FunctionDef>) -> EvalResult<()> {
        match &def.owner {
            Some(owner) => self.registry.register_method(owner, def, def.line),
            None => self.registry.register_function(def),
        }
    }

    /// Evaluates `Name { field: expr, .. }`.
    ///
    /// Initializers run left to right as written. Fields left out take their
    /// declared default, which is evaluated now, once per instance. The
    /// resulting record keeps the declaration's field order.
    ///
    /// # Errors
    /// - `UnknownType` if no struct `Name` has been declared.
    /// - `TypeError` for a field the struct does not declare, a field given
    ///   twice, or a field with neither initializer nor default.
    ///
    /// # Example
    /// ```
    /// use rinse::get_output;
    ///
    /// let src = "init main {
    ///     struct Point { x: int, y: int = 0 }
    ///     print(Point { y: 2, x: 1 })
    ///     print(Point { x: 5 })
    /// }";
    /// assert_eq!(get_output(src).unwrap(),
    ///            vec!["Point { x: 1, y: 2 }", "Point { x: 5, y: 0 }"]);
    /// ```
    pub fn eval_struct_literal(&mut self,
                               type_name: &str,
                               fields: &[(String, Expr)],
                               line: usize)
                               -> EvalResult<Value> {
        let Some(def) = self.registry.struct_def(type_name).cloned() else {
            return Err(RuntimeError::UnknownType { name: type_name.to_string(),
                                                   line });
        };

        let mut given: Vec<(&str, Value)> = Vec::with_capacity(fields.len());
        for (name, expr) in fields {
            if !def.fields.iter().any(|f| f.name == *name) {
                return Err(RuntimeError::TypeError { details: format!("struct '{type_name}' has no field '{name}'"),
                                                     line });
            }
            if given.iter().any(|(seen, _)| *seen == name.as_str()) {
                return Err(RuntimeError::TypeError { details: format!("field '{name}' given twice"),
                                                     line });
            }
            let value = self.eval_child(expr, line)?;
            given.push((name.as_str(), value));
        }

        let mut values = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let value = match given.iter().position(|(name, _)| *name == field.name) {
                Some(index) => given.swap_remove(index).1,
                None => match &field.default {
                    Some(default) => self.eval_child(default, line)?,
                    None => {
                        return Err(RuntimeError::TypeError { details: format!("missing field '{}' in '{type_name}'",
                                                                              field.name),
                                                             line });
                    },
                },
            };
            if let Some(annotation) = &field.annotation {
                self.check_annotation(annotation, &value, line)?;
            }
            values.push((field.name.clone(), value));
        }

        Ok(Value::Struct(Rc::new(RefCell::new(StructValue { type_name: type_name.to_string(),
                                                            fields:    values, }))))
    }
}
