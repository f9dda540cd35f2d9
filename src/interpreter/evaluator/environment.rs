use std::collections::HashMap;

use crate::interpreter::value::core::Value;

/// The variable store of a run: a stack of scopes with call-frame bases.
///
/// The bottom scope is global and lives for the whole run. Blocks, loop
/// iterations and switch cases push a scope; a call pushes a frame, which is
/// a scope that also hides every scope of the caller except the global one.
#[derive(Debug)]
pub struct Environment {
    scopes:      Vec<HashMap<String, Value>>,
    frame_bases: Vec<usize>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an environment holding only the global scope.
    #[must_use]
    pub fn new() -> Self {
        Self { scopes:      vec![HashMap::new()],
               frame_bases: Vec::new(), }
    }

    /// Index of the first scope belonging to the current frame. Scopes below
    /// it, except the global one, are not visible.
    fn base(&self) -> usize {
        self.frame_bases.last().copied().unwrap_or(0)
    }

    /// Scopes visible from the current frame, innermost first.
    fn visible(&self) -> impl Iterator<Item = &HashMap<String, Value>> {
        let base = self.base();
        let global = (base > 0).then(|| &self.scopes[0]);
        self.scopes[base..].iter().rev().chain(global)
    }

    /// Number of scopes, global included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Pushes a new empty scope.
    ///
    /// # Example
    /// ```
    /// use rinse::interpreter::evaluator::environment::Environment;
    ///
    /// let mut env = Environment::new();
    /// env.push_scope();
    /// assert_eq!(env.depth(), 2);
    /// env.pop_scope();
    /// assert_eq!(env.depth(), 1);
    /// ```
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Removes the innermost scope. The global scope is never removed.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Starts a call frame.
    pub fn push_frame(&mut self) {
        self.frame_bases.push(self.scopes.len());
        self.scopes.push(HashMap::new());
    }

    /// Ends the current call frame, dropping every scope it pushed.
    pub fn pop_frame(&mut self) {
        if let Some(base) = self.frame_bases.pop() {
            self.scopes.truncate(base.max(1));
        }
    }

    /// Looks a name up from the innermost visible scope outward.
    ///
    /// # Example
    /// ```
    /// use rinse::interpreter::{evaluator::environment::Environment, value::core::Value};
    ///
    /// let mut env = Environment::new();
    /// env.define("g", Value::Integer(1));
    /// env.push_scope();
    /// env.define("local", Value::Integer(2));
    ///
    /// env.push_frame();
    /// assert_eq!(env.get("g"), Some(&Value::Integer(1)));
    /// assert_eq!(env.get("local"), None);
    /// env.pop_frame();
    ///
    /// assert_eq!(env.get("local"), Some(&Value::Integer(2)));
    /// ```
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.visible().find_map(|scope| scope.get(name))
    }

    /// Binds a name in the innermost scope, shadowing any outer binding.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Overwrites the nearest visible binding of `name`.
    ///
    /// # Returns
    /// `false` if no visible scope binds the name; nothing is written then.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        let base = self.base();
        let global = usize::from(base > 0);
        let candidates = (base..self.scopes.len()).rev().chain(0..global);

        for index in candidates {
            if let Some(slot) = self.scopes[index].get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }

    /// Copies the bindings of the current frame, global scope excluded.
    ///
    /// Inner scopes win over outer ones. Globals are left out so that code
    /// run later still reads their current values.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Value> {
        let start = self.base().max(1);
        let mut captured = HashMap::new();
        for scope in self.scopes.iter().skip(start) {
            for (name, value) in scope {
                captured.insert(name.clone(), value.clone());
            }
        }
        captured
    }
}
