use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Value;
use crate::token::Token;

/// A single lexical scope: a map of bindings plus a link to the enclosing
/// scope. Environments form a parent chain (spec §3); closures capture the
/// `Rc` active at declaration time, so a captured environment outlives the
/// block that created it.
#[derive(Debug, Clone)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    pub values: HashMap<String, Value>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment {
            enclosing,
            values: HashMap::new(),
        }
    }

    /// Defines (or redefines) a binding in this scope. Used for `var`,
    /// function/class declarations, and parameter binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = self.enclosing.clone()
            .unwrap_or_else(|| panic!("expected an enclosing environment at depth 1"));

        for i in 1..distance {
            let parent = environment.borrow().enclosing.clone()
                .unwrap_or_else(|| panic!("expected an enclosing environment at depth {i}"));
            environment = parent;
        }

        environment
    }

    /// Assigns to an existing binding, walking outward through enclosing
    /// scopes. Unlike `define`, this never creates a new binding — assigning
    /// to an undefined variable is a runtime error (spec §4.4).
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined variable '{}'.", name.lexeme)))
    }

    /// Assigns directly at a resolver-computed distance, skipping the outward
    /// walk `assign` would otherwise perform.
    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Value) {
        if distance > 0 {
            self.ancestor(distance).borrow_mut().values.insert(name.lexeme.clone(), value);
        } else {
            self.values.insert(name.lexeme.clone(), value);
        }
    }

    /// Reads a binding, walking outward through enclosing scopes. A missing
    /// name at the root is a runtime error (spec §4.4).
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined variable '{}'.", name.lexeme)))
    }

    /// Reads directly at a resolver-computed distance.
    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Value, RuntimeError> {
        if distance > 0 {
            let ancestor = self.ancestor(distance);
            let found = ancestor.borrow().values.get(&name.lexeme).cloned();
            found.ok_or_else(|| RuntimeError::new(name.clone(), format!("Undefined variable '{}'.", name.lexeme)))
        } else {
            self.values.get(&name.lexeme).cloned()
                .ok_or_else(|| RuntimeError::new(name.clone(), format!("Undefined variable '{}'.", name.lexeme)))
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}
