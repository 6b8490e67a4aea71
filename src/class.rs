use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;
use std::cell::RefCell;

use crate::error::RuntimeError;
use crate::function::Function;
use crate::object::Value;
use crate::token::Token;

/// A user-defined class (spec §3: `Class`). A class is itself callable — see
/// `Value::call`, which constructs the `Instance` and runs `init` if present
/// (spec §4.4: "Class call (constructor)"). Inheritance/`super` are a named
/// spec.md Non-goal (§9) and are not modeled here.
pub struct Class {
    pub name: String,
    pub methods: HashMap<String, Function>,
}

impl Class {
    pub fn new(name: String, methods: HashMap<String, Function>) -> Self {
        Class { name, methods }
    }

    pub fn find_method(&self, name: &str) -> Option<Function> {
        self.methods.get(name).cloned()
    }

    /// The constructor's arity is the `init` method's arity, or 0 if the
    /// class declares no initializer (spec §3: "Class is itself callable").
    pub fn arity(&self) -> usize {
        self.find_method("init").map(|init| init.arity()).unwrap_or(0)
    }
}

impl Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

/// Classes render as their bare name (spec §4.4: "classes render as their
/// name").
impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A live object of some `Class` (spec §3: `Instance`). Fields are created
/// on first assignment; methods always live on the class and are bound
/// fresh on each lookup (spec §4.4: "Get").
#[derive(Clone)]
pub struct Instance {
    pub class: Rc<RefCell<Class>>,
    pub fields: HashMap<String, Value>,
}

impl Instance {
    pub fn new(class: Rc<RefCell<Class>>) -> Self {
        Instance { class, fields: HashMap::new() }
    }

    /// Fields shadow methods (spec §4.4: "first fields, then methods").
    /// `self_value` is the already-constructed `Value::Instance` wrapping
    /// this same instance, needed to bind `this` on a found method.
    pub fn get(&self, name: &Token, self_value: &Value) -> Result<Value, RuntimeError> {
        if let Some(field) = self.fields.get(&name.lexeme) {
            return Ok(field.clone());
        }

        if let Some(method) = self.class.borrow().find_method(&name.lexeme) {
            return Ok(Value::from(method.bind(self_value.clone())));
        }

        Err(RuntimeError::new(name.clone(), format!("Undefined property '{}'.", name.lexeme)))
    }

    pub fn set(&mut self, name: &Token, value: Value) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.class.borrow().name)
    }
}

/// Instances render as `"<ClassName> instance"` (spec §4.4).
impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} instance", self.class.borrow().name)
    }
}
