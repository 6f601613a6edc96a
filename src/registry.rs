//! Cross-reference registry: identifiers declared in markup & their handles

use crate::driver::Callback;
use crate::toolkit::{ImageId, WidgetId};
use crate::value::Value;
use crate::{error, Error};
use std::collections::BTreeMap;
use std::{cell::RefCell, fmt, rc::Rc};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VariableKind {
    String,
    Int,
}

struct VariableCell {
    kind: VariableKind,
    value: RefCell<Value>,
}

/// An observable variable, shared between the registry, the widgets
/// bound to it and the host's callbacks.
///
/// Cloning a `Variable` clones the handle, not the value.
#[derive(Clone)]
pub struct Variable(Rc<VariableCell>);

impl Variable {
    pub fn string<S: Into<String>>(initial: S) -> Self {
        Self::new(VariableKind::String, Value::Str(initial.into()))
    }

    pub fn int(initial: i64) -> Self {
        Self::new(VariableKind::Int, Value::Int(initial))
    }

    /// Creates a variable holding `initial` converted to `kind`, or `None`
    /// if `initial` isn't representable (a non-numeric `Int`).
    pub fn with_value(kind: VariableKind, initial: Value) -> Option<Self> {
        coerce(kind, initial).map(|value| Self::new(kind, value))
    }

    fn new(kind: VariableKind, value: Value) -> Self {
        Self(Rc::new(VariableCell {
            kind,
            value: RefCell::new(value),
        }))
    }

    pub fn kind(&self) -> VariableKind {
        self.0.kind
    }

    pub fn get(&self) -> Value {
        self.0.value.borrow().clone()
    }

    pub fn set<V: Into<Value>>(&self, value: V) -> Result<(), Error> {
        let value = value.into();
        match coerce(self.0.kind, value.clone()) {
            Some(value) => {
                *self.0.value.borrow_mut() = value;
                Ok(())
            },
            None => Err(error!(RuntimeReference, "Cannot store {:?} in an integer variable", value)),
        }
    }

    /// Whether both handles refer to the same variable
    pub fn same_as(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({:?}, {:?})", self.0.kind, self.0.value.borrow())
    }
}

fn coerce(kind: VariableKind, value: Value) -> Option<Value> {
    match (kind, value) {
        (VariableKind::String, Value::Str(s)) => Some(Value::Str(s)),
        (VariableKind::String, other) => Some(Value::Str(other.to_string())),
        (VariableKind::Int, Value::Int(int)) => Some(Value::Int(int)),
        (VariableKind::Int, Value::Str(s)) => s.trim().parse().ok().map(Value::Int),
        (VariableKind::Int, _) => None,
    }
}

/// Something an identifier can refer to
#[derive(Clone, Debug)]
pub enum Entry {
    Widget(WidgetId),
    Variable(Variable),
    Image(ImageId),
    Callback(Callback),
    /// Anything else the host chose to expose
    Value(Value),
}

impl Entry {
    fn describe(&self) -> &'static str {
        match self {
            Self::Widget(_) => "a widget",
            Self::Variable(_) => "a variable",
            Self::Image(_) => "an image",
            Self::Callback(_) => "a callback",
            Self::Value(_) => "a plain value",
        }
    }
}

impl From<WidgetId> for Entry {
    fn from(widget: WidgetId) -> Self {
        Self::Widget(widget)
    }
}

impl From<Variable> for Entry {
    fn from(var: Variable) -> Self {
        Self::Variable(var)
    }
}

impl From<ImageId> for Entry {
    fn from(image: ImageId) -> Self {
        Self::Image(image)
    }
}

impl From<Callback> for Entry {
    fn from(callback: Callback) -> Self {
        Self::Callback(callback)
    }
}

/// Identifier -> handle map of one window
///
/// Identifiers are unique: registering one twice is an error. Looking up
/// an unknown identifier is an error too, there are no defaults.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: BTreeMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<I: Into<String>, E: Into<Entry>>(&mut self, id: I, entry: E) -> Result<(), Error> {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return Err(error!(MalformedElement, "Identifier {:?} is declared twice", id));
        }

        self.entries.insert(id, entry.into());
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub fn lookup(&self, id: &str) -> Result<&Entry, Error> {
        self.entries.get(id).ok_or_else(|| error!(RuntimeReference, "Unknown identifier {:?}", id))
    }

    pub fn widget(&self, id: &str) -> Result<WidgetId, Error> {
        match self.lookup(id)? {
            Entry::Widget(widget) => Ok(*widget),
            other => Err(mismatch(id, other, "a widget")),
        }
    }

    pub fn variable(&self, id: &str) -> Result<&Variable, Error> {
        match self.lookup(id)? {
            Entry::Variable(var) => Ok(var),
            other => Err(mismatch(id, other, "a variable")),
        }
    }

    pub fn image(&self, id: &str) -> Result<ImageId, Error> {
        match self.lookup(id)? {
            Entry::Image(image) => Ok(*image),
            other => Err(mismatch(id, other, "an image")),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|id| id.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn mismatch(id: &str, found: &Entry, expected: &str) -> Error {
    error!(RuntimeReference, "Identifier {:?} is {}, expected {}", id, found.describe(), expected)
}
