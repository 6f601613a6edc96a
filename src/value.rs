//! Typed attribute values & the list / record mini-syntaxes

use crate::driver::Callback;
use crate::registry::Variable;
use crate::toolkit::{ImageId, WidgetId};
use core::fmt;

/// Spelling of positive infinity in markup
pub const INFINITY_TOKEN: &str = "MATH_INF";
/// Spelling of negative infinity in markup
pub const NEG_INFINITY_TOKEN: &str = "-MATH_INF";

/// A converted attribute value
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    /// Only produced by the infinity tokens
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Record(Params),
    Variable(Variable),
    Image(ImageId),
    Widget(WidgetId),
    Command(Callback),
}

impl Value {
    /// Converts one raw attribute value:
    ///
    /// - `"123"` becomes `Int(123)`
    /// - `"/123"` becomes `Str("123")` (escaped digits stay textual)
    /// - `MATH_INF` / `-MATH_INF` become infinite floats
    /// - anything else stays a string
    pub fn scalar(raw: &str) -> Self {
        if let Some(escaped) = raw.strip_prefix('/') {
            if is_digits(escaped) {
                return Self::Str(escaped.into());
            }
        }

        if is_digits(raw) {
            if let Ok(int) = raw.parse() {
                return Self::Int(int);
            }
        }

        match raw {
            INFINITY_TOKEN => Self::Float(f64::INFINITY),
            NEG_INFINITY_TOKEN => Self::Float(f64::NEG_INFINITY),
            _ => Self::Str(raw.into()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(int) => Some(*int),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&Callback> {
        match self {
            Self::Command(callback) => Some(callback),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Variable(a), Self::Variable(b)) => a.same_as(b),
            (Self::Image(a), Self::Image(b)) => a == b,
            (Self::Widget(a), Self::Widget(b)) => a == b,
            // callbacks have no identity worth comparing
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(int) => write!(f, "{}", int),
            Self::Float(float) => write!(f, "{}", float),
            Self::Str(s) => f.write_str(s),
            Self::List(list) => {
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            },
            Self::Record(params) => {
                for (key, value) in params.iter() {
                    write!(f, "{} = {}; ", key, value)?;
                }
                Ok(())
            },
            Self::Variable(var) => write!(f, "{}", var.get()),
            Self::Image(image) => write!(f, "{}", image),
            Self::Widget(widget) => write!(f, "{}", widget),
            Self::Command(callback) => write!(f, "{:?}", callback),
        }
    }
}

impl From<i64> for Value {
    fn from(int: i64) -> Self {
        Self::Int(int)
    }
}

impl From<i32> for Value {
    fn from(int: i32) -> Self {
        Self::Int(int.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Ordered construction parameters, keyed by attribute name
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Params(Vec<(String, Value)>);

impl Params {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key`, keeping its position if it was already present
    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Removes and returns `key`
    pub fn take(&mut self, key: &str) -> Option<Value> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

pub(crate) fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn list_item(token: &str) -> Value {
    if is_digits(token) {
        if let Ok(int) = token.parse() {
            return Value::Int(int);
        }
    }

    Value::Str(token.into())
}

/// Parses `"1, two, 3"` into `[1, "two", 3]`
///
/// Items are separated by commas and stripped of surrounding spaces;
/// all-digit items become integers.
pub fn parse_list(text: &str) -> Vec<Value> {
    text.split(',').map(|token| list_item(token.trim_matches(' '))).collect()
}

/// Parses `"a = 1; b = x,y,2;"` into `{a: 1, b: ["x", "y", 2]}`
///
/// Pairs are terminated by `;` (optional after the last pair). Spaces are
/// skipped right after `=` and `;`, and before `=`. Values containing a
/// comma are lists, all-digit values are integers.
pub fn parse_dict(text: &str) -> Params {
    enum Buffer {
        Key,
        Value,
    }

    let mut record = Params::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut buffer = Buffer::Key;
    let mut skipping_spaces = true;

    let emit = |record: &mut Params, key: &mut String, value: &mut String| {
        let parsed = match value.contains(',') {
            true => Value::List(parse_list(value)),
            false => list_item(value),
        };
        record.insert(key.trim_end_matches(' '), parsed);
        key.clear();
        value.clear();
    };

    for c in text.chars() {
        match c {
            ';' => {
                emit(&mut record, &mut key, &mut value);
                buffer = Buffer::Key;
                skipping_spaces = true;
            },
            '=' => {
                buffer = Buffer::Value;
                skipping_spaces = true;
            },
            ' ' if skipping_spaces => (),
            c => {
                skipping_spaces = false;
                match buffer {
                    Buffer::Key => key.push(c),
                    Buffer::Value => value.push(c),
                }
            },
        }
    }

    if !key.is_empty() {
        emit(&mut record, &mut key, &mut value);
    }

    record
}
