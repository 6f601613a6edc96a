//! Build widget trees from XML markup.
//!
//! A markup document describes layout containers, form controls, tables,
//! variables and commands. The [`builder::Builder`] walks it, converts
//! attributes into typed [`value::Value`]s, resolves identifiers through the
//! [`driver::Driver`]'s registry and asks a [`toolkit::Toolkit`] to create
//! and place the widgets.
//!
//! ```xml
//! <Frame layout="Grid" columnweight="1">
//!     <String id="buffer" />
//!     <Row>
//!         <Entry textvariable="buffer" columnspan="2" sticky="ew" />
//!     </Row>
//!     <Row>
//!         <Button text="Clear" command="clear" />
//!         <Button text="=" command="equals" />
//!     </Row>
//! </Frame>
//! ```
//!
//! Built-in tags are documented in [`tags`], the layout algorithms in
//! [`engine`].

/// Logs through `log` if the builder's verbosity allows it
macro_rules! diag {
    ($options:expr, $level:ident, $($arg:tt)*) => {
        if $options.traces(::log::Level::$level) {
            ::log::log!(::log::Level::$level, $($arg)*);
        }
    };
}

pub mod builder;
pub mod commands;
pub mod convert;
pub mod driver;
pub mod engine;
pub mod layout;
pub mod plan;
pub mod registry;
pub mod tags;
pub mod toolkit;
pub mod value;
pub mod xml;

pub use builder::{Builder, BuildOptions, Template};
pub use driver::{Callback, Driver};
pub use toolkit::{Toolkit, WidgetId, ImageId, WidgetKind};
pub use value::{Value, Params};
pub use xml::{Element, Document};

use core::fmt;

/// What went wrong, as seen by the markup author
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown tag, or the thing handed to the builder isn't an element
    InvalidElement,
    /// Known tag with a missing or unusable attribute / child
    MalformedElement,
    /// An identifier or method named by the markup doesn't exist
    RuntimeReference,
    /// The markup text couldn't be tokenized
    Syntax,
    /// A markup file couldn't be read
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidElement => "invalid element",
            Self::MalformedElement => "malformed element",
            Self::RuntimeReference => "runtime reference error",
            Self::Syntax => "markup syntax error",
            Self::Io => "i/o error",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub line: u32,
    pub file: &'static str,
    pub msg: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, line: u32, file: &'static str, msg: Option<String>) -> Self {
        Self { kind, line, file, msg }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The formatted message, or an empty string
    pub fn message(&self) -> &str {
        self.msg.as_deref().unwrap_or("")
    }

    /// Names the element the error occurred in
    pub fn within(mut self, element: &Element) -> Self {
        let location = element.describe();
        self.msg = Some(match self.msg {
            Some(msg) => format!("{} in {}", msg, location),
            None => format!("in {}", location),
        });
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.msg {
            Some(msg) => write!(f, "{}: {} ({}, line {})", self.kind, msg, self.file, self.line),
            None => write!(f, "{} ({}, line {})", self.kind, self.file, self.line),
        }
    }
}

impl std::error::Error for Error {}

/// Creates an [`Error`] of some [`ErrorKind`] with an optional formatted string
///
/// # Examples
///
/// ```ignore
/// Err(error!(Syntax))?;
/// Err(error!(InvalidElement, "Unknown tag <{}>", tag))?;
/// ```
///
/// Corresponding messages:
///
/// ```text
/// markup syntax error (src/xml.rs, line 51)
/// invalid element: Unknown tag <Foo> (src/builder.rs, line 51)
/// ```
#[macro_export]
macro_rules! error {
    ($kind:ident) => {
        $crate::Error::new($crate::ErrorKind::$kind, ::core::line!(), ::core::file!(), None)
    };
    ($kind:ident, $($arg:tt)*) => {
        $crate::Error::new($crate::ErrorKind::$kind, ::core::line!(), ::core::file!(), Some(::std::format!($($arg)*)))
    };
}
