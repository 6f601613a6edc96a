//! Markup elements & XML parsing

use crate::{error, Error};

#[cfg(feature = "xml")]
use xmlparser::{ElementEnd, StrSpan, Token, Tokenizer};

/// A markup element: tag, ordered attributes, inner text and children.
///
/// The builder never modifies elements; a parsed [`Document`] can be built
/// any number of times.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    /// Trimmed inner text; `None` if there was none or only whitespace
    pub text: Option<String>,
    pub children: Vec<Element>,
    /// 1-based line of the opening tag, when parsed from text
    pub line: Option<u32>,
}

impl Element {
    pub fn new<T: Into<String>>(tag: T) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_text<T: Into<String>>(mut self, text: T) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// `<Tag>` or `<Tag> (line N)`, for error messages
    pub fn describe(&self) -> String {
        match self.line {
            Some(line) => format!("<{}> (line {})", self.tag, line),
            None => format!("<{}>", self.tag),
        }
    }
}

/// A parsed markup document
///
/// This is the wrapper around the root element; the builder only accepts
/// it through [`crate::Builder::build_document`], which checks that a root
/// exists.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Document {
    root: Option<Element>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root: Some(root) }
    }

    /// A document without any element
    pub fn empty() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Parses markup text into a document with exactly one root element.
    #[cfg(feature = "xml")]
    pub fn parse(xml: &str) -> Result<Self, Error> {
        let line = |span: StrSpan| xml[..span.start()].matches('\n').count() as u32 + 1;

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        let mut finish = |stack: &mut Vec<Element>, element: Element| -> Result<(), Error> {
            match stack.last_mut() {
                Some(parent) => parent.children.push(element),
                None if root.is_some() => {
                    return Err(error!(Syntax, "Second root element: {}", element.describe()));
                },
                None => root = Some(element),
            }
            Ok(())
        };

        for token in Tokenizer::from(xml) {
            let token = token.map_err(|e| error!(Syntax, "{}", e))?;

            match token {
                Token::ElementStart { prefix, local, span } => {
                    if !prefix.as_str().is_empty() {
                        return Err(error!(Syntax, "Unexpected prefix: {:?} (line {})", prefix.as_str(), line(span)));
                    }

                    let mut element = Element::new(local.as_str());
                    element.line = Some(line(span));
                    stack.push(element);
                },
                Token::Attribute { prefix, local, value, span } => {
                    if !prefix.as_str().is_empty() {
                        return Err(error!(Syntax, "Unexpected prefix: {:?} (line {})", prefix.as_str(), line(span)));
                    }

                    let current = stack.last_mut().ok_or_else(|| error!(Syntax, "Attribute outside of a tag (line {})", line(span)))?;
                    let name = local.as_str();
                    if current.attr(name).is_some() {
                        return Err(error!(Syntax, "Duplicate attribute {:?} on {}", name, current.describe()));
                    }

                    current.attributes.push((name.into(), unescape(value.as_str())?));
                },
                Token::ElementEnd { end, span } => match end {
                    ElementEnd::Open => (),
                    ElementEnd::Close(prefix, local) => {
                        let element = stack.pop().ok_or_else(|| error!(Syntax, "Unexpected close tag (line {})", line(span)))?;
                        if !prefix.as_str().is_empty() || local.as_str() != element.tag {
                            return Err(error!(Syntax, "Unexpected close tag </{}> for {}", local.as_str(), element.describe()));
                        }

                        finish(&mut stack, element)?;
                    },
                    ElementEnd::Empty => {
                        let element = stack.pop().ok_or_else(|| error!(Syntax, "Unexpected tag end (line {})", line(span)))?;
                        finish(&mut stack, element)?;
                    },
                },
                Token::Text { text } => {
                    let unescaped = unescape(text.as_str())?;
                    append_text(&mut stack, unescaped.trim(), line(text))?;
                },
                Token::Cdata { text, span } => {
                    append_text(&mut stack, text.as_str().trim(), line(span))?;
                },
                // declarations, comments, processing instructions, DTD
                _ => (),
            }
        }

        if let Some(element) = stack.last() {
            return Err(error!(Syntax, "Unclosed element: {}", element.describe()));
        }

        match root {
            Some(root) => Ok(Self::new(root)),
            None => Err(error!(Syntax, "Markup appears to be empty; at least one element is required.")),
        }
    }
}

#[cfg(feature = "xml")]
fn append_text(stack: &mut [Element], text: &str, line: u32) -> Result<(), Error> {
    if text.is_empty() {
        return Ok(());
    }

    let current = stack.last_mut().ok_or_else(|| error!(Syntax, "Unexpected text: {:?} (line {})", text, line))?;
    match &mut current.text {
        Some(existing) => existing.push_str(text),
        None => current.text = Some(text.into()),
    }

    Ok(())
}

/// Decodes the predefined XML entities and character references
pub fn unescape(raw: &str) -> Result<String, Error> {
    let mut output = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        output.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let semicolon = rest.find(';').ok_or_else(|| error!(Syntax, "Unterminated entity in {:?}", raw))?;
        let entity = &rest[1..semicolon];

        let decoded = match entity {
            "lt" => '<',
            "gt" => '>',
            "amp" => '&',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = if let Some(hex) = entity.strip_prefix("#x") {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse().ok()
                } else {
                    None
                };

                match code.and_then(char::from_u32) {
                    Some(c) => c,
                    None => return Err(error!(Syntax, "Unknown entity &{}; in {:?}", entity, raw)),
                }
            },
        };

        output.push(decoded);
        rest = &rest[semicolon + 1..];
    }

    output.push_str(rest);
    Ok(output)
}
