//! Layout attributes: extracted from elements before anything else

use crate::toolkit::{GridOptions, PackOptions};
use crate::xml::Element;
use crate::{error, Error};
use bitflags::bitflags;
use core::fmt;

/// Attribute names reserved for placement
pub const LAYOUT_KEYS: [&str; 6] = ["rowspan", "columnspan", "side", "sticky", "fill", "expand"];

/// Keys which only make sense in a grid
pub const GRID_KEYS: [&str; 3] = ["rowspan", "columnspan", "sticky"];

/// Keys which only make sense in a stack
pub const STACK_KEYS: [&str; 3] = ["side", "fill", "expand"];

/// Largest accepted `rowspan` / `columnspan`
pub const MAX_SPAN: u32 = 256;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fill {
    None,
    X,
    Y,
    Both,
}

impl Fill {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "none" => Some(Self::None),
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::X => "x",
            Self::Y => "y",
            Self::Both => "both",
        })
    }
}

bitflags! {
    /// Edges of its cell a gridded widget sticks to
    pub struct Sticky: u8 {
        const N = 0b0001;
        const S = 0b0010;
        const E = 0b0100;
        const W = 0b1000;
    }
}

impl Sticky {
    /// Parses `"nsew"`-style text; spaces and commas are ignored
    pub fn parse(text: &str) -> Option<Self> {
        let mut sticky = Self::empty();
        for c in text.chars() {
            sticky |= match c.to_ascii_lowercase() {
                'n' => Self::N,
                's' => Self::S,
                'e' => Self::E,
                'w' => Self::W,
                ' ' | ',' => Self::empty(),
                _ => return None,
            };
        }
        Some(sticky)
    }
}

impl fmt::Display for Sticky {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, c) in [(Self::N, 'n'), (Self::S, 's'), (Self::E, 'e'), (Self::W, 'w')] {
            if self.contains(flag) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// Placement hints of one element; `None` means "not specified"
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct LayoutAttributes {
    pub rowspan: Option<u32>,
    pub columnspan: Option<u32>,
    pub side: Option<Side>,
    pub sticky: Option<Sticky>,
    pub fill: Option<Fill>,
    pub expand: Option<bool>,
}

impl LayoutAttributes {
    /// What children of a stack (and the root) get unless they say otherwise
    pub fn stack_defaults() -> Self {
        Self {
            expand: Some(true),
            fill: Some(Fill::Both),
            ..Default::default()
        }
    }

    /// `self`, with every hint specified in `other` taking precedence
    pub fn overridden_by(self, other: &Self) -> Self {
        Self {
            rowspan: other.rowspan.or(self.rowspan),
            columnspan: other.columnspan.or(self.columnspan),
            side: other.side.or(self.side),
            sticky: other.sticky.or(self.sticky),
            fill: other.fill.or(self.fill),
            expand: other.expand.or(self.expand),
        }
    }

    pub fn rowspan(&self) -> u32 {
        self.rowspan.unwrap_or(1)
    }

    pub fn columnspan(&self) -> u32 {
        self.columnspan.unwrap_or(1)
    }

    pub fn pack_options(&self, default_side: Side) -> PackOptions {
        PackOptions {
            side: self.side.unwrap_or(default_side),
            fill: self.fill.unwrap_or(Fill::None),
            expand: self.expand.unwrap_or(false),
        }
    }

    pub fn grid_options(&self, row: u32, column: u32) -> GridOptions {
        GridOptions {
            row,
            column,
            rowspan: self.rowspan(),
            columnspan: self.columnspan(),
            sticky: self.sticky.unwrap_or_else(Sticky::empty),
        }
    }

    /// Names of the hints which are specified and belong to `keys`
    pub fn specified(&self, keys: &[&'static str]) -> Vec<&'static str> {
        let present = |key: &str| match key {
            "rowspan" => self.rowspan.is_some(),
            "columnspan" => self.columnspan.is_some(),
            "side" => self.side.is_some(),
            "sticky" => self.sticky.is_some(),
            "fill" => self.fill.is_some(),
            "expand" => self.expand.is_some(),
            _ => false,
        };

        keys.iter().copied().filter(|key| present(key)).collect()
    }
}

fn span(element: &Element, key: &str, raw: &str) -> Result<u32, Error> {
    match raw.trim().parse() {
        Ok(span) if (1..=MAX_SPAN).contains(&span) => Ok(span),
        _ => Err(error!(MalformedElement, "{} of {} must be an integer from 1 to {}, got {:?}", key, element.describe(), MAX_SPAN, raw)),
    }
}

fn boolean(element: &Element, raw: &str) -> Result<bool, Error> {
    match raw.trim() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(error!(MalformedElement, "expand of {} must be a boolean, got {:?}", element.describe(), raw)),
    }
}

/// Splits the attributes of `element` into placement hints and the rest
///
/// The remaining attributes keep their order. `element` isn't modified.
pub fn extract(element: &Element) -> Result<(LayoutAttributes, Vec<(&str, &str)>), Error> {
    let mut layout = LayoutAttributes::default();
    let mut remaining = Vec::with_capacity(element.attributes.len());

    for (key, raw) in &element.attributes {
        let (key, raw) = (key.as_str(), raw.as_str());
        let invalid = || error!(MalformedElement, "Invalid {} {:?} on {}", key, raw, element.describe());

        match key {
            "rowspan" => layout.rowspan = Some(span(element, key, raw)?),
            "columnspan" => layout.columnspan = Some(span(element, key, raw)?),
            "side" => layout.side = Some(Side::parse(raw).ok_or_else(invalid)?),
            "sticky" => layout.sticky = Some(Sticky::parse(raw).ok_or_else(invalid)?),
            "fill" => layout.fill = Some(Fill::parse(raw).ok_or_else(invalid)?),
            "expand" => layout.expand = Some(boolean(element, raw)?),
            _ => remaining.push((key, raw)),
        }
    }

    Ok((layout, remaining))
}

/// An element whose placement hints were extracted
///
/// Created once per element so that extraction happens exactly once.
#[derive(Clone, Debug)]
pub struct Prepared<'a> {
    pub element: &'a Element,
    pub layout: LayoutAttributes,
    attributes: Vec<(&'a str, &'a str)>,
}

impl<'a> Prepared<'a> {
    pub fn new(element: &'a Element) -> Result<Self, Error> {
        let (layout, attributes) = extract(element)?;
        Ok(Self {
            element,
            layout,
            attributes,
        })
    }

    pub fn tag(&self) -> &'a str {
        &self.element.tag
    }

    /// Attributes left for the converter
    pub fn attributes(&self) -> &[(&'a str, &'a str)] {
        &self.attributes
    }

    /// Removes a raw attribute before conversion
    pub fn take_raw(&mut self, key: &str) -> Option<&'a str> {
        let index = self.attributes.iter().position(|(k, _)| *k == key)?;
        Some(self.attributes.remove(index).1)
    }

    pub fn into_attributes(self) -> Vec<(&'a str, &'a str)> {
        self.attributes
    }
}
