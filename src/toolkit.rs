//! The GUI toolkit, as seen by the builder
//!
//! The builder never draws anything: it asks a [`Toolkit`] to create
//! widgets, place them and configure them. [`crate::plan::Plan`] is an
//! implementation which records these requests.

use crate::driver::Callback;
use crate::layout::{Fill, Side, Sticky};
use crate::value::Params;
use crate::Error;
use core::fmt;

/// Handle to a live widget (or window)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WidgetId(pub u32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to an image resource
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ImageId(pub u32);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image#{}", self.0)
    }
}

/// Kinds of widgets the builder can request
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Label,
    Button,
    Entry,
    Text,
    Checkbutton,
    Radiobutton,
    Spinbox,
    Combobox,
    Scale,
    /// Tree view with scrollbars; headings & columns are configured separately
    Table,
    /// Receives `textvariable`, `default` and `options` params
    OptionMenu,
    Frame,
    LabelFrame,
    /// Frame whose descendants can be enabled / disabled at once
    ToggleFrame,
    Notebook,
    /// A separate window
    Toplevel,
    /// Widgets registered by integrators
    Custom(String),
}

impl WidgetKind {
    pub fn name(&self) -> &str {
        match self {
            Self::Label => "Label",
            Self::Button => "Button",
            Self::Entry => "Entry",
            Self::Text => "Text",
            Self::Checkbutton => "Checkbutton",
            Self::Radiobutton => "Radiobutton",
            Self::Spinbox => "Spinbox",
            Self::Combobox => "Combobox",
            Self::Scale => "Scale",
            Self::Table => "Table",
            Self::OptionMenu => "OptionMenu",
            Self::Frame => "Frame",
            Self::LabelFrame => "LabelFrame",
            Self::ToggleFrame => "ToggleFrame",
            Self::Notebook => "Notebook",
            Self::Toplevel => "Toplevel",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Placement in a stacking container
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PackOptions {
    pub side: Side,
    pub fill: Fill,
    pub expand: bool,
}

impl fmt::Display for PackOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pack side={} fill={}", self.side, self.fill)?;
        if self.expand {
            f.write_str(" expand")?;
        }
        Ok(())
    }
}

/// Placement in a grid container
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridOptions {
    pub row: u32,
    pub column: u32,
    pub rowspan: u32,
    pub columnspan: u32,
    pub sticky: Sticky,
}

impl fmt::Display for GridOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "grid row={} column={}", self.row, self.column)?;
        if self.rowspan != 1 {
            write!(f, " rowspan={}", self.rowspan)?;
        }
        if self.columnspan != 1 {
            write!(f, " columnspan={}", self.columnspan)?;
        }
        if !self.sticky.is_empty() {
            write!(f, " sticky={}", self.sticky)?;
        }
        Ok(())
    }
}

/// Operations the builder needs from a GUI toolkit
///
/// Window-level operations (`set_title`, `set_geometry`) receive any
/// widget and apply to the window containing it.
pub trait Toolkit {
    /// Creates a widget of `kind` under `parent`
    fn create(&mut self, kind: &WidgetKind, parent: WidgetId, params: Params) -> Result<WidgetId, Error>;

    fn pack(&mut self, widget: WidgetId, options: PackOptions) -> Result<(), Error>;

    fn grid(&mut self, widget: WidgetId, options: GridOptions) -> Result<(), Error>;

    fn configure_row(&mut self, container: WidgetId, index: u32, params: Params) -> Result<(), Error>;

    fn configure_column(&mut self, container: WidgetId, index: u32, params: Params) -> Result<(), Error>;

    fn set_title(&mut self, widget: WidgetId, title: &str) -> Result<(), Error>;

    /// `geometry` is a `WxH[+X+Y]` string
    fn set_geometry(&mut self, widget: WidgetId, geometry: &str) -> Result<(), Error>;

    fn configure_heading(&mut self, table: WidgetId, column: &str, params: Params) -> Result<(), Error>;

    fn configure_table_column(&mut self, table: WidgetId, column: &str, params: Params) -> Result<(), Error>;

    /// Calls `callback` when `event` (e.g. `<Double-1>`) occurs on `widget`
    fn bind(&mut self, widget: WidgetId, event: &str, callback: Callback) -> Result<(), Error>;

    /// Registers or updates the named style
    fn configure_style(&mut self, name: &str, params: Params) -> Result<(), Error>;

    fn create_image(&mut self, params: Params) -> Result<ImageId, Error>;

    fn add_tab(&mut self, notebook: WidgetId, child: WidgetId, label: &str) -> Result<(), Error>;

    /// Shows `text` when the cursor hovers `widget`
    fn attach_tooltip(&mut self, widget: WidgetId, text: &str) -> Result<(), Error>;

    /// Enables or disables every descendant of a toggle container
    fn set_enabled(&mut self, widget: WidgetId, enabled: bool) -> Result<(), Error>;

    /// Destroys `widget` and its descendants
    fn destroy(&mut self, widget: WidgetId) -> Result<(), Error>;
}
