//! Built-in markup vocabulary
//!
//! # Terminal tags
//!
//! Each produces one leaf widget: `Label`, `Button`, `Entry`, `Text`,
//! `Checkbutton`, `Radiobutton`, `Spinbox`, `Combobox`, `Scale`, `Table`
//! and `OptionMenu`.
//!
//! `Table` children must be commands (usually `Heading` and `Column`).
//! `OptionMenu` requires `options` and `textvariable`; the variable is set
//! to the first option.
//!
//! # Branching tags
//!
//! `Frame`, `LabelFrame`, `ToggleFrame`, `Notebook` and `Toplevel` contain
//! children, placed according to their `layout` attribute (`V`, `H` or
//! `Grid`, see [`crate::engine`]). `Toplevel` creates a separate window
//! which isn't placed in its parent.
//!
//! Every non-command child of a `Notebook` becomes a tab, labelled by its
//! `tabname` attribute or its tag.
//!
//! # Commands
//!
//! | Tag               | Text        | Effect                                            |
//! |-------------------|-------------|---------------------------------------------------|
//! | `RowConfigure`    | row index   | configures a row of the parent grid               |
//! | `ColumnConfigure` | column index| configures a column of the parent grid            |
//! | `Title`           | title       | sets the title of the window                      |
//! | `Geometry`        | `WxH+X+Y`   | sets the geometry of the window                   |
//! | `Heading`         | column name | configures a heading of the parent table          |
//! | `Column`          | column name | configures a column of the parent table           |
//! | `Bind`            | event       | calls `command` when the event occurs on the parent |
//! | `String`          |             | declares a string variable `id` set to `value`    |
//! | `Int`             |             | declares an integer variable `id` set to `value`  |
//! | `Style`           | style name  | configures a style                                |
//! | `PhotoImage`      |             | declares an image `id`                            |
//! | `GetVar`          |             | registers the driver attribute `python` as `id`   |
//!
//! # Structural tags
//!
//! `Row` groups the cells of a grid; `Empty` reserves a cell.

use crate::toolkit::WidgetKind;

pub const ROW: &str = "Row";
pub const EMPTY: &str = "Empty";

/// Built-in leaf widgets
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Terminal {
    Plain(WidgetKind),
    Table,
    OptionMenu,
}

impl Terminal {
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "Label" => Self::Plain(WidgetKind::Label),
            "Button" => Self::Plain(WidgetKind::Button),
            "Entry" => Self::Plain(WidgetKind::Entry),
            "Text" => Self::Plain(WidgetKind::Text),
            "Checkbutton" => Self::Plain(WidgetKind::Checkbutton),
            "Radiobutton" => Self::Plain(WidgetKind::Radiobutton),
            "Spinbox" => Self::Plain(WidgetKind::Spinbox),
            "Combobox" => Self::Plain(WidgetKind::Combobox),
            "Scale" => Self::Plain(WidgetKind::Scale),
            "Table" => Self::Table,
            "OptionMenu" => Self::OptionMenu,
            _ => return None,
        })
    }
}

/// Built-in containers
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Branching {
    /// `Frame`, `LabelFrame`, `ToggleFrame` or `Toplevel`
    Container(WidgetKind),
    Notebook,
}

impl Branching {
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "Frame" => Self::Container(WidgetKind::Frame),
            "LabelFrame" => Self::Container(WidgetKind::LabelFrame),
            "ToggleFrame" => Self::Container(WidgetKind::ToggleFrame),
            "Toplevel" => Self::Container(WidgetKind::Toplevel),
            "Notebook" => Self::Notebook,
            _ => return None,
        })
    }
}

/// Built-in commands
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    RowConfigure,
    ColumnConfigure,
    Heading,
    Column,
    Bind,
    String,
    Int,
    Style,
    PhotoImage,
    Title,
    Geometry,
    GetVar,
}

impl Command {
    pub const ALL: [Command; 12] = [
        Self::RowConfigure,
        Self::ColumnConfigure,
        Self::Heading,
        Self::Column,
        Self::Bind,
        Self::String,
        Self::Int,
        Self::Style,
        Self::PhotoImage,
        Self::Title,
        Self::Geometry,
        Self::GetVar,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::RowConfigure => "RowConfigure",
            Self::ColumnConfigure => "ColumnConfigure",
            Self::Heading => "Heading",
            Self::Column => "Column",
            Self::Bind => "Bind",
            Self::String => "String",
            Self::Int => "Int",
            Self::Style => "Style",
            Self::PhotoImage => "PhotoImage",
            Self::Title => "Title",
            Self::Geometry => "Geometry",
            Self::GetVar => "GetVar",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|command| command.tag() == tag)
    }
}
