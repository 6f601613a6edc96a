//! Layout engine: placing the children of a container
//!
//! - `V` stacks children top to bottom
//! - `H` stacks children left to right
//! - `Grid` places the children of each `Row` in successive rows, skipping
//!   cells claimed by spanning widgets of previous rows
//!
//! Stack children default to `expand="1" fill="both"`. Children which
//! produce no widget (commands) or a separate window take no room.

use crate::builder::{Builder, Product};
use crate::driver::Driver;
use crate::layout::{LayoutAttributes, Prepared, Side, GRID_KEYS, STACK_KEYS};
use crate::tags::{EMPTY, ROW};
use crate::toolkit::WidgetId;
use crate::value::Params;
use crate::xml::Element;
use crate::{error, Error};
use std::collections::HashSet;

/// Built-in layouts
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    Vertical,
    Horizontal,
    Grid,
}

impl Layout {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "V" => Some(Self::Vertical),
            "H" => Some(Self::Horizontal),
            "Grid" => Some(Self::Grid),
            _ => None,
        }
    }
}

/// Stretch weights given to every used row / column of a grid
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Weights {
    pub row: Option<u32>,
    pub column: Option<u32>,
}

impl Weights {
    pub fn is_empty(&self) -> bool {
        self.row.is_none() && self.column.is_none()
    }
}

/// Places the children of `container` (already built as `parent`)
pub fn lay_out(builder: &Builder, driver: &mut Driver, layout: Layout, container: &Element, parent: WidgetId, weights: Weights) -> Result<(), Error> {
    match layout {
        Layout::Vertical => stack(builder, driver, container, parent, Side::Top, weights),
        Layout::Horizontal => stack(builder, driver, container, parent, Side::Left, weights),
        Layout::Grid => grid(builder, driver, container, parent, weights),
    }
}

fn stack(builder: &Builder, driver: &mut Driver, container: &Element, parent: WidgetId, side: Side, weights: Weights) -> Result<(), Error> {
    if !weights.is_empty() {
        diag!(builder.options(), Warn, "{}: rowweight / columnweight only apply to grids", container.describe());
    }

    for child in container.children() {
        let child = Prepared::new(child)?;
        let layout = LayoutAttributes::stack_defaults().overridden_by(&child.layout);

        let misplaced = child.layout.specified(&GRID_KEYS);
        if !misplaced.is_empty() {
            diag!(builder.options(), Warn, "{}: {:?} ignored outside of a grid", child.element.describe(), misplaced);
        }

        if let Some(Product::Widget(widget)) = builder.dispatch(driver, child, parent)? {
            driver.toolkit_mut().pack(widget, layout.pack_options(side))?;
        }
    }

    Ok(())
}

/// Cells claimed by placed widgets, as `(column, row)`
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    cells: HashSet<(u32, u32)>,
}

impl Occupancy {
    /// Whether the whole span is free; `false` if it reaches past `u32::MAX`
    pub fn is_free(&self, column: u32, row: u32, columnspan: u32, rowspan: u32) -> bool {
        match (column.checked_add(columnspan), row.checked_add(rowspan)) {
            (Some(column_end), Some(row_end)) => {
                (column..column_end).all(|c| (row..row_end).all(|r| !self.cells.contains(&(c, r))))
            },
            _ => false,
        }
    }

    /// First column from `start` where the whole span is free
    ///
    /// `None` if the span can't fit before the last index.
    pub fn first_free(&self, start: u32, row: u32, columnspan: u32, rowspan: u32) -> Option<u32> {
        row.checked_add(rowspan)?;
        let mut column = start;
        loop {
            column.checked_add(columnspan)?;
            if self.is_free(column, row, columnspan, rowspan) {
                return Some(column);
            }
            column = column.checked_add(1)?;
        }
    }

    /// Marks the span as taken; ends are clamped to `u32::MAX`
    pub fn claim(&mut self, column: u32, row: u32, columnspan: u32, rowspan: u32) {
        for c in column..column.saturating_add(columnspan) {
            for r in row..row.saturating_add(rowspan) {
                self.cells.insert((c, r));
            }
        }
    }
}

fn grid(builder: &Builder, driver: &mut Driver, container: &Element, parent: WidgetId, weights: Weights) -> Result<(), Error> {
    let mut occupancy = Occupancy::default();
    let (mut max_row, mut max_column) = (0, 0);
    let mut row = 0;

    for child in container.children() {
        if builder.is_command(child.tag()) {
            builder.dispatch(driver, Prepared::new(child)?, parent)?;
            continue;
        }

        if child.tag() != ROW {
            return Err(error!(
                MalformedElement,
                "{} is a direct child of grid container {}; wrap it in a <{}>",
                child.describe(),
                container.describe(),
                ROW,
            ));
        }

        let mut column = 0;
        for cell in child.children() {
            let cell = Prepared::new(cell)?;
            let (source, layout) = (cell.element, cell.layout);

            let misplaced = layout.specified(&STACK_KEYS);
            if !misplaced.is_empty() {
                diag!(builder.options(), Warn, "{}: {:?} ignored in a grid", source.describe(), misplaced);
            }

            let widget = match cell.tag() {
                EMPTY => None,
                _ => match builder.dispatch(driver, cell, parent)? {
                    Some(Product::Widget(widget)) => Some(widget),
                    _ => continue,
                },
            };

            let (rowspan, columnspan) = (layout.rowspan(), layout.columnspan());
            column = match occupancy.first_free(column, row, columnspan, rowspan) {
                Some(column) => column,
                None => return Err(error!(MalformedElement, "{} doesn't fit in grid {}", source.describe(), container.describe())),
            };
            occupancy.claim(column, row, columnspan, rowspan);
            diag!(builder.options(), Trace, "{} takes row {} column {}", source.describe(), row, column);

            if let Some(widget) = widget {
                driver.toolkit_mut().grid(widget, layout.grid_options(row, column))?;
            }

            max_row = max_row.max(row);
            max_column = max_column.max(column);
        }

        row += 1;
    }

    // index 0 is configured even when no cell was placed
    if let Some(weight) = weights.row {
        for index in 0..=max_row {
            let params = Params::new().with("weight", weight as i64);
            driver.toolkit_mut().configure_row(parent, index, params)?;
        }
    }

    if let Some(weight) = weights.column {
        for index in 0..=max_column {
            let params = Params::new().with("weight", weight as i64);
            driver.toolkit_mut().configure_column(parent, index, params)?;
        }
    }

    Ok(())
}
