//! A toolkit which records what it's asked to do
//!
//! Useful to inspect what a markup document builds without a display, and
//! to test hosts.

use crate::driver::Callback;
use crate::toolkit::{GridOptions, ImageId, PackOptions, Toolkit, WidgetId, WidgetKind};
use crate::value::Params;
use crate::{error, Error};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    Pack(PackOptions),
    Grid(GridOptions),
    Tab(String),
}

/// Everything recorded about one widget
#[derive(Clone, Debug)]
pub struct PlannedWidget {
    pub kind: WidgetKind,
    pub parent: Option<WidgetId>,
    pub params: Params,
    pub children: Vec<WidgetId>,
    pub placement: Option<Placement>,
    pub tooltip: Option<String>,
    pub enabled: bool,
    pub destroyed: bool,
    pub bindings: Vec<(String, Callback)>,
    pub title: Option<String>,
    pub geometry: Option<String>,
}

impl PlannedWidget {
    fn new(kind: WidgetKind, parent: Option<WidgetId>, params: Params) -> Self {
        Self {
            kind,
            parent,
            params,
            children: Vec::new(),
            placement: None,
            tooltip: None,
            enabled: true,
            destroyed: false,
            bindings: Vec::new(),
            title: None,
            geometry: None,
        }
    }
}

/// Recording [`Toolkit`]; widget `#0` is the root window
#[derive(Debug)]
pub struct Plan {
    widgets: Vec<PlannedWidget>,
    rows: BTreeMap<(WidgetId, u32), Params>,
    columns: BTreeMap<(WidgetId, u32), Params>,
    headings: Vec<(WidgetId, String, Params)>,
    table_columns: Vec<(WidgetId, String, Params)>,
    styles: HashMap<String, Params>,
    images: Vec<Params>,
    toggles: Vec<(WidgetId, bool)>,
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

impl Plan {
    pub fn new() -> Self {
        Self {
            widgets: vec![PlannedWidget::new(WidgetKind::Toplevel, None, Params::new())],
            rows: BTreeMap::new(),
            columns: BTreeMap::new(),
            headings: Vec::new(),
            table_columns: Vec::new(),
            styles: HashMap::new(),
            images: Vec::new(),
            toggles: Vec::new(),
        }
    }

    /// A plan ready to be handed to [`crate::Driver::new`]
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn root(&self) -> WidgetId {
        WidgetId(0)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn widget(&self, id: WidgetId) -> Option<&PlannedWidget> {
        self.widgets.get(id.0 as usize)
    }

    fn widget_mut(&mut self, id: WidgetId) -> Result<&mut PlannedWidget, Error> {
        match self.widgets.get_mut(id.0 as usize) {
            Some(widget) if !widget.destroyed => Ok(widget),
            _ => Err(error!(RuntimeReference, "No live widget {}", id)),
        }
    }

    pub fn kind(&self, id: WidgetId) -> Option<&WidgetKind> {
        self.widget(id).map(|w| &w.kind)
    }

    pub fn params(&self, id: WidgetId) -> Option<&Params> {
        self.widget(id).map(|w| &w.params)
    }

    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.widget(id).map(|w| w.children.as_slice()).unwrap_or(&[])
    }

    pub fn placement(&self, id: WidgetId) -> Option<&Placement> {
        self.widget(id).and_then(|w| w.placement.as_ref())
    }

    pub fn tooltip(&self, id: WidgetId) -> Option<&str> {
        self.widget(id).and_then(|w| w.tooltip.as_deref())
    }

    pub fn enabled(&self, id: WidgetId) -> Option<bool> {
        self.widget(id).map(|w| w.enabled)
    }

    pub fn is_destroyed(&self, id: WidgetId) -> bool {
        self.widget(id).map(|w| w.destroyed).unwrap_or(true)
    }

    pub fn bindings(&self, id: WidgetId) -> &[(String, Callback)] {
        self.widget(id).map(|w| w.bindings.as_slice()).unwrap_or(&[])
    }

    /// The `command` a widget was created with
    pub fn command(&self, id: WidgetId) -> Option<Callback> {
        self.params(id)?.get("command")?.as_command().cloned()
    }

    /// The window containing `id` (possibly `id` itself)
    pub fn window_of(&self, id: WidgetId) -> WidgetId {
        let mut current = id;
        while let Some(widget) = self.widget(current) {
            match (&widget.kind, widget.parent) {
                (WidgetKind::Toplevel, _) | (_, None) => break,
                (_, Some(parent)) => current = parent,
            }
        }
        current
    }

    pub fn title(&self, window: WidgetId) -> Option<&str> {
        self.widget(window).and_then(|w| w.title.as_deref())
    }

    pub fn geometry(&self, window: WidgetId) -> Option<&str> {
        self.widget(window).and_then(|w| w.geometry.as_deref())
    }

    pub fn row_config(&self, container: WidgetId, index: u32) -> Option<&Params> {
        self.rows.get(&(container, index))
    }

    pub fn column_config(&self, container: WidgetId, index: u32) -> Option<&Params> {
        self.columns.get(&(container, index))
    }

    /// Configured row indices of `container`
    pub fn configured_rows(&self, container: WidgetId) -> Vec<u32> {
        self.rows.keys().filter(|(c, _)| *c == container).map(|(_, i)| *i).collect()
    }

    /// Configured column indices of `container`
    pub fn configured_columns(&self, container: WidgetId) -> Vec<u32> {
        self.columns.keys().filter(|(c, _)| *c == container).map(|(_, i)| *i).collect()
    }

    pub fn headings(&self, table: WidgetId) -> impl Iterator<Item = (&str, &Params)> {
        self.headings.iter().filter(move |(t, _, _)| *t == table).map(|(_, name, params)| (name.as_str(), params))
    }

    pub fn table_columns(&self, table: WidgetId) -> impl Iterator<Item = (&str, &Params)> {
        self.table_columns.iter().filter(move |(t, _, _)| *t == table).map(|(_, name, params)| (name.as_str(), params))
    }

    pub fn style(&self, name: &str) -> Option<&Params> {
        self.styles.get(name)
    }

    /// Every `set_enabled` call, in order
    pub fn toggles(&self) -> &[(WidgetId, bool)] {
        &self.toggles
    }

    pub fn image(&self, image: ImageId) -> Option<&Params> {
        self.images.get(image.0 as usize)
    }

    /// Live widgets of `kind`, in creation order
    pub fn find(&self, kind: &WidgetKind) -> Vec<WidgetId> {
        let iter = self.widgets.iter().enumerate();
        iter.filter(|(_, w)| !w.destroyed && w.kind == *kind).map(|(i, _)| WidgetId(i as u32)).collect()
    }

    fn render_widget(&self, output: &mut String, id: WidgetId, depth: usize) {
        let widget = match self.widget(id) {
            Some(widget) if !widget.destroyed => widget,
            _ => return,
        };

        let _ = write!(output, "{:indent$}{} {}", "", id, widget.kind, indent = depth * 4);
        for (key, value) in widget.params.iter() {
            let _ = write!(output, " {}={:?}", key, value.to_string());
        }

        match &widget.placement {
            Some(Placement::Pack(options)) => { let _ = write!(output, " [{}]", options); },
            Some(Placement::Grid(options)) => { let _ = write!(output, " [{}]", options); },
            Some(Placement::Tab(label)) => { let _ = write!(output, " [tab {:?}]", label); },
            None => (),
        }

        if let Some(title) = &widget.title {
            let _ = write!(output, " title={:?}", title);
        }

        if let Some(tooltip) = &widget.tooltip {
            let _ = write!(output, " tooltip={:?}", tooltip);
        }

        if !widget.enabled {
            output.push_str(" (disabled)");
        }

        output.push('\n');

        for (event, callback) in &widget.bindings {
            let _ = writeln!(output, "{:indent$}bind {} -> {:?}", "", event, callback, indent = depth * 4 + 4);
        }

        for child in &widget.children {
            self.render_widget(output, *child, depth + 1);
        }
    }

    /// Indented dump of the widget tree
    pub fn render(&self) -> String {
        let mut output = String::new();
        self.render_widget(&mut output, self.root(), 0);

        for ((container, index), params) in &self.rows {
            let _ = writeln!(output, "row {} of {}: {}", index, container, crate::Value::Record(params.clone()));
        }

        for ((container, index), params) in &self.columns {
            let _ = writeln!(output, "column {} of {}: {}", index, container, crate::Value::Record(params.clone()));
        }

        let mut styles: Vec<_> = self.styles.iter().collect();
        styles.sort_by(|a, b| a.0.cmp(b.0));
        for (name, params) in styles {
            let _ = writeln!(output, "style {}: {}", name, crate::Value::Record(params.clone()));
        }

        output
    }

    fn descendants(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut stack = self.children(id).to_vec();
        let mut found = Vec::new();
        while let Some(current) = stack.pop() {
            stack.extend_from_slice(self.children(current));
            found.push(current);
        }
        found
    }
}

impl Toolkit for Plan {
    fn create(&mut self, kind: &WidgetKind, parent: WidgetId, params: Params) -> Result<WidgetId, Error> {
        let id = WidgetId(self.widgets.len() as u32);
        self.widget_mut(parent)?.children.push(id);
        self.widgets.push(PlannedWidget::new(kind.clone(), Some(parent), params));
        Ok(id)
    }

    fn pack(&mut self, widget: WidgetId, options: PackOptions) -> Result<(), Error> {
        self.widget_mut(widget)?.placement = Some(Placement::Pack(options));
        Ok(())
    }

    fn grid(&mut self, widget: WidgetId, options: GridOptions) -> Result<(), Error> {
        self.widget_mut(widget)?.placement = Some(Placement::Grid(options));
        Ok(())
    }

    fn configure_row(&mut self, container: WidgetId, index: u32, params: Params) -> Result<(), Error> {
        self.widget_mut(container)?;
        let config = self.rows.entry((container, index)).or_default();
        for (key, value) in params.iter() {
            config.insert(key, value.clone());
        }
        Ok(())
    }

    fn configure_column(&mut self, container: WidgetId, index: u32, params: Params) -> Result<(), Error> {
        self.widget_mut(container)?;
        let config = self.columns.entry((container, index)).or_default();
        for (key, value) in params.iter() {
            config.insert(key, value.clone());
        }
        Ok(())
    }

    fn set_title(&mut self, widget: WidgetId, title: &str) -> Result<(), Error> {
        let window = self.window_of(widget);
        self.widget_mut(window)?.title = Some(title.into());
        Ok(())
    }

    fn set_geometry(&mut self, widget: WidgetId, geometry: &str) -> Result<(), Error> {
        let window = self.window_of(widget);
        self.widget_mut(window)?.geometry = Some(geometry.into());
        Ok(())
    }

    fn configure_heading(&mut self, table: WidgetId, column: &str, params: Params) -> Result<(), Error> {
        self.widget_mut(table)?;
        self.headings.push((table, column.into(), params));
        Ok(())
    }

    fn configure_table_column(&mut self, table: WidgetId, column: &str, params: Params) -> Result<(), Error> {
        self.widget_mut(table)?;
        self.table_columns.push((table, column.into(), params));
        Ok(())
    }

    fn bind(&mut self, widget: WidgetId, event: &str, callback: Callback) -> Result<(), Error> {
        self.widget_mut(widget)?.bindings.push((event.into(), callback));
        Ok(())
    }

    fn configure_style(&mut self, name: &str, params: Params) -> Result<(), Error> {
        self.styles.insert(name.into(), params);
        Ok(())
    }

    fn create_image(&mut self, params: Params) -> Result<ImageId, Error> {
        self.images.push(params);
        Ok(ImageId(self.images.len() as u32 - 1))
    }

    fn add_tab(&mut self, notebook: WidgetId, child: WidgetId, label: &str) -> Result<(), Error> {
        if self.widget_mut(child)?.parent != Some(notebook) {
            return Err(error!(RuntimeReference, "{} isn't a child of notebook {}", child, notebook));
        }

        self.widget_mut(child)?.placement = Some(Placement::Tab(label.into()));
        Ok(())
    }

    fn attach_tooltip(&mut self, widget: WidgetId, text: &str) -> Result<(), Error> {
        self.widget_mut(widget)?.tooltip = Some(text.into());
        Ok(())
    }

    fn set_enabled(&mut self, widget: WidgetId, enabled: bool) -> Result<(), Error> {
        let frame = self.widget_mut(widget)?;
        if frame.kind != WidgetKind::ToggleFrame {
            return Err(error!(RuntimeReference, "{} ({}) can't be enabled or disabled", widget, frame.kind));
        }

        frame.enabled = enabled;
        self.toggles.push((widget, enabled));
        for descendant in self.descendants(widget) {
            self.widget_mut(descendant)?.enabled = enabled;
        }
        Ok(())
    }

    fn destroy(&mut self, widget: WidgetId) -> Result<(), Error> {
        self.widget_mut(widget)?.destroyed = true;
        for descendant in self.descendants(widget) {
            self.widget_mut(descendant)?.destroyed = true;
        }
        Ok(())
    }
}
