//! Element dispatcher & build orchestration

use crate::commands;
use crate::convert::{convert, strip_reserved, take_id};
use crate::driver::Driver;
use crate::engine::{lay_out, Layout, Weights};
use crate::layout::{LayoutAttributes, Prepared, Side};
use crate::registry::Variable;
use crate::tags::{Branching, Command, Terminal};
use crate::toolkit::{Toolkit, WidgetId, WidgetKind};
use crate::value::{Params, Value};
use crate::xml::{Document, Element};
use crate::{error, Error};
use log::{Level, LevelFilter};
use std::collections::HashMap;

/// Creates a widget for a custom terminal or branching tag
pub type WidgetFactory = fn(toolkit: &mut dyn Toolkit, parent: WidgetId, params: Params) -> Result<WidgetId, Error>;

/// Runs a custom command element against `parent`
pub type CommandHandler = fn(builder: &Builder, driver: &mut Driver, element: &Element, parent: WidgetId) -> Result<(), Error>;

/// Places the children of `element`, already built as `parent`
pub type LayoutHandler = fn(builder: &Builder, driver: &mut Driver, element: &Element, parent: WidgetId) -> Result<(), Error>;

/// What dispatching an element yields
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Product {
    /// Must be placed in its parent
    Widget(WidgetId),
    /// A separate window; not placed
    Window(WidgetId),
}

#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Most verbose level the builder logs at
    pub verbosity: LevelFilter,
    /// Layout of containers without a `layout` attribute
    pub default_layout: String,
}

impl BuildOptions {
    pub fn traces(&self, level: Level) -> bool {
        level <= self.verbosity
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            verbosity: LevelFilter::Warn,
            default_layout: "V".into(),
        }
    }
}

enum Factory {
    Builtin(WidgetKind),
    Custom(WidgetFactory),
}

impl Factory {
    fn create(&self, driver: &Driver, parent: WidgetId, params: Params) -> Result<WidgetId, Error> {
        let mut toolkit = driver.toolkit_mut();
        match self {
            Self::Builtin(kind) => toolkit.create(kind, parent, params),
            Self::Custom(factory) => factory(&mut *toolkit, parent, params),
        }
    }
}

enum Class {
    Terminal(Factory),
    Table,
    OptionMenu,
    Command(Command),
    CustomCommand(CommandHandler),
    Branching(Factory),
    Notebook,
}

enum ContainerLayout {
    Builtin(Layout),
    Custom(LayoutHandler),
}

/// Turns markup into widgets
///
/// Built-in tags are listed in [`crate::tags`]. Integrators can add
/// terminal, command and branching tags, and layouts; tag names are
/// looked up in this order: terminal, command, branching. Custom entries
/// take precedence over built-in ones of the same class.
pub struct Builder {
    terminals: HashMap<String, WidgetFactory>,
    commands: HashMap<String, CommandHandler>,
    branching: HashMap<String, WidgetFactory>,
    layouts: HashMap<String, LayoutHandler>,
    options: BuildOptions,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::with_options(BuildOptions::default())
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            terminals: HashMap::new(),
            commands: HashMap::new(),
            branching: HashMap::new(),
            layouts: HashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn add_terminal(&mut self, tag: &str, factory: WidgetFactory) -> &mut Self {
        self.terminals.insert(tag.into(), factory);
        self
    }

    pub fn add_command(&mut self, tag: &str, handler: CommandHandler) -> &mut Self {
        self.commands.insert(tag.into(), handler);
        self
    }

    pub fn add_branching(&mut self, tag: &str, factory: WidgetFactory) -> &mut Self {
        self.branching.insert(tag.into(), factory);
        self
    }

    pub fn add_layout(&mut self, name: &str, handler: LayoutHandler) -> &mut Self {
        self.layouts.insert(name.into(), handler);
        self
    }

    fn classify(&self, tag: &str) -> Option<Class> {
        if let Some(factory) = self.terminals.get(tag) {
            return Some(Class::Terminal(Factory::Custom(*factory)));
        }

        match Terminal::from_tag(tag) {
            Some(Terminal::Plain(kind)) => return Some(Class::Terminal(Factory::Builtin(kind))),
            Some(Terminal::Table) => return Some(Class::Table),
            Some(Terminal::OptionMenu) => return Some(Class::OptionMenu),
            None => (),
        }

        if let Some(handler) = self.commands.get(tag) {
            return Some(Class::CustomCommand(*handler));
        }

        if let Some(command) = Command::from_tag(tag) {
            return Some(Class::Command(command));
        }

        if let Some(factory) = self.branching.get(tag) {
            return Some(Class::Branching(Factory::Custom(*factory)));
        }

        match Branching::from_tag(tag)? {
            Branching::Container(kind) => Some(Class::Branching(Factory::Builtin(kind))),
            Branching::Notebook => Some(Class::Notebook),
        }
    }

    /// Whether `tag` names a command element
    pub fn is_command(&self, tag: &str) -> bool {
        matches!(self.classify(tag), Some(Class::Command(_) | Class::CustomCommand(_)))
    }

    /// Builds one element under `parent`
    ///
    /// Commands yield `None`; containers are built with their subtree.
    /// Placing the product in `parent` is up to the caller.
    pub fn dispatch(&self, driver: &mut Driver, element: Prepared<'_>, parent: WidgetId) -> Result<Option<Product>, Error> {
        let source = element.element;
        diag!(self.options, Trace, "dispatching {} under {}", source.describe(), parent);

        let class = match self.classify(source.tag()) {
            Some(class) => class,
            None => return Err(error!(InvalidElement, "Unknown element {}", source.describe())),
        };

        match class {
            Class::Terminal(factory) => self.terminal(driver, element, parent, factory).map(|w| Some(Product::Widget(w))),
            Class::Table => self.table(driver, element, parent).map(|w| Some(Product::Widget(w))),
            Class::OptionMenu => self.option_menu(driver, element, parent).map(|w| Some(Product::Widget(w))),
            Class::Command(command) => commands::run(self, driver, element, parent, command).map(|_| None),
            Class::CustomCommand(handler) => handler(self, driver, source, parent).map(|_| None),
            Class::Branching(factory) => self.branching(driver, element, parent, factory).map(Some),
            Class::Notebook => self.notebook(driver, element, parent).map(|w| Some(Product::Widget(w))),
        }
    }

    /// Registers `widget` under `id` and attaches the tooltip
    fn finish(&self, driver: &mut Driver, source: &Element, widget: WidgetId, id: Option<String>, tooltip: Option<Value>) -> Result<(), Error> {
        if let Some(id) = id {
            diag!(self.options, Debug, "{} registered as {:?}", source.describe(), id);
            driver.registry_mut().register(id, widget).map_err(|e| e.within(source))?;
        }

        if let Some(tooltip) = tooltip {
            driver.toolkit_mut().attach_tooltip(widget, &tooltip.to_string())?;
        }

        Ok(())
    }

    fn terminal(&self, driver: &mut Driver, element: Prepared<'_>, parent: WidgetId, factory: Factory) -> Result<WidgetId, Error> {
        let source = element.element;
        let mut params = convert(&self.options, driver, source, element.into_attributes())?;
        let id = take_id(&mut params);
        let tooltip = params.take("tooltip");
        strip_reserved(&self.options, source, &mut params);

        let widget = factory.create(driver, parent, params)?;
        diag!(self.options, Debug, "{} built as {}", source.describe(), widget);
        self.finish(driver, source, widget, id, tooltip)?;
        Ok(widget)
    }

    fn table(&self, driver: &mut Driver, element: Prepared<'_>, parent: WidgetId) -> Result<WidgetId, Error> {
        let source = element.element;
        let table = self.terminal(driver, element, parent, Factory::Builtin(WidgetKind::Table))?;

        for child in source.children() {
            if !self.is_command(child.tag()) {
                return Err(error!(MalformedElement, "{} can only contain commands, found {}", source.describe(), child.describe()));
            }

            self.dispatch(driver, Prepared::new(child)?, table)?;
        }

        Ok(table)
    }

    fn option_menu(&self, driver: &mut Driver, element: Prepared<'_>, parent: WidgetId) -> Result<WidgetId, Error> {
        let source = element.element;
        let mut params = convert(&self.options, driver, source, element.into_attributes())?;
        let id = take_id(&mut params);
        let tooltip = params.take("tooltip");

        let options = match params.take("options") {
            Some(Value::List(options)) if !options.is_empty() => options,
            _ => return Err(error!(MalformedElement, "{} requires an options list", source.describe())),
        };

        let variable: Variable = match params.take("textvariable") {
            Some(Value::Variable(var)) => var,
            _ => return Err(error!(MalformedElement, "{} requires a textvariable", source.describe())),
        };

        let default = options[0].clone();
        variable.set(default.clone()).map_err(|e| e.within(source))?;

        params.insert("textvariable", Value::Variable(variable));
        params.insert("default", default);
        params.insert("options", Value::List(options));
        strip_reserved(&self.options, source, &mut params);

        let widget = Factory::Builtin(WidgetKind::OptionMenu).create(driver, parent, params)?;
        self.finish(driver, source, widget, id, tooltip)?;
        Ok(widget)
    }

    fn container_layout(&self, source: &Element, name: &str) -> Result<ContainerLayout, Error> {
        if let Some(handler) = self.layouts.get(name) {
            return Ok(ContainerLayout::Custom(*handler));
        }

        match Layout::from_name(name) {
            Some(layout) => Ok(ContainerLayout::Builtin(layout)),
            None => Err(error!(MalformedElement, "Unknown layout {:?} on {}", name, source.describe())),
        }
    }

    fn branching(&self, driver: &mut Driver, element: Prepared<'_>, parent: WidgetId, factory: Factory) -> Result<Product, Error> {
        let source = element.element;
        let mut params = convert(&self.options, driver, source, element.into_attributes())?;

        let layout = match params.take("layout") {
            Some(name) => name.to_string(),
            None => self.options.default_layout.clone(),
        };
        let layout = self.container_layout(source, &layout)?;

        let id = take_id(&mut params);
        let tooltip = params.take("tooltip");
        let weights = Weights {
            row: weight(&mut params, source, "rowweight")?,
            column: weight(&mut params, source, "columnweight")?,
        };
        strip_reserved(&self.options, source, &mut params);

        let window = matches!(factory, Factory::Builtin(WidgetKind::Toplevel));
        let widget = factory.create(driver, parent, params)?;
        diag!(self.options, Debug, "{} built as {}", source.describe(), widget);
        self.finish(driver, source, widget, id, tooltip)?;

        match layout {
            ContainerLayout::Builtin(layout) => lay_out(self, driver, layout, source, widget, weights)?,
            ContainerLayout::Custom(handler) => handler(self, driver, source, widget)?,
        }

        Ok(match window {
            true => Product::Window(widget),
            false => Product::Widget(widget),
        })
    }

    fn notebook(&self, driver: &mut Driver, element: Prepared<'_>, parent: WidgetId) -> Result<WidgetId, Error> {
        let source = element.element;
        let mut params = convert(&self.options, driver, source, element.into_attributes())?;
        if params.take("layout").is_some() {
            diag!(self.options, Warn, "{}: layout is ignored, children become tabs", source.describe());
        }

        let id = take_id(&mut params);
        let tooltip = params.take("tooltip");
        strip_reserved(&self.options, source, &mut params);
        let notebook = Factory::Builtin(WidgetKind::Notebook).create(driver, parent, params)?;
        self.finish(driver, source, notebook, id, tooltip)?;

        for child in source.children() {
            let mut child = Prepared::new(child)?;
            if self.is_command(child.tag()) {
                self.dispatch(driver, child, notebook)?;
                continue;
            }

            let label = child.take_raw("tabname").unwrap_or(child.tag()).to_string();
            match self.dispatch(driver, child, notebook)? {
                Some(Product::Widget(tab)) => driver.toolkit_mut().add_tab(notebook, tab, &label)?,
                Some(Product::Window(_)) | None => (),
            }
        }

        Ok(notebook)
    }

    /// Builds `root` and its subtree in the driver's container
    ///
    /// The root widget is packed with `expand="1" fill="both"` unless it
    /// says otherwise, then the driver's init hooks run. A root `Toplevel`
    /// or command stops the build there: nothing is packed and the hooks
    /// stay pending. Returns the packed root widget.
    pub fn build(&self, driver: &mut Driver, root: &Element) -> Result<Option<WidgetId>, Error> {
        if root.tag().is_empty() {
            return Err(error!(InvalidElement, "Expected an element, got one without a tag"));
        }

        let root = Prepared::new(root)?;
        let layout = LayoutAttributes::stack_defaults().overridden_by(&root.layout);
        let container = driver.container();

        let placed = match self.dispatch(driver, root, container)? {
            Some(Product::Widget(widget)) => widget,
            Some(Product::Window(_)) | None => {
                diag!(self.options, Debug, "root isn't placed; {} init hook(s) left pending", driver.pending_hooks());
                return Ok(None);
            },
        };

        driver.toolkit_mut().pack(placed, layout.pack_options(Side::Top))?;
        diag!(self.options, Debug, "running {} init hook(s)", driver.pending_hooks());
        driver.run_init_hooks()?;
        Ok(Some(placed))
    }

    /// Like [`Builder::build`], for the root of `document`
    pub fn build_document(&self, driver: &mut Driver, document: &Document) -> Result<Option<WidgetId>, Error> {
        match document.root() {
            Some(root) => self.build(driver, root),
            None => Err(error!(InvalidElement, "Expected an element, got a document without root")),
        }
    }

    #[cfg(feature = "xml")]
    pub fn build_from_str(&self, driver: &mut Driver, xml: &str) -> Result<Option<WidgetId>, Error> {
        self.build_document(driver, &Document::parse(xml)?)
    }

    #[cfg(feature = "xml")]
    pub fn build_from_file<P: AsRef<std::path::Path>>(&self, driver: &mut Driver, path: P) -> Result<Option<WidgetId>, Error> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|e| error!(Io, "{}: {}", path.display(), e))?;
        self.build_from_str(driver, &xml)
    }
}

fn weight(params: &mut Params, source: &Element, key: &str) -> Result<Option<u32>, Error> {
    match params.take(key) {
        None => Ok(None),
        Some(Value::Int(weight)) if weight <= u32::MAX as i64 => Ok(Some(weight as u32)),
        Some(other) => Err(error!(MalformedElement, "{} of {} must be an integer, got {:?}", key, source.describe(), other)),
    }
}

/// A parsed document, ready to be built any number of times
pub struct Template {
    document: Document,
    builder: Builder,
}

impl Template {
    pub fn new(document: Document, builder: Builder) -> Self {
        Self { document, builder }
    }

    #[cfg(feature = "xml")]
    pub fn parse(xml: &str, builder: Builder) -> Result<Self, Error> {
        Ok(Self::new(Document::parse(xml)?, builder))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    /// Builds a fresh copy of the tree for `driver`
    pub fn instantiate(&self, driver: &mut Driver) -> Result<Option<WidgetId>, Error> {
        self.builder.build_document(driver, &self.document)
    }
}
