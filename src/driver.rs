//! The host object a markup tree is built for
//!
//! A [`Driver`] owns the registry of identified things, the callbacks the
//! markup can name, and the hooks to run once the tree is complete.

use crate::registry::{Entry, Registry};
use crate::toolkit::{Toolkit, WidgetId};
use crate::value::{parse_dict, Params, Value};
use crate::{error, Error};
use core::fmt;
use core::ops::Index;
use std::cell::{RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

/// A host-provided callback
pub type Method = Rc<dyn Fn(&mut Driver) -> Result<(), Error>>;

/// Something markup can ask to be called
#[derive(Clone)]
pub enum Callback {
    /// A driver method, looked up by name when the callback fires
    Method(String),
    /// A markup-declared reaction (`command="@name=..."`)
    Virtual(Rc<VirtualMethod>),
    Native(Method),
}

impl Callback {
    pub fn native<F: Fn(&mut Driver) -> Result<(), Error> + 'static>(f: F) -> Self {
        Self::Native(Rc::new(f))
    }

    pub fn invoke(&self, driver: &mut Driver) -> Result<(), Error> {
        match self {
            Self::Method(name) => driver.call(name),
            Self::Virtual(method) => method.run(driver),
            Self::Native(f) => f(driver),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(name) => write!(f, "Method({})", name),
            Self::Virtual(method) => write!(f, "Virtual({:?})", method),
            Self::Native(_) => f.write_str("Native"),
        }
    }
}

/// Reactions declared directly in markup
#[derive(Clone, Debug, PartialEq)]
pub enum VirtualMethod {
    /// Enables `widget` when `variable` holds `onvalue`, disables it when
    /// it holds `offvalue`, and leaves it alone otherwise.
    SetToggle {
        widget: String,
        variable: String,
        onvalue: Value,
        offvalue: Value,
    },
}

impl VirtualMethod {
    /// Parses the text after `@`: `name=set_toggle;widget=w;variable=v;...`
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut record = parse_dict(text);
        let name = required(&mut record, "name", text)?.to_string();

        match name.as_str() {
            "set_toggle" => Ok(Self::SetToggle {
                widget: required(&mut record, "widget", text)?.to_string(),
                variable: required(&mut record, "variable", text)?.to_string(),
                onvalue: required(&mut record, "onvalue", text)?,
                offvalue: required(&mut record, "offvalue", text)?,
            }),
            other => Err(error!(InvalidElement, "Unknown virtual method {:?} in {:?}", other, text)),
        }
    }

    pub fn run(&self, driver: &mut Driver) -> Result<(), Error> {
        match self {
            Self::SetToggle { widget, variable, onvalue, offvalue } => {
                let current = driver.registry.variable(variable)?.get().to_string();
                let target = driver.registry.widget(widget)?;

                if current == onvalue.to_string() {
                    driver.toolkit_mut().set_enabled(target, true)
                } else if current == offvalue.to_string() {
                    driver.toolkit_mut().set_enabled(target, false)
                } else {
                    Ok(())
                }
            },
        }
    }
}

fn required(record: &mut Params, key: &str, text: &str) -> Result<Value, Error> {
    record.take(key).ok_or_else(|| error!(MalformedElement, "Virtual method {:?} lacks {:?}", text, key))
}

/// State shared by the builder and the host's callbacks
pub struct Driver {
    toolkit: Rc<RefCell<dyn Toolkit>>,
    container: WidgetId,
    registry: Registry,
    on_init: Vec<Callback>,
    watchers: Vec<Callback>,
    methods: HashMap<String, Method>,
    attributes: HashMap<String, Entry>,
    init: Option<Method>,
    on_close: Option<Method>,
}

impl Driver {
    /// A driver whose tree will be placed in `container`
    pub fn new(toolkit: Rc<RefCell<dyn Toolkit>>, container: WidgetId) -> Self {
        Self {
            toolkit,
            container,
            registry: Registry::new(),
            on_init: Vec::new(),
            watchers: Vec::new(),
            methods: HashMap::new(),
            attributes: HashMap::new(),
            init: None,
            on_close: None,
        }
    }

    pub fn container(&self) -> WidgetId {
        self.container
    }

    pub fn toolkit(&self) -> Rc<RefCell<dyn Toolkit>> {
        self.toolkit.clone()
    }

    /// Panics if the toolkit is already borrowed
    pub fn toolkit_mut(&self) -> RefMut<'_, dyn Toolkit + 'static> {
        self.toolkit.borrow_mut()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Pre-declares an identifier, e.g. a variable created by the host
    pub fn declare<I: Into<String>, E: Into<Entry>>(&mut self, id: I, entry: E) -> Result<(), Error> {
        self.registry.register(id, entry)
    }

    pub fn lookup(&self, id: &str) -> Result<&Entry, Error> {
        self.registry.lookup(id)
    }

    /// Defines a method markup can name in `command` attributes
    pub fn define<F>(&mut self, name: &str, method: F) -> &mut Self
    where
        F: Fn(&mut Driver) -> Result<(), Error> + 'static,
    {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    /// Calls the method defined as `name`
    pub fn call(&mut self, name: &str) -> Result<(), Error> {
        let method = match self.methods.get(name) {
            Some(method) => method.clone(),
            None => return Err(error!(RuntimeReference, "Attempted to call undefined method {:?} on the driver", name)),
        };

        method(self)
    }

    /// Exposes something `<GetVar python="...">` can fetch
    pub fn expose<N: Into<String>, E: Into<Entry>>(&mut self, name: N, entry: E) -> &mut Self {
        self.attributes.insert(name.into(), entry.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Entry> {
        self.attributes.get(name)
    }

    /// Sets the method called after the init hooks
    pub fn on_init<F: Fn(&mut Driver) -> Result<(), Error> + 'static>(&mut self, method: F) -> &mut Self {
        self.init = Some(Rc::new(method));
        self
    }

    /// Sets the method called by [`Driver::close`]
    pub fn on_close<F: Fn(&mut Driver) -> Result<(), Error> + 'static>(&mut self, method: F) -> &mut Self {
        self.on_close = Some(Rc::new(method));
        self
    }

    /// Queues `hook` to run once the tree is built
    pub fn defer(&mut self, hook: Callback) {
        self.on_init.push(hook);
    }

    /// Queues `watcher` like [`Driver::defer`] and keeps it for
    /// [`Driver::refresh_watchers`]
    pub fn watch(&mut self, watcher: Callback) {
        self.on_init.push(watcher.clone());
        self.watchers.push(watcher);
    }

    pub fn pending_hooks(&self) -> usize {
        self.on_init.len()
    }

    /// Runs each queued hook once, in order, then the init method
    ///
    /// The queue is emptied even if a hook fails.
    pub fn run_init_hooks(&mut self) -> Result<(), Error> {
        for hook in core::mem::take(&mut self.on_init) {
            hook.invoke(self)?;
        }

        match self.init.clone() {
            Some(init) => init(self),
            None => Ok(()),
        }
    }

    /// Runs every watcher again, e.g. after the host changed a variable
    pub fn refresh_watchers(&mut self) -> Result<(), Error> {
        for watcher in self.watchers.clone() {
            watcher.invoke(self)?;
        }

        Ok(())
    }

    /// Calls the close method, destroys the container and forgets
    /// everything the markup declared.
    pub fn close(&mut self) -> Result<(), Error> {
        if let Some(on_close) = self.on_close.clone() {
            on_close(self)?;
        }

        self.toolkit_mut().destroy(self.container)?;
        self.registry.clear();
        self.on_init.clear();
        self.watchers.clear();
        Ok(())
    }
}

/// Panics on unknown identifiers; see [`Driver::lookup`]
impl Index<&str> for Driver {
    type Output = Entry;

    fn index(&self, id: &str) -> &Entry {
        match self.registry.get(id) {
            Some(entry) => entry,
            None => panic!("Unknown identifier {:?}", id),
        }
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("container", &self.container)
            .field("registry", &self.registry)
            .field("on_init", &self.on_init)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}
