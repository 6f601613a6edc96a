//! Command elements: side effects on the parent, no widget

use crate::builder::Builder;
use crate::convert::{convert, take_id};
use crate::driver::Driver;
use crate::layout::Prepared;
use crate::registry::{Variable, VariableKind};
use crate::tags::Command;
use crate::toolkit::WidgetId;
use crate::value::{Params, Value};
use crate::xml::Element;
use crate::{error, Error};

fn text(element: &Element) -> Result<&str, Error> {
    element.text().ok_or_else(|| error!(MalformedElement, "{} requires text content", element.describe()))
}

fn index(element: &Element) -> Result<u32, Error> {
    let raw = text(element)?;
    raw.parse().map_err(|_| error!(MalformedElement, "{} requires an index, got {:?}", element.describe(), raw))
}

fn required_id(params: &mut Params, element: &Element) -> Result<String, Error> {
    take_id(params).ok_or_else(|| error!(MalformedElement, "{} requires an id", element.describe()))
}

fn declare_variable(driver: &mut Driver, element: &Element, mut params: Params, kind: VariableKind) -> Result<(), Error> {
    let id = required_id(&mut params, element)?;
    let initial = match (params.take("value"), kind) {
        (Some(value), _) => value,
        (None, VariableKind::String) => Value::Str(String::new()),
        (None, VariableKind::Int) => Value::Int(0),
    };

    let variable = Variable::with_value(kind, initial.clone())
        .ok_or_else(|| error!(MalformedElement, "{} can't hold {:?}", element.describe(), initial))?;

    driver.registry_mut().register(id, variable).map_err(|e| e.within(element))
}

/// Runs a built-in command against `parent`
pub fn run(builder: &Builder, driver: &mut Driver, element: Prepared<'_>, parent: WidgetId, command: Command) -> Result<(), Error> {
    let source = element.element;
    let mut params = convert(builder.options(), driver, source, element.into_attributes())?;
    diag!(builder.options(), Debug, "{} on {}", source.describe(), parent);

    match command {
        Command::RowConfigure => {
            let row = index(source)?;
            driver.toolkit_mut().configure_row(parent, row, params)?;
        },
        Command::ColumnConfigure => {
            let column = index(source)?;
            driver.toolkit_mut().configure_column(parent, column, params)?;
        },
        Command::Title => driver.toolkit_mut().set_title(parent, text(source)?)?,
        Command::Geometry => driver.toolkit_mut().set_geometry(parent, text(source)?)?,
        Command::Heading => driver.toolkit_mut().configure_heading(parent, text(source)?, params)?,
        Command::Column => driver.toolkit_mut().configure_table_column(parent, text(source)?, params)?,
        Command::Bind => {
            let event = text(source)?;
            let callback = match params.take("command") {
                Some(Value::Command(callback)) => callback,
                _ => return Err(error!(MalformedElement, "{} requires a command", source.describe())),
            };

            driver.toolkit_mut().bind(parent, event, callback)?;
        },
        Command::String => declare_variable(driver, source, params, VariableKind::String)?,
        Command::Int => declare_variable(driver, source, params, VariableKind::Int)?,
        Command::Style => driver.toolkit_mut().configure_style(text(source)?, params)?,
        Command::PhotoImage => {
            let id = required_id(&mut params, source)?;
            let image = driver.toolkit_mut().create_image(params)?;
            driver.registry_mut().register(id, image).map_err(|e| e.within(source))?;
        },
        Command::GetVar => {
            let id = required_id(&mut params, source)?;
            // `python` is what existing markup uses; `attribute` is accepted too
            let name = match params.take("python").or_else(|| params.take("attribute")) {
                Some(name) => name.to_string(),
                None => return Err(error!(MalformedElement, "{} requires a python (or attribute) name", source.describe())),
            };

            let entry = match driver.attribute(&name) {
                Some(entry) => entry.clone(),
                None => return Err(error!(RuntimeReference, "The driver has no attribute {:?} ({})", name, source.describe())),
            };

            driver.registry_mut().register(id, entry).map_err(|e| e.within(source))?;
        },
    }

    Ok(())
}
