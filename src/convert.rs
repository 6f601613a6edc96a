//! Attribute converter: raw markup attributes to construction parameters

use crate::builder::BuildOptions;
use crate::driver::{Callback, Driver, VirtualMethod};
use crate::value::{is_digits, parse_dict, parse_list, Params, Value};
use crate::xml::Element;
use crate::Error;
use std::rc::Rc;

/// Attributes consumed by the builder after conversion, never handed to
/// the toolkit
pub const RESERVED_KEYS: [&str; 6] = ["id", "tooltip", "layout", "rowweight", "columnweight", "tabname"];

/// `/123` names `123`; any other identifier is kept as written
pub fn identifier(raw: &str) -> String {
    match raw.strip_prefix('/') {
        Some(escaped) if is_digits(escaped) => escaped.into(),
        _ => raw.into(),
    }
}

fn command(options: &BuildOptions, driver: &mut Driver, element: &Element, raw: &str) -> Result<Callback, Error> {
    match raw.strip_prefix('@') {
        Some(declaration) => {
            let method = VirtualMethod::parse(declaration)
                .map_err(|e| e.within(element))?;
            diag!(options, Debug, "{} declares {:?}", element.describe(), method);

            let callback = Callback::Virtual(Rc::new(method));
            driver.watch(callback.clone());
            Ok(callback)
        },
        None => Ok(Callback::Method(raw.into())),
    }
}

fn inline_style(options: &BuildOptions, driver: &mut Driver, element: &Element, raw: &str) -> Result<String, Error> {
    let name = format!("{:016x}.T{}", rand::random::<u64>(), element.tag);
    diag!(options, Debug, "{} gets style {}", element.describe(), name);

    driver.toolkit_mut().configure_style(&name, parse_dict(raw))?;
    Ok(name)
}

/// Converts the attributes left after layout extraction
///
/// - `id` stays textual, see [`identifier`]
/// - `command` becomes a [`Callback`]; `@` declarations are also queued
///   as init hooks on the driver
/// - `textvariable`, `variable` and `image` are resolved in the registry
/// - `columns`, `values` and `options` are lists
/// - `inline_style` registers a new style and becomes `style`
/// - everything else is a scalar, see [`Value::scalar`]
pub fn convert(options: &BuildOptions, driver: &mut Driver, element: &Element, attributes: Vec<(&str, &str)>) -> Result<Params, Error> {
    let mut params = Params::new();
    let mut style = None;

    for (key, raw) in attributes {
        let value = match key {
            "id" => Value::Str(identifier(raw)),
            "command" => Value::Command(command(options, driver, element, raw)?),
            "textvariable" | "variable" => {
                let var = driver.registry().variable(&identifier(raw)).map_err(|e| e.within(element))?;
                Value::Variable(var.clone())
            },
            "image" => {
                let image = driver.registry().image(&identifier(raw)).map_err(|e| e.within(element))?;
                Value::Image(image)
            },
            "columns" | "values" | "options" => Value::List(parse_list(raw)),
            "inline_style" => {
                style = Some(raw);
                continue;
            },
            _ => Value::scalar(raw),
        };

        params.insert(key, value);
    }

    if let Some(raw) = style {
        let name = inline_style(options, driver, element, raw)?;
        params.insert("style", Value::Str(name));
    }

    Ok(params)
}

/// Removes `id` from converted params
pub fn take_id(params: &mut Params) -> Option<String> {
    params.take("id").map(|id| id.to_string())
}

/// Drops reserved keys which mean nothing to this element
pub fn strip_reserved(options: &BuildOptions, element: &Element, params: &mut Params) {
    for key in RESERVED_KEYS {
        if params.take(key).is_some() {
            diag!(options, Warn, "{}: {} ignored here", element.describe(), key);
        }
    }
}
