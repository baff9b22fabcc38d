// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

#[cfg(test)]
mod tests;

use anyhow::{Context, Error};
use tracing::debug;

use crate::{
    dom::Document,
    markup::to_markup,
    template::{Instance, Template},
    value::{parse_data_str, Value},
};

/// Renders `template_string` once per YAML document in `data_string`, one
/// line per render.
pub fn render_template_str(template_string: &str, data_string: &str) -> Result<String, Error> {
    let data = parse_data_str(data_string).context("failed to parse data")?;
    let renders = render_template(template_string, &data)?;
    let mut out = String::new();
    for render in renders {
        out.push_str(&render);
        out.push('\n');
    }
    Ok(out)
}

/// Instantiates the template with the first data value, then feeds every
/// following value through the same updater. Returns the markup after each
/// step. With no data the template is rendered once, unbound.
pub fn render_template(template_string: &str, data: &[Value]) -> Result<Vec<String>, Error> {
    let template = Template::from_markup(template_string).context("failed to parse template")?;
    let mut data = data.iter();

    let mut doc = Document::new();
    let instance = template.instantiate(&mut doc, data.next())?;
    let mut renders = vec![render_instance(&doc, &instance)];

    for next in data {
        instance.update(&mut doc, next);
        renders.push(render_instance(&doc, &instance));
    }
    debug!(renders = renders.len(), "rendered template");
    Ok(renders)
}

fn render_instance(doc: &Document, instance: &Instance) -> String {
    instance.nodes(doc).into_iter().map(|node| to_markup(doc, node)).collect()
}
