// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

#[cfg(test)]
mod tests;

use anyhow::{anyhow, Context, Error};
use indextree::NodeId;
use tracing::debug;

use crate::{
    dom::{Document, NodeData},
    markup::parse_markup,
    parser::{Parsed, ParsedTree, TemplateParser},
    updater::{Updater, UpdaterCollection, UpdaterDescriptor},
    value::Value,
};

/// A compiled template: a placeholder-free skeleton and the descriptors that
/// say where data goes in it. Immutable once built.
#[derive(Debug)]
pub struct Template {
    skeleton: Document,
    root: NodeId,
    descriptors: Vec<UpdaterDescriptor>,
}

/// One live copy of a template's skeleton and the updater bound to it.
#[derive(Debug)]
pub struct Instance {
    pub root: NodeId,
    pub updater: Updater,
}

impl Default for Template {
    fn default() -> Self {
        Self::empty()
    }
}

impl Template {
    pub fn new(source: &Document, node: NodeId) -> Template {
        let mut skeleton = Document::new();
        let ParsedTree { parsed, descriptors } = TemplateParser::new().parse(source, node, &mut skeleton);
        let root = match parsed {
            Parsed::Node(root) => root,
            Parsed::Fragment(nodes) => {
                // Fragment addresses are already relative to a common parent.
                let root = skeleton.create_fragment();
                for node in nodes {
                    skeleton.push_child(root, node);
                }
                root
            }
        };
        debug!(descriptors = descriptors.len(), "compiled template");
        Template {
            skeleton,
            root,
            descriptors,
        }
    }

    pub fn empty() -> Template {
        let mut skeleton = Document::new();
        let root = skeleton.create_fragment();
        Template {
            skeleton,
            root,
            descriptors: Vec::new(),
        }
    }

    pub fn from_markup(input: &str) -> Result<Template, Error> {
        let (source, root) = parse_markup(input)?;
        Ok(Template::new(&source, root))
    }

    /// Wraps an already placeholder-free skeleton whose descriptors were
    /// computed against `root`.
    pub fn from_parts(skeleton: Document, root: NodeId, descriptors: Vec<UpdaterDescriptor>) -> Template {
        Template {
            skeleton,
            root,
            descriptors,
        }
    }

    pub fn skeleton(&self) -> (&Document, NodeId) {
        (&self.skeleton, self.root)
    }

    pub fn descriptors(&self) -> &[UpdaterDescriptor] {
        &self.descriptors
    }

    /// Clones the skeleton into `doc`, binds every descriptor to the clone and,
    /// if `data` is given and not null, applies it once.
    pub fn instantiate(&self, doc: &mut Document, data: Option<&Value>) -> Result<Instance, Error> {
        let root = doc
            .import_node(&self.skeleton, self.root, true)
            .ok_or_else(|| anyhow!("template skeleton root is missing"))?;

        let updaters = self
            .descriptors
            .iter()
            .map(|descriptor| descriptor.create_updater(doc, root))
            .collect::<Result<Vec<_>, _>>()
            .context("skeleton clone does not match its descriptors")?;
        debug!(updaters = updaters.len(), "instantiated template");

        let updater = Updater::Collection(UpdaterCollection::new(updaters));
        if let Some(data) = data.filter(|data| !data.is_null()) {
            updater.update(doc, data);
        }
        Ok(Instance { root, updater })
    }
}

impl Instance {
    pub fn update(&self, doc: &mut Document, data: &Value) {
        self.updater.update(doc, data);
    }

    /// The top-level nodes of the instance. A fragment root stands for its
    /// children; once the fragment is appended somewhere it is left empty.
    pub fn nodes(&self, doc: &Document) -> Vec<NodeId> {
        match doc.get(self.root) {
            Some(NodeData::Fragment) => doc.children(self.root).collect(),
            Some(_) => vec![self.root],
            None => Vec::new(),
        }
    }
}
