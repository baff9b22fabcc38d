// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Tagged-literal front end.
//!
//! A `CallSite` is an ordered list of literal markup fragments. The gaps
//! between fragments are bound, in order, to the values passed alongside
//! them: gap `N` becomes expression `"N"` and is evaluated against a
//! `Value::Array` of the values. Compiled templates are cached by call site
//! identity, never by fragment text.


use std::{
    collections::HashMap,
    fmt,
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use anyhow::{anyhow, bail, Context, Error};
use hashlink::LruCache;
use indextree::NodeId;
use tracing::debug;

use crate::{
    address::find_node_address,
    dom::{Document, NodeData},
    markup::parse_markup,
    template::Template,
    tokenizer::Token,
    updater::{Updater, UpdaterDescriptor},
    value::Value,
};

#[doc(hidden)]
pub use once_cell::sync::Lazy;

const MARKER_OPEN: &str = "<!--stamp-marker:";
const MARKER_CLOSE: &str = "-->";
const MARKER_COMMENT: &str = "stamp-marker:";

static NEXT_CALL_SITE_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallSiteId(u64);

impl fmt::Display for CallSiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct CallSite {
    id: CallSiteId,
    fragments: Vec<String>,
}

impl CallSite {
    /// Every call allocates a new identity, even for identical fragments.
    pub fn new<S: AsRef<str>>(fragments: &[S]) -> CallSite {
        let id = CallSiteId(NEXT_CALL_SITE_ID.fetch_add(1, Ordering::Relaxed));
        CallSite {
            id,
            fragments: fragments.iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }

    pub fn id(&self) -> CallSiteId {
        self.id
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }
}

/// Declares a call site that lives for the rest of the program.
///
/// Each expansion is its own call site, so running the same line repeatedly
/// reuses one compiled template while two identical-looking expansions do not.
///
/// ```
/// let site = stamp::call_site!["<p>Hello, ", "!</p>"];
/// assert_eq!(site.fragments().len(), 2);
/// ```
#[macro_export]
macro_rules! call_site {
    ($($fragment:expr),+ $(,)?) => {{
        static SITE: $crate::literal::Lazy<$crate::literal::CallSite> =
            $crate::literal::Lazy::new(|| $crate::literal::CallSite::new(&[$($fragment),+]));
        &*SITE
    }};
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of compiled templates kept. `None` never evicts.
    pub capacity: Option<NonZeroUsize>,
}

pub struct TemplateCache {
    templates: LruCache<CallSiteId, Arc<Template>>,
}

impl fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateCache")
            .field("len", &self.templates.len())
            .finish()
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl TemplateCache {
    pub fn new(config: CacheConfig) -> TemplateCache {
        let templates = match config.capacity {
            Some(capacity) => LruCache::new(capacity.get()),
            None => LruCache::new_unbounded(),
        };
        TemplateCache { templates }
    }

    pub fn get_or_compile(&mut self, site: &CallSite) -> Result<Arc<Template>, Error> {
        if let Some(template) = self.templates.get(&site.id()) {
            debug!(site = %site.id(), "template cache hit");
            return Ok(template.clone());
        }

        let template = Arc::new(compile(site).with_context(|| format!("failed to compile call site {}", site.id()))?);
        debug!(site = %site.id(), descriptors = template.descriptors().len(), "template cache miss");
        self.templates.insert(site.id(), template.clone());
        Ok(template)
    }

    pub fn contains(&self, site: &CallSite) -> bool {
        self.templates.peek(&site.id()).is_some()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Compiles a call site into a template whose gap `N` reads expression `"N"`.
pub fn compile(site: &CallSite) -> Result<Template, Error> {
    let fragments = site.fragments();
    let mut markup = String::new();
    for (index, fragment) in fragments.iter().enumerate() {
        if index > 0 {
            markup.push_str(MARKER_OPEN);
            markup.push_str(&(index - 1).to_string());
            markup.push_str(MARKER_CLOSE);
        }
        markup.push_str(fragment);
    }

    let (mut doc, root) = parse_markup(&markup)?;
    let mut gaps = Gaps::new(fragments.len().saturating_sub(1));
    let mut descriptors = Vec::new();

    let nodes: Vec<NodeId> = doc.descendants(root).collect();
    for node in nodes {
        if let Some(gap) = text_marker(&doc, node) {
            let address =
                find_node_address(&doc, root, node).ok_or_else(|| anyhow!("marker {} is outside the template", gap))?;
            gaps.bind(gap)?;
            let slot = doc.create_text("");
            doc.replace_child(node, slot)?;
            descriptors.push(UpdaterDescriptor::text_content(address, &gap.to_string()));
            continue;
        }

        let dynamic: Vec<(String, Vec<Token>)> = match doc.get(node) {
            Some(NodeData::Element(element)) => element
                .attributes
                .iter()
                .map(|(name, value)| (name.clone(), split_markers(value)))
                .filter(|(_, tokens)| tokens.iter().any(Token::is_expression))
                .collect(),
            _ => continue,
        };
        if dynamic.is_empty() {
            continue;
        }

        let address =
            find_node_address(&doc, root, node).ok_or_else(|| anyhow!("element is outside the template"))?;
        for (name, tokens) in dynamic {
            for token in &tokens {
                if let Token::Expression(gap) = token {
                    gaps.bind(gap.parse().with_context(|| format!("bad marker index {:?}", gap))?)?;
                }
            }
            doc.set_attribute(node, &name, "");
            descriptors.push(UpdaterDescriptor::attribute_value(address.clone(), &name, tokens));
        }
    }

    gaps.finish()?;
    Ok(Template::from_parts(doc, root, descriptors))
}

fn text_marker(doc: &Document, node: NodeId) -> Option<usize> {
    match doc.get(node)? {
        NodeData::Comment(text) => text.strip_prefix(MARKER_COMMENT)?.parse().ok(),
        _ => None,
    }
}

fn split_markers(value: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = value;
    while let Some(start) = rest.find(MARKER_OPEN) {
        let after = &rest[start + MARKER_OPEN.len()..];
        let Some(end) = after.find(MARKER_CLOSE) else {
            break;
        };
        let index = &after[..end];
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            break;
        }
        if start > 0 {
            tokens.push(Token::Static(rest[..start].to_string()));
        }
        tokens.push(Token::Expression(index.to_string()));
        rest = &after[end + MARKER_CLOSE.len()..];
    }
    if !rest.is_empty() {
        tokens.push(Token::Static(rest.to_string()));
    }
    tokens
}

// Tracks which gaps have been bound to a text or attribute position.
struct Gaps(Vec<bool>);

impl Gaps {
    fn new(count: usize) -> Gaps {
        Gaps(vec![false; count])
    }

    fn bind(&mut self, gap: usize) -> Result<(), Error> {
        match self.0.get_mut(gap) {
            Some(bound) if !*bound => {
                *bound = true;
                Ok(())
            }
            Some(_) => bail!("gap {} appears more than once", gap),
            None => bail!("gap {} does not exist", gap),
        }
    }

    fn finish(self) -> Result<(), Error> {
        match self.0.iter().position(|bound| !bound) {
            Some(gap) => bail!("gap {} is not in a text or attribute value position", gap),
            None => Ok(()),
        }
    }
}

/// A compiled template paired with the values for one render.
#[derive(Clone, Debug)]
pub struct TemplateResult {
    pub template: Arc<Template>,
    pub values: Value,
}

/// Renders literal templates into containers and remembers, per container,
/// the updater of what was rendered there.
///
/// Containers are keyed by `NodeId` alone, so one renderer must only be used
/// with one `Document`. A container removed with `Document::remove` keeps its
/// entry until `discard` or `retain_live` drops it.
#[derive(Debug, Default)]
pub struct Renderer {
    cache: TemplateCache,
    rendered: HashMap<NodeId, Updater>,
}

impl Renderer {
    pub fn new(config: CacheConfig) -> Renderer {
        Renderer {
            cache: TemplateCache::new(config),
            rendered: HashMap::new(),
        }
    }

    pub fn html(&mut self, site: &CallSite, values: Vec<Value>) -> Result<TemplateResult, Error> {
        if site.fragments().len() != values.len() + 1 {
            bail!(
                "call site {} has {} fragments but {} values were given",
                site.id(),
                site.fragments().len(),
                values.len()
            );
        }
        let template = self.cache.get_or_compile(site)?;
        Ok(TemplateResult {
            template,
            values: Value::from(values),
        })
    }

    /// The first render into a container replaces its children with a new
    /// instance. Later renders update that instance in place.
    pub fn render(&mut self, doc: &mut Document, result: &TemplateResult, container: NodeId) -> Result<(), Error> {
        if !doc.contains(container) {
            bail!("container {:?} is not in the document", container);
        }

        if let Some(updater) = self.rendered.get(&container) {
            debug!(?container, "update rendered container");
            updater.update(doc, &result.values);
            return Ok(());
        }

        debug!(?container, "first render into container");
        doc.clear_children(container);
        let instance = result.template.instantiate(doc, Some(&result.values))?;
        doc.append(container, instance.root)?;
        if let Some(NodeData::Fragment) = doc.get(instance.root) {
            doc.remove(instance.root);
        }
        self.rendered.insert(container, instance.updater);
        Ok(())
    }

    /// Removes the container from the document together with its updater.
    pub fn discard(&mut self, doc: &mut Document, container: NodeId) -> bool {
        let rendered = self.rendered.remove(&container).is_some();
        doc.remove(container);
        rendered
    }

    /// Drops the updaters of containers that are no longer in `doc`.
    pub fn retain_live(&mut self, doc: &Document) -> usize {
        let before = self.rendered.len();
        self.rendered.retain(|container, _| doc.contains(*container));
        let dropped = before - self.rendered.len();
        if dropped > 0 {
            debug!(dropped, "dropped updaters of removed containers");
        }
        dropped
    }

    pub fn is_rendered(&self, container: NodeId) -> bool {
        self.rendered.contains_key(&container)
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }
}
