//! Case-preserving text substitution over parsed HTML documents
//!
//! The rewriter walks the parsed tree and touches text payloads only. Tag
//! names, attribute values (`href`, `src`, `alt`, ...), comments and anything
//! inside a `<script>` element are serialized back exactly as parsed.
//!
//! Matching is deliberately narrow: a table built with
//! [`SubstitutionTable::case_variants`] replaces the capitalized, upper-case
//! and lower-case spellings of a word, and nothing else. `YaLe` is not a match.

use ego_tree::{NodeId, Tree};
use scraper::{ElementRef, Html, Node};

/// Ordered (find, replace) pairs applied to every eligible text payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionTable {
    /// Lower-cased search word, used for case-insensitive counting
    needle: String,
    pairs: Vec<(String, String)>,
}

impl SubstitutionTable {
    /// Build the three case variants of `from -> to`: capitalized,
    /// all-uppercase and all-lowercase.
    pub fn case_variants(from: &str, to: &str) -> Self {
        if from.is_empty() {
            return Self {
                needle: String::new(),
                pairs: Vec::new(),
            };
        }

        let pairs = vec![
            (capitalize(from), capitalize(to)),
            (from.to_uppercase(), to.to_uppercase()),
            (from.to_lowercase(), to.to_lowercase()),
        ];

        Self {
            needle: from.to_lowercase(),
            pairs,
        }
    }

    /// The (find, replace) pairs in application order
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Apply every pair as a literal, global, non-overlapping replacement
    pub fn apply(&self, text: &str) -> String {
        self.pairs
            .iter()
            .fold(text.to_string(), |acc, (find, replace)| {
                acc.replace(find.as_str(), replace.as_str())
            })
    }

    /// Count case-insensitive occurrences of the search word
    pub fn count_occurrences(&self, text: &str) -> usize {
        if self.needle.is_empty() {
            return 0;
        }
        text.to_lowercase().matches(self.needle.as_str()).count()
    }

    /// Rewrite `text`, returning the new payload and the number of
    /// occurrences to record, or `None` when nothing changed.
    ///
    /// The count covers every case-insensitive occurrence in the original
    /// payload, including spellings the table itself leaves alone.
    pub fn substitute(&self, text: &str) -> Option<(String, usize)> {
        let replaced = self.apply(text);
        if replaced == text {
            return None;
        }
        let occurrences = self.count_occurrences(text);
        Some((replaced, occurrences))
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        Self::case_variants("yale", "fale")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Output of a single rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    /// The full serialized document
    pub html: String,
    /// Text of the rewritten `<title>`, empty when the page has none
    pub title: String,
    /// Number of occurrences replaced across the document
    pub replacement_count: usize,
}

/// HTML text rewriter
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    table: SubstitutionTable,
}

impl Rewriter {
    /// Create a rewriter with the given substitution table
    pub fn new(table: SubstitutionTable) -> Self {
        Self { table }
    }

    /// The substitution table in use
    pub fn table(&self) -> &SubstitutionTable {
        &self.table
    }

    /// Parse `html`, rewrite its visible text and serialize it back
    ///
    /// The parser repairs malformed markup and adds any missing
    /// `html`/`head`/`body` wrappers, so this never fails.
    pub fn rewrite(&self, html: &str) -> RewriteResult {
        let mut document = Html::parse_document(html);
        let mut replacement_count = 0;

        self.rewrite_tree(&mut document.tree, &mut replacement_count);

        RewriteResult {
            html: document.html(),
            title: document_title(&document),
            replacement_count,
        }
    }

    /// Pre-order walk over every element outside `<script>` subtrees
    ///
    /// `<template>` contents hang off a fragment node and are not visited.
    fn rewrite_tree(&self, tree: &mut Tree<Node>, count: &mut usize) {
        let root = tree.root().id();
        let mut pending = element_children(tree, root);
        pending.reverse();

        while let Some(id) = pending.pop() {
            let is_script = match tree.get(id).map(|node| node.value()) {
                Some(Node::Element(element)) => element.name() == "script",
                _ => continue,
            };
            if is_script {
                continue;
            }

            let children = element_children(tree, id);
            let has_element_children = !children.is_empty();
            pending.extend(children.into_iter().rev());

            self.rewrite_text_children(tree, id, count);
            if !has_element_children {
                self.rewrite_text_content(tree, id, count);
            }
        }

        // Text sitting directly under the document, outside any element
        self.rewrite_text_children(tree, root, count);
    }

    fn rewrite_text_children(&self, tree: &mut Tree<Node>, parent: NodeId, count: &mut usize) {
        for id in text_children(tree, parent) {
            let Some(mut child) = tree.get_mut(id) else {
                continue;
            };
            if let Node::Text(text) = child.value() {
                if let Some((replaced, occurrences)) = self.table.substitute(&text.text) {
                    text.text = replaced.into();
                    *count += occurrences;
                }
            }
        }
    }

    /// Rewrite the combined text of an element without element children.
    ///
    /// Catches words split across text nodes, e.g. by a comment. The result
    /// lands in the first text node; the other text nodes are dropped and
    /// comments stay where they are.
    fn rewrite_text_content(&self, tree: &mut Tree<Node>, element: NodeId, count: &mut usize) {
        let ids = text_children(tree, element);

        let mut original = String::new();
        for id in &ids {
            if let Some(Node::Text(text)) = tree.get(*id).map(|node| node.value()) {
                original.push_str(&text.text);
            }
        }

        let Some((replaced, occurrences)) = self.table.substitute(&original) else {
            return;
        };

        let mut ids = ids.into_iter();
        if let Some(first) = ids.next() {
            if let Some(mut node) = tree.get_mut(first) {
                if let Node::Text(text) = node.value() {
                    text.text = replaced.into();
                }
            }
        }
        for id in ids {
            if let Some(mut node) = tree.get_mut(id) {
                node.detach();
            }
        }

        *count += occurrences;
    }
}

fn element_children(tree: &Tree<Node>, parent: NodeId) -> Vec<NodeId> {
    children_where(tree, parent, Node::is_element)
}

fn text_children(tree: &Tree<Node>, parent: NodeId) -> Vec<NodeId> {
    children_where(tree, parent, Node::is_text)
}

fn children_where(tree: &Tree<Node>, parent: NodeId, keep: fn(&Node) -> bool) -> Vec<NodeId> {
    tree.get(parent)
        .map(|node| {
            node.children()
                .filter(|child| keep(child.value()))
                .map(|child| child.id())
                .collect()
        })
        .unwrap_or_default()
}

/// Concatenated text of every `<title>` element in the document
fn document_title(document: &Html) -> String {
    document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "title")
        .flat_map(|element| element.text())
        .collect()
}
