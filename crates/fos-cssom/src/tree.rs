//! Style Sheet Tree
//!
//! A document is a list of nodes. Nested containers (`@media`) hold their own
//! list; every node is owned by exactly one container.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::declaration::{AtRuleSet, DeclarationBlock, RuleSet};

/// Tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Selector list with declarations
    DeclarationBlock(DeclarationBlock),
    /// Rule-bearing at-rule (`@font-face`)
    AtRuleSet(AtRuleSet),
    /// `@media` block
    MediaQuery(MediaQuery),
    /// `@import`
    Import(Import),
    /// `@charset`
    Charset(Charset),
}

impl Node {
    /// Rules of a rule-bearing node
    pub fn rule_set(&self) -> Option<&RuleSet> {
        match self {
            Self::DeclarationBlock(block) => Some(&block.rule_set),
            Self::AtRuleSet(at_rule) => Some(&at_rule.rule_set),
            _ => None,
        }
    }

    pub fn rule_set_mut(&mut self) -> Option<&mut RuleSet> {
        match self {
            Self::DeclarationBlock(block) => Some(&mut block.rule_set),
            Self::AtRuleSet(at_rule) => Some(&mut at_rule.rule_set),
            _ => None,
        }
    }

    /// Child list of a nested container
    pub fn children(&self) -> Option<&CssList> {
        match self {
            Self::MediaQuery(media) => Some(&media.contents),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut CssList> {
        match self {
            Self::MediaQuery(media) => Some(&mut media.contents),
            _ => None,
        }
    }
}

impl From<DeclarationBlock> for Node {
    fn from(block: DeclarationBlock) -> Self {
        Self::DeclarationBlock(block)
    }
}

impl From<AtRuleSet> for Node {
    fn from(at_rule: AtRuleSet) -> Self {
        Self::AtRuleSet(at_rule)
    }
}

impl From<MediaQuery> for Node {
    fn from(media: MediaQuery) -> Self {
        Self::MediaQuery(media)
    }
}

impl From<Import> for Node {
    fn from(import: Import) -> Self {
        Self::Import(import)
    }
}

impl From<Charset> for Node {
    fn from(charset: Charset) -> Self {
        Self::Charset(charset)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeclarationBlock(block) => fmt::Display::fmt(block, f),
            Self::AtRuleSet(at_rule) => fmt::Display::fmt(at_rule, f),
            Self::MediaQuery(media) => fmt::Display::fmt(media, f),
            Self::Import(import) => fmt::Display::fmt(import, f),
            Self::Charset(charset) => fmt::Display::fmt(charset, f),
        }
    }
}

/// Ordered node container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CssList {
    contents: Vec<Node>,
}

impl CssList {
    pub fn new() -> Self {
        Self { contents: Vec::new() }
    }

    pub fn append(&mut self, node: impl Into<Node>) {
        self.contents.push(node.into());
    }

    pub fn prepend(&mut self, node: impl Into<Node>) {
        self.contents.insert(0, node.into());
    }

    pub fn extend(&mut self, nodes: impl IntoIterator<Item = Node>) {
        self.contents.extend(nodes);
    }

    /// Insert nodes before `index`; an index past the end appends
    pub fn insert_at(&mut self, index: usize, nodes: impl IntoIterator<Item = Node>) {
        let index = index.min(self.contents.len());
        self.contents.splice(index..index, nodes);
    }

    /// Remove and return the node at `index`
    pub fn remove_at(&mut self, index: usize) -> Option<Node> {
        if index < self.contents.len() {
            Some(self.contents.remove(index))
        } else {
            None
        }
    }

    pub fn contents(&self) -> &[Node] {
        &self.contents
    }

    pub fn contents_mut(&mut self) -> &mut Vec<Node> {
        &mut self.contents
    }

    /// Replace all children, returning the old ones
    pub fn set_contents(&mut self, contents: Vec<Node>) -> Vec<Node> {
        std::mem::replace(&mut self.contents, contents)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl fmt::Display for CssList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.contents {
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

/// `@media <query> { ... }`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaQuery {
    pub query: String,
    pub contents: CssList,
}

impl MediaQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            contents: CssList::new(),
        }
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@media {} {{{}}}", self.query, self.contents)
    }
}

/// `@import url(...) <media>;`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Import {
    pub url: String,
    pub media: Option<String>,
}

impl Import {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            media: None,
        }
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@import url(\"{}\")", self.url)?;
        if let Some(media) = &self.media {
            write!(f, " {}", media)?;
        }
        f.write_str(";")
    }
}

/// `@charset "<encoding>";`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Charset {
    pub encoding: String,
}

impl Charset {
    pub fn new(encoding: impl Into<String>) -> Self {
        Self { encoding: encoding.into() }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@charset \"{}\";", self.encoding)
    }
}

/// Root of a parsed style sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: CssList,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut document = Self::new();
        document.root.set_contents(nodes);
        document
    }
}

impl Deref for Document {
    type Target = CssList;

    fn deref(&self) -> &CssList {
        &self.root
    }
}

impl DerefMut for Document {
    fn deref_mut(&mut self) -> &mut CssList {
        &mut self.root
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Rule;
    use crate::values::Value;

    fn block(selector: &str) -> DeclarationBlock {
        let mut block = DeclarationBlock::with_selector_text(selector);
        block.add_rule(Rule::with_values("color", vec![Value::keyword("red")]));
        block
    }

    #[test]
    fn test_list_operations() {
        let mut list = CssList::new();
        list.append(block("b"));
        list.prepend(block("a"));
        list.insert_at(1, vec![Node::from(Charset::new("utf-8"))]);
        list.insert_at(42, vec![Node::from(Import::new("x.css"))]);

        assert_eq!(list.len(), 4);
        assert!(matches!(list.contents()[1], Node::Charset(_)));
        assert!(matches!(list.contents()[3], Node::Import(_)));

        let removed = list.remove_at(1);
        assert!(matches!(removed, Some(Node::Charset(_))));
        assert!(list.remove_at(10).is_none());
        assert_eq!(list.len(), 3);

        let old = list.set_contents(Vec::new());
        assert_eq!(old.len(), 3);
        assert!(list.is_empty());
    }

    #[test]
    fn test_document_display() {
        let mut media = MediaQuery::new("screen");
        media.contents.append(block("p"));

        let mut document = Document::new();
        document.append(Charset::new("utf-8"));
        document.append(Import {
            url: "print.css".into(),
            media: Some("print".into()),
        });
        document.append(block("h1"));
        document.append(media);

        assert_eq!(
            document.to_string(),
            "@charset \"utf-8\";@import url(\"print.css\") print;h1 {color: red;}\
             @media screen {p {color: red;}}"
        );
    }
}
