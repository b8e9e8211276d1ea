//! Tree Queries
//!
//! Depth-first, pre-order collectors over a [`CssList`]. Results are returned
//! in document order.

use crate::declaration::{AtRuleSet, DeclarationBlock, Rule, RuleSet};
use crate::selectors::{Selector, SpecificityFilter};
use crate::tree::{CssList, Document, MediaQuery, Node};
use crate::values::Value;
use crate::CssomError;

/// Starting point of a value search
#[derive(Debug, Clone, Copy)]
pub enum ValueRoot<'a> {
    List(&'a CssList),
    Node(&'a Node),
    RuleSet(&'a RuleSet),
    Rule(&'a Rule),
    Value(&'a Value),
}

impl<'a> From<&'a CssList> for ValueRoot<'a> {
    fn from(list: &'a CssList) -> Self {
        Self::List(list)
    }
}

impl<'a> From<&'a Document> for ValueRoot<'a> {
    fn from(document: &'a Document) -> Self {
        Self::List(document)
    }
}

impl<'a> From<&'a MediaQuery> for ValueRoot<'a> {
    fn from(media: &'a MediaQuery) -> Self {
        Self::List(&media.contents)
    }
}

impl<'a> From<&'a Node> for ValueRoot<'a> {
    fn from(node: &'a Node) -> Self {
        Self::Node(node)
    }
}

impl<'a> From<&'a DeclarationBlock> for ValueRoot<'a> {
    fn from(block: &'a DeclarationBlock) -> Self {
        Self::RuleSet(&block.rule_set)
    }
}

impl<'a> From<&'a AtRuleSet> for ValueRoot<'a> {
    fn from(at_rule: &'a AtRuleSet) -> Self {
        Self::RuleSet(&at_rule.rule_set)
    }
}

impl<'a> From<&'a RuleSet> for ValueRoot<'a> {
    fn from(rule_set: &'a RuleSet) -> Self {
        Self::RuleSet(rule_set)
    }
}

impl<'a> From<&'a Rule> for ValueRoot<'a> {
    fn from(rule: &'a Rule) -> Self {
        Self::Rule(rule)
    }
}

impl<'a> From<&'a Value> for ValueRoot<'a> {
    fn from(value: &'a Value) -> Self {
        Self::Value(value)
    }
}

impl CssList {
    /// Every declaration block, descending into nested containers
    pub fn collect_declaration_blocks(&self) -> Vec<&DeclarationBlock> {
        let mut result = Vec::new();
        collect_blocks(self, &mut result);
        result
    }

    /// Mutable variant of [`CssList::collect_declaration_blocks`]
    pub fn collect_declaration_blocks_mut(&mut self) -> Vec<&mut DeclarationBlock> {
        let mut result = Vec::new();
        collect_blocks_mut(self, &mut result);
        result
    }

    /// Rules of every rule-bearing node (declaration blocks and at-rule sets)
    pub fn collect_rule_sets(&self) -> Vec<&RuleSet> {
        let mut result = Vec::new();
        collect_rule_sets(self, &mut result);
        result
    }

    /// Collect terminal values below `root` (this list when `None`).
    ///
    /// `property` restricts the search to matching rules (a trailing `-`
    /// makes it a prefix match). Function and color arguments are only
    /// searched when `include_function_args` is set; otherwise the whole
    /// call is skipped.
    pub fn collect_values<'a>(
        &'a self,
        root: Option<ValueRoot<'a>>,
        property: Option<&str>,
        include_function_args: bool,
    ) -> Vec<&'a Value> {
        let mut result = Vec::new();
        let root = root.unwrap_or(ValueRoot::List(self));
        collect_values(root, property, include_function_args, &mut result);
        result
    }

    /// Every selector of every declaration block accepted by `filter`
    pub fn collect_selectors_by_specificity(
        &self,
        filter: Option<SpecificityFilter>,
    ) -> Vec<&Selector> {
        self.collect_declaration_blocks()
            .into_iter()
            .flat_map(|block| block.selectors.iter())
            .filter(|selector| filter.is_none_or(|f| f.accepts(selector)))
            .collect()
    }

    /// Parse a predicate such as `">= 100"` or `"10"` and collect the
    /// selectors it accepts
    pub fn collect_selectors_matching(
        &self,
        predicate: &str,
    ) -> Result<Vec<&Selector>, CssomError> {
        let filter: SpecificityFilter = predicate.parse()?;
        Ok(self.collect_selectors_by_specificity(Some(filter)))
    }
}

fn collect_blocks<'a>(list: &'a CssList, result: &mut Vec<&'a DeclarationBlock>) {
    for node in list.contents() {
        match node {
            Node::DeclarationBlock(block) => result.push(block),
            Node::MediaQuery(media) => collect_blocks(&media.contents, result),
            _ => {}
        }
    }
}

fn collect_blocks_mut<'a>(list: &'a mut CssList, result: &mut Vec<&'a mut DeclarationBlock>) {
    for node in list.contents_mut().iter_mut() {
        match node {
            Node::DeclarationBlock(block) => result.push(block),
            Node::MediaQuery(media) => collect_blocks_mut(&mut media.contents, result),
            _ => {}
        }
    }
}

fn collect_rule_sets<'a>(list: &'a CssList, result: &mut Vec<&'a RuleSet>) {
    for node in list.contents() {
        if let Some(rule_set) = node.rule_set() {
            result.push(rule_set);
        } else if let Some(children) = node.children() {
            collect_rule_sets(children, result);
        }
    }
}

fn collect_values<'a>(
    element: ValueRoot<'a>,
    property: Option<&str>,
    with_args: bool,
    result: &mut Vec<&'a Value>,
) {
    match element {
        ValueRoot::List(list) => {
            for node in list.contents() {
                collect_values(ValueRoot::Node(node), property, with_args, result);
            }
        }
        ValueRoot::Node(node) => {
            if let Some(rule_set) = node.rule_set() {
                collect_values(ValueRoot::RuleSet(rule_set), property, with_args, result);
            } else if let Some(children) = node.children() {
                collect_values(ValueRoot::List(children), property, with_args, result);
            }
        }
        ValueRoot::RuleSet(rule_set) => {
            let rules = rule_set
                .rules()
                .iter()
                .filter(|rule| property.is_none_or(|p| rule.matches_property(p)));
            for rule in rules {
                collect_values(ValueRoot::Rule(rule), property, with_args, result);
            }
        }
        ValueRoot::Rule(rule) => {
            for value in &rule.values {
                collect_values(ValueRoot::Value(value), property, with_args, result);
            }
        }
        ValueRoot::Value(value) => match value {
            Value::List(list) => {
                for component in list.components() {
                    collect_values(ValueRoot::Value(component), property, with_args, result);
                }
            }
            Value::Function(function) => {
                if with_args {
                    for argument in function.arguments() {
                        collect_values(ValueRoot::Value(argument), property, with_args, result);
                    }
                }
            }
            Value::Color(color) => {
                if with_args {
                    for channel in color.components() {
                        collect_values(ValueRoot::Value(channel), property, with_args, result);
                    }
                }
            }
            Value::Size(_) | Value::Keyword(_) | Value::String(_) => result.push(value),
        },
    }
}
