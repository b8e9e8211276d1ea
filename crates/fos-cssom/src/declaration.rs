//! Rules & Declaration Blocks
//!
//! A rule is one `property: values` declaration. Rule sets keep rules in
//! source order; duplicates of a property are legal and resolved later by
//! the cascade (the last one wins).

use std::fmt;

use crate::selectors::Selector;
use crate::values::{Separator, Value, ValueList};

/// CSS declaration (property: values)
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub property: String,
    pub values: Vec<Value>,
    pub important: bool,
}

impl Rule {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            values: Vec::new(),
            important: false,
        }
    }

    pub fn with_values(property: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            values,
            ..Self::new(property)
        }
    }

    /// Builder-style `!important`
    pub fn important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    pub fn add_value(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    /// All values as one: the only value, or a space-separated list
    pub fn value(&self) -> Option<Value> {
        match self.values.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            many => Some(Value::List(ValueList::from_components(many.to_vec(), Separator::Space))),
        }
    }

    /// Check the property name against a filter. A filter ending in `-`
    /// matches every property with that prefix (`font-` matches `font-size`).
    pub fn matches_property(&self, filter: &str) -> bool {
        if filter.ends_with('-') {
            self.property.starts_with(filter)
        } else {
            self.property == filter
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.property)?;
        for value in &self.values {
            write!(f, " {}", value)?;
        }
        if self.important {
            f.write_str(" !important")?;
        }
        f.write_str(";")
    }
}

/// Ordered rules of a rule-bearing node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Append a rule
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Insert rules at `index` (past the end appends)
    pub fn insert_rules(&mut self, index: usize, rules: impl IntoIterator<Item = Rule>) {
        let index = index.min(self.rules.len());
        self.rules.splice(index..index, rules);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut Vec<Rule> {
        &mut self.rules
    }

    pub fn set_rules(&mut self, rules: Vec<Rule>) {
        self.rules = rules;
    }

    /// Rules matching a property filter, see [`Rule::matches_property`]
    pub fn rules_named<'a>(&'a self, filter: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |rule| rule.matches_property(filter))
    }

    /// Last rule declared for `property`
    pub fn rule(&self, property: &str) -> Option<&Rule> {
        self.rules.iter().rev().find(|rule| rule.property == property)
    }

    /// Remove every rule matching a property filter, returning them
    pub fn remove_rules(&mut self, filter: &str) -> Vec<Rule> {
        let (removed, kept): (Vec<Rule>, Vec<Rule>) = std::mem::take(&mut self.rules)
            .into_iter()
            .partition(|rule| rule.matches_property(filter));
        self.rules = kept;
        removed
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}

/// Selector list plus declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationBlock {
    pub selectors: Vec<Selector>,
    pub rule_set: RuleSet,
}

impl DeclarationBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selectors(selectors: Vec<Selector>) -> Self {
        Self {
            selectors,
            rule_set: RuleSet::new(),
        }
    }

    /// Parse a comma-separated selector list
    pub fn with_selector_text(text: &str) -> Self {
        let selectors = text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Selector::new)
            .collect();
        Self::with_selectors(selectors)
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn add_rule(&mut self, rule: Rule) {
        self.rule_set.add_rule(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        self.rule_set.rules()
    }

    /// Specificity used by the cascade: the selector's own when there is
    /// exactly one, 0 for grouped or missing selectors
    pub fn cascade_specificity(&self) -> u32 {
        match self.selectors.as_slice() {
            [only] => only.weight(),
            _ => 0,
        }
    }
}

impl fmt::Display for DeclarationBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", selector)?;
        }
        if !self.selectors.is_empty() {
            f.write_str(" ")?;
        }
        write!(f, "{{{}}}", self.rule_set)
    }
}

/// Rule-bearing at-rule without selectors (`@font-face`, `@page`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtRuleSet {
    pub name: String,
    pub arguments: String,
    pub rule_set: RuleSet,
}

impl AtRuleSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_arguments(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            arguments: arguments.into(),
            ..Self::new(name)
        }
    }
}

impl fmt::Display for AtRuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, " {}", self.arguments)?;
        }
        write!(f, " {{{}}}", self.rule_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Size;

    fn px(value: f64) -> Value {
        Size::with_unit(value, "px").into()
    }

    #[test]
    fn test_rule_display() {
        let rule = Rule::with_values("margin", vec![px(0.0), px(10.0)]);
        assert_eq!(rule.to_string(), "margin: 0px 10px;");
        assert_eq!(rule.important(true).to_string(), "margin: 0px 10px !important;");
    }

    #[test]
    fn test_property_filter() {
        let rule = Rule::new("font-size");
        assert!(rule.matches_property("font-size"));
        assert!(rule.matches_property("font-"));
        assert!(!rule.matches_property("font"));
    }

    #[test]
    fn test_rule_set_order_and_removal() {
        let mut set = RuleSet::new();
        set.add_rule(Rule::with_values("color", vec![Value::keyword("red")]));
        set.add_rule(Rule::with_values("margin-top", vec![px(1.0)]));
        set.add_rule(Rule::with_values("color", vec![Value::keyword("blue")]));

        assert_eq!(set.rule("color").unwrap().values, vec![Value::keyword("blue")]);
        assert_eq!(set.rules_named("color").count(), 2);

        let removed = set.remove_rules("color");
        assert_eq!(removed.len(), 2);
        assert_eq!(set.len(), 1);

        set.insert_rules(99, vec![Rule::new("z-index")]);
        assert_eq!(set.rules()[1].property, "z-index");
    }

    #[test]
    fn test_block_display_and_specificity() {
        let mut block = DeclarationBlock::with_selector_text("h1, .title");
        block.add_rule(Rule::with_values("color", vec![Value::keyword("red")]));
        assert_eq!(block.to_string(), "h1, .title {color: red;}");
        assert_eq!(block.cascade_specificity(), 0);

        let single = DeclarationBlock::with_selector_text("#main");
        assert_eq!(single.cascade_specificity(), 100);

        assert_eq!(DeclarationBlock::new().to_string(), "{}");
    }

    #[test]
    fn test_at_rule_display() {
        let mut face = AtRuleSet::new("font-face");
        face.rule_set.add_rule(Rule::with_values("font-family", vec![Value::string("Mono")]));
        assert_eq!(face.to_string(), "@font-face {font-family: \"Mono\";}");

        let page = AtRuleSet::with_arguments("page", ":first");
        assert_eq!(page.to_string(), "@page :first {}");
    }
}
