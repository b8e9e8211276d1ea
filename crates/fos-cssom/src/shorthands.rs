//! Shorthand Properties
//!
//! Table-driven expansion of shorthands (`margin`, `background`, ...) into
//! their longhands, and best-effort compaction back. Compaction never reports
//! failure: when the longhands are not cleanly compactable they are left as
//! they are.

use crate::color::Color;
use crate::declaration::{Rule, RuleSet};
use crate::tree::CssList;
use crate::values::{Separator, Size, Value, ValueList};

/// Splits a shorthand's values into one value list per longhand
type ExpandFn = fn(&[Value]) -> Option<Vec<Vec<Value>>>;

/// Joins longhand values (`None` when absent) back into shorthand values
type CompactFn = fn(&[Option<Value>]) -> Option<Vec<Value>>;

/// Shorthand registry entry
pub struct Shorthand {
    pub name: &'static str,
    pub longhands: &'static [&'static str],
    expand: ExpandFn,
    compact: Option<CompactFn>,
}

impl Shorthand {
    /// Whether this shorthand is ever rebuilt from its longhands
    pub fn is_compactable(&self) -> bool {
        self.compact.is_some()
    }
}

impl std::fmt::Debug for Shorthand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shorthand")
            .field("name", &self.name)
            .field("longhands", &self.longhands)
            .finish()
    }
}

/// Registry, in expansion order. `border` comes first because it expands
/// into the `border-*` box shorthands that follow it.
pub static SHORTHANDS: &[Shorthand] = &[
    Shorthand {
        name: "border",
        longhands: &["border-width", "border-style", "border-color"],
        expand: expand_border,
        compact: None,
    },
    Shorthand {
        name: "margin",
        longhands: &["margin-top", "margin-right", "margin-bottom", "margin-left"],
        expand: expand_box,
        compact: Some(compact_box),
    },
    Shorthand {
        name: "padding",
        longhands: &["padding-top", "padding-right", "padding-bottom", "padding-left"],
        expand: expand_box,
        compact: Some(compact_box),
    },
    Shorthand {
        name: "border-width",
        longhands: &[
            "border-top-width",
            "border-right-width",
            "border-bottom-width",
            "border-left-width",
        ],
        expand: expand_box,
        compact: Some(compact_box),
    },
    Shorthand {
        name: "border-style",
        longhands: &[
            "border-top-style",
            "border-right-style",
            "border-bottom-style",
            "border-left-style",
        ],
        expand: expand_box,
        compact: Some(compact_box),
    },
    Shorthand {
        name: "border-color",
        longhands: &[
            "border-top-color",
            "border-right-color",
            "border-bottom-color",
            "border-left-color",
        ],
        expand: expand_box,
        compact: Some(compact_box),
    },
    Shorthand {
        name: "font",
        longhands: &[
            "font-style",
            "font-variant",
            "font-weight",
            "font-size",
            "line-height",
            "font-family",
        ],
        expand: expand_font,
        compact: Some(compact_font),
    },
    Shorthand {
        name: "background",
        longhands: &[
            "background-color",
            "background-image",
            "background-repeat",
            "background-position",
            "background-attachment",
        ],
        expand: expand_background,
        compact: Some(compact_layered),
    },
    Shorthand {
        name: "list-style",
        longhands: &["list-style-type", "list-style-position", "list-style-image"],
        expand: expand_list_style,
        compact: Some(compact_layered),
    },
];

/// Order in which compaction runs
const COMPACTION_ORDER: &[&str] = &[
    "background",
    "margin",
    "padding",
    "border-width",
    "border-style",
    "border-color",
    "list-style",
    "font",
];

const GLOBAL_KEYWORDS: &[&str] = &["inherit", "initial", "unset"];

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

const BORDER_WIDTHS: &[&str] = &["thin", "medium", "thick"];

const BACKGROUND_REPEATS: &[&str] =
    &["repeat", "repeat-x", "repeat-y", "no-repeat", "space", "round"];

const BACKGROUND_ATTACHMENTS: &[&str] = &["scroll", "fixed", "local"];

const POSITION_KEYWORDS: &[&str] = &["left", "right", "top", "bottom", "center"];

const FONT_STYLES: &[&str] = &["italic", "oblique"];

const FONT_WEIGHTS: &[&str] = &["bold", "bolder", "lighter"];

const FONT_SIZES: &[&str] = &[
    "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller", "larger",
];

const LIST_POSITIONS: &[&str] = &["inside", "outside"];

/// Look up a registry entry
pub fn shorthand(name: &str) -> Option<&'static Shorthand> {
    SHORTHANDS.iter().find(|entry| entry.name == name)
}

/// Replace every shorthand rule with its longhands, in place. Longhands take
/// the shorthand's position and `!important` flag. Running it twice changes
/// nothing.
pub fn expand_shorthands(rule_set: &mut RuleSet) {
    for entry in SHORTHANDS {
        expand_one(rule_set, entry);
    }
}

/// Rebuild shorthands from complete, simple and consistently flagged
/// longhands. The shorthand is appended at the end of the rule set.
pub fn create_shorthands(rule_set: &mut RuleSet) {
    for name in COMPACTION_ORDER {
        if let Some(entry) = shorthand(name) {
            compact_one(rule_set, entry);
        }
    }
}

impl CssList {
    /// Expand shorthands in every declaration block
    pub fn expand_shorthands(&mut self) {
        for block in self.collect_declaration_blocks_mut() {
            expand_shorthands(&mut block.rule_set);
        }
    }

    /// Create shorthands in every declaration block where possible
    pub fn create_shorthands(&mut self) {
        for block in self.collect_declaration_blocks_mut() {
            create_shorthands(&mut block.rule_set);
        }
    }
}

fn expand_one(rule_set: &mut RuleSet, entry: &Shorthand) {
    if !rule_set.rules().iter().any(|rule| rule.property == entry.name) {
        return;
    }

    let rules = std::mem::take(rule_set.rules_mut());
    let mut expanded = Vec::with_capacity(rules.len() + entry.longhands.len());

    for rule in rules {
        if rule.property != entry.name {
            expanded.push(rule);
            continue;
        }

        let parts = match rule.values.as_slice() {
            [global] if is_global(global) => {
                Some(vec![vec![global.clone()]; entry.longhands.len()])
            }
            values => (entry.expand)(values),
        };

        match parts {
            Some(parts) => {
                tracing::trace!("Expanding {}", rule);
                for (longhand, values) in entry.longhands.iter().zip(parts) {
                    expanded.push(Rule {
                        property: longhand.to_string(),
                        values,
                        important: rule.important,
                    });
                }
            }
            None => {
                tracing::trace!("Leaving unexpandable {}", rule);
                expanded.push(rule);
            }
        }
    }

    rule_set.set_rules(expanded);
}

fn compact_one(rule_set: &mut RuleSet, entry: &Shorthand) {
    let Some(compact) = entry.compact else {
        return;
    };
    if rule_set.rule(entry.name).is_some() {
        return;
    }

    let mut values = Vec::with_capacity(entry.longhands.len());
    let mut important = None;

    for longhand in entry.longhands {
        let mut matching = rule_set.rules().iter().filter(|rule| rule.property == *longhand);
        let Some(rule) = matching.next() else {
            values.push(None);
            continue;
        };
        // Duplicates need the cascade to pick a winner
        if matching.next().is_some() {
            return;
        }
        if *important.get_or_insert(rule.important) != rule.important {
            return;
        }
        match rule.value() {
            Some(value) => values.push(Some(value)),
            None => return,
        }
    }

    let Some(important) = important else {
        return;
    };
    let shorthand_values = match compact_globals(&values) {
        Globals::None => compact(&values),
        Globals::All(keyword) => Some(vec![keyword]),
        Globals::Mixed => None,
    };
    let Some(shorthand_values) = shorthand_values else {
        return;
    };

    for longhand in entry.longhands {
        rule_set.remove_rules(longhand);
    }
    let rule = Rule::with_values(entry.name, shorthand_values).important(important);
    tracing::trace!("Created {}", rule);
    rule_set.add_rule(rule);
}

/// Global keywords among the longhands of one shorthand
enum Globals {
    None,
    /// Every longhand is present and holds this keyword
    All(Value),
    Mixed,
}

fn compact_globals(longhands: &[Option<Value>]) -> Globals {
    let globals: Vec<&Value> = longhands
        .iter()
        .flatten()
        .filter(|value| is_global(value))
        .collect();
    match globals.first() {
        None => Globals::None,
        Some(first)
            if globals.len() == longhands.len() && globals.iter().all(|value| value == first) =>
        {
            Globals::All((*first).clone())
        }
        Some(_) => Globals::Mixed,
    }
}

fn is_global(value: &Value) -> bool {
    GLOBAL_KEYWORDS.iter().any(|keyword| value.is_keyword(keyword))
}

fn is_layered(value: &Value) -> bool {
    value.is_list_with(Separator::Comma)
}

fn is_one_of(value: &Value, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| value.is_keyword(keyword))
}

/// Flatten top-level space-separated lists into their components
fn flatten_space(values: &[Value]) -> Vec<Value> {
    let mut flat = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::List(list) if list.separator() == Separator::Space => {
                flat.extend(list.components().iter().cloned())
            }
            other => flat.push(other.clone()),
        }
    }
    flat
}

/// One value, or a space-separated list of several
fn join_space(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::List(ValueList::from_components(values, Separator::Space))
    }
}

fn is_color(value: &Value) -> bool {
    match value {
        Value::Color(_) => true,
        Value::Keyword(keyword) => {
            keyword.eq_ignore_ascii_case("transparent")
                || keyword.eq_ignore_ascii_case("currentcolor")
                || Color::from_named(keyword).is_some()
        }
        _ => false,
    }
}

fn is_image(value: &Value) -> bool {
    match value {
        Value::Function(function) => {
            let name = function.name().to_ascii_lowercase();
            name == "url" || name.ends_with("gradient")
        }
        _ => value.is_keyword("none"),
    }
}

/// `a`, `a b`, `a b c`, `a b c d` → top, right, bottom, left
fn expand_box(values: &[Value]) -> Option<Vec<Vec<Value>>> {
    let values = flatten_space(values);
    let (top, right, bottom, left) = match values.as_slice() {
        [a] => (a, a, a, a),
        [a, b] => (a, b, a, b),
        [a, b, c] => (a, b, c, b),
        [a, b, c, d] => (a, b, c, d),
        _ => return None,
    };
    Some(vec![
        vec![top.clone()],
        vec![right.clone()],
        vec![bottom.clone()],
        vec![left.clone()],
    ])
}

/// Shortest positional form of four sides
fn compact_box(sides: &[Option<Value>]) -> Option<Vec<Value>> {
    let [Some(top), Some(right), Some(bottom), Some(left)] = sides else {
        return None;
    };
    if [top, right, bottom, left].iter().any(|side| matches!(side, Value::List(_))) {
        return None;
    }

    let values = if right != left {
        vec![top, right, bottom, left]
    } else if top != bottom {
        vec![top, right, bottom]
    } else if top != right {
        vec![top, right]
    } else {
        vec![top]
    };
    Some(values.into_iter().cloned().collect())
}

fn expand_border(values: &[Value]) -> Option<Vec<Vec<Value>>> {
    let mut width = None;
    let mut style = None;
    let mut color = None;

    for value in flatten_space(values) {
        let slot = if matches!(value, Value::Size(_)) || is_one_of(&value, BORDER_WIDTHS) {
            &mut width
        } else if is_one_of(&value, BORDER_STYLES) {
            &mut style
        } else if is_color(&value) {
            &mut color
        } else {
            return None;
        };
        if slot.replace(value).is_some() {
            return None;
        }
    }

    Some(vec![
        vec![width.unwrap_or_else(|| Value::keyword("medium"))],
        vec![style.unwrap_or_else(|| Value::keyword("none"))],
        vec![color.unwrap_or_else(|| Value::keyword("currentcolor"))],
    ])
}

fn expand_background(values: &[Value]) -> Option<Vec<Vec<Value>>> {
    let mut color = None;
    let mut image = None;
    let mut repeat = None;
    let mut position = Vec::new();
    let mut attachment = None;

    for value in flatten_space(values) {
        if matches!(value, Value::Size(_)) || is_one_of(&value, POSITION_KEYWORDS) {
            position.push(value);
            continue;
        }
        let slot = if is_image(&value) {
            &mut image
        } else if is_one_of(&value, BACKGROUND_REPEATS) {
            &mut repeat
        } else if is_one_of(&value, BACKGROUND_ATTACHMENTS) {
            &mut attachment
        } else if is_color(&value) {
            &mut color
        } else {
            // Multiple layers or an unknown token
            return None;
        };
        if slot.replace(value).is_some() {
            return None;
        }
    }

    let position = if position.is_empty() {
        vec![Size::percent(0.0).into(), Size::percent(0.0).into()]
    } else {
        position
    };

    Some(vec![
        vec![color.unwrap_or_else(|| Value::keyword("transparent"))],
        vec![image.unwrap_or_else(|| Value::keyword("none"))],
        vec![repeat.unwrap_or_else(|| Value::keyword("repeat"))],
        vec![join_space(position)],
        vec![attachment.unwrap_or_else(|| Value::keyword("scroll"))],
    ])
}

fn expand_list_style(values: &[Value]) -> Option<Vec<Vec<Value>>> {
    let mut list_type = None;
    let mut position = None;
    let mut image = None;
    let mut nones = 0;

    for value in flatten_space(values) {
        if value.is_keyword("none") {
            nones += 1;
            continue;
        }
        let slot = if is_one_of(&value, LIST_POSITIONS) {
            &mut position
        } else if matches!(value, Value::Function(_)) {
            &mut image
        } else if matches!(value, Value::Keyword(_) | Value::String(_)) {
            &mut list_type
        } else {
            return None;
        };
        if slot.replace(value).is_some() {
            return None;
        }
    }

    // `none` fills the type first, then the image
    for _ in 0..nones {
        if list_type.is_none() {
            list_type = Some(Value::keyword("none"));
        } else if image.is_none() {
            image = Some(Value::keyword("none"));
        } else {
            return None;
        }
    }

    Some(vec![
        vec![list_type.unwrap_or_else(|| Value::keyword("disc"))],
        vec![position.unwrap_or_else(|| Value::keyword("outside"))],
        vec![image.unwrap_or_else(|| Value::keyword("none"))],
    ])
}

/// Split `font` values into leading tokens and the family list. A parser
/// may hand the whole value over as one comma list whose first item holds
/// the space-separated tokens.
fn font_tokens(values: &[Value]) -> (Vec<Value>, Vec<Value>) {
    match values {
        [Value::List(list)] if list.separator() == Separator::Comma => {
            let Some((first, rest)) = list.components().split_first() else {
                return (Vec::new(), Vec::new());
            };
            let mut tokens = flatten_space(std::slice::from_ref(first));
            let Some(first_family) = tokens.pop() else {
                return (Vec::new(), Vec::new());
            };
            let mut families = vec![first_family];
            families.extend(rest.iter().cloned());
            (tokens, vec![Value::List(ValueList::from_components(families, Separator::Comma))])
        }
        _ => (flatten_space(values), Vec::new()),
    }
}

fn is_font_weight(value: &Value) -> bool {
    match value {
        Value::Size(size) => {
            size.unit().is_none()
                && (100.0..=900.0).contains(&size.value())
                && size.value() % 100.0 == 0.0
        }
        _ => is_one_of(value, FONT_WEIGHTS),
    }
}

fn expand_font(values: &[Value]) -> Option<Vec<Vec<Value>>> {
    let (tokens, family_tail) = font_tokens(values);

    let mut style = None;
    let mut variant = None;
    let mut weight = None;
    let mut size = None;
    let mut line_height = None;
    let mut family = Vec::new();

    for token in tokens {
        if size.is_some() {
            family.push(token);
            continue;
        }
        if token.is_keyword("normal") {
            continue;
        }
        if is_one_of(&token, FONT_STYLES) {
            style = Some(token);
        } else if token.is_keyword("small-caps") {
            variant = Some(token);
        } else if is_font_weight(&token) {
            weight = Some(token);
        } else if let Value::List(list) = &token {
            match list.components() {
                [font_size, height] if list.separator() == Separator::Slash => {
                    size = Some(font_size.clone());
                    line_height = Some(height.clone());
                }
                _ => return None,
            }
        } else if matches!(token, Value::Size(_)) || is_one_of(&token, FONT_SIZES) {
            size = Some(token);
        } else {
            // System fonts and unknown tokens
            return None;
        }
    }

    family.extend(family_tail);
    let size = size?;
    if family.is_empty() {
        return None;
    }

    let normal = || Value::keyword("normal");
    Some(vec![
        vec![style.unwrap_or_else(normal)],
        vec![variant.unwrap_or_else(normal)],
        vec![weight.unwrap_or_else(normal)],
        vec![size],
        vec![line_height.unwrap_or_else(normal)],
        vec![join_space(family)],
    ])
}

fn compact_font(longhands: &[Option<Value>]) -> Option<Vec<Value>> {
    let [style, variant, weight, Some(size), line_height, Some(family)] = longhands else {
        return None;
    };
    // Only the family may be a comma list
    if [style, variant, weight, line_height]
        .into_iter()
        .flatten()
        .chain([size])
        .any(is_layered)
    {
        return None;
    }

    let mut values: Vec<Value> = [style, variant, weight]
        .into_iter()
        .flatten()
        .filter(|value| !value.is_keyword("normal"))
        .cloned()
        .collect();

    match line_height {
        Some(height) if !height.is_keyword("normal") => values.push(Value::List(
            ValueList::from_components(vec![size.clone(), height.clone()], Separator::Slash),
        )),
        _ => values.push(size.clone()),
    }
    values.push(family.clone());
    Some(values)
}

/// Present longhands in canonical order; absent ones keep their initial value.
/// Multi-layer (comma list) longhands never compact.
fn compact_layered(longhands: &[Option<Value>]) -> Option<Vec<Value>> {
    let values: Vec<Value> = longhands.iter().flatten().cloned().collect();
    if values.is_empty() || values.iter().any(is_layered) {
        return None;
    }
    Some(values)
}
