//! Edge case tests for fos-cssom
//!
//! Tests degenerate inputs, cascade corner cases and value clamping.

use fos_cssom::{
    create_shorthands, expand_shorthands, merge_declarations, Color, ColorFamily, Comparison,
    CssList, DeclarationBlock, Document, Import, Node, Rule, RuleSet, Separator, Size,
    SpecificityFilter, Value, ValueList,
};

fn keyword(keyword: &str) -> Value {
    Value::keyword(keyword)
}

fn px(value: f64) -> Value {
    Size::with_unit(value, "px").into()
}

fn block(selector: &str, rules: Vec<Rule>) -> DeclarationBlock {
    let mut block = DeclarationBlock::with_selector_text(selector);
    for rule in rules {
        block.add_rule(rule);
    }
    block
}

fn layers(values: Vec<Value>) -> Value {
    Value::List(ValueList::from_components(values, Separator::Comma))
}

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_merge_nothing() {
    let merged = merge_declarations(Vec::<&mut DeclarationBlock>::new());
    assert!(merged.rules().is_empty());
    assert_eq!(merged.to_string(), "{}");
}

#[test]
fn test_merge_empty_document() {
    let mut document = Document::new();
    assert!(document.is_empty());
    assert_eq!(document.merge_declarations().to_string(), "{}");
    assert!(document.collect_values(None, None, true).is_empty());
    assert!(document.collect_selectors_by_specificity(None).is_empty());
}

#[test]
fn test_shorthand_passes_on_empty_rule_set() {
    let mut set = RuleSet::new();
    expand_shorthands(&mut set);
    create_shorthands(&mut set);
    assert!(set.is_empty());
}

#[test]
fn test_list_indices_out_of_range() {
    let mut list = CssList::new();
    list.insert_at(10, vec![Node::from(Import::new("a.css"))]);
    assert_eq!(list.len(), 1);
    assert!(list.remove_at(1).is_none());
    assert!(list.remove_at(0).is_some());
    assert!(list.remove_at(0).is_none());
}

// ============================================================================
// CASCADE CORNER CASES
// ============================================================================

#[test]
fn test_grouped_selectors_have_no_specificity() {
    let mut grouped = block("#a, #b", vec![Rule::with_values("color", vec![keyword("red")])]);
    let mut plain = block("p", vec![Rule::with_values("color", vec![keyword("blue")])]);
    let merged = merge_declarations([&mut grouped, &mut plain]);
    assert_eq!(merged.to_string(), "{color: blue;}");
}

#[test]
fn test_duplicates_within_one_block() {
    let mut later = block(
        "p",
        vec![
            Rule::with_values("color", vec![keyword("red")]),
            Rule::with_values("color", vec![keyword("blue")]),
        ],
    );
    assert_eq!(merge_declarations([&mut later]).to_string(), "{color: blue;}");

    let mut important = block(
        "p",
        vec![
            Rule::with_values("color", vec![keyword("red")]).important(true),
            Rule::with_values("color", vec![keyword("blue")]),
        ],
    );
    assert_eq!(merge_declarations([&mut important]).to_string(), "{color: red !important;}");
}

#[test]
fn test_shorthand_side_overridden_by_longhand() {
    let mut input = block(
        "p",
        vec![
            Rule::with_values("margin", vec![px(4.0)]),
            Rule::with_values("margin-left", vec![px(0.0)]),
        ],
    );
    let merged = merge_declarations([&mut input]);
    assert_eq!(merged.to_string(), "{margin: 4px 4px 4px 0px;}");
}

#[test]
fn test_mixed_importance_blocks_compaction() {
    let mut shorthand = block("", vec![Rule::with_values("padding", vec![px(1.0)])]);
    let mut side = block(
        "",
        vec![Rule::with_values("padding-top", vec![px(2.0)]).important(true)],
    );
    let merged = merge_declarations([&mut shorthand, &mut side]);
    assert_eq!(
        merged.to_string(),
        "{padding-top: 2px !important;padding-right: 1px;padding-bottom: 1px;padding-left: 1px;}"
    );
}

// ============================================================================
// SHORTHAND LIMITS
// ============================================================================

#[test]
fn test_multi_layer_background_is_left_alone() {
    let mut set = RuleSet::from_rules(vec![Rule::with_values(
        "background",
        vec![layers(vec![keyword("none"), keyword("none")])],
    )]);
    let before = set.clone();
    expand_shorthands(&mut set);
    assert_eq!(set, before);

    let mut longhands = RuleSet::from_rules(vec![
        Rule::with_values("background-color", vec![keyword("red")]),
        Rule::with_values("background-image", vec![layers(vec![keyword("none"), keyword("none")])]),
    ]);
    let before = longhands.clone();
    create_shorthands(&mut longhands);
    assert_eq!(longhands, before);
}

#[test]
fn test_existing_shorthand_blocks_compaction() {
    let mut set = RuleSet::from_rules(vec![
        Rule::with_values("margin-top", vec![px(1.0)]),
        Rule::with_values("margin-right", vec![px(1.0)]),
        Rule::with_values("margin-bottom", vec![px(1.0)]),
        Rule::with_values("margin-left", vec![px(1.0)]),
        Rule::with_values("margin", vec![px(2.0)]),
    ]);
    let before = set.clone();
    create_shorthands(&mut set);
    assert_eq!(set, before);
}

#[test]
fn test_duplicate_longhand_blocks_compaction() {
    let mut set = RuleSet::from_rules(vec![
        Rule::with_values("list-style-type", vec![keyword("disc")]),
        Rule::with_values("list-style-type", vec![keyword("square")]),
    ]);
    create_shorthands(&mut set);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_system_font_is_not_expanded() {
    let mut set = RuleSet::from_rules(vec![Rule::with_values("font", vec![keyword("caption")])]);
    expand_shorthands(&mut set);
    assert_eq!(set.to_string(), "font: caption;");
}

#[test]
fn test_inherit_expands_everywhere() {
    let mut set = RuleSet::from_rules(vec![Rule::with_values("font", vec![keyword("inherit")])]);
    expand_shorthands(&mut set);
    assert_eq!(set.len(), 6);
    assert!(set.rules().iter().all(|rule| rule.values == vec![keyword("inherit")]));
}

#[test]
fn test_inherit_merges_back_to_shorthands() {
    let mut input = block(
        "p",
        vec![
            Rule::with_values("background", vec![keyword("inherit")]),
            Rule::with_values("font", vec![keyword("inherit")]),
        ],
    );
    let merged = merge_declarations([&mut input]);
    assert_eq!(merged.to_string(), "{background: inherit;font: inherit;}");
}

#[test]
fn test_list_style_none_round_trip() {
    let mut set = RuleSet::from_rules(vec![Rule::with_values("list-style", vec![keyword("none")])]);
    expand_shorthands(&mut set);
    assert_eq!(set.rule("list-style-type").unwrap().values, vec![keyword("none")]);
    assert_eq!(set.rule("list-style-image").unwrap().values, vec![keyword("none")]);
    create_shorthands(&mut set);
    assert_eq!(set.to_string(), "list-style: none outside none;");
}

#[test]
fn test_font_family_list_merges() {
    let family = layers(vec![keyword("Georgia"), keyword("serif")]);
    let mut input = block("p", vec![Rule::with_values("font", vec![px(12.0), family])]);
    let merged = merge_declarations([&mut input]);
    assert_eq!(merged.rules().len(), 1);
    assert_eq!(merged.to_string(), "{font: 12px Georgia,serif;}");
}

#[test]
fn test_document_expansion_is_idempotent() {
    let mut document = Document::new();
    document.append(block(
        "p",
        vec![
            Rule::with_values("border", vec![keyword("thin"), keyword("dotted")]),
            Rule::with_values("list-style", vec![keyword("none")]),
        ],
    ));
    document.expand_shorthands();
    let once = document.clone();
    document.expand_shorthands();
    assert_eq!(document, once);
}

// ============================================================================
// VALUE CLAMPING AND FORMATTING
// ============================================================================

#[test]
fn test_rgb_channels_clamp_and_round() {
    let color = Color::from_rgb(300.0, -5.0, 127.5, None);
    assert_eq!(color.to_string(), "rgb(255,0,128)");
    assert_eq!(Color::from_rgb(f64::NAN, 0.0, 0.0, None).to_string(), "rgb(0,0,0)");
}

#[test]
fn test_alpha_edges() {
    assert_eq!(Color::from_rgb(1.0, 2.0, 3.0, Some(1.0)).to_string(), "rgb(1,2,3)");
    assert_eq!(Color::from_rgb(1.0, 2.0, 3.0, Some(4.0)).to_string(), "rgb(1,2,3)");
    assert_eq!(Color::from_rgb(1.0, 2.0, 3.0, Some(-1.0)).to_string(), "rgba(1,2,3,0)");
}

#[test]
fn test_hue_wraps() {
    let green = Color::from_hsl(120.0, 100.0, 50.0, None);
    assert_eq!(Color::from_hsl(480.0, 100.0, 50.0, None), green);
    assert_eq!(Color::from_hsl(-240.0, 100.0, 50.0, None), green);
}

#[test]
fn test_malformed_colors() {
    for bad in ["#12", "#1234", "zzz", "#ggg", ""] {
        assert!(Color::from_hex(bad).is_none(), "{:?} should not parse", bad);
    }
    assert!(Color::from_named("notacolor").is_none());
    assert!(Color::from_channels(&[('r', 1.0), ('g', 2.0)]).is_none());
    assert_eq!(
        Color::from_channels(&[('h', 0.0), ('s', 100.0), ('l', 50.0), ('r', 0.0)])
            .map(|c| c.family()),
        Some(Some(ColorFamily::Rgb))
    );
}

#[test]
fn test_empty_color() {
    let mut color = Color::default();
    assert!(color.is_empty());
    assert_eq!(color.family(), None);
    color.to_rgb();
    assert!(color.is_empty());
    assert!(color.hex_value().is_none());
}

#[test]
fn test_size_signs() {
    assert_eq!(Size::number(-0.0).to_string(), "0");
    assert_eq!(Size::with_unit(-0.5, "em").to_string(), "-.5em");
    assert_eq!(Size::channel(0.25, None).to_string(), "0.25");
}

// ============================================================================
// SPECIFICITY FILTERS
// ============================================================================

#[test]
fn test_filter_whitespace_variants() {
    let filter: SpecificityFilter = "  <=   10  ".parse().unwrap();
    assert_eq!(filter, SpecificityFilter::new(Comparison::LessOrEqual, 10));
    assert!(filter.matches(10));
    assert!(!filter.matches(11));
}

#[test]
fn test_filter_overflow_is_rejected() {
    assert!("99999999999".parse::<SpecificityFilter>().is_err());
}
