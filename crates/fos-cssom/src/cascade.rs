//! Declaration Merging
//!
//! Folds declaration blocks given in cascade order into one block by:
//! 1. Expanding shorthands in every input block
//! 2. Keeping one declaration per property, by importance then specificity
//! 3. Rebuilding shorthands on the result

use std::collections::HashMap;

use crate::config::Config;
use crate::declaration::{DeclarationBlock, Rule};
use crate::shorthands;
use crate::tree::CssList;
use crate::values::Value;

/// Winning declaration of one property
#[derive(Debug, Clone)]
struct Candidate {
    values: Vec<Value>,
    specificity: u32,
    important: bool,
}

impl Candidate {
    /// Whether `other`, seen later, takes over this property
    fn yields_to(&self, other: &Candidate) -> bool {
        (self.specificity <= other.specificity && !self.important) || other.important
    }
}

/// Accumulates declaration blocks and resolves them into one
pub struct DeclarationMerger {
    config: Config,
    /// Properties in first-seen order
    order: Vec<String>,
    winners: HashMap<String, Candidate>,
}

impl DeclarationMerger {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            order: Vec::new(),
            winners: HashMap::new(),
        }
    }

    /// Fold a block in. Expansion rewrites the block's own rules.
    pub fn add_block(&mut self, block: &mut DeclarationBlock) {
        if self.config.expand_shorthands {
            shorthands::expand_shorthands(&mut block.rule_set);
        }

        let specificity = block.cascade_specificity();
        tracing::trace!(
            "Merging {} rules at specificity {}",
            block.rule_set.len(),
            specificity
        );

        for rule in block.rules() {
            self.offer(rule, specificity);
        }
    }

    fn offer(&mut self, rule: &Rule, specificity: u32) {
        let candidate = Candidate {
            values: rule.values.clone(),
            specificity,
            important: rule.important,
        };

        match self.winners.get_mut(&rule.property) {
            Some(stored) => {
                if stored.yields_to(&candidate) {
                    *stored = candidate;
                } else {
                    tracing::trace!("Kept earlier {} over {}", rule.property, rule);
                }
            }
            None => {
                self.order.push(rule.property.clone());
                self.winners.insert(rule.property.clone(), candidate);
            }
        }
    }

    /// Build the merged block (no selectors)
    pub fn finish(mut self) -> DeclarationBlock {
        let mut merged = DeclarationBlock::new();

        for property in self.order {
            if let Some(winner) = self.winners.remove(&property) {
                let rule = Rule::with_values(property, winner.values).important(winner.important);
                merged.add_rule(rule);
            }
        }

        if self.config.create_shorthands {
            shorthands::create_shorthands(&mut merged.rule_set);
        }

        tracing::debug!("Merged declarations into {} rules", merged.rule_set.len());
        merged
    }
}

impl Default for DeclarationMerger {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Merge blocks given in cascade order with the default configuration.
///
/// Shorthands in the inputs are expanded in place.
pub fn merge_declarations<'a, I>(blocks: I) -> DeclarationBlock
where
    I: IntoIterator<Item = &'a mut DeclarationBlock>,
{
    merge_declarations_with(blocks, &Config::default())
}

/// Merge blocks given in cascade order
pub fn merge_declarations_with<'a, I>(blocks: I, config: &Config) -> DeclarationBlock
where
    I: IntoIterator<Item = &'a mut DeclarationBlock>,
{
    let mut merger = DeclarationMerger::new(config.clone());
    for block in blocks {
        merger.add_block(block);
    }
    merger.finish()
}

impl CssList {
    /// Merge every declaration block of this list, in document order
    pub fn merge_declarations(&mut self) -> DeclarationBlock {
        merge_declarations(self.collect_declaration_blocks_mut())
    }

    pub fn merge_declarations_with(&mut self, config: &Config) -> DeclarationBlock {
        merge_declarations_with(self.collect_declaration_blocks_mut(), config)
    }
}
