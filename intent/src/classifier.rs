//! Ordered pattern rules and the classifier that evaluates them.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::RuleError;
use crate::label::TaskLabel;
use crate::rule::{Rule, RuleFile};

/// Tokens that express a password problem. Prefix matches.
const RESET_ACTIONS: &[&str] = &[
    "reset",
    "resetting",
    "forgot",
    r"can['’]t\s+remember",
    r"cannot\s+remember",
    "lost",
    "recover",
    "recovering",
];

/// Tokens that ask about an order. Prefix matches.
const ORDER_INQUIRIES: &[&str] = &["track", "check", "follow", r"where\s+is"];

static BUILTIN: Lazy<Classifier> = Lazy::new(Classifier::builtin);

/// Classify an utterance with the built-in rule set.
pub fn classify(utterance: &str) -> TaskLabel {
    BUILTIN.classify(utterance)
}

/// A compiled rule: the label and the patterns that select it.
#[derive(Debug, Clone)]
pub struct PatternRule {
    label: TaskLabel,
    patterns: Vec<Regex>,
}

impl PatternRule {
    /// Compile a rule. Patterns are case-insensitive and `.` spans newlines.
    pub fn compile(rule: &Rule) -> Result<Self, RuleError> {
        if rule.label.trim().is_empty() {
            return Err(RuleError::EmptyLabel);
        }
        let Ok(label) = rule.label.trim().parse::<TaskLabel>();
        if !label.is_found() {
            return Err(RuleError::ReservedLabel(rule.label.clone()));
        }

        if rule.patterns.is_empty() {
            return Err(RuleError::NoPatterns {
                label: rule.label.clone(),
            });
        }

        let patterns = rule
            .patterns
            .iter()
            .map(|p| {
                compile_pattern(p).map_err(|source| RuleError::InvalidPattern {
                    label: rule.label.clone(),
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { label, patterns })
    }

    /// Label returned when this rule matches.
    pub fn label(&self) -> &TaskLabel {
        &self.label
    }

    /// Reports whether any pattern matches the text.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

/// An immutable, ordered rule table. The first matching rule wins.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<PatternRule>,
}

impl Classifier {
    /// The built-in rules: password reset first, then order status.
    pub fn builtin() -> Self {
        let rules = builtin_rules()
            .iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>, _>>()
            .expect("builtin rules compile");
        Self { rules }
    }

    /// Build a classifier from an explicit, ordered rule list.
    pub fn new(rules: &[Rule]) -> Result<Self, RuleError> {
        let rules = rules
            .iter()
            .map(PatternRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Built-in rules followed by `extra`, which therefore never outrank them.
    pub fn with_extra_rules(extra: &[Rule]) -> Result<Self, RuleError> {
        let mut rules = builtin_rules();
        rules.extend_from_slice(extra);
        Self::new(&rules)
    }

    /// Built-in rules followed by the rules of a JSON/YAML file.
    pub fn from_rule_file(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let file = RuleFile::load(path)?;
        Self::with_extra_rules(&file.rules)
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Return the label of the first matching rule, or `NoTaskFound`.
    pub fn classify(&self, utterance: &str) -> TaskLabel {
        self.rules
            .iter()
            .find(|rule| rule.matches(utterance))
            .map(|rule| rule.label.clone())
            .unwrap_or(TaskLabel::NoTaskFound)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

fn builtin_rules() -> Vec<Rule> {
    let reset = prefix_of(RESET_ACTIONS);
    let password = word_of(&["passwords?"]);
    let inquiry = prefix_of(ORDER_INQUIRIES);
    let order = word_of(&["orders?"]);

    vec![
        Rule::new(
            TaskLabel::ResetPassword.as_str(),
            [either_order(&reset, &password)],
        ),
        Rule::new(
            TaskLabel::CheckOrderStatus.as_str(),
            [r"\border\s*status\b".to_string(), either_order(&inquiry, &order)],
        ),
    ]
}

fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
}

/// Any of the alternatives, starting at a word boundary.
fn prefix_of(alternatives: &[&str]) -> String {
    format!(r"\b(?:{})", alternatives.join("|"))
}

/// Any of the alternatives as a whole word.
fn word_of(alternatives: &[&str]) -> String {
    format!(r"\b(?:{})\b", alternatives.join("|"))
}

/// Both fragments, in either order, with anything in between.
fn either_order(a: &str, b: &str) -> String {
    format!("{a}.*{b}|{b}.*{a}")
}
