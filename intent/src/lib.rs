//! Rule-based intent classification.
//!
//! An utterance is reduced to a single [`TaskLabel`] by evaluating an ordered
//! table of [`PatternRule`]s. The first rule that matches wins; when nothing
//! matches the sentinel [`TaskLabel::NoTaskFound`] is returned.
//!
//! # Example
//!
//! ```rust
//! use suggest_intent::{classify, TaskLabel};
//!
//! assert_eq!(classify("please RESET my PASSWORD"), TaskLabel::ResetPassword);
//! assert_eq!(classify("track order 12345"), TaskLabel::CheckOrderStatus);
//! assert_eq!(classify("order a pizza"), TaskLabel::NoTaskFound);
//! ```
//!
//! Extra rules can be appended from a JSON or YAML rule file:
//!
//! ```rust,ignore
//! let classifier = Classifier::from_rule_file("rules.yaml")?;
//! ```

mod classifier;
mod error;
mod label;
mod rule;

pub use classifier::{classify, Classifier, PatternRule};
pub use error::RuleError;
pub use label::TaskLabel;
pub use rule::{Rule, RuleFile};
