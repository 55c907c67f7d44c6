//! Text processing for customer replies
//!
//! This crate turns free-text customer replies into structured values:
//! - **Normalization**: lowercase, unicode word segmentation, apostrophe folding
//! - **Intent rules**: priority-ordered phrase tables mapping a reply to a
//!   payment status
//! - **Entities**: promised amounts (with lakh/thousand multipliers) and
//!   payment dates (absolute, numeric and relative)
//!
//! # Example
//!
//! ```ignore
//! use collections_agent_text_processing::{EntityExtractor, RuleBasedClassifier};
//!
//! let classifier = RuleBasedClassifier::new();
//! assert_eq!(classifier.classify("I already paid last week"), PaymentStatus::Paid);
//!
//! let extractor = EntityExtractor::new();
//! let promise = extractor.extract_promise("I will pay 20000 on 5th march", today);
//! ```

pub mod entities;
pub mod intent;
pub mod normalize;

pub use entities::{month_number, EntityExtractor, PromiseToPay};
pub use intent::{IntentMatch, RuleBasedClassifier};
pub use normalize::{contains_phrase, normalize_utterance};
