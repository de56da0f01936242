//! FAQ entry and document models
//!
//! A document is the complete persisted state of one environment: an ordered
//! list of entries, each carrying one or more phrasings of the same question
//! and a single answer.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use super::environment::Environment;
use super::ids::FaqId;

/// One answerable question unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// Stable identifier, unique within the document
    pub id: FaqId,

    /// Variants of the same question, never empty
    pub questions: Vec<String>,

    /// The answer text
    pub answer: String,

    /// Optional grouping; `None` means uncategorized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Auxiliary payload (reference links), stored verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<serde_json::Value>,
}

impl FaqEntry {
    /// Validate the entry invariants
    pub fn validate(&self) -> Result<(), FaqValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(FaqValidationError::EmptyId);
        }

        if self.questions.is_empty() {
            return Err(FaqValidationError::NoQuestions);
        }

        for (index, question) in self.questions.iter().enumerate() {
            if question.trim().is_empty() {
                return Err(FaqValidationError::BlankQuestion(index));
            }
            if question.trim() != question {
                return Err(FaqValidationError::UntrimmedQuestion(index));
            }
        }

        if self.answer.trim().is_empty() {
            return Err(FaqValidationError::EmptyAnswer);
        }

        if matches!(&self.category, Some(c) if c.trim().is_empty()) {
            return Err(FaqValidationError::BlankCategory);
        }

        // Stored as an absent field, so it would read back as `None`
        if matches!(self.links, Some(serde_json::Value::Null)) {
            return Err(FaqValidationError::NullLinks);
        }

        Ok(())
    }

    /// The first question variant, used as a display title
    pub fn primary_question(&self) -> &str {
        self.questions.first().map(String::as_str).unwrap_or_default()
    }

    /// Apply a partial update; fields left `None` in the patch are untouched
    pub fn apply(&mut self, patch: FaqEntryPatch) {
        if let Some(questions) = patch.questions {
            self.questions = normalize_questions(questions);
        }
        if let Some(answer) = patch.answer {
            self.answer = answer.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = normalize_category(category);
        }
        if let Some(links) = patch.links {
            self.links = normalize_links(links);
        }
    }
}

impl fmt::Display for FaqEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary_question())
    }
}

/// Entry data supplied by a caller creating a new entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewFaqEntry {
    pub questions: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub links: Option<serde_json::Value>,
}

impl NewFaqEntry {
    /// Create entry data with a single question phrasing
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            questions: vec![question.into()],
            answer: answer.into(),
            category: None,
            links: None,
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the links payload
    pub fn with_links(mut self, links: serde_json::Value) -> Self {
        self.links = Some(links);
        self
    }

    /// Build a normalized entry under the given id
    pub fn into_entry(self, id: FaqId) -> FaqEntry {
        FaqEntry {
            id,
            questions: normalize_questions(self.questions),
            answer: self.answer.trim().to_string(),
            category: normalize_category(self.category),
            links: normalize_links(self.links),
        }
    }
}

/// Partial update of an entry
///
/// `category` and `links` are doubly optional: `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaqEntryPatch {
    pub questions: Option<Vec<String>>,
    pub answer: Option<String>,
    pub category: Option<Option<String>>,
    pub links: Option<Option<serde_json::Value>>,
}

impl FaqEntryPatch {
    /// Check whether the patch changes anything
    pub fn is_empty(&self) -> bool {
        self.questions.is_none()
            && self.answer.is_none()
            && self.category.is_none()
            && self.links.is_none()
    }
}

fn normalize_questions(questions: Vec<String>) -> Vec<String> {
    questions.into_iter().map(|q| q.trim().to_string()).collect()
}

fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn normalize_links(links: Option<serde_json::Value>) -> Option<serde_json::Value> {
    links.filter(|l| !l.is_null())
}

/// The full persisted state of one environment
#[derive(Debug, Clone, PartialEq)]
pub struct FaqDocument {
    pub environment: Environment,
    pub entries: Vec<FaqEntry>,
}

impl FaqDocument {
    /// An empty document, used on first access to an environment
    pub fn empty(environment: Environment) -> Self {
        Self {
            environment,
            entries: Vec::new(),
        }
    }

    /// Position of an entry by id
    pub fn position(&self, id: &FaqId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    /// Look up an entry by id
    pub fn get(&self, id: &FaqId) -> Option<&FaqEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total question variants across all entries
    pub fn question_count(&self) -> usize {
        self.entries.iter().map(|e| e.questions.len()).sum()
    }

    /// Distinct categories in use, sorted
    pub fn categories(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter_map(|e| e.category.clone())
            .collect()
    }

    /// Validate every entry and id uniqueness
    pub fn validate(&self) -> Result<(), FaqValidationError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        for entry in &self.entries {
            entry.validate()?;
            if !seen.insert(&entry.id) {
                return Err(FaqValidationError::DuplicateId(entry.id.to_string()));
            }
        }
        Ok(())
    }
}

/// Validation errors for FAQ entries and documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaqValidationError {
    EmptyId,
    NoQuestions,
    BlankQuestion(usize),
    UntrimmedQuestion(usize),
    EmptyAnswer,
    BlankCategory,
    NullLinks,
    DuplicateId(String),
}

impl fmt::Display for FaqValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "FAQ id cannot be empty"),
            Self::NoQuestions => write!(f, "FAQ must have at least one question"),
            Self::BlankQuestion(i) => write!(f, "Question {} is blank", i + 1),
            Self::UntrimmedQuestion(i) => {
                write!(f, "Question {} has leading or trailing whitespace", i + 1)
            }
            Self::EmptyAnswer => write!(f, "FAQ answer cannot be empty"),
            Self::BlankCategory => write!(f, "Category cannot be blank when present"),
            Self::NullLinks => write!(f, "Links must be omitted rather than null"),
            Self::DuplicateId(id) => write!(f, "Duplicate FAQ id: {}", id),
        }
    }
}

impl std::error::Error for FaqValidationError {}
