use std::collections::HashMap;
use std::sync::Arc;

use rust_stemmers::Algorithm;

use crate::analysis::filter::{LowercaseFilter, StemmerFilter, StopWordFilter, TokenFilter};
use crate::analysis::token::Token;
use crate::analysis::tokenizer::{KeywordTokenizer, StandardTokenizer, Tokenizer};

/// Text analysis pipeline: one tokenizer followed by token filters
pub struct Analyzer {
    pub name: String,
    pub tokenizer: Box<dyn Tokenizer>,
    pub filters: Vec<Box<dyn TokenFilter>>,
}

impl Analyzer {
    pub fn new(name: String, tokenizer: Box<dyn Tokenizer>) -> Self {
        Analyzer {
            name,
            tokenizer,
            filters: Vec::new(),
        }
    }

    pub fn add_filter(mut self, filter: Box<dyn TokenFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);

        for filter in &self.filters {
            tokens = filter.filter(tokens);
        }

        tokens
    }

    /// Unicode words, lowercased
    pub fn standard() -> Self {
        Analyzer::new("standard".to_string(), Box::new(StandardTokenizer::default()))
            .add_filter(Box::new(LowercaseFilter))
    }

    /// Standard pipeline plus English stop words and stemming
    pub fn english() -> Self {
        Analyzer::new("english".to_string(), Box::new(StandardTokenizer::default()))
            .add_filter(Box::new(LowercaseFilter))
            .add_filter(Box::new(StopWordFilter::english()))
            .add_filter(Box::new(StemmerFilter::new(Algorithm::English)))
    }

    /// Whole value as a single verbatim token
    pub fn keyword() -> Self {
        Analyzer::new("keyword".to_string(), Box::new(KeywordTokenizer))
    }

    /// Resolve one of the built-in analyzers by name. Analyzer registries
    /// beyond this fixed set belong to the surrounding system.
    pub fn by_name(name: &str) -> Option<Analyzer> {
        match name {
            "standard" => Some(Analyzer::standard()),
            "english" => Some(Analyzer::english()),
            "keyword" => Some(Analyzer::keyword()),
            _ => None,
        }
    }
}

/// Dispatches analysis per field, falling back to the default analyzer for
/// fields without their own. Built once per schema, shared read-only.
pub struct PerFieldAnalyzer {
    default: Arc<Analyzer>,
    per_field: HashMap<String, Arc<Analyzer>>,
}

impl PerFieldAnalyzer {
    pub fn new(default: Analyzer, per_field: HashMap<String, Arc<Analyzer>>) -> Self {
        PerFieldAnalyzer {
            default: Arc::new(default),
            per_field,
        }
    }

    pub fn analyzer_for(&self, field: &str) -> &Analyzer {
        self.per_field
            .get(field)
            .map(Arc::as_ref)
            .unwrap_or(self.default.as_ref())
    }

    pub fn analyze(&self, field: &str, text: &str) -> Vec<Token> {
        self.analyzer_for(field).analyze(text)
    }
}
