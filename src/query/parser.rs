use std::sync::Arc;

use crate::core::error::{Error, Result};
use crate::query::ast::{BoolQuery, PhraseQuery, Query, RangeQuery, TermQuery, WildcardQuery};
use crate::schema::mapping::SchemaMapping;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperator {
    And,
    Or,
}

/// Query parser configured against a schema mapping. Terms and range bounds
/// on mapped columns are rewritten into the column's index encoding, so
/// queries compare against what the documents actually hold.
///
/// Examples:
/// - `rust programming`        -> OR of terms on the default field
/// - `title:rust`              -> term on a field
/// - `"exact phrase"`          -> phrase query
/// - `price:[10 TO 100]`       -> range with encoded bounds
/// - `code:F*-9?`              -> wildcard, case preserved
/// - `rust AND NOT legacy`     -> boolean combination
pub struct QueryParser {
    mapping: Arc<SchemaMapping>,
    pub default_field: String,
    pub default_operator: BooleanOperator,
    pub allow_leading_wildcard: bool,
    pub lowercase_expanded_terms: bool,
}

impl QueryParser {
    pub fn new(mapping: Arc<SchemaMapping>, default_field: &str) -> Self {
        QueryParser {
            mapping,
            default_field: default_field.to_string(),
            default_operator: BooleanOperator::Or,
            allow_leading_wildcard: true,
            lowercase_expanded_terms: false,
        }
    }

    pub fn parse(&self, input: &str) -> Result<Query> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Query::MatchAll);
        }

        let tokens = split_clauses(input);
        if tokens.iter().any(|t| matches!(t.as_str(), "AND" | "OR" | "NOT")) {
            return self.parse_boolean(&tokens);
        }

        if tokens.len() == 1 {
            return self.parse_clause(&tokens[0]);
        }

        let mut bool_query = BoolQuery::new();
        for token in &tokens {
            let clause = self.parse_clause(token)?;
            match self.default_operator {
                BooleanOperator::And => bool_query.must.push(clause),
                BooleanOperator::Or => bool_query.should.push(clause),
            }
        }
        Ok(Query::Bool(bool_query))
    }

    /// AND binds both adjacent clauses: the one before it is pulled out of
    /// the optional bucket and made required, like the one after
    fn parse_boolean(&self, tokens: &[String]) -> Result<Query> {
        let mut bool_query = BoolQuery::new();
        let mut operator = self.default_operator;
        let mut negate = false;

        for token in tokens {
            match token.as_str() {
                "AND" => {
                    operator = BooleanOperator::And;
                    if let Some(previous) = bool_query.should.pop() {
                        bool_query.must.push(previous);
                    }
                }
                "OR" => operator = BooleanOperator::Or,
                "NOT" => negate = true,
                term => {
                    let clause = self.parse_clause(term)?;
                    if negate {
                        bool_query.must_not.push(clause);
                        negate = false;
                    } else {
                        match operator {
                            BooleanOperator::And => bool_query.must.push(clause),
                            BooleanOperator::Or => bool_query.should.push(clause),
                        }
                    }
                }
            }
        }
        Ok(Query::Bool(bool_query))
    }

    /// One clause: optional `field:` prefix, then a phrase, range, wildcard
    /// or term
    fn parse_clause(&self, text: &str) -> Result<Query> {
        // A leading quote means the whole clause is a phrase on the default
        // field; a colon inside it is part of the phrase text
        let (field, value) = if text.starts_with('"') {
            (self.default_field.as_str(), text)
        } else {
            match text.find(':') {
                Some(pos) => (&text[..pos], &text[pos + 1..]),
                None => (self.default_field.as_str(), text),
            }
        };

        if value.starts_with('[') || value.starts_with('{') {
            return self.parse_range(field, value);
        }
        if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
            return self.parse_phrase(field, value.trim_matches('"'));
        }
        if value.contains('*') || value.contains('?') {
            return self.parse_wildcard(field, value);
        }

        Ok(Query::Term(TermQuery {
            field: field.to_string(),
            value: self.encode(field, value)?,
        }))
    }

    fn parse_phrase(&self, field: &str, text: &str) -> Result<Query> {
        let analyzed = self
            .mapping
            .codec(field)
            .map(|codec| codec.analyzed())
            .unwrap_or(true);

        if analyzed {
            let phrase = self
                .mapping
                .analyzer()
                .analyze(field, text)
                .into_iter()
                .map(|token| token.text)
                .collect();
            Ok(Query::Phrase(PhraseQuery {
                field: field.to_string(),
                phrase,
            }))
        } else {
            // Verbatim field: the quotes only protect the value
            Ok(Query::Term(TermQuery {
                field: field.to_string(),
                value: self.encode(field, text)?,
            }))
        }
    }

    /// `[a TO b]` inclusive, `{a TO b}` exclusive, `*` for an open end
    fn parse_range(&self, field: &str, value: &str) -> Result<Query> {
        let include_lower = value.starts_with('[');
        let include_upper = value.ends_with(']');
        if !(value.ends_with(']') || value.ends_with('}')) {
            return Err(Error::invalid_value(format!("unterminated range: {}", value)));
        }

        let inner = &value[1..value.len() - 1];
        let (lower, upper) = inner.split_once(" TO ").ok_or_else(|| {
            Error::invalid_value(format!("range must be '<lower> TO <upper>': {}", inner))
        })?;

        let encode_bound = |bound: &str| -> Result<Option<String>> {
            let bound = bound.trim();
            if bound == "*" {
                return Ok(None);
            }
            self.encode(field, bound).map(Some)
        };

        Ok(Query::Range(RangeQuery {
            field: field.to_string(),
            lower: encode_bound(lower)?,
            upper: encode_bound(upper)?,
            include_lower,
            include_upper,
        }))
    }

    fn parse_wildcard(&self, field: &str, pattern: &str) -> Result<Query> {
        if !self.allow_leading_wildcard && pattern.starts_with(['*', '?']) {
            return Err(Error::invalid_value(format!(
                "leading wildcard not allowed: {}",
                pattern
            )));
        }
        let pattern = if self.lowercase_expanded_terms {
            pattern.to_lowercase()
        } else {
            pattern.to_string()
        };
        Ok(Query::Wildcard(WildcardQuery {
            field: field.to_string(),
            pattern,
        }))
    }

    /// Rewrite a user term into the column's index encoding. Unmapped
    /// fields keep the raw text.
    fn encode(&self, field: &str, raw: &str) -> Result<String> {
        match self.mapping.codec(field) {
            Some(codec) => codec.query_value(raw),
            None => Ok(raw.to_string()),
        }
    }
}

/// Split a query into clause tokens. Whitespace separates clauses except
/// inside a quoted phrase or a bracketed range, which stay whole.
fn split_clauses(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut in_range = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '[' | '{' if !in_quotes => {
                in_range = true;
                current.push(c);
            }
            ']' | '}' if !in_quotes => {
                in_range = false;
                current.push(c);
            }
            c if c.is_whitespace() && !in_quotes && !in_range => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
