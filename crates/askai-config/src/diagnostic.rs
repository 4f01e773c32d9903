// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean" suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a key to be offered as a correction.
const MIN_SIMILARITY: f64 = 0.75;

/// One problem found while loading or validating `askai.toml`.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key no section declares, usually a typo.
    #[error("unknown configuration key `{key}`{}", section_suffix(.section))]
    #[diagnostic(
        code(askai::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        section: String,
        suggestion: Option<String>,
        valid_keys: String,
    },

    /// A value that does not deserialize into the field type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(askai::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A field with no default was left out.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(askai::config::missing_key),
        help("add `{key} = <value>` to askai.toml or set the matching ASKAI_ variable")
    )]
    MissingKey { key: String },

    /// A semantic validation failure.
    #[error("validation error: {message}")]
    #[diagnostic(code(askai::config::validation))]
    Validation { message: String },

    /// Anything figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(askai::config::other))]
    Other(String),
}

fn section_suffix(section: &str) -> String {
    if section.is_empty() {
        String::new()
    } else {
        format!(" in [{section}]")
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Known keys: {valid_keys}"),
        None => format!("known keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path = error.path.join(".");
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let valid_keys: Vec<&str> = expected.to_vec();
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        section: path,
                        suggestion: suggest_key(field, &valid_keys),
                        valid_keys: valid_keys.join(", "),
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: if path.is_empty() {
                        field.to_string()
                    } else {
                        format!("{path}.{field}")
                    },
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: path,
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Suggest the closest valid key above the similarity threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > MIN_SIMILARITY)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Prints every error to stderr as a miette report.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("askai: {error}");
        }
    }
}
