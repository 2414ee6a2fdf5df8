//! List filters and their translation into query parameters.
//!
//! # Design
//! - Filters hold exactly what the user typed; sanitising happens when the
//!   query parameters are built.
//! - Values with leading or trailing whitespace are not sent at all.
//! - An invalid discipline blocks the request instead of being dropped.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use odf_api_models::DocumentListParams;
use thiserror::Error;

/// Message shown inline when the discipline filter is malformed.
pub const DISCIPLINE_HINT: &str = "discipline must be exactly 3 uppercase letters";

/// Errors raised while editing or applying filters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// Discipline is neither empty nor three ASCII uppercase letters.
    #[error("discipline must be exactly 3 uppercase letters (got `{value}`)")]
    InvalidDiscipline {
        /// Rejected value.
        value: String,
    },
    /// Field name not recognised.
    #[error("unknown filter `{name}`; expected one of {}", FilterField::names())]
    UnknownField {
        /// Name as typed.
        name: String,
    },
}

/// Filterable list fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    /// `competitionCode`.
    CompetitionCode,
    /// `documentCode`.
    DocumentCode,
    /// `documentType`.
    DocumentType,
    /// `documentSubtype`.
    DocumentSubtype,
    /// `discipline`.
    Discipline,
}

impl FilterField {
    /// Every field, in display order.
    pub const ALL: [Self; 5] = [
        Self::CompetitionCode,
        Self::DocumentCode,
        Self::DocumentType,
        Self::DocumentSubtype,
        Self::Discipline,
    ];

    /// Kebab-case name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompetitionCode => "competition-code",
            Self::DocumentCode => "document-code",
            Self::DocumentType => "document-type",
            Self::DocumentSubtype => "document-subtype",
            Self::Discipline => "discipline",
        }
    }

    /// Whether edits are typed text (and therefore debounced).
    #[must_use]
    pub const fn is_free_text(self) -> bool {
        !matches!(self, Self::Discipline)
    }

    fn names() -> String {
        Self::ALL
            .iter()
            .map(|field| field.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for FilterField {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = FilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised: String = value
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalised.as_str() {
            "competitioncode" | "competition" => Ok(Self::CompetitionCode),
            "documentcode" | "code" => Ok(Self::DocumentCode),
            "documenttype" | "type" => Ok(Self::DocumentType),
            "documentsubtype" | "subtype" => Ok(Self::DocumentSubtype),
            "discipline" => Ok(Self::Discipline),
            _ => Err(FilterError::UnknownField {
                name: value.to_string(),
            }),
        }
    }
}

/// Empty, or exactly three ASCII uppercase letters.
#[must_use]
pub fn is_valid_discipline(value: &str) -> bool {
    value.is_empty() || (value.len() == 3 && value.bytes().all(|byte| byte.is_ascii_uppercase()))
}

/// Current filter inputs, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DocumentFilters {
    /// Competition code.
    pub competition_code: String,
    /// Document code.
    pub document_code: String,
    /// Document type.
    pub document_type: String,
    /// Document subtype.
    pub document_subtype: String,
    /// Three-letter discipline.
    pub discipline: String,
}

impl DocumentFilters {
    /// Value currently held for `field`.
    #[must_use]
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::CompetitionCode => &self.competition_code,
            FilterField::DocumentCode => &self.document_code,
            FilterField::DocumentType => &self.document_type,
            FilterField::DocumentSubtype => &self.document_subtype,
            FilterField::Discipline => &self.discipline,
        }
    }

    /// Replace the value of `field`. Returns whether it changed.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) -> bool {
        let slot = match field {
            FilterField::CompetitionCode => &mut self.competition_code,
            FilterField::DocumentCode => &mut self.document_code,
            FilterField::DocumentType => &mut self.document_type,
            FilterField::DocumentSubtype => &mut self.document_subtype,
            FilterField::Discipline => &mut self.discipline,
        };
        let value = value.into();
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Whether every field is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    /// Inline validation message, if any field is invalid.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        (!is_valid_discipline(&self.discipline)).then_some(DISCIPLINE_HINT)
    }

    /// Check the discipline format.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidDiscipline`] when the request must be
    /// blocked.
    pub fn validate(&self) -> Result<(), FilterError> {
        if is_valid_discipline(&self.discipline) {
            Ok(())
        } else {
            Err(FilterError::InvalidDiscipline {
                value: self.discipline.clone(),
            })
        }
    }

    /// Query parameters for `page`, keeping only sendable values.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidDiscipline`] instead of building
    /// parameters for an invalid discipline.
    pub fn to_params(&self, page: u32, page_size: u32) -> Result<DocumentListParams, FilterError> {
        self.validate()?;
        Ok(DocumentListParams {
            page: Some(page),
            page_size: Some(page_size),
            competition_code: sendable(&self.competition_code),
            document_code: sendable(&self.document_code),
            document_type: sendable(&self.document_type),
            document_subtype: sendable(&self.document_subtype),
            discipline: sendable(&self.discipline),
        })
    }

    /// Short `name=value` summary of the active filters.
    #[must_use]
    pub fn summary(&self) -> String {
        let active: Vec<String> = FilterField::ALL
            .iter()
            .filter(|field| !self.get(**field).is_empty())
            .map(|field| format!("{field}={}", self.get(*field)))
            .collect();
        if active.is_empty() {
            "none".to_string()
        } else {
            active.join(" ")
        }
    }
}

fn sendable(value: &str) -> Option<String> {
    (!value.is_empty() && value.trim() == value).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discipline_format_is_three_uppercase_letters_or_empty() {
        assert!(is_valid_discipline("ABC"));
        assert!(is_valid_discipline(""));
        assert!(!is_valid_discipline("ab"));
        assert!(!is_valid_discipline("ABCD"));
        assert!(!is_valid_discipline("AB1"));
        assert!(!is_valid_discipline("abc"));
        assert!(!is_valid_discipline("ÁBC"));
    }

    #[test]
    fn invalid_discipline_blocks_params() {
        let filters = DocumentFilters {
            discipline: "sw".into(),
            ..DocumentFilters::default()
        };
        assert_eq!(filters.hint(), Some(DISCIPLINE_HINT));
        assert_eq!(
            filters.to_params(1, 20),
            Err(FilterError::InvalidDiscipline { value: "sw".into() })
        );
    }

    #[test]
    fn padded_values_are_not_sent() {
        let filters = DocumentFilters {
            competition_code: "OG2024".into(),
            document_code: " DOC".into(),
            document_type: "DT_RESULT ".into(),
            document_subtype: String::new(),
            discipline: "SWM".into(),
        };
        let params = filters.to_params(3, 20).expect("valid");
        assert_eq!(params.page, Some(3));
        assert_eq!(params.page_size, Some(20));
        assert_eq!(params.competition_code.as_deref(), Some("OG2024"));
        assert_eq!(params.document_code, None);
        assert_eq!(params.document_type, None);
        assert_eq!(params.document_subtype, None);
        assert_eq!(params.discipline.as_deref(), Some("SWM"));
    }

    #[test]
    fn set_reports_changes() {
        let mut filters = DocumentFilters::default();
        assert!(filters.is_empty());
        assert!(filters.set(FilterField::DocumentType, "DT_RESULT"));
        assert!(!filters.set(FilterField::DocumentType, "DT_RESULT"));
        assert_eq!(filters.get(FilterField::DocumentType), "DT_RESULT");
        assert_eq!(filters.summary(), "document-type=DT_RESULT");
    }

    #[test]
    fn field_names_parse_in_several_spellings() {
        assert_eq!("competition-code".parse(), Ok(FilterField::CompetitionCode));
        assert_eq!("documentCode".parse(), Ok(FilterField::DocumentCode));
        assert_eq!("document_subtype".parse(), Ok(FilterField::DocumentSubtype));
        assert_eq!("type".parse(), Ok(FilterField::DocumentType));
        let err = "colour".parse::<FilterField>().expect_err("unknown");
        assert!(err.to_string().contains("competition-code"));
    }
}
