//! Per-field validation rules.
//!
//! Each posting field has exactly one [`FieldRule`]: a label, an optional
//! maximum length and a pure normalize-or-reject function. Rules only see the
//! raw text of their own field.
//!
//! Every field goes through the same steps, first failure wins:
//!
//! 1. surrounding whitespace is trimmed; absent or blank input is
//!    [`FieldError::Missing`]
//! 2. the maximum length (in characters) is enforced
//! 3. the field's own rule runs and produces the normalized value
//! 4. the maximum length is enforced again on the normalized value, since
//!    case mapping can lengthen text (`ß` -> `SS`)

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Posting fields, in declaration order.
///
/// The derived ordering is the declaration order and is what error sets and
/// field listings are sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Titulo,
    Empresa,
    Telefone,
    Descricao,
    Email,
}

impl Field {
    /// All fields in declaration order.
    pub const ALL: [Field; 5] = [
        Field::Titulo,
        Field::Empresa,
        Field::Telefone,
        Field::Descricao,
        Field::Email,
    ];

    /// Submission key for this field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Titulo => "titulo",
            Self::Empresa => "empresa",
            Self::Telefone => "telefone",
            Self::Descricao => "descricao",
            Self::Email => "email",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// The validation rule for this field.
    pub fn rule(&self) -> &'static FieldRule {
        &RULES[*self as usize]
    }

    pub fn label(&self) -> &'static str {
        self.rule().label
    }

    pub fn max_length(&self) -> Option<usize> {
        self.rule().max_length
    }

    /// Validate and normalize the raw text submitted for this field.
    pub fn clean(&self, raw: Option<&str>) -> Result<String, FieldError> {
        let value = raw
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(FieldError::Missing)?;

        let rule = self.rule();
        rule.check_length(value)?;
        let normalized = (rule.normalize)(value)?;
        rule.check_length(&normalized)?;
        Ok(normalized)
    }

    /// Presentation metadata for an input bound to this field.
    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name(),
            label: self.label(),
            max_length: self.max_length(),
            required: true,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single field rule.
#[derive(Debug)]
pub struct FieldRule {
    pub field: Field,
    pub label: &'static str,
    pub max_length: Option<usize>,

    /// Receives the trimmed, non-empty, length-checked value.
    pub normalize: fn(&str) -> Result<String, FieldError>,
}

impl FieldRule {
    fn check_length(&self, value: &str) -> Result<(), FieldError> {
        match self.max_length {
            Some(max) => {
                let actual = value.chars().count();
                if actual > max {
                    Err(FieldError::TooLong { max, actual })
                } else {
                    Ok(())
                }
            }
            None => Ok(()),
        }
    }
}

/// Rule table, indexed by `Field as usize`.
pub static RULES: [FieldRule; 5] = [
    FieldRule {
        field: Field::Titulo,
        label: "Título da Vaga",
        max_length: Some(150),
        normalize: normalize_titulo,
    },
    FieldRule {
        field: Field::Empresa,
        label: "Empresa",
        max_length: Some(150),
        normalize: normalize_empresa,
    },
    FieldRule {
        field: Field::Telefone,
        label: "Telefone",
        max_length: Some(20),
        normalize: normalize_telefone,
    },
    FieldRule {
        field: Field::Descricao,
        label: "Descrição da Vaga",
        max_length: Some(255),
        normalize: normalize_descricao,
    },
    FieldRule {
        field: Field::Email,
        label: "Email da Empresa",
        max_length: None,
        normalize: normalize_email,
    },
];

/// Presentation metadata for one form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub required: bool,
}

/// Broad classification of a field failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// The field was absent or blank.
    MissingField,

    /// The field was present but broke its length, prefix or syntax rule.
    FormatViolation,
}

/// A rejected field value. The `Display` text is the user-facing message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("required")]
    Missing,

    #[error("Ensure this value has at most {max} characters (it has {actual}).")]
    TooLong { max: usize, actual: usize },

    #[error("Empresa precisa ter ao menos dois caracteres")]
    CompanyTooShort,

    #[error("DDD válido somente o 19")]
    InvalidAreaCode,

    #[error("A descrição da vaga deve ter pelo menos 10 caracteres")]
    DescriptionTooShort,

    #[error("Enter a valid email address")]
    InvalidEmail,
}

impl FieldError {
    pub fn kind(&self) -> FieldErrorKind {
        match self {
            Self::Missing => FieldErrorKind::MissingField,
            _ => FieldErrorKind::FormatViolation,
        }
    }
}

/// Minimum company name length, in characters.
const MIN_EMPRESA_LEN: usize = 2;

/// Minimum description length, in characters.
const MIN_DESCRICAO_LEN: usize = 10;

/// The only accepted area code.
const AREA_CODE: &str = "19";

fn normalize_titulo(value: &str) -> Result<String, FieldError> {
    Ok(value.to_uppercase())
}

fn normalize_empresa(value: &str) -> Result<String, FieldError> {
    if value.chars().count() < MIN_EMPRESA_LEN {
        return Err(FieldError::CompanyTooShort);
    }
    Ok(capitalize(value))
}

fn normalize_telefone(value: &str) -> Result<String, FieldError> {
    if value.starts_with(AREA_CODE) {
        Ok(value.to_string())
    } else {
        Err(FieldError::InvalidAreaCode)
    }
}

fn normalize_descricao(value: &str) -> Result<String, FieldError> {
    if value.chars().count() < MIN_DESCRICAO_LEN {
        return Err(FieldError::DescriptionTooShort);
    }
    Ok(value.to_string())
}

/// Domain accepted without a dot.
const LOCAL_DOMAIN: &str = "localhost";

/// Shortest accepted top-level label.
const MIN_TLD_LEN: usize = 2;

// Syntax only. No domain or mailbox checks.
fn normalize_email(value: &str) -> Result<String, FieldError> {
    let candidate = value.to_string();
    if !candidate.validate_email() {
        return Err(FieldError::InvalidEmail);
    }

    let (local, domain) = candidate
        .rsplit_once('@')
        .ok_or(FieldError::InvalidEmail)?;
    if dotted_local_part(local) && qualified_domain(domain) {
        Ok(candidate)
    } else {
        Err(FieldError::InvalidEmail)
    }
}

/// Unquoted local parts are dot-separated atoms, none of them empty.
fn dotted_local_part(local: &str) -> bool {
    local.starts_with('"') || local.split('.').all(|atom| !atom.is_empty())
}

/// A dotted host name ending in a label of at least two characters, an
/// address literal, or `localhost`.
fn qualified_domain(domain: &str) -> bool {
    if domain.eq_ignore_ascii_case(LOCAL_DOMAIN) || domain.starts_with('[') {
        return true;
    }
    match domain.rsplit_once('.') {
        Some((_, tld)) => tld.chars().count() >= MIN_TLD_LEN && !tld.ends_with('-'),
        None => false,
    }
}

/// Upper-case the first character and lower-case the rest.
///
/// When the first character upper-cases to several characters (`ß` -> `SS`),
/// only the first of those stays upper-case, so the result is stable under
/// repeated application.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    let mut out = String::with_capacity(value.len());
    out.extend(upper.next());
    out.extend(upper.flat_map(char::to_lowercase));
    out.extend(chars.flat_map(char::to_lowercase));
    out
}
