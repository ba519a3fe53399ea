//! Whole-posting validation.
//!
//! [`PostingForm::validate`] runs every field rule over a [`Submission`] and
//! either returns the normalized [`PostingFields`] or the full [`ErrorSet`].
//! Failure paths carry a [`BoundForm`], the submitted values together with
//! their errors, so a rejected submission can be shown again as typed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::{Field, FieldDescriptor, FieldError};
use crate::posting::PostingFields;

/// Raw, unvalidated field input keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission(BTreeMap<String, String>);

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&PostingFields> for Submission {
    fn from(fields: &PostingFields) -> Self {
        Submission::new()
            .with(Field::Titulo.name(), fields.titulo.clone())
            .with(Field::Empresa.name(), fields.empresa.clone())
            .with(Field::Telefone.name(), fields.telefone.clone())
            .with(Field::Descricao.name(), fields.descricao.clone())
            .with(Field::Email.name(), fields.email.clone())
    }
}

impl<K, V> FromIterator<(K, V)> for Submission
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Field name -> ordered error messages. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorSet(BTreeMap<Field, Vec<String>>);

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, error: &FieldError) {
        self.0.entry(field).or_default().push(error.to_string());
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: Field) -> Option<&[String]> {
        self.0.get(&field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one error.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Failing fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }
}

/// A form as shown to the user: its inputs, the values being edited and the
/// errors attached to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundForm {
    pub fields: Vec<FieldDescriptor>,
    pub data: Submission,
    pub errors: ErrorSet,
}

impl BoundForm {
    /// A blank form with no values and no errors.
    pub fn unbound() -> Self {
        Self::bound(Submission::new(), ErrorSet::new())
    }

    pub fn bound(data: Submission, errors: ErrorSet) -> Self {
        Self {
            fields: PostingForm::fields(),
            data,
            errors,
        }
    }

    /// A form pre-filled with stored values.
    pub fn prefilled(fields: &PostingFields) -> Self {
        Self::bound(Submission::from(fields), ErrorSet::new())
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The posting form: five required fields validated together.
pub struct PostingForm;

impl PostingForm {
    /// Input descriptors in declaration order.
    pub fn fields() -> Vec<FieldDescriptor> {
        Field::ALL.iter().map(Field::descriptor).collect()
    }

    /// Validate a full submission.
    ///
    /// Every field is checked; one failing field never hides the errors of
    /// another. Values are only normalized for the `Ok` result.
    pub fn validate(submission: &Submission) -> Result<PostingFields, ErrorSet> {
        let mut errors = ErrorSet::new();
        let mut clean = |field: Field| match field.clean(submission.get(field.name())) {
            Ok(value) => Some(value),
            Err(e) => {
                errors.push(field, &e);
                None
            }
        };

        let titulo = clean(Field::Titulo);
        let empresa = clean(Field::Empresa);
        let telefone = clean(Field::Telefone);
        let descricao = clean(Field::Descricao);
        let email = clean(Field::Email);

        match (titulo, empresa, telefone, descricao, email) {
            (Some(titulo), Some(empresa), Some(telefone), Some(descricao), Some(email)) => {
                Ok(PostingFields {
                    titulo,
                    empresa,
                    telefone,
                    descricao,
                    email,
                })
            }
            _ => Err(errors),
        }
    }
}
