//! Field definitions and validity rules for creator records.
//!
//! A [`CreatorDraft`] is the editable, unsaved form of a record. It only turns into a
//! [`CreatorRecord`] once [`CreatorDraft::validate`] passes.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::Creator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatorField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "imageURL")]
    ImageUrl,
}

impl CreatorField {
    pub const ALL: [CreatorField; 4] = [
        CreatorField::Name,
        CreatorField::Url,
        CreatorField::Description,
        CreatorField::ImageUrl,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Url => "url",
            Self::Description => "description",
            Self::ImageUrl => "imageURL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Url => "URL",
            Self::Description => "Description",
            Self::ImageUrl => "Image URL",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Self::ImageUrl)
    }

    /// Fields whose non-empty value must be an absolute http(s) link.
    pub fn expects_url(self) -> bool {
        matches!(self, Self::Url | Self::ImageUrl)
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, Self::Description)
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.wire_name() == name)
    }
}

impl fmt::Display for CreatorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    MalformedUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: CreatorField,
    pub kind: ViolationKind,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::Missing => write!(f, "{} is required", self.field),
            ViolationKind::MalformedUrl => {
                write!(f, "{} must be an absolute http(s) URL", self.field)
            }
        }
    }
}

/// In-progress field values. Every field is plain text, an empty `image_url` means no image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorDraft {
    pub name: String,
    pub url: String,
    pub description: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: String,
}

impl CreatorDraft {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, field: CreatorField) -> &str {
        match field {
            CreatorField::Name => &self.name,
            CreatorField::Url => &self.url,
            CreatorField::Description => &self.description,
            CreatorField::ImageUrl => &self.image_url,
        }
    }

    pub fn set(&mut self, field: CreatorField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CreatorField::Name => self.name = value,
            CreatorField::Url => self.url = value,
            CreatorField::Description => self.description = value,
            CreatorField::ImageUrl => self.image_url = value,
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let violations: Vec<FieldViolation> = CreatorField::ALL
            .into_iter()
            .filter_map(|field| check_field(field, self.get(field)))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Trims every field and maps an empty image link to `None`. Does not validate.
    pub fn to_record(&self) -> CreatorRecord {
        let image_url = self.image_url.trim();
        CreatorRecord {
            name: self.name.trim().to_string(),
            url: self.url.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
        }
    }
}

impl From<&Creator> for CreatorDraft {
    fn from(creator: &Creator) -> Self {
        Self {
            name: creator.name.clone(),
            url: creator.url.clone(),
            description: creator.description.clone(),
            image_url: creator.image_url.clone().unwrap_or_default(),
        }
    }
}

/// The full set of writable columns; inserts and updates always send all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRecord {
    pub name: String,
    pub url: String,
    pub description: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
}

impl CreatorRecord {
    pub fn to_draft(&self) -> CreatorDraft {
        CreatorDraft {
            name: self.name.clone(),
            url: self.url.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        self.to_draft().validate()
    }

    pub fn normalized(&self) -> CreatorRecord {
        self.to_draft().to_record()
    }

    pub fn into_creator(self, id: crate::domain::CreatorId) -> Creator {
        Creator {
            id,
            name: self.name,
            url: self.url,
            description: self.description,
            image_url: self.image_url,
            created_at: None,
        }
    }
}

pub fn describe_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn check_field(field: CreatorField, value: &str) -> Option<FieldViolation> {
    let value = value.trim();
    if value.is_empty() {
        return field.is_required().then_some(FieldViolation {
            field,
            kind: ViolationKind::Missing,
        });
    }
    if field.expects_url() && !is_web_url(value) {
        return Some(FieldViolation {
            field,
            kind: ViolationKind::MalformedUrl,
        });
    }
    None
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}
