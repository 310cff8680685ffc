//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{LoadToken, StoreError};
use shared::domain::{Creator, CreatorId};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    ListLoaded {
        token: LoadToken,
        result: Result<Vec<Creator>, StoreError>,
    },
    CreatorLoaded {
        token: LoadToken,
        result: Result<Creator, StoreError>,
    },
    Saved {
        token: LoadToken,
        result: Result<Creator, StoreError>,
    },
    Deleted {
        token: LoadToken,
        id: CreatorId,
        result: Result<(), StoreError>,
    },
    ImageLoaded {
        url: String,
        image: PreviewImage,
    },
    ImageFailed {
        url: String,
        reason: String,
    },
}

/// Decoded RGBA pixels, ready to upload as a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    NotFound,
    Unknown,
}

impl UiErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Auth => "Authorization",
            Self::Transport => "Network",
            Self::Validation => "Validation",
            Self::NotFound => "Not found",
            Self::Unknown => "Unexpected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadList,
    LoadCreator,
    Save,
    Delete,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("401")
            || lower.contains("403")
            || lower.contains("unauthorized")
            || lower.contains("apikey")
        {
            UiErrorCategory::Auth
        } else if lower.contains("not found") {
            UiErrorCategory::NotFound
        } else if lower.contains("required")
            || lower.contains("invalid")
            || lower.contains("must be")
        {
            UiErrorCategory::Validation
        } else if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("disconnected")
            || lower.contains("dns")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_store_error(context: UiErrorContext, err: &StoreError) -> Self {
        let category = match err {
            StoreError::NotFound { .. } => UiErrorCategory::NotFound,
            StoreError::Backend {
                status: Some(401 | 403),
                ..
            } => UiErrorCategory::Auth,
            StoreError::Backend {
                status: Some(400 | 422),
                ..
            } => UiErrorCategory::Validation,
            StoreError::Backend { status: None, .. } => UiErrorCategory::Transport,
            StoreError::Backend { .. } => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One line for the status bar.
    pub fn summary(&self) -> String {
        match (self.context, self.category) {
            (UiErrorContext::BackendStartup, _) => format!(
                "Backend worker failed to start; check the backend URL and relaunch ({})",
                self.message
            ),
            (_, UiErrorCategory::Auth) => {
                "The backend rejected the API key; set CREATORVERSE_API_KEY and relaunch".to_string()
            }
            (_, category) => format!("{} error: {}", category.label(), self.message),
        }
    }
}
