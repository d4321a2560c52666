//! Form input capture: the three fields collected before a submission and
//! the checks applied to them.
//!
//! Fields are captured as raw text and validated on submit. The question is
//! required and capped at [`MAX_PROMPT_LEN`] characters; temperature and max
//! tokens must parse as numbers. Their intended domains ([0,1] and
//! [100,500]) are hinted at the prompt, not enforced here.

use serde::Serialize;
use thiserror::Error;

/// Maximum accepted question length, in characters.
pub const MAX_PROMPT_LEN: usize = 1000;

/// Raw field state, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub user_request: String,
    pub temperature: String,
    pub max_tokens: String,
}

/// Why a submission was rejected before reaching the network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("question exceeds {} characters (got {})", MAX_PROMPT_LEN, .0)]
    PromptTooLong(usize),

    #[error("{field} is not a number: {value:?}")]
    NotNumeric { field: &'static str, value: String },
}

/// The payload the generation service accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub user_request: String,
    pub temperature: f64,
}

impl FormInput {
    /// Check the captured fields and build the request payload.
    ///
    /// `max_tokens` is validated like the other fields but is not part of
    /// the payload: the generation route accepts only the question and the
    /// temperature, so the value never leaves the client.
    pub fn validate(&self) -> Result<GenerationRequest, FormError> {
        if self.user_request.is_empty() {
            return Err(FormError::Missing("question"));
        }
        let len = self.user_request.chars().count();
        if len > MAX_PROMPT_LEN {
            return Err(FormError::PromptTooLong(len));
        }

        let temperature = parse_number::<f64>("temperature", &self.temperature)?;
        parse_number::<u32>("max tokens", &self.max_tokens)?;

        Ok(GenerationRequest {
            user_request: self.user_request.clone(),
            temperature,
        })
    }

    /// Return every field to its empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Missing(field));
    }
    trimmed.parse().map_err(|_| FormError::NotNumeric {
        field,
        value: value.to_string(),
    })
}
