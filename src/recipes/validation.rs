//! Field rules applied to a recipe before it is persisted.
//!
//! Rules run in a fixed order (title, instructions, minutes) and the first
//! failure is reported.

use thiserror::Error;

pub const MIN_INSTRUCTIONS_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeValidationError {
    #[error("Title cannot be empty.")]
    EmptyTitle,

    #[error("Instructions must be at least 50 characters long.")]
    InstructionsTooShort,

    #[error("Minutes to complete must be a positive integer.")]
    NonPositiveMinutes,
}

pub fn validate_title(title: Option<String>) -> Result<String, RecipeValidationError> {
    match title {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(RecipeValidationError::EmptyTitle),
    }
}

pub fn validate_instructions(instructions: Option<String>) -> Result<String, RecipeValidationError> {
    match instructions {
        Some(i) if i.chars().count() >= MIN_INSTRUCTIONS_CHARS => Ok(i),
        _ => Err(RecipeValidationError::InstructionsTooShort),
    }
}

pub fn validate_minutes(minutes: Option<i32>) -> Result<i32, RecipeValidationError> {
    match minutes {
        Some(m) if m > 0 => Ok(m),
        _ => Err(RecipeValidationError::NonPositiveMinutes),
    }
}

/// A recipe whose fields have passed every rule. Only `parse` builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    title: String,
    instructions: String,
    minutes_to_complete: i32,
}

impl NewRecipe {
    pub fn parse(
        title: Option<String>,
        instructions: Option<String>,
        minutes_to_complete: Option<i32>,
    ) -> Result<Self, RecipeValidationError> {
        let title = validate_title(title)?;
        let instructions = validate_instructions(instructions)?;
        let minutes_to_complete = validate_minutes(minutes_to_complete)?;
        Ok(Self {
            title,
            instructions,
            minutes_to_complete,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn minutes_to_complete(&self) -> i32 {
        self.minutes_to_complete
    }
}
