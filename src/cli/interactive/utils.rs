use inquire::{Confirm, InquireError, Text};

use crate::error::AppError;

/// Map Esc / Ctrl-C to `None` so callers can treat them as "go back".
pub fn optional<T>(result: Result<T, InquireError>) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(AppError::Message(format!("Prompt failed: {}", e))),
    }
}

pub fn prompt_text(message: &str, initial: Option<&str>) -> Result<Option<String>, AppError> {
    let mut prompt = Text::new(message);
    if let Some(initial) = initial {
        prompt = prompt.with_initial_value(initial);
    }
    optional(prompt.prompt())
}

pub fn prompt_confirm(message: &str, default: bool) -> Result<Option<bool>, AppError> {
    optional(Confirm::new(message).with_default(default).prompt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_and_interrupt_become_none() {
        assert_eq!(
            optional::<bool>(Err(InquireError::OperationCanceled)).unwrap(),
            None
        );
        assert_eq!(
            optional::<bool>(Err(InquireError::OperationInterrupted)).unwrap(),
            None
        );
        assert_eq!(optional(Ok(3)).unwrap(), Some(3));
        assert!(optional::<bool>(Err(InquireError::NotTTY)).is_err());
    }
}
