//! Numeric input collaborator
//!
//! Shield gains, status edits and manual dice totals need a number from
//! outside the engine. The engine asks through `InputProvider`; a
//! cancelled or unparseable answer never fails an operation.

use std::collections::VecDeque;

use super::dice::DiceRoll;

/// What the engine is asking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Amount to add to a shield pool
    ShieldAmount { suggested: i32 },
    /// New stack count for an effect
    EditStacks { current: u32 },
    /// New duration for an effect
    EditDuration { current: u32 },
    /// Total of dice rolled at the table
    DiceTotal { count: u32, sides: u32 },
}

impl Prompt {
    /// Value offered to the user as a default
    pub fn suggested(&self) -> i64 {
        match *self {
            Prompt::ShieldAmount { suggested } => suggested as i64,
            Prompt::EditStacks { current } => current as i64,
            Prompt::EditDuration { current } => current as i64,
            Prompt::DiceTotal { count, sides } => {
                // Average roll, rounded down
                let roll = DiceRoll::new(count, sides);
                (roll.min() as i64 + roll.max() as i64) / 2
            }
        }
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prompt::ShieldAmount { .. } => write!(f, "Shield amount"),
            Prompt::EditStacks { .. } => write!(f, "Stacks"),
            Prompt::EditDuration { .. } => write!(f, "Duration"),
            Prompt::DiceTotal { count, sides } => write!(f, "Total of {}d{}", count, sides),
        }
    }
}

/// Source of externally supplied numbers
pub trait InputProvider {
    /// Ask for a value. `None` means the prompt was cancelled.
    fn request(&mut self, prompt: &Prompt) -> Option<String>;
}

/// Parse a response as a non-negative amount.
///
/// Returns `None` for cancelled or non-numeric input. Negative values
/// clamp to zero.
pub fn parse_amount(response: Option<&str>) -> Option<u32> {
    let value: i64 = response?.trim().parse().ok()?;
    Some(value.clamp(0, u32::MAX as i64) as u32)
}

/// Ask for an amount, falling back to zero
pub fn request_amount(input: &mut dyn InputProvider, prompt: &Prompt) -> u32 {
    parse_amount(input.request(prompt).as_deref()).unwrap_or(0)
}

/// Ask for an amount, `None` when nothing usable was entered
pub fn request_optional(input: &mut dyn InputProvider, prompt: &Prompt) -> Option<u32> {
    parse_amount(input.request(prompt).as_deref())
}

/// Answers every prompt with its suggested value
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInput;

impl InputProvider for DefaultInput {
    fn request(&mut self, prompt: &Prompt) -> Option<String> {
        Some(prompt.suggested().to_string())
    }
}

/// Replays a fixed queue of responses, then cancels
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    responses: VecDeque<Option<String>>,
    asked: Vec<Prompt>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a typed response
    pub fn answer(mut self, response: &str) -> Self {
        self.responses.push_back(Some(response.to_string()));
        self
    }

    /// Queue a cancelled prompt
    pub fn cancel(mut self) -> Self {
        self.responses.push_back(None);
        self
    }

    /// Prompts received so far
    pub fn asked(&self) -> &[Prompt] {
        &self.asked
    }
}

impl InputProvider for ScriptedInput {
    fn request(&mut self, prompt: &Prompt) -> Option<String> {
        self.asked.push(prompt.clone());
        self.responses.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(Some("20")), Some(20));
        assert_eq!(parse_amount(Some("  7 ")), Some(7));
        assert_eq!(parse_amount(Some("-4")), Some(0));
        assert_eq!(parse_amount(Some("abc")), None);
        assert_eq!(parse_amount(Some("")), None);
        assert_eq!(parse_amount(None), None);
    }

    #[test]
    fn test_request_amount_falls_back_to_zero() {
        let mut input = ScriptedInput::new().answer("oops").cancel().answer("15");
        let prompt = Prompt::ShieldAmount { suggested: 20 };

        assert_eq!(request_amount(&mut input, &prompt), 0);
        assert_eq!(request_amount(&mut input, &prompt), 0);
        assert_eq!(request_amount(&mut input, &prompt), 15);
        // Exhausted script behaves like a cancel
        assert_eq!(request_amount(&mut input, &prompt), 0);
        assert_eq!(input.asked().len(), 4);
    }

    #[test]
    fn test_default_input() {
        let mut input = DefaultInput;
        let shield = Prompt::ShieldAmount { suggested: 20 };
        assert_eq!(request_amount(&mut input, &shield), 20);

        let dice = Prompt::DiceTotal { count: 3, sides: 4 };
        assert_eq!(request_amount(&mut input, &dice), 7);

        let stacks = Prompt::EditStacks { current: 5 };
        assert_eq!(request_optional(&mut input, &stacks), Some(5));
    }
}
