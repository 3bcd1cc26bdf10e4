//! Interactive collection seam.
//!
//! The core only needs a `question -> answer` capability plus a lifecycle
//! close; presentation (readline, TUI, scripted test double) is the
//! caller's concern. Interactive collection re-prompts per field, unlike
//! the programmatic path which reports every violation at once.

use crate::derive::{DerivedId, DerivedValues};
use crate::error::{ForgeError, Result};
use crate::inputs::{CoreInputs, InputField, RawCoreInputs};

/// Attempts per field before collection gives up. Keeps a scripted or
/// piped session from looping forever on bad input.
const MAX_ATTEMPTS: u32 = 3;

// ---------------------------------------------------------------------------
// PromptSession
// ---------------------------------------------------------------------------

pub trait PromptSession {
    fn question(&mut self, prompt: &str) -> Result<String>;
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// Core input collection
// ---------------------------------------------------------------------------

/// Collect the seven core inputs, re-prompting per field on invalid input.
/// `preset` values that already pass validation are kept without prompting,
/// so flags and prompts compose.
pub fn collect_core_inputs(
    session: &mut dyn PromptSession,
    preset: RawCoreInputs,
) -> Result<CoreInputs> {
    let mut raw = preset;
    for &field in InputField::all() {
        let current = raw.field(field);
        if !current.is_empty() && field.check(current).is_none() {
            continue;
        }
        let value = ask_field(session, field)?;
        raw.set_field(field, value);
    }
    raw.build()
}

fn ask_field(session: &mut dyn PromptSession, field: InputField) -> Result<String> {
    let mut prompt = format!("{}: ", field.prompt());
    for _ in 0..MAX_ATTEMPTS {
        let answer = session.question(&prompt)?;
        let answer = answer.trim();
        match field.check(answer) {
            None => return Ok(answer.to_string()),
            Some(reason) => {
                prompt = format!("{} ({reason}): ", field.prompt());
            }
        }
    }
    Err(ForgeError::CollectionExhausted {
        field: field.as_str(),
        attempts: MAX_ATTEMPTS,
    })
}

// ---------------------------------------------------------------------------
// Derived value confirmation
// ---------------------------------------------------------------------------

/// Walk every derived value, offering the computed default and applying
/// replacements. An empty answer confirms the default. Invalid replacements
/// keep the previous value; the rejection reasons are returned so the
/// caller can surface them.
pub fn confirm_derived(
    session: &mut dyn PromptSession,
    derived: &mut DerivedValues,
) -> Result<Vec<String>> {
    let mut rejections = Vec::new();
    for &id in DerivedId::all() {
        let prompt = format!("{id} [{}]: ", derived.value(id));
        let answer = session.question(&prompt)?;
        let answer = answer.trim();
        if answer.is_empty() {
            continue;
        }
        if let Err(e) = derived.apply_override(id, answer) {
            rejections.push(e.to_string());
        }
    }
    Ok(rejections)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
