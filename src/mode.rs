//! Conversational modes and their model parameter profiles.
//!
//! A [`Mode`] is a named persona/configuration bundle: switching mode changes
//! the system prompt, model choice, token budget, and temperature used by the
//! completion pipeline. The mapping is a fixed compile-time table — see
//! [`Mode::profile`].
//!
//! Mode switches are synchronous and take effect on the *next* completion
//! request only. The pipeline captures a copy of the profile at call time, so
//! an in-flight request is never retroactively mutated.

use serde::{Deserialize, Serialize};

/// A conversational mode.
///
/// The default mode is [`Mode::Pocket`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Everyday companion chat. Medium-length replies, high emoji density.
    #[default]
    Pocket,
    /// Relaxed conversational chat.
    Chill,
    /// Focused tutoring. Long, step-by-step answers on a stronger model.
    Study,
    /// Wind-down chat. Short, calm replies on a small token budget.
    Sleep,
}

impl Mode {
    /// All modes, in presentation order.
    pub const ALL: [Mode; 4] = [Mode::Pocket, Mode::Chill, Mode::Study, Mode::Sleep];

    /// Returns the fixed parameter profile for this mode.
    #[must_use]
    pub fn profile(self) -> &'static ModeProfile {
        match self {
            Mode::Pocket => &POCKET_PROFILE,
            Mode::Chill => &CHILL_PROFILE,
            Mode::Study => &STUDY_PROFILE,
            Mode::Sleep => &SLEEP_PROFILE,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Pocket => write!(f, "pocket"),
            Mode::Chill => write!(f, "chill"),
            Mode::Study => write!(f, "study"),
            Mode::Sleep => write!(f, "sleep"),
        }
    }
}

/// Fixed model parameters bound to a [`Mode`].
///
/// Profiles are read-only; the table below is policy and must be reproduced
/// exactly for behavioral parity with the shipped app.
///
/// | Mode | Token budget | Temperature | Length intent |
/// |---|---|---|---|
/// | Pocket | 2000 | 0.8 | medium, high emoji density |
/// | Chill | 2000 | 0.8 | medium, conversational |
/// | Study | 16384 | 0.3 | long, step-by-step, low emoji |
/// | Sleep | 800 | 0.8 | short, minimal emoji |
#[derive(Debug, Clone, PartialEq)]
pub struct ModeProfile {
    /// System prompt template sent as the first message of every request.
    pub system_prompt: &'static str,
    /// Model identifier requested from the completion provider.
    pub model_id: &'static str,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Persona focus tag, consumed by the local fallback responder.
    pub focus: &'static str,
}

pub(crate) static POCKET_PROFILE: ModeProfile = ModeProfile {
    system_prompt: "You are Muse, a warm pocket companion. Reply in a few \
medium-length sentences, upbeat and playful. Use emojis freely to keep the \
chat lively. Stay personal and curious about the user.",
    model_id: "gpt-4o-mini",
    max_tokens: 2000,
    temperature: 0.8,
    focus: "upbeat",
};

pub(crate) static CHILL_PROFILE: ModeProfile = ModeProfile {
    system_prompt: "You are Muse, an easygoing companion. Keep replies \
medium-length and conversational, like chatting with a close friend. An \
occasional emoji is fine.",
    model_id: "gpt-4o-mini",
    max_tokens: 2000,
    temperature: 0.8,
    focus: "relaxed",
};

pub(crate) static STUDY_PROFILE: ModeProfile = ModeProfile {
    system_prompt: "You are Muse in study mode: a patient tutor. Give long, \
structured, step-by-step explanations. Show reasoning, use numbered steps \
and examples. Keep emoji use to a minimum.",
    model_id: "gpt-4o",
    max_tokens: 16384,
    temperature: 0.3,
    focus: "focused",
};

pub(crate) static SLEEP_PROFILE: ModeProfile = ModeProfile {
    system_prompt: "You are Muse in sleep mode: a soft, quiet presence. Reply \
in one or two short, soothing sentences. Minimal emojis, no lists, no long \
explanations.",
    model_id: "gpt-4o-mini",
    max_tokens: 800,
    temperature: 0.8,
    focus: "calm",
};

/// Holds the currently selected mode for a session.
///
/// Mutated only by explicit user mode selection; read by the completion
/// pipeline on every request.
#[derive(Debug, Clone, Default)]
pub struct ModeRegistry {
    current: Mode,
}

impl ModeRegistry {
    /// Create a registry starting in [`Mode::Pocket`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current mode.
    #[must_use]
    pub fn current(&self) -> Mode {
        self.current
    }

    /// Switch to a new mode. Takes effect on subsequent requests only.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.current {
            tracing::info!(from = %self.current, to = %mode, "mode switched");
        }
        self.current = mode;
    }

    /// Returns the profile of the current mode.
    #[must_use]
    pub fn current_profile(&self) -> &'static ModeProfile {
        self.current.profile()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_mode_is_pocket() {
        assert_eq!(Mode::default(), Mode::Pocket);
        assert_eq!(ModeRegistry::new().current(), Mode::Pocket);
    }

    #[test]
    fn profile_table_matches_policy() {
        let pocket = Mode::Pocket.profile();
        assert_eq!(pocket.max_tokens, 2000);
        assert!((pocket.temperature - 0.8).abs() < f32::EPSILON);

        let chill = Mode::Chill.profile();
        assert_eq!(chill.max_tokens, 2000);
        assert!((chill.temperature - 0.8).abs() < f32::EPSILON);

        let study = Mode::Study.profile();
        assert_eq!(study.max_tokens, 16384);
        assert!((study.temperature - 0.3).abs() < f32::EPSILON);

        let sleep = Mode::Sleep.profile();
        assert_eq!(sleep.max_tokens, 800);
        assert!((sleep.temperature - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn study_uses_stronger_model() {
        assert_ne!(Mode::Study.profile().model_id, Mode::Pocket.profile().model_id);
    }

    #[test]
    fn every_mode_has_nonempty_prompt_and_focus() {
        for mode in Mode::ALL {
            let profile = mode.profile();
            assert!(!profile.system_prompt.is_empty(), "{mode} prompt empty");
            assert!(!profile.focus.is_empty(), "{mode} focus empty");
            assert!(!profile.model_id.is_empty(), "{mode} model empty");
        }
    }

    #[test]
    fn set_mode_switches_current_profile() {
        let mut registry = ModeRegistry::new();
        assert_eq!(registry.current_profile().max_tokens, 2000);
        registry.set_mode(Mode::Study);
        assert_eq!(registry.current(), Mode::Study);
        assert_eq!(registry.current_profile().max_tokens, 16384);
    }

    #[test]
    fn mode_serde_round_trip() {
        for mode in Mode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            let parsed: Mode = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, mode);
        }
    }
}
