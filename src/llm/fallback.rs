//! Deterministic local responder.
//!
//! When the remote completion provider is unreachable or returns garbage,
//! the pipeline substitutes a reply from this rule table so the user always
//! gets *some* answer. Rules are keyed on case-insensitive keyword matches
//! against the user text, evaluated in order with first match winning; when
//! nothing matches, the reply is chosen by the active mode's persona focus
//! tag.

/// One entry of the fallback rule table.
#[derive(Debug)]
pub struct FallbackRule {
    /// Keywords matched against the lowercased user text. Single words match
    /// on whole-word boundaries (so "hi" never fires inside "this"); phrases
    /// and punctuation keywords match by substring containment.
    pub keywords: &'static [&'static str],
    /// Canned reply.
    pub reply: &'static str,
}

/// Keyword rules, evaluated top to bottom.
pub const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        keywords: &["hello", "hi", "hey", "good morning", "good evening"],
        reply: "Hey! I'm having a little trouble reaching my brain right now, \
but I'm still here with you.",
    },
    FallbackRule {
        keywords: &["how are you", "how's it going", "how are things"],
        reply: "I'm doing alright, thanks for asking! My connection is a bit \
shaky at the moment, so bear with me.",
    },
    FallbackRule {
        keywords: &["thank", "thanks", "thx"],
        reply: "Anytime! That's what I'm here for.",
    },
    FallbackRule {
        keywords: &["bye", "goodbye", "good night", "see you"],
        reply: "Talk soon! I'll be right here when you come back.",
    },
    FallbackRule {
        keywords: &["help", "what can you do"],
        reply: "I can chat with you, play music if you ask, and keep you \
company. My full smarts are offline right now, but the basics still work.",
    },
    FallbackRule {
        keywords: &["?"],
        reply: "Good question — I can't reach my full knowledge right now. \
Ask me again in a moment and I'll give you a proper answer.",
    },
];

/// Default replies keyed by persona focus tag when no keyword rule matches.
const FOCUS_DEFAULTS: &[(&str, &str)] = &[
    (
        "upbeat",
        "I lost my train of thought for a second there! Say that again and \
I'll catch up.",
    ),
    (
        "relaxed",
        "Hmm, my connection drifted off for a moment. No rush, tell me again?",
    ),
    (
        "focused",
        "I couldn't process that fully just now. Let's try once more so I can \
give you a proper step-by-step answer.",
    ),
    (
        "calm",
        "I'm here. Let's just breathe for a moment and try again.",
    ),
];

const GENERIC_DEFAULT: &str =
    "I'm having trouble connecting right now, but I'm still listening. Could \
you say that again in a little while?";

/// Produce a deterministic local reply for the given user text and persona
/// focus tag. Never fails.
#[must_use]
pub fn local_reply(user_text: &str, focus: &str) -> String {
    let lowered = user_text.to_lowercase();

    for rule in FALLBACK_RULES {
        if rule.keywords.iter().any(|k| keyword_matches(&lowered, k)) {
            return rule.reply.to_owned();
        }
    }

    FOCUS_DEFAULTS
        .iter()
        .find(|(tag, _)| *tag == focus)
        .map_or(GENERIC_DEFAULT, |(_, reply)| *reply)
        .to_owned()
}

/// Single words match whole words only; phrases and punctuation keywords
/// match anywhere in the text.
fn keyword_matches(lowered: &str, keyword: &str) -> bool {
    if keyword.contains(' ') || !keyword.chars().any(char::is_alphanumeric) {
        return lowered.contains(keyword);
    }
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word == keyword)
}
