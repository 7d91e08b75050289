//! Keyword-based intent classification for inbound chat messages.
//!
//! [`classify`] decides whether a user utterance is a playback command or
//! ordinary chat. Matching is case-insensitive substring containment against
//! a fixed rule table ([`INTENT_RULES`]), evaluated in order with first match
//! winning:
//!
//! 1. Pause phrases (multi-word, checked first so "stop playing that" is not
//!    misread as a play command)
//! 2. Play keywords (the query is the input with matched command words
//!    stripped; an empty query means "play something generic")
//! 3. Next/skip phrases
//! 4. Previous/back phrases
//! 5. Anything else is ordinary chat ([`ChatIntent::None`])
//!
//! Input containing both "play" and "next" keywords resolves to `Play`; the
//! rule order is the documented tie-break.
//!
//! Known false-positive risk: the play keyword set includes the generic words
//! "music" and "song", so ordinary chat mentioning them in passing ("I love
//! this song's chart pattern") is classified as a play command. This matches
//! the shipped app's behavior and is kept deliberately.

/// Classified purpose of a user utterance.
///
/// Transient; produced once per message and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatIntent {
    /// Start playback. The query is the free text left after stripping
    /// command words; empty means "play something generic".
    Play {
        /// Search query extracted from the message.
        query: String,
    },
    /// Pause playback.
    Pause,
    /// Skip to the next track.
    Next,
    /// Go back to the previous track.
    Previous,
    /// Ordinary chat; no playback command detected.
    None,
}

/// The command family a rule maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    /// Pause/stop phrases.
    Pause,
    /// Play keywords.
    Play,
    /// Next/skip phrases.
    Next,
    /// Previous/back phrases.
    Previous,
}

/// One entry of the ordered intent rule table.
#[derive(Debug)]
pub struct IntentRule {
    /// Command family this rule produces.
    pub kind: IntentKind,
    /// Phrases matched by case-insensitive substring containment.
    pub phrases: &'static [&'static str],
}

/// The intent rule table, evaluated top to bottom, first match wins.
///
/// Exposed as data so tests and callers can inspect the exact phrase sets.
pub const INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        kind: IntentKind::Pause,
        phrases: &[
            "pause music",
            "pause the music",
            "pause the song",
            "stop playing",
            "stop the music",
            "stop music",
        ],
    },
    IntentRule {
        // Longest phrases first so stripping removes "playlist" before the
        // "play" substring inside it.
        kind: IntentKind::Play,
        phrases: &["playlist", "listen to", "put on", "play", "music", "song"],
    },
    IntentRule {
        kind: IntentKind::Next,
        phrases: &["next track", "next song", "skip", "next"],
    },
    IntentRule {
        kind: IntentKind::Previous,
        phrases: &["previous track", "previous song", "previous", "go back", "back"],
    },
];

/// Classify a user message into a [`ChatIntent`].
///
/// Pure function, no side effects; safe to call repeatedly and concurrently.
#[must_use]
pub fn classify(text: &str) -> ChatIntent {
    let lowered = text.to_ascii_lowercase();

    for rule in INTENT_RULES {
        if !rule.phrases.iter().any(|p| lowered.contains(p)) {
            continue;
        }
        return match rule.kind {
            IntentKind::Pause => ChatIntent::Pause,
            IntentKind::Play => ChatIntent::Play {
                query: strip_command_words(text, rule.phrases),
            },
            IntentKind::Next => ChatIntent::Next,
            IntentKind::Previous => ChatIntent::Previous,
        };
    }

    ChatIntent::None
}

/// Remove every occurrence of the matched command phrases (matched
/// case-insensitively, removed from the original text so the query keeps its
/// casing) and normalize whitespace, leaving the free-text search query.
fn strip_command_words(text: &str, phrases: &[&str]) -> String {
    let mut remainder = text.to_owned();
    // ASCII lowering keeps byte offsets aligned with the original, so both
    // strings can be edited in lockstep.
    let mut lowered = text.to_ascii_lowercase();
    for phrase in phrases {
        while let Some(pos) = lowered.find(phrase) {
            let range = pos..pos + phrase.len();
            remainder.replace_range(range.clone(), " ");
            lowered.replace_range(range, " ");
        }
    }
    remainder.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn plain_chat_is_none() {
        assert_eq!(classify("what's DeFi?"), ChatIntent::None);
        assert_eq!(classify("tell me about rust"), ChatIntent::None);
        assert_eq!(classify(""), ChatIntent::None);
    }

    #[test]
    fn play_extracts_query() {
        assert_eq!(
            classify("play some lofi music"),
            ChatIntent::Play {
                query: "some lofi".into()
            }
        );
    }

    #[test]
    fn play_with_no_remainder_yields_empty_query() {
        assert_eq!(classify("play music"), ChatIntent::Play { query: String::new() });
        assert_eq!(classify("Play"), ChatIntent::Play { query: String::new() });
    }

    #[test]
    fn play_query_keeps_original_casing() {
        // Command words match case-insensitively but the forwarded query
        // keeps the user's casing for the providers.
        assert_eq!(
            classify("play Despacito"),
            ChatIntent::Play {
                query: "Despacito".into()
            }
        );
        assert_eq!(
            classify("PLAY Some Rock MUSIC"),
            ChatIntent::Play {
                query: "Some Rock".into()
            }
        );
    }

    #[test]
    fn put_on_and_listen_to_are_play() {
        assert_eq!(
            classify("put on some jazz"),
            ChatIntent::Play {
                query: "some jazz".into()
            }
        );
        assert_eq!(
            classify("listen to classical piano"),
            ChatIntent::Play {
                query: "classical piano".into()
            }
        );
    }

    #[test]
    fn pause_beats_play_keywords() {
        // Precedence invariant: pause phrases are checked before play
        // keywords even when both are present.
        assert_eq!(classify("pause the music"), ChatIntent::Pause);
        assert_eq!(classify("stop playing that song"), ChatIntent::Pause);
        assert_eq!(classify("please stop the music now"), ChatIntent::Pause);
    }

    #[test]
    fn play_beats_next_on_ambiguous_input() {
        // Documented tie-break: "play the next one" is a play command.
        assert!(matches!(
            classify("play the next one"),
            ChatIntent::Play { .. }
        ));
    }

    #[test]
    fn next_and_skip() {
        assert_eq!(classify("next track please"), ChatIntent::Next);
        assert_eq!(classify("skip this"), ChatIntent::Next);
    }

    #[test]
    fn previous_and_back() {
        assert_eq!(classify("previous track"), ChatIntent::Previous);
        assert_eq!(classify("go back"), ChatIntent::Previous);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("PAUSE THE MUSIC"), ChatIntent::Pause);
        assert!(matches!(classify("PLAY Some Rock"), ChatIntent::Play { .. }));
    }

    #[test]
    fn generic_words_misfire_by_design() {
        // Known false-positive kept for behavioral parity.
        assert!(matches!(
            classify("I love this song's chart pattern"),
            ChatIntent::Play { .. }
        ));
    }

    #[test]
    fn rule_table_order_is_pause_play_next_previous() {
        let kinds: Vec<IntentKind> = INTENT_RULES.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IntentKind::Pause,
                IntentKind::Play,
                IntentKind::Next,
                IntentKind::Previous
            ]
        );
    }

    #[test]
    fn pause_phrases_are_multi_word() {
        let pause = &INTENT_RULES[0];
        assert!(pause.phrases.iter().all(|p| p.contains(' ')));
    }
}
