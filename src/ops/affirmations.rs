//! Daily affirmation and the static affirmation library.

use super::AppContext;
use crate::ai::prompts::affirmation_prompt;
use crate::ai::{complete_or_fallback, Completion};
use crate::errors::AppResult;
use chrono::NaiveDate;
use tracing::{debug, info};

/// A named group of affirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffirmationCategory {
    /// Display name.
    pub name: &'static str,
    /// The affirmations in this category.
    pub affirmations: &'static [&'static str],
}

const LIBRARY: &[AffirmationCategory] = &[
    AffirmationCategory {
        name: "Self-Compassion",
        affirmations: &[
            "I am worthy of love and respect, exactly as I am.",
            "I treat myself with the same kindness I offer to others.",
            "My imperfections make me unique and human.",
            "I am learning and growing every day, and that's enough.",
            "I forgive myself for my mistakes and learn from them.",
            "I listen to my needs and honor them as valid and important.",
        ],
    },
    AffirmationCategory {
        name: "Stress Management",
        affirmations: &[
            "I breathe in calm and exhale tension with each breath.",
            "I have the power to create peace in my mind and body.",
            "This moment of challenge is temporary and I can move through it.",
            "I release what I cannot control and focus on what I can.",
            "I am stronger than my stress and bigger than my worries.",
            "Each breath brings me closer to calm and clarity.",
        ],
    },
    AffirmationCategory {
        name: "Confidence",
        affirmations: &[
            "I trust my abilities and embrace new challenges.",
            "I speak my truth confidently and with compassion.",
            "I am capable of achieving what I set my mind to.",
            "My voice matters and deserves to be heard.",
            "I am becoming more confident with each passing day.",
            "I believe in myself, even when facing uncertainty.",
        ],
    },
    AffirmationCategory {
        name: "Gratitude",
        affirmations: &[
            "I am grateful for the abundance that exists in my life.",
            "Each day brings new blessings for me to appreciate.",
            "I notice and appreciate the small joys in everyday moments.",
            "Gratitude transforms my perspective and opens my heart.",
            "I acknowledge all the good that surrounds me.",
            "I am thankful for my resilience through difficult times.",
        ],
    },
    AffirmationCategory {
        name: "Growth Mindset",
        affirmations: &[
            "I embrace challenges as opportunities to learn and grow.",
            "My potential is limitless when I persist through obstacles.",
            "I can develop new skills through practice and perseverance.",
            "Each setback contains a lesson that makes me stronger.",
            "I am constantly evolving and becoming a better version of myself.",
            "My intelligence and abilities can be developed through dedication.",
        ],
    },
    AffirmationCategory {
        name: "Balance & Boundaries",
        affirmations: &[
            "I honor my needs by setting healthy boundaries.",
            "I create balance between work, rest, and play in my life.",
            "Saying no when necessary is an act of self-respect.",
            "I deserve time to rest and recharge without guilt.",
            "I am in control of where my energy goes.",
            "My well-being is a priority worth protecting.",
        ],
    },
];

/// Every category of the built-in library, in display order.
pub fn affirmation_library() -> &'static [AffirmationCategory] {
    LIBRARY
}

/// Looks up a category by name, ignoring case and surrounding whitespace.
pub fn find_category(name: &str) -> Option<&'static AffirmationCategory> {
    let name = name.trim();
    LIBRARY.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Today's affirmation.
///
/// The first call on a given day generates one and caches it in the session;
/// later calls that day reuse it unless `regenerate` is set. Fallback text is
/// shown but never cached, so the next call tries the service again.
///
/// # Errors
///
/// Returns `AppError::Config` when generation is needed and no API key is configured.
pub fn daily_affirmation(
    ctx: &mut AppContext,
    today: NaiveDate,
    regenerate: bool,
) -> AppResult<Completion> {
    if !regenerate {
        if let Some(cached) = ctx.session.affirmation_for(today) {
            debug!("Using cached affirmation for {}", today);
            return Ok(Completion::text(cached));
        }
    }

    let request = affirmation_prompt();
    let completion = complete_or_fallback(ctx.completion()?, &request);

    if !completion.is_fallback() {
        info!("Generated affirmation for {}", today);
        ctx.session.cache_affirmation(today, completion.text.clone());
    }
    Ok(completion)
}
