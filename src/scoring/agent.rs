//! Per-agent readiness scoring

use crate::scoring::profiles::{AgentProfile, Signal};
use crate::signals::SignalSet;

/// Whether `signal` is met by `signals`
pub fn signal_met(signal: Signal, signals: &SignalSet) -> bool {
    match signal {
        Signal::RobotsAllow => signals.robots_allowed,
        Signal::AntiAiDirectives => !signals.has_ai_restriction,
        Signal::TextWithoutJs => signals.has_visible_text_without_js,
        Signal::MetaTitle => signals.has_title,
        Signal::MetaDescription => signals.has_meta_description,
        Signal::Https => signals.is_https,
        Signal::Status2xx => signals.is_status_2xx,
        Signal::Canonical => signals.has_canonical,
        Signal::Schema => signals.has_structured_data,
        Signal::H1 => signals.has_h1,
    }
}

/// Points lost when a meta description is present but out of range
///
/// Half the weight, rounded half up.
pub fn meta_description_penalty(weight: u32) -> u32 {
    (weight + 1) / 2
}

/// Scores one agent's signal set against its profile
///
/// Sums the weights of met signals, takes the half penalty off a present but
/// out-of-range meta description, and clamps to `[0, 100]`.
pub fn score_agent(profile: &AgentProfile, signals: &SignalSet) -> u8 {
    let mut points: i64 = profile
        .weights
        .iter()
        .filter(|(signal, _)| signal_met(*signal, signals))
        .map(|(_, weight)| i64::from(weight))
        .sum();

    if signals.has_meta_description && !signals.meta_description_length_ok {
        let weight = profile.weights.get(Signal::MetaDescription).unwrap_or(0);
        points -= i64::from(meta_description_penalty(weight));
    }

    points.clamp(0, 100) as u8
}
