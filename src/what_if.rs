//! "What if" activity simulator
//!
//! Maps an activity label onto fixed estimated effects on tomorrow's
//! readiness, sleep and recovery. Matching is a case-insensitive substring
//! search through an ordered rule list; the first hit wins.

use serde::{Deserialize, Serialize};

use crate::baseline::Baseline;
use crate::models::DailyMetrics;

/// Preset choices offered to the user
pub const WHAT_IF_OPTIONS: [&str; 6] = [
    "Zone-2 run (45 min)",
    "HIIT session",
    "Strength training",
    "Rest day",
    "Extra sleep (+1h)",
    "Social evening",
];

/// Estimated effect of an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfOutcome {
    /// Readiness points
    pub readiness_delta: i32,
    /// Hours of sleep
    pub sleep_delta: f64,
    /// Recovery points
    pub recovery_delta: i32,
    pub explanation: String,
}

struct WhatIfRule {
    keywords: &'static [&'static str],
    readiness_delta: i32,
    sleep_delta: f64,
    recovery_delta: i32,
    explanation: &'static str,
}

static RULES: [WhatIfRule; 5] = [
    WhatIfRule {
        keywords: &["zone-2", "zone 2"],
        readiness_delta: -5,
        sleep_delta: 0.0,
        recovery_delta: 5,
        explanation: "Aerobic base work with minimal recovery tax",
    },
    WhatIfRule {
        keywords: &["hiit"],
        readiness_delta: -15,
        sleep_delta: -0.5,
        recovery_delta: -10,
        explanation: "Demanding session, expect about 48h of recovery",
    },
    WhatIfRule {
        keywords: &["strength"],
        readiness_delta: -10,
        sleep_delta: 0.0,
        recovery_delta: -5,
        explanation: "Moderate muscular fatigue",
    },
    WhatIfRule {
        keywords: &["rest"],
        readiness_delta: 10,
        sleep_delta: 0.5,
        recovery_delta: 15,
        explanation: "Rest accelerates recovery",
    },
    WhatIfRule {
        keywords: &["extra sleep", "early bed"],
        readiness_delta: 12,
        sleep_delta: 1.0,
        recovery_delta: 20,
        explanation: "Sleep is the #1 recovery tool",
    },
];

static DEFAULT_OUTCOME: WhatIfRule = WhatIfRule {
    keywords: &[],
    readiness_delta: -8,
    sleep_delta: 0.0,
    recovery_delta: 0,
    explanation: "Moderate activity with slight impact",
};

impl From<&WhatIfRule> for WhatIfOutcome {
    fn from(rule: &WhatIfRule) -> Self {
        Self {
            readiness_delta: rule.readiness_delta,
            sleep_delta: rule.sleep_delta,
            recovery_delta: rule.recovery_delta,
            explanation: rule.explanation.to_string(),
        }
    }
}

/// Estimate the effect of the chosen activity.
///
/// The result depends on `option_label` alone; `_baseline` and `_today` are
/// accepted for callers that already hold them but do not influence it.
pub fn simulate_what_if(
    option_label: &str,
    _baseline: &Baseline,
    _today: &DailyMetrics,
) -> WhatIfOutcome {
    let label = option_label.to_lowercase();
    let rule = RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| label.contains(k)))
        .unwrap_or(&DEFAULT_OUTCOME);

    tracing::debug!(
        option = option_label,
        readiness_delta = rule.readiness_delta,
        "what-if simulated"
    );
    WhatIfOutcome::from(rule)
}
