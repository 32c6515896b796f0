//! Reusable name and value transforms shared by every unit.
//!
//! These are deliberately small and positional: they recognise the handful of
//! shapes that appear in the daily reports and fall back to leaving the input
//! alone rather than guessing.

use std::{borrow::Cow, collections::BTreeMap, sync::LazyLock};

use regex::Regex;

use crate::profile::{LabeledSummary, TimeStamp};

static WELL_NAME_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(.*?)\s*\(([^)]*)\)\s*(?:\(([^)]*)\)\s*)?$").expect("well name regex")
});
static LEADING_RIG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*rig\b\s*").expect("leading rig regex"));
static PDSI_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^pdsi\s*#\s*").expect("pdsi regex"));
static PLAN_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Plan\s*:\s*").expect("plan marker regex"));
static RIG_IN_PARENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(Rig\s+(.+?)\)").expect("rig parens regex"));

const INVISIBLE: &[char] = &['\u{2060}', '\u{200B}', '\u{FEFF}'];

/// Removes zero-width characters that spreadsheet exports leave in names.
pub fn strip_invisible(value: &str) -> Cow<'_, str> {
    if value.contains(INVISIBLE) {
        Cow::Owned(value.chars().filter(|c| !INVISIBLE.contains(c)).collect())
    } else {
        Cow::Borrowed(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WellNames {
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
}

/// Splits `NAME`, `NAME (ALT)` and `NAME\n(ALT1)\n(ALT2)`.
///
/// An empty parenthesized part inherits the primary name and an empty primary
/// inherits the first alternate. Anything else is returned whole as the
/// primary name with empty alternates.
pub fn split_well_name(raw: &str) -> WellNames {
    let cleaned = strip_invisible(raw);
    let value = cleaned.trim();
    let Some(caps) = WELL_NAME_SHAPE.captures(value) else {
        return WellNames {
            primary: value.to_string(),
            ..WellNames::default()
        };
    };
    let mut primary = caps[1].trim().to_string();
    let mut secondary = caps[2].trim().to_string();
    let tertiary = caps.get(3).map(|m| m.as_str().trim().to_string());

    if primary.is_empty() {
        primary = secondary.clone();
    }
    if secondary.is_empty() {
        secondary = primary.clone();
    }
    let tertiary = match tertiary {
        Some(t) if t.is_empty() => primary.clone(),
        Some(t) => t,
        None => String::new(),
    };
    WellNames {
        primary,
        secondary,
        tertiary,
    }
}

/// Splits `NAME / ALT` on the first slash.
pub fn split_slash(raw: &str) -> (String, String) {
    match raw.split_once('/') {
        Some((left, right)) => (left.trim().to_string(), right.trim().to_string()),
        None => (raw.trim().to_string(), String::new()),
    }
}

/// Decodes an opening line such as `OHD – QB-117 (Rig ENAFOR 45)` into
/// `(well, rig)`.
pub fn split_well_and_rig(raw: &str) -> (String, Option<String>) {
    let rig = RIG_IN_PARENS
        .captures(raw)
        .map(|caps| caps[1].trim().to_string());
    let without_rig = RIG_IN_PARENS.replace(raw, "");
    let well = match without_rig.split_once('–') {
        Some((_, rest)) => rest.trim(),
        None => without_rig.trim(),
    };
    (well.to_string(), rig)
}

/// Strips a leading `Rig` token, applies the alias table and optionally
/// normalizes `PDSI #` spacing.
pub fn clean_rig_name(
    raw: &str,
    strip_rig_token: bool,
    aliases: &BTreeMap<String, String>,
    pdsi_spacing: bool,
) -> String {
    let mut name = if strip_rig_token {
        LEADING_RIG.replace(raw, "").trim().to_string()
    } else {
        raw.trim().to_string()
    };
    if let Some(alias) = aliases.get(&name) {
        name = alias.clone();
    }
    if pdsi_spacing && PDSI_HASH.is_match(&name) {
        name = PDSI_HASH.replace(&name, "PDSI #").into_owned();
    }
    name
}

fn is_text_noise(c: char) -> bool {
    matches!(c, '-' | ':' | '=') || c.is_whitespace()
}

/// Removes leading `-`, `:` and `=` runs so spreadsheet tools do not read the
/// cell as a formula. Only the first line's left edge is touched.
pub fn clean_free_text(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(is_text_noise)
        .trim_end()
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryParts {
    pub summary: String,
    pub status: String,
    pub plan: String,
}

/// Splits a combined activity cell on the first `Plan:` marker.
pub fn split_plan(raw: &str) -> SummaryParts {
    let mut parts = PLAN_MARKER.splitn(raw, 2);
    let summary = parts.next().unwrap_or_default().trim().to_string();
    let plan = parts.next().unwrap_or_default().trim().to_string();
    SummaryParts {
        summary,
        plan,
        ..SummaryParts::default()
    }
}

/// Compiled form of [`LabeledSummary`] for cells holding the whole day in one
/// block, e.g. `Laporan: ... Status Pagi 06:00 : ... Rencana: ...`.
#[derive(Debug, Clone)]
pub struct SummarySplitter {
    summary: Option<Regex>,
    status_label: String,
    status: Regex,
    plan: Regex,
}

impl SummarySplitter {
    pub fn new(spec: &LabeledSummary) -> Result<Self, regex::Error> {
        let summary = spec
            .summary_label
            .as_deref()
            .map(|label| Regex::new(&format!(r"{}\s*", regex::escape(label))))
            .transpose()?;
        let time = match spec.status_time {
            TimeStamp::Required => r"\s*\d{1,2}:\d{2}",
            TimeStamp::Optional => r"(?:\s*\d{1,2}:\d{2})?",
        };
        let status = Regex::new(&format!(
            r"{}{time}\s*:\s*",
            regex::escape(&spec.status_label)
        ))?;
        let plan = Regex::new(&format!(r"{}\s*", regex::escape(&spec.plan_label)))?;
        Ok(Self {
            summary,
            status_label: spec.status_label.clone(),
            status,
            plan,
        })
    }

    pub fn split(&self, raw: &str) -> SummaryParts {
        let text = raw.replace("_x000D_", "\n");
        let text = text.trim();
        if text.is_empty() {
            return SummaryParts::default();
        }

        let plan_at = |from: usize| self.plan.find_at(text, from).map(|m| m.start());

        let summary = match &self.summary {
            Some(label) => label.find(text).map(|m| m.end()),
            None => Some(0),
        }
        .map(|start| {
            let status_pos = text[start..].find(&self.status_label).map(|p| p + start);
            let end = [status_pos, plan_at(start)]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(text.len());
            text[start..end].trim().to_string()
        })
        .unwrap_or_default();

        let status = self
            .status
            .find(text)
            .map(|m| {
                let end = plan_at(m.end()).unwrap_or(text.len());
                text[m.end()..end].trim().to_string()
            })
            .unwrap_or_default();

        let plan = self
            .plan
            .find(text)
            .map(|m| text[m.end()..].trim().to_string())
            .unwrap_or_default();

        SummaryParts {
            summary,
            status,
            plan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitter_handles_three_shapes() {
        let plain = split_well_name("ABC");
        assert_eq!(plain.primary, "ABC");
        assert_eq!(plain.secondary, "");

        let one = split_well_name("ABC (DEF)");
        assert_eq!(
            (one.primary.as_str(), one.secondary.as_str()),
            ("ABC", "DEF")
        );

        let two = split_well_name("ABC\n(DEF)\n(GHI)");
        assert_eq!(
            (two.primary.as_str(), two.secondary.as_str(), two.tertiary.as_str()),
            ("ABC", "DEF", "GHI")
        );
    }

    #[test]
    fn empty_parenthetical_inherits_primary() {
        let names = split_well_name("MUT-385 ()");
        assert_eq!(names.secondary, "MUT-385");
        let names = split_well_name("(ALT-1)");
        assert_eq!(names.primary, "ALT-1");
    }

    #[test]
    fn trailing_text_falls_back_to_whole_string() {
        let names = split_well_name("ABC (DEF) sidetrack");
        assert_eq!(names.primary, "ABC (DEF) sidetrack");
        assert!(names.secondary.is_empty());
    }

    #[test]
    fn invisible_word_joiner_is_removed() {
        let names = split_well_name("\u{2060}KTB-12 (KTB-12A)");
        assert_eq!(names.primary, "KTB-12");
    }

    #[test]
    fn rig_cleaner_strips_token_and_applies_aliases() {
        let aliases = BTreeMap::from([(
            "Airlangga #55".to_string(),
            "Airlangga-55".to_string(),
        )]);
        assert_eq!(
            clean_rig_name("Rig Airlangga #55", true, &aliases, false),
            "Airlangga-55"
        );
        assert_eq!(
            clean_rig_name("rig PDSI #  40.2", true, &aliases, true),
            "PDSI #40.2"
        );
        assert_eq!(
            clean_rig_name("PDSI#21.2/OW 700-M", false, &aliases, true),
            "PDSI #21.2/OW 700-M"
        );
        assert_eq!(clean_rig_name("Rigel 7", true, &aliases, false), "Rigel 7");
    }

    #[test]
    fn free_text_cleaner_touches_first_line_only() {
        assert_eq!(
            clean_free_text("- drilling 8-1/2\" hole\n- POOH"),
            "drilling 8-1/2\" hole\n- POOH"
        );
        assert_eq!(clean_free_text(":= RIH"), "RIH");
        assert_eq!(clean_free_text("-\n- circulate"), "circulate");
    }

    #[test]
    fn well_and_rig_decodes_region_five_line() {
        let (well, rig) = split_well_and_rig("OHD – QB-117 (Rig ENAFOR 45)");
        assert_eq!(well, "QB-117");
        assert_eq!(rig.as_deref(), Some("ENAFOR 45"));
    }

    #[test]
    fn plan_split_is_case_insensitive() {
        let parts = split_plan("Drilling 12-1/4\" hole\nplan : POOH to surface");
        assert_eq!(parts.summary, "Drilling 12-1/4\" hole");
        assert_eq!(parts.plan, "POOH to surface");
    }

    #[test]
    fn labeled_splitter_finds_all_three_blocks() {
        let splitter = SummarySplitter::new(&LabeledSummary {
            summary_label: Some("Laporan:".to_string()),
            status_label: "Status Pagi".to_string(),
            status_time: TimeStamp::Required,
            plan_label: "Rencana:".to_string(),
        })
        .unwrap();
        let parts = splitter.split(
            "Laporan: - Drill 8-1/2\" hole_x000D_Status Pagi 06:00 : Circulate\nRencana: POOH",
        );
        assert_eq!(parts.summary, "- Drill 8-1/2\" hole");
        assert_eq!(parts.status, "Circulate");
        assert_eq!(parts.plan, "POOH");
    }

    #[test]
    fn labeled_splitter_without_summary_label_starts_at_beginning() {
        let splitter = SummarySplitter::new(&LabeledSummary {
            summary_label: None,
            status_label: "Status Pagi".to_string(),
            status_time: TimeStamp::Optional,
            plan_label: "Plan:".to_string(),
        })
        .unwrap();
        let parts = splitter.split("Run casing 9-5/8\"\nStatus Pagi: WOC\nPlan: Drill out");
        assert_eq!(parts.summary, "Run casing 9-5/8\"");
        assert_eq!(parts.status, "WOC");
        assert_eq!(parts.plan, "Drill out");
    }
}
