//! Render projection for the UI collaborator
//!
//! Turns a store snapshot into display rows. The layout variant (standard vs
//! defrost card) and the lifecycle state are both resolved here, once, so the
//! presentation layer only has to match on closed enums.

use crate::models::{DedupKey, LabelEntry, LifecycleState, ParsedLabel};
use crate::services::key_generator::MISSING_FIELD;
use crate::services::label_store::LabelStore;
use crate::services::state_classifier::classify_label;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Card layout with the dates placed by meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout")]
pub enum LabelLayout {
    Standard {
        prepped: String,
        use_by: String,
    },
    Defrosted {
        defrost_start: String,
        ready_to_prep: String,
        use_by: String,
    },
}

impl LabelLayout {
    pub fn from_label(label: &ParsedLabel) -> Self {
        let date = |index: usize| label.date(index).unwrap_or(MISSING_FIELD).to_string();

        if label.is_defrosted() {
            LabelLayout::Defrosted {
                defrost_start: date(0),
                ready_to_prep: date(1),
                use_by: date(2),
            }
        } else {
            LabelLayout::Standard {
                prepped: date(0),
                use_by: date(1),
            }
        }
    }
}

/// Background cue for a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayCue {
    White,
    Red,
    Blue,
}

impl From<LifecycleState> for DisplayCue {
    fn from(state: LifecycleState) -> Self {
        match state {
            LifecycleState::Defrosting => DisplayCue::White,
            LifecycleState::Expired => DisplayCue::Red,
            LifecycleState::Fresh => DisplayCue::Blue,
        }
    }
}

/// One row of the rendered label list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRow {
    pub key: DedupKey,
    pub label: ParsedLabel,
    pub state: LifecycleState,
    pub layout: LabelLayout,
    pub cue: DisplayCue,
}

impl RenderRow {
    pub fn from_entry(entry: LabelEntry, now: NaiveDateTime) -> Self {
        let state = classify_label(&entry.label, now);
        Self {
            layout: LabelLayout::from_label(&entry.label),
            cue: DisplayCue::from(state),
            state,
            key: entry.key,
            label: entry.label,
        }
    }
}

/// Rows for every pending label, in insertion order, classified at `now`
pub async fn render_rows(store: &LabelStore, now: NaiveDateTime) -> Vec<RenderRow> {
    store
        .snapshot()
        .await
        .into_iter()
        .map(|entry| RenderRow::from_entry(entry, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::key_generator::dedup_key;
    use ftt_common::events::EventBus;

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%d/%m/%y %H:%M").unwrap()
    }

    fn label(label_type: &str, dates: &[&str]) -> ParsedLabel {
        ParsedLabel {
            product_name: "ginger chicken".to_string(),
            label_type: label_type.to_string(),
            dates: dates.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_standard_layout_fills_missing_dates() {
        let layout = LabelLayout::from_label(&label("Prepped", &["01/01/24 10:00"]));
        assert_eq!(
            layout,
            LabelLayout::Standard {
                prepped: "01/01/24 10:00".to_string(),
                use_by: "N/A".to_string(),
            }
        );
    }

    #[test]
    fn test_defrosted_layout() {
        let layout = LabelLayout::from_label(&label(
            "Defrosted",
            &["01/01/24 08:00", "01/01/24 10:00", "02/01/24 08:00"],
        ));
        match layout {
            LabelLayout::Defrosted { defrost_start, ready_to_prep, use_by } => {
                assert_eq!(defrost_start, "01/01/24 08:00");
                assert_eq!(ready_to_prep, "01/01/24 10:00");
                assert_eq!(use_by, "02/01/24 08:00");
            }
            LabelLayout::Standard { .. } => panic!("expected defrosted layout"),
        }
    }

    #[test]
    fn test_cue_per_state() {
        assert_eq!(DisplayCue::from(LifecycleState::Defrosting), DisplayCue::White);
        assert_eq!(DisplayCue::from(LifecycleState::Expired), DisplayCue::Red);
        assert_eq!(DisplayCue::from(LifecycleState::Fresh), DisplayCue::Blue);
    }

    #[tokio::test]
    async fn test_render_rows_classify_in_order() {
        let store = LabelStore::new(EventBus::new(16));
        let expired = label("Prepped", &["01/01/24 10:00", "01/01/24 12:00"]);
        let defrosting = label("Defrosted", &["01/01/24 08:00", "02/01/24 10:00", "04/01/24 08:00"]);
        store.try_insert(dedup_key(&expired), expired).await;
        store.try_insert(dedup_key(&defrosting), defrosting).await;

        let rows = render_rows(&store, at("02/01/24 09:00")).await;

        let states: Vec<LifecycleState> = rows.iter().map(|r| r.state).collect();
        assert_eq!(states, vec![LifecycleState::Expired, LifecycleState::Defrosting]);
        assert_eq!(rows[1].cue, DisplayCue::White);
    }

    #[tokio::test]
    async fn test_state_recomputed_per_render() {
        let store = LabelStore::new(EventBus::new(16));
        let l = label("Prepped", &["01/01/24 10:00", "01/01/24 12:00"]);
        store.try_insert(dedup_key(&l), l).await;

        assert_eq!(render_rows(&store, at("01/01/24 13:00")).await[0].state, LifecycleState::Fresh);
        assert_eq!(render_rows(&store, at("02/01/24 13:00")).await[0].state, LifecycleState::Expired);
    }
}
