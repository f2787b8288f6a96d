//! Status to progress mapping.
//!
//! Every order status maps to one of four canonical [`Stage`]s. From the stage we derive
//! the progress percentage, the width of the progress bar, which steps are highlighted,
//! and a badge tone. The mapping looks at the current status only; it never remembers
//! what the status was before.
//!
//! | Status     | Percent | Bar        |
//! |------------|---------|------------|
//! | Received   | 25      | 1/4        |
//! | Processing | 50      | 2/4        |
//! | Completed  | 75      | 3/4        |
//! | Delivered  | 100     | full       |
//! | other      | 0       | neutral    |

use crate::model::OrderStatus;
use serde::Serialize;

/// The four fulfilment steps, in their fixed forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Stage {
    Received,
    Processing,
    Completed,
    Delivered,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Received,
        Stage::Processing,
        Stage::Completed,
        Stage::Delivered,
    ];

    /// Zero-based position in [`Stage::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Received => "Order Received",
            Stage::Processing => "Processing",
            Stage::Completed => "Completed",
            Stage::Delivered => "Delivered",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::Received => "Your order has been received",
            Stage::Processing => "We are preparing your order",
            Stage::Completed => "Your order is on its way",
            Stage::Delivered => "Order has been delivered",
        }
    }

    pub fn progress_percent(self) -> u8 {
        match self {
            Stage::Received => 25,
            Stage::Processing => 50,
            Stage::Completed => 75,
            Stage::Delivered => 100,
        }
    }
}

impl OrderStatus {
    /// The canonical stage, or `None` for a status we do not know.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            OrderStatus::Received => Some(Stage::Received),
            OrderStatus::Processing => Some(Stage::Processing),
            OrderStatus::Completed => Some(Stage::Completed),
            OrderStatus::Delivered => Some(Stage::Delivered),
            OrderStatus::Unrecognized(_) => None,
        }
    }

    pub fn progress_percent(&self) -> u8 {
        self.stage().map_or(0, Stage::progress_percent)
    }
}

/// Width of the filled part of the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarWidth {
    Quarter,
    Half,
    ThreeQuarters,
    Full,
    /// Unknown status: drawn empty and without highlight colour.
    Neutral,
}

impl BarWidth {
    pub fn fraction(self) -> f32 {
        match self {
            BarWidth::Quarter => 0.25,
            BarWidth::Half => 0.5,
            BarWidth::ThreeQuarters => 0.75,
            BarWidth::Full => 1.0,
            BarWidth::Neutral => 0.0,
        }
    }

    pub fn is_highlighted(self) -> bool {
        self != BarWidth::Neutral
    }
}

/// Semantic tone for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusTone {
    Pending,
    Active,
    Dispatched,
    Done,
    Neutral,
}

/// A canonical step and whether the order has reached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub stage: Stage,
    pub reached: bool,
}

/// Everything the presentation layer needs to draw one order's progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub percent: u8,
    pub bar: BarWidth,
    /// Position of the current stage, `None` when the status is unrecognized.
    pub current_step: Option<usize>,
    pub steps: [StepView; 4],
    pub tone: StatusTone,
}

impl ProgressView {
    pub fn for_status(status: &OrderStatus) -> Self {
        let stage = status.stage();
        let current_step = stage.map(Stage::index);

        let steps = Stage::ALL.map(|s| StepView {
            stage: s,
            reached: current_step.is_some_and(|current| s.index() <= current),
        });

        let (bar, tone) = match stage {
            Some(Stage::Received) => (BarWidth::Quarter, StatusTone::Pending),
            Some(Stage::Processing) => (BarWidth::Half, StatusTone::Active),
            Some(Stage::Completed) => (BarWidth::ThreeQuarters, StatusTone::Dispatched),
            Some(Stage::Delivered) => (BarWidth::Full, StatusTone::Done),
            None => (BarWidth::Neutral, StatusTone::Neutral),
        };

        Self {
            percent: status.progress_percent(),
            bar,
            current_step,
            steps,
            tone,
        }
    }

    /// Stages that are highlighted, in order.
    pub fn reached_stages(&self) -> Vec<Stage> {
        self.steps
            .iter()
            .filter(|s| s.reached)
            .map(|s| s.stage)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentages() {
        assert_eq!(OrderStatus::Received.progress_percent(), 25);
        assert_eq!(OrderStatus::Processing.progress_percent(), 50);
        assert_eq!(OrderStatus::Completed.progress_percent(), 75);
        assert_eq!(OrderStatus::Delivered.progress_percent(), 100);
        assert_eq!(OrderStatus::from("Cancelled").progress_percent(), 0);
        assert_eq!(OrderStatus::from("processing").progress_percent(), 0);
    }

    #[test]
    fn test_completed_highlights_first_three_steps() {
        let view = ProgressView::for_status(&OrderStatus::Completed);
        assert_eq!(
            view.reached_stages(),
            vec![Stage::Received, Stage::Processing, Stage::Completed]
        );
        assert!(!view.steps[3].reached);
        assert_eq!(view.current_step, Some(2));
        assert_eq!(view.bar, BarWidth::ThreeQuarters);
    }

    #[test]
    fn test_unrecognized_status_is_neutral() {
        let view = ProgressView::for_status(&OrderStatus::from("On Hold"));
        assert_eq!(view.percent, 0);
        assert_eq!(view.bar, BarWidth::Neutral);
        assert!(!view.bar.is_highlighted());
        assert_eq!(view.current_step, None);
        assert!(view.reached_stages().is_empty());
        assert_eq!(view.tone, StatusTone::Neutral);
    }

    #[test]
    fn test_bar_fraction_matches_percent() {
        for stage in Stage::ALL {
            let status = OrderStatus::from(stage.label());
            let view = ProgressView::for_status(&status);
            assert_eq!(
                (view.bar.fraction() * 100.0).round() as u8,
                view.percent,
                "{stage:?}"
            );
        }
    }

    #[test]
    fn test_stage_catalogue() {
        assert_eq!(Stage::ALL.map(Stage::index), [0, 1, 2, 3]);
        assert_eq!(Stage::Received.label(), "Order Received");
        assert_eq!(Stage::Delivered.description(), "Order has been delivered");
    }
}
