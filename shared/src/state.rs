//! Reports screen state
//!
//! A reducer over [`ReportAction`]s. Every filter change starts a new request
//! generation; metric results carry the generation they were requested under
//! and are dropped if a newer one has started since. Groups write disjoint
//! parts of the snapshot, so their completion order does not matter.

use serde::{Deserialize, Serialize};

use crate::models::{MetricGroup, MetricGroupKind, MetricSnapshot};
use crate::types::{MonthFilter, TrendRange};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportFilters {
    pub range: TrendRange,
    pub month: MonthFilter,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportStatus {
    #[default]
    Idle,
    InProgress,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportAction {
    /// Reload everything under the current filters (initial mount)
    Refresh,
    SetRange { range: TrendRange },
    SetMonth { month: MonthFilter },
    GroupLoaded { generation: u64, group: MetricGroup },
    GroupFailed { generation: u64, kind: MetricGroupKind },
    ExportStarted,
    ExportFailed { message: String },
    ExportFinished,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportState {
    pub filters: ReportFilters,
    pub generation: u64,
    pub snapshot: MetricSnapshot,
    /// Groups requested under the current generation and not yet resolved
    pub pending: Vec<MetricGroupKind>,
    pub export: ExportStatus,
}

impl ReportState {
    pub fn new(filters: ReportFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn reduce(mut self, action: ReportAction) -> Self {
        match action {
            ReportAction::Refresh => self.start_generation(),
            ReportAction::SetRange { range } => {
                // Leaving the yearly view clears the month selection
                let month = if range == TrendRange::Yearly {
                    self.filters.month
                } else {
                    MonthFilter::All
                };
                let filters = ReportFilters { range, month };
                if filters != self.filters {
                    self.filters = filters;
                    self.start_generation();
                }
            }
            ReportAction::SetMonth { month } => {
                if self.filters.range == TrendRange::Yearly && month != self.filters.month {
                    self.filters.month = month;
                    self.start_generation();
                }
            }
            ReportAction::GroupLoaded { generation, group } => {
                if self.is_current(generation) {
                    let kind = group.kind();
                    self.snapshot.apply(group);
                    self.pending.retain(|k| *k != kind);
                }
            }
            ReportAction::GroupFailed { generation, kind } => {
                if self.is_current(generation) {
                    self.snapshot.reset(kind);
                    self.pending.retain(|k| *k != kind);
                }
            }
            ReportAction::ExportStarted => {
                self.export = ExportStatus::InProgress;
            }
            ReportAction::ExportFailed { message } => {
                self.export = ExportStatus::Failed { message };
            }
            ReportAction::ExportFinished => {
                self.export = ExportStatus::Idle;
            }
        }
        self
    }

    fn start_generation(&mut self) {
        self.generation += 1;
        self.pending = MetricGroupKind::ALL.to_vec();
    }
}
