use crate::map::{MapRenderer, StateShape, SHADE_BUCKETS};
use crate::states::StateNames;
use crate::stats::{self, DailyRecord, DateRange, Metric, PopulationRecord, StateAggregate};
use chrono::Days;
use std::collections::HashMap;

/// How many states the ranked bar charts show
pub const RANK_LIMIT: usize = 10;

/// Date-range endpoint step for the bracket keys, in days
pub const RANGE_STEP_DAYS: u64 = 7;

/// Application state: loaded datasets, the current selection, and everything
/// derived from it. Aggregates are fully recomputed on every selection change;
/// there is no incremental update.
pub struct App {
    records: Vec<DailyRecord>,
    populations: Vec<PopulationRecord>,
    names: StateNames,
    pub map_renderer: MapRenderer,

    /// Currently selected ranking metric
    pub metric: Metric,
    /// Optional inclusive date filter; None = all records
    pub date_range: Option<DateRange>,
    /// Min/max submission dates present in the data
    data_bounds: Option<DateRange>,

    /// One aggregate per state seen in the filtered records
    pub aggregates: Vec<StateAggregate>,
    pub top_ten: Vec<StateAggregate>,
    pub bottom_ten: Vec<StateAggregate>,
    /// Fill bucket per state name for the choropleth
    shades: HashMap<String, u8>,
    /// Largest finite value of the selected metric (legend upper bound)
    pub max_value: f64,

    /// Current mouse position for the hover detail panel
    pub mouse_pos: Option<(u16, u16)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        records: Vec<DailyRecord>,
        populations: Vec<PopulationRecord>,
        shapes: Vec<StateShape>,
    ) -> Self {
        let map_renderer = MapRenderer::new(shapes);

        let data_bounds = match (
            records.iter().map(|r| r.submission_date).min(),
            records.iter().map(|r| r.submission_date).max(),
        ) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        };

        let mut app = Self {
            records,
            populations,
            names: StateNames::new(),
            map_renderer,
            metric: Metric::AbsCases,
            date_range: None,
            data_bounds,
            aggregates: Vec::new(),
            top_ten: Vec::new(),
            bottom_ten: Vec::new(),
            shades: HashMap::new(),
            max_value: 0.0,
            mouse_pos: None,
            should_quit: false,
        };
        app.recompute();
        app
    }

    /// Recompute all derived data from the current selection.
    fn recompute(&mut self) {
        let aggregates = stats::aggregate(
            &self.records,
            &self.populations,
            self.date_range,
            |code| self.names.full_name(code),
        );

        self.top_ten =
            stats::rank_and_select(aggregates.clone(), self.metric, true, RANK_LIMIT);
        self.bottom_ten =
            stats::rank_and_select(aggregates.clone(), self.metric, false, RANK_LIMIT);

        self.max_value = aggregates
            .iter()
            .map(|a| self.metric.value_of(a))
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        self.shades = aggregates
            .iter()
            .map(|a| (a.state.clone(), self.shade_bucket(self.metric.value_of(a))))
            .collect();

        self.aggregates = aggregates;
    }

    /// Bucket a metric value into 1..=SHADE_BUCKETS relative to the max.
    /// Non-finite values (zero-population states) land in the lowest bucket.
    fn shade_bucket(&self, value: f64) -> u8 {
        if !value.is_finite() || self.max_value <= 0.0 {
            return 1;
        }
        let t = (value / self.max_value).clamp(0.0, 1.0);
        1 + (t * (SHADE_BUCKETS - 1) as f64).round() as u8
    }

    /// Fill bucket for a state name (0 = no data, leave unfilled)
    pub fn shade_for(&self, state: &str) -> u8 {
        self.shades.get(state).copied().unwrap_or(0)
    }

    pub fn aggregate_for(&self, state: &str) -> Option<&StateAggregate> {
        self.aggregates.iter().find(|a| a.state == state)
    }

    pub fn postal_code(&self, full_name: &str) -> Option<&'static str> {
        self.names.postal_code(full_name)
    }

    pub fn set_metric(&mut self, metric: Metric) {
        if self.metric != metric {
            self.metric = metric;
            self.recompute();
        }
    }

    pub fn next_metric(&mut self) {
        self.metric = self.metric.next();
        self.recompute();
    }

    pub fn prev_metric(&mut self) {
        self.metric = self.metric.prev();
        self.recompute();
    }

    /// Toggle the date filter; enabling starts from the full data range.
    pub fn toggle_filter(&mut self) {
        self.date_range = match self.date_range {
            Some(_) => None,
            None => self.data_bounds,
        };
        self.recompute();
    }

    pub fn clear_filter(&mut self) {
        if self.date_range.is_some() {
            self.date_range = None;
            self.recompute();
        }
    }

    /// Move the range start by one step, clamped to the data bounds and the
    /// range end. No-op while the filter is off.
    pub fn step_start(&mut self, forward: bool) {
        let (Some((start, end)), Some((data_min, _))) = (self.date_range, self.data_bounds)
        else {
            return;
        };
        let stepped = if forward {
            start
                .checked_add_days(Days::new(RANGE_STEP_DAYS))
                .unwrap_or(start)
                .min(end)
        } else {
            start
                .checked_sub_days(Days::new(RANGE_STEP_DAYS))
                .unwrap_or(start)
                .max(data_min)
        };
        self.date_range = Some((stepped, end));
        self.recompute();
    }

    /// Move the range end by one step, clamped to the range start and the
    /// data bounds. No-op while the filter is off.
    pub fn step_end(&mut self, forward: bool) {
        let (Some((start, end)), Some((_, data_max))) = (self.date_range, self.data_bounds)
        else {
            return;
        };
        let stepped = if forward {
            end.checked_add_days(Days::new(RANGE_STEP_DAYS))
                .unwrap_or(end)
                .min(data_max)
        } else {
            end.checked_sub_days(Days::new(RANGE_STEP_DAYS))
                .unwrap_or(end)
                .max(start)
        };
        self.date_range = Some((start, stepped));
        self.recompute();
    }

    /// Reset selection to its initial state (all dates, absolute cases)
    pub fn reset(&mut self) {
        self.metric = Metric::AbsCases;
        self.date_range = None;
        self.recompute();
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Status bar description of the active date filter
    pub fn range_label(&self) -> String {
        match self.date_range {
            Some((start, end)) => format!(
                "{} - {}",
                start.format("%m/%d/%Y"),
                end.format("%m/%d/%Y")
            ),
            None => "all dates".to_string(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
