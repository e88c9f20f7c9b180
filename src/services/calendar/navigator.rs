//! Visible month window: paging and scroll extension.
//!
//! The window is an ordered run of first-of-month dates. Single-step paging
//! keeps its length; scroll extension appends in batches up to
//! `max_months`. Forward movement never passes the horizon, which is
//! recomputed from the clock every time it is checked.

use chrono::NaiveDate;

use crate::models::settings::EditorSettings;
use crate::utils::clock::Clock;
use crate::utils::date::{add_months, first_of_month};

/// Paging direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthDirection {
    Previous,
    Next,
}

/// Which call site owns the navigator; decides the horizon and whether
/// scroll extension is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorKind {
    /// Paged month picker of the poll creation flow
    CreationFlow,
    /// Desktop calendar that grows as the user scrolls
    InfiniteScroll,
}

/// Scroll position of the month list, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f32,
    pub viewport: f32,
    pub content: f32,
}

impl ScrollMetrics {
    /// Distance between the bottom of the viewport and the trailing edge.
    pub fn distance_to_end(&self) -> f32 {
        (self.content - (self.offset + self.viewport)).max(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct CalendarNavigator {
    kind: NavigatorKind,
    months: Vec<NaiveDate>,
    horizon_years: u32,
    max_months: usize,
    extend_threshold_px: f32,
    extend_batch: usize,
}

impl CalendarNavigator {
    /// Paged navigator capped at `creation_horizon_years` from today.
    pub fn creation_flow(start: NaiveDate, visible: usize, settings: &EditorSettings) -> Self {
        Self::build(
            NavigatorKind::CreationFlow,
            start,
            visible,
            settings.creation_horizon_years,
            settings,
        )
    }

    /// Scroll-extended navigator capped at `scroll_horizon_years` from today.
    pub fn infinite_scroll(start: NaiveDate, visible: usize, settings: &EditorSettings) -> Self {
        Self::build(
            NavigatorKind::InfiniteScroll,
            start,
            visible,
            settings.scroll_horizon_years,
            settings,
        )
    }

    fn build(
        kind: NavigatorKind,
        start: NaiveDate,
        visible: usize,
        horizon_years: u32,
        settings: &EditorSettings,
    ) -> Self {
        let first = first_of_month(start);
        let count = visible.min(settings.max_visible_months);
        let months = (0..count as i32).map(|offset| add_months(first, offset)).collect();
        Self {
            kind,
            months,
            horizon_years,
            max_months: settings.max_visible_months,
            extend_threshold_px: settings.scroll_extend_threshold_px,
            extend_batch: settings.scroll_extend_batch,
        }
    }

    pub fn kind(&self) -> NavigatorKind {
        self.kind
    }

    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    pub fn first_month(&self) -> Option<NaiveDate> {
        self.months.first().copied()
    }

    pub fn last_month(&self) -> Option<NaiveDate> {
        self.months.last().copied()
    }

    /// Latest month reachable from `today`.
    pub fn horizon(&self, today: NaiveDate) -> NaiveDate {
        add_months(today, self.horizon_years as i32 * 12)
    }

    /// Whether `month` lies on or before the horizon computed from `today`.
    pub fn within_horizon(&self, month: NaiveDate, today: NaiveDate) -> bool {
        first_of_month(month) <= self.horizon(today)
    }

    /// Prepend the month before the window and drop the last one.
    pub fn shift_prev(&mut self) -> bool {
        let Some(first) = self.first_month() else {
            return false;
        };
        self.months.insert(0, add_months(first, -1));
        self.months.pop();
        true
    }

    /// Append the month after the window and drop the first one, unless that
    /// month lies beyond the horizon.
    pub fn shift_next(&mut self, clock: &impl Clock) -> bool {
        let Some(last) = self.last_month() else {
            return false;
        };
        let next = add_months(last, 1);
        if !self.within_horizon(next, clock.today()) {
            log::debug!("Refusing to page past horizon: {}", next);
            return false;
        }
        self.months.push(next);
        self.months.remove(0);
        true
    }

    /// Page one month in `direction`.
    pub fn shift(&mut self, direction: MonthDirection, clock: &impl Clock) -> bool {
        match direction {
            MonthDirection::Previous => self.shift_prev(),
            MonthDirection::Next => self.shift_next(clock),
        }
    }

    /// Grow the window when the scroll position nears its trailing edge.
    ///
    /// Appends up to `scroll_extend_batch` months, each checked against the
    /// horizon as of the moment it is appended. Returns the number appended.
    pub fn extend_on_scroll(&mut self, metrics: ScrollMetrics, clock: &impl Clock) -> usize {
        if self.kind != NavigatorKind::InfiniteScroll {
            return 0;
        }
        if metrics.distance_to_end() > self.extend_threshold_px
            || self.months.len() >= self.max_months
        {
            return 0;
        }
        let Some(mut last) = self.last_month() else {
            return 0;
        };

        let mut appended = 0;
        while appended < self.extend_batch && self.months.len() < self.max_months {
            let next = add_months(last, 1);
            if !self.within_horizon(next, clock.today()) {
                break;
            }
            self.months.push(next);
            last = next;
            appended += 1;
        }

        if appended > 0 {
            log::debug!(
                "Extended visible months by {} (window now {})",
                appended,
                self.months.len()
            );
        }
        appended
    }
}
