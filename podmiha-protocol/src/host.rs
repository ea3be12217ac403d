//! Host-side interpretation of device reports
//!
//! The device repeats its full request state every send period, so the host
//! reacts to *changes* between consecutive reports rather than to values:
//! a flipped toggle request means "toggle that device", a moved counter means
//! "perform that action once". Lost or duplicated increments are tolerated.

use crate::messages::DeviceReport;

/// Actions the host should take after a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostActions {
    /// Camera toggle request changed
    pub toggle_camera: bool,
    /// Microphone toggle request changed
    pub toggle_microphone: bool,
    /// Plus counter moved
    pub send_plus: bool,
    /// Minus counter moved
    pub send_minus: bool,
    /// Screenshot counter moved
    pub send_screenshot: bool,
}

impl HostActions {
    /// True if nothing changed
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Tracks the previous report and diffs new ones against it
///
/// The baseline before the first report is all-zero, so a device that
/// already has non-zero counters at connect time triggers one action each.
#[derive(Debug, Clone, Default)]
pub struct ReportTracker {
    last: DeviceReport,
}

impl ReportTracker {
    /// Create a tracker with an all-zero baseline
    pub fn new() -> Self {
        Self::default()
    }

    /// Last report seen
    pub fn last(&self) -> &DeviceReport {
        &self.last
    }

    /// Record a report and return the actions it implies
    pub fn update(&mut self, report: DeviceReport) -> HostActions {
        let actions = HostActions {
            toggle_camera: report.camera_requested != self.last.camera_requested,
            toggle_microphone: report.microphone_requested != self.last.microphone_requested,
            send_plus: report.plus != self.last.plus,
            send_minus: report.minus != self.last.minus,
            send_screenshot: report.screenshot != self.last.screenshot,
        };
        self.last = report;
        actions
    }
}
