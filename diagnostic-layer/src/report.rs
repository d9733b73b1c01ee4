//! Report Store (§4.8) and the Layer API's report lifecycle (§6).
//!
//! A [`Report`] is a recording session: it accumulates deduplicated messages, periodic
//! "step" snapshots, and the compiler commits that must retire before a command buffer
//! may be instrumented under it (§4.7 "Begin"). [`ReportStore`] owns the handle arena and
//! the report-lock the rest of the layer synchronizes its report-mutating operations
//! through (§5, lock #6).

use crate::arena::{Arena, Handle};
use crate::message::{FeatureMask, Sguid};
use crate::worker_pool::Commit;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// `{Idle, Recording, Processing}` from the Layer API's `get_report_status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportStatus {
    Idle,
    Recording,
    Processing,
}

/// Feature bits enabled for one report, mirroring the Layer API's begin-info.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportBeginInfo {
    pub features: FeatureMask,
    pub step_interval: Option<Duration>,
}

/// One deduplicated finding: a message code, the source-location SGUID it was attributed
/// to, and a human-readable string reference. The dedup map (§4.8) coalesces repeats of
/// the same `(message_code, sguid)` pair and counts them rather than storing duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct DedupKey {
    message_code: u32,
    sguid: Sguid,
}

#[derive(Clone, Debug)]
pub struct ReportedMessage {
    pub message_code: u32,
    pub sguid: Sguid,
    pub string_ref: String,
    pub count: u32,
}

/// Per-interval error-count bucket plus the latent compiler commits in flight when the
/// snapshot was taken (§3 "Report" / "steps").
#[derive(Clone, Debug, Default)]
pub struct ReportStep {
    pub error_counts: HashMap<u32, u64>,
    pub latent_undershoots: u64,
    pub latent_overshoots: u64,
    pub shader_compiler_commit: Commit,
    pub pipeline_compiler_commit: Commit,
}

/// A recording session: begin-info, accumulated elapsed time, ordered messages, and
/// time-series steps.
pub struct Report {
    pub begin_info: ReportBeginInfo,
    dedup: HashMap<DedupKey, usize>,
    messages: Vec<ReportedMessage>,
    steps: Vec<ReportStep>,
    ended: bool,
    time_begin: Option<Instant>,
    last_step_at: Option<Instant>,
    last_stepped_undershoots: u64,
    last_stepped_overshoots: u64,
    accumulated_elapsed: Duration,
    /// Exported/filtered/received counters for the "message count conservation"
    /// property (§8.4): `exported + filtered + latent_undershoots + latent_overshoots
    /// == received`.
    exported: u64,
    filtered: u64,
    received: u64,
    latent_undershoots: u64,
    latent_overshoots: u64,
    /// Shader/pipeline compiler commits captured at `begin`; a command buffer may only
    /// be instrumented once both compilers have caught up to these (§4.7 "Begin").
    pub captured_shader_commit: Commit,
    pub captured_pipeline_commit: Commit,
}

impl Report {
    fn new(begin_info: ReportBeginInfo) -> Self {
        Report {
            begin_info,
            dedup: HashMap::new(),
            messages: Vec::new(),
            steps: Vec::new(),
            ended: false,
            time_begin: None,
            last_step_at: None,
            last_stepped_undershoots: 0,
            last_stepped_overshoots: 0,
            accumulated_elapsed: Duration::ZERO,
            exported: 0,
            filtered: 0,
            received: 0,
            latent_undershoots: 0,
            latent_overshoots: 0,
            captured_shader_commit: 0,
            captured_pipeline_commit: 0,
        }
    }

    pub fn status(&self) -> ReportStatus {
        if self.time_begin.is_none() {
            ReportStatus::Idle
        } else if self.ended {
            ReportStatus::Processing
        } else {
            ReportStatus::Recording
        }
    }

    fn begin(&mut self, now: Instant, shader_commit: Commit, pipeline_commit: Commit) {
        self.time_begin = Some(now);
        self.last_step_at = Some(now);
        self.ended = false;
        self.captured_shader_commit = shader_commit;
        self.captured_pipeline_commit = pipeline_commit;
    }

    fn end(&mut self, now: Instant) {
        if let Some(begin) = self.time_begin {
            self.accumulated_elapsed += now.saturating_duration_since(begin);
        }
        self.ended = true;
    }

    /// Records one GPU-observed message, coalescing by `(message_code, sguid)`. Rejected
    /// once the report has ended (§4.8 "Adding a report after end is rejected").
    pub fn add_message(&mut self, message_code: u32, sguid: Sguid, string_ref: String) -> bool {
        if self.ended {
            return false;
        }
        self.received += 1;
        let key = DedupKey { message_code, sguid };
        if let Some(&index) = self.dedup.get(&key) {
            self.messages[index].count += 1;
            self.filtered += 1;
        } else {
            self.dedup.insert(key, self.messages.len());
            self.messages.push(ReportedMessage {
                message_code,
                sguid,
                string_ref,
                count: 1,
            });
            self.exported += 1;
        }
        true
    }

    /// Records a latent undershoot/overshoot observed by the allocator's filter worker,
    /// counted toward the message-count-conservation invariant (§8.4).
    pub fn record_latent(&mut self, undershoots: u64, overshoots: u64) {
        self.latent_undershoots += undershoots;
        self.latent_overshoots += overshoots;
        self.received += undershoots + overshoots;
    }

    /// Snapshots rolling error-type counts and latent under/overshoots if at least
    /// `step_interval` has elapsed since the last step. No-op otherwise.
    pub fn maybe_step(&mut self, now: Instant, default_interval: Duration) {
        let interval = self.begin_info.step_interval.unwrap_or(default_interval);
        let due = match self.last_step_at {
            Some(last) => now.saturating_duration_since(last) >= interval,
            None => true,
        };
        if !due {
            return;
        }
        self.last_step_at = Some(now);
        let mut error_counts: HashMap<u32, u64> = HashMap::new();
        for message in &self.messages {
            *error_counts.entry(message.message_code).or_insert(0) += message.count as u64;
        }
        self.steps.push(ReportStep {
            error_counts,
            latent_undershoots: self.latent_undershoots - self.last_stepped_undershoots,
            latent_overshoots: self.latent_overshoots - self.last_stepped_overshoots,
            shader_compiler_commit: self.captured_shader_commit,
            pipeline_compiler_commit: self.captured_pipeline_commit,
        });
        self.last_stepped_undershoots = self.latent_undershoots;
        self.last_stepped_overshoots = self.latent_overshoots;
    }

    /// Clears accumulated messages but preserves steps (§4.8 "flush clears messages but
    /// preserves steps").
    pub fn flush(&mut self) {
        self.messages.clear();
        self.dedup.clear();
    }

    pub fn messages(&self) -> &[ReportedMessage] {
        &self.messages
    }

    pub fn steps(&self) -> &[ReportStep] {
        &self.steps
    }

    /// `exported + filtered + latent_undershoots + latent_overshoots == received`
    /// (§8.4 message-count conservation).
    pub fn counters(&self) -> ReportCounters {
        ReportCounters {
            exported: self.exported,
            filtered: self.filtered,
            received: self.received,
            latent_undershoots: self.latent_undershoots,
            latent_overshoots: self.latent_overshoots,
        }
    }

    pub fn accumulated_elapsed(&self) -> Duration {
        self.accumulated_elapsed
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportCounters {
    pub exported: u64,
    pub filtered: u64,
    pub received: u64,
    pub latent_undershoots: u64,
    pub latent_overshoots: u64,
}

impl ReportCounters {
    /// The §8.4 conservation check, exposed for tests to assert against directly.
    pub fn is_conserved(&self) -> bool {
        self.exported + self.filtered + self.latent_undershoots + self.latent_overshoots
            == self.received
    }
}

pub type ReportHandle = Handle<Report>;

/// Export format accepted by `export_report`. HTML/CSV formatting itself is the
/// excluded collaborator named in §1; this enum is the seam the layer API exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Html,
}

/// Owns the report handle arena and the single report-lock (§5, lock ordering position
/// 6) that every report-mutating operation acquires.
#[derive(Default)]
pub struct ReportStore {
    arena: parking_lot::Mutex<Arena<Report>>,
}

impl ReportStore {
    pub fn new() -> Self {
        ReportStore::default()
    }

    pub fn create_report(&self, begin_info: ReportBeginInfo) -> ReportHandle {
        self.arena.lock().insert(Report::new(begin_info))
    }

    pub fn destroy_report(&self, handle: ReportHandle) {
        self.arena.lock().release(handle);
    }

    pub fn begin_report(
        &self,
        handle: ReportHandle,
        now: Instant,
        shader_commit: Commit,
        pipeline_commit: Commit,
    ) {
        if let Some(report) = self.arena.lock().get_mut(handle) {
            report.begin(now, shader_commit, pipeline_commit);
        }
    }

    pub fn end_report(&self, handle: ReportHandle, now: Instant) {
        if let Some(report) = self.arena.lock().get_mut(handle) {
            report.end(now);
        }
    }

    pub fn status(&self, handle: ReportHandle) -> Option<ReportStatus> {
        self.arena.lock().get(handle).map(Report::status)
    }

    /// Runs `f` against the report under the report-lock, for callers that need to chain
    /// several report operations atomically (e.g. command-buffer "Begin": check status
    /// and captured commits in one critical section).
    pub fn with_report<R>(&self, handle: ReportHandle, f: impl FnOnce(&Report) -> R) -> Option<R> {
        self.arena.lock().get(handle).map(f)
    }

    pub fn with_report_mut<R>(
        &self,
        handle: ReportHandle,
        f: impl FnOnce(&mut Report) -> R,
    ) -> Option<R> {
        self.arena.lock().get_mut(handle).map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_message_after_end_is_rejected() {
        let mut report = Report::new(ReportBeginInfo::default());
        let now = Instant::now();
        report.begin(now, 0, 0);
        assert!(report.add_message(1, 10, "oob write".into()));
        report.end(now);
        assert!(!report.add_message(1, 10, "oob write".into()));
    }

    #[test]
    fn dedup_coalesces_repeated_key() {
        let mut report = Report::new(ReportBeginInfo::default());
        report.begin(Instant::now(), 0, 0);
        report.add_message(1, 10, "a".into());
        report.add_message(1, 10, "a".into());
        report.add_message(2, 10, "b".into());
        assert_eq!(report.messages().len(), 2);
        assert_eq!(report.messages()[0].count, 2);
    }

    #[test]
    fn flush_clears_messages_but_preserves_steps() {
        let mut report = Report::new(ReportBeginInfo::default());
        let now = Instant::now();
        report.begin(now, 0, 0);
        report.add_message(1, 10, "a".into());
        report.maybe_step(now, Duration::from_millis(1));
        assert_eq!(report.steps().len(), 1);
        report.flush();
        assert!(report.messages().is_empty());
        assert_eq!(report.steps().len(), 1);
    }

    #[test]
    fn counters_conserve_across_messages_and_latent_events() {
        let mut report = Report::new(ReportBeginInfo::default());
        report.begin(Instant::now(), 0, 0);
        report.add_message(1, 10, "a".into());
        report.add_message(1, 10, "a".into());
        report.record_latent(2, 3);
        assert!(report.counters().is_conserved());
    }
}
