use crate::state::StatsSnapshot;
use crate::ReportError;

/// Durable storage for crawl statistics
///
/// `persist` receives a read-only snapshot and must not assume it is the
/// final one: the coordinator calls it periodically during the crawl and
/// once more at the end, and each call replaces the previous picture of
/// the run. The final snapshot therefore always reflects however far the
/// crawl got, even if the process is interrupted afterwards.
pub trait ReportSink: Send {
    /// Persists one snapshot of the crawl
    fn persist(&mut self, snapshot: &StatsSnapshot) -> Result<(), ReportError>;
}
