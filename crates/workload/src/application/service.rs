use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use sort_churn_model::Direction;

use super::ports::{Clock, ObjectLocation, ObjectReader, ObjectStore, Progress, TabularCodec};

/// What one read, sort and write cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub direction: Direction,
    pub rows: usize,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    /// Direction the next cycle would have used.
    pub final_direction: Direction,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

impl RunSummary {
    fn record(&mut self, cycle: &CycleReport) {
        self.cycles += 1;
        self.bytes_read += cycle.bytes_read;
        self.bytes_written += cycle.bytes_written;
    }
}

/// Drives the timed read, sort and write loop.
///
/// It is generic over its ports, so the store, the codec and the clock are
/// injected by the caller.
pub struct WorkloadService<S, C, K> {
    store: S,
    codec: C,
    clock: K,
    sort_column: usize,
}

impl<S, C, K> WorkloadService<S, C, K>
where
    S: ObjectStore,
    C: TabularCodec,
    K: Clock,
{
    /// Creates a service sorting by the first column.
    pub fn new(store: S, codec: C, clock: K) -> Self {
        Self {
            store,
            codec,
            clock,
            sort_column: 0,
        }
    }

    pub fn with_sort_column(mut self, sort_column: usize) -> Self {
        self.sort_column = sort_column;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs cycles until `duration` has elapsed, flipping the sort direction
    /// after each one.
    ///
    /// The deadline is only checked between cycles, so a cycle that starts
    /// before it always runs to completion. The first error aborts the run.
    pub async fn run(
        &self,
        duration: Duration,
        source: &ObjectLocation,
        target: &ObjectLocation,
        progress: &mut impl Progress,
    ) -> anyhow::Result<RunSummary> {
        let started = self.clock.now();
        // An unrepresentable deadline never arrives.
        let deadline = started.checked_add(duration);
        let mut direction = Direction::Ascending;
        let mut summary = RunSummary::default();

        tracing::info!(
            %source,
            %target,
            ?duration,
            sort_column = self.sort_column,
            "Starting workload"
        );
        progress.running();

        loop {
            progress.tick();
            if deadline.is_some_and(|deadline| self.clock.now() >= deadline) {
                break;
            }

            let cycle = self
                .cycle(source, target, direction)
                .await
                .with_context(|| format!("cycle {} failed", summary.cycles + 1))?;
            summary.record(&cycle);
            direction = direction.flipped();
        }

        summary.final_direction = direction;
        summary.elapsed = self.clock.now().saturating_duration_since(started);

        tracing::info!(
            cycles = summary.cycles,
            bytes_read = summary.bytes_read,
            bytes_written = summary.bytes_written,
            elapsed = ?summary.elapsed,
            "Workload finished"
        );
        progress.finished(&summary);
        Ok(summary)
    }

    /// Performs a single fetch, sort and store.
    pub async fn cycle(
        &self,
        source: &ObjectLocation,
        target: &ObjectLocation,
        direction: Direction,
    ) -> anyhow::Result<CycleReport> {
        let fetched = {
            let mut reader = self
                .store
                .get(source)
                .await
                .with_context(|| format!("cannot fetch {source}"))?;
            reader
                .read_all()
                .await
                .with_context(|| format!("cannot read {source}"))?
        };

        let dataset = self
            .codec
            .decode(&fetched)
            .with_context(|| format!("cannot parse {source}"))?;
        let sorted = dataset.sorted_by_column(self.sort_column, direction)?;
        let encoded = Bytes::from(self.codec.encode(&sorted)?);

        let length = encoded.len() as u64;
        self.store
            .put(target, encoded, length)
            .await
            .with_context(|| format!("cannot store {target}"))?;

        let report = CycleReport {
            direction,
            rows: sorted.len(),
            bytes_read: fetched.len() as u64,
            bytes_written: length,
        };
        tracing::debug!(
            %direction,
            rows = report.rows,
            bytes_read = report.bytes_read,
            bytes_written = report.bytes_written,
            "Cycle complete"
        );
        Ok(report)
    }
}
