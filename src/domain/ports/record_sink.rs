//! Append-only sinks for decision and error records.

use crate::domain::errors::DomainResult;

/// Ordered, append-only record log owned by a single agent.
pub trait RecordSink<R>: Send {
    /// Append one record. Persisting implementations make the whole log
    /// durable before returning.
    fn append(&mut self, record: R) -> DomainResult<()>;

    /// Number of records appended so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory sink used by tests and dry runs.
#[derive(Debug, Clone)]
pub struct MemorySink<R> {
    records: Vec<R>,
}

impl<R> MemorySink<R> {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }
}

impl<R> Default for MemorySink<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send> RecordSink<R> for MemorySink<R> {
    fn append(&mut self, record: R) -> DomainResult<()> {
        self.records.push(record);
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Sink shared behind a mutex so a test can inspect what an agent wrote.
impl<R: Send, S: RecordSink<R>> RecordSink<R> for std::sync::Arc<std::sync::Mutex<S>> {
    fn append(&mut self, record: R) -> DomainResult<()> {
        self.lock()
            .map_err(|e| crate::domain::errors::DomainError::Persistence(e.to_string()))?
            .append(record)
    }

    fn len(&self) -> usize {
        self.lock().map(|sink| sink.len()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_appends_in_order() {
        let mut sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.append(1).unwrap();
        sink.append(2).unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.records(), &[1, 2]);
    }
}
