use thiserror::Error;

/// Infrastructure failure tagged with the operation that was underway.
///
/// Storage and transport errors are never translated into chat replies;
/// they bubble up to the poll loop as one of these.
#[derive(Debug, Error)]
#[error("can't {op}: {source}")]
pub struct OpError {
    op: &'static str,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl OpError {
    pub fn wrap(
        op: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            op,
            source: source.into(),
        }
    }

    pub fn op(&self) -> &'static str {
        self.op
    }
}
