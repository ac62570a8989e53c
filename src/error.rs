use thiserror::Error;

/// Fatal errors. Everything else that can go wrong during a conversion is
/// recorded in the run summary and recovery continues with the next record,
/// page or segment.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("capture file ended in the middle of a {0}")]
    TruncatedCapture(&'static str),
}

/// A fixed-layout record whose byte length didn't match its layout
/// descriptor. Non-fatal: the containing segment is abandoned.
#[derive(Debug, Error)]
#[error("expected {expected} bytes for layout {layout:?}, got {actual}")]
pub struct MalformedRecord {
    pub layout: &'static str,
    pub expected: usize,
    pub actual: usize,
}
