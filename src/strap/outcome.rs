// Anything other than Ok means the payload carries no data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Ok,
    Busy,
    Timeout,
    LinkError,
    ServiceUnavailable,
}
