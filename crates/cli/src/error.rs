#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    General(String),

    #[error("Tool `{0}` is not configured\nRun `list` to see configured tools")]
    UnknownTool(String),

    #[error("{failed} of {total} tools failed")]
    SomeFailed { failed: usize, total: usize },
}
