use std::future::Future;

use tracing::warn;

use crate::errors::ClientError;

/// How an optimistic action settled.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The remote write succeeded; the speculative state stands.
    Committed,
    /// The remote write failed and local state was replaced by the resync.
    Resynced { cause: ClientError },
}

impl SyncOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, SyncOutcome::Committed)
    }
}

/// Apply `transition` to `state` right away, then await `write`.
///
/// When the write fails, `resync` is awaited and its value replaces `state`.
/// If the resync fails too, the speculative state is left in place and
/// `ClientError::ResyncFailed` is returned.
pub async fn apply_optimistic<S, T, W, R, RFut>(
    action: &str,
    state: &mut S,
    transition: impl FnOnce(&mut S),
    write: W,
    resync: R,
) -> Result<SyncOutcome, ClientError>
where
    W: Future<Output = Result<T, ClientError>>,
    R: FnOnce() -> RFut,
    RFut: Future<Output = Result<S, ClientError>>,
{
    transition(state);

    let cause = match write.await {
        Ok(_) => return Ok(SyncOutcome::Committed),
        Err(cause) => cause,
    };
    warn!(action, error = %cause, "remote write failed, resynchronising");

    match resync().await {
        Ok(authoritative) => {
            *state = authoritative;
            Ok(SyncOutcome::Resynced { cause })
        }
        Err(source) => {
            warn!(action, error = %source, "resynchronisation failed");
            Err(ClientError::ResyncFailed {
                cause: Box::new(cause),
                source: Box::new(source),
            })
        }
    }
}
