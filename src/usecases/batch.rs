//! Helpers shared by the push jobs.

use crate::ports::MessengerPort;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Delivery counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub sent: usize,
    pub failed: usize,
}

/// Sorted, de-duplicated union of user id lists.
pub fn union_user_ids<I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    lists
        .into_iter()
        .flatten()
        .filter(|id| !id.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Push one text. A failed push is logged and counted; the batch continues.
pub async fn push_counted(
    messenger: &dyn MessengerPort,
    user_id: &str,
    text: &str,
    job: &'static str,
    stats: &mut BatchStats,
) {
    match messenger.push_text(user_id, text).await {
        Ok(()) => {
            stats.sent += 1;
            info!(user_id, job, "push sent");
        }
        Err(e) => {
            stats.failed += 1;
            warn!(user_id, job, error = %e, "push failed");
        }
    }
}

pub(crate) fn log_batch(job: &'static str, stats: BatchStats) -> BatchStats {
    info!(job, sent = stats.sent, failed = stats.failed, "batch complete");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_sorts_and_dedups() {
        let ids = union_user_ids([
            vec!["U2".to_string(), "U1".to_string()],
            vec!["U1".to_string(), " ".to_string(), "U3".to_string()],
        ]);
        assert_eq!(ids, vec!["U1", "U2", "U3"]);
    }
}
