//! Task completion with at-most-once payout

use crate::session::Session;
use earnin_core::{LedgerKind, Result, TaskCategory, TaskDefinition, TaskOutcome};
use earnin_persistence::sqlite;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Page-open time for visit tasks that don't set their own timer
pub const DEFAULT_VISIT_SECS: u64 = 10;
const SOCIAL_WAIT_SECS: u64 = 5;
const WEB_DOWNLOAD_WAIT_SECS: u64 = 5;
const APK_DOWNLOAD_WAIT_SECS: u64 = 8;

/// Whether `task_id` is in the completed set. Exact match, no normalisation.
pub fn is_task_completed(completed: &BTreeSet<String>, task_id: &str) -> bool {
    completed.contains(task_id)
}

/// How long the task has to be left open before it is paid
pub fn verification_wait(category: TaskCategory, task: &TaskDefinition) -> Duration {
    let secs = match category {
        TaskCategory::Visit => task.timer.unwrap_or(DEFAULT_VISIT_SECS),
        TaskCategory::Social => SOCIAL_WAIT_SECS,
        TaskCategory::Download if task.is_web => WEB_DOWNLOAD_WAIT_SECS,
        TaskCategory::Download => APK_DOWNLOAD_WAIT_SECS,
    };
    Duration::from_secs(secs)
}

/// Pay `reward` for `task_id` once per account.
///
/// Returns `None` if the id was already recorded; nothing is credited then.
pub async fn complete_once(
    session: &Session,
    task_id: &str,
    reward: f64,
    kind: LedgerKind,
    description: &str,
) -> Result<Option<f64>> {
    let update = sqlite::complete_task_once(
        session.db().pool(),
        session.account_id(),
        task_id,
        reward,
        kind,
        description,
    )
    .await?;

    Ok(update.map(|u| u.new_balance))
}

/// Submit a published task for payout
#[instrument(skip(session, task), fields(account = %session.account_id(), task = %task.task_id()))]
pub async fn complete_task(
    session: &Session,
    category: TaskCategory,
    task: &TaskDefinition,
) -> Result<TaskOutcome> {
    let account = session.active_account().await?;

    if task.is_coming_soon {
        return Ok(TaskOutcome::Unavailable);
    }
    if !(task.reward > 0.0) {
        debug!("Zero-reward {:?} task acknowledged", category);
        return Ok(TaskOutcome::Acknowledged);
    }
    if is_task_completed(&account.completed_task_ids, task.task_id()) {
        return Ok(TaskOutcome::AlreadyCompleted);
    }

    // The stored set is authoritative; another session may have won
    match complete_once(session, task.task_id(), task.reward, LedgerKind::TaskComplete, &task.name).await? {
        Some(new_balance) => {
            info!("Task paid {:.2}", task.reward);
            Ok(TaskOutcome::Credited {
                amount: task.reward,
                new_balance,
            })
        }
        None => Ok(TaskOutcome::AlreadyCompleted),
    }
}

/// Wait out the task's verification time, then submit it
pub async fn complete_task_after_wait(
    session: &Session,
    category: TaskCategory,
    task: &TaskDefinition,
) -> Result<TaskOutcome> {
    tokio::time::sleep(verification_wait(category, task)).await;
    complete_task(session, category, task).await
}
