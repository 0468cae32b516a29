//! Activity log and rewind (site restore) state, keyed by site id
//!
//! The slice is a combination of independent sub-reducers, one per field.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::action::Intent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogItem {
    pub activity_id: String,
    pub name: String,
    pub summary: String,
    pub published: DateTime<FixedOffset>,
    #[serde(default)]
    pub actor: Option<String>,
    /// Point the site can be restored to, when rewindable
    #[serde(default)]
    pub rewind_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewindState {
    Unavailable,
    Inactive,
    Provisioning,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewindStatus {
    pub state: RewindState,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreStatus {
    Queued,
    Running,
    Finished,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreProgress {
    pub rewind_id: String,
    pub status: RestoreStatus,
    pub percent: u8,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityLogState {
    pub activation_requesting: BTreeMap<u64, bool>,
    pub log_items: BTreeMap<u64, Vec<ActivityLogItem>>,
    pub restore_progress: BTreeMap<u64, RestoreProgress>,
    /// Restore point awaiting confirmation
    pub restore_request: BTreeMap<u64, String>,
    /// Backup point awaiting confirmation
    pub backup_request: BTreeMap<u64, String>,
    pub rewind_status: BTreeMap<u64, RewindStatus>,
    pub rewind_status_error: BTreeMap<u64, String>,
}

pub fn reduce(state: &mut ActivityLogState, intent: &Intent) -> bool {
    // Every sub-reducer sees every intent
    let changes = [
        activation_requesting(&mut state.activation_requesting, intent),
        log_items(&mut state.log_items, intent),
        restore_progress(&mut state.restore_progress, intent),
        restore_request(&mut state.restore_request, intent),
        backup_request(&mut state.backup_request, intent),
        rewind_status(&mut state.rewind_status, intent),
        rewind_status_error(&mut state.rewind_status_error, intent),
    ];
    changes.contains(&true)
}

fn set<V: PartialEq>(map: &mut BTreeMap<u64, V>, site_id: u64, value: V) -> bool {
    if map.get(&site_id) == Some(&value) {
        return false;
    }
    map.insert(site_id, value);
    true
}

fn activation_requesting(state: &mut BTreeMap<u64, bool>, intent: &Intent) -> bool {
    match intent {
        Intent::RewindActivateRequest { site_id } => set(state, *site_id, true),
        Intent::RewindActivateDidSucceed { site_id }
        | Intent::RewindActivateDidFail { site_id, .. } => set(state, *site_id, false),
        _ => false,
    }
}

fn log_items(state: &mut BTreeMap<u64, Vec<ActivityLogItem>>, intent: &Intent) -> bool {
    match intent {
        Intent::ActivityLogReceive { site_id, items } => {
            let mut items = items.clone();
            items.sort_by(|a, b| b.published.cmp(&a.published));
            set(state, *site_id, items)
        }
        _ => false,
    }
}

fn restore_progress(state: &mut BTreeMap<u64, RestoreProgress>, intent: &Intent) -> bool {
    match intent {
        Intent::RewindRestoreConfirm { site_id, rewind_id } => set(
            state,
            *site_id,
            RestoreProgress {
                rewind_id: rewind_id.clone(),
                status: RestoreStatus::Queued,
                percent: 0,
            },
        ),
        Intent::RewindRestoreProgressUpdate { site_id, progress } => {
            set(state, *site_id, progress.clone())
        }
        Intent::RewindRestoreDismissProgress { site_id } => state.remove(site_id).is_some(),
        _ => false,
    }
}

fn restore_request(state: &mut BTreeMap<u64, String>, intent: &Intent) -> bool {
    match intent {
        Intent::RewindRestoreRequest { site_id, rewind_id } => {
            set(state, *site_id, rewind_id.clone())
        }
        Intent::RewindRestoreDismiss { site_id } | Intent::RewindRestoreConfirm { site_id, .. } => {
            state.remove(site_id).is_some()
        }
        _ => false,
    }
}

fn backup_request(state: &mut BTreeMap<u64, String>, intent: &Intent) -> bool {
    match intent {
        Intent::RewindBackupRequest { site_id, rewind_id } => {
            set(state, *site_id, rewind_id.clone())
        }
        Intent::RewindBackupDismiss { site_id } => state.remove(site_id).is_some(),
        _ => false,
    }
}

fn rewind_status(state: &mut BTreeMap<u64, RewindStatus>, intent: &Intent) -> bool {
    match intent {
        Intent::RewindStatusReceive { site_id, status } => set(state, *site_id, status.clone()),
        Intent::RewindActivateDidSucceed { site_id } => set(
            state,
            *site_id,
            RewindStatus {
                state: RewindState::Active,
                reason: None,
            },
        ),
        _ => false,
    }
}

fn rewind_status_error(state: &mut BTreeMap<u64, String>, intent: &Intent) -> bool {
    match intent {
        Intent::RewindStatusRequestDidFail { site_id, error } => {
            set(state, *site_id, error.clone())
        }
        Intent::RewindStatusReceive { site_id, .. } => state.remove(site_id).is_some(),
        _ => false,
    }
}
