// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::session::Service;
use abslot_kernel::{AbSlotProtocol, MergeStatus};
use anyhow::anyhow;

/// Prints the merge status, setting it first when `status` is given.
pub fn run(service: &mut Service, status: Option<&str>) -> anyhow::Result<MergeStatus> {
    if let Some(name) = status {
        let status = MergeStatus::from_name(name).ok_or_else(|| {
            anyhow!(
                "unknown merge status '{}' (expected none, unknown, snapshotted, merging or cancelled)",
                name
            )
        })?;
        service.set_merge_status(status as u8)?;
        service.flush()?;
    }

    let status = service.get_merge_status()?;
    println!("merge status: {}", status);
    Ok(status)
}
