// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::session::{resolve_slot, Service};
use abslot_kernel::{AbSlotProtocol, UnbootableReason};
use anyhow::anyhow;

pub fn run(service: &mut Service, slot: &str, reason: &str) -> anyhow::Result<()> {
    let index = resolve_slot(service, slot)?;
    let reason = UnbootableReason::from_name(reason).ok_or_else(|| {
        anyhow!(
            "unknown reason '{}' (expected no-more-tries, system-update, user-requested or verification-failure)",
            reason
        )
    })?;

    service.set_slot_unbootable(index, reason as u32)?;
    service.flush()?;

    let record = service.get_slot_info(index)?;
    println!("unbootable: {} ({})", record.suffix, record.unbootable_reason);
    Ok(())
}
