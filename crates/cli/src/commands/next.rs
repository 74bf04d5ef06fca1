// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::session::Service;
use abslot_kernel::{AbSlotProtocol, SlotRecord};

/// Runs arbitration. With `mark`, the consumed attempt is flushed.
pub fn run(service: &mut Service, mark: bool) -> anyhow::Result<SlotRecord> {
    let slot = service.get_next_slot(mark)?;
    if mark {
        service.flush()?;
    }

    println!(
        "next: {} (priority {}, tries {}{})",
        slot.suffix,
        slot.priority,
        slot.tries,
        if slot.is_bootable() { "" } else { ", now unbootable" }
    );
    Ok(slot)
}
