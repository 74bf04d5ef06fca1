// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::session::{resolve_slot, Service};
use abslot_kernel::AbSlotProtocol;

pub fn run(service: &mut Service, slot: &str) -> anyhow::Result<()> {
    let index = resolve_slot(service, slot)?;
    service.set_active_slot(index)?;
    service.flush()?;

    let record = service.get_slot_info(index)?;
    println!("active: {} (priority {}, tries {})", record.suffix, record.priority, record.tries);
    Ok(())
}
