// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::session::{resolve_slot, Service};
use abslot_kernel::AbSlotProtocol;

pub fn run(service: &mut Service, slot: &str) -> anyhow::Result<()> {
    let index = resolve_slot(service, slot)?;
    let record = service.store_mut().mark_successful(index)?;
    service.flush()?;
    println!("successful: {}", record.suffix);
    Ok(())
}
