// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::session::Service;
use abslot_kernel::AbSlotProtocol;

pub fn run(service: &mut Service) -> anyhow::Result<()> {
    service.reinitialize()?;
    service.flush()?;
    println!("All slots reset to defaults");
    Ok(())
}
