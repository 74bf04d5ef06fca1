// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::session::Service;
use abslot_kernel::{AbSlotProtocol, BootMode};
use anyhow::anyhow;

/// Prints the boot mode, setting it first when `mode` is given.
pub fn run(service: &mut Service, mode: Option<&str>) -> anyhow::Result<BootMode> {
    if let Some(name) = mode {
        let mode = BootMode::from_name(name).ok_or_else(|| {
            anyhow!("unknown boot mode '{}' (expected normal, recovery, fastbootd or bootloader)", name)
        })?;
        service.set_boot_mode(mode as u32)?;
        service.flush()?;
    }

    let mode = service.get_boot_mode()?;
    println!("boot mode: {}", mode);
    Ok(mode)
}
