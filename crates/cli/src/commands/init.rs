// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use abslot_kernel::{AbSlotProtocol, AbSlotService, CurrentSlot, ProvisionConfig};
use abslot_persistence::FileStorage;
use anyhow::bail;
use std::path::Path;

pub fn run(path: &Path, config: ProvisionConfig, force: bool) -> anyhow::Result<()> {
    let storage = FileStorage::new(path);
    if storage.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let mut service = AbSlotService::provision(storage, &config, CurrentSlot::Unknown)?;
    service.flush()?;

    println!(
        "Provisioned {} slots ({} retries, reason tracking {}) at {}",
        config.slot_count,
        config.max_retries,
        if config.tracks_unbootable_reasons { "on" } else { "off" },
        path.display()
    );
    Ok(())
}
