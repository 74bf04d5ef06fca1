// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Opening the metadata file and resolving slot names for the commands.

use abslot_kernel::{
    AbSlotProtocol, AbSlotService, CurrentSlot, ProvisionConfig, SlotError, Suffix,
};
use abslot_persistence::FileStorage;
use anyhow::{anyhow, bail, Context};
use std::path::Path;

pub type Service = AbSlotService<FileStorage>;

/// Parses `--current`: a slot letter (`a`, `_a`) or a slot index.
pub fn parse_current(arg: Option<&str>) -> anyhow::Result<CurrentSlot> {
    let Some(arg) = arg else {
        return Ok(CurrentSlot::Unknown);
    };
    if let Ok(index) = arg.parse::<u8>() {
        return Ok(CurrentSlot::Index(index));
    }
    Ok(CurrentSlot::Suffix(parse_suffix(arg)?))
}

fn parse_suffix(arg: &str) -> anyhow::Result<Suffix> {
    let name = arg.strip_prefix('_').unwrap_or(arg);
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Suffix::from_char(c)),
        _ => bail!("invalid slot '{}'", arg),
    }
}

/// Index of the slot named by `arg`, which may be a letter or an index.
pub fn resolve_slot(service: &Service, arg: &str) -> anyhow::Result<u8> {
    let block = service.load_boot_data()?;
    if let Ok(index) = arg.parse::<u8>() {
        block.slot(index)?;
        return Ok(index);
    }
    let suffix = parse_suffix(arg)?;
    block
        .index_of(suffix)
        .ok_or_else(|| anyhow!("no such slot '{}'", arg))
}

/// Opens the metadata file. With `recover`, a file that fails validation is
/// replaced by a freshly provisioned block.
pub fn open(path: &Path, current: CurrentSlot, recover: bool) -> anyhow::Result<Service> {
    match AbSlotService::open(FileStorage::new(path), current) {
        Ok(service) => Ok(service),
        Err(SlotError::MalformedMetadata(reason)) if recover => {
            tracing::warn!("{} is malformed ({}), reprovisioning", path.display(), reason);
            let mut service =
                AbSlotService::provision(FileStorage::new(path), &ProvisionConfig::default(), current)?;
            service.flush()?;
            Ok(service)
        }
        Err(SlotError::StorageReadFailure) if !FileStorage::new(path).exists() => {
            bail!("no slot metadata at {} (run `abslot init`)", path.display())
        }
        Err(e) => Err(e).with_context(|| format!("failed to open {}", path.display())),
    }
}
