// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::session::Service;
use abslot_kernel::{AbSlotProtocol, BootMode, MergeStatus, SlotRecord};
use serde::Serialize;

#[derive(Serialize)]
pub struct SlotView {
    pub name: String,
    pub bootable: bool,
    #[serde(flatten)]
    pub record: SlotRecord,
}

#[derive(Serialize)]
pub struct MetadataView {
    pub slot_count: u8,
    pub max_retries: u8,
    pub tracks_unbootable_reasons: bool,
    pub merge_status: MergeStatus,
    pub boot_mode: BootMode,
    pub slots: Vec<SlotView>,
}

/// Pretty-printed JSON view of the block.
pub fn run(service: &Service) -> anyhow::Result<String> {
    let block = service.load_boot_data()?;
    let view = MetadataView {
        slot_count: block.slot_count(),
        max_retries: block.max_retries(),
        tracks_unbootable_reasons: block.tracks_unbootable_reasons(),
        merge_status: block.merge_status(),
        boot_mode: block.boot_mode(),
        slots: block
            .slots()
            .iter()
            .map(|s| SlotView {
                name: s.suffix.to_string(),
                bootable: s.is_bootable(),
                record: *s,
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&view)?;
    println!("{json}");
    Ok(json)
}
