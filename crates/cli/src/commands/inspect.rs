// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use crate::session::Service;
use abslot_kernel::codec::{encode, metadata_digest};
use abslot_kernel::AbSlotProtocol;

pub fn run(service: &Service) -> anyhow::Result<()> {
    let block = service.load_boot_data()?;
    let current = service.store().current_index().ok();
    let next = abslot_kernel::arbiter::select_next(&block).ok();

    println!("\nSlot Metadata Report");
    println!("--------------------");
    println!("Slots:          {}", block.slot_count());
    println!("Max retries:    {}", block.max_retries());
    println!("Reasons:        {}", if block.tracks_unbootable_reasons() { "on" } else { "off" });
    println!("Merge status:   {}", block.merge_status());
    println!("Boot mode:      {}", block.boot_mode());
    println!("Encoded size:   {} bytes", encode(&block).len());
    let digest = metadata_digest(&block);
    println!(
        "Digest:         {}",
        digest[..8].iter().map(|b| format!("{:02x}", b)).collect::<String>()
    );

    // Build Table
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Slot", "Priority", "Tries", "Successful", "Bootable", "Reason", "Notes"]);

    for (i, slot) in block.slots().iter().enumerate() {
        let mut notes = Vec::new();
        if current == Some(i as u8) {
            notes.push("current");
        }
        if next == Some(i as u8) {
            notes.push("next");
        }
        table.add_row(vec![
            slot.suffix.to_string(),
            slot.priority.to_string(),
            slot.tries.to_string(),
            if slot.successful { "yes" } else { "no" }.to_string(),
            if slot.is_bootable() { "yes" } else { "NO" }.to_string(),
            slot.unbootable_reason.to_string(),
            notes.join(", "),
        ]);
    }

    println!("{table}");
    if next.is_none() {
        println!("\nWARNING: no bootable slot");
    }
    Ok(())
}
