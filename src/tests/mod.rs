pub mod durability_tests;
pub mod fastboot_tests;

use crate::config::ProvisionConfig;
use crate::store::{CurrentSlot, SlotStore};
use crate::types::block::MetadataBlock;

pub(crate) fn provisioned(slot_count: u8, max_retries: u8) -> SlotStore {
    let config = ProvisionConfig {
        slot_count,
        max_retries,
        tracks_unbootable_reasons: true,
    };
    let block = MetadataBlock::new(&config).unwrap();
    SlotStore::with_metadata(block, CurrentSlot::Index(0)).unwrap()
}
