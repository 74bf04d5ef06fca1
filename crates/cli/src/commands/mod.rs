// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod boot_mode;
pub mod dump;
pub mod init;
pub mod inspect;
pub mod mark_successful;
pub mod merge_status;
pub mod next;
pub mod reinit;
pub mod set_active;
pub mod set_unbootable;
