//! Service adapters: reference implementations of the ports (files, memory).

pub mod authorization;
pub mod localization;
pub mod memory_repository;
pub mod paths;
pub mod settings;
pub mod tab_store;

pub use authorization::StaticAuthorization;
pub use localization::CatalogLocalization;
pub use memory_repository::MemoryRepository;
pub use paths::{ensure_log_dir, get_log_dir, get_tabs_dir};
pub use settings::{ensure_settings_file, get_settings_path, load_settings, load_settings_from};
pub use tab_store::JsonTabStore;
