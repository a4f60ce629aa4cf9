//! Persistence Codec
//!
//! Saved projects, the preview export and project directories on disk.

pub mod archive;
pub mod export;
pub mod store;

pub use archive::{
    deserialize, serialize, Archive, ChartFile, ProjectData, CURRENT_FILE_VERSION, PRODUCT,
};
pub use export::{export_preview, ExportTable, ExportValue, EMPTY_LANE_SENTINEL};
pub use store::ProjectStore;
