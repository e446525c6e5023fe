pub mod cache;
pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod save;

pub use cache::{CacheKey, CacheStore};
pub use errors::{LoadError, SaveError};
pub use load::{load_model_bytes, load_model_file, load_model_reader};
pub use metadata::CacheMetadata;
pub use save::{
    save_model_bytes, save_model_file, save_model_writer, ReachabilityFile, FORMAT_MAGIC,
    FORMAT_VERSION, HEADER_SIZE,
};
