// Files kept alongside the database
pub mod images;

pub use images::{ImageStore, ImageStoreError, IMAGES_DIR_NAME};
