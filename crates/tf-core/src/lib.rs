pub mod api;
pub mod error;
pub mod form;
pub mod format;
pub mod mode;
pub mod progress;
pub mod upload;

pub use error::{Error, Result};
pub use form::{ImageSlot, ToyForm};
pub use format::OutputFormat;
pub use mode::GenerationMode;
pub use upload::UploadedImage;
