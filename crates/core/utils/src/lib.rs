//! # Imaginify Utils
//!
//! Small helpers shared by the Imaginify crates:
//! - [`cn!`] / [`class_names::cn`] for conditional, conflict-aware class names
//! - [`Debouncer`] for trailing-edge debouncing on tokio
//! - [`image_size`] for transformation previews
//! - [`download()`] for saving remote images
//! - [`deep_merge`] for JSON configuration objects
//! - [`describe_error`] for normalising failures into messages

pub mod class_names;
pub mod debounce;
pub mod download;
pub mod error;
pub mod image;
pub mod merge;

pub use class_names::{ClassValue, merge_classes};
pub use debounce::Debouncer;
pub use download::{DownloadError, download, file_name_for};
pub use error::{ErrorInput, describe_error};
pub use image::{ASPECT_RATIOS, AspectRatio, DEFAULT_IMAGE_SIZE, Dimension, ImageDimensions, image_size};
pub use merge::deep_merge;
