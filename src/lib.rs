//! This crate develops Bayer raw camera frames into 8-bit RGB images.
//!
//! Two paths are provided:
//!
//! - [`demosaic`] reconstructs a full-resolution image with an
//!   edge-directed interpolation over fixed-size tiles, with optional
//!   hot-pixel suppression, a colour matrix and a tone curve.
//! - [`make_thumbnail`] box-filters the mosaic down to a small preview.
//!
//! Failures of the full demosaic are posted to an [`EventSink`]; both
//! paths return an empty [`Image`] when they cannot produce output.

pub use crate::bayer::{Channel, SampleOrder, CFA};
pub use crate::color::{to_code, ColorMatrix};
pub use crate::config::{Backend, DevelopConfig, DevelopConfigBuilder};
pub use crate::demosaic::{demosaic, try_demosaic};
pub use crate::dispatch::{make_thumbnail, Developer, Request};
pub use crate::errcode::{DevelopError, DevelopResult, ErrorKind};
pub use crate::event::{DiscardEvents, Event, EventCode, EventQueue, EventSink};
pub use crate::frame::{CalibratedPlatform, Frame, PixelFormat, Platform, Shot};
pub use crate::raster::{Image, RawImage, Size};
pub use crate::thumbnail::make_thumbnail_raw;
pub use crate::tone::ToneCurve;

pub mod demosaic;
pub mod ffi;
pub mod thumbnail;

mod bayer;
mod color;
mod config;
mod dispatch;
mod errcode;
mod event;
mod frame;
mod raster;
mod tone;
