//! # dcolor-transfer
//!
//! Transfer functions between encoded signal values and absolute luminance.
//!
//! # Terminology
//!
//! - **Encoded**: the signal stored in a buffer, nominally `[0, 1]` but
//!   extended-range content may go beyond
//! - **Nits**: absolute luminance in cd/m2
//!
//! # Supported Transfer Functions
//!
//! | Function | Use Case | Default range (nits) |
//! |----------|----------|-------|
//! | Linear | Compositing, blending | [0, 1] |
//! | [`srgb`] | Web, consumer displays | [0, 80] |
//! | [`gamma`] (2.2) | SDR desktop content | [0, 80] |
//! | [`pq`] | HDR10 | [0, 10000] |
//! | [`hlg`] | HDR broadcast | [0, 1000] |
//!
//! The raw curve modules work on normalized values. [`TransferFunction`]
//! binds a curve to a luminance range and is the type the pipeline uses.
//!
//! # Usage
//!
//! ```rust
//! use dcolor_transfer::{TransferFunction, TransferFunctionType};
//!
//! let pq = TransferFunction::new(TransferFunctionType::PerceptualQuantizer);
//! let nits = pq.encoded_to_nits(0.58);
//! assert!((nits - 203.0).abs() < 2.0);
//! ```
//!
//! # Dependencies
//!
//! - `dcolor-math` - [`Vec3`](dcolor_math::Vec3) for per-channel evaluation
//!
//! # Used By
//!
//! - `dcolor-pipeline` - transfer function ops
//! - `dcolor-shader` - uniform serialization

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod gamma;
pub mod hlg;
pub mod pq;
pub mod srgb;

mod function;

pub use function::{ParseTransferError, TransferFunction, TransferFunctionType};
