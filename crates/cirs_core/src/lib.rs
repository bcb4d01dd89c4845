//! CIRS → GCRS transformation of position and velocity vectors.
//!
//! A single rotation matrix is built per epoch from the CIP coordinates
//! X, Y (plus celestial pole offsets dX, dY) and the CIO locator s, then
//! applied to every vector of a batch.
//!
//! ```
//! use cirs_core::{Converter, ConverterConfig, JulianDate, PoleOffset, VectorBatch};
//!
//! let converter = Converter::new(ConverterConfig::default())?;
//! let batch = VectorBatch::from_positions(&[[1.0, 0.0, 0.0]]);
//! let out = converter.cirs_to_gcrs(JulianDate::j2000(), PoleOffset::ZERO.into(), &batch)?;
//! assert_eq!(out.vectors.len(), 1);
//! # Ok::<(), cirs_core::TransformError>(())
//! ```

pub mod batch;
pub mod converter;
pub mod error;
pub mod offsets;
pub mod rotation;
pub mod transform;

pub use batch::{VectorBatch, VectorDim};
pub use converter::{
    Converter, ConverterConfig, NutationTablePaths, RotationOutcome, TransformOutcome,
    TransformWarning,
};
pub use error::{InputError, TransformError};
pub use offsets::{PoleOffset, PoleOffsetSource, ResolvedOffset, resolve_pole_offset};
pub use rotation::{
    CirsRotation, Iau2006Model, Iau2006aModel, PrecessionNutation, RotationBuilder,
};
pub use transform::{transform, transform_into};

pub use cirs_frames::{CipXys, NutationSeries, RotationMatrix};
pub use cirs_time::{DateQuality, JulianDate};
