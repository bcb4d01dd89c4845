//! Configured entry point: tables loaded once, many conversions served.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use cirs_frames::NutationSeries;
use cirs_time::{EopKernel, EopProvider, JulianDate, LeapSecondTable};

use crate::batch::VectorBatch;
use crate::error::TransformError;
use crate::offsets::{PoleOffset, PoleOffsetSource, resolve_pole_offset};
use crate::rotation::{
    CirsRotation, Iau2006Model, Iau2006aModel, PrecessionNutation, RotationBuilder,
};
use crate::transform::transform;

/// Paths and policy for a [`Converter`].
#[derive(Debug, Clone, Default)]
pub struct ConverterConfig {
    /// NAIF LSK extending the built-in leap-second table.
    pub lsk_path: Option<PathBuf>,
    /// IERS finals2000A file used when offsets are not given explicitly.
    pub eop_path: Option<PathBuf>,
    /// Fail instead of warning when the UTC date is beyond the
    /// leap-second table horizon.
    pub dubious_dates_are_errors: bool,
    /// IERS nutation tables selecting the IAU 2000A model; IAU 2000B
    /// otherwise.
    pub nutation_tables: Option<NutationTablePaths>,
}

/// The IERS Conventions files `tab5.3a.txt` and `tab5.3b.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct NutationTablePaths {
    pub longitude: PathBuf,
    pub obliquity: PathBuf,
}

impl ConverterConfig {
    /// Config reading dX/dY from a finals2000A file.
    pub fn with_eop(eop_path: PathBuf) -> Self {
        Self {
            eop_path: Some(eop_path),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), TransformError> {
        if self
            .lsk_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(TransformError::InvalidConfig("lsk_path must not be empty"));
        }
        if self
            .eop_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(TransformError::InvalidConfig("eop_path must not be empty"));
        }
        if self.nutation_tables.as_ref().is_some_and(|t| {
            t.longitude.as_os_str().is_empty() || t.obliquity.as_os_str().is_empty()
        }) {
            return Err(TransformError::InvalidConfig(
                "nutation table paths must not be empty",
            ));
        }
        Ok(())
    }
}

/// Non-fatal conditions attached to a successful result.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum TransformWarning {
    /// The UTC date used for the EOP lookup is past the leap-second
    /// table horizon; it may be off by whole seconds.
    DubiousDate { utc: JulianDate },
}

impl Display for TransformWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DubiousDate { utc } => {
                write!(f, "dubious UTC date {utc}: beyond the leap-second table")
            }
        }
    }
}

/// The rotation for an epoch plus any warnings raised computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationOutcome {
    pub rotation: CirsRotation,
    pub warnings: Vec<TransformWarning>,
}

/// Rotated vectors, the rotation used, and any warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutcome {
    pub vectors: VectorBatch,
    pub rotation: CirsRotation,
    pub warnings: Vec<TransformWarning>,
}

/// Holds the leap-second table, EOP source and model for repeated
/// conversions. Immutable after construction and safe to share between
/// threads.
pub struct Converter {
    config: ConverterConfig,
    leap_seconds: LeapSecondTable,
    eop: Option<Box<dyn EopProvider>>,
    model: Box<dyn PrecessionNutation>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .field("leap_second_entries", &self.leap_seconds.entries().len())
            .field("has_eop", &self.eop.is_some())
            .finish()
    }
}

impl Converter {
    /// Create a converter, loading any tables named in `config`.
    pub fn new(config: ConverterConfig) -> Result<Self, TransformError> {
        config.validate()?;
        let leap_seconds = match &config.lsk_path {
            Some(path) => LeapSecondTable::load_lsk(path).map_err(TransformError::TableLoad)?,
            None => LeapSecondTable::builtin(),
        };
        log::debug!(
            "leap-second table: {} entries, valid to {}",
            leap_seconds.entries().len(),
            leap_seconds.validity_year()
        );
        let eop = match &config.eop_path {
            Some(path) => {
                let kernel = EopKernel::load(path).map_err(TransformError::TableLoad)?;
                Some(Box::new(kernel) as Box<dyn EopProvider>)
            }
            None => None,
        };
        let model: Box<dyn PrecessionNutation> = match &config.nutation_tables {
            Some(paths) => {
                let series = NutationSeries::load(&paths.longitude, &paths.obliquity)
                    .map_err(TransformError::NutationTableLoad)?;
                log::info!("IAU 2000A nutation: {} terms", series.term_count());
                Box::new(Iau2006aModel::new(series))
            }
            None => Box::new(Iau2006Model),
        };
        Ok(Self {
            config,
            leap_seconds,
            eop,
            model,
        })
    }

    /// Replace the EOP source (for example with a [`cirs_time::FixedEop`]
    /// or a closure).
    pub fn with_eop_provider(mut self, provider: impl EopProvider + 'static) -> Self {
        self.eop = Some(Box::new(provider));
        self
    }

    /// Replace the precession-nutation model.
    pub fn with_model(mut self, model: impl PrecessionNutation + 'static) -> Self {
        self.model = Box::new(model);
        self
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn leap_seconds(&self) -> &LeapSecondTable {
        &self.leap_seconds
    }

    /// The CIRS ↔ GCRS rotation at TT epoch `tt`.
    pub fn rotation(
        &self,
        tt: JulianDate,
        source: PoleOffsetSource,
    ) -> Result<RotationOutcome, TransformError> {
        let resolved =
            resolve_pole_offset(source, tt, &self.leap_seconds, self.eop.as_deref())?;

        let mut warnings = Vec::new();
        if resolved.quality.is_dubious() {
            // Only lookups produce a UTC date, so `utc` is set here.
            let utc = resolved.utc.unwrap_or(tt);
            if self.config.dubious_dates_are_errors {
                return Err(TransformError::DubiousDate { utc });
            }
            warnings.push(TransformWarning::DubiousDate { utc });
        }

        let rotation = RotationBuilder::new(self.model.as_ref()).build(tt, resolved.offset)?;
        Ok(RotationOutcome { rotation, warnings })
    }

    /// Rotate CIRS vectors into the GCRS.
    pub fn cirs_to_gcrs(
        &self,
        tt: JulianDate,
        source: PoleOffsetSource,
        vectors: &VectorBatch,
    ) -> Result<TransformOutcome, TransformError> {
        let RotationOutcome { rotation, warnings } = self.rotation(tt, source)?;
        Ok(TransformOutcome {
            vectors: transform(&rotation.cirs_to_gcrs(), vectors),
            rotation,
            warnings,
        })
    }

    /// Rotate GCRS vectors into the CIRS.
    pub fn gcrs_to_cirs(
        &self,
        tt: JulianDate,
        source: PoleOffsetSource,
        vectors: &VectorBatch,
    ) -> Result<TransformOutcome, TransformError> {
        let RotationOutcome { rotation, warnings } = self.rotation(tt, source)?;
        Ok(TransformOutcome {
            vectors: transform(&rotation.gcrs_to_cirs(), vectors),
            rotation,
            warnings,
        })
    }

    /// CIRS → GCRS on raw caller data.
    ///
    /// `offsets`, when given, must be exactly `[dX, dY]`; otherwise they are
    /// looked up. All shape checks run before any computation.
    pub fn cirs_to_gcrs_flat(
        &self,
        tt: JulianDate,
        offsets: Option<&[f64]>,
        dim: usize,
        data: Vec<f64>,
    ) -> Result<TransformOutcome, TransformError> {
        let vectors = VectorBatch::from_flat(dim, data)?;
        let source = match offsets {
            Some(values) => PoleOffsetSource::Explicit(PoleOffset::from_slice(values)?),
            None => PoleOffsetSource::LookupFromEop,
        };
        self.cirs_to_gcrs(tt, source, &vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirs_time::{EopResponse, FixedEop};

    fn converter() -> Converter {
        Converter::new(ConverterConfig::default())
            .unwrap()
            .with_eop_provider(FixedEop(EopResponse::pole_offsets(1e-10, -1e-10)))
    }

    #[test]
    fn empty_paths_rejected() {
        let config = ConverterConfig {
            lsk_path: Some(PathBuf::new()),
            ..ConverterConfig::default()
        };
        assert_eq!(
            Converter::new(config).unwrap_err(),
            TransformError::InvalidConfig("lsk_path must not be empty")
        );
        let config = ConverterConfig::with_eop(PathBuf::new());
        assert!(matches!(
            Converter::new(config),
            Err(TransformError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_files_fail_to_load() {
        let config = ConverterConfig::with_eop(PathBuf::from("/nonexistent/finals2000A.all"));
        assert!(matches!(
            Converter::new(config),
            Err(TransformError::TableLoad(_))
        ));
    }

    #[test]
    fn nutation_tables_select_the_table_model() {
        let dir = std::env::temp_dir().join(format!("cirs_nut_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let (psi, eps) = (dir.join("tab5.3a.txt"), dir.join("tab5.3b.txt"));
        // Only the dominant 18.6-year term.
        std::fs::write(&psi, "j = 0\n 1 -17206424.18 3338.60 0 0 0 0 1 0 0 0 0 0 0 0 0 0\n")
            .unwrap();
        std::fs::write(&eps, "j = 0\n 1 1537.70 9205233.10 0 0 0 0 1 0 0 0 0 0 0 0 0 0\n")
            .unwrap();
        let config = ConverterConfig {
            nutation_tables: Some(NutationTablePaths {
                longitude: psi.clone(),
                obliquity: eps.clone(),
            }),
            ..ConverterConfig::default()
        };
        let c = Converter::new(config).unwrap();
        let tt = JulianDate::new(2_460_000.5, 0.0);
        let from_tables = c.rotation(tt, PoleOffset::ZERO.into()).unwrap().rotation;
        let series = NutationSeries::load(&psi, &eps).unwrap();
        let expected = cirs_frames::cip_xys_iau2000a(tt, &series).unwrap();
        assert_eq!(from_tables.cip, expected);
        // The missing terms move the pole by about an arcsecond.
        let builtin = converter().rotation(tt, PoleOffset::ZERO.into()).unwrap();
        assert!((from_tables.cip.x - builtin.rotation.cip.x).abs() < 1e-5);
        assert_ne!(from_tables.cip.x, builtin.rotation.cip.x);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn bad_nutation_tables_fail_to_load() {
        let config = ConverterConfig {
            nutation_tables: Some(NutationTablePaths {
                longitude: PathBuf::from("/nonexistent/tab5.3a.txt"),
                obliquity: PathBuf::from("/nonexistent/tab5.3b.txt"),
            }),
            ..ConverterConfig::default()
        };
        assert!(matches!(
            Converter::new(config),
            Err(TransformError::NutationTableLoad(_))
        ));
        let config = ConverterConfig {
            nutation_tables: Some(NutationTablePaths {
                longitude: PathBuf::new(),
                obliquity: PathBuf::from("tab5.3b.txt"),
            }),
            ..ConverterConfig::default()
        };
        assert!(matches!(
            Converter::new(config),
            Err(TransformError::InvalidConfig(_))
        ));
    }

    #[test]
    fn lookup_and_explicit_agree() {
        let c = converter();
        let tt = JulianDate::new(2_400_000.5, 53_736.0);
        let looked_up = c.rotation(tt, PoleOffsetSource::LookupFromEop).unwrap();
        let explicit = c
            .rotation(tt, PoleOffset::new(1e-10, -1e-10).into())
            .unwrap();
        assert_eq!(looked_up.rotation, explicit.rotation);
        assert!(looked_up.warnings.is_empty());
    }

    #[test]
    fn no_eop_source_without_offsets() {
        let c = Converter::new(ConverterConfig::default()).unwrap();
        let err = c
            .rotation(JulianDate::j2000(), PoleOffsetSource::LookupFromEop)
            .unwrap_err();
        assert_eq!(err, TransformError::MissingEopSource);
        // Explicit offsets need no EOP source.
        assert!(c.rotation(JulianDate::j2000(), PoleOffset::ZERO.into()).is_ok());
    }

    #[test]
    fn flat_input_validated_first() {
        let c = converter();
        // A non-finite epoch would fail later; shape errors win.
        let bad_epoch = JulianDate::new(f64::NAN, 0.0);
        let err = c
            .cirs_to_gcrs_flat(bad_epoch, Some(&[0.0, 0.0, 0.0]), 3, vec![1.0, 0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, TransformError::CallerInput(_)));
        let err = c
            .cirs_to_gcrs_flat(bad_epoch, None, 5, vec![0.0; 5])
            .unwrap_err();
        assert!(matches!(err, TransformError::CallerInput(_)));
    }

    #[test]
    fn round_trip_through_both_directions() {
        let c = converter();
        let tt = JulianDate::new(2_460_000.5, 0.3);
        let v = VectorBatch::from_positions(&[[6_378.0, -1_200.0, 3_000.0]]);
        let gcrs = c
            .cirs_to_gcrs(tt, PoleOffsetSource::LookupFromEop, &v)
            .unwrap();
        let back = c
            .gcrs_to_cirs(tt, PoleOffsetSource::LookupFromEop, &gcrs.vectors)
            .unwrap();
        for (a, b) in back.vectors.as_flat().iter().zip(v.as_flat()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn warning_display() {
        let w = TransformWarning::DubiousDate {
            utc: JulianDate::new(2_464_328.5, 0.0),
        };
        assert!(w.to_string().starts_with("dubious UTC date"));
    }
}
