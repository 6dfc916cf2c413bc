use crate::algebra::*;
use crate::solver::ErrorHook;
use derive_builder::Builder;
use lazy_static::lazy_static;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

lazy_static! {
    // read once, on first use
    static ref NANCHECK_DEFAULT: bool = nancheck_from_env(std::env::var("LAPACKE_NANCHECK").ok());
}

fn nancheck_from_env(value: Option<String>) -> bool {
    match value {
        // atoi semantics: anything that does not parse counts as 0
        Some(v) => v.trim().parse::<i64>().map_or(false, |flag| flag != 0),
        None => true,
    }
}

/// Default of [`EigenSettings::nancheck`], taken from the `LAPACKE_NANCHECK`
/// environment variable.  Checking is enabled when the variable is unset.
pub fn default_nancheck() -> bool {
    *NANCHECK_DEFAULT
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// A field holds a value outside its legal range
    #[error("Bad value for field {0}")]
    BadFieldValue(&'static str),
}

/// Settings of an [`EigenSolver`](crate::solver::EigenSolver).

#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EigenSettings {
    ///scan the referenced triangle of the input for NaN before solving
    #[builder(default = "default_nancheck()")]
    pub nancheck: bool,

    ///treatment of illegal arguments and allocation failures
    #[builder(default = "ErrorHook::Report")]
    pub error_hook: ErrorHook,

    ///block size override of the blocked routines
    #[builder(default = "None")]
    pub block_size: Option<usize>,

    ///QL/QR sweeps allowed per eigenvalue before giving up
    #[builder(default = "30")]
    pub max_iter_per_eigenvalue: u32,
}

impl Default for EigenSettings {
    fn default() -> EigenSettings {
        EigenSettingsBuilder::default().build().unwrap()
    }
}

impl EigenSettings {
    /// Checks that the settings are valid.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_block_size(self.block_size)?;
        validate_max_iter_per_eigenvalue(self.max_iter_per_eigenvalue)?;
        Ok(())
    }

    /// Parameters of the core driver.
    pub fn syev_params(&self) -> SyevParams {
        let mut params = SyevParams::default();
        if let Some(nb) = self.block_size {
            params.block_size = nb;
        }
        params.max_iter_per_eigenvalue = self.max_iter_per_eigenvalue as usize;
        params
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for EigenSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        EigenSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl EigenSettingsBuilder {
    /// check the numerical fields that have been set
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(block_size) = self.block_size {
            validate_block_size(block_size)?;
        }
        if let Some(max_iter) = self.max_iter_per_eigenvalue {
            validate_max_iter_per_eigenvalue(max_iter)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_block_size(block_size: Option<usize>) -> Result<(), SettingsError> {
    match block_size {
        Some(0) => Err(SettingsError::BadFieldValue("block_size")),
        _ => Ok(()),
    }
}

fn validate_max_iter_per_eigenvalue(max_iter: u32) -> Result<(), SettingsError> {
    if max_iter == 0 {
        return Err(SettingsError::BadFieldValue("max_iter_per_eigenvalue"));
    }
    Ok(())
}

#[test]
fn test_settings_validate() {
    let settings = EigenSettingsBuilder::default()
        .block_size(Some(16))
        .max_iter_per_eigenvalue(40)
        .build()
        .unwrap();
    assert!(settings.validate().is_ok());
    let params = settings.syev_params();
    assert_eq!(params.block_size, 16);
    assert_eq!(params.max_iter_per_eigenvalue, 40);

    // fail on bad values
    assert!(EigenSettingsBuilder::default()
        .max_iter_per_eigenvalue(0)
        .build()
        .is_err());
    assert!(EigenSettingsBuilder::default()
        .block_size(Some(0))
        .build()
        .is_err());

    let mut settings = EigenSettings::default();
    assert_eq!(settings.error_hook, ErrorHook::Report);
    assert_eq!(settings.syev_params(), SyevParams::default());
    settings.max_iter_per_eigenvalue = 0;
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("max_iter_per_eigenvalue"))
    );
}

#[test]
fn test_nancheck_from_env() {
    assert!(nancheck_from_env(None));
    assert!(nancheck_from_env(Some("1".to_string())));
    assert!(nancheck_from_env(Some(" 7".to_string())));
    assert!(!nancheck_from_env(Some("0".to_string())));
    assert!(!nancheck_from_env(Some("yes".to_string())));
}
