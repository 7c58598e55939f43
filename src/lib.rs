//! # SALT RSS Sensitivity File Creator
//!
//! Creates the sensitivity file of a standard star reduced by the SALT RSS pipeline.
//!
//! The target FITS file is typically a 2D flux spectrum of the standard star.
//! The calibration runs the two IRAF `noao.onedspec` tasks:
//!  1. `standard`, writing the standard file `std_<star>` from the spectrum and its
//!     `OBJECT`, `AIRMASS` and `EXPTIME` header keywords,
//!  2. `sensfunc`, fitting the sensitivity function `sens_<star>` to the standard file.
//!
//! ```no_run
//! use rss_sens::{iraf::IrafCl, CalibrationConfig, Loader, Pipeline};
//!
//! let config = Loader::<CalibrationConfig>::default().load_or_default()?;
//! let mut pipeline = Pipeline::builder()
//!     .toolkit(IrafCl::new(&config.iraf))
//!     .config(config)
//!     .build();
//! let (standard, sensitivity) = pipeline.run("star.fits")?;
//! # Ok::<(), rss_sens::SensitivityError>(())
//! ```

use std::path::PathBuf;

pub mod config;
pub use config::{CalibrationConfig, Loader};
pub mod header;
pub use header::StarHeader;
pub mod iraf;
pub mod onedspec;
pub use onedspec::{Onedspec, Sensfunc, Standard};
pub mod pipeline;
pub use pipeline::Pipeline;

#[cfg(test)]
pub(crate) mod testing;

#[derive(thiserror::Error, Debug)]
pub enum SensitivityError {
    #[error("cannot change directory to {1:?}")]
    Directory(#[source] std::io::Error, PathBuf),
    #[error("failed to read the standard star header")]
    Header(#[from] header::HeaderError),
    #[error("invalid calibration configuration")]
    Config(#[from] config::ConfigError),
    #[error("IRAF onedspec task failed")]
    Toolkit(#[from] onedspec::ToolkitError),
    #[error("standard file {0} not found, run the standard step first")]
    StandardMissing(String),
    #[error("{0} was not written by the toolkit")]
    ArtifactMissing(String),
    #[error("failed to remove existing {1}")]
    Clobber(#[source] std::io::Error, String),
}
pub type Result<T> = std::result::Result<T, SensitivityError>;
