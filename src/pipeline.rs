//! Sensitivity file pipeline
//!
//! The standard file `std_<star>` is created from the standard star FITS file `<star>`,
//! then the sensitivity file `sens_<star>` is fitted to the standard file.

use crate::{
    iraf::IrafCl,
    onedspec::{Onedspec, Sensfunc, Standard},
    CalibrationConfig, Result, SensitivityError, StarHeader,
};
use std::path::{Path, PathBuf};

/// Standard file name prefix
pub const STANDARD_PREFIX: &str = "std_";
/// Sensitivity file name prefix
pub const SENSITIVITY_PREFIX: &str = "sens_";

/// Returns the standard file name of the standard star FITS file `star`
pub fn standard_name(star: &str) -> String {
    format!("{STANDARD_PREFIX}{star}")
}
/// Returns the sensitivity file name of the standard star FITS file `star`
pub fn sensitivity_name(star: &str) -> String {
    format!("{SENSITIVITY_PREFIX}{star}")
}

/// Changes the process working directory to `path`
pub fn enter_directory<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    std::env::set_current_dir(path)
        .map_err(|e| SensitivityError::Directory(e, path.to_path_buf()))?;
    log::info!("working directory: {:?}", path);
    Ok(())
}

/// [Pipeline] builder
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CalibrationConfig>,
    toolkit: Option<Box<dyn Onedspec>>,
    dir: Option<PathBuf>,
}
impl PipelineBuilder {
    /// Sets the calibration configuration
    pub fn config(self, config: CalibrationConfig) -> Self {
        Self {
            config: Some(config),
            ..self
        }
    }
    /// Sets the toolkit running the IRAF tasks
    pub fn toolkit<T: Onedspec + 'static>(self, toolkit: T) -> Self {
        Self {
            toolkit: Some(Box::new(toolkit)),
            ..self
        }
    }
    /// Sets the directory of the standard star FITS file, default: the current directory
    pub fn directory<P: AsRef<Path>>(self, dir: P) -> Self {
        Self {
            dir: Some(dir.as_ref().to_path_buf()),
            ..self
        }
    }
    /// Creates a [Pipeline]
    ///
    /// The toolkit defaults to [IrafCl] set with the configuration
    pub fn build(self) -> Pipeline {
        let config = self.config.unwrap_or_default();
        let toolkit = self
            .toolkit
            .unwrap_or_else(|| Box::new(IrafCl::new(&config.iraf)));
        Pipeline {
            config,
            toolkit,
            dir: self.dir.unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Standard star calibration pipeline
pub struct Pipeline {
    config: CalibrationConfig,
    toolkit: Box<dyn Onedspec>,
    dir: PathBuf,
}
impl Pipeline {
    /// Returns the [builder](PipelineBuilder)
    pub fn builder() -> PipelineBuilder {
        Default::default()
    }
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }
    pub fn directory(&self) -> &Path {
        &self.dir
    }
    fn clobber(&self, name: &str) -> Result<()> {
        let path = self.dir.join(name);
        if !self.config.clobber || !path.exists() {
            return Ok(());
        }
        if !self.toolkit.writes_outputs() {
            log::info!("would remove {name} left by a previous run");
        } else {
            log::warn!("removing {name} left by a previous run");
            std::fs::remove_file(&path).map_err(|e| SensitivityError::Clobber(e, name.into()))?;
        }
        Ok(())
    }
    fn written(&self, name: &str) -> Result<()> {
        if self.toolkit.writes_outputs() && !self.dir.join(name).exists() {
            return Err(SensitivityError::ArtifactMissing(name.into()));
        }
        Ok(())
    }
    /// Creates the standard file of the standard star FITS file `star`
    ///
    /// Returns the standard file name
    pub fn standard(&mut self, star: &str) -> Result<String> {
        let header = StarHeader::from_fits(self.dir.join(star))?;
        log::info!("standard star: {}", header);
        let standard = standard_name(star);
        self.clobber(&standard)?;
        let task = Standard::new(star, &standard, header, &self.config);
        self.toolkit.standard(&self.dir, &task)?;
        self.written(&standard)?;
        log::info!("standard file: {standard}");
        Ok(standard)
    }
    /// Creates the sensitivity file of the standard star FITS file `star` from the `standard` file
    ///
    /// Returns the sensitivity file name
    pub fn sensitivity(&mut self, star: &str, standard: &str) -> Result<String> {
        if self.toolkit.writes_outputs() && !self.dir.join(standard).exists() {
            return Err(SensitivityError::StandardMissing(standard.into()));
        }
        let sensitivity = sensitivity_name(star);
        self.clobber(&sensitivity)?;
        let task = Sensfunc::new(standard, &sensitivity, &self.config);
        self.toolkit.sensfunc(&self.dir, &task)?;
        self.written(&sensitivity)?;
        log::info!("sensitivity file: {sensitivity}");
        Ok(sensitivity)
    }
    /// Creates the standard and the sensitivity files of the standard star FITS file `star`
    pub fn run(&mut self, star: &str) -> Result<(String, String)> {
        let standard = self.standard(star)?;
        let sensitivity = self.sensitivity(star, &standard)?;
        Ok((standard, sensitivity))
    }
}
