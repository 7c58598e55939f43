//! Calibration configuration
//!
//! Every parameter given to the IRAF tasks that is not derived from the standard star FITS file.
//! The [Default] configuration is the SALT RSS calibration at the South African Astronomical Observatory.
//! It can be overridden with a YAML file, e.g.
//! ```yaml
//! observatory: saao
//! standard:
//!   caldir: /data/SALT/std_dat/
//! sensfunc:
//!   order: 7
//! ```

use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    marker::PhantomData,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file {1:?} not found")]
    File(#[source] std::io::Error, PathBuf),
    #[error("configuration cannot be parsed")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
type Result<T> = std::result::Result<T, ConfigError>;

/// `noao.onedspec.standard` parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardConfig {
    /// Flux of a zero magnitude star at 5050Å `[erg/cm²/s/Hz]`
    pub fnuzero: f64,
    /// Extinction table
    pub extinction: String,
    /// Directory of the standard star calibration files
    pub caldir: String,
    /// Bandpass widths `[Å]`, `None` for INDEF
    pub bandwidth: Option<f64>,
    /// Bandpass separation `[Å]`, `None` for INDEF
    pub bandsep: Option<f64>,
    pub samestar: bool,
    pub beam_switch: bool,
    pub apertures: String,
    pub interact: bool,
    pub graphics: String,
}
impl Default for StandardConfig {
    fn default() -> Self {
        Self {
            fnuzero: 3.68e-20,
            extinction: String::from("onedstds$ctioextinct.dat"),
            caldir: String::from("onedstds$ctionewcal/"),
            bandwidth: None,
            bandsep: None,
            samestar: true,
            beam_switch: false,
            apertures: String::new(),
            interact: false,
            graphics: String::from("stdgraph"),
        }
    }
}

/// `noao.onedspec.sensfunc` parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensfuncConfig {
    pub ignoreaps: bool,
    pub logfile: String,
    /// Revised extinction table written by `sensfunc`
    pub newextinction: String,
    /// Fitting function: `chebyshev`, `legendre`, `spline1` or `spline3`
    pub function: String,
    /// Order of the fitting function
    pub order: u32,
    pub interactive: bool,
    pub graphs: String,
    pub marks: String,
    pub colors: String,
    pub device: String,
}
impl Default for SensfuncConfig {
    fn default() -> Self {
        Self {
            ignoreaps: true,
            logfile: String::from("logfile"),
            newextinction: String::from("extinct.dat"),
            function: String::from("spline3"),
            order: 5,
            interactive: false,
            graphs: String::from("sr"),
            marks: String::from("plus cross box"),
            colors: String::from("2 1 3 4"),
            device: String::from("stdgraph"),
        }
    }
}

/// IRAF command language interpreter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrafConfig {
    /// `cl` executable
    pub program: PathBuf,
    /// `cl` command line arguments
    pub args: Vec<String>,
}
impl Default for IrafConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("cl"),
            args: Vec::new(),
        }
    }
}

impl IrafConfig {
    /// Resolves a relative `program` path against `base`
    ///
    /// A bare program name is left to the `PATH` lookup
    pub fn program_from<P: AsRef<Path>>(program: P, base: &Path) -> PathBuf {
        let program = program.as_ref();
        if program.components().count() > 1 {
            rebase(program, base)
        } else {
            program.to_path_buf()
        }
    }
}

/// Returns `path` joined to `base` unless `path` is absolute
pub fn rebase<P: AsRef<Path>>(path: P, base: &Path) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Calibration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// IRAF observatory identifier
    pub observatory: String,
    pub standard: StandardConfig,
    pub sensfunc: SensfuncConfig,
    pub iraf: IrafConfig,
    /// Removes the standard and sensitivity files left by a previous run
    pub clobber: bool,
}
impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            observatory: String::from("saao"),
            standard: Default::default(),
            sensfunc: Default::default(),
            iraf: Default::default(),
            clobber: false,
        }
    }
}
impl CalibrationConfig {
    /// Checks the parameters the IRAF tasks would reject
    pub fn validate(self) -> Result<Self> {
        if self.observatory.trim().is_empty() {
            return Err(ConfigError::Invalid("empty observatory".into()));
        }
        if !(self.standard.fnuzero > 0f64) {
            return Err(ConfigError::Invalid(format!(
                "fnuzero must be positive, found {}",
                self.standard.fnuzero
            )));
        }
        if self.sensfunc.order < 1 {
            return Err(ConfigError::Invalid(
                "the sensitivity function order must be at least 1".into(),
            ));
        }
        Ok(self)
    }
    /// Saves the configuration to the YAML file at `path`
    pub fn dump<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        serde_yaml::to_writer(
            File::create(path).map_err(|e| ConfigError::File(e, path.to_path_buf()))?,
            self,
        )?;
        Ok(())
    }
}

/// Data loader
pub struct Loader<T> {
    path: PathBuf,
    filename: String,
    phantom: PhantomData<T>,
}
impl<T> Loader<T> {
    /// Set the loading path
    pub fn path<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..self
        }
    }
    /// Set the loaded file name
    pub fn filename(self, filename: &str) -> Self {
        Self {
            filename: String::from(filename),
            ..self
        }
    }
    fn file(&self) -> PathBuf {
        self.path.join(&self.filename)
    }
}
impl Default for Loader<CalibrationConfig> {
    /// Default [Loader] for [CalibrationConfig] expecting the file `rss_sens.yaml` in the current folder
    fn default() -> Self {
        Self {
            path: Path::new(".").to_path_buf(),
            filename: String::from("rss_sens.yaml"),
            phantom: PhantomData,
        }
    }
}
impl From<&Path> for Loader<CalibrationConfig> {
    fn from(file: &Path) -> Self {
        let loader = Self::default().path(file.parent().unwrap_or(Path::new(".")));
        match file.file_name() {
            Some(name) => loader.filename(&name.to_string_lossy()),
            None => loader,
        }
    }
}
impl Loader<CalibrationConfig> {
    /// Loads the calibration configuration
    ///
    /// Parameters missing from the file take the SALT values
    pub fn load(self) -> Result<CalibrationConfig> {
        let file = self.file();
        let reader = File::open(&file).map_err(|e| ConfigError::File(e, file.clone()))?;
        let config: CalibrationConfig = serde_yaml::from_reader(reader)?;
        log::info!("calibration configuration loaded from {:?}", file);
        config.validate()
    }
    /// Loads the calibration configuration or returns the SALT configuration if the file does not exist
    pub fn load_or_default(self) -> Result<CalibrationConfig> {
        if self.file().exists() {
            self.load()
        } else {
            log::debug!("{:?} not found, using the SALT configuration", self.file());
            Ok(Default::default())
        }
    }
}
