//! IRAF `noao.onedspec` tasks
//!
//! [Standard] and [Sensfunc] hold the full parameter lists of the IRAF tasks
//! and render them as IRAF command language (CL) statements.
//! The tasks are run by an implementation of the [Onedspec] toolkit interface.

use crate::{config::CalibrationConfig, StarHeader};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum ToolkitError {
    #[error("failed to start IRAF {1:?}")]
    Spawn(#[source] std::io::Error, PathBuf),
    #[error("failed to send the CL script to IRAF")]
    Stdin(#[source] std::io::Error),
    #[error("IRAF exited with status {code:?} while running {task}")]
    Status { task: &'static str, code: Option<i32> },
    #[error("IRAF {task}: {message}")]
    Task { task: &'static str, message: String },
}
pub type Result<T> = std::result::Result<T, ToolkitError>;

/// IRAF CL parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Str(String),
    Bool(bool),
    Int(i64),
    Real(f64),
    /// IRAF undefined value
    Indef,
}
impl Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Param::Str(value) => write!(f, "\"{}\"", value.replace('"', "\\\"")),
            Param::Bool(true) => write!(f, "yes"),
            Param::Bool(false) => write!(f, "no"),
            Param::Int(value) => write!(f, "{value}"),
            Param::Real(value) => write!(f, "{value:?}"),
            Param::Indef => write!(f, "INDEF"),
        }
    }
}
impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Str(value.to_string())
    }
}
impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Param::Str(value.clone())
    }
}
impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}
impl From<u32> for Param {
    fn from(value: u32) -> Self {
        Param::Int(value as i64)
    }
}
impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Real(value)
    }
}
impl From<Option<f64>> for Param {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Param::Indef, Param::Real)
    }
}

/// Renders `task` with `params` as a CL statement
fn statement(task: &str, params: &[(&str, Param)]) -> String {
    params
        .iter()
        .fold(String::from(task), |cl, (name, value)| {
            format!("{cl} {name}={value}")
        })
}

/// `noao.onedspec.standard` task
///
/// Creates the standard file `output` from the standard star spectrum `input`
#[derive(Debug, Clone)]
pub struct Standard {
    pub input: String,
    pub output: String,
    pub header: StarHeader,
    pub observatory: String,
    pub config: crate::config::StandardConfig,
}
impl Standard {
    pub const TASK: &'static str = "standard";
    pub fn new(
        input: &str,
        output: &str,
        header: StarHeader,
        config: &CalibrationConfig,
    ) -> Self {
        Self {
            input: input.to_string(),
            output: output.to_string(),
            header,
            observatory: config.observatory.clone(),
            config: config.standard.clone(),
        }
    }
    /// Returns the task parameters in the IRAF parameter file order
    pub fn params(&self) -> Vec<(&'static str, Param)> {
        let config = &self.config;
        vec![
            ("input", (&self.input).into()),
            ("output", (&self.output).into()),
            ("samestar", config.samestar.into()),
            ("beam_switch", config.beam_switch.into()),
            ("apertures", (&config.apertures).into()),
            ("bandwidth", config.bandwidth.into()),
            ("bandsep", config.bandsep.into()),
            ("fnuzero", config.fnuzero.into()),
            ("extinction", (&config.extinction).into()),
            ("caldir", (&config.caldir).into()),
            ("observatory", (&self.observatory).into()),
            ("interact", config.interact.into()),
            ("graphics", (&config.graphics).into()),
            ("cursor", "".into()),
            ("star_name", (&self.header.object).into()),
            ("airmass", self.header.airmass.into()),
            ("exptime", self.header.exptime.into()),
            ("answer", true.into()),
            ("mode", "ql".into()),
        ]
    }
    /// Returns the CL statement
    pub fn to_cl(&self) -> String {
        statement(Self::TASK, &self.params())
    }
}

/// `noao.onedspec.sensfunc` task
///
/// Fits the sensitivity function `sensitivity` to the standard file `standards`
#[derive(Debug, Clone)]
pub struct Sensfunc {
    pub standards: String,
    pub sensitivity: String,
    pub observatory: String,
    pub config: crate::config::SensfuncConfig,
}
impl Sensfunc {
    pub const TASK: &'static str = "sensfunc";
    pub fn new(standards: &str, sensitivity: &str, config: &CalibrationConfig) -> Self {
        Self {
            standards: standards.to_string(),
            sensitivity: sensitivity.to_string(),
            observatory: config.observatory.clone(),
            config: config.sensfunc.clone(),
        }
    }
    /// Returns the task parameters in the IRAF parameter file order
    pub fn params(&self) -> Vec<(&'static str, Param)> {
        let config = &self.config;
        vec![
            ("standards", (&self.standards).into()),
            ("sensitivity", (&self.sensitivity).into()),
            ("ignoreaps", config.ignoreaps.into()),
            ("logfile", (&config.logfile).into()),
            ("newextinction", (&config.newextinction).into()),
            ("observatory", (&self.observatory).into()),
            ("function", (&config.function).into()),
            ("order", config.order.into()),
            ("interactive", config.interactive.into()),
            ("graphs", (&config.graphs).into()),
            ("marks", (&config.marks).into()),
            ("colors", (&config.colors).into()),
            ("cursor", "".into()),
            ("device", (&config.device).into()),
            ("answer", true.into()),
            ("mode", "ql".into()),
        ]
    }
    /// Returns the CL statement
    pub fn to_cl(&self) -> String {
        statement(Self::TASK, &self.params())
    }
}

/// One dimensional spectroscopy toolkit interface
///
/// The tasks read and write their files relative to the working directory `dir`
pub trait Onedspec {
    /// Runs the `standard` task
    fn standard(&mut self, dir: &Path, task: &Standard) -> Result<()>;
    /// Runs the `sensfunc` task
    fn sensfunc(&mut self, dir: &Path, task: &Sensfunc) -> Result<()>;
    /// Returns `true` if the toolkit writes the task output files
    fn writes_outputs(&self) -> bool {
        true
    }
}

/// Toolkit that prints the CL statements instead of running them
#[derive(Debug, Default)]
pub struct DryRun {
    script: Vec<String>,
}
impl DryRun {
    pub fn new() -> Self {
        Default::default()
    }
    /// Returns the CL statements of the tasks run so far
    pub fn script(&self) -> &[String] {
        &self.script
    }
    fn push(&mut self, dir: &Path, cl: String) {
        println!("{}> {}", dir.display(), cl);
        self.script.push(cl);
    }
}
impl Onedspec for DryRun {
    fn standard(&mut self, dir: &Path, task: &Standard) -> Result<()> {
        self.push(dir, task.to_cl());
        Ok(())
    }
    fn sensfunc(&mut self, dir: &Path, task: &Sensfunc) -> Result<()> {
        self.push(dir, task.to_cl());
        Ok(())
    }
    fn writes_outputs(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> StarHeader {
        StarHeader {
            object: String::from("BD+25"),
            airmass: 1.2,
            exptime: 300.,
        }
    }

    #[test]
    fn standard_cl() {
        let task = Standard::new(
            "star.fits",
            "std_star.fits",
            header(),
            &CalibrationConfig::default(),
        );
        assert_eq!(
            task.to_cl(),
            "standard input=\"star.fits\" output=\"std_star.fits\" samestar=yes beam_switch=no \
             apertures=\"\" bandwidth=INDEF bandsep=INDEF fnuzero=3.68e-20 \
             extinction=\"onedstds$ctioextinct.dat\" caldir=\"onedstds$ctionewcal/\" \
             observatory=\"saao\" interact=no graphics=\"stdgraph\" cursor=\"\" \
             star_name=\"BD+25\" airmass=1.2 exptime=300.0 answer=yes mode=\"ql\""
        );
    }

    #[test]
    fn sensfunc_cl() {
        let task = Sensfunc::new("std_star.fits", "sens_star.fits", &CalibrationConfig::default());
        assert_eq!(
            task.to_cl(),
            "sensfunc standards=\"std_star.fits\" sensitivity=\"sens_star.fits\" ignoreaps=yes \
             logfile=\"logfile\" newextinction=\"extinct.dat\" observatory=\"saao\" \
             function=\"spline3\" order=5 interactive=no graphs=\"sr\" marks=\"plus cross box\" \
             colors=\"2 1 3 4\" cursor=\"\" device=\"stdgraph\" answer=yes mode=\"ql\""
        );
    }

    #[test]
    fn quoted_star_name() {
        let mut header = header();
        header.object = String::from("HD \"49798\"");
        let task = Standard::new("a.fits", "std_a.fits", header, &Default::default());
        assert!(task.to_cl().contains("star_name=\"HD \\\"49798\\\"\""));
    }

    #[test]
    fn dry_run() {
        let mut toolkit = DryRun::new();
        let config = CalibrationConfig::default();
        toolkit
            .standard(
                Path::new("."),
                &Standard::new("a.fits", "std_a.fits", header(), &config),
            )
            .unwrap();
        toolkit
            .sensfunc(Path::new("."), &Sensfunc::new("std_a.fits", "sens_a.fits", &config))
            .unwrap();
        assert_eq!(toolkit.script().len(), 2);
        assert!(toolkit.script()[0].starts_with("standard "));
        assert!(toolkit.script()[1].starts_with("sensfunc "));
        assert!(!toolkit.writes_outputs());
    }
}
