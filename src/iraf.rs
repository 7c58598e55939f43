//! IRAF command language interpreter
//!
//! [IrafCl] runs the `noao.onedspec` tasks by piping a CL script into the IRAF `cl` program.
//! The `cl` exit status is zero even when a task fails, so its output is scanned for IRAF `ERROR` messages.

use crate::{
    config::IrafConfig,
    onedspec::{Onedspec, Result, Sensfunc, Standard, ToolkitError},
};
use std::{
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

/// IRAF `cl` toolkit
#[derive(Debug, Clone)]
pub struct IrafCl {
    program: PathBuf,
    args: Vec<String>,
}
impl Default for IrafCl {
    fn default() -> Self {
        Self::new(&Default::default())
    }
}
impl IrafCl {
    pub fn new(config: &IrafConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
    /// Returns the CL script loading the `noao.onedspec` package and running `statement`
    pub fn script(statement: &str) -> String {
        format!("noao\nonedspec\n{statement}\nlogout\n")
    }
    fn run(&self, dir: &Path, task: &'static str, statement: String) -> Result<()> {
        let script = Self::script(&statement);
        log::debug!("{:?} script:\n{}", self.program, script);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ToolkitError::Spawn(e, self.program.clone()))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(script.as_bytes())
                .map_err(ToolkitError::Stdin)?;
        }
        let output = child.wait_with_output().map_err(ToolkitError::Stdin)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        stdout
            .lines()
            .chain(stderr.lines())
            .for_each(|line| log::debug!("{task}: {line}"));
        if !output.status.success() {
            return Err(ToolkitError::Status {
                task,
                code: output.status.code(),
            });
        }
        if let Some(message) = stdout
            .lines()
            .chain(stderr.lines())
            .find(|line| line.trim_start().starts_with("ERROR"))
        {
            return Err(ToolkitError::Task {
                task,
                message: message.trim().to_string(),
            });
        }
        Ok(())
    }
}
impl Onedspec for IrafCl {
    fn standard(&mut self, dir: &Path, task: &Standard) -> Result<()> {
        self.run(dir, Standard::TASK, task.to_cl())
    }
    fn sensfunc(&mut self, dir: &Path, task: &Sensfunc) -> Result<()> {
        self.run(dir, Sensfunc::TASK, task.to_cl())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::{CalibrationConfig, StarHeader};

    /// Writes a shell script standing in for `cl`
    fn fake_cl(dir: &Path, body: &str) -> IrafConfig {
        let script = dir.join("cl.sh");
        std::fs::write(&script, format!("{body}\n")).unwrap();
        IrafConfig {
            program: PathBuf::from("/bin/sh"),
            args: vec![script.to_string_lossy().into_owned()],
        }
    }

    fn standard() -> Standard {
        Standard::new(
            "star.fits",
            "std_star.fits",
            StarHeader {
                object: String::from("BD+25"),
                airmass: 1.2,
                exptime: 300.,
            },
            &CalibrationConfig::default(),
        )
    }

    #[test]
    fn script_to_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let config = fake_cl(dir.path(), "cat > script.cl");
        IrafCl::new(&config)
            .standard(dir.path(), &standard())
            .unwrap();
        let script = std::fs::read_to_string(dir.path().join("script.cl")).unwrap();
        assert_eq!(script, IrafCl::script(&standard().to_cl()));
    }

    #[test]
    fn iraf_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = fake_cl(
            dir.path(),
            "cat > /dev/null\necho 'ERROR: Cannot open image (star.fits)'",
        );
        match IrafCl::new(&config).standard(dir.path(), &standard()) {
            Err(ToolkitError::Task { task, message }) => {
                assert_eq!(task, "standard");
                assert_eq!(message, "ERROR: Cannot open image (star.fits)");
            }
            other => panic!("expected an IRAF error, got {other:?}"),
        }
    }

    #[test]
    fn exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let config = fake_cl(dir.path(), "cat > /dev/null\nexit 3");
        assert!(matches!(
            IrafCl::new(&config).sensfunc(
                dir.path(),
                &Sensfunc::new("std_star.fits", "sens_star.fits", &Default::default())
            ),
            Err(ToolkitError::Status {
                task: "sensfunc",
                code: Some(3)
            })
        ));
    }

    #[test]
    fn no_cl() {
        let dir = tempfile::tempdir().unwrap();
        let config = IrafConfig {
            program: dir.path().join("missing-cl"),
            args: vec![],
        };
        assert!(matches!(
            IrafCl::new(&config).standard(dir.path(), &standard()),
            Err(ToolkitError::Spawn(..))
        ));
    }
}
