//! Standard star FITS header
//!
//! The standard star name, the airmass and the exposure time are read from the primary HDU
//! keywords `OBJECT`, `AIRMASS` and `EXPTIME`.

use fitrs::{Fits, HeaderValue};
use std::{
    fmt::Display,
    fs::File,
    io::{BufReader, ErrorKind, Read},
    path::{Path, PathBuf},
};

/// FITS block size in bytes
const BLOCK: usize = 2880;
/// FITS header card size in bytes
const CARD: usize = 80;

#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("FITS file {1:?} cannot be opened")]
    Open(#[source] std::io::Error, PathBuf),
    #[error("{0:?} is not a FITS file")]
    NotFits(PathBuf),
    #[error("keyword {0} is missing from the primary header")]
    MissingKeyword(&'static str),
    #[error("keyword {0} value cannot be read")]
    UnreadableKeyword(&'static str),
    #[error("keyword {key} is not a {expected}")]
    KeywordType {
        key: &'static str,
        expected: &'static str,
    },
}
type Result<T> = std::result::Result<T, HeaderError>;

/// Standard star observation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct StarHeader {
    /// Standard star name (`OBJECT`)
    pub object: String,
    /// Airmass at the time of the observation (`AIRMASS`)
    pub airmass: f64,
    /// Exposure time in seconds (`EXPTIME`)
    pub exptime: f64,
}
impl Display for StarHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (airmass: {}, exposure: {}s)",
            self.object, self.airmass, self.exptime
        )
    }
}

impl StarHeader {
    /// Reads the standard star parameters from the primary header of the FITS file at `path`
    pub fn from_fits<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let keywords = verify(path)?;
        let fits = Fits::open(path).map_err(|e| HeaderError::Open(e, path.to_path_buf()))?;
        let hdu = fits
            .get(0)
            .ok_or_else(|| HeaderError::NotFits(path.to_path_buf()))?;
        match hdu.value("SIMPLE") {
            Some(HeaderValue::Logical(true)) => (),
            _ => return Err(HeaderError::NotFits(path.to_path_buf())),
        }
        let header = Self {
            object: string(hdu.value("OBJECT"), &keywords, "OBJECT")?,
            airmass: real(hdu.value("AIRMASS"), &keywords, "AIRMASS")?,
            exptime: real(hdu.value("EXPTIME"), &keywords, "EXPTIME")?,
        };
        log::debug!("{:?}: {}", path, header);
        Ok(header)
    }
}

/// Checks that the file starts with the `SIMPLE` card and returns the keywords of the primary header
fn verify(path: &Path) -> Result<Vec<String>> {
    let open_error = |e| HeaderError::Open(e, path.to_path_buf());
    let mut reader = BufReader::new(File::open(path).map_err(open_error)?);
    let mut block = [0u8; BLOCK];
    let mut keywords = Vec::new();
    loop {
        match reader.read_exact(&mut block) {
            Ok(()) => (),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(HeaderError::NotFits(path.to_path_buf()))
            }
            Err(e) => return Err(open_error(e)),
        }
        if keywords.is_empty() && !block.starts_with(b"SIMPLE  =") {
            return Err(HeaderError::NotFits(path.to_path_buf()));
        }
        for card in block.chunks(CARD) {
            let keyword = String::from_utf8_lossy(&card[..8]).trim_end().to_string();
            if keyword == "END" {
                return Ok(keywords);
            }
            keywords.push(keyword);
        }
    }
}

/// Error for a keyword `fitrs` did not return
fn absent(keywords: &[String], key: &'static str) -> HeaderError {
    if keywords.iter().any(|keyword| keyword == key) {
        HeaderError::UnreadableKeyword(key)
    } else {
        HeaderError::MissingKeyword(key)
    }
}

fn string(
    value: Option<&HeaderValue>,
    keywords: &[String],
    key: &'static str,
) -> Result<String> {
    match value {
        Some(HeaderValue::CharacterString(value)) => Ok(value.trim().to_string()),
        Some(_) => Err(HeaderError::KeywordType {
            key,
            expected: "string",
        }),
        None => Err(absent(keywords, key)),
    }
}

fn real(value: Option<&HeaderValue>, keywords: &[String], key: &'static str) -> Result<f64> {
    match value {
        Some(HeaderValue::RealFloatingNumber(value)) => Ok(*value),
        Some(HeaderValue::IntegerNumber(value)) => Ok(*value as f64),
        Some(_) => Err(HeaderError::KeywordType {
            key,
            expected: "number",
        }),
        None => Err(absent(keywords, key)),
    }
}
