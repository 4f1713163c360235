//! Payload file: hands the initial arrays to a viewer running in another
//! process.
//!
//! The file is JSON. Values are stored as IEEE-754 bit patterns so NaN,
//! infinities and signed zeros survive the trip unchanged:
//!
//! ```json
//! { "version": 1, "arrays": [ { "title": "A", "shape": [t, h, w], "bits": [..] } ] }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewerError};

pub const PAYLOAD_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Payload {
    pub version: u32,
    pub arrays: Vec<PayloadArray>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayloadArray {
    pub title: String,
    pub shape: Vec<usize>,
    /// `f32::to_bits` of every value, C order.
    pub bits: Vec<u32>,
}

impl PayloadArray {
    fn from_array(array: &ArrayD<f32>, title: &str) -> Self {
        Self {
            title: title.to_string(),
            shape: array.shape().to_vec(),
            bits: array.iter().map(|v| v.to_bits()).collect(),
        }
    }

    fn into_array(self) -> Result<(ArrayD<f32>, String)> {
        let expected: usize = self.shape.iter().product();
        if expected != self.bits.len() {
            return Err(ViewerError::Payload(format!(
                "'{}' has shape {:?} but {} values",
                self.title,
                self.shape,
                self.bits.len()
            )));
        }
        let values: Vec<f32> = self.bits.into_iter().map(f32::from_bits).collect();
        let array = ArrayD::from_shape_vec(IxDyn(&self.shape), values)
            .map_err(|e| ViewerError::Payload(format!("'{}': {}", self.title, e)))?;
        Ok((array, self.title))
    }
}

impl Payload {
    pub fn new(arrays: &[ArrayD<f32>], titles: &[String]) -> Self {
        Self {
            version: PAYLOAD_VERSION,
            arrays: arrays
                .iter()
                .zip(titles)
                .map(|(array, title)| PayloadArray::from_array(array, title))
                .collect(),
        }
    }

    /// Split back into arrays and titles.
    pub fn into_arrays(self) -> Result<(Vec<ArrayD<f32>>, Vec<String>)> {
        if self.version != PAYLOAD_VERSION {
            return Err(ViewerError::Payload(format!(
                "unsupported version {} (expected {})",
                self.version, PAYLOAD_VERSION
            )));
        }
        let mut arrays = Vec::with_capacity(self.arrays.len());
        let mut titles = Vec::with_capacity(self.arrays.len());
        for entry in self.arrays {
            let (array, title) = entry.into_array()?;
            arrays.push(array);
            titles.push(title);
        }
        Ok((arrays, titles))
    }
}

/// Write `arrays` into a fresh payload file inside `dir` (system temp dir
/// when `None`). Returns the file path.
pub fn write_payload(arrays: &[ArrayD<f32>], titles: &[String], dir: Option<&Path>) -> Result<PathBuf> {
    let dir = dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
    let path = dir.join(format!("stackview-{}.json", uuid::Uuid::new_v4()));

    write_or_remove(&path, |writer| {
        serde_json::to_writer(&mut *writer, &Payload::new(arrays, titles))?;
        Ok(())
    })?;

    debug!("Payload with {} array(s) written to {}", arrays.len(), path.display());
    Ok(path)
}

/// Create `path` and fill it with `write`. On any failure the partial file
/// is deleted before the error is returned.
fn write_or_remove<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    let written = write(&mut writer).and_then(|()| writer.flush().map_err(ViewerError::from));
    drop(writer);
    if written.is_err()
        && let Err(rm) = std::fs::remove_file(path)
    {
        warn!("Could not delete partial payload {}: {}", path.display(), rm);
    }
    written
}

/// Read a payload file, leaving it in place.
pub fn read_payload(path: &Path) -> Result<(Vec<ArrayD<f32>>, Vec<String>)> {
    let reader = BufReader::new(File::open(path)?);
    let payload: Payload = serde_json::from_reader(reader)?;
    payload.into_arrays()
}

/// Read a payload file and delete it. A failed delete is only logged.
pub fn take_payload(path: &Path) -> Result<(Vec<ArrayD<f32>>, Vec<String>)> {
    let contents = read_payload(path)?;
    if let Err(e) = std::fs::remove_file(path) {
        warn!("Could not delete payload {}: {}", path.display(), e);
    }
    Ok(contents)
}
