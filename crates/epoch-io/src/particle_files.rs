// ─────────────────────────────────────────────────────────────────────
// EPOCH Particle Generator — Particle Files
// License: MIT
// ─────────────────────────────────────────────────────────────────────
//! Raw particle files read by EPOCH.
//!
//! One file per coordinate axis (`x_data.dat`, `y_data.dat`, `z_data.dat`)
//! plus `w_data.dat` for weights. Each is a headerless run of native-endian
//! f64 values in emission order; the i-th value of every file belongs to
//! particle i.

use epoch_core::particles::ParticleBatch;
use epoch_types::defaults::AXIS_NAMES;
use epoch_types::error::{EpochError, EpochResult};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const F64_BYTES: usize = std::mem::size_of::<f64>();

/// Weight file name.
pub const WEIGHT_FILE: &str = "w_data.dat";

/// Coordinate file name for `axis` (0 = x).
pub fn axis_file_name(axis: usize) -> String {
    format!("{}_data.dat", AXIS_NAMES[axis])
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_values(path: &Path, values: &[f64]) -> EpochResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytemuck::cast_slice(values))?;
    writer.flush()?;
    Ok(())
}

/// Write coordinate and weight files for `batch` into `dir`.
///
/// Every file is first written to a `.tmp` sibling; final names appear only
/// once all files were written successfully. Returns the final paths.
pub fn write_particle_files<const D: usize>(
    batch: &ParticleBatch<D>,
    dir: &Path,
) -> EpochResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(EpochError::ConfigError(format!(
            "Proposed output directory '{}' does not exist.",
            dir.display()
        )));
    }

    let mut columns: Vec<(PathBuf, Vec<f64>)> = (0..D)
        .map(|axis| (dir.join(axis_file_name(axis)), batch.axis_values(axis).to_vec()))
        .collect();
    columns.push((dir.join(WEIGHT_FILE), batch.weights().to_vec()));

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(columns.len());
    for (path, values) in &columns {
        let tmp = temp_sibling(path);
        if let Err(e) = write_values(&tmp, values) {
            fs::remove_file(&tmp).ok();
            for (written, _) in &staged {
                fs::remove_file(written).ok();
            }
            return Err(e);
        }
        debug!("Staged {} value(s) in {}", values.len(), tmp.display());
        staged.push((tmp, path.clone()));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        fs::rename(&tmp, &path)?;
        written.push(path);
    }
    info!(
        "Wrote {} particle(s) to {} file(s) in {}",
        batch.len(),
        written.len(),
        dir.display()
    );
    Ok(written)
}

fn read_values(path: &Path) -> EpochResult<Vec<f64>> {
    let bytes = fs::read(path)?;
    if bytes.len() % F64_BYTES != 0 {
        return Err(EpochError::ConfigError(format!(
            "{} holds {} byte(s), not a whole number of f64 values",
            path.display(),
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(F64_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; F64_BYTES];
            raw.copy_from_slice(chunk);
            f64::from_ne_bytes(raw)
        })
        .collect())
}

/// Particle positions and weights read back from `dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredParticles<const D: usize> {
    pub positions: Vec<[f64; D]>,
    pub weights: Vec<f64>,
}

/// Read the files written by [`write_particle_files`].
pub fn read_particle_files<const D: usize>(dir: &Path) -> EpochResult<StoredParticles<D>> {
    let weights = read_values(&dir.join(WEIGHT_FILE))?;
    let mut columns = Vec::with_capacity(D);
    for axis in 0..D {
        let path = dir.join(axis_file_name(axis));
        let values = read_values(&path)?;
        if values.len() != weights.len() {
            return Err(EpochError::ConfigError(format!(
                "{} holds {} value(s) but {} holds {}",
                path.display(),
                values.len(),
                WEIGHT_FILE,
                weights.len()
            )));
        }
        columns.push(values);
    }
    let positions = (0..weights.len())
        .map(|i| std::array::from_fn(|axis| columns[axis][i]))
        .collect();
    Ok(StoredParticles { positions, weights })
}
