//! Job descriptions for basis calculations, read from JSON.
//!
//! ```
//! use fghbasis::config::FghJob;
//!
//! let job: FghJob = serde_json::from_str(r#"{
//!     "mass": 918.07635,
//!     "r_list": { "r_min": 0.5, "r_max": 6.0, "r_step": 0.01 },
//!     "levels": 10,
//!     "quantum": { "J": 0, "v": 0, "n": 0, "j": 0, "l": 0, "p": 1, "c": 0, "spin_mult": 1 }
//! }"#).unwrap();
//! job.validate().unwrap();
//! assert_eq!(job.grid().unwrap().point_count(), 551);
//! ```

use std::{ fs, path::Path };
use serde::{ Deserialize, Serialize };
use crate::{
    basis::QuantumNumbers,
    error::{ ConfigError, GridError },
    grid::{ Grid, RList },
};

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Everything needed to turn a potential into stored basis entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FghJob {
    /// Mass parameter passed to the Hamiltonian builder.
    pub mass: f64,
    /// Grid the potential is sampled on.
    pub r_list: RList,
    /// Number of lowest eigenpairs to keep.
    pub levels: usize,
    /// Quantum numbers stamped on every entry; `v` is overwritten with the
    /// level index.
    #[serde(default)]
    pub quantum: QuantumNumbers,
}

impl FghJob {
    /// Load and validate a job from a JSON file.
    pub fn from_json_file<P>(path: P) -> ConfigResult<Self>
    where P: AsRef<Path>
    {
        let text = fs::read_to_string(path)?;
        let job: Self = serde_json::from_str(&text)?;
        job.validate()?;
        Ok(job)
    }

    /// Check the mass and grid.
    pub fn validate(&self) -> Result<(), GridError> {
        GridError::check_mass(self.mass)?;
        self.r_list.validate()
    }

    /// The grid described by `r_list`.
    pub fn grid(&self) -> Result<Grid, GridError> { self.r_list.grid() }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use super::*;

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "mass": 2.0, "r_list": {{ "r_min": 1.0, "r_max": 2.0, "r_step": 0.5 }}, "levels": 3 }}"#,
        ).unwrap();
        let job = FghJob::from_json_file(file.path()).unwrap();
        assert_eq!(job.levels, 3);
        assert_eq!(job.quantum, QuantumNumbers::default());
        assert_eq!(job.grid().unwrap().point_count(), 3);
    }

    #[test]
    fn invalid_jobs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "mass": -1.0, "r_list": {{ "r_min": 1.0, "r_max": 2.0, "r_step": 0.5 }}, "levels": 3 }}"#,
        ).unwrap();
        assert!(matches!(
            FghJob::from_json_file(file.path()),
            Err(ConfigError::Grid(GridError::BadMass(_))),
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"mass\": 1.0 }}").unwrap();
        assert!(matches!(FghJob::from_json_file(file.path()), Err(ConfigError::Json(_))));

        assert!(matches!(
            FghJob::from_json_file("/nonexistent/job.json"),
            Err(ConfigError::Io(_)),
        ));
    }

    #[test]
    fn json_roundtrip() {
        let job = FghJob {
            mass: 1.5,
            r_list: RList::new(0.1, 0.9, 0.1),
            levels: 4,
            quantum: QuantumNumbers { J: 2, p: -1, spin_mult: 3, ..Default::default() },
        };
        let text = serde_json::to_string(&job).unwrap();
        let back: FghJob = serde_json::from_str(&text).unwrap();
        assert_eq!(job, back);
    }
}
