//! Save functionality for trained models.
//!
//! The trainer itself mandates no file format; this serializer consumes a
//! [`TrainedModel`] and writes the conventional two-file layout.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::training::trainer::TrainedModel;
use subvoc_core::{Result, TrainerError};

/// Model saver - writes a trained vocabulary and merge table to disk.
///
/// Produces two files in the target directory:
/// - `vocab.json`: token string -> ID mapping (specials included)
/// - `merges.txt`: merge rules in rank order, one `left right` pair per line
pub struct ModelSaver<'a> {
    /// Trained model reference
    model: &'a TrainedModel,
}

impl<'a> ModelSaver<'a> {
    /// Create a new model saver.
    pub fn new(model: &'a TrainedModel) -> Self {
        Self { model }
    }

    /// Save the model to a directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|err| TrainerError::Io {
            path: path.to_path_buf(),
            err,
        })?;

        self.save_vocab(&path.join("vocab.json"))?;
        self.save_merges(&path.join("merges.txt"))?;

        Ok(())
    }

    /// Write `vocab.json`.
    fn save_vocab(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|err| TrainerError::Io {
            path: path.to_path_buf(),
            err,
        })?;
        let writer = BufWriter::new(file);

        // BTreeMap keeps the file stable across runs.
        let vocab: BTreeMap<String, u32> = self
            .model
            .vocab
            .vocab
            .iter()
            .map(|(token, &id)| (token.to_string(), id))
            .collect();

        serde_json::to_writer_pretty(writer, &vocab)?;
        Ok(())
    }

    /// Write `merges.txt` in rank order.
    fn save_merges(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|err| TrainerError::Io {
            path: path.to_path_buf(),
            err,
        })?;
        let mut writer = BufWriter::new(file);

        for (pair, _rank, _new_id) in self.model.merges.ordered() {
            let left = self
                .model
                .vocab
                .get_token(pair.0)
                .ok_or_else(|| TrainerError::Save(format!("merge references unknown ID {}", pair.0)))?;
            let right = self
                .model
                .vocab
                .get_token(pair.1)
                .ok_or_else(|| TrainerError::Save(format!("merge references unknown ID {}", pair.1)))?;

            writeln!(writer, "{} {}", left, right).map_err(|err| TrainerError::Io {
                path: path.to_path_buf(),
                err,
            })?;
        }

        Ok(())
    }
}
