//! CLI commands for the subvoc trainer.

pub mod train;

pub use train::TrainCommand;
