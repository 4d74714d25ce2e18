//! Writer module (§4.7): the growing-buffer write core plus the file-level
//! specialisations (workout/sport/settings) and the generic fallback.

pub mod core;
pub mod file_id;
pub mod settings;
pub mod sport;
pub mod workout;

pub use core::{FieldSpec, WriterCore};
pub use settings::SettingsWriter;
pub use sport::SportWriter;
pub use workout::{WorkoutStep, WorkoutWriter};

use crate::errors::WriteError;

/// File-type codes used in the `file_id` message's `type` field (§4.7).
pub mod file_type {
    pub const SETTINGS: u8 = 2;
    pub const SPORT: u8 = 3;
    pub const ACTIVITY: u8 = 4;
    pub const WORKOUT: u8 = 5;
}

/// `WriterCore` used directly, with no specialised wrapper (§4.7 supplement).
/// A caller supplies the file-id `type` byte itself and then calls
/// `put_definition`/`put_message` for whatever messages it wants.
pub struct GenericWriter {
    core: WriterCore,
}

impl GenericWriter {
    pub fn new(file_type: u8, time_created: i64) -> Result<Self, WriteError> {
        let mut core = WriterCore::new();
        file_id::write_preamble(&mut core, file_type, time_created)?;
        Ok(GenericWriter { core })
    }

    pub fn core_mut(&mut self) -> &mut WriterCore {
        &mut self.core
    }

    pub fn finalise(self) -> Result<Vec<u8>, WriteError> {
        self.core.finalise()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compute_crc;

    #[test]
    fn generic_writer_emits_valid_crc() {
        let writer = GenericWriter::new(file_type::SETTINGS, 1_000_000_000).unwrap();
        let buf = writer.finalise().unwrap();
        assert_eq!(compute_crc(&buf), 0);
    }
}
