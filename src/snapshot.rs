use crate::{error::CoreError, gameboy::GameBoy};

/// Save-state collaborator. The format is entirely up to the implementation;
/// the core only hands over the machine.
pub trait StateSerializer: Send {
    fn serialize(&self, gb: &GameBoy) -> Vec<u8>;

    /// Restore `bytes` into `gb`. On error `gb` must be left untouched.
    fn deserialize(&self, bytes: &[u8], gb: &mut GameBoy) -> Result<(), CoreError>;
}
