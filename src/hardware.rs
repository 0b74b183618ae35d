use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Hardware variant being emulated.
///
/// The CGB adds double-speed mode, the fast serial clock, banked WRAM/VRAM
/// and the IR port; everything else is shared.
pub enum Model {
    #[default]
    Dmg,
    Cgb,
}

// Post-boot CPU state from gbdev.io/pandocs/Power_Up_State.html
const DMG_BOOT_AF: u16 = 0x01B0;
const DMG_BOOT_BC: u16 = 0x0013;
const DMG_BOOT_DE: u16 = 0x00D8;
const DMG_BOOT_HL: u16 = 0x014D;

const CGB_BOOT_AF: u16 = 0x1180;
const CGB_BOOT_BC: u16 = 0x0000;
const CGB_BOOT_DE: u16 = 0xFF56;
const CGB_BOOT_HL: u16 = 0x000D;

pub const BOOT_PC: u16 = 0x0100;
pub const BOOT_SP: u16 = 0xFFFE;

/// DIV phase observed right after the boot ROM hands over.
pub const BOOT_DIV: u16 = 0xABCC;

impl Model {
    #[inline]
    pub const fn is_cgb(self) -> bool {
        matches!(self, Model::Cgb)
    }

    /// AF, BC, DE, HL after the boot ROM.
    pub const fn boot_registers(self) -> [u16; 4] {
        match self {
            Model::Dmg => [DMG_BOOT_AF, DMG_BOOT_BC, DMG_BOOT_DE, DMG_BOOT_HL],
            Model::Cgb => [CGB_BOOT_AF, CGB_BOOT_BC, CGB_BOOT_DE, CGB_BOOT_HL],
        }
    }
}
