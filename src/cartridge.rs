use std::{fs, path::Path};

use crate::error::CoreError;

/// Smallest image that still contains a full header.
const HEADER_END: usize = 0x150;

/// Bank-switching collaborator for 0000-7FFF and A000-BFFF.
///
/// The core routes every access in those windows through this trait and has
/// no knowledge of the banking policy behind it.
pub trait MemoryBankController: Send {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, val: u8);
    /// External RAM as a flat image, for battery saves.
    fn ram(&self) -> &[u8];
    fn ram_mut(&mut self) -> &mut [u8];
}

/// Cartridge without a mapper: 32 KiB of ROM and up to 8 KiB of RAM.
#[derive(Debug, Clone)]
pub struct Cartridge {
    pub rom: Vec<u8>,
    pub ram: Vec<u8>,
    pub cgb: bool,
    pub title: String,
}

fn ram_size_from_code(code: u8) -> usize {
    match code {
        0x01 => 2 * 1024,
        0x02 => 8 * 1024,
        0x03 => 32 * 1024,
        0x04 => 128 * 1024,
        0x05 => 64 * 1024,
        _ => 0,
    }
}

impl Cartridge {
    /// Build a cartridge from a ROM image, sizing RAM from header byte 0x149.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, CoreError> {
        if data.len() < HEADER_END {
            return Err(CoreError::RomTooSmall(data.len()));
        }
        let ram_size = ram_size_from_code(data[0x149]);
        Ok(Self::from_bytes_with_ram(data, ram_size))
    }

    /// Build a cartridge with an explicit RAM size, ignoring the header.
    pub fn from_bytes_with_ram(data: Vec<u8>, ram_size: usize) -> Self {
        let cgb = data.get(0x143).is_some_and(|flag| flag & 0x80 != 0);
        let title_end = if cgb { 0x13F } else { 0x144 };
        let title = data
            .get(0x134..title_end.min(data.len()))
            .map(|raw| {
                let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                String::from_utf8_lossy(&raw[..end]).into_owned()
            })
            .unwrap_or_default();
        Self {
            rom: data,
            ram: vec![0; ram_size],
            cgb,
            title,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }
}

impl MemoryBankController for Cartridge {
    fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.rom.get(addr as usize).copied().unwrap_or(0xFF),
            0xA000..=0xBFFF => self
                .ram
                .get((addr - 0xA000) as usize)
                .copied()
                .unwrap_or(0xFF),
            _ => 0xFF,
        }
    }

    fn write(&mut self, addr: u16, val: u8) {
        if let 0xA000..=0xBFFF = addr
            && let Some(slot) = self.ram.get_mut((addr - 0xA000) as usize)
        {
            *slot = val;
        }
    }

    fn ram(&self) -> &[u8] {
        &self.ram
    }

    fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }
}
