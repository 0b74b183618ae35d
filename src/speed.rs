use log::debug;

/// CGB double-speed controller (KEY1, FF4D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeedSwitch {
    pub fast_mode: bool,
    pub prepared: bool,
    cgb_mode: bool,
}

impl SpeedSwitch {
    pub fn new(cgb: bool) -> Self {
        Self {
            fast_mode: false,
            prepared: false,
            cgb_mode: cgb,
        }
    }

    pub fn read(&self) -> u8 {
        if !self.cgb_mode {
            return 0xFF;
        }
        (self.fast_mode as u8) << 7 | 0x7E | self.prepared as u8
    }

    pub fn write(&mut self, val: u8) {
        if self.cgb_mode {
            self.prepare(val & 0x01 != 0);
        }
    }

    pub fn prepare(&mut self, armed: bool) {
        self.prepared = armed;
    }

    /// Perform a prepared switch. Called when STOP is left.
    pub fn commit(&mut self) {
        if self.prepared {
            self.prepared = false;
            self.fast_mode = !self.fast_mode;
            debug!("speed switch: fast_mode={}", self.fast_mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_toggles_once() {
        let mut sw = SpeedSwitch::new(true);
        sw.write(0x01);
        assert_eq!(sw.read(), 0x7F);
        sw.commit();
        assert!(sw.fast_mode);
        assert!(!sw.prepared);
        sw.commit();
        assert!(sw.fast_mode);
        assert_eq!(sw.read(), 0xFE);
    }

    #[test]
    fn dmg_ignores_key1() {
        let mut sw = SpeedSwitch::new(false);
        sw.write(0x01);
        sw.commit();
        assert!(!sw.fast_mode);
        assert_eq!(sw.read(), 0xFF);
    }
}
