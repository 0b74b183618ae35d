use tickboy::interrupts::InterruptLines;
use tickboy::serial::Serial;

#[test]
fn internal_clock_transfer_shifts_in_ones() {
    let mut serial = Serial::new(false);
    let mut irq = InterruptLines::new();
    serial.write(0xFF01, 0x00);
    serial.write(0xFF02, 0x81);

    serial.step(512, &mut irq);
    assert_eq!(serial.data, 0x01);
    assert_eq!(serial.bits_transferred, 1);

    serial.step(512 * 6, &mut irq);
    assert!(!irq.serial_pending);
    serial.step(511, &mut irq);
    assert!(!irq.serial_pending);
    serial.advance(&mut irq);

    assert_eq!(serial.data, 0xFF);
    assert!(irq.serial_pending);
    assert!(serial.start);
    assert_eq!((serial.clock, serial.bits_transferred), (0, 0));
}

#[test]
fn completed_transfer_keeps_shifting_until_start_cleared() {
    let mut serial = Serial::new(false);
    let mut irq = InterruptLines::new();
    serial.write(0xFF02, 0x81);

    serial.step(512 * 8, &mut irq);
    assert!(serial.start);
    assert!(irq.serial_pending);

    irq.write_if(0);
    serial.step(512 * 8, &mut irq);
    assert!(serial.start);
    assert!(irq.serial_pending);

    irq.write_if(0);
    serial.write(0xFF02, 0x01);
    serial.step(512 * 8, &mut irq);
    assert!(!irq.serial_pending);
    assert_eq!(serial.read(0xFF02) & 0x80, 0);
}

#[test]
fn external_clock_never_completes() {
    let mut serial = Serial::new(false);
    let mut irq = InterruptLines::new();
    serial.write(0xFF01, 0x42);
    serial.write(0xFF02, 0x80);
    serial.step(512 * 16, &mut irq);
    assert_eq!(serial.data, 0x42);
    assert!(serial.start);
    assert!(!irq.serial_pending);
}

#[test]
fn cgb_fast_clock_uses_short_period() {
    let mut serial = Serial::new(true);
    let mut irq = InterruptLines::new();
    serial.write(0xFF02, 0x83);
    assert_eq!(serial.read(0xFF02), 0xFF);
    serial.step(16 * 8, &mut irq);
    assert!(irq.serial_pending);
    assert_eq!(serial.data, 0xFF);
}

#[test]
fn outgoing_bytes_are_logged_per_transfer() {
    let mut serial = Serial::new(false);
    let mut irq = InterruptLines::new();
    for &b in b"OK" {
        serial.write(0xFF01, b);
        serial.write(0xFF02, 0x81);
        serial.step(512 * 8, &mut irq);
        serial.write(0xFF02, 0x01);
    }
    assert_eq!(serial.take_output(), b"OK".to_vec());
}
