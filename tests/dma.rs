mod common;

use tickboy::dma::OAM_DMA_LEN;
use tickboy::hardware::Model;
use tickboy::mmu::Mmu;

fn filled_mmu() -> Mmu {
    let mut mmu = Mmu::new(Model::Dmg);
    for i in 0..OAM_DMA_LEN as u16 {
        mmu.write_byte(0xC100 + i, (i as u8).wrapping_mul(3) ^ 0x5A);
    }
    mmu
}

#[test]
fn transfer_takes_exactly_160_steps() {
    let mut mmu = filled_mmu();
    mmu.write_byte(0xFF46, 0xC1);
    assert!(mmu.dma.active);

    for n in 0..OAM_DMA_LEN as usize {
        assert!(mmu.dma.active, "finished early after {n} steps");
        mmu.dma_step();
    }
    assert!(!mmu.dma.active);

    for i in 0..OAM_DMA_LEN as u16 {
        let src = mmu.read_byte(0xC100 + i);
        assert_eq!(mmu.video.oam[i as usize], src, "OAM byte {i}");
    }
}

#[test]
fn register_reads_back_source_page() {
    let mut mmu = filled_mmu();
    mmu.write_byte(0xFF46, 0xC1);
    assert_eq!(mmu.read_byte(0xFF46), 0xC1);
}

#[test]
fn dma_runs_at_one_byte_per_cycle_in_the_machine() {
    // LDH (46),A with A = C1, then NOPs.
    let mut gb = common::machine_with_program(Model::Dmg, &[0x3E, 0xC1, 0xE0, 0x46, 0x00]);
    for i in 0..OAM_DMA_LEN as u16 {
        gb.mmu.write_byte(0xC100 + i, i as u8);
    }
    gb.step();
    gb.step();
    // The LDH took 12 cycles after the write, so 12 bytes are already done.
    assert!(gb.mmu.dma.active);
    assert_eq!(gb.mmu.dma.index, 12);

    gb.run_cycles(OAM_DMA_LEN as u32 - 13);
    assert!(gb.mmu.dma.active);
    gb.run_cycles(1);
    assert!(!gb.mmu.dma.active);
    assert_eq!(gb.mmu.video.oam[0x9F], 0x9F);
}
