//! Instruction behaviour tests.
//!
//! Programs are loaded at $0200 and run one instruction per step, the
//! way a driving machine would.

use cpu_2a03::{flags, Ricoh2A03};
use nes_core::{Bus, Cpu, InterruptLines, SimpleBus};

/// Load a program at $0200 and point PC there.
fn setup(program: &[u8]) -> (Ricoh2A03, SimpleBus, InterruptLines) {
    let mut bus = SimpleBus::new();
    bus.load(0x0200, program);
    let mut cpu = Ricoh2A03::new();
    cpu.regs.pc = 0x0200;
    (cpu, bus, InterruptLines::new())
}

fn run(cpu: &mut Ricoh2A03, bus: &mut SimpleBus, lines: &mut InterruptLines, steps: usize) {
    for _ in 0..steps {
        cpu.step(bus, lines);
    }
}

#[test]
fn lda_immediate_sets_z_and_n() {
    let (mut cpu, mut bus, mut lines) = setup(&[0xA9, 0x00, 0xA9, 0x80]);
    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.a, 0x00);
    assert!(cpu.regs.p.is_set(flags::Z));
    assert!(!cpu.regs.p.is_set(flags::N));

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.a, 0x80);
    assert!(!cpu.regs.p.is_set(flags::Z));
    assert!(cpu.regs.p.is_set(flags::N));
}

#[test]
fn lda_zero_page_and_absolute() {
    let (mut cpu, mut bus, mut lines) = setup(&[0xA5, 0x10, 0xAD, 0x00, 0x03]);
    bus.write(0x0010, 0x42);
    bus.write(0x0300, 0x99);

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.a, 0x42);
    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.a, 0x99);
}

#[test]
fn indexed_zero_page_wraps() {
    // LDA $FF,X with X=2 must read $0001, not $0101.
    let (mut cpu, mut bus, mut lines) = setup(&[0xB5, 0xFF]);
    cpu.regs.x = 0x02;
    bus.write(0x0001, 0x77);
    bus.write(0x0101, 0x11);

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.a, 0x77);
}

#[test]
fn x_indirect_pointer_wraps_in_zero_page() {
    // LDA ($FF,X) with X=1: pointer at $00/$01.
    let (mut cpu, mut bus, mut lines) = setup(&[0xA1, 0xFF]);
    cpu.regs.x = 0x01;
    bus.write(0x0000, 0x34);
    bus.write(0x0001, 0x12);
    bus.write(0x1234, 0x5A);

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.a, 0x5A);
}

#[test]
fn indirect_y_adds_after_lookup() {
    let (mut cpu, mut bus, mut lines) = setup(&[0xB1, 0x40]);
    cpu.regs.y = 0x05;
    bus.write(0x0040, 0x00);
    bus.write(0x0041, 0x03);
    bus.write(0x0305, 0xAB);

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.a, 0xAB);
}

#[test]
fn stores_write_without_touching_flags() {
    let (mut cpu, mut bus, mut lines) = setup(&[0x85, 0x20, 0x86, 0x21, 0x84, 0x22]);
    cpu.regs.a = 0x00;
    cpu.regs.x = 0x80;
    cpu.regs.y = 0x7F;
    let p_before = cpu.regs.p;

    run(&mut cpu, &mut bus, &mut lines, 3);
    assert_eq!(bus.peek(0x0020), 0x00);
    assert_eq!(bus.peek(0x0021), 0x80);
    assert_eq!(bus.peek(0x0022), 0x7F);
    assert_eq!(cpu.regs.p, p_before);
}

#[test]
fn transfers_set_flags_except_txs() {
    let (mut cpu, mut bus, mut lines) = setup(&[0xAA, 0x9A, 0xBA]);
    cpu.regs.a = 0x00;

    cpu.step(&mut bus, &mut lines); // TAX
    assert_eq!(cpu.regs.x, 0x00);
    assert!(cpu.regs.p.is_set(flags::Z));

    cpu.regs.x = 0x80;
    cpu.regs.p.clear(flags::N);
    cpu.step(&mut bus, &mut lines); // TXS
    assert_eq!(cpu.regs.s, 0x80);
    assert!(!cpu.regs.p.is_set(flags::N), "TXS must not touch flags");

    cpu.step(&mut bus, &mut lines); // TSX
    assert_eq!(cpu.regs.x, 0x80);
    assert!(cpu.regs.p.is_set(flags::N));
}

#[test]
fn stack_pha_pla_roundtrip() {
    // LDA #$42; LDX #$FF; TXS; PHA; LDA #$00; PLA
    let (mut cpu, mut bus, mut lines) = setup(&[
        0xA9, 0x42, 0xA2, 0xFF, 0x9A, 0x48, 0xA9, 0x00, 0x68,
    ]);

    run(&mut cpu, &mut bus, &mut lines, 6);
    assert_eq!(cpu.regs.a, 0x42, "PLA should restore A");
    assert_eq!(cpu.regs.s, 0xFF, "S should be back after PLA");
    assert!(!cpu.regs.p.is_set(flags::Z));
}

#[test]
fn php_plp_roundtrip_forces_unused() {
    // SEC; PHP; CLC; PLP
    let (mut cpu, mut bus, mut lines) = setup(&[0x38, 0x08, 0x18, 0x28]);

    run(&mut cpu, &mut bus, &mut lines, 2);
    // PHP pushes with B and U set.
    let pushed = bus.peek(0x0100 | u16::from(cpu.regs.s.wrapping_add(1)));
    assert_eq!(pushed & flags::B, flags::B);
    assert_eq!(pushed & flags::U, flags::U);
    assert_eq!(pushed & flags::C, flags::C);

    run(&mut cpu, &mut bus, &mut lines, 2);
    assert!(cpu.regs.p.is_set(flags::C), "PLP should restore carry");
    assert!(cpu.regs.p.is_set(flags::U));
    assert!(!cpu.regs.p.is_set(flags::B));
}

#[test]
fn logical_ops_update_a_and_flags() {
    let (mut cpu, mut bus, mut lines) = setup(&[0x29, 0x0F, 0x09, 0x80, 0x49, 0xFF]);
    cpu.regs.a = 0xF3;

    cpu.step(&mut bus, &mut lines); // AND #$0F
    assert_eq!(cpu.regs.a, 0x03);
    cpu.step(&mut bus, &mut lines); // ORA #$80
    assert_eq!(cpu.regs.a, 0x83);
    assert!(cpu.regs.p.is_set(flags::N));
    cpu.step(&mut bus, &mut lines); // EOR #$FF
    assert_eq!(cpu.regs.a, 0x7C);
    assert!(!cpu.regs.p.is_set(flags::N));
}

#[test]
fn bit_copies_memory_bits_to_v_and_n() {
    let (mut cpu, mut bus, mut lines) = setup(&[0x24, 0x10, 0x24, 0x11]);
    bus.write(0x0010, 0xC0);
    bus.write(0x0011, 0x01);
    cpu.regs.a = 0x01;

    cpu.step(&mut bus, &mut lines);
    assert!(cpu.regs.p.is_set(flags::V));
    assert!(cpu.regs.p.is_set(flags::N));
    assert!(cpu.regs.p.is_set(flags::Z), "A & $C0 is zero");

    cpu.step(&mut bus, &mut lines);
    assert!(!cpu.regs.p.is_set(flags::V));
    assert!(!cpu.regs.p.is_set(flags::N));
    assert!(!cpu.regs.p.is_set(flags::Z));
}

#[test]
fn adc_signed_overflow() {
    // $50 + $50 overflows into the sign bit: V set, C clear.
    let (mut cpu, mut bus, mut lines) = setup(&[0x69, 0x50]);
    cpu.regs.a = 0x50;
    cpu.regs.p.clear(flags::C);

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.a, 0xA0);
    assert!(!cpu.regs.p.is_set(flags::C));
    assert!(!cpu.regs.p.is_set(flags::Z));
    assert!(cpu.regs.p.is_set(flags::N));
    assert!(cpu.regs.p.is_set(flags::V));
}

#[test]
fn sbc_borrow_clears_carry() {
    // $50 - $F0 with no borrow in: result $60, borrow out (C=0).
    let (mut cpu, mut bus, mut lines) = setup(&[0xE9, 0xF0]);
    cpu.regs.a = 0x50;
    cpu.regs.p.set(flags::C);

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.a, 0x60);
    assert!(!cpu.regs.p.is_set(flags::C));
    assert!(!cpu.regs.p.is_set(flags::Z));
    assert!(!cpu.regs.p.is_set(flags::N));
    assert!(!cpu.regs.p.is_set(flags::V));
}

#[test]
fn adc_ignores_decimal_flag() {
    // 2A03: D is toggleable but ADC stays binary. $09 + $01 = $0A.
    let (mut cpu, mut bus, mut lines) = setup(&[0xF8, 0x69, 0x01]);
    cpu.regs.a = 0x09;
    cpu.regs.p.clear(flags::C);

    run(&mut cpu, &mut bus, &mut lines, 2);
    assert!(cpu.regs.p.is_set(flags::D));
    assert_eq!(cpu.regs.a, 0x0A, "no BCD adjustment");
}

#[test]
fn compare_sets_carry_zero_negative() {
    let (mut cpu, mut bus, mut lines) = setup(&[0xC9, 0x30, 0xE0, 0x40, 0xC0, 0x50]);
    cpu.regs.a = 0x40;
    cpu.regs.x = 0x40;
    cpu.regs.y = 0x40;

    cpu.step(&mut bus, &mut lines); // CMP #$30
    assert!(cpu.regs.p.is_set(flags::C));
    assert!(!cpu.regs.p.is_set(flags::Z));

    cpu.step(&mut bus, &mut lines); // CPX #$40
    assert!(cpu.regs.p.is_set(flags::C));
    assert!(cpu.regs.p.is_set(flags::Z));

    cpu.step(&mut bus, &mut lines); // CPY #$50
    assert!(!cpu.regs.p.is_set(flags::C));
    assert!(cpu.regs.p.is_set(flags::N));
}

#[test]
fn inc_dec_memory_wraps_and_sets_flags() {
    let (mut cpu, mut bus, mut lines) = setup(&[0xE6, 0x10, 0xC6, 0x11]);
    bus.write(0x0010, 0xFF);
    bus.write(0x0011, 0x00);

    cpu.step(&mut bus, &mut lines); // INC $10
    assert_eq!(bus.peek(0x0010), 0x00);
    assert!(cpu.regs.p.is_set(flags::Z));

    cpu.step(&mut bus, &mut lines); // DEC $11
    assert_eq!(bus.peek(0x0011), 0xFF);
    assert!(cpu.regs.p.is_set(flags::N));
}

#[test]
fn register_inc_dec() {
    let (mut cpu, mut bus, mut lines) = setup(&[0xE8, 0x88]);
    cpu.regs.x = 0xFF;
    cpu.regs.y = 0x01;

    cpu.step(&mut bus, &mut lines); // INX
    assert_eq!(cpu.regs.x, 0x00);
    assert!(cpu.regs.p.is_set(flags::Z));

    cpu.step(&mut bus, &mut lines); // DEY
    assert_eq!(cpu.regs.y, 0x00);
    assert!(cpu.regs.p.is_set(flags::Z));
}

#[test]
fn shifts_on_accumulator() {
    let (mut cpu, mut bus, mut lines) = setup(&[0x0A, 0x4A]);
    cpu.regs.a = 0x81;

    cpu.step(&mut bus, &mut lines); // ASL A
    assert_eq!(cpu.regs.a, 0x02);
    assert!(cpu.regs.p.is_set(flags::C), "bit 7 into carry");

    cpu.step(&mut bus, &mut lines); // LSR A
    assert_eq!(cpu.regs.a, 0x01);
    assert!(!cpu.regs.p.is_set(flags::C));
}

#[test]
fn rotates_through_carry() {
    let (mut cpu, mut bus, mut lines) = setup(&[0x2A, 0x6A]);
    cpu.regs.a = 0x80;
    cpu.regs.p.set(flags::C);

    cpu.step(&mut bus, &mut lines); // ROL A: carry in -> bit 0, bit 7 -> carry
    assert_eq!(cpu.regs.a, 0x01);
    assert!(cpu.regs.p.is_set(flags::C));

    cpu.step(&mut bus, &mut lines); // ROR A: carry in -> bit 7, bit 0 -> carry
    assert_eq!(cpu.regs.a, 0x80);
    assert!(cpu.regs.p.is_set(flags::C));
}

#[test]
fn shift_on_memory_writes_back() {
    let (mut cpu, mut bus, mut lines) = setup(&[0x06, 0x10]);
    bus.write(0x0010, 0x41);

    cpu.step(&mut bus, &mut lines); // ASL $10
    assert_eq!(bus.peek(0x0010), 0x82);
    assert!(!cpu.regs.p.is_set(flags::C));
    assert!(cpu.regs.p.is_set(flags::N));
}

#[test]
fn jmp_absolute() {
    let (mut cpu, mut bus, mut lines) = setup(&[0x4C, 0x00, 0x80]);
    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.pc, 0x8000);
}

#[test]
fn jmp_indirect_wraps_at_page_boundary() {
    // Pointer at $10FF: low byte from $10FF, high byte from the page
    // start $1000, never $1100.
    let (mut cpu, mut bus, mut lines) = setup(&[0x6C, 0xFF, 0x10]);
    bus.write(0x10FF, 0x34);
    bus.write(0x1000, 0x78);
    bus.write(0x1100, 0x12);

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.pc, 0x7834, "high byte must wrap within the page");
}

#[test]
fn jsr_rts_roundtrip() {
    let (mut cpu, mut bus, mut lines) = setup(&[0x20, 0x80, 0x02]); // JSR $0280
    bus.load(0x0280, &[0x60]); // RTS
    let s_before = cpu.regs.s;

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.pc, 0x0280);
    // JSR pushes the address of its last operand byte.
    let low = bus.peek(0x0100 | u16::from(s_before.wrapping_sub(1)));
    let high = bus.peek(0x0100 | u16::from(s_before));
    assert_eq!(u16::from_le_bytes([low, high]), 0x0202);

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.pc, 0x0203, "RTS lands after the JSR");
    assert_eq!(cpu.regs.s, s_before);
}

#[test]
fn rti_restores_status_and_pc_without_increment() {
    let (mut cpu, mut bus, mut lines) = setup(&[0x40]); // RTI
    cpu.regs.s = 0xFA;
    bus.write(0x01FB, 0xD1); // status with C, V, N plus a junk B bit
    bus.write(0x01FC, 0x34); // PC low
    bus.write(0x01FD, 0x12); // PC high

    cpu.step(&mut bus, &mut lines);
    assert_eq!(cpu.regs.pc, 0x1234, "RTI does not add one to the pulled PC");
    assert_eq!(cpu.regs.s, 0xFD);
    assert!(cpu.regs.p.is_set(flags::C));
    assert!(cpu.regs.p.is_set(flags::V));
    assert!(cpu.regs.p.is_set(flags::N));
    assert!(cpu.regs.p.is_set(flags::U), "U forced on pull");
    assert!(!cpu.regs.p.is_set(flags::B));
}

#[test]
fn branch_taken_and_not_taken() {
    let (mut cpu, mut bus, mut lines) = setup(&[0xF0, 0x04, 0xD0, 0x04]);
    cpu.regs.p.clear(flags::Z);

    cpu.step(&mut bus, &mut lines); // BEQ not taken
    assert_eq!(cpu.regs.pc, 0x0202);

    cpu.step(&mut bus, &mut lines); // BNE taken
    assert_eq!(cpu.regs.pc, 0x0208);
}

#[test]
fn branch_backwards() {
    let (mut cpu, mut bus, mut lines) = setup(&[0xEA, 0xEA, 0xD0, 0xFC]); // NOP; NOP; BNE -4
    cpu.regs.p.clear(flags::Z);

    run(&mut cpu, &mut bus, &mut lines, 3);
    assert_eq!(cpu.regs.pc, 0x0200);
}

#[test]
fn flag_operations() {
    let (mut cpu, mut bus, mut lines) =
        setup(&[0x38, 0x18, 0x78, 0x58, 0xF8, 0xD8, 0xB8]);
    cpu.regs.p.set(flags::V);

    cpu.step(&mut bus, &mut lines); // SEC
    assert!(cpu.regs.p.is_set(flags::C));
    cpu.step(&mut bus, &mut lines); // CLC
    assert!(!cpu.regs.p.is_set(flags::C));
    cpu.step(&mut bus, &mut lines); // SEI
    assert!(cpu.regs.p.is_set(flags::I));
    cpu.step(&mut bus, &mut lines); // CLI
    assert!(!cpu.regs.p.is_set(flags::I));
    cpu.step(&mut bus, &mut lines); // SED
    assert!(cpu.regs.p.is_set(flags::D));
    cpu.step(&mut bus, &mut lines); // CLD
    assert!(!cpu.regs.p.is_set(flags::D));
    cpu.step(&mut bus, &mut lines); // CLV
    assert!(!cpu.regs.p.is_set(flags::V));
}

#[test]
fn nop_changes_nothing_but_pc() {
    let (mut cpu, mut bus, mut lines) = setup(&[0xEA]);
    let regs_before = cpu.regs;

    let cycles = cpu.step(&mut bus, &mut lines);
    assert_eq!(cycles, 2);
    assert_eq!(cpu.regs.pc, 0x0201);
    assert_eq!(cpu.regs.a, regs_before.a);
    assert_eq!(cpu.regs.p, regs_before.p);
    assert_eq!(cpu.regs.s, regs_before.s);
}
