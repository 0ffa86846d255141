use super::*;

#[test]
fn test_zero_page_addressing() {
    let (mut cpu, mut bus) = setup_cpu();
    bus.memory[0x42] = 0xAB;

    // LDA $42
    bus.load_program(&[0xA5, 0x42], 0x8000);
    let cycles = cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.a, 0xAB);
    assert_eq!(cycles, 3);
}

#[test]
fn test_zero_page_x_wraps_within_page_zero() {
    let (mut cpu, mut bus) = setup_cpu();
    cpu.x = 0x20;
    bus.memory[0x0010] = 0xCD;
    bus.memory[0x0110] = 0xEE;

    // LDA $F0,X -> $10, not $110
    bus.load_program(&[0xB5, 0xF0], 0x8000);
    let cycles = cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.a, 0xCD);
    assert_eq!(cycles, 4);
}

#[test]
fn test_zero_page_y_addressing() {
    let (mut cpu, mut bus) = setup_cpu();
    cpu.y = 0x05;
    bus.memory[0x0045] = 0x77;

    // LDX $40,Y
    bus.load_program(&[0xB6, 0x40], 0x8000);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.x, 0x77);
}

#[test]
fn test_absolute_addressing() {
    let (mut cpu, mut bus) = setup_cpu();
    bus.memory[0x1234] = 0x56;

    // LDA $1234
    bus.load_program(&[0xAD, 0x34, 0x12], 0x8000);
    let cycles = cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.a, 0x56);
    assert_eq!(cpu.pc, 0x8003);
    assert_eq!(cycles, 4);
}

#[test]
fn test_absolute_x_page_cross_penalty() {
    let (mut cpu, mut bus) = setup_cpu();
    cpu.x = 0x01;
    bus.memory[0x1235] = 0x11;
    bus.memory[0x1300] = 0x22;

    // LDA $1234,X ; LDA $12FF,X
    bus.load_program(&[0xBD, 0x34, 0x12, 0xBD, 0xFF, 0x12], 0x8000);

    assert_eq!(cpu.step(&mut bus).unwrap(), 4);
    assert_eq!(cpu.a, 0x11);
    assert_eq!(cpu.step(&mut bus).unwrap(), 5);
    assert_eq!(cpu.a, 0x22);
}

#[test]
fn test_store_absolute_x_has_fixed_cost() {
    let (mut cpu, mut bus) = setup_cpu();
    cpu.x = 0x01;
    cpu.a = 0x99;

    // STA $12FF,X
    bus.load_program(&[0x9D, 0xFF, 0x12], 0x8000);
    assert_eq!(cpu.step(&mut bus).unwrap(), 5);
    assert_eq!(bus.memory[0x1300], 0x99);
}

#[test]
fn test_absolute_y_wraps_at_16_bits() {
    let (mut cpu, mut bus) = setup_cpu();
    cpu.y = 0x02;
    bus.memory[0x0001] = 0x3C;

    // LDA $FFFF,Y
    bus.load_program(&[0xB9, 0xFF, 0xFF], 0x8000);
    assert_eq!(cpu.step(&mut bus).unwrap(), 5);
    assert_eq!(cpu.a, 0x3C);
}

#[test]
fn test_indirect_x_addressing() {
    let (mut cpu, mut bus) = setup_cpu();
    cpu.x = 0x04;
    bus.memory[0x0024] = 0x74;
    bus.memory[0x0025] = 0x20;
    bus.memory[0x2074] = 0x9A;

    // LDA ($20,X)
    bus.load_program(&[0xA1, 0x20], 0x8000);
    assert_eq!(cpu.step(&mut bus).unwrap(), 6);
    assert_eq!(cpu.a, 0x9A);
}

#[test]
fn test_indirect_x_pointer_wraps_in_page_zero() {
    let (mut cpu, mut bus) = setup_cpu();
    cpu.x = 0x00;
    bus.memory[0x00FF] = 0x00;
    bus.memory[0x0000] = 0x03;
    bus.memory[0x0100] = 0x04;
    bus.memory[0x0300] = 0x5E;

    // LDA ($FF,X)
    bus.load_program(&[0xA1, 0xFF], 0x8000);
    cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x5E);
}

#[test]
fn test_indirect_y_addressing() {
    let (mut cpu, mut bus) = setup_cpu();
    cpu.y = 0x10;
    bus.memory[0x0086] = 0x28;
    bus.memory[0x0087] = 0x40;
    bus.memory[0x4038] = 0x61;
    bus.memory[0x0088] = 0xF8;
    bus.memory[0x0089] = 0x40;
    bus.memory[0x4108] = 0x62;

    // LDA ($86),Y ; LDA ($88),Y
    bus.load_program(&[0xB1, 0x86, 0xB1, 0x88], 0x8000);

    assert_eq!(cpu.step(&mut bus).unwrap(), 5);
    assert_eq!(cpu.a, 0x61);
    assert_eq!(cpu.step(&mut bus).unwrap(), 6);
    assert_eq!(cpu.a, 0x62);
}

#[test]
fn test_accumulator_mode_skips_bus() {
    let (mut cpu, mut bus) = setup_cpu();
    cpu.a = 0x02;
    bus.load_program(&[0x4A], 0x8000);
    let cycles = cpu.step(&mut bus).unwrap();
    assert_eq!(cpu.a, 0x01);
    assert_eq!(cpu.pc, 0x8001);
    assert_eq!(cycles, 2);
}

#[test]
fn test_resolve_immediate_points_at_operand_byte() {
    let (mut cpu, mut bus) = setup_cpu();
    bus.load_program(&[0xA9, 0x42], 0x8000);
    cpu.pc = 0x8001;

    let resolved = cpu.resolve_operand(&mut bus, decode(0xA9).unwrap()).unwrap();
    assert_eq!(resolved.operand, Operand::Address(0x8001));
    assert!(!resolved.page_crossed);
    assert_eq!(cpu.pc, 0x8002);
}

#[test]
fn test_resolve_relative_target() {
    let (mut cpu, mut bus) = setup_cpu();
    bus.load_program(&[0xD0, 0x80], 0x8000);
    cpu.pc = 0x8001;

    let resolved = cpu.resolve_operand(&mut bus, decode(0xD0).unwrap()).unwrap();
    // -128 from the instruction after the branch
    assert_eq!(resolved.operand, Operand::Address(0x7F82));
}

#[test]
fn test_resolve_reports_page_cross() {
    let (mut cpu, mut bus) = setup_cpu();
    cpu.y = 0xFF;
    bus.load_program(&[0xB9, 0x01, 0x20], 0x8000);
    cpu.pc = 0x8001;

    let resolved = cpu.resolve_operand(&mut bus, decode(0xB9).unwrap()).unwrap();
    assert_eq!(resolved.operand, Operand::Address(0x2100));
    assert!(resolved.page_crossed);
    assert_eq!(cpu.pc, 0x8003);
}
