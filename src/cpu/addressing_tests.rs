use super::*;

#[cfg(test)]
mod addressing_mode_tests {
    use super::*;

    #[test]
    fn test_zero_page_addressing() {
        // LDA $42
        let (mut cpu, mut bus) = run(&[0xA5, 0x42]);
        bus.poke(0x0042, 0x37);

        assert_eq!(step(&mut cpu, &mut bus), 3);
        assert_eq!(cpu.a, 0x37);
        assert_eq!(cpu.pc, 0x8002);
    }

    #[test]
    fn test_zero_page_x_wraps_within_zero_page() {
        for base in [0x00u8, 0x7F, 0x80, 0xF0, 0xFF] {
            for x in [0x00u8, 0x01, 0x10, 0x80, 0xFF] {
                // LDA $base,X
                let (mut cpu, mut bus) = run(&[0xB5, base]);
                let expected = base.wrapping_add(x) as u16;
                // Unwrapped sum holds a different value
                bus.poke(base as u16 + x as u16, 0xA5);
                bus.poke(expected, 0x5A);
                cpu.x = x;

                assert_eq!(step(&mut cpu, &mut bus), 4);
                assert_eq!(cpu.a, 0x5A, "base {:02X} x {:02X}", base, x);
                // Dummy read of the unindexed address, then the real one
                assert_eq!(
                    &bus.accesses[2..],
                    &[Access::Read(base as u16), Access::Read(expected)]
                );
                assert!(bus.accesses.iter().skip(2).all(|a| match a {
                    Access::Read(addr) | Access::Write(addr, _) => *addr <= 0x00FF,
                }));
            }
        }
    }

    #[test]
    fn test_zero_page_y_addressing() {
        // LDX $FF,Y
        let (mut cpu, mut bus) = run(&[0xB6, 0xFF]);
        bus.poke(0x0001, 0x99);
        cpu.y = 0x02;

        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.x, 0x99);
    }

    #[test]
    fn test_absolute_addressing() {
        // LDA $1234; STA $0200
        let (mut cpu, mut bus) = run(&[0xAD, 0x34, 0x12, 0x8D, 0x00, 0x02]);
        bus.poke(0x1234, 0x42);

        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.a, 0x42);
        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(bus.peek(0x0200), 0x42);
        assert_eq!(cpu.pc, 0x8006);
    }

    #[test]
    fn test_absolute_x_same_page() {
        // LDA $1200,X
        let (mut cpu, mut bus) = run(&[0xBD, 0x00, 0x12]);
        bus.poke(0x1210, 0x11);
        cpu.x = 0x10;

        assert_eq!(step(&mut cpu, &mut bus), 4);
        assert_eq!(cpu.a, 0x11);
        assert_eq!(bus.accesses.last(), Some(&Access::Read(0x1210)));
    }

    #[test]
    fn test_absolute_x_page_cross_reads_uncarried_address() {
        // LDA $12F0,X
        let (mut cpu, mut bus) = run(&[0xBD, 0xF0, 0x12]);
        bus.poke(0x1310, 0x22);
        cpu.x = 0x20;

        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(cpu.a, 0x22);
        assert_eq!(
            &bus.accesses[3..],
            &[Access::Read(0x1210), Access::Read(0x1310)]
        );
    }

    #[test]
    fn test_absolute_y_page_cross() {
        // LDA $12FF,Y
        let (mut cpu, mut bus) = run(&[0xB9, 0xFF, 0x12]);
        bus.poke(0x1300, 0x33);
        cpu.y = 0x01;

        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(cpu.a, 0x33);
        assert_eq!(bus.accesses[3], Access::Read(0x1200));
    }

    #[test]
    fn test_absolute_indexed_wraps_address_space() {
        // LDA $FFFF,X
        let (mut cpu, mut bus) = run(&[0xBD, 0xFF, 0xFF]);
        bus.poke(0x0001, 0x44);
        cpu.x = 0x02;

        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(cpu.a, 0x44);
    }

    #[test]
    fn test_store_absolute_x_always_takes_five_cycles() {
        // STA $1200,X; STA $12F0,X
        let (mut cpu, mut bus) = run(&[0x9D, 0x00, 0x12, 0x9D, 0xF0, 0x12]);
        cpu.a = 0x77;
        cpu.x = 0x01;

        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(bus.peek(0x1201), 0x77);
        assert_eq!(
            &bus.accesses[3..],
            &[Access::Read(0x1201), Access::Write(0x1201, 0x77)]
        );

        cpu.x = 0x20;
        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(bus.peek(0x1310), 0x77);
    }

    #[test]
    fn test_read_modify_write_absolute_x_takes_seven_cycles() {
        // INC $1200,X
        let (mut cpu, mut bus) = run(&[0xFE, 0x00, 0x12]);
        bus.poke(0x1205, 0x09);
        cpu.x = 0x05;

        assert_eq!(step(&mut cpu, &mut bus), 7);
        assert_eq!(bus.peek(0x1205), 0x0A);
    }

    #[test]
    fn test_indirect_jump() {
        // JMP ($0300)
        let (mut cpu, mut bus) = run(&[0x6C, 0x00, 0x03]);
        bus.poke(0x0300, 0x78);
        bus.poke(0x0301, 0x56);

        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(cpu.pc, 0x5678);
    }

    #[test]
    fn test_indirect_jump_page_wrap() {
        // JMP ($02FF) takes the high byte from $0200, not $0300
        let (mut cpu, mut bus) = run(&[0x6C, 0xFF, 0x02]);
        bus.poke(0x02FF, 0x00);
        bus.poke(0x0200, 0x04);
        bus.poke(0x0300, 0x99);

        step(&mut cpu, &mut bus);
        assert_eq!(cpu.pc, 0x0400);
        assert_eq!(
            &bus.accesses[3..],
            &[Access::Read(0x02FF), Access::Read(0x0200)]
        );
    }

    #[test]
    fn test_indexed_indirect_addressing() {
        // LDA ($20,X)
        let (mut cpu, mut bus) = run(&[0xA1, 0x20]);
        cpu.x = 0x04;
        bus.poke(0x0024, 0x74);
        bus.poke(0x0025, 0x20);
        bus.poke(0x2074, 0x66);

        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.a, 0x66);
    }

    #[test]
    fn test_indexed_indirect_pointer_wraps() {
        // LDA ($FE,X) with X=1 reads the pointer from $FF and $00
        let (mut cpu, mut bus) = run(&[0xA1, 0xFE]);
        cpu.x = 0x01;
        bus.poke(0x00FF, 0x34);
        bus.poke(0x0000, 0x12);
        bus.poke(0x0100, 0xEE);
        bus.poke(0x1234, 0x55);

        step(&mut cpu, &mut bus);
        assert_eq!(cpu.a, 0x55);
    }

    #[test]
    fn test_indirect_indexed_addressing() {
        // LDA ($86),Y
        let (mut cpu, mut bus) = run(&[0xB1, 0x86]);
        cpu.y = 0x10;
        bus.poke(0x0086, 0x28);
        bus.poke(0x0087, 0x40);
        bus.poke(0x4038, 0x13);

        assert_eq!(step(&mut cpu, &mut bus), 5);
        assert_eq!(cpu.a, 0x13);
    }

    #[test]
    fn test_indirect_indexed_page_cross() {
        // LDA ($86),Y crossing into $4100
        let (mut cpu, mut bus) = run(&[0xB1, 0x86]);
        cpu.y = 0xFF;
        bus.poke(0x0086, 0x28);
        bus.poke(0x0087, 0x40);
        bus.poke(0x4127, 0x21);

        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(cpu.a, 0x21);
        assert_eq!(
            &bus.accesses[4..],
            &[Access::Read(0x4027), Access::Read(0x4127)]
        );
    }

    #[test]
    fn test_store_indirect_indexed_always_takes_six_cycles() {
        // STA ($86),Y
        let (mut cpu, mut bus) = run(&[0x91, 0x86]);
        cpu.a = 0x5E;
        cpu.y = 0x01;
        bus.poke(0x0086, 0x00);
        bus.poke(0x0087, 0x40);

        assert_eq!(step(&mut cpu, &mut bus), 6);
        assert_eq!(bus.peek(0x4001), 0x5E);
    }

    #[test]
    fn test_implied_reads_next_byte() {
        // NOP
        let (mut cpu, mut bus) = run(&[0xEA, 0xFF]);

        assert_eq!(step(&mut cpu, &mut bus), 2);
        assert_eq!(cpu.pc, 0x8001);
        assert_eq!(
            bus.accesses,
            vec![Access::Read(0x8000), Access::Read(0x8001)]
        );
    }
}
