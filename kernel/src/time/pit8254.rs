use x86::io;

use tick::PortIo;

/// Порты ввода--вывода x86-64, через которые настраивается
/// [Intel 8253/8254](https://en.wikipedia.org/wiki/Intel_8253).
#[derive(Debug, Default)]
pub(super) struct Ports;

impl PortIo for Ports {
    fn write_u8(
        &mut self,
        port: u16,
        value: u8,
    ) {
        unsafe {
            io::outb(port, value);
        }
    }
}
