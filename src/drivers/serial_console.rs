use core::convert::Infallible;

use ufmt::uWrite;

use crate::hal::Uart;

/// Log console on USART0. Lines are pushed out byte by byte with the
/// transmitter polled, so keep them short.
pub struct SerialConsole {
    uart: Uart,
}

impl SerialConsole {
    pub fn new(uart: Uart) -> Self {
        Self { uart }
    }
}

impl uWrite for SerialConsole {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.uart.write_str(s);
        Ok(())
    }

    fn write_char(&mut self, c: char) -> Result<(), Infallible> {
        let mut buf = [0u8; 4];
        self.uart.write_str(c.encode_utf8(&mut buf));
        Ok(())
    }
}
