//! Levelled, tick-stamped log lines over any `ufmt` writer
//!
//! The console is best-effort: write errors are dropped so logging never
//! changes the timing of the main loop.

use ufmt::{uDebug, uWrite, uwrite, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Error => "ERR",
            Level::Warn => "WRN",
            Level::Info => "INF",
            Level::Debug => "DBG",
        }
    }
}

impl uDebug for Level {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.tag())
    }
}

pub struct Logger<W> {
    out: W,
    max_level: Level,
}

impl<W: uWrite> Logger<W> {
    pub fn new(out: W, max_level: Level) -> Self {
        Self { out, max_level }
    }

    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }

    /// Write one line: `[<tick> <LVL>] <body>\r\n`.
    pub fn record<F>(&mut self, level: Level, now: u32, body: F)
    where
        F: FnOnce(&mut W) -> Result<(), W::Error>,
    {
        if !self.enabled(level) {
            return;
        }
        let out = &mut self.out;
        let _ = uwrite!(out, "[{} {:?}] ", now, level)
            .and_then(|_| body(out))
            .and_then(|_| out.write_str("\r\n"));
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $now:expr, $($arg:tt)+) => {
        $logger.record($level, $now, |w| $crate::ufmt::uwrite!(w, $($arg)+))
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $now:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Error, $now, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $now:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Warn, $now, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $now:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Info, $now, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $now:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::logger::Level::Debug, $now, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_tick_and_level() {
        let mut log = Logger::new(String::new(), Level::Info);
        crate::info!(log, 1234, "test {} started", 2u8);
        assert_eq!(log.writer().as_str(), "[1234 INF] test 2 started\r\n");
    }

    #[test]
    fn drops_lines_above_threshold() {
        let mut log = Logger::new(String::new(), Level::Warn);
        crate::debug!(log, 1, "noise");
        crate::info!(log, 2, "noise");
        crate::warn!(log, 3, "kept");
        crate::error!(log, 4, "kept too");
        assert_eq!(
            log.into_inner(),
            "[3 WRN] kept\r\n[4 ERR] kept too\r\n"
        );
    }
}
