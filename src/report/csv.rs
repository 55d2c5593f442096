use crate::core::event::Event;
use std::io::{self, Write};

pub const CSV_HEADER: &str =
    "Time,Machine,State,Set speed,Actual speed,Count,Tailback,Lack,Simulation";

fn flag(value: bool) -> u8 {
    u8::from(value)
}

/// Write one CSV row per event, preceded by [`CSV_HEADER`].
///
/// Flags are written as `0`/`1`. Rows keep the order of `events`.
pub fn write_csv<'a, W, I>(events: I, mut writer: W) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Event>,
{
    writeln!(writer, "{}", CSV_HEADER)?;
    for event in events {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{}",
            event.tick,
            event.machine,
            event.state,
            event.requested_speed,
            event.actual_speed,
            event.count,
            flag(event.tailback),
            flag(event.lack),
            event.run
        )?;
    }
    writer.flush()
}
