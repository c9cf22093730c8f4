#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::buffer::CaptureBuffer;
use crate::serial::serial;
use crate::sink::SinkHandle;
use log::Level;

#[test]
fn test_format_record() {
    let line = format_record(
        &Record::builder()
            .level(Level::Warn)
            .target("app")
            .args(format_args!("disk at {}%", 91))
            .build(),
    );
    assert_eq!(line, "WARN disk at 91%\n");
}

#[test]
fn test_install_is_idempotent() {
    install().unwrap();
    install().unwrap();
}

#[test]
fn test_internal_target_is_not_enabled() {
    let internal = Metadata::builder().target(INTERNAL_TARGET).build();
    let user = Metadata::builder().target("my_crate::worker").build();
    assert!(!LOGGER.enabled(&internal));
    assert!(LOGGER.enabled(&user));
}

#[test]
fn test_records_land_in_log_sink() {
    let _guard = serial();
    install().unwrap();
    let buffer = CaptureBuffer::new();
    let previous = sink::registry().swap(Stream::Log, SinkHandle::buffer(buffer.clone()));

    LOGGER.log(
        &Record::builder()
            .level(Level::Info)
            .target("app")
            .args(format_args!("started"))
            .build(),
    );
    LOGGER.log(
        &Record::builder()
            .level(Level::Debug)
            .target(INTERNAL_TARGET)
            .args(format_args!("hidden"))
            .build(),
    );

    sink::registry().restore(Stream::Log, previous);
    assert_eq!(buffer.contents(), "INFO started\n");
}
