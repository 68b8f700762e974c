/// Event stream command.
pub mod events;
/// File-level information command.
pub mod info;
/// JSON and text rendering shared by commands.
pub mod util;
