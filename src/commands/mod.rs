// commands/mod.rs - Command Module Registry
// Declares all command modules so main.rs can register them

pub mod about;          // About text and developer links
pub mod help;           // Help system and command documentation
pub mod search;         // Text queries and the "More Videos" button
pub mod slash;          // Slash commands for Discord application commands
pub mod start;          // Welcome message
