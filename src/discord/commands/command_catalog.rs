// Discord commands module.
// Each feature gets its own command file; moderation commands live under discord/moderation.

pub mod help;

pub mod presence;
