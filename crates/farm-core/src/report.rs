//! Console reporting: one timestamped, optionally colored line per significant farm event.

use std::io::Write;

use anstyle::{AnsiColor, Color, Effects, Style};
use chrono::Local;

use crate::player::Pokeball;
use crate::session::AuthKind;
use crate::world::{FortReward, PokemonId};

#[derive(Debug, Clone, PartialEq)]
pub enum FarmEvent {
    LoginStarted {
        auth: AuthKind,
    },
    LoggedIn {
        auth: AuthKind,
    },
    EndpointResolved {
        endpoint: Option<String>,
    },
    FortLooted {
        name: String,
        reward: FortReward,
    },
    PokemonCaught {
        pokemon_id: PokemonId,
        cp: Option<i32>,
        ball: Pokeball,
        xp: i32,
    },
    PokemonEscaped {
        pokemon_id: PokemonId,
        cp: Option<i32>,
        ball: Pokeball,
    },
    ReleasePassStarted,
    PokemonReleased {
        pokemon_id: PokemonId,
        cp: Option<i32>,
    },
    PokemonEvolved {
        pokemon_id: PokemonId,
        exp: i32,
    },
    EvolveFailed {
        pokemon_id: PokemonId,
        reason: String,
    },
    IterationFailed {
        cause: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    Fort,
    Catch,
    Release,
    Failure,
}

fn cp_label(cp: Option<i32>) -> String {
    cp.map(|cp| cp.to_string()).unwrap_or_else(|| "?".to_string())
}

impl FarmEvent {
    pub fn message(&self) -> String {
        match self {
            FarmEvent::LoginStarted { auth } => format!("Starting login with {auth}"),
            FarmEvent::LoggedIn { auth } => format!("Logged in with {auth}."),
            FarmEvent::EndpointResolved { endpoint } => match endpoint {
                Some(endpoint) => format!("Server set: {endpoint}"),
                None => "Server set.".to_string(),
            },
            FarmEvent::FortLooted { name, reward } => format!(
                "{name} - Awarded {}xp, Gems: {}, Eggs: {} Items: {}",
                reward.experience_awarded,
                reward.gems_awarded,
                reward.egg_label(),
                reward.summarize_items()
            ),
            FarmEvent::PokemonCaught {
                pokemon_id,
                cp,
                ball,
                xp,
            } => format!(
                "We caught a {pokemon_id} with {}cp using a(n) {ball} and received {xp}xp",
                cp_label(*cp)
            ),
            FarmEvent::PokemonEscaped {
                pokemon_id,
                cp,
                ball,
            } => format!(
                "Tried to catch {pokemon_id} with {}cp using a(n) {ball}, but it got away...",
                cp_label(*cp)
            ),
            FarmEvent::ReleasePassStarted => "Attempting to transfer duplicates...".to_string(),
            FarmEvent::PokemonReleased { pokemon_id, cp } => {
                format!("Transfer {pokemon_id} with {}cp", cp_label(*cp))
            }
            FarmEvent::PokemonEvolved { pokemon_id, exp } => {
                format!("Evolved {pokemon_id} successfully for {exp}xp")
            }
            FarmEvent::EvolveFailed { pokemon_id, reason } => format!(
                "Failed to evolve {pokemon_id}: {reason}, stopping evolving {pokemon_id}"
            ),
            FarmEvent::IterationFailed { cause } => format!("Exception: {cause}"),
        }
    }

    pub(crate) fn tone(&self) -> Tone {
        match self {
            FarmEvent::FortLooted { .. } => Tone::Fort,
            FarmEvent::PokemonCaught { .. }
            | FarmEvent::PokemonEscaped { .. }
            | FarmEvent::PokemonEvolved { .. } => Tone::Catch,
            FarmEvent::PokemonReleased { .. } => Tone::Release,
            FarmEvent::EvolveFailed { .. } | FarmEvent::IterationFailed { .. } => Tone::Failure,
            FarmEvent::LoginStarted { .. }
            | FarmEvent::LoggedIn { .. }
            | FarmEvent::EndpointResolved { .. }
            | FarmEvent::ReleasePassStarted => Tone::Plain,
        }
    }
}

pub trait Reporter: Send + Sync {
    fn report(&self, event: &FarmEvent);
}

#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    pub color: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self { color: true }
    }
}

impl ConsoleReporter {
    fn style(tone: Tone) -> Style {
        let fg = |c: AnsiColor| Style::new().fg_color(Some(Color::Ansi(c)));
        match tone {
            Tone::Plain => Style::new(),
            Tone::Fort => fg(AnsiColor::Green),
            Tone::Catch => fg(AnsiColor::Cyan),
            Tone::Release => fg(AnsiColor::Yellow),
            Tone::Failure => fg(AnsiColor::Red).effects(Effects::BOLD),
        }
    }

    /// `[h:mm:ss AM] text`, wrapped in ANSI styling when color is on.
    pub fn format_line(&self, stamp: &str, event: &FarmEvent) -> String {
        let line = format!("[{stamp}] {}", event.message());
        if !self.color {
            return line;
        }
        let style = Self::style(event.tone());
        format!("{}{line}{}", style.render(), style.render_reset())
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &FarmEvent) {
        let stamp = Local::now().format("%-I:%M:%S %p").to_string();
        let line = self.format_line(&stamp, event);
        let mut out = std::io::stdout().lock();
        if let Err(err) = writeln!(out, "{line}") {
            tracing::warn!(error = %err, "farm.report.write_failed");
        }
    }
}
