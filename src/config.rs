use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::game::{CardError, DeckComposition, PlayerId};
use crate::trace::TraceFormat;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("At least one player is required")]
    NoPlayers,

    #[error("At least one round is required")]
    NoRounds,

    #[error("{0} players is more than player ids can number")]
    TooManyPlayers(usize),

    #[error("Turn limit must allow at least one turn per round")]
    NoTurnsAllowed,

    #[error("Deck of {cards} cards is too small for {players} players")]
    DeckTooSmall { cards: usize, players: usize },

    #[error("Deck composition contains no pair, no round could ever end")]
    NoPairPossible,

    #[error("Invalid deck composition: {0}")]
    Composition(#[from] CardError),
}

/// Run parameters
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub players: usize,
    pub rounds: usize,
    /// Cards the dealer shuffles at the start of every round
    pub composition: DeckComposition,
    /// Fixed seed for reproducible shuffles and discards; `None` seeds from
    /// the operating system
    pub seed: Option<u64>,
    pub trace_path: PathBuf,
    pub trace_format: TraceFormat,
    /// Upper bound on player turns per round; `None` lets a round run as
    /// long as it takes
    pub max_turns_per_round: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            players: 3,
            rounds: 3,
            composition: DeckComposition::standard(),
            seed: None,
            trace_path: PathBuf::from("log.txt"),
            trace_format: TraceFormat::Text,
            max_turns_per_round: None,
        }
    }
}

impl SimulationConfig {
    pub const PLAYERS_VAR: &'static str = "CARDGAME_PLAYERS";
    pub const ROUNDS_VAR: &'static str = "CARDGAME_ROUNDS";
    pub const SEED_VAR: &'static str = "CARDGAME_SEED";
    pub const TRACE_PATH_VAR: &'static str = "CARDGAME_TRACE_PATH";
    pub const TRACE_FORMAT_VAR: &'static str = "CARDGAME_TRACE_FORMAT";
    pub const RANKS_VAR: &'static str = "CARDGAME_RANKS";
    pub const MAX_TURNS_VAR: &'static str = "CARDGAME_MAX_TURNS";

    /// Reads overrides from the process environment. Unset variables keep
    /// their defaults; set but unparsable ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(players) = read(&lookup, Self::PLAYERS_VAR)? {
            config.players = players;
        }
        if let Some(rounds) = read(&lookup, Self::ROUNDS_VAR)? {
            config.rounds = rounds;
        }
        if let Some(seed) = read(&lookup, Self::SEED_VAR)? {
            config.seed = Some(seed);
        }
        if let Some(path) = lookup(Self::TRACE_PATH_VAR) {
            config.trace_path = PathBuf::from(path);
        }
        if let Some(format) = read(&lookup, Self::TRACE_FORMAT_VAR)? {
            config.trace_format = format;
        }
        if let Some(ranks) = lookup(Self::RANKS_VAR) {
            config.composition = parse_ranks(&ranks)?;
        }
        if let Some(max_turns) = read(&lookup, Self::MAX_TURNS_VAR)? {
            config.max_turns_per_round = Some(max_turns);
        }

        Ok(config)
    }

    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_composition(mut self, composition: DeckComposition) -> Self {
        self.composition = composition;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_trace_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.trace_path = path.into();
        self
    }

    pub fn with_trace_format(mut self, format: TraceFormat) -> Self {
        self.trace_format = format;
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns_per_round = Some(max_turns);
        self
    }

    /// Checks the parameters can produce rounds that terminate. Every player
    /// holds one card between turns and the active player briefly holds two,
    /// so the deck needs at least one card more than there are players.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if u32::try_from(self.players).is_err() {
            return Err(ConfigError::TooManyPlayers(self.players));
        }
        if self.rounds == 0 {
            return Err(ConfigError::NoRounds);
        }
        if self.composition.len() <= self.players {
            return Err(ConfigError::DeckTooSmall {
                cards: self.composition.len(),
                players: self.players,
            });
        }
        if !self.composition.has_pair() {
            return Err(ConfigError::NoPairPossible);
        }
        if self.max_turns_per_round == Some(0) {
            return Err(ConfigError::NoTurnsAllowed);
        }
        Ok(())
    }

    /// Player identities `1..=players`. Counts past `u32::MAX` are rejected
    /// by `validate`, so no id is ever skipped for a validated config.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        (1..=self.players)
            .map_while(|n| u32::try_from(n).ok())
            .map(PlayerId::new)
            .collect()
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn read<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                key,
                value: raw.clone(),
            })
        })
        .transpose()
}

/// Parses a comma separated list of ranks such as `5,5,7,7`
fn parse_ranks(raw: &str) -> Result<DeckComposition, ConfigError> {
    let ranks = raw
        .split(',')
        .map(|rank| {
            rank.trim().parse::<u8>().map_err(|_| ConfigError::InvalidValue {
                key: SimulationConfig::RANKS_VAR,
                value: raw.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DeckComposition::from_ranks(&ranks)?)
}
