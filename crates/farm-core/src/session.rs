use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::player::Pokeball;
use crate::world::{FortDetails, FortReward, MapSnapshot};

pub type RpcFuture<'a, T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthKind {
    Ptc,
    Google,
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthKind::Ptc => f.write_str("PTC"),
            AuthKind::Google => f.write_str("Google"),
        }
    }
}

/// Login material for one of the two mutually exclusive auth methods.
#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Credentials {
    Ptc { username: String, password: String },
    Google { token: String },
}

impl Credentials {
    pub fn kind(&self) -> AuthKind {
        match self {
            Credentials::Ptc { .. } => AuthKind::Ptc,
            Credentials::Google { .. } => AuthKind::Google,
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Ptc { username, .. } => f
                .debug_struct("Ptc")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Google { .. } => f
                .debug_struct("Google")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Authenticated session handle. Owned by the supervisor and lent to every call.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Session {
    pub auth: AuthKind,
    pub token: String,
    /// Serving endpoint; re-resolved at the top of every farm iteration.
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct EncounterResponse {
    /// Combat power of the wild pokemon, if the encounter resolved it.
    #[serde(default)]
    pub cp: Option<i32>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CatchStatus {
    Success,
    Escape,
    Flee,
    Missed,
    Error,
}

impl CatchStatus {
    /// Only a missed throw is worth another ball on the same encounter.
    pub fn is_retryable(self) -> bool {
        self == CatchStatus::Missed
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CatchResponse {
    pub status: CatchStatus,
    /// Per-bonus xp breakdown; only populated on success.
    #[serde(default)]
    pub xp: Vec<i32>,
}

impl CatchResponse {
    pub fn xp_awarded(&self) -> i32 {
        self.xp.iter().sum()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvolveOutcome {
    Success { exp_awarded: i32 },
    Failed { reason: String },
}

/// Boundary to the game service. The farm loops only ever talk to the game through this.
///
/// Any call may fail with a transport error; callers propagate it to the supervisor.
pub trait SessionClient: Send + Sync {
    fn authenticate<'a>(&'a self, credentials: &'a Credentials) -> RpcFuture<'a, Session>;

    /// Must succeed before any other call in a farm iteration.
    fn resolve_endpoint<'a>(&'a self, session: &'a mut Session) -> RpcFuture<'a, ()>;

    fn get_map_objects<'a>(&'a self, session: &'a Session) -> RpcFuture<'a, MapSnapshot>;

    fn update_player_location<'a>(
        &'a self,
        session: &'a Session,
        latitude: f64,
        longitude: f64,
    ) -> RpcFuture<'a, ()>;

    fn get_fort<'a>(
        &'a self,
        session: &'a Session,
        fort_id: &'a str,
        latitude: f64,
        longitude: f64,
    ) -> RpcFuture<'a, FortDetails>;

    fn search_fort<'a>(
        &'a self,
        session: &'a Session,
        fort_id: &'a str,
        latitude: f64,
        longitude: f64,
    ) -> RpcFuture<'a, FortReward>;

    fn encounter_pokemon<'a>(
        &'a self,
        session: &'a Session,
        encounter_id: u64,
        spawn_point_id: &'a str,
    ) -> RpcFuture<'a, EncounterResponse>;

    fn catch_pokemon<'a>(
        &'a self,
        session: &'a Session,
        encounter_id: u64,
        spawn_point_id: &'a str,
        latitude: f64,
        longitude: f64,
        ball: Pokeball,
    ) -> RpcFuture<'a, CatchResponse>;

    fn release_pokemon<'a>(&'a self, session: &'a Session, pokemon_id: u64) -> RpcFuture<'a, ()>;

    fn evolve_pokemon<'a>(
        &'a self,
        session: &'a Session,
        pokemon_id: u64,
    ) -> RpcFuture<'a, EvolveOutcome>;
}
