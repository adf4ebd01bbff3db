//! In-memory collaborators for the farm loop tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::config::Pacing;
use crate::player::{BallStock, InventorySnapshot, OwnedPokemon, Pokeball};
use crate::report::{FarmEvent, Reporter};
use crate::session::{
    AuthKind, CatchResponse, CatchStatus, Credentials, EncounterResponse, EvolveOutcome,
    RpcFuture, Session, SessionClient,
};
use crate::world::{
    CatchablePokemon, Fort, FortDetails, FortReward, FortType, MapCell, MapSnapshot, PokemonId,
};

use super::FarmCtx;
use super::capture::CatchRetryPolicy;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Authenticate(AuthKind),
    ResolveEndpoint,
    GetMapObjects,
    UpdateLocation(f64, f64),
    GetFort(String),
    SearchFort(String),
    Encounter(u64),
    Catch(u64, Pokeball),
    Release(u64),
    Evolve(u64),
}

#[derive(Default)]
pub struct FakeSession {
    pub calls: Mutex<Vec<Call>>,
    pub maps: Mutex<VecDeque<anyhow::Result<MapSnapshot>>>,
    pub encounters: Mutex<VecDeque<EncounterResponse>>,
    pub catches: Mutex<VecDeque<anyhow::Result<CatchStatus>>>,
    pub evolutions: Mutex<VecDeque<EvolveOutcome>>,
    pub fail_login: bool,
}

impl FakeSession {
    pub fn push_map(&self, map: MapSnapshot) {
        self.maps.lock().unwrap().push_back(Ok(map));
    }

    pub fn push_map_error(&self, msg: &'static str) {
        self.maps
            .lock()
            .unwrap()
            .push_back(Err(anyhow::anyhow!(msg)));
    }

    pub fn push_encounter(&self, cp: Option<i32>) {
        self.encounters
            .lock()
            .unwrap()
            .push_back(EncounterResponse { cp });
    }

    pub fn push_catch(&self, status: CatchStatus) {
        self.catches.lock().unwrap().push_back(Ok(status));
    }

    pub fn push_catch_error(&self, msg: &'static str) {
        self.catches
            .lock()
            .unwrap()
            .push_back(Err(anyhow::anyhow!(msg)));
    }

    pub fn push_evolve(&self, outcome: EvolveOutcome) {
        self.evolutions.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(*c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SessionClient for FakeSession {
    fn authenticate<'a>(&'a self, credentials: &'a Credentials) -> RpcFuture<'a, Session> {
        Box::pin(async move {
            self.record(Call::Authenticate(credentials.kind()));
            if self.fail_login {
                anyhow::bail!("bad credentials");
            }
            Ok(Session {
                auth: credentials.kind(),
                token: "token-1".to_string(),
                endpoint: None,
            })
        })
    }

    fn resolve_endpoint<'a>(&'a self, session: &'a mut Session) -> RpcFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::ResolveEndpoint);
            session.endpoint = Some("https://pgorelease.example/rpc".to_string());
            Ok(())
        })
    }

    fn get_map_objects<'a>(&'a self, _session: &'a Session) -> RpcFuture<'a, MapSnapshot> {
        Box::pin(async move {
            self.record(Call::GetMapObjects);
            self.maps
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(MapSnapshot::default()))
        })
    }

    fn update_player_location<'a>(
        &'a self,
        _session: &'a Session,
        latitude: f64,
        longitude: f64,
    ) -> RpcFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::UpdateLocation(latitude, longitude));
            Ok(())
        })
    }

    fn get_fort<'a>(
        &'a self,
        _session: &'a Session,
        fort_id: &'a str,
        _latitude: f64,
        _longitude: f64,
    ) -> RpcFuture<'a, FortDetails> {
        Box::pin(async move {
            self.record(Call::GetFort(fort_id.to_string()));
            Ok(FortDetails {
                name: format!("Stop {fort_id}"),
            })
        })
    }

    fn search_fort<'a>(
        &'a self,
        _session: &'a Session,
        fort_id: &'a str,
        _latitude: f64,
        _longitude: f64,
    ) -> RpcFuture<'a, FortReward> {
        Box::pin(async move {
            self.record(Call::SearchFort(fort_id.to_string()));
            Ok(FortReward {
                experience_awarded: 50,
                ..FortReward::default()
            })
        })
    }

    fn encounter_pokemon<'a>(
        &'a self,
        _session: &'a Session,
        encounter_id: u64,
        _spawn_point_id: &'a str,
    ) -> RpcFuture<'a, EncounterResponse> {
        Box::pin(async move {
            self.record(Call::Encounter(encounter_id));
            Ok(self
                .encounters
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default())
        })
    }

    fn catch_pokemon<'a>(
        &'a self,
        _session: &'a Session,
        encounter_id: u64,
        _spawn_point_id: &'a str,
        _latitude: f64,
        _longitude: f64,
        ball: Pokeball,
    ) -> RpcFuture<'a, CatchResponse> {
        Box::pin(async move {
            self.record(Call::Catch(encounter_id, ball));
            let status = self
                .catches
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(CatchStatus::Success))?;
            let xp = if status == CatchStatus::Success {
                vec![100, 10]
            } else {
                vec![]
            };
            anyhow::Ok(CatchResponse { status, xp })
        })
    }

    fn release_pokemon<'a>(&'a self, _session: &'a Session, pokemon_id: u64) -> RpcFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::Release(pokemon_id));
            Ok(())
        })
    }

    fn evolve_pokemon<'a>(
        &'a self,
        _session: &'a Session,
        pokemon_id: u64,
    ) -> RpcFuture<'a, EvolveOutcome> {
        Box::pin(async move {
            self.record(Call::Evolve(pokemon_id));
            self.evolutions
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("no evolve outcome queued"))
        })
    }
}

#[derive(Default)]
pub struct FakeInventory {
    pub stock: Mutex<BallStock>,
    pub duplicates: Mutex<VecDeque<Vec<OwnedPokemon>>>,
    pub duplicate_queries: Mutex<usize>,
}

impl FakeInventory {
    pub fn with_stock(stock: BallStock) -> Self {
        Self {
            stock: Mutex::new(stock),
            ..Self::default()
        }
    }

    pub fn push_duplicates(&self, dupes: Vec<OwnedPokemon>) {
        self.duplicates.lock().unwrap().push_back(dupes);
    }

    pub fn duplicate_queries(&self) -> usize {
        *self.duplicate_queries.lock().unwrap()
    }
}

impl InventorySnapshot for FakeInventory {
    fn held_count<'a>(&'a self, ball: Pokeball) -> RpcFuture<'a, i32> {
        Box::pin(async move { Ok(self.stock.lock().unwrap().count(ball)) })
    }

    fn duplicate_pokemon<'a>(&'a self) -> RpcFuture<'a, Vec<OwnedPokemon>> {
        Box::pin(async move {
            *self.duplicate_queries.lock().unwrap() += 1;
            Ok(self
                .duplicates
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default())
        })
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub events: Mutex<Vec<FarmEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<FarmEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, event: &FarmEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn ctx<'a>(
    client: &'a FakeSession,
    inventory: &'a FakeInventory,
    reporter: &'a RecordingReporter,
) -> FarmCtx<'a> {
    FarmCtx {
        client,
        inventory,
        reporter,
        pacing: Pacing::immediate(),
        retry: CatchRetryPolicy::default(),
    }
}

pub fn session() -> Session {
    Session {
        auth: AuthKind::Ptc,
        token: "token-1".to_string(),
        endpoint: None,
    }
}

pub fn pokestop(id: &str, latitude: f64, longitude: f64) -> Fort {
    Fort {
        id: id.to_string(),
        latitude,
        longitude,
        fort_type: FortType::Checkpoint,
        cooldown_complete_ms: 0,
    }
}

pub fn wild(encounter_id: u64, species: u32) -> CatchablePokemon {
    CatchablePokemon {
        encounter_id,
        spawn_point_id: format!("sp{encounter_id}"),
        latitude: 1.0 + encounter_id as f64,
        longitude: 2.0,
        pokemon_id: PokemonId(species),
    }
}

pub fn map(forts: Vec<Fort>, pokemon: Vec<CatchablePokemon>) -> MapSnapshot {
    MapSnapshot {
        map_cells: vec![MapCell {
            forts,
            catchable_pokemons: pokemon,
        }],
    }
}

pub fn owned(id: u64, species: u32, cp: i32) -> OwnedPokemon {
    OwnedPokemon {
        id,
        pokemon_id: PokemonId(species),
        cp: Some(cp),
    }
}
