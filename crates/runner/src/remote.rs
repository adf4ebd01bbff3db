//! JSON-line client for the session gateway.
//!
//! The gateway owns the game's wire protocol and login handshake. We send one JSON object
//! per line and read one JSON object back. A successful login binds the control connection,
//! so inventory queries on the same connection need no token.

use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpStream, tcp::OwnedReadHalf, tcp::OwnedWriteHalf};
use tokio::sync::Mutex;

use rusty_farm_core::player::{DuplicatePolicy, InventorySnapshot, OwnedPokemon, Pokeball};
use rusty_farm_core::session::{
    CatchResponse, Credentials, EncounterResponse, EvolveOutcome, RpcFuture, Session,
    SessionClient,
};
use rusty_farm_core::world::{FortDetails, FortReward, MapSnapshot};

pub const SCHEMA_VERSION: u64 = 1;

struct ControlConn {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

pub struct Gateway {
    conn: Mutex<ControlConn>,
}

impl Gateway {
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("connect session gateway {addr}"))?;
        let (read, write) = stream.into_split();
        Ok(Self {
            conn: Mutex::new(ControlConn {
                reader: BufReader::new(read),
                writer: write,
            }),
        })
    }

    fn request(op: &str, token: Option<&str>, args: Value) -> Value {
        let mut req = json!({
            "schema_version": SCHEMA_VERSION,
            "op": op,
            "args": args,
        });
        if let Some(token) = token {
            req["token"] = Value::String(token.to_string());
        }
        req
    }

    fn response_result(op: &str, resp: Value) -> anyhow::Result<Value> {
        if resp.get("ok").and_then(|v| v.as_bool()) != Some(true) {
            let error = resp
                .get("error")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| resp.to_string());
            anyhow::bail!("{op} failed: {error}");
        }
        Ok(resp.get("result").cloned().unwrap_or(Value::Null))
    }

    async fn request_json(&self, req: Value) -> anyhow::Result<Value> {
        let line = format!("{req}\n");
        let mut conn = self.conn.lock().await;
        conn.writer
            .write_all(line.as_bytes())
            .await
            .context("gateway write")?;
        conn.writer.flush().await.context("gateway flush")?;

        let mut resp_line = String::new();
        let n = conn
            .reader
            .read_line(&mut resp_line)
            .await
            .context("gateway read")?;
        if n == 0 {
            anyhow::bail!("gateway connection closed");
        }
        serde_json::from_str(resp_line.trim()).context("invalid gateway json response")
    }

    pub async fn call<T: DeserializeOwned>(
        &self,
        op: &str,
        token: Option<&str>,
        args: Value,
    ) -> anyhow::Result<T> {
        tracing::trace!(op, "gateway.request");
        let resp = self.request_json(Self::request(op, token, args)).await?;
        let result = Self::response_result(op, resp)?;
        serde_json::from_value(result).with_context(|| format!("decode {op} result"))
    }
}

#[derive(Deserialize)]
struct LoginResult {
    token: String,
}

#[derive(Deserialize)]
struct ServerResult {
    endpoint: String,
}

pub struct RemoteSessionClient {
    gateway: Arc<Gateway>,
    start_latitude: f64,
    start_longitude: f64,
}

impl RemoteSessionClient {
    pub fn new(gateway: Arc<Gateway>, start_latitude: f64, start_longitude: f64) -> Self {
        Self {
            gateway,
            start_latitude,
            start_longitude,
        }
    }

    fn login_args(&self, credentials: &Credentials) -> anyhow::Result<Value> {
        let mut args = serde_json::to_value(credentials).context("encode credentials")?;
        args["latitude"] = json!(self.start_latitude);
        args["longitude"] = json!(self.start_longitude);
        Ok(args)
    }
}

impl SessionClient for RemoteSessionClient {
    fn authenticate<'a>(&'a self, credentials: &'a Credentials) -> RpcFuture<'a, Session> {
        Box::pin(async move {
            let args = self.login_args(credentials)?;
            let res: LoginResult = self.gateway.call("login", None, args).await?;
            anyhow::Ok(Session {
                auth: credentials.kind(),
                token: res.token,
                endpoint: None,
            })
        })
    }

    fn resolve_endpoint<'a>(&'a self, session: &'a mut Session) -> RpcFuture<'a, ()> {
        Box::pin(async move {
            let res: ServerResult = self
                .gateway
                .call("set_server", Some(&session.token), json!({}))
                .await?;
            session.endpoint = Some(res.endpoint);
            anyhow::Ok(())
        })
    }

    fn get_map_objects<'a>(&'a self, session: &'a Session) -> RpcFuture<'a, MapSnapshot> {
        Box::pin(async move {
            self.gateway
                .call("get_map_objects", Some(&session.token), json!({}))
                .await
        })
    }

    fn update_player_location<'a>(
        &'a self,
        session: &'a Session,
        latitude: f64,
        longitude: f64,
    ) -> RpcFuture<'a, ()> {
        Box::pin(async move {
            let _: Value = self
                .gateway
                .call(
                    "update_location",
                    Some(&session.token),
                    json!({ "latitude": latitude, "longitude": longitude }),
                )
                .await?;
            anyhow::Ok(())
        })
    }

    fn get_fort<'a>(
        &'a self,
        session: &'a Session,
        fort_id: &'a str,
        latitude: f64,
        longitude: f64,
    ) -> RpcFuture<'a, FortDetails> {
        Box::pin(async move {
            self.gateway
                .call(
                    "fort_details",
                    Some(&session.token),
                    json!({ "fort_id": fort_id, "latitude": latitude, "longitude": longitude }),
                )
                .await
        })
    }

    fn search_fort<'a>(
        &'a self,
        session: &'a Session,
        fort_id: &'a str,
        latitude: f64,
        longitude: f64,
    ) -> RpcFuture<'a, FortReward> {
        Box::pin(async move {
            self.gateway
                .call(
                    "fort_search",
                    Some(&session.token),
                    json!({ "fort_id": fort_id, "latitude": latitude, "longitude": longitude }),
                )
                .await
        })
    }

    fn encounter_pokemon<'a>(
        &'a self,
        session: &'a Session,
        encounter_id: u64,
        spawn_point_id: &'a str,
    ) -> RpcFuture<'a, EncounterResponse> {
        Box::pin(async move {
            self.gateway
                .call(
                    "encounter",
                    Some(&session.token),
                    json!({ "encounter_id": encounter_id, "spawn_point_id": spawn_point_id }),
                )
                .await
        })
    }

    fn catch_pokemon<'a>(
        &'a self,
        session: &'a Session,
        encounter_id: u64,
        spawn_point_id: &'a str,
        latitude: f64,
        longitude: f64,
        ball: Pokeball,
    ) -> RpcFuture<'a, CatchResponse> {
        Box::pin(async move {
            self.gateway
                .call(
                    "catch",
                    Some(&session.token),
                    json!({
                        "encounter_id": encounter_id,
                        "spawn_point_id": spawn_point_id,
                        "latitude": latitude,
                        "longitude": longitude,
                        "item_id": ball.item_id(),
                    }),
                )
                .await
        })
    }

    fn release_pokemon<'a>(&'a self, session: &'a Session, pokemon_id: u64) -> RpcFuture<'a, ()> {
        Box::pin(async move {
            // The gateway echoes the transfer result; only transport success matters here.
            let _: Value = self
                .gateway
                .call(
                    "release",
                    Some(&session.token),
                    json!({ "pokemon_id": pokemon_id }),
                )
                .await?;
            anyhow::Ok(())
        })
    }

    fn evolve_pokemon<'a>(
        &'a self,
        session: &'a Session,
        pokemon_id: u64,
    ) -> RpcFuture<'a, EvolveOutcome> {
        Box::pin(async move {
            self.gateway
                .call(
                    "evolve",
                    Some(&session.token),
                    json!({ "pokemon_id": pokemon_id }),
                )
                .await
        })
    }
}

/// Inventory view over the gateway. Every call is a fresh query.
pub struct RemoteInventory {
    gateway: Arc<Gateway>,
    policy: DuplicatePolicy,
}

impl RemoteInventory {
    pub fn new(gateway: Arc<Gateway>, policy: DuplicatePolicy) -> Self {
        Self { gateway, policy }
    }
}

impl InventorySnapshot for RemoteInventory {
    fn held_count<'a>(&'a self, ball: Pokeball) -> RpcFuture<'a, i32> {
        Box::pin(async move {
            self.gateway
                .call("item_count", None, json!({ "item_id": ball.item_id() }))
                .await
        })
    }

    fn duplicate_pokemon<'a>(&'a self) -> RpcFuture<'a, Vec<OwnedPokemon>> {
        Box::pin(async move {
            let owned: Vec<OwnedPokemon> = self
                .gateway
                .call("inventory_pokemon", None, json!({}))
                .await?;
            anyhow::Ok(self.policy.select(&owned))
        })
    }
}
