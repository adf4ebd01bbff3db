use anyhow::Context;
use chrono::Utc;

use super::sites::farm_pokestops;
use super::{FarmCtx, pause, prune};
use crate::report::FarmEvent;
use crate::session::{Credentials, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IterationSummary {
    pub forts_visited: usize,
    pub pokemon_encountered: usize,
    pub released: usize,
}

/// Result of one farm iteration. Failures carry the full rendered cause chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    Completed(IterationSummary),
    Failed { cause: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub iterations: u64,
    pub failures: u64,
}

/// Logs in once, then repeats farm iterations, absorbing every iteration failure.
pub struct Supervisor<'a> {
    ctx: FarmCtx<'a>,
    credentials: &'a Credentials,
}

impl<'a> Supervisor<'a> {
    pub fn new(ctx: FarmCtx<'a>, credentials: &'a Credentials) -> Self {
        Self { ctx, credentials }
    }

    /// Login failures are fatal: they are returned, never retried.
    pub async fn login(&self) -> anyhow::Result<Session> {
        let auth = self.credentials.kind();
        self.ctx.reporter.report(&FarmEvent::LoginStarted { auth });
        let session = self
            .ctx
            .client
            .authenticate(self.credentials)
            .await
            .with_context(|| format!("{auth} login"))?;
        tracing::info!(%auth, "farm.login.ok");
        self.ctx.reporter.report(&FarmEvent::LoggedIn { auth });
        Ok(session)
    }

    pub async fn run_iteration(&self, session: &mut Session, now_ms: i64) -> IterationOutcome {
        match self.farm_once(session, now_ms).await {
            Ok(summary) => {
                tracing::info!(
                    forts = summary.forts_visited,
                    pokemon = summary.pokemon_encountered,
                    released = summary.released,
                    "farm.iteration.done"
                );
                IterationOutcome::Completed(summary)
            }
            Err(err) => {
                let cause = format!("{err:#}");
                tracing::warn!(error = %cause, "farm.iteration.failed");
                self.ctx
                    .reporter
                    .report(&FarmEvent::IterationFailed { cause: cause.clone() });
                IterationOutcome::Failed { cause }
            }
        }
    }

    async fn farm_once(
        &self,
        session: &mut Session,
        now_ms: i64,
    ) -> anyhow::Result<IterationSummary> {
        self.ctx
            .client
            .resolve_endpoint(session)
            .await
            .context("resolve endpoint")?;
        self.ctx.reporter.report(&FarmEvent::EndpointResolved {
            endpoint: session.endpoint.clone(),
        });

        let sites = farm_pokestops(&self.ctx, session, now_ms).await?;

        self.ctx.reporter.report(&FarmEvent::ReleasePassStarted);
        let released = prune::release_duplicates(&self.ctx, session).await?;

        Ok(IterationSummary {
            forts_visited: sites.forts_visited,
            pokemon_encountered: sites.pokemon_encountered,
            released,
        })
    }

    /// Logs in and farms until `max_iterations` is reached, or forever when it is `None`.
    ///
    /// Every iteration, failed or not, is followed by the same fixed loop delay.
    pub async fn run(&self, max_iterations: Option<u64>) -> anyhow::Result<RunSummary> {
        let mut session = self.login().await?;
        let mut summary = RunSummary::default();

        loop {
            if let Some(max) = max_iterations
                && summary.iterations >= max
            {
                return Ok(summary);
            }

            summary.iterations += 1;
            let now_ms = Utc::now().timestamp_millis();
            if let IterationOutcome::Failed { .. } =
                self.run_iteration(&mut session, now_ms).await
            {
                summary.failures += 1;
            }

            pause(self.ctx.pacing.loop_delay()).await;
        }
    }
}
