use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Mutex;

use bevy::prelude::*;
use homeworld_shared::sun_times::SunTimes;
use homeworld_shared::SunTimesError;
use url::Url;

use super::{SimState, UpdateSet};

const FETCH_TIMEOUT_SECS: u64 = 10;

type FetchOutcome = Result<String, SunTimesError>;

/// Fetches today's sunrise and sunset once at startup.
pub struct SunFetchPlugin {
    /// `None` skips the request and settles on the configured fallback.
    pub url: Option<Url>,
}

#[derive(Resource)]
pub(crate) struct SunFetch {
    rx: Mutex<Receiver<FetchOutcome>>,
    resolved: bool,
}

impl SunFetch {
    pub(crate) fn from_receiver(rx: Receiver<FetchOutcome>) -> Self {
        Self {
            rx: Mutex::new(rx),
            resolved: false,
        }
    }

    pub(crate) fn start(url: Option<Url>) -> Self {
        let (tx, rx) = mpsc::channel();
        match url {
            Some(url) => spawn_fetch(url, tx),
            None => {
                let _ = tx.send(Err(SunTimesError::Fetch("no sun endpoint configured".into())));
            }
        }
        Self::from_receiver(rx)
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// `Some` once the request finished or the worker went away.
    fn poll(&self) -> Option<FetchOutcome> {
        let rx = self.rx.lock().ok()?;
        match rx.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(SunTimesError::Fetch(
                "fetch worker exited without a result".into(),
            ))),
        }
    }
}

impl Plugin for SunFetchPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SunFetch::start(self.url.clone()))
            .add_systems(Update, poll_sun_fetch.in_set(UpdateSet::Input));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_fetch(url: Url, tx: Sender<FetchOutcome>) {
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
        {
            Ok(rt) => rt,
            Err(err) => {
                let _ = tx.send(Err(SunTimesError::Fetch(format!(
                    "failed to build runtime: {err}"
                ))));
                return;
            }
        };

        let outcome = rt.block_on(fetch_body(url));
        let _ = tx.send(outcome);
    });
}

#[cfg(target_arch = "wasm32")]
fn spawn_fetch(_url: Url, tx: Sender<FetchOutcome>) {
    let _ = tx.send(Err(SunTimesError::Fetch(
        "sun fetch is not available on this target".into(),
    )));
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_body(url: Url) -> FetchOutcome {
    let fetch_err = |e: reqwest::Error| SunTimesError::Fetch(e.to_string());

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(fetch_err)?;

    debug!(%url, "requesting sun times");
    client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_err)?
        .text()
        .await
        .map_err(fetch_err)
}

fn poll_sun_fetch(mut fetch: ResMut<SunFetch>, mut state: ResMut<SimState>) {
    if fetch.is_resolved() {
        return;
    }
    let Some(outcome) = fetch.poll() else {
        return;
    };

    let local = *chrono::Local::now().offset();
    let fallback = state.sim.config().sun.fallback();
    let (times, status) = SunTimes::from_fetch(outcome, &local, fallback);
    state.sim.resolve_sun_times(times, status);
    fetch.resolved = true;
}
