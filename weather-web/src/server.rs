//! HTTP surface: `/` renders and adds cities, `/delete/{city_id}` removes one.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use weather_core::{
    CityStore, StoreError, WeatherProvider,
    view::{self, AddCity},
};

use crate::{flash, page};

/// Shared state for all handlers. The store is the only mutable resource.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CityStore>,
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(store: impl CityStore + 'static, provider: Box<dyn WeatherProvider>) -> Self {
        Self { store: Arc::new(store), provider: Arc::from(provider) }
    }
}

/// Form body of the add-city submission.
#[derive(Debug, Deserialize)]
pub struct AddCityForm {
    pub city_name: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index).post(handle_add_city))
        .route("/delete/{city_id}", get(handle_delete_city).post(handle_delete_city))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "weather server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("weather server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}

/// GET /: current weather for every stored city.
async fn handle_index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let flashes = flash::read(&headers);

    let cities = match with_store(&state.store, |store| store.list()).await {
        Ok(cities) => cities,
        Err(resp) => return resp,
    };
    let dashboard = view::render_cities(cities, state.provider.as_ref()).await;

    let html = Html(page::render(&dashboard, &flashes));

    if flashes.is_empty() {
        html.into_response()
    } else {
        ([(header::SET_COOKIE, flash::clear_cookie())], html).into_response()
    }
}

/// POST /: add a city, then back to the dashboard.
async fn handle_add_city(State(state): State<AppState>, Form(form): Form<AddCityForm>) -> Response {
    let name = form.city_name;
    match with_store(&state.store, move |store| view::add_city(store, name.as_deref())).await {
        Ok(AddCity::Added(_)) => Redirect::to("/").into_response(),
        Ok(AddCity::Rejected(warning)) => {
            ([(header::SET_COOKIE, flash::set_cookie(&[warning]))], Redirect::to("/"))
                .into_response()
        }
        Err(resp) => resp,
    }
}

/// GET|POST /delete/{city_id}: remove a city (no-op if unknown).
async fn handle_delete_city(State(state): State<AppState>, Path(city_id): Path<i64>) -> Response {
    match with_store(&state.store, move |store| view::delete_city(store, city_id)).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(resp) => resp,
    }
}

/// Run a blocking SQLite operation on tokio's blocking pool.
async fn with_store<T, F>(store: &Arc<dyn CityStore>, op: F) -> Result<T, Response>
where
    F: FnOnce(&dyn CityStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    match tokio::task::spawn_blocking(move || op(store.as_ref())).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(storage_error(e)),
        Err(e) => {
            tracing::error!(error = %e, "city store task failed");
            Err(internal_error())
        }
    }
}

fn storage_error(err: StoreError) -> Response {
    tracing::error!(error = %err, "city store failure");
    internal_error()
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}
