use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use devprofile_lib::{ProfileStore, DB};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::error::panic_response;

pub fn router<T>(store: ProfileStore<T>) -> Router
where
    T: DB + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // an unsupported method on a known path is treated like an unknown path
    Router::new()
        .route(
            "/health",
            get(api::health).fallback(api::route_not_found),
        )
        .route(
            "/api/profile",
            get(api::get_profile::<T>)
                .post(api::create_profile::<T>)
                .put(api::update_profile::<T>)
                .delete(api::delete_profile::<T>)
                .fallback(api::route_not_found),
        )
        .route(
            "/api/projects",
            get(api::projects_by_skill::<T>).fallback(api::route_not_found),
        )
        .route(
            "/api/skills/top",
            get(api::top_skills::<T>).fallback(api::route_not_found),
        )
        .route(
            "/api/search",
            get(api::search::<T>).fallback(api::route_not_found),
        )
        .fallback(api::route_not_found)
        .with_state(Arc::new(store))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_webserver<T, F>(
    addr: SocketAddr,
    store: ProfileStore<T>,
    shutdown: F,
) -> anyhow::Result<()>
where
    T: DB + Send + Sync + 'static,
    F: Future<Output = ()>,
{
    let app = router(store);

    tracing::info!("Profile API listening on http://{}", addr);
    axum::Server::try_bind(&addr)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
