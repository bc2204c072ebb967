pub mod rest;

use std::net::SocketAddr;

use anyhow::anyhow;
use axum::{
    Router,
    extract::{Extension, Request},
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use self::rest::{cache::clear_cache, chapter, content, health::health_check, index, not_found};
use crate::domain::{
    repositories::{cache::ListingCacheRepository, snapshot::SnapshotRepository, source::SourceRepository},
    services::{chapter::ChapterService, content::ContentService},
};

pub struct ServerBuilder<C, R, S>
where
    C: ListingCacheRepository,
    R: SourceRepository,
    S: SnapshotRepository,
{
    chapter_svc: Option<ChapterService<C, R, S>>,
    content_svc: Option<ContentService<R>>,
}

impl<C, R, S> Default for ServerBuilder<C, R, S>
where
    C: ListingCacheRepository,
    R: SourceRepository,
    S: SnapshotRepository,
{
    fn default() -> Self {
        Self {
            chapter_svc: None,
            content_svc: None,
        }
    }
}

impl<C, R, S> ServerBuilder<C, R, S>
where
    C: ListingCacheRepository + Clone + 'static,
    R: SourceRepository + Clone + 'static,
    S: SnapshotRepository + Clone + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chapter_svc(self, chapter_svc: ChapterService<C, R, S>) -> Self {
        Self {
            chapter_svc: Some(chapter_svc),
            ..self
        }
    }

    pub fn with_content_svc(self, content_svc: ContentService<R>) -> Self {
        Self {
            content_svc: Some(content_svc),
            ..self
        }
    }

    pub fn build(self) -> Result<Server, anyhow::Error> {
        let chapter_svc = self
            .chapter_svc
            .ok_or_else(|| anyhow!("no chapter service"))?;
        let content_svc = self
            .content_svc
            .ok_or_else(|| anyhow!("no content service"))?;

        Ok(Server::new(chapter_svc, content_svc))
    }
}

pub struct Server {
    router: Router,
}

impl Server {
    pub fn new<C, R, S>(chapter_svc: ChapterService<C, R, S>, content_svc: ContentService<R>) -> Self
    where
        C: ListingCacheRepository + Clone + 'static,
        R: SourceRepository + Clone + 'static,
        S: SnapshotRepository + Clone + 'static,
    {
        let router = Router::new()
            .route("/", get(index))
            .route("/api/chapters/{language}", get(chapter::get_chapters::<C, R, S>))
            .route("/api/chapter/content", get(content::get_content::<R>))
            .route("/api/cache/clear", post(clear_cache::<C, R, S>))
            .route("/api/health", get(health_check::<C, R, S>))
            .fallback(not_found)
            .layer(Extension(chapter_svc))
            .layer(Extension(content_svc))
            .layer(middleware::from_fn(log_request))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers(Any),
            );

        Self { router }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn serve<A: Into<SocketAddr>>(self, addr: A) -> Result<(), anyhow::Error> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("listening on http://{addr}");

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

async fn log_request(req: Request, next: Next) -> Response {
    info!("{} {}", req.method(), req.uri().path());
    next.run(req).await
}
