//! In this example, we create a RateLimit middleware with a store kept in a static,
//! allowing 3 requests per 10 seconds for each `X-Api-Key`.

use std::time::Duration;
use actix_web::{App, HttpResponse, HttpServer, web};
use lazy_static::lazy_static;
use actix_restriction::{config, controller, gate, store};
use actix_restriction::middleware::RateLimit;

lazy_static! {
    static ref STORE: store::MemStore = store::MemStore::new(1024);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::RestrictionConfig::new(3, Duration::from_secs(10))?;

    HttpServer::new(move || {
        let controller = controller::Controller::<store::MemStore>::default()
            .with_find_identifier(|req| {
                req.headers()
                    .get("x-api-key")
                    .and_then(|key| key.to_str().ok())
                    .unwrap_or("anonymous")
                    .to_string()
            })
            .on_reject(|_, entity| {
                HttpResponse::TooManyRequests()
                    .body(format!("quota of {} used up, retry at {}", entity.total_limit, entity.reset_timestamp))
            });

        App::new()
            .wrap(RateLimit::new(gate::RateGate::new(config, STORE.clone()), controller))
            .service(web::resource("/hello").route(web::get().to(hello_world)))
    })
        .bind("0.0.0.0:8080")?
        .run()
        .await?;

    Ok(())
}

async fn hello_world() -> &'static str {
    "Hello, World!"
}
