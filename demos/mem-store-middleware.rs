//! In this example, we create a RateLimit middleware allowing 100 requests per minute.
//! We use [store::MemStore] as our storage.

use std::time::Duration;
use actix_web::{App, HttpRequest, HttpServer, web};
use actix_restriction::{config, controller, gate, middleware, store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("actix_restriction=debug")
        .init();

    // one store for all workers, otherwise each worker would count on its own.
    let store = store::MemStore::new(1024);
    let config = config::RestrictionConfig::new(100, Duration::from_secs(60))?
        .with_log(true);

    HttpServer::new(move || {
        // the gate shares the store, cloning a MemStore shares its data.
        let gate = gate::RateGate::new(config, store.clone());

        let controller = controller::Controller::<store::MemStore>::default()
            .on_ok(|req, entity| {
                println!("{} may send {} more requests", req.path(), entity.times_remaining);
            });

        App::new()
            .wrap(middleware::RateLimit::new(gate, controller))
            .service(web::resource("/hello").route(web::get().to(hello_world)))
    })
        .bind("0.0.0.0:8080")?
        .run()
        .await?;

    Ok(())
}

async fn hello_world(req: HttpRequest) -> String {
    match middleware::quota_of(&req) {
        Some(entity) => format!("Hello, World! ({} left)", entity.times_remaining),
        None => "Hello, World!".to_string(),
    }
}
