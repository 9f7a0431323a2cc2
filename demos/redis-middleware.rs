//! In this example, we create a RateLimit middleware allowing 3 requests per 10 secs.
//! We use [RedisStore] as our storage, so every process sharing the redis shares the quota.

use std::time::Duration;
use actix_web::{App, HttpResponse, HttpServer, web};
use actix_restriction::{config, controller, gate};
use actix_restriction::middleware::RateLimit;
use actix_restriction::store::redis_store::RedisStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("actix_restriction=debug")
        .init();

    // connect to redis here...
    let username = "";
    let password = "";
    let host = "127.0.0.1";
    let port = "6379";
    let client = redis::Client::open(format!("redis://{}:{}@{}:{}", username, password, host, port))?;

    // window is 10 secs
    let config = config::RestrictionConfig::new(3, Duration::from_secs(10))?
        .with_log(true);

    HttpServer::new(move || {
        let store = RedisStore::from_client(client.clone(), "test-actix-restriction");

        let controller = controller::Controller::<RedisStore>::default()
            .on_error(|_, err| {
                eprintln!("restriction check failed: {}", err);
                HttpResponse::ServiceUnavailable().finish()
            });

        App::new()
            .wrap(RateLimit::new(gate::RateGate::new(config, store), controller))
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
