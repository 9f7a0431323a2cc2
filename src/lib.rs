//! # `actix-restriction`: fixed-window request restriction for `actix-web`

//! ## Description
//! `actix-restriction` decides, per caller, whether a request may proceed,
//! allowing a fixed number of requests per reset window.
//! Quota records live in a shared key-value store with time-based expiry,
//! so several processes can share one quota.
//! Two storage options are provided: in-memory storage (`MemStore`)
//! and Redis storage (`RedisStore`).

//! ## Features
//! |    Feature    |  Component   |                                    Description                                    |
//! |:-------------:|:------------:|:---------------------------------------------------------------------------------:|
//! |   `default`   |  `MemStore`  |                               Store data in memory                                |
//! | `redis-store` | `RedisStore` | Store data using an async connection from [redis](https://crates.io/crates/redis) |

//! ## Usage
//! 1. Define a `RestrictionConfig`: how many requests per window, and how long a window lasts.
//! 2. Define a `Store` where the quota records are kept, and build a `RateGate` from both.
//! 3. Define a `Controller`. The `Controller` decides how callers are identified
//!    and how rejected or failed checks are answered.
//! 4. Finally, add a `RateLimit` middleware to your HTTP Server using the `wrap` function (from `actix-web`).

//! ### Examples
//! You can find examples in `demos` folder.

//! ### Gate
//! ```rust
//! use std::time::Duration;
//! use actix_restriction::config::RestrictionConfig;
//! use actix_restriction::gate::RateGate;
//! use actix_restriction::store::MemStore;
//!
//! // 10 requests per 60 seconds.
//! let config = RestrictionConfig::new(10, Duration::from_secs(60)).unwrap();
//! let gate = RateGate::new(config, MemStore::default());
//! ```
//!
//! `RateGate::validate` returns a `Verdict`: whether the request is admitted,
//! and the caller's quota record (`total_limit`, `times_remaining`, `reset_timestamp`).
//! A caller seen for the first time (or whose window has reset) is admitted
//! with its full quota; each later request in the window takes one from
//! `times_remaining`, and once it reaches zero requests are rejected until
//! `reset_timestamp`.
//!
//! The check is a read followed by a write, not an atomic operation:
//! concurrent requests of one caller can go slightly over the quota.

//! ### Controller
//! `Controller` is a set of functions. To create a default one:
//! ```rust
//! use actix_restriction::controller::Controller;
//! use actix_restriction::store::MemStore;
//!
//! let controller = Controller::<MemStore>::new();
//! ```
//!
//! You can determine which requests should be checked, by modifying `Controller`:
//! ```rust
//! # use actix_restriction::controller::Controller;
//! # use actix_restriction::store::MemStore;
//! let controller = Controller::<MemStore>::new()
//!     .with_do_rate_limit(|req| !req.path().starts_with("/healthz"));
//! ```
//!
//! In this case, only those requests without prefix `/healthz` will be checked.
//!
//! For more functions, please check the doc of `Controller`.

//! ### RateLimit
//! ```rust,ignore
//! let rate_limiter = actix_restriction::middleware::RateLimit::new(gate, controller);
//!
//! App::new()
//!     .wrap(rate_limiter)
//!     // ...
//! ```

pub mod entity;
pub mod codec;
pub mod config;
pub mod store;
pub mod gate;
pub mod error;
pub mod middleware;
pub mod controller;
pub mod utils;
