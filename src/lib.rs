/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envfile, which is licensed
 * under GNU General Public License v3.0.
 */

//! Load shell-style `.env` files into the process environment.
//!
//! ```no_run
//! use envfile::Dotenv;
//!
//! let mut dotenv = Dotenv::new("/srv/app");
//! let loaded = dotenv.load()?;
//! println!("declared: {:?}", loaded.names);
//! dotenv.required(&["DATABASE_URL"])?.not_empty()?;
//! # Ok::<(), envfile::Error>(())
//! ```

pub mod error;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod resolver;
pub mod store;
pub mod validator;

pub use error::{Error, MalformedReason, Result};
pub use loader::{DEFAULT_FILENAME, Dotenv, LoadMode, Loaded, Loader, load, overload, safe_load};
pub use store::{MemoryStore, Mirror, ProcessEnvironment, VariableStore};
pub use validator::Validator;
