//! Configuration options for the booking service

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Where appointments are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// The `appointment` table behind a PostgREST endpoint
    Postgrest,
    /// A JSON document on local disk
    #[default]
    Local,
    /// Process memory only
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Postgrest => "postgrest",
            StoreBackend::Local => "local",
            StoreBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgrest" | "supabase" | "database" => Ok(StoreBackend::Postgrest),
            "local" | "file" => Ok(StoreBackend::Local),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(Error::config(format!("unknown store backend: {}", other))),
        }
    }
}

/// Configuration options for the booking service
#[derive(Debug, Clone)]
pub struct BookingOptions {
    /// The store implementation to use
    pub backend: StoreBackend,

    /// Base URL of the Supabase project
    pub supabase_url: Option<String>,

    /// Anonymous API key of the Supabase project
    pub supabase_key: Option<String>,

    /// The appointment table name
    pub table: String,

    /// File backing the local store
    pub data_file: PathBuf,

    /// The request timeout for database calls
    pub request_timeout: Option<Duration>,
}

impl Default for BookingOptions {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            supabase_url: None,
            supabase_key: None,
            table: "appointment".to_string(),
            data_file: PathBuf::from("bookings.json"),
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl BookingOptions {
    /// Read options from the environment, loading `.env` first if present
    ///
    /// `SALON_STORE` picks the backend; without it, a configured
    /// `SUPABASE_URL` selects PostgREST and anything else the local file.
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();

        let mut options = Self::default();
        options.supabase_url = env::var("SUPABASE_URL").ok().filter(|v| !v.is_empty());
        options.supabase_key = env::var("SUPABASE_ANON_KEY")
            .or_else(|_| env::var("SUPABASE_KEY"))
            .ok()
            .filter(|v| !v.is_empty());

        if let Ok(table) = env::var("SALON_TABLE") {
            options.table = table;
        }
        if let Ok(path) = env::var("SALON_DATA_FILE") {
            options.data_file = PathBuf::from(path);
        }

        options.backend = match env::var("SALON_STORE") {
            Ok(value) => value.parse()?,
            Err(_) if options.supabase_url.is_some() => StoreBackend::Postgrest,
            Err(_) => StoreBackend::Local,
        };

        Ok(options)
    }

    /// Set the store backend
    pub fn with_backend(mut self, value: StoreBackend) -> Self {
        self.backend = value;
        self
    }

    /// Set the Supabase project URL and anonymous key
    pub fn with_supabase(mut self, url: &str, key: &str) -> Self {
        self.supabase_url = Some(url.to_string());
        self.supabase_key = Some(key.to_string());
        self
    }

    /// Set the appointment table name
    pub fn with_table(mut self, value: &str) -> Self {
        self.table = value.to_string();
        self
    }

    /// Set the local store file
    pub fn with_data_file(mut self, value: impl Into<PathBuf>) -> Self {
        self.data_file = value.into();
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// URL and key for the PostgREST backend, or why they are missing
    pub fn supabase_credentials(&self) -> Result<(&str, &str), Error> {
        let url = self
            .supabase_url
            .as_deref()
            .ok_or_else(|| Error::config("SUPABASE_URL is required for the postgrest store"))?;
        let key = self
            .supabase_key
            .as_deref()
            .ok_or_else(|| Error::config("SUPABASE_ANON_KEY is required for the postgrest store"))?;
        Ok((url, key))
    }
}
