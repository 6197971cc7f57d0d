use crate::core::errors::{Error, Result};
use crate::core::ip_ranges::IpRanges;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::{env, fs, thread, time};

/*-------------------------------------------------------------------------------------------------
  Simple Interface
-------------------------------------------------------------------------------------------------*/

/// _**Simple library interface**_ retrieves and parses the AWS IP Ranges using the default
/// client configuration. Returns an [IpRanges] snapshot ready to [query](IpRanges::query).
///
/// ```no_run
/// # fn main() -> awsiprules::Result<()> {
/// let ip_ranges = awsiprules::get_ranges()?;
///
/// let query = awsiprules::QueryBuilder::new()
///     .service("S3")
///     .region("us-east-1")
///     .build()?;
/// let result = ip_ranges.query(&query);
/// # Ok(())
/// # }
/// ```
pub fn get_ranges() -> Result<IpRanges> {
    Client::new().get_ranges()
}

/*-------------------------------------------------------------------------------------------------
  Client Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [Client] struct with setters for each configuration value.
///
/// ```
/// let client = awsiprules::ClientBuilder::new()
///     .url("https://ip-ranges.amazonaws.com/ip-ranges.json")
///     .cache_file("/tmp/ip-ranges.json")
///     .cache_time(60 * 60) // 1 hour
///     .retry_count(4)
///     .retry_initial_delay(200) // 200 ms
///     .build();
/// ```
///
/// [ClientBuilder::new] sources initial values from environment variables when set;
/// [ClientBuilder::default] ignores the environment.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    cache_file: PathBuf,
    cache_time: u64,
    retry_count: u32,
    retry_initial_delay: u64,
}

/*--------------------------------------------------------------------------------------
  Client Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            url: "https://ip-ranges.amazonaws.com/ip-ranges.json".to_string(),
            cache_file: dirs::home_dir()
                .unwrap()
                .join(".aws")
                .join("ip-ranges.json"), // ${HOME}/.aws/ip-ranges.json
            cache_time: 24 * 60 * 60, // 24 hours
            retry_count: 4,
            retry_initial_delay: 200, // 200 ms
        }
    }
}

impl ClientBuilder {
    /// Create a new [ClientBuilder], reading initial configuration values from these
    /// environment variables when set:
    /// - `AWSIPRULES_URL`
    /// - `AWSIPRULES_CACHE_FILE`
    /// - `AWSIPRULES_CACHE_TIME`
    /// - `AWSIPRULES_RETRY_COUNT`
    /// - `AWSIPRULES_RETRY_INITIAL_DELAY`
    pub fn new() -> Self {
        let default = ClientBuilder::default();

        Self {
            url: get_env_var("AWSIPRULES_URL", default.url),
            cache_file: get_env_var("AWSIPRULES_CACHE_FILE", default.cache_file),
            cache_time: get_env_var("AWSIPRULES_CACHE_TIME", default.cache_time),
            retry_count: get_env_var("AWSIPRULES_RETRY_COUNT", default.retry_count),
            retry_initial_delay: get_env_var(
                "AWSIPRULES_RETRY_INITIAL_DELAY",
                default.retry_initial_delay,
            ),
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the URL used to retrieve the AWS IP Ranges; defaults to
    /// `https://ip-ranges.amazonaws.com/ip-ranges.json`.
    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    /// Set the file path used to cache the IP Ranges JSON; defaults to
    /// `${HOME}/.aws/ip-ranges.json`.
    pub fn cache_file<P: AsRef<Path>>(mut self, cache_file: P) -> Self {
        self.cache_file = cache_file.as_ref().to_path_buf();
        self
    }

    /// Set the amount of time (in seconds) the locally cached JSON is considered fresh;
    /// defaults to 24 hours (`86400` seconds).
    pub fn cache_time(mut self, cache_time: u64) -> Self {
        self.cache_time = cache_time;
        self
    }

    /// Set the number of attempts to retrieve the JSON from the URL; defaults to `4`.
    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    /// Set the initial delay (in milliseconds) between retry attempts; defaults to `200`.
    /// The delay doubles after each attempt.
    pub fn retry_initial_delay(mut self, retry_initial_delay: u64) -> Self {
        self.retry_initial_delay = retry_initial_delay;
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    pub fn build(self) -> Client {
        Client {
            url: self.url,
            cache_file: self.cache_file,
            cache_time: self.cache_time,
            retry_count: self.retry_count,
            retry_initial_delay: self.retry_initial_delay,
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Client
-------------------------------------------------------------------------------------------------*/

/// Retrieves the AWS IP Ranges from the cached JSON file, when available and fresh, or from
/// the URL when the cache is stale or unavailable, with a simple exponential-backoff retry on
/// the network request.
#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    cache_file: PathBuf,
    cache_time: u64,
    retry_count: u32,
    retry_initial_delay: u64,
}

/*--------------------------------------------------------------------------------------
  Client Implementation
--------------------------------------------------------------------------------------*/

impl Default for Client {
    fn default() -> Self {
        ClientBuilder::default().build()
    }
}

impl Client {
    /// Create a [Client] from [ClientBuilder::new], honoring environment overrides.
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// The URL used to retrieve the AWS IP Ranges.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The file path used to cache the IP Ranges JSON.
    pub fn cache_file(&self) -> &Path {
        &self.cache_file
    }

    /// The amount of time (in seconds) the locally cached JSON is considered fresh.
    pub fn cache_time(&self) -> u64 {
        self.cache_time
    }

    /*-------------------------------------------------------------------------
      Get Ranges
    -------------------------------------------------------------------------*/

    /// Retrieve, parse, and return an [IpRanges] snapshot.
    pub fn get_ranges(&self) -> Result<IpRanges> {
        let json = self.get_json()?;
        IpRanges::from_json(&json)
    }

    /*-------------------------------------------------------------------------
      Private Methods
    -------------------------------------------------------------------------*/

    /// Get the IP Ranges JSON, preferring a fresh cache over the URL and the URL over a
    /// stale cache.
    fn get_json(&self) -> Result<String> {
        info!("Cache time {} seconds", self.cache_time);
        info!("Cache file path: {:?}", &self.cache_file);

        let cache_exists = fs::metadata(&self.cache_file).is_ok();
        let cache_is_fresh = cache_exists
            && fs::metadata(&self.cache_file)?
                .modified()?
                .elapsed()
                .map_or(u64::MAX, |elapsed| elapsed.as_secs())
                <= self.cache_time;

        if cache_is_fresh {
            info!("Cache file is fresh");
            let fresh_cached_json = self.get_json_from_file();
            if fresh_cached_json.is_ok() {
                return fresh_cached_json;
            }
        }

        let fresh_url_json = self.get_json_from_url();
        if let Ok(fresh_url_json) = fresh_url_json {
            let _ = self.cache_json_to_file(&fresh_url_json);
            return Ok(fresh_url_json);
        }
        let url_result = fresh_url_json;

        if cache_exists && !cache_is_fresh {
            info!("Falling back to the stale cache file");
            let stale_cache_json = self.get_json_from_file();
            if stale_cache_json.is_ok() {
                return stale_cache_json;
            }
        }

        // Err from the URL retrieval
        url_result
    }

    /// Get the IP Ranges JSON from the URL, retrying with exponential backoff.
    fn get_json_from_url(&self) -> Result<String> {
        let mut attempt: u32 = 0;
        loop {
            info!("GET {} (attempt {})", self.url, attempt);
            let json: Result<String> = reqwest::blocking::get(&self.url)
                .map_err(Error::from)
                .and_then(|response| response.text().map_err(Error::from))
                .and_then(validate_json);

            match json {
                Ok(json) => break Ok(json),
                Err(error) => {
                    log::error!("GET {} (attempt {}) failed: {}", self.url, attempt, error);

                    let delay = time::Duration::from_millis(
                        self.retry_initial_delay * 2u64.pow(attempt),
                    );

                    attempt += 1;
                    if attempt < self.retry_count {
                        thread::sleep(delay);
                        continue;
                    } else {
                        break Err(error);
                    }
                }
            }
        }
    }

    /// Write the IP Ranges JSON to the cache file.
    fn cache_json_to_file(&self, json: &str) -> Result<()> {
        // Ensure parent directories exist
        if let Some(parent) = self.cache_file.parent() {
            let _ = fs::create_dir_all(parent);
        }

        fs::write(&self.cache_file, json)
            .inspect(|_| info!("Cached IP Ranges to: {:?}", &self.cache_file))
            .map_err(Error::from)
            .inspect_err(|error| {
                log::error!("Failed to cache IP Ranges to {:?}: {}", &self.cache_file, error)
            })
    }

    /// Read the IP Ranges JSON from the cache file.
    fn get_json_from_file(&self) -> Result<String> {
        fs::read_to_string(&self.cache_file)
            .map_err(Error::from)
            .and_then(validate_json)
            .inspect(|_| info!("Read IP Ranges JSON from: {:?}", &self.cache_file))
            .inspect_err(|error| {
                log::error!(
                    "Failed to read IP Ranges JSON from {:?}: {}",
                    &self.cache_file,
                    error
                )
            })
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Get and parse an environment variable value or return a default value.
fn get_env_var<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    env::var(env_var)
        .ok()
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", env_var, value))
                .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
                .ok()
        })
        .unwrap_or(default)
}

/// Validate a string contains parsable JSON before caching or parsing it further.
fn validate_json(json: String) -> Result<String> {
    serde_json::from_str::<serde::de::IgnoredAny>(&json)
        .map(|_| json)
        .map_err(|error| Error::MalformedDocument(error.to_string()))
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ip_ranges::tests::TEST_JSON;

    #[test]
    fn test_builder_defaults() {
        let client = Client::default();
        assert_eq!(client.url(), "https://ip-ranges.amazonaws.com/ip-ranges.json");
        assert_eq!(client.cache_time(), 86400);
        assert_eq!(client.retry_count, 4);
        assert_eq!(client.retry_initial_delay, 200);
    }

    #[test]
    fn test_builder_setters() {
        let client = ClientBuilder::default()
            .url("https://example.com/ip-ranges.json")
            .cache_file("/tmp/ip-ranges.json")
            .cache_time(60 * 60)
            .retry_count(1)
            .retry_initial_delay(10)
            .build();

        assert_eq!(client.url(), "https://example.com/ip-ranges.json");
        assert_eq!(client.cache_file(), Path::new("/tmp/ip-ranges.json"));
        assert_eq!(client.cache_time(), 3600);
    }

    #[test]
    fn test_get_ranges_from_fresh_cache() {
        let cache_file = env::temp_dir().join("awsiprules-test-cache.json");
        fs::write(&cache_file, TEST_JSON).unwrap();

        let client = ClientBuilder::default()
            .url("http://127.0.0.1:0/unreachable")
            .cache_file(&cache_file)
            .cache_time(u64::MAX)
            .build();

        let ip_ranges = client.get_ranges().unwrap();
        assert_eq!(ip_ranges.sync_token(), "1693526400");

        let _ = fs::remove_file(&cache_file);
    }

    #[test]
    fn test_validate_json() {
        assert!(validate_json("{}".to_string()).is_ok());
        assert!(matches!(
            validate_json("not json".to_string()),
            Err(Error::MalformedDocument(_))
        ));
    }
}
