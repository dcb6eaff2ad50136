//! Domain to credential mapping.
//!
//! The registry is built once at startup from a JSON descriptor and shared
//! read-only with every request afterwards.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use calgate_core::Domain;
use calgate_google::{CalendarService, ClientConfig, GoogleCalendarClient, ServiceAccountKey};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ServerError, ServerResult};

/// Calendar targeted when a descriptor entry does not name one.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Time zone attached to event start and end when none is configured.
pub const DEFAULT_TIME_ZONE: &str = "Europe/Oslo";

/// Settings applied to every entry while loading a descriptor.
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    /// Remote client settings, including the impersonation subject.
    pub client: ClientConfig,
    /// Calendar used by entries without `calendar_id`.
    pub calendar_id: String,
    /// Time zone used by entries without `time_zone`.
    pub time_zone: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

/// One descriptor entry: a service-account key plus optional overrides.
#[derive(Deserialize)]
struct DescriptorEntry {
    #[serde(flatten)]
    key: ServiceAccountKey,
    #[serde(default)]
    calendar_id: Option<String>,
    #[serde(default)]
    time_zone: Option<String>,
}

/// A resolved credential: the service to call and where to put events.
#[derive(Clone)]
pub struct DomainCredential {
    service: Arc<dyn CalendarService>,
    calendar_id: String,
    time_zone: String,
}

impl DomainCredential {
    /// Creates a credential around an existing service.
    pub fn new(
        service: Arc<dyn CalendarService>,
        calendar_id: impl Into<String>,
        time_zone: impl Into<String>,
    ) -> Self {
        Self {
            service,
            calendar_id: calendar_id.into(),
            time_zone: time_zone.into(),
        }
    }

    /// Returns the calendar service for this domain.
    pub fn service(&self) -> &dyn CalendarService {
        self.service.as_ref()
    }

    /// Returns the target calendar id.
    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// Returns the time zone attached to event times.
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }
}

impl fmt::Debug for DomainCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainCredential")
            .field("calendar_id", &self.calendar_id)
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}

/// Read-only mapping from [`Domain`] to [`DomainCredential`].
#[derive(Debug, Default)]
pub struct CredentialRegistry {
    entries: HashMap<Domain, DomainCredential>,
}

impl CredentialRegistry {
    /// Builds a registry from already constructed credentials.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Domain, DomainCredential)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Loads the descriptor file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or any entry is malformed.
    pub fn load(path: impl AsRef<Path>, settings: &RegistrySettings) -> ServerResult<Self> {
        let path = path.as_ref();
        debug!("loading credentials from {}", path.display());
        let content = std::fs::read(path).map_err(|source| ServerError::CredentialsRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content, settings)
    }

    /// Parses a descriptor.
    ///
    /// Every entry must parse and carry a usable private key; one bad entry
    /// rejects the whole descriptor.
    pub fn from_json(json: &[u8], settings: &RegistrySettings) -> ServerResult<Self> {
        let descriptor: BTreeMap<String, DescriptorEntry> = serde_json::from_slice(json)?;

        let mut entries = HashMap::with_capacity(descriptor.len());
        for (domain, entry) in descriptor {
            let client_email = entry.key.client_email.clone();
            let client = GoogleCalendarClient::new(entry.key, &settings.client).map_err(
                |source| ServerError::Credential {
                    domain: domain.clone(),
                    source,
                },
            )?;

            let credential = DomainCredential::new(
                Arc::new(client),
                entry
                    .calendar_id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| settings.calendar_id.clone()),
                entry
                    .time_zone
                    .filter(|tz| !tz.is_empty())
                    .unwrap_or_else(|| settings.time_zone.clone()),
            );
            debug!(
                domain = %domain,
                client_email = %client_email,
                calendar_id = credential.calendar_id(),
                "registered domain"
            );
            entries.insert(Domain::new(domain), credential);
        }

        if entries.is_empty() {
            warn!("credential descriptor contains no domains");
        } else {
            info!("loaded credentials for {} domain(s)", entries.len());
        }

        Ok(Self { entries })
    }

    /// Looks up the credential for `domain`.
    pub fn lookup(&self, domain: &Domain) -> Option<&DomainCredential> {
        self.entries.get(domain)
    }

    /// Returns true if `domain` is registered.
    pub fn contains(&self, domain: &Domain) -> bool {
        self.entries.contains_key(domain)
    }

    /// Returns the registered domains in sorted order.
    pub fn domains(&self) -> Vec<&Domain> {
        let mut domains: Vec<_> = self.entries.keys().collect();
        domains.sort();
        domains
    }

    /// Returns the number of registered domains.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no domain is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
