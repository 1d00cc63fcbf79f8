//! # Herald Listener Manifests
//!
//! Listeners named by string (`"Class::method"`, class/method pairs or
//! service/method pairs) can be declared in a manifest file instead of being
//! registered in code. A manifest is a list of entries:
//!
//! ```toml
//! [[listeners]]
//! event = "user.created"
//! listener = "Mailer::on_user_created"
//! priority = 10
//!
//! [[listeners]]
//! event = "user.created"
//! target = "audit_log"
//! method = "record"
//! ```
//!
//! JSON is always available; YAML and TOML depend on the `yaml-config` and
//! `toml-config` features. The format is chosen from the file extension.
pub mod error;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dispatcher::EventDispatcher;
use crate::error::{BoxError, DispatcherError};
use crate::listener::ListenerSpec;
use crate::registry::Priority;

pub use error::ConfigError;

/// Manifest encodings; YAML and TOML are feature-gated
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    Json,
    #[cfg(feature = "yaml-config")]
    Yaml,
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Canonical file extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Name used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "JSON",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "YAML",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "TOML",
        }
    }

    /// Match a file extension, case-insensitively; `yml` is accepted for YAML
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            #[cfg(feature = "toml-config")]
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// Format implied by the extension of `path`
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Priority as written in a manifest: a number or a digit string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestPriority {
    Integer(i64),
    Fractional(f64),
    Text(String),
}

impl ManifestPriority {
    /// Validate into a listener priority
    pub fn resolve(&self) -> Result<Priority, DispatcherError> {
        match self {
            ManifestPriority::Integer(value) => Priority::try_from(*value),
            ManifestPriority::Text(text) => text.parse(),
            ManifestPriority::Fractional(value) => {
                Err(DispatcherError::InvalidPriority { value: value.to_string() })
            }
        }
    }
}

/// One listener declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub event: String,
    /// `"Identifier::method"`; exclusive with `target`/`method`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listener: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<ManifestPriority>,
}

impl ManifestEntry {
    /// Entry using the `"Identifier::method"` form
    pub fn text(event: impl Into<String>, listener: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            listener: Some(listener.into()),
            target: None,
            method: None,
            priority: None,
        }
    }

    /// Entry using the target/method pair form
    pub fn named(
        event: impl Into<String>,
        target: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            event: event.into(),
            listener: None,
            target: Some(target.into()),
            method: Some(method.into()),
            priority: None,
        }
    }

    pub fn at_priority(mut self, priority: i64) -> Self {
        self.priority = Some(ManifestPriority::Integer(priority));
        self
    }

    /// Raw listener input described by this entry
    pub fn to_spec(&self) -> Result<ListenerSpec, DispatcherError> {
        match (&self.listener, &self.target, &self.method) {
            (Some(text), None, None) => Ok(ListenerSpec::from(text.as_str())),
            (None, Some(target), Some(method)) => Ok(ListenerSpec::named(target, method)),
            _ => Err(DispatcherError::InvalidListenerFormat {
                listener: format!(
                    "listener={:?} target={:?} method={:?}",
                    self.listener, self.target, self.method
                ),
            }),
        }
    }

    /// Validated priority, defaulting to 0 when absent
    pub fn priority(&self) -> Result<Priority, DispatcherError> {
        self.priority
            .as_ref()
            .map_or(Ok(Priority::default()), ManifestPriority::resolve)
    }
}

/// Ordered list of listener declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListenerManifest {
    #[serde(default)]
    pub listeners: Vec<ManifestEntry>,
}

impl ListenerManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ManifestEntry) -> &mut Self {
        self.listeners.push(entry);
        self
    }

    /// Parse a manifest from a string in the given format
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let parsed: Result<Self, BoxError> = match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(Into::into),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(Into::into),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(Into::into),
        };
        parsed.map_err(|source| ConfigError::Deserialization { format: format.label(), source })
    }

    /// Read a manifest file, choosing the format from its extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat { path: path.to_path_buf() })?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::parse(&content, format)?;
        log::debug!(
            "Loaded {} listener declaration(s) from {} as {}",
            manifest.listeners.len(),
            path.display(),
            format.extension()
        );
        Ok(manifest)
    }

    /// Register every entry in file order, stopping at the first rejected one.
    ///
    /// Entries before the rejected one stay registered. Returns the number of
    /// listeners registered.
    pub fn apply<D: EventDispatcher>(&self, dispatcher: &mut D) -> Result<usize, ConfigError> {
        for (index, entry) in self.listeners.iter().enumerate() {
            let registration = entry.priority().and_then(|priority| {
                let spec = entry.to_spec()?;
                dispatcher.register_listener(&entry.event, spec, i64::from(priority.value()))
            });
            registration.map_err(|source| ConfigError::Registration {
                index,
                event: entry.event.clone(),
                source,
            })?;
        }
        Ok(self.listeners.len())
    }
}
