//! Render configuration
//!
//! Everything the rendering layer needs beyond the emission plan: class
//! naming, feature switches, template overrides and the symbol table that
//! maps the short names used in templates to fully qualified target-language
//! names. The planning core never reads this; it only sees [`PlanOptions`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::codegen::plan::{ArtifactKind, PlanOptions};
use crate::error::{CodegenError, CodegenResult};

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "RSOCKET_RPC_CODEGEN";

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Prefix of every generated class name
    pub interface_prefix: String,

    /// Suffix of the client class name
    pub client_suffix: String,

    /// Suffix of the server class name
    pub server_suffix: String,

    /// Emit the metrics decorator around server handlers
    pub metrics: bool,

    /// Mention the generator version in the `@Generated` annotation
    pub include_version: bool,

    /// Symbol → qualified name. Entries from a file are merged over the
    /// defaults rather than replacing them.
    #[serde(deserialize_with = "merge_symbols")]
    pub symbols: BTreeMap<String, String>,

    /// Per-artifact template overrides
    pub templates: TemplateOverrides,
}

/// Template files replacing the embedded ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOverrides {
    /// Interface template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<PathBuf>,

    /// Client stub template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<PathBuf>,

    /// Server stub template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<PathBuf>,
}

impl TemplateOverrides {
    /// Override for one artifact
    #[must_use]
    pub fn get(&self, artifact: ArtifactKind) -> Option<&Path> {
        match artifact {
            ArtifactKind::Interface => self.interface.as_deref(),
            ArtifactKind::ClientStub => self.client.as_deref(),
            ArtifactKind::ServerStub => self.server.as_deref(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            interface_prefix: "Blocking".to_string(),
            client_suffix: "Client".to_string(),
            server_suffix: "Server".to_string(),
            metrics: true,
            include_version: true,
            symbols: default_symbols(),
            templates: TemplateOverrides::default(),
        }
    }
}

impl RenderConfig {
    /// Load configuration from a file (TOML, YAML, or JSON)
    ///
    /// The format follows the extension (`.toml`, `.yaml`/`.yml`, `.json`).
    /// Environment variables prefixed with `RSOCKET_RPC_CODEGEN_` override
    /// file settings, `__` separating nested keys
    /// (e.g. `RSOCKET_RPC_CODEGEN_METRICS=false`).
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::Configuration` if the file does not exist, has
    /// an unsupported extension, or holds invalid settings.
    pub fn from_file(path: impl AsRef<Path>) -> CodegenResult<Self> {
        use config::{Config, File, FileFormat};

        let path = path.as_ref();

        if !path.exists() {
            return Err(CodegenError::configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let format = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("yaml" | "yml") => FileFormat::Yaml,
            Some("json") => FileFormat::Json,
            _ => {
                return Err(CodegenError::configuration(
                    "Unsupported configuration file format. Use .toml, .yaml, .yml, or .json",
                ));
            }
        };

        let source = path.to_str().ok_or_else(|| {
            CodegenError::configuration(format!(
                "Configuration path is not valid UTF-8: {}",
                path.display()
            ))
        })?;

        let config = Config::builder()
            .add_source(File::new(source, format))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check values the templates rely on
    ///
    /// # Errors
    ///
    /// Returns `CodegenError::Configuration` naming the offending key.
    pub fn validate(&self) -> CodegenResult<()> {
        for (key, value) in [
            ("client_suffix", &self.client_suffix),
            ("server_suffix", &self.server_suffix),
        ] {
            if value.is_empty() {
                return Err(CodegenError::configuration_with_key(
                    "suffix cannot be empty",
                    key,
                ));
            }
        }

        if let Some((name, _)) = self.symbols.iter().find(|(_, qualified)| qualified.trim().is_empty()) {
            return Err(CodegenError::configuration_with_key(
                format!("symbol '{name}' maps to an empty name"),
                "symbols",
            ));
        }

        Ok(())
    }

    /// Options handed to the planner
    #[must_use]
    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions {
            metrics: self.metrics,
        }
    }

    /// Resolve a symbol
    ///
    /// Exact matches win; otherwise the lookup ignores ASCII case, since some
    /// configuration sources normalise key case.
    #[must_use]
    pub fn symbol(&self, name: &str) -> Option<&str> {
        resolve_symbol(&self.symbols, name)
    }
}

pub(crate) fn resolve_symbol<'a>(symbols: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    symbols
        .get(name)
        .or_else(|| {
            symbols
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .map(String::as_str)
}

fn merge_symbols<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut symbols = default_symbols();
    for (name, qualified) in overrides {
        let key = symbols
            .keys()
            .find(|existing| existing.eq_ignore_ascii_case(&name))
            .cloned()
            .unwrap_or(name);
        symbols.insert(key, qualified);
    }
    Ok(symbols)
}

/// The blocking Java symbol table
#[must_use]
pub fn default_symbols() -> BTreeMap<String, String> {
    [
        ("AbstractRSocketService", "io.rsocket.rpc.AbstractRSocketService"),
        ("BiFunction", "java.util.function.BiFunction"),
        ("BlockingIterable", "io.rsocket.rpc.BlockingIterable"),
        ("ByteBuf", "io.netty.buffer.ByteBuf"),
        ("ByteBufAllocator", "io.netty.buffer.ByteBufAllocator"),
        ("ByteBufPayload", "io.rsocket.util.ByteBufPayload"),
        ("CodedInputStream", "com.google.protobuf.CodedInputStream"),
        ("CodedOutputStream", "com.google.protobuf.CodedOutputStream"),
        ("CompositeMetadataDecoder", "io.rsocket.ipc.decoders.CompositeMetadataDecoder"),
        ("Exception", "java.lang.Exception"),
        ("Flux", "reactor.core.publisher.Flux"),
        ("Function", "java.util.function.Function"),
        ("Generated", "javax.annotation.Generated"),
        ("IPCChannelFunction", "io.rsocket.ipc.util.IPCChannelFunction"),
        ("IPCFunction", "io.rsocket.ipc.util.IPCFunction"),
        ("Inject", "javax.inject.Inject"),
        ("Iterable", "Iterable"),
        ("Map", "java.util.Map"),
        ("MessageLite", "com.google.protobuf.MessageLite"),
        ("MetadataDecoder", "io.rsocket.ipc.MetadataDecoder"),
        ("MetadataEncoder", "io.rsocket.ipc.MetadataEncoder"),
        ("MeterRegistry", "io.micrometer.core.instrument.MeterRegistry"),
        ("Mono", "reactor.core.publisher.Mono"),
        ("Named", "javax.inject.Named"),
        ("Optional", "java.util.Optional"),
        ("Override", "java.lang.Override"),
        ("Parser", "com.google.protobuf.Parser"),
        ("Payload", "io.rsocket.Payload"),
        ("Publisher", "org.reactivestreams.Publisher"),
        ("Queues", "reactor.util.concurrent.Queues"),
        ("RSocket", "io.rsocket.RSocket"),
        ("RSocketRpcGenerated", "io.rsocket.rpc.annotations.internal.Generated"),
        ("RSocketRpcGeneratedMethod", "io.rsocket.rpc.annotations.internal.GeneratedMethod"),
        ("RSocketRpcMetrics", "io.rsocket.rpc.metrics.Metrics"),
        ("RSocketRpcResourceType", "io.rsocket.rpc.annotations.internal.ResourceType"),
        ("Scheduler", "reactor.core.scheduler.Scheduler"),
        ("Schedulers", "reactor.core.scheduler.Schedulers"),
        ("Signal", "reactor.core.publisher.Signal"),
        ("SpanContext", "io.opentracing.SpanContext"),
        ("String", "java.lang.String"),
        ("Unpooled", "io.netty.buffer.Unpooled"),
        ("Void", "java.lang.Void"),
    ]
    .into_iter()
    .map(|(name, qualified)| (name.to_string(), qualified.to_string()))
    .collect()
}
