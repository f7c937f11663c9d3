//! Conformance test helpers for the VerifAI toolkit.
//!
//! Provides shared pipeline functions that run RTL source text through the
//! full flow (parse → assertions → template context → bundle) and return
//! structured results for assertion in integration tests.

#![warn(missing_docs)]

use verifai_config::{ConfigError, VerifaiConfig};
use verifai_gen::{placeholder_package, TemplateContext, TestbenchBundle};
use verifai_rtl::{ParsedRtl, PortDirection, Protocol};
use verifai_sva::{SvaGenerator, SvaModule};

/// Result of running the full parse → SVA → context → bundle pipeline.
pub struct PipelineResult {
    /// The extracted structure.
    pub rtl: ParsedRtl,
    /// The generated checker module.
    pub sva: SvaModule,
    /// The template context under the given configuration.
    pub context: TemplateContext,
    /// A bundle with a placeholder package and the checker attached.
    pub bundle: TestbenchBundle,
}

impl PipelineResult {
    /// Names of the ports with `direction`, in declaration order.
    pub fn port_names(&self, direction: PortDirection) -> Vec<&str> {
        self.rtl
            .ports_with_direction(direction)
            .into_iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Protocols of every hint, highest confidence first.
    pub fn hint_protocols(&self) -> Vec<Protocol> {
        self.rtl.protocol_hints.iter().map(|h| h.protocol).collect()
    }

    /// Whether the checker contains a property named `name`.
    pub fn has_property(&self, name: &str) -> bool {
        self.sva.properties.iter().any(|p| p.name == name)
    }

    /// The context value at `key` rendered as a plain string, if present.
    pub fn context_str(&self, key: &str) -> Option<String> {
        self.context.get(key).map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
    }
}

/// Parses a `verifai.toml` body with a `[project]` name prepended.
pub fn make_config(name: &str, body: &str) -> Result<VerifaiConfig, ConfigError> {
    let toml_str = format!(
        r#"
[project]
name = "{name}"

{body}
"#
    );
    verifai_config::load_config_from_str(&toml_str)
}

/// Runs the full pipeline on RTL source text with default configuration.
pub fn full_pipeline(source: &str) -> PipelineResult {
    run_pipeline(source, &VerifaiConfig::default())
}

/// Runs the full pipeline on RTL source text under `config`.
pub fn run_pipeline(source: &str, config: &VerifaiConfig) -> PipelineResult {
    let rtl = verifai_rtl::parse(source);
    let sva = SvaGenerator::new(&rtl).generate_all();
    let context = TemplateContext::from_parsed(&rtl, &config.protocol);
    let bundle = TestbenchBundle::new(&rtl, &placeholder_package(&rtl.module_name))
        .with_sva(&sva.to_sv());
    PipelineResult {
        rtl,
        sva,
        context,
        bundle,
    }
}
