//! Assertion data model and SystemVerilog rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

use verifai_rtl::Port;

/// What an assertion checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionCategory {
    /// Behavior around reset release.
    Reset,
    /// Bus or link protocol rules.
    Protocol,
    /// Valid/ready style handshakes.
    Handshake,
    /// Signals free of X/Z or held stable.
    Stability,
    /// State machine legality and reachability.
    Fsm,
}

impl fmt::Display for AssertionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertionCategory::Reset => write!(f, "reset"),
            AssertionCategory::Protocol => write!(f, "protocol"),
            AssertionCategory::Handshake => write!(f, "handshake"),
            AssertionCategory::Stability => write!(f, "stability"),
            AssertionCategory::Fsm => write!(f, "fsm"),
        }
    }
}

/// The verification directive a property is used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionType {
    /// `assert property`: a check on the design.
    Assert,
    /// `assume property`: a constraint on the environment.
    Assume,
    /// `cover property`: a scenario to observe.
    Cover,
}

impl AssertionType {
    /// The SystemVerilog keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            AssertionType::Assert => "assert",
            AssertionType::Assume => "assume",
            AssertionType::Cover => "cover",
        }
    }

    /// Label prefix for the directive instance.
    fn label_prefix(self) -> &'static str {
        match self {
            AssertionType::Assert => "a",
            AssertionType::Assume => "m",
            AssertionType::Cover => "c",
        }
    }
}

impl fmt::Display for AssertionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One named property and its directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvaProperty {
    /// Property identifier.
    pub name: String,
    /// One-line description, emitted as a comment.
    pub description: String,
    /// What the property checks.
    pub category: AssertionCategory,
    /// How the property is used.
    pub assertion_type: AssertionType,
    /// Property body including its clocking event, without trailing `;`.
    pub code: String,
}

impl SvaProperty {
    /// Renders the property declaration followed by its labeled directive.
    ///
    /// Asserts and assumes carry an `$error` action block; covers do not.
    pub fn to_sv(&self) -> String {
        let label = format!("{}_{}", self.assertion_type.label_prefix(), self.name);
        let directive = match self.assertion_type {
            AssertionType::Cover => format!("{label}: cover property ({});", self.name),
            kind => format!(
                "{label}: {kind} property ({}) else $error(\"{}: {}\");",
                self.name, self.name, self.description
            ),
        };
        format!(
            "// {}\nproperty {};\n  {};\nendproperty\n{directive}\n",
            self.description, self.name, self.code
        )
    }
}

/// A checker module for one design, ready to bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SvaModule {
    /// The design module the checker binds to.
    pub module_name: String,
    /// Sampling clock.
    pub clock: String,
    /// Reset used for `disable iff`, if any.
    pub reset: Option<String>,
    /// The design's ports, all observed as checker inputs.
    pub ports: Vec<Port>,
    /// Generated properties in emission order.
    pub properties: Vec<SvaProperty>,
}

impl SvaModule {
    /// Name of the checker module, `<module>_sva`.
    pub fn checker_name(&self) -> String {
        format!("{}_sva", self.module_name)
    }

    /// Properties of one category.
    pub fn properties_in(&self, category: AssertionCategory) -> impl Iterator<Item = &SvaProperty> {
        self.properties.iter().filter(move |p| p.category == category)
    }

    /// Renders the checker module and a `bind` statement attaching it to the
    /// design with implicit port connections.
    pub fn to_sv(&self) -> String {
        let checker = self.checker_name();
        let mut out = format!(
            "// Assertions for {m}\n// Clock: {clock}\n// Reset: {reset}\n\nmodule {checker} (\n",
            m = self.module_name,
            clock = self.clock,
            reset = self.reset.as_deref().unwrap_or("none"),
        );

        let decls: Vec<String> = self
            .ports
            .iter()
            .map(|p| {
                let width = p.width_str();
                if width.is_empty() {
                    format!("    input logic {}", p.name)
                } else {
                    format!("    input logic {width} {}", p.name)
                }
            })
            .collect();
        out.push_str(&decls.join(",\n"));
        out.push_str("\n);\n");

        for category in [
            AssertionCategory::Reset,
            AssertionCategory::Stability,
            AssertionCategory::Protocol,
            AssertionCategory::Handshake,
            AssertionCategory::Fsm,
        ] {
            let props: Vec<_> = self.properties_in(category).collect();
            if props.is_empty() {
                continue;
            }
            out.push_str(&format!("\n  // ---- {category} ----\n"));
            for prop in props {
                out.push('\n');
                for line in prop.to_sv().lines() {
                    out.push_str("  ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }

        out.push_str(&format!(
            "\nendmodule\n\nbind {m} {checker} u_{checker} (.*);\n",
            m = self.module_name
        ));
        out
    }
}
