//! A flat, presentation-friendly view of [`ParsedRtl`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{FsmEncoding, ParamKind, ParsedRtl, Port, ResetPolarity};
use crate::protocol::Protocol;

/// Name, width, and signedness of one port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSummary {
    /// Port name.
    pub name: String,
    /// Bit width.
    pub width: u32,
    /// Whether the port is signed.
    pub signed: bool,
}

impl From<&Port> for PortSummary {
    fn from(port: &Port) -> Self {
        Self {
            name: port.name.clone(),
            width: port.width,
            signed: port.is_signed,
        }
    }
}

/// Ports grouped by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortGroups {
    /// Input ports.
    pub inputs: Vec<PortSummary>,
    /// Output ports.
    pub outputs: Vec<PortSummary>,
    /// Bidirectional ports.
    pub inouts: Vec<PortSummary>,
}

/// One parameter as shown in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSummary {
    /// Parameter name.
    pub name: String,
    /// Raw value text.
    pub value: String,
    /// `parameter` or `localparam`.
    #[serde(rename = "type")]
    pub kind: ParamKind,
    /// Declared type annotation, if any.
    pub declared_type: Option<String>,
}

/// Reset signals with their polarity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetSummary {
    /// Reset signal names in port order.
    pub signals: Vec<String>,
    /// Polarity per reset signal.
    pub polarity: BTreeMap<String, ResetPolarity>,
}

/// FSM block of a summary. Always present; `detected` tells whether the
/// remaining fields carry data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsmSummary {
    /// Whether an FSM was found.
    pub detected: bool,
    /// State labels.
    pub states: Vec<String>,
    /// The state register name.
    pub state_reg: Option<String>,
    /// The inferred encoding.
    pub encoding: Option<FsmEncoding>,
}

/// One protocol hint without its signal list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintSummary {
    /// The candidate protocol.
    pub protocol: Protocol,
    /// Rounded confidence.
    pub confidence: f64,
    /// Justification text.
    pub reason: String,
}

/// The flat summary produced by [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtlSummary {
    /// Module name.
    pub module_name: String,
    /// Ports by direction.
    pub ports: PortGroups,
    /// Parameters in source order.
    pub parameters: Vec<ParameterSummary>,
    /// Clock signal names.
    pub clocks: Vec<String>,
    /// Reset signals and polarity.
    pub resets: ResetSummary,
    /// FSM details.
    pub fsm: FsmSummary,
    /// Protocol hints, best first.
    pub protocol_hints: Vec<HintSummary>,
    /// Best-guess data bus width.
    pub data_width: u32,
    /// Best-guess address bus width.
    pub addr_width: u32,
}

impl From<&ParsedRtl> for RtlSummary {
    fn from(parsed: &ParsedRtl) -> Self {
        let group = |ports: Vec<&Port>| -> Vec<PortSummary> {
            ports.into_iter().map(PortSummary::from).collect()
        };
        let fsm = match &parsed.fsm {
            Some(fsm) => FsmSummary {
                detected: true,
                states: fsm.states.clone(),
                state_reg: Some(fsm.state_signal.clone()),
                encoding: Some(fsm.encoding),
            },
            None => FsmSummary::default(),
        };

        Self {
            module_name: parsed.module_name.clone(),
            ports: PortGroups {
                inputs: group(parsed.input_ports()),
                outputs: group(parsed.output_ports()),
                inouts: group(parsed.inout_ports()),
            },
            parameters: parsed
                .parameters
                .iter()
                .map(|p| ParameterSummary {
                    name: p.name.clone(),
                    value: p.value.clone(),
                    kind: p.kind,
                    declared_type: p.declared_type.clone(),
                })
                .collect(),
            clocks: parsed.clocks.clock_signals.clone(),
            resets: ResetSummary {
                signals: parsed.clocks.reset_signals.clone(),
                polarity: parsed.clocks.reset_polarity.clone(),
            },
            fsm,
            protocol_hints: parsed
                .protocol_hints
                .iter()
                .map(|h| HintSummary {
                    protocol: h.protocol,
                    confidence: h.confidence,
                    reason: h.reason.clone(),
                })
                .collect(),
            data_width: parsed.data_width(),
            addr_width: parsed.addr_width(),
        }
    }
}

/// Parses `text` and flattens the result into an [`RtlSummary`].
pub fn analyze(text: &str) -> RtlSummary {
    RtlSummary::from(&crate::parse(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UART_CORE: &str = r#"
module uart_core #(parameter CLKS_PER_BIT = 868) (
    input  wire       clk,
    input  wire       rst,
    input  wire [7:0] tx_data,
    input  wire       tx_valid,
    input  wire       rxd,
    output reg        txd,
    output wire       tx_busy,
    output reg  [7:0] rx_data,
    output reg        rx_valid
);
endmodule
"#;

    #[test]
    fn summary_groups_ports() {
        let summary = analyze(UART_CORE);
        assert_eq!(summary.module_name, "uart_core");
        assert_eq!(summary.ports.inputs.len(), 5);
        assert_eq!(summary.ports.outputs.len(), 4);
        assert!(summary.ports.inouts.is_empty());
        assert_eq!(summary.ports.inputs[2].width, 8);
        assert_eq!(summary.data_width, 8);
        assert_eq!(summary.addr_width, 32);
    }

    #[test]
    fn summary_without_fsm() {
        let summary = analyze(UART_CORE);
        assert!(!summary.fsm.detected);
        assert!(summary.fsm.states.is_empty());
        assert_eq!(summary.fsm.state_reg, None);
    }

    #[test]
    fn summary_json_shape() {
        let json = serde_json::to_value(analyze(UART_CORE)).unwrap();
        assert_eq!(json["parameters"][0]["name"], "CLKS_PER_BIT");
        assert_eq!(json["parameters"][0]["type"], "parameter");
        assert_eq!(json["parameters"][0]["declared_type"], serde_json::Value::Null);
        assert_eq!(json["resets"]["polarity"]["rst"], "active_high");
        assert_eq!(json["clocks"][0], "clk");
        assert_eq!(json["fsm"]["detected"], false);
        assert_eq!(json["protocol_hints"][0]["protocol"], "uart");
    }

    #[test]
    fn summary_keeps_parameter_kind() {
        let summary = analyze(
            "module m #(parameter W = 8) (input clk);\n  localparam int D = 2;\nendmodule",
        );
        assert_eq!(summary.parameters.len(), 2);
        assert_eq!(summary.parameters[1].kind, ParamKind::Localparam);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["parameters"][0]["type"], "parameter");
        assert_eq!(json["parameters"][1]["name"], "D");
        assert_eq!(json["parameters"][1]["type"], "localparam");
        assert_eq!(json["parameters"][1]["declared_type"], "int");
        assert_eq!(json["parameters"][1]["value"], "2");
    }
}
