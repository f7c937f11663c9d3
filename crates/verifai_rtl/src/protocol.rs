//! Protocol classification by signal-name overlap.
//!
//! Each catalog entry has a signal vocabulary, a required subset, and a base
//! weight. A protocol scores
//!
//! ```text
//! matched / |vocabulary| * required_found / |required| * weight
//! ```
//!
//! where a vocabulary entry is matched if it is a substring of any lowercased
//! port name, and the required factor is 1.0 for protocols with no required
//! signals. Only scores strictly above [`CONFIDENCE_FLOOR`] become hints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::{Port, ProtocolHint};

/// Scores at or below this value never produce a hint.
pub const CONFIDENCE_FLOOR: f64 = 0.3;

/// The fixed catalog of recognizable bus and serial protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// AMBA APB peripheral bus.
    Apb,
    /// AMBA AXI4-Lite.
    Axi4Lite,
    /// AMBA AXI4 with bursts.
    Axi4,
    /// UART serial link.
    Uart,
    /// SPI serial link.
    Spi,
    /// I2C two-wire link.
    I2c,
    /// Wishbone B4 bus.
    Wishbone,
}

/// Static vocabulary for one catalog entry.
struct Signature {
    signals: &'static [&'static str],
    required: &'static [&'static str],
    weight: f64,
}

const APB: Signature = Signature {
    signals: &["psel", "penable", "pwrite", "paddr", "pwdata", "prdata", "pready", "pslverr"],
    required: &["psel", "penable"],
    weight: 0.9,
};

const AXI4_LITE: Signature = Signature {
    signals: &[
        "awaddr", "awvalid", "awready", "wdata", "wvalid", "wready", "araddr", "arvalid",
        "arready", "rdata", "rvalid", "rready", "bresp", "bvalid", "bready",
    ],
    required: &["awvalid", "awready", "arvalid", "arready"],
    weight: 0.95,
};

const AXI4: Signature = Signature {
    signals: &[
        "awid", "awaddr", "awlen", "awsize", "awburst", "awvalid", "awready", "arid", "arlen",
        "arsize", "arburst",
    ],
    required: &["awlen", "arlen"],
    weight: 0.95,
};

const UART: Signature = Signature {
    signals: &[
        "tx", "rx", "txd", "rxd", "uart_tx", "uart_rx", "baud", "tx_data", "rx_data", "tx_valid",
        "rx_valid",
    ],
    required: &[],
    weight: 0.7,
};

const SPI: Signature = Signature {
    signals: &[
        "sclk", "mosi", "miso", "ss", "cs", "spi_clk", "spi_mosi", "spi_miso", "spi_cs", "spi_ss",
    ],
    required: &["mosi", "miso"],
    weight: 0.8,
};

const I2C: Signature = Signature {
    signals: &["sda", "scl", "i2c_sda", "i2c_scl", "sda_i", "sda_o", "scl_i", "scl_o"],
    required: &["sda", "scl"],
    weight: 0.85,
};

const WISHBONE: Signature = Signature {
    signals: &[
        "wb_cyc", "wb_stb", "wb_we", "wb_ack", "wb_adr", "wb_dat_i", "wb_dat_o", "cyc_i", "stb_i",
        "ack_o",
    ],
    required: &["cyc", "stb", "ack"],
    weight: 0.85,
};

impl Protocol {
    /// Every protocol in catalog order. Ties in confidence keep this order.
    pub const ALL: [Protocol; 7] = [
        Protocol::Apb,
        Protocol::Axi4Lite,
        Protocol::Axi4,
        Protocol::Uart,
        Protocol::Spi,
        Protocol::I2c,
        Protocol::Wishbone,
    ];

    fn signature(self) -> &'static Signature {
        match self {
            Protocol::Apb => &APB,
            Protocol::Axi4Lite => &AXI4_LITE,
            Protocol::Axi4 => &AXI4,
            Protocol::Uart => &UART,
            Protocol::Spi => &SPI,
            Protocol::I2c => &I2C,
            Protocol::Wishbone => &WISHBONE,
        }
    }

    /// The expected signal-name substrings.
    pub fn signals(self) -> &'static [&'static str] {
        self.signature().signals
    }

    /// The subset of signals whose absence scales the score down.
    pub fn required(self) -> &'static [&'static str] {
        self.signature().required
    }

    /// Base confidence weight in `(0, 1]`.
    pub fn weight(self) -> f64 {
        self.signature().weight
    }

    /// The catalog identifier, e.g. `axi4lite`.
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Apb => "apb",
            Protocol::Axi4Lite => "axi4lite",
            Protocol::Axi4 => "axi4",
            Protocol::Uart => "uart",
            Protocol::Spi => "spi",
            Protocol::I2c => "i2c",
            Protocol::Wishbone => "wishbone",
        }
    }

    /// Conventional spelling for prose, e.g. `AXI4-Lite`.
    pub fn display_name(self) -> &'static str {
        match self {
            Protocol::Apb => "APB",
            Protocol::Axi4Lite => "AXI4-Lite",
            Protocol::Axi4 => "AXI4",
            Protocol::Uart => "UART",
            Protocol::Spi => "SPI",
            Protocol::I2c => "I2C",
            Protocol::Wishbone => "Wishbone",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "apb" => Ok(Protocol::Apb),
            "axi4lite" | "axi4-lite" | "axi_lite" | "axilite" => Ok(Protocol::Axi4Lite),
            "axi4" | "axi" => Ok(Protocol::Axi4),
            "uart" => Ok(Protocol::Uart),
            "spi" => Ok(Protocol::Spi),
            "i2c" => Ok(Protocol::I2c),
            "wishbone" | "wb" => Ok(Protocol::Wishbone),
            other => Err(format!("unknown protocol '{other}'")),
        }
    }
}

/// Scores every catalog protocol against `ports` and returns the hints above
/// [`CONFIDENCE_FLOOR`], highest confidence first.
pub fn classify_protocols(ports: &[Port]) -> Vec<ProtocolHint> {
    let names: Vec<String> = ports.iter().map(|p| p.name.to_ascii_lowercase()).collect();
    let present = |sig: &str| names.iter().any(|n| n.contains(sig));

    let mut hints = Vec::new();
    for protocol in Protocol::ALL {
        let matching_signals: Vec<String> = protocol
            .signals()
            .iter()
            .filter(|&&sig| present(sig))
            .map(|sig| sig.to_string())
            .collect();
        if matching_signals.is_empty() {
            continue;
        }

        let required = protocol.required();
        let required_ratio = if required.is_empty() {
            1.0
        } else {
            let found = required.iter().filter(|&&sig| present(sig)).count();
            found as f64 / required.len() as f64
        };
        let total = protocol.signals().len();
        let confidence =
            matching_signals.len() as f64 / total as f64 * required_ratio * protocol.weight();

        tracing::trace!(%protocol, confidence, "protocol score");
        if confidence > CONFIDENCE_FLOOR {
            hints.push(ProtocolHint {
                protocol,
                confidence: round2(confidence),
                reason: format!("Found {}/{} protocol signals", matching_signals.len(), total),
                matching_signals,
            });
        }
    }

    // Stable: equal confidences keep catalog order.
    hints.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    hints
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PortDirection, SignalClass};

    fn ports(names: &[&str]) -> Vec<Port> {
        names
            .iter()
            .map(|n| Port {
                name: n.to_string(),
                direction: PortDirection::Input,
                signal_class: SignalClass::Logic,
                is_signed: false,
                width: 1,
                msb: None,
                lsb: None,
            })
            .collect()
    }

    #[test]
    fn full_apb_vocabulary() {
        let hints = classify_protocols(&ports(&[
            "pclk", "presetn", "psel", "penable", "pwrite", "paddr", "pwdata", "prdata", "pready",
            "pslverr",
        ]));
        assert_eq!(hints[0].protocol, Protocol::Apb);
        assert_eq!(hints[0].confidence, 0.9);
        assert_eq!(hints[0].matching_signals.len(), 8);
        assert_eq!(hints[0].reason, "Found 8/8 protocol signals");
    }

    #[test]
    fn missing_required_signal_suppresses_hint() {
        // Seven of eight APB signals but no psel: 7/8 * 1/2 * 0.9.
        let hints = classify_protocols(&ports(&[
            "penable", "pwrite", "paddr", "pwdata", "prdata", "pready", "pslverr",
        ]));
        let apb = hints.iter().find(|h| h.protocol == Protocol::Apb).unwrap();
        assert_eq!(apb.confidence, 0.39);

        let hints = classify_protocols(&ports(&["pwrite", "paddr", "pwdata", "prdata"]));
        assert!(hints.iter().all(|h| h.protocol != Protocol::Apb));
    }

    #[test]
    fn bare_sda_scl_is_below_floor() {
        // 2/8 * 1.0 * 0.85 = 0.2125
        assert!(classify_protocols(&ports(&["sda", "scl"])).is_empty());
    }

    #[test]
    fn i2c_split_pads() {
        // sda, scl, sda_i, sda_o, scl_o: 5/8 * 0.85
        let hints = classify_protocols(&ports(&["clk", "rst_n", "sda_i", "sda_o", "sda_oen", "scl_o"]));
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].protocol, Protocol::I2c);
        assert_eq!(hints[0].confidence, 0.53);
    }

    #[test]
    fn uart_has_no_required_signals() {
        let hints = classify_protocols(&ports(&[
            "clk", "txd", "rxd", "baud_div", "tx_data", "rx_data", "tx_valid",
        ]));
        // tx, rx, txd, rxd, baud, tx_data, rx_data, tx_valid: 8/11 * 0.7
        assert_eq!(hints[0].protocol, Protocol::Uart);
        assert_eq!(hints[0].confidence, 0.51);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let hints = classify_protocols(&ports(&[
            "S_AXI_AWADDR", "S_AXI_AWVALID", "S_AXI_AWREADY", "S_AXI_WDATA", "S_AXI_WVALID",
            "S_AXI_WREADY", "S_AXI_BRESP", "S_AXI_BVALID", "S_AXI_BREADY", "S_AXI_ARADDR",
            "S_AXI_ARVALID", "S_AXI_ARREADY", "S_AXI_RDATA", "S_AXI_RVALID", "S_AXI_RREADY",
        ]));
        assert_eq!(hints[0].protocol, Protocol::Axi4Lite);
        assert_eq!(hints[0].confidence, 0.95);
    }

    #[test]
    fn hints_sorted_descending() {
        let hints = classify_protocols(&ports(&[
            "psel", "penable", "pwrite", "paddr", "pwdata", "prdata", "pready", "pslverr", "mosi",
            "miso", "sclk", "cs_n",
        ]));
        assert!(hints.len() >= 2);
        assert!(hints.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn no_ports_no_hints() {
        assert!(classify_protocols(&[]).is_empty());
    }

    #[test]
    fn protocol_names_round_trip() {
        for protocol in Protocol::ALL {
            assert_eq!(protocol.as_str().parse::<Protocol>(), Ok(protocol));
        }
        assert_eq!("AXI4-Lite".parse::<Protocol>(), Ok(Protocol::Axi4Lite));
        assert!("pcie".parse::<Protocol>().is_err());
    }
}
