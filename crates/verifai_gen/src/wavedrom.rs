//! WaveDrom timing diagrams for the protocol catalog.

use serde_json::{json, Value};
use verifai_rtl::Protocol;

/// WaveDrom JSON for a protocol name, APB when the name is not recognized.
///
/// Names are matched case-insensitively with `-` and `_` ignored, so
/// `AXI4-Lite`, `axi4_lite`, and `axi4lite` are the same diagram.
pub fn wavedrom(protocol: &str) -> String {
    let normalized: String = protocol
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect();
    let protocol = normalized.parse::<Protocol>().unwrap_or(Protocol::Apb);
    diagram(protocol).to_string()
}

/// The timing diagram for one protocol.
pub fn diagram(protocol: Protocol) -> Value {
    match protocol {
        Protocol::Apb => json!({
            "signal": [
                {"name": "PCLK", "wave": "p........"},
                {"name": "PSEL", "wave": "0.1....0."},
                {"name": "PENABLE", "wave": "0..1...0."},
                {"name": "PWRITE", "wave": "0.1....0."},
                {"name": "PADDR", "wave": "x.3....x.", "data": ["ADDR"]},
                {"name": "PWDATA", "wave": "x.4....x.", "data": ["DATA"]},
                {"name": "PREADY", "wave": "0....1.0."},
                {"name": "PRDATA", "wave": "x.....5x.", "data": ["RDATA"]}
            ],
            "head": {"text": "APB Write Transaction", "tick": 0}
        }),
        // Full AXI4 shares the single-beat write picture.
        Protocol::Axi4Lite | Protocol::Axi4 => json!({
            "signal": [
                {"name": "ACLK", "wave": "p........."},
                {"name": "AWVALID", "wave": "0.1..0...."},
                {"name": "AWREADY", "wave": "0...10...."},
                {"name": "AWADDR", "wave": "x.3..x....", "data": ["ADDR"]},
                {"name": "WVALID", "wave": "0....1.0.."},
                {"name": "WREADY", "wave": "0.....10.."},
                {"name": "WDATA", "wave": "x....4.x..", "data": ["DATA"]},
                {"name": "BVALID", "wave": "0.......1."},
                {"name": "BREADY", "wave": "1........."}
            ],
            "head": {"text": format!("{} Write Transaction", protocol.display_name()), "tick": 0}
        }),
        Protocol::Spi => json!({
            "signal": [
                {"name": "SCLK", "wave": "0.hlhlhlhl"},
                {"name": "CS_N", "wave": "10.......1"},
                {"name": "MOSI", "wave": "x.34567890", "data": ["7", "6", "5", "4", "3", "2", "1", "0"]},
                {"name": "MISO", "wave": "x.90876543", "data": ["7", "6", "5", "4", "3", "2", "1", "0"]}
            ],
            "head": {"text": "SPI Mode 0 Transfer (8-bit)", "tick": 0}
        }),
        Protocol::Uart => json!({
            "signal": [
                {
                    "name": "TX",
                    "wave": "1.0.3.4.5.6.7.8.9.0.1.1",
                    "data": ["ST", "0", "1", "2", "3", "4", "5", "6", "7", "SP"]
                }
            ],
            "head": {"text": "UART Frame (8N1)", "tick": 0},
            "foot": {"text": "Start bit, 8 data bits, Stop bit"}
        }),
        Protocol::I2c => json!({
            "signal": [
                {"name": "SCL", "wave": "1.0h.l.h.l.h.l.h.l.h.l.h1"},
                {"name": "SDA", "wave": "1.0..3...4...5...6...0..1", "data": ["A6", "A5", "A4", "ACK"]}
            ],
            "head": {"text": "I2C Start + Address", "tick": 0}
        }),
        Protocol::Wishbone => json!({
            "signal": [
                {"name": "CLK_I", "wave": "p......."},
                {"name": "CYC_O", "wave": "0.1...0."},
                {"name": "STB_O", "wave": "0.1...0."},
                {"name": "WE_O", "wave": "0.1...0."},
                {"name": "ADR_O", "wave": "x.3...x.", "data": ["ADDR"]},
                {"name": "DAT_O", "wave": "x.4...x.", "data": ["DATA"]},
                {"name": "ACK_I", "wave": "0....10."}
            ],
            "head": {"text": "Wishbone Classic Write Cycle", "tick": 0}
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head(protocol: &str) -> String {
        let value: Value = serde_json::from_str(&wavedrom(protocol)).unwrap();
        value["head"]["text"].as_str().unwrap().to_string()
    }

    #[test]
    fn apb_is_default() {
        assert_eq!(head("apb"), "APB Write Transaction");
        assert_eq!(head("pcie"), "APB Write Transaction");
        assert_eq!(head(""), "APB Write Transaction");
    }

    #[test]
    fn name_normalization() {
        assert_eq!(head("AXI4-Lite"), "AXI4-Lite Write Transaction");
        assert_eq!(head("axi4_lite"), "AXI4-Lite Write Transaction");
        assert_eq!(head("AXI4"), "AXI4 Write Transaction");
        assert_eq!(head("WB"), "Wishbone Classic Write Cycle");
    }

    #[test]
    fn serial_diagrams() {
        let uart: Value = serde_json::from_str(&wavedrom("uart")).unwrap();
        assert_eq!(uart["signal"][0]["name"], "TX");
        assert_eq!(uart["signal"][0]["data"].as_array().unwrap().len(), 10);
        assert_eq!(uart["foot"]["text"], "Start bit, 8 data bits, Stop bit");

        let spi: Value = serde_json::from_str(&wavedrom("SPI")).unwrap();
        assert_eq!(spi["signal"].as_array().unwrap().len(), 4);
        assert_eq!(head("i2c"), "I2C Start + Address");
    }
}
