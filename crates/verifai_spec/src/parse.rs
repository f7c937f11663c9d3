//! Keyword and pattern extraction over free-form description text.
//!
//! Recognized forms:
//!
//! - protocol keywords (`AXI4-Lite`, `UART`, `serial peripheral`, `I2C`, ...),
//!   falling back to APB;
//! - a module name after `for`, `name`, or `named`;
//! - widths written as `32-bit` or `16 bit address`;
//! - registers written as `NAME at 0x10`, `NAME @ 16`, or `NAME (0x10, RO)`.

use lazy_static::lazy_static;
use regex::Regex;

use verifai_rtl::Protocol;

use crate::model::{AccessType, ParsedSpec, Register, DEFAULT_FEATURES, REGISTER_FEATURE};

/// Bus width assumed when the description gives none.
pub const DEFAULT_WIDTH: u32 = 32;

/// Data width assumed for byte-oriented serial links.
pub const SERIAL_DATA_WIDTH: u32 = 8;

/// Words after `for`/`named` that never name a module.
const NAME_STOP_WORDS: &[&str] = &["a", "an", "the", "this", "that", "each", "every"];

lazy_static! {
    static ref AXI_LITE: Regex = Regex::new(r"axi4?[-_ ]?lite").unwrap();
    static ref MODULE_NAME: Regex =
        Regex::new(r#"\b(?:for|named?)\s+["']?(\w+)"#).unwrap();
    static ref WIDTH: Regex =
        Regex::new(r"(\d+)\s*-?\s*bits?\b(\s+(?:wide\s+)?addr(?:ess)?)?").unwrap();
    static ref REGISTER: Regex = Regex::new(
        r"(?i)(\w+)\s+(?:register\s+)?(?:at\s+|@\s*|\()(0x[0-9a-f]+|\d+)\)?(?:\s*[(,]\s*(RO|RW|WO|W1C|W1S|read[- ]?only|read[- ]?write|write[- ]?only)\b)?"
    )
    .unwrap();
}

/// Extracts protocol, module name, widths, and registers from `text`.
///
/// Never fails: a description with nothing recognizable yields an APB
/// design named `apb_dut` with 32-bit buses and no registers.
pub fn parse_spec(text: &str) -> ParsedSpec {
    let lower = text.to_ascii_lowercase();

    let protocol = detect_protocol(&lower);
    let module_name =
        extract_module_name(&lower).unwrap_or_else(|| format!("{}_dut", protocol.as_str()));

    let (data, addr) = extract_widths(&lower);
    let default_data = match protocol {
        Protocol::Uart | Protocol::Spi => SERIAL_DATA_WIDTH,
        _ => DEFAULT_WIDTH,
    };

    let registers = extract_registers(text);
    let mut features: Vec<String> = DEFAULT_FEATURES.iter().map(|f| f.to_string()).collect();
    if !registers.is_empty() {
        features.push(REGISTER_FEATURE.to_string());
    }

    tracing::debug!(
        protocol = %protocol,
        module = %module_name,
        registers = registers.len(),
        "parsed design description"
    );

    ParsedSpec {
        protocol,
        module_name,
        data_width: data.unwrap_or(default_data),
        addr_width: addr.unwrap_or(DEFAULT_WIDTH),
        registers,
        features,
        clock_name: "clk".to_string(),
        reset_name: "rst_n".to_string(),
        reset_active_low: true,
    }
}

/// Picks the protocol from keywords in lowercased text. Any AXI mention
/// means AXI4-Lite; no mention at all means APB.
pub fn detect_protocol(lower: &str) -> Protocol {
    if AXI_LITE.is_match(lower) || mentions(lower, "axi") {
        Protocol::Axi4Lite
    } else if mentions(lower, "uart") || mentions(lower, "rs232") || mentions(lower, "rs-232") {
        Protocol::Uart
    } else if lower.contains("serial peripheral") {
        Protocol::Spi
    } else if mentions(lower, "serial") {
        Protocol::Uart
    } else if mentions(lower, "spi") || mentions(lower, "qspi") {
        Protocol::Spi
    } else if mentions(lower, "i2c") || mentions(lower, "iic") {
        Protocol::I2c
    } else if mentions(lower, "wishbone") {
        Protocol::Wishbone
    } else {
        Protocol::Apb
    }
}

/// Whether `word` occurs with no letter directly before or after it, so
/// `spi_master` and `SPI,` mention SPI but `inspiring` does not.
fn mentions(lower: &str, word: &str) -> bool {
    lower.match_indices(word).any(|(start, _)| {
        let before = lower[..start].chars().next_back();
        let after = lower[start + word.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_alphabetic())
            && !after.is_some_and(|c| c.is_ascii_alphabetic())
    })
}

fn extract_module_name(lower: &str) -> Option<String> {
    MODULE_NAME
        .captures_iter(lower)
        .map(|cap| cap[1].to_string())
        .find(|name| !NAME_STOP_WORDS.contains(&name.as_str()))
}

/// First data width and first address width mentioned, in bits.
fn extract_widths(lower: &str) -> (Option<u32>, Option<u32>) {
    let mut data = None;
    let mut addr = None;
    for cap in WIDTH.captures_iter(lower) {
        let Some(bits) = cap[1].parse::<u32>().ok().filter(|&b| b > 0) else {
            continue;
        };
        let slot = if cap.get(2).is_some() { &mut addr } else { &mut data };
        slot.get_or_insert(bits);
    }
    (data, addr)
}

/// Registers in order of appearance. Addresses that do not fit a `u64` are
/// skipped.
fn extract_registers(text: &str) -> Vec<Register> {
    REGISTER
        .captures_iter(text)
        .filter_map(|cap| {
            let address = parse_address(&cap[2])?;
            let access = cap
                .get(3)
                .and_then(|m| m.as_str().parse::<AccessType>().ok())
                .unwrap_or_default();
            Some(Register {
                name: cap[1].to_ascii_uppercase(),
                address,
                access,
            })
        })
        .collect()
}

fn parse_address(text: &str) -> Option<u64> {
    match text.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => {
            u64::from_str_radix(&text[2..], 16).ok()
        }
        _ => text.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apb_detected_and_default() {
        for text in ["Create a UVM testbench for an APB slave", "apb slave", "Apb Slave"] {
            assert_eq!(parse_spec(text).protocol, Protocol::Apb, "{text}");
        }
        assert_eq!(parse_spec("memory controller").protocol, Protocol::Apb);
    }

    #[test]
    fn axi_spellings_mean_lite() {
        for text in [
            "Build an AXI4-Lite memory controller testbench",
            "axi4lite",
            "AXI4 Lite",
            "axi4-lite",
            "AXI lite slave",
            "plain AXI interconnect",
        ] {
            assert_eq!(parse_spec(text).protocol, Protocol::Axi4Lite, "{text}");
        }
    }

    #[test]
    fn serial_protocols() {
        assert_eq!(parse_spec("RS232 console").protocol, Protocol::Uart);
        assert_eq!(parse_spec("a serial port").protocol, Protocol::Uart);
        assert_eq!(
            parse_spec("Serial Peripheral Interface flash").protocol,
            Protocol::Spi
        );
        assert_eq!(parse_spec("spi_master block").protocol, Protocol::Spi);
        assert_eq!(parse_spec("IIC sensor hub").protocol, Protocol::I2c);
        assert_eq!(parse_spec("an inspiring design").protocol, Protocol::Apb);
    }

    #[test]
    fn serial_links_default_to_byte_width() {
        let spec = parse_spec("UART transmitter");
        assert_eq!(spec.data_width, 8);
        assert_eq!(spec.addr_width, 32);
        assert_eq!(parse_spec("SPI master with 16-bit frames").data_width, 16);
    }

    #[test]
    fn data_and_address_widths() {
        assert_eq!(parse_spec("APB slave with 32-bit data width").data_width, 32);
        assert_eq!(parse_spec("AXI4-Lite controller with 64-bit data").data_width, 64);

        let spec = parse_spec("APB slave with 16-bit address space");
        assert_eq!(spec.addr_width, 16);
        assert_eq!(spec.data_width, 32);

        let spec = parse_spec("64 bit data bus, 12 bit addr");
        assert_eq!((spec.data_width, spec.addr_width), (64, 12));
    }

    #[test]
    fn module_name_after_for_or_named() {
        assert_eq!(
            parse_spec("UVM testbench for my_uart_controller").module_name,
            "my_uart_controller"
        );
        assert_eq!(parse_spec("block named 'gpio_top'").module_name, "gpio_top");
        assert_eq!(
            parse_spec("testbench for an APB slave named bridge0").module_name,
            "bridge0"
        );
        assert_eq!(parse_spec("testbench for an APB slave").module_name, "apb_dut");
    }

    #[test]
    fn registers_with_hex_addresses() {
        let spec = parse_spec(
            "APB slave with registers:\n- STATUS at 0x00\n- CONTROL at 0x04\n- DATA at 0x08\n",
        );
        let names: Vec<_> = spec.registers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["STATUS", "CONTROL", "DATA"]);
        assert_eq!(spec.registers[1].address, 4);
        assert!(spec.registers.iter().all(|r| r.access == AccessType::Rw));
        assert!(spec.has_feature(REGISTER_FEATURE));

        let spec = parse_spec("APB with STATUS register at 0x1000");
        assert_eq!(spec.register("status").unwrap().address, 0x1000);
    }

    #[test]
    fn multiple_registers_keep_order() {
        let spec = parse_spec("APB with:\n- REG_A at 0x00\n- REG_B at 0x04\n- REG_C at 0x08\n- REG_D at 0X0C\n");
        assert_eq!(spec.registers.len(), 4);
        assert_eq!(spec.registers[3].name, "REG_D");
        assert_eq!(spec.registers[3].address, 12);
    }

    #[test]
    fn register_access_annotations() {
        let spec = parse_spec(
            "ctrl (0x04, RO), irq_status @ 8, W1C and tx_data at 0x10 (write-only) plus mask at 20, read only",
        );
        let found: Vec<_> = spec
            .registers
            .iter()
            .map(|r| (r.name.as_str(), r.address, r.access))
            .collect();
        assert_eq!(
            found,
            vec![
                ("CTRL", 4, AccessType::Ro),
                ("IRQ_STATUS", 8, AccessType::W1c),
                ("TX_DATA", 16, AccessType::Wo),
                ("MASK", 20, AccessType::Ro),
            ]
        );
    }

    #[test]
    fn oversized_address_is_skipped() {
        let spec = parse_spec("HUGE at 0x1ffffffffffffffff and SMALL at 0x4");
        assert_eq!(spec.registers.len(), 1);
        assert_eq!(spec.registers[0].name, "SMALL");
    }

    #[test]
    fn empty_description_gives_defaults() {
        let spec = parse_spec("");
        assert_eq!(spec.protocol, Protocol::Apb);
        assert_eq!(spec.module_name, "apb_dut");
        assert_eq!((spec.data_width, spec.addr_width), (32, 32));
        assert!(spec.registers.is_empty());
        assert_eq!(spec.features, vec!["scoreboard", "coverage", "sequences"]);
        assert_eq!(spec.reset_name, "rst_n");
        assert!(spec.reset_active_low);
    }
}
