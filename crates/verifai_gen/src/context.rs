//! Flat key/value context for testbench templates.
//!
//! Keys mirror what a template engine expects: names in both cases, bus
//! widths, clock and reset names, port lists, FSM facts, and the computed
//! fields of whichever serial protocol applies.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use verifai_config::{I2cOptions, ProtocolOptions, SpiOptions, UartOptions};
use verifai_rtl::{ParsedRtl, Port, Protocol};
use verifai_sva::SvaGenerator;

/// Protocol name used when neither the configuration nor the design names
/// one.
pub const GENERIC_PROTOCOL: &str = "generic";

/// Reset name assumed when the design has none.
pub const DEFAULT_RESET: &str = "rst_n";

/// Template variables keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: BTreeMap<String, Value>,
}

impl TemplateContext {
    /// Builds the context for a parsed design.
    ///
    /// `options.kind` overrides the detected protocol and the width
    /// overrides replace the inferred bus widths. UART, SPI, and I2C fields
    /// are added when that protocol is in effect or its option table is set;
    /// a missing table falls back to the protocol's defaults.
    pub fn from_parsed(rtl: &ParsedRtl, options: &ProtocolOptions) -> Self {
        let mut ctx = Self::default();
        let protocol = options
            .kind
            .or_else(|| rtl.top_protocol().map(|hint| hint.protocol));
        let prefix = protocol.map_or(GENERIC_PROTOCOL, Protocol::as_str);

        ctx.insert("protocol", prefix);
        ctx.insert("protocol_upper", prefix.to_ascii_uppercase());
        ctx.insert("prefix", prefix);
        ctx.insert("PREFIX", prefix.to_ascii_uppercase());

        let module = if rtl.is_unknown_module() {
            format!("{prefix}_dut")
        } else {
            rtl.module_name.clone()
        };
        ctx.insert("module_name_upper", module.to_ascii_uppercase());
        ctx.insert("module_name", module);

        let data_width = options.data_width.unwrap_or_else(|| rtl.data_width());
        let addr_width = options.addr_width.unwrap_or_else(|| rtl.addr_width());
        ctx.insert("data_width", data_width);
        ctx.insert("addr_width", addr_width);
        ctx.insert("strb_width", data_width.div_ceil(8));

        let sva = SvaGenerator::new(rtl);
        let reset = sva.reset().unwrap_or(DEFAULT_RESET);
        let active_low = sva.is_reset_active_low();
        ctx.insert("clock", sva.clock());
        ctx.insert("clock_edge", sva.clock_edge().to_string());
        ctx.insert("has_reset", sva.reset().is_some());
        ctx.insert("reset", reset);
        ctx.insert("reset_active_low", active_low);
        ctx.insert(
            "reset_active",
            if active_low {
                format!("!{reset}")
            } else {
                reset.to_string()
            },
        );

        ctx.insert("inputs", port_list(&rtl.input_ports()));
        ctx.insert("outputs", port_list(&rtl.output_ports()));
        ctx.insert("ports", port_list(&rtl.ports.iter().collect::<Vec<_>>()));
        ctx.insert(
            "parameters",
            rtl.parameters
                .iter()
                .map(|p| json!({ "name": p.name, "value": p.value }))
                .collect::<Vec<_>>(),
        );

        ctx.insert("has_fsm", rtl.fsm.is_some());
        if let Some(fsm) = &rtl.fsm {
            ctx.insert("fsm_state_signal", fsm.state_signal.as_str());
            ctx.insert("fsm_states", fsm.states.clone());
            ctx.insert("fsm_state_count", fsm.state_count);
            ctx.insert("fsm_encoding", fsm.encoding.to_string());
        }

        if protocol == Some(Protocol::Uart) || options.uart.is_some() {
            ctx.add_uart(&options.uart.clone().unwrap_or_default());
        }
        if protocol == Some(Protocol::Spi) || options.spi.is_some() {
            ctx.add_spi(&options.spi.clone().unwrap_or_default());
        }
        if protocol == Some(Protocol::I2c) || options.i2c.is_some() {
            ctx.add_i2c(&options.i2c.clone().unwrap_or_default());
        }

        tracing::debug!(module = %rtl.module_name, protocol = prefix, keys = ctx.len(), "built template context");
        ctx
    }

    /// Looks up one variable.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Variable names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the context holds no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    fn add_uart(&mut self, uart: &UartOptions) {
        self.insert("baud_rate", uart.baud_rate);
        self.insert("data_bits", uart.data_bits);
        self.insert("stop_bits", uart.stop_bits);
        self.insert("parity", uart.parity.to_string());
        self.insert("has_rts_cts", uart.has_rts_cts);
        self.insert("has_tx_fifo", uart.has_tx_fifo);
        self.insert("has_rx_fifo", uart.has_rx_fifo);
        self.insert("fifo_depth", uart.fifo_depth);
        self.insert("bit_period_ns", uart.bit_period_ns());
        self.insert("frame_bits", uart.frame_bits());
    }

    fn add_spi(&mut self, spi: &SpiOptions) {
        self.insert("spi_mode", spi.spi_mode);
        self.insert("spi_cpol", spi.cpol());
        self.insert("spi_cpha", spi.cpha());
        self.insert("spi_mode_description", spi.mode_description());
        self.insert("spi_data_width", spi.data_width);
        self.insert("spi_num_slaves", spi.num_slaves);
        self.insert("spi_msb_first", spi.msb_first);
        self.insert("spi_clock_divider", spi.clock_divider);
        self.insert("spi_cs_setup_time", spi.cs_setup_time);
        self.insert("spi_cs_hold_time", spi.cs_hold_time);
        self.insert("spi_supports_qspi", spi.supports_quad_spi);
    }

    fn add_i2c(&mut self, i2c: &I2cOptions) {
        self.insert("i2c_speed_mode", i2c.speed_mode.to_string());
        self.insert("i2c_speed_description", i2c.speed_mode.description());
        self.insert("i2c_clock_frequency", i2c.clock_frequency);
        self.insert("i2c_clock_period_ns", i2c.clock_period_ns());
        self.insert("i2c_address_bits", i2c.address_bits);
        self.insert("i2c_device_address", i2c.device_address);
        self.insert("i2c_clock_stretching", i2c.supports_clock_stretching);
        self.insert("i2c_multi_master", i2c.supports_multi_master);
    }
}

fn port_list(ports: &[&Port]) -> Vec<Value> {
    ports
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "direction": p.direction.to_string(),
                "width": p.width,
                "width_str": p.width_str(),
                "is_signed": p.is_signed,
            })
        })
        .collect()
}
