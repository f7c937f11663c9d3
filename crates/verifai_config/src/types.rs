//! Configuration types deserialized from `verifai.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use verifai_rtl::Protocol;

/// Default coverage target in percent.
pub const DEFAULT_COVERAGE_TARGET: f64 = 95.0;
/// Default number of targeted closure sequences.
pub const DEFAULT_CLOSURE_LIMIT: usize = 10;
/// Default output directory for generated files.
pub const DEFAULT_OUTPUT_DIR: &str = "verif_out";

/// The top-level configuration parsed from `verifai.toml`.
///
/// Every section is optional; an empty file yields [`VerifaiConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifaiConfig {
    /// Project metadata.
    pub project: ProjectMeta,
    /// Coverage analysis settings.
    pub analysis: AnalysisConfig,
    /// Protocol selection and option tables.
    pub protocol: ProtocolOptions,
    /// Where generated files go.
    pub output: OutputConfig,
}

/// Project metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
}

/// Coverage analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Coverage target in percent, within `[0, 100]`.
    pub coverage_target: f64,
    /// Maximum number of targeted closure sequences to emit.
    pub closure_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            coverage_target: DEFAULT_COVERAGE_TARGET,
            closure_limit: DEFAULT_CLOSURE_LIMIT,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for bundles and generated sources.
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

/// User-chosen protocol settings. Anything left unset falls back to what
/// was inferred from the RTL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolOptions {
    /// Protocol override, accepting the same names as [`Protocol`]'s
    /// `FromStr` (`apb`, `axi4-lite`, `wb`, ...).
    #[serde(deserialize_with = "deserialize_protocol_kind", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Protocol>,
    /// Data width override in bits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_width: Option<u32>,
    /// Address width override in bits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr_width: Option<u32>,
    /// UART link options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uart: Option<UartOptions>,
    /// SPI link options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spi: Option<SpiOptions>,
    /// I2C link options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i2c: Option<I2cOptions>,
}

/// Deserializes an optional protocol name through [`Protocol`]'s `FromStr`,
/// so aliases such as `axi4-lite` are accepted.
fn deserialize_protocol_kind<'de, D>(deserializer: D) -> Result<Option<Protocol>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ProtocolName;

    impl<'de> Visitor<'de> for ProtocolName {
        type Value = Option<Protocol>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a protocol name such as \"apb\" or \"axi4-lite\"")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.parse::<Protocol>().map(Some).map_err(E::custom)
        }
    }

    deserializer.deserialize_str(ProtocolName)
}

// ============================================================================
// UART
// ============================================================================

/// UART parity mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    /// No parity bit.
    #[default]
    None,
    /// Even parity.
    Even,
    /// Odd parity.
    Odd,
    /// Parity bit always 1.
    Mark,
    /// Parity bit always 0.
    Space,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Parity::None => "none",
            Parity::Even => "even",
            Parity::Odd => "odd",
            Parity::Mark => "mark",
            Parity::Space => "space",
        };
        f.write_str(name)
    }
}

/// UART link options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UartOptions {
    /// Data bits per frame, 5 to 8.
    pub data_bits: u8,
    /// Stop bits: 1, 1.5, or 2.
    pub stop_bits: f64,
    /// Parity mode.
    pub parity: Parity,
    /// Line rate in baud.
    pub baud_rate: u32,
    /// RTS/CTS flow control.
    pub has_rts_cts: bool,
    /// DTR/DSR flow control.
    pub has_dtr_dsr: bool,
    /// Transmit FIFO present.
    pub has_tx_fifo: bool,
    /// Receive FIFO present.
    pub has_rx_fifo: bool,
    /// FIFO depth in entries.
    pub fifo_depth: u32,
    /// Break condition detection.
    pub has_break_detect: bool,
    /// Framing error detection.
    pub has_frame_error: bool,
    /// Parity error detection.
    pub has_parity_error: bool,
    /// Overrun error detection.
    pub has_overrun_error: bool,
}

impl Default for UartOptions {
    fn default() -> Self {
        Self {
            data_bits: 8,
            stop_bits: 1.0,
            parity: Parity::None,
            baud_rate: 115_200,
            has_rts_cts: false,
            has_dtr_dsr: false,
            has_tx_fifo: true,
            has_rx_fifo: true,
            fifo_depth: 16,
            has_break_detect: true,
            has_frame_error: true,
            has_parity_error: true,
            has_overrun_error: true,
        }
    }
}

impl UartOptions {
    /// Preset names accepted by [`preset`](Self::preset).
    pub const PRESETS: &'static [&'static str] = &["standard", "legacy", "8e1", "7o1", "flow_control"];

    /// Looks up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        let base = Self::default();
        let options = match name {
            "standard" => base,
            "legacy" => Self {
                baud_rate: 9_600,
                has_tx_fifo: false,
                has_rx_fifo: false,
                ..base
            },
            "8e1" => Self {
                parity: Parity::Even,
                ..base
            },
            "7o1" => Self {
                data_bits: 7,
                parity: Parity::Odd,
                ..base
            },
            "flow_control" => Self {
                has_rts_cts: true,
                fifo_depth: 64,
                ..base
            },
            _ => return None,
        };
        Some(options)
    }

    /// Duration of one bit in nanoseconds, truncated. 0 when the baud rate
    /// is 0.
    pub fn bit_period_ns(&self) -> u64 {
        1_000_000_000u64.checked_div(u64::from(self.baud_rate)).unwrap_or(0)
    }

    /// Bits on the wire per frame: start, data, parity if any, and the
    /// whole stop bits.
    pub fn frame_bits(&self) -> u32 {
        let parity = u32::from(self.parity != Parity::None);
        1 + u32::from(self.data_bits) + parity + self.stop_bits.trunc() as u32
    }
}

// ============================================================================
// SPI
// ============================================================================

/// SPI link options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiOptions {
    /// Bits per transfer.
    pub data_width: u32,
    /// System clock to SCLK divider.
    pub clock_divider: u32,
    /// SPI mode 0 to 3.
    pub spi_mode: u8,
    /// MSB shifted first.
    pub msb_first: bool,
    /// Simultaneous MOSI and MISO.
    pub full_duplex: bool,
    /// Number of slave selects, at least 1.
    pub num_slaves: u32,
    /// Chip select asserted low.
    pub cs_active_low: bool,
    /// CS setup cycles before the first edge.
    pub cs_setup_time: u32,
    /// CS hold cycles after the last edge.
    pub cs_hold_time: u32,
    /// Idle cycles between transfers.
    pub inter_transfer_gap: u32,
    /// Quad I/O support.
    pub supports_quad_spi: bool,
    /// Dual I/O support.
    pub supports_dual_spi: bool,
}

impl Default for SpiOptions {
    fn default() -> Self {
        Self {
            data_width: 8,
            clock_divider: 2,
            spi_mode: 0,
            msb_first: true,
            full_duplex: true,
            num_slaves: 1,
            cs_active_low: true,
            cs_setup_time: 1,
            cs_hold_time: 1,
            inter_transfer_gap: 2,
            supports_quad_spi: false,
            supports_dual_spi: false,
        }
    }
}

impl SpiOptions {
    /// Preset names accepted by [`preset`](Self::preset).
    pub const PRESETS: &'static [&'static str] = &[
        "standard",
        "fast",
        "multi_slave",
        "16bit",
        "32bit",
        "mode1",
        "mode2",
        "mode3",
        "quad_spi",
        "flash_memory",
        "adc_sensor",
    ];

    /// Looks up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        let base = Self::default();
        let options = match name {
            "standard" => base,
            "fast" => Self {
                clock_divider: 1,
                ..base
            },
            "multi_slave" => Self {
                num_slaves: 4,
                ..base
            },
            "16bit" => Self {
                data_width: 16,
                ..base
            },
            "32bit" => Self {
                data_width: 32,
                ..base
            },
            "mode1" => Self { spi_mode: 1, ..base },
            "mode2" => Self { spi_mode: 2, ..base },
            "mode3" => Self { spi_mode: 3, ..base },
            "quad_spi" | "flash_memory" => Self {
                supports_quad_spi: true,
                ..base
            },
            "adc_sensor" => Self {
                data_width: 16,
                clock_divider: 4,
                ..base
            },
            _ => return None,
        };
        Some(options)
    }

    /// Clock polarity, bit 1 of the mode.
    pub fn cpol(&self) -> u8 {
        (self.spi_mode >> 1) & 1
    }

    /// Clock phase, bit 0 of the mode.
    pub fn cpha(&self) -> u8 {
        self.spi_mode & 1
    }

    /// Human-readable mode summary.
    pub fn mode_description(&self) -> &'static str {
        match self.spi_mode {
            0 => "Mode 0 (CPOL=0, CPHA=0): Sample on rising edge, idle low",
            1 => "Mode 1 (CPOL=0, CPHA=1): Sample on falling edge, idle low",
            2 => "Mode 2 (CPOL=1, CPHA=0): Sample on falling edge, idle high",
            3 => "Mode 3 (CPOL=1, CPHA=1): Sample on rising edge, idle high",
            _ => "Unknown mode",
        }
    }
}

// ============================================================================
// I2C
// ============================================================================

/// I2C bus speed grade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum I2cSpeed {
    /// 100 kHz.
    #[default]
    Standard,
    /// 400 kHz.
    Fast,
    /// 1 MHz.
    FastPlus,
    /// 3.4 MHz.
    HighSpeed,
}

impl I2cSpeed {
    /// Human-readable speed grade.
    pub fn description(self) -> &'static str {
        match self {
            I2cSpeed::Standard => "Standard Mode (100 kHz)",
            I2cSpeed::Fast => "Fast Mode (400 kHz)",
            I2cSpeed::FastPlus => "Fast Mode Plus (1 MHz)",
            I2cSpeed::HighSpeed => "High Speed Mode (3.4 MHz)",
        }
    }
}

impl fmt::Display for I2cSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            I2cSpeed::Standard => "standard",
            I2cSpeed::Fast => "fast",
            I2cSpeed::FastPlus => "fast_plus",
            I2cSpeed::HighSpeed => "high_speed",
        };
        f.write_str(name)
    }
}

/// I2C link options. Timing fields are in nanoseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I2cOptions {
    /// Speed grade.
    pub speed_mode: I2cSpeed,
    /// SCL frequency in Hz.
    pub clock_frequency: u32,
    /// 7 or 10.
    pub address_bits: u8,
    /// Slave address.
    pub device_address: u16,
    /// Slaves may hold SCL low.
    pub supports_clock_stretching: bool,
    /// More than one master on the bus.
    pub supports_multi_master: bool,
    /// 10-bit addressing support.
    pub supports_10bit_addr: bool,
    /// Bus free time between STOP and START.
    pub t_buf: u32,
    /// START hold time.
    pub t_hd_sta: u32,
    /// Repeated START setup time.
    pub t_su_sta: u32,
    /// STOP setup time.
    pub t_su_sto: u32,
    /// Data hold time.
    pub t_hd_dat: u32,
    /// Data setup time.
    pub t_su_dat: u32,
    /// SCL low period.
    pub t_low: u32,
    /// SCL high period.
    pub t_high: u32,
    /// Transmit FIFO present.
    pub has_tx_fifo: bool,
    /// Receive FIFO present.
    pub has_rx_fifo: bool,
    /// FIFO depth in entries.
    pub fifo_depth: u32,
}

impl Default for I2cOptions {
    fn default() -> Self {
        Self {
            speed_mode: I2cSpeed::Standard,
            clock_frequency: 100_000,
            address_bits: 7,
            device_address: 0x50,
            supports_clock_stretching: true,
            supports_multi_master: false,
            supports_10bit_addr: false,
            t_buf: 4700,
            t_hd_sta: 4000,
            t_su_sta: 4700,
            t_su_sto: 4000,
            t_hd_dat: 0,
            t_su_dat: 250,
            t_low: 4700,
            t_high: 4000,
            has_tx_fifo: true,
            has_rx_fifo: true,
            fifo_depth: 8,
        }
    }
}

impl I2cOptions {
    /// Preset names accepted by [`preset`](Self::preset).
    pub const PRESETS: &'static [&'static str] = &[
        "standard",
        "fast",
        "fast_plus",
        "eeprom",
        "sensor",
        "10bit",
        "multi_master",
    ];

    /// Fast-mode (400 kHz) bus timing.
    fn fast_mode() -> Self {
        Self {
            speed_mode: I2cSpeed::Fast,
            clock_frequency: 400_000,
            t_buf: 1300,
            t_hd_sta: 600,
            t_su_sta: 600,
            t_su_sto: 600,
            t_low: 1300,
            t_high: 600,
            ..Self::default()
        }
    }

    /// Looks up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        let base = Self::default();
        let options = match name {
            "standard" | "eeprom" => base,
            "fast" => Self::fast_mode(),
            "fast_plus" => Self {
                speed_mode: I2cSpeed::FastPlus,
                clock_frequency: 1_000_000,
                t_buf: 500,
                t_hd_sta: 260,
                t_su_sta: 260,
                t_su_sto: 260,
                t_low: 500,
                t_high: 260,
                ..base
            },
            "sensor" => Self {
                device_address: 0x68,
                ..Self::fast_mode()
            },
            "10bit" => Self {
                address_bits: 10,
                supports_10bit_addr: true,
                ..base
            },
            "multi_master" => Self {
                supports_multi_master: true,
                ..base
            },
            _ => return None,
        };
        Some(options)
    }

    /// SCL period in nanoseconds, truncated. 0 when the frequency is 0.
    pub fn clock_period_ns(&self) -> u64 {
        1_000_000_000u64.checked_div(u64::from(self.clock_frequency)).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uart_computed_fields() {
        let uart = UartOptions::default();
        assert_eq!(uart.bit_period_ns(), 8680);
        assert_eq!(uart.frame_bits(), 10);

        let framed = UartOptions {
            parity: Parity::Even,
            stop_bits: 2.0,
            ..UartOptions::default()
        };
        assert_eq!(framed.frame_bits(), 12);

        let half = UartOptions {
            stop_bits: 1.5,
            ..UartOptions::default()
        };
        assert_eq!(half.frame_bits(), 10);
    }

    #[test]
    fn spi_mode_bits() {
        for (mode, cpol, cpha) in [(0, 0, 0), (1, 0, 1), (2, 1, 0), (3, 1, 1)] {
            let spi = SpiOptions {
                spi_mode: mode,
                ..SpiOptions::default()
            };
            assert_eq!((spi.cpol(), spi.cpha()), (cpol, cpha));
        }
        assert!(SpiOptions::preset("mode2").unwrap().mode_description().starts_with("Mode 2"));
    }

    #[test]
    fn i2c_clock_period() {
        assert_eq!(I2cOptions::default().clock_period_ns(), 10_000);
        assert_eq!(I2cOptions::preset("fast").unwrap().clock_period_ns(), 2_500);
        let sensor = I2cOptions::preset("sensor").unwrap();
        assert_eq!(sensor.device_address, 0x68);
        assert_eq!(sensor.speed_mode, I2cSpeed::Fast);
    }

    #[test]
    fn every_listed_preset_resolves() {
        assert!(UartOptions::PRESETS.iter().all(|p| UartOptions::preset(p).is_some()));
        assert!(SpiOptions::PRESETS.iter().all(|p| SpiOptions::preset(p).is_some()));
        assert!(I2cOptions::PRESETS.iter().all(|p| I2cOptions::preset(p).is_some()));
        assert!(SpiOptions::preset("turbo").is_none());
    }

    #[test]
    fn zero_rates_do_not_divide() {
        let uart = UartOptions {
            baud_rate: 0,
            ..UartOptions::default()
        };
        assert_eq!(uart.bit_period_ns(), 0);
    }
}
