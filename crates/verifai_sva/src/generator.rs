//! Property generation from a [`ParsedRtl`].
//!
//! Four families are produced, in order: reset, stability, protocol (picked
//! from the top protocol hint), and FSM. Protocol rules whose driving signals
//! are all design inputs become `assume` properties, since the environment
//! owns them; everything the design drives is asserted.

use verifai_rtl::{ClockEdge, FsmEncoding, ParsedRtl, Port, PortDirection, Protocol, SignalClass};

use crate::model::{AssertionCategory, AssertionType, SvaModule, SvaProperty};

/// Clock name used when the design exposes nothing clock-like.
pub const DEFAULT_CLOCK: &str = "clk";

/// Builds assertions for one parsed design.
pub struct SvaGenerator<'a> {
    rtl: &'a ParsedRtl,
    clock: String,
    reset: Option<String>,
}

impl<'a> SvaGenerator<'a> {
    /// Creates a generator, resolving the sampling clock and reset up front.
    pub fn new(rtl: &'a ParsedRtl) -> Self {
        let clock = rtl
            .clocks
            .clock_signals
            .first()
            .cloned()
            .or_else(|| {
                rtl.ports
                    .iter()
                    .find(|p| p.name.to_ascii_lowercase().contains("clk"))
                    .map(|p| p.name.clone())
            })
            .unwrap_or_else(|| DEFAULT_CLOCK.to_string());
        let reset = rtl.clocks.reset_signals.first().cloned();
        Self { rtl, clock, reset }
    }

    /// The sampling clock: the first detected clock, else the first port
    /// whose name contains `clk`, else `clk`.
    pub fn clock(&self) -> &str {
        &self.clock
    }

    /// The sampling edge of [`clock`](Self::clock).
    pub fn clock_edge(&self) -> ClockEdge {
        self.rtl
            .clocks
            .clock_edges
            .get(&self.clock)
            .copied()
            .unwrap_or_default()
    }

    /// The first detected reset, if any.
    pub fn reset(&self) -> Option<&str> {
        self.reset.as_deref()
    }

    /// Whether the reset is active low. Without a classified polarity the
    /// `_n` convention is assumed.
    pub fn is_reset_active_low(&self) -> bool {
        self.reset
            .as_deref()
            .and_then(|r| self.rtl.reset_polarity(r))
            .map_or(true, |p| p.is_active_low())
    }

    /// Generates every applicable property family.
    pub fn generate_all(&self) -> SvaModule {
        let mut properties = self.reset_properties();
        properties.extend(self.stability_properties());
        properties.extend(self.protocol_properties());
        properties.extend(self.fsm_properties());

        tracing::debug!(
            module = %self.rtl.module_name,
            clock = %self.clock,
            properties = properties.len(),
            "generated assertions"
        );

        let mut ports = self.rtl.ports.clone();
        if let Some(state) = self.observed_state() {
            ports.push(state);
        }

        SvaModule {
            module_name: self.rtl.module_name.clone(),
            clock: self.clock.clone(),
            reset: self.reset.clone(),
            ports,
            properties,
        }
    }

    // ------------------------------------------------------------------
    // Expression helpers
    // ------------------------------------------------------------------

    fn event(&self) -> String {
        format!("@({} {})", self.clock_edge(), self.clock)
    }

    /// Clocking event plus `disable iff` when a reset exists.
    fn clocked(&self) -> String {
        match self.reset_asserted() {
            Some(asserted) => format!("{} disable iff ({asserted})", self.event()),
            None => self.event(),
        }
    }

    fn reset_asserted(&self) -> Option<String> {
        let reset = self.reset.as_deref()?;
        Some(if self.is_reset_active_low() {
            format!("!{reset}")
        } else {
            reset.to_string()
        })
    }

    fn reset_released(&self) -> Option<String> {
        let reset = self.reset.as_deref()?;
        Some(if self.is_reset_active_low() {
            format!("$rose({reset})")
        } else {
            format!("$fell({reset})")
        })
    }

    /// Finds a port for a signal token: exact name, then `*_token`, then
    /// `token_*`, then `*_token_*`. Case-insensitive.
    fn signal(&self, token: &str) -> Option<&'a Port> {
        let ports = &self.rtl.ports;
        let suffix = format!("_{token}");
        let prefix = format!("{token}_");
        let infix = format!("_{token}_");
        let lowered = |p: &&Port| p.name.to_ascii_lowercase();

        ports
            .iter()
            .find(|p| lowered(p) == token)
            .or_else(|| ports.iter().find(|p| lowered(p).ends_with(&suffix)))
            .or_else(|| ports.iter().find(|p| lowered(p).starts_with(&prefix)))
            .or_else(|| ports.iter().find(|p| lowered(p).contains(&infix)))
    }

    fn signal_any(&self, tokens: &[&str]) -> Option<&'a Port> {
        tokens.iter().find_map(|t| self.signal(t))
    }

    /// Exact, case-insensitive name lookup over candidates, in order.
    fn exact_any(&self, names: &[&str]) -> Option<&'a Port> {
        names.iter().find_map(|n| {
            self.rtl
                .ports
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(n))
        })
    }

    /// `assume` when every driver is a design input, else `assert`.
    fn obligation(drivers: &[&Port]) -> AssertionType {
        if !drivers.is_empty() && drivers.iter().all(|p| p.direction == PortDirection::Input) {
            AssertionType::Assume
        } else {
            AssertionType::Assert
        }
    }

    fn check(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        category: AssertionCategory,
        drivers: &[&Port],
        body: &str,
    ) -> SvaProperty {
        SvaProperty {
            name: name.into(),
            description: description.into(),
            category,
            assertion_type: Self::obligation(drivers),
            code: format!("{} {body}", self.clocked()),
        }
    }

    fn cover(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
        category: AssertionCategory,
        body: &str,
    ) -> SvaProperty {
        SvaProperty {
            name: name.into(),
            description: description.into(),
            category,
            assertion_type: AssertionType::Cover,
            code: format!("{} {body}", self.clocked()),
        }
    }

    // ------------------------------------------------------------------
    // Families
    // ------------------------------------------------------------------

    /// Every output is known in the cycle reset is released.
    fn reset_properties(&self) -> Vec<SvaProperty> {
        let Some(released) = self.reset_released() else {
            return Vec::new();
        };
        self.rtl
            .output_ports()
            .into_iter()
            .map(|out| SvaProperty {
                name: format!("{}_known_after_reset", out.name),
                description: format!("{} is known when reset is released", out.name),
                category: AssertionCategory::Reset,
                assertion_type: AssertionType::Assert,
                code: format!("{} {released} |-> !$isunknown({})", self.event(), out.name),
            })
            .collect()
    }

    /// No output carries X or Z outside reset.
    fn stability_properties(&self) -> Vec<SvaProperty> {
        self.rtl
            .output_ports()
            .into_iter()
            .map(|out| {
                self.check(
                    format!("{}_no_x", out.name),
                    format!("{} never carries X or Z outside reset", out.name),
                    AssertionCategory::Stability,
                    &[out],
                    &format!("!$isunknown({})", out.name),
                )
            })
            .collect()
    }

    fn protocol_properties(&self) -> Vec<SvaProperty> {
        let Some(hint) = self.rtl.top_protocol() else {
            return Vec::new();
        };
        match hint.protocol {
            Protocol::Apb => self.apb(),
            Protocol::Axi4Lite | Protocol::Axi4 => self.axi(),
            Protocol::Spi => self.spi(),
            Protocol::I2c => self.i2c(),
            Protocol::Uart => self.uart(),
            Protocol::Wishbone => self.wishbone(),
        }
    }

    fn apb(&self) -> Vec<SvaProperty> {
        use AssertionCategory::Protocol as P;

        let (Some(psel), Some(penable)) = (self.signal("psel"), self.signal("penable")) else {
            return Vec::new();
        };
        let (sel, en) = (&psel.name, &penable.name);
        let pready = self.signal("pready");

        let mut props = vec![
            self.check(
                "apb_setup_to_access",
                "A setup phase is always followed by an access phase",
                P,
                &[psel, penable],
                &format!("({sel} && !{en}) |=> ({sel} && {en})"),
            ),
            self.check(
                "apb_penable_needs_psel",
                "PENABLE is only asserted while PSEL is high",
                P,
                &[penable],
                &format!("{en} |-> {sel}"),
            ),
        ];

        let pending = match pready {
            Some(ready) => {
                let rdy = &ready.name;
                props.push(self.check(
                    "apb_access_held",
                    "The access phase holds until PREADY",
                    P,
                    &[psel, penable],
                    &format!("({sel} && {en} && !{rdy}) |=> ({sel} && {en})"),
                ));
                format!("{sel} && !({en} && {rdy})")
            }
            None => format!("{sel} && !{en}"),
        };

        for token in ["paddr", "pwrite", "pwdata"] {
            if let Some(sig) = self.signal(token) {
                props.push(self.check(
                    format!("apb_{token}_stable"),
                    format!("{} is stable for the whole transfer", sig.name),
                    P,
                    &[sig],
                    &format!("({pending}) |=> $stable({})", sig.name),
                ));
            }
        }

        let done = match pready {
            Some(ready) => format!("{sel} && {en} && {}", ready.name),
            None => format!("{sel} && {en}"),
        };
        props.push(self.cover("apb_transfer", "An APB transfer completes", P, &done));
        if let Some(write) = self.signal("pwrite") {
            let w = &write.name;
            props.push(self.cover("apb_write", "A write transfer completes", P, &format!("{done} && {w}")));
            props.push(self.cover("apb_read", "A read transfer completes", P, &format!("{done} && !{w}")));
        }
        props
    }

    fn axi(&self) -> Vec<SvaProperty> {
        use AssertionCategory::Handshake as H;

        const CHANNELS: &[(&str, &[&str])] = &[
            ("aw", &["awaddr", "awprot", "awlen", "awsize", "awburst", "awid"]),
            ("w", &["wdata", "wstrb", "wlast"]),
            ("b", &["bresp", "bid"]),
            ("ar", &["araddr", "arprot", "arlen", "arsize", "arburst", "arid"]),
            ("r", &["rdata", "rresp", "rlast", "rid"]),
        ];

        let mut props = Vec::new();
        for (channel, payload) in CHANNELS {
            let (Some(valid), Some(ready)) = (
                self.signal(&format!("{channel}valid")),
                self.signal(&format!("{channel}ready")),
            ) else {
                continue;
            };
            let (v, r) = (&valid.name, &ready.name);

            props.push(self.check(
                format!("axi_{channel}valid_held"),
                format!("{v} stays high until {r}"),
                H,
                &[valid],
                &format!("({v} && !{r}) |=> {v}"),
            ));
            for token in *payload {
                if let Some(sig) = self.signal(token) {
                    props.push(self.check(
                        format!("axi_{token}_stable"),
                        format!("{} is stable while {v} waits for {r}", sig.name),
                        H,
                        &[sig],
                        &format!("({v} && !{r}) |=> $stable({})", sig.name),
                    ));
                }
            }
            props.push(self.cover(
                format!("axi_{channel}_handshake"),
                format!("A {} channel handshake occurs", channel.to_ascii_uppercase()),
                H,
                &format!("{v} && {r}"),
            ));
        }
        props
    }

    fn spi(&self) -> Vec<SvaProperty> {
        use AssertionCategory::Protocol as P;

        let Some(cs) = self.signal_any(&["cs_n", "ss_n", "csn", "ssn", "spi_cs", "spi_ss", "cs", "ss"])
        else {
            return Vec::new();
        };
        let sel = &cs.name;

        let mut props = Vec::new();
        for token in ["mosi", "miso"] {
            if let Some(line) = self.signal(token) {
                props.push(self.check(
                    format!("spi_{token}_known_when_selected"),
                    format!("{} is known while {sel} is asserted", line.name),
                    P,
                    &[line],
                    &format!("!{sel} |-> !$isunknown({})", line.name),
                ));
            }
        }
        props.push(self.cover("spi_select", "A slave is selected", P, &format!("$fell({sel})")));
        props.push(self.cover("spi_deselect", "A slave is released", P, &format!("$rose({sel})")));
        props
    }

    fn i2c(&self) -> Vec<SvaProperty> {
        use AssertionCategory::Protocol as P;

        let (Some(sda), Some(scl)) = (self.signal("sda"), self.signal("scl")) else {
            return Vec::new();
        };
        let (d, c) = (&sda.name, &scl.name);
        vec![
            self.check(
                "i2c_scl_known",
                format!("{c} is never X or Z"),
                P,
                &[scl],
                &format!("!$isunknown({c})"),
            ),
            self.cover("i2c_start", "A START condition occurs", P, &format!("{c} && $fell({d})")),
            self.cover("i2c_stop", "A STOP condition occurs", P, &format!("{c} && $rose({d})")),
        ]
    }

    fn uart(&self) -> Vec<SvaProperty> {
        use AssertionCategory::Protocol as P;

        let mut props = Vec::new();
        if let Some(tx) = self.exact_any(&["txd", "uart_tx", "tx", "tx_o", "o_tx", "serial_out"]) {
            let t = &tx.name;
            if let Some(released) = self.reset_released() {
                props.push(SvaProperty {
                    name: "uart_tx_idle_after_reset".into(),
                    description: format!("{t} idles high when reset is released"),
                    category: P,
                    assertion_type: Self::obligation(&[tx]),
                    code: format!("{} {released} |-> {t}", self.event()),
                });
            }
            props.push(self.check(
                "uart_tx_known",
                format!("{t} is never X or Z"),
                P,
                &[tx],
                &format!("!$isunknown({t})"),
            ));
            props.push(self.cover("uart_tx_start_bit", "A transmit start bit occurs", P, &format!("$fell({t})")));
        }
        if let Some(rx) = self.exact_any(&["rxd", "uart_rx", "rx", "rx_i", "i_rx", "serial_in"]) {
            let r = &rx.name;
            props.push(self.cover("uart_rx_start_bit", "A receive start bit occurs", P, &format!("$fell({r})")));
        }
        props
    }

    fn wishbone(&self) -> Vec<SvaProperty> {
        use AssertionCategory::{Handshake as H, Protocol as P};

        let (Some(cyc), Some(stb)) = (self.signal("cyc"), self.signal("stb")) else {
            return Vec::new();
        };
        let (c, s) = (&cyc.name, &stb.name);

        let mut props = vec![self.check(
            "wb_stb_within_cycle",
            "STB is only asserted inside a bus cycle",
            P,
            &[stb],
            &format!("{s} |-> {c}"),
        )];
        if let Some(ack) = self.signal("ack") {
            let a = &ack.name;
            props.push(self.check(
                "wb_ack_within_cycle",
                "ACK is only asserted inside a bus cycle",
                P,
                &[ack],
                &format!("{a} |-> {c}"),
            ));
            props.push(self.check(
                "wb_stb_held",
                "STB stays high until ACK",
                H,
                &[stb],
                &format!("({c} && {s} && !{a}) |=> {s}"),
            ));
            props.push(self.cover("wb_transfer", "A Wishbone transfer completes", H, &format!("{c} && {s} && {a}")));
        }
        props
    }

    fn fsm_properties(&self) -> Vec<SvaProperty> {
        use AssertionCategory::Fsm as F;

        let Some(fsm) = &self.rtl.fsm else {
            return Vec::new();
        };
        let sig = &fsm.state_signal;

        let mut props = vec![SvaProperty {
            name: "fsm_legal_state".into(),
            description: format!("{sig} always holds a declared state"),
            category: F,
            assertion_type: AssertionType::Assert,
            code: format!("{} {sig} inside {{{}}}", self.clocked(), fsm.states.join(", ")),
        }];

        if let (Some(released), Some(initial)) = (self.reset_released(), fsm.states.first()) {
            props.push(SvaProperty {
                name: "fsm_reset_state".into(),
                description: format!("{sig} is {initial} when reset is released"),
                category: F,
                assertion_type: AssertionType::Assert,
                code: format!("{} {released} |-> {sig} == {initial}", self.event()),
            });
        }

        if fsm.encoding == FsmEncoding::OneHot {
            props.push(SvaProperty {
                name: "fsm_onehot".into(),
                description: format!("{sig} is one-hot"),
                category: F,
                assertion_type: AssertionType::Assert,
                code: format!("{} $onehot({sig})", self.clocked()),
            });
        }

        for state in &fsm.states {
            props.push(self.cover(
                format!("fsm_visit_{}", state.to_ascii_lowercase()),
                format!("{sig} reaches {state}"),
                F,
                &format!("{sig} == {state}"),
            ));
        }
        props
    }

    /// The internal state register as an extra checker input, sized by
    /// encoding. Absent when there is no FSM or the state is already a port.
    fn observed_state(&self) -> Option<Port> {
        let fsm = self.rtl.fsm.as_ref()?;
        if self.rtl.port(&fsm.state_signal).is_some() {
            return None;
        }
        let width = match fsm.encoding {
            FsmEncoding::OneHot => fsm.state_count as u32,
            FsmEncoding::Binary => bits_for(fsm.state_count),
        };
        Some(Port {
            name: fsm.state_signal.clone(),
            direction: PortDirection::Input,
            signal_class: SignalClass::Logic,
            is_signed: false,
            width,
            msb: (width > 1).then(|| width - 1),
            lsb: (width > 1).then_some(0),
        })
    }
}

/// Bits needed to encode `count` distinct values, at least 1.
fn bits_for(count: usize) -> u32 {
    let mut bits = 1;
    while (1usize << bits) < count {
        bits += 1;
    }
    bits
}

/// Renders the complete checker module for a parsed design.
pub fn generate_sva_from_parsed(rtl: &ParsedRtl) -> String {
    SvaGenerator::new(rtl).generate_all().to_sv()
}
