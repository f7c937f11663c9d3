//! Real-world RTL design conformance tests.
//!
//! These tests run the full parse → SVA → context → bundle pipeline on
//! realistic designs of the kind verification engineers receive: bus
//! peripherals, serial controllers, and state machines. Each test checks
//! what the extractor recovers and what the generators build from it.

use verifai_conformance::full_pipeline;
use verifai_rtl::{ClockEdge, FsmEncoding, PortDirection, Protocol, ResetPolarity};
use verifai_sva::{AssertionCategory, AssertionType};

// ============================================================================
// Category 1: Bus Peripherals
// ============================================================================

#[test]
fn apb_gpio_with_parameterized_address() {
    let src = r#"
// Simple APB GPIO block
module apb_gpio #(
    parameter ADDR_WIDTH = 12
) (
    input  wire                  pclk,
    input  wire                  presetn,
    input  wire                  psel,
    input  wire                  penable,
    input  wire                  pwrite,
    input  wire [ADDR_WIDTH-1:0] paddr,
    input  wire [31:0]           pwdata,
    output reg  [31:0]           prdata,
    output wire                  pready,
    output wire                  pslverr,
    output reg  [7:0]            gpio_out
);
    assign pready  = 1'b1;
    assign pslverr = 1'b0;

    always @(posedge pclk or negedge presetn) begin
        if (!presetn)
            gpio_out <= 8'd0;
        else if (psel && penable && pwrite)
            gpio_out <= pwdata[7:0];
    end
endmodule
"#;
    let result = full_pipeline(src);
    let rtl = &result.rtl;

    assert_eq!(rtl.module_name, "apb_gpio");
    assert_eq!(rtl.ports.len(), 11);
    assert_eq!(rtl.port("paddr").unwrap().width, 1);
    assert_eq!(rtl.data_width(), 32);
    assert_eq!(rtl.clocks.clock_signals, vec!["pclk"]);
    assert_eq!(rtl.reset_polarity("presetn"), Some(ResetPolarity::ActiveLow));
    assert_eq!(result.hint_protocols(), vec![Protocol::Apb]);
    assert!(rtl.fsm.is_none());

    assert!(result.has_property("apb_setup_to_access"));
    assert!(result.has_property("apb_penable_needs_psel"));
    assert!(result.has_property("apb_access_held"));
    assert!(result.has_property("gpio_out_known_after_reset"));
    // Only the requester drives PSEL and PENABLE, so the rule is assumed.
    let setup = result
        .sva
        .properties
        .iter()
        .find(|p| p.name == "apb_setup_to_access")
        .unwrap();
    assert_eq!(setup.assertion_type, AssertionType::Assume);
    assert!(setup.code.contains("disable iff (!presetn)"));

    assert_eq!(result.context_str("protocol").as_deref(), Some("apb"));
    assert_eq!(result.context_str("reset_active").as_deref(), Some("!presetn"));
    assert_eq!(result.context_str("addr_width").as_deref(), Some("1"));
}

#[test]
fn axi4_lite_register_file() {
    let src = r#"
module axil_regs (
    input  logic        aclk,
    input  logic        aresetn,
    input  logic [3:0]  s_axi_awaddr,
    input  logic [2:0]  s_axi_awprot,
    input  logic        s_axi_awvalid,
    output logic        s_axi_awready,
    input  logic [31:0] s_axi_wdata,
    input  logic [3:0]  s_axi_wstrb,
    input  logic        s_axi_wvalid,
    output logic        s_axi_wready,
    output logic [1:0]  s_axi_bresp,
    output logic        s_axi_bvalid,
    input  logic        s_axi_bready,
    input  logic [3:0]  s_axi_araddr,
    input  logic [2:0]  s_axi_arprot,
    input  logic        s_axi_arvalid,
    output logic        s_axi_arready,
    output logic [31:0] s_axi_rdata,
    output logic [1:0]  s_axi_rresp,
    output logic        s_axi_rvalid,
    input  logic        s_axi_rready
);
endmodule
"#;
    let result = full_pipeline(src);
    let rtl = &result.rtl;

    assert_eq!(rtl.ports.len(), 21);
    assert_eq!(rtl.clocks.clock_signals, vec!["aclk"]);
    assert_eq!(rtl.clocks.reset_signals, vec!["aresetn"]);
    let top = rtl.top_protocol().unwrap();
    assert_eq!(top.protocol, Protocol::Axi4Lite);
    assert_eq!(top.confidence, 0.95);
    assert_eq!(rtl.data_width(), 32);
    assert_eq!(rtl.addr_width(), 4);

    // Write address is driven by the manager, read data by the design.
    let kind = |name: &str| {
        result
            .sva
            .properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.assertion_type)
    };
    assert_eq!(kind("axi_awvalid_held"), Some(AssertionType::Assume));
    assert_eq!(kind("axi_rvalid_held"), Some(AssertionType::Assert));
    assert_eq!(kind("axi_awaddr_stable"), Some(AssertionType::Assume));
    assert_eq!(kind("axi_rdata_stable"), Some(AssertionType::Assert));
    assert_eq!(kind("axi_b_handshake"), Some(AssertionType::Cover));
    assert!(result.sva.properties_in(AssertionCategory::Handshake).count() >= 15);

    assert_eq!(result.context_str("strb_width").as_deref(), Some("4"));
    assert_eq!(result.context_str("PREFIX").as_deref(), Some("AXI4LITE"));
}

#[test]
fn wishbone_slave() {
    let src = r#"
module wb_ram (
    input  wire        clk_i,
    input  wire        rst_ni,
    input  wire        wb_cyc_i,
    input  wire        wb_stb_i,
    input  wire        wb_we_i,
    input  wire [3:0]  wb_adr_i,
    input  wire [31:0] wb_dat_i,
    output reg  [31:0] wb_dat_o,
    output reg         wb_ack_o
);
endmodule
"#;
    let result = full_pipeline(src);
    let rtl = &result.rtl;

    assert_eq!(rtl.clocks.clock_signals, vec!["clk_i"]);
    assert_eq!(rtl.reset_polarity("rst_ni"), Some(ResetPolarity::ActiveLow));
    let top = rtl.top_protocol().unwrap();
    assert_eq!(top.protocol, Protocol::Wishbone);
    assert_eq!(top.matching_signals.len(), 10);
    assert_eq!(rtl.addr_width(), 4);

    for name in ["wb_stb_within_cycle", "wb_ack_within_cycle", "wb_stb_held", "wb_transfer"] {
        assert!(result.has_property(name), "missing {name}");
    }
}

// ============================================================================
// Category 2: Serial Controllers
// ============================================================================

#[test]
fn uart_core_with_parameter_fsm() {
    let src = r#"
module uart_core #(
    parameter CLKS_PER_BIT = 868
) (
    input  wire       clk,
    input  wire       rst,
    input  wire [7:0] tx_data,
    input  wire       tx_valid,
    output reg        tx_ready,
    output reg        txd,
    input  wire       rxd,
    output reg  [7:0] rx_data,
    output reg        rx_valid
);
    localparam STATE_IDLE  = 2'd0;
    localparam STATE_START = 2'd1;
    localparam STATE_DATA  = 2'd2;
    localparam STATE_STOP  = 2'd3;

    reg [1:0] state;
    reg [9:0] clk_count;
    reg [2:0] bit_index;

    always @(posedge clk) begin
        if (rst) begin
            state <= STATE_IDLE;
            txd   <= 1'b1;
        end else begin
            case (state)
                STATE_IDLE:  if (tx_valid) state <= STATE_START;
                STATE_START: if (clk_count == CLKS_PER_BIT - 1) state <= STATE_DATA;
                STATE_DATA:  if (bit_index == 3'd7) state <= STATE_STOP;
                STATE_STOP:  state <= STATE_IDLE;
            endcase
        end
    end
endmodule
"#;
    let result = full_pipeline(src);
    let rtl = &result.rtl;

    assert_eq!(rtl.parameters.len(), 5);
    assert_eq!(rtl.reset_polarity("rst"), Some(ResetPolarity::ActiveHigh));

    let fsm = rtl.fsm.as_ref().expect("fsm");
    assert_eq!(
        fsm.states,
        vec!["STATE_IDLE", "STATE_START", "STATE_DATA", "STATE_STOP"]
    );
    assert_eq!(fsm.state_signal, "state");
    assert_eq!(fsm.encoding, FsmEncoding::Binary);

    let top = rtl.top_protocol().unwrap();
    assert_eq!(top.protocol, Protocol::Uart);
    assert_eq!(top.matching_signals.len(), 8);
    assert_eq!(rtl.data_width(), 8);

    assert!(result.has_property("uart_tx_idle_after_reset"));
    assert!(result.has_property("uart_tx_known"));
    assert!(result.has_property("uart_rx_start_bit"));
    assert!(result.has_property("fsm_legal_state"));
    assert!(result.has_property("fsm_visit_state_stop"));
    assert!(!result.has_property("fsm_onehot"));

    // Default UART options: 115200 baud, 8N1.
    assert_eq!(result.context_str("frame_bits").as_deref(), Some("10"));
    assert_eq!(result.context_str("bit_period_ns").as_deref(), Some("8680"));
    assert_eq!(result.context_str("fsm_state_count").as_deref(), Some("4"));
}

#[test]
fn spi_master_with_enum_fsm() {
    let src = r#"
module spi_master (
    input  logic       clk,
    input  logic       rst_n,
    input  logic       start,
    input  logic [7:0] tx_byte,
    output logic [7:0] rx_byte,
    output logic       busy,
    output logic       sclk,
    output logic       mosi,
    input  logic       miso,
    output logic       cs_n
);
    typedef enum logic [1:0] {IDLE, TRANSFER, DONE} spi_state_t;
    spi_state_t state;

    always_ff @(posedge clk or negedge rst_n) begin
        if (!rst_n) state <= IDLE;
        else case (state)
            IDLE:     if (start) state <= TRANSFER;
            TRANSFER: state <= DONE;
            DONE:     state <= IDLE;
        endcase
    end
endmodule
"#;
    let result = full_pipeline(src);
    let rtl = &result.rtl;

    assert_eq!(rtl.clocks.clock_signals, vec!["clk"]);
    assert_eq!(rtl.clocks.clock_edges["clk"], ClockEdge::Posedge);
    assert_eq!(result.hint_protocols(), vec![Protocol::Spi]);

    let fsm = rtl.fsm.as_ref().expect("fsm");
    assert_eq!(fsm.states, vec!["IDLE", "TRANSFER", "DONE"]);
    assert_eq!(fsm.state_signal, "state");

    let kind = |name: &str| {
        result
            .sva
            .properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.assertion_type)
    };
    assert_eq!(kind("spi_mosi_known_when_selected"), Some(AssertionType::Assert));
    assert_eq!(kind("spi_miso_known_when_selected"), Some(AssertionType::Assume));
    assert_eq!(kind("spi_select"), Some(AssertionType::Cover));
    assert!(result.has_property("fsm_reset_state"));

    // The state register is internal, so the checker observes it as an
    // extra two-bit input.
    let sv = result.sva.to_sv();
    assert!(sv.contains("input logic [1:0] state"));
    assert!(sv.contains("bind spi_master spi_master_sva u_spi_master_sva (.*);"));

    assert_eq!(result.context_str("spi_mode").as_deref(), Some("0"));
    assert_eq!(result.context_str("spi_cpol").as_deref(), Some("0"));
}

#[test]
fn i2c_controller_with_split_pads() {
    let src = r#"
module i2c_ctrl (
    input  wire       clk,
    input  wire       rst_n,
    input  wire [6:0] dev_addr,
    input  wire       go,
    output wire       scl_o,
    input  wire       sda_i,
    output wire       sda_o,
    output wire       sda_oe
);
endmodule
"#;
    let result = full_pipeline(src);
    let rtl = &result.rtl;

    let top = rtl.top_protocol().unwrap();
    assert_eq!(top.protocol, Protocol::I2c);
    assert_eq!(top.confidence, 0.53);
    assert_eq!(rtl.addr_width(), 7);

    let scl_known = result
        .sva
        .properties
        .iter()
        .find(|p| p.name == "i2c_scl_known")
        .unwrap();
    assert!(scl_known.code.contains("!$isunknown(scl_o)"));
    assert!(result.has_property("i2c_start"));
    assert!(result.has_property("i2c_stop"));

    assert_eq!(result.context_str("i2c_speed_mode").as_deref(), Some("standard"));
    assert_eq!(result.context_str("i2c_clock_period_ns").as_deref(), Some("10000"));
}

// ============================================================================
// Category 3: State Machines and Datapath
// ============================================================================

#[test]
fn one_hot_arbiter() {
    let src = r#"
module arbiter (
    input  logic       clk,
    input  logic       rst_n,
    input  logic [3:0] req,
    output logic [3:0] gnt
);
    localparam ST_IDLE   = 4'b0001;
    localparam ST_GRANT0 = 4'b0010;
    localparam ST_GRANT1 = 4'b0100;
    localparam ST_GRANT2 = 4'b1000;

    logic [3:0] state_q, state_d;

    always_ff @(posedge clk or negedge rst_n) begin
        if (!rst_n) state_q <= ST_IDLE;
        else        state_q <= state_d;
    end
endmodule
"#;
    let result = full_pipeline(src);
    let rtl = &result.rtl;

    assert!(rtl.protocol_hints.is_empty());
    let fsm = rtl.fsm.as_ref().expect("fsm");
    assert_eq!(fsm.state_count, 4);
    assert_eq!(fsm.state_signal, "state_q");
    assert_eq!(fsm.encoding, FsmEncoding::OneHot);

    assert!(result.has_property("fsm_onehot"));
    assert!(result.has_property("fsm_reset_state"));
    assert!(result.has_property("fsm_visit_st_grant2"));
    assert_eq!(result.sva.properties_in(AssertionCategory::Protocol).count(), 0);
    assert!(result.sva.to_sv().contains("input logic [3:0] state_q"));

    assert_eq!(result.context_str("protocol").as_deref(), Some("generic"));
    assert_eq!(result.context_str("fsm_encoding").as_deref(), Some("one-hot"));
}

#[test]
fn combinational_alu_without_clock() {
    let src = r#"
module alu (
    input  wire signed [15:0] a,
    input  wire signed [15:0] b,
    input  wire [1:0]         op,
    output reg  signed [16:0] y
);
    always @(*) begin
        case (op)
            2'd0: y = a + b;
            2'd1: y = a - b;
            default: y = 17'sd0;
        endcase
    end
endmodule
"#;
    let result = full_pipeline(src);
    let rtl = &result.rtl;

    assert!(rtl.clocks.clock_signals.is_empty());
    assert!(rtl.clocks.reset_signals.is_empty());
    assert!(rtl.port("y").unwrap().is_signed);
    assert_eq!(result.port_names(PortDirection::Output), vec!["y"]);

    // No clock or reset: the checker samples a default clock and skips
    // the reset family.
    assert_eq!(result.sva.clock, "clk");
    assert!(result.sva.reset.is_none());
    assert_eq!(result.sva.properties_in(AssertionCategory::Reset).count(), 0);
    assert!(result.has_property("y_no_x"));
    assert_eq!(result.context_str("has_reset").as_deref(), Some("false"));
}

// ============================================================================
// Category 4: Bundle Layout
// ============================================================================

#[test]
fn bundle_wires_every_port() {
    let src = r#"
module counter (
    input  wire       clk,
    input  wire       rst_n,
    input  wire       en,
    output reg  [3:0] count
);
endmodule
"#;
    let result = full_pipeline(src);
    let bundle = &result.bundle;

    let iface = &bundle.file("tb/counter_if.sv").unwrap().contents;
    assert!(iface.contains("interface counter_if (input logic clk);"));
    assert!(iface.contains("logic [3:0] count;"));
    assert!(!iface.contains("logic clk;"));

    let top = &bundle.file("tb/counter_tb_top.sv").unwrap().contents;
    assert!(top.contains(".clk (clk)"));
    assert!(top.contains(".count (vif.count)"));
    assert!(top.contains("vif.rst_n = 1'b0;"));

    let makefile = &bundle.file("tb/Makefile.vcs").unwrap().contents;
    assert!(makefile.contains("counter_sva.sv"));
    assert!(bundle.file("README.md").is_some());
    assert!(bundle
        .file("tb/counter_tb_pkg.sv")
        .unwrap()
        .contents
        .contains("class counter_base_test extends uvm_test;"));
}
