//! `AXI_{lite|stream}_{s|m}_{ios|logic}`: AXI4-Lite and AXI4-Stream ports.
//!
//! One invocation writes every artifact available for the interface: the
//! port list (`_ios`) always, and the slave logic (`_logic`) for AXI4-Lite
//! slaves. An argument of `,` appends a trailing comma to the port list so
//! more ports can follow it.

use crate::artifact::Artifact;
use crate::engine::Expander;
use crate::errors::EngineError;
use crate::generator::{GenerateRequest, Generator};

const LITE_SLAVE_IOS: &str = "
    input  wire AXIL_awvalid_i,
    output wire AXIL_awready_o,
    input  wire [ADDR_WIDTH-1:0] AXIL_awaddr_i,
    input  wire [2:0] AXIL_awprot_i,
    input  wire AXIL_wvalid_i,
    output wire AXIL_wready_o,
    input  wire [DATA_WIDTH-1:0] AXIL_wdata_i,
    input  wire [DATA_WIDTH/8-1:0] AXIL_wstrb_i,
    output  reg AXIL_bvalid_o,
    input  wire AXIL_bready_i,
    output wire [1:0] AXIL_bresp_o,
    input  wire AXIL_arvalid_i,
    output wire AXIL_arready_o,
    input  wire [ADDR_WIDTH-1:0] AXIL_araddr_i,
    input  wire [2:0] AXIL_arprot_i,
    output  reg AXIL_rvalid_o,
    input  wire AXIL_rready_i,
    output  reg [DATA_WIDTH-1:0] AXIL_rdata_o,
    output wire [1:0] AXIL_rresp_o";

const LITE_MASTER_IOS: &str = "
    output wire AXIL_awvalid_o,
    input  wire AXIL_awready_i,
    output wire [ADDR_WIDTH-1:0] AXIL_awaddr_o,
    output wire [2:0] AXIL_awprot_o,
    output wire AXIL_wvalid_o,
    input  wire AXIL_wready_i,
    output wire [DATA_WIDTH-1:0] AXIL_wdata_o,
    output wire [DATA_WIDTH/8-1:0] AXIL_wstrb_o,
    input  wire AXIL_bvalid_i,
    output wire AXIL_bready_o,
    input  wire [1:0] AXIL_bresp_i,
    output wire AXIL_arvalid_o,
    input  wire AXIL_arready_i,
    output wire [ADDR_WIDTH-1:0] AXIL_araddr_o,
    output wire [2:0] AXIL_arprot_o,
    input  wire AXIL_rvalid_i,
    output wire AXIL_rready_o,
    input  wire [DATA_WIDTH-1:0] AXIL_rdata_i,
    input  wire [1:0] AXIL_rresp_i";

const STREAM_SLAVE_IOS: &str = "
    input  wire [DATA_WIDTH-1:0] AXIS_tdata_i,
    input  wire [DATA_WIDTH/8-1:0] AXIS_tstrb_i,
    input  wire AXIS_tlast_i,
    input  wire AXIS_tvalid_i,
    output wire AXIS_tready_o";

const STREAM_MASTER_IOS: &str = "
    output wire [DATA_WIDTH-1:0] AXIS_tdata_o,
    output wire [DATA_WIDTH/8-1:0] AXIS_tstrb_o,
    output wire AXIS_tlast_o,
    output wire AXIS_tvalid_o,
    input  wire AXIS_tready_i";

const LITE_SLAVE_SIGNALS: &str = "
  // Additional signals for AXI-Lite Slave
  reg AXIL_awvalid_q;
  reg [ADDR_WIDTH-1:0] AXIL_awaddr_q;
  reg AXIL_wvalid_q;
  reg [DATA_WIDTH-1:0] AXIL_wdata_q;
  reg [ADDR_WIDTH-1:0] AXIL_araddr_q;
  wire AXIL_rvalid_e;
  wire [DATA_WIDTH-1:0] r_data;
  wire [ADDR_WIDTH-1:0] w_address;
  wire [DATA_WIDTH-1:0] w_data;
  wire w_enable;
  wire [ADDR_WIDTH-1:0] r_address;
  wire r_enable;
";

fn lite_slave_logic(interface: &str, ext: &str) -> String {
    format!(
        "
  // Automatically generated AXIL slave logic.
  assign AXIL_awready_o = 1'b1;
  assign AXIL_wready_o = 1'b1;
  assign AXIL_arready_o = 1'b1;
  assign AXIL_bresp_o = 2'b00;
  assign AXIL_rresp_o = 2'b00;

  assign w_address = AXIL_awvalid_i ? AXIL_awaddr_i : AXIL_awaddr_q;
  assign w_data = AXIL_wvalid_i ? AXIL_wdata_i : AXIL_wdata_q;
  assign w_enable = (AXIL_awvalid_i & AXIL_wvalid_i) | (AXIL_awvalid_i & AXIL_wvalid_q) | (AXIL_awvalid_q & AXIL_wvalid_i);
  assign r_address = AXIL_arvalid_i ? AXIL_araddr_i : AXIL_araddr_q;
  assign r_enable = AXIL_arvalid_i;
  assign AXIL_rvalid_e = AXIL_arvalid_i | AXIL_rready_i;

  `include \"reg_AXI_{interface}.{ext}\" /*
    AXIL_awvalid_q, 1, 0, w_enable, AXIL_awvalid_i, AXIL_awvalid_i
    AXIL_awaddr_q, ADDR_WIDTH, 0, , AXIL_awvalid_i, AXIL_awaddr_i
    AXIL_wvalid_q, 1, 0, w_enable, AXIL_wvalid_i, AXIL_wvalid_i
    AXIL_wdata_q, DATA_WIDTH, 0, , AXIL_wvalid_i, AXIL_wdata_i
    AXIL_araddr_q, ADDR_WIDTH, 0, , AXIL_arvalid_i, AXIL_araddr_i
    AXIL_bvalid_o, 1, 0, , , w_enable
    AXIL_rvalid_o, 1, 0, , _e, r_enable
    AXIL_rdata_o, DATA_WIDTH, 0, , , r_data
  */
"
    )
}

/// Which side of which interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxiInterface {
    /// AXI4-Lite slave.
    LiteSlave,
    /// AXI4-Lite master.
    LiteMaster,
    /// AXI4-Stream slave.
    StreamSlave,
    /// AXI4-Stream master.
    StreamMaster,
}

impl AxiInterface {
    /// Parses `lite_s`, `lite_m`, `stream_s` or `stream_m`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "lite_s" => Some(AxiInterface::LiteSlave),
            "lite_m" => Some(AxiInterface::LiteMaster),
            "stream_s" => Some(AxiInterface::StreamSlave),
            "stream_m" => Some(AxiInterface::StreamMaster),
            _ => None,
        }
    }

    fn ios(self) -> &'static str {
        match self {
            AxiInterface::LiteSlave => LITE_SLAVE_IOS,
            AxiInterface::LiteMaster => LITE_MASTER_IOS,
            AxiInterface::StreamSlave => STREAM_SLAVE_IOS,
            AxiInterface::StreamMaster => STREAM_MASTER_IOS,
        }
    }
}

/// The `AXI` generator.
pub struct Axi;

impl Generator for Axi {
    fn name(&self) -> &str {
        "AXI"
    }

    fn description(&self) -> &str {
        "AXI4-Lite and AXI4-Stream ports and slave logic"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        cx: &mut Expander<'_>,
    ) -> Result<Vec<Artifact>, EngineError> {
        let interface_name = ["_ios", "_logic"]
            .iter()
            .find_map(|s| request.name.strip_suffix(s))
            .unwrap_or(&request.name);
        let interface = AxiInterface::parse(interface_name).ok_or_else(|| {
            EngineError::malformed(
                &request.target,
                format!("unknown interface `{interface_name}`, expected lite_s, lite_m, stream_s or stream_m"),
            )
        })?;
        let trailing_comma = request.arguments.trim() == ",";

        let prefix = format!("AXI_{interface_name}");
        let mut ios = interface.ios().to_string();
        if trailing_comma {
            ios.push(',');
        }
        ios.push('\n');
        let mut artifacts = vec![Artifact::generated(format!("{prefix}_ios"), ios)];

        if interface == AxiInterface::LiteSlave {
            let ext = cx.options().scan.snippet_extension.clone();
            artifacts.push(Artifact::generated(
                format!("{prefix}_logic"),
                lite_slave_logic(interface_name, &ext),
            ));
            let signals = format!("// AXI Signals\n{LITE_SLAVE_SIGNALS}");
            cx.signals().append(&request.parent, &signals)?;
        } else {
            log::debug!("no logic template for AXI {interface_name}");
        }
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_names() {
        assert_eq!(AxiInterface::parse("lite_s"), Some(AxiInterface::LiteSlave));
        assert_eq!(AxiInterface::parse("stream_m"), Some(AxiInterface::StreamMaster));
        assert_eq!(AxiInterface::parse("full_s"), None);
    }

    #[test]
    fn port_lists_end_without_separator() {
        for iface in [
            AxiInterface::LiteSlave,
            AxiInterface::LiteMaster,
            AxiInterface::StreamSlave,
            AxiInterface::StreamMaster,
        ] {
            assert!(!iface.ios().ends_with(','));
        }
    }

    #[test]
    fn logic_names_nested_register_bank() {
        let logic = lite_slave_logic("lite_s", "vs");
        assert!(logic.contains("`include \"reg_AXI_lite_s.vs\" /*"));
        assert!(logic.trim_end().ends_with("*/"));
    }
}
