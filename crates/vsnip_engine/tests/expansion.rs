//! End-to-end expansion over temporary project trees.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use vsnip_config::{load_config_from_str, VsnipConfig};
use vsnip_engine::{Engine, EngineError, ParentContext};

const ADDER: &str = "\
module adder #(
    parameter WIDTH = 8
) (
    input  wire [WIDTH-1:0] a_i,
    input  wire [WIDTH-1:0] b_i,
    output wire [7:0] sum_o // result
);
  assign sum_o = a_i + b_i;
endmodule
";

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, content) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn open(root: &Path) -> Engine {
    Engine::open(root, &VsnipConfig::default()).unwrap()
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

#[test]
fn instantiation_binds_defaults_and_declares_wires() {
    let top = "\
module top (
    input wire clk_i
);
  `include \"top_generated_signals.vs\"
  `include \"instantiate_adder_u0.vs\" // WIDTH=16
endmodule
";
    let dir = project(&[("rtl/adder.v", ADDER), ("rtl/top.v", top)]);
    let mut engine = open(dir.path());
    let out = engine.expand_file(&dir.path().join("rtl/top.v")).unwrap();

    let wires = "  // Wires for adder u0\n  wire [WIDTH-1:0] adder_a;\n  wire [WIDTH-1:0] adder_b;\n  wire [7:0] adder_sum;\n";
    let inst = "\n  // Instantiation of adder, autogenerated by vsnip\n  adder #(\n      .WIDTH(16)\n  ) u0 (\n      .a_i(adder_a),\n      .b_i(adder_b),\n      .sum_o(adder_sum) // result\n  );\n";
    assert_eq!(
        out,
        format!("module top (\n    input wire clk_i\n);\n{wires}{inst}endmodule\n")
    );
    assert_eq!(read(dir.path(), "instantiate_adder_u0.vs"), inst);
    assert_eq!(read(dir.path(), "top_generated_signals.vs"), wires);
    assert_eq!(engine.diagnostics().warning_count(), 0);
}

#[test]
fn repeated_instantiations_share_one_declaration_set() {
    let top = "\
  `include \"instantiate_adder_u0.vs\"
  `include \"instantiate_adder_u1.vs\"
";
    let dir = project(&[("adder.v", ADDER), ("top.v", top)]);
    let mut engine = open(dir.path());
    engine.expand_file(&dir.path().join("top.v")).unwrap();

    let signals = read(dir.path(), "top_generated_signals.vs");
    assert_eq!(signals.matches("wire [7:0] adder_sum;").count(), 1);
    assert_eq!(engine.generated().len(), 2);
    // top.v, adder.v once, and one text per artifact.
    assert_eq!(engine.source_db().len(), 4);
}

#[test]
fn reused_artifacts_are_byte_identical() {
    let top = "\
  `include \"reg_flag_q.vs\" // 1, 0, clr_i
  wire x;
  `include \"reg_flag_q.vs\" // 1, 0, clr_i
";
    let dir = project(&[("top.v", top)]);
    let mut engine = open(dir.path());
    let first = engine.expand_file(&dir.path().join("top.v")).unwrap();
    assert_eq!(engine.generated().len(), 1);
    let artifact = read(dir.path(), "reg_flag_q.vs");
    assert_eq!(first.matches(artifact.as_str()).count(), 2);
    assert_eq!(engine.source_db().len(), 2);

    let mut engine = open(dir.path());
    let second = engine.expand_file(&dir.path().join("top.v")).unwrap();
    assert!(engine.generated().is_empty());
    assert_eq!(second, first);
    assert_eq!(read(dir.path(), "reg_flag_q.vs"), artifact);
}

#[test]
fn unresolvable_directive_becomes_one_warning_line() {
    let top = "\
module top (
    input wire clk_i
);
    `include \"zzz_missing.vs\" // x=1
  assign a = b;
endmodule
";
    let dir = project(&[("top.v", top)]);
    let mut engine = open(dir.path());
    let out = engine.expand_file(&dir.path().join("top.v")).unwrap();

    let before: Vec<&str> = top.lines().collect();
    let after: Vec<&str> = out.lines().collect();
    assert_eq!(before.len(), after.len());
    let changed: Vec<usize> = (0..before.len()).filter(|&i| before[i] != after[i]).collect();
    assert_eq!(changed, vec![3]);
    assert!(after[3].starts_with("    // WARNING: zzz_missing.vs"));

    assert!(!engine.diagnostics().has_errors());
    let diags = engine.diagnostics().diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.to_string(), "W301");
}

#[test]
fn nested_generator_failure_is_a_warning_but_direct_request_is_fatal() {
    let top = "  `include \"mem_buf.vs\" // FLASH, 4, 8\n";
    let dir = project(&[("top.v", top)]);
    let mut engine = open(dir.path());
    let out = engine.expand_file(&dir.path().join("top.v")).unwrap();
    assert!(out.contains("// WARNING: mem_buf.vs could not be substituted"));
    assert_eq!(engine.diagnostics().diagnostics()[0].code.to_string(), "W302");

    let err = engine
        .generate("mem_buf", "FLASH, 4, 8", &ParentContext::named("top"))
        .unwrap_err();
    assert!(matches!(err, EngineError::MalformedArguments { .. }));
    assert!(!dir.path().join("mem_buf.vs").exists());
}

#[test]
fn unbalanced_override_groupings_are_malformed() {
    let dir = project(&[("adder.v", ADDER)]);
    let mut engine = open(dir.path());
    let err = engine
        .generate("instantiate_adder_u0", "WIDTH=(16", &ParentContext::named("top"))
        .unwrap_err();
    assert_eq!(err.code().to_string(), "E303");
}

#[test]
fn unknown_definition_and_name_mismatch_are_fatal() {
    let widget = "module gadget (\n    input wire a_i\n);\nendmodule\n";
    let dir = project(&[("widget.v", widget)]);
    let mut engine = open(dir.path());
    let parent = ParentContext::named("top");

    let err = engine.generate("instantiate_ghost_u0", "", &parent).unwrap_err();
    assert!(matches!(err, EngineError::DefinitionNotFound { .. }));

    let err = engine.generate("instantiate_widget_u0", "", &parent).unwrap_err();
    match err {
        EngineError::NameMismatch { expected, found, .. } => {
            assert_eq!(expected, "widget");
            assert_eq!(found, "gadget");
        }
        other => panic!("expected a name mismatch, got {other}"),
    }
}

#[test]
fn nested_directives_contribute_ports() {
    let sink = "\
module sink #(
    parameter DATA_WIDTH = 32
) (
    input wire clk_i,
    `include \"AXI_stream_s_ios.vs\" // ,
    input wire arst_i
);
endmodule
";
    let dir = project(&[("sink.v", sink)]);
    let mut engine = open(dir.path());
    let artifact = engine
        .generate("instantiate_sink_u0", "", &ParentContext::named("top"))
        .unwrap();

    let ports: Vec<&str> = artifact
        .content
        .lines()
        .filter_map(|l| l.trim().strip_prefix('.'))
        .filter(|l| !l.starts_with("DATA_WIDTH"))
        .collect();
    assert_eq!(ports.len(), 7);
    assert_eq!(ports[0], "clk_i(sink_clk),");
    assert_eq!(ports[5], "AXIS_tready_o(sink_AXIS_tready),");
    assert_eq!(ports[6], "arst_i(sink_arst)");
    assert!(dir.path().join("AXI_stream_s_ios.vs").is_file());
}

#[test]
fn counter_expands_its_nested_register() {
    let top = "  `include \"counter_tick.vs\" // 4, tick_en\n";
    let dir = project(&[("top.v", top)]);
    let mut engine = open(dir.path());
    let out = engine.expand_file(&dir.path().join("top.v")).unwrap();

    assert!(out.contains("      if (tick_en) begin\n        tick <= tick_next;\n"));
    assert!(out.contains("  assign tick_next = tick + 1;\n"));
    assert!(!out.contains("`include"));
    assert!(read(dir.path(), "counter_tick.vs").contains("`include \"reg_tick.vs\""));
    assert!(read(dir.path(), "top_generated_signals.vs").contains("reg [3:0] tick;"));
    assert_eq!(engine.generated().len(), 2);
}

#[test]
fn fsm_block_form() {
    let top = "\
  `include \"FSM_ctrl.vs\" /*
    IDLE -> RUN, start_i
    RUN -> DONE, last_i
    DONE -> IDLE
  */
";
    let dir = project(&[("top.v", top)]);
    let mut engine = open(dir.path());
    let out = engine.expand_file(&dir.path().join("top.v")).unwrap();

    assert!(out.contains("    case (ctrl_current_state)\n"));
    assert!(out.contains("      ctrl_current_state <= IDLE;\n"));
    let signals = read(dir.path(), "top_generated_signals.vs");
    assert!(signals.contains("  localparam [1:0] DONE = 2'd2;\n"));
    assert!(signals.contains("  reg [1:0] ctrl_current_state, ctrl_next_state;\n"));
}

#[test]
fn self_inclusion_is_a_cycle() {
    let dir = project(&[
        ("loop_a.vs", "  `include \"loop_b.vs\"\n"),
        ("loop_b.vs", "  `include \"loop_a.vs\"\n"),
        ("top.v", "  `include \"loop_a.vs\"\n"),
    ]);
    let mut engine = open(dir.path());
    let err = engine.expand_file(&dir.path().join("top.v")).unwrap_err();
    match err {
        EngineError::CyclicInclude { chain } => {
            assert_eq!(chain, vec!["loop_a", "loop_b", "loop_a"]);
        }
        other => panic!("expected a cycle, got {other}"),
    }
}

#[test]
fn depth_limit_aborts() {
    let top = "  `include \"counter_tick.vs\" // 4\n";
    let dir = project(&[("top.v", top)]);
    let config = load_config_from_str("[expand]\nmax_depth = 1\n").unwrap();
    let mut engine = Engine::open(dir.path(), &config).unwrap();
    let err = engine.expand_file(&dir.path().join("top.v")).unwrap_err();
    assert!(matches!(err, EngineError::IncludeDepthExceeded { limit: 1, .. }));
}

// The resolver keeps the first candidate on a tie, so which definition an
// ambiguous identifier lands on follows the catalog order.
#[test]
fn ambiguous_identifier_follows_catalog_order() {
    let dir = project(&[
        ("uart_top.v", "module uart_top (\n);\n"),
        ("uart_rx.v", "module uart_rx (\n);\n"),
    ]);
    let mut engine = open(dir.path());
    let cx = engine.expander();
    let (entry, instance) = cx.resolve_definition("uart_tx_u1").unwrap();
    assert_eq!(entry.stem(), "uart_rx");
    assert_eq!(instance, "tx_u1");
}

#[test]
fn tie_prefers_files_before_subdirectories() {
    let dir = project(&[
        ("uart_top.v", "module uart_top (\n);\n"),
        ("rtl/uart_rx.v", "module uart_rx (\n);\n"),
    ]);
    let mut engine = open(dir.path());
    assert_eq!(engine.catalog().definition_names(), vec!["uart_top", "uart_rx"]);
    let cx = engine.expander();
    let (entry, instance) = cx.resolve_definition("uart_tx_u1").unwrap();
    assert_eq!(entry.stem(), "uart_top");
    assert_eq!(instance, "tx_u1");
}

#[test]
fn build_materializes_every_definition() {
    let dir = project(&[
        ("rtl/adder.v", ADDER),
        ("rtl/top.v", "  `include \"instantiate_adder_u0.vs\"\n"),
        ("rtl/ctl.v", "  `include \"reg_busy_q.vs\" // 1\n"),
        ("build/ignored.v", "  `include \"reg_never.vs\"\n"),
    ]);
    let mut engine = open(dir.path());
    let report = engine.build().unwrap();
    assert_eq!(report.definitions, 3);
    assert_eq!(report.generated.len(), 2);
    assert!(dir.path().join("reg_busy_q.vs").is_file());
    assert!(!dir.path().join("reg_never.vs").exists());
}

const SCRIPT_CONFIG: &str = "[generators]\ninterpreter = \"sh\"\nscript_extensions = [\"sh\"]\n";

fn open_with_scripts(root: &Path) -> Engine {
    let config = load_config_from_str(SCRIPT_CONFIG).unwrap();
    Engine::open(root, &config).unwrap()
}

#[cfg(unix)]
#[test]
fn script_receives_name_comment_and_parent() {
    let script = "\
name=\"${1%.vs}\"
printf '  // crc %s for %s (%s)\\n  // args: %s\\n' \"$name\" \"$3\" \"$4\" \"$2\" > \"crc_${name}.vs\"
";
    let top = "  `include \"crc_x.vs\" // 8, poly\n";
    let dir = project(&[("scripts/crc.sh", script), ("top.v", top)]);
    let mut engine = open_with_scripts(dir.path());
    assert!(engine.registry().get("crc").is_some());

    let report = engine.build().unwrap();
    let expected = "  // crc x for top.v (top)\n  // args: // 8, poly\n";
    assert_eq!(read(dir.path(), "crc_x.vs"), expected);
    assert_eq!(report.generated.len(), 1);
    assert!(report.generated[0].ends_with("crc_x.vs"));
    assert_eq!(engine.diagnostics().warning_count(), 0);

    let out = engine.expand_file(&dir.path().join("top.v")).unwrap();
    assert_eq!(out, expected);
}

#[cfg(unix)]
#[test]
fn script_block_arguments_keep_comment_delimiters() {
    let script = "printf '%s\\n' \"$2\" > \"table_${1%.vs}.vs\"\n";
    let top = "  `include \"table_ops.vs\" /*\n    add, 0\n    sub, 1\n  */\n";
    let dir = project(&[("scripts/table.sh", script), ("top.v", top)]);
    let mut engine = open_with_scripts(dir.path());
    let out = engine.expand_file(&dir.path().join("top.v")).unwrap();
    assert_eq!(out, "/*\nadd, 0\nsub, 1\n*/\n");
}

#[cfg(unix)]
#[test]
fn failing_script_is_a_generator_warning() {
    let script = "echo 'unsupported polynomial' >&2\nexit 1\n";
    let top = "  `include \"broken_x.vs\" // 7\nwire a;\n";
    let dir = project(&[("scripts/broken.sh", script), ("top.v", top)]);
    let mut engine = open_with_scripts(dir.path());
    let out = engine.expand_file(&dir.path().join("top.v")).unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("  // WARNING: broken_x.vs could not be substituted"));
    assert!(lines[0].contains("unsupported polynomial"));
    let diags = engine.diagnostics().diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.to_string(), "W302");
    assert!(engine.generated().is_empty());

    let err = engine
        .generate("broken_x", "7", &ParentContext::named("top"))
        .unwrap_err();
    assert!(matches!(err, EngineError::GeneratorFailed { .. }));
}

#[cfg(unix)]
#[test]
fn silent_script_is_a_missing_artifact_warning() {
    let top = "  `include \"silent_x.vs\"\n";
    let dir = project(&[("scripts/silent.sh", "exit 0\n"), ("top.v", top)]);
    let mut engine = open_with_scripts(dir.path());
    let out = engine.expand_file(&dir.path().join("top.v")).unwrap();

    assert!(out.starts_with("  // WARNING: silent_x.vs could not be substituted"));
    let diags = engine.diagnostics().diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.to_string(), "W303");
    assert!(!dir.path().join("silent_x.vs").exists());
}
