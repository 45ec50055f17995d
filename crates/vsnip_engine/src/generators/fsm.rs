//! `FSM_{name}`: next-state logic and state register of a state machine.
//!
//! ```text
//! `include "FSM_ctrl.vs" /*
//!   IDLE -> RUN, start_i
//!   RUN -> DONE, last_i
//!   DONE -> IDLE
//! */
//! ```
//!
//! States are encoded in order of first appearance. The state register is
//! produced by a nested `reg_{name}_current_state` directive that resets to
//! the first state.


use super::{block_lines, range_prefix};
use crate::artifact::Artifact;
use crate::engine::Expander;
use crate::errors::EngineError;
use crate::generator::{GenerateRequest, Generator};

/// One `CURRENT -> NEXT[, condition]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Source state.
    pub from: String,
    /// Destination state.
    pub to: String,
    /// Guard expression; `None` means always taken.
    pub condition: Option<String>,
}

impl Transition {
    fn parse(line: &str) -> Option<Self> {
        let (from, rest) = line.split_once("->")?;
        let (to, condition) = match rest.split_once(',') {
            Some((to, cond)) => (to, Some(cond.trim()).filter(|c| !c.is_empty())),
            None => (rest, None),
        };
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            return None;
        }
        Some(Self {
            from: from.to_string(),
            to: to.to_string(),
            condition: condition.map(str::to_string),
        })
    }
}

/// Bits needed to encode `states` states; at least one.
pub fn state_width(states: usize) -> u32 {
    let max_code = states.saturating_sub(1) as u64;
    (u64::BITS - max_code.leading_zeros()).max(1)
}

/// The `FSM` generator.
pub struct Fsm;

impl Generator for Fsm {
    fn name(&self) -> &str {
        "FSM"
    }

    fn description(&self) -> &str {
        "state machine from a transition list"
    }

    fn generate(
        &self,
        request: &GenerateRequest,
        cx: &mut Expander<'_>,
    ) -> Result<Vec<Artifact>, EngineError> {
        let transitions = block_lines(&request.arguments)
            .map(|line| {
                Transition::parse(line).ok_or_else(|| {
                    EngineError::malformed(
                        &request.target,
                        format!("`{line}` is not a `CURRENT -> NEXT[, condition]` transition"),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if transitions.is_empty() {
            return Err(EngineError::malformed(&request.target, "no transitions given"));
        }

        let mut states: Vec<&str> = Vec::new();
        for t in &transitions {
            for state in [t.from.as_str(), t.to.as_str()] {
                if !states.contains(&state) {
                    states.push(state);
                }
            }
        }
        let width = state_width(states.len());
        let name = &request.name;
        let current = format!("{name}_current_state");
        let next = format!("{name}_next_state");
        let range = range_prefix(&width.to_string());

        let mut signals = format!("  // Automatically generated signals for {name} FSM\n");
        for (code, state) in states.iter().enumerate() {
            signals.push_str(&format!("  localparam {range}{state} = {width}'d{code};\n"));
        }
        signals.push_str(&format!("  reg {range}{current}, {next};\n"));
        cx.signals().append(&request.parent, &signals)?;

        let mut out = format!("  // Automatically generated logic for {name} FSM\n");
        out.push_str("  always @(*) begin\n");
        out.push_str(&format!("    case ({current})\n"));
        for state in &states {
            let outgoing: Vec<&Transition> =
                transitions.iter().filter(|t| t.from == *state).collect();
            if outgoing.is_empty() {
                out.push_str(&format!("      {state}: {next} = {state};\n"));
                continue;
            }
            out.push_str(&format!("      {state}: begin\n"));
            for (i, t) in outgoing.iter().enumerate() {
                let cond = t.condition.as_deref().unwrap_or("1'b1");
                let keyword = if i == 0 { "if" } else { "end else if" };
                out.push_str(&format!("        {keyword} ({cond}) begin\n"));
                out.push_str(&format!("          {next} = {};\n", t.to));
            }
            out.push_str("        end else begin\n");
            out.push_str(&format!("          {next} = {state};\n"));
            out.push_str("        end\n");
            out.push_str("      end\n");
        }
        out.push_str(&format!("      default: {next} = {};\n", states[0]));
        out.push_str("    endcase\n");
        out.push_str("  end\n\n");
        let ext = &cx.options().scan.snippet_extension;
        out.push_str(&format!(
            "  `include \"reg_{current}.{ext}\" // {width}, {}, , , {next}\n",
            states[0]
        ));

        Ok(vec![Artifact::generated(&request.target, out)])
    }
}
